//! Slug derivation for course titles.

/// Derives a URL slug from a course title.
///
/// Lowercases the title, collapses every run of characters that are not
/// ASCII letters or digits into a single hyphen, and trims hyphens from both
/// ends, so "Intro to Go!" becomes "intro-to-go".
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}
