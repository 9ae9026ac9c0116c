//! The built-in course catalog.
//!
//! A single canonical dataset serves two purposes: it seeds the database on
//! first start, and it backs the degraded-mode read path when the store is
//! unreachable so the catalog stays browsable during outages. Degraded-mode
//! responses strip lesson bodies to titles and order.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{CourseFilters, Difficulty, LessonOutline};

/// Course entry of the built-in dataset.
pub struct SeedCourse {
    pub id: &'static str,
    pub title: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub category: &'static str,
    pub difficulty: Difficulty,
    pub thumbnail_url: &'static str,
    pub lessons: &'static [SeedLesson],
}

pub struct SeedLesson {
    pub title: &'static str,
    pub content_html: &'static str,
    pub order: i64,
}

pub static BUILTIN_COURSES: &[SeedCourse] = &[
    SeedCourse {
        id: "seed-react-fundamentals",
        title: "React Fundamentals: Build Your First App",
        slug: "react-fundamentals-build-your-first-app",
        description: "Learn React from scratch: components, props, state, hooks, and routing with hands-on practice.",
        price: 49.0,
        category: "Development",
        difficulty: Difficulty::Beginner,
        thumbnail_url: "https://images.unsplash.com/photo-1555066931-4365d14bab8c?auto=format&fit=crop&w=1200&q=80",
        lessons: &[
            SeedLesson {
                title: "JSX, Components, and Props",
                content_html: "<p>Learn JSX and how to build components.</p>",
                order: 1,
            },
            SeedLesson {
                title: "State and Effects with Hooks",
                content_html: "<p>Use <strong>useState</strong> and <strong>useEffect</strong> to manage state.</p>",
                order: 2,
            },
        ],
    },
    SeedCourse {
        id: "seed-uiux-essentials",
        title: "UI/UX Design Essentials",
        slug: "ui-ux-design-essentials",
        description: "Master the foundations of user experience and visual design: layout, typography, color, and prototyping.",
        price: 39.0,
        category: "Design",
        difficulty: Difficulty::Beginner,
        thumbnail_url: "https://images.unsplash.com/photo-1545239351-1141bd82e8a6?auto=format&fit=crop&w=1200&q=80",
        lessons: &[
            SeedLesson {
                title: "UX Principles and User Flows",
                content_html: "<p>Understand user needs and design effective flows.</p>",
                order: 1,
            },
            SeedLesson {
                title: "Typography and Color Systems",
                content_html: "<p>Build consistent, accessible UI styles.</p>",
                order: 2,
            },
        ],
    },
    SeedCourse {
        id: "seed-excel-analytics",
        title: "Business Analytics with Excel",
        slug: "business-analytics-with-excel",
        description: "Analyze data using Excel: formulas, pivot tables, dashboards, and actionable reporting techniques.",
        price: 29.0,
        category: "Business",
        difficulty: Difficulty::Intermediate,
        thumbnail_url: "https://images.unsplash.com/photo-1454165205744-3b78555e5572?auto=format&fit=crop&w=1200&q=80",
        lessons: &[
            SeedLesson {
                title: "Formulas and Data Cleaning",
                content_html: "<p>Clean datasets and use formulas effectively.</p>",
                order: 1,
            },
            SeedLesson {
                title: "Pivot Tables and Dashboards",
                content_html: "<p>Create pivot tables and build a dashboard.</p>",
                order: 2,
            },
        ],
    },
    SeedCourse {
        id: "seed-nodejs-advanced",
        title: "Advanced Node.js: APIs at Scale",
        slug: "advanced-nodejs-apis-at-scale",
        description: "Build scalable Node.js APIs with Express, authentication, validation, and production best practices.",
        price: 59.0,
        category: "Development",
        difficulty: Difficulty::Advanced,
        thumbnail_url: "https://images.unsplash.com/photo-1526374965328-7f61d4dc18c5?auto=format&fit=crop&w=1200&q=80",
        lessons: &[
            SeedLesson {
                title: "API Architecture and Middleware",
                content_html: "<p>Organize routes, middleware, and error handling.</p>",
                order: 1,
            },
            SeedLesson {
                title: "Auth, Security, and Deployment",
                content_html: "<p>JWT, cookies, CORS, rate limiting, and deployment.</p>",
                order: 2,
            },
        ],
    },
];

/// Course representation served in degraded mode: catalog fields with lesson
/// bodies stripped to titles and order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCourse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub difficulty: Difficulty,
    pub thumbnail_url: String,
    pub lessons: Vec<LessonOutline>,
}

impl From<&SeedCourse> for CatalogCourse {
    fn from(seed: &SeedCourse) -> Self {
        CatalogCourse {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            slug: seed.slug.to_string(),
            description: seed.description.to_string(),
            price: seed.price,
            category: seed.category.to_string(),
            difficulty: seed.difficulty,
            thumbnail_url: seed.thumbnail_url.to_string(),
            lessons: seed
                .lessons
                .iter()
                .map(|lesson| LessonOutline {
                    title: lesson.title.to_string(),
                    order_index: lesson.order,
                })
                .collect(),
        }
    }
}

fn matches_filters(course: &SeedCourse, filters: &CourseFilters) -> bool {
    if let Some(category) = &filters.category {
        if course.category != category {
            return false;
        }
    }
    if let Some(difficulty) = &filters.difficulty {
        if course.difficulty.as_str() != difficulty {
            return false;
        }
    }
    if let Some(search) = &filters.search {
        let needle = search.trim().to_lowercase();
        if !needle.is_empty() {
            let matched = course.title.to_lowercase().contains(&needle)
                || course.description.to_lowercase().contains(&needle)
                || course.category.to_lowercase().contains(&needle);
            if !matched {
                return false;
            }
        }
    }
    true
}

/// Filters the built-in dataset the same way the live list endpoint does:
/// exact category and difficulty, case-insensitive substring search across
/// title, description, and category.
pub fn browse(filters: &CourseFilters) -> Vec<CatalogCourse> {
    BUILTIN_COURSES
        .iter()
        .filter(|course| matches_filters(course, filters))
        .map(CatalogCourse::from)
        .collect()
}

/// Looks up a built-in course by slug, stripped for degraded-mode serving.
pub fn find_by_slug(slug: &str) -> Option<CatalogCourse> {
    BUILTIN_COURSES
        .iter()
        .find(|course| course.slug == slug)
        .map(CatalogCourse::from)
}

/// Seeds the courses table from the built-in dataset when it is empty, so a
/// fresh deployment serves the same catalog online and degraded.
pub async fn seed_builtin_courses(pool: &SqlitePool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(pool)
        .await
        .context("Failed to count courses before seeding")?;

    if count > 0 {
        return Ok(());
    }

    let now = Utc::now();
    for seed in BUILTIN_COURSES {
        sqlx::query(
            r#"
            INSERT INTO courses (id, title, slug, description, price, category, difficulty, thumbnail_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(seed.id)
        .bind(seed.title)
        .bind(seed.slug)
        .bind(seed.description)
        .bind(seed.price)
        .bind(seed.category)
        .bind(seed.difficulty)
        .bind(seed.thumbnail_url)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to seed course")?;

        for lesson in seed.lessons {
            sqlx::query(
                r#"
                INSERT INTO lessons (id, course_id, title, content_html, video_url, order_index)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::now_v7().to_string())
            .bind(seed.id)
            .bind(lesson.title)
            .bind(lesson.content_html)
            .bind(None::<String>)
            .bind(lesson.order)
            .execute(pool)
            .await
            .context("Failed to seed lesson")?;
        }
    }

    tracing::info!("Seeded {} built-in courses", BUILTIN_COURSES.len());
    Ok(())
}
