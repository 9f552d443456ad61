//! SQLite-backed store via libsql. Implements the catalog, exchange-log and feedback ports.
//!
//! One database file (`campus.db`) in the data directory. Catalog tables are read-only at
//! runtime and filled once by [`SqliteRepo::seed_if_empty`]. `exchanges` and `feedback` only
//! ever receive INSERTs. Instants are stored as Unix milliseconds so they sort numerically.

use crate::domain::{
    Admission, CampusLocation, Catalog, Course, DomainError, Event, Exchange, Faq, FaqCategory,
    Feedback, QuickAction,
};
use crate::ports::{
    CatalogPort, CourseFilter, ExchangeLogPort, FaqFilter, FeedbackPort, LocationFilter,
};
use chrono::{DateTime, Utc};
use libsql::params::{IntoParams, Params};
use libsql::{params, Database, Row, Value};
use std::path::{Path, PathBuf};
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS admissions (
    id INTEGER PRIMARY KEY,
    program_name TEXT NOT NULL,
    application_deadline INTEGER NOT NULL,
    requirements TEXT NOT NULL,
    contact_email TEXT NOT NULL,
    application_link TEXT NOT NULL
)"#,
    r#"
CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    credits INTEGER NOT NULL,
    department TEXT,
    prerequisites TEXT
)"#,
    r#"
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    date INTEGER NOT NULL,
    location TEXT NOT NULL,
    description TEXT NOT NULL,
    registration_link TEXT NOT NULL
)"#,
    "CREATE INDEX IF NOT EXISTS idx_events_date ON events (date, id)",
    r#"
CREATE TABLE IF NOT EXISTS faqs (
    id INTEGER PRIMARY KEY,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    category TEXT NOT NULL,
    keywords TEXT NOT NULL DEFAULT ''
)"#,
    r#"
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY,
    building_name TEXT NOT NULL,
    room_number TEXT NOT NULL,
    department TEXT,
    description TEXT,
    map_image_url TEXT
)"#,
    r#"
CREATE TABLE IF NOT EXISTS quick_actions (
    action_id TEXT PRIMARY KEY,
    response_text TEXT NOT NULL
)"#,
    r#"
CREATE TABLE IF NOT EXISTS exchanges (
    id TEXT PRIMARY KEY,
    user_id TEXT,
    message_text TEXT NOT NULL,
    response_text TEXT NOT NULL,
    intent TEXT NOT NULL,
    timestamp_ms INTEGER NOT NULL
)"#,
    r#"
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    message TEXT NOT NULL,
    rating INTEGER NOT NULL,
    timestamp_ms INTEGER NOT NULL
)"#,
];

const ADMISSION_COLUMNS: &str =
    "id, program_name, application_deadline, requirements, contact_email, application_link";
const COURSE_COLUMNS: &str = "id, code, title, description, credits, department, prerequisites";
const EVENT_COLUMNS: &str = "id, title, date, location, description, registration_link";
const FAQ_COLUMNS: &str = "id, question, answer, category, keywords";
const LOCATION_COLUMNS: &str =
    "id, building_name, room_number, department, description, map_image_url";

fn catalog_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Catalog(e.to_string())
}

fn instant(ms: i64) -> Result<DateTime<Utc>, DomainError> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .ok_or_else(|| DomainError::Catalog(format!("timestamp out of range: {}", ms)))
}

fn admission_from_row(row: &Row) -> Result<Admission, DomainError> {
    Ok(Admission {
        id: row.get(0).map_err(catalog_err)?,
        program_name: row.get(1).map_err(catalog_err)?,
        application_deadline: instant(row.get(2).map_err(catalog_err)?)?,
        requirements: row.get(3).map_err(catalog_err)?,
        contact_email: row.get(4).map_err(catalog_err)?,
        application_link: row.get(5).map_err(catalog_err)?,
    })
}

fn course_from_row(row: &Row) -> Result<Course, DomainError> {
    Ok(Course {
        id: row.get(0).map_err(catalog_err)?,
        code: row.get(1).map_err(catalog_err)?,
        title: row.get(2).map_err(catalog_err)?,
        description: row.get(3).map_err(catalog_err)?,
        credits: row.get(4).map_err(catalog_err)?,
        department: row.get::<Option<String>>(5).map_err(catalog_err)?,
        prerequisites: row.get::<Option<String>>(6).map_err(catalog_err)?,
    })
}

fn event_from_row(row: &Row) -> Result<Event, DomainError> {
    Ok(Event {
        id: row.get(0).map_err(catalog_err)?,
        title: row.get(1).map_err(catalog_err)?,
        date: instant(row.get(2).map_err(catalog_err)?)?,
        location: row.get(3).map_err(catalog_err)?,
        description: row.get(4).map_err(catalog_err)?,
        registration_link: row.get(5).map_err(catalog_err)?,
    })
}

fn faq_from_row(row: &Row) -> Result<Faq, DomainError> {
    let category: String = row.get(3).map_err(catalog_err)?;
    Ok(Faq {
        id: row.get(0).map_err(catalog_err)?,
        question: row.get(1).map_err(catalog_err)?,
        answer: row.get(2).map_err(catalog_err)?,
        category: FaqCategory::from_name(&category),
        keywords: row.get(4).map_err(catalog_err)?,
    })
}

fn location_from_row(row: &Row) -> Result<CampusLocation, DomainError> {
    Ok(CampusLocation {
        id: row.get(0).map_err(catalog_err)?,
        building_name: row.get(1).map_err(catalog_err)?,
        room_number: row.get(2).map_err(catalog_err)?,
        department: row.get::<Option<String>>(3).map_err(catalog_err)?,
        description: row.get::<Option<String>>(4).map_err(catalog_err)?,
        map_image_url: row.get::<Option<String>>(5).map_err(catalog_err)?,
    })
}

/// SQLite store. Safe to share via Arc; each operation opens its own connection.
pub struct SqliteRepo {
    db: Database,
    db_path: PathBuf,
}

impl SqliteRepo {
    /// Connect to (or create) `campus.db` under `base_dir` and ensure the schema exists.
    ///
    /// Sets WAL mode and synchronous=NORMAL so readers are not blocked by log inserts.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(catalog_err)?;
        let db_path = base.join("campus.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(catalog_err)?;
        let conn = db.connect().map_err(catalog_err)?;

        // PRAGMA returns a row; consume it (execute fails when rows are returned).
        for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"] {
            let mut rows = conn
                .query(pragma, ())
                .await
                .map_err(|e| DomainError::Catalog(format!("{} failed: {}", pragma, e)))?;
            while rows.next().await.map_err(catalog_err)?.is_some() {}
        }

        for ddl in SCHEMA {
            conn.execute(ddl, ()).await.map_err(catalog_err)?;
        }

        info!(path = %db_path.display(), "SQLite connected with WAL mode");

        Ok(Self { db, db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// True when no catalog table holds a row.
    pub async fn is_catalog_empty(&self) -> Result<bool, DomainError> {
        let conn = self.db.connect().map_err(catalog_err)?;
        let mut rows = conn
            .query(
                r#"
                SELECT (SELECT COUNT(*) FROM admissions) + (SELECT COUNT(*) FROM courses)
                     + (SELECT COUNT(*) FROM events) + (SELECT COUNT(*) FROM faqs)
                     + (SELECT COUNT(*) FROM locations) + (SELECT COUNT(*) FROM quick_actions)
                "#,
                (),
            )
            .await
            .map_err(catalog_err)?;
        let total: i64 = match rows.next().await.map_err(catalog_err)? {
            Some(row) => row.get(0).map_err(catalog_err)?,
            None => 0,
        };
        Ok(total == 0)
    }

    /// Insert `catalog` in one transaction unless the store already holds catalog data.
    /// Returns whether anything was written.
    pub async fn seed_if_empty(&self, catalog: &Catalog) -> Result<bool, DomainError> {
        if catalog.is_empty() {
            info!("seed catalog holds no records, nothing to write");
            return Ok(false);
        }
        if !self.is_catalog_empty().await? {
            info!("catalog already present, skipping seed");
            return Ok(false);
        }
        let seed_err = |e: libsql::Error| DomainError::Seed(e.to_string());
        let conn = self.db.connect().map_err(seed_err)?;
        let tx = conn.transaction().await.map_err(seed_err)?;
        for a in &catalog.admissions {
            tx.execute(
                "INSERT INTO admissions (id, program_name, application_deadline, requirements, contact_email, application_link) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    a.id,
                    a.program_name.as_str(),
                    a.application_deadline.timestamp_millis(),
                    a.requirements.as_str(),
                    a.contact_email.as_str(),
                    a.application_link.as_str()
                ],
            )
            .await
            .map_err(seed_err)?;
        }
        for c in &catalog.courses {
            tx.execute(
                "INSERT INTO courses (id, code, title, description, credits, department, prerequisites) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    c.id,
                    c.code.as_str(),
                    c.title.as_str(),
                    c.description.as_str(),
                    c.credits,
                    c.department.clone(),
                    c.prerequisites.clone()
                ],
            )
            .await
            .map_err(seed_err)?;
        }
        for e in &catalog.events {
            tx.execute(
                "INSERT INTO events (id, title, date, location, description, registration_link) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    e.id,
                    e.title.as_str(),
                    e.date.timestamp_millis(),
                    e.location.as_str(),
                    e.description.as_str(),
                    e.registration_link.as_str()
                ],
            )
            .await
            .map_err(seed_err)?;
        }
        for f in &catalog.faqs {
            tx.execute(
                "INSERT INTO faqs (id, question, answer, category, keywords) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    f.id,
                    f.question.as_str(),
                    f.answer.as_str(),
                    f.category.as_str(),
                    f.keywords.as_str()
                ],
            )
            .await
            .map_err(seed_err)?;
        }
        for l in &catalog.locations {
            tx.execute(
                "INSERT INTO locations (id, building_name, room_number, department, description, map_image_url) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    l.id,
                    l.building_name.as_str(),
                    l.room_number.as_str(),
                    l.department.clone(),
                    l.description.clone(),
                    l.map_image_url.clone()
                ],
            )
            .await
            .map_err(seed_err)?;
        }
        for q in &catalog.quick_actions {
            tx.execute(
                "INSERT INTO quick_actions (action_id, response_text) VALUES (?1, ?2)",
                params![q.action_id.as_str(), q.response_text.as_str()],
            )
            .await
            .map_err(seed_err)?;
        }
        tx.commit().await.map_err(seed_err)?;
        info!(
            admissions = catalog.admissions.len(),
            courses = catalog.courses.len(),
            events = catalog.events.len(),
            faqs = catalog.faqs.len(),
            locations = catalog.locations.len(),
            quick_actions = catalog.quick_actions.len(),
            "catalog seeded"
        );
        Ok(true)
    }

    /// Run `sql` and map the first row, if any.
    async fn query_first<T>(
        &self,
        sql: &str,
        params: impl IntoParams,
        map: fn(&Row) -> Result<T, DomainError>,
    ) -> Result<Option<T>, DomainError> {
        let conn = self.db.connect().map_err(catalog_err)?;
        let mut rows = conn.query(sql, params).await.map_err(catalog_err)?;
        match rows.next().await.map_err(catalog_err)? {
            Some(row) => map(&row).map(Some),
            None => Ok(None),
        }
    }

    /// Scan `sql` in order and return the first mapped row accepted by `accept`.
    ///
    /// Text containment runs here rather than in SQL: SQLite's `lower()` folds ASCII only,
    /// and the filters must agree with [`MemoryStore`](super::MemoryStore) on any input.
    async fn first_matching<T>(
        &self,
        sql: &str,
        params: impl IntoParams,
        map: fn(&Row) -> Result<T, DomainError>,
        accept: impl Fn(&T) -> bool,
    ) -> Result<Option<T>, DomainError> {
        let conn = self.db.connect().map_err(catalog_err)?;
        let mut rows = conn.query(sql, params).await.map_err(catalog_err)?;
        while let Some(row) = rows.next().await.map_err(catalog_err)? {
            let record = map(&row)?;
            if accept(&record) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

#[async_trait::async_trait]
impl CatalogPort for SqliteRepo {
    async fn first_admission(&self) -> Result<Option<Admission>, DomainError> {
        let sql = format!("SELECT {ADMISSION_COLUMNS} FROM admissions ORDER BY id LIMIT 1");
        self.query_first(&sql, (), admission_from_row).await
    }

    async fn earliest_admission(&self) -> Result<Option<Admission>, DomainError> {
        let sql = format!(
            "SELECT {ADMISSION_COLUMNS} FROM admissions ORDER BY application_deadline, id LIMIT 1"
        );
        self.query_first(&sql, (), admission_from_row).await
    }

    async fn first_course(&self, filter: &CourseFilter) -> Result<Option<Course>, DomainError> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY id");
        self.first_matching(&sql, (), course_from_row, |c| filter.matches(c))
            .await
    }

    async fn next_event(&self, from: DateTime<Utc>) -> Result<Option<Event>, DomainError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE date >= ?1 ORDER BY date, id LIMIT 1"
        );
        self.query_first(&sql, params![from.timestamp_millis()], event_from_row)
            .await
    }

    async fn first_faq(&self, filter: &FaqFilter) -> Result<Option<Faq>, DomainError> {
        if filter.categories.is_empty() {
            return Ok(None);
        }
        let values: Vec<Value> = filter
            .categories
            .iter()
            .map(|c| Value::Text(c.as_str().to_string()))
            .collect();
        let placeholders = (1..=values.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {FAQ_COLUMNS} FROM faqs WHERE category IN ({placeholders}) ORDER BY id"
        );
        self.first_matching(&sql, Params::Positional(values), faq_from_row, |f| {
            filter.matches(f)
        })
        .await
    }

    async fn first_location(
        &self,
        filter: &LocationFilter,
    ) -> Result<Option<CampusLocation>, DomainError> {
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations ORDER BY id");
        self.first_matching(&sql, (), location_from_row, |l| filter.matches(l))
            .await
    }

    async fn quick_actions(&self) -> Result<Vec<QuickAction>, DomainError> {
        let conn = self.db.connect().map_err(catalog_err)?;
        let mut rows = conn
            .query(
                "SELECT action_id, response_text FROM quick_actions ORDER BY action_id",
                (),
            )
            .await
            .map_err(catalog_err)?;
        let mut actions = Vec::new();
        while let Some(row) = rows.next().await.map_err(catalog_err)? {
            actions.push(QuickAction {
                action_id: row.get(0).map_err(catalog_err)?,
                response_text: row.get(1).map_err(catalog_err)?,
            });
        }
        Ok(actions)
    }
}

#[async_trait::async_trait]
impl ExchangeLogPort for SqliteRepo {
    async fn record(&self, exchange: &Exchange) -> Result<(), DomainError> {
        let log_err = |e: libsql::Error| DomainError::ExchangeLog(e.to_string());
        let conn = self.db.connect().map_err(log_err)?;
        conn.execute(
            r#"
            INSERT INTO exchanges (id, user_id, message_text, response_text, intent, timestamp_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                exchange.id.to_string(),
                exchange.user_id.clone(),
                exchange.message_text.as_str(),
                exchange.response_text.as_str(),
                exchange.intent.label(),
                exchange.timestamp.timestamp_millis()
            ],
        )
        .await
        .map_err(log_err)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FeedbackPort for SqliteRepo {
    async fn record_feedback(&self, feedback: &Feedback) -> Result<(), DomainError> {
        let fb_err = |e: libsql::Error| DomainError::Feedback(e.to_string());
        let conn = self.db.connect().map_err(fb_err)?;
        conn.execute(
            "INSERT INTO feedback (name, message, rating, timestamp_ms) VALUES (?1, ?2, ?3, ?4)",
            params![
                feedback.name.clone(),
                feedback.message.as_str(),
                i64::from(feedback.rating),
                feedback.timestamp.timestamp_millis()
            ],
        )
        .await
        .map_err(fb_err)?;
        Ok(())
    }
}
