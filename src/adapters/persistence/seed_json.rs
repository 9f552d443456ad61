//! Catalog seed file. A JSON document with one array per record collection.
//!
//! Missing collections default to empty. Record ids must be unique per collection.

use crate::domain::{Catalog, DomainError};
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Read and validate a seed file.
pub async fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, DomainError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::Seed(format!("read {}: {}", path.display(), e)))?;
    let catalog = parse_catalog(&raw)?;
    info!(
        path = %path.display(),
        admissions = catalog.admissions.len(),
        courses = catalog.courses.len(),
        events = catalog.events.len(),
        faqs = catalog.faqs.len(),
        locations = catalog.locations.len(),
        "seed catalog loaded"
    );
    Ok(catalog)
}

/// Parse seed JSON and reject duplicate ids.
pub fn parse_catalog(raw: &str) -> Result<Catalog, DomainError> {
    let catalog: Catalog =
        serde_json::from_str(raw).map_err(|e| DomainError::Seed(format!("parse: {}", e)))?;

    check_unique("admissions", catalog.admissions.iter().map(|a| a.id))?;
    check_unique("courses", catalog.courses.iter().map(|c| c.id))?;
    check_unique("events", catalog.events.iter().map(|e| e.id))?;
    check_unique("faqs", catalog.faqs.iter().map(|f| f.id))?;
    check_unique("locations", catalog.locations.iter().map(|l| l.id))?;

    let mut action_ids = HashSet::new();
    for q in &catalog.quick_actions {
        if !action_ids.insert(q.action_id.as_str()) {
            return Err(DomainError::Seed(format!(
                "duplicate quick action {:?}",
                q.action_id
            )));
        }
    }
    Ok(catalog)
}

fn check_unique(collection: &str, ids: impl Iterator<Item = i64>) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DomainError::Seed(format!(
                "duplicate id {} in {}",
                id, collection
            )));
        }
    }
    Ok(())
}
