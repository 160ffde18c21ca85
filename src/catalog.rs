use std::collections::HashSet;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{ClassSession, Occurrence};

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.toml");

// ─── Error types ────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Session #{index} has an empty {field}")]
    Empty { index: usize, field: &'static str },
    #[error("Duplicate session key '{0}'")]
    DuplicateKey(String),
    #[error("Session '{key}': weekday {weekday} is outside 0-6")]
    Weekday { key: String, weekday: u8 },
    #[error("Session '{key}': time '{time}' is not a 24-hour HH:MM")]
    Time { key: String, time: String },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    sessions: Vec<ClassSession>,
}

// ─── Catalog ────────────────────────────────────────────────────────────────

/// Ordered, read-only list of class sessions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sessions: Vec<ClassSession>,
}

impl Catalog {
    pub fn new(sessions: Vec<ClassSession>) -> Result<Self, CatalogError> {
        validate(&sessions)?;
        Ok(Self { sessions })
    }

    /// The studio's own schedule, embedded at compile time.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(contents)?;
        Self::new(file.sessions)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(contents)?;
        Self::new(file.sessions)
    }

    /// Load a catalog file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    pub fn sessions(&self) -> &[ClassSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Every occurrence on `date`, ordered by start time. Sessions sharing a
    /// time keep catalog order.
    pub fn events_for_date(&self, date: NaiveDate) -> Vec<Occurrence> {
        let weekday = date.weekday().num_days_from_sunday();
        let mut out: Vec<Occurrence> = self
            .sessions
            .iter()
            .filter(|s| date >= s.start_date)
            .flat_map(|s| {
                s.weekly
                    .iter()
                    .filter(move |slot| u32::from(slot.weekday) == weekday)
                    .map(move |slot| Occurrence::new(s, slot))
            })
            .collect();
        out.sort_by(|a, b| a.time.cmp(&b.time));
        out
    }

    /// (key, name, start date) for the legend, in catalog order.
    pub fn start_dates(&self) -> Vec<(&str, &str, NaiveDate)> {
        self.sessions
            .iter()
            .map(|s| (s.key.as_str(), s.name.as_str(), s.start_date))
            .collect()
    }
}

// ─── Validation ─────────────────────────────────────────────────────────────

fn validate(sessions: &[ClassSession]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for (index, session) in sessions.iter().enumerate() {
        if session.key.trim().is_empty() {
            return Err(CatalogError::Empty { index, field: "key" });
        }
        if session.name.trim().is_empty() {
            return Err(CatalogError::Empty { index, field: "name" });
        }
        if !seen.insert(session.key.as_str()) {
            return Err(CatalogError::DuplicateKey(session.key.clone()));
        }
        for slot in &session.weekly {
            if slot.weekday > 6 {
                return Err(CatalogError::Weekday {
                    key: session.key.clone(),
                    weekday: slot.weekday,
                });
            }
            if !is_valid_time(&slot.time) {
                return Err(CatalogError::Time {
                    key: session.key.clone(),
                    time: slot.time.clone(),
                });
            }
        }
    }
    Ok(())
}

fn is_valid_time(time: &str) -> bool {
    let b = time.as_bytes();
    if b.len() != 5 || b[2] != b':' {
        return false;
    }
    if ![0, 1, 3, 4].iter().all(|&i| b[i].is_ascii_digit()) {
        return false;
    }
    let hours = (b[0] - b'0') * 10 + (b[1] - b'0');
    let minutes = (b[3] - b'0') * 10 + (b[4] - b'0');
    hours < 24 && minutes < 60
}
