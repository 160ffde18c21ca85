use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Sessions ───────────────────────────────────────────────────────────────

/// A recurring class offering. Never occurs before `start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSession {
    pub key: String,
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub weekly: Vec<WeeklySlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySlot {
    /// 0 = Sunday ... 6 = Saturday.
    pub weekday: u8,
    /// Zero-padded 24-hour "HH:MM", so string order is chronological order.
    pub time: String,
    pub location: String,
}

// ─── Occurrences ────────────────────────────────────────────────────────────

/// One session on one concrete date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub key: String,
    pub name: String,
    pub time: String,
    pub location: String,
}

impl Occurrence {
    pub fn new(session: &ClassSession, slot: &WeeklySlot) -> Self {
        Self {
            key: session.key.clone(),
            name: session.name.clone(),
            time: slot.time.clone(),
            location: slot.location.clone(),
        }
    }
}
