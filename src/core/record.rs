//! Log record structure

use super::level::Level;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One accepted log call, consumed once by the delivery worker
#[derive(Debug, Clone)]
pub struct Record {
    pub name: Arc<str>,
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl Record {
    pub fn new(name: Arc<str>, level: Level, message: String) -> Self {
        Self {
            name,
            level,
            timestamp: Utc::now(),
            message,
        }
    }
}
