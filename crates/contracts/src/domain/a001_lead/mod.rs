use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compact lead row as served by `GET /api/leads`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One page of the lead register, newest first, plus the full count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadsPage {
    pub total: u32,
    #[serde(default)]
    pub items: Vec<LeadSummary>,
}

impl LeadsPage {
    /// The most recently created lead on this page, if any.
    pub fn newest(&self) -> Option<&LeadSummary> {
        self.items.first()
    }
}
