use serde::{Deserialize, Serialize};

/// The agent currently signed in to the dashboard.
///
/// Returned by `GET /api/auth/me` and cached in localStorage as an offline
/// fallback. Authorization itself is enforced server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_manager: bool,
}

impl AgentProfile {
    /// Name shown in the header: full name when present, login otherwise.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}
