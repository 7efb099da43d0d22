use contracts::system::session::AgentProfile;
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Fetch the agent behind the current browser session.
pub async fn get_current_agent() -> Result<AgentProfile, String> {
    let response = Request::get(&api_url("/api/auth/me"))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
