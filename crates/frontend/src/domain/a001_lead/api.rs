use contracts::domain::a001_lead::LeadsPage;
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Fetch the newest slice of the lead register plus the total count.
pub async fn fetch_recent_leads(limit: u32) -> Result<LeadsPage, String> {
    let url = api_url(&format!("/api/leads?limit={}&skip=0", limit));

    let response = Request::get(&url)
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
