//! Target discovery over the DevTools HTTP endpoint.

use tracing::debug;

use tilebot_protocols::ControlError;

use super::protocol::PageInfo;

/// List the debuggable pages at `endpoint` (e.g. `http://localhost:9222`).
pub async fn list_pages(endpoint: &str) -> Result<Vec<PageInfo>, ControlError> {
    let url = format!("{}/json/list", endpoint.trim_end_matches('/'));
    debug!("Fetching page list from {}", url);

    let response = reqwest::get(&url)
        .await
        .map_err(|e| ControlError::Http(format!("{}: {}", url, e)))?
        .error_for_status()
        .map_err(|e| ControlError::Http(format!("{}: {}", url, e)))?;

    let pages: Vec<PageInfo> = response
        .json()
        .await
        .map_err(|e| ControlError::Http(format!("{}: {}", url, e)))?;

    debug!("Found {} page(s)", pages.len());
    Ok(pages)
}
