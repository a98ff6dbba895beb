pub mod models;

use crate::auth::Credentials;
use crate::error::{Result, TrayError};
use crate::issues::{Issue, Transition};
use log::debug;
use models::*;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Fields requested from the search endpoint; everything else is dead weight.
const SEARCH_FIELDS: &str = "summary,status,priority";

pub struct JiraApi {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl JiraApi {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(JiraApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One search request. Returns the issues in the tracker's order.
    pub async fn search(&self, jql: &str, max_results: u32) -> Result<Vec<Issue>> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        let max_results = max_results.to_string();

        debug!("Searching at: {url} (jql: {jql})");

        let request = self.client.get(&url).query(&[
            ("jql", jql),
            ("maxResults", max_results.as_str()),
            ("fields", SEARCH_FIELDS),
        ]);
        let response = self.credentials.apply(request).send().await?;

        match response.status() {
            StatusCode::OK => {
                let data: SearchResponse = response.json().await?;
                Ok(data.issues.into_iter().map(Issue::from).collect())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(TrayError::Auth(format!(
                "search rejected with status {}; check auth_mode and the token",
                response.status()
            ))),
            status => Err(api_error("Search", status, response).await),
        }
    }

    /// Workflow transitions currently available for an issue.
    pub async fn transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let url = format!("{}/rest/api/2/issue/{}/transitions", self.base_url, key);

        debug!("Fetching transitions at: {url}");

        let response = self.credentials.apply(self.client.get(&url)).send().await?;

        match response.status() {
            StatusCode::OK => {
                let data: TransitionsResponse = response.json().await?;
                Ok(data
                    .transitions
                    .into_iter()
                    .map(|bean| Transition {
                        id: bean.id,
                        name: bean.name,
                    })
                    .collect())
            }
            status => Err(api_error("Transition lookup", status, response).await),
        }
    }

    /// Apply a transition. Jira answers 204 on success.
    pub async fn transition(&self, key: &str, transition_id: &str) -> Result<()> {
        let url = format!("{}/rest/api/2/issue/{}/transitions", self.base_url, key);

        debug!("Posting transition {transition_id} for {key}");

        let request = self.client.post(&url).json(&TransitionRequest {
            transition: TransitionId {
                id: transition_id.to_string(),
            },
        });
        let response = self.credentials.apply(request).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(api_error("Transition", status, response).await)
        }
    }
}

async fn api_error(operation: &str, status: StatusCode, response: reqwest::Response) -> TrayError {
    let detail = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|body| body.error_messages.join("; "))
        .unwrap_or_default();

    TrayError::Api(format!("{operation} failed with status {status}: {detail}"))
}
