use serde::{Deserialize, Serialize};

use crate::issues::Issue;

/// `GET /rest/api/2/search` response, reduced to what the menu needs.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<IssueBean>,
}

#[derive(Debug, Deserialize)]
pub struct IssueBean {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssueFields {
    pub summary: Option<String>,
    pub status: Option<NamedValue>,
    pub priority: Option<NamedValue>,
}

/// Jira wraps most enumerated values in an object; only the name matters here.
#[derive(Debug, Deserialize)]
pub struct NamedValue {
    pub name: String,
}

impl From<IssueBean> for Issue {
    fn from(bean: IssueBean) -> Self {
        Issue {
            key: bean.key,
            summary: bean.fields.summary.unwrap_or_default(),
            status: bean
                .fields
                .status
                .map(|status| status.name)
                .unwrap_or_default(),
            priority: bean.fields.priority.map(|priority| priority.name),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<TransitionBean>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionBean {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TransitionRequest {
    pub transition: TransitionId,
}

#[derive(Debug, Serialize)]
pub struct TransitionId {
    pub id: String,
}

/// Jira's standard error envelope.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, rename = "errorMessages")]
    pub error_messages: Vec<String>,
}
