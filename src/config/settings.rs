use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// How workflow transitions are offered in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDisplay {
    /// "Move to…" lives inside the per-issue action dialog.
    Dialog,
    /// Pinned tickets become submenus carrying their transitions directly.
    Submenu,
}

impl TransitionDisplay {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("dialog") {
            Some(TransitionDisplay::Dialog)
        } else if value.eq_ignore_ascii_case("submenu") {
            Some(TransitionDisplay::Submenu)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub jql: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl Group {
    /// A group needs a name (the map key) and a query to be fetchable.
    pub fn is_fetchable(&self) -> bool {
        !self.name.trim().is_empty() && !self.jql.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub jira_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default = "default_transition_display")]
    pub transition_display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<String>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

fn default_true() -> bool {
    true
}

fn default_max_results() -> u32 {
    20
}

fn default_auth_mode() -> String {
    "bearer".to_string()
}

fn default_token_env() -> String {
    "JIRA_API_TOKEN".to_string()
}

fn default_poll_interval() -> u64 {
    300
}

fn default_transition_display() -> String {
    "dialog".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            jira_url: String::new(),
            email: None,
            auth_mode: default_auth_mode(),
            token_env: default_token_env(),
            poll_interval: default_poll_interval(),
            auto_refresh: true,
            notifications: true,
            transition_display: default_transition_display(),
            icon: None,
            board_url: None,
            env_file: None,
            groups: Vec::new(),
        }
    }
}

impl Default for Group {
    fn default() -> Self {
        Group {
            name: String::new(),
            jql: String::new(),
            active: true,
            max_results: default_max_results(),
            sort: None,
        }
    }
}

impl Settings {
    /// Load from a YAML file. Missing fields fall back to defaults; the
    /// result of `validate` tells the caller what was missing. Only an
    /// unreadable file or syntactically broken YAML is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Collect configuration problems as warnings, one per violation.
    /// None of these prevent the program from running.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.jira_url.trim().is_empty() {
            warnings.push("jira_url is not set".to_string());
        }
        if self.groups.is_empty() {
            warnings.push("no groups configured".to_string());
        }
        if self.poll_interval == 0 {
            warnings.push("poll_interval is 0, treating as 1 second".to_string());
        }
        if TransitionDisplay::parse(&self.transition_display).is_none() {
            warnings.push(format!(
                "unknown transition_display '{}', falling back to 'dialog'",
                self.transition_display
            ));
        }

        let mut seen = HashSet::new();
        for (index, group) in self.groups.iter().enumerate() {
            let label = if group.name.trim().is_empty() {
                format!("group #{}", index + 1)
            } else {
                format!("group '{}'", group.name)
            };
            if group.name.trim().is_empty() {
                warnings.push(format!("{label} has no name"));
            } else if !seen.insert(group.name.clone()) {
                warnings.push(format!(
                    "{label} duplicates an earlier group name; their results will collide"
                ));
            }
            if group.jql.trim().is_empty() {
                warnings.push(format!("{label} has no jql"));
            }
            if let Some(sort) = &group.sort {
                if crate::issues::SortKey::parse(sort).is_none() {
                    warnings.push(format!(
                        "{label} has unknown sort '{sort}', keeping tracker order"
                    ));
                }
            }
        }

        warnings
    }

    /// The parsed transition display mode, defaulting to the dialog flow
    /// when the configured string is unknown.
    pub fn transition_display(&self) -> TransitionDisplay {
        TransitionDisplay::parse(&self.transition_display).unwrap_or(TransitionDisplay::Dialog)
    }

    /// Browser URL for an issue key.
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.jira_url.trim_end_matches('/'), key)
    }

    /// Write the default config template, creating parent directories.
    /// Returns false without touching anything when the file already exists.
    pub fn write_default(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, DEFAULT_CONFIG)?;
        Ok(true)
    }
}

pub const DEFAULT_CONFIG: &str = r#"jira_url: "https://your-jira-instance.com"
email: "your-email@example.com"
poll_interval: 300
auto_refresh: true
notifications: true

# Auth mode: "basic" (email + token), "bearer" (token only), "pat" (Personal Access Token)
auth_mode: "bearer"
# Env var name containing the token
token_env: "JIRA_API_TOKEN"

# Custom icon (optional, path to a PNG file)
# icon: "~/.config/sysTrayJira/jira.png"

# Env file (bash-style with 'export' supported)
# env_file: "~/.env"

# Board shortcut shown in the menu (optional)
# board_url: "https://your-jira-instance.com/secure/RapidBoard.jspa?rapidView=1"

# Where workflow transitions are offered: "dialog" (per-issue action dialog)
# or "submenu" (pinned tickets get a "Move to" submenu)
transition_display: "dialog"

groups:
  - name: "📋 My Open Issues"
    jql: "assignee = currentUser() AND resolution = Unresolved ORDER BY priority DESC"
    active: true
    max_results: 20
    # sort: priority | status | key (omit to keep the tracker's order)
"#;
