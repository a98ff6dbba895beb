use log::error;
use notify_rust::Notification;

use crate::error::{Result, TrayError};
use crate::issues::Issue;

const APP_NAME: &str = "Jira Tray";

/// Show a simple notification with title and message
pub fn show_notification(title: &str, message: &str) -> Result<()> {
    Notification::new()
        .summary(title)
        .body(message)
        .appname(APP_NAME)
        .icon("jira-tray")
        .show()
        .map_err(|e| TrayError::Platform(format!("Failed to show notification: {e}")))?;

    Ok(())
}

/// Fire-and-forget variant. A missing or broken notification daemon must
/// never break a refresh cycle.
pub fn notify(title: &str, message: &str) {
    if let Err(err) = show_notification(title, message) {
        error!("{err}");
    }
}

/// Title and body announcing an issue that newly appeared in a group.
pub fn new_issue_notification(group: &str, issue: &Issue) -> (String, String) {
    let title = format!("New issue: {}", issue.key);
    let body = if issue.summary.is_empty() {
        format!("in {group}")
    } else {
        format!("{}\nin {group}", issue.summary)
    };
    (title, body)
}
