//! Declarative tray menu. `build_menu` is a pure function from the current
//! data to a list of entry descriptors; the ksni layer renders them and
//! reports clicks back as `MenuAction` values. Keeping this layer free of
//! callbacks and shared state makes the whole menu testable.

use std::collections::HashMap;

use crate::config::{Settings, TransitionDisplay};
use crate::issues::{Issue, Transition};
use crate::pins::PinStore;
use crate::priority;
use crate::store::IssueStore;

/// Issue summaries are cut to this many characters in menu labels.
pub const SUMMARY_LIMIT: usize = 50;

const HOMEPAGE_LABEL: &str = "© Axitam SRL 1988-2026 — Apache 2.0";

/// What a menu click means. Sent from the tray thread to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the per-issue action dialog.
    ShowIssue(String),
    /// Open the issue in the browser.
    OpenIssue(String),
    /// Copy the issue's browse URL to the clipboard.
    CopyLink(String),
    Unpin(String),
    Transition {
        key: String,
        id: String,
        name: String,
    },
    Refresh,
    Search,
    ReloadConfig,
    Configuration,
    OpenBoard,
    OpenHomepage,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Item {
        label: String,
        enabled: bool,
        action: Option<MenuAction>,
    },
    Submenu {
        label: String,
        entries: Vec<MenuEntry>,
    },
    Separator,
}

impl MenuEntry {
    fn item(label: impl Into<String>, action: MenuAction) -> Self {
        MenuEntry::Item {
            label: label.into(),
            enabled: true,
            action: Some(action),
        }
    }

    fn header(label: impl Into<String>) -> Self {
        MenuEntry::Item {
            label: label.into(),
            enabled: false,
            action: None,
        }
    }
}

/// `🟠 PROJ-1 — Fix the widget [In Progress]`
pub fn issue_label(issue: &Issue) -> String {
    let glyph = priority::glyph(issue.priority.as_deref());
    let summary: String = issue.summary.chars().take(SUMMARY_LIMIT).collect();
    format!("{} {} — {} [{}]", glyph, issue.key, summary, issue.status)
}

pub fn build_menu(
    settings: &Settings,
    store: &IssueStore,
    pins: &PinStore,
    pinned_transitions: &HashMap<String, Vec<Transition>>,
) -> Vec<MenuEntry> {
    let mut entries = Vec::new();

    if !pins.is_empty() {
        entries.push(MenuEntry::header("📌 Current"));
        for key in pins.keys() {
            entries.push(pinned_entry(settings, store, key, pinned_transitions));
        }
        entries.push(MenuEntry::Separator);
    }

    for group in settings.groups.iter().filter(|group| group.active) {
        let issues = store.group(&group.name);
        let mut inner = Vec::with_capacity(issues.len().max(1));
        if issues.is_empty() {
            inner.push(MenuEntry::header("(empty)"));
        }
        for issue in issues {
            inner.push(MenuEntry::item(
                issue_label(issue),
                MenuAction::ShowIssue(issue.key.clone()),
            ));
        }
        entries.push(MenuEntry::Submenu {
            label: format!("{} ({})", group.name, issues.len()),
            entries: inner,
        });
    }

    entries.push(MenuEntry::item("Refresh", MenuAction::Refresh));
    entries.push(MenuEntry::item("Search…", MenuAction::Search));
    entries.push(MenuEntry::Separator);
    entries.push(MenuEntry::item("Reload config", MenuAction::ReloadConfig));
    entries.push(MenuEntry::item("Configuration…", MenuAction::Configuration));
    if settings
        .board_url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty())
    {
        entries.push(MenuEntry::item("Open board", MenuAction::OpenBoard));
    }
    entries.push(MenuEntry::Separator);
    entries.push(MenuEntry::item("Quit", MenuAction::Quit));
    entries.push(MenuEntry::Separator);
    entries.push(MenuEntry::item(HOMEPAGE_LABEL, MenuAction::OpenHomepage));

    entries
}

/// A pinned ticket. Keys that vanished from the fetched data stay visible
/// with just their key. In `submenu` mode the entry expands into direct
/// actions plus the transitions fetched for it.
fn pinned_entry(
    settings: &Settings,
    store: &IssueStore,
    key: &str,
    transitions: &HashMap<String, Vec<Transition>>,
) -> MenuEntry {
    let label = match store.find(key) {
        Some(issue) => issue_label(issue),
        None => key.to_string(),
    };

    if settings.transition_display() != TransitionDisplay::Submenu {
        return MenuEntry::item(label, MenuAction::ShowIssue(key.to_string()));
    }

    let mut inner = vec![
        MenuEntry::item("Open in browser", MenuAction::OpenIssue(key.to_string())),
        MenuEntry::item("Copy link", MenuAction::CopyLink(key.to_string())),
        MenuEntry::item("Unpin", MenuAction::Unpin(key.to_string())),
    ];
    if let Some(list) = transitions.get(key).filter(|list| !list.is_empty()) {
        let moves = list
            .iter()
            .map(|transition| {
                MenuEntry::item(
                    transition.name.clone(),
                    MenuAction::Transition {
                        key: key.to_string(),
                        id: transition.id.clone(),
                        name: transition.name.clone(),
                    },
                )
            })
            .collect();
        inner.push(MenuEntry::Submenu {
            label: "Move to".to_string(),
            entries: moves,
        });
    }

    MenuEntry::Submenu {
        label,
        entries: inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Group;
    use crate::pins::PinStore;
    use tempfile::TempDir;

    fn issue(key: &str, summary: &str, status: &str, priority: Option<&str>) -> Issue {
        Issue {
            key: key.to_string(),
            summary: summary.to_string(),
            status: status.to_string(),
            priority: priority.map(str::to_string),
        }
    }

    fn settings_with_group(name: &str) -> Settings {
        Settings {
            jira_url: "https://jira.example.com".to_string(),
            groups: vec![Group {
                name: name.to_string(),
                jql: "assignee = currentUser()".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn labels(entries: &[MenuEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item { label, .. } => label.clone(),
                MenuEntry::Submenu { label, .. } => label.clone(),
                MenuEntry::Separator => "---".to_string(),
            })
            .collect()
    }

    fn find_submenu<'a>(entries: &'a [MenuEntry], label: &str) -> &'a [MenuEntry] {
        entries
            .iter()
            .find_map(|entry| match entry {
                MenuEntry::Submenu {
                    label: l,
                    entries: inner,
                } if l == label => Some(inner.as_slice()),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no submenu labelled {label:?}"))
    }

    #[test]
    fn test_issue_label_format_and_truncation() {
        let long_summary = "x".repeat(80);
        let label = issue_label(&issue("PROJ-1", &long_summary, "Open", Some("High")));

        assert!(label.starts_with("🟠 PROJ-1 — "));
        assert!(label.ends_with(" [Open]"));
        let rendered_summary = label
            .trim_start_matches("🟠 PROJ-1 — ")
            .trim_end_matches(" [Open]");
        assert_eq!(rendered_summary.chars().count(), SUMMARY_LIMIT);
    }

    #[test]
    fn test_unknown_priority_gets_neutral_glyph() {
        let label = issue_label(&issue("PROJ-1", "s", "Open", None));
        assert!(label.starts_with("⚪ "));
    }

    #[test]
    fn test_empty_group_renders_placeholder() {
        let settings = settings_with_group("Mine");
        let store = IssueStore::new();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let pins = PinStore::load(&dir.path().join("pinned.yaml"));

        let entries = build_menu(&settings, &store, &pins, &HashMap::new());

        let inner = find_submenu(&entries, "Mine (0)");
        assert_eq!(inner.len(), 1);
        assert!(matches!(
            &inner[0],
            MenuEntry::Item { label, enabled: false, action: None } if label == "(empty)"
        ));
    }

    #[test]
    fn test_issue_entries_open_the_action_dialog() {
        let settings = settings_with_group("Mine");
        let mut store = IssueStore::new();
        store.record("Mine", vec![issue("PROJ-1", "Fix it", "Open", None)]);
        let dir = TempDir::new().expect("Failed to create temp dir");
        let pins = PinStore::load(&dir.path().join("pinned.yaml"));

        let entries = build_menu(&settings, &store, &pins, &HashMap::new());

        let inner = find_submenu(&entries, "Mine (1)");
        assert!(matches!(
            &inner[0],
            MenuEntry::Item { action: Some(MenuAction::ShowIssue(key)), .. } if key == "PROJ-1"
        ));
    }

    #[test]
    fn test_inactive_groups_are_hidden() {
        let mut settings = settings_with_group("Mine");
        settings.groups[0].active = false;
        let store = IssueStore::new();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let pins = PinStore::load(&dir.path().join("pinned.yaml"));

        let entries = build_menu(&settings, &store, &pins, &HashMap::new());

        assert!(
            !labels(&entries).iter().any(|label| label.contains("Mine")),
            "inactive group leaked into the menu: {entries:?}"
        );
    }

    #[test]
    fn test_stale_pin_renders_bare_key() {
        let settings = settings_with_group("Mine");
        let store = IssueStore::new();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut pins = PinStore::load(&dir.path().join("pinned.yaml"));
        pins.pin("GONE-7").expect("pin failed");

        let entries = build_menu(&settings, &store, &pins, &HashMap::new());

        assert!(matches!(
            &entries[1],
            MenuEntry::Item { label, action: Some(MenuAction::ShowIssue(_)), .. } if label == "GONE-7"
        ));
    }

    #[test]
    fn test_pinned_section_lists_most_recent_first() {
        let settings = settings_with_group("Mine");
        let mut store = IssueStore::new();
        store.record(
            "Mine",
            vec![
                issue("PROJ-1", "One", "Open", None),
                issue("PROJ-2", "Two", "Open", None),
            ],
        );
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut pins = PinStore::load(&dir.path().join("pinned.yaml"));
        pins.pin("PROJ-1").expect("pin failed");
        pins.pin("PROJ-2").expect("pin failed");

        let entries = build_menu(&settings, &store, &pins, &HashMap::new());

        assert!(matches!(&entries[0], MenuEntry::Item { label, enabled: false, .. } if label == "📌 Current"));
        let first = labels(&entries)[1].clone();
        let second = labels(&entries)[2].clone();
        assert!(first.contains("PROJ-2"), "most recent pin first: {first}");
        assert!(second.contains("PROJ-1"));
        assert!(matches!(&entries[3], MenuEntry::Separator));
    }

    #[test]
    fn test_submenu_mode_expands_pins_with_transitions() {
        let mut settings = settings_with_group("Mine");
        settings.transition_display = "submenu".to_string();
        let mut store = IssueStore::new();
        store.record("Mine", vec![issue("PROJ-1", "Fix it", "Open", Some("High"))]);
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut pins = PinStore::load(&dir.path().join("pinned.yaml"));
        pins.pin("PROJ-1").expect("pin failed");

        let mut transitions = HashMap::new();
        transitions.insert(
            "PROJ-1".to_string(),
            vec![Transition {
                id: "11".to_string(),
                name: "Start work".to_string(),
            }],
        );

        let entries = build_menu(&settings, &store, &pins, &transitions);

        let pinned = find_submenu(&entries, &issue_label(&issue("PROJ-1", "Fix it", "Open", Some("High"))));
        assert_eq!(pinned.len(), 4, "open, copy, unpin, move-to: {pinned:?}");
        let moves = find_submenu(pinned, "Move to");
        assert!(matches!(
            &moves[0],
            MenuEntry::Item { action: Some(MenuAction::Transition { key, id, .. }), .. }
                if key == "PROJ-1" && id == "11"
        ));
    }

    #[test]
    fn test_submenu_mode_without_transitions_has_no_move_to() {
        let mut settings = settings_with_group("Mine");
        settings.transition_display = "submenu".to_string();
        let store = IssueStore::new();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut pins = PinStore::load(&dir.path().join("pinned.yaml"));
        pins.pin("PROJ-1").expect("pin failed");

        let entries = build_menu(&settings, &store, &pins, &HashMap::new());

        let pinned = find_submenu(&entries, "PROJ-1");
        assert_eq!(pinned.len(), 3, "no Move to submenu expected: {pinned:?}");
    }

    #[test]
    fn test_board_entry_only_when_configured() {
        let mut settings = settings_with_group("Mine");
        let store = IssueStore::new();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let pins = PinStore::load(&dir.path().join("pinned.yaml"));

        let entries = build_menu(&settings, &store, &pins, &HashMap::new());
        assert!(!labels(&entries).contains(&"Open board".to_string()));

        settings.board_url = Some("https://jira.example.com/board/1".to_string());
        let entries = build_menu(&settings, &store, &pins, &HashMap::new());
        assert!(labels(&entries).contains(&"Open board".to_string()));
    }

    #[test]
    fn test_static_tail_order() {
        let settings = settings_with_group("Mine");
        let store = IssueStore::new();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let pins = PinStore::load(&dir.path().join("pinned.yaml"));

        let entries = build_menu(&settings, &store, &pins, &HashMap::new());
        let tail: Vec<String> = labels(&entries).into_iter().skip(1).collect();

        assert_eq!(
            tail,
            vec![
                "Refresh",
                "Search…",
                "---",
                "Reload config",
                "Configuration…",
                "---",
                "Quit",
                "---",
                HOMEPAGE_LABEL,
            ]
        );
    }
}
