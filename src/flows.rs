//! Dialog-driven flows: the per-issue action menu, ad-hoc search and the
//! configuration editor. Each runs on its own short-lived thread so a
//! blocking dialog never stalls the tray. Stateless effects (browser,
//! clipboard, transition POSTs) happen right here; anything touching owned
//! state goes back to the controller as a message.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use log::{error, warn};

use crate::api::JiraApi;
use crate::app::Msg;
use crate::clipboard;
use crate::config::{Group, Settings, TransitionDisplay};
use crate::dialogs::Prompt;
use crate::error::Result;
use crate::issues::Issue;
use crate::notifications;

/// Everything a flow thread needs, snapshotted when the flow starts. A
/// refresh or reload happening meanwhile does not affect a running flow;
/// whatever the flow applies at the end wins.
pub struct FlowContext {
    pub settings: Settings,
    pub pinned: Vec<String>,
    pub api: Arc<JiraApi>,
    pub prompt: Arc<dyn Prompt>,
    pub runtime: tokio::runtime::Handle,
    pub tx: Sender<Msg>,
}

/// A change collected by the configuration editor, applied and persisted by
/// the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsPatch {
    Edit {
        jira_url: Option<String>,
        email: Option<String>,
        auth_mode: Option<String>,
        token_env: Option<String>,
        poll_interval: Option<u64>,
        board_url: Option<String>,
    },
    AddGroup(Group),
    ToggleGroup(String),
}

const PIN_LABEL: &str = "📌 Pin as current";
const UNPIN_LABEL: &str = "Unpin";
const MOVE_LABEL: &str = "Move to…";

/// The per-issue action dialog reached by clicking an issue entry.
pub fn issue_dialog(ctx: &FlowContext, key: &str, label: &str) {
    let mut items = vec!["Open in browser".to_string(), "Copy link".to_string()];
    if ctx.pinned.iter().any(|pinned| pinned == key) {
        items.push(UNPIN_LABEL.to_string());
    } else {
        items.push(PIN_LABEL.to_string());
    }
    if ctx.settings.transition_display() == TransitionDisplay::Dialog {
        items.push(MOVE_LABEL.to_string());
    }

    let Some(choice) = prompt_or_bail(ctx.prompt.choose(key, label, &items)) else {
        return;
    };

    match choice.as_str() {
        "Open in browser" => open_issue(&ctx.settings, key),
        "Copy link" => copy_link(&ctx.settings, key),
        PIN_LABEL | UNPIN_LABEL => send(ctx, Msg::TogglePin(key.to_string())),
        MOVE_LABEL => transition_dialog(ctx, key),
        other => warn!("Unknown issue action '{other}'"),
    }
}

/// List the available transitions for an issue and post the chosen one.
/// Failures only ever surface as notifications.
pub fn transition_dialog(ctx: &FlowContext, key: &str) {
    let transitions = match ctx.runtime.block_on(ctx.api.transitions(key)) {
        Ok(transitions) => transitions,
        Err(err) => {
            warn!("Transition lookup for {key} failed: {err}");
            notifications::notify("Transition failed", &err.to_string());
            return;
        }
    };
    if transitions.is_empty() {
        notifications::notify("No transitions", &format!("{key} offers no transitions"));
        return;
    }

    let names: Vec<String> = transitions
        .iter()
        .map(|transition| transition.name.clone())
        .collect();
    let Some(choice) = prompt_or_bail(ctx.prompt.choose(key, "Move to:", &names)) else {
        return;
    };
    let Some(transition) = transitions.iter().find(|t| t.name == choice) else {
        return;
    };

    apply_transition(ctx, key, &transition.id, &transition.name);
}

/// Execute a transition and report the outcome. A successful move asks the
/// controller for a refresh so the menu reflects the new status.
pub fn apply_transition(ctx: &FlowContext, key: &str, id: &str, name: &str) {
    match ctx.runtime.block_on(ctx.api.transition(key, id)) {
        Ok(()) => {
            notifications::notify(&format!("Moved {key}"), name);
            send(ctx, Msg::Refresh);
        }
        Err(err) => {
            warn!("Transition for {key} failed: {err}");
            notifications::notify("Transition failed", &err.to_string());
        }
    }
}

/// Free-text search over the tracker, then jump to the chosen result.
pub fn search_flow(ctx: &FlowContext) {
    let Some(input) = prompt_or_bail(ctx.prompt.input("Search Jira", "Search text:", "")) else {
        return;
    };
    let Some(jql) = search_jql(&input) else {
        return;
    };

    let issues = match ctx.runtime.block_on(ctx.api.search(&jql, 20)) {
        Ok(issues) => issues,
        Err(err) => {
            warn!("Search failed: {err}");
            notifications::notify("Search failed", &err.to_string());
            return;
        }
    };
    if issues.is_empty() {
        notifications::notify("No results", &format!("Nothing matches '{}'", input.trim()));
        return;
    }

    let labels: Vec<String> = issues.iter().map(search_label).collect();
    let Some(choice) = prompt_or_bail(ctx.prompt.choose("Search results", &jql, &labels)) else {
        return;
    };
    if let Some(issue) = issues
        .iter()
        .zip(&labels)
        .find_map(|(issue, label)| (*label == choice).then_some(issue))
    {
        open_issue(&ctx.settings, &issue.key);
    }
}

/// The configuration editor: edit the top-level settings, add a group, or
/// flip a group's active state. Collected changes are sent back to the
/// controller, which validates, persists and refreshes.
pub fn config_flow(ctx: &FlowContext) {
    let items = vec![
        "Edit settings".to_string(),
        "Add group".to_string(),
        "Toggle group".to_string(),
    ];
    let Some(choice) = prompt_or_bail(ctx.prompt.choose("Configuration", "", &items)) else {
        return;
    };

    match choice.as_str() {
        "Edit settings" => edit_settings(ctx),
        "Add group" => add_group(ctx),
        "Toggle group" => toggle_group(ctx),
        _ => {}
    }
}

fn edit_settings(ctx: &FlowContext) {
    let fields = [
        "Jira URL",
        "Email",
        "Auth mode (basic/bearer/pat)",
        "Token env var",
        "Poll interval (seconds)",
        "Board URL",
    ];
    let Some(values) = prompt_or_bail(ctx.prompt.form(
        "Edit settings",
        "Blank fields keep their current value",
        &fields,
    )) else {
        return;
    };

    send(ctx, Msg::ApplySettings(edit_patch(&values)));
}

fn add_group(ctx: &FlowContext) {
    let fields = ["Name", "JQL", "Max results", "Sort (priority/status/key)"];
    let Some(values) = prompt_or_bail(ctx.prompt.form("Add group", "", &fields)) else {
        return;
    };

    match group_from_form(&values) {
        Some(group) => send(ctx, Msg::ApplySettings(SettingsPatch::AddGroup(group))),
        None => notifications::notify("Group not added", "Name and JQL are required"),
    }
}

fn toggle_group(ctx: &FlowContext) {
    if ctx.settings.groups.is_empty() {
        notifications::notify("No groups", "Add a group first");
        return;
    }

    let labels: Vec<String> = ctx.settings.groups.iter().map(toggle_label).collect();
    let Some(choice) = prompt_or_bail(ctx.prompt.choose("Toggle group", "", &labels)) else {
        return;
    };

    let name = name_from_toggle_label(&choice);
    send(
        ctx,
        Msg::ApplySettings(SettingsPatch::ToggleGroup(name.to_string())),
    );
}

fn open_issue(settings: &Settings, key: &str) {
    let url = settings.browse_url(key);
    if let Err(err) = open::that(&url) {
        error!("Failed to open {url}: {err}");
    }
}

fn copy_link(settings: &Settings, key: &str) {
    let url = settings.browse_url(key);
    match clipboard::copy(&url) {
        Ok(()) => notifications::notify("Copied", &url),
        Err(err) => error!("Failed to copy link: {err}"),
    }
}

fn send(ctx: &FlowContext, msg: Msg) {
    // The receiver only disappears during shutdown.
    if ctx.tx.send(msg).is_err() {
        warn!("Controller is gone, dropping flow result");
    }
}

fn prompt_or_bail<T>(result: Result<Option<T>>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!("Dialog failed: {err}");
            None
        }
    }
}

/// Turn search input into JQL. Double quotes are stripped so the input can
/// be embedded; blank input means the user changed their mind.
fn search_jql(input: &str) -> Option<String> {
    let cleaned = input.replace('"', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Some(format!("text ~ \"{cleaned}\""))
}

fn search_label(issue: &Issue) -> String {
    format!("{} — {} [{}]", issue.key, issue.summary, issue.status)
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn edit_patch(values: &[String]) -> SettingsPatch {
    let value = |index: usize| values.get(index).map(String::as_str).unwrap_or("");

    SettingsPatch::Edit {
        jira_url: optional(value(0)),
        email: optional(value(1)),
        auth_mode: optional(value(2)),
        token_env: optional(value(3)),
        poll_interval: optional(value(4)).and_then(|raw| match raw.parse() {
            Ok(interval) => Some(interval),
            Err(_) => {
                warn!("Ignoring unparseable poll interval '{raw}'");
                None
            }
        }),
        board_url: optional(value(5)),
    }
}

fn group_from_form(values: &[String]) -> Option<Group> {
    let value = |index: usize| values.get(index).map(String::as_str).unwrap_or("");

    let name = value(0).trim().to_string();
    let jql = value(1).trim().to_string();
    if name.is_empty() || jql.is_empty() {
        return None;
    }

    let max_results = match optional(value(2)) {
        Some(raw) => match raw.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Ignoring unparseable max results '{raw}', using 20");
                20
            }
        },
        None => 20,
    };

    Some(Group {
        name,
        jql,
        active: true,
        max_results,
        sort: optional(value(3)),
    })
}

fn toggle_label(group: &Group) -> String {
    let state = if group.active { "on" } else { "off" };
    format!("{} [{}]", group.name, state)
}

fn name_from_toggle_label(label: &str) -> &str {
    label
        .strip_suffix(" [on]")
        .or_else(|| label.strip_suffix(" [off]"))
        .unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use crate::config::EnvOverlay;
    use crate::dialogs::Prompt;
    use std::collections::VecDeque;
    use std::sync::mpsc;
    use std::sync::Mutex;

    /// Scripted prompt double: pops pre-seeded answers in order.
    struct ScriptedPrompt {
        answers: Mutex<VecDeque<Option<String>>>,
        seen_items: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedPrompt {
        fn new(answers: Vec<Option<&str>>) -> Arc<Self> {
            Arc::new(ScriptedPrompt {
                answers: Mutex::new(
                    answers
                        .into_iter()
                        .map(|answer| answer.map(str::to_string))
                        .collect(),
                ),
                seen_items: Mutex::new(Vec::new()),
            })
        }

        fn next(&self) -> Option<String> {
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .expect("flow asked for more prompts than scripted")
        }
    }

    impl Prompt for ScriptedPrompt {
        fn choose(&self, _: &str, _: &str, items: &[String]) -> Result<Option<String>> {
            self.seen_items.lock().unwrap().push(items.to_vec());
            Ok(self.next())
        }

        fn input(&self, _: &str, _: &str, _: &str) -> Result<Option<String>> {
            Ok(self.next())
        }

        fn form(&self, _: &str, _: &str, _: &[&str]) -> Result<Option<Vec<String>>> {
            Ok(self
                .next()
                .map(|joined| joined.split('|').map(str::to_string).collect()))
        }
    }

    fn context(
        prompt: Arc<dyn Prompt>,
        settings: Settings,
        pinned: Vec<String>,
        runtime: &tokio::runtime::Runtime,
    ) -> (FlowContext, mpsc::Receiver<Msg>) {
        let overlay = EnvOverlay::parse("JIRA_TRAY_FLOW_TEST_TOKEN=tok");
        let auth_settings = Settings {
            token_env: "JIRA_TRAY_FLOW_TEST_TOKEN".to_string(),
            ..Default::default()
        };
        let credentials =
            Credentials::resolve(&auth_settings, &overlay).expect("credentials should resolve");
        let api = Arc::new(
            JiraApi::new("http://127.0.0.1:1", credentials).expect("client should build"),
        );
        let (tx, rx) = mpsc::channel();

        (
            FlowContext {
                settings,
                pinned,
                api,
                prompt,
                runtime: runtime.handle().clone(),
                tx,
            },
            rx,
        )
    }

    #[test]
    fn test_issue_dialog_pin_choice_messages_the_controller() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let prompt = ScriptedPrompt::new(vec![Some(PIN_LABEL)]);
        let (ctx, rx) = context(prompt.clone(), Settings::default(), Vec::new(), &runtime);

        issue_dialog(&ctx, "PROJ-1", "PROJ-1 — Fix it");

        assert_eq!(rx.try_recv().ok(), Some(Msg::TogglePin("PROJ-1".to_string())));
        let items = prompt.seen_items.lock().unwrap();
        assert!(items[0].contains(&PIN_LABEL.to_string()));
        assert!(
            items[0].contains(&MOVE_LABEL.to_string()),
            "dialog transition mode offers Move to…"
        );
    }

    #[test]
    fn test_issue_dialog_offers_unpin_when_pinned_and_hides_move_in_submenu_mode() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let prompt = ScriptedPrompt::new(vec![None]);
        let settings = Settings {
            transition_display: "submenu".to_string(),
            ..Default::default()
        };
        let (ctx, rx) = context(
            prompt.clone(),
            settings,
            vec!["PROJ-1".to_string()],
            &runtime,
        );

        issue_dialog(&ctx, "PROJ-1", "PROJ-1");

        assert!(rx.try_recv().is_err(), "cancel must not send anything");
        let items = prompt.seen_items.lock().unwrap();
        assert!(items[0].contains(&UNPIN_LABEL.to_string()));
        assert!(!items[0].contains(&MOVE_LABEL.to_string()));
    }

    #[test]
    fn test_config_flow_edit_sends_a_patch() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let prompt = ScriptedPrompt::new(vec![
            Some("Edit settings"),
            Some("https://new.example.com||pat||600|"),
        ]);
        let (ctx, rx) = context(prompt, Settings::default(), Vec::new(), &runtime);

        config_flow(&ctx);

        match rx.try_recv().expect("a patch should be sent") {
            Msg::ApplySettings(SettingsPatch::Edit {
                jira_url,
                email,
                auth_mode,
                poll_interval,
                ..
            }) => {
                assert_eq!(jira_url.as_deref(), Some("https://new.example.com"));
                assert_eq!(email, None, "blank field keeps the previous value");
                assert_eq!(auth_mode.as_deref(), Some("pat"));
                assert_eq!(poll_interval, Some(600));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_config_flow_add_group_requires_name_and_jql() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let prompt = ScriptedPrompt::new(vec![Some("Add group"), Some("Bugs||10|priority")]);
        let (ctx, rx) = context(prompt, Settings::default(), Vec::new(), &runtime);

        config_flow(&ctx);

        assert!(rx.try_recv().is_err(), "missing JQL must not produce a group");
    }

    #[test]
    fn test_config_flow_toggle_group_names_the_group() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let settings = Settings {
            groups: vec![Group {
                name: "Bugs".to_string(),
                jql: "type = Bug".to_string(),
                active: false,
                ..Default::default()
            }],
            ..Default::default()
        };
        let prompt = ScriptedPrompt::new(vec![Some("Toggle group"), Some("Bugs [off]")]);
        let (ctx, rx) = context(prompt, settings, Vec::new(), &runtime);

        config_flow(&ctx);

        assert_eq!(
            rx.try_recv().ok(),
            Some(Msg::ApplySettings(SettingsPatch::ToggleGroup(
                "Bugs".to_string()
            )))
        );
    }

    #[test]
    fn test_search_jql_wraps_and_strips_quotes() {
        assert_eq!(
            search_jql("login \"bug\""),
            Some("text ~ \"login bug\"".to_string())
        );
        assert_eq!(search_jql("   "), None);
        assert_eq!(search_jql("\"\""), None);
    }

    #[test]
    fn test_edit_patch_maps_all_six_fields() {
        let values: Vec<String> = ["url", "mail@x", "basic", "TOK", "90", "https://board"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let patch = edit_patch(&values);

        assert_eq!(
            patch,
            SettingsPatch::Edit {
                jira_url: Some("url".to_string()),
                email: Some("mail@x".to_string()),
                auth_mode: Some("basic".to_string()),
                token_env: Some("TOK".to_string()),
                poll_interval: Some(90),
                board_url: Some("https://board".to_string()),
            }
        );
    }

    #[test]
    fn test_edit_patch_ignores_junk_poll_interval() {
        let values: Vec<String> = ["", "", "", "", "soon", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();

        match edit_patch(&values) {
            SettingsPatch::Edit { poll_interval, .. } => assert_eq!(poll_interval, None),
            other => panic!("unexpected patch: {other:?}"),
        }
    }

    #[test]
    fn test_group_from_form_defaults() {
        let values: Vec<String> = ["Bugs", "type = Bug", "", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let group = group_from_form(&values).expect("group should build");

        assert_eq!(group.name, "Bugs");
        assert_eq!(group.max_results, 20);
        assert!(group.active);
        assert_eq!(group.sort, None);
    }

    #[test]
    fn test_toggle_label_round_trip() {
        let group = Group {
            name: "My [odd] name".to_string(),
            jql: "x".to_string(),
            active: true,
            ..Default::default()
        };

        let label = toggle_label(&group);
        assert_eq!(label, "My [odd] name [on]");
        assert_eq!(name_from_toggle_label(&label), "My [odd] name");
    }

    #[test]
    fn test_search_label_format() {
        let issue = Issue {
            key: "PROJ-1".to_string(),
            summary: "Fix it".to_string(),
            status: "Open".to_string(),
            priority: None,
        };
        assert_eq!(search_label(&issue), "PROJ-1 — Fix it [Open]");
    }
}
