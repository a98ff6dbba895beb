//! The controller. Owns all mutable state and processes every message on
//! one thread; tray clicks, poll ticks and dialog flows only ever talk to
//! it through the channel.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use log::{error, info, warn};

use crate::api::JiraApi;
use crate::auth::Credentials;
use crate::clipboard;
use crate::config::paths::expand_tilde;
use crate::config::{Config, TransitionDisplay};
use crate::dialogs::{Prompt, ZenityPrompt};
use crate::error::Result;
use crate::flows::{self, FlowContext, SettingsPatch};
use crate::icon;
use crate::issues::{SortKey, Transition};
use crate::menu::{self, MenuAction};
use crate::notifications;
use crate::pins::PinStore;
use crate::poll::Poller;
use crate::priority;
use crate::store::IssueStore;
use crate::tray::TrayHandle;

const HOMEPAGE_URL: &str = "https://www.axitam.eu";

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A tray menu item was activated.
    Menu(MenuAction),
    /// The poll interval elapsed.
    PollTick,
    /// Pin the key, or unpin it if already pinned.
    TogglePin(String),
    /// Persist a change collected by the configuration editor.
    ApplySettings(SettingsPatch),
    /// Fetch all groups now.
    Refresh,
}

struct App {
    config: Config,
    api: Arc<JiraApi>,
    store: IssueStore,
    pins: PinStore,
    pinned_transitions: HashMap<String, Vec<Transition>>,
    poller: Poller,
    prompt: Arc<dyn Prompt>,
    runtime: tokio::runtime::Handle,
    tray: TrayHandle,
    tx: Sender<Msg>,
}

/// Wire everything up and block on the message loop until Quit.
pub fn run(config: Config, runtime: tokio::runtime::Handle) -> Result<()> {
    let settings = config.settings();
    let credentials = Credentials::resolve(&settings, &config.env())?;
    info!("Authenticating in {:?} mode", credentials.mode());
    let api = Arc::new(JiraApi::new(&settings.jira_url, credentials)?);
    let pins = PinStore::load(&config.paths().pins_file);

    let (tx, rx) = mpsc::channel();
    let tray = TrayHandle::spawn(tx.clone());

    let mut app = App {
        config,
        api,
        store: IssueStore::new(),
        pins,
        pinned_transitions: HashMap::new(),
        poller: Poller::new(),
        prompt: Arc::new(ZenityPrompt),
        runtime,
        tray,
        tx,
    };

    info!(
        "Connected to {} with {} group(s)",
        app.api.base_url(),
        settings.groups.len()
    );
    app.refresh();
    app.poller
        .start(&app.runtime, settings.poll_interval, app.tx.clone());

    app.run_loop(rx);
    app.poller.stop();
    info!("Shutting down");
    Ok(())
}

impl App {
    fn run_loop(&mut self, rx: Receiver<Msg>) {
        while let Ok(msg) = rx.recv() {
            if !self.handle(msg) {
                break;
            }
        }
    }

    /// Returns false when the loop should stop.
    fn handle(&mut self, msg: Msg) -> bool {
        match msg {
            Msg::Menu(MenuAction::Quit) => {
                info!("Quit requested");
                return false;
            }
            Msg::Menu(action) => self.handle_action(action),
            Msg::PollTick => {
                if self.config.settings().auto_refresh {
                    self.refresh();
                }
            }
            Msg::TogglePin(key) => self.toggle_pin(&key),
            Msg::ApplySettings(patch) => self.apply_patch(patch),
            Msg::Refresh => self.refresh(),
        }
        true
    }

    fn handle_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::ShowIssue(key) => {
                let label = match self.store.find(&key) {
                    Some(issue) => menu::issue_label(issue),
                    None => key.clone(),
                };
                let ctx = self.flow_context();
                std::thread::spawn(move || flows::issue_dialog(&ctx, &key, &label));
            }
            MenuAction::OpenIssue(key) => {
                let url = self.config.settings().browse_url(&key);
                self.open_url(&url);
            }
            MenuAction::CopyLink(key) => {
                let url = self.config.settings().browse_url(&key);
                match clipboard::copy(&url) {
                    Ok(()) => notifications::notify("Copied", &url),
                    Err(err) => error!("Failed to copy link: {err}"),
                }
            }
            MenuAction::Unpin(key) => self.unpin(&key),
            MenuAction::Transition { key, id, name } => {
                let ctx = self.flow_context();
                std::thread::spawn(move || flows::apply_transition(&ctx, &key, &id, &name));
            }
            MenuAction::Refresh => self.refresh(),
            MenuAction::Search => {
                let ctx = self.flow_context();
                std::thread::spawn(move || flows::search_flow(&ctx));
            }
            MenuAction::ReloadConfig => self.reload(),
            MenuAction::Configuration => {
                let ctx = self.flow_context();
                std::thread::spawn(move || flows::config_flow(&ctx));
            }
            MenuAction::OpenBoard => {
                if let Some(url) = self.config.settings().board_url {
                    self.open_url(&url);
                }
            }
            MenuAction::OpenHomepage => self.open_url(HOMEPAGE_URL),
            // Handled in `handle` before dispatch.
            MenuAction::Quit => {}
        }
    }

    /// Snapshot for a dialog flow. The flow works on the copy; anything it
    /// wants changed comes back as a message.
    fn flow_context(&self) -> FlowContext {
        FlowContext {
            settings: self.config.settings(),
            pinned: self.pins.keys().to_vec(),
            api: Arc::clone(&self.api),
            prompt: Arc::clone(&self.prompt),
            runtime: self.runtime.clone(),
            tx: self.tx.clone(),
        }
    }

    /// Fetch every active group, diff against what was seen before, and
    /// push the rebuilt menu and badge to the tray.
    fn refresh(&mut self) {
        let settings = self.config.settings();
        for group in &settings.groups {
            if !group.active || !group.is_fetchable() {
                continue;
            }
            match self
                .runtime
                .block_on(self.api.search(&group.jql, group.max_results))
            {
                Ok(mut issues) => {
                    if let Some(sort) = group.sort.as_deref().and_then(SortKey::parse) {
                        sort.apply(&mut issues);
                    }
                    let fresh = self.store.record(&group.name, issues);
                    if settings.notifications {
                        for issue in &fresh {
                            let (title, body) =
                                notifications::new_issue_notification(&group.name, issue);
                            notifications::notify(&title, &body);
                        }
                    }
                }
                Err(err) => {
                    error!("Error fetching '{}': {err}", group.name);
                    self.store.record_failure(&group.name);
                }
            }
        }
        self.sync_pinned_transitions();
        self.push_state();
    }

    fn toggle_pin(&mut self, key: &str) {
        match self.pins.toggle(key) {
            Ok(pinned) => {
                info!("{} {key}", if pinned { "Pinned" } else { "Unpinned" });
                self.sync_pinned_transitions();
                self.push_state();
            }
            Err(err) => error!("Failed to persist pins: {err}"),
        }
    }

    fn unpin(&mut self, key: &str) {
        match self.pins.unpin(key) {
            Ok(true) => {
                info!("Unpinned {key}");
                self.sync_pinned_transitions();
                self.push_state();
            }
            Ok(false) => {}
            Err(err) => error!("Failed to persist pins: {err}"),
        }
    }

    /// Keep the cached transitions in step with the pin list. Only submenu
    /// mode prefetches; dialog mode fetches on demand, so the cache stays
    /// empty there. At most one lookup per pinned issue.
    fn sync_pinned_transitions(&mut self) {
        let settings = self.config.settings();
        if settings.transition_display() != TransitionDisplay::Submenu {
            self.pinned_transitions.clear();
            return;
        }

        let pinned = self.pins.keys().to_vec();
        self.pinned_transitions
            .retain(|key, _| pinned.iter().any(|k| k == key));
        for key in pinned {
            match self.runtime.block_on(self.api.transitions(&key)) {
                Ok(transitions) => {
                    self.pinned_transitions.insert(key, transitions);
                }
                Err(err) => {
                    warn!("Transition lookup for {key} failed: {err}");
                    self.pinned_transitions.remove(&key);
                }
            }
        }
    }

    /// Rebuild the menu and icon from current state and hand them to the
    /// tray service.
    fn push_state(&self) {
        let settings = self.config.settings();
        let entries = menu::build_menu(&settings, &self.store, &self.pins, &self.pinned_transitions);

        let active: Vec<&str> = settings
            .groups
            .iter()
            .filter(|group| group.active)
            .map(|group| group.name.as_str())
            .collect();
        let count = self.store.count(active.iter().copied());
        let color = priority::badge_color(self.store.highest_priority(active.iter().copied()));
        let icon_path = settings.icon.as_deref().map(expand_tilde);
        let pixmap = icon::render(icon_path.as_deref(), color, count);

        self.tray.update(entries, pixmap);
    }

    /// "Reload config": re-read the file, then rebuild whatever depends on
    /// it (credentials, client, poll cadence) and fetch fresh data.
    fn reload(&mut self) {
        info!("Reloading configuration");
        if let Err(err) = self.config.reload() {
            error!("Reload failed: {err}");
            notifications::notify("Reload failed", &err.to_string());
            return;
        }
        self.apply_settings_change();
    }

    fn apply_patch(&mut self, patch: SettingsPatch) {
        let result = match patch {
            SettingsPatch::Edit {
                jira_url,
                email,
                auth_mode,
                token_env,
                poll_interval,
                board_url,
            } => self.config.update_settings(|settings| {
                if let Some(value) = jira_url {
                    settings.jira_url = value;
                }
                if let Some(value) = email {
                    settings.email = Some(value);
                }
                if let Some(value) = auth_mode {
                    settings.auth_mode = value;
                }
                if let Some(value) = token_env {
                    settings.token_env = value;
                }
                if let Some(value) = poll_interval {
                    settings.poll_interval = value;
                }
                if let Some(value) = board_url {
                    settings.board_url = Some(value);
                }
            }),
            SettingsPatch::AddGroup(group) => {
                info!("Adding group '{}'", group.name);
                self.config
                    .update_settings(move |settings| settings.groups.push(group))
            }
            SettingsPatch::ToggleGroup(name) => self.config.update_settings(move |settings| {
                if let Some(group) = settings.groups.iter_mut().find(|group| group.name == name) {
                    group.active = !group.active;
                    info!(
                        "Group '{name}' is now {}",
                        if group.active { "active" } else { "inactive" }
                    );
                }
            }),
        };

        if let Err(err) = result {
            error!("Failed to save configuration: {err}");
            notifications::notify("Configuration not saved", &err.to_string());
            return;
        }
        self.apply_settings_change();
    }

    /// Settings changed on disk or in memory: re-resolve credentials,
    /// rebuild the client, restart the poller and refresh. A credential
    /// failure keeps the previous connection alive.
    fn apply_settings_change(&mut self) {
        let settings = self.config.settings();
        match Credentials::resolve(&settings, &self.config.env()) {
            Ok(credentials) => match JiraApi::new(&settings.jira_url, credentials) {
                Ok(api) => {
                    self.api = Arc::new(api);
                }
                Err(err) => {
                    error!("Failed to rebuild the API client: {err}");
                    notifications::notify(
                        "Configuration",
                        &format!("Keeping the previous connection: {err}"),
                    );
                }
            },
            Err(err) => {
                warn!("Credentials unchanged: {err}");
                notifications::notify(
                    "Configuration",
                    &format!("Keeping the previous credentials: {err}"),
                );
            }
        }

        self.poller
            .start(&self.runtime, settings.poll_interval, self.tx.clone());
        self.refresh();
    }

    fn open_url(&self, url: &str) {
        info!("Opening {url}");
        if let Err(err) = open::that(url) {
            error!("Failed to open {url}: {err}");
        }
    }
}
