//! Linux tray binding over ksni (StatusNotifierItem on D-Bus). This layer
//! only renders menu entry descriptors and forwards clicks; all decisions
//! live in the controller.

use std::sync::mpsc::Sender;

use log::{debug, error, info};

use crate::app::Msg;
use crate::icon::Pixmap;
use crate::menu::{MenuAction, MenuEntry};
use crate::priority;

pub struct JiraTray {
    entries: Vec<MenuEntry>,
    icon: Pixmap,
    tx: Sender<Msg>,
}

impl JiraTray {
    fn new(tx: Sender<Msg>) -> Self {
        JiraTray {
            entries: Vec::new(),
            icon: crate::icon::badge(priority::DEFAULT_BADGE_COLOR, 0),
            tx,
        }
    }

    fn dispatch(&self, action: MenuAction) {
        debug!("Menu action: {action:?}");
        if self.tx.send(Msg::Menu(action)).is_err() {
            error!("Controller is gone, dropping menu action");
        }
    }
}

impl ksni::Tray for JiraTray {
    fn id(&self) -> String {
        "jira-tray".to_string()
    }

    fn title(&self) -> String {
        "Jira Issues".to_string()
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        vec![ksni::Icon {
            width: self.icon.width,
            height: self.icon.height,
            data: self.icon.data.clone(),
        }]
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        self.entries.iter().map(render_entry).collect()
    }
}

fn render_entry(entry: &MenuEntry) -> ksni::MenuItem<JiraTray> {
    match entry {
        MenuEntry::Separator => ksni::menu::MenuItem::Separator,
        MenuEntry::Item {
            label,
            enabled,
            action,
        } => {
            let action = action.clone();
            ksni::menu::StandardItem {
                label: label.clone(),
                enabled: *enabled,
                activate: Box::new(move |this: &mut JiraTray| {
                    if let Some(action) = &action {
                        this.dispatch(action.clone());
                    }
                }),
                ..Default::default()
            }
            .into()
        }
        MenuEntry::Submenu { label, entries } => ksni::menu::SubMenu {
            label: label.clone(),
            submenu: entries.iter().map(render_entry).collect(),
            ..Default::default()
        }
        .into(),
    }
}

/// Handle to the running tray service, for pushing fresh state.
pub struct TrayHandle {
    handle: ksni::Handle<JiraTray>,
}

impl TrayHandle {
    /// Start the StatusNotifierItem service on its own thread.
    pub fn spawn(tx: Sender<Msg>) -> Self {
        info!("Starting ksni tray service");

        let service = ksni::TrayService::new(JiraTray::new(tx));
        let handle = service.handle();
        service.spawn();

        TrayHandle { handle }
    }

    /// Swap in freshly built menu entries and icon.
    pub fn update(&self, entries: Vec<MenuEntry>, icon: Pixmap) {
        let _ = self.handle.update(move |tray: &mut JiraTray| {
            tray.entries = entries.clone();
            tray.icon = icon.clone();
        });
    }
}
