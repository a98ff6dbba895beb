// Library module for jira-tray
// This allows modules to be used in tests and other binaries

pub mod api;
pub mod app;
pub mod auth;
pub mod clipboard;
pub mod config;
pub mod dialogs;
pub mod error;
pub mod flows;
pub mod icon;
pub mod issues;
pub mod logging;
pub mod menu;
pub mod notifications;
pub mod pins;
pub mod poll;
pub mod priority;
pub mod store;
pub mod tray;

pub use error::{Result, TrayError};
