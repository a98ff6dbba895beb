mod api;
mod app;
mod auth;
mod clipboard;
mod config;
mod dialogs;
mod error;
mod flows;
mod icon;
mod issues;
mod logging;
mod menu;
mod notifications;
mod pins;
mod poll;
mod priority;
mod store;
mod tray;

use clap::Parser;
use error::Result;

#[derive(Parser)]
#[command(name = "jira-tray")]
#[command(about = "Jira issues in the system tray")]
#[command(version)]
struct Cli {
    /// Write a default config file and exit
    #[arg(long)]
    init: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = config::AppPaths::new()?;

    if cli.init {
        return init_config(&paths);
    }

    if !paths.config_file.exists() {
        eprintln!(
            "No config found. Run with --init to create {}",
            paths.config_file.display()
        );
        std::process::exit(1);
    }

    logging::init_logging(&paths.log_file)?;

    let config = config::Config::load()?;

    // The controller loop blocks on this thread; the runtime only carries
    // the HTTP calls and the poll timer.
    let runtime = tokio::runtime::Runtime::new()?;
    app::run(config, runtime.handle().clone())
}

fn init_config(paths: &config::AppPaths) -> Result<()> {
    if config::Settings::write_default(&paths.config_file)? {
        println!(
            "Created default config at {}",
            paths.config_file.display()
        );
        println!(
            "Edit it, set {} and re-run.",
            config::Settings::default().token_env
        );
    } else {
        println!("Config already exists at {}", paths.config_file.display());
    }
    Ok(())
}
