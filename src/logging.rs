use crate::error::Result;
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

static LOG_FILE: Mutex<Option<std::fs::File>> = Mutex::new(None);

// Rotate once the log grows past 5 MB, keeping a single predecessor.
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

fn rotate_if_needed(log_file_path: &Path) -> Result<()> {
    if let Ok(metadata) = fs::metadata(log_file_path) {
        if metadata.len() > MAX_LOG_SIZE {
            let rotated = log_file_path.with_extension("log.1");
            fs::rename(log_file_path, rotated)?;
        }
    }
    Ok(())
}

/// Initialize the logger: messages go to stderr and are appended to the
/// log file under the cache directory. `RUST_LOG` overrides the level.
pub fn init_logging(log_file_path: &Path) -> Result<()> {
    rotate_if_needed(log_file_path)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    *LOG_FILE.lock().unwrap() = Some(log_file);

    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    builder.target(Target::Stderr);
    builder.format(move |buf, record| {
        let formatted = format!(
            "[{}] {} {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.args()
        );

        writeln!(buf, "{}", &formatted)?;

        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                writeln!(file, "{}", &formatted).ok();
                file.flush().ok();
            }
        }

        Ok(())
    });

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    } else {
        builder.filter_level(LevelFilter::Info);
    }

    builder.init();

    Ok(())
}
