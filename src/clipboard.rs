//! Clipboard copy through external helpers. Wayland first, then the X11
//! tools, then pbcopy for the odd macOS setup. First one that works wins.

use std::io::Write;
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::error::{Result, TrayError};

const HELPERS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
];

/// Copy text via the first clipboard helper that accepts it.
pub fn copy(text: &str) -> Result<()> {
    for (binary, args) in HELPERS {
        match pipe_to(binary, args, text) {
            Ok(true) => {
                debug!("Copied {} bytes via {binary}", text.len());
                return Ok(());
            }
            Ok(false) => warn!("{binary} exited non-zero, trying the next helper"),
            // Helper not installed; try the next one silently.
            Err(_) => {}
        }
    }

    Err(TrayError::Platform(
        "no clipboard helper worked (tried wl-copy, xclip, xsel, pbcopy)".to_string(),
    ))
}

fn pipe_to(binary: &str, args: &[&str], text: &str) -> std::io::Result<bool> {
    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(err) = stdin.write_all(text.as_bytes()) {
            drop(stdin);
            let _ = child.wait();
            return Err(err);
        }
    }

    Ok(child.wait()?.success())
}
