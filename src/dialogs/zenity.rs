use std::process::Command;

use log::debug;

use super::Prompt;
use crate::error::{Result, TrayError};

/// A dialog left on screen this long dismisses itself; zenity then exits
/// with code 5, which reads as a cancellation.
const DIALOG_TIMEOUT_SECS: u32 = 300;

/// Prompts backed by the zenity binary.
pub struct ZenityPrompt;

impl ZenityPrompt {
    fn run(&self, args: &[String]) -> Result<Option<String>> {
        debug!("zenity {}", args.join(" "));

        let output = Command::new("zenity")
            .args(args)
            .arg(format!("--timeout={DIALOG_TIMEOUT_SECS}"))
            .output()
            .map_err(|e| TrayError::Dialog(format!("failed to launch zenity: {e}")))?;

        // Non-zero exit covers Cancel, Escape, window close and timeout.
        if !output.status.success() {
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout)
            .trim_end_matches('\n')
            .to_string();
        if stdout.is_empty() {
            return Ok(None);
        }
        Ok(Some(stdout))
    }
}

impl Prompt for ZenityPrompt {
    fn choose(&self, title: &str, text: &str, items: &[String]) -> Result<Option<String>> {
        let mut args = vec![
            "--list".to_string(),
            format!("--title={title}"),
            format!("--text={text}"),
            "--hide-header".to_string(),
            "--column=choice".to_string(),
            "--width=500".to_string(),
            "--height=400".to_string(),
        ];
        args.extend(items.iter().cloned());

        self.run(&args)
    }

    fn input(&self, title: &str, text: &str, initial: &str) -> Result<Option<String>> {
        self.run(&[
            "--entry".to_string(),
            format!("--title={title}"),
            format!("--text={text}"),
            format!("--entry-text={initial}"),
        ])
    }

    fn form(&self, title: &str, text: &str, fields: &[&str]) -> Result<Option<Vec<String>>> {
        let mut args = vec![
            "--forms".to_string(),
            format!("--title={title}"),
            format!("--text={text}"),
            "--separator=|".to_string(),
        ];
        for field in fields {
            args.push(format!("--add-entry={field}"));
        }

        Ok(self
            .run(&args)?
            .map(|raw| parse_form_output(&raw, fields.len())))
    }
}

/// Split zenity's pipe-delimited form output into one value per field.
/// Short output is padded with empty strings; anything beyond the expected
/// field count is dropped (a value containing the separator is on the user).
fn parse_form_output(raw: &str, field_count: usize) -> Vec<String> {
    let mut values: Vec<String> = raw.split('|').map(str::to_string).collect();
    values.resize(field_count, String::new());
    values
}
