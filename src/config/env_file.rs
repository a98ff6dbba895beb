use log::warn;
use std::collections::HashMap;
use std::path::Path;

/// Variables read from an optional bash-style env file. The process
/// environment always takes precedence; the overlay only fills gaps, and the
/// file is never exported into the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverlay {
    vars: HashMap<String, String>,
}

impl EnvOverlay {
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return EnvOverlay::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => EnvOverlay::parse(&content),
            Err(e) => {
                warn!("Could not read env file {}: {e}", path.display());
                EnvOverlay::default()
            }
        }
    }

    /// Parse `KEY=value` lines. Blank lines and `#` comments are skipped, an
    /// `export ` prefix is tolerated, and single or double quotes around the
    /// value are stripped.
    pub fn parse(content: &str) -> Self {
        let mut vars = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !key.is_empty() && !value.is_empty() {
                vars.insert(key.to_string(), value.to_string());
            }
        }
        EnvOverlay { vars }
    }

    /// Look up a variable: the process environment first, then the overlay.
    pub fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().or_else(|| self.vars.get(key).cloned())
    }

    /// Look up in the overlay alone, ignoring the process environment.
    pub fn get_from_file(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
