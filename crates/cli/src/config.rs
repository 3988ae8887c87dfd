//! Environment-driven configuration

use std::path::PathBuf;

/// Path of the task file to load at startup and to offer when saving
pub const FILE_VAR: &str = "TASKMGR_FILE";
/// Reject work priorities outside 1-5 when set
pub const STRICT_PRIORITY_VAR: &str = "TASKMGR_STRICT_PRIORITY";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub task_file: Option<PathBuf>,
    pub strict_priority: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let task_file = lookup(FILE_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Self {
            task_file,
            strict_priority: parse_flag(lookup(STRICT_PRIORITY_VAR).as_deref(), false),
        }
    }
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}
