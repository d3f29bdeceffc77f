use std::env;

use tracing::warn;

use crate::editor::{EditorSettings, DEFAULT_GENERIC_ERROR};

pub const BUFFER_SIZE_VAR: &str = "ORDER_EDITOR_BUFFER_SIZE";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

/// Runtime settings for the order system.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Mailbox size of every resource actor.
    pub buffer_size: usize,
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,
    pub generic_error_message: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            log_filter: "info".to_string(),
            generic_error_message: DEFAULT_GENERIC_ERROR.to_string(),
        }
    }
}

impl SystemConfig {
    /// Defaults overridden by `ORDER_EDITOR_BUFFER_SIZE` and `RUST_LOG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Invalid values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(BUFFER_SIZE_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => config.buffer_size = size,
                _ => warn!(value = %raw, var = BUFFER_SIZE_VAR, "Ignoring invalid buffer size"),
            }
        }
        if let Some(filter) = lookup(LOG_FILTER_VAR).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        config
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            generic_error_message: self.generic_error_message.clone(),
        }
    }
}
