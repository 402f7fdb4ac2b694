//! Per-instance logging configuration.
//!
//! Replaces process-global logging state with a sink carried by the player.
//! Category filtering happens here; the actual output goes through the
//! `log` facade so the embedding host picks the backend.

use std::collections::BTreeSet;

use crate::utils::config::DEFAULT_LOG_CATEGORIES;

pub struct Logger {
    instance: String,
    enabled: bool,
    categories: BTreeSet<&'static str>,
}

impl Logger {
    pub fn new(instance: &str, enabled: bool) -> Self {
        Self {
            instance: instance.to_string(),
            enabled,
            categories: DEFAULT_LOG_CATEGORIES.iter().copied().collect(),
        }
    }

    pub fn set_enabled(&mut self, on: bool) {
        self.enabled = on;
    }

    /// Replace the active category set. Unrecognized names are silently
    /// ignored; an empty list restores the full default set.
    pub fn set_categories(&mut self, categories: &[&str]) {
        if categories.is_empty() {
            self.categories = DEFAULT_LOG_CATEGORIES.iter().copied().collect();
            return;
        }
        self.categories.clear();
        for name in categories {
            if let Some(known) = DEFAULT_LOG_CATEGORIES.iter().copied().find(|k| k == name) {
                self.categories.insert(known);
            }
        }
    }

    pub fn enabled_for(&self, category: &str) -> bool {
        self.enabled && self.categories.contains(category)
    }

    pub fn debug(&self, category: &'static str, msg: &str) {
        if self.enabled_for(category) {
            log::debug!(target: category, "{}: {}", self.instance, msg);
        }
    }

    pub fn info(&self, category: &'static str, msg: &str) {
        if self.enabled_for(category) {
            log::info!(target: category, "{}: {}", self.instance, msg);
        }
    }

    pub fn error(&self, category: &'static str, msg: &str) {
        if self.enabled_for(category) {
            log::error!(target: category, "{}: {}", self.instance, msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_categories_are_ignored() {
        let mut logger = Logger::new("inst", true);
        logger.set_categories(&["trace", "nonsense"]);
        assert!(logger.enabled_for("trace"));
        assert!(!logger.enabled_for("player"));
        assert!(!logger.enabled_for("nonsense"));
    }

    #[test]
    fn empty_list_restores_defaults() {
        let mut logger = Logger::new("inst", true);
        logger.set_categories(&["api"]);
        logger.set_categories(&[]);
        for cat in DEFAULT_LOG_CATEGORIES {
            assert!(logger.enabled_for(cat));
        }
    }

    #[test]
    fn disabled_logger_filters_everything() {
        let mut logger = Logger::new("inst", true);
        logger.set_enabled(false);
        assert!(!logger.enabled_for("trace"));
    }
}
