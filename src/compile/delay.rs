//! Registry of delayed-modifier occurrences
//!
//! Every `delay(species,expr)` modifier resolved during compilation is
//! recorded here. The ordinal is a global counter (the number of entries
//! registered before this one), not per-species, so lag symbols are unique
//! across the whole run: the first delay ever seen gets `tau_<species>_0`,
//! the second `tau_<species>_1`, and so on regardless of species.

use serde::{Deserialize, Serialize};

/// One registered delayed-modifier occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayEntry {
    /// The species whose past value is read
    pub species: String,
    /// Global registration ordinal, 0-based
    pub ordinal: usize,
    /// The delay (lag) expression, kept as written
    pub expression: String,
}

impl DelayEntry {
    /// Registry key: `<species>_<ordinal>`
    pub fn key(&self) -> String {
        format!("{}_{}", self.species, self.ordinal)
    }

    /// The lag-parameter symbol bound to the delay expression
    pub fn lag_symbol(&self) -> String {
        format!("tau_{}_{}", self.species, self.ordinal)
    }
}

/// The history-index symbol for a delayed species
pub fn history_symbol(species: &str) -> String {
    format!("histindex_{species}")
}

/// Tracks delayed-modifier occurrences in registration order
#[derive(Debug, Clone, Default)]
pub struct DelayRegistry {
    entries: Vec<DelayEntry>,
}

impl DelayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new delay occurrence and return its entry
    pub fn register(&mut self, species: &str, expression: &str) -> &DelayEntry {
        let entry = DelayEntry {
            species: species.to_string(),
            ordinal: self.entries.len(),
            expression: expression.to_string(),
        };
        self.entries.push(entry);
        self.entries.last().unwrap()
    }

    pub fn entries(&self) -> &[DelayEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct delayed species, in first-registration order
    pub fn distinct_species(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.species.as_str()) {
                seen.push(entry.species.as_str());
            }
        }
        seen
    }

    /// Current length, for rollback when a reaction is later dropped
    pub fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    /// Discard entries registered after `checkpoint`
    pub fn rollback(&mut self, checkpoint: usize) {
        self.entries.truncate(checkpoint);
    }
}
