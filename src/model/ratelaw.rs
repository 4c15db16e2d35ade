//! Rate-law templates and their lookup table

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A parameterized rate-law template
///
/// The body contains bracket placeholders (`[S1]`, `[P2]`, `[MOD1]`; the
/// letter is case-insensitive, the index 1-based) and brace parameter-type
/// tokens (`{kcat}`). Templates are immutable once loaded.
///
/// # Example
///
/// ```
/// use rxn2ode::model::RateLaw;
///
/// let law = RateLaw::new("mm", "{Vmax}*[S1]/({Km}+[S1])");
/// assert_eq!(law.id, "mm");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLaw {
    /// Unique rate-law identifier, referenced by reaction rows
    pub id: String,
    /// Template text with placeholder tokens
    pub body: String,
}

impl RateLaw {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }
}

/// Lookup table from rate-law id to template
///
/// Later rows with a duplicate id replace earlier ones, matching the
/// last-write-wins behavior of loading rows into a dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLawTable {
    laws: HashMap<String, RateLaw>,
}

impl RateLawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an iterator of (id, template) pairs
    pub fn from_rows<I, S, T>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut table = Self::new();
        for (id, body) in rows {
            table.insert(RateLaw::new(id, body));
        }
        table
    }

    pub fn insert(&mut self, law: RateLaw) {
        self.laws.insert(law.id.clone(), law);
    }

    pub fn get(&self, id: &str) -> Option<&RateLaw> {
        self.laws.get(id)
    }

    pub fn len(&self) -> usize {
        self.laws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laws.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = RateLawTable::from_rows([("mm", "{Vmax}*[S1]/({Km}+[S1])")]);
        assert_eq!(table.get("mm").unwrap().body, "{Vmax}*[S1]/({Km}+[S1])");
        assert!(table.get("hill").is_none());
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let table = RateLawTable::from_rows([("mm", "old"), ("mm", "new")]);
        assert_eq!(table.get("mm").unwrap().body, "new");
        assert_eq!(table.len(), 1);
    }
}
