//! Named parameter values

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named kinetic parameter
///
/// The value is kept as the author wrote it. Substitution splices the text
/// verbatim into the resolved expression, so `1e-3` stays `1e-3` and is
/// never renormalized through a float round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Lookup table from parameter name to value text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterTable {
    values: HashMap<String, String>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an iterator of (name, value) pairs
    pub fn from_rows<I, S, T>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut table = Self::new();
        for (name, value) in rows {
            table.insert(Parameter::new(name, value));
        }
        table
    }

    pub fn insert(&mut self, parameter: Parameter) {
        self.values.insert(parameter.name, parameter.value);
    }

    /// The stored value text for a parameter name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kept_verbatim() {
        let table = ParameterTable::from_rows([("kcat_enz1", "5.00e-1")]);
        assert_eq!(table.get("kcat_enz1"), Some("5.00e-1"));
    }
}
