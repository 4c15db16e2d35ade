//! Reaction records and their modifier / parameter-ref tokens

use serde::{Deserialize, Serialize};

/// A modifier token from a reaction row
///
/// Either a plain species name, or a delayed reference of the form
/// `delay(<species>,<delayExpr>)` that reads the species' value at a past
/// time offset and turns the emitted system into a DDE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    /// A plain species influencing the rate law
    Species(String),
    /// A delayed reference to a species' past value
    Delay { species: String, expression: String },
}

impl Modifier {
    /// Parse a modifier token, recognizing the `delay(species,expr)` wrapper
    ///
    /// Returns `None` for a delay wrapper that cannot be split into a
    /// species and a delay expression.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(inner) = token
            .strip_prefix("delay(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let (species, expression) = inner.split_once(',')?;
            let species = species.trim();
            let expression = expression.trim();
            if species.is_empty() || expression.is_empty() {
                return None;
            }
            Some(Modifier::Delay {
                species: species.to_string(),
                expression: expression.to_string(),
            })
        } else if token.is_empty() {
            None
        } else {
            Some(Modifier::Species(token.to_string()))
        }
    }

    /// The species this modifier refers to
    pub fn species(&self) -> &str {
        match self {
            Modifier::Species(name) => name,
            Modifier::Delay { species, .. } => species,
        }
    }

    pub fn is_delayed(&self) -> bool {
        matches!(self, Modifier::Delay { .. })
    }
}

/// A parameter reference of the form `<type>_<suffix>` (e.g. `kcat_enz1`)
///
/// The text before the first underscore is the ref's type; a template token
/// `{kcat}` matches the first ref in the reaction whose type is `kcat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRef {
    pub name: String,
}

impl ParameterRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The type prefix: everything before the first underscore, or the whole
    /// name when there is none
    pub fn type_prefix(&self) -> &str {
        self.name.split('_').next().unwrap_or(&self.name)
    }
}

/// One row of the reaction table
///
/// List cells keep their source order; it is load-bearing, both for
/// 1-based placeholder lookup and for state-index assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub substrates: Vec<String>,
    pub products: Vec<String>,
    pub rate_law_id: String,
    pub modifiers: Vec<Modifier>,
    pub parameter_refs: Vec<ParameterRef>,
}

impl ReactionRecord {
    pub fn new(rate_law_id: impl Into<String>) -> Self {
        Self {
            substrates: Vec::new(),
            products: Vec::new(),
            rate_law_id: rate_law_id.into(),
            modifiers: Vec::new(),
            parameter_refs: Vec::new(),
        }
    }

    pub fn with_substrates<I, S>(mut self, substrates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.substrates = substrates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_modifiers<I>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = Modifier>,
    {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    pub fn with_parameter_refs<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_refs = refs.into_iter().map(ParameterRef::new).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_modifier() {
        assert_eq!(
            Modifier::parse("Enzyme"),
            Some(Modifier::Species("Enzyme".to_string()))
        );
    }

    #[test]
    fn test_parse_delay_modifier() {
        assert_eq!(
            Modifier::parse("delay(X,5.0)"),
            Some(Modifier::Delay {
                species: "X".to_string(),
                expression: "5.0".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_delay_with_expression() {
        let modifier = Modifier::parse("delay(X, tau/2)").unwrap();
        assert_eq!(
            modifier,
            Modifier::Delay {
                species: "X".to_string(),
                expression: "tau/2".to_string(),
            }
        );
        assert!(modifier.is_delayed());
        assert_eq!(modifier.species(), "X");
    }

    #[test]
    fn test_parse_malformed_delay() {
        assert!(Modifier::parse("delay(X)").is_none());
        assert!(Modifier::parse("delay(,5.0)").is_none());
        assert!(Modifier::parse("").is_none());
    }

    #[test]
    fn test_parameter_ref_prefix() {
        assert_eq!(ParameterRef::new("kcat_enz1").type_prefix(), "kcat");
        assert_eq!(ParameterRef::new("Km_enz1_alt").type_prefix(), "Km");
        assert_eq!(ParameterRef::new("kf").type_prefix(), "kf");
    }
}
