//! Folds resolved reaction expressions into per-species derivative equations
//!
//! State indices are assigned on first encounter, scanning reactions in
//! table order and, within a reaction, substrates then products then
//! modifiers. Indices are 1-based, permanent for the run, and never reused.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Modifier, ReactionRecord};

/// One species' derivative equation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    pub species: String,
    /// 1-based state-vector index
    pub index: usize,
    /// Right-hand side of `dy[index] = ...`
    pub expression: String,
}

/// The assembled equation system: an insertion-ordered arena of equations
/// plus a name-to-handle map
#[derive(Debug, Clone, Default)]
pub struct EquationSystem {
    equations: Vec<Equation>,
    handles: HashMap<String, usize>,
}

impl EquationSystem {
    /// Equations in state-index order
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// The state index assigned to a species, if it has been seen
    pub fn index_of(&self, species: &str) -> Option<usize> {
        self.handles.get(species).map(|&h| self.equations[h].index)
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Species names in state-index order
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.equations.iter().map(|eq| eq.species.as_str())
    }

    fn handle(&mut self, species: &str) -> Option<usize> {
        self.handles.get(species).copied()
    }

    fn insert(&mut self, species: &str, expression: String) -> usize {
        let handle = self.equations.len();
        self.equations.push(Equation {
            species: species.to_string(),
            index: handle + 1,
            expression,
        });
        self.handles.insert(species.to_string(), handle);
        handle
    }
}

/// Accumulates reactions into an [`EquationSystem`]
#[derive(Debug, Default)]
pub struct Assembler {
    system: EquationSystem,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one reaction's resolved rate expression into the system
    ///
    /// Substrates subtract the expression, products add it, and plain
    /// modifiers get a zero-derivative placeholder so every referenced
    /// species occupies a state slot. Delay-wrapped modifiers are skipped
    /// here; they only read history and do not own a slot through this rule.
    pub fn fold(&mut self, reaction: &ReactionRecord, expression: &str) {
        for substrate in &reaction.substrates {
            match self.system.handle(substrate) {
                Some(h) => {
                    let rhs = &mut self.system.equations[h].expression;
                    rhs.push_str(" - ");
                    rhs.push_str(expression);
                }
                None => {
                    self.system.insert(substrate, format!("-{expression}"));
                }
            }
        }
        for product in &reaction.products {
            match self.system.handle(product) {
                Some(h) => {
                    let rhs = &mut self.system.equations[h].expression;
                    rhs.push_str(" + ");
                    rhs.push_str(expression);
                }
                None => {
                    self.system.insert(product, format!("+{expression}"));
                }
            }
        }
        for modifier in &reaction.modifiers {
            if let Modifier::Species(name) = modifier {
                if self.system.handle(name).is_none() {
                    self.system.insert(name, "0".to_string());
                }
            }
        }
    }

    pub fn system(&self) -> &EquationSystem {
        &self.system
    }

    pub fn finish(self) -> EquationSystem {
        self.system
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction(
        substrates: &[&str],
        products: &[&str],
        modifiers: &[Modifier],
    ) -> ReactionRecord {
        ReactionRecord::new("law")
            .with_substrates(substrates.iter().copied())
            .with_products(products.iter().copied())
            .with_modifiers(modifiers.iter().cloned())
    }

    #[test]
    fn test_first_encounter_creates_equations() {
        let mut assembler = Assembler::new();
        assembler.fold(&reaction(&["A"], &["B"], &[]), "k*A");
        let system = assembler.finish();
        assert_eq!(system.len(), 2);
        assert_eq!(system.equations()[0].species, "A");
        assert_eq!(system.equations()[0].index, 1);
        assert_eq!(system.equations()[0].expression, "-k*A");
        assert_eq!(system.equations()[1].species, "B");
        assert_eq!(system.equations()[1].index, 2);
        assert_eq!(system.equations()[1].expression, "+k*A");
    }

    #[test]
    fn test_reencounter_appends() {
        let mut assembler = Assembler::new();
        assembler.fold(&reaction(&["A"], &["B"], &[]), "k1*A");
        assembler.fold(&reaction(&["B"], &["A"], &[]), "k2*B");
        let system = assembler.finish();
        assert_eq!(system.len(), 2);
        assert_eq!(system.equations()[0].expression, "-k1*A + k2*B");
        assert_eq!(system.equations()[1].expression, "+k1*A - k2*B");
        // indices are stable across re-encounters
        assert_eq!(system.index_of("A"), Some(1));
        assert_eq!(system.index_of("B"), Some(2));
    }

    #[test]
    fn test_plain_modifier_gets_zero_equation() {
        let mut assembler = Assembler::new();
        assembler.fold(
            &reaction(&["A"], &["B"], &[Modifier::Species("E".to_string())]),
            "k*A*E",
        );
        let system = assembler.finish();
        assert_eq!(system.len(), 3);
        assert_eq!(system.equations()[2].species, "E");
        assert_eq!(system.equations()[2].expression, "0");
    }

    #[test]
    fn test_delay_modifier_owns_no_slot() {
        let mut assembler = Assembler::new();
        assembler.fold(
            &reaction(
                &["A"],
                &[],
                &[Modifier::Delay {
                    species: "X".to_string(),
                    expression: "5.0".to_string(),
                }],
            ),
            "k*A",
        );
        let system = assembler.finish();
        assert_eq!(system.len(), 1);
        assert_eq!(system.index_of("X"), None);
    }

    #[test]
    fn test_modifier_seen_later_as_substrate() {
        let mut assembler = Assembler::new();
        assembler.fold(
            &reaction(&["A"], &[], &[Modifier::Species("E".to_string())]),
            "k1*A*E",
        );
        assembler.fold(&reaction(&["E"], &[], &[]), "k2*E");
        let system = assembler.finish();
        // E keeps its placeholder slot and accumulates the consumption term
        assert_eq!(system.index_of("E"), Some(2));
        assert_eq!(system.equations()[1].expression, "0 - k2*E");
    }

    #[test]
    fn test_encounter_order_within_reaction() {
        let mut assembler = Assembler::new();
        assembler.fold(
            &reaction(&["S"], &["P"], &[Modifier::Species("M".to_string())]),
            "v",
        );
        let system = assembler.finish();
        let species: Vec<_> = system.species().collect();
        assert_eq!(species, vec!["S", "P", "M"]);
    }
}
