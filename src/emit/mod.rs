//! Rendering of the assembled system into Julia source plus a symbol table
//!
//! The emitter is a pure rendering step: by the time it runs, the equation
//! system and delay registry are read-only. If any delay entries exist the
//! function is emitted as a DDE right-hand side whose signature takes the
//! history function `h`; otherwise it is a plain ODE right-hand side.

use serde::{Deserialize, Serialize};

use crate::compile::{delay, DelayRegistry, EquationSystem};
use crate::error::CompileError;

/// Whether the emitted system is a plain ODE or a delay system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemKind {
    Ode,
    Dde,
}

impl SystemKind {
    pub fn is_delayed(&self) -> bool {
        matches!(self, SystemKind::Dde)
    }
}

/// Names of the three source tables, echoed into the header comment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceNames {
    pub reactions: String,
    pub parameters: String,
    pub rate_laws: String,
}

/// The species-name sidecar, index-aligned with the state vector
///
/// Line `i` of the rendered form names the species at state index `i`
/// (1-based, matching the emitted `y[i]` slots).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    species: Vec<String>,
}

impl SymbolTable {
    pub fn from_system(system: &EquationSystem) -> Self {
        Self {
            species: system.species().map(str::to_string).collect(),
        }
    }

    /// Species names in state-index order
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// The 1-based state index of a species
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s == name).map(|p| p + 1)
    }

    /// The species at a 1-based state index
    pub fn name_at(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.species.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Render as text, one species per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for name in &self.species {
            out.push_str(name);
            out.push('\n');
        }
        out
    }

    /// Read back a rendered sidecar
    pub fn parse(text: &str) -> Self {
        Self {
            species: text.lines().map(str::to_string).collect(),
        }
    }

    /// JSON form of the sidecar
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Rendering context for one emission
#[derive(Debug, Clone)]
pub struct EmitContext {
    /// Name of the emitted function (e.g. `model!`)
    pub function_name: String,
    /// Source-table names for the header comment, if known
    pub sources: Option<SourceNames>,
    /// Parameter count reported in the header
    pub parameter_count: usize,
}

/// Renders an assembled equation system as a Julia function body
pub struct Emitter<'a> {
    system: &'a EquationSystem,
    delays: &'a DelayRegistry,
}

impl<'a> Emitter<'a> {
    pub fn new(system: &'a EquationSystem, delays: &'a DelayRegistry) -> Self {
        Self { system, delays }
    }

    pub fn kind(&self) -> SystemKind {
        if self.delays.is_empty() {
            SystemKind::Ode
        } else {
            SystemKind::Dde
        }
    }

    /// Render the complete function source
    pub fn emit(&self, context: &EmitContext) -> Result<String, CompileError> {
        let kind = self.kind();
        let mut out = String::new();

        // header comment block
        out.push_str(&format!(
            "# {}: autogenerated reaction-network {} right-hand side\n",
            context.function_name,
            match kind {
                SystemKind::Ode => "ODE",
                SystemKind::Dde => "DDE",
            }
        ));
        out.push_str(&format!(
            "# equations: {}, parameters: {}\n",
            self.system.len(),
            context.parameter_count
        ));
        if let Some(sources) = &context.sources {
            out.push_str(&format!(
                "# sources: reactions={} parameters={} ratelaws={}\n",
                sources.reactions, sources.parameters, sources.rate_laws
            ));
        }

        match kind {
            SystemKind::Ode => {
                out.push_str(&format!("function {}(dy, y, p, t)\n", context.function_name))
            }
            SystemKind::Dde => out.push_str(&format!(
                "function {}(dy, y, h, p, t)\n",
                context.function_name
            )),
        }

        // state bindings, in index order
        for equation in self.system.equations() {
            out.push_str(&format!("    {} = y[{}]\n", equation.species, equation.index));
        }

        // lag parameters and history indices
        if !self.delays.is_empty() {
            for entry in self.delays.entries() {
                out.push_str(&format!(
                    "    {} = {}\n",
                    entry.lag_symbol(),
                    entry.expression
                ));
            }
            for species in self.delays.distinct_species() {
                let index = self.system.index_of(species).ok_or_else(|| {
                    CompileError::DelayedSpeciesUnknown {
                        species: species.to_string(),
                    }
                })?;
                out.push_str(&format!(
                    "    {} = {}\n",
                    delay::history_symbol(species),
                    index
                ));
            }
        }

        // one comment + equation pair per species
        for equation in self.system.equations() {
            out.push_str(&format!("    # {}\n", equation.species));
            out.push_str(&format!(
                "    dy[{}] = {}\n",
                equation.index, equation.expression
            ));
        }

        out.push_str("    return nothing\nend\n");
        Ok(out)
    }
}
