//! The compilation pipeline: one pass over the reaction table
//!
//! Each reaction's rate-law template is resolved against the reaction's
//! argument lists, then folded into the running equation system. Per-reaction
//! failures are local: in the default lenient mode the offending reaction is
//! dropped with a diagnostic and the rest of the table still compiles, while
//! strict mode aborts on the first failure.

mod assembler;
pub(crate) mod delay;
mod resolver;

pub use assembler::{Assembler, Equation, EquationSystem};
pub use delay::{history_symbol, DelayEntry, DelayRegistry};
pub use resolver::{Resolved, ResolveError, Resolver};

use crate::emit::{EmitContext, Emitter, SourceNames, SymbolTable, SystemKind};
use crate::error::CompileError;
use crate::model::Tables;

/// Compilation policy and emission settings
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Abort on the first per-reaction failure instead of dropping the
    /// reaction and continuing
    pub strict: bool,
    /// Name of the emitted function
    pub function_name: String,
    /// Source-table names echoed into the header comment
    pub sources: Option<SourceNames>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict: false,
            function_name: "model!".to_string(),
            sources: None,
        }
    }
}

/// Counters reported alongside the compiled artifacts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    /// Reactions read from the table
    pub reactions: usize,
    /// Reactions dropped due to per-reaction failures (lenient mode only)
    pub dropped: usize,
    /// Equations in the emitted system
    pub equations: usize,
    /// Delay entries registered
    pub delays: usize,
}

/// The two output artifacts plus run metadata
#[derive(Debug, Clone)]
pub struct CompiledSystem {
    /// The emitted function source
    pub source: String,
    /// Species names, index-aligned with the state vector
    pub symbol_table: SymbolTable,
    /// ODE or DDE, depending on whether any delay modifier was resolved
    pub kind: SystemKind,
    pub stats: CompileStats,
}

/// Drives resolution, assembly, and emission over a loaded [`Tables`]
pub struct Compiler<'a> {
    tables: &'a Tables,
    options: &'a CompileOptions,
}

impl<'a> Compiler<'a> {
    pub fn new(tables: &'a Tables, options: &'a CompileOptions) -> Self {
        Self { tables, options }
    }

    /// Run the single-pass compilation
    pub fn compile(&self) -> Result<CompiledSystem, CompileError> {
        let resolver = Resolver::new(&self.tables.parameters);
        let mut delays = DelayRegistry::new();
        let mut assembler = Assembler::new();
        let mut dropped = 0usize;

        for (i, reaction) in self.tables.reactions.iter().enumerate() {
            // 1-based data rows, matching the source table minus its header
            let row = i + 1;

            let Some(law) = self.tables.rate_laws.get(&reaction.rate_law_id) else {
                let err = CompileError::UnknownRateLaw {
                    row,
                    id: reaction.rate_law_id.clone(),
                };
                if self.options.strict {
                    return Err(err);
                }
                tracing::error!(row, rate_law = %reaction.rate_law_id, "unknown rate law, reaction dropped");
                dropped += 1;
                continue;
            };

            let mark = delays.checkpoint();
            let resolved = match resolver.resolve(&law.body, reaction, &mut delays) {
                Ok(resolved) => resolved,
                Err(err) => {
                    // undo any delay registered before the failing pass
                    delays.rollback(mark);
                    if self.options.strict {
                        return Err(resolve_error(row, err));
                    }
                    tracing::warn!(row, %err, "template resolution failed, reaction dropped");
                    dropped += 1;
                    continue;
                }
            };

            for token in &resolved.unmatched_tokens {
                tracing::warn!(row, token = %token, "parameter token matched no ref, left as literal");
            }
            for name in &resolved.unknown_parameters {
                tracing::warn!(row, parameter = %name, "parameter ref missing from parameter table, token left as literal");
            }

            assembler.fold(reaction, &resolved.expression);
        }

        let system = assembler.finish();
        if system.is_empty() && dropped > 0 {
            return Err(CompileError::EmptySystem { dropped });
        }

        let emitter = Emitter::new(&system, &delays);
        let kind = emitter.kind();
        let context = EmitContext {
            function_name: self.options.function_name.clone(),
            sources: self.options.sources.clone(),
            parameter_count: self.tables.parameters.len(),
        };
        let source = emitter.emit(&context)?;
        let symbol_table = SymbolTable::from_system(&system);

        Ok(CompiledSystem {
            source,
            symbol_table,
            kind,
            stats: CompileStats {
                reactions: self.tables.reactions.len(),
                dropped,
                equations: system.len(),
                delays: delays.len(),
            },
        })
    }
}

/// Attach row context to a resolver error
fn resolve_error(row: usize, err: ResolveError) -> CompileError {
    match err {
        ResolveError::IndexOutOfRange {
            namespace,
            token,
            index,
            available,
        } => CompileError::IndexOutOfRange {
            row,
            namespace,
            token,
            index,
            available,
        },
        ResolveError::MalformedPlaceholder { namespace, token } => {
            CompileError::MalformedPlaceholder {
                row,
                namespace,
                token,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modifier, ParameterTable, RateLawTable, ReactionRecord};

    fn tables() -> Tables {
        Tables {
            rate_laws: RateLawTable::from_rows([
                ("mass_action", "{k}*[S1]"),
                ("mm", "{Vmax}*[S1]/({Km}+[S1])"),
            ]),
            parameters: ParameterTable::from_rows([
                ("k_1", "0.5"),
                ("Vmax_1", "10.0"),
                ("Km_1", "2.0"),
            ]),
            reactions: vec![
                ReactionRecord::new("mass_action")
                    .with_substrates(["A"])
                    .with_products(["B"])
                    .with_parameter_refs(["k_1"]),
                ReactionRecord::new("mm")
                    .with_substrates(["B"])
                    .with_products(["A"])
                    .with_parameter_refs(["Vmax_1", "Km_1"]),
            ],
        }
    }

    #[test]
    fn test_full_pipeline() {
        let tables = tables();
        let options = CompileOptions::default();
        let compiled = Compiler::new(&tables, &options).compile().unwrap();

        assert_eq!(compiled.kind, SystemKind::Ode);
        assert_eq!(compiled.stats.equations, 2);
        assert_eq!(compiled.stats.dropped, 0);
        assert!(compiled.source.contains("dy[1] = -0.5*A + 10.0*B/(2.0+B)"));
        assert!(compiled.source.contains("dy[2] = +0.5*A - 10.0*B/(2.0+B)"));
        assert_eq!(compiled.symbol_table.species(), ["A", "B"]);
    }

    #[test]
    fn test_idempotent_output() {
        let tables = tables();
        let options = CompileOptions::default();
        let first = Compiler::new(&tables, &options).compile().unwrap();
        let second = Compiler::new(&tables, &options).compile().unwrap();
        assert_eq!(first.source, second.source);
        assert_eq!(first.symbol_table, second.symbol_table);
    }

    #[test]
    fn test_unknown_rate_law_lenient_drops_reaction() {
        let mut tables = tables();
        tables.reactions[0].rate_law_id = "missing".to_string();
        let options = CompileOptions::default();
        let compiled = Compiler::new(&tables, &options).compile().unwrap();

        assert_eq!(compiled.stats.dropped, 1);
        // only the second reaction contributed; B is now encountered first
        assert_eq!(compiled.symbol_table.species(), ["B", "A"]);
    }

    #[test]
    fn test_unknown_rate_law_strict_aborts() {
        let mut tables = tables();
        tables.reactions[0].rate_law_id = "missing".to_string();
        let options = CompileOptions {
            strict: true,
            ..Default::default()
        };
        let err = Compiler::new(&tables, &options).compile().unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnknownRateLaw { row: 1, ref id } if id == "missing"
        ));
    }

    #[test]
    fn test_out_of_range_strict_carries_row() {
        let mut tables = tables();
        tables.rate_laws.insert(crate::model::RateLaw::new(
            "mass_action",
            "{k}*[S1]*[S2]",
        ));
        let options = CompileOptions {
            strict: true,
            ..Default::default()
        };
        let err = Compiler::new(&tables, &options).compile().unwrap_err();
        assert!(matches!(
            err,
            CompileError::IndexOutOfRange { row: 1, index: 2, available: 1, .. }
        ));
    }

    #[test]
    fn test_all_reactions_dropped_is_an_error() {
        let mut tables = tables();
        for reaction in &mut tables.reactions {
            reaction.rate_law_id = "missing".to_string();
        }
        let options = CompileOptions::default();
        let err = Compiler::new(&tables, &options).compile().unwrap_err();
        assert!(matches!(err, CompileError::EmptySystem { dropped: 2 }));
    }

    #[test]
    fn test_dropped_reaction_rolls_back_delays() {
        let mut tables = tables();
        tables.rate_laws.insert(crate::model::RateLaw::new(
            "mass_action",
            "{k}*[MOD1]*[MOD2]",
        ));
        tables.reactions[0] = ReactionRecord::new("mass_action")
            .with_substrates(["A"])
            .with_products(["B"])
            .with_modifiers([Modifier::Delay {
                species: "A".to_string(),
                expression: "3.0".to_string(),
            }])
            .with_parameter_refs(["k_1"]);

        let options = CompileOptions::default();
        let compiled = Compiler::new(&tables, &options).compile().unwrap();
        // [MOD1] registers a delay before [MOD2] fails; the drop rolls it back
        assert_eq!(compiled.stats.dropped, 1);
        assert_eq!(compiled.stats.delays, 0);
        assert_eq!(compiled.kind, SystemKind::Ode);
    }

    #[test]
    fn test_delay_makes_dde() {
        let mut tables = tables();
        tables
            .rate_laws
            .insert(crate::model::RateLaw::new("delayed", "{k}*[MOD1]"));
        tables.reactions.push(
            ReactionRecord::new("delayed")
                .with_substrates(["A"])
                .with_modifiers([Modifier::Delay {
                    species: "B".to_string(),
                    expression: "5.0".to_string(),
                }])
                .with_parameter_refs(["k_1"]),
        );

        let options = CompileOptions::default();
        let compiled = Compiler::new(&tables, &options).compile().unwrap();
        assert_eq!(compiled.kind, SystemKind::Dde);
        assert!(compiled.source.contains("tau_B_0 = 5.0"));
        assert!(compiled.source.contains("histindex_B = 2"));
    }
}
