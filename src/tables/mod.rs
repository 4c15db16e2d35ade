//! CSV front end for the three input tables
//!
//! Each table is a headered CSV; the header row is skipped and columns are
//! read positionally. Reaction-table list cells (substrates, products,
//! modifiers, parameters) are whitespace-delimited within the cell, so an
//! empty cell is an empty list.
//!
//! Column layout:
//! - rate laws: `id, template`
//! - parameters: `name, value`
//! - reactions: `substrates, products, ratelaw, modifiers, parameters`

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::CompileError;
use crate::model::{
    Modifier, Parameter, ParameterTable, RateLaw, RateLawTable, ReactionRecord, Tables,
};

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>, CompileError> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| CompileError::csv(path.display().to_string(), e))
}

fn required<'r>(
    record: &'r StringRecord,
    column: usize,
    table: &str,
    row: usize,
) -> Result<&'r str, CompileError> {
    record.get(column).ok_or_else(|| {
        CompileError::malformed_row(table, row, format!("missing column {}", column + 1))
    })
}

/// Whitespace-delimited list cell; absent or empty cells are empty lists
fn list_cell(record: &StringRecord, column: usize) -> Vec<String> {
    record
        .get(column)
        .unwrap_or("")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Read the rate-law table (`id, template`)
pub fn read_rate_laws(path: impl AsRef<Path>) -> Result<RateLawTable, CompileError> {
    let path = path.as_ref();
    let table_name = path.display().to_string();
    let mut table = RateLawTable::new();

    for (i, result) in reader(path)?.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| CompileError::csv(&table_name, e))?;
        let id = required(&record, 0, &table_name, row)?;
        let body = required(&record, 1, &table_name, row)?;
        table.insert(RateLaw::new(id, body));
    }

    tracing::info!(table = %table_name, laws = table.len(), "loaded rate-law table");
    Ok(table)
}

/// Read the parameter table (`name, value`); values are kept as text
pub fn read_parameters(path: impl AsRef<Path>) -> Result<ParameterTable, CompileError> {
    let path = path.as_ref();
    let table_name = path.display().to_string();
    let mut table = ParameterTable::new();

    for (i, result) in reader(path)?.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| CompileError::csv(&table_name, e))?;
        let name = required(&record, 0, &table_name, row)?;
        let value = required(&record, 1, &table_name, row)?;
        table.insert(Parameter::new(name, value));
    }

    tracing::info!(table = %table_name, parameters = table.len(), "loaded parameter table");
    Ok(table)
}

/// Read the reaction table, preserving row order
pub fn read_reactions(path: impl AsRef<Path>) -> Result<Vec<ReactionRecord>, CompileError> {
    let path = path.as_ref();
    let table_name = path.display().to_string();
    let mut reactions = Vec::new();

    for (i, result) in reader(path)?.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| CompileError::csv(&table_name, e))?;
        let rate_law_id = required(&record, 2, &table_name, row)?.to_string();

        let mut modifiers = Vec::new();
        for token in list_cell(&record, 3) {
            let modifier = Modifier::parse(&token).ok_or(CompileError::MalformedModifier {
                row,
                token: token.clone(),
            })?;
            modifiers.push(modifier);
        }

        reactions.push(
            ReactionRecord::new(rate_law_id)
                .with_substrates(list_cell(&record, 0))
                .with_products(list_cell(&record, 1))
                .with_modifiers(modifiers)
                .with_parameter_refs(list_cell(&record, 4)),
        );
    }

    tracing::info!(table = %table_name, reactions = reactions.len(), "loaded reaction table");
    Ok(reactions)
}

/// Load all three tables
pub fn load(
    reactions: impl AsRef<Path>,
    parameters: impl AsRef<Path>,
    rate_laws: impl AsRef<Path>,
) -> Result<Tables, CompileError> {
    Ok(Tables {
        rate_laws: read_rate_laws(rate_laws)?,
        parameters: read_parameters(parameters)?,
        reactions: read_reactions(reactions)?,
    })
}
