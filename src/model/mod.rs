//! Data model for the three input tables
//!
//! The compiler consumes three already-materialized tables: rate-law
//! templates, named parameter values, and the ordered reaction list.
//! All three are built once (see [`crate::tables`] for the CSV front end)
//! and are immutable during compilation.

mod parameter;
mod ratelaw;
mod reaction;

pub use parameter::{Parameter, ParameterTable};
pub use ratelaw::{RateLaw, RateLawTable};
pub use reaction::{Modifier, ParameterRef, ReactionRecord};

use serde::{Deserialize, Serialize};

/// The fully-loaded input to the compiler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tables {
    pub rate_laws: RateLawTable,
    pub parameters: ParameterTable,
    pub reactions: Vec<ReactionRecord>,
}
