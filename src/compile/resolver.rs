//! Placeholder resolution for rate-law templates
//!
//! A template is rewritten in four fixed passes, each a full scan of the
//! current text: substrates (`[S<n>]`), products (`[P<n>]`), modifiers
//! (`[MOD<n>]`), then parameters (`{name}`). Bracket and brace groups that
//! do not form a token of the pass being run are copied through unchanged,
//! so the passes are independent of one another.

use std::convert::Infallible;

use thiserror::Error;

use crate::compile::delay::{self, DelayRegistry};
use crate::error::Namespace;
use crate::model::{Modifier, ParameterTable, ReactionRecord};

/// Errors local to one reaction's template resolution
///
/// These carry no row context; the compiler attaches the reaction's row
/// number when it decides whether to drop the reaction or abort.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// A placeholder references a list position the reaction does not provide
    #[error(
        "{namespace} placeholder '{token}' references position {index}, \
         but the reaction lists {available} entries"
    )]
    IndexOutOfRange {
        namespace: Namespace,
        token: String,
        index: usize,
        available: usize,
    },

    /// A token matched a namespace letter but carried no usable 1-based index
    #[error("malformed {namespace} placeholder '{token}'")]
    MalformedPlaceholder { namespace: Namespace, token: String },
}

/// The outcome of resolving one reaction's template
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The expression with all four passes applied
    pub expression: String,
    /// `{name}` tokens that matched no parameter ref and were left literal
    pub unmatched_tokens: Vec<String>,
    /// Parameter refs that matched a token but are absent from the table
    pub unknown_parameters: Vec<String>,
}

/// Resolves rate-law templates against reaction records
pub struct Resolver<'a> {
    parameters: &'a ParameterTable,
}

impl<'a> Resolver<'a> {
    pub fn new(parameters: &'a ParameterTable) -> Self {
        Self { parameters }
    }

    /// Resolve a template body against one reaction
    ///
    /// Registers every `delay(...)` modifier encountered in `delays`; the
    /// caller is responsible for rolling the registry back if it decides to
    /// drop the reaction afterwards.
    pub fn resolve(
        &self,
        template: &str,
        reaction: &ReactionRecord,
        delays: &mut DelayRegistry,
    ) -> Result<Resolved, ResolveError> {
        let text = substitute_positional(template, Namespace::Substrate, &reaction.substrates)?;
        let text = substitute_positional(&text, Namespace::Product, &reaction.products)?;
        let text = substitute_modifiers(&text, reaction, delays)?;
        Ok(self.substitute_parameters(&text, reaction))
    }

    /// Parameter pass: `{name}` matches the first parameter ref whose type
    /// prefix equals `name` exactly; the ref's stored value text is spliced
    /// in verbatim. Tokens that match nothing are left as literals.
    fn substitute_parameters(&self, text: &str, reaction: &ReactionRecord) -> Resolved {
        let mut unmatched_tokens = Vec::new();
        let mut unknown_parameters = Vec::new();

        let expression = scan_groups(text, '{', '}', |name| -> Result<Option<String>, Infallible> {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Ok(None);
            }
            // first-match-wins over the reaction's parameter refs
            match reaction
                .parameter_refs
                .iter()
                .find(|r| r.type_prefix() == name)
            {
                Some(r) => match self.parameters.get(&r.name) {
                    Some(value) => Ok(Some(value.to_string())),
                    None => {
                        unknown_parameters.push(r.name.clone());
                        Ok(None)
                    }
                },
                None => {
                    unmatched_tokens.push(name.to_string());
                    Ok(None)
                }
            }
        })
        .unwrap_or_else(|never| match never {});

        Resolved {
            expression,
            unmatched_tokens,
            unknown_parameters,
        }
    }
}

/// Substrate/product pass over one namespace's list
fn substitute_positional(
    text: &str,
    namespace: Namespace,
    list: &[String],
) -> Result<String, ResolveError> {
    scan_groups(text, '[', ']', |content| {
        let Some(index) = positional_index(content, namespace)? else {
            return Ok(None);
        };
        match list.get(index - 1) {
            Some(species) => Ok(Some(species.clone())),
            None => Err(ResolveError::IndexOutOfRange {
                namespace,
                token: format!("[{content}]"),
                index,
                available: list.len(),
            }),
        }
    })
}

/// Modifier pass: plain modifiers substitute their species name; delay
/// modifiers register a lag and substitute a history-lookup call
fn substitute_modifiers(
    text: &str,
    reaction: &ReactionRecord,
    delays: &mut DelayRegistry,
) -> Result<String, ResolveError> {
    scan_groups(text, '[', ']', |content| {
        let Some(index) = positional_index(content, Namespace::Modifier)? else {
            return Ok(None);
        };
        let modifier = reaction
            .modifiers
            .get(index - 1)
            .ok_or(ResolveError::IndexOutOfRange {
                namespace: Namespace::Modifier,
                token: format!("[{content}]"),
                index,
                available: reaction.modifiers.len(),
            })?;
        match modifier {
            Modifier::Species(name) => Ok(Some(name.clone())),
            Modifier::Delay {
                species,
                expression,
            } => {
                let entry = delays.register(species, expression);
                Ok(Some(format!(
                    "h(p, t - {}; idxs={})",
                    entry.lag_symbol(),
                    delay::history_symbol(species)
                )))
            }
        }
    })
}

/// Parse a bracket group's content as a positional token of `namespace`
///
/// Returns `Ok(Some(n))` for a well-formed token with 1-based index `n`,
/// `Ok(None)` when the content does not belong to this namespace (and must
/// be copied through untouched), and an error when the namespace letters
/// match but the index is missing, non-numeric-suffixed, or zero.
fn positional_index(content: &str, namespace: Namespace) -> Result<Option<usize>, ResolveError> {
    let digits = match namespace {
        Namespace::Substrate | Namespace::Product => {
            let letter = if namespace == Namespace::Substrate {
                'S'
            } else {
                'P'
            };
            let mut chars = content.chars();
            match chars.next() {
                Some(c) if c.eq_ignore_ascii_case(&letter) => chars.as_str(),
                _ => return Ok(None),
            }
        }
        Namespace::Modifier => {
            // get(..3) also rejects contents whose byte 3 is inside a
            // multibyte char, which can never start with "mod"
            match content.get(..3) {
                Some(prefix) if prefix.eq_ignore_ascii_case("mod") => &content[3..],
                _ => return Ok(None),
            }
        }
        Namespace::Parameter => return Ok(None),
    };

    if digits.is_empty() {
        return Err(ResolveError::MalformedPlaceholder {
            namespace,
            token: format!("[{content}]"),
        });
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        // not a token of this namespace at all (e.g. a species named S1a)
        return Ok(None);
    }
    match digits.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ResolveError::MalformedPlaceholder {
            namespace,
            token: format!("[{content}]"),
        }),
    }
}

/// Scan `text` for `open`...`close` groups, invoking `replace` on each
/// group's content. `Ok(Some(_))` substitutes, `Ok(None)` leaves the group
/// text in place. Text outside groups and an unterminated trailing `open`
/// are copied verbatim.
///
/// After a non-matching group, scanning resumes just past its opener
/// rather than past its closer, so a token nested behind a stray opener
/// (`[a[S1]]`) is still found.
fn scan_groups<F, E>(text: &str, open: char, close: char, mut replace: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<Option<String>, E>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        out.push_str(&rest[..start]);
        let after = &rest[start + open.len_utf8()..];
        let Some(end) = after.find(close) else {
            out.push(open);
            rest = after;
            continue;
        };
        match replace(&after[..end])? {
            Some(replacement) => {
                out.push_str(&replacement);
                rest = &after[end + close.len_utf8()..];
            }
            None => {
                out.push(open);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}
