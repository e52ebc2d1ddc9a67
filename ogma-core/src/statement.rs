
//! Statement fragments.
//!
//! Every emission produces a [`Statement`] — Cypher text plus its parameter
//! map. A flush collects the fragments of all touched node sets in order and
//! joins them only at execution time, with an inert `WITH 0 AS nothing`
//! separator resetting variable scope between unrelated subgraphs.

use std::collections::BTreeMap;

use crate::value::Value;

/// Separator chained between fragments of one flush.
pub const FRAGMENT_SEPARATOR: &str = "\nWITH 0 AS nothing\n";

/// One parameterized Cypher statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    /// The Cypher text. Never contains caller values; those live in
    /// `parameters`.
    pub text: String,
    /// Named parameters referenced by `text`.
    pub parameters: BTreeMap<String, Value>,
}

impl Statement {
    /// A statement with no parameters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a named parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Whether this statement has parameters.
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Join fragments into the single statement a flush executes.
    ///
    /// Parameter names are disjoint by construction (set-indexed batch
    /// collections, cp_/qp_/up_ numbering), so the maps union cleanly.
    /// Returns `None` when there is nothing to run.
    pub fn join(fragments: Vec<Statement>) -> Option<Statement> {
        let mut fragments = fragments.into_iter().filter(|f| !f.text.is_empty());
        let first = fragments.next()?;

        let mut text = first.text;
        let mut parameters = first.parameters;
        for fragment in fragments {
            text.push_str(FRAGMENT_SEPARATOR);
            text.push_str(&fragment.text);
            parameters.extend(fragment.parameters);
        }

        Some(Statement { text, parameters })
    }
}
