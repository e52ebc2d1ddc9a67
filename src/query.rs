
//! The match/query surface.
//!
//! A [`MatchBuilder`] chains MATCH clauses — a starting label, then relation
//! traversals — with an optional [`Eloquent`] filter per step, and renders
//! terminal statements: list, first, count, any, row-lock, and update.
//! Aliases are `a{step}` for nodes and `r{step}` for relations; filter
//! parameters are `qp_{step}_{ordinal}` and update parameters
//! `up_{step}_{ordinal}`.

use std::collections::BTreeMap;

use ogma_core::config::Direction;
use ogma_core::eloquent::Eloquent;
use ogma_core::error::OgmaError;
use ogma_core::ident::{pattern_label, validate_property};
use ogma_core::statement::Statement;
use ogma_core::value::Value;

struct Link {
    edge: String,
    direction: Direction,
}

struct MatchStep {
    label: String,
    link: Option<Link>,
    filter: Option<Eloquent>,
}

/// Builder for MATCH-based read and update statements.
pub struct MatchBuilder {
    steps: Vec<MatchStep>,
}

impl MatchBuilder {
    /// Start matching nodes of `label` as alias `a0`.
    pub fn node(label: impl Into<String>) -> Self {
        Self {
            steps: vec![MatchStep {
                label: label.into(),
                link: None,
                filter: None,
            }],
        }
    }

    /// Attach a filter to the most recent step.
    pub fn filter(mut self, filter: Eloquent) -> Self {
        if let Some(step) = self.steps.last_mut() {
            step.filter = Some(filter);
        }
        self
    }

    /// Traverse an outgoing edge to nodes of `label`:
    /// `(a{n-1})-[r{n}:EDGE]->(a{n}:Label)`.
    pub fn related_out(self, edge: impl Into<String>, label: impl Into<String>) -> Self {
        self.push_step(edge, Direction::Out, label)
    }

    /// Traverse an incoming edge to nodes of `label`:
    /// `(a{n-1})<-[r{n}:EDGE]-(a{n}:Label)`.
    pub fn related_in(self, edge: impl Into<String>, label: impl Into<String>) -> Self {
        self.push_step(edge, Direction::In, label)
    }

    fn push_step(
        mut self,
        edge: impl Into<String>,
        direction: Direction,
        label: impl Into<String>,
    ) -> Self {
        self.steps.push(MatchStep {
            label: label.into(),
            link: Some(Link {
                edge: edge.into(),
                direction,
            }),
            filter: None,
        });
        self
    }

    /// Alias of the final step, the one terminals project.
    pub fn terminal_alias(&self) -> String {
        format!("a{}", self.steps.len() - 1)
    }

    fn render_matches(&self, params: &mut BTreeMap<String, Value>) -> Result<String, OgmaError> {
        let mut lines = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let alias = format!("a{index}");
            let filter_text = match &step.filter {
                Some(filter) => filter.to_cypher(&alias, index, params)?,
                None => String::new(),
            };
            let node_pattern = if filter_text.is_empty() {
                format!("({alias}:{})", pattern_label(&step.label))
            } else {
                format!("({alias}:{} WHERE {filter_text})", pattern_label(&step.label))
            };

            match &step.link {
                None => lines.push(format!("MATCH {node_pattern}")),
                Some(link) => {
                    let prev = format!("a{}", index - 1);
                    let rel = format!("r{index}");
                    let edge = pattern_label(&link.edge);
                    let line = match link.direction {
                        Direction::Out => {
                            format!("MATCH ({prev})-[{rel}:{edge}]->{node_pattern}")
                        }
                        Direction::In => {
                            format!("MATCH ({prev})<-[{rel}:{edge}]-{node_pattern}")
                        }
                    };
                    lines.push(line);
                }
            }
        }

        Ok(lines.join("\n"))
    }

    fn terminal(&self, clause: impl FnOnce(&str) -> String) -> Result<Statement, OgmaError> {
        let mut parameters = BTreeMap::new();
        let matches = self.render_matches(&mut parameters)?;
        let alias = self.terminal_alias();
        Ok(Statement {
            text: format!("{matches}\n{}", clause(&alias)),
            parameters,
        })
    }

    /// `WITH DISTINCT a{n}` then `RETURN a{n}` — all matched rows.
    pub fn to_cypher_list(&self) -> Result<Statement, OgmaError> {
        self.terminal(|alias| format!("WITH DISTINCT {alias}\nRETURN {alias}"))
    }

    /// Like [`to_cypher_list`](Self::to_cypher_list) with `LIMIT 1`.
    pub fn to_cypher_first(&self) -> Result<Statement, OgmaError> {
        self.terminal(|alias| format!("WITH DISTINCT {alias}\nRETURN {alias} LIMIT 1"))
    }

    /// `RETURN count(a{n}) as count`.
    pub fn to_cypher_count(&self) -> Result<Statement, OgmaError> {
        self.terminal(|alias| format!("RETURN count({alias}) as count"))
    }

    /// `RETURN count(a{n}) > 0 as any`.
    pub fn to_cypher_any(&self) -> Result<Statement, OgmaError> {
        self.terminal(|alias| format!("RETURN count({alias}) > 0 as any"))
    }

    /// `SET a{n}._LOCK_ = true` — row-locking within a transaction.
    pub fn to_cypher_lock(&self) -> Result<Statement, OgmaError> {
        self.terminal(|alias| format!("SET {alias}._LOCK_ = true"))
    }

    /// `SET a{n}.<prop> = $up_{n}_{ordinal}, ...` over the matched nodes.
    ///
    /// Every value is externalized as an `up_` parameter; property keys are
    /// validated like filter keys.
    pub fn to_cypher_update(
        &self,
        changes: &BTreeMap<String, Value>,
    ) -> Result<Statement, OgmaError> {
        if changes.is_empty() {
            return Err(OgmaError::Expression("update with no properties".into()));
        }

        let mut parameters = BTreeMap::new();
        let matches = self.render_matches(&mut parameters)?;
        let alias = self.terminal_alias();
        let match_index = self.steps.len() - 1;

        let mut assignments = Vec::with_capacity(changes.len());
        for (ordinal, (key, value)) in changes.iter().enumerate() {
            let key = validate_property(key)?;
            let param = format!("up_{match_index}_{ordinal}");
            assignments.push(format!("{alias}.{key} = ${param}"));
            parameters.insert(param, value.clone());
        }

        Ok(Statement {
            text: format!("{matches}\nSET {}", assignments.join(", ")),
            parameters,
        })
    }
}
