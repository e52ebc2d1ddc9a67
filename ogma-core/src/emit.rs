
//! The Cypher emitter.
//!
//! Walks an aggregated [`ShapeNode`] tree and renders one batch statement:
//! `UNWIND` over the collection parameter, `CREATE` or `MERGE` for the root,
//! a `FOREACH` block per to-many relation, and a guarded single-iteration
//! `FOREACH` per to-one relation (Cypher's substitute for a conditional
//! clause). Relation targets are always MERGEd — they are expected to often
//! exist already, and a blind CREATE would duplicate them; only the root
//! honors the caller's CREATE-vs-MERGE intent.
//!
//! Aliases are deterministic: `c{set}`/`m{set}` for the root, `cuv{set}`/
//! `muv{set}` for its unwind variable, and `m{set}_{depth}_{sibling}` /
//! `muv{set}_{depth}_{sibling}` for relation targets, with the sibling
//! counter running across all relations at a given depth. Collision-free by
//! construction, and stable enough for tests to assert exact text.
//!
//! Property names and labels are drawn from configuration and flattened
//! keys and are interpolated into the statement text (labels backtick-escaped
//! when needed). Caller *values* never are; they travel in parameters.

use std::collections::BTreeMap;

use tracing::trace;

use crate::ident::pattern_label;
use crate::shape::{RelationBinding, ShapeNode};
use crate::statement::Statement;
use crate::value::Value;
use crate::config::Direction;

struct EmitState {
    buf: String,
    set_index: usize,
    // depth -> next sibling index among relations at that depth
    siblings: BTreeMap<usize, usize>,
}

impl EmitState {
    fn new(set_index: usize) -> Self {
        Self {
            buf: String::new(),
            set_index,
            siblings: BTreeMap::new(),
        }
    }

    fn next_sibling(&mut self, depth: usize) -> usize {
        let counter = self.siblings.entry(depth).or_insert(0);
        let sibling = *counter;
        *counter += 1;
        sibling
    }
}

impl ShapeNode {
    /// Render the batch CREATE statement for this shape.
    ///
    /// Identifiers and properties are all written via SET — never in the
    /// creation pattern, where they would pick up MERGE-like
    /// de-duplication semantics.
    pub fn emit_create(&self, collection_param: &str, set_index: usize) -> String {
        trace!(label = %self.label, set_index, "emitting batch create");
        let mut state = EmitState::new(set_index);
        let unwind_var = format!("cuv{set_index}");
        let alias = format!("c{set_index}");

        state.buf.push_str(&format!(
            "UNWIND ${collection_param} AS {unwind_var}\nCREATE ({alias}:{})",
            pattern_label(&self.label)
        ));

        let set_keys: Vec<&String> = self.identifiers.iter().chain(self.properties.iter()).collect();
        push_set_clause(&mut state.buf, &alias, &unwind_var, &set_keys);

        self.emit_relations(&mut state, &unwind_var, &alias);
        state.buf
    }

    /// Render the batch MERGE statement for this shape.
    ///
    /// Identifiers form the match pattern and never reappear in SET; the
    /// remaining properties are written via SET.
    pub fn emit_merge(&self, collection_param: &str, set_index: usize) -> String {
        trace!(label = %self.label, set_index, "emitting batch merge");
        let mut state = EmitState::new(set_index);
        let unwind_var = format!("muv{set_index}");
        let alias = format!("m{set_index}");

        state.buf.push_str(&format!(
            "UNWIND ${collection_param} AS {unwind_var}\n"
        ));
        let (pattern_keys, set_keys) = self.merge_key_split();
        push_merge_pattern(&mut state.buf, &alias, &self.label, &unwind_var, &pattern_keys);
        push_set_clause(&mut state.buf, &alias, &unwind_var, &set_keys);

        self.emit_relations(&mut state, &unwind_var, &alias);
        state.buf
    }

    /// Pattern keys and SET keys for merging this shape: identifiers when
    /// present, otherwise every property merges as the key and nothing is
    /// SET.
    fn merge_key_split(&self) -> (Vec<&String>, Vec<&String>) {
        if self.identifiers.is_empty() {
            (self.properties.iter().collect(), Vec::new())
        } else {
            (
                self.identifiers.iter().collect(),
                self.properties.iter().collect(),
            )
        }
    }

    fn emit_relations(&self, state: &mut EmitState, parent_var: &str, parent_alias: &str) {
        for (key, child) in &self.single_relations {
            child.emit_single(state, key, parent_var, parent_alias);
        }
        for (key, child) in &self.multiple_relations {
            child.emit_multiple(state, key, parent_var, parent_alias);
        }
    }

    /// A to-one relation: a guarded single-iteration FOREACH, far-node
    /// access through the parent path.
    fn emit_single(&self, state: &mut EmitState, key: &str, parent_var: &str, parent_alias: &str) {
        let sibling = state.next_sibling(self.depth);
        let guard_var = format!("muv{}_{}_{}", state.set_index, self.depth, sibling);
        let alias = format!("m{}_{}_{}", state.set_index, self.depth, sibling);
        let accessor = format!("{parent_var}.{key}");

        let top_level = self.depth == 1;
        state.buf.push_str(if top_level { "\n" } else { " " });
        state.buf.push_str(&format!(
            "FOREACH ({guard_var} IN CASE WHEN {accessor} IS NOT NULL THEN [1] ELSE [] END |"
        ));
        self.emit_target(state, &alias, &accessor, parent_alias);
        state.buf.push(')');
    }

    /// A to-many relation: FOREACH over the parent's list property.
    fn emit_multiple(&self, state: &mut EmitState, key: &str, parent_var: &str, parent_alias: &str) {
        let sibling = state.next_sibling(self.depth);
        let item_var = format!("muv{}_{}_{}", state.set_index, self.depth, sibling);
        let alias = format!("m{}_{}_{}", state.set_index, self.depth, sibling);

        let top_level = self.depth == 1;
        state.buf.push_str(if top_level { "\n" } else { " " });
        state
            .buf
            .push_str(&format!("FOREACH ({item_var} IN {parent_var}.{key} |"));
        self.emit_target(state, &alias, &item_var, parent_alias);
        state.buf.push(')');
    }

    /// MERGE this shape as a relation target, connect it to its parent, and
    /// descend into its own relations.
    fn emit_target(&self, state: &mut EmitState, alias: &str, accessor: &str, parent_alias: &str) {
        let (pattern_keys, set_keys) = self.merge_key_split();
        state.buf.push(' ');
        push_merge_pattern(&mut state.buf, alias, &self.label, accessor, &pattern_keys);
        push_set_clause(&mut state.buf, alias, accessor, &set_keys);

        if let Some(binding) = &self.relation {
            state.buf.push(' ');
            state.buf.push_str(&edge_merge(parent_alias, alias, binding));
        }

        self.emit_relations(state, accessor, alias);
    }
}

fn push_merge_pattern(
    buf: &mut String,
    alias: &str,
    label: &str,
    accessor: &str,
    pattern_keys: &[&String],
) {
    if pattern_keys.is_empty() {
        buf.push_str(&format!("MERGE ({alias}:{})", pattern_label(label)));
        return;
    }
    let pairs: Vec<String> = pattern_keys
        .iter()
        .map(|k| format!("{k}: {accessor}.{k}"))
        .collect();
    buf.push_str(&format!(
        "MERGE ({alias}:{} {{{}}})",
        pattern_label(label),
        pairs.join(", ")
    ));
}

fn push_set_clause(buf: &mut String, alias: &str, accessor: &str, keys: &[&String]) {
    if keys.is_empty() {
        return;
    }
    let pairs: Vec<String> = keys
        .iter()
        .map(|k| format!("{alias}.{k} = {accessor}.{k}"))
        .collect();
    buf.push_str(&format!(" SET {}", pairs.join(", ")));
}

fn edge_merge(parent_alias: &str, alias: &str, binding: &RelationBinding) -> String {
    match binding.direction {
        Direction::Out => format!("MERGE ({parent_alias})-[:{}]->({alias})", binding.edge),
        Direction::In => format!("MERGE ({parent_alias})<-[:{}]-({alias})", binding.edge),
    }
}

// ---------------------------------------------------------------------------
// Single-item statements (cp_ parameters)
// ---------------------------------------------------------------------------

/// Render a single-item CREATE, externalizing every property value as
/// `cp_{set}_{item}_{ordinal}`.
pub fn emit_create_single(
    map: &BTreeMap<String, Value>,
    label: &str,
    set_index: usize,
    item_index: usize,
) -> Statement {
    let alias = format!("c{set_index}");
    let mut statement = Statement::new(format!("CREATE ({alias}:{})", pattern_label(label)));

    let mut assignments = Vec::with_capacity(map.len());
    for (ordinal, (key, value)) in map.iter().enumerate() {
        let param = format!("cp_{set_index}_{item_index}_{ordinal}");
        assignments.push(format!("{alias}.{key} = ${param}"));
        statement.parameters.insert(param, value.clone());
    }
    if !assignments.is_empty() {
        statement.text.push_str(&format!(" SET {}", assignments.join(", ")));
    }
    statement
}

/// Render a single-item MERGE: identifier keys in the match pattern, the
/// rest via SET, all values externalized as `cp_{set}_{item}_{ordinal}`.
///
/// `identifiers` is the label's configured identifier set; when none of them
/// appear in the map, every property merges as part of the pattern.
pub fn emit_merge_single(
    map: &BTreeMap<String, Value>,
    label: &str,
    identifiers: &std::collections::BTreeSet<String>,
    set_index: usize,
    item_index: usize,
) -> Statement {
    let alias = format!("m{set_index}");
    let has_identifier = map.keys().any(|k| identifiers.contains(k));

    let mut statement = Statement::default();
    let mut pattern = Vec::new();
    let mut assignments = Vec::new();
    for (ordinal, (key, value)) in map.iter().enumerate() {
        let param = format!("cp_{set_index}_{item_index}_{ordinal}");
        if !has_identifier || identifiers.contains(key) {
            pattern.push(format!("{key}: ${param}"));
        } else {
            assignments.push(format!("{alias}.{key} = ${param}"));
        }
        statement.parameters.insert(param, value.clone());
    }

    statement.text = if pattern.is_empty() {
        format!("MERGE ({alias}:{})", pattern_label(label))
    } else {
        format!("MERGE ({alias}:{} {{{}}})", pattern_label(label), pattern.join(", "))
    };
    if !assignments.is_empty() {
        statement.text.push_str(&format!(" SET {}", assignments.join(", ")));
    }
    statement
}
