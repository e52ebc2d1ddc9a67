
//! Pending per-label batches.
//!
//! A [`NodeSet`] accumulates items between flushes: `add`/`add_range` feed
//! the to-be-created batch, `merge`/`merge_range` the to-be-merged batch.
//! Items are flattened (and identifier-checked when enforcement is on) as
//! they come in, so a bad item fails at the call site and never poisons the
//! pending buffers. Buffers are cleared exactly once, after a successful
//! flush — a failed flush leaves them intact so the caller can retry.

use std::collections::BTreeMap;
use std::sync::Arc;

use ogma_core::config::ConfigRegistry;
use ogma_core::emit::{emit_create_single, emit_merge_single};
use ogma_core::error::OgmaError;
use ogma_core::flatten::{flatten, validate_identifiers};
use ogma_core::ident::param_ident;
use ogma_core::shape::ShapeNode;
use ogma_core::statement::Statement;
use ogma_core::value::Value;

use crate::query::MatchBuilder;

/// The pending batches of one label within a context.
pub struct NodeSet {
    label: String,
    index: usize,
    registry: Arc<ConfigRegistry>,
    creates: Vec<BTreeMap<String, Value>>,
    merges: Vec<BTreeMap<String, Value>>,
    create_singles: Vec<BTreeMap<String, Value>>,
    merge_singles: Vec<BTreeMap<String, Value>>,
}

impl NodeSet {
    pub(crate) fn new(label: String, index: usize, registry: Arc<ConfigRegistry>) -> Self {
        Self {
            label,
            index,
            registry,
            creates: Vec::new(),
            merges: Vec::new(),
            create_singles: Vec::new(),
            merge_singles: Vec::new(),
        }
    }

    /// The label this set writes.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start a match over this set's label.
    pub fn select(&self) -> MatchBuilder {
        MatchBuilder::node(&self.label)
    }

    /// Queue an instance for CREATE.
    pub fn add(&mut self, instance: impl Into<Value>) -> Result<(), OgmaError> {
        let map = self.prepare(instance.into())?;
        self.creates.push(map);
        Ok(())
    }

    /// Queue several instances for CREATE. Appends to the pending batch;
    /// ranges queued across multiple calls flush together.
    pub fn add_range<I, T>(&mut self, instances: I) -> Result<(), OgmaError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        for instance in instances {
            self.add(instance)?;
        }
        Ok(())
    }

    /// Queue an instance for MERGE.
    pub fn merge(&mut self, instance: impl Into<Value>) -> Result<(), OgmaError> {
        let map = self.prepare(instance.into())?;
        self.merges.push(map);
        Ok(())
    }

    /// Queue several instances for MERGE.
    pub fn merge_range<I, T>(&mut self, instances: I) -> Result<(), OgmaError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        for instance in instances {
            self.merge(instance)?;
        }
        Ok(())
    }

    /// Queue a scalar-only instance for an individually parameterized
    /// CREATE (`cp_` parameters instead of the UNWIND batch).
    pub fn create_single(&mut self, instance: impl Into<Value>) -> Result<(), OgmaError> {
        let map = self.prepare(instance.into())?;
        self.ensure_scalar(&map)?;
        self.create_singles.push(map);
        Ok(())
    }

    /// Queue a scalar-only instance for an individually parameterized MERGE.
    pub fn merge_single(&mut self, instance: impl Into<Value>) -> Result<(), OgmaError> {
        let map = self.prepare(instance.into())?;
        self.ensure_scalar(&map)?;
        self.merge_singles.push(map);
        Ok(())
    }

    /// Whether anything is queued for the next flush.
    pub fn has_pending(&self) -> bool {
        !self.creates.is_empty()
            || !self.merges.is_empty()
            || !self.create_singles.is_empty()
            || !self.merge_singles.is_empty()
    }

    fn prepare(&self, instance: Value) -> Result<BTreeMap<String, Value>, OgmaError> {
        let map = flatten(&instance, &self.label, &self.registry, None, 0)?.ok_or_else(|| {
            OgmaError::Mapping(format!("flattening '{}' produced nothing", self.label))
        })?;
        if self.registry.enforce_identifiers() {
            validate_identifiers(&map, &self.label, &self.registry, 0)?;
        }
        Ok(map)
    }

    fn ensure_scalar(&self, map: &BTreeMap<String, Value>) -> Result<(), OgmaError> {
        if let Some(config) = self.registry.get(&self.label) {
            for key in map.keys() {
                if config.relations.contains_key(key) {
                    return Err(OgmaError::Mapping(format!(
                        "single-item operations on '{}' cannot carry relation '{key}'; queue it with add or merge",
                        self.label
                    )));
                }
            }
        }
        Ok(())
    }

    /// Render this set's pending batches into statement fragments: the
    /// UNWIND batch create, the UNWIND batch merge, then the single items in
    /// queue order.
    pub(crate) fn build_fragments(&self) -> Result<Vec<Statement>, OgmaError> {
        let mut fragments = Vec::new();

        if !self.creates.is_empty() {
            let mut shape = ShapeNode::new(&self.label);
            shape.consider(&self.creates, &self.registry)?;
            let param = format!("{}_creates", param_ident(&self.label));
            let text = shape.emit_create(&param, self.index);
            fragments.push(Statement {
                text,
                parameters: collection_param(param, &self.creates),
            });
        }

        if !self.merges.is_empty() {
            let mut shape = ShapeNode::new(&self.label);
            shape.consider(&self.merges, &self.registry)?;
            let param = format!("{}_merges", param_ident(&self.label));
            let text = shape.emit_merge(&param, self.index);
            fragments.push(Statement {
                text,
                parameters: collection_param(param, &self.merges),
            });
        }

        for (item, map) in self.create_singles.iter().enumerate() {
            fragments.push(emit_create_single(map, &self.label, self.index, item));
        }

        let offset = self.create_singles.len();
        let empty = std::collections::BTreeSet::new();
        let identifiers = self
            .registry
            .get(&self.label)
            .map(|c| &c.identifiers)
            .unwrap_or(&empty);
        for (item, map) in self.merge_singles.iter().enumerate() {
            fragments.push(emit_merge_single(
                map,
                &self.label,
                identifiers,
                self.index,
                offset + item,
            ));
        }

        Ok(fragments)
    }

    /// Drop every pending batch. Called by the context after a successful
    /// flush, never on failure.
    pub(crate) fn clear(&mut self) {
        self.creates.clear();
        self.merges.clear();
        self.create_singles.clear();
        self.merge_singles.clear();
    }
}

fn collection_param(
    name: String,
    batch: &[BTreeMap<String, Value>],
) -> BTreeMap<String, Value> {
    let items: Vec<Value> = batch.iter().map(|m| Value::Map(m.clone())).collect();
    let mut parameters = BTreeMap::new();
    parameters.insert(name, Value::List(items));
    parameters
}
