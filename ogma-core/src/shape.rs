
//! The node aggregator.
//!
//! A batch of flattened maps for one label rarely shares an exact shape:
//! some items carry a relation others lack, or different property subsets.
//! One UNWIND-driven statement has to work for every element, so the batch
//! is folded into a [`ShapeNode`] — the union of identifiers, properties,
//! and relation children observed anywhere in the batch. The emitter then
//! renders that least-common-denominator schema once.

use std::collections::BTreeMap;

use crate::config::{ConfigRegistry, Direction};
use crate::error::OgmaError;
use crate::value::Value;

/// Edge metadata a relation child carries into emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationBinding {
    /// The edge type (e.g. `"ACTED_IN"`).
    pub edge: String,
    /// Edge direction as seen from the parent node.
    pub direction: Direction,
}

/// The aggregated shape of one label across a batch.
///
/// Rebuilt fresh per save cycle and discarded after emission.
#[derive(Debug)]
pub struct ShapeNode {
    /// The node label this shape describes.
    pub label: String,
    /// Relation nesting depth; the root shape sits at 0.
    pub depth: usize,
    /// Edge metadata when this shape is a relation target.
    pub relation: Option<RelationBinding>,
    /// Identifier properties observed in the batch, first-seen order.
    pub identifiers: Vec<String>,
    /// Non-identifier properties observed in the batch, first-seen order.
    pub properties: Vec<String>,
    /// To-one relation children, keyed by relation property name.
    pub single_relations: BTreeMap<String, ShapeNode>,
    /// To-many relation children, keyed by relation property name.
    pub multiple_relations: BTreeMap<String, ShapeNode>,
}

impl ShapeNode {
    /// An empty shape for `label` at the root of a batch.
    pub fn new(label: impl Into<String>) -> Self {
        Self::at_depth(label, 0, None)
    }

    fn at_depth(label: impl Into<String>, depth: usize, relation: Option<RelationBinding>) -> Self {
        Self {
            label: label.into(),
            depth,
            relation,
            identifiers: Vec::new(),
            properties: Vec::new(),
            single_relations: BTreeMap::new(),
            multiple_relations: BTreeMap::new(),
        }
    }

    /// Fold a batch of flattened maps into this shape.
    ///
    /// Idempotent to re-invocation with further batches: keys already seen
    /// are not duplicated. When identifier enforcement is active and the
    /// label configures identifiers, a batch that never produces one fails.
    pub fn consider(
        &mut self,
        batch: &[BTreeMap<String, Value>],
        registry: &ConfigRegistry,
    ) -> Result<&mut Self, OgmaError> {
        for map in batch {
            self.consider_one(map, registry)?;
        }

        if registry.enforce_identifiers() && !batch.is_empty() {
            if let Some(config) = registry.get(&self.label) {
                if !config.identifiers.is_empty() && self.identifiers.is_empty() {
                    return Err(OgmaError::IdentifiersMissing {
                        label: self.label.clone(),
                        depth: self.depth,
                    });
                }
            }
        }

        Ok(self)
    }

    fn consider_one(
        &mut self,
        map: &BTreeMap<String, Value>,
        registry: &ConfigRegistry,
    ) -> Result<(), OgmaError> {
        let config = registry.get(&self.label);

        for (key, value) in map {
            let relation = config.and_then(|c| c.relations.get(key));

            if let Some(relation) = relation {
                let far_label = relation.far_label().ok_or_else(|| {
                    OgmaError::config(format!(
                        "relation '{key}' on label '{}' has no target labels",
                        self.label
                    ))
                })?;
                let binding = RelationBinding {
                    edge: relation.label.clone(),
                    direction: relation.direction,
                };

                match value {
                    Value::Map(inner) => {
                        let depth = self.depth;
                        let child = self
                            .single_relations
                            .entry(key.clone())
                            .or_insert_with(|| {
                                ShapeNode::at_depth(far_label, depth + 1, Some(binding))
                            });
                        child.consider_one(inner, registry)?;
                    }
                    Value::List(items) => {
                        let depth = self.depth;
                        let child = self
                            .multiple_relations
                            .entry(key.clone())
                            .or_insert_with(|| {
                                ShapeNode::at_depth(far_label, depth + 1, Some(binding))
                            });
                        for item in items {
                            if let Value::Map(inner) = item {
                                child.consider_one(inner, registry)?;
                            }
                        }
                    }
                    _ => {}
                }
                continue;
            }

            // A property candidate needs a non-null observation somewhere in
            // the batch.
            if value.is_null() {
                continue;
            }

            let is_identifier = config
                .map(|c| c.identifiers.contains(key))
                .unwrap_or(false);
            let bucket = if is_identifier {
                &mut self.identifiers
            } else {
                &mut self.properties
            };
            if !bucket.contains(key) {
                bucket.push(key.clone());
            }
        }

        Ok(())
    }

    /// Whether the shape carries nothing to emit.
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
            && self.properties.is_empty()
            && self.single_relations.is_empty()
            && self.multiple_relations.is_empty()
    }
}
