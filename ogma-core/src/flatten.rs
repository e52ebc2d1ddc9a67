
//! The graph flattener.
//!
//! Converts one object instance — always a [`Value::Map`], whether it came
//! from a typed struct or a hand-built dictionary — into a flattened
//! property map ready for aggregation: relation properties recursively
//! flattened per the label's [`RelationConfig`], scalars admitted per the
//! include/exclude/merge-key rules, recursion capped so cyclic relation
//! graphs cannot descend forever.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ConfigRegistry;
use crate::error::OgmaError;
use crate::value::Value;

/// Relation nesting deeper than this flattens to nothing. Two levels cover
/// the supported save shapes; anything deeper is truncated rather than
/// followed, which is what breaks relation cycles.
const MAX_RELATION_DEPTH: usize = 1;

/// Flatten one instance of `label`.
///
/// `merge_filter`, when non-empty, is the owning relation's merge-key set:
/// only those far-node properties survive. Returns `Ok(None)` past the
/// recursion cap.
pub fn flatten(
    instance: &Value,
    label: &str,
    registry: &ConfigRegistry,
    merge_filter: Option<&BTreeSet<String>>,
    depth: usize,
) -> Result<Option<BTreeMap<String, Value>>, OgmaError> {
    if depth > MAX_RELATION_DEPTH {
        return Ok(None);
    }

    let map = match instance {
        Value::Map(m) => m,
        other => {
            return Err(OgmaError::Mapping(format!(
                "cannot flatten a non-map value for label '{label}': {other:?}"
            )))
        }
    };

    let config = registry.get(label);
    let merge_filter = merge_filter.filter(|f| !f.is_empty());
    let mut out = BTreeMap::new();

    for (raw_key, value) in map {
        let key = registry.property_name(raw_key);

        if let Some(relation) = config.and_then(|c| c.relations.get(&key)) {
            let far_label = relation.far_label().ok_or_else(|| {
                OgmaError::config(format!(
                    "relation '{key}' on label '{label}' has no target labels"
                ))
            })?;
            let filter = Some(&relation.merge_properties);

            match value {
                Value::List(items) => {
                    let mut flattened = Vec::with_capacity(items.len());
                    for item in items {
                        if let Some(m) = flatten(item, far_label, registry, filter, depth + 1)? {
                            flattened.push(Value::Map(m));
                        }
                    }
                    if !flattened.is_empty() {
                        out.insert(key, Value::List(flattened));
                    }
                }
                Value::Map(_) => {
                    if let Some(m) = flatten(value, far_label, registry, filter, depth + 1)? {
                        out.insert(key, Value::Map(m));
                    }
                }
                Value::Null => {}
                other => {
                    return Err(OgmaError::Mapping(format!(
                        "relation property '{key}' on label '{label}' holds a scalar: {other:?}"
                    )))
                }
            }
            continue;
        }

        // Scalar admission: an active merge filter wins outright, otherwise
        // the label's own include/exclude rules decide.
        let admitted = match merge_filter {
            Some(filter) => filter.contains(&key),
            None => config.map(|c| c.admits(&key)).unwrap_or(true),
        };
        if !admitted {
            continue;
        }

        // Nested nulls are pruned; root-level nulls survive so that absence
        // and null stay distinguishable for SET semantics.
        if depth > 0 && value.is_null() {
            continue;
        }

        // With no filters anywhere, default-valued timestamps are noise.
        let unfiltered = merge_filter.is_none() && config.map(|c| c.unfiltered()).unwrap_or(true);
        if unfiltered && is_default_timestamp(value) {
            continue;
        }

        out.insert(key, value.clone());
    }

    Ok(Some(out))
}

fn is_default_timestamp(value: &Value) -> bool {
    match value {
        Value::DateTime(dt) => dt.timestamp() == 0 && dt.timestamp_subsec_nanos() == 0,
        _ => false,
    }
}

/// Check a flattened map against its label's identifier configuration.
///
/// Fails when no identifier key is present at all, or when one is present
/// but null; recurses into relation values with the far label's
/// configuration. Only called when identifier enforcement is active.
pub fn validate_identifiers(
    map: &BTreeMap<String, Value>,
    label: &str,
    registry: &ConfigRegistry,
    depth: usize,
) -> Result<(), OgmaError> {
    let config = match registry.get(label) {
        Some(c) => c,
        None => return Ok(()),
    };

    if !config.identifiers.is_empty() {
        let mut any_present = false;
        for identifier in &config.identifiers {
            match map.get(identifier) {
                Some(Value::Null) => {
                    return Err(OgmaError::IdentifierNull {
                        label: label.to_string(),
                        property: identifier.clone(),
                        depth,
                    })
                }
                Some(_) => any_present = true,
                None => {}
            }
        }
        if !any_present {
            return Err(OgmaError::IdentifiersMissing {
                label: label.to_string(),
                depth,
            });
        }
    }

    for (key, relation) in &config.relations {
        let far_label = match relation.far_label() {
            Some(l) => l,
            None => continue,
        };
        match map.get(key) {
            Some(Value::Map(inner)) => {
                validate_identifiers(inner, far_label, registry, depth + 1)?;
            }
            Some(Value::List(items)) => {
                for item in items {
                    if let Value::Map(inner) = item {
                        validate_identifiers(inner, far_label, registry, depth + 1)?;
                    }
                }
            }
            _ => {}
        }
    }

    Ok(())
}
