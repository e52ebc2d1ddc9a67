
//! Node configuration and the write-once registry.
//!
//! Configuration is registered explicitly at startup through
//! [`ConfigRegistryBuilder`] — one [`NodeConfiguration`] per label, each
//! holding property include/exclude rules, identifier properties, and
//! relation definitions. The built [`ConfigRegistry`] is immutable; contexts
//! receive it by `Arc` handle, so tests get isolation by constructing fresh
//! registries instead of resetting globals.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::OgmaError;

/// Direction of a relation as seen from the owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Edge points from the far node to the owner: `(owner)<-[:E]-(far)`.
    In,
    /// Edge points from the owner to the far node: `(owner)-[:E]->(far)`.
    Out,
}

/// Case conversion applied when deriving graph property names from source
/// field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameCase {
    /// Keys pass through unchanged.
    #[default]
    Preserve,
    /// `release_date` becomes `ReleaseDate`.
    Pascal,
    /// `release_date` becomes `releaseDate`.
    Camel,
}

impl NameCase {
    /// Apply this conversion to a property key.
    pub fn apply(&self, key: &str) -> String {
        match self {
            NameCase::Preserve => key.to_string(),
            NameCase::Pascal => convert_case(key, true),
            NameCase::Camel => convert_case(key, false),
        }
    }
}

fn convert_case(key: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = capitalize_first;
    for c in key.chars() {
        if c == '_' || c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Definition of one relation property on a node configuration.
#[derive(Debug, Clone)]
pub struct RelationConfig {
    /// The edge type (e.g. `"ACTED_IN"`).
    pub label: String,
    /// Edge direction as seen from the owning node.
    pub direction: Direction,
    /// Labels of the far node. Multiple entries support polymorphic relation
    /// targets, one label per concrete implementing type.
    pub end_node_labels: Vec<String>,
    /// When non-empty, only these far-node properties survive flattening for
    /// this relation and form the MERGE key pattern. All other far-node
    /// properties are dropped, which keeps a save from re-creating or
    /// overwriting far nodes that already exist.
    pub merge_properties: BTreeSet<String>,
}

impl RelationConfig {
    /// A relation over `edge` in the given direction, with no target labels
    /// yet. Chain [`target`](Self::target) at least once.
    pub fn new(edge: impl Into<String>, direction: Direction) -> Self {
        Self {
            label: edge.into(),
            direction,
            end_node_labels: Vec::new(),
            merge_properties: BTreeSet::new(),
        }
    }

    /// Add a far-node label.
    pub fn target(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !self.end_node_labels.contains(&label) {
            self.end_node_labels.push(label);
        }
        self
    }

    /// Restrict the far node to this merge-key property.
    pub fn merge_on(mut self, property: impl Into<String>) -> Self {
        self.merge_properties.insert(property.into());
        self
    }

    /// The far label the aggregated shape uses. Polymorphic configurations
    /// resolve to their first target label.
    pub fn far_label(&self) -> Option<&str> {
        self.end_node_labels.first().map(|s| s.as_str())
    }
}

/// Per-label node metadata: property rules, identifiers, relations.
#[derive(Debug, Clone, Default)]
pub struct NodeConfiguration {
    /// Properties written to the graph. Mutually exclusive with
    /// `excluded_properties`; both empty means everything is included.
    pub included_properties: BTreeSet<String>,
    /// Properties never written to the graph.
    pub excluded_properties: BTreeSet<String>,
    /// Properties used as MERGE match keys and checked by identifier
    /// enforcement.
    pub identifiers: BTreeSet<String>,
    /// Relation definitions keyed by property name.
    pub relations: BTreeMap<String, RelationConfig>,
}

impl NodeConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a property as included.
    pub fn include(mut self, property: impl Into<String>) -> Self {
        self.included_properties.insert(property.into());
        self
    }

    /// Mark a property as excluded.
    pub fn exclude(mut self, property: impl Into<String>) -> Self {
        self.excluded_properties.insert(property.into());
        self
    }

    /// Mark a property as an identifier.
    pub fn identifier(mut self, property: impl Into<String>) -> Self {
        self.identifiers.insert(property.into());
        self
    }

    /// Define a relation under the given property name.
    pub fn relation(mut self, property: impl Into<String>, config: RelationConfig) -> Self {
        self.relations.insert(property.into(), config);
        self
    }

    /// Whether the include/exclude rules admit this property.
    pub fn admits(&self, property: &str) -> bool {
        if !self.included_properties.is_empty() {
            self.included_properties.contains(property)
        } else if !self.excluded_properties.is_empty() {
            !self.excluded_properties.contains(property)
        } else {
            true
        }
    }

    /// Whether this configuration carries no property filters at all.
    pub fn unfiltered(&self) -> bool {
        self.included_properties.is_empty() && self.excluded_properties.is_empty()
    }

    fn validate(&self, label: &str) -> Result<(), OgmaError> {
        if !self.included_properties.is_empty() && !self.excluded_properties.is_empty() {
            return Err(OgmaError::config(format!(
                "label '{label}' declares both included and excluded properties"
            )));
        }
        for (property, relation) in &self.relations {
            if relation.end_node_labels.is_empty() {
                return Err(OgmaError::config(format!(
                    "relation '{property}' on label '{label}' has no target labels"
                )));
            }
        }
        Ok(())
    }
}

/// Immutable, process-lifetime lookup table of node configurations.
///
/// Built once by [`ConfigRegistryBuilder`]; read-only thereafter.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    configs: BTreeMap<String, NodeConfiguration>,
    enforce_identifiers: bool,
    name_case: NameCase,
}

impl ConfigRegistry {
    /// Look up the configuration for a label.
    pub fn get(&self, label: &str) -> Option<&NodeConfiguration> {
        self.configs.get(label)
    }

    /// Whether identifier enforcement is active.
    pub fn enforce_identifiers(&self) -> bool {
        self.enforce_identifiers
    }

    /// Derive the graph property name for a source key.
    pub fn property_name(&self, key: &str) -> String {
        self.name_case.apply(key)
    }
}

/// Builder for [`ConfigRegistry`]. Registration order is irrelevant;
/// duplicate labels are a configuration error.
#[derive(Debug, Default)]
pub struct ConfigRegistryBuilder {
    configs: BTreeMap<String, NodeConfiguration>,
    enforce_identifiers: bool,
    name_case: NameCase,
}

impl ConfigRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail flattening when a batch item lacks a non-null identifier value.
    pub fn enforce_identifiers(mut self, on: bool) -> Self {
        self.enforce_identifiers = on;
        self
    }

    /// Case conversion applied when deriving graph property names.
    pub fn name_case(mut self, case: NameCase) -> Self {
        self.name_case = case;
        self
    }

    /// Register the configuration for a label.
    pub fn register(
        mut self,
        label: impl Into<String>,
        config: NodeConfiguration,
    ) -> Result<Self, OgmaError> {
        let label = label.into();
        if self.configs.contains_key(&label) {
            return Err(OgmaError::config(format!(
                "label '{label}' is registered more than once"
            )));
        }
        self.configs.insert(label, config);
        Ok(self)
    }

    /// Validate every registered configuration and freeze the registry.
    pub fn build(self) -> Result<ConfigRegistry, OgmaError> {
        for (label, config) in &self.configs {
            config.validate(label)?;
        }
        Ok(ConfigRegistry {
            configs: self.configs,
            enforce_identifiers: self.enforce_identifiers,
            name_case: self.name_case,
        })
    }
}
