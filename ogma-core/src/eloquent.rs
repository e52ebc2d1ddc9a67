
//! The Eloquent filter builder.
//!
//! A filter expression is an ordered sequence of conjunction groups
//! (AND/OR/XOR), each holding comparison members. Building is a small state
//! machine over the current group: `and()`/`or()`/`xor()` append and switch
//! to a new group, `where_*` calls append members to the current group only.
//!
//! Every concrete comparison value is externalized into a
//! `qp_{matchIndex}_{ordinal}` parameter — never interpolated into the
//! Cypher text. Property keys are caller-controlled and validated against
//! the identifier grammar at render time; an invalid key surfaces as an
//! expression error instead of being rendered.

use std::collections::BTreeMap;

use crate::error::OgmaError;
use crate::ident::validate_property;
use crate::value::Value;

/// Comparison operators available to `where_op`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    Contains,
    StartsWith,
    EndsWith,
}

impl Operator {
    fn as_cypher(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "<>",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEquals => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEquals => "<=",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS WITH",
            Operator::EndsWith => "ENDS WITH",
        }
    }
}

/// How the members of one group (and the group itself) join to what came
/// before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
    Xor,
}

impl Conjunction {
    fn keyword(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
            Conjunction::Xor => "XOR",
        }
    }
}

#[derive(Debug, Clone)]
enum Member {
    /// `alias.prop OP $qp_n_m`
    Compare {
        property: String,
        operator: Operator,
        value: Value,
    },
    /// `alias.prop IS NULL` / `alias.prop IS NOT NULL` — no parameter,
    /// since Cypher's `= NULL` is never true.
    NullCheck { property: String, negated: bool },
    /// `alias.prop IN $qp_n_m` / `NOT alias.prop IN $qp_n_m` with one
    /// array-valued parameter.
    InList {
        property: String,
        values: Vec<Value>,
        negated: bool,
    },
}

#[derive(Debug, Clone)]
struct Group {
    conjunction: Conjunction,
    members: Vec<Member>,
}

/// Builder for one WHERE-clause fragment.
#[derive(Debug, Clone)]
pub struct Eloquent {
    groups: Vec<Group>,
}

impl Default for Eloquent {
    fn default() -> Self {
        Self::new()
    }
}

impl Eloquent {
    /// Start with one implicit AND group.
    pub fn new() -> Self {
        Self {
            groups: vec![Group {
                conjunction: Conjunction::And,
                members: Vec::new(),
            }],
        }
    }

    /// Append a new AND group and make it current.
    pub fn and(self) -> Self {
        self.push_group(Conjunction::And)
    }

    /// Append a new OR group and make it current.
    pub fn or(self) -> Self {
        self.push_group(Conjunction::Or)
    }

    /// Append a new XOR group and make it current.
    pub fn xor(self) -> Self {
        self.push_group(Conjunction::Xor)
    }

    fn push_group(mut self, conjunction: Conjunction) -> Self {
        self.groups.push(Group {
            conjunction,
            members: Vec::new(),
        });
        self
    }

    /// Equality comparison. A null value renders as `IS NULL`.
    pub fn where_value(self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_op(property, Operator::Equals, value)
    }

    /// Comparison with an explicit operator. Null under `Equals`/`NotEquals`
    /// rewrites to `IS NULL`/`IS NOT NULL`.
    pub fn where_op(
        mut self,
        property: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        let property = property.into();
        let value = value.into();
        let member = match (&value, operator) {
            (Value::Null, Operator::Equals) => Member::NullCheck {
                property,
                negated: false,
            },
            (Value::Null, Operator::NotEquals) => Member::NullCheck {
                property,
                negated: true,
            },
            _ => Member::Compare {
                property,
                operator,
                value,
            },
        };
        self.push_member(member);
        self
    }

    /// Membership test with a single array-valued parameter.
    pub fn where_in(mut self, property: impl Into<String>, values: Vec<Value>) -> Self {
        self.push_member(Member::InList {
            property: property.into(),
            values,
            negated: false,
        });
        self
    }

    /// Negated membership test.
    pub fn where_not_in(mut self, property: impl Into<String>, values: Vec<Value>) -> Self {
        self.push_member(Member::InList {
            property: property.into(),
            values,
            negated: true,
        });
        self
    }

    fn push_member(&mut self, member: Member) {
        // new() guarantees at least one group
        if let Some(group) = self.groups.last_mut() {
            group.members.push(member);
        }
    }

    /// Whether no comparison has been added.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.members.is_empty())
    }

    /// Render this expression against `alias`, externalizing values as
    /// `qp_{match_index}_{ordinal}` into `params`.
    ///
    /// Groups with more than one member are parenthesized; a lone member
    /// renders bare. The first non-empty group's conjunction keyword is
    /// dropped since it has no preceding clause.
    pub fn to_cypher(
        &self,
        alias: &str,
        match_index: usize,
        params: &mut BTreeMap<String, Value>,
    ) -> Result<String, OgmaError> {
        let mut out = String::new();
        let mut ordinal = 0;

        for group in self.groups.iter().filter(|g| !g.members.is_empty()) {
            let rendered: Result<Vec<String>, OgmaError> = group
                .members
                .iter()
                .map(|m| render_member(m, alias, match_index, &mut ordinal, params))
                .collect();
            let rendered = rendered?;

            let joined = rendered.join(&format!(" {} ", group.conjunction.keyword()));
            let fragment = if rendered.len() > 1 {
                format!("({joined})")
            } else {
                joined
            };

            if out.is_empty() {
                out = fragment;
            } else {
                out.push_str(&format!(" {} {}", group.conjunction.keyword(), fragment));
            }
        }

        Ok(out)
    }
}

fn render_member(
    member: &Member,
    alias: &str,
    match_index: usize,
    ordinal: &mut usize,
    params: &mut BTreeMap<String, Value>,
) -> Result<String, OgmaError> {
    let mut bind = |value: Value| {
        let name = format!("qp_{match_index}_{ordinal}");
        *ordinal += 1;
        params.insert(name.clone(), value);
        name
    };

    match member {
        Member::Compare {
            property,
            operator,
            value,
        } => {
            let property = validate_property(property)?;
            let param = bind(value.clone());
            Ok(format!(
                "{alias}.{property} {} ${param}",
                operator.as_cypher()
            ))
        }
        Member::NullCheck { property, negated } => {
            let property = validate_property(property)?;
            if *negated {
                Ok(format!("{alias}.{property} IS NOT NULL"))
            } else {
                Ok(format!("{alias}.{property} IS NULL"))
            }
        }
        Member::InList {
            property,
            values,
            negated,
        } => {
            let property = validate_property(property)?;
            let param = bind(Value::List(values.clone()));
            if *negated {
                Ok(format!("NOT {alias}.{property} IN ${param}"))
            } else {
                Ok(format!("{alias}.{property} IN ${param}"))
            }
        }
    }
}
