//! Field specifications and validated domain schemas.
//!
//! A schema is an ordered list of [`FieldSpec`]s. Later fields may read the
//! values of earlier ones (integer bounds, enabled conditions) but never the
//! other way round; [`Schema::new`] rejects forward or unknown references so
//! that a bad schema fails when the catalog loads rather than mid-session.

use std::collections::HashSet;

use super::constraint::Constraints;
use super::errors::KnowledgeError;
use super::record::Record;
use super::value::Value;

/// An integer bound: a constant, or derived from an earlier integer field as
/// `field * times + plus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Fixed(i64),
    Field { field: String, times: i64, plus: i64 },
}

impl Bound {
    pub fn field(field: impl Into<String>) -> Self {
        Bound::Field {
            field: field.into(),
            times: 1,
            plus: 0,
        }
    }

    pub fn scaled(field: impl Into<String>, times: i64, plus: i64) -> Self {
        Bound::Field {
            field: field.into(),
            times,
            plus,
        }
    }

    pub fn dependency(&self) -> Option<&str> {
        match self {
            Bound::Fixed(_) => None,
            Bound::Field { field, .. } => Some(field),
        }
    }

    /// Resolves against the partially built record.
    pub fn resolve(&self, partial: &Record, owner: &str) -> Result<i64, KnowledgeError> {
        match self {
            Bound::Fixed(n) => Ok(*n),
            Bound::Field { field, times, plus } => {
                let value = partial.get(field).ok_or_else(|| {
                    KnowledgeError::configuration(
                        owner,
                        format!("bound depends on '{}', which was not sampled", field),
                    )
                })?;
                let base = value.as_int().ok_or_else(|| {
                    KnowledgeError::configuration(
                        owner,
                        format!("bound depends on '{}', which is not an integer", field),
                    )
                })?;
                Ok(base * times + plus)
            }
        }
    }
}

impl From<i64> for Bound {
    fn from(n: i64) -> Self {
        Bound::Fixed(n)
    }
}

impl From<i32> for Bound {
    fn from(n: i32) -> Self {
        Bound::Fixed(n as i64)
    }
}

/// How a field is sampled.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Uniform over `[min, max]`, inclusive.
    Integer { min: Bound, max: Bound },
    /// Uniform choice among fixed candidates.
    Categorical { choices: Vec<Value> },
    /// Uniform `false`/`true`.
    Boolean,
}

/// One field of a domain schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    enabled: Option<Constraints>,
}

impl FieldSpec {
    pub fn integer(name: impl Into<String>, min: impl Into<Bound>, max: impl Into<Bound>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Integer {
                min: min.into(),
                max: max.into(),
            },
            enabled: None,
        }
    }

    pub fn categorical<T: Into<Value>>(
        name: impl Into<String>,
        choices: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Categorical {
                choices: choices.into_iter().map(Into::into).collect(),
            },
            enabled: None,
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Boolean,
            enabled: None,
        }
    }

    /// Field is sampled only for records where `condition` holds over the
    /// fields sampled before it.
    pub fn enabled_when(mut self, condition: Constraints) -> Self {
        self.enabled = Some(condition);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn enabled(&self) -> Option<&Constraints> {
        self.enabled.as_ref()
    }

    /// Names of the fields this spec reads.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut deps = Vec::new();
        if let FieldKind::Integer { min, max } = &self.kind {
            deps.extend(min.dependency());
            deps.extend(max.dependency());
        }
        if let Some(condition) = &self.enabled {
            deps.extend(condition.keys());
        }
        deps
    }
}

/// A validated, ordered field list for one domain.
#[derive(Debug, Clone)]
pub struct Schema {
    domain: String,
    fields: Vec<FieldSpec>,
    required: Vec<String>,
}

impl Schema {
    /// Validates field order and parameters.
    ///
    /// # Errors
    ///
    /// `Configuration` naming the offending field when a name repeats, a
    /// field reads itself or a later/unknown field, a categorical field has
    /// no choices, or fixed integer bounds are inverted.
    pub fn new(domain: impl Into<String>, fields: Vec<FieldSpec>) -> Result<Self, KnowledgeError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for spec in &fields {
            if spec.name == "id" || seen.contains(spec.name.as_str()) {
                return Err(KnowledgeError::configuration(
                    &spec.name,
                    "duplicate or reserved field name",
                ));
            }
            for dep in spec.dependencies() {
                if !seen.contains(dep) {
                    return Err(KnowledgeError::configuration(
                        &spec.name,
                        format!("references '{}', which is not declared before it", dep),
                    ));
                }
            }
            match &spec.kind {
                FieldKind::Categorical { choices } if choices.is_empty() => {
                    return Err(KnowledgeError::configuration(&spec.name, "no choices"));
                }
                FieldKind::Integer {
                    min: Bound::Fixed(lo),
                    max: Bound::Fixed(hi),
                } if lo > hi => {
                    return Err(KnowledgeError::configuration(
                        &spec.name,
                        format!("min {} exceeds max {}", lo, hi),
                    ));
                }
                _ => {}
            }
            seen.insert(spec.name.as_str());
        }
        Ok(Self {
            domain: domain.into(),
            fields,
            required: Vec::new(),
        })
    }

    /// Parameters every lookup against this domain's knowledge base must name.
    pub fn with_required_parameters<S: Into<String>>(
        mut self,
        required: impl IntoIterator<Item = S>,
    ) -> Self {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn required_parameters(&self) -> &[String] {
        &self.required
    }
}
