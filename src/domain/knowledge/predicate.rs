//! Constraint predicates.
//!
//! Unary tests over a record field. Every constructor is pure and
//! composition happens by wrapping (`not(at_least(3))`), never by mutating an
//! existing predicate. A predicate receives `None` when the record has no
//! value for the field and answers `false` for it, except for `Not`, which
//! negates whatever the wrapped predicate answered.
//!
//! Predicates render back to the constructor syntax understood by the query
//! expression language, so `at_least(3)` displays as `atLeast(3)`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::value::{quote, Value};

type TestFn = dyn Fn(Option<&Value>) -> bool + Send + Sync;

/// A unary test over an optional field value.
#[derive(Clone)]
pub enum Predicate {
    /// `x == v`
    EqualTo(Value),
    /// `v` is an element (or substring) of `x`
    Contains(Value),
    /// `x` is one of the listed values
    OneOf(Vec<Value>),
    /// `x >= v`
    AtLeast(Value),
    /// `x <= v`
    AtMost(Value),
    /// every listed value is in `x`
    AllOf(Vec<Value>),
    /// every element of `x` is among the listed values
    ///
    /// The check runs from the record side, which is the opposite direction
    /// of [`Predicate::AllOf`].
    AnyOf(Vec<Value>),
    /// negation of the wrapped predicate
    Not(Box<Predicate>),
    /// `x` is text occurring inside `v`
    Substring(String),
    /// business-rule predicate built in code
    Custom { label: String, test: Arc<TestFn> },
}

impl Predicate {
    /// Applies the predicate to a field value.
    pub fn test(&self, value: Option<&Value>) -> bool {
        match self {
            Predicate::Not(inner) => !inner.test(value),
            Predicate::Custom { test, .. } => test(value),
            _ => match value {
                Some(x) => self.test_present(x),
                None => false,
            },
        }
    }

    fn test_present(&self, x: &Value) -> bool {
        match self {
            Predicate::EqualTo(v) => x == v,
            Predicate::Contains(v) => x.contains(v),
            Predicate::OneOf(values) => values.contains(x),
            Predicate::AtLeast(v) => matches!(
                x.compare(v),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            Predicate::AtMost(v) => {
                matches!(x.compare(v), Some(Ordering::Less) | Some(Ordering::Equal))
            }
            Predicate::AllOf(values) => values.iter().all(|e| x.contains(e)),
            Predicate::AnyOf(values) => x.elements().iter().all(|e| values.contains(e)),
            Predicate::Substring(v) => x.as_text().map(|s| v.contains(s)).unwrap_or(false),
            Predicate::Not(_) | Predicate::Custom { .. } => self.test(Some(x)),
        }
    }

    /// Constructor name used when rendering this predicate.
    pub fn constructor_name(&self) -> &str {
        match self {
            Predicate::EqualTo(_) => "equalTo",
            Predicate::Contains(_) => "contains",
            Predicate::OneOf(_) => "oneOf",
            Predicate::AtLeast(_) => "atLeast",
            Predicate::AtMost(_) => "atMost",
            Predicate::AllOf(_) => "allOf",
            Predicate::AnyOf(_) => "anyOf",
            Predicate::Not(_) => "not",
            Predicate::Substring(_) => "substring",
            Predicate::Custom { label, .. } => label,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.constructor_name();
        match self {
            Predicate::EqualTo(v)
            | Predicate::Contains(v)
            | Predicate::AtLeast(v)
            | Predicate::AtMost(v) => write!(f, "{}({})", name, v.to_expression()),
            Predicate::OneOf(values) | Predicate::AllOf(values) | Predicate::AnyOf(values) => {
                let list = Value::List(values.clone());
                write!(f, "{}({})", name, list.to_expression())
            }
            Predicate::Not(inner) => write!(f, "not({})", inner),
            Predicate::Substring(v) => write!(f, "substring({})", quote(v)),
            Predicate::Custom { label, .. } => write!(f, "{}", label),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self)
    }
}

pub fn equal_to(v: impl Into<Value>) -> Predicate {
    Predicate::EqualTo(v.into())
}

pub fn contains(v: impl Into<Value>) -> Predicate {
    Predicate::Contains(v.into())
}

pub fn one_of<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Predicate {
    Predicate::OneOf(values.into_iter().map(Into::into).collect())
}

pub fn at_least(v: impl Into<Value>) -> Predicate {
    Predicate::AtLeast(v.into())
}

pub fn at_most(v: impl Into<Value>) -> Predicate {
    Predicate::AtMost(v.into())
}

pub fn all_of<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Predicate {
    Predicate::AllOf(values.into_iter().map(Into::into).collect())
}

pub fn any_of<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Predicate {
    Predicate::AnyOf(values.into_iter().map(Into::into).collect())
}

pub fn not(predicate: Predicate) -> Predicate {
    Predicate::Not(Box::new(predicate))
}

pub fn substring(v: impl Into<String>) -> Predicate {
    Predicate::Substring(v.into())
}

/// Wraps a closure as a predicate; `label` is what the predicate renders as.
pub fn custom<F>(label: impl Into<String>, test: F) -> Predicate
where
    F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
{
    Predicate::Custom {
        label: label.into(),
        test: Arc::new(test),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    mod comparisons {
        use super::*;

        #[test]
        fn at_least_is_inclusive() {
            let p = at_least(3);
            assert!(p.test(Some(&int(3))));
            assert!(p.test(Some(&int(5))));
            assert!(!p.test(Some(&int(2))));
        }

        #[test]
        fn at_most_is_inclusive() {
            let p = at_most(3);
            assert!(p.test(Some(&int(3))));
            assert!(!p.test(Some(&int(4))));
        }

        #[test]
        fn comparisons_reject_mixed_kinds() {
            assert!(!at_least(3).test(Some(&Value::from("10"))));
        }
    }

    mod membership {
        use super::*;

        #[test]
        fn contains_checks_element_of_record_value() {
            let p = contains("wifi");
            assert!(p.test(Some(&Value::from(vec!["wifi", "pool"]))));
            assert!(!p.test(Some(&Value::from(vec!["pool"]))));
        }

        #[test]
        fn one_of_checks_record_value_in_set() {
            let p = one_of(["north", "south"]);
            assert!(p.test(Some(&Value::from("north"))));
            assert!(!p.test(Some(&Value::from("east"))));
        }

        #[test]
        fn all_of_requires_every_listed_value_in_record() {
            let p = all_of(["red", "blue"]);
            assert!(p.test(Some(&Value::from(vec!["red", "blue", "green"]))));
            assert!(!p.test(Some(&Value::from(vec!["red"]))));
        }

        // anyOf checks the record side against the supplied set, not the
        // other way round. A record holding a value outside the set fails even
        // though it shares an element with it.
        #[test]
        fn any_of_requires_every_record_element_in_set() {
            let p = any_of(["red", "blue"]);
            assert!(p.test(Some(&Value::from(vec!["red"]))));
            assert!(p.test(Some(&Value::from(vec!["red", "blue"]))));
            assert!(!p.test(Some(&Value::from(vec!["red", "green"]))));
        }

        #[test]
        fn any_of_treats_scalar_as_single_element() {
            let p = any_of(["red", "blue"]);
            assert!(p.test(Some(&Value::from("blue"))));
            assert!(!p.test(Some(&Value::from("green"))));
        }

        #[test]
        fn substring_checks_record_text_inside_argument() {
            let p = substring("Grand Budapest Hotel");
            assert!(p.test(Some(&Value::from("Budapest"))));
            assert!(!p.test(Some(&Value::from("Paris"))));
        }
    }

    mod missing_values {
        use super::*;

        #[test]
        fn absent_field_fails_plain_predicates() {
            assert!(!equal_to(1).test(None));
            assert!(!at_least(0).test(None));
            assert!(!one_of([1, 2]).test(None));
        }

        #[test]
        fn not_negates_absent_result() {
            assert!(not(equal_to(1)).test(None));
        }
    }

    mod rendering {
        use super::*;

        #[test]
        fn renders_constructor_syntax() {
            assert_eq!(at_least(3).to_string(), "atLeast(3)");
            assert_eq!(one_of(["a", "b"]).to_string(), "oneOf(['a', 'b'])");
            assert_eq!(not(equal_to(true)).to_string(), "not(equalTo(True))");
            assert_eq!(substring("x").to_string(), "substring('x')");
        }

        #[test]
        fn custom_renders_its_label() {
            let p = custom("isEven", |v| v.and_then(Value::as_int).map(|n| n % 2 == 0).unwrap_or(false));
            assert_eq!(p.to_string(), "isEven");
            assert!(p.test(Some(&int(4))));
            assert!(!p.test(Some(&int(5))));
        }
    }
}
