//! # Predicate Language
//!
//! Composable boolean conditions evaluated against one record. A closed set
//! of kinds, evaluated by a single exhaustive match.
//!
//! Field paths are `/`-separated label sequences relative to the record, as
//! in `Signal_Real/Signalsystem/Wert`. A comparison against a missing field,
//! or against a value that does not read as the literal's type, is false.

use crate::{Record, TrackError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// OPERANDS
// =============================================================================

/// Typed right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Literal {
    /// Type a textual value: integer if it parses as one, then a finite
    /// decimal, otherwise text.
    #[must_use]
    pub fn infer(text: &str) -> Self {
        if let Ok(integer) = text.parse::<i64>() {
            return Self::Integer(integer);
        }
        match text.parse::<f64>() {
            Ok(real) if real.is_finite() => Self::Real(real),
            _ => Self::Text(text.to_string()),
        }
    }

    /// Order a record value against this literal, `None` if incomparable.
    fn compare(&self, value: &str) -> Option<Ordering> {
        match self {
            Self::Integer(expected) => value.trim().parse::<i64>().ok().map(|v| v.cmp(expected)),
            Self::Real(expected) => value
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|v| v.partial_cmp(expected)),
            Self::Text(expected) => Some(value.cmp(expected.as_str())),
        }
    }
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Operator {
    /// Two-character symbols first so `<=` is not read as `<`.
    const SYMBOLS: [(&'static str, Self); 6] = [
        ("!=", Self::NotEqual),
        ("<=", Self::LessOrEqual),
        (">=", Self::GreaterOrEqual),
        ("=", Self::Equal),
        ("<", Self::Less),
        (">", Self::Greater),
    ];

    const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Equal => matches!(ordering, Ordering::Equal),
            Self::NotEqual => !matches!(ordering, Ordering::Equal),
            Self::Less => matches!(ordering, Ordering::Less),
            Self::LessOrEqual => !matches!(ordering, Ordering::Greater),
            Self::Greater => matches!(ordering, Ordering::Greater),
            Self::GreaterOrEqual => !matches!(ordering, Ordering::Less),
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
        }
    }
}

// =============================================================================
// CONDITION
// =============================================================================

/// A boolean condition over one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// Compare the text at `path` with a typed literal.
    Compare {
        path: String,
        operator: Operator,
        value: Literal,
    },
    /// The path resolves.
    Exists(String),
    /// The record's own label equals this one.
    TypeIs(String),
    Constant(bool),
    /// All hold; empty is true.
    And(Vec<Condition>),
    /// Any holds; empty is false.
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Evaluate against `record`. Pure; short-circuits `And`/`Or`.
    #[must_use]
    pub fn evaluate(&self, record: &Record) -> bool {
        match self {
            Self::Compare {
                path,
                operator,
                value,
            } => record
                .value(path)
                .and_then(|text| value.compare(text))
                .is_some_and(|ordering| operator.holds(ordering)),
            Self::Exists(path) => record.field(path).is_some(),
            Self::TypeIs(label) => record.label() == label,
            Self::Constant(result) => *result,
            Self::And(conditions) => conditions.iter().all(|c| c.evaluate(record)),
            Self::Or(conditions) => conditions.iter().any(|c| c.evaluate(record)),
            Self::Not(condition) => !condition.evaluate(record),
        }
    }

    // =========================================================================
    // BUILDERS
    // =========================================================================

    #[must_use]
    pub fn compare(path: impl Into<String>, operator: Operator, value: Literal) -> Self {
        Self::Compare {
            path: path.into(),
            operator,
            value,
        }
    }

    #[must_use]
    pub fn exists(path: impl Into<String>) -> Self {
        Self::Exists(path.into())
    }

    #[must_use]
    pub fn type_is(label: impl Into<String>) -> Self {
        Self::TypeIs(label.into())
    }

    #[must_use]
    pub fn constant(value: bool) -> Self {
        Self::Constant(value)
    }

    #[must_use]
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self::And(conditions)
    }

    #[must_use]
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self::Or(conditions)
    }

    #[must_use]
    pub fn negate(condition: Condition) -> Self {
        Self::Not(Box::new(condition))
    }

    /// Parse `PATH OP VALUE`, e.g. `Signal_Real/Signalsystem/Wert=Ks`.
    ///
    /// The first operator character splits path from value; the value is
    /// typed with `Literal::infer`.
    pub fn parse_comparison(expression: &str) -> Result<Self, TrackError> {
        let split = expression
            .find(['=', '!', '<', '>'])
            .ok_or_else(|| TrackError::InvalidPredicate(format!("no operator in {expression:?}")))?;
        let (path, rest) = expression.split_at(split);

        let (operator, value) = Operator::SYMBOLS
            .iter()
            .find_map(|(symbol, op)| rest.strip_prefix(symbol).map(|v| (*op, v)))
            .ok_or_else(|| {
                TrackError::InvalidPredicate(format!("unknown operator in {expression:?}"))
            })?;

        let (path, value) = (path.trim(), value.trim());
        if path.is_empty() || value.is_empty() {
            return Err(TrackError::InvalidPredicate(format!(
                "empty path or value in {expression:?}"
            )));
        }
        Ok(Self::compare(path, operator, Literal::infer(value)))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, join: &str, items: &[Condition]) -> fmt::Result {
            f.write_str("(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {join} ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::Compare {
                path,
                operator,
                value,
            } => match value {
                Literal::Integer(v) => write!(f, "{path}{}{v}", operator.symbol()),
                Literal::Real(v) => write!(f, "{path}{}{v}", operator.symbol()),
                Literal::Text(v) => write!(f, "{path}{}{v:?}", operator.symbol()),
            },
            Self::Exists(path) => write!(f, "exists({path})"),
            Self::TypeIs(label) => write!(f, "type={label}"),
            Self::Constant(value) => write!(f, "{value}"),
            Self::And(items) if items.is_empty() => f.write_str("true"),
            Self::Or(items) if items.is_empty() => f.write_str("false"),
            Self::And(items) => list(f, "and", items),
            Self::Or(items) => list(f, "or", items),
            Self::Not(inner) => write!(f, "not {inner}"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
