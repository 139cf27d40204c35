//! Query predicates over raw documents
//!
//! A `Predicate` is built by the domain layer and handed to a
//! [`DocumentStore`](super::DocumentStore) as-is. Backends either evaluate it
//! in process ([`Predicate::matches`]) or compile it to their own query
//! language.

use serde_json::Value;

use super::RawDocument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every document
    MatchAll,

    /// Field is a string exactly equal to `value`
    Eq { field: &'static str, value: String },

    /// Case-insensitive literal substring match. On a list field, any string
    /// element may match.
    Contains { field: &'static str, needle: String },

    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(field: &'static str, value: impl Into<String>) -> Self {
        Self::Eq {
            field,
            value: value.into(),
        }
    }

    pub fn contains(field: &'static str, needle: impl Into<String>) -> Self {
        Self::Contains {
            field,
            needle: needle.into(),
        }
    }

    /// Conjunction of `clauses`. Collapses to `MatchAll` when empty and to the
    /// clause itself when there is only one.
    pub fn all_of(mut clauses: Vec<Predicate>) -> Self {
        match clauses.len() {
            0 => Self::MatchAll,
            1 => clauses.remove(0),
            _ => Self::And(clauses),
        }
    }

    /// Disjunction of `clauses`. An empty disjunction matches nothing.
    pub fn any_of(mut clauses: Vec<Predicate>) -> Self {
        match clauses.len() {
            1 => clauses.remove(0),
            _ => Self::Or(clauses),
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::MatchAll)
    }

    /// Evaluate against a document held in memory.
    pub fn matches(&self, doc: &RawDocument) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Eq { field, value } => {
                matches!(doc.get(*field), Some(Value::String(s)) if s == value)
            }
            Self::Contains { field, needle } => {
                let needle = needle.to_lowercase();
                match doc.get(*field) {
                    Some(Value::String(s)) => contains_ignore_case(s, &needle),
                    Some(Value::Array(items)) => items.iter().any(|item| {
                        matches!(item, Value::String(s) if contains_ignore_case(s, &needle))
                    }),
                    _ => false,
                }
            }
            Self::And(clauses) => clauses.iter().all(|c| c.matches(doc)),
            Self::Or(clauses) => clauses.iter().any(|c| c.matches(doc)),
        }
    }
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
