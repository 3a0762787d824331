//! Training record format written to JSON Lines.

use serde::{Deserialize, Serialize};

use crate::pairing::{Role, Turn, TurnPair};

/// One line of the output file: `{"contents": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub contents: Vec<Content>,
}

/// A role-labeled entry of a training record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl Content {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Content::new(turn.role, turn.text.clone())
    }
}

impl From<&TurnPair> for TrainingRecord {
    fn from(pair: &TurnPair) -> Self {
        let contents = std::iter::once(&pair.first)
            .chain(pair.second.as_ref())
            .map(Content::from)
            .collect();
        Self { contents }
    }
}

/// Build one record per pair, preserving order.
pub fn build_records(pairs: &[TurnPair]) -> Vec<TrainingRecord> {
    pairs.iter().map(TrainingRecord::from).collect()
}
