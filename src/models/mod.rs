// src/models/mod.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod timestamp;

// ───────────────────────────────────────
// Closed enumerations (with a literal fallback)
// ───────────────────────────────────────

/// Result of a negotiation call. Values outside `won`/`lost` are kept
/// verbatim in `Other` so aggregation can group them by their literal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    Won,
    Lost,
    Other(String),
}

impl Outcome {
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
            Outcome::Other(raw) => raw,
        }
    }

    pub fn is_won(&self) -> bool {
        matches!(self, Outcome::Won)
    }

    /// Display label: the raw value with its first character upper-cased.
    pub fn label(&self) -> String {
        capitalize(self.as_str())
    }
}

impl From<String> for Outcome {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "won" => Outcome::Won,
            "lost" => Outcome::Lost,
            _ => Outcome::Other(raw),
        }
    }
}

impl From<Outcome> for String {
    fn from(o: Outcome) -> Self {
        match o {
            Outcome::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Tone of the call as classified upstream (`pos` | `neg` | `neu`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Other(String),
}

impl Sentiment {
    pub fn code(&self) -> &str {
        match self {
            Sentiment::Positive => "pos",
            Sentiment::Negative => "neg",
            Sentiment::Neutral => "neu",
            Sentiment::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Other(raw) => raw,
        }
    }
}

impl From<String> for Sentiment {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pos" => Sentiment::Positive,
            "neg" => Sentiment::Negative,
            "neu" => Sentiment::Neutral,
            _ => Sentiment::Other(raw),
        }
    }
}

impl From<Sentiment> for String {
    fn from(s: Sentiment) -> Self {
        match s {
            Sentiment::Other(raw) => raw,
            known => known.code().to_string(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ───────────────────────────────────────
// Upstream records
// ───────────────────────────────────────

/// One logged phone-call outcome tied to a freight shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub pickup_datetime: Option<String>,   // passed through as sent
    pub delivery_datetime: Option<String>,
    pub origin: String,
    pub destination: String,
    pub equipment_type: String,
    pub initial_rate: f64,
    pub final_rate: f64,
    pub mc_number: String,
    pub outcome: Outcome,
    pub sentiment: Sentiment,
}

/// A freight listing. Shown as-is; nothing is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    pub load_id: i64,
    pub origin: String,
    pub destination: String,
    pub pickup_datetime: Option<String>,
    pub delivery_datetime: Option<String>,
    pub equipment_type: String,
    pub loadboard_rate: Option<f64>,
    pub miles: Option<f64>,
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `{ "results": [...] }` body returned by the upstream list endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Results<T> {
    pub results: Vec<T>,
}
