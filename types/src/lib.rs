//! Core domain types for ticketwall.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod board;
mod sanitize;
pub mod ui;

pub use board::{Board, CategoryCounts, StatusCategory};
pub use sanitize::sanitize_terminal_text;

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder shown when a ticket carries no situation description.
pub const UNAVAILABLE_SITUATION: &str = "Unavailable";

// ============================================================================
// Wire types
// ============================================================================

/// Response body of the ticket search endpoint: `{"tickets": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketsEnvelope {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

/// A single support ticket as reported by the ticketing API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Human-facing ticket number. Some deployments send it as a JSON number.
    #[serde(default, deserialize_with = "protocol_from_text_or_number")]
    pub protocol: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub situation: Option<Situation>,
}

/// Workflow situation of a ticket. `id` selects the [`StatusCategory`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProtocol {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

fn protocol_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawProtocol>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawProtocol::Text(text)) => text,
        Some(RawProtocol::Integer(n)) => n.to_string(),
        Some(RawProtocol::Unsigned(n)) => n.to_string(),
        Some(RawProtocol::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

impl Ticket {
    #[must_use]
    pub fn new(protocol: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            subject: subject.into(),
            situation: None,
        }
    }

    /// Attach a situation; convenient for fixtures and tests.
    #[must_use]
    pub fn with_situation(mut self, id: i64, description: Option<&str>) -> Self {
        self.situation = Some(Situation {
            id: Some(id),
            description: description.map(str::to_owned),
        });
        self
    }

    #[must_use]
    pub fn situation_id(&self) -> Option<i64> {
        self.situation.as_ref().and_then(|s| s.id)
    }

    #[must_use]
    pub fn category(&self) -> Option<StatusCategory> {
        self.situation_id().and_then(StatusCategory::from_situation_id)
    }

    /// `#<protocol> - <subject>`, sanitized for terminal display.
    #[must_use]
    pub fn headline(&self) -> String {
        format!(
            "#{} - {}",
            sanitize_terminal_text(&self.protocol),
            sanitize_terminal_text(&self.subject)
        )
    }

    /// Situation description, or [`UNAVAILABLE_SITUATION`] when missing or blank.
    #[must_use]
    pub fn situation_label(&self) -> String {
        self.situation
            .as_ref()
            .and_then(|s| s.description.as_deref())
            .map(sanitize_terminal_text)
            .filter(|d| !d.trim().is_empty())
            .map_or_else(|| UNAVAILABLE_SITUATION.to_string(), |d| d.trim().to_string())
    }
}
