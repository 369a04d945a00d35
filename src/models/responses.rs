//! Response envelopes returned by the perks endpoints.

use serde::{Deserialize, Serialize};

use super::Perk;

/// Envelope of the list endpoints (`GET /perks`, `GET /perks/all`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerksResponse {
    /// Perks matching the request.
    #[serde(default)]
    pub perks: Vec<Perk>,
}

/// Envelope of the single-perk endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerkResponse {
    /// The requested, created, or updated perk.
    pub perk: Perk,
}

/// Error body sent with non-success statuses. The message is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extracts the `message` field from a raw error body.
    ///
    /// Bodies that are empty, not JSON, or lack the field yield `None`.
    #[inline]
    #[must_use]
    pub fn message_from(raw: &str) -> Option<String> {
        serde_json::from_str::<Self>(raw)
            .ok()
            .and_then(|body| body.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_perks_envelope() {
        let json = r#"{ "perks": [ { "_id": "p-1", "title": "Free Coffee" } ] }"#;
        let response: PerksResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.perks.len(), 1);
        assert_eq!(response.perks[0].title, "Free Coffee");
    }

    #[test]
    fn missing_perks_field_is_empty_list() {
        let response: PerksResponse = serde_json::from_str("{}").unwrap();
        assert!(response.perks.is_empty());
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            ErrorBody::message_from(r#"{"message":"Server exploded"}"#),
            Some("Server exploded".to_owned())
        );
        assert_eq!(ErrorBody::message_from(r#"{"error":"x"}"#), None);
        assert_eq!(ErrorBody::message_from("<html>502</html>"), None);
        assert_eq!(ErrorBody::message_from(""), None);
    }
}
