//! Perk model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PerkId, UserId};

/// A discount or offer tied to a merchant.
///
/// Perks are owned by the server; clients only ever hold read-only
/// snapshots that are replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perk {
    /// Unique identifier. Accepts both `id` and `_id` on the wire.
    #[serde(alias = "_id")]
    pub id: PerkId,
    /// Display name, matched case-insensitively by searches.
    pub title: String,
    /// Owning merchant name, the exact-match filter key.
    #[serde(default)]
    pub merchant: Option<String>,
    /// Classification tag.
    #[serde(default)]
    pub category: String,
    /// Discount in percent; `0` means no discount badge.
    #[serde(default)]
    pub discount_percent: f64,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// User who created the perk.
    #[serde(default)]
    pub created_by: Option<CreatedBy>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Perk {
    /// Returns the merchant name if it is present and not blank.
    #[inline]
    #[must_use]
    pub fn merchant_name(&self) -> Option<&str> {
        self.merchant
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Returns `true` when the perk carries a visible discount.
    #[inline]
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_percent > 0.0
    }
}

/// Creator reference as sent by the server.
///
/// Depending on the endpoint the server either populates the user or only
/// sends its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedBy {
    /// Populated user document.
    User(UserRef),
    /// Bare user identifier.
    Id(UserId),
}

impl CreatedBy {
    /// Returns the best available label for display: name, then email,
    /// then the raw identifier.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match *self {
            Self::User(ref user) => user
                .name
                .as_deref()
                .or(user.email.as_deref())
                .or_else(|| user.id.as_ref().map(UserId::as_inner)),
            Self::Id(ref id) => Some(id.as_inner()),
        }
    }
}

/// Populated creator document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User identifier.
    #[serde(default, alias = "_id")]
    pub id: Option<UserId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_perk() {
        let json = r#"{
            "_id": "p-1",
            "title": "Free Coffee",
            "merchant": "ACME",
            "category": "food",
            "discountPercent": 15,
            "description": "One free drip coffee per visit",
            "createdBy": { "_id": "u-1", "name": "Dana", "email": "dana@example.com" },
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-02T10:00:00Z"
        }"#;
        let perk: Perk = serde_json::from_str(json).unwrap();
        assert_eq!(perk.id, PerkId::from("p-1"));
        assert_eq!(perk.merchant_name(), Some("ACME"));
        assert!(perk.has_discount());
        assert_eq!(
            perk.created_by.as_ref().and_then(CreatedBy::display_name),
            Some("Dana")
        );
        assert!(perk.created_at.is_some());
    }

    #[test]
    fn deserialize_minimal_perk() {
        let json = r#"{ "id": "p-2", "title": "Gym Pass" }"#;
        let perk: Perk = serde_json::from_str(json).unwrap();
        assert!(perk.merchant.is_none());
        assert_eq!(perk.category, "");
        assert!(!perk.has_discount());
        assert!(perk.created_by.is_none());
    }

    #[test]
    fn created_by_bare_id() {
        let json = r#"{ "id": "p-3", "title": "Movie", "createdBy": "u-9" }"#;
        let perk: Perk = serde_json::from_str(json).unwrap();
        assert_eq!(perk.created_by, Some(CreatedBy::Id(UserId::from("u-9"))));
        assert_eq!(
            perk.created_by.as_ref().and_then(CreatedBy::display_name),
            Some("u-9")
        );
    }

    #[test]
    fn created_by_falls_back_to_email() {
        let creator = CreatedBy::User(UserRef {
            id: None,
            name: None,
            email: Some("ops@example.com".to_owned()),
        });
        assert_eq!(creator.display_name(), Some("ops@example.com"));
    }

    #[test]
    fn blank_merchant_is_not_a_name() {
        let json = r#"{ "id": "p-4", "title": "Books", "merchant": "  " }"#;
        let perk: Perk = serde_json::from_str(json).unwrap();
        assert_eq!(perk.merchant_name(), None);
    }
}
