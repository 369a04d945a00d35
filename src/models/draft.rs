//! Request bodies for creating and updating perks.

use serde::{Deserialize, Serialize};

/// Body of `POST /perks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerkDraft {
    /// Display name.
    pub title: String,
    /// Owning merchant name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    /// Classification tag.
    pub category: String,
    /// Discount in percent.
    pub discount_percent: f64,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PerkDraft {
    /// Creates a draft with the required title and category.
    #[inline]
    #[must_use]
    pub fn new<T: Into<String>, C: Into<String>>(title: T, category: C) -> Self {
        Self {
            title: title.into(),
            merchant: None,
            category: category.into(),
            discount_percent: 0.0,
            description: None,
        }
    }

    /// Sets the merchant name.
    #[inline]
    #[must_use]
    pub fn merchant<T: Into<String>>(mut self, merchant: T) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// Sets the discount percentage.
    #[inline]
    #[must_use]
    pub const fn discount_percent(mut self, percent: f64) -> Self {
        self.discount_percent = percent;
        self
    }

    /// Sets the description.
    #[inline]
    #[must_use]
    pub fn description<T: Into<String>>(mut self, description: T) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Body of `PATCH /perks/:id`. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerkPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New merchant name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    /// New classification tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New discount percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PerkPatch {
    /// Returns `true` if the patch would change nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.merchant.is_none()
            && self.category.is_none()
            && self.discount_percent.is_none()
            && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_serializes_camel_case_and_skips_absent() {
        let draft = PerkDraft::new("Free Coffee", "food")
            .merchant("ACME")
            .discount_percent(10.0);
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["title"], "Free Coffee");
        assert_eq!(value["merchant"], "ACME");
        assert_eq!(value["discountPercent"], 10.0);
        assert!(value.get("description").is_none());
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = PerkPatch::default();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
    }

    #[test]
    fn patch_sends_only_set_fields() {
        let patch = PerkPatch {
            discount_percent: Some(25.0),
            ..PerkPatch::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"discountPercent":25.0}"#
        );
    }
}
