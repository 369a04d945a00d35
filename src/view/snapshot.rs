//! Observable state of a search view.

use crate::models::Perk;
use crate::query::{PerkQuery, merchant_options};

/// A fetched perk list together with its merchant filter options.
///
/// The options are computed once from the perks when the list is built and
/// there is no way to change one without the other, so they always
/// describe the list currently held.
///
/// Options hold trimmed merchant names: `" ACME"` and `"ACME"` become the
/// single option `"ACME"`, and a whitespace-only merchant yields no
/// option. The trimmed name is also what a selected option sends, since
/// [`PerkQuery`] trims the merchant filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerkList {
    /// Perks in server order.
    perks: Vec<Perk>,
    /// Distinct trimmed, non-blank merchants of `perks`, first-seen order.
    merchants: Vec<String>,
}

impl PerkList {
    /// Wraps a fetched list and derives its merchant options.
    #[inline]
    #[must_use]
    pub fn new(perks: Vec<Perk>) -> Self {
        let merchants = merchant_options(&perks);
        Self { perks, merchants }
    }

    /// Returns the perks.
    #[inline]
    #[must_use]
    pub fn perks(&self) -> &[Perk] {
        &self.perks
    }

    /// Returns the merchant filter options.
    #[inline]
    #[must_use]
    pub fn merchant_options(&self) -> &[String] {
        &self.merchants
    }

    /// Returns the number of perks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.perks.len()
    }

    /// Returns `true` if the list holds no perks.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.perks.is_empty()
    }
}

impl From<Vec<Perk>> for PerkList {
    #[inline]
    fn from(perks: Vec<Perk>) -> Self {
        Self::new(perks)
    }
}

/// Everything a view displays at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    /// Search text exactly as typed.
    pub query: String,
    /// Selected merchant; empty means all merchants.
    pub merchant: String,
    /// Result of the last applied fetch.
    pub results: PerkList,
    /// `true` while the latest issued fetch has not settled.
    pub loading: bool,
    /// Message of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
}

impl ViewSnapshot {
    /// Returns the request parameters for the current input.
    #[inline]
    #[must_use]
    pub fn to_query(&self) -> PerkQuery {
        PerkQuery::new().search(&self.query).merchant(&self.merchant)
    }

    /// Returns `true` if the view should show its empty-state message.
    #[inline]
    #[must_use]
    pub fn shows_empty_state(&self) -> bool {
        !self.loading && self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PerkId;

    fn test_perk(id: &str, merchant: Option<&str>) -> Perk {
        Perk {
            id: PerkId::from(id),
            title: format!("Perk {id}"),
            merchant: merchant.map(str::to_owned),
            category: "misc".to_owned(),
            discount_percent: 0.0,
            description: None,
            created_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn list_derives_merchants_on_construction() {
        let list = PerkList::new(vec![
            test_perk("1", Some("A")),
            test_perk("2", Some("")),
            test_perk("3", Some("B")),
            test_perk("4", Some("A")),
            test_perk("5", None),
        ]);
        assert_eq!(list.len(), 5);
        assert_eq!(list.merchant_options(), ["A", "B"]);
    }

    #[test]
    fn padded_merchant_names_share_one_option() {
        let list = PerkList::new(vec![
            test_perk("1", Some(" ACME")),
            test_perk("2", Some("ACME")),
            test_perk("3", Some("   ")),
            test_perk("4", Some("Beanery ")),
        ]);
        assert_eq!(list.merchant_options(), ["ACME", "Beanery"]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn default_list_is_empty() {
        let list = PerkList::default();
        assert!(list.is_empty());
        assert!(list.merchant_options().is_empty());
    }

    #[test]
    fn snapshot_query_trims_input() {
        let snapshot = ViewSnapshot {
            query: "   ".to_owned(),
            merchant: " ACME ".to_owned(),
            ..ViewSnapshot::default()
        };
        let query = snapshot.to_query();
        assert_eq!(query.search_text(), None);
        assert_eq!(query.merchant_name(), Some("ACME"));
    }

    #[test]
    fn empty_state_hidden_while_loading() {
        let mut snapshot = ViewSnapshot {
            loading: true,
            ..ViewSnapshot::default()
        };
        assert!(!snapshot.shows_empty_state());
        snapshot.loading = false;
        assert!(snapshot.shows_empty_state());
    }
}
