//! Search parameters for the public perk listing.
//!
//! [`PerkQuery`] is both the request side of `GET /perks/all` and the
//! reference implementation of how the server applies it, which lets the
//! in-memory source and the HTTP client agree on one definition.

use crate::models::Perk;

/// Query-string key for the title search.
pub const SEARCH_PARAM: &str = "search";

/// Query-string key for the merchant filter.
pub const MERCHANT_PARAM: &str = "merchant";

/// Normalized parameters for `GET /perks/all`.
///
/// Values are trimmed on the way in and dropped entirely when nothing is
/// left, so an empty string is never sent as a filter.
///
/// # Examples
///
/// ```
/// use perks_rs::query::PerkQuery;
///
/// let query = PerkQuery::new().search("  coffee ").merchant("   ");
/// assert_eq!(query.search_text(), Some("coffee"));
/// assert_eq!(query.merchant_name(), None);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct PerkQuery {
    /// Trimmed, non-empty title search.
    search: Option<String>,
    /// Trimmed, non-empty merchant filter.
    merchant: Option<String>,
}

impl PerkQuery {
    /// Creates an empty query that matches every perk.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title search; blank input clears it.
    #[inline]
    #[must_use]
    pub fn search<T: AsRef<str>>(mut self, text: T) -> Self {
        self.search = normalize(text.as_ref());
        self
    }

    /// Sets the merchant filter; blank input clears it.
    #[inline]
    #[must_use]
    pub fn merchant<T: AsRef<str>>(mut self, name: T) -> Self {
        self.merchant = normalize(name.as_ref());
        self
    }

    /// Returns the normalized title search, if any.
    #[inline]
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns the normalized merchant filter, if any.
    #[inline]
    #[must_use]
    pub fn merchant_name(&self) -> Option<&str> {
        self.merchant.as_deref()
    }

    /// Returns `true` if no parameter is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.search.is_none() && self.merchant.is_none()
    }

    /// Returns the query-string pairs to send, `search` first.
    ///
    /// Absent parameters are omitted rather than sent empty.
    #[inline]
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(search) = self.search.as_deref() {
            pairs.push((SEARCH_PARAM, search));
        }
        if let Some(merchant) = self.merchant.as_deref() {
            pairs.push((MERCHANT_PARAM, merchant));
        }
        pairs
    }

    /// Returns `true` if the perk satisfies every set parameter.
    ///
    /// `search` is a case-insensitive substring match on the title,
    /// `merchant` an exact match on the merchant name.
    #[inline]
    #[must_use]
    pub fn matches(&self, perk: &Perk) -> bool {
        self.matches_search(perk) && self.matches_merchant(perk)
    }

    /// Checks the title search.
    fn matches_search(&self, perk: &Perk) -> bool {
        self.search.as_ref().is_none_or(|search| {
            perk.title
                .to_lowercase()
                .contains(&search.to_lowercase())
        })
    }

    /// Checks the merchant filter.
    fn matches_merchant(&self, perk: &Perk) -> bool {
        self.merchant
            .as_deref()
            .is_none_or(|merchant| perk.merchant.as_deref() == Some(merchant))
    }
}

impl core::fmt::Display for PerkQuery {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            return f.write_str("all perks");
        }
        let mut first = true;
        for (key, value) in self.to_pairs() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{key}=\"{value}\"")?;
            first = false;
        }
        Ok(())
    }
}

/// Trims the input and maps blank strings to `None`.
fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Returns the distinct, non-blank merchant names of `perks` in
/// first-seen order.
///
/// Names are compared after trimming, so padded variants of one merchant
/// produce a single option.
///
/// # Examples
///
/// ```
/// use perks_rs::models::{Perk, PerkId};
/// use perks_rs::query::merchant_options;
///
/// let perk = |id: &str, merchant: Option<&str>| Perk {
///     id: PerkId::from(id),
///     title: id.to_owned(),
///     merchant: merchant.map(str::to_owned),
///     category: String::new(),
///     discount_percent: 0.0,
///     description: None,
///     created_by: None,
///     created_at: None,
///     updated_at: None,
/// };
/// let perks = [
///     perk("1", Some("A")),
///     perk("2", Some("")),
///     perk("3", Some("B")),
///     perk("4", Some("A")),
///     perk("5", None),
/// ];
/// assert_eq!(merchant_options(&perks), ["A", "B"]);
/// ```
#[must_use]
pub fn merchant_options(perks: &[Perk]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for name in perks.iter().filter_map(Perk::merchant_name) {
        if !options.iter().any(|seen| seen == name) {
            options.push(name.to_owned());
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PerkId;

    fn test_perk(id: &str, title: &str, merchant: Option<&str>) -> Perk {
        Perk {
            id: PerkId::from(id),
            title: title.to_owned(),
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
    fn whitespace_only_search_is_omitted() {
        let query = PerkQuery::new().search("   ");
        assert!(query.is_empty());
        assert!(query.to_pairs().is_empty());
    }

    #[test]
    fn values_are_trimmed() {
        let query = PerkQuery::new().search(" coffee ").merchant("\tACME\n");
        assert_eq!(
            query.to_pairs(),
            vec![(SEARCH_PARAM, "coffee"), (MERCHANT_PARAM, "ACME")]
        );
    }

    #[test]
    fn merchant_only_query() {
        let query = PerkQuery::new().search("").merchant("ACME");
        assert_eq!(query.to_pairs(), vec![(MERCHANT_PARAM, "ACME")]);
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = PerkQuery::new();
        assert!(query.matches(&test_perk("1", "Anything", None)));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let query = PerkQuery::new().search("COFF");
        assert!(query.matches(&test_perk("1", "Free coffee", None)));
        assert!(!query.matches(&test_perk("2", "Gym pass", None)));
    }

    #[test]
    fn merchant_is_exact_match() {
        let query = PerkQuery::new().merchant("ACME");
        assert!(query.matches(&test_perk("1", "x", Some("ACME"))));
        assert!(!query.matches(&test_perk("2", "x", Some("acme"))));
        assert!(!query.matches(&test_perk("3", "x", Some("ACME Corp"))));
        assert!(!query.matches(&test_perk("4", "x", None)));
    }

    #[test]
    fn both_parameters_combine_with_and() {
        let query = PerkQuery::new().search("coffee").merchant("ACME");
        assert!(query.matches(&test_perk("1", "Coffee deal", Some("ACME"))));
        assert!(!query.matches(&test_perk("2", "Coffee deal", Some("Beanery"))));
        assert!(!query.matches(&test_perk("3", "Tea deal", Some("ACME"))));
    }

    #[test]
    fn merchant_options_dedupe_in_first_seen_order() {
        let perks = vec![
            test_perk("1", "a", Some("A")),
            test_perk("2", "b", Some("")),
            test_perk("3", "c", Some("B")),
            test_perk("4", "d", Some("A")),
            test_perk("5", "e", None),
        ];
        assert_eq!(merchant_options(&perks), vec!["A", "B"]);
    }

    #[test]
    fn merchant_options_of_empty_list() {
        assert!(merchant_options(&[]).is_empty());
    }

    #[test]
    fn display_lists_parameters() {
        assert_eq!(PerkQuery::new().to_string(), "all perks");
        assert_eq!(
            PerkQuery::new().search("coffee").merchant("ACME").to_string(),
            r#"search="coffee", merchant="ACME""#
        );
    }
}
