//! Plain-text rendering of a search view.

use crate::models::{CreatedBy, Perk, PerkId};
use crate::view::ViewSnapshot;

/// Shown when a settled fetch returned no perks.
pub const EMPTY_MESSAGE: &str = "No perks found";

/// Shown while a fetch is in flight.
pub const LOADING_MESSAGE: &str = "Loading perks...";

/// Shown next to an error to point at the retry action.
pub const RETRY_HINT: &str = "(retry to load again)";

/// Returns the detail route of a perk.
#[inline]
#[must_use]
pub fn detail_path(id: &PerkId) -> String {
    format!("/perks/{id}")
}

/// Returns the discount badge text, or `None` when there is no discount.
#[inline]
#[must_use]
pub fn discount_badge(perk: &Perk) -> Option<String> {
    perk.has_discount()
        .then(|| format!("{}% off", perk.discount_percent))
}

/// Renders one perk as a single line.
#[must_use]
pub fn render_perk(perk: &Perk) -> String {
    let mut parts = vec![perk.title.clone()];
    if let Some(badge) = discount_badge(perk) {
        parts.push(format!("[{badge}]"));
    }
    if let Some(merchant) = perk.merchant_name() {
        parts.push(format!("@ {merchant}"));
    }
    if !perk.category.is_empty() {
        parts.push(format!("({})", perk.category));
    }
    if let Some(author) = perk.created_by.as_ref().and_then(CreatedBy::display_name) {
        parts.push(format!("by {author}"));
    }
    parts.push(detail_path(&perk.id));
    parts.join(" ")
}

/// Renders the whole view: filters, status lines, then the list.
///
/// Errors are shown above the previous results, never instead of them.
#[must_use]
pub fn render_view(snapshot: &ViewSnapshot) -> String {
    let mut lines = vec![format!("Perks ({})", snapshot.to_query())];

    let options = snapshot.results.merchant_options();
    if !options.is_empty() {
        lines.push(format!("Merchants: {}", options.join(", ")));
    }
    if snapshot.loading {
        lines.push(LOADING_MESSAGE.to_owned());
    }
    if let Some(error) = snapshot.error.as_deref() {
        lines.push(format!("Error: {error} {RETRY_HINT}"));
    }
    if snapshot.shows_empty_state() {
        lines.push(EMPTY_MESSAGE.to_owned());
    }
    lines.extend(
        snapshot
            .results
            .perks()
            .iter()
            .map(|perk| format!("- {}", render_perk(perk))),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRef;
    use crate::view::PerkList;

    fn coffee() -> Perk {
        Perk {
            id: PerkId::from("p-1"),
            title: "Free Coffee".to_owned(),
            merchant: Some("ACME".to_owned()),
            category: "food".to_owned(),
            discount_percent: 15.0,
            description: None,
            created_by: Some(CreatedBy::User(UserRef {
                id: None,
                name: Some("Dana".to_owned()),
                email: None,
            })),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn perk_line_has_badge_merchant_author_and_route() {
        assert_eq!(
            render_perk(&coffee()),
            "Free Coffee [15% off] @ ACME (food) by Dana /perks/p-1"
        );
    }

    #[test]
    fn zero_discount_has_no_badge() {
        let perk = Perk {
            discount_percent: 0.0,
            ..coffee()
        };
        assert_eq!(discount_badge(&perk), None);
        assert!(!render_perk(&perk).contains("% off"));
    }

    #[test]
    fn fractional_discount_badge() {
        let perk = Perk {
            discount_percent: 12.5,
            ..coffee()
        };
        assert_eq!(discount_badge(&perk).as_deref(), Some("12.5% off"));
    }

    #[test]
    fn settled_empty_view_shows_empty_message() {
        let rendered = render_view(&ViewSnapshot::default());
        assert!(rendered.contains(EMPTY_MESSAGE));
        assert!(!rendered.contains(LOADING_MESSAGE));
    }

    #[test]
    fn loading_view_hides_empty_message() {
        let snapshot = ViewSnapshot {
            loading: true,
            ..ViewSnapshot::default()
        };
        let rendered = render_view(&snapshot);
        assert!(rendered.contains(LOADING_MESSAGE));
        assert!(!rendered.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn error_is_shown_alongside_results() {
        let snapshot = ViewSnapshot {
            query: "coffee".to_owned(),
            results: PerkList::new(vec![coffee()]),
            error: Some("Database down".to_owned()),
            ..ViewSnapshot::default()
        };
        let rendered = render_view(&snapshot);
        assert!(rendered.starts_with("Perks (search=\"coffee\")"));
        assert!(rendered.contains("Merchants: ACME"));
        assert!(rendered.contains("Error: Database down"));
        assert!(rendered.contains(RETRY_HINT));
        assert!(rendered.contains("- Free Coffee"));
    }
}
