//! In-memory perk service.
//!
//! Provides [`InMemoryPerks`], a thread-safe in-memory implementation of
//! the public listing contract. Useful for tests and offline demos where
//! no server is available.

use core::future::{self, Future};
use std::sync::{Mutex, PoisonError};

use crate::error::{PerksError, Result};
use crate::models::{Perk, PerkId};
use crate::query::PerkQuery;

/// Thread-safe in-memory perk store.
///
/// Insertion order is preserved and listing returns perks in that order.
///
/// # Example
///
/// ```rust
/// use perks_rs::source::InMemoryPerks;
///
/// let perks = InMemoryPerks::new();
/// assert!(perks.is_empty().unwrap());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPerks {
    /// Stored perks behind a mutex for interior mutability.
    perks: Mutex<Vec<Perk>>,
}

impl InMemoryPerks {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `perks`.
    #[inline]
    #[must_use]
    pub const fn with_perks(perks: Vec<Perk>) -> Self {
        Self {
            perks: Mutex::new(perks),
        }
    }

    /// Inserts perks, replacing existing ones with the same ID in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn upsert(&self, items: Vec<Perk>) -> Result<()> {
        self.with_lock(|perks| {
            for item in items {
                match perks.iter_mut().find(|existing| existing.id == item.id) {
                    Some(existing) => *existing = item,
                    None => perks.push(item),
                }
            }
        })
    }

    /// Removes the perk with the given ID, returning it if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn remove(&self, id: &PerkId) -> Result<Option<Perk>> {
        self.with_lock(|perks| {
            perks
                .iter()
                .position(|perk| perk.id == *id)
                .map(|index| perks.remove(index))
        })
    }

    /// Returns every stored perk.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn perks(&self) -> Result<Vec<Perk>> {
        self.with_lock(|perks| perks.clone())
    }

    /// Returns `true` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn is_empty(&self) -> Result<bool> {
        self.with_lock(|perks| perks.is_empty())
    }

    /// Returns the stored perks that match `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[inline]
    pub fn filter(&self, query: &PerkQuery) -> Result<Vec<Perk>> {
        self.with_lock(|perks| {
            perks
                .iter()
                .filter(|perk| query.matches(perk))
                .cloned()
                .collect()
        })
    }

    /// Acquires the lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut Vec<Perk>) -> R) -> Result<R> {
        let mut perks = self.perks.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut perks))
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &PoisonError<T>) -> PerksError {
    PerksError::Source(err.to_string().into())
}

impl super::PerkSource for InMemoryPerks {
    #[inline]
    fn fetch(&self, query: &PerkQuery) -> impl Future<Output = Result<Vec<Perk>>> + Send {
        let result = self.filter(query);
        tracing::trace!(query = %query, ok = result.is_ok(), "in-memory listing");
        future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::PerkSource as _;

    fn test_perk(id: &str, title: &str, merchant: Option<&str>) -> Perk {
        Perk {
            id: PerkId::from(id),
            title: title.to_owned(),
            merchant: merchant.map(str::to_owned),
            category: "food".to_owned(),
            discount_percent: 10.0,
            description: None,
            created_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn seeded() -> InMemoryPerks {
        InMemoryPerks::with_perks(vec![
            test_perk("1", "Free Coffee", Some("ACME")),
            test_perk("2", "Coffee Beans", Some("Beanery")),
            test_perk("3", "Gym Pass", Some("ACME")),
            test_perk("4", "Movie Night", None),
        ])
    }

    fn ids(perks: &[Perk]) -> Vec<&str> {
        perks.iter().map(|perk| perk.id.as_inner()).collect()
    }

    #[test]
    fn new_store_is_empty() {
        let store = InMemoryPerks::new();
        assert!(store.is_empty().unwrap());
        assert!(store.perks().unwrap().is_empty());
    }

    #[test]
    fn upsert_replaces_in_place_and_appends() {
        let store = seeded();
        store
            .upsert(vec![
                test_perk("2", "Espresso Beans", Some("Beanery")),
                test_perk("5", "Car Wash", Some("Sudsy")),
            ])
            .unwrap();
        let perks = store.perks().unwrap();
        assert_eq!(ids(&perks), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(perks[1].title, "Espresso Beans");
    }

    #[test]
    fn remove_returns_removed_perk() {
        let store = seeded();
        let removed = store.remove(&PerkId::from("3")).unwrap();
        assert_eq!(removed.map(|perk| perk.title), Some("Gym Pass".to_owned()));
        assert!(store.remove(&PerkId::from("3")).unwrap().is_none());
        assert_eq!(store.perks().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn listing_without_parameters_returns_everything() {
        let store = seeded();
        let perks = store.fetch(&PerkQuery::new()).await.unwrap();
        assert_eq!(ids(&perks), vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn listing_applies_search_and_merchant() {
        let store = seeded();

        let perks = store
            .fetch(&PerkQuery::new().search("coffee"))
            .await
            .unwrap();
        assert_eq!(ids(&perks), vec!["1", "2"]);

        let perks = store
            .fetch(&PerkQuery::new().merchant("ACME"))
            .await
            .unwrap();
        assert_eq!(ids(&perks), vec!["1", "3"]);

        let perks = store
            .fetch(&PerkQuery::new().search("coffee").merchant("ACME"))
            .await
            .unwrap();
        assert_eq!(ids(&perks), vec!["1"]);
    }
}
