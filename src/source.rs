//! Where the search view gets its perks from.
//!
//! [`PerkSource`] is the seam between the view and the Query Service. The
//! async HTTP client implements it for production use and
//! [`InMemoryPerks`] implements the same listing contract in memory.

mod memory;

pub use memory::InMemoryPerks;

use crate::error::Result;
use crate::models::Perk;
use crate::query::PerkQuery;

/// Async provider of the public perk listing.
///
/// Implementations must return every perk matching `query` (see
/// [`PerkQuery::matches`]), or all perks for an empty query.
pub trait PerkSource: core::fmt::Debug + Send + Sync {
    /// Lists perks matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing service cannot answer.
    fn fetch(
        &self,
        query: &PerkQuery,
    ) -> impl Future<Output = Result<Vec<Perk>>> + Send;
}

impl<S: PerkSource> PerkSource for std::sync::Arc<S> {
    #[inline]
    fn fetch(
        &self,
        query: &PerkQuery,
    ) -> impl Future<Output = Result<Vec<Perk>>> + Send {
        (**self).fetch(query)
    }
}
