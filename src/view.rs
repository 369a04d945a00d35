//! Search-and-filter view over the public perk listing.
//!
//! [`ViewSnapshot`] is the observable state of one view instance and
//! [`PerkList`] the result list paired with the merchant options derived
//! from it. With the `async` feature, [`SearchView`] drives that state:
//! it debounces input changes, talks to a [`crate::source::PerkSource`],
//! and discards responses that were overtaken by a newer request.

#[cfg(feature = "async")]
mod controller;
mod snapshot;

#[cfg(feature = "async")]
pub use controller::{DEFAULT_ERROR_MESSAGE, DEFAULT_QUIET_PERIOD, SearchView, ViewConfig};
pub use snapshot::{PerkList, ViewSnapshot};
