//! Data models for perks API entities.
//!
//! Strongly-typed perk records, newtype ID wrappers, and the request and
//! response bodies of the perks endpoints.

mod draft;
mod ids;
mod perk;
mod responses;

pub use draft::{PerkDraft, PerkPatch};
pub use ids::{PerkId, UserId};
pub use perk::{CreatedBy, Perk, UserRef};
pub use responses::{ErrorBody, PerkResponse, PerksResponse};
