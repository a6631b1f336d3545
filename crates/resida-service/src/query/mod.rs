//! Typed table access over the row store.
//!
//! Thin repositories in front of [`RowStore`]: lookup goes through the
//! store's column scan, and any record that is about to be acted on is
//! re-read directly (bypassing the cache) so decisions are made against the
//! freshest state the backend can offer.
//!
//! Scans skip rows that fail to parse, with a warning; point reads propagate
//! the parse failure instead, because acting on a malformed record is never
//! safe.
//!
//! [`RowStore`]: resida_sheets::RowStore

mod accounts;
mod invitations;
mod properties;

pub use self::accounts::AccountQuery;
pub use self::invitations::InvitationQuery;
pub use self::properties::{BuildingQuery, OccupancyQuery, UnitQuery};

/// Tracing target for query operations.
pub(crate) const TRACING_TARGET: &str = "resida_service::query";
