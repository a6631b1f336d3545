//! Domain enumerations stored as string cells.
//!
//! Every enum round-trips through its SCREAMING_SNAKE string form, which is
//! exactly what the backing table cells hold.

mod invitation_status;
mod invite_state;
mod occupancy_status;
mod record_status;
mod role;
mod unit_status;

pub use self::invitation_status::InvitationStatus;
pub use self::invite_state::InviteState;
pub use self::occupancy_status::OccupancyStatus;
pub use self::record_status::RecordStatus;
pub use self::role::Role;
pub use self::unit_status::UnitStatus;
