//! `familytracker` - Keep track of family members and shelters during an emergency
//!
//! This library provides an in-memory roster of members and shelters, the
//! entry forms that validate new records, and the map projection that turns
//! the roster into labelled markers.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod map;
pub mod model;
pub mod roster;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};
pub use form::{FormError, MemberForm, ShelterForm};
pub use logging::init_logging;
pub use map::{MapView, Marker, MarkerKind};
pub use model::{Coordinates, Member, MemberId, Shelter, ShelterId};
pub use roster::{Roster, RosterStats};
pub use session::Session;
