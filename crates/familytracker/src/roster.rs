//! In-memory roster of members and shelters.
//!
//! The [`Roster`] is the single source of truth for the current session and
//! the only component that mutates member or shelter state. Every operation
//! is total: lookups of unknown ids are no-ops rather than errors.

use serde::Serialize;
use tracing::{debug, trace};

use crate::model::{Coordinates, Member, MemberId, Shelter, ShelterId};

/// Session-scoped store of members and shelters.
///
/// Provides:
/// - Member registration, safety toggling and removal
/// - Shelter registration
/// - Insertion-ordered read access for display
///
/// Ids come from per-collection monotonic counters, so two records created
/// back to back never collide and a removed id is never handed out again.
#[derive(Debug, Default)]
pub struct Roster {
    /// Members in insertion order.
    members: Vec<Member>,
    /// Shelters in insertion order.
    shelters: Vec<Shelter>,
    /// Last member id handed out.
    last_member_id: u64,
    /// Last shelter id handed out.
    last_shelter_id: u64,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new member, marked safe, at the end of the member list.
    ///
    /// Duplicate names and coordinates are allowed; each call creates a
    /// distinct member.
    pub fn add_member(
        &mut self,
        name: impl Into<String>,
        shelter: Option<String>,
        position: Coordinates,
    ) -> &Member {
        self.last_member_id += 1;
        let member = Member::new(MemberId::new(self.last_member_id), name, shelter, position);
        debug!(id = %member.id, name = %member.name, "Added member");

        self.members.push(member);
        &self.members[self.members.len() - 1]
    }

    /// Flip the safety flag of a member.
    ///
    /// Returns the new flag, or `None` if no member has this id.
    pub fn toggle_safe(&mut self, id: MemberId) -> Option<bool> {
        let Some(member) = self.members.iter_mut().find(|m| m.id == id) else {
            trace!(%id, "Toggle ignored, no such member");
            return None;
        };

        member.safe = !member.safe;
        debug!(%id, safe = member.safe, "Toggled member status");
        Some(member.safe)
    }

    /// Remove a member.
    ///
    /// Returns the removed record, or `None` if no member has this id.
    pub fn remove_member(&mut self, id: MemberId) -> Option<Member> {
        let Some(index) = self.members.iter().position(|m| m.id == id) else {
            trace!(%id, "Remove ignored, no such member");
            return None;
        };

        let member = self.members.remove(index);
        debug!(%id, name = %member.name, "Removed member");
        Some(member)
    }

    /// Register a new shelter at the end of the shelter list.
    pub fn add_shelter(&mut self, name: impl Into<String>, position: Coordinates) -> &Shelter {
        self.last_shelter_id += 1;
        let shelter = Shelter::new(ShelterId::new(self.last_shelter_id), name, position);
        debug!(id = %shelter.id, name = %shelter.name, "Added shelter");

        self.shelters.push(shelter);
        &self.shelters[self.shelters.len() - 1]
    }

    /// All members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// All shelters in insertion order.
    #[must_use]
    pub fn shelters(&self) -> &[Shelter] {
        &self.shelters
    }

    /// Look up a member by id.
    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Look up a shelter by id.
    #[must_use]
    pub fn shelter(&self, id: ShelterId) -> Option<&Shelter> {
        self.shelters.iter().find(|s| s.id == id)
    }

    /// Number of registered members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Number of registered shelters.
    #[must_use]
    pub fn shelter_count(&self) -> usize {
        self.shelters.len()
    }

    /// Check whether the roster holds no members and no shelters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.shelters.is_empty()
    }

    /// Summary counts for the current session.
    #[must_use]
    pub fn stats(&self) -> RosterStats {
        let safe_members = self.members.iter().filter(|m| m.safe).count();
        RosterStats {
            total_members: self.members.len(),
            safe_members,
            missing_members: self.members.len() - safe_members,
            total_shelters: self.shelters.len(),
        }
    }
}

/// Roster statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterStats {
    /// Total number of members.
    pub total_members: usize,
    /// Members currently marked safe.
    pub safe_members: usize,
    /// Members currently marked missing.
    pub missing_members: usize,
    /// Total number of shelters.
    pub total_shelters: usize,
}
