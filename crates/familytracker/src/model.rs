//! Core entity types for familytracker.
//!
//! This module defines the two record types held by the roster: family
//! members with a safety flag, and shelters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a [`Member`], unique within its roster for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(u64);

/// Identifier of a [`Shelter`], unique within its roster for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShelterId(u64);

impl MemberId {
    /// Wrap a raw id value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl ShelterId {
    /// Wrap a raw id value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ShelterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A latitude/longitude pair in degrees.
///
/// No range check is applied; values outside the real-world bounds are kept
/// as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A registered family member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier (assigned by the roster).
    pub id: MemberId,

    /// Display name.
    pub name: String,

    /// Free-text name of an associated shelter, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelter: Option<String>,

    /// Last known position.
    #[serde(flatten)]
    pub position: Coordinates,

    /// Whether the member is marked safe.
    pub safe: bool,

    /// When this member was registered.
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member, marked safe.
    #[must_use]
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        shelter: Option<String>,
        position: Coordinates,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            shelter,
            position,
            safe: true,
            created_at: Utc::now(),
        }
    }

    /// Human-readable status label.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.safe {
            "Safe ✅"
        } else {
            "Missing ⚠️"
        }
    }
}

/// A registered shelter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelter {
    /// Unique identifier (assigned by the roster).
    pub id: ShelterId,

    /// Display name.
    pub name: String,

    /// Location of the shelter.
    #[serde(flatten)]
    pub position: Coordinates,

    /// When this shelter was registered.
    pub created_at: DateTime<Utc>,
}

impl Shelter {
    /// Create a new shelter.
    #[must_use]
    pub fn new(id: ShelterId, name: impl Into<String>, position: Coordinates) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            created_at: Utc::now(),
        }
    }
}
