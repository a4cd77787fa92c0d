//! Map projection of the roster.
//!
//! The map holds no roster state of its own: markers, the member list and the
//! GeoJSON export are recomputed from the current [`Roster`] on every call.
//! The only local state is the visibility of the two entry forms and the
//! viewport.

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::MapConfig;
use crate::model::{Coordinates, Member, Shelter};
use crate::roster::Roster;

/// Default marker pin image.
pub const MARKER_ICON_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images/marker-icon.png";

/// High-density marker pin image.
pub const MARKER_ICON_RETINA_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images/marker-icon-2x.png";

/// Marker pin shadow image.
pub const MARKER_SHADOW_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images/marker-shadow.png";

/// Text shown in the member list when nobody is registered.
pub const EMPTY_MEMBER_LIST: &str = "No members added yet.";

const SAFE_ICON: &str = "👤🏠";
const MISSING_ICON: &str = "👤❌";
const SHELTER_ICON: &str = "🏠";

/// What a marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerKind {
    /// A family member and their current status.
    Member {
        /// Whether the member is marked safe.
        safe: bool,
    },
    /// A shelter.
    Shelter,
}

/// A positioned, labelled map marker.
///
/// Serializes to the GeoJSON `properties` of the marker's feature; the
/// position goes into the feature geometry instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Id of the underlying record within its collection.
    pub id: u64,
    /// Record type and status.
    #[serde(flatten)]
    pub kind: MarkerKind,
    /// Display name of the record.
    pub name: String,
    /// Free-text shelter name given for a member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelter: Option<String>,
    /// Marker position.
    #[serde(skip)]
    pub position: Coordinates,
    /// Permanent label shown above the pin.
    pub tooltip: String,
    /// Lines shown when the marker is opened.
    pub popup: Vec<String>,
}

impl Marker {
    /// Marker for a member.
    #[must_use]
    pub fn for_member(member: &Member) -> Self {
        let icon = if member.safe { SAFE_ICON } else { MISSING_ICON };
        Self {
            id: member.id.get(),
            kind: MarkerKind::Member { safe: member.safe },
            name: member.name.clone(),
            shelter: member.shelter.clone(),
            position: member.position,
            tooltip: tooltip(icon, &member.name, member.position),
            popup: vec![
                format!("{icon} {}", member.name),
                coordinates_line(member.position),
                format!("Status: {}", member.status_label()),
            ]
            .into_iter()
            .chain(member.shelter.as_ref().map(|s| format!("Shelter: {s}")))
            .collect(),
        }
    }

    /// Marker for a shelter.
    #[must_use]
    pub fn for_shelter(shelter: &Shelter) -> Self {
        Self {
            id: shelter.id.get(),
            kind: MarkerKind::Shelter,
            name: shelter.name.clone(),
            shelter: None,
            position: shelter.position,
            tooltip: tooltip(SHELTER_ICON, &shelter.name, shelter.position),
            popup: vec![
                format!("{SHELTER_ICON} {}", shelter.name),
                coordinates_line(shelter.position),
            ],
        }
    }
}

fn tooltip(icon: &str, name: &str, position: Coordinates) -> String {
    format!(
        "{icon} {name} ({:.4}, {:.4})",
        position.latitude, position.longitude
    )
}

fn coordinates_line(position: Coordinates) -> String {
    format!("Coordinates: {}, {}", position.latitude, position.longitude)
}

/// Which entry form a visibility toggle applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// The member form.
    Member,
    /// The shelter form.
    Shelter,
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Shelter => write!(f, "shelter"),
        }
    }
}

/// The map page: viewport, tile layer and form visibility.
#[derive(Debug, Clone)]
pub struct MapView {
    config: MapConfig,
    show_member_form: bool,
    show_shelter_form: bool,
}

impl MapView {
    /// Create a map view with both forms visible.
    #[must_use]
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            show_member_form: true,
            show_shelter_form: true,
        }
    }

    /// Initial map center.
    #[must_use]
    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.config.center_latitude, self.config.center_longitude)
    }

    /// Initial zoom level.
    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.config.zoom
    }

    /// Tile attribution text.
    #[must_use]
    pub fn attribution(&self) -> &str {
        &self.config.attribution
    }

    /// Expand the tile template for one tile.
    #[must_use]
    pub fn tile_url(&self, subdomain: char, zoom: u8, x: u32, y: u32) -> String {
        self.config
            .tile_url
            .replace("{s}", &subdomain.to_string())
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    /// Check whether a form is shown.
    #[must_use]
    pub fn is_form_visible(&self, form: FormKind) -> bool {
        match form {
            FormKind::Member => self.show_member_form,
            FormKind::Shelter => self.show_shelter_form,
        }
    }

    /// Flip the visibility of a form, returning the new state.
    pub fn toggle_form(&mut self, form: FormKind) -> bool {
        let flag = match form {
            FormKind::Member => &mut self.show_member_form,
            FormKind::Shelter => &mut self.show_shelter_form,
        };
        *flag = !*flag;
        *flag
    }

    /// Label of the button that toggles a form.
    #[must_use]
    pub fn toggle_label(&self, form: FormKind) -> String {
        let verb = if self.is_form_visible(form) {
            "Hide"
        } else {
            "Show"
        };
        let noun = match form {
            FormKind::Member => "Member",
            FormKind::Shelter => "Shelter",
        };
        format!("{verb} {noun} Form")
    }

    /// All markers: members first, then shelters, each in insertion order.
    #[must_use]
    pub fn markers(&self, roster: &Roster) -> Vec<Marker> {
        roster
            .members()
            .iter()
            .map(Marker::for_member)
            .chain(roster.shelters().iter().map(Marker::for_shelter))
            .collect()
    }

    /// Rows of the member list panel.
    #[must_use]
    pub fn member_list(&self, roster: &Roster) -> Vec<String> {
        if roster.members().is_empty() {
            return vec![EMPTY_MEMBER_LIST.to_string()];
        }
        roster
            .members()
            .iter()
            .map(|m| format!("[{}] {} | {}", m.id, m.name, m.status_label()))
            .collect()
    }

    /// Export every marker as a GeoJSON `FeatureCollection`.
    ///
    /// Positions are written longitude first, as GeoJSON requires. A marker
    /// whose position is not finite keeps its feature with a `null`
    /// geometry, so it stays listed without being placed.
    ///
    /// # Errors
    ///
    /// Returns an error if a marker cannot be serialized.
    pub fn to_geojson(&self, roster: &Roster) -> serde_json::Result<Value> {
        let features = self
            .markers(roster)
            .into_iter()
            .map(|marker| {
                let geometry = if marker.position.is_finite() {
                    json!({
                        "type": "Point",
                        "coordinates": [marker.position.longitude, marker.position.latitude],
                    })
                } else {
                    Value::Null
                };
                Ok(json!({
                    "type": "Feature",
                    "geometry": geometry,
                    "properties": serde_json::to_value(&marker)?,
                }))
            })
            .collect::<serde_json::Result<Vec<Value>>>()?;

        Ok(json!({
            "type": "FeatureCollection",
            "features": features,
        }))
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with_alice() -> (Roster, crate::model::MemberId) {
        let mut roster = Roster::new();
        let id = roster
            .add_member("Alice", None, Coordinates::new(28.61, 77.20))
            .id;
        (roster, id)
    }

    #[test]
    fn test_forms_visible_by_default() {
        let view = MapView::default();
        assert!(view.is_form_visible(FormKind::Member));
        assert!(view.is_form_visible(FormKind::Shelter));
    }

    #[test]
    fn test_toggle_form_is_independent() {
        let mut view = MapView::default();

        assert!(!view.toggle_form(FormKind::Member));
        assert!(!view.is_form_visible(FormKind::Member));
        assert!(view.is_form_visible(FormKind::Shelter));
        assert_eq!(view.toggle_label(FormKind::Member), "Show Member Form");
        assert_eq!(view.toggle_label(FormKind::Shelter), "Hide Shelter Form");

        assert!(view.toggle_form(FormKind::Member));
    }

    #[test]
    fn test_member_marker_safe() {
        let (roster, _) = roster_with_alice();
        let markers = MapView::default().markers(&roster);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, MarkerKind::Member { safe: true });
        assert_eq!(markers[0].tooltip, "👤🏠 Alice (28.6100, 77.2000)");
        assert_eq!(markers[0].popup[1], "Coordinates: 28.61, 77.2");
        assert_eq!(markers[0].popup[2], "Status: Safe ✅");
    }

    #[test]
    fn test_member_marker_follows_status() {
        let (mut roster, id) = roster_with_alice();
        roster.toggle_safe(id);

        let markers = MapView::default().markers(&roster);
        assert_eq!(markers[0].kind, MarkerKind::Member { safe: false });
        assert!(markers[0].tooltip.starts_with("👤❌"));
        assert_eq!(markers[0].popup[2], "Status: Missing ⚠️");
    }

    #[test]
    fn test_markers_members_then_shelters() {
        let (mut roster, _) = roster_with_alice();
        roster.add_shelter("Camp", Coordinates::new(1.0, 2.0));
        roster.add_member("Bob", None, Coordinates::new(3.0, 4.0));

        let markers = MapView::default().markers(&roster);
        let kinds: Vec<_> = markers.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            [
                MarkerKind::Member { safe: true },
                MarkerKind::Member { safe: true },
                MarkerKind::Shelter,
            ]
        );
        assert_eq!(markers[2].tooltip, "🏠 Camp (1.0000, 2.0000)");
    }

    #[test]
    fn test_nan_coordinates_render_as_nan() {
        let mut roster = Roster::new();
        roster.add_member("Ghost", None, Coordinates::new(f64::NAN, 1.0));

        let markers = MapView::default().markers(&roster);
        assert!(markers[0].tooltip.contains("NaN"));
    }

    #[test]
    fn test_member_list_empty() {
        let rows = MapView::default().member_list(&Roster::new());
        assert_eq!(rows, [EMPTY_MEMBER_LIST]);
    }

    #[test]
    fn test_member_list_rows() {
        let (mut roster, id) = roster_with_alice();
        roster.toggle_safe(id);

        let rows = MapView::default().member_list(&roster);
        assert_eq!(rows, [format!("[{id}] Alice | Missing ⚠️")]);
    }

    #[test]
    fn test_tile_url() {
        let view = MapView::default();
        assert_eq!(
            view.tile_url('a', 13, 5846, 3425),
            "https://a.tile.openstreetmap.org/13/5846/3425.png"
        );
        assert_eq!(view.attribution(), "&copy; OpenStreetMap contributors");
    }

    #[test]
    fn test_viewport_from_config() {
        let view = MapView::new(MapConfig {
            zoom: 5,
            center_latitude: 1.0,
            center_longitude: 2.0,
            ..MapConfig::default()
        });
        assert_eq!(view.zoom(), 5);
        assert_eq!(view.center(), Coordinates::new(1.0, 2.0));
    }

    #[test]
    fn test_geojson_export() {
        let (mut roster, _) = roster_with_alice();
        roster.add_shelter("Camp", Coordinates::new(1.0, 2.0));

        let geojson = MapView::default().to_geojson(&roster).unwrap();
        assert_eq!(geojson["type"], "FeatureCollection");

        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);

        let alice = &features[0];
        assert_eq!(alice["geometry"]["coordinates"][0], 77.20);
        assert_eq!(alice["geometry"]["coordinates"][1], 28.61);
        assert_eq!(alice["properties"]["kind"], "member");
        assert_eq!(alice["properties"]["safe"], true);
        assert_eq!(alice["properties"]["name"], "Alice");
        assert_eq!(alice["properties"]["id"], 1);
        assert!(alice["properties"].get("shelter").is_none());
        assert!(alice["properties"].get("position").is_none());

        assert_eq!(features[1]["properties"]["kind"], "shelter");
        assert_eq!(features[1]["properties"]["name"], "Camp");
    }

    #[test]
    fn test_geojson_includes_member_shelter_name() {
        let mut roster = Roster::new();
        roster.add_member(
            "Alice",
            Some("Community Hall".to_string()),
            Coordinates::new(1.0, 2.0),
        );

        let geojson = MapView::default().to_geojson(&roster).unwrap();
        let props = &geojson["features"][0]["properties"];
        assert_eq!(props["shelter"], "Community Hall");
        assert_eq!(props["popup"][3], "Shelter: Community Hall");
    }

    #[test]
    fn test_geojson_non_finite_position_has_null_geometry() {
        let mut roster = Roster::new();
        roster.add_member("Ghost", None, Coordinates::new(f64::NAN, 2.0));
        roster.add_member("Alice", None, Coordinates::new(1.0, 2.0));

        let geojson = MapView::default().to_geojson(&roster).unwrap();
        let features = geojson["features"].as_array().unwrap();

        assert_eq!(features.len(), 2);
        assert!(features[0]["geometry"].is_null());
        assert_eq!(features[0]["properties"]["name"], "Ghost");
        assert_eq!(features[1]["geometry"]["type"], "Point");
    }

    #[test]
    fn test_member_marker_carries_shelter() {
        let mut roster = Roster::new();
        roster.add_member("Alice", Some("Gym".to_string()), Coordinates::new(1.0, 2.0));

        let marker = &MapView::default().markers(&roster)[0];
        assert_eq!(marker.name, "Alice");
        assert_eq!(marker.shelter.as_deref(), Some("Gym"));
        assert_eq!(marker.popup.last().unwrap(), "Shelter: Gym");
    }
}
