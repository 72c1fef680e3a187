//! Stop identifiers, stop records and vehicle modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid GTFS id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid GTFS id: {reason}")]
pub struct InvalidGtfsId {
    reason: &'static str,
}

/// A stable external identifier for a stop or trip, e.g. `HSL:1040129`.
///
/// Ids are opaque strings; the only guarantee is that they are non-empty
/// and carry no surrounding whitespace.
///
/// # Examples
///
/// ```
/// use transit_board::domain::GtfsId;
///
/// let id = GtfsId::parse("HSL:1040129").unwrap();
/// assert_eq!(id.as_str(), "HSL:1040129");
///
/// assert!(GtfsId::parse("").is_err());
/// assert!(GtfsId::parse(" HSL:1 ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GtfsId(String);

impl GtfsId {
    /// Parse a GTFS id from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidGtfsId> {
        if s.is_empty() {
            return Err(InvalidGtfsId {
                reason: "must not be empty",
            });
        }
        if s.trim() != s {
            return Err(InvalidGtfsId {
                reason: "must not have surrounding whitespace",
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GtfsId {
    type Error = InvalidGtfsId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl FromStr for GtfsId {
    type Err = InvalidGtfsId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<GtfsId> for String {
    fn from(id: GtfsId) -> Self {
        id.0
    }
}

impl fmt::Debug for GtfsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GtfsId({})", self.0)
    }
}

impl fmt::Display for GtfsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a stop search term is too short.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("search term must be at least {min} characters, got {len}", min = SearchTerm::MIN_CHARS)]
pub struct InvalidSearchTerm {
    len: usize,
}

/// A validated stop search term.
///
/// The term is trimmed and must contain at least three characters. Search
/// operations only accept this type, so a short term is rejected before any
/// network call is made.
///
/// # Examples
///
/// ```
/// use transit_board::domain::SearchTerm;
///
/// assert_eq!(SearchTerm::parse("  Kamppi ").unwrap().as_str(), "Kamppi");
/// assert!(SearchTerm::parse("Ka").is_err());
/// assert!(SearchTerm::parse("  ab  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Minimum number of characters after trimming.
    pub const MIN_CHARS: usize = 3;

    pub fn parse(s: &str) -> Result<Self, InvalidSearchTerm> {
        let trimmed = s.trim();
        let len = trimmed.chars().count();
        if len < Self::MIN_CHARS {
            return Err(InvalidSearchTerm { len });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing an unrecognized vehicle mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vehicle mode: {0}")]
pub struct InvalidVehicleMode(String);

/// Transport mode served at a stop.
///
/// Modes not listed here (the provider may add e.g. `FUNICULAR`) are kept as
/// `Unknown` with their wire name, so they serialize back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleMode {
    Bus,
    Tram,
    Subway,
    Rail,
    Ferry,
    Walk,
    Bicycle,
    Car,
    Airplane,
    Coach,
    Unknown(String),
}

impl VehicleMode {
    /// Every known mode, in the order offered to users.
    pub const ALL: [VehicleMode; 10] = [
        VehicleMode::Bus,
        VehicleMode::Tram,
        VehicleMode::Subway,
        VehicleMode::Rail,
        VehicleMode::Ferry,
        VehicleMode::Walk,
        VehicleMode::Bicycle,
        VehicleMode::Car,
        VehicleMode::Airplane,
        VehicleMode::Coach,
    ];

    /// Wire name used by the provider.
    pub fn as_str(&self) -> &str {
        match self {
            VehicleMode::Bus => "BUS",
            VehicleMode::Tram => "TRAM",
            VehicleMode::Subway => "SUBWAY",
            VehicleMode::Rail => "RAIL",
            VehicleMode::Ferry => "FERRY",
            VehicleMode::Walk => "WALK",
            VehicleMode::Bicycle => "BICYCLE",
            VehicleMode::Car => "CAR",
            VehicleMode::Airplane => "AIRPLANE",
            VehicleMode::Coach => "COACH",
            VehicleMode::Unknown(name) => name,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            VehicleMode::Bus => "Bus",
            VehicleMode::Tram => "Tram",
            VehicleMode::Subway => "Metro",
            VehicleMode::Rail => "Train",
            VehicleMode::Ferry => "Ferry",
            VehicleMode::Walk => "Walk",
            VehicleMode::Bicycle => "Bicycle",
            VehicleMode::Car => "Car",
            VehicleMode::Airplane => "Airplane",
            VehicleMode::Coach => "Coach",
            VehicleMode::Unknown(_) => "Other",
        }
    }

    /// Short fixed-width badge for terminal output.
    pub fn badge(&self) -> &'static str {
        match self {
            VehicleMode::Bus => "[B]",
            VehicleMode::Tram => "[T]",
            VehicleMode::Subway => "[M]",
            VehicleMode::Rail => "[R]",
            VehicleMode::Ferry => "[F]",
            VehicleMode::Walk => "[W]",
            VehicleMode::Bicycle => "[C]",
            VehicleMode::Car => "[A]",
            VehicleMode::Airplane => "[P]",
            VehicleMode::Coach => "[K]",
            VehicleMode::Unknown(_) => UNKNOWN_BADGE,
        }
    }
}

/// Badge for stops whose mode is missing or unrecognised.
const UNKNOWN_BADGE: &str = "[?]";

impl From<String> for VehicleMode {
    fn from(name: String) -> Self {
        let known = Self::ALL.into_iter().find(|m| m.as_str() == name);
        known.unwrap_or(VehicleMode::Unknown(name))
    }
}

impl From<VehicleMode> for String {
    fn from(mode: VehicleMode) -> Self {
        match mode {
            VehicleMode::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for VehicleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleMode {
    type Err = InvalidVehicleMode;

    /// Parses a known wire name or label, ignoring case (`bus`, `SUBWAY`,
    /// `metro`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == upper || m.label().to_ascii_uppercase() == upper)
            .ok_or_else(|| InvalidVehicleMode(s.to_string()))
    }
}

fn mode_badge(mode: Option<&VehicleMode>) -> &'static str {
    mode.map_or(UNKNOWN_BADGE, VehicleMode::badge)
}

/// A favorite stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub gtfs_id: GtfsId,
    pub name: String,
    /// Short rider-facing code such as `E1234`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_mode: Option<VehicleMode>,
}

impl Stop {
    /// Badge of the stop's mode; `[?]` when the mode is missing.
    pub fn badge(&self) -> &'static str {
        mode_badge(self.vehicle_mode.as_ref())
    }
}

/// A stop as returned by a name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSearchItem {
    pub gtfs_id: GtfsId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_mode: Option<VehicleMode>,
}

impl StopSearchItem {
    /// Badge of the stop's mode; `[?]` when the mode is missing.
    pub fn badge(&self) -> &'static str {
        mode_badge(self.vehicle_mode.as_ref())
    }
}

impl From<StopSearchItem> for Stop {
    fn from(item: StopSearchItem) -> Self {
        Stop {
            gtfs_id: item.gtfs_id,
            name: item.name,
            code: item.code.filter(|c| !c.is_empty()),
            vehicle_mode: item.vehicle_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gtfs_id_rejects_blank_and_padded() {
        assert!(GtfsId::parse("").is_err());
        assert!(GtfsId::parse(" HSL:1").is_err());
        assert!(GtfsId::parse("HSL:1\n").is_err());
        assert!(GtfsId::parse("HSL:1").is_ok());
    }

    #[test]
    fn gtfs_id_deserialize_validates() {
        let id: GtfsId = serde_json::from_str("\"HSL:2222\"").unwrap();
        assert_eq!(id.as_str(), "HSL:2222");
        assert!(serde_json::from_str::<GtfsId>("\"\"").is_err());
    }

    #[test]
    fn search_term_counts_characters_not_bytes() {
        // Three characters, six bytes
        assert!(SearchTerm::parse("äöå").is_ok());
        assert!(SearchTerm::parse("äö").is_err());
    }

    #[test]
    fn search_term_error_message() {
        let err = SearchTerm::parse(" a ").unwrap_err();
        assert_eq!(err.to_string(), "search term must be at least 3 characters, got 1");
    }

    #[test]
    fn vehicle_mode_wire_names() {
        let mode: VehicleMode = serde_json::from_str("\"SUBWAY\"").unwrap();
        assert_eq!(mode, VehicleMode::Subway);
        assert_eq!(serde_json::to_string(&VehicleMode::Bus).unwrap(), "\"BUS\"");
    }

    #[test]
    fn unknown_vehicle_mode_keeps_wire_name() {
        let mode: VehicleMode = serde_json::from_str("\"FUNICULAR\"").unwrap();
        assert_eq!(mode, VehicleMode::Unknown("FUNICULAR".into()));
        assert_eq!(mode.label(), "Other");
        assert_eq!(mode.badge(), "[?]");
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"FUNICULAR\"");
    }

    #[test]
    fn search_item_passes_unknown_mode_through() {
        let json = r#"{"gtfsId":"HSL:1","name":"X","code":null,"vehicleMode":"FUNICULAR"}"#;
        let item: StopSearchItem = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&item).unwrap(), json);
        assert_eq!(item.badge(), "[?]");
    }

    #[test]
    fn unknown_modes_differ_by_name() {
        assert_ne!(
            VehicleMode::from("FUNICULAR".to_string()),
            VehicleMode::from("MONORAIL".to_string())
        );
        assert_eq!(VehicleMode::from("TRAM".to_string()), VehicleMode::Tram);
    }

    #[test]
    fn vehicle_mode_from_str() {
        assert_eq!("bus".parse::<VehicleMode>().unwrap(), VehicleMode::Bus);
        assert_eq!("Metro".parse::<VehicleMode>().unwrap(), VehicleMode::Subway);
        assert_eq!("RAIL".parse::<VehicleMode>().unwrap(), VehicleMode::Rail);
        assert!("unknown".parse::<VehicleMode>().is_err());
        assert!("hovercraft".parse::<VehicleMode>().is_err());
    }

    #[test]
    fn every_known_mode_has_distinct_badge() {
        let mut badges: Vec<_> = VehicleMode::ALL.iter().map(|m| m.badge()).collect();
        badges.sort_unstable();
        badges.dedup();
        assert_eq!(badges.len(), VehicleMode::ALL.len());
    }

    #[test]
    fn stop_omits_missing_optional_fields() {
        let stop = Stop {
            gtfs_id: GtfsId::parse("HSL:1").unwrap(),
            name: "Kamppi".to_string(),
            code: None,
            vehicle_mode: None,
        };
        assert_eq!(
            serde_json::to_string(&stop).unwrap(),
            r#"{"gtfsId":"HSL:1","name":"Kamppi"}"#
        );
    }

    #[test]
    fn search_item_promotes_null_code_to_absent() {
        let item: StopSearchItem = serde_json::from_str(
            r#"{"gtfsId":"HSL:1","name":"Kamppi","code":null,"vehicleMode":"BUS"}"#,
        )
        .unwrap();
        let stop = Stop::from(item);
        assert_eq!(stop.code, None);
        assert_eq!(stop.vehicle_mode, Some(VehicleMode::Bus));
    }
}
