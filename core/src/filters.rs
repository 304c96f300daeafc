//! Search filters and opaque structured inputs.
//!
//! The numeric filters are closed enumerations. They travel as plain integers
//! on both transports and to the platform client, so each one converts to and
//! from its wire integer and rejects anything outside its range.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declares a closed enumeration carried on the wire as a small integer.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        pub enum $name {
            #[default]
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $name {
            /// Parameter name this filter is read from.
            pub const FIELD: &'static str = $field;

            /// Parse a caller-supplied integer.
            ///
            /// # Errors
            ///
            /// Returns a validation error for values outside the enumeration.
            pub fn from_wire(value: i64) -> Result<Self, GatewayError> {
                match value {
                    $( $value => Ok(Self::$variant), )+
                    other => Err(GatewayError::validation(
                        $field,
                        format!("{other} is not one of {}", [$(stringify!($value)),+].join(", ")),
                    )),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = GatewayError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::from_wire(i64::from(value))
            }
        }
    };
}

wire_enum! {
    /// Result ordering for note search.
    SortType, "sort_type" {
        /// Platform's blended ranking.
        General = 0,
        /// Newest first.
        Latest = 1,
        /// Most liked first.
        MostLiked = 2,
        /// Most commented first.
        MostCommented = 3,
        /// Most collected first.
        MostCollected = 4,
    }
}

wire_enum! {
    /// Note media type.
    NoteType, "note_type" {
        /// Any note.
        Any = 0,
        /// Video notes only.
        Video = 1,
        /// Image notes only.
        Image = 2,
    }
}

wire_enum! {
    /// Publication window.
    NoteTime, "note_time" {
        /// No limit.
        Any = 0,
        /// Within one day.
        Day = 1,
        /// Within one week.
        Week = 2,
        /// Within half a year.
        HalfYear = 3,
    }
}

wire_enum! {
    /// Relationship between the viewer and the note.
    NoteRange, "note_range" {
        /// No limit.
        Any = 0,
        /// Already seen.
        Seen = 1,
        /// Not yet seen.
        Unseen = 2,
        /// From followed accounts.
        Followed = 3,
    }
}

wire_enum! {
    /// Distance from the caller's location.
    PosDistance, "pos_distance" {
        /// No limit.
        Any = 0,
        /// Same city.
        SameCity = 1,
        /// Nearby.
        Nearby = 2,
    }
}

/// Caller location used by distance filters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoDescriptor {
    /// Degrees north, -90..=90.
    pub latitude: f64,
    /// Degrees east, -180..=180.
    pub longitude: f64,
}

impl GeoDescriptor {
    /// Reject coordinates outside the valid ranges.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the `geo` parameter.
    pub fn validate(self) -> Result<Self, GatewayError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GatewayError::validation("geo", "latitude must be within -90..90"));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GatewayError::validation(
                "geo",
                "longitude must be within -180..180",
            ));
        }
        Ok(self)
    }
}

/// Filters accepted by note search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Ordering.
    pub sort_type: SortType,
    /// Media type.
    pub note_type: NoteType,
    /// Publication window.
    pub note_time: NoteTime,
    /// Viewer relationship.
    pub note_range: NoteRange,
    /// Distance filter.
    pub pos_distance: PosDistance,
    /// Caller location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoDescriptor>,
}

/// Proxy routing hints, forwarded to the platform client verbatim.
///
/// The gateway only checks that it is a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyDescriptor(Map<String, Value>);

impl ProxyDescriptor {
    /// Wrap an already-decoded object.
    #[must_use]
    pub const fn new(entries: Map<String, Value>) -> Self {
        Self(entries)
    }

    /// The raw entries.
    #[must_use]
    pub const fn entries(&self) -> &Map<String, Value> {
        &self.0
    }
}
