//! Place record model
//!
//! A place is identified by `placeName|address` (exact concatenation, no
//! normalization). Each submission appends one reason to the place's list.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::{Error, Result};

/// Places with at least this many reasons are highlighted in rankings
pub const HIGHLIGHT_THRESHOLD: usize = 5;

/// Build the identity key for a place
///
/// Two places with the same name but a different address (including case or
/// trailing whitespace differences) produce different keys.
pub fn identity_key(place_name: &str, address: &str) -> String {
    format!("{}|{}", place_name, address)
}

/// Aggregated place record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub place_name: String,
    #[serde(default)]
    pub address: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Reasons in submission order (append-only)
    pub reasons: Vec<String>,
}

impl Place {
    /// Create a record with no reasons yet from the first submission for its key
    pub fn from_submission(submission: &Submission) -> Self {
        Self {
            place_name: submission.place_name.clone(),
            address: submission.address.clone(),
            x: submission.x,
            y: submission.y,
            reasons: Vec::new(),
        }
    }

    pub fn key(&self) -> String {
        identity_key(&self.place_name, &self.address)
    }

    /// Number of recommendations (one per reason)
    pub fn recommendation_count(&self) -> usize {
        self.reasons.len()
    }
}

/// A validated recommendation submission
///
/// `place_name` and `reason` are guaranteed non-empty. Strings are kept
/// verbatim; no trimming or case folding is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    place_name: String,
    address: String,
    x: Option<f64>,
    y: Option<f64>,
    reason: String,
}

impl Submission {
    /// Validate and build a submission
    ///
    /// An absent address is stored as the empty string.
    pub fn new(
        place_name: impl Into<String>,
        address: Option<String>,
        x: Option<f64>,
        y: Option<f64>,
        reason: impl Into<String>,
    ) -> Result<Self> {
        let place_name = place_name.into();
        let reason = reason.into();

        if place_name.is_empty() {
            return Err(Error::InvalidInput("placeName is required".to_string()));
        }
        if reason.is_empty() {
            return Err(Error::InvalidInput("reason is required".to_string()));
        }

        Ok(Self {
            place_name,
            address: address.unwrap_or_default(),
            x,
            y,
            reason,
        })
    }

    pub fn key(&self) -> String {
        identity_key(&self.place_name, &self.address)
    }

    pub fn place_name(&self) -> &str {
        &self.place_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn x(&self) -> Option<f64> {
        self.x
    }

    pub fn y(&self) -> Option<f64> {
        self.y
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// All place records in first-submission order
///
/// Serializes as a JSON object mapping identity key to place, keeping the
/// listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceListing {
    places: Vec<Place>,
}

impl PlaceListing {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Look up a place by identity key
    pub fn get(&self, key: &str) -> Option<&Place> {
        self.places.iter().find(|place| place.key() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Place> {
        self.places.iter()
    }

    /// Places ordered by recommendation count, highest first
    ///
    /// Ties keep first-submission order.
    pub fn ranked(&self) -> Vec<RankedPlace> {
        let mut ranked: Vec<RankedPlace> = self.places.iter().map(RankedPlace::from).collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

impl Serialize for PlaceListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.places.len()))?;
        for place in &self.places {
            map.serialize_entry(&place.key(), place)?;
        }
        map.end()
    }
}

/// Ranking entry for a place
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlace {
    pub key: String,
    pub place_name: String,
    pub address: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub count: usize,
    pub highlighted: bool,
}

impl From<&Place> for RankedPlace {
    fn from(place: &Place) -> Self {
        let count = place.recommendation_count();
        Self {
            key: place.key(),
            place_name: place.place_name.clone(),
            address: place.address.clone(),
            x: place.x,
            y: place.y,
            count,
            highlighted: count >= HIGHLIGHT_THRESHOLD,
        }
    }
}
