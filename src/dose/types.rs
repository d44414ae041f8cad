//! Dose request and report payloads.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Key the downstream medicine API expects from this service.
pub const ACCESS_KEY: i64 = 123;

/// Inbound request naming the medicine to calculate a dose for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseRequest {
    /// Identifier of the medicine (order) in the downstream API.
    ///
    /// Missing or `null` reads as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub medicine_id: i64,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of a dose calculation.
///
/// Either a dose in `0..=3` or [`DoseValue::NONE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DoseValue(i32);

impl DoseValue {
    /// Sentinel reported when no dose was computed.
    pub const NONE: DoseValue = DoseValue(-1);

    /// Largest dose the calculator produces.
    pub const MAX: i32 = 3;

    /// Build a computed dose. Returns `None` outside `0..=MAX`.
    pub fn new(value: i32) -> Option<Self> {
        (0..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for DoseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of the PUT sent to the downstream medicine API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DoseReport {
    pub access_key: i64,
    pub value: DoseValue,
}

impl DoseReport {
    pub fn new(value: DoseValue) -> Self {
        Self {
            access_key: ACCESS_KEY,
            value,
        }
    }
}
