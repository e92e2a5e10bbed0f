//! Record types for the three SLCSP input tables

use serde::{Deserialize, Serialize};
use std::fmt;

/// Row of the ZIP table. A ZIP code that spans counties appears once per county.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZipRecord {
    pub zipcode: String,
    pub state: String,
    pub county_code: String,
    pub rate_area: String,
}

/// Plan metal level (tier)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum MetalLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Catastrophic,
    Other(String),
}

impl From<&str> for MetalLevel {
    fn from(s: &str) -> Self {
        match s {
            "Bronze" => MetalLevel::Bronze,
            "Silver" => MetalLevel::Silver,
            "Gold" => MetalLevel::Gold,
            "Platinum" => MetalLevel::Platinum,
            "Catastrophic" => MetalLevel::Catastrophic,
            other => MetalLevel::Other(other.to_string()),
        }
    }
}

impl From<String> for MetalLevel {
    fn from(s: String) -> Self {
        match MetalLevel::from(s.as_str()) {
            MetalLevel::Other(_) => MetalLevel::Other(s),
            level => level,
        }
    }
}

impl fmt::Display for MetalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MetalLevel::Bronze => "Bronze",
            MetalLevel::Silver => "Silver",
            MetalLevel::Gold => "Gold",
            MetalLevel::Platinum => "Platinum",
            MetalLevel::Catastrophic => "Catastrophic",
            MetalLevel::Other(label) => label,
        };
        f.write_str(label)
    }
}

/// Row of the coverage plan table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanRecord {
    pub plan_id: String,
    pub state: String,
    pub metal_level: MetalLevel,
    pub rate: f64,
    pub rate_area: String,
}

impl PlanRecord {
    pub fn rate_area_key(&self) -> RateAreaKey {
        RateAreaKey::new(&self.state, &self.rate_area)
    }
}

/// Join key between ZIP records and plans. Rate area numbers repeat across
/// states, so the state is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RateAreaKey {
    pub state: String,
    pub rate_area: String,
}

impl RateAreaKey {
    pub fn new(state: &str, rate_area: &str) -> Self {
        Self {
            state: state.to_string(),
            rate_area: rate_area.to_string(),
        }
    }
}

impl fmt::Display for RateAreaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state, self.rate_area)
    }
}

/// Row of the request table, also the output row.
///
/// `rate` is blank on input and is filled by the resolver when the zipcode has
/// an unambiguous answer. An unparsable input rate reads as unset since the
/// resolver overwrites it anyway. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlcspRequest {
    pub zipcode: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub rate: Option<f64>,
}

impl SlcspRequest {
    pub fn new(zipcode: impl Into<String>) -> Self {
        Self {
            zipcode: zipcode.into(),
            rate: None,
        }
    }
}
