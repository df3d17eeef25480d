// Temperature reading domain models
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One observed sample from the history endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reading {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub cpu_temp: f64,
    pub battery_temp: f64,
}

impl Reading {
    #[cfg(test)]
    pub fn new(timestamp: DateTime<Utc>, cpu_temp: f64, battery_temp: f64) -> Self {
        Self {
            timestamp,
            cpu_temp,
            battery_temp,
        }
    }
}

/// One forecast sample from the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub predicted_cpu_temp: f64,
    pub predicted_battery_temp: f64,
}

impl Prediction {
    #[cfg(test)]
    pub fn new(timestamp: DateTime<Utc>, predicted_cpu_temp: f64, predicted_battery_temp: f64) -> Self {
        Self {
            timestamp,
            predicted_cpu_temp,
            predicted_battery_temp,
        }
    }
}

/// Accepts RFC 3339 timestamps as well as naive ISO-8601 ones, which are
/// taken to be UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(time) => Ok(time.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}
