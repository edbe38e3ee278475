use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::period::Period;
use crate::utils::coercion::lenient_string;

/// Raw upstream bar, fields kept as the strings the provider sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawBar {
    #[serde(rename = "1. open", default, deserialize_with = "lenient_string")]
    pub open: Option<String>,
    #[serde(rename = "2. high", default, deserialize_with = "lenient_string")]
    pub high: Option<String>,
    #[serde(rename = "3. low", default, deserialize_with = "lenient_string")]
    pub low: Option<String>,
    #[serde(rename = "4. close", default, deserialize_with = "lenient_string")]
    pub close: Option<String>,
    #[serde(rename = "5. volume", alias = "6. volume", default, deserialize_with = "lenient_string")]
    pub volume: Option<String>,
}

impl RawBar {
    pub fn new(open: &str, high: &str, low: &str, close: &str, volume: &str) -> Self {
        RawBar {
            open: Some(open.to_string()),
            high: Some(high.to_string()),
            low: Some(low.to_string()),
            close: Some(close.to_string()),
            volume: Some(volume.to_string()),
        }
    }
}

/// date string -> bar, as returned under a "Time Series (...)" key
pub type RawSeries = BTreeMap<String, RawBar>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        TimeSeriesPoint {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Chart-ready series derived from a raw payload. Recomputed on every call, never stored.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NormalizedSeries {
    pub period: Period,
    pub points: Vec<TimeSeriesPoint>,
    pub sampled_points: Vec<TimeSeriesPoint>,
    /// Parallel to `sampled_points`; blank where no tick label is drawn.
    pub labels: Vec<String>,
    pub price_change: f64,
    pub price_change_percent: f64,
}

impl NormalizedSeries {
    /// "no data" result: a valid outcome, not an error.
    pub fn empty(period: Period) -> Self {
        NormalizedSeries {
            period,
            points: Vec::new(),
            sampled_points: Vec::new(),
            labels: Vec::new(),
            price_change: 0.0,
            price_change_percent: 0.0,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.sampled_points.is_empty()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// (min low, max high) over all points
    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let low = self.points.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
        let high = self.points.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
        Some((low, high))
    }
}
