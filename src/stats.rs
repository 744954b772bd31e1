use serde::Serialize;
use std::collections::HashMap;

use crate::geo::GeoLocation;

pub const UNKNOWN_COUNTRY: &str = "Unknown";
pub const UNKNOWN_COUNTRY_CODE: &str = "??";

/// Occurrence counts that remember the order in which keys were first seen.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn count(&self, key: &str) -> u64 {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// The `limit` most frequent keys, highest first. Equal counts keep
    /// first-seen order since the sort is stable.
    pub fn top(&self, limit: usize) -> Vec<RankedEntry> {
        let mut ranked: Vec<&(String, u64)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(key, count)| RankedEntry {
                key: key.clone(),
                count: *count,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoRecord {
    pub address: String,
    pub country: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub count: u64,
}

impl GeoRecord {
    pub fn from_location(location: GeoLocation, count: u64) -> Self {
        Self {
            address: location.address,
            country: location.country,
            country_code: location.country_code,
            latitude: location.latitude,
            longitude: location.longitude,
            count,
        }
    }

    /// Placeholder used whenever a lookup fails or is skipped.
    pub fn unknown(address: &str, count: u64) -> Self {
        Self {
            address: address.to_string(),
            country: UNKNOWN_COUNTRY.to_string(),
            country_code: UNKNOWN_COUNTRY_CODE.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            count,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.country == UNKNOWN_COUNTRY && self.country_code == UNKNOWN_COUNTRY_CODE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub total_failures: u64,
    pub top_addresses: Vec<RankedEntry>,
    pub top_usernames: Vec<RankedEntry>,
    /// One record per entry of `top_addresses`, in the same rank order.
    pub geo_records: Vec<GeoRecord>,
}
