#![allow(dead_code)]

use authscan::{GeoLocation, GeoLookup, LookupError};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

pub fn write_log(lines: &[&str]) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    file.flush()?;
    Ok(file)
}

/// Deterministic geolocation: every address resolves to Amsterdam unless listed
/// as failing. Clones share the call log.
#[derive(Clone, Default)]
pub struct StubLookup {
    failing: Vec<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubLookup {
    pub fn resolving() -> Self {
        Self::default()
    }

    pub fn failing(addresses: &[&str]) -> Self {
        Self {
            failing: addresses.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl GeoLookup for StubLookup {
    fn lookup(&self, address: &str) -> Result<GeoLocation, LookupError> {
        self.calls.lock().unwrap().push(address.to_string());
        if self.failing.iter().any(|f| f == address) {
            return Err(LookupError::Status(500));
        }
        Ok(GeoLocation {
            address: address.to_string(),
            country: "Netherlands".to_string(),
            country_code: "NL".to_string(),
            latitude: 52.37,
            longitude: 4.89,
        })
    }
}
