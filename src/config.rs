use std::time::Duration;

use crate::aggregate::DEFAULT_TOP_N;
use crate::args::Args;

pub const DEFAULT_GEO_ENDPOINT: &str = "http://ip-api.com/json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const MAX_LOOKUP_WORKERS: usize = 5;

#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// When false every address gets the placeholder record and no request is made.
    pub enabled: bool,
    pub endpoint: String,
    pub timeout: Duration,
    pub workers: usize,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_GEO_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            workers: default_workers(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub top_n: usize,
    pub geo: GeoConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            geo: GeoConfig::default(),
        }
    }
}

impl From<&Args> for AnalyzerConfig {
    fn from(args: &Args) -> Self {
        let defaults = GeoConfig::default();
        Self {
            top_n: args.top.unwrap_or(DEFAULT_TOP_N),
            geo: GeoConfig {
                enabled: !args.no_geo,
                endpoint: args.geo_endpoint.clone().unwrap_or(defaults.endpoint),
                timeout: args
                    .timeout
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
                workers: args.workers.unwrap_or(defaults.workers),
            },
        }
    }
}

/// At most five lookups ever run per analysis, so there is no point in more workers.
pub fn default_workers() -> usize {
    std::cmp::min(num_cpus::get(), MAX_LOOKUP_WORKERS).max(1)
}
