pub mod aggregate;
pub mod analyzer;
pub mod args;
pub mod config;
pub mod enrich;
pub mod error;
pub mod geo;
pub mod matcher;
pub mod stats;
pub mod utils;

pub use aggregate::{aggregate, Aggregate, Aggregator};
pub use analyzer::{print_analysis_results, Analyzer};
pub use args::Args;
pub use config::{AnalyzerConfig, GeoConfig};
pub use error::{AnalyzeError, LookupError};
pub use geo::{GeoLocation, GeoLookup, IpApiClient};
pub use matcher::{FailureRecord, LineMatcher};
pub use stats::{AnalysisResult, FrequencyTable, GeoRecord, RankedEntry};
