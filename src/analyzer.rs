use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::aggregate::{Aggregate, Aggregator};
use crate::config::AnalyzerConfig;
use crate::enrich::enrich_addresses;
use crate::error::{AnalyzeError, LookupError, Result};
use crate::geo::{GeoLookup, IpApiClient};
use crate::matcher::LineMatcher;
use crate::stats::AnalysisResult;
use crate::utils::{format_number, redact_address};
use crate::Args;

pub struct Analyzer {
    config: AnalyzerConfig,
    matcher: LineMatcher,
    lookup: Option<Box<dyn GeoLookup>>,
}

impl Analyzer {
    /// Analyzer backed by the ip-api HTTP client, or by no lookups at all when
    /// geolocation is disabled.
    pub fn new(config: AnalyzerConfig) -> std::result::Result<Self, LookupError> {
        let lookup: Option<Box<dyn GeoLookup>> = if config.geo.enabled {
            Some(Box::new(IpApiClient::new(&config.geo)?))
        } else {
            None
        };
        Ok(Self {
            config,
            matcher: LineMatcher::new(),
            lookup,
        })
    }

    pub fn with_lookup(config: AnalyzerConfig, lookup: Box<dyn GeoLookup>) -> Self {
        Self {
            config,
            matcher: LineMatcher::new(),
            lookup: Some(lookup),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze_file(&self, path: &Path) -> Result<AnalysisResult> {
        info!(action = "open", component = "log_source", file_path = ?path, "Opening log file");
        let file = File::open(path).map_err(|source| AnalyzeError::SourceRead {
            name: path.display().to_string(),
            source,
        })?;
        self.analyze_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Runs the full pipeline over `reader`. `name` only labels errors and logs.
    pub fn analyze_reader<R: BufRead>(&self, reader: R, name: &str) -> Result<AnalysisResult> {
        let total_start_time = Instant::now();
        info!(action = "start", component = "analysis", source = name, "Starting auth log analysis");

        let aggregate = self.scan(reader, name)?;

        let geo_records = enrich_addresses(
            self.lookup.as_deref(),
            &aggregate.top_addresses,
            &aggregate.address_counts,
            self.config.geo.workers,
        );

        info!(
            action = "complete",
            component = "analysis",
            total_failures = aggregate.total_failures,
            duration_ms = total_start_time.elapsed().as_millis(),
            "Analysis completed successfully"
        );

        Ok(AnalysisResult {
            total_failures: aggregate.total_failures,
            top_addresses: aggregate.top_addresses,
            top_usernames: aggregate.top_usernames,
            geo_records,
        })
    }

    /// Reads every line, replacing invalid UTF-8 rather than failing on it.
    fn scan<R: BufRead>(&self, mut reader: R, name: &str) -> Result<Aggregate> {
        let start_time = Instant::now();
        let mut aggregator = Aggregator::new();
        let mut buf = Vec::new();
        let mut lines = 0u64;
        let mut lossy_lines = 0u64;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| AnalyzeError::SourceRead {
                    name: name.to_string(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            lines += 1;

            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                lossy_lines += 1;
            }
            if let Some(record) = self.matcher.match_line(&line) {
                aggregator.push(&record);
            }
        }

        if lossy_lines > 0 {
            warn!(action = "decode", component = "log_scan", lossy_lines, "Replaced invalid UTF-8 in some lines");
        }
        info!(
            action = "complete",
            component = "log_scan",
            lines,
            total_failures = aggregator.total_failures(),
            duration_ms = start_time.elapsed().as_millis(),
            "Log scan completed"
        );

        Ok(aggregator.finish(self.config.top_n))
    }
}

pub fn print_analysis_results(result: &AnalysisResult, args: &Args) {
    let display_address = |address: &str| {
        if args.redact {
            redact_address(address)
        } else {
            address.to_string()
        }
    };

    println!("\n--- {} Failed Login Analysis ---", args.log_file.display());
    println!(
        "Total failed password attempts: {}",
        format_number(result.total_failures)
    );

    if result.total_failures == 0 {
        println!("No failed password attempts found.");
        return;
    }

    println!("\nTop {} source addresses:", result.top_addresses.len());
    for entry in &result.top_addresses {
        println!(
            "- {}: {} attempts",
            display_address(&entry.key),
            format_number(entry.count)
        );
    }

    println!("\nTop {} attempted usernames:", result.top_usernames.len());
    for entry in &result.top_usernames {
        println!("- {}: {} attempts", entry.key, format_number(entry.count));
    }

    println!("\nGeolocation:");
    for record in &result.geo_records {
        println!(
            "- {} [{}] {} ({:.4}, {:.4}): {} attempts",
            display_address(&record.address),
            record.country_code,
            record.country,
            record.latitude,
            record.longitude,
            format_number(record.count)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeoConfig;
    use std::io::{self, Cursor, Read};

    fn offline() -> Analyzer {
        Analyzer::new(AnalyzerConfig {
            geo: GeoConfig {
                enabled: false,
                ..GeoConfig::default()
            },
            ..AnalyzerConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_utf8_does_not_abort() {
        let mut input = b"garbage \xff\xfe line\n".to_vec();
        input.extend_from_slice(b"Failed password for r\xffoot from 10.0.0.1 port 22 ssh2\n");
        input.extend_from_slice(b"Failed password for admin from 10.0.0.2 port 22 ssh2");

        let result = offline().analyze_reader(Cursor::new(input), "mixed").unwrap();
        assert_eq!(result.total_failures, 2);
        assert_eq!(result.top_usernames[0].key, "r\u{FFFD}oot");
        assert_eq!(result.top_usernames[1].key, "admin");
    }

    #[test]
    fn crlf_lines_match() {
        let input = "Failed password for root from 10.0.0.1 port 22 ssh2\r\n";
        let result = offline().analyze_reader(Cursor::new(input), "crlf").unwrap();
        assert_eq!(result.top_addresses[0].key, "10.0.0.1");
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn read_failure_is_fatal() {
        let err = offline()
            .analyze_reader(io::BufReader::new(BrokenReader), "broken")
            .unwrap_err();
        match err {
            AnalyzeError::SourceRead { name, source } => {
                assert_eq!(name, "broken");
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
        }
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = offline()
            .analyze_file(Path::new("/nonexistent/auth.log"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/auth.log"));
    }
}
