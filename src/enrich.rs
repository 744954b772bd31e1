use rayon::prelude::*;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{info, warn};

use crate::geo::GeoLookup;
use crate::stats::{FrequencyTable, GeoRecord, RankedEntry};

/// Outcome of one lookup. `resolved` is false when the record is a placeholder
/// substituted for a failed request.
struct Located {
    record: GeoRecord,
    resolved: bool,
}

/// Distinct addresses of `ranked`, in rank order.
pub fn lookup_targets(ranked: &[RankedEntry]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ranked
        .iter()
        .map(|entry| entry.key.as_str())
        .filter(|address| seen.insert(*address))
        .collect()
}

/// Geolocates every distinct address of `ranked` on a pool of `workers` threads.
///
/// Each address is requested at most once. A failed lookup only degrades its
/// own record to [`GeoRecord::unknown`]; counts always come from `counts`.
/// Output follows the rank order of `ranked`. Passing `None` for `lookup`
/// skips the network and yields placeholders for every address.
pub fn enrich_addresses(
    lookup: Option<&dyn GeoLookup>,
    ranked: &[RankedEntry],
    counts: &FrequencyTable,
    workers: usize,
) -> Vec<GeoRecord> {
    let targets = lookup_targets(ranked);

    let lookup = match lookup {
        Some(lookup) if !targets.is_empty() => lookup,
        _ => {
            return targets
                .into_iter()
                .map(|address| GeoRecord::unknown(address, counts.count(address)))
                .collect()
        }
    };

    let start_time = Instant::now();
    let workers = workers.clamp(1, targets.len());
    info!(
        action = "start",
        component = "geo_enrichment",
        address_count = targets.len(),
        worker_count = workers,
        "Starting geolocation lookups"
    );

    let located: Vec<Located> = match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("geo-lookup-{}", i))
        .build()
    {
        Ok(pool) => pool.install(|| {
            targets
                .par_iter()
                .map(|address| locate(lookup, address, counts.count(address)))
                .collect()
        }),
        Err(e) => {
            warn!(action = "configure", component = "geo_enrichment", error = %e, "Falling back to sequential lookups");
            targets
                .iter()
                .map(|address| locate(lookup, address, counts.count(address)))
                .collect()
        }
    };

    let resolved = located.iter().filter(|l| l.resolved).count();
    let records: Vec<GeoRecord> = located.into_iter().map(|l| l.record).collect();
    info!(
        action = "complete",
        component = "geo_enrichment",
        resolved,
        unresolved = records.len() - resolved,
        duration_ms = start_time.elapsed().as_millis(),
        "Geolocation lookups completed"
    );

    records
}

fn locate(lookup: &dyn GeoLookup, address: &str, count: u64) -> Located {
    match lookup.lookup(address) {
        Ok(location) => Located {
            record: GeoRecord::from_location(location, count),
            resolved: true,
        },
        Err(e) => {
            warn!(action = "lookup", component = "geo_enrichment", address, error = %e, "Could not geolocate address");
            Located {
                record: GeoRecord::unknown(address, count),
                resolved: false,
            }
        }
    }
}
