use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "authscan",
    about = "Analyze an SSH auth log for failed logins and geolocate the worst offenders",
    version,
    long_about = None
)]
pub struct Args {
    /// Authentication log to analyze (e.g. /var/log/auth.log)
    pub log_file: PathBuf,

    /// Number of top addresses and usernames to report
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Timeout in seconds for each geolocation request
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Number of concurrent geolocation requests
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Base URL of the ip-api compatible geolocation service
    #[arg(long)]
    pub geo_endpoint: Option<String>,

    /// Skip geolocation lookups entirely
    #[arg(long)]
    pub no_geo: bool,

    /// Print the analysis as JSON instead of a text report
    #[arg(long)]
    pub json: bool,

    /// Redact addresses in the text report
    #[arg(long)]
    pub redact: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
