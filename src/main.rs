use anyhow::{Context, Result};
use authscan::utils::{setup_logging, validate_args};
use authscan::{print_analysis_results, Analyzer, AnalyzerConfig, Args};
use clap::Parser;
use tracing::error;

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    let config = AnalyzerConfig::from(&args);
    let analyzer = Analyzer::new(config).context("Failed to set up geolocation client")?;

    match analyzer.analyze_file(&args.log_file) {
        Ok(result) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_analysis_results(&result, &args);
            }
            Ok(())
        }
        Err(e) => {
            error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
