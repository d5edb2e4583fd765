use std::process::ExitCode;

use kinesis_producer_metrics::config::{load_config, print_schema};
use kinesis_producer_metrics::metrics::{catalog, effective_buckets, fq_name, register_global};
use kinesis_producer_metrics::utils::init_logging;
use tracing::error;

fn main() -> ExitCode {
    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--schema") {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error printing schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let path = arg.unwrap_or_else(|| "./config.yaml".to_string());
    let config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    let registration = match register_global(&config.metrics) {
        Ok(registration) => registration,
        Err(e) => {
            error!(error = %e, "metric catalog is invalid");
            return ExitCode::FAILURE;
        }
    };

    for descriptor in catalog() {
        let name = fq_name(&descriptor, &config.metrics);
        let status = if registration.failures.iter().any(|f| f.name() == name) {
            "unregistered"
        } else {
            "registered"
        };
        println!(
            "{}\t{}\t[{}]\t{:?}\t{}",
            name,
            descriptor.kind,
            descriptor.label_names.join(","),
            effective_buckets(&descriptor),
            status
        );
    }

    ExitCode::SUCCESS
}
