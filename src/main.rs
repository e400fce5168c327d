// Entry point.
//
// Runs the two exploratory reports one after the other:
// - the sales report reads `sales_data.csv`,
// - the catalog report reads `dataset.csv`,
// and both write their charts and text summaries into `outputs/`.
// The reports are independent: each gets its own config and chart style,
// and a failure in one is logged without skipping the other.
mod aggregate;
mod charts;
mod config;
mod error;
mod loader;
mod output;
mod pipeline;
mod reports;
mod types;
mod util;

use config::ReportConfig;
use log::{error, info, LevelFilter};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut failed = 0usize;

    println!("=== Superstore sales EDA ===\n");
    match pipeline::run_sales_report(&ReportConfig::sales()) {
        Ok(_) => println!("\nProject Completed Successfully\n"),
        Err(e) => {
            error!("sales report failed: {}", e);
            failed += 1;
        }
    }

    println!("=== Netflix catalog EDA ===\n");
    match pipeline::run_catalog_report(&ReportConfig::catalog()) {
        Ok(_) => println!("\nProject Completed Successfully\n"),
        Err(e) => {
            error!("catalog report failed: {}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        info!("{} of 2 reports failed", failed);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
