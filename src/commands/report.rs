use clap::Args;
use std::path::Path;

use lazify::log_status;
use lazify::report;

#[derive(Args)]
pub struct ReportArgs {
    /// Path to the performance report JSON
    pub path: String,

    /// How many opportunities to list
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

pub fn run_text(args: ReportArgs) -> lazify::Result<(String, i32)> {
    let parsed = report::load_report(Path::new(&args.path))?;
    log_status!("report", "Loaded report from {}", args.path);

    Ok((report::format_report(&parsed, args.top), 0))
}
