use clap::Parser;
use feeltok::core::config::{self, CliOverrides};
use feeltok::core::model::FeedView;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "feeltok", about = "Terminal client for the FeelTok feed")]
struct Args {
    /// Feed to open on start
    #[arg(long, value_enum)]
    view: Option<FeedView>,

    /// Number of columns in the explore grid
    #[arg(long)]
    columns: Option<usize>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to feeltok.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Ok(log_file) = File::create("feeltok.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let file_config = config::load_config()?;
    let cli = CliOverrides {
        view: args.view,
        columns: args.columns,
    };
    let resolved = config::resolve(&file_config, &cli)?;

    log::info!(
        "FeelTok starting up: view={}, columns={}, viewer={}",
        resolved.view.label(),
        resolved.column_count,
        resolved.viewer.id
    );

    feeltok::tui::run(resolved)
}
