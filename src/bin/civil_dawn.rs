use clap::Parser;
use solar_timetable::config::{cli::exit_with_error, date_or_today, LocationArgs};
use solar_timetable::core::almanac::dawn_outlook;
use solar_timetable::core::output::{deliver, outlook_json};
use solar_timetable::domain::model::Depression;
use solar_timetable::utils::{logger, validation::validate_positive_number};
use solar_timetable::{LocalStorage, SolarPositionModel};

#[derive(Debug, Parser)]
#[command(name = "civil-dawn")]
#[command(about = "Dawn times for the coming days as JSON")]
struct Args {
    #[command(flatten)]
    location: LocationArgs,

    /// Number of consecutive days
    #[arg(long, default_value_t = 14)]
    days: usize,

    /// First date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start: Option<String>,

    /// civil, nautical or astronomical
    #[arg(long, default_value_t = Depression::Civil)]
    depression: Depression,

    /// Write the JSON document to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(args).await {
        exit_with_error(&e);
    }
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    validate_positive_number("days", args.days, 1)?;

    let location = args.location.resolve().await?;
    let start = date_or_today(args.start.as_deref(), &location)?;
    tracing::info!(
        "🌅 {} dawn for {} days from {}",
        args.depression.label(),
        args.days,
        start
    );

    let model = SolarPositionModel::new();
    let days = dawn_outlook(&model, &location, start, args.days, args.depression)?;
    let json = outlook_json(&days)?;

    deliver(&LocalStorage::current_dir(), args.output.as_deref(), json.as_bytes()).await?;
    Ok(())
}
