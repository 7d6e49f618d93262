use chrono::Datelike;
use clap::Parser;
use solar_timetable::config::{cli::exit_with_error, LocationArgs};
use solar_timetable::core::almanac::{
    normalize_thresholds, year_rows, DEFAULT_SAMPLE_HOUR, DEFAULT_THRESHOLDS,
};
use solar_timetable::core::clock::today;
use solar_timetable::core::output::{almanac_csv, deliver};
use solar_timetable::utils::logger;
use solar_timetable::{LocalStorage, SolarPositionModel};

#[derive(Debug, Parser)]
#[command(name = "sun-times")]
#[command(about = "Yearly CSV of sunrise, sunset and threshold angle crossings")]
struct Args {
    #[command(flatten)]
    location: LocationArgs,

    /// Calendar year, defaults to the current one
    #[arg(long)]
    year: Option<i32>,

    /// Threshold elevation angles in degrees
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_THRESHOLDS)]
    angles: Vec<f64>,

    /// Whole local hour at which the elevation is sampled
    #[arg(long, default_value_t = DEFAULT_SAMPLE_HOUR)]
    sample_hour: u32,

    /// Output CSV path
    #[arg(short, long, default_value = "sun_times.csv")]
    output: String,

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
    let angles = normalize_thresholds(&args.angles)?;
    let location = args.location.resolve().await?;
    let year = args
        .year
        .unwrap_or_else(|| today(location.timezone()).year());
    tracing::info!("📅 Computing {} for angles {:?}", year, angles);

    let rows = year_rows(
        &SolarPositionModel::new(),
        &location,
        year,
        &angles,
        args.sample_hour,
    )?;
    let csv = almanac_csv(&rows, &angles, args.sample_hour)?;

    if let Some(path) = deliver(&LocalStorage::current_dir(), Some(args.output.as_str()), &csv).await? {
        println!("Saved to {}", path);
    }
    Ok(())
}
