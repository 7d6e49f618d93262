use chrono::Utc;
use clap::Parser;
use solar_timetable::config::{cli::exit_with_error, LocationArgs};
use solar_timetable::core::clock::{parse_date, parse_hhmm, resolve_instant};
use solar_timetable::core::output::elevation_line;
use solar_timetable::core::SolarModel;
use solar_timetable::utils::logger;
use solar_timetable::SolarPositionModel;

#[derive(Debug, Parser)]
#[command(name = "solar-angle")]
#[command(about = "Solar elevation angle now or at a given local time")]
struct Args {
    #[command(flatten)]
    location: LocationArgs,

    /// Local time (HH:MM), defaults to now
    #[arg(long)]
    at: Option<String>,

    /// Local date (YYYY-MM-DD), defaults to today; without --at keeps the current time of day
    #[arg(long)]
    date: Option<String>,

    /// Print only the angle in degrees
    #[arg(long)]
    raw: bool,

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
    let location = args.location.resolve().await?;
    let tz = location.timezone();

    let date = args.date.as_deref().map(parse_date).transpose()?;
    let time = args.at.as_deref().map(parse_hhmm).transpose()?;
    let at = resolve_instant(Utc::now().with_timezone(&tz), date, time)?;

    let elevation = SolarPositionModel::new().elevation(&location, &at)?;
    tracing::debug!("☀️ Elevation at {}: {}", at, elevation);

    if args.raw {
        println!("{:.2}", elevation);
    } else {
        println!("{}", elevation_line(&at, elevation));
    }
    Ok(())
}
