use clap::Parser;
use solar_timetable::config::{cli::exit_with_error, date_or_today, LocationArgs};
use solar_timetable::core::events::events_for;
use solar_timetable::core::output::event_line;
use solar_timetable::utils::logger;
use solar_timetable::{SolarEvent, SolarPositionModel};

#[derive(Debug, Parser)]
#[command(name = "sunrise")]
#[command(about = "Local time of one solar event")]
struct Args {
    #[command(flatten)]
    location: LocationArgs,

    /// sunrise, solar_noon, sunset, civil_dawn, nautical_dusk, ...
    #[arg(long, default_value_t = SolarEvent::Sunrise)]
    event: SolarEvent,

    /// Local date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,

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
    let date = date_or_today(args.date.as_deref(), &location)?;

    let events = events_for(&SolarPositionModel::new(), &location, date)?;
    let at = events.require(args.event)?;

    println!("{}", event_line(&args.event.title(), &at));
    Ok(())
}
