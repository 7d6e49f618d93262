use anyhow::Context;
use clap::Parser;
use solar_timetable::config::{cli::exit_with_error, date_or_today};
use solar_timetable::core::output::{deliver, timetable_json};
use solar_timetable::core::timetable::build_timetable;
use solar_timetable::utils::{logger, validation::Validate};
use solar_timetable::{LocalStorage, SolarPositionModel, TimetableConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = TimetableConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("🚀 Starting solar-timetable");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(config).await {
        exit_with_error(&e);
    }
    Ok(())
}

async fn run(config: TimetableConfig) -> anyhow::Result<()> {
    config.validate()?;

    let location = config.location.resolve().await?;
    tracing::info!(
        "📍 Location: {:.4}, {:.4} ({})",
        location.latitude(),
        location.longitude(),
        location.timezone()
    );

    let date = date_or_today(config.date.as_deref(), &location)?;
    let model = SolarPositionModel::new();
    let timetable = build_timetable(&model, &location, date, config.angle_step)?;
    let json = timetable_json(&timetable)?;

    let storage = LocalStorage::current_dir();
    if let Some(path) = deliver(&storage, config.output.as_deref(), json.as_bytes())
        .await
        .context("writing timetable")?
    {
        tracing::info!("📁 Output saved to: {}", path);
    }
    Ok(())
}
