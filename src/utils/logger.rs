use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 函式庫與各執行檔的 tracing target
const TARGETS: [&str; 5] = [
    "solar_timetable",
    "civil_dawn",
    "solar_angle",
    "sun_times",
    "sunrise",
];

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    let mut directives: Vec<String> = TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

/// 日誌寫到 stderr，stdout 只保留結果文件
pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
