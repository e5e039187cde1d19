use anyhow::Context;
use autodev_planning::{build_service, routes, PlanningSettings};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use std::sync::Arc;

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("AUTODEV_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("planning-agent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Architecture planning agent")
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_parser(value_parser!(u16))
                .help("Listen port (overrides configuration)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .get_matches();

    init_tracing(matches.get_flag("log-json"))?;

    let config_file = matches.get_one::<PathBuf>("config");
    let mut settings = PlanningSettings::load(config_file.map(PathBuf::as_path))
        .context("failed to load planning settings")?;
    if let Some(port) = matches.get_one::<u16>("port") {
        settings = settings.with_port(*port);
    }

    let service = build_service(&settings).context("failed to build planning service")?;
    let addr = settings.bind_addr();

    tracing::info!(%addr, "Planning agent listening");
    warp::serve(routes(Arc::new(service))).run(addr).await;

    Ok(())
}
