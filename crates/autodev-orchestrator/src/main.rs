use anyhow::Context;
use autodev_orchestrator::{HttpAgentClient, Orchestrator, OrchestratorSettings, Story};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use std::sync::Arc;

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("AUTODEV_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr so the JSON report on stdout stays parseable.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

async fn load_story(path: Option<&PathBuf>) -> anyhow::Result<Story> {
    match path {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read story file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid story file {}", path.display()))
        }
        None => Ok(Story::sample()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("autodev-orchestrator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Drive a user story through the planning and emission agents")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("Process one story end to end")
                .arg(
                    Arg::new("story")
                        .long("story")
                        .value_parser(value_parser!(PathBuf))
                        .help("Story JSON file (built-in sample when omitted)"),
                ),
        )
        .get_matches();

    init_tracing(matches.get_flag("log-json"))?;

    let settings = OrchestratorSettings::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .context("failed to load orchestrator settings")?;

    match matches.subcommand() {
        Some(("run", args)) => {
            let story = load_story(args.get_one::<PathBuf>("story")).await?;
            let client = HttpAgentClient::new(&settings).context("failed to build agent client")?;
            let orchestrator = Orchestrator::new(Arc::new(client), settings.project_id.clone());

            let report = orchestrator.process_story(&story).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to render report")?
            );

            if !report.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
        _ => anyhow::bail!("unknown command"),
    }
}
