use anyhow::Context as _;
use clap::{Arg, ArgAction, Command};
use pvs_core::harness::{run_script, DemoBackend, SessionScript};
use pvs_core::session::{InitialView, SearchSession, SessionBackends};
use pvs_net::{EndpointConfig, SummaryEndpointShape, DEFAULT_ORIGIN};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Walkthrough exercising every flow against the built-in catalog.
const DEMO_SCRIPT: &str = "\
# Search, summarize the visible results, open one detail summary.
search:quantum
summarize
detail:1
escape
# Paginate a broader query, then traverse history.
search:a
page:2
back
forward
# Summarize the replayed page and close the panel.
summarize
close-panel
# Exercise the subscription form.
subscribe:reader@example.com
test-send:reader@example.com
";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn parse_shape(value: &str) -> anyhow::Result<SummaryEndpointShape> {
    match value {
        "per-paper" => Ok(SummaryEndpointShape::PerPaper),
        "combined" => Ok(SummaryEndpointShape::Combined),
        other => anyhow::bail!("unknown summary shape {other:?} (use per-paper or combined)"),
    }
}

fn load_script(path: &str) -> anyhow::Result<SessionScript> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read script file {path}"))?;
    Ok(SessionScript::parse(&text)?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Command::new("pvs")
        .version(pvs_core::VERSION)
        .about("View synchronization and summary orchestration for paginated search")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("demo")
                .about("Run a scripted session against the built-in demo catalog")
                .arg(
                    Arg::new("script")
                        .long("script")
                        .value_name("FILE")
                        .help("Script file to run instead of the built-in walkthrough"),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Run a scripted session against live HTTP endpoints")
                .arg(
                    Arg::new("script")
                        .long("script")
                        .value_name("FILE")
                        .required(true)
                        .help("Script file to run"),
                )
                .arg(
                    Arg::new("origin")
                        .long("origin")
                        .default_value(DEFAULT_ORIGIN)
                        .help("Origin the endpoint addresses resolve against"),
                )
                .arg(
                    Arg::new("shape")
                        .long("shape")
                        .default_value("per-paper")
                        .help("Summary endpoint shape: per-paper or combined"),
                ),
        )
        .subcommand(
            Command::new("endpoints")
                .about("Print the resolved endpoint addresses")
                .arg(
                    Arg::new("origin")
                        .long("origin")
                        .default_value(DEFAULT_ORIGIN)
                        .help("Origin the endpoint addresses resolve against"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("demo", args)) => {
            let script = match args.get_one::<String>("script") {
                Some(path) => load_script(path)?,
                None => SessionScript::parse(DEMO_SCRIPT)?,
            };

            let demo = Arc::new(DemoBackend::new());
            let backends = SessionBackends {
                transport: demo.clone(),
                summaries: demo.clone(),
                mailer: demo,
            };
            let session =
                SearchSession::new(EndpointConfig::default(), backends, InitialView::new());

            let report = run_script(&session, &script).await;
            println!("{}", report.generate_text());

            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("run", args)) => {
            let script = load_script(args.get_one::<String>("script").unwrap())?;
            let origin: Url = args
                .get_one::<String>("origin")
                .unwrap()
                .parse()
                .context("invalid origin address")?;
            let shape = parse_shape(args.get_one::<String>("shape").unwrap())?;

            let config = EndpointConfig::new(origin).with_shape(shape);
            let backends = SessionBackends::over_http(&config)?;
            let session = SearchSession::new(config, backends, InitialView::new());

            let report = run_script(&session, &script).await;
            println!("{}", report.generate_text());

            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("endpoints", args)) => {
            let origin: Url = args
                .get_one::<String>("origin")
                .unwrap()
                .parse()
                .context("invalid origin address")?;
            let config = EndpointConfig::new(origin);

            let search = config.search_address("example", Some(2))?;
            let batch = config.batch_address()?;
            let single = config.single_address()?;
            let combined = config.combined_address()?;
            let subscribe = config.subscribe_address()?;
            let test_email = config.test_email_address()?;

            if args.get_flag("json") {
                let listing = serde_json::json!({
                    "origin": config.origin().as_str(),
                    "search": search.as_str(),
                    "batch_summaries": batch.as_str(),
                    "single_summary": single.as_str(),
                    "combined_summary": combined.as_str(),
                    "subscribe": subscribe.as_str(),
                    "test_email": test_email.as_str(),
                });
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                println!("Origin: {}", config.origin());
                println!();
                println!("Search (sample):  {search}");
                println!("Batch summaries:  {batch}");
                println!("Single summary:   {single}");
                println!("Combined summary: {combined}");
                println!("Subscribe:        {subscribe}");
                println!("Test email:       {test_email}");
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
