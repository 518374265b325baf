use anyhow::{Context, Result};
use clap::Parser;
use schedline::cli::{Cli, OutputFormat};
use schedline::config::LoaderConfig;
use schedline::ingest::{self, LoadOptions, TraceLoad};
use schedline::json_output::JsonReport;
use schedline::loader::{EventLoader, LoaderSet};
use schedline::string_bank::{StringBank, StringId};
use schedline::transition::ThreadTransition;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Config file first, then command-line overrides
fn resolve_config(args: &Cli) -> Result<LoaderConfig> {
    let mut config = match &args.config {
        Some(path) => LoaderConfig::from_toml(path)?,
        None => LoaderConfig::default(),
    };
    if args.switch_only {
        config.loader_set = LoaderSet::SwitchOnly;
    }
    if args.strict {
        config.strict = true;
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    config.validate().context("Invalid command-line options")?;
    Ok(config)
}

fn command_text(bank: &StringBank, id: StringId) -> String {
    bank.lookup(id)
        .map_or_else(|| "?".to_string(), |s| s.to_string())
}

fn print_transition(tt: &ThreadTransition, bank: &StringBank) {
    let cmd = tt.command();
    let prio = tt.priority();
    let cpu = tt.cpu();
    let state = tt.state();
    println!(
        "[{}] {} pid={} comm={}->{} prio={}->{} cpu={}->{} state={}->{} cpu_policy={}/{} state_policy={}/{}",
        tt.event_index(),
        tt.timestamp(),
        tt.pid(),
        command_text(bank, cmd.prev),
        command_text(bank, cmd.next),
        prio.prev,
        prio.next,
        cpu.prev,
        cpu.next,
        state.prev,
        state.next,
        tt.cpu_policies().forwards.as_str(),
        tt.cpu_policies().backwards.as_str(),
        tt.state_policies().forwards.as_str(),
        tt.state_policies().backwards.as_str(),
    );
}

fn print_load(load: TraceLoad, bank: &StringBank, format: OutputFormat, summary: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let transitions = if summary {
                &[][..]
            } else {
                &load.transitions[..]
            };
            let report = JsonReport::new(transitions, bank, load.stats);
            println!("{}", report.to_json()?);
        }
        OutputFormat::Text => {
            if !summary {
                for tt in &load.transitions {
                    print_transition(tt, bank);
                }
            }
            print!("{}", load.stats.to_report_string());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = resolve_config(&args)?;
    let bank = Arc::new(StringBank::new());
    let loader = EventLoader::new(config.loader_set.loaders(), Arc::clone(&bank))?;

    let events = ingest::read_events_from_path(&args.trace)?;
    let load = ingest::load_trace(&loader, &events, &LoadOptions::from(&config))
        .with_context(|| format!("Failed to interpret trace: {}", args.trace.display()))?;

    print_load(load, &bank, args.format, args.summary)
}
