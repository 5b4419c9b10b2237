use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use twentyq_cli::catalogue::load_catalogue;
use twentyq_cli::config::{GameConfig, ResolvedOutputs};
use twentyq_cli::logging::{init_logging, log_outcome};
use twentyq_cli::render::render_outcome;
use twentyq_cli::simulate::SimulationRunner;
use twentyq_cli::terminal::TerminalAnswerer;
use twentyq_core::AppInfo;
use twentyq_core::session::Session;

/// Twenty questions over a catalogue of entities, driven by information gain.
#[derive(Debug, Parser)]
#[command(name = "twentyq", author, version, about = "Information-gain guessing game")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "twentyq.yaml")]
    config: PathBuf,

    /// Override the catalogue file (YAML or JSON).
    #[arg(long, value_name = "FILE")]
    catalogue: Option<PathBuf>,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the question budget.
    #[arg(long, value_name = "COUNT")]
    max_questions: Option<u32>,

    /// Override the confidence needed to declare a guess.
    #[arg(long, value_name = "PROBABILITY")]
    confidence: Option<f64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play interactively on the terminal (default).
    Play,
    /// Let the engine guess every catalogue entity (or a seeded sample) against a truthful oracle.
    Simulate {
        /// RNG seed for target sampling.
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
        /// Number of sampled rounds; 0 plays each entity once.
        #[arg(long, value_name = "ROUNDS")]
        rounds: Option<usize>,
    },
    /// Load the configuration and catalogue, then exit.
    Validate,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = GameConfig::from_path(&cli.config)?;

    if let Some(catalogue) = cli.catalogue {
        // Command-line paths are relative to the working directory, not the config file.
        config.catalogue = catalogue.to_string_lossy().into_owned();
        if catalogue.is_relative() {
            config.base_dir = PathBuf::from(".");
        }
    }
    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }
    if let Some(max_questions) = cli.max_questions {
        config.session.max_questions = max_questions;
    }
    if let Some(confidence) = cli.confidence {
        config.session.confidence_threshold = confidence;
    }
    let command = cli.command.unwrap_or(Command::Play);
    if let Command::Simulate { seed, rounds } = &command {
        if let Some(seed) = seed {
            config.simulate.seed = Some(*seed);
        }
        if let Some(rounds) = rounds {
            config.simulate.rounds = *rounds;
        }
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let schema = config.schema()?;
    let catalogue_path = config.catalogue_path();
    let catalogue = load_catalogue(&catalogue_path, &schema)
        .with_context(|| format!("loading catalogue for run '{}'", config.run_id))?;

    match command {
        Command::Validate => {
            println!(
                "Configuration '{}' is valid: {} entities, {} attributes ({})",
                config.run_id,
                catalogue.len(),
                schema.len(),
                catalogue_path.display()
            );
            Ok(())
        }
        Command::Simulate { .. } => {
            let logging_guard = init_logging(&config.logging, &outputs)?;
            let runner = SimulationRunner::new(&config, &catalogue, &schema, outputs);
            let summary = runner.run().context("running simulation")?;
            println!(
                "Simulation complete for '{}': {} rounds, {} won, {} correct ({:.1}%), mean {:.2} questions",
                config.run_id,
                summary.rounds,
                summary.won,
                summary.correct,
                summary.accuracy() * 100.0,
                summary.mean_questions
            );
            println!(
                "  exhausted {}, stuck {}, no match {}",
                summary.exhausted, summary.stuck, summary.no_match
            );
            println!("Round log: {}", summary.jsonl_path.display());
            if let Some(guard) = logging_guard.as_ref() {
                println!("Telemetry log: {}", guard.telemetry_path.display());
            }
            Ok(())
        }
        Command::Play => {
            let _logging_guard = init_logging(&config.logging, &outputs)?;
            println!("{} {} ({})", AppInfo::name(), AppInfo::version(), AppInfo::codename());
            println!(
                "Think of one of {} entities. Answer 'quit' to stop.",
                catalogue.len()
            );

            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut answerer =
                TerminalAnswerer::new(stdin.lock(), stdout.lock(), &config, &catalogue, &schema);
            let mut session = Session::new(&catalogue, &schema, config.session);
            let outcome = session.run(&mut answerer);
            let mut out = answerer.into_output();

            log_outcome(&config.run_id, &outcome);
            render_outcome(&mut out, &catalogue, &schema, &outcome)
                .context("writing result")?;
            out.flush().context("flushing stdout")?;
            Ok(())
        }
    }
}
