//! Interactive movie agent
//!
//! Loads a JSON dataset into the in-memory sources and answers questions
//! typed on stdin, one conversation per process.
//!
//! Usage:
//!   cargo run --bin movie_agent -- --dataset data/movies.json
//!   cargo run --bin movie_agent -- --dataset data/movies.json --config agent.yaml --seed 7
//!
//! Commands:
//!   :reset   forget pending clarifications
//!   :quit    exit

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use movie_agent::agent::{Collaborators, KeywordClassifier, MovieAgent};
use movie_agent::config::AgentConfig;
use movie_agent::sources::MovieDataset;

const CONVERSATION: &str = "cli";

/// Ask questions about movies
#[derive(Parser, Debug)]
#[command(name = "movie_agent")]
#[command(about = "Conversational movie question answering over a local dataset")]
struct Args {
    /// Dataset JSON (entities, triples, crowd, embeddings, images)
    #[arg(long, short = 'd', env = "MOVIE_AGENT_DATASET")]
    dataset: PathBuf,

    /// Agent configuration YAML
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Seed for phrase selection (overrides the configuration)
    #[arg(long, short = 's')]
    seed: Option<u64>,

    /// Also print the interim "let me check" line
    #[arg(long)]
    acknowledge: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AgentConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AgentConfig::default(),
    };
    config.apply_env()?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let sources = MovieDataset::load(&args.dataset)
        .and_then(|dataset| dataset.build())
        .with_context(|| format!("loading dataset {}", args.dataset.display()))?;

    let classifier = Arc::new(KeywordClassifier::new(config.routing.clone()));
    let agent = MovieAgent::new(Collaborators::from_sources(sources, classifier), &config);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "Ask me about movies. :reset clears the conversation, :quit exits.")?;

    for line in stdin.lock().lines() {
        let line = line?;
        let text = line.trim();
        match text {
            "" => continue,
            ":quit" | ":q" => break,
            ":reset" => {
                agent.reset(CONVERSATION);
                writeln!(stdout, "(conversation reset)")?;
                continue;
            }
            _ => {}
        }

        if args.acknowledge {
            if let Some(interim) = agent.acknowledgement(CONVERSATION, text) {
                writeln!(stdout, "{interim}")?;
            }
        }
        writeln!(stdout, "{}\n", agent.handle_message(CONVERSATION, text))?;
        stdout.flush()?;
    }

    Ok(())
}
