use std::io::{self, BufReader, Stdin, Stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nback_session::{DayEnd, JsonLevelStore, RngSource, SessionConfig, SessionRunner};
use rand::rngs::StdRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::console::ConsolePresenter;

#[derive(Parser, Debug)]
#[command(
    name = "nback",
    about = "Dual n-back working memory training",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Session name; each session keeps its own level
    #[arg(short, long, default_value = "default")]
    session: String,

    /// JSON file holding the saved levels
    #[arg(long, default_value = "nback-levels.json")]
    store: PathBuf,

    /// Block protocol overrides (JSON, see SessionConfig)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible stimulus sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Blocks to play today
    #[arg(short, long)]
    blocks: Option<u32>,
}

pub struct App {
    runner: SessionRunner<RngSource<StdRng>, ConsolePresenter<BufReader<Stdin>, Stdout>, JsonLevelStore>,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        init_logging();

        let mut config = match &cli.config {
            Some(path) => SessionConfig::from_path(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SessionConfig::default(),
        };
        if let Some(blocks) = cli.blocks {
            config.blocks_per_day = blocks;
        }
        config.validate().context("invalid session config")?;

        let rng = match cli.seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_os_rng(),
        };
        let presenter = ConsolePresenter::new(BufReader::new(io::stdin()), io::stdout());
        let store = JsonLevelStore::new(&cli.store);
        let runner = SessionRunner::new(cli.session, config, rng, presenter, store)
            .context("starting session")?;

        Ok(Self { runner })
    }

    pub fn run(mut self) -> Result<()> {
        println!("=== DUAL N-BACK ===");
        println!("Press [a] when the square matches n steps back, [l] when the letter does,");
        println!("both for a dual match, ENTER for none, [q] to stop.\n");

        let summary = self.runner.run().context("training session failed")?;
        if summary.end == DayEnd::Interrupted {
            tracing::info!("session interrupted, level saved");
        }
        Ok(())
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nback=info,nback_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
