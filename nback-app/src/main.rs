//! nback: dual n-back training in the terminal
//!
//! Usage:
//!   nback                              → play today's 20 blocks as session "default"
//!   nback --session alice              → separate saved level per session
//!   nback --seed 42 --blocks 2         → reproducible short run

mod app;
mod console;

pub use app::App;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let app = App::new(app::Cli::parse())?;
    app.run()?;

    Ok(())
}
