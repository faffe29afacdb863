#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays one match over the referee line protocol.
//!
//! Commands go to stdout, one line per agent per turn. Logs go to stderr.

mod protocol;
mod settings;
mod summary;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use warden_core::Command;
use warden_system_classifier::{Classification, Classifier};
use warden_system_squad::Squad;
use warden_world::{self as world, World};

use protocol::LineReader;
use settings::Settings;

/// Plays the squad of the team whose stronghold the referee announces.
#[derive(Debug, Parser)]
#[command(name = "warden", version, about)]
struct Cli {
    /// TOML file overriding arena constants and planner thresholds.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter, for example `debug` or `warden_system_squad=trace`.
    /// Defaults to `RUST_LOG`, then `info`.
    #[arg(long)]
    log_level: Option<String>,
}

/// Entry point for the Warden command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let settings = Settings::load(cli.config.as_deref())?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), stdout.lock(), settings)
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("invalid log level `{level}`"))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

/// Plays turns until the referee closes the input.
fn run<R: BufRead, W: Write>(input: R, mut output: W, settings: Settings) -> Result<()> {
    let mut reader = LineReader::new(input);
    let header = reader.read_header().context("failed to read match header")?;

    let mut arena = settings.arena;
    if header.squad_size != arena.squad_size {
        tracing::warn!(
            announced = header.squad_size,
            configured = arena.squad_size,
            "squad size differs from configuration"
        );
        arena.squad_size = header.squad_size;
        arena.defender_count = arena.defender_count.min(header.squad_size);
    }
    tracing::info!(base = ?header.base, squad_size = arena.squad_size, "match started");

    let mut world = World::new(arena, header.base);
    let mut classifier = Classifier::new();
    let mut classification = Classification::default();
    let mut squad = Squad::new(settings.squad);

    while let Some(snapshot) = reader.read_turn().context("failed to read turn")? {
        let agents = snapshot
            .entities
            .iter()
            .filter(|record| record.category == 1)
            .count();
        if let Err(error) = world::apply(&mut world, snapshot) {
            tracing::error!(%error, "snapshot rejected, holding every agent");
            for _ in 0..agents {
                writeln!(output, "{}", Command::Hold)?;
            }
            output.flush()?;
            continue;
        }

        classifier.handle(&world, &mut classification);
        summary::log_game_info(&world, &classification, &squad);

        let plan = squad.plan(&world, &classification);
        for order in plan.orders() {
            writeln!(output, "{order}")?;
        }
        output.flush().context("failed to flush commands")?;
    }

    tracing::info!(turns = world::query::turn(&world), "input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(input: &str) -> Vec<String> {
        let mut output = Vec::new();
        run(input.as_bytes(), &mut output, Settings::default()).expect("match plays");
        String::from_utf8(output)
            .expect("utf-8 output")
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn every_turn_emits_one_line_per_agent() {
        let input = "0 0\n3\n\
            3 0\n3 0\n4\n\
            0 1 2000 0 0 0 0 0 0 0 0\n\
            1 1 5000 5000 0 0 0 0 0 0 0\n\
            2 1 8000 4000 0 0 0 0 0 0 0\n\
            10 0 3000 0 0 0 10 -400 0 1 1\n\
            3 0\n3 0\n3\n\
            0 1 2000 0 0 0 0 0 0 0 0\n\
            1 1 5000 5000 0 0 0 0 0 0 0\n\
            2 1 8000 4000 0 0 0 0 0 0 0\n";

        let lines = play(input);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "MOVE 3000 0 Focus!");
        assert!(lines.iter().all(|line| line.starts_with("MOVE ")));
    }

    #[test]
    fn rejected_snapshot_holds_every_agent() {
        let input = "0 0\n3\n\
            3 0\n3 0\n2\n\
            0 1 2000 0 0 0 0 0 0 0 0\n\
            9 7 3000 0 0 0 10 0 0 0 0\n";

        assert_eq!(play(input), vec!["WAIT".to_owned()]);
    }

    #[test]
    fn negative_shield_rejects_only_that_turn() {
        let input = "0 0\n3\n\
            3 0\n3 0\n2\n\
            0 1 2000 0 -1 0 0 0 0 0 0\n\
            1 1 5000 5000 0 0 0 0 0 0 0\n\
            3 0\n3 0\n1\n\
            0 1 2000 0 0 0 0 0 0 0 0\n";

        let lines = play(input);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[..2], ["WAIT".to_owned(), "WAIT".to_owned()]);
        assert!(lines[2].starts_with("MOVE "));
    }

    #[test]
    fn debug_summary_does_not_change_the_orders() {
        let input = "0 0\n3\n\
            3 0\n3 0\n3\n\
            0 1 2000 0 0 0 0 0 0 0 0\n\
            2 2 3000 4000 0 0 0 0 0 0 0\n\
            10 0 3000 0 0 0 10 -400 0 1 1\n";
        let quiet = play(input);

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(io::sink)
            .finish();
        let verbose = tracing::subscriber::with_default(subscriber, || play(input));
        assert_eq!(verbose, quiet);
    }

    #[test]
    fn truncated_turn_is_an_error() {
        let mut output = Vec::new();
        let error = run("0 0\n3\n3 0\n".as_bytes(), &mut output, Settings::default())
            .expect_err("turn is incomplete");
        assert!(format!("{error:#}").contains("opposing stronghold"));
    }

    #[test]
    fn cli_accepts_config_and_log_level() {
        let cli = Cli::try_parse_from(["warden", "--config", "warden.toml", "--log-level", "debug"])
            .expect("valid arguments");
        assert_eq!(cli.config, Some(PathBuf::from("warden.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
