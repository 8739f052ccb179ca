//! tickboard village demo
//!
//! Usage: `village [config.json] [--ticks N] [--seed N] [--json] [--realtime]`
//!
//! Builds a seeded village, drives it with fixed 100ms frames (or the real
//! wall clock with `--realtime`), raises a wood shortage halfway through and
//! logs a summary on shutdown.

use std::time::Duration;

use tickboard_core::{ResourceKind, Tick, TicketKind};
use tickboard_policy::ModifierRule;
use tickboard_runtime::{init_tracing, LogFormat, SimulationConfig};
use tickboard_time::WallClock;
use tickboard_test::VillageBuilder;

const FRAME: Duration = Duration::from_millis(100);

struct Args {
    config: Option<String>,
    ticks: u64,
    seed: u64,
    format: LogFormat,
    realtime: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        ticks: 1_000,
        seed: 1,
        format: LogFormat::Plain,
        realtime: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--ticks" => args.ticks = number(it.next(), "--ticks")?,
            "--seed" => args.seed = number(it.next(), "--seed")?,
            "--json" => args.format = LogFormat::Json,
            "--realtime" => args.realtime = true,
            path if !path.starts_with("--") => args.config = Some(path.to_string()),
            other => return Err(format!("unknown flag: {other}")),
        }
    }
    Ok(args)
}

fn number(value: Option<String>, flag: &str) -> Result<u64, String> {
    value
        .ok_or_else(|| format!("{flag} needs a value"))?
        .parse()
        .map_err(|e| format!("{flag}: {e}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;
    init_tracing(args.format);

    let config = match &args.config {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };

    let mut village = VillageBuilder::new(args.seed)
        .households(2)
        .workplaces(1)
        .agents_per_household(3)
        .config(config)
        .build()?;

    let shortage_at = Tick::new(args.ticks / 2);
    let mut shortage_raised = false;

    let mut wall = WallClock::new();
    while village.simulation.now().0 < args.ticks {
        let elapsed = if args.realtime {
            std::thread::sleep(FRAME);
            wall.elapsed()
        } else {
            FRAME
        };
        if village.simulation.update(elapsed) == 0 && !args.realtime {
            // speed 0 pauses the clock; step so the demo still ends
            village.simulation.step();
        }

        if !shortage_raised && village.simulation.now() >= shortage_at {
            let expires = village.simulation.now() + 200;
            village.simulation.world().modifiers.add(
                ModifierRule::new("wood-shortage", 2.0)
                    .for_kind(TicketKind::Fetch)
                    .for_resource(ResourceKind::Wood)
                    .expiring_at(expires),
            );
            tracing::info!(tick = %village.simulation.now(), %expires, "wood shortage raised");
            shortage_raised = true;
        }
    }

    let released = village.simulation.shutdown();
    let stats = village.stats();
    tracing::info!(
        ticks = stats.ticks,
        created = stats.tickets_created,
        reservations = stats.reservations,
        completions = stats.completions,
        abandonments = stats.abandonments,
        reclamations = stats.reclamations,
        released,
        wood = village.stored(ResourceKind::Wood),
        food = village.stored(ResourceKind::Food),
        "village run finished"
    );
    Ok(())
}
