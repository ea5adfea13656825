//! Conduit network simulator
//!
//! Load a world layout, rebuild the anchoring controller's network and print
//! the result as JSON.
//!
//! ```text
//! conduit-sim <layout.json> [--remove x,y,z]...
//! ```
//!
//! Each `--remove` clears a cell after the first rebuild; the network is then
//! rebuilt once more.

use std::env;

use conduit_grid::GridPos;
use conduit_sim::WorldLayout;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn parse_pos(text: &str) -> Result<GridPos, Box<dyn std::error::Error>> {
    let parts = text
        .split(',')
        .map(|p| p.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(GridPos::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {text:?}").into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conduit_sim=info,conduit_network=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = env::args().skip(1);
    let path = args.next().ok_or("usage: conduit-sim <layout.json> [--remove x,y,z]...")?;

    let mut removals = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--remove" => {
                let value = args.next().ok_or("--remove needs a position")?;
                removals.push(parse_pos(&value)?);
            }
            other => return Err(format!("unknown argument {other:?}").into()),
        }
    }

    let mut sim = WorldLayout::load(&path)?.build()?;
    let mut reports = vec![sim.rebuild()];

    if !removals.is_empty() {
        for pos in removals {
            if !sim.remove_cell(pos) {
                tracing::warn!(%pos, "nothing to remove");
            }
        }
        reports.push(sim.rebuild());
    }

    let output = json!({
        "reports": reports,
        "network": sim.snapshot(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
