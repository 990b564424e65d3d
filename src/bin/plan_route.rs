//! # Route Planner
//!
//! Command-line tool for checking a field layout before a match: loads the layout,
//! places the robot on a node and prints the shortest route to a target.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use std::collections::HashSet;
use std::process;
use waypoint::logging;
use waypoint::navigation::{FieldLayout, Route};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "plan_route")]
#[command(about = "Print the shortest route between two nodes of a field layout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Field layout TOML file
    layout: String,

    /// Node the robot starts on
    from: String,

    /// Target node
    to: String,

    /// Nodes the route must not enter
    blacklist: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

fn main() {
    logging::init_structured_logging();
    let cli = Cli::parse();

    match plan(&cli) {
        Ok(Some(route)) => {
            if let Err(e) = print_route(&route, cli.format) {
                eprintln!("❌ {e:#}");
                process::exit(1);
            }
        }
        Ok(None) => {
            eprintln!("❌ No route from '{}' to '{}'", cli.from, cli.to);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("❌ {e:#}");
            process::exit(1);
        }
    }
}

fn plan(cli: &Cli) -> anyhow::Result<Option<Route>> {
    let layout = FieldLayout::from_file(&cli.layout)
        .with_context(|| format!("failed to load field layout {}", cli.layout))?;
    let mut graph = layout.build().context("field layout is inconsistent")?;

    for node in [&cli.from, &cli.to].into_iter().chain(&cli.blacklist) {
        if !graph.contains_node(node) {
            bail!("unknown node '{node}'");
        }
    }

    graph.set_node(Some(&cli.from));
    let blacklist: HashSet<String> = cli.blacklist.iter().cloned().collect();
    Ok(graph.find_path_avoiding(&cli.to, &blacklist))
}

fn print_route(route: &Route, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(route)?);
        }
        OutputFormat::Table => {
            println!("📍 {}", route.from);
            for edge in &route.edges {
                let turns: Vec<String> = edge
                    .available_turns()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                let turns = if turns.is_empty() {
                    "-".to_string()
                } else {
                    turns.join(", ")
                };
                println!(
                    "  -> {:<12} heading {:<5} ({:>3}°)  weight {:>8.1}  turns: {}",
                    edge.to,
                    edge.direction,
                    edge.direction.degrees(),
                    edge.weight,
                    turns
                );
            }
            println!("✅ {} edge(s), distance {:.1}", route.len(), route.distance);
        }
    }
    Ok(())
}
