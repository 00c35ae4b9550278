#![warn(clippy::pedantic)]

mod config;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::owo_colors::OwoColorize;
use config::RunConfig;
use cuboid::{CubeState, Dimensions, Face, MoveCatalog};
use env_logger::{Env, TimestampPrecision};
use itertools::Itertools;
use log::{LevelFilter, info};
use state_graph::{StateGraph, StateGraphBuilder};

/// Explores the states of cuboid twisty puzzles
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the net of a puzzle after a sequence of moves
    Show {
        /// The puzzle size, e.g. 3x3x3
        dimensions: Dimensions,
        /// The moves to apply to the solved puzzle, e.g. "L2 U2"
        moves: Option<String>,
    },
    /// List every move that exists on a puzzle
    Moves {
        /// The puzzle size, e.g. 3x2x1
        dimensions: Dimensions,
    },
    /// Build the graph of every state reachable from the solved puzzle
    Graph {
        /// The puzzle size; overrides the configuration file
        dimensions: Option<Dimensions>,
        /// The permitted moves, e.g. "R2 D2 U2"; overrides the configuration file
        #[arg(short, long)]
        moves: Option<String>,
        /// A run configuration in TOML format
        #[arg(short, long, value_name = "RUN_CONFIG")]
        config: Option<PathBuf>,
        /// Expand each level of the search in parallel
        #[arg(short, long)]
        parallel: bool,
        /// Stop expanding states this many moves from the solved state
        #[arg(long)]
        max_depth: Option<usize>,
        /// Write the edge list to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print every state along with its neighbours
        #[arg(long)]
        states: bool,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    match cli.verbose {
        0 => {}
        1 => {
            logger.filter_level(LevelFilter::Debug);
        }
        _ => {
            logger.filter_level(LevelFilter::Trace);
        }
    }
    logger
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Show { dimensions, moves } => {
            let catalog = MoveCatalog::new(dimensions);
            let state = catalog.apply(
                &CubeState::solved(dimensions),
                moves.as_deref().unwrap_or_default(),
            )?;
            println!("{state}");
        }
        Commands::Moves { dimensions } => {
            for (face, moves) in move_listing(&MoveCatalog::new(dimensions)) {
                println!("{}: {moves}", face.bold());
            }
        }
        Commands::Graph {
            dimensions,
            moves,
            config,
            parallel,
            max_depth,
            output,
            states,
        } => {
            let mut run = match config {
                Some(path) => RunConfig::load(&path)?,
                None => RunConfig::default(),
            };
            if let Some(dimensions) = dimensions {
                run.dimensions = Some(dimensions.to_string());
            }
            if let Some(moves) = moves {
                run.permitted = Some(moves.split_whitespace().map(str::to_owned).collect());
            }
            run.parallel |= parallel;
            run.max_depth = max_depth.or(run.max_depth);
            run.output = output.or(run.output);

            let graph = build_graph(&run)?;
            print_summary(&graph);
            if states {
                print_states(&graph);
            }
            if let Some(path) = &run.output {
                graph.save_edge_list(path)?;
            }
        }
    }

    Ok(())
}

/// The catalog's moves grouped by face, in catalog order.
fn move_listing(catalog: &MoveCatalog) -> Vec<(Face, String)> {
    catalog
        .moves()
        .iter()
        .chunk_by(|mv| mv.face)
        .into_iter()
        .map(|(face, mut moves)| (face, moves.join(" ")))
        .collect()
}

fn build_graph(run: &RunConfig) -> color_eyre::Result<StateGraph> {
    let dimensions = run.dimensions()?;
    let catalog = MoveCatalog::new(dimensions);
    let permitted = run.permitted(&catalog)?;
    if permitted.is_empty() {
        info!("No permitted moves, so the graph is the solved state alone");
    }

    let mut builder = StateGraphBuilder::new(&catalog, permitted)?;
    if let Some(max_depth) = run.max_depth {
        builder = builder.with_max_depth(max_depth);
    }

    let solved = CubeState::solved(dimensions);
    let graph = if run.parallel {
        builder.build_parallel(&solved)?
    } else {
        builder.build(&solved)?
    };
    Ok(graph)
}

fn print_summary(graph: &StateGraph) {
    println!(
        "{} {}",
        "Permitted moves:".bold(),
        graph.permitted_moves().iter().join(" ")
    );
    println!("{} {}", "Vertices:".bold(), graph.vertex_count());
    println!(
        "{} {} ({} between distinct states)",
        "Edges:".bold(),
        graph.edge_count(),
        graph.simple_edges().len()
    );
    println!(
        "{} {}",
        "Diameter from root:".bold(),
        graph.diameter_from_root()
    );
    match graph.bipartition() {
        Some(bipartition) => println!(
            "{} {} + {}",
            "Bipartite:".bold(),
            bipartition.even.len().blue(),
            bipartition.odd.len().red()
        ),
        None => println!("{} {}", "Bipartite:".bold(), "no".yellow()),
    }
}

fn print_states(graph: &StateGraph) {
    for (id, state) in graph.vertices() {
        println!();
        println!(
            "{} (depth {})",
            format!("State {id}").bold(),
            graph.depth(id).unwrap_or_default()
        );
        println!("{state}");
        println!(
            "{} {}",
            "Neighbours:".bold(),
            graph
                .neighbors(id)
                .into_iter()
                .map(|neighbour| {
                    let moves = graph.moves_between(id, neighbour).iter().join(",");
                    format!("{neighbour} ({moves})")
                })
                .join(" ")
        );
    }
}
