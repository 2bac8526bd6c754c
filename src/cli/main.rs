#![warn(clippy::all, clippy::pedantic)]
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use csv::Writer;
use graphopt::{BranchAndBound, Graph, MinCostFlow, PrimalDual, SupplyVector, TspMethod};
use serde::Deserialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser, Debug)]
#[command(name = "graphopt-cli", about = "Flow and TSP solvers over CSV edge lists")]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Maximum flow between two nodes, edge weights are capacities
    MaxFlow {
        #[arg(long)]
        edges: PathBuf,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Write the per-edge flow as CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Edges of a minimum cut between two nodes
    MinCut {
        #[arg(long)]
        edges: PathBuf,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Minimum cost flow, edge weights are unit costs
    MinCostFlow {
        #[arg(long)]
        edges: PathBuf,
        /// CSV with `node,supply` rows, demands are negative
        #[arg(long)]
        supply: PathBuf,
        /// CSV edge list of capacities, uncapacitated when omitted
        #[arg(long)]
        capacity: Option<PathBuf>,
        /// Write the per-edge flow as CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Traveling-salesman tour, edge weights are distances
    Tsp {
        #[arg(long)]
        edges: PathBuf,
        #[arg(long, value_enum, default_value_t = Method::Bnb)]
        method: Method,
        /// Stop branch and bound after this many expansions
        #[arg(long)]
        max_expansions: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    Greedy,
    Bnb,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: String,
    target: String,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct SupplyRecord {
    node: String,
    supply: f64,
}

// Function to read an edge list from a CSV file with a `source,target,weight` header
fn read_graph_csv(filepath: &Path) -> Result<Graph<String, f64>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_path(filepath)?;
    let rows: Vec<EdgeRecord> = rdr.deserialize().collect::<Result<_, _>>()?;
    log::info!("read {} edges from {}", rows.len(), filepath.display());
    Ok(Graph::from_edges(
        rows.into_iter().map(|r| (r.source, r.target, r.weight)),
    ))
}

fn read_supply_csv(filepath: &Path) -> Result<SupplyVector<String, f64>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_path(filepath)?;
    rdr.deserialize::<SupplyRecord>()
        .map(|r| r.map(|r| (r.node, r.supply)).map_err(Into::into))
        .collect()
}

// Function to write a per-edge flow
fn write_csv(flow: &Graph<String, f64>, filepath: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filepath)?;
    wtr.write_record(["source", "target", "flow"])?;
    for (source, target, amount) in flow.edges() {
        wtr.write_record([&source, &target, &amount.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn report_flow(flow: &Graph<String, f64>, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => write_csv(flow, path),
        None => {
            flow.edges()
                .into_iter()
                .filter(|(_, _, amount)| *amount != 0.0)
                .for_each(|(source, target, amount)| println!("{source} -> {target}: {amount}"));
            Ok(())
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::MaxFlow {
            edges,
            start,
            end,
            output,
        } => {
            let graph = read_graph_csv(&edges)?;
            let (value, flow) = graph
                .maximum_flow(&start, &end)
                .map_err(|e| e.to_string())?;
            println!("max flow: {value}");
            report_flow(&flow, output.as_deref())?;
        }
        Command::MinCut { edges, start, end } => {
            let graph = read_graph_csv(&edges)?;
            let cut = graph
                .maximum_flow_min_cut(&start, &end)
                .map_err(|e| e.to_string())?;
            for (source, target) in cut {
                println!("{source} -> {target}");
            }
        }
        Command::MinCostFlow {
            edges,
            supply,
            capacity,
            output,
        } => {
            let graph = read_graph_csv(&edges)?;
            let supply = read_supply_csv(&supply)?;
            let capacity = capacity.as_deref().map(read_graph_csv).transpose()?;
            let solution = PrimalDual::default()
                .min_cost_flow(&graph, &supply, capacity.as_ref())
                .map_err(|e| e.to_string())?;
            println!("min cost: {}", solution.cost);
            report_flow(&solution.flow, output.as_deref())?;
        }
        Command::Tsp {
            edges,
            method,
            max_expansions,
        } => {
            let graph = read_graph_csv(&edges)?;
            let solution = match (method, max_expansions) {
                (Method::Greedy, _) => graphopt::algo::tsp::solve_tsp(&graph, TspMethod::Greedy),
                (Method::Bnb, max_expansions) => BranchAndBound::new(max_expansions).solve(&graph),
            }
            .map_err(|e| e.to_string())?;

            println!("distance: {}", solution.distance);
            println!("optimal: {}", solution.optimal);
            println!("tour: {}", solution.tour.join(" -> "));
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;

    run(cli)
}
