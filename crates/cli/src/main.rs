//! `frontier` binary: reads a graph/hypergraph, picks the family named by
//! the invoked subcommand, drives [`frontier_core::engine::Engine`], and
//! renders whatever combination of count/enumerate/sample/export the
//! shared [`frontier_cli::OutputOptions`] asks for (C11).
//!
//! A thin `match`-over-`Command` dispatcher, `fs`/`process` for I/O and
//! exit codes, no error enum of its own -- failures are rendered with
//! `eprintln!` and a non-zero exit for every input-validation failure.

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, io};

use clap::Parser;
use num_bigint::BigUint;

use frontier_cli::{App, Command, CutArgs, GeneralArgs, GraphFormat, GraphInput, HyperGraphFormat, HyperGraphInput, HyperReliArgs, OutputOptions,
    PartitionArgs, PathArgs, PathMatchingArgs, PrecisionArgs, RangeArg};
use frontier_core::count::{count, sample, CountTable};
use frontier_core::engine::Engine;
use frontier_core::families::component::{ComponentConfig, ComponentFamily, CutFamily};
use frontier_core::families::general::GeneralFamily;
use frontier_core::families::hyper::{CoverMode, HyperCoverFamily, HyperForestFamily, HyperReliFamily};
use frontier_core::families::path::{PathConfig, PathFamily};
use frontier_core::families::pathmatching::{PathMatchingFamily, TerminalPair};
use frontier_core::families::FamilyLogic;
use frontier_core::graph::{Graph, HyperGraph};
use frontier_core::subsetting::{count_range_dd, SubsettingDd};
use frontier_core::zdd::PseudoZdd;

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let app = App::parse();
    match run(&app.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("frontier: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command) -> Result<(), String> {
    match command {
        Command::Combination(args) => {
            let graph = load_graph(&args.graph)?;
            let edges = graph.edge_count();
            let (min, max) = args.elimit.map_or((0, edges as u32), |r| (r.min, r.max));
            let zdd = count_range_dd(edges, min, max);
            emit_output(&zdd, &args.output)
        }
        Command::SForest(args) => {
            let graph = load_graph(&args.graph)?;
            let family = ComponentFamily::new(ComponentConfig::forest(), Vec::new());
            let zdd = construct_graph_family(&graph, family, args.elimit)?;
            emit_output(&zdd, &args.output)
        }
        Command::STree(args) => {
            let graph = load_graph(&args.graph)?;
            let family = ComponentFamily::new(ComponentConfig::tree(), Vec::new());
            let zdd = construct_graph_family(&graph, family, args.elimit)?;
            emit_output(&zdd, &args.output)
        }
        Command::StPath(args) => {
            let graph = load_graph(&args.graph)?;
            let family = PathFamily::new(path_config(args, false, false)?);
            let zdd = construct_graph_family(&graph, family, args.elimit)?;
            emit_output(&zdd, &args.output)
        }
        Command::StCycle(args) => {
            let graph = load_graph(&args.graph)?;
            let family = PathFamily::new(path_config(args, true, false)?);
            let zdd = construct_graph_family(&graph, family, args.elimit)?;
            emit_output(&zdd, &args.output)
        }
        Command::DstPath(args) => {
            let mut graph = load_graph(&args.graph)?;
            let dummy = graph.add_dummy_vertex();
            let config = PathConfig {
                start: dummy,
                end: dummy,
                hamilton: args.hamilton,
                cycle: true,
                distance_bound: None,
            };
            let family = PathFamily::new(config);
            let zdd = construct_graph_family(&graph, family, args.elimit)?;
            emit_output(&zdd, &args.output)
        }
        Command::StEdPath(args) => {
            let graph = load_graph(&args.graph)?;
            let family = PathFamily::new(path_config(args, false, true)?);
            let zdd = construct_graph_family(&graph, family, args.elimit)?;
            emit_output(&zdd, &args.output)
        }
        Command::PathMatching(args) => {
            let graph = load_graph(&args.graph)?;
            let family = pathmatching_family(args, false)?;
            let zdd = construct_graph_family(&graph, family, None)?;
            emit_output(&zdd, &args.output)
        }
        Command::MtPath(args) => {
            let graph = load_graph(&args.graph)?;
            let family = pathmatching_family(args, true)?;
            let zdd = construct_graph_family(&graph, family, None)?;
            emit_output(&zdd, &args.output)
        }
        Command::RForest(args) => {
            let graph = load_graph(&args.graph)?;
            let roots = resolve_roots(&args.roots, &args.root)?;
            let family = ComponentFamily::new(ComponentConfig::forest(), roots);
            let zdd = construct_graph_family(&graph, family, args.elimit)?;
            emit_output(&zdd, &args.output)
        }
        Command::KCut(args) => {
            let graph = load_graph(&args.graph)?;
            let family = cut_family(args, Vec::new());
            let zdd = construct_graph_family(&graph, family, args.elimit)?;
            emit_output(&zdd, &args.output)
        }
        Command::RCut(args) => {
            let graph = load_graph(&args.graph)?;
            let roots = resolve_roots(&args.roots, &args.root)?;
            let family = cut_family(args, roots);
            let zdd = construct_graph_family(&graph, family, args.elimit)?;
            emit_output(&zdd, &args.output)
        }
        Command::Partition(args) => {
            let graph = load_graph(&args.graph)?;
            let family = partition_family(args);
            let zdd = construct_graph_family(&graph, family, None)?;
            emit_output(&zdd, &args.output)
        }
        Command::General(args) => {
            let graph = load_graph(&args.graph)?;
            let family = general_family(args, &graph)?;
            let zdd = construct_graph_family(&graph, family, None)?;
            emit_output(&zdd, &args.output)
        }
        Command::SetPt(args) => {
            let graph = load_hypergraph(&args.graph)?;
            let family = HyperCoverFamily::new(CoverMode::Partition);
            let zdd = construct_hyper_family(&graph, family)?;
            emit_output(&zdd, &args.output)
        }
        Command::SetC(args) => {
            let graph = load_hypergraph(&args.graph)?;
            let family = HyperCoverFamily::new(CoverMode::Cover);
            let zdd = construct_hyper_family(&graph, family)?;
            emit_output(&zdd, &args.output)
        }
        Command::SetPk(args) => {
            let graph = load_hypergraph(&args.graph)?;
            let family = HyperCoverFamily::new(CoverMode::Packing);
            let zdd = construct_hyper_family(&graph, family)?;
            emit_output(&zdd, &args.output)
        }
        Command::HForest(args) => {
            let graph = load_hypergraph(&args.graph)?;
            let zdd = construct_hyper_family(&graph, HyperForestFamily)?;
            emit_output(&zdd, &args.output)
        }
        Command::HReli(args) => {
            let graph = load_hypergraph(&args.graph)?;
            let family = hyper_reli_family(args)?;
            let zdd = construct_hyper_family(&graph, family)?;
            emit_output(&zdd, &args.output)
        }
    }
}

// --- family construction helpers -------------------------------------------------

fn path_config(args: &PathArgs, cycle: bool, needs_distance: bool) -> Result<PathConfig, String> {
    let distance_bound = if needs_distance {
        let range = args.dist.ok_or("stedpath requires --dist [min,max]")?;
        Some((i64::from(range.min), i64::from(range.max)))
    } else {
        None
    };
    let (start, end) = if cycle {
        (0, 0)
    } else {
        (
            args.start.ok_or("this family requires -s/--start")?,
            args.end.ok_or("this family requires -e/--end")?,
        )
    };
    Ok(PathConfig {
        start,
        end,
        hamilton: args.hamilton,
        cycle,
        distance_bound,
    })
}

fn pathmatching_family(args: &PathMatchingArgs, cover_all: bool) -> Result<PathMatchingFamily, String> {
    let text = fs::read_to_string(&args.terminal).map_err(|e| format!("failed to read {}: {e}", args.terminal.display()))?;
    let pairs = frontier_parser::roots::parse_terminal_pairs(&text)
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|(a, b)| TerminalPair { a, b })
        .collect();
    Ok(PathMatchingFamily::new(pairs, cover_all))
}

fn cut_family(args: &CutArgs, roots: Vec<u32>) -> CutFamily {
    CutFamily {
        target_parts: args.parts,
        roots,
        weight_bound: args.cut_weight,
    }
}

fn partition_family(args: &PartitionArgs) -> ComponentFamily {
    ComponentFamily::new(ComponentConfig::partition(args.comp.min, args.comp.max), Vec::new())
}

fn general_family(args: &GeneralArgs, graph: &Graph) -> Result<GeneralFamily, String> {
    let text = fs::read_to_string(&args.parameter).map_err(|e| format!("failed to read {}: {e}", args.parameter.display()))?;
    let config = frontier_parser::general::parse(&text, graph.vertex_count(), graph.edge_count()).map_err(|e| e.to_string())?;
    GeneralFamily::new(config).map_err(|e| e.to_string())
}

fn hyper_reli_family(args: &HyperReliArgs) -> Result<HyperReliFamily, String> {
    let text = fs::read_to_string(&args.terminal).map_err(|e| format!("failed to read {}: {e}", args.terminal.display()))?;
    let terminals = frontier_parser::roots::parse_roots(&text).map_err(|e| e.to_string())?;
    Ok(HyperReliFamily::new(terminals))
}

fn resolve_roots(roots: &[u32], root_file: &Option<PathBuf>) -> Result<Vec<u32>, String> {
    if !roots.is_empty() {
        return Ok(roots.to_vec());
    }
    match root_file {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            frontier_parser::roots::parse_roots(&text).map_err(|e| e.to_string())
        }
        None => Ok(Vec::new()),
    }
}

/// Runs `family` over `graph`, optionally restricting selection to the
/// `[min, max]` edge-count range named by `elimit` through a freshly built
/// subsetting DD (C10) -- the route §4.8 describes for a family (like
/// `stpath`) with no native edge-count bookkeeping of its own.
fn construct_graph_family<L: FamilyLogic>(graph: &Graph, family: L, elimit: Option<RangeArg>) -> Result<PseudoZdd, String> {
    let engine = Engine::new(family);
    match elimit {
        Some(range) => {
            let constraint = count_range_dd(graph.edge_count(), range.min, range.max);
            engine.with_subsetting(SubsettingDd::new(&constraint)).construct(graph)
        }
        None => engine.construct(graph),
    }
    .map_err(|e| e.to_string())
}

fn construct_hyper_family<L: FamilyLogic>(graph: &HyperGraph, family: L) -> Result<PseudoZdd, String> {
    Engine::new(family).construct(graph).map_err(|e| e.to_string())
}

// --- input loading ----------------------------------------------------------------

fn read_input(path: &Option<PathBuf>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map_err(|e| format!("failed to read stdin: {e}"))?;
            Ok(buf)
        }
    }
}

fn read_sidecar(path: &Path) -> Result<Vec<i64>, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    frontier_parser::graph::parse_weights(&text).map_err(|e| e.to_string())
}

fn load_graph(input: &GraphInput) -> Result<Graph, String> {
    let text = read_input(&input.input)?;
    let mut graph = match input.format {
        GraphFormat::EdgeList => frontier_parser::graph::parse_edge_list(&text),
        GraphFormat::AdjacencyList => frontier_parser::graph::parse_adjacency_list(&text, input.directed),
    }
    .map_err(|e| e.to_string())?;

    if let Some(path) = &input.vertex_weight {
        graph.set_vertex_weights(read_sidecar(path)?).map_err(|e| e.to_string())?;
    }
    if let Some(path) = &input.edge_weight {
        graph.set_edge_weights(read_sidecar(path)?).map_err(|e| e.to_string())?;
    }
    if let Some(root) = input.bfs_root {
        graph.rearrange_by_breadth_first(root).map_err(|e| e.to_string())?;
    }
    Ok(graph)
}

fn load_hypergraph(input: &HyperGraphInput) -> Result<HyperGraph, String> {
    let text = read_input(&input.input)?;
    let mut graph = match input.format {
        HyperGraphFormat::EdgeList => frontier_parser::hypergraph::parse_edge_list(&text),
        HyperGraphFormat::IncidenceMatrix => frontier_parser::hypergraph::parse_incidence_matrix(&text),
    }
    .map_err(|e| e.to_string())?;

    if let Some(path) = &input.edge_weight {
        graph.set_edge_weights(read_sidecar(path)?).map_err(|e| e.to_string())?;
    }
    Ok(graph)
}

// --- output ------------------------------------------------------------------------

enum Precision {
    MachineInt,
    Double,
    BigInt,
}

const fn resolve_precision(args: &PrecisionArgs) -> Precision {
    if args.sb || args.sm {
        Precision::BigInt
    } else if args.sd {
        Precision::Double
    } else {
        Precision::MachineInt
    }
}

fn compute_count(zdd: &PseudoZdd, precision: &PrecisionArgs) -> Result<String, String> {
    match resolve_precision(precision) {
        Precision::MachineInt => count::<u64>(zdd).map(|n| n.to_string()).map_err(|e| e.to_string()),
        Precision::Double => count::<f64>(zdd).map(|n| n.to_string()).map_err(|e| e.to_string()),
        Precision::BigInt => count::<BigUint>(zdd).map(|n| n.to_string()).map_err(|e| e.to_string()),
    }
}

fn render_solutions(mut solutions: Vec<Vec<usize>>) -> String {
    let mut out = String::new();
    for solution in &mut solutions {
        solution.sort_unstable();
        let rendered: Vec<String> = solution.iter().map(|v| (v + 1).to_string()).collect();
        out.push_str(&rendered.join(" "));
        out.push('\n');
    }
    out
}

/// Draws `n` uniform random accepting paths and renders them the same way
/// [`render_solutions`] renders an enumerated set (1-based edge numbers,
/// one solution per line).
fn render_samples(zdd: &PseudoZdd, n: usize, precision: &PrecisionArgs) -> Result<String, String> {
    let mut rng = rand::rng();
    let draws: Vec<Vec<usize>> = match resolve_precision(precision) {
        Precision::MachineInt => {
            let table = CountTable::<u64>::build(zdd).map_err(|e| e.to_string())?;
            (0..n).map(|_| sample(zdd, &table, &mut rng)).collect()
        }
        Precision::Double => {
            let table = CountTable::<f64>::build(zdd).map_err(|e| e.to_string())?;
            (0..n).map(|_| sample(zdd, &table, &mut rng)).collect()
        }
        Precision::BigInt => {
            let table = CountTable::<BigUint>::build(zdd).map_err(|e| e.to_string())?;
            (0..n).map(|_| sample(zdd, &table, &mut rng)).collect()
        }
    };
    Ok(render_solutions(draws))
}

/// Renders and writes every output the shared [`OutputOptions`] ask for
/// against the (possibly just-reduced) constructed ZDD. HDD streaming mode
/// (`--stream-to`) is mutually exclusive with every in-memory query (spec
/// §6's "in-memory operations ... are then unavailable"): it writes the
/// unreduced node arcs straight out and returns before any of the other
/// branches run.
fn emit_output(zdd: &PseudoZdd, output: &OutputOptions) -> Result<(), String> {
    if let Some(path) = &output.stream_to {
        if output.reduce || output.enum_file.is_some() || output.sample.is_some() || output.export_json.is_some() {
            return Err(frontier_core::Error::StreamingUnsupportedOperation.to_string());
        }
        return fs::write(path, zdd.export_text(output.hex)).map_err(|e| format!("failed to write {}: {e}", path.display()));
    }

    let reduced;
    let zdd = if output.reduce {
        reduced = zdd.reduce();
        &reduced
    } else {
        zdd
    };

    if !output.no_zdd_text {
        print!("{}", zdd.export_text(output.hex));
    }

    if let Some(files) = &output.print_zdd_graphviz {
        let print_zero = files.len() > 1;
        fs::write(&files[0], zdd.export_graphviz(print_zero)).map_err(|e| format!("failed to write {}: {e}", files[0]))?;
    }

    if let Some(path) = &output.print_zdd_sbdd {
        fs::write(path, zdd.export_sapporo()).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    }

    if let Some(path) = &output.export_json {
        let json = serde_json::to_string_pretty(zdd).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    }

    if let Some(path) = &output.enum_file {
        let solutions = zdd.enumerate_all();
        fs::write(path, render_solutions(solutions)).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    }

    if let Some(args) = &output.sample {
        let path = &args[0];
        let n: usize = args.get(1).ok_or("--sample requires a FILE and a count N")?.parse().map_err(|_| "--sample's N must be an integer".to_string())?;
        let text = render_samples(zdd, n, &output.precision)?;
        fs::write(path, text).map_err(|e| format!("failed to write {path}: {e}"))?;
    }

    if !output.no_solution {
        println!("{}", compute_count(zdd, &output.precision)?);
    }

    Ok(())
}
