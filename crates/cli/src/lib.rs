//! frontier CLI -- construct, count, sample, and export ZDDs for the
//! combinatorial subgraph families `frontier_core` implements.
//!
//! One subcommand per family stands in for the reference driver's
//! `-t <family>` dispatch: `clap`'s derive gives each family its own
//! typed argument set rather than a single flat flag bag shared (and
//! partially ignored) across all eighteen of them.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "frontier", about = "Frontier-method ZDD construction for combinatorial subgraph families")]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edge subsets whose size falls within a bound (`combination`)
    Combination(CombinationArgs),
    /// Spanning forests (`sforest`)
    SForest(ComponentArgs),
    /// Spanning trees (`stree`)
    STree(ComponentArgs),
    /// Simple s-t paths, optionally Hamiltonian (`stpath`)
    StPath(PathArgs),
    /// Simple cycles, optionally Hamiltonian (`stcycle`)
    StCycle(PathArgs),
    /// Any-terminal paths via a synthetic dummy vertex (`dstpath`)
    DstPath(PathArgs),
    /// Distance-bounded s-t paths (`stedpath`)
    StEdPath(PathArgs),
    /// Vertex-disjoint path matching between designated pairs (`pathmatching`)
    PathMatching(PathMatchingArgs),
    /// Multi-terminal path matching covering every vertex (`mtpath`)
    MtPath(PathMatchingArgs),
    /// Spanning forests rooted at designated vertices (`rforest`)
    RForest(RootedArgs),
    /// k-way edge cuts (`kcut`)
    KCut(CutArgs),
    /// Edge cuts separating designated root vertices (`rcut`)
    RCut(CutArgs),
    /// Vertex partitions by component count (`partition`, supplementing
    /// the reference family list with `MateComponent.cpp`'s
    /// non-acyclic mode)
    Partition(PartitionArgs),
    /// General per-vertex-degree / pairwise-connectivity family (`general`)
    General(GeneralArgs),
    /// Hypergraph set partition: every vertex covered exactly once (`setpt`)
    SetPt(HyperCoverArgs),
    /// Hypergraph set cover: every vertex covered at least once (`setc`)
    SetC(HyperCoverArgs),
    /// Hypergraph set packing: no vertex covered twice (`setpk`)
    SetPk(HyperCoverArgs),
    /// Hyper-edge spanning forest (`hforest`)
    HForest(HyperGraphArgs),
    /// Hyper-edge reliability between designated terminals (`hreli`)
    HReli(HyperReliArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GraphFormat {
    EdgeList,
    AdjacencyList,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HyperGraphFormat {
    EdgeList,
    IncidenceMatrix,
}

/// Graph input shared by every plain-graph family.
#[derive(Debug, Args)]
pub struct GraphInput {
    /// Input graph file; reads stdin when omitted
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "edge-list")]
    pub format: GraphFormat,
    /// Adjacency-list mode only: preserve edge direction rather than
    /// deduplicating `{u, v}`
    #[arg(long)]
    pub directed: bool,
    /// Whitespace-separated per-vertex weight sidecar file
    #[arg(long)]
    pub vertex_weight: Option<PathBuf>,
    /// Whitespace-separated per-edge weight sidecar file
    #[arg(long)]
    pub edge_weight: Option<PathBuf>,
    /// Relabel vertices in breadth-first order from this root before
    /// constructing, shrinking the running frontier for path/tree families
    #[arg(long)]
    pub bfs_root: Option<u32>,
}

/// Hypergraph input shared by every hypergraph family.
#[derive(Debug, Args)]
pub struct HyperGraphInput {
    #[arg(long)]
    pub input: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "edge-list")]
    pub format: HyperGraphFormat,
    #[arg(long)]
    pub edge_weight: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PrecisionArgs {
    /// Count with an overflow-checked machine integer (default)
    #[arg(long)]
    pub si: bool,
    /// Count with `f64`
    #[arg(long)]
    pub sd: bool,
    /// Count with `num_bigint::BigUint`
    #[arg(long)]
    pub sb: bool,
    /// Alias for `--sb`, matching the reference driver's flag name
    #[arg(long)]
    pub sm: bool,
}

/// Output controls shared by every family.
#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Reduce the ZDD before counting/enumerating/exporting
    #[arg(short = 'r', long)]
    pub reduce: bool,
    /// Suppress the default ZDD text dump to stdout
    #[arg(short = 'n', long = "no-print-zdd")]
    pub no_zdd_text: bool,
    /// Print node ids in hexadecimal in the ZDD text dump
    #[arg(long)]
    pub hex: bool,
    /// Write every accepting solution (as 1-based selected edge/hyper-edge
    /// numbers) to this file
    #[arg(long = "enum")]
    pub enum_file: Option<PathBuf>,
    /// Draw N uniform random solutions and write them to this file
    #[arg(long, num_args = 2, value_names = ["FILE", "N"])]
    pub sample: Option<Vec<String>>,
    /// Write the ZDD as Graphviz; an optional `0` argument also draws
    /// zero-arcs
    #[arg(long, num_args = 1..=2, value_names = ["FILE", "PRINT_ZERO"])]
    pub print_zdd_graphviz: Option<Vec<String>>,
    /// Write the ZDD in Sapporo BDD (negative-edge complemented) format
    #[arg(long)]
    pub print_zdd_sbdd: Option<PathBuf>,
    /// Write the (post-reduction, if `-r`) ZDD as JSON via `frontier_core`'s
    /// optional `serde` support, supplementing the reference driver's
    /// text/Graphviz/Sapporo export trio with a format other DD tooling can
    /// consume directly
    #[arg(long)]
    pub export_json: Option<PathBuf>,
    /// Skip computing and printing the solution count
    #[arg(long)]
    pub no_solution: bool,
    /// Stream constructed node arcs to this file instead of building the
    /// ZDD in memory; incompatible with `-r`/`--enum`/`--sample`
    #[arg(long)]
    pub stream_to: Option<PathBuf>,
    #[command(flatten)]
    pub precision: PrecisionArgs,
}

fn parse_range(s: &str) -> Result<RangeArg, String> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let (a, b) = inner.split_once(',').ok_or_else(|| format!("expected `[min,max]`, found {s:?}"))?;
        let min = a.trim().parse().map_err(|_| format!("expected an integer, found {a:?}"))?;
        let max = b.trim().parse().map_err(|_| format!("expected an integer, found {b:?}"))?;
        Ok(RangeArg { min, max })
    } else {
        let n: u32 = s.parse().map_err(|_| format!("expected an integer or `[min,max]`, found {s:?}"))?;
        Ok(RangeArg { min: n, max: n })
    }
}

/// `N` or `[min,max]`, as the reference driver's `--elimit`/`--comp`/`--dist`
/// flags all accept.
#[derive(Debug, Clone, Copy)]
pub struct RangeArg {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Args)]
pub struct CombinationArgs {
    #[command(flatten)]
    pub graph: GraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
    /// Accept only subsets selecting between `min` and `max` edges
    #[arg(long, value_parser = parse_range)]
    pub elimit: Option<RangeArg>,
}

#[derive(Debug, Args)]
pub struct ComponentArgs {
    #[command(flatten)]
    pub graph: GraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
    /// Restrict to subsets selecting between `min` and `max` edges, via a
    /// subsetting DD (C10) rather than the family's own state
    #[arg(long, value_parser = parse_range)]
    pub elimit: Option<RangeArg>,
}

#[derive(Debug, Args)]
pub struct RootedArgs {
    #[command(flatten)]
    pub graph: GraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
    /// Designated root vertices, given directly
    #[arg(short = 'f', long, num_args = 1.., conflicts_with = "root")]
    pub roots: Vec<u32>,
    /// Designated root vertices, read from a whitespace-separated file
    #[arg(long)]
    pub root: Option<PathBuf>,
    #[arg(long, value_parser = parse_range)]
    pub elimit: Option<RangeArg>,
}

#[derive(Debug, Args)]
pub struct PartitionArgs {
    #[command(flatten)]
    pub graph: GraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
    /// Required final component count
    #[arg(long, value_parser = parse_range)]
    pub comp: RangeArg,
}

#[derive(Debug, Args)]
pub struct PathArgs {
    #[command(flatten)]
    pub graph: GraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
    /// Start terminal (ignored for `stcycle`/`dstpath`)
    #[arg(short = 's', long)]
    pub start: Option<u32>,
    /// End terminal (ignored for `stcycle`/`dstpath`)
    #[arg(short = 'e', long)]
    pub end: Option<u32>,
    /// Require the path/cycle to visit every vertex
    #[arg(long)]
    pub hamilton: bool,
    /// Distance bound (`stedpath` only): total selected-edge weight must
    /// fall in `min..=max`
    #[arg(long, value_parser = parse_range)]
    pub dist: Option<RangeArg>,
    /// Restrict to subsets selecting between `min` and `max` edges
    #[arg(long, value_parser = parse_range)]
    pub elimit: Option<RangeArg>,
}

#[derive(Debug, Args)]
pub struct PathMatchingArgs {
    #[command(flatten)]
    pub graph: GraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
    /// File of whitespace-separated terminal pairs, two integers per pair
    #[arg(long)]
    pub terminal: PathBuf,
}

#[derive(Debug, Args)]
pub struct CutArgs {
    #[command(flatten)]
    pub graph: GraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
    /// Number of parts the removed edges must separate the graph into
    #[arg(long)]
    pub parts: u32,
    /// Designated vertices that must end up in distinct parts (`rcut`);
    /// omit for a plain `kcut`
    #[arg(short = 'f', long, num_args = 1.., conflicts_with = "root")]
    pub roots: Vec<u32>,
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// Reject cuts whose total removed-edge weight exceeds this bound
    #[arg(long)]
    pub cut_weight: Option<i64>,
    #[arg(long, value_parser = parse_range)]
    pub elimit: Option<RangeArg>,
}

#[derive(Debug, Args)]
pub struct GeneralArgs {
    #[command(flatten)]
    pub graph: GraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
    /// `D`/`P`/`S`/`C`/`Q`/`T` parameter file (see `frontier_parser::general`)
    #[arg(long)]
    pub parameter: PathBuf,
}

#[derive(Debug, Args)]
pub struct HyperCoverArgs {
    #[command(flatten)]
    pub graph: HyperGraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Debug, Args)]
pub struct HyperGraphArgs {
    #[command(flatten)]
    pub graph: HyperGraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Debug, Args)]
pub struct HyperReliArgs {
    #[command(flatten)]
    pub graph: HyperGraphInput,
    #[command(flatten)]
    pub output: OutputOptions,
    /// File of whitespace-separated terminal vertex ids that must all end
    /// up in one component
    #[arg(long)]
    pub terminal: PathBuf,
}
