use std::fs::File;
use std::io::Write;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing::info;

use error::SimError;
use geometry::Geometry;
use replacement::PolicyKind;
use trace::Trace;

mod cache;
mod error;
mod geometry;
mod replacement;
mod simulator;
mod trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CacheType {
    /// Direct-mapped, one way per set
    D,
    /// Set associative, --nway ways per set
    S,
}

#[derive(Parser)]
#[command(
    name = "Cache Simulator",
    version = "0.1.0",
    about = "Trace-driven cache hit/miss simulator"
)]
struct Cli {
    /// The cache organization: d for direct mapped, s for set associative
    #[arg(long = "type", value_name = "TYPE", value_enum)]
    cache_type: CacheType,

    /// The number of ways per set, required for set associative caches
    #[arg(long, value_name = "NWAY")]
    nway: Option<u64>,

    /// The total cache size in bytes, a power of 2
    #[arg(long, value_name = "CACHE_SIZE")]
    cache_size: u64,

    /// The block size in bytes, a power of 2
    #[arg(long, value_name = "BLOCK_SIZE")]
    block_size: u64,

    /// The path of the trace file, one hex address per line
    #[arg(long, value_name = "MEMFILE")]
    memfile: String,

    /// The path of the report file
    #[arg(short, long, value_name = "OUTPUT", default_value = "results.txt")]
    output: String,

    /// The replacement policy for full sets
    #[arg(long, value_name = "POLICY", value_enum, default_value = "lru")]
    policy: PolicyKind,
}

/// Build the validated geometry from the raw flags. Direct-mapped ignores
/// --nway; set associative requires it.
fn geometry_from_cli(cli: &Cli) -> Result<Geometry, SimError> {
    match cli.cache_type {
        CacheType::D => Geometry::direct_mapped(cli.cache_size, cli.block_size),
        CacheType::S => {
            let ways = cli.nway.ok_or(SimError::MissingWays)?;
            Geometry::new(cli.cache_size, cli.block_size, ways)
        }
    }
}

fn run_cli(cli: &Cli) -> Result<(), SimError> {
    let geometry = geometry_from_cli(cli)?;

    print!("Current Parameters:  ");
    print!("Cache Size: {}  ", geometry.cache_size());
    print!("Block Size: {}  ", geometry.block_size());
    print!("Associativity: {}  ", geometry.associativity());
    println!("Number of Sets: {}", geometry.num_sets());
    info!(
        tag_bits = geometry.tag_bits(),
        index_bits = geometry.index_bits(),
        offset_bits = geometry.offset_bits(),
        "geometry validated"
    );

    let trace = Trace::open(&cli.memfile)?;

    let start = Instant::now();
    let result = simulator::run(trace, &geometry, cli.policy.build())?;
    let duration = start.elapsed();

    let mut file = File::create(&cli.output)?;
    file.write_all(result.report(&geometry).as_bytes())?;

    println!("{}", result.stats.summary());
    println!(
        "Accesses: {} ({} hits, {} misses)",
        result.stats.total(),
        result.stats.hits(),
        result.stats.misses()
    );
    println!("Report written to: {}", cli.output);
    println!("Time elapsed is: {:?}", duration);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(e) = run_cli(&cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
