use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use log::info;

use qmc_rs::config::MinimizerConfig;
use qmc_rs::display::render_table;
use qmc_rs::io::Reader;
use qmc_rs::minimizer::Minimizer;
use qmc_rs::types::Mode;

#[derive(Debug, Parser)]
#[command(author, version, about = "Quine-McCluskey minimizer for truth tables")]
struct Cli {
    /// Truth table file (`<vector> <value>` per line). Reads stdin if omitted.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Minimize the zeros of the function instead of the ones.
    #[arg(long)]
    zero: bool,

    /// Keep at most this many minimum covers.
    #[arg(long, value_name = "INT")]
    max_covers: Option<usize>,

    /// Initial bucket count of the cover-search index.
    #[arg(long, value_name = "INT")]
    buckets: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    let level = match args.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let start_mode = if args.zero { Mode::Zero } else { Mode::One };
    let input = match &args.input {
        Some(path) => Reader::new(BufReader::new(File::open(path)?)).with_mode(start_mode).read_table()?,
        None => {
            println!("Enter the truth table as `<vector> <value>` lines, end with an empty line:");
            Reader::new(io::stdin().lock()).with_mode(start_mode).read_table()?
        }
    };
    for rejected in &input.rejected {
        println!("Skipped line {}: {:?} ({})", rejected.line_no, rejected.text, rejected.error);
    }
    info!("Read {} entries in {} mode", input.table.len(), input.mode);

    let mut config = MinimizerConfig::default().with_mode(input.mode);
    if let Some(max) = args.max_covers {
        config = config.with_max_covers(max);
    }
    if let Some(buckets) = args.buckets {
        config = config.with_index_buckets(buckets);
    }

    let mut minimizer = Minimizer::with_config(input.table, config)?;

    let time_reduce = std::time::Instant::now();
    minimizer.reduce()?;
    info!("Merge phase done in {:.3} s", time_reduce.elapsed().as_secs_f64());

    if let Some(primes) = minimizer.prime_implicants() {
        println!("Prime implicants:");
        print!("{}", render_table(&minimizer, primes));
    }

    let time_cover = std::time::Instant::now();
    minimizer.cover()?;
    info!("Cover phase done in {:.3} s", time_cover.elapsed().as_secs_f64());

    println!("Minimum cover(s):");
    for (i, cover) in minimizer.covers().iter().enumerate() {
        println!("Table #{}:", i + 1);
        print!("{}", render_table(&minimizer, cover));
    }

    info!("stats: {}", minimizer.stats());
    info!("All done in {:.3} s", time_total.elapsed().as_secs_f64());

    Ok(())
}
