//! command-line entry point for drawing samples without writing any
//! Rust: parse marginals from the command line, seed an RNG, print the
//! resulting table (or a feasibility verdict) to stdout.

use anyhow::{Context, Result};
use bctsample::{Mask, feasible, sample_bct, sample_bct_with_zeros, sample_latin_square};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Parser)]
#[command(author, version, about = "Sample binary contingency tables and Latin squares", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// seed the RNG for reproducible output; otherwise seeded from entropy.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// sample an unconstrained binary contingency table.
    Bct {
        /// comma-separated row sums, e.g. "2,2,2".
        #[arg(long)]
        rows: String,
        /// comma-separated column sums, e.g. "2,2,2".
        #[arg(long)]
        cols: String,
    },
    /// sample a binary contingency table with a forced-zero mask.
    Zeros {
        #[arg(long)]
        rows: String,
        #[arg(long)]
        cols: String,
        /// forced-zero cells as "i,j" pairs separated by ';', e.g. "0,0;1,2".
        #[arg(long, default_value = "")]
        zeros: String,
    },
    /// sample a uniform random Latin square of order n.
    Latin {
        n: usize,
    },
    /// check Gale-Ryser feasibility of a pair of marginals without sampling.
    Feasible {
        #[arg(long)]
        rows: String,
        #[arg(long)]
        cols: String,
    },
}

fn parse_marginal(s: &str) -> Result<Vec<u32>> {
    s.split(',')
        .map(|part| part.trim().parse::<u32>().context("marginal entries must be non-negative integers"))
        .collect()
}

fn parse_cells(s: &str) -> Result<Vec<(usize, usize)>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(';')
        .map(|pair| {
            let (i, j) = pair
                .split_once(',')
                .context("forced-zero cells must be 'i,j' pairs separated by ';'")?;
            Ok((i.trim().parse()?, j.trim().parse()?))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut rng = SmallRng::seed_from_u64(seed);

    match cli.command {
        Command::Bct { rows, cols } => {
            let r = parse_marginal(&rows)?;
            let c = parse_marginal(&cols)?;
            let table = sample_bct(&r, &c, &mut rng).context("sampling failed")?;
            print!("{table}");
        }
        Command::Zeros { rows, cols, zeros } => {
            let r = parse_marginal(&rows)?;
            let c = parse_marginal(&cols)?;
            let mut mask = Mask::none_decided(r.len(), c.len());
            for (i, j) in parse_cells(&zeros)? {
                mask.set(i, j, true);
            }
            let table = sample_bct_with_zeros(&r, &c, &mask, &mut rng).context("sampling failed")?;
            print!("{table}");
        }
        Command::Latin { n } => {
            let table = sample_latin_square(n, &mut rng).context("sampling failed")?;
            print!("{table}");
        }
        Command::Feasible { rows, cols } => {
            let r = parse_marginal(&rows)?;
            let c = parse_marginal(&cols)?;
            println!("{}", feasible(&r, &c));
        }
    }

    Ok(())
}
