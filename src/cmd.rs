//! Command line interface

use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use kdam::{tqdm, BarExt};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use dalgo::atpg::{fill_pattern, generate_test_patterns, DAlgorithm, Fill, Status};
use dalgo::io::{read_circuit_file, read_pattern_file, write_pattern_file};
use dalgo::network::stats::stats;
use dalgo::sim::{detects_fault, detects_fault_multi, pack_patterns, Fault};
use dalgo::{Circuit, Error, Result};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show more log messages; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a circuit
    ///
    /// Will print statistics on the number of inputs, outputs and gates in the circuit.
    #[clap()]
    Show(ShowArgs),

    /// Test pattern generation for a circuit
    ///
    /// With a fault, run the D-algorithm on this fault only and report each step if asked.
    /// Without a fault, generate patterns to detect every stuck-at fault of the circuit.
    ///
    /// Patterns use the same format as Atalanta, with one bit per input:
    ///    1: 00011101
    ///    2: 01110000
    #[clap()]
    Atpg(AtpgArgs),

    /// Compute the fault coverage of a set of test patterns
    ///
    /// Every stuck-at fault of the circuit is simulated against the patterns.
    #[clap(alias = "cov")]
    Coverage(CoverageArgs),
}

impl Commands {
    /// Run the selected command
    pub fn run(&self) -> Result<()> {
        match self {
            Commands::Show(a) => a.run(),
            Commands::Atpg(a) => a.run(),
            Commands::Coverage(a) => a.run(),
        }
    }
}

/// Command arguments for circuit informations
#[derive(Args)]
pub struct ShowArgs {
    /// Circuit to show
    file: PathBuf,

    /// Also print every node
    #[arg(long)]
    nodes: bool,
}

impl ShowArgs {
    pub fn run(&self) -> Result<()> {
        let circuit = read_circuit_file(&self.file)?;
        println!("Circuit stats:\n{}\n", stats(&circuit));
        if self.nodes {
            println!("{}", circuit);
        }
        Ok(())
    }
}

/// Command arguments for test pattern generation
#[derive(Args)]
pub struct AtpgArgs {
    /// Circuit to write test patterns for
    circuit: PathBuf,

    /// Name of the faulty node; all faults are targeted if omitted
    #[arg(short = 'f', long)]
    fault: Option<String>,

    /// Value the faulty node is stuck at
    #[arg(short = 's', long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    stuck_at: u8,

    /// Output file for test patterns
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Value given to inputs left unassigned by the search
    #[arg(long, value_enum, default_value_t = Fill::Zero)]
    fill: Fill,

    /// Random seed for the random fill
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Print the assignment after each step of the search
    #[arg(long)]
    trace: bool,
}

impl AtpgArgs {
    pub fn run(&self) -> Result<()> {
        let circuit = read_circuit_file(&self.circuit)?;
        let patterns = match &self.fault {
            Some(name) => {
                let fault = Fault::by_name(&circuit, name, self.stuck_at != 0)?;
                self.run_single(&circuit, fault)?.into_iter().collect()
            }
            None => generate_test_patterns(&circuit, self.fill, self.seed)?.patterns,
        };
        if let Some(output) = &self.output {
            write_pattern_file(output, &patterns)?;
        }
        Ok(())
    }

    fn run_single(&self, circuit: &Circuit, fault: Fault) -> Result<Option<Vec<bool>>> {
        let mut search = DAlgorithm::new(circuit, fault)?;
        let status = if self.trace {
            let mut status = search.sensitize();
            print_step(&search, status);
            while matches!(status, Status::Continuing | Status::Conflict) {
                status = search.step();
                print_step(&search, status);
            }
            if status == Status::Success {
                status = search.cleanup();
                print_step(&search, status);
            }
            status
        } else {
            search.run()
        };

        let desc = fault.describe(circuit);
        if status != Status::Success {
            println!("{} is redundant: no test pattern exists", desc);
            return Ok(None);
        }
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let pattern = fill_pattern(&search.pattern(), self.fill, &mut rng);
        if !detects_fault(circuit, &pattern, fault) {
            log::warn!("Generated pattern does not detect {}", desc);
        }
        println!(
            "{} detected by {} (before fill: {})",
            desc,
            pattern.iter().map(|b| if *b { '1' } else { '0' }).join(""),
            search.pattern().iter().join("")
        );
        Ok(Some(pattern))
    }
}

fn print_step(search: &DAlgorithm, status: Status) {
    let circuit = search.circuit();
    println!(
        "[{:?}] depth={} {}",
        status,
        search.stack_depth(),
        circuit
            .node_ids()
            .map(|n| format!("{}={}", circuit.name(n), search.value(n)))
            .join(" ")
    );
}

/// Command arguments for fault coverage
#[derive(Args)]
pub struct CoverageArgs {
    /// Circuit to simulate
    circuit: PathBuf,

    /// Test patterns file
    patterns: PathBuf,
}

impl CoverageArgs {
    pub fn run(&self) -> Result<()> {
        let circuit = read_circuit_file(&self.circuit)?;
        let patterns = read_pattern_file(&self.patterns)?;
        if let Some(p) = patterns.iter().find(|p| p.len() != circuit.nb_inputs()) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Pattern has {} values but the circuit has {} inputs",
                    p.len(),
                    circuit.nb_inputs()
                ),
            )));
        }
        let packed = pack_patterns(&patterns);
        let faults = Fault::all(&circuit);

        let mut progress = tqdm!(total = faults.len());
        progress.set_description("Faults simulated");
        let mut undetected = Vec::new();
        for (i, f) in faults.iter().enumerate() {
            if !packed.iter().any(|p| detects_fault_multi(&circuit, p, *f) != 0) {
                undetected.push(*f);
            }
            progress.set_postfix(format!("undetected={}", undetected.len()));
            progress.update_to(i + 1)?;
        }
        let nb_detected = faults.len() - undetected.len();
        progress.write(format!(
            "{} patterns detect {}/{} faults ({:.2}% coverage)",
            patterns.len(),
            nb_detected,
            faults.len(),
            100.0 * (nb_detected as f64) / (faults.len().max(1) as f64)
        ))?;
        for f in undetected {
            log::info!("Undetected: {}", f.describe(&circuit));
        }
        Ok(())
    }
}
