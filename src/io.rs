//! Read and write circuits and test patterns to files

mod bench;
mod patterns;

use std::fs::File;
use std::io;
use std::path::Path;

pub use bench::{output_name, read_bench, write_bench};
pub use patterns::{read_patterns, write_patterns};

use crate::error::{Error, Result};
use crate::network::Circuit;

fn unsupported(message: String) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::InvalidInput, message))
}

/// Read a circuit from a file
///
/// Following extensions are supported: .bench
pub fn read_circuit_file(path: &Path) -> Result<Circuit> {
    match path.extension() {
        Some(s) if s == "bench" => {
            let f = File::open(path)?;
            read_bench(f)?.build()
        }
        Some(s) => Err(unsupported(format!(
            "Unknown extension {}",
            s.to_string_lossy()
        ))),
        None => Err(unsupported("No extension given".to_string())),
    }
}

/// Read patterns from a file
pub fn read_pattern_file(path: &Path) -> Result<Vec<Vec<bool>>> {
    let f = File::open(path)?;
    read_patterns(f)
}

/// Write patterns to a file
pub fn write_pattern_file(path: &Path, patterns: &[Vec<bool>]) -> Result<()> {
    let mut f = File::create(path)?;
    write_patterns(&mut f, patterns)
}
