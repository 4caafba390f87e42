//! Script input and output locations.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::output::OutputFormat;
use crate::runner::{RunSummary, ScriptRunner};

/// Path argument that selects stdin or stdout.
pub const STDIO: &str = "-";

/// Where a script is read from or written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Stdio,
    File(PathBuf),
}

impl Endpoint {
    /// Interpret a path argument; `-` means stdin/stdout.
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == STDIO {
            Endpoint::Stdio
        } else {
            Endpoint::File(arg.to_path_buf())
        }
    }

    /// Output location used when none is given.
    ///
    /// A file input `name.txt` writes to `name_output.txt` next to it;
    /// stdin writes to stdout.
    pub fn default_output_for(input: &Endpoint) -> Self {
        match input {
            Endpoint::Stdio => Endpoint::Stdio,
            Endpoint::File(path) => Endpoint::File(output_path_for(path)),
        }
    }
}

fn output_path_for(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.strip_suffix(".txt").unwrap_or(&file_name);
    input.with_file_name(format!("{stem}_output.txt"))
}

/// Run the script at `input`, writing results to `output`.
pub fn run_script(input: &Endpoint, output: &Endpoint, format: OutputFormat) -> Result<RunSummary> {
    if let (Endpoint::File(src), Endpoint::File(dst)) = (input, output) {
        if src == dst {
            bail!("output path {} would overwrite the input", dst.display());
        }
    }

    let reader: Box<dyn BufRead> = match input {
        Endpoint::Stdio => Box::new(io::stdin().lock()),
        Endpoint::File(path) => Box::new(BufReader::new(File::open(path).with_context(
            || format!("Failed to open input file {}", path.display()),
        )?)),
    };

    let writer: Box<dyn Write> = match output {
        Endpoint::Stdio => Box::new(io::stdout().lock()),
        Endpoint::File(path) => Box::new(BufWriter::new(File::create(path).with_context(
            || format!("Failed to create output file {}", path.display()),
        )?)),
    };

    info!(?input, ?output, %format, "running script");
    let mut runner = ScriptRunner::new(writer, format);
    runner.run(reader).context("Failed to run script")
}
