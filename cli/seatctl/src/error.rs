//! Fatal error display for the CLI.

use colored::Colorize;

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }

    if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
        match io_err.kind() {
            std::io::ErrorKind::NotFound => {
                eprintln!("\n{}", "Hint: Check the script path.".yellow());
            }
            std::io::ErrorKind::PermissionDenied => {
                eprintln!(
                    "\n{}",
                    "Hint: Use --output to write results somewhere writable.".yellow()
                );
            }
            _ => {}
        }
    }
}
