//! Script command grammar.
//!
//! One command per line, written `Name(arg, arg, ...)` with integer
//! arguments. Whitespace around the name and each argument is ignored.

use std::str::FromStr;

use seatline_id::{HolderId, IdError, Priority};
use thiserror::Error;

/// Errors from parsing a single script line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("expected `Name(args)`, got '{line}'")]
    MissingParens { line: String },

    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },

    #[error("{command} takes {expected} argument(s), got {actual}")]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid seat count '{actual}': not an integer")]
    InvalidCount { actual: String },

    #[error("invalid seat '{actual}': not an integer")]
    InvalidSeat { actual: String },

    #[error(transparent)]
    Argument(#[from] IdError),
}

/// A parsed script command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Initialize { seats: i64 },
    Available,
    Reserve { holder: HolderId, priority: Priority },
    /// `seat` is kept raw: a value that is not a valid seat id simply
    /// matches no reservation.
    Cancel { seat: i64, holder: HolderId },
    ExitWaitlist { holder: HolderId },
    UpdatePriority { holder: HolderId, priority: Priority },
    AddSeats { count: i64 },
    ReleaseSeats { lo: HolderId, hi: HolderId },
    PrintReservations,
    Quit,
}

impl Command {
    /// The script name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Initialize { .. } => "Initialize",
            Command::Available => "Available",
            Command::Reserve { .. } => "Reserve",
            Command::Cancel { .. } => "Cancel",
            Command::ExitWaitlist { .. } => "ExitWaitlist",
            Command::UpdatePriority { .. } => "UpdatePriority",
            Command::AddSeats { .. } => "AddSeats",
            Command::ReleaseSeats { .. } => "ReleaseSeats",
            Command::PrintReservations => "PrintReservations",
            Command::Quit => "Quit",
        }
    }

    /// Parse one script line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (name, inner) = line
            .strip_suffix(')')
            .and_then(|body| body.split_once('('))
            .ok_or_else(|| CommandError::MissingParens {
                line: line.to_string(),
            })?;

        let args: Vec<&str> = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(str::trim).collect()
        };

        let command = match name.trim() {
            "Initialize" => {
                let [seats] = arity::<1>("Initialize", &args)?;
                Command::Initialize {
                    seats: count(seats)?,
                }
            }
            "Available" => {
                arity::<0>("Available", &args)?;
                Command::Available
            }
            "Reserve" => {
                let [holder, priority] = arity::<2>("Reserve", &args)?;
                Command::Reserve {
                    holder: holder.parse()?,
                    priority: priority.parse()?,
                }
            }
            "Cancel" => {
                let [seat, holder] = arity::<2>("Cancel", &args)?;
                Command::Cancel {
                    seat: seat.parse().map_err(|_| CommandError::InvalidSeat {
                        actual: seat.to_string(),
                    })?,
                    holder: holder.parse()?,
                }
            }
            "ExitWaitlist" => {
                let [holder] = arity::<1>("ExitWaitlist", &args)?;
                Command::ExitWaitlist {
                    holder: holder.parse()?,
                }
            }
            "UpdatePriority" => {
                let [holder, priority] = arity::<2>("UpdatePriority", &args)?;
                Command::UpdatePriority {
                    holder: holder.parse()?,
                    priority: priority.parse()?,
                }
            }
            "AddSeats" => {
                let [added] = arity::<1>("AddSeats", &args)?;
                Command::AddSeats {
                    count: count(added)?,
                }
            }
            "ReleaseSeats" => {
                let [lo, hi] = arity::<2>("ReleaseSeats", &args)?;
                Command::ReleaseSeats {
                    lo: lo.parse()?,
                    hi: hi.parse()?,
                }
            }
            "PrintReservations" => {
                arity::<0>("PrintReservations", &args)?;
                Command::PrintReservations
            }
            "Quit" => {
                arity::<0>("Quit", &args)?;
                Command::Quit
            }
            other => {
                return Err(CommandError::UnknownCommand {
                    name: other.to_string(),
                })
            }
        };

        Ok(command)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn arity<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], CommandError> {
    <[&str; N]>::try_from(args).map_err(|_| CommandError::ArgumentCount {
        command,
        expected: N,
        actual: args.len(),
    })
}

fn count(arg: &str) -> Result<i64, CommandError> {
    arg.parse().map_err(|_| CommandError::InvalidCount {
        actual: arg.to_string(),
    })
}
