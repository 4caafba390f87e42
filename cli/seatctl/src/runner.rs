//! Script execution against a [`SeatAllocator`].

use std::fmt;
use std::io::{self, BufRead, Write};

use seatline_allocator::{
    AllocError, Availability, Booking, Cancellation, Expansion, HolderId, Initialized,
    PriorityUpdate, RangeRelease, Reservation, SeatAllocator, SeatId, WaitlistExit,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::output::{OutputFormat, Printer};

/// Line printed when a script quits.
pub const TERMINATED: &str = "Program Terminated!!";

/// `Cancel` for a seat number that can never be a seat id.
///
/// Renders and serializes like [`Cancellation::NoMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename = "no_match")]
pub struct UnknownSeat {
    pub holder: HolderId,
    pub seat: i64,
}

impl fmt::Display for UnknownSeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User {} has no reservation for seat {} to cancel",
            self.holder, self.seat
        )
    }
}

/// Result of one executed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Initialized(Initialized),
    Availability(Availability),
    Reservation(Reservation),
    Cancellation(Cancellation),
    UnknownSeat(UnknownSeat),
    WaitlistExit(WaitlistExit),
    PriorityUpdate(PriorityUpdate),
    Expansion(Expansion),
    RangeRelease(RangeRelease),
    Reservations(Vec<Booking>),
    Terminated,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Initialized(o) => write!(f, "{o}"),
            Outcome::Availability(o) => write!(f, "{o}"),
            Outcome::Reservation(o) => write!(f, "{o}"),
            Outcome::Cancellation(o) => write!(f, "{o}"),
            Outcome::UnknownSeat(o) => write!(f, "{o}"),
            Outcome::WaitlistExit(o) => write!(f, "{o}"),
            Outcome::PriorityUpdate(o) => write!(f, "{o}"),
            Outcome::Expansion(o) => write!(f, "{o}"),
            Outcome::RangeRelease(o) => write!(f, "{o}"),
            Outcome::Reservations(bookings) => {
                for (i, booking) in bookings.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{booking}")?;
                }
                Ok(())
            }
            Outcome::Terminated => f.write_str(TERMINATED),
        }
    }
}

/// Apply one command to the allocator.
pub fn execute(allocator: &mut SeatAllocator, command: Command) -> Result<Outcome, AllocError> {
    let outcome = match command {
        Command::Initialize { seats } => Outcome::Initialized(allocator.initialize(seats)?),
        Command::Available => Outcome::Availability(allocator.availability()),
        Command::Reserve { holder, priority } => {
            Outcome::Reservation(allocator.reserve(holder, priority)?)
        }
        Command::Cancel { seat, holder } => match u64::try_from(seat) {
            Ok(seat) => Outcome::Cancellation(allocator.cancel(SeatId::new(seat), holder)),
            Err(_) => Outcome::UnknownSeat(UnknownSeat { holder, seat }),
        },
        Command::ExitWaitlist { holder } => Outcome::WaitlistExit(allocator.exit_waitlist(holder)),
        Command::UpdatePriority { holder, priority } => {
            Outcome::PriorityUpdate(allocator.update_priority(holder, priority))
        }
        Command::AddSeats { count } => Outcome::Expansion(allocator.add_seats(count)?),
        Command::ReleaseSeats { lo, hi } => Outcome::RangeRelease(allocator.release_range(lo, hi)?),
        Command::PrintReservations => Outcome::Reservations(allocator.reservations()),
        Command::Quit => Outcome::Terminated,
    };
    Ok(outcome)
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Non-blank lines read, including failures.
    pub lines: usize,
    /// Lines that failed to parse.
    pub unparsable: usize,
    /// Commands the allocator rejected.
    pub rejected: usize,
    /// Whether a `Quit()` ended the run.
    pub terminated: bool,
}

/// Whether to keep reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Feeds script lines to an allocator and prints each result.
#[derive(Debug)]
pub struct ScriptRunner<W> {
    allocator: SeatAllocator,
    printer: Printer<W>,
    summary: RunSummary,
}

impl<W: Write> ScriptRunner<W> {
    pub fn new(sink: W, format: OutputFormat) -> Self {
        Self {
            allocator: SeatAllocator::new(),
            printer: Printer::new(sink, format),
            summary: RunSummary::default(),
        }
    }

    /// Run every line of `input` until end of input or `Quit()`.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<RunSummary> {
        for line in input.lines() {
            if self.execute_line(&line?)? == Flow::Stop {
                break;
            }
        }
        self.printer.flush()?;

        info!(
            lines = self.summary.lines,
            unparsable = self.summary.unparsable,
            rejected = self.summary.rejected,
            terminated = self.summary.terminated,
            "script finished"
        );
        Ok(self.summary)
    }

    /// Execute a single line. Blank lines are skipped.
    pub fn execute_line(&mut self, line: &str) -> io::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        self.summary.lines += 1;

        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(error) => {
                warn!(line, %error, "failed to parse line");
                self.summary.unparsable += 1;
                self.printer.unparsable(line, &error)?;
                return Ok(Flow::Continue);
            }
        };

        debug!(command = command.name(), "executing");
        match execute(&mut self.allocator, command) {
            Ok(outcome) => self.printer.result(command.name(), &outcome)?,
            Err(error) => {
                self.summary.rejected += 1;
                self.printer.rejected(command.name(), line, &error)?;
            }
        }

        if command == Command::Quit {
            self.summary.terminated = true;
            return Ok(Flow::Stop);
        }
        Ok(Flow::Continue)
    }

    pub fn allocator(&self) -> &SeatAllocator {
        &self.allocator
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn into_inner(self) -> W {
        self.printer.into_inner()
    }
}
