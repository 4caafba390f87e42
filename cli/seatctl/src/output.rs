//! Output formatting for script results.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text lines.
    #[default]
    Text,
    /// One JSON object per command.
    Json,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown output format '{0}' (expected text or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// A command that produced a result.
#[derive(Debug, Serialize)]
struct Success<'a, T: Serialize> {
    command: &'a str,
    result: &'a T,
}

/// A line that could not be executed.
#[derive(Debug, Serialize)]
struct Failure<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<&'a str>,
    line: &'a str,
    error: String,
}

/// Writes command results to a sink in the selected format.
#[derive(Debug)]
pub struct Printer<W> {
    sink: W,
    format: OutputFormat,
}

impl<W: Write> Printer<W> {
    pub fn new(sink: W, format: OutputFormat) -> Self {
        Self { sink, format }
    }

    /// Write a successful result.
    pub fn result<T>(&mut self, command: &str, result: &T) -> io::Result<()>
    where
        T: Serialize + fmt::Display,
    {
        match self.format {
            OutputFormat::Text => writeln!(self.sink, "{result}"),
            OutputFormat::Json => self.json(&Success { command, result }),
        }
    }

    /// Write a command the allocator rejected.
    ///
    /// Text mode prints the rejection message as an ordinary result line.
    pub fn rejected(
        &mut self,
        command: &str,
        line: &str,
        error: &dyn std::error::Error,
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.sink, "{error}"),
            OutputFormat::Json => self.json(&Failure {
                command: Some(command),
                line,
                error: error.to_string(),
            }),
        }
    }

    /// Write a line that failed to parse.
    pub fn unparsable(&mut self, line: &str, error: &dyn std::error::Error) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.sink, "Error processing line: {line}")?;
                writeln!(self.sink, "Error details: {error}")
            }
            OutputFormat::Json => self.json(&Failure {
                command: None,
                line,
                error: error.to_string(),
            }),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn json<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.sink, value)?;
        self.sink.write_all(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("text".parse(), Ok(OutputFormat::Text));
        assert_eq!(" JSON ".parse(), Ok(OutputFormat::Json));
        assert_eq!(
            "yaml".parse::<OutputFormat>(),
            Err(UnknownFormat("yaml".into()))
        );
    }

    #[test]
    fn test_unparsable_text_is_two_lines() {
        let mut printer = Printer::new(Vec::new(), OutputFormat::Text);
        let error = UnknownFormat("x".into());
        printer.unparsable("Bogus()", &error).unwrap();
        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(
            out,
            "Error processing line: Bogus()\n\
             Error details: unknown output format 'x' (expected text or json)\n"
        );
    }

    #[test]
    fn test_json_result_line() {
        let mut printer = Printer::new(Vec::new(), OutputFormat::Json);
        printer.result("Available", &"ok").unwrap();
        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(out, "{\"command\":\"Available\",\"result\":\"ok\"}\n");
    }
}
