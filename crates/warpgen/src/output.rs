//! Output formatting: text, JSON, YAML.
//!
//! Results go to stdout in the format selected by `--output`; warnings,
//! progress, and status lines go to stderr.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Whether stdout output should be colored.
pub fn should_color(mode: ColorMode) -> bool {
    stream_color(mode, io::stdout().is_terminal())
}

/// Whether stderr output should be colored.
pub fn should_color_stderr(mode: ColorMode) -> bool {
    stream_color(mode, io::stderr().is_terminal())
}

fn stream_color(mode: ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_terminal && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Section heading for multi-part text output.
pub fn heading(title: &str, color: bool) -> String {
    let line = format!("── {title} ──");
    if color {
        line.cyan().bold().to_string()
    } else {
        line
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list: a rounded table for text, serde for everything else.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Text => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        structured => render_structured(structured, data),
    }
}

/// Render a single item; `text_fn` produces the text form.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    text_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Text => Ok(text_fn(data)),
        structured => render_structured(structured, data),
    }
}

fn render_structured<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::Json | OutputFormat::Text => serde_json::to_string_pretty(data)
            .map_err(|e| CliError::Render(e.to_string()))?,
        OutputFormat::JsonCompact => {
            serde_json::to_string(data).map_err(|e| CliError::Render(e.to_string()))?
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))?
        }
    };
    Ok(rendered)
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", output.trim_end_matches('\n'));
}

// ── Stderr ───────────────────────────────────────────────────────────

/// Print a non-fatal warning to stderr. Warnings survive `--quiet`.
pub fn warn(message: impl Display, color: bool) {
    let label = if color {
        "warning:".yellow().bold().to_string()
    } else {
        "warning:".to_owned()
    };
    eprintln!("{label} {message}");
}

/// Print a status line to stderr unless quiet.
pub fn status(message: impl Display, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

/// Spinner on interactive stderr; hidden otherwise.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
