// history.rs
//
// Capped calculation history persisted to a flat text file. Records are
// structured in memory and only become text at the persistence boundary.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use itertools::Itertools;
use tracing::debug;

use crate::calc::{CalcError, Calculation, Mode};

pub const HISTORY_FILE: &str = "historial_calculadora.txt";
pub const MAX_ENTRIES: usize = 8;
const HEADER: &str = "--- Historial de cálculos (máx. 8) ---";
const INVALID_MARKER: &str = "RESULTADO INVÁLIDO";

/// One past calculation, before rendering. A failed calculation is kept as
/// `Invalid` so it still leaves a trace in the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HistoryRecord {
    Calculated {
        mode: Mode,
        amount: f64,
        percent: f64,
        total: f64,
    },
    Invalid,
}

impl HistoryRecord {
    pub fn from_result(
        mode: Mode,
        amount: f64,
        percent: f64,
        result: &Result<Calculation, CalcError>,
    ) -> Self {
        match result {
            Ok(calc) => HistoryRecord::Calculated {
                mode,
                amount,
                percent,
                total: calc.total(),
            },
            Err(_) => HistoryRecord::Invalid,
        }
    }

    /// Renders the single text line stored in the history file.
    pub fn render(&self, at: DateTime<Local>) -> String {
        let stamp = at.format("%Y-%m-%d %H:%M:%S");
        match *self {
            HistoryRecord::Calculated {
                mode,
                amount,
                percent,
                total,
            } => {
                let (amount_label, total_label) = match mode {
                    Mode::Discount => ("Base", "Final"),
                    Mode::Tax => ("Base", "Total"),
                    Mode::Tip => ("Cuenta", "Total"),
                };
                format!(
                    "[{stamp}] {} | {amount_label}: {amount:.2} | {percent:.2}% | {total_label}: {total:.2}",
                    mode.label()
                )
            }
            HistoryRecord::Invalid => format!("[{stamp}] {INVALID_MARKER}"),
        }
    }
}

/// Ordered log of at most `MAX_ENTRIES` rendered lines, oldest first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<String>,
}

impl HistoryLog {
    /// Reads the history file. A missing file is an empty log; the header
    /// and blank lines are skipped and a leading "N. " index is stripped.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "history file absent, starting empty");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("leyendo {}", path.display()))
            }
        };
        let entries: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("---"))
            .map(|line| strip_index_prefix(line).to_string())
            .collect();
        debug!(count = entries.len(), "history loaded");
        Ok(Self { entries })
    }

    /// Rewrites the whole file: header plus entries renumbered 1..N.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut out = String::from(HEADER);
        out.push('\n');
        if !self.entries.is_empty() {
            let body = self
                .entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| format!("{}. {}", idx + 1, entry))
                .join("\n");
            out.push_str(&body);
            out.push('\n');
        }
        fs::write(path, out).with_context(|| format!("escribiendo {}", path.display()))?;
        debug!(count = self.entries.len(), "history saved");
        Ok(())
    }

    /// Appends an entry, evicting the oldest ones past the cap.
    pub fn push(&mut self, entry: String) {
        self.entries.push(entry);
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

fn strip_index_prefix(line: &str) -> &str {
    if line.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        line.split_once(' ').map_or(line, |(_, rest)| rest)
    } else {
        line
    }
}
