use crate::domain::model::{Ladder, LadderEntry, OutputFormat};
use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COLUMNS: [&str; 12] = [
    "Pos", "Team", "P", "W", "D", "L", "G", "B", "F", "A", "PCT", "PTS",
];

const TEAM_COLUMN: usize = 1;
const COLUMN_GAP: &str = "  ";

/// Limits applied when printing a ladder as a text table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Rows shown before the table is cut to its head and tail; `None` shows all.
    pub max_rows: Option<usize>,
    /// Characters per line.
    pub width: usize,
}

impl DisplayOptions {
    pub fn unlimited() -> Self {
        Self {
            max_rows: None,
            width: usize::MAX,
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_rows: Some(20),
            width: 200,
        }
    }
}

fn cells(entry: &LadderEntry) -> Vec<String> {
    vec![
        entry.position.to_string(),
        entry.team.clone(),
        entry.played.to_string(),
        entry.won.to_string(),
        entry.drawn.to_string(),
        entry.lost.to_string(),
        entry.goals.to_string(),
        entry.behinds.to_string(),
        entry.points_for.to_string(),
        entry.points_against.to_string(),
        // inf and NaN print as such
        format!("{:.2}", entry.percentage),
        entry.points.to_string(),
    ]
}

fn format_line(row: &[String], widths: &[usize], max_width: usize) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in row.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        if i == TEAM_COLUMN {
            line.push_str(&format!("{:<width$}", cell, width = width));
        } else {
            line.push_str(&format!("{:>width$}", cell, width = width));
        }
    }
    let line = line.trim_end();
    line.chars().take(max_width).collect()
}

impl Ladder {
    /// Fixed-width table; long ladders keep their head and tail around a `...` row.
    pub fn render(&self, options: &DisplayOptions) -> String {
        let rows: Vec<Vec<String>> = self.entries.iter().map(cells).collect();
        let total = rows.len();

        let (head, tail) = match options.max_rows {
            Some(max) if total > max => (max.div_ceil(2), max / 2),
            _ => (total, 0),
        };
        let truncated = head + tail < total;

        let mut visible: Vec<Vec<String>> = rows[..head].to_vec();
        if truncated {
            visible.push(vec!["...".to_string(); COLUMNS.len()]);
        }
        visible.extend_from_slice(&rows[total - tail..]);

        let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut widths: Vec<usize> = header.iter().map(|c| c.chars().count()).collect();
        for row in &visible {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(visible.len() + 3);
        lines.push(format_line(&header, &widths, options.width));
        lines.extend(
            visible
                .iter()
                .map(|row| format_line(row, &widths, options.width)),
        );
        if truncated {
            lines.push(String::new());
            lines.push(format!("[{} rows x {} columns]", total, COLUMNS.len()));
        }

        lines.join("\n")
    }
}

impl fmt::Display for Ladder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&DisplayOptions::default()))
    }
}

pub fn to_delimited(ladder: &Ladder, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for entry in &ladder.entries {
        writer.serialize(entry)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| EtlError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Serializes the ladder in an export format. Non-finite PCT becomes `null` in JSON.
pub fn render_output(ladder: &Ladder, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => to_delimited(ladder, b','),
        OutputFormat::Tsv => to_delimited(ladder, b'\t'),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ladder)?),
    }
}
