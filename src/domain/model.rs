use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The two fixed layouts published in the results feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DataLayout {
    /// `bg3.txt`: one line per game with round labels.
    Games,
    /// `bg7.txt`: one line per game with spectator counts.
    Attendance,
}

impl DataLayout {
    pub const GAMES_FILE: &'static str = "bg3.txt";
    pub const ATTENDANCE_FILE: &'static str = "bg7.txt";

    /// Selects the layout from a feed file name. Other file names need an
    /// explicit layout (`--layout games` / `layout = "games"`).
    pub fn from_name(name: &str) -> Result<Self> {
        let file_name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);

        match file_name {
            Self::GAMES_FILE => Ok(DataLayout::Games),
            Self::ATTENDANCE_FILE => Ok(DataLayout::Attendance),
            other => Err(EtlError::format(format!("unexpected data file '{}'", other))),
        }
    }

    pub fn field_count(self) -> usize {
        8
    }

    pub fn default_file(self) -> &'static str {
        match self {
            DataLayout::Games => Self::GAMES_FILE,
            DataLayout::Attendance => Self::ATTENDANCE_FILE,
        }
    }
}

impl fmt::Display for DataLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLayout::Games => write!(f, "games"),
            DataLayout::Attendance => write!(f, "attendance"),
        }
    }
}

/// One game as published in the games layout. Scores are still raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGameRow {
    pub game_id: u32,
    pub date: NaiveDate,
    pub round: String,
    pub home_team: String,
    pub home_score: String,
    pub away_team: String,
    pub away_score: String,
    pub venue: String,
}

/// One game as published in the attendance layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRow {
    pub row_id: u32,
    pub spectators: u32,
    /// The feed marks finals crowds with a trailing `*`.
    pub is_final: bool,
    pub home_team: String,
    pub home_score: String,
    pub away_team: String,
    pub away_score: String,
    pub venue: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRows {
    Games(Vec<RawGameRow>),
    Attendance(Vec<AttendanceRow>),
}

impl ParsedRows {
    pub fn layout(&self) -> DataLayout {
        match self {
            ParsedRows::Games(_) => DataLayout::Games,
            ParsedRows::Attendance(_) => DataLayout::Attendance,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ParsedRows::Games(rows) => rows.len(),
            ParsedRows::Attendance(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Goals, behinds and total points, e.g. `12.5.77`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub goals: u32,
    pub behinds: u32,
    pub points: u32,
}

/// One team's view of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamGameRecord {
    pub date: NaiveDate,
    pub venue: String,
    pub round: String,
    pub team: String,
    pub goals: u32,
    pub behinds: u32,
    pub points_for: u32,
    pub points_against: u32,
}

impl TeamGameRecord {
    pub fn key(&self) -> (NaiveDate, &str, &str, &str) {
        (self.date, &self.venue, &self.round, &self.team)
    }

    pub fn outcome(&self) -> GameOutcome {
        GameOutcome::from_scores(self.points_for, self.points_against)
    }
}

/// 0/1 flags for a single game; exactly one of won/drawn/lost is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameOutcome {
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
}

impl GameOutcome {
    pub fn from_scores(points_for: u32, points_against: u32) -> Self {
        Self {
            played: 1,
            won: u32::from(points_for > points_against),
            drawn: u32::from(points_for == points_against),
            lost: u32::from(points_against > points_for),
        }
    }
}

/// How round labels compare when filtering a round range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RoundOrdering {
    /// Plain string order: `R1 < R10 < R2`, finals codes before `R1`.
    #[default]
    Lexicographic,
    /// `R<n>` by number, every other label after all numbered rounds.
    Numeric,
}

impl RoundOrdering {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            RoundOrdering::Lexicographic => a.cmp(b),
            RoundOrdering::Numeric => numeric_round_key(a).cmp(&numeric_round_key(b)),
        }
    }
}

fn numeric_round_key(label: &str) -> (u8, u32, &str) {
    match label.strip_prefix('R').and_then(|n| n.parse::<u32>().ok()) {
        Some(number) => (0, number, ""),
        None => (1, 0, label),
    }
}

/// Inclusive range of round labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRange {
    pub first: String,
    pub last: String,
    #[serde(default)]
    pub ordering: RoundOrdering,
}

impl RoundRange {
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            ordering: RoundOrdering::default(),
        }
    }

    pub fn with_ordering(mut self, ordering: RoundOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn contains(&self, round: &str) -> bool {
        self.ordering.compare(&self.first, round) != Ordering::Greater
            && self.ordering.compare(round, &self.last) != Ordering::Greater
    }
}

impl Default for RoundRange {
    fn default() -> Self {
        Self::new("R1", "R9")
    }
}

impl fmt::Display for RoundRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.first, self.last)
    }
}

impl FromStr for RoundRange {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        let (first, last) = s
            .split_once("..")
            .ok_or_else(|| EtlError::format(format!("round range '{}' is not FIRST..LAST", s)))?;
        Ok(Self::new(first.trim(), last.trim()))
    }
}

/// What to do with a percentage that has no points against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PercentagePolicy {
    /// Keep `inf`/`NaN` in the ladder.
    #[default]
    Propagate,
    /// Fail with `DivisionUndefined`.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LadderEntry {
    #[serde(rename = "Pos")]
    pub position: usize,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "P")]
    pub played: u32,
    #[serde(rename = "W")]
    pub won: u32,
    #[serde(rename = "D")]
    pub drawn: u32,
    #[serde(rename = "L")]
    pub lost: u32,
    #[serde(rename = "G")]
    pub goals: u64,
    #[serde(rename = "B")]
    pub behinds: u64,
    #[serde(rename = "F")]
    pub points_for: u64,
    #[serde(rename = "A")]
    pub points_against: u64,
    #[serde(rename = "PCT")]
    pub percentage: f64,
    #[serde(rename = "PTS")]
    pub points: u32,
}

impl LadderEntry {
    pub fn has_defined_percentage(&self) -> bool {
        self.percentage.is_finite()
    }
}

/// Standings for one season and round range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ladder {
    pub season: i32,
    pub rounds: RoundRange,
    pub entries: Vec<LadderEntry>,
}

impl Ladder {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn leader(&self) -> Option<&LadderEntry> {
        self.entries.first()
    }

    pub fn entry(&self, team: &str) -> Option<&LadderEntry> {
        self.entries.iter().find(|e| e.team == team)
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub game_count: usize,
    pub team_records: Vec<TeamGameRecord>,
    pub ladder: Ladder,
}

/// What a completed run hands back to the caller.
#[derive(Debug, Clone)]
pub struct LadderRun {
    pub ladder: Ladder,
    pub outputs: Vec<String>,
}
