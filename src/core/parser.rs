//! Tokenizes the fixed-format results feed into typed rows.
//!
//! Both layouts start with a two-line header. The remaining lines are split
//! on layout-specific separators:
//!
//! - games (`bg3.txt`): a `.` or space followed by one or more spaces, so
//!   single spaces inside names survive and the `.` after the game number
//!   is dropped;
//! - attendance (`bg7.txt`): two or more spaces, or a `.`/`*` directly after
//!   a digit and followed by spaces. The digit stays with its field.

use crate::domain::model::{AttendanceRow, DataLayout, ParsedRows, RawGameRow};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::iter::{Enumerate, Skip};
use std::marker::PhantomData;
use std::str::Lines;
use std::sync::LazyLock;

pub const HEADER_LINES: usize = 2;

const DATE_FORMATS: [&str; 2] = ["%d-%b-%Y", "%Y-%m-%d"];

static GAMES_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[. ] +").expect("valid games separator"));

// regex has no look-behind, so the leading digit is matched and handed back to the field
static ATTENDANCE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][.*] +|  +").expect("valid attendance separator"));

/// A field and the punctuation the separator swallowed after it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub text: &'a str,
    pub marker: Option<char>,
}

pub fn split_fields(line: &str, layout: DataLayout) -> Vec<Field<'_>> {
    let line = line.trim();
    let separator = match layout {
        DataLayout::Games => &*GAMES_SEPARATOR,
        DataLayout::Attendance => &*ATTENDANCE_SEPARATOR,
    };

    let mut fields = Vec::new();
    let mut start = 0;
    for m in separator.find_iter(line) {
        let sep = m.as_str();
        let (end, marker) = match sep.as_bytes()[0] {
            b'0'..=b'9' => (m.start() + 1, sep[1..].chars().next()),
            b'.' => (m.start(), Some('.')),
            _ => (m.start(), None),
        };
        fields.push(Field {
            text: &line[start..end],
            marker,
        });
        start = m.end();
    }
    fields.push(Field {
        text: &line[start..],
        marker: None,
    });

    fields
}

/// A row type that one of the feed layouts produces.
pub trait LayoutRow: Sized {
    const LAYOUT: DataLayout;

    /// Fails with `FormatError` unless `fields` has the layout's field count.
    fn from_fields(fields: &[Field<'_>], line: usize) -> Result<Self>;
}

impl LayoutRow for RawGameRow {
    const LAYOUT: DataLayout = DataLayout::Games;

    fn from_fields(fields: &[Field<'_>], line: usize) -> Result<Self> {
        check_field_count(fields, Self::LAYOUT, line)?;
        Ok(RawGameRow {
            game_id: parse_count(fields[0].text, "game number", line)?,
            date: parse_date(fields[1].text, line)?,
            round: fields[2].text.to_string(),
            home_team: fields[3].text.to_string(),
            home_score: fields[4].text.to_string(),
            away_team: fields[5].text.to_string(),
            away_score: fields[6].text.to_string(),
            venue: fields[7].text.to_string(),
        })
    }
}

impl LayoutRow for AttendanceRow {
    const LAYOUT: DataLayout = DataLayout::Attendance;

    fn from_fields(fields: &[Field<'_>], line: usize) -> Result<Self> {
        check_field_count(fields, Self::LAYOUT, line)?;
        Ok(AttendanceRow {
            row_id: parse_count(fields[0].text, "row number", line)?,
            spectators: parse_count(fields[1].text, "spectators", line)?,
            is_final: fields[1].marker == Some('*'),
            home_team: fields[2].text.to_string(),
            home_score: fields[3].text.to_string(),
            away_team: fields[4].text.to_string(),
            away_score: fields[5].text.to_string(),
            venue: fields[6].text.to_string(),
            date: parse_date(fields[7].text, line)?,
        })
    }
}

pub fn parse_date(text: &str, line: usize) -> Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .ok_or_else(|| EtlError::format_at(line, format!("invalid date '{}'", text)))
}

fn parse_count(text: &str, what: &str, line: usize) -> Result<u32> {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    digits
        .parse()
        .map_err(|_| EtlError::format_at(line, format!("invalid {} '{}'", what, text)))
}

/// Lazily parsed rows; each item fails independently with its line number.
pub struct Rows<'a, R> {
    lines: Skip<Enumerate<Lines<'a>>>,
    _row: PhantomData<fn() -> R>,
}

impl<R: LayoutRow> Iterator for Rows<'_, R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, line) in self.lines.by_ref() {
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_line(line, index + 1));
        }
        None
    }
}

fn check_field_count(fields: &[Field<'_>], layout: DataLayout, line: usize) -> Result<()> {
    let expected = layout.field_count();
    if fields.len() != expected {
        return Err(EtlError::format_at(
            line,
            format!(
                "expected {} fields for the {} layout, found {}",
                expected,
                layout,
                fields.len()
            ),
        ));
    }
    Ok(())
}

fn parse_line<R: LayoutRow>(line: &str, line_no: usize) -> Result<R> {
    let fields = split_fields(line, R::LAYOUT);
    R::from_fields(&fields, line_no)
}

pub fn parse_rows<R: LayoutRow>(text: &str) -> Rows<'_, R> {
    Rows {
        lines: text.lines().enumerate().skip(HEADER_LINES),
        _row: PhantomData,
    }
}

pub fn parse_games(text: &str) -> Rows<'_, RawGameRow> {
    parse_rows(text)
}

pub fn parse_attendance(text: &str) -> Rows<'_, AttendanceRow> {
    parse_rows(text)
}

/// Parses the whole feed, stopping at the first malformed line.
pub fn parse(text: &str, layout: DataLayout) -> Result<ParsedRows> {
    let rows = match layout {
        DataLayout::Games => ParsedRows::Games(parse_games(text).collect::<Result<_>>()?),
        DataLayout::Attendance => {
            ParsedRows::Attendance(parse_attendance(text).collect::<Result<_>>()?)
        }
    };
    tracing::debug!("Parsed {} {} rows", rows.len(), layout);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAMES: &str = "\
Game Scores
   #  Date         Rnd  Home               Score      Away               Score      Venue
    1.  8-May-1897  R1   Fitzroy            6.13.49    Carlton            2.4.16     Brunswick St
    2.  8-May-1897  R1   Collingwood        5.11.41    St Kilda           2.4.16     Victoria Park

15398.  1-Oct-2016  GF   Western Bulldogs   13.11.89   Sydney             10.7.67    M.C.G.
";

    const ATTENDANCE: &str = "\
Attendances
   #  Crowd     Home               Score      Away               Score      Venue          Date
    1.  20,000    Fitzroy            6.13.49    Carlton            2.4.16     Brunswick St   08-May-1897
    2.  99981*  Western Bulldogs   13.11.89   Sydney             10.7.67    M.C.G.         01-Oct-2016
";

    #[test]
    fn test_split_games_line() {
        let fields = split_fields(
            "    1.  8-May-1897  R1   Fitzroy            6.13.49    Carlton            2.4.16     Brunswick St",
            DataLayout::Games,
        );
        let texts: Vec<&str> = fields.iter().map(|f| f.text).collect();
        assert_eq!(
            texts,
            vec!["1", "8-May-1897", "R1", "Fitzroy", "6.13.49", "Carlton", "2.4.16", "Brunswick St"]
        );
        assert_eq!(fields[0].marker, Some('.'));
    }

    #[test]
    fn test_split_games_keeps_trailing_venue_dot() {
        let fields = split_fields(
            "15398.  1-Oct-2016  GF   Western Bulldogs   13.11.89   Sydney             10.7.67    M.C.G.",
            DataLayout::Games,
        );
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[3].text, "Western Bulldogs");
        assert_eq!(fields[7].text, "M.C.G.");
    }

    #[test]
    fn test_split_attendance_keeps_digit_before_marker() {
        let fields = split_fields(
            "2.  99981*  Western Bulldogs   13.11.89   Sydney   10.7.67    M.C.G.   01-Oct-2016",
            DataLayout::Attendance,
        );
        let texts: Vec<&str> = fields.iter().map(|f| f.text).collect();
        assert_eq!(
            texts,
            vec!["2", "99981", "Western Bulldogs", "13.11.89", "Sydney", "10.7.67", "M.C.G.", "01-Oct-2016"]
        );
        assert_eq!(fields[1].marker, Some('*'));
    }

    #[test]
    fn test_parse_games_skips_header_and_blank_lines() {
        let rows: Vec<RawGameRow> = parse_games(GAMES).collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].game_id, 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(1897, 5, 8).unwrap());
        assert_eq!(rows[0].round, "R1");
        assert_eq!(rows[0].home_score, "6.13.49");
        assert_eq!(rows[1].away_team, "St Kilda");
        assert_eq!(rows[2].round, "GF");
        assert_eq!(rows[2].venue, "M.C.G.");
    }

    #[test]
    fn test_parse_attendance_rows() {
        let rows: Vec<AttendanceRow> = parse_attendance(ATTENDANCE).collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spectators, 20_000);
        assert!(!rows[0].is_final);
        assert_eq!(rows[0].venue, "Brunswick St");
        assert_eq!(rows[1].spectators, 99_981);
        assert!(rows[1].is_final);
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2016, 10, 1).unwrap());
    }

    #[test]
    fn test_wrong_field_count_is_format_error() {
        let text = "header\nheader\n    1.  8-May-1897  R1   Fitzroy            6.13.49\n";
        let err = parse(text, DataLayout::Games).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("line 3"));
        assert!(err.to_string().contains("found 5"));
    }

    #[test]
    fn test_from_fields_rejects_short_slice() {
        let fields = split_fields("1.  2-Apr-2016  R1   Carlton", DataLayout::Games);

        let err = RawGameRow::from_fields(&fields, 7).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("line 7"));
        assert!(AttendanceRow::from_fields(&[], 3).unwrap_err().is_format_error());
    }

    #[test]
    fn test_bad_date_is_format_error() {
        let text = "h\nh\n    1.  31-Foo-1897  R1   Fitzroy   6.13.49   Carlton   2.4.16   Brunswick St\n";
        let err = parse(text, DataLayout::Games).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn test_rows_are_lazy() {
        let text = "h\nh\n    1.  8-May-1897  R1   Fitzroy   6.13.49   Carlton   2.4.16   Brunswick St\nbroken line\n";
        let mut rows = parse_games(text);
        assert!(rows.next().unwrap().is_ok());
        assert!(rows.next().unwrap().is_err());
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let rows = parse("only\nheader\n", DataLayout::Attendance).unwrap();
        assert!(rows.is_empty());
        assert_eq!(rows.layout(), DataLayout::Attendance);
    }
}
