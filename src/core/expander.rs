use crate::domain::model::{RawGameRow, Score, TeamGameRecord};
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

static SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\D(\d+)\D(\d+)").expect("valid score pattern"));

impl FromStr for Score {
    type Err = EtlError;

    /// Reads `goals.behinds.points`; the total is kept as supplied.
    fn from_str(s: &str) -> Result<Self> {
        let caps = SCORE_PATTERN
            .captures(s)
            .ok_or_else(|| EtlError::format(format!("malformed score '{}'", s)))?;

        let group = |i: usize| -> Result<u32> {
            caps[i]
                .parse()
                .map_err(|_| EtlError::format(format!("score component out of range in '{}'", s)))
        };

        Ok(Score {
            goals: group(1)?,
            behinds: group(2)?,
            points: group(3)?,
        })
    }
}

fn team_record(row: &RawGameRow, team: &str, own: Score, opponent: Score) -> TeamGameRecord {
    TeamGameRecord {
        date: row.date,
        venue: row.venue.clone(),
        round: row.round.clone(),
        team: team.to_string(),
        goals: own.goals,
        behinds: own.behinds,
        points_for: own.points,
        points_against: opponent.points,
    }
}

/// Pivots each game into a home and an away record, sorted by
/// (date, venue, round, team).
pub fn expand_games<I>(games: I) -> Result<Vec<TeamGameRecord>>
where
    I: IntoIterator<Item = RawGameRow>,
{
    let games = games.into_iter();
    let (lower, _) = games.size_hint();
    let mut home_records = Vec::with_capacity(lower);
    let mut away_records = Vec::with_capacity(lower);

    for row in games {
        let home: Score = row.home_score.parse()?;
        let away: Score = row.away_score.parse()?;

        home_records.push(team_record(&row, &row.home_team, home, away));
        away_records.push(team_record(&row, &row.away_team, away, home));
    }

    let mut records = home_records;
    records.append(&mut away_records);
    records.sort_by(|a, b| a.key().cmp(&b.key()));

    tracing::debug!("Expanded {} games into {} team records", records.len() / 2, records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn game(date: (i32, u32, u32), round: &str, home: (&str, &str), away: (&str, &str), venue: &str) -> RawGameRow {
        RawGameRow {
            game_id: 1,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            round: round.to_string(),
            home_team: home.0.to_string(),
            home_score: home.1.to_string(),
            away_team: away.0.to_string(),
            away_score: away.1.to_string(),
            venue: venue.to_string(),
        }
    }

    #[test]
    fn test_score_from_str() {
        let score: Score = "12.5.77".parse().unwrap();
        assert_eq!(score, Score { goals: 12, behinds: 5, points: 77 });

        // any single non-digit separates the groups
        let score: Score = "0-0-0".parse().unwrap();
        assert_eq!(score.points, 0);
    }

    #[test]
    fn test_score_total_is_not_recomputed() {
        let score: Score = "10.10.99".parse().unwrap();
        assert_eq!(score.points, 99);
    }

    #[test]
    fn test_malformed_score() {
        assert!("12.5".parse::<Score>().unwrap_err().is_format_error());
        assert!("abc".parse::<Score>().is_err());
        assert!("99999999999.1.1".parse::<Score>().is_err());
    }

    #[test]
    fn test_expand_builds_both_perspectives() {
        let rows = vec![game((2016, 3, 24), "R1", ("Carlton", "10.11.71"), ("Richmond", "15.14.104"), "M.C.G.")];
        let records = expand_games(rows).unwrap();

        assert_eq!(records.len(), 2);
        // sorted by team within the game key
        assert_eq!(records[0].team, "Carlton");
        assert_eq!(records[0].goals, 10);
        assert_eq!(records[0].behinds, 11);
        assert_eq!(records[0].points_for, 71);
        assert_eq!(records[0].points_against, 104);
        assert_eq!(records[1].team, "Richmond");
        assert_eq!(records[1].points_for, 104);
        assert_eq!(records[1].points_against, 71);
        assert_eq!(records[1].venue, "M.C.G.");
        assert_eq!(records[1].round, "R1");
    }

    #[test]
    fn test_expand_sorts_by_date_then_venue() {
        let rows = vec![
            game((2016, 3, 26), "R1", ("Sydney", "20.18.138"), ("Collingwood", "8.6.54"), "S.C.G."),
            game((2016, 3, 26), "R1", ("Adelaide", "11.14.80"), ("North Melbourne", "17.11.113"), "Adelaide Oval"),
            game((2016, 3, 24), "R1", ("Carlton", "10.11.71"), ("Richmond", "15.14.104"), "M.C.G."),
        ];
        let records = expand_games(rows).unwrap();
        let teams: Vec<&str> = records.iter().map(|r| r.team.as_str()).collect();

        assert_eq!(
            teams,
            vec!["Carlton", "Richmond", "Adelaide", "North Melbourne", "Collingwood", "Sydney"]
        );
    }

    #[test]
    fn test_expand_rejects_bad_score() {
        let rows = vec![game((2016, 3, 24), "R1", ("Carlton", "10.11"), ("Richmond", "15.14.104"), "M.C.G.")];
        assert!(expand_games(rows).unwrap_err().is_format_error());
    }
}
