//! Season standings from team-perspective game records.
//!
//! Teams are ranked by competition points (4 per win, 2 per draw) and then
//! by percentage (100 x points for / points against). Teams level on both
//! keep the order in which they were grouped, which is ascending team name;
//! they get consecutive positions, not shared ones.

use crate::domain::model::{
    Ladder, LadderEntry, PercentagePolicy, RoundRange, TeamGameRecord,
};
use crate::utils::error::{EtlError, Result};
use chrono::Datelike;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const POINTS_PER_WIN: u32 = 4;
pub const POINTS_PER_DRAW: u32 = 2;

#[derive(Debug, Default)]
struct Totals {
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    // u64: a season of u32 scores can exceed u32
    goals: u64,
    behinds: u64,
    points_for: u64,
    points_against: u64,
}

impl Totals {
    fn add(&mut self, record: &TeamGameRecord) {
        let outcome = record.outcome();
        self.played += outcome.played;
        self.won += outcome.won;
        self.drawn += outcome.drawn;
        self.lost += outcome.lost;
        self.goals += u64::from(record.goals);
        self.behinds += u64::from(record.behinds);
        self.points_for += u64::from(record.points_for);
        self.points_against += u64::from(record.points_against);
    }

    fn into_entry(self, team: &str) -> LadderEntry {
        LadderEntry {
            position: 0,
            team: team.to_string(),
            played: self.played,
            won: self.won,
            drawn: self.drawn,
            lost: self.lost,
            goals: self.goals,
            behinds: self.behinds,
            points_for: self.points_for,
            points_against: self.points_against,
            // f64 division: no points against gives inf, or NaN at 0/0
            percentage: 100.0 * self.points_for as f64 / self.points_against as f64,
            points: POINTS_PER_WIN * self.won + POINTS_PER_DRAW * self.drawn,
        }
    }
}

pub fn in_scope(record: &TeamGameRecord, season: i32, rounds: &RoundRange) -> bool {
    record.date.year() == season && rounds.contains(&record.round)
}

/// Descending, with NaN after every number.
fn compare_percentage_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

pub fn rank_order(a: &LadderEntry, b: &LadderEntry) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| compare_percentage_desc(a.percentage, b.percentage))
}

pub fn compute_ladder(records: &[TeamGameRecord], season: i32, rounds: &RoundRange) -> Vec<LadderEntry> {
    let mut totals: BTreeMap<&str, Totals> = BTreeMap::new();
    for record in records.iter().filter(|r| in_scope(r, season, rounds)) {
        totals.entry(record.team.as_str()).or_default().add(record);
    }

    let mut entries: Vec<LadderEntry> = totals
        .into_iter()
        .map(|(team, totals)| totals.into_entry(team))
        .collect();

    // stable: exact ties stay in team-name order
    entries.sort_by(rank_order);
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.position = index + 1;
    }

    tracing::debug!(
        "Ranked {} teams for season {} rounds {}",
        entries.len(),
        season,
        rounds
    );
    entries
}

pub fn build_ladder(records: &[TeamGameRecord], season: i32, rounds: RoundRange) -> Ladder {
    let entries = compute_ladder(records, season, &rounds);
    Ladder {
        season,
        rounds,
        entries,
    }
}

/// Applies the percentage policy to a finished ladder.
pub fn check_percentages(ladder: &Ladder, policy: PercentagePolicy) -> Result<()> {
    for entry in ladder.entries.iter().filter(|e| !e.has_defined_percentage()) {
        match policy {
            PercentagePolicy::Propagate => {
                tracing::warn!(
                    "⚠️ {} has no points against in {}; percentage is {}",
                    entry.team,
                    ladder.season,
                    entry.percentage
                );
            }
            PercentagePolicy::Reject => {
                return Err(EtlError::DivisionUndefined {
                    team: entry.team.clone(),
                });
            }
        }
    }
    Ok(())
}
