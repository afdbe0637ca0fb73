use crate::core::expander::expand_games;
use crate::core::ladder::{build_ladder, check_percentages};
use crate::core::parser::parse_games;
use crate::domain::model::{DataLayout, PercentagePolicy, RoundRange, TransformResult};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};

pub const DEFAULT_SEASON: i32 = 2016;

/// Everything the three stages need besides the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderRequest {
    pub layout: DataLayout,
    pub season: i32,
    pub rounds: RoundRange,
    pub policy: PercentagePolicy,
}

impl LadderRequest {
    pub fn new(season: i32) -> Self {
        Self {
            layout: DataLayout::Games,
            season,
            rounds: RoundRange::default(),
            policy: PercentagePolicy::default(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let layout = match config.layout() {
            Some(layout) => layout,
            None => DataLayout::from_name(config.input_name())?,
        };

        Ok(Self {
            layout,
            season: config.season(),
            rounds: config.round_range(),
            policy: config.percentage_policy(),
        })
    }
}

impl Default for LadderRequest {
    fn default() -> Self {
        Self::new(DEFAULT_SEASON)
    }
}

/// Parse, expand and rank. Any malformed line aborts before aggregation.
pub fn run_stages(raw: &str, request: &LadderRequest) -> Result<TransformResult> {
    if request.layout != DataLayout::Games {
        return Err(EtlError::format(format!(
            "the {} layout has no round labels and cannot produce a ladder",
            request.layout
        )));
    }

    let games = parse_games(raw).collect::<Result<Vec<_>>>()?;
    let game_count = games.len();

    let team_records = expand_games(games)?;
    let ladder = build_ladder(&team_records, request.season, request.rounds.clone());
    check_percentages(&ladder, request.policy)?;

    tracing::info!(
        "🏉 {} games -> {} team records -> {} ladder entries for {} ({})",
        game_count,
        team_records.len(),
        ladder.len(),
        request.season,
        request.rounds
    );

    Ok(TransformResult {
        game_count,
        team_records,
        ladder,
    })
}
