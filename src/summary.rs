//! End-of-round summary
//!
//! Built once player 2's turn is over and shown until the player dismisses it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_COUNT;
use crate::sim::state::{GamePhase, GameState, PlayerStats};

/// Who won the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Player1Wins,
    Player2Wins,
    Tie,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MatchOutcome::Player1Wins => "Player 1 wins",
            MatchOutcome::Player2Wins => "Player 2 wins",
            MatchOutcome::Tie => "Tie",
        };
        f.write_str(text)
    }
}

/// Compare both players' final numbers
///
/// A player left with no health loses to a surviving opponent regardless of
/// score. Otherwise the higher score wins, then the faster time.
pub fn decide_winner(p1: &PlayerStats, p2: &PlayerStats) -> MatchOutcome {
    match (p1.health > 0, p2.health > 0) {
        (true, false) => return MatchOutcome::Player1Wins,
        (false, true) => return MatchOutcome::Player2Wins,
        _ => {}
    }

    if p1.score != p2.score {
        return if p1.score > p2.score {
            MatchOutcome::Player1Wins
        } else {
            MatchOutcome::Player2Wins
        };
    }

    if p1.time < p2.time {
        MatchOutcome::Player1Wins
    } else if p2.time < p1.time {
        MatchOutcome::Player2Wins
    } else {
        MatchOutcome::Tie
    }
}

/// What the summary screen shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub level_index: usize,
    pub level_name: String,
    pub players: [PlayerStats; PLAYER_COUNT],
    pub outcome: MatchOutcome,
}

impl RoundSummary {
    /// Summary of a finished round, or None while a round is still running
    pub fn from_state(state: &GameState) -> Option<Self> {
        if state.phase != GamePhase::RoundSummary {
            return None;
        }
        let players = [state.shooters[0].stats(), state.shooters[1].stats()];
        Some(Self {
            level_index: state.level_index,
            level_name: state.level.name.clone(),
            outcome: decide_winner(&players[0], &players[1]),
            players,
        })
    }
}
