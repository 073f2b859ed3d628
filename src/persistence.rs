//! Save/restore of a running session
//!
//! Snapshots are a versioned JSON envelope around the full `GameState`.
//! Restoring re-runs level validation so a hand-edited save can't smuggle in
//! a patroller pointing at a missing platform.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::LevelDataError;
use crate::sim::state::GameState;

/// Bumped whenever the snapshot layout changes incompatibly
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot version {found} not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("snapshot holds an invalid level: {0}")]
    InvalidState(#[from] LevelDataError),
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    state: GameState,
}

/// Only the version, so a newer save fails with a clear error instead of a
/// field mismatch
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Serialize the session to JSON
pub fn save_snapshot(state: &GameState) -> Result<String, SnapshotError> {
    let json = serde_json::to_string(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        state,
    })?;
    log::info!(
        "Saved snapshot: level {} {:?}, tick {} ({} bytes)",
        state.level_index,
        state.phase,
        state.time_ticks,
        json.len()
    );
    Ok(json)
}

/// Rebuild a session from `save_snapshot` output
///
/// The restored state resumes ticking exactly where the saved one left off.
pub fn restore_snapshot(json: &str) -> Result<GameState, SnapshotError> {
    let probe: VersionProbe = serde_json::from_str(json)?;
    if probe.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: probe.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    let snapshot: Snapshot = serde_json::from_str(json)?;
    snapshot.state.validate()?;
    log::info!(
        "Restored snapshot: level {} {:?}, tick {}",
        snapshot.state.level_index,
        snapshot.state.phase,
        snapshot.state.time_ticks
    );
    Ok(snapshot.state)
}
