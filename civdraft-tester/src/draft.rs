use anyhow::{Context, Result};
use civdraft_engine::{
    BuiltinCatalog, CivDraftSummary, DraftEngine, DraftState, LeaderDraftSummary,
};
use serde::Serialize;
use std::hash::Hasher;
use std::path::Path;
use twox_hash::XxHash64;

pub type Engine = DraftEngine<BuiltinCatalog>;

/// One full leaders-then-civs run for a seed, as shown by `--mode draft`.
#[derive(Debug, Clone, Serialize)]
pub struct DraftPreview {
    pub seed: String,
    pub leaders_status: String,
    pub civs_status: String,
    pub fingerprint: String,
    pub leader_summary: LeaderDraftSummary,
    pub civ_summary: CivDraftSummary,
    pub state: DraftState,
}

/// Stable digest of every player's assignment, for comparing replays by eye.
///
/// # Errors
///
/// Returns an error if the players cannot be serialized.
pub fn draft_fingerprint(state: &DraftState) -> Result<u64> {
    let bytes = serde_json::to_vec(&state.players).context("serializing players")?;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    Ok(hasher.finish())
}

/// Load a session template from a JSON document; missing fields take defaults.
pub fn load_template(path: &Path) -> Result<DraftState> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Run both generation phases from `template` reseeded with `seed`.
pub fn preview(engine: &Engine, template: &DraftState, seed: &str) -> Result<DraftPreview> {
    let start = template.clone().with_seed(seed);
    let leaders = engine.generate_leaders(&start);
    let civs = engine.generate_civs(&leaders.state);
    log::debug!(
        "seed {seed}: {} / {}",
        leaders.status.message(),
        civs.status.message()
    );
    let state = civs.state;
    Ok(DraftPreview {
        seed: state.seed.clone(),
        leaders_status: leaders.status.message(),
        civs_status: civs.status.message(),
        fingerprint: format!("{:016x}", draft_fingerprint(&state)?),
        leader_summary: LeaderDraftSummary::from_state(&state),
        civ_summary: CivDraftSummary::from_state(&state),
        state,
    })
}
