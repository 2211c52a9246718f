//! Derived session facts a front end shows next to the draft controls.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{Age, Catalog, Civilization, Leader};
use crate::constants::{DUPLICATE_COUNT_CAP, MAX_PLAYERS};
use crate::eligibility::pool_for_all_players;
use crate::state::DraftState;

#[must_use]
pub fn leader_pool_for_all_players(state: &DraftState, catalog: &Catalog) -> Vec<Leader> {
    pool_for_all_players(
        &state.players,
        &catalog.leaders,
        &state.config.leaders.banned_ids,
    )
}

/// Jointly accessible civilizations for each selected age.
#[must_use]
pub fn civ_pool_for_all_players_by_age(
    state: &DraftState,
    catalog: &Catalog,
) -> BTreeMap<Age, Vec<Civilization>> {
    state
        .config
        .selected_ages
        .iter()
        .map(|&age| {
            let pool = pool_for_all_players(
                &state.players,
                catalog.civs_for_age(age),
                &state.config.civs.banned_ids,
            );
            (age, pool)
        })
        .collect()
}

/// Upper bound for the leaders-per-player control.
#[must_use]
pub fn leader_max(state: &DraftState, pool: &[Leader]) -> usize {
    let players = state.players.len();
    if players == 0 {
        return 1;
    }
    if state.config.leaders.allow_duplicates {
        DUPLICATE_COUNT_CAP.min(pool.len())
    } else {
        pool.len() / players
    }
}

/// Upper bound for the civs-per-age control, driven by the scarcest selected age.
#[must_use]
pub fn civ_max(state: &DraftState, by_age: &BTreeMap<Age, Vec<Civilization>>) -> usize {
    let Some(smallest) = state
        .config
        .selected_ages
        .iter()
        .map(|age| by_age.get(age).map_or(0, Vec::len))
        .min()
    else {
        return 1;
    };
    if state.config.civs.allow_duplicates {
        return DUPLICATE_COUNT_CAP.min(smallest);
    }
    match state.players.len() {
        0 => 1,
        players => smallest / players,
    }
}

#[must_use]
pub fn leader_generate_disabled(state: &DraftState, pool: &[Leader]) -> bool {
    let rules = &state.config.leaders;
    state.players.len() > MAX_PLAYERS
        || rules.per_player < 1
        || (!rules.allow_duplicates
            && pool.len() < state.players.len().saturating_mul(rules.per_player))
}

#[must_use]
pub fn civ_generate_disabled(state: &DraftState) -> bool {
    let rules = &state.config.civs;
    state.config.selected_ages.is_empty()
        || rules.per_player_per_age < 1
        || (rules.affinity.requires_leader() && !state.has_leader_selection())
}

const fn on_off(flag: bool) -> &'static str {
    if flag { "On" } else { "Off" }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderDraftSummary {
    pub players: usize,
    pub leaders_per_player: usize,
    pub duplicates: String,
    pub banned_count: usize,
}

impl LeaderDraftSummary {
    #[must_use]
    pub fn from_state(state: &DraftState) -> Self {
        let rules = &state.config.leaders;
        Self {
            players: state.players.len(),
            leaders_per_player: rules.per_player,
            duplicates: on_off(rules.allow_duplicates).to_string(),
            banned_count: rules.banned_ids.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivDraftSummary {
    /// Selected ages joined with ", ", or "None".
    pub ages: String,
    pub civs_per_age: usize,
    pub duplicates: String,
    pub banned_count: usize,
}

impl CivDraftSummary {
    #[must_use]
    pub fn from_state(state: &DraftState) -> Self {
        let rules = &state.config.civs;
        let ages = state
            .config
            .selected_ages
            .iter()
            .map(|age| age.label())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            ages: if ages.is_empty() { "None".to_string() } else { ages },
            civs_per_age: rules.per_player_per_age,
            duplicates: on_off(rules.allow_duplicates).to_string(),
            banned_count: rules.banned_ids.len(),
        }
    }
}
