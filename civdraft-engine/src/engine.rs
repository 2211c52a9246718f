//! Draft orchestration: leader generation, then civilization generation per age.
//!
//! Both phases reseed from the stored seed string on every call, so repeating
//! a call with an unchanged state replays the identical assignment.
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::allocator::{DuplicatePolicy, allocate};
use crate::catalog::{Age, Attribute, Catalog, Civilization, DraftEntity, Leader};
use crate::constants::{MSG_CIVS_GENERATED, MSG_LEADERS_GENERATED};
use crate::eligibility::{
    civs_for_player, entry_open_to, leaders_for_player, pool_for_all_players,
};
use crate::narrowing::{
    PivotAttributes, affinity_filter, apply_pivot, choose_pivot_attributes,
    filter_by_forced_attributes,
};
use crate::rng::DraftRng;
use crate::state::{DraftRefusal, DraftState, DraftStep, Player};

/// Result of a generation call, rendered verbatim as a status banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftStatus {
    LeadersGenerated,
    CivsGenerated,
    Refused(DraftRefusal),
}

impl DraftStatus {
    #[must_use]
    pub const fn is_refused(&self) -> bool {
        matches!(self, Self::Refused(_))
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeadersGenerated => f.write_str(MSG_LEADERS_GENERATED),
            Self::CivsGenerated => f.write_str(MSG_CIVS_GENERATED),
            Self::Refused(reason) => write!(f, "{reason}"),
        }
    }
}

/// New session state plus the status describing how it was produced.
/// A refused call hands back the input state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftOutcome {
    pub state: DraftState,
    pub status: DraftStatus,
}

impl DraftOutcome {
    fn refused(state: &DraftState, reason: DraftRefusal) -> Self {
        warn!("draft refused: {reason}");
        Self {
            state: state.clone(),
            status: DraftStatus::Refused(reason),
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.status.message()
    }
}

fn combined_forced_attributes(global: &[Attribute], player: &Player) -> Vec<Attribute> {
    global
        .iter()
        .chain(player.forced_attributes.iter())
        .cloned()
        .collect()
}

fn forced_leader<'a>(
    catalog: &'a Catalog,
    player: &Player,
    banned: &[String],
) -> Option<&'a Leader> {
    player
        .forced_leader_id
        .as_deref()
        .and_then(|id| catalog.leader(id))
        .filter(|leader| entry_open_to(player, *leader, banned))
}

fn forced_civ<'a>(
    catalog: &'a Catalog,
    player: &Player,
    banned: &[String],
    age: Age,
) -> Option<&'a Civilization> {
    player
        .forced_civ_by_age
        .get(&age)
        .and_then(|id| catalog.civ(id))
        .filter(|civ| civ.age == age && entry_open_to(player, *civ, banned))
}

/// Claim every player's forced id in `used_ids` before any random draw, so an
/// earlier player's bag can never consume a later player's forced pick.
///
/// Two players forcing the same id is a genuine conflict: the earlier player
/// keeps it and the later player's forced pick is dropped.
fn reserve_forced<'a, T: DraftEntity>(
    forced: Vec<Option<&'a T>>,
    used_ids: &mut HashSet<String>,
) -> Vec<Option<&'a T>> {
    forced
        .into_iter()
        .map(|entry| entry.filter(|entry| used_ids.insert(entry.id().to_string())))
        .collect()
}

/// Hand a player's own reservation back so [`allocate`] places it first.
fn release_own<T: DraftEntity>(forced: Option<&T>, used_ids: &mut HashSet<String>) {
    if let Some(entry) = forced {
        used_ids.remove(entry.id());
    }
}

/// Draft leaders for every player.
///
/// Without duplicates, refuses when the pool every player can access is
/// smaller than `players × per_player`. On success the session moves to the
/// civilization step.
#[must_use]
pub fn generate_leaders(
    state: &DraftState,
    catalog: &Catalog,
    attributes: &[Attribute],
) -> DraftOutcome {
    let rules = &state.config.leaders;
    if !rules.allow_duplicates {
        let available =
            pool_for_all_players(&state.players, &catalog.leaders, &rules.banned_ids).len();
        let needed = state.players.len().saturating_mul(rules.per_player);
        if available < needed {
            return DraftOutcome::refused(
                state,
                DraftRefusal::InsufficientLeaders { needed, available },
            );
        }
    }

    let mut rng = DraftRng::from_seed_str(&state.seed);
    let policy = DuplicatePolicy::from_allow(rules.allow_duplicates);
    let pivot = if rules.homogenous {
        choose_pivot_attributes(attributes, &mut rng)
    } else {
        PivotAttributes::new()
    };
    debug!("leader pivot for seed {:?}: {pivot:?}", state.seed);

    let mut used_ids: HashSet<String> = HashSet::new();
    let mut forced_by_player: Vec<Option<&Leader>> = state
        .players
        .iter()
        .map(|player| forced_leader(catalog, player, &rules.banned_ids))
        .collect();
    if policy.is_unique() {
        forced_by_player = reserve_forced(forced_by_player, &mut used_ids);
    }

    let mut players = Vec::with_capacity(state.players.len());
    for (player, forced) in state.players.iter().zip(forced_by_player) {
        if policy.is_unique() {
            release_own(forced, &mut used_ids);
        }
        let wanted = combined_forced_attributes(&rules.forced_attributes, player);
        let base = leaders_for_player(player, catalog, &rules.banned_ids);
        let pool = apply_pivot(filter_by_forced_attributes(base, &wanted), &pivot);
        let drafted = allocate(
            &pool,
            rules.per_player,
            forced,
            policy,
            &mut used_ids,
            &mut rng,
        );
        debug!(
            "player {} leader pool {} -> drafted {}",
            player.id,
            pool.len(),
            drafted.len()
        );

        let mut next = player.clone();
        if let Some(leader) = forced
            && drafted.first().is_some_and(|first| first.id == leader.id)
        {
            next.selected_leader_id = Some(leader.id.clone());
        }
        next.drafted_leaders = drafted;
        players.push(next);
    }

    info!(
        "generated leaders for {} players (seed {:?})",
        players.len(),
        state.seed
    );
    DraftOutcome {
        state: DraftState {
            players,
            step: DraftStep::Civs,
            ..state.clone()
        },
        status: DraftStatus::LeadersGenerated,
    }
}

/// Draft civilizations for every player and every selected age.
///
/// With an affinity mode active, refuses until every player has a selected
/// leader. Duplicate tracking and pivots are scoped per age.
#[must_use]
pub fn generate_civs(
    state: &DraftState,
    catalog: &Catalog,
    attributes: &[Attribute],
) -> DraftOutcome {
    let rules = &state.config.civs;
    if rules.affinity.requires_leader() && !state.has_leader_selection() {
        return DraftOutcome::refused(state, DraftRefusal::MissingLeaderSelection);
    }

    let ages = &state.config.selected_ages;
    let mut rng = DraftRng::from_seed_str(&state.seed);
    let policy = DuplicatePolicy::from_allow(rules.allow_duplicates);

    let mut pivot_by_age: BTreeMap<Age, PivotAttributes> = BTreeMap::new();
    if rules.homogenous {
        for &age in ages {
            pivot_by_age.insert(age, choose_pivot_attributes(attributes, &mut rng));
        }
        debug!("civ pivots for seed {:?}: {pivot_by_age:?}", state.seed);
    }

    let mut used_by_age: HashMap<Age, HashSet<String>> = HashMap::new();
    let mut forced_by_age: HashMap<Age, Vec<Option<&Civilization>>> = HashMap::new();
    for &age in ages {
        if forced_by_age.contains_key(&age) {
            continue;
        }
        let mut forced: Vec<Option<&Civilization>> = state
            .players
            .iter()
            .map(|player| forced_civ(catalog, player, &rules.banned_ids, age))
            .collect();
        if policy.is_unique() {
            forced = reserve_forced(forced, used_by_age.entry(age).or_default());
        }
        forced_by_age.insert(age, forced);
    }

    let mut players = Vec::with_capacity(state.players.len());
    for (index, player) in state.players.iter().enumerate() {
        let leader = player
            .selected_leader_id
            .as_deref()
            .and_then(|id| catalog.leader(id));
        let wanted = combined_forced_attributes(&rules.forced_attributes, player);
        let mut next = player.clone();

        for &age in ages {
            let forced = forced_by_age
                .get(&age)
                .and_then(|claims| claims.get(index).copied().flatten());
            let base = civs_for_player(player, catalog, &rules.banned_ids, age);
            let base = affinity_filter(base, leader, rules.affinity);
            let pivot = pivot_by_age
                .get(&age)
                .map(|pivot| pivot.as_slice())
                .unwrap_or(&[]);
            let pool = apply_pivot(filter_by_forced_attributes(base, &wanted), pivot);
            let used_ids = used_by_age.entry(age).or_default();
            if policy.is_unique() {
                release_own(forced, used_ids);
            }
            let drafted = allocate(
                &pool,
                rules.per_player_per_age,
                forced,
                policy,
                used_ids,
                &mut rng,
            );
            debug!(
                "player {} {age} civ pool {} -> drafted {}",
                player.id,
                pool.len(),
                drafted.len()
            );

            if let Some(civ) = forced
                && drafted.first().is_some_and(|first| first.id == civ.id)
            {
                next.selected_civ_by_age.insert(age, civ.id.clone());
            }
            next.drafted_civs_by_age.insert(age, drafted);
        }
        players.push(next);
    }

    info!(
        "generated civilizations for {} players across {} ages (seed {:?})",
        players.len(),
        ages.len(),
        state.seed
    );
    DraftOutcome {
        state: DraftState {
            players,
            ..state.clone()
        },
        status: DraftStatus::CivsGenerated,
    }
}
