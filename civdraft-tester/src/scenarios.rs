use anyhow::{Result, bail, ensure};
use civdraft_engine::constants::MAX_PLAYERS;
use civdraft_engine::narrowing::matches_strict;
use civdraft_engine::{
    AffinityMode, Age, DraftRefusal, DraftState, DraftStatus, DraftStep, hash_seed,
};
use std::collections::HashSet;

use crate::draft::{Engine, draft_fingerprint};

/// Property check run once per (seed, iteration) pair.
pub type ScenarioCheck = fn(&Engine, &str) -> Result<()>;

#[derive(Clone, Copy)]
pub struct DraftScenario {
    pub key: &'static str,
    pub description: &'static str,
    pub check: ScenarioCheck,
}

pub fn all_scenarios() -> Vec<DraftScenario> {
    vec![
        DraftScenario {
            key: "smoke",
            description: "Leaders then civs succeed with full counts",
            check: smoke,
        },
        DraftScenario {
            key: "determinism",
            description: "Same seed and state replay the identical draft",
            check: determinism,
        },
        DraftScenario {
            key: "no-duplicates",
            description: "Unique mode never shares an id between players",
            check: no_duplicates,
        },
        DraftScenario {
            key: "bans",
            description: "Banned leaders and civs never get drafted",
            check: bans,
        },
        DraftScenario {
            key: "forced-picks",
            description: "Forced leader and civ lead their lists and become selections",
            check: forced_picks,
        },
        DraftScenario {
            key: "affinity",
            description: "Strict affinity gates on selections and keeps matching civs",
            check: affinity,
        },
        DraftScenario {
            key: "refusal",
            description: "Oversized unique leader draft is refused without changes",
            check: refusal,
        },
    ]
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    all_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

pub fn find_scenario(key: &str) -> Option<DraftScenario> {
    all_scenarios()
        .into_iter()
        .find(|scenario| scenario.key.eq_ignore_ascii_case(key))
}

/// Expand `all` into every registered scenario key.
pub fn expand_scenarios(names: Vec<String>) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for name in names {
        if name.eq_ignore_ascii_case("all") {
            expanded.extend(all_scenarios().iter().map(|s| s.key.to_string()));
        } else {
            expanded.push(name);
        }
    }
    let mut seen = HashSet::new();
    expanded.retain(|name| seen.insert(name.clone()));
    expanded
}

/// Session whose table size varies with the seed, so sweeps cover 1..=6 players.
fn session_for(seed: &str) -> DraftState {
    let players = usize::try_from(hash_seed(seed)).unwrap_or(0) % MAX_PLAYERS + 1;
    DraftState::new(seed).with_players(players)
}

fn smoke(engine: &Engine, seed: &str) -> Result<()> {
    let state = session_for(seed);
    let leaders = engine.generate_leaders(&state);
    ensure!(
        leaders.status == DraftStatus::LeadersGenerated,
        "leader generation refused: {}",
        leaders.message()
    );
    ensure!(leaders.state.step == DraftStep::Civs, "step did not advance");

    let civs = engine.generate_civs(&leaders.state);
    ensure!(
        civs.status == DraftStatus::CivsGenerated,
        "civ generation refused: {}",
        civs.message()
    );
    for player in &civs.state.players {
        ensure!(
            player.drafted_leaders.len() == state.config.leaders.per_player,
            "{} drafted {} leaders",
            player.name,
            player.drafted_leaders.len()
        );
        for age in Age::ALL {
            let count = player.drafted_civs(age).len();
            ensure!(
                count == state.config.civs.per_player_per_age,
                "{} drafted {count} civs in {age}",
                player.name
            );
        }
    }
    Ok(())
}

fn determinism(engine: &Engine, seed: &str) -> Result<()> {
    let mut state = session_for(seed);
    state.config.leaders.homogenous = true;
    state.config.civs.homogenous = true;
    let run = || {
        let leaders = engine.generate_leaders(&state);
        engine.generate_civs(&leaders.state).state
    };
    let first = run();
    let second = run();
    ensure!(first == second, "replay diverged");
    ensure!(
        draft_fingerprint(&first)? == draft_fingerprint(&second)?,
        "fingerprints diverged"
    );
    Ok(())
}

fn no_duplicates(engine: &Engine, seed: &str) -> Result<()> {
    let state = session_for(seed);
    let leaders = engine.generate_leaders(&state);
    let civs = engine.generate_civs(&leaders.state);

    let mut seen = HashSet::new();
    for player in &civs.state.players {
        for leader in &player.drafted_leaders {
            if !seen.insert(leader.id.as_str()) {
                bail!("leader {} assigned twice", leader.id);
            }
        }
    }
    for age in Age::ALL {
        let mut seen = HashSet::new();
        for player in &civs.state.players {
            for civ in player.drafted_civs(age) {
                if !seen.insert(civ.id.as_str()) {
                    bail!("civ {} assigned twice in {age}", civ.id);
                }
            }
        }
    }
    Ok(())
}

fn bans(engine: &Engine, seed: &str) -> Result<()> {
    let baseline = engine.generate_civs(&engine.generate_leaders(&session_for(seed)).state);
    let Some(first) = baseline.state.players.first() else {
        bail!("session has no players");
    };

    let mut state = session_for(seed);
    state.config.leaders.banned_ids = first
        .drafted_leaders
        .iter()
        .map(|leader| leader.id.clone())
        .collect();
    state.config.civs.banned_ids = first
        .drafted_civs_by_age
        .values()
        .flatten()
        .map(|civ| civ.id.clone())
        .collect();

    let leaders = engine.generate_leaders(&state);
    if leaders.status.is_refused() {
        // Bans can shrink the pool below the table's demand.
        return Ok(());
    }
    let civs = engine.generate_civs(&leaders.state);
    for player in &civs.state.players {
        if let Some(leader) = player
            .drafted_leaders
            .iter()
            .find(|leader| state.config.leaders.banned_ids.contains(&leader.id))
        {
            bail!("banned leader {} drafted for {}", leader.id, player.name);
        }
        if let Some(civ) = player
            .drafted_civs_by_age
            .values()
            .flatten()
            .find(|civ| state.config.civs.banned_ids.contains(&civ.id))
        {
            bail!("banned civ {} drafted for {}", civ.id, player.name);
        }
    }
    Ok(())
}

fn forced_picks(engine: &Engine, seed: &str) -> Result<()> {
    let catalog = engine.catalog();
    let mut state = session_for(seed);
    let pick = usize::try_from(hash_seed(seed)).unwrap_or(0);
    let Some(leader) = catalog.leaders.get(pick % catalog.leaders.len().max(1)) else {
        bail!("catalog has no leaders");
    };
    let modern: Vec<_> = catalog.civs_for_age(Age::Modern).collect();
    let Some(civ) = modern.get(pick % modern.len().max(1)) else {
        bail!("catalog has no modern civilizations");
    };

    let Some(target) = state.players.last_mut() else {
        bail!("session has no players");
    };
    target.forced_leader_id = Some(leader.id.clone());
    target.forced_civ_by_age.insert(Age::Modern, civ.id.clone());

    let leaders = engine.generate_leaders(&state);
    let civs = engine.generate_civs(&leaders.state);
    let Some(player) = civs.state.players.last() else {
        bail!("session lost its players");
    };
    ensure!(
        player.drafted_leaders.first().map(|l| l.id.as_str()) == Some(leader.id.as_str()),
        "forced leader {} not first",
        leader.id
    );
    ensure!(
        player.selected_leader_id.as_deref() == Some(leader.id.as_str()),
        "forced leader {} not selected",
        leader.id
    );
    ensure!(
        player.drafted_civs(Age::Modern).first().map(|c| c.id.as_str()) == Some(civ.id.as_str()),
        "forced civ {} not first",
        civ.id
    );
    ensure!(
        player.selected_civ_by_age.get(&Age::Modern) == Some(&civ.id),
        "forced civ {} not selected",
        civ.id
    );
    Ok(())
}

fn affinity(engine: &Engine, seed: &str) -> Result<()> {
    let mut state = session_for(seed);
    state.config.civs.affinity = AffinityMode::Strict;
    let refused = engine.generate_civs(&state);
    ensure!(
        refused.status == DraftStatus::Refused(DraftRefusal::MissingLeaderSelection),
        "expected a missing-selection refusal, got {}",
        refused.message()
    );
    ensure!(refused.state == state, "refusal changed the session");

    let mut picked = engine.generate_leaders(&state).state;
    for player in &mut picked.players {
        player.selected_leader_id = player.drafted_leaders.first().map(|l| l.id.clone());
    }
    let civs = engine.generate_civs(&picked);
    ensure!(
        civs.status == DraftStatus::CivsGenerated,
        "civ generation refused: {}",
        civs.message()
    );
    for player in &civs.state.players {
        let Some(leader) = player
            .selected_leader_id
            .as_deref()
            .and_then(|id| engine.catalog().leader(id))
        else {
            bail!("{} lost its selected leader", player.name);
        };
        if let Some(civ) = player
            .drafted_civs_by_age
            .values()
            .flatten()
            .find(|civ| !matches_strict(leader, civ))
        {
            bail!("{} does not match leader {}", civ.name, leader.name);
        }
    }
    Ok(())
}

fn refusal(engine: &Engine, seed: &str) -> Result<()> {
    let mut state = session_for(seed);
    let players = state.players.len();
    state.config.leaders.per_player = engine.catalog().leaders.len() / players + 1;
    let outcome = engine.generate_leaders(&state);
    ensure!(
        matches!(
            outcome.status,
            DraftStatus::Refused(DraftRefusal::InsufficientLeaders { .. })
        ),
        "expected refusal, got {}",
        outcome.message()
    );
    ensure!(outcome.state == state, "refusal changed the session");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_passes_on_sample_seeds() {
        let engine = Engine::builtin().unwrap();
        for scenario in all_scenarios() {
            for seed in ["abc", "1337", "k3y", "é-seed"] {
                (scenario.check)(&engine, seed)
                    .unwrap_or_else(|err| panic!("{} failed on {seed}: {err:#}", scenario.key));
            }
        }
    }

    #[test]
    fn expand_all_lists_every_key_once() {
        let expanded = expand_scenarios(vec!["smoke".to_string(), "all".to_string()]);
        assert_eq!(expanded.len(), all_scenarios().len());
        assert_eq!(expanded[0], "smoke");
    }

    #[test]
    fn find_scenario_ignores_case() {
        assert!(find_scenario("SMOKE").is_some());
        assert!(find_scenario("missing").is_none());
    }

    #[test]
    fn session_size_stays_in_bounds() {
        for i in 0..50 {
            let players = session_for(&i.to_string()).players.len();
            assert!((1..=MAX_PLAYERS).contains(&players));
        }
    }
}
