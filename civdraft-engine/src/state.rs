//! Session state: players, draft configuration, and the edits a lobby applies.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::catalog::{Age, Attribute, Civilization, Leader};
use crate::config::DraftConfig;
use crate::constants::{
    MAX_PLAYERS, MIN_PLAYERS, MSG_LAST_AGE, MSG_NOT_ENOUGH_LEADERS, MSG_SELECT_LEADER_FIRST,
};
use crate::seed::{normalize_seed, seed_from_entropy};

/// Step of the drafting session. Only leaders and civs are implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DraftStep {
    #[default]
    Leaders,
    Civs,
    Souvenirs,
    Ages,
    Quests,
}

impl DraftStep {
    pub const ALL: [Self; 5] = [
        Self::Leaders,
        Self::Civs,
        Self::Souvenirs,
        Self::Ages,
        Self::Quests,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leaders => "leaders",
            Self::Civs => "civs",
            Self::Souvenirs => "souvenirs",
            Self::Ages => "ages",
            Self::Quests => "quests",
        }
    }

    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Leaders | Self::Civs)
    }
}

impl fmt::Display for DraftStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftStep {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or(())
    }
}

/// Reasons a generation or configuration edit is refused. Display yields the
/// exact banner string shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftRefusal {
    #[error("{}", MSG_NOT_ENOUGH_LEADERS)]
    InsufficientLeaders { needed: usize, available: usize },
    #[error("{}", MSG_SELECT_LEADER_FIRST)]
    MissingLeaderSelection,
    #[error("{}", MSG_LAST_AGE)]
    LastAgeSelected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default = "Player::default_has_all_dlc")]
    pub has_all_dlc: bool,
    #[serde(default)]
    pub owned_dlc: Vec<String>,
    #[serde(default)]
    pub forced_attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced_leader_id: Option<String>,
    #[serde(default)]
    pub forced_civ_by_age: BTreeMap<Age, String>,
    #[serde(default)]
    pub drafted_leaders: Vec<Leader>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_leader_id: Option<String>,
    #[serde(default)]
    pub drafted_civs_by_age: BTreeMap<Age, Vec<Civilization>>,
    #[serde(default)]
    pub selected_civ_by_age: BTreeMap<Age, String>,
}

impl Player {
    #[must_use]
    pub const fn default_has_all_dlc() -> bool {
        true
    }

    /// A fresh player with every DLC and nothing drafted.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            id: format!("p{index}"),
            name: format!("Player {index}"),
            has_all_dlc: true,
            owned_dlc: Vec::new(),
            forced_attributes: Vec::new(),
            forced_leader_id: None,
            forced_civ_by_age: BTreeMap::new(),
            drafted_leaders: Vec::new(),
            selected_leader_id: None,
            drafted_civs_by_age: BTreeMap::new(),
            selected_civ_by_age: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn drafted_civs(&self, age: Age) -> &[Civilization] {
        self.drafted_civs_by_age
            .get(&age)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Whole drafting session: seed, step, players and shared rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    #[serde(default)]
    pub seed: String,
    #[serde(default)]
    pub step: DraftStep,
    #[serde(default = "DraftState::default_players")]
    pub players: Vec<Player>,
    #[serde(default)]
    pub config: DraftConfig,
}

impl Default for DraftState {
    fn default() -> Self {
        Self {
            seed: String::new(),
            step: DraftStep::Leaders,
            players: Self::default_players(),
            config: DraftConfig::default(),
        }
    }
}

impl DraftState {
    #[must_use]
    pub fn default_players() -> Vec<Player> {
        vec![Player::new(1)]
    }

    #[must_use]
    pub fn new(seed: &str) -> Self {
        Self::default().with_seed(seed)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: &str) -> Self {
        self.set_seed(seed);
        self
    }

    #[must_use]
    pub fn with_players(mut self, count: usize) -> Self {
        self.players = (1..=count.clamp(MIN_PLAYERS, MAX_PLAYERS))
            .map(Player::new)
            .collect();
        self
    }

    pub fn set_seed(&mut self, seed: &str) {
        self.seed = normalize_seed(seed);
    }

    /// Replace the seed with one rendered from caller-supplied entropy.
    pub fn reroll_seed(&mut self, entropy: u64) {
        self.seed = seed_from_entropy(entropy);
    }

    #[must_use]
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    /// Apply a configuration edit to one player. Returns false when the id is unknown.
    pub fn update_player(&mut self, id: &str, edit: impl FnOnce(&mut Player)) -> bool {
        self.player_mut(id).map(edit).is_some()
    }

    /// Add a player unless the table is full. Returns the new player's id.
    pub fn add_player(&mut self) -> Option<String> {
        if self.players.len() >= MAX_PLAYERS {
            return None;
        }
        let index = (1..)
            .find(|idx| {
                let id = format!("p{idx}");
                self.players.iter().all(|player| player.id != id)
            })
            .unwrap_or(self.players.len() + 1);
        let player = Player::new(index);
        let id = player.id.clone();
        self.players.push(player);
        Some(id)
    }

    /// Remove a player, keeping at least one at the table.
    pub fn remove_player(&mut self, id: &str) -> bool {
        if self.players.len() <= MIN_PLAYERS {
            return false;
        }
        let before = self.players.len();
        self.players.retain(|player| player.id != id);
        self.players.len() != before
    }

    /// Toggle an age in the selection; the last remaining age cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns [`DraftRefusal::LastAgeSelected`] when removing the only selected age.
    pub fn toggle_age(&mut self, age: Age) -> Result<(), DraftRefusal> {
        let ages = &mut self.config.selected_ages;
        if ages.contains(&age) {
            if ages.len() == 1 {
                return Err(DraftRefusal::LastAgeSelected);
            }
            ages.retain(|selected| *selected != age);
        } else {
            ages.push(age);
        }
        Ok(())
    }

    /// Every player has a leader selected.
    #[must_use]
    pub fn has_leader_selection(&self) -> bool {
        self.players
            .iter()
            .all(|player| player.selected_leader_id.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_matches_fresh_session() {
        let state = DraftState::new(" abc ");
        assert_eq!(state.seed, "abc");
        assert_eq!(state.step, DraftStep::Leaders);
        assert_eq!(state.players.len(), 1);
        assert_eq!(state.players[0].name, "Player 1");
        assert!(state.players[0].has_all_dlc);
        assert_eq!(state.config.selected_ages, Age::ALL.to_vec());
    }

    #[test]
    fn add_player_caps_at_six_and_reuses_free_ids() {
        let mut state = DraftState::new("s");
        for _ in 0..10 {
            state.add_player();
        }
        assert_eq!(state.players.len(), MAX_PLAYERS);
        assert!(state.add_player().is_none());

        assert!(state.remove_player("p2"));
        assert_eq!(state.add_player().as_deref(), Some("p2"));
    }

    #[test]
    fn remove_player_keeps_last_one() {
        let mut state = DraftState::new("s");
        assert!(!state.remove_player("p1"));
        state.add_player();
        assert!(!state.remove_player("missing"));
        assert!(state.remove_player("p1"));
        assert_eq!(state.players.len(), 1);
        assert_eq!(state.players[0].id, "p2");
    }

    #[test]
    fn toggle_age_refuses_to_drop_last_age() {
        let mut state = DraftState::new("s");
        state.toggle_age(Age::Antiquity).unwrap();
        state.toggle_age(Age::Exploration).unwrap();
        let err = state.toggle_age(Age::Modern).unwrap_err();
        assert_eq!(err.to_string(), "At least one age must remain selected.");
        assert_eq!(state.config.selected_ages, vec![Age::Modern]);
        state.toggle_age(Age::Antiquity).unwrap();
        assert_eq!(state.config.selected_ages, vec![Age::Modern, Age::Antiquity]);
    }

    #[test]
    fn reroll_uses_entropy() {
        let mut state = DraftState::new("old");
        state.reroll_seed(36);
        assert_eq!(state.seed, "10");
    }

    #[test]
    fn update_player_reports_unknown_ids() {
        let mut state = DraftState::new("s");
        assert!(state.update_player("p1", |p| p.has_all_dlc = false));
        assert!(!state.players[0].has_all_dlc);
        assert!(!state.update_player("ghost", |p| p.has_all_dlc = true));
    }

    #[test]
    fn step_round_trips_through_str() {
        for step in DraftStep::ALL {
            assert_eq!(step.as_str().parse::<DraftStep>(), Ok(step));
        }
        assert!("unknown".parse::<DraftStep>().is_err());
        assert!(DraftStep::Civs.is_enabled());
        assert!(!DraftStep::Quests.is_enabled());
    }

    #[test]
    fn state_json_round_trip_keeps_age_maps() {
        let mut state = DraftState::new("json");
        state.players[0]
            .forced_civ_by_age
            .insert(Age::Modern, "c30".to_string());
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"Modern\":\"c30\""));
        let back: DraftState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn refusal_messages_are_exact() {
        assert_eq!(
            DraftRefusal::InsufficientLeaders {
                needed: 40,
                available: 32
            }
            .to_string(),
            "Not enough leaders to satisfy the no-duplicate rule."
        );
        assert_eq!(
            DraftRefusal::MissingLeaderSelection.to_string(),
            "Select a leader for every player before matching civilizations."
        );
    }
}
