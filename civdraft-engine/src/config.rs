//! Session parameters shared by every player in a draft.
use serde::{Deserialize, Serialize};

use crate::catalog::{Age, Attribute};
use crate::constants::{DEFAULT_CIVS_PER_AGE, DEFAULT_LEADERS_PER_PLAYER};

/// Leader↔civilization attribute-overlap policy applied during civ generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffinityMode {
    /// Civilizations are not filtered by the selected leader.
    #[default]
    None,
    /// Majority overlap: shared count ≥ min(2, leader attribute count).
    Strict,
    /// Any single shared attribute.
    Loose,
}

impl AffinityMode {
    /// Affinity modes need every player to have picked a leader first.
    #[must_use]
    pub const fn requires_leader(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderRules {
    #[serde(default = "LeaderRules::default_per_player")]
    pub per_player: usize,
    #[serde(default)]
    pub allow_duplicates: bool,
    /// Bias the whole run toward one or two shared pivot attributes.
    #[serde(default)]
    pub homogenous: bool,
    #[serde(default)]
    pub forced_attributes: Vec<Attribute>,
    #[serde(default)]
    pub banned_ids: Vec<String>,
}

impl LeaderRules {
    #[must_use]
    pub const fn default_per_player() -> usize {
        DEFAULT_LEADERS_PER_PLAYER
    }
}

impl Default for LeaderRules {
    fn default() -> Self {
        Self {
            per_player: Self::default_per_player(),
            allow_duplicates: false,
            homogenous: false,
            forced_attributes: Vec::new(),
            banned_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivRules {
    #[serde(default = "CivRules::default_per_age")]
    pub per_player_per_age: usize,
    #[serde(default)]
    pub allow_duplicates: bool,
    /// Bias each age toward its own pivot attributes.
    #[serde(default)]
    pub homogenous: bool,
    #[serde(default)]
    pub affinity: AffinityMode,
    #[serde(default)]
    pub forced_attributes: Vec<Attribute>,
    #[serde(default)]
    pub banned_ids: Vec<String>,
}

impl CivRules {
    #[must_use]
    pub const fn default_per_age() -> usize {
        DEFAULT_CIVS_PER_AGE
    }
}

impl Default for CivRules {
    fn default() -> Self {
        Self {
            per_player_per_age: Self::default_per_age(),
            allow_duplicates: false,
            homogenous: false,
            affinity: AffinityMode::None,
            forced_attributes: Vec::new(),
            banned_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftConfig {
    #[serde(default = "DraftConfig::default_ages")]
    pub selected_ages: Vec<Age>,
    #[serde(default)]
    pub leaders: LeaderRules,
    #[serde(default)]
    pub civs: CivRules,
}

impl DraftConfig {
    #[must_use]
    pub fn default_ages() -> Vec<Age> {
        Age::ALL.to_vec()
    }
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            selected_ages: Self::default_ages(),
            leaders: LeaderRules::default(),
            civs: CivRules::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: DraftConfig =
            serde_json::from_str(r#"{ "leaders": { "allow_duplicates": true } }"#).unwrap();
        assert_eq!(cfg.selected_ages, Age::ALL.to_vec());
        assert_eq!(cfg.leaders.per_player, 3);
        assert!(cfg.leaders.allow_duplicates);
        assert_eq!(cfg.civs.per_player_per_age, 2);
        assert_eq!(cfg.civs.affinity, AffinityMode::None);
    }

    #[test]
    fn affinity_parses_snake_case() {
        let rules: CivRules = serde_json::from_str(r#"{ "affinity": "loose" }"#).unwrap();
        assert_eq!(rules.affinity, AffinityMode::Loose);
        assert!(rules.affinity.requires_leader());
        assert!(!AffinityMode::None.requires_leader());
    }
}
