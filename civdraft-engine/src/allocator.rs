//! Turn a narrowed pool into one player's ordered picks.
use rand::RngCore;
use std::collections::HashSet;

use crate::catalog::DraftEntity;
use crate::rng::pick_index;

/// How picks relate across players within one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Each player samples a private copy of the pool; ids may repeat across players.
    AllowAcrossPlayers,
    /// Ids consumed by any player earlier in the run are excluded.
    UniqueAcrossPlayers,
}

impl DuplicatePolicy {
    #[must_use]
    pub const fn from_allow(allow_duplicates: bool) -> Self {
        if allow_duplicates {
            Self::AllowAcrossPlayers
        } else {
            Self::UniqueAcrossPlayers
        }
    }

    #[must_use]
    pub const fn is_unique(self) -> bool {
        matches!(self, Self::UniqueAcrossPlayers)
    }
}

/// Allocate up to `requested` entries from `pool`.
///
/// A `forced` entry (already checked for bans and access by the caller) takes
/// the first slot and counts toward `requested`. Under
/// [`DuplicatePolicy::UniqueAcrossPlayers`] every pick is recorded in
/// `used_ids`, and a forced entry already in `used_ids` is skipped. Callers
/// reserve forced ids up front, so the skip only fires when two players
/// force the same entry.
/// Sampling is without replacement; an exhausted bag yields a short list.
pub fn allocate<T, R>(
    pool: &[T],
    requested: usize,
    forced: Option<&T>,
    policy: DuplicatePolicy,
    used_ids: &mut HashSet<String>,
    rng: &mut R,
) -> Vec<T>
where
    T: DraftEntity + Clone,
    R: RngCore + ?Sized,
{
    let mut picks: Vec<T> = Vec::with_capacity(requested);

    if let Some(entry) = forced {
        let taken_elsewhere = policy.is_unique() && used_ids.contains(entry.id());
        if !taken_elsewhere {
            picks.push(entry.clone());
            if policy.is_unique() {
                used_ids.insert(entry.id().to_string());
            }
        }
    }

    let forced_id = picks.first().map(|entry| entry.id().to_string());
    let mut bag: Vec<&T> = match policy {
        DuplicatePolicy::AllowAcrossPlayers => pool
            .iter()
            .filter(|entry| forced_id.as_deref() != Some(entry.id()))
            .collect(),
        DuplicatePolicy::UniqueAcrossPlayers => pool
            .iter()
            .filter(|entry| !used_ids.contains(entry.id()))
            .collect(),
    };

    while picks.len() < requested {
        let Some(idx) = pick_index(rng, bag.len()) else {
            break;
        };
        let choice = bag.remove(idx);
        if policy.is_unique() {
            used_ids.insert(choice.id().to_string());
        }
        picks.push(choice.clone());
    }

    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Attribute, Leader};
    use crate::rng::DraftRng;

    fn leader(id: &str) -> Leader {
        Leader {
            id: id.to_string(),
            name: id.to_uppercase(),
            attributes: std::iter::once(Attribute::new("Cultural")).collect(),
            dlc: false,
            bonus: None,
            specificity: None,
        }
    }

    fn pool(n: usize) -> Vec<Leader> {
        (1..=n).map(|i| leader(&format!("l{i}"))).collect()
    }

    fn ids(list: &[Leader]) -> Vec<&str> {
        list.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn picks_are_distinct_within_a_player() {
        let pool = pool(5);
        let mut used = HashSet::new();
        let mut rng = DraftRng::from_seed_str("distinct");
        let picks = allocate(
            &pool,
            5,
            None,
            DuplicatePolicy::AllowAcrossPlayers,
            &mut used,
            &mut rng,
        );
        let mut sorted = ids(&picks);
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
        assert!(used.is_empty());
    }

    #[test]
    fn exhausted_pool_returns_short_list() {
        let pool = pool(2);
        let mut used = HashSet::new();
        let mut rng = DraftRng::from_seed_str("short");
        let picks = allocate(
            &pool,
            4,
            None,
            DuplicatePolicy::AllowAcrossPlayers,
            &mut used,
            &mut rng,
        );
        assert_eq!(picks.len(), 2);
    }

    #[test]
    fn zero_requested_yields_nothing() {
        let pool = pool(3);
        let mut used = HashSet::new();
        let mut rng = DraftRng::from_seed_str("zero");
        let picks = allocate(
            &pool,
            0,
            None,
            DuplicatePolicy::UniqueAcrossPlayers,
            &mut used,
            &mut rng,
        );
        assert!(picks.is_empty());
        assert!(used.is_empty());
    }

    #[test]
    fn forced_entry_goes_first_and_counts() {
        let pool = pool(6);
        let forced = leader("l4");
        let mut used = HashSet::new();
        let mut rng = DraftRng::from_seed_str("forced");
        let picks = allocate(
            &pool,
            3,
            Some(&forced),
            DuplicatePolicy::AllowAcrossPlayers,
            &mut used,
            &mut rng,
        );
        assert_eq!(picks.len(), 3);
        assert_eq!(picks[0].id, "l4");
        assert_eq!(ids(&picks).iter().filter(|id| **id == "l4").count(), 1);
    }

    #[test]
    fn unique_policy_shares_consumption_across_players() {
        let pool = pool(6);
        let mut used = HashSet::new();
        let mut rng = DraftRng::from_seed_str("unique");
        let first = allocate(
            &pool,
            3,
            None,
            DuplicatePolicy::UniqueAcrossPlayers,
            &mut used,
            &mut rng,
        );
        let second = allocate(
            &pool,
            3,
            None,
            DuplicatePolicy::UniqueAcrossPlayers,
            &mut used,
            &mut rng,
        );
        assert_eq!(used.len(), 6);
        assert!(ids(&first).iter().all(|id| !ids(&second).contains(id)));

        let third = allocate(
            &pool,
            3,
            None,
            DuplicatePolicy::UniqueAcrossPlayers,
            &mut used,
            &mut rng,
        );
        assert!(third.is_empty());
    }

    #[test]
    fn unique_policy_skips_forced_entry_already_taken() {
        let pool = pool(4);
        let forced = leader("l2");
        let mut used: HashSet<String> = std::iter::once("l2".to_string()).collect();
        let mut rng = DraftRng::from_seed_str("taken");
        let picks = allocate(
            &pool,
            2,
            Some(&forced),
            DuplicatePolicy::UniqueAcrossPlayers,
            &mut used,
            &mut rng,
        );
        assert_eq!(picks.len(), 2);
        assert!(!ids(&picks).contains(&"l2"));
    }

    #[test]
    fn forced_entry_outside_pool_is_still_honored() {
        let pool = pool(3);
        let outsider = leader("l99");
        let mut used = HashSet::new();
        let mut rng = DraftRng::from_seed_str("outsider");
        let picks = allocate(
            &pool,
            1,
            Some(&outsider),
            DuplicatePolicy::UniqueAcrossPlayers,
            &mut used,
            &mut rng,
        );
        assert_eq!(ids(&picks), vec!["l99"]);
        assert!(used.contains("l99"));
    }

    #[test]
    fn same_seed_same_allocation() {
        let pool = pool(10);
        let run = || {
            let mut used = HashSet::new();
            let mut rng = DraftRng::from_seed_str("replay");
            allocate(
                &pool,
                4,
                None,
                DuplicatePolicy::UniqueAcrossPlayers,
                &mut used,
                &mut rng,
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn reference_draw_order() {
        // Units for "abc": 0.887, 0.501, 0.135 over bags of 5, 4, 3.
        let pool = pool(5);
        let mut used = HashSet::new();
        let mut rng = DraftRng::from_seed_str("abc");
        let picks = allocate(
            &pool,
            3,
            None,
            DuplicatePolicy::UniqueAcrossPlayers,
            &mut used,
            &mut rng,
        );
        assert_eq!(ids(&picks), vec!["l5", "l3", "l1"]);
    }
}
