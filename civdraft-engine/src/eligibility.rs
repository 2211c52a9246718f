//! Narrow the catalog to what a player, or every player jointly, may receive.
use crate::catalog::{Age, Catalog, Civilization, DraftEntity, Leader};
use crate::state::Player;

/// DLC ownership is coarse: owning any pack unlocks every DLC-gated entry.
#[must_use]
pub fn player_has_access(player: &Player, is_dlc_gated: bool) -> bool {
    !is_dlc_gated || player.has_all_dlc || !player.owned_dlc.is_empty()
}

fn is_banned(banned_ids: &[String], id: &str) -> bool {
    banned_ids.iter().any(|banned| banned == id)
}

/// Whether one entry is open to one player: not banned and accessible.
pub fn entry_open_to<T: DraftEntity>(player: &Player, entry: &T, banned_ids: &[String]) -> bool {
    !is_banned(banned_ids, entry.id()) && player_has_access(player, entry.is_dlc())
}

/// Entries of a catalog slice open to one player, in catalog order.
pub fn pool_for_player<'a, T, I>(player: &Player, entries: I, banned_ids: &[String]) -> Vec<T>
where
    T: DraftEntity + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    entries
        .into_iter()
        .filter(|entry| entry_open_to(player, *entry, banned_ids))
        .cloned()
        .collect()
}

/// Entries every player could individually receive.
pub fn pool_for_all_players<'a, T, I>(
    players: &[Player],
    entries: I,
    banned_ids: &[String],
) -> Vec<T>
where
    T: DraftEntity + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    entries
        .into_iter()
        .filter(|entry| {
            !is_banned(banned_ids, entry.id())
                && players
                    .iter()
                    .all(|player| player_has_access(player, entry.is_dlc()))
        })
        .cloned()
        .collect()
}

#[must_use]
pub fn leaders_for_player(
    player: &Player,
    catalog: &Catalog,
    banned_ids: &[String],
) -> Vec<Leader> {
    pool_for_player(player, &catalog.leaders, banned_ids)
}

#[must_use]
pub fn civs_for_player(
    player: &Player,
    catalog: &Catalog,
    banned_ids: &[String],
    age: Age,
) -> Vec<Civilization> {
    pool_for_player(player, catalog.civs_for_age(age), banned_ids)
}
