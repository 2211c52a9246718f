//! Constraint narrowing: forced attributes, pivot themes and leader affinity.
//!
//! Every narrowing step falls back to its input rather than returning an
//! empty pool, so an impossible-to-satisfy bias never erases all candidates.
use rand::RngCore;
use smallvec::SmallVec;

use crate::catalog::{Attribute, Civilization, DraftEntity, Leader};
use crate::config::AffinityMode;
use crate::constants::{PIVOT_SINGLE_THRESHOLD, STRICT_AFFINITY_MATCHES};
use crate::rng::{next_unit, pick_index};

/// One or two attributes biasing a whole run (or one age of a civ run).
pub type PivotAttributes = SmallVec<[Attribute; 2]>;

/// Keep entries sharing an attribute with `forced`, or the whole pool if none do.
#[must_use]
pub fn filter_by_forced_attributes<T: DraftEntity>(pool: Vec<T>, forced: &[Attribute]) -> Vec<T> {
    if forced.is_empty() {
        return pool;
    }
    let primary_len = pool.iter().filter(|entry| entry.shares_any(forced)).count();
    if primary_len == 0 {
        return pool;
    }
    pool.into_iter()
        .filter(|entry| entry.shares_any(forced))
        .collect()
}

/// Draw the pivot theme: one attribute, plus a distinct second one unless the
/// follow-up roll lands above [`PIVOT_SINGLE_THRESHOLD`].
pub fn choose_pivot_attributes<R: RngCore + ?Sized>(
    attributes: &[Attribute],
    rng: &mut R,
) -> PivotAttributes {
    let mut pivot = PivotAttributes::new();
    let Some(first_idx) = pick_index(rng, attributes.len()) else {
        return pivot;
    };
    let first = attributes[first_idx].clone();
    let rest: Vec<&Attribute> = attributes.iter().filter(|attr| **attr != first).collect();
    pivot.push(first);
    if rest.is_empty() || next_unit(rng) > PIVOT_SINGLE_THRESHOLD {
        return pivot;
    }
    if let Some(second_idx) = pick_index(rng, rest.len()) {
        pivot.push(rest[second_idx].clone());
    }
    pivot
}

/// Entries intersecting the pivot. May be empty; see [`apply_pivot`].
#[must_use]
pub fn pivot_filter<T: DraftEntity + Clone>(pool: &[T], pivot: &[Attribute]) -> Vec<T> {
    pool.iter()
        .filter(|entry| entry.shares_any(pivot))
        .cloned()
        .collect()
}

/// Pivot narrowing with fallback to the pre-pivot pool.
#[must_use]
pub fn apply_pivot<T: DraftEntity + Clone>(pool: Vec<T>, pivot: &[Attribute]) -> Vec<T> {
    if pivot.is_empty() {
        return pool;
    }
    let narrowed = pivot_filter(&pool, pivot);
    if narrowed.is_empty() { pool } else { narrowed }
}

/// Majority overlap: at least `min(2, leader attribute count)` shared attributes.
#[must_use]
pub fn matches_strict(leader: &Leader, civ: &Civilization) -> bool {
    civ.shared_count(&leader.attributes) >= STRICT_AFFINITY_MATCHES.min(leader.attributes.len())
}

/// Any shared attribute.
#[must_use]
pub fn matches_quasi(leader: &Leader, civ: &Civilization) -> bool {
    civ.shared_count(&leader.attributes) >= 1
}

/// Restrict civilizations to those compatible with the selected leader.
/// Without a resolved leader the pool is returned untouched.
#[must_use]
pub fn affinity_filter(
    pool: Vec<Civilization>,
    leader: Option<&Leader>,
    mode: AffinityMode,
) -> Vec<Civilization> {
    let Some(leader) = leader else {
        return pool;
    };
    match mode {
        AffinityMode::None => pool,
        AffinityMode::Strict => pool
            .into_iter()
            .filter(|civ| matches_strict(leader, civ))
            .collect(),
        AffinityMode::Loose => pool
            .into_iter()
            .filter(|civ| matches_quasi(leader, civ))
            .collect(),
    }
}
