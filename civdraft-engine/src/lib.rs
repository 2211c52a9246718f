//! Civdraft Engine
//!
//! Platform-agnostic core for a seeded leader and civilization draft.
//! Given the same seed, catalog and configuration, every generation call
//! produces the same assignment, so a seed plus its state is a replay token.

pub mod allocator;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod eligibility;
pub mod engine;
pub mod narrowing;
pub mod rng;
pub mod seed;
pub mod selectors;
pub mod state;

// Re-export commonly used types
pub use allocator::{DuplicatePolicy, allocate};
pub use catalog::{
    Age, Attribute, AttributeSet, BuiltinCatalog, Catalog, CatalogError, CatalogSource,
    Civilization, DraftEntity, Leader, unique_by_name,
};
pub use config::{AffinityMode, CivRules, DraftConfig, LeaderRules};
pub use engine::{DraftOutcome, DraftStatus, generate_civs, generate_leaders};
pub use rng::{DraftRng, hash_seed};
pub use seed::{normalize_seed, seed_from_entropy};
pub use selectors::{
    CivDraftSummary, LeaderDraftSummary, civ_generate_disabled, civ_max,
    civ_pool_for_all_players_by_age, leader_generate_disabled, leader_max,
    leader_pool_for_all_players,
};
pub use state::{DraftRefusal, DraftState, DraftStep, Player};

/// Draft engine bound to one catalog source.
///
/// The catalog and its attribute universe are loaded once at construction;
/// generation calls are pure functions of the supplied state.
pub struct DraftEngine<S>
where
    S: CatalogSource,
{
    source: S,
    catalog: Catalog,
    attributes: Vec<Attribute>,
}

impl<S> DraftEngine<S>
where
    S: CatalogSource,
{
    /// Create an engine from the provided catalog source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce a catalog.
    pub fn new(source: S) -> Result<Self, S::Error> {
        let catalog = source.load_catalog()?;
        let attributes = catalog.unique_attributes();
        log::debug!(
            "draft engine ready: {} leaders, {} civs, {} attributes",
            catalog.leaders.len(),
            catalog.civs.len(),
            attributes.len()
        );
        Ok(Self {
            source,
            catalog,
            attributes,
        })
    }

    /// Reload the catalog from the source, e.g. after the platform updated it.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce a catalog; the previous
    /// catalog stays in place.
    pub fn reload(&mut self) -> Result<(), S::Error> {
        let catalog = self.source.load_catalog()?;
        self.attributes = catalog.unique_attributes();
        self.catalog = catalog;
        Ok(())
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Distinct attributes across leaders then civilizations, in first-seen order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Fresh session state seeded with `seed`.
    #[must_use]
    pub fn new_session(&self, seed: &str) -> DraftState {
        DraftState::new(seed)
    }

    #[must_use]
    pub fn generate_leaders(&self, state: &DraftState) -> DraftOutcome {
        engine::generate_leaders(state, &self.catalog, &self.attributes)
    }

    #[must_use]
    pub fn generate_civs(&self, state: &DraftState) -> DraftOutcome {
        engine::generate_civs(state, &self.catalog, &self.attributes)
    }
}

impl DraftEngine<BuiltinCatalog> {
    /// Engine over the compiled-in reference catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog fails validation.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(BuiltinCatalog)
    }
}
