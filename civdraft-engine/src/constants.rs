//! Centralized tuning constants and user-facing strings for the draft engine.
//!
//! Status strings are consumed verbatim by presentation layers, so they live
//! here rather than inline next to the code that emits them.

// Status messages ----------------------------------------------------------
pub const MSG_NOT_ENOUGH_LEADERS: &str = "Not enough leaders to satisfy the no-duplicate rule.";
pub const MSG_SELECT_LEADER_FIRST: &str =
    "Select a leader for every player before matching civilizations.";
pub const MSG_LEADERS_GENERATED: &str = "Leaders generated.";
pub const MSG_CIVS_GENERATED: &str = "Civilizations generated.";
pub const MSG_LAST_AGE: &str = "At least one age must remain selected.";

// Pivot sampling -----------------------------------------------------------
/// A pivot roll strictly above this value keeps a single pivot attribute.
pub const PIVOT_SINGLE_THRESHOLD: f64 = 0.6;

// Strict affinity never asks for more than this many shared attributes.
pub(crate) const STRICT_AFFINITY_MATCHES: usize = 2;

// Session limits -----------------------------------------------------------
pub const MAX_PLAYERS: usize = 6;
pub const MIN_PLAYERS: usize = 1;
pub const DEFAULT_LEADERS_PER_PLAYER: usize = 3;
pub const DEFAULT_CIVS_PER_AGE: usize = 2;
/// Upper bound shown for per-player counts when duplicates are allowed.
pub const DUPLICATE_COUNT_CAP: usize = 10;

// Seeded RNG ---------------------------------------------------------------
pub(crate) const SEED_HASH_BASIS: u32 = 1_779_033_703;
pub(crate) const SEED_HASH_MULTIPLIER: u32 = 3_432_918_353;
pub(crate) const SEED_MIX_A: u32 = 2_246_822_507;
pub(crate) const SEED_MIX_B: u32 = 3_266_489_909;
pub(crate) const STREAM_INCREMENT: u32 = 0x6D2B_79F5;
pub(crate) const UNIT_SCALE: f64 = 4_294_967_296.0;
