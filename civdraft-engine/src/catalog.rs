//! Static reference data: ages, leaders and civilizations.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

const BUILTIN_CATALOG_JSON: &str = include_str!("../assets/catalog.json");

/// Ordered category partitioning civilizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Age {
    Antiquity,
    Exploration,
    Modern,
}

impl Age {
    pub const ALL: [Self; 3] = [Self::Antiquity, Self::Exploration, Self::Modern];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Antiquity => "Antiquity",
            Self::Exploration => "Exploration",
            Self::Modern => "Modern",
        }
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque attribute tag. Compared by value, never validated against a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribute(pub String);

impl Attribute {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entities carry one or two attributes, so they stay inline.
pub type AttributeSet = SmallVec<[Attribute; 2]>;

/// Shared view over leaders and civilizations used by the filters and allocator.
pub trait DraftEntity {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn attributes(&self) -> &[Attribute];
    fn is_dlc(&self) -> bool;

    /// Whether any of this entity's attributes appears in `wanted`.
    fn shares_any(&self, wanted: &[Attribute]) -> bool {
        self.attributes().iter().any(|attr| wanted.contains(attr))
    }

    /// Number of this entity's attributes that also appear in `other`.
    fn shared_count(&self, other: &[Attribute]) -> usize {
        self.attributes()
            .iter()
            .filter(|attr| other.contains(attr))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub id: String,
    pub name: String,
    pub attributes: AttributeSet,
    #[serde(default)]
    pub dlc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specificity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Civilization {
    pub id: String,
    pub age: Age,
    pub name: String,
    pub attributes: AttributeSet,
    #[serde(default)]
    pub dlc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specificity: Option<String>,
}

macro_rules! impl_draft_entity {
    ($ty:ty) => {
        impl DraftEntity for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn attributes(&self) -> &[Attribute] {
                &self.attributes
            }

            fn is_dlc(&self) -> bool {
                self.dlc
            }
        }
    };
}

impl_draft_entity!(Leader);
impl_draft_entity!(Civilization);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("civilization `{id}` belongs to age {age}, which the catalog does not list")]
    UnknownAge { id: String, age: Age },
}

/// Immutable leader/civilization catalog injected into every engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_ages")]
    pub ages: Vec<Age>,
    #[serde(default)]
    pub dlc_packs: Vec<String>,
    #[serde(default)]
    pub leaders: Vec<Leader>,
    #[serde(default)]
    pub civs: Vec<Civilization>,
}

fn default_ages() -> Vec<Age> {
    Age::ALL.to_vec()
}

impl Catalog {
    /// Build a catalog from parts, validating id uniqueness and ages.
    ///
    /// # Errors
    ///
    /// Returns an error when an id repeats within its category or a
    /// civilization references an age the catalog does not list.
    pub fn new(
        ages: Vec<Age>,
        dlc_packs: Vec<String>,
        leaders: Vec<Leader>,
        civs: Vec<Civilization>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            ages,
            dlc_packs,
            leaders,
            civs,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog compiled into this crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded asset is corrupt.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for leader in &self.leaders {
            if !seen.insert(leader.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "leader",
                    id: leader.id.clone(),
                });
            }
        }
        seen.clear();
        for civ in &self.civs {
            if !seen.insert(civ.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "civilization",
                    id: civ.id.clone(),
                });
            }
            if !self.ages.contains(&civ.age) {
                return Err(CatalogError::UnknownAge {
                    id: civ.id.clone(),
                    age: civ.age,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn leader(&self, id: &str) -> Option<&Leader> {
        self.leaders.iter().find(|leader| leader.id == id)
    }

    #[must_use]
    pub fn civ(&self, id: &str) -> Option<&Civilization> {
        self.civs.iter().find(|civ| civ.id == id)
    }

    pub fn civs_for_age(&self, age: Age) -> impl Iterator<Item = &Civilization> {
        self.civs.iter().filter(move |civ| civ.age == age)
    }

    /// Every attribute in use, leaders first, in first-seen order.
    #[must_use]
    pub fn unique_attributes(&self) -> Vec<Attribute> {
        let mut out: Vec<Attribute> = Vec::new();
        let all = self
            .leaders
            .iter()
            .flat_map(|leader| leader.attributes.iter())
            .chain(self.civs.iter().flat_map(|civ| civ.attributes.iter()));
        for attr in all {
            if !out.contains(attr) {
                out.push(attr.clone());
            }
        }
        out
    }

    #[must_use]
    pub fn leader_names(&self) -> Vec<String> {
        unique_names(&self.leaders)
    }

    #[must_use]
    pub fn civ_names(&self) -> Vec<String> {
        unique_names(&self.civs)
    }
}

/// Deduplicate by name keeping first-seen order; a later entry with the same
/// name replaces the earlier one in place.
pub fn unique_by_name<T: DraftEntity + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if let Some(existing) = out.iter_mut().find(|e| e.name() == item.name()) {
            *existing = item.clone();
        } else {
            out.push(item.clone());
        }
    }
    out
}

fn unique_names<T: DraftEntity + Clone>(items: &[T]) -> Vec<String> {
    unique_by_name(items)
        .iter()
        .map(|item| item.name().to_string())
        .collect()
}

/// Seam through which a platform supplies reference data.
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be produced.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Source backed by the compiled-in reference catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl CatalogSource for BuiltinCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::builtin()
    }
}
