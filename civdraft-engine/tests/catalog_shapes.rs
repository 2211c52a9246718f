use std::collections::HashSet;
use std::hash::Hasher;

use civdraft_engine::{
    Age, Attribute, Catalog, CatalogError, DraftEntity, DraftEngine, DraftState, hash_seed,
};
use twox_hash::XxHash64;

const CATALOG_SNAPSHOT_HASH: u64 = 0xfbf1_6063_dfc1_7f06;

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

fn joined(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(Attribute::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn canonical_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    for leader in &catalog.leaders {
        out.push_str(&format!(
            "{}|{}|{}|{}\n",
            leader.id,
            leader.name,
            joined(&leader.attributes),
            leader.dlc
        ));
    }
    for civ in &catalog.civs {
        out.push_str(&format!(
            "{}|{}|{}|{}|{}\n",
            civ.id,
            civ.age,
            civ.name,
            joined(&civ.attributes),
            civ.dlc
        ));
    }
    out
}

#[test]
fn builtin_catalog_snapshot_stable() {
    let catalog = Catalog::builtin().unwrap();
    let canonical = canonical_catalog(&catalog);
    assert_eq!(
        snapshot_hash(canonical.as_bytes()),
        CATALOG_SNAPSHOT_HASH,
        "catalog snapshot changed\n{canonical}"
    );
}

#[test]
fn builtin_catalog_shape() {
    let catalog = Catalog::builtin().unwrap();
    assert_eq!(catalog.leaders.len(), 32);
    assert_eq!(catalog.civs.len(), 43);
    assert_eq!(catalog.dlc_packs, vec!["DLC Pack A", "DLC Pack B"]);

    let dlc_leaders: Vec<&str> = catalog
        .leaders
        .iter()
        .filter(|leader| leader.is_dlc())
        .map(|leader| leader.id.as_str())
        .collect();
    assert_eq!(dlc_leaders, vec!["l10", "l27"]);

    for entity in catalog.leaders.iter().map(|l| l as &dyn DraftEntity).chain(
        catalog.civs.iter().map(|c| c as &dyn DraftEntity),
    ) {
        assert!(
            (1..=2).contains(&entity.attributes().len()),
            "{} has {} attributes",
            entity.name(),
            entity.attributes().len()
        );
    }

    let ids: HashSet<&str> = catalog.civs.iter().map(|civ| civ.id.as_str()).collect();
    assert_eq!(ids.len(), catalog.civs.len());
}

#[test]
fn catalog_validation_rejects_duplicates_and_unknown_ages() {
    let duplicate = r#"{"leaders": [
        {"id": "a", "name": "A", "attributes": ["Cultural"]},
        {"id": "a", "name": "B", "attributes": ["Economic"]}
    ]}"#;
    assert!(matches!(
        Catalog::from_json(duplicate),
        Err(CatalogError::DuplicateId { .. })
    ));

    let stray_age = r#"{"ages": ["Antiquity"], "civs": [
        {"id": "c", "age": "Modern", "name": "C", "attributes": ["Cultural"]}
    ]}"#;
    let err = Catalog::from_json(stray_age).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownAge { age: Age::Modern, .. }));

    assert!(matches!(
        Catalog::from_json("{ not json"),
        Err(CatalogError::Parse(_))
    ));
}

#[test]
fn seed_abc_reproduces_reference_assignment() {
    assert_eq!(hash_seed("abc"), 1_792_905_582);
    let engine = DraftEngine::builtin().unwrap();
    let state = DraftState::new("abc").with_players(2);

    let leaders = engine.generate_leaders(&state);
    let drafted: Vec<Vec<&str>> = leaders
        .state
        .players
        .iter()
        .map(|player| {
            player
                .drafted_leaders
                .iter()
                .map(|l| l.id.as_str())
                .collect()
        })
        .collect();
    assert_eq!(drafted, vec![vec!["l29", "l16", "l5"], vec!["l17", "l14", "l25"]]);

    let civs = engine.generate_civs(&leaders.state);
    let per_age = |index: usize, age: Age| -> Vec<String> {
        civs.state.players[index]
            .drafted_civs(age)
            .iter()
            .map(|civ| civ.id.clone())
            .collect()
    };
    assert_eq!(per_age(0, Age::Antiquity), vec!["c13", "c7"]);
    assert_eq!(per_age(0, Age::Exploration), vec!["c17", "c23"]);
    assert_eq!(per_age(0, Age::Modern), vec!["c36", "c40"]);
    assert_eq!(per_age(1, Age::Antiquity), vec!["c12", "c6"]);
    assert_eq!(per_age(1, Age::Exploration), vec!["c19", "c16"]);
    assert_eq!(per_age(1, Age::Modern), vec!["c35", "c30"]);
}

#[test]
fn session_state_round_trips_as_replay_token() {
    let engine = DraftEngine::builtin().unwrap();
    let mut state = DraftState::new("token").with_players(3);
    state.config.leaders.homogenous = true;
    state.players[1].forced_leader_id = Some("l4".to_string());
    let saved = serde_json::to_string(&state).unwrap();
    let restored: DraftState = serde_json::from_str(&saved).unwrap();
    assert_eq!(
        engine.generate_leaders(&state),
        engine.generate_leaders(&restored)
    );

    let partial: DraftState = serde_json::from_str(r#"{"seed": "partial"}"#).unwrap();
    assert_eq!(partial.players.len(), 1);
    assert_eq!(partial.config.leaders.per_player, 3);
    assert_eq!(partial.config.civs.per_player_per_age, 2);
}
