//! End-to-end scenarios over the preset catalog.

use engine::{best, presets, store};
use model::{RewardKind, export_settings, import_settings};

#[test]
fn groceries_ranking_over_presets() {
    let methods = presets::preset_methods();

    let ranked = best(1000.0, presets::GROCERIES, &methods);

    // Every preset method has an applicable reward at 1000: a specific 4%
    // rule, a global points rule, a global 1% rule and a global fixed one.
    assert_eq!(ranked.len(), 4);
    assert_eq!(ranked[0].method_id, "BPI_AMORE_CASHBACK");
    assert_eq!(ranked[0].value, 40.0);
    assert_eq!(ranked[0].reward_label, "4.00% cashback");
    assert_eq!(ranked[0].reward_kind, RewardKind::Cashback);

    assert_eq!(ranked[1].method_id, "MARIBANK_CARD");
    assert_eq!(ranked[1].value, 10.0);

    assert_eq!(ranked[2].method_id, "MARIBANK_QR");
    assert_eq!(ranked[2].value, 2.0);

    // 1000 / 30 points at 1/17 each ≈ 1.96 comes in last.
    assert_eq!(ranked[3].method_id, "UB_REWARDS_VISA");
    assert!((ranked[3].value - (1000.0 / 30.0) / 17.0).abs() < 1e-9);
}

#[test]
fn small_amounts_drop_below_fixed_threshold() {
    let methods = presets::preset_methods();

    let ranked = best(50.0, presets::RETAIL, &methods);

    // MariBank QR requires a 100 minimum spend: still ranked, but worthless.
    let qr = ranked
        .iter()
        .find(|r| r.method_id == "MARIBANK_QR")
        .unwrap();
    assert_eq!(qr.value, 0.0);
}

#[test]
fn category_removal_cascades_through_the_catalog() {
    let categories = presets::preset_categories();
    let methods = presets::preset_methods();

    let (remaining, scrubbed) =
        store::categories::remove(&categories, &methods, presets::DRUGSTORE).unwrap();

    assert_eq!(remaining.len(), categories.len() - 1);
    let bpi = scrubbed
        .iter()
        .find(|m| m.id == "BPI_AMORE_CASHBACK")
        .unwrap();
    // The 1% drugstore reward survives, scoped to nothing specific anymore.
    assert_eq!(bpi.rewards.len(), 4);
    assert!(
        bpi.rewards
            .iter()
            .all(|r| !r.categories.contains(&presets::DRUGSTORE.to_string()))
    );

    // With its specific rule now global, the drugstore query falls through
    // to the scrubbed rule set without ever scoring the method twice.
    let ranked = best(1000.0, presets::DRUGSTORE, &scrubbed);
    assert!(ranked.iter().all(|r| r.method_id != "missing"));
}

#[test]
fn presets_survive_the_validation_gate() {
    let settings = export_settings(presets::preset_categories(), presets::preset_methods());
    let raw = serde_json::to_value(&settings).unwrap();

    let imported = import_settings(&raw).unwrap();
    assert_eq!(imported, settings);
}
