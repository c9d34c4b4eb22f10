use super::*;

fn sample(direct: f32, indirect: f32) -> ShadingComponents {
    ShadingComponents {
        diffuse: Color3::splat(direct),
        indirect_diffuse: Color3::splat(indirect),
        ..ShadingComponents::default()
    }
}

#[test]
fn register_assigns_slots_in_order() {
    let mut registry = AovRegistry::new();
    assert_eq!(registry.register(AovKind::Diffuse), 0);
    assert_eq!(registry.register(AovKind::Emission), 1);
    assert_eq!(registry.kinds(), &[AovKind::Diffuse, AovKind::Emission]);
    assert_eq!(registry.index_of(AovKind::Emission), Some(1));
    assert_eq!(registry.index_of(AovKind::Glossy), None);
}

#[test]
fn duplicate_registration_returns_the_existing_slot() {
    let mut registry = AovRegistry::new();
    assert_eq!(registry.register(AovKind::Diffuse), 0);
    assert_eq!(registry.register(AovKind::Diffuse), 0);
    assert_eq!(registry.len(), 1);
}

#[test]
fn accumulator_sets_mirror_the_registry() {
    let mut registry = AovRegistry::new();
    registry.register(AovKind::DirectDiffuse);
    registry.register(AovKind::Emission);

    let set = registry.create_accumulators();
    assert_eq!(set.len(), 2);
    for (slot, acc) in set.accumulators().iter().enumerate() {
        assert_eq!(acc.index(), slot);
        assert_eq!(acc.kind(), registry.kinds()[slot]);
        assert_eq!(acc.color(), Color3::BLACK);
    }
}

#[test]
fn set_write_routes_each_kind_to_its_slot() {
    let mut registry = AovRegistry::new();
    registry.register(AovKind::Diffuse);
    registry.register(AovKind::DirectDiffuse);

    let mut set = registry.create_accumulators();
    set.write(&sample(0.4, 0.2), 1.0);

    let mut output = vec![Color3::BLACK; registry.len()];
    set.flush(&mut output);
    assert!((output[0].r - 0.6).abs() < 1e-6);
    assert!((output[1].r - 0.4).abs() < 1e-6);
}

#[test]
fn reset_clears_every_channel() {
    let mut registry = AovRegistry::new();
    registry.register(AovKind::Diffuse);
    registry.register(AovKind::Emission);

    let mut set = registry.create_accumulators();
    set.write(&sample(1.0, 1.0), 1.0);
    set.reset();
    for acc in set.accumulators() {
        assert_eq!(acc.color(), Color3::BLACK);
    }
}

#[test]
fn empty_registry_yields_an_empty_set() {
    let registry = AovRegistry::new();
    let mut set = registry.create_accumulators();
    assert!(set.is_empty());
    set.write(&sample(1.0, 1.0), 1.0);
    set.flush(&mut []);
}

#[test]
fn kind_vocabulary_is_stable() {
    for kind in AovKind::ALL {
        assert_eq!(AovKind::from_model(kind.model()), Some(kind));
        assert!(kind.model().ends_with("_aov"));
        assert!(!kind.channel_name().ends_with("_aov"));
        assert_eq!(kind.channel_count(), 3);
    }
    assert_eq!(AovKind::from_model("beauty"), None);
}

#[test]
fn workers_accumulate_independently() {
    use rayon::prelude::*;

    let mut registry = AovRegistry::new();
    registry.register(AovKind::Diffuse);
    registry.register(AovKind::DirectDiffuse);
    let registry = &registry;

    let results: Vec<(f32, f32)> = (0..128u32)
        .into_par_iter()
        .map(|i| {
            let mut set = registry.create_accumulators();
            let v = i as f32;
            set.write(&sample(v, v), 1.0);
            let mut out = vec![Color3::BLACK; registry.len()];
            set.flush(&mut out);
            (out[0].r, out[1].r)
        })
        .collect();

    for (i, (total, direct)) in results.into_iter().enumerate() {
        let v = i as f32;
        assert_eq!(total, v + v, "cross-talk at sample {i}");
        assert_eq!(direct, v, "cross-talk at sample {i}");
    }
}
