use super::*;
use crate::scene::graph::SceneGraph;
use crate::scene::params::ParamSet;

fn graph_with_texture() -> (SceneGraph, NodeId) {
    let mut graph = SceneGraph::new();
    let root = graph.root();
    let tex = graph
        .add_entity(root, EntityKind::Texture, "wood", "disk_texture_2d", ParamSet::new())
        .unwrap();
    (graph, tex)
}

#[test]
fn bind_stores_the_resolved_target() {
    let (_, tex) = graph_with_texture();
    let mut binding = EntityBinding::new();
    assert!(!binding.is_bound());
    assert_eq!(binding.bind_with(|| Some(tex)), BindOutcome::Bound(tex));
    assert!(binding.is_bound());
    assert_eq!(binding.target(), Some(tex));
}

#[test]
fn second_bind_never_invokes_the_resolver() {
    let (_, tex) = graph_with_texture();
    let mut binding = EntityBinding::new();
    binding.bind_with(|| Some(tex));
    let outcome = binding.bind_with(|| panic!("must not re-resolve"));
    assert_eq!(outcome, BindOutcome::AlreadyBound);
    assert_eq!(binding.target(), Some(tex));
}

#[test]
fn failed_resolution_leaves_a_valid_empty_binding() {
    let mut binding = EntityBinding::new();
    assert_eq!(binding.bind_with(|| None), BindOutcome::Unresolved);
    assert!(!binding.is_bound());
}

#[test]
fn unresolved_bind_can_be_retried() {
    let (_, tex) = graph_with_texture();
    let mut binding = EntityBinding::new();
    binding.bind_with(|| None);
    assert_eq!(binding.bind_with(|| Some(tex)), BindOutcome::Bound(tex));
}

#[test]
fn unbind_clears_the_target() {
    let (_, tex) = graph_with_texture();
    let mut binding = EntityBinding::new();
    binding.bind_with(|| Some(tex));
    binding.unbind();
    assert!(!binding.is_bound());
    // And binding again re-resolves.
    assert_eq!(binding.bind_with(|| Some(tex)), BindOutcome::Bound(tex));
}

#[test]
fn require_resolved_returns_the_target_when_bound() {
    let (_, tex) = graph_with_texture();
    let mut binding = EntityBinding::new();
    binding.bind_with(|| Some(tex));
    assert_eq!(
        binding.require_resolved("wood", EntityKind::Texture, "wood_inst").unwrap(),
        tex
    );
}

#[test]
fn require_resolved_raises_unknown_entity_when_unbound() {
    let binding = EntityBinding::new();
    let err = binding
        .require_resolved("wood", EntityKind::Texture, "wood_inst")
        .unwrap_err();
    match err {
        RenderError::UnknownEntity { name, kind, referer } => {
            assert_eq!(name, "wood");
            assert_eq!(kind, "texture");
            assert_eq!(referer, "wood_inst");
        }
        other => panic!("expected UnknownEntity, got {other}"),
    }
}
