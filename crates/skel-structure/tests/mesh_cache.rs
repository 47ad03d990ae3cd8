//! Mesh caching and derived-measurement behavior.

use std::rc::Rc;

use skel_structure::{ImportConfig, PipelineParams, RepairPolicy, Structure};

fn unit_config() -> ImportConfig {
    ImportConfig::default()
        .with_units_per_pixel(1.0)
        .with_units_per_section(1.0)
        .with_excluded_sections(Vec::new())
}

fn ball_structure() -> Structure {
    let locations = r#"{"value": [
        {"ID": 1, "VolumeX": 0.0, "VolumeY": 0.0, "Z": 0.0, "Radius": 1.0}
    ]}"#;
    Structure::from_annotation(1, locations, r#"{"value": []}"#, &unit_config()).unwrap()
}

#[test]
fn mesh_accessor_returns_the_same_object() {
    let structure = ball_structure();
    let first = structure.mesh();
    let second = structure.mesh();
    assert!(Rc::ptr_eq(&first, &second));
    // Shared ownership: the cache plus the two handles.
    assert!(Rc::strong_count(&first) >= 3);
}

#[test]
fn measurements_come_from_the_cached_mesh() {
    let structure = ball_structure();
    let mesh = structure.mesh();

    let volume = structure.volume();
    assert!((volume - mesh.volume()).abs() < 1e-12);

    let com = structure.center_of_mass();
    let expected = mesh.center_of_mass().unwrap();
    assert!((com - expected).norm() < 1e-12);
}

#[test]
fn ball_volume_is_roughly_spherical() {
    // A lone node of radius 1 reconstructs to an approximate unit ball.
    let structure = ball_structure();
    let volume = structure.volume();

    let exact = 4.0 / 3.0 * std::f64::consts::PI;
    assert!(volume > 0.4 * exact, "volume too small: {volume}");
    assert!(volume < 1.6 * exact, "volume too large: {volume}");
}

#[test]
fn ball_centroid_is_near_the_node() {
    let structure = ball_structure();
    let com = structure.center_of_mass();
    assert!(com.coords.norm() < 0.2, "centroid drifted: {com}");
}

#[test]
fn center_of_mass_string_is_comma_separated() {
    let structure = ball_structure();
    let text = structure.center_of_mass_string();
    let parts: Vec<&str> = text.split(", ").collect();
    assert_eq!(parts.len(), 3);
    for part in parts {
        part.parse::<f64>().unwrap();
    }
}

#[test]
fn smooth_only_policy_also_caches() {
    let locations = r#"{"value": [
        {"ID": 1, "VolumeX": 0.0, "VolumeY": 0.0, "Z": 0.0, "Radius": 1.0}
    ]}"#;
    let mut params = PipelineParams::new();
    params.policy = RepairPolicy::SmoothOnly;

    let structure = Structure::from_annotation(2, locations, r#"{"value": []}"#, &unit_config())
        .unwrap()
        .with_pipeline_params(params);

    let first = structure.mesh();
    let second = structure.mesh();
    assert!(Rc::ptr_eq(&first, &second));
    assert!(first.face_count() > 0);
}

#[test]
fn export_writes_the_cached_mesh() {
    let structure = ball_structure();
    let path = std::env::temp_dir().join(format!("skel_structure_{}.stl", std::process::id()));

    structure.export_mesh(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    assert_eq!(bytes.len(), 84 + count * 50);
    assert_eq!(count, structure.mesh().face_count());

    std::fs::remove_file(&path).ok();
}
