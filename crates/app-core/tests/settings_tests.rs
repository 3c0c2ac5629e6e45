// Host-side tests for the persisted program state: fixed field order,
// bit-exact round trips, and default retention on missing/broken files.

use std::fs;
use std::path::PathBuf;

use app_core::{ProgramSettings, SettingsError};
use glam::Vec3;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("nightwood_{}_{}", std::process::id(), name))
}

#[test]
fn round_trip_is_bit_identical() {
    let settings = ProgramSettings {
        clear_color: Vec3::new(0.1, 1.0 / 3.0, -0.0),
        overlay_enabled: true,
        camera_position: Vec3::new(1e-7, -42.5, 3.033_33),
        camera_front: Vec3::new(0.577_350_3, -0.577_350_3, 0.577_350_3),
    };
    let path = temp_path("roundtrip.txt");
    settings.save(&path).expect("save settings");
    let loaded = ProgramSettings::load_or_default(&path);
    let _ = fs::remove_file(&path);

    for (a, b) in [
        (settings.clear_color, loaded.clear_color),
        (settings.camera_position, loaded.camera_position),
        (settings.camera_front, loaded.camera_front),
    ] {
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.z.to_bits(), b.z.to_bits());
    }
    assert_eq!(loaded.overlay_enabled, settings.overlay_enabled);
}

#[test]
fn missing_file_keeps_defaults() {
    let loaded = ProgramSettings::load_or_default(&temp_path("does_not_exist.txt"));
    assert_eq!(loaded, ProgramSettings::default());
}

#[test]
fn malformed_file_keeps_defaults() {
    let path = temp_path("malformed.txt");
    fs::write(&path, "0.5\nnot a number\n").expect("write");
    let loaded = ProgramSettings::load_or_default(&path);
    let _ = fs::remove_file(&path);
    assert_eq!(loaded, ProgramSettings::default());
}

#[test]
fn parse_reads_fields_in_fixed_order() {
    let text = "0.25\n0.5\n0.75\n1\n1\n2\n3\n0\n0\n-1\n";
    let settings = ProgramSettings::parse(text).expect("parse");
    assert_eq!(settings.clear_color, Vec3::new(0.25, 0.5, 0.75));
    assert!(settings.overlay_enabled);
    assert_eq!(settings.camera_position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(settings.camera_front, Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn parse_reports_the_missing_field() {
    let err = ProgramSettings::parse("0.1\n0.2\n").unwrap_err();
    match err {
        SettingsError::Field { index, .. } => assert_eq!(index, 2),
        other => panic!("unexpected error: {other}"),
    }
}
