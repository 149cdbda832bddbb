//! Validates every generated WGSL module with naga, without needing a
//! GPU. Catches template/splice mistakes at test time instead of at
//! pipeline creation.

use naga::valid::{Capabilities, ValidationFlags, Validator};

use automata_gpu::gpu::display::{DISPLAY_SHADER, OVERLAY_SHADER};
use automata_gpu::gpu::step::{fill_shader_source, step_shader_source};
use automata_gpu::rules::Rule;

fn validate(label: &str, source: &str) {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{label}: parse failed: {e}"));
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|e| panic!("{label}: validation failed: {e:?}"));
}

#[test]
fn step_shaders_validate_for_every_rule() {
    for rule in Rule::ALL {
        validate(rule.label(), &step_shader_source(rule));
    }
}

#[test]
fn step_shaders_have_expected_entry_points() {
    for rule in Rule::ALL {
        let module = naga::front::wgsl::parse_str(&step_shader_source(rule)).unwrap();
        let names: Vec<_> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
        assert!(names.contains(&"vs_main"), "{} missing vs_main", rule.label());
        assert!(names.contains(&"fs_main"), "{} missing fs_main", rule.label());
    }
}

#[test]
fn fill_shader_validates() {
    validate("fill", fill_shader_source());
}

#[test]
fn display_shader_validates() {
    validate("display", DISPLAY_SHADER);
}

#[test]
fn overlay_shader_validates() {
    validate("overlay", OVERLAY_SHADER);
}
