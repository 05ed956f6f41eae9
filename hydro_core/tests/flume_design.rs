//! End-to-end aqueduct design runs.

use hydro_core::calculations::flume_design::{calculate, FlumeDesignInput, FlumeSpec};
use hydro_core::calculations::freeboard::GoverningFlow;
use hydro_core::channel::{ChannelSection, SectionShape, ShapeKind};
use hydro_core::errors::CalcError;
use hydro_core::project::{DesignSettings, Project};
use hydro_core::units::Slope;

fn close(actual: f64, expected: f64, tol: f64) -> bool {
    (actual - expected).abs() < tol
}

#[test]
fn ushell_aqueduct_full_run() {
    let settings = DesignSettings::default();
    let r = calculate(&FlumeDesignInput::example(), &settings).unwrap();

    // Width window from the four ratio trials
    assert!(close(r.width.lower_bound, 1.982, 0.005));
    assert!(close(r.width.upper_bound, 2.120, 0.005));
    assert!(close(r.dimension, 2.0, 1e-9));

    // Wall height
    assert!(close(r.freeboard.design_depth, 3.1109, 0.001));
    assert!(close(r.freeboard.checked_depth, 3.5376, 0.001));
    assert!(close(r.freeboard.required_height, 3.8376, 0.002));
    assert_eq!(r.freeboard.governing, GoverningFlow::Checked);

    // Floor levels
    let e = r.floor.elevations;
    assert!(close(e.flume_inlet, 254.617, 0.002));
    assert!(close(e.flume_outlet, 254.517, 0.002));
    assert!(close(e.downstream_canal, 254.344, 0.002));

    // Checked profile
    let checked = &r.checked_profile;
    assert!(close(checked.boundary_depth, 3.6673, 0.001));
    assert!(close(checked.reaches[0].upstream.depth, 3.4106, 0.003));
    assert!(close(checked.upstream_depth(), 3.2389, 0.003));

    // Rise check
    assert!(close(r.rise_check.normal_depth, 3.2338, 0.001));
    assert!(r.rise_check.passes);
    assert!(r.rise_check.ratio() < 1.01);
    assert!(r.passes());
}

#[test]
fn design_profile_matches_normal_depths() {
    let r = calculate(&FlumeDesignInput::example(), &DesignSettings::default()).unwrap();
    let profile = &r.design_profile;

    // At design discharge the profile should reproduce the uniform-flow depths
    // the floor levels were derived from
    assert!(close(profile.boundary_depth, r.floor.downstream.depth, 1e-9));
    for reach in &profile.reaches[..5] {
        assert!(close(reach.upstream.depth, r.floor.flume.depth, 0.003), "{}", reach.label);
    }
    assert!(close(profile.upstream_depth(), r.floor.upstream.depth, 0.003));
}

#[test]
fn rectangular_aqueduct() {
    let mut input = FlumeDesignInput::example();
    input.flume = FlumeSpec {
        kind: ShapeKind::Rectangular,
        side_slope: None,
        roughness: 0.014,
        slope: Slope::one_in(2000.0),
        dimension: None,
    };
    let r = calculate(&input, &DesignSettings::default()).unwrap();

    assert!(close(r.width.lower_bound, 4.033, 0.005));
    assert!(close(r.dimension, 4.1, 1e-9));
    assert_eq!(r.flume_section.shape, SectionShape::Rectangular { b: 4.1 });
    // Rectangular rule: H_s = h_s + h_s/12 + 0.05
    let fb = &r.freeboard;
    assert!(close(fb.design_requirement, fb.design_depth * 13.0 / 12.0 + 0.05, 1e-9));
    assert!(r.rise_check.computed_depth > 0.0);
}

#[test]
fn short_flume_has_single_segment() {
    let mut input = FlumeDesignInput::example();
    input.flume_length = 30.0;
    let r = calculate(&input, &DesignSettings::default()).unwrap();
    assert_eq!(r.checked_profile.reaches.len(), 3);
    assert_eq!(r.checked_profile.reaches[1].label, "Flume segment 1");
}

#[test]
fn tight_rise_limit_fails_without_error() {
    let settings = DesignSettings {
        rise_limit: 1.0,
        ..DesignSettings::default()
    };
    let r = calculate(&FlumeDesignInput::example(), &settings).unwrap();
    assert!(!r.rise_check.passes);
    assert!(!r.passes());
}

#[test]
fn unreachable_discharge_names_the_step() {
    let mut input = FlumeDesignInput::example();
    // A 1 m canal cannot carry 24 m³/s at a 1/15000 slope within 10 m depth
    input.downstream_canal = ChannelSection::new(SectionShape::Rectangular { b: 1.0 }, 0.017, Slope::one_in(15000.0));
    let err = calculate(&input, &DesignSettings::default()).unwrap_err();
    assert_eq!(err.error_code(), "CALCULATION_FAILED");
    if let CalcError::CalculationFailed { calculation_type, .. } = err {
        assert_eq!(calculation_type, "Floor elevations");
    }
}

#[test]
fn project_file_drives_the_same_design() {
    let project = Project::new("Engineer", "26-100", "District", FlumeDesignInput::example());
    let json = serde_json::to_string_pretty(&project).unwrap();
    let loaded: Project = serde_json::from_str(&json).unwrap();

    let a = calculate(&project.design, &project.settings).unwrap();
    let b = calculate(&loaded.design, &loaded.settings).unwrap();
    assert_eq!(a.dimension, b.dimension);
    assert_eq!(a.rise_check, b.rise_check);
}
