//! Physics tests: drag law, pressure, and the semi-implicit Euler update.

use crate::constants::*;
use crate::physics::*;
use crate::types::Vec2;

const EPSILON: f64 = 1e-12;

// ============================================================================
// Integration
// ============================================================================

#[test]
fn should_coast_with_zero_acceleration_and_zero_wind() {
    let mut p = vec![Vec2::new(1.0, -2.0), Vec2::new(0.5, 0.5)];
    let mut v = vec![Vec2::new(0.3, 0.1), Vec2::new(-1.0, 2.0)];
    let zero = vec![Vec2::zero(); 2];
    let (p0, v0) = (p.clone(), v.clone());

    integrate_agents(&mut p, &mut v, &zero, &zero, DEFAULT_DT);

    for i in 0..2 {
        let expected = p0[i] + v0[i] * DEFAULT_DT;
        assert!((p[i] - expected).norm() < EPSILON);
        assert_eq!(v[i], v0[i]);
    }
}

#[test]
fn should_advance_position_with_old_velocity() {
    let mut p = vec![Vec2::zero()];
    let mut v = vec![Vec2::zero()];

    integrate_agents(&mut p, &mut v, &[Vec2::new(1.0, 0.0)], &[Vec2::zero()], 0.1);

    assert_eq!(p[0], Vec2::zero(), "position must use the pre-step velocity");
    assert!((v[0].x - 0.1).abs() < EPSILON);

    integrate_agents(&mut p, &mut v, &[Vec2::new(1.0, 0.0)], &[Vec2::zero()], 0.1);
    assert!((p[0].x - 0.01).abs() < EPSILON);
}

#[test]
fn should_sum_commanded_and_wind_acceleration() {
    let mut p = vec![Vec2::zero()];
    let mut v = vec![Vec2::zero()];

    integrate_agents(&mut p, &mut v, &[Vec2::new(1.0, 2.0)], &[Vec2::new(-3.0, 0.5)], 0.5);

    assert!((v[0] - Vec2::new(-1.0, 1.25)).norm() < EPSILON);
}

// ============================================================================
// Drag
// ============================================================================

#[test]
fn should_match_quadratic_drag_along_x() {
    let aero = AeroParams::default();
    for a in [0.1, 1.0, 3.7] {
        let acc = aero.drag_acceleration(Vec2::new(a, 0.0));
        let expected = 0.5 * AIR_DENSITY * DRAG_COEFF * REFERENCE_AREA / AGENT_MASS * a * a;
        assert!((acc.x - expected).abs() < EPSILON, "a = {a}");
        assert_eq!(acc.y, 0.0);
    }
}

#[test]
fn should_use_sphere_surface_as_reference_area() {
    let r: f64 = 0.05;
    assert!((REFERENCE_AREA - 4.0 * std::f64::consts::PI * r * r).abs() < EPSILON);
}

#[test]
fn should_drag_along_relative_wind_direction() {
    let aero = AeroParams::default();
    let v_rel = Vec2::new(3.0, -4.0);
    let acc = aero.drag_acceleration(v_rel);

    // parallel and same sense
    assert!((acc.x * v_rel.y - acc.y * v_rel.x).abs() < EPSILON);
    assert!(acc.dot(v_rel) > 0.0);
    assert!((acc.norm() - aero.drag_factor() * 25.0).abs() < 1e-9);
}

#[test]
fn should_scale_drag_inversely_with_mass() {
    let light = AeroParams::default();
    let heavy = AeroParams {
        mass: 2.0 * AGENT_MASS,
        ..AeroParams::default()
    };
    let v_rel = Vec2::new(1.5, 0.0);
    let diff = light.drag_acceleration(v_rel).x - 2.0 * heavy.drag_acceleration(v_rel).x;
    assert!(diff.abs() < EPSILON);
}

// ============================================================================
// Pressure
// ============================================================================

#[test]
fn should_compute_dynamic_and_total_pressure() {
    let aero = AeroParams::default();
    let v_rel = Vec2::new(3.0, 4.0);

    let dynamic = aero.dynamic_pressure(v_rel);
    assert!((dynamic - 0.5 * AIR_DENSITY * 25.0).abs() < EPSILON);
    assert!((aero.total_pressure(v_rel) - (STATIC_PRESSURE + dynamic)).abs() < 1e-9);
}
