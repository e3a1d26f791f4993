//! Tests for spot geometry, scaling and weight masks.

use std::sync::Arc;

use super::*;
use crate::models::{SpotGeometry, SpotPoint};

/// Elliptical spot used by most tests (full resolution).
fn sample_geometry() -> SpotGeometry {
    SpotGeometry {
        x: 400,
        y: 200,
        radius_w: 100,
        radius_h: 60,
        angle: 40.0,
        edge_radius: 20,
        edge_blur: 0.5,
        opacity: 0.8,
    }
}

fn sample_spot() -> ImageSpot {
    ImageSpot::with_geometry(true, sample_geometry())
}

// ========================================================================
// Construction
// ========================================================================

#[test]
fn test_default_spot_is_disabled_and_zeroed() {
    let spot = ImageSpot::default();

    assert!(!spot.is_enabled());
    assert_eq!(spot.pos(), SpotPoint::new(0, 0));
    assert_eq!(spot.radius_w(), 0);
    assert_eq!(spot.radius_h(), 0);
    assert_eq!(spot.edge_radius(), 0);
    assert!((spot.angle() - 0.0).abs() < f32::EPSILON);
    assert_eq!(spot.pipe_size(), PipeSize::FULL);
    // Fully opaque, kept out of the filter by being disabled.
    assert!((spot.opacity() - 1.0).abs() < f32::EPSILON);
    assert!((spot.edge_blur() - 0.0).abs() < f32::EPSILON);

    // A zero-sized spot still covers its center pixel.
    let weights = spot.weights();
    assert_eq!((weights.width(), weights.height()), (1, 1));
    assert_eq!(weights.get(0, 0), WEIGHT_MAX);
}

#[test]
fn test_with_geometry_clamps_out_of_range_values() {
    let spot = ImageSpot::with_geometry(
        true,
        SpotGeometry {
            opacity: 3.0,
            edge_blur: -1.0,
            angle: f32::NAN,
            ..sample_geometry()
        },
    );

    assert!((spot.opacity() - 1.0).abs() < f32::EPSILON);
    assert!((spot.edge_blur() - 0.0).abs() < f32::EPSILON);
    assert!((spot.angle() - 0.0).abs() < f32::EPSILON);
}

// ========================================================================
// Pipe-size scaling
// ========================================================================

#[test]
fn test_accessors_halve_per_pipe_size_level() {
    let mut spot = sample_spot();

    for level in 0..=PipeSize::MAX_LEVEL {
        spot.set_pipe_size(PipeSize::new(level));
        let divisor = 1u32 << level;

        assert_eq!(spot.radius_w(), 100 / divisor, "radius_w at level {}", level);
        assert_eq!(spot.radius_h(), 60 / divisor, "radius_h at level {}", level);
        assert_eq!(spot.edge_radius(), 20 / divisor, "edge_radius at level {}", level);
        assert_eq!(spot.pos(), SpotPoint::new(400 / divisor, 200 / divisor));
        assert!(
            (spot.angle() - 40.0 / divisor as f32).abs() < 1e-6,
            "angle at level {}: {}",
            level,
            spot.angle()
        );
    }
}

#[test]
fn test_scaling_is_not_the_legacy_shift_of_one() {
    // The legacy formula `value * (1 >> level)` yields 0 for every level > 0.
    let mut spot = sample_spot();
    spot.set_pipe_size(PipeSize::new(1));
    assert_ne!(spot.radius_w(), 0);
    assert_eq!(spot.radius_w(), 50);
}

#[test]
fn test_unscaled_accessors_ignore_pipe_size() {
    let mut spot = sample_spot();
    spot.set_pipe_size(PipeSize::new(3));

    assert!((spot.opacity() - 0.8).abs() < f32::EPSILON);
    assert!((spot.edge_blur() - 0.5).abs() < f32::EPSILON);
    assert_eq!(spot.geometry(), sample_geometry());
}

#[test]
fn test_setters_take_current_scale_values() {
    let mut spot = sample_spot();
    spot.set_pipe_size(PipeSize::new(1));

    spot.set_radius_w(30);
    spot.set_radius_h(10);
    spot.set_edge_radius(4);
    spot.set_angle(15.0);
    spot.move_center(50, 60);

    assert_eq!(spot.radius_w(), 30);
    assert_eq!(spot.radius_h(), 10);
    assert_eq!(spot.edge_radius(), 4);
    assert!((spot.angle() - 15.0).abs() < 1e-6);
    assert_eq!(spot.pos(), SpotPoint::new(50, 60));

    let stored = spot.geometry();
    assert_eq!(stored.radius_w, 60);
    assert_eq!(stored.radius_h, 20);
    assert_eq!(stored.edge_radius, 8);
    assert!((stored.angle - 30.0).abs() < 1e-6);
    assert_eq!((stored.x, stored.y), (100, 120));
}

// ========================================================================
// Setter validation
// ========================================================================

#[test]
fn test_set_opacity_clamps_into_unit_range() {
    let mut spot = sample_spot();

    spot.set_opacity(-0.5);
    assert_eq!(spot.opacity(), 0.0);

    spot.set_opacity(1.5);
    assert_eq!(spot.opacity(), 1.0);

    spot.set_opacity(0.5);
    assert_eq!(spot.opacity(), 0.5);
}

#[test]
fn test_non_finite_values_are_ignored() {
    let mut spot = sample_spot();

    spot.set_opacity(f32::NAN);
    spot.set_edge_blur(f32::INFINITY);
    spot.set_angle(f32::NAN);

    assert!((spot.opacity() - 0.8).abs() < f32::EPSILON);
    assert!((spot.edge_blur() - 0.5).abs() < f32::EPSILON);
    assert!((spot.angle() - 40.0).abs() < f32::EPSILON);
}

#[test]
fn test_set_edge_blur_clamps() {
    let mut spot = sample_spot();
    spot.set_edge_blur(2.0);
    assert!((spot.edge_blur() - 1.0).abs() < f32::EPSILON);
    spot.set_edge_blur(-0.3);
    assert!((spot.edge_blur() - 0.0).abs() < f32::EPSILON);
}

#[test]
fn test_set_enabled_keeps_geometry_and_mask() {
    let mut spot = sample_spot();
    let before = spot.weights().clone();

    spot.set_enabled(false);

    assert!(!spot.is_enabled());
    assert_eq!(spot.geometry(), sample_geometry());
    assert_eq!(spot.weights(), &before);
}

// ========================================================================
// Weight mask
// ========================================================================

#[test]
fn test_weight_is_max_at_center() {
    let spot = sample_spot();
    let weights = spot.weights();
    let (cx, cy) = weights.center();

    assert_eq!(weights.get(cx, cy), WEIGHT_MAX);
    assert!((spot.weight_at(400, 200) - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_weight_is_zero_beyond_outer_radius() {
    let spot = sample_spot();
    let weights = spot.weights();
    let (cx, cy) = weights.center();
    let outer = (100 + 20) as f32;

    for y in 0..weights.height() {
        for x in 0..weights.width() {
            let dx = x as f32 - cx as f32;
            let dy = y as f32 - cy as f32;
            if (dx * dx + dy * dy).sqrt() > outer {
                assert_eq!(weights.get(x, y), 0, "non-zero weight at ({}, {})", x, y);
            }
        }
    }

    // Outside the matrix entirely.
    assert_eq!(spot.weight_at(0, 0), 0.0);
    assert_eq!(spot.weight_at(-5, 10_000), 0.0);
}

#[test]
fn test_weight_is_monotonic_along_axis_rays() {
    let spot = ImageSpot::with_geometry(
        true,
        SpotGeometry {
            radius_w: 30,
            radius_h: 15,
            edge_radius: 10,
            edge_blur: 0.5,
            ..SpotGeometry::circle(100, 100, 0, 0)
        },
    );
    let weights = spot.weights();
    let (cx, cy) = weights.center();

    let mut prev = weights.get(cx, cy);
    for x in cx..weights.width() {
        let w = weights.get(x, cy);
        assert!(w <= prev, "horizontal ray not monotonic at x={}: {} > {}", x, w, prev);
        prev = w;
    }

    let mut prev = weights.get(cx, cy);
    for y in (0..=cy).rev() {
        let w = weights.get(cx, y);
        assert!(w <= prev, "vertical ray not monotonic at y={}: {} > {}", y, w, prev);
        prev = w;
    }

    // Core reaches exactly the radius, the band ends at radius + edge.
    assert_eq!(weights.get(cx + 30, cy), WEIGHT_MAX);
    assert!(weights.get(cx + 35, cy) > 0);
    assert!(weights.get(cx + 35, cy) < WEIGHT_MAX);
    assert_eq!(weights.get(cx + 40, cy), 0);
}

#[test]
fn test_weight_is_monotonic_along_diagonal_of_rotated_spot() {
    let spot = sample_spot();
    let weights = spot.weights();
    let (cx, cy) = weights.center();

    let mut prev = weights.get(cx, cy);
    let mut k = 0;
    while cx + k < weights.width() && cy + k < weights.height() {
        let w = weights.get(cx + k, cy + k);
        assert!(w <= prev, "diagonal ray not monotonic at k={}: {} > {}", k, w, prev);
        prev = w;
        k += 1;
    }
}

#[test]
fn test_zero_edge_radius_gives_hard_edge() {
    let spot = ImageSpot::with_geometry(true, SpotGeometry::circle(50, 50, 12, 0));
    for &w in spot.weights().data() {
        assert!(w == 0 || w == WEIGHT_MAX, "unexpected partial weight {}", w);
    }
}

#[test]
fn test_edge_blur_changes_band_shape_only() {
    let mut linear = ImageSpot::with_geometry(true, SpotGeometry::circle(50, 50, 10, 10));
    linear.set_edge_blur(0.0);
    let mut smooth = linear.clone();
    smooth.set_edge_blur(1.0);

    let (cx, cy) = linear.weights().center();
    // Same core, same zero region.
    assert_eq!(linear.weights().get(cx + 10, cy), smooth.weights().get(cx + 10, cy));
    assert_eq!(linear.weights().get(cx + 20, cy), 0);
    assert_eq!(smooth.weights().get(cx + 20, cy), 0);
    // Smootherstep stays above the linear ramp in the inner half of the band.
    assert!(smooth.weights().get(cx + 13, cy) > linear.weights().get(cx + 13, cy));
}

#[test]
fn test_rotation_by_90_degrees_swaps_bounding_box() {
    let mut spot = ImageSpot::with_geometry(
        true,
        SpotGeometry {
            radius_w: 20,
            radius_h: 5,
            ..SpotGeometry::circle(100, 100, 0, 0)
        },
    );
    assert_eq!((spot.weights().width(), spot.weights().height()), (41, 11));

    spot.set_angle(90.0);
    assert_eq!((spot.weights().width(), spot.weights().height()), (11, 41));
}

#[test]
fn test_mask_regenerates_on_geometry_change() {
    let mut spot = sample_spot();
    let before = spot.weights().clone();

    spot.set_radius_w(10);
    assert_ne!(spot.weights(), &before);

    let before = spot.weights().clone();
    spot.set_edge_radius(2);
    assert_ne!(spot.weights(), &before);
}

#[test]
fn test_mask_regenerates_on_pipe_size_change() {
    let mut spot = ImageSpot::with_geometry(true, SpotGeometry::circle(100, 100, 40, 8));
    assert_eq!(spot.weights().width(), 2 * 48 + 1);

    spot.set_pipe_size(PipeSize::new(1));
    assert_eq!(spot.weights().width(), 2 * 24 + 1);

    spot.set_pipe_size(PipeSize::new(2));
    assert_eq!(spot.weights().width(), 2 * 12 + 1);

    // Back to full size yields the original mask.
    spot.set_pipe_size(PipeSize::FULL);
    let fresh = ImageSpot::with_geometry(true, SpotGeometry::circle(100, 100, 40, 8));
    assert_eq!(spot.weights(), fresh.weights());
}

#[test]
fn test_bounding_box_is_centered_on_position() {
    let spot = ImageSpot::with_geometry(true, SpotGeometry::circle(100, 80, 10, 5));
    let (left, top, width, height) = spot.bounding_box();
    assert_eq!((left, top), (85, 65));
    assert_eq!((width, height), (31, 31));
}

#[test]
fn test_smootherstep_boundaries_and_midpoint() {
    assert!((smootherstep(0.0) - 0.0).abs() < f32::EPSILON);
    assert!((smootherstep(1.0) - 1.0).abs() < f32::EPSILON);
    assert!((smootherstep(0.5) - 0.5).abs() < f32::EPSILON);
    assert!((smootherstep(-1.0) - 0.0).abs() < f32::EPSILON);
}

// ========================================================================
// Persistence
// ========================================================================

#[test]
fn test_ini_round_trip_preserves_full_resolution_values() {
    let mut spot = sample_spot();
    spot.set_pipe_size(PipeSize::new(2));

    let mut ini = IniSettings::new();
    spot.write_to_ini(&mut ini);

    assert_eq!(ini.value("RadiusW"), Some(&ConfigValue::Int(100)));

    let loaded = ImageSpot::from_ini(&ini);
    assert!(loaded.is_enabled());
    assert_eq!(loaded.geometry(), sample_geometry());
    assert_eq!(loaded.pipe_size(), PipeSize::FULL);
}

#[test]
fn test_from_ini_falls_back_on_missing_or_malformed_keys() {
    let mut ini = IniSettings::new();
    ini.set_value("PosX", "not a number");
    ini.set_value("RadiusW", -4i64);
    ini.set_value("Opacity", 7.5f32);

    let spot = ImageSpot::from_ini(&ini);

    assert!(!spot.is_enabled());
    assert_eq!(spot.geometry().x, 0);
    assert_eq!(spot.geometry().radius_w, 0);
    assert!((spot.opacity() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_from_ini_caps_huge_lengths() {
    let mut ini = IniSettings::new();
    ini.set_value("Enabled", true);
    ini.set_value("RadiusW", 3_000_000_000u32);
    ini.set_value("RadiusH", 3_000_000_000u32);
    ini.set_value("EdgeRadius", 3_000_000_000u32);

    let mut spot = ImageSpot::from_ini(&ini);

    let geometry = spot.geometry();
    assert_eq!(geometry.radius_w, MAX_LENGTH);
    assert_eq!(geometry.radius_h, MAX_LENGTH);
    assert_eq!(geometry.edge_radius, MAX_LENGTH);
    // Too large to allocate at 1:1, so the mask stays empty.
    assert!(spot.weights().is_empty());
    assert_eq!(spot.weight_at(0, 0), 0.0);

    // Smaller pipe sizes bring it back within budget.
    spot.set_pipe_size(PipeSize::new(PipeSize::MAX_LEVEL));
    assert!(!spot.weights().is_empty());
    let (cx, cy) = spot.weights().center();
    assert_eq!(spot.weights().get(cx, cy), WEIGHT_MAX);
}

#[test]
fn test_setters_cap_lengths() {
    let mut spot = sample_spot();
    spot.set_pipe_size(PipeSize::new(1));
    spot.set_radius_w(u32::MAX);
    spot.set_edge_radius(u32::MAX);

    assert_eq!(spot.geometry().radius_w, MAX_LENGTH);
    assert_eq!(spot.geometry().edge_radius, MAX_LENGTH);
    assert_eq!(spot.radius_w(), MAX_LENGTH / 2);
}

#[test]
fn test_oversized_mask_shape_leaves_matrix_empty() {
    let mut weights = sample_spot().weights().clone();
    assert!(!weights.is_empty());

    weights.regenerate(&MaskShape {
        radius_w: f32::MAX,
        radius_h: 1.0e9,
        angle: 30.0,
        edge_radius: 1.0e9,
        edge_blur: 0.0,
    });

    assert!(weights.is_empty());
    assert_eq!((weights.width(), weights.height()), (0, 0));
    assert_eq!(weights.get(0, 0), 0);
}

#[test]
fn test_spot_from_ini_dispatches_on_kind() {
    let catalog = Arc::new(ConfigCatalog::tuning_spot_defaults());

    let mut ini = IniSettings::new();
    ini.set_value(KEY_KIND, "repair");
    assert_eq!(spot_from_ini(&ini, &catalog).kind(), SpotKind::Repair);

    ini.set_value(KEY_KIND, "tuning");
    let spot = spot_from_ini(&ini, &catalog);
    assert_eq!(spot.kind(), SpotKind::Tuning);
    assert!(spot.as_tuning().is_some());

    ini.set_value(KEY_KIND, "mystery");
    assert_eq!(spot_from_ini(&ini, &catalog).kind(), SpotKind::Image);
}

// ========================================================================
// Repair spots
// ========================================================================

#[test]
fn test_repair_spot_set_pos_moves_repairer() {
    let base = ImageSpot::with_geometry(true, SpotGeometry::circle(100, 100, 10, 2));
    let mut spot = RepairSpot::new(base, SpotPoint::new(300, 50));

    spot.set_pos(120, 90);

    assert_eq!(spot.base().pos(), SpotPoint::new(120, 90));
    assert_eq!(spot.repairer(), SpotPoint::new(320, 40));
}

#[test]
fn test_repair_spot_set_pos_at_reduced_pipe_size() {
    let base = ImageSpot::with_geometry(true, SpotGeometry::circle(100, 100, 10, 2));
    let mut spot = RepairSpot::new(base, SpotPoint::new(300, 60));
    spot.set_pipe_size(PipeSize::new(1));

    assert_eq!(spot.repairer(), SpotPoint::new(150, 30));
    spot.set_pos(60, 40);

    assert_eq!(spot.base().geometry().x, 120);
    assert_eq!(spot.repairer(), SpotPoint::new(160, 20));
}

#[test]
fn test_base_set_pos_moves_only_center() {
    let mut spot = sample_spot();
    Spot::set_pos(&mut spot, 10, 20);
    assert_eq!(spot.pos(), SpotPoint::new(10, 20));
    assert_eq!(spot.radius_w(), 100);
}

#[test]
fn test_repair_spot_ini_round_trip() {
    let base = ImageSpot::with_geometry(true, SpotGeometry::circle(10, 20, 5, 1));
    let spot = RepairSpot::new(base, SpotPoint::new(70, 80));

    let mut ini = IniSettings::new();
    spot.write_to_ini(&mut ini);
    let loaded = RepairSpot::from_ini(&ini);

    assert_eq!(loaded, spot);
}
