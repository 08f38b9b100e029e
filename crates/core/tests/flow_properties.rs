//! Properties of the wind-to-flow mapping across the whole speed range
//!
//! Sweeps speeds from dead calm to well past the top band and checks that the
//! banded geometry behaves: monotonic, continuous at band edges, clamped at the
//! ends, and independent of the unit system the speed arrived in.

mod common;

use approx::assert_relative_eq;
use wind_clump_core::core_types::units::Degrees;
use wind_clump_core::flow::{map_wind_to_flow, FlowParameters, BANDS};
use wind_clump_core::{UnitSystem, WindObservation};

/// Slack for float rounding where two lerp segments meet
const EDGE_SLACK: f32 = 1e-4;

fn flow_at(speed: f32) -> FlowParameters {
    map_wind_to_flow(&WindObservation::metric(speed, 90.0)).unwrap()
}

fn speed_sweep() -> impl Iterator<Item = f32> {
    (0..=250).map(|step| step as f32 * 0.1)
}

#[test]
fn test_geometry_is_monotonic_in_speed() {
    let mut previous = flow_at(0.0);
    for speed in speed_sweep().skip(1) {
        let current = flow_at(speed);

        assert!(
            current.clump_count() >= previous.clump_count(),
            "clump_count dropped at {speed} m/s"
        );
        assert!(
            current.spikes_per_clump() >= previous.spikes_per_clump(),
            "spikes_per_clump dropped at {speed} m/s"
        );
        assert!(current.spike_height() >= previous.spike_height() - EDGE_SLACK);
        assert!(current.twist_degrees().abs() >= previous.twist_degrees().abs() - EDGE_SLACK);
        assert!(current.spread() >= previous.spread() - EDGE_SLACK);
        assert!(current.clump_radius() >= previous.clump_radius() - EDGE_SLACK);
        assert!(
            current.spike_radius() <= previous.spike_radius() + EDGE_SLACK,
            "spike_radius grew at {speed} m/s"
        );

        previous = current;
    }
}

#[test]
fn test_band_edges_are_continuous() {
    for band in &BANDS {
        let edge = *band.min_speed;
        let below = flow_at(edge - 1e-3);
        let at = flow_at(edge);

        assert!(below.clump_count().abs_diff(at.clump_count()) <= 1);
        assert!(below.spikes_per_clump().abs_diff(at.spikes_per_clump()) <= 1);
        assert_relative_eq!(below.spike_height(), at.spike_height(), max_relative = 0.01);
        assert_relative_eq!(below.spike_radius(), at.spike_radius(), max_relative = 0.01);
        assert_relative_eq!(below.spread(), at.spread(), max_relative = 0.01);
        assert!((below.twist_degrees() - at.twist_degrees()).abs() < 0.1);
    }
}

#[test]
fn test_band_anchors_are_hit_exactly() {
    for band in &BANDS {
        let flow = flow_at(*band.min_speed);
        assert_eq!(flow.clump_count(), band.target.clump_count);
        assert_eq!(flow.spikes_per_clump(), band.target.spikes_per_clump);
        assert_relative_eq!(flow.spike_radius(), band.target.spike_radius);
        assert_relative_eq!(flow.twist_degrees(), band.target.twist_degrees);
    }
}

#[test]
fn test_clamping_is_idempotent() {
    let top = BANDS[BANDS.len() - 1];
    let at_top = flow_at(*top.min_speed);
    for speed in [17.2, 25.0, 60.0, 500.0, f32::MAX] {
        assert_eq!(flow_at(speed).shape(), at_top.shape());
    }

    let bottom = BANDS[0];
    let at_bottom = flow_at(*bottom.min_speed);
    for speed in [0.0, 0.5, 1.0, 1.5] {
        assert_eq!(flow_at(speed).shape(), at_bottom.shape());
    }
}

#[test]
fn test_direction_only_touches_twist_sign() {
    let east = map_wind_to_flow(&WindObservation::metric(12.0, 45.0)).unwrap();
    let west = map_wind_to_flow(&WindObservation::metric(12.0, 225.0)).unwrap();
    let unknown = map_wind_to_flow(&WindObservation::new(12.0, None, UnitSystem::Metric)).unwrap();

    assert!(east.twist_degrees() > 0.0);
    assert_eq!(west.twist_degrees(), -east.twist_degrees());
    assert_eq!(unknown.twist_degrees(), east.twist_degrees());
    assert_eq!(east.clump_count(), west.clump_count());
    assert_eq!(east.spread(), west.spread());
    assert_eq!(east.spike_radius(), west.spike_radius());
}

#[test]
fn test_imperial_matches_metric() {
    for mph in [2.0_f32, 9.0, 15.0, 30.0, 45.0] {
        let imperial = map_wind_to_flow(&WindObservation::new(
            mph,
            Some(Degrees::new(120.0)),
            UnitSystem::Imperial,
        ))
        .unwrap();
        let metric = map_wind_to_flow(&WindObservation::metric(mph * 0.44704, 120.0)).unwrap();

        assert_eq!(imperial.clump_count(), metric.clump_count());
        assert_eq!(imperial.spikes_per_clump(), metric.spikes_per_clump());
        assert_relative_eq!(imperial.spike_height(), metric.spike_height(), max_relative = 1e-5);
        assert_relative_eq!(imperial.spread(), metric.spread(), max_relative = 1e-5);
        assert_relative_eq!(*imperial.wind_speed(), *metric.wind_speed(), max_relative = 1e-6);
    }
}

#[test]
fn test_standard_and_metric_agree() {
    let standard = map_wind_to_flow(&WindObservation::new(
        7.5,
        Some(Degrees::new(300.0)),
        UnitSystem::Standard,
    ))
    .unwrap();
    let metric = map_wind_to_flow(&WindObservation::metric(7.5, 300.0)).unwrap();
    assert_eq!(standard, metric);
}
