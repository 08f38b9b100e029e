//! Rule templates for the spike, clump and scene rules
//!
//! Every number in the emitted rules is derived from [`FlowParameters`] plus the
//! hue shift; nothing here is random. Seeds only reach Structure Synth through the
//! `set seed` directive, where they pick between the weighted spike variants.

use super::grammar::{Call, ColorOp, Primitive, RuleDef, Transform, TransformLoop};
use super::Layout;
use crate::core_types::units::Degrees;
use crate::flow::FlowParameters;

pub(crate) const SPIKE_RULE: &str = "spike";
pub(crate) const CLUMP_RULE: &str = "clump";
pub(crate) const SCENE_RULE: &str = "scene";

// ============================================================================
// Spike
// ============================================================================

/// Box segments per spike (rule-local recursion limit)
pub const SPIKE_SEGMENTS: u32 = 8;

/// Per-segment thickness falloff
pub const SPIKE_TAPER: f32 = 0.82;

/// Per-segment bend of the curved variants, degrees
const SPIKE_BEND_DEGREES: f32 = 6.0;

/// Per-segment hue drift of the curved variants, degrees
const SPIKE_HUE_DRIFT: f32 = 4.0;

/// Weight of each curved variant relative to the straight one
const SPIKE_BENT_WEIGHT: f32 = 2.0;

/// Upward tilt of every spike out of the horizontal fan, degrees
const SPIKE_ELEVATION_DEGREES: f32 = 45.0;

/// Three weighted definitions of the tapering spike: straight, bent up, bent down.
pub(crate) fn spike_rules(flow: &FlowParameters) -> Vec<RuleDef> {
    let segment = flow.spike_height() / SPIKE_SEGMENTS as f32;
    let radius = flow.spike_radius();

    let variant = |bend: f32, drift: f32| {
        let mut step = Vec::with_capacity(3);
        step.push(Transform::Z(segment));
        if bend != 0.0 {
            step.push(Transform::Rx(bend));
        }
        step.push(Transform::Scale(SPIKE_TAPER, SPIKE_TAPER, 1.0));

        let recurse = Call::rule(SPIKE_RULE).with_transforms(step);
        let recurse = if drift == 0.0 {
            recurse
        } else {
            recurse.with_paint(vec![ColorOp::Hue(drift)])
        };

        RuleDef::new(
            SPIKE_RULE,
            vec![
                Call::primitive(Primitive::Box)
                    .with_transforms(vec![Transform::Scale(radius, radius, segment)]),
                recurse,
            ],
        )
        .with_max_depth(SPIKE_SEGMENTS)
    };

    vec![
        variant(0.0, 0.0).with_comment("Tapering spike: straight, bent up, bent down"),
        variant(SPIKE_BEND_DEGREES, SPIKE_HUE_DRIFT).with_weight(SPIKE_BENT_WEIGHT),
        variant(-SPIKE_BEND_DEGREES, -SPIKE_HUE_DRIFT).with_weight(SPIKE_BENT_WEIGHT),
    ]
}

// ============================================================================
// Clump
// ============================================================================

/// Depth of the shrinking inner echo of each clump
pub const CLUMP_ECHO_DEPTH: u32 = 2;

/// Scale of the inner echo relative to its parent
const CLUMP_ECHO_SCALE: f32 = 0.6;

/// Fan of spikes across `spread` degrees plus a twisted, shrinking echo.
pub(crate) fn clump_rule(flow: &FlowParameters) -> RuleDef {
    let spikes = flow.spikes_per_clump();
    let fan_step = flow.spread() / spikes as f32;
    let twist_step = flow.twist_degrees() / spikes as f32;
    // Center the fan: instances land at start + k * step for k in 0..spikes
    let fan_start = -flow.spread() / 2.0 + fan_step / 2.0;

    let fan = Call::rule(SPIKE_RULE)
        .with_transforms(vec![Transform::Ry(fan_start)])
        .with_loop(TransformLoop::repeat(
            spikes,
            vec![Transform::Ry(fan_step), Transform::Rz(twist_step)],
        ))
        .with_transforms(vec![Transform::Rx(-SPIKE_ELEVATION_DEGREES)]);

    let echo = Call::rule(CLUMP_RULE).with_transforms(vec![
        Transform::Ry(flow.twist_degrees()),
        Transform::Scale(CLUMP_ECHO_SCALE, CLUMP_ECHO_SCALE, CLUMP_ECHO_SCALE),
    ]);

    RuleDef::new(CLUMP_RULE, vec![fan, echo])
        .with_max_depth(CLUMP_ECHO_DEPTH)
        .with_comment("Clump: fanned spikes with a twisted inner echo")
}

// ============================================================================
// Scene
// ============================================================================

/// Hue range spread across the clump instances, degrees
pub const CLUMP_HUE_SPAN: f32 = 30.0;

const CLUMP_SATURATION: f32 = 0.85;
const CLUMP_BRIGHTNESS: f32 = 0.95;

/// Vertical spacing of tower levels, in clump heights
pub const TOWER_PITCH: f32 = 1.4;

/// Fraction of `twist_degrees` each tower level turns by
pub const TOWER_TWIST_FRACTION: f32 = 0.5;

/// Lean of a tower level relative to its turn
const TOWER_LEAN_FRACTION: f32 = 0.1;

/// Lean never tips a level past this angle, degrees
const TOWER_LEAN_LIMIT: f32 = 30.0;

/// Color block for instance `index` of `count`.
fn instance_paint(base_hue: f32, hue_shift: f32, index: u32, count: u32) -> Vec<ColorOp> {
    let hue = Degrees::new(base_hue + hue_shift + index as f32 * CLUMP_HUE_SPAN / count as f32)
        .normalized()
        .value();
    // Anything that would print as 360.000 folds to 0
    let hue = if hue >= 360.0 - 0.0005 { 0.0 } else { hue };
    vec![
        ColorOp::Hue(hue),
        ColorOp::Sat(CLUMP_SATURATION),
        ColorOp::Brightness(CLUMP_BRIGHTNESS),
    ]
}

/// Geometry block for instance `index` of `count` in `layout`.
fn instance_transforms(
    flow: &FlowParameters,
    layout: Layout,
    direction: f32,
    index: u32,
    count: u32,
) -> Vec<Transform> {
    let twist = flow.twist_degrees();
    let i = index as f32;
    match layout {
        Layout::Ring => {
            let angle = (direction + i * 360.0 / count as f32).rem_euclid(360.0);
            vec![
                Transform::Ry(angle),
                Transform::X(flow.clump_radius()),
                Transform::Rz(twist),
            ]
        }
        Layout::Tower => {
            let turn = i * TOWER_TWIST_FRACTION * twist;
            let lean = (turn * TOWER_LEAN_FRACTION).clamp(-TOWER_LEAN_LIMIT, TOWER_LEAN_LIMIT);
            vec![
                Transform::Y(i * TOWER_PITCH * flow.clump_height()),
                Transform::Ry(direction + turn),
                Transform::Rz(lean),
            ]
        }
    }
}

/// The start rule: `clump_count` clump instances arranged by `layout`.
pub(crate) fn scene_rule(flow: &FlowParameters, layout: Layout, hue_shift: f32) -> RuleDef {
    let count = flow.clump_count();
    let direction = flow.wind_direction().map_or(0.0, |direction| *direction);

    let body = (0..count)
        .map(|index| {
            Call::rule(CLUMP_RULE)
                .with_transforms(instance_transforms(flow, layout, direction, index, count))
                .with_paint(instance_paint(direction, hue_shift, index, count))
        })
        .collect();

    RuleDef::new(SCENE_RULE, body).with_comment(match layout {
        Layout::Ring => "Scene: clumps on a ring facing downwind",
        Layout::Tower => "Scene: clumps stacked into a twisting tower",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::MetersPerSecond;
    use crate::flow::{FlowShape, FlowSource};
    use crate::scene::grammar::Target;

    fn flow(clump_count: u32, twist_degrees: f32, direction: Option<f32>) -> FlowParameters {
        FlowParameters::new(
            FlowShape {
                clump_count,
                spikes_per_clump: 12,
                spike_height: 1.6,
                spike_radius: 0.2,
                twist_degrees,
                spread: 120.0,
                clump_radius: 2.0,
                clump_height: 1.0,
            },
            FlowSource {
                wind_speed: MetersPerSecond::new(5.0),
                wind_direction: direction.map(Degrees::new),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_spike_variants() {
        let rules = spike_rules(&flow(4, 10.0, None));
        assert_eq!(rules.len(), 3);
        assert!(rules.iter().all(|rule| rule.name == SPIKE_RULE));
        assert!(rules
            .iter()
            .all(|rule| rule.max_depth == Some(SPIKE_SEGMENTS)));
        assert_eq!(rules[0].weight, None);
        assert_eq!(rules[1].weight, Some(SPIKE_BENT_WEIGHT));
        assert_eq!(
            rules[0].body[0].loops[0].transforms,
            vec![Transform::Scale(0.2, 0.2, 0.2)]
        );
    }

    #[test]
    fn test_clump_fans_every_spike() {
        let rule = clump_rule(&flow(4, 24.0, None));
        let fan = &rule.body[0];
        assert_eq!(fan.loops[1].count, 12);
        assert_eq!(
            fan.loops[1].transforms,
            vec![Transform::Ry(10.0), Transform::Rz(2.0)]
        );
        assert_eq!(fan.loops[0].transforms, vec![Transform::Ry(-55.0)]);
        assert_eq!(rule.body[1].target, Target::Rule(CLUMP_RULE.to_string()));
    }

    #[test]
    fn test_ring_instances_start_at_direction() {
        let rule = scene_rule(&flow(4, 8.0, Some(90.0)), Layout::Ring, 0.0);
        assert_eq!(rule.body.len(), 4);
        let angles: Vec<Transform> = rule
            .body
            .iter()
            .map(|call| call.loops[0].transforms[0])
            .collect();
        assert_eq!(
            angles,
            vec![
                Transform::Ry(90.0),
                Transform::Ry(180.0),
                Transform::Ry(270.0),
                Transform::Ry(0.0)
            ]
        );
    }

    #[test]
    fn test_tower_rises_and_turns() {
        let rule = scene_rule(&flow(3, 40.0, Some(0.0)), Layout::Tower, 0.0);
        let top = &rule.body[2].loops[0].transforms;
        assert_eq!(top[0], Transform::Y(2.0 * TOWER_PITCH));
        assert_eq!(top[1], Transform::Ry(40.0));
        assert_eq!(top[2], Transform::Rz(4.0));
    }

    #[test]
    fn test_instance_hue_wraps() {
        let paint = instance_paint(350.0, 20.0, 0, 4);
        assert_eq!(paint[0], ColorOp::Hue(10.0));
        let paint = instance_paint(0.0, -10.0, 2, 4);
        assert_eq!(paint[0], ColorOp::Hue(5.0));
    }

    #[test]
    fn test_instance_hue_never_reaches_360() {
        for shift in [-1e-7, -1e-4, 359.9999, -0.0] {
            let paint = instance_paint(0.0, shift, 0, 4);
            assert_eq!(paint[0].to_string(), "hue 0.000");
        }
        let paint = instance_paint(0.0, -0.001, 0, 4);
        assert_eq!(paint[0].to_string(), "hue 359.999");
    }
}
