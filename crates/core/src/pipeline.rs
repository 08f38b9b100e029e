//! End-to-end generation: observation in, script out
//!
//! Runs the stages in their fixed order: map the wind, apply the moisture composer
//! and then the pressure composer (when an atmosphere is supplied), derive the hue
//! shift from the climate anomaly, and build the scene.

use crate::climate::{ClimateAnomaly, DEFAULT_MAX_SWING_DEGREES};
use crate::compose::{apply_moisture_puffiness, apply_pressure_clumping};
use crate::core_types::observation::{NoaaAtmosphere, WindObservation};
use crate::error::Result;
use crate::flow::{map_wind_to_flow, FlowParameters};
use crate::scene::{build_with_rng, Layout, SceneOptions};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inputs for one generated scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneRequest {
    pub wind: WindObservation,
    pub atmosphere: Option<NoaaAtmosphere>,
    pub climate: Option<ClimateAnomaly>,
    /// Hue swing at an anomaly of ±1, degrees
    pub climate_swing_degrees: f32,
    pub options: SceneOptions,
}

impl Default for SceneRequest {
    fn default() -> Self {
        Self {
            wind: WindObservation::default(),
            atmosphere: None,
            climate: None,
            climate_swing_degrees: DEFAULT_MAX_SWING_DEGREES,
            options: SceneOptions::default(),
        }
    }
}

impl SceneRequest {
    /// Request for `wind` with default options and no secondary signals
    pub fn new(wind: WindObservation) -> Self {
        Self {
            wind,
            ..Self::default()
        }
    }
}

/// Result of [`generate_script`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedScene {
    /// Flow parameters after every composer ran
    pub flow: FlowParameters,
    /// Hue rotation applied to the instance colors
    pub hue_shift: f32,
    /// Seed written into the script
    pub seed: u32,
    /// `EisenScript` text
    pub text: String,
}

/// Final flow parameters for `request`, before any scene options apply.
///
/// # Errors
/// Propagates `InvalidInput` from the mapper and composers.
pub fn compose_flow(request: &SceneRequest) -> Result<FlowParameters> {
    let flow = map_wind_to_flow(&request.wind)?;
    let Some(atmosphere) = &request.atmosphere else {
        return Ok(flow);
    };
    let flow = apply_moisture_puffiness(&flow, atmosphere)?;
    apply_pressure_clumping(&flow, atmosphere)
}

/// Run the whole pipeline, drawing a seed from `rng` if the options carry none.
///
/// A climate anomaly replaces `options.hue_shift`; its tag is used as provenance
/// unless the options already name one.
///
/// # Errors
/// Propagates `InvalidInput` from any stage.
pub fn generate_script_with_rng<R: Rng>(
    request: &SceneRequest,
    rng: &mut R,
) -> Result<GeneratedScene> {
    let flow = compose_flow(request)?;

    let mut options = request.options.clone();
    if let Some(climate) = &request.climate {
        options.hue_shift = Some(climate.hue_shift(request.climate_swing_degrees));
        if options.provenance_tag.is_none() {
            options.provenance_tag.clone_from(&climate.tag);
        }
    }
    let hue_shift = options.hue_shift.unwrap_or(0.0);

    let scene = build_with_rng(&flow, &options, rng)?;
    debug!(
        clumps = flow.clump_count(),
        spike_radius = flow.spike_radius(),
        hue_shift,
        seed = scene.seed,
        "generated scene"
    );
    Ok(GeneratedScene {
        flow,
        hue_shift,
        seed: scene.seed,
        text: scene.text,
    })
}

/// Run the whole pipeline with the thread RNG.
///
/// # Errors
/// Propagates `InvalidInput` from any stage.
pub fn generate_script(request: &SceneRequest) -> Result<GeneratedScene> {
    generate_script_with_rng(request, &mut rand::rng())
}

// ============================================================================
// Demo scenarios
// ============================================================================

/// A canned observation covering one wind band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoScenario {
    pub name: &'static str,
    pub speed_mps: f32,
    pub direction_degrees: f32,
    pub layout: Layout,
    pub seed: u32,
}

/// One scenario per band, alternating layouts
pub const DEMO_SCENARIOS: [DemoScenario; 4] = [
    DemoScenario {
        name: "calm",
        speed_mps: 0.8,
        direction_degrees: 35.0,
        layout: Layout::Ring,
        seed: 11,
    },
    DemoScenario {
        name: "breeze",
        speed_mps: 4.2,
        direction_degrees: 120.0,
        layout: Layout::Tower,
        seed: 12,
    },
    DemoScenario {
        name: "fresh",
        speed_mps: 8.7,
        direction_degrees: 205.0,
        layout: Layout::Ring,
        seed: 13,
    },
    DemoScenario {
        name: "gale",
        speed_mps: 18.0,
        direction_degrees: 315.0,
        layout: Layout::Tower,
        seed: 14,
    },
];

impl DemoScenario {
    /// Look a scenario up by name, ignoring case
    pub fn find(name: &str) -> Option<&'static DemoScenario> {
        let name = name.trim();
        DEMO_SCENARIOS
            .iter()
            .find(|scenario| scenario.name.eq_ignore_ascii_case(name))
    }

    /// Output file stem, e.g. `calm_demo_ring`
    pub fn file_stem(&self) -> String {
        format!("{}_demo_{}", self.name, self.layout)
    }

    /// Fully seeded request for this scenario
    pub fn request(&self) -> SceneRequest {
        SceneRequest {
            wind: WindObservation::metric(self.speed_mps, self.direction_degrees),
            options: SceneOptions {
                layout: self.layout,
                seed: Some(self.seed),
                ..SceneOptions::default()
            },
            ..SceneRequest::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Hectopascals, Percent};
    use crate::error::WindClumpError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_demo_file_stems() {
        let stems: Vec<String> = DEMO_SCENARIOS.iter().map(DemoScenario::file_stem).collect();
        assert_eq!(
            stems,
            vec![
                "calm_demo_ring",
                "breeze_demo_tower",
                "fresh_demo_ring",
                "gale_demo_tower"
            ]
        );
        assert_eq!(DemoScenario::find("GALE").map(|s| s.seed), Some(14));
        assert!(DemoScenario::find("hurricane").is_none());
    }

    #[test]
    fn test_demo_requests_are_deterministic() {
        for scenario in &DEMO_SCENARIOS {
            let first = generate_script(&scenario.request()).unwrap();
            let second = generate_script(&scenario.request()).unwrap();
            assert_eq!(first.text, second.text);
            assert_eq!(first.seed, scenario.seed);
        }
    }

    #[test]
    fn test_atmosphere_runs_both_composers() {
        let plain = SceneRequest::new(WindObservation::metric(6.0, 45.0));
        let stormy = SceneRequest {
            atmosphere: Some(NoaaAtmosphere {
                barometric_pressure: Some(Hectopascals::new(970.0)),
                humidity: Some(Percent::new(90.0)),
                ..NoaaAtmosphere::default()
            }),
            ..plain.clone()
        };
        let plain = compose_flow(&plain).unwrap();
        let stormy = compose_flow(&stormy).unwrap();
        assert!(stormy.spike_radius() > plain.spike_radius());
        assert!(stormy.clump_count() > plain.clump_count());
    }

    #[test]
    fn test_climate_sets_hue_and_tag() {
        let request = SceneRequest {
            climate: Some(ClimateAnomaly::new(-0.5, Some("CHIRPS".to_string()))),
            climate_swing_degrees: 30.0,
            ..SceneRequest::new(WindObservation::metric(3.0, 10.0))
        };
        let scene = generate_script_with_rng(&request, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(scene.hue_shift, -15.0);
        assert!(scene.text.contains("// Climate: CHIRPS (hue shift -15.000 deg)"));
    }

    #[test]
    fn test_errors_propagate() {
        let request = SceneRequest::new(WindObservation::metric(-1.0, 10.0));
        assert!(matches!(
            generate_script(&request),
            Err(WindClumpError::InvalidInput { field: "speed", .. })
        ));
    }
}
