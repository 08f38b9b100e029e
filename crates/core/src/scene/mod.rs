//! Scene builder: turns final flow parameters into a Structure Synth `EisenScript`
//!
//! The script is assembled as a [`grammar::Script`] and serialized by
//! [`serialize::render`]. Output is a pure function of the flow parameters, the
//! options, and the seed; when no seed is given one is drawn from the supplied RNG
//! and recorded in the `set seed` line so the scene can be reproduced.
//!
//! ```
//! use wind_clump_core::core_types::WindObservation;
//! use wind_clump_core::flow::map_wind_to_flow;
//! use wind_clump_core::scene::{build, Layout, SceneOptions};
//!
//! let flow = map_wind_to_flow(&WindObservation::metric(6.0, 90.0)).unwrap();
//! let options = SceneOptions {
//!     layout: Layout::Tower,
//!     seed: Some(7),
//!     ..SceneOptions::default()
//! };
//! let script = build(&flow, &options).unwrap();
//! assert!(script.contains("set seed 7"));
//! assert!(script.contains("rule scene"));
//! ```

pub mod grammar;
pub mod serialize;
pub mod templates;

use crate::error::{Result, WindClumpError};
use crate::flow::{bands, FlowParameters};
use grammar::{Call, Script, Setting, Statement};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serialize::{number, render};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Largest seed drawn when none is supplied (seeds stay within a signed 32-bit range)
pub const MAX_SEED: u32 = i32::MAX as u32;

/// Default recursion limit
pub const DEFAULT_MAX_DEPTH: u32 = 60;

/// Default object budget
pub const DEFAULT_MAX_OBJECTS: u32 = 300_000;

/// Default background color
pub const DEFAULT_BACKGROUND: &str = "#000000";

/// Arrangement of clump instances in the scene rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Clumps spaced around a circle, starting at the wind direction
    #[default]
    Ring,
    /// Clumps stacked vertically with cumulative twist
    Tower,
}

impl Layout {
    pub const ALL: [Layout; 2] = [Layout::Ring, Layout::Tower];

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Ring => "ring",
            Layout::Tower => "tower",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = WindClumpError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Layout::ALL
            .into_iter()
            .find(|layout| layout.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| WindClumpError::InvalidLayout(name.to_string()))
    }
}

/// Everything about the output that does not come from the weather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    pub layout: Layout,
    /// Global recursion limit (`set maxdepth`), must be at least 1
    pub max_depth: u32,
    /// Object budget (`set maxobjects`), must be at least 1
    pub max_objects: u32,
    /// Fixed seed; drawn from the RNG when absent
    pub seed: Option<u32>,
    /// Hue rotation from the climate adjuster, degrees
    pub hue_shift: Option<f32>,
    /// Free-text label of the climate layer, written as a comment
    pub provenance_tag: Option<String>,
    /// Background color (`set background`)
    pub background: String,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Ring,
            max_depth: DEFAULT_MAX_DEPTH,
            max_objects: DEFAULT_MAX_OBJECTS,
            seed: None,
            hue_shift: None,
            provenance_tag: None,
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl SceneOptions {
    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(WindClumpError::invalid_input(
                "max_depth",
                "must be at least 1",
            ));
        }
        if self.max_objects == 0 {
            return Err(WindClumpError::invalid_input(
                "max_objects",
                "must be at least 1",
            ));
        }
        if let Some(seed) = self.seed {
            check_seed(seed)?;
        }
        if let Some(shift) = self.hue_shift {
            WindClumpError::require_finite("hue_shift", shift)?;
        }
        let background = self.background.trim();
        let hex = background.strip_prefix('#').unwrap_or("");
        if !(hex.len() == 6 || hex.len() == 3) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WindClumpError::invalid_input(
                "background",
                format!("expected a hex color like #000000, got '{background}'"),
            ));
        }
        Ok(())
    }
}

fn check_seed(seed: u32) -> Result<u32> {
    if seed <= MAX_SEED {
        Ok(seed)
    } else {
        Err(WindClumpError::invalid_input(
            "seed",
            format!("must be within 0..={MAX_SEED}, got {seed}"),
        ))
    }
}

/// A rendered script together with the seed written into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedScene {
    pub seed: u32,
    pub text: String,
}

/// Assemble the script AST for `flow` with an explicit `seed`.
///
/// # Errors
/// Returns `InvalidInput` if `options`, `seed` or the flow geometry is invalid.
pub fn compose_script(flow: &FlowParameters, options: &SceneOptions, seed: u32) -> Result<Script> {
    options.validate()?;
    check_seed(seed)?;
    flow.shape().validate()?;

    let hue_shift = options.hue_shift.unwrap_or(0.0);
    let mut script = Script::default();

    script.push(Statement::Banner(vec![
        "Wind-driven pointy clumps".to_string(),
        "Generated from live weather observations for Structure Synth.".to_string(),
    ]));
    script.push(Statement::Blank);
    script.push(Statement::Comment(format!("Layout: {}", options.layout)));
    script.push(Statement::Comment(wind_comment(flow)));
    script.push(Statement::Comment(climate_comment(
        options.provenance_tag.as_deref(),
        hue_shift,
    )));
    script.push(Statement::Setting(Setting::MaxDepth(options.max_depth)));
    script.push(Statement::Setting(Setting::MaxObjects(options.max_objects)));
    script.push(Statement::Setting(Setting::Seed(seed)));
    script.push(Statement::Setting(Setting::Background(
        options.background.trim().to_string(),
    )));
    script.push(Statement::Blank);
    script.push(Statement::Call(Call::rule(templates::SCENE_RULE)));

    for rule in templates::spike_rules(flow) {
        script.push(Statement::Blank);
        script.push(Statement::Rule(rule));
    }
    script.push(Statement::Blank);
    script.push(Statement::Rule(templates::clump_rule(flow)));
    script.push(Statement::Blank);
    script.push(Statement::Rule(templates::scene_rule(
        flow,
        options.layout,
        hue_shift,
    )));

    Ok(script)
}

fn wind_comment(flow: &FlowParameters) -> String {
    let speed = flow.wind_speed();
    let band = bands::classify(speed);
    match flow.wind_direction() {
        Some(direction) => format!(
            "Wind: {} m/s from {} deg ({band})",
            number(*speed),
            number(*direction)
        ),
        None => format!("Wind: {} m/s, direction unknown ({band})", number(*speed)),
    }
}

fn climate_comment(tag: Option<&str>, hue_shift: f32) -> String {
    let tag = tag.map(str::trim).filter(|tag| !tag.is_empty());
    match tag {
        Some(tag) => format!("Climate: {tag} (hue shift {} deg)", number(hue_shift)),
        None => format!("Climate: none (hue shift {} deg)", number(hue_shift)),
    }
}

/// Build the script, drawing a seed from `rng` when `options.seed` is absent.
///
/// # Errors
/// Returns `InvalidInput` if `options` or the flow geometry is invalid.
pub fn build_with_rng<R: Rng>(
    flow: &FlowParameters,
    options: &SceneOptions,
    rng: &mut R,
) -> Result<RenderedScene> {
    let seed = match options.seed {
        Some(seed) => seed,
        None => rng.random_range(0..=MAX_SEED),
    };
    let script = compose_script(flow, options, seed)?;
    let text = render(&script);
    debug!(
        layout = %options.layout,
        seed,
        clumps = flow.clump_count(),
        bytes = text.len(),
        "built scene script"
    );
    Ok(RenderedScene { seed, text })
}

/// Build the script text, seeding from the thread RNG when no seed is given.
///
/// # Errors
/// Returns `InvalidInput` if `options` or the flow geometry is invalid.
pub fn build(flow: &FlowParameters, options: &SceneOptions) -> Result<String> {
    build_with_rng(flow, options, &mut rand::rng()).map(|scene| scene.text)
}
