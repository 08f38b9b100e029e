use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wind_clump_core::core_types::units::{
    Degrees, Hectopascals, MillimetersPerHour, Percent, StrikesPerHour,
};
use wind_clump_core::{
    generate_script, ClimateAnomaly, DemoScenario, GeneratedScene, Layout, NoaaAtmosphere,
    SceneRequest, UnitSystem, WindClumpError, WindObservation, DEMO_SCENARIOS,
};

/// Wind-clump scene generator
#[derive(Parser, Debug)]
#[command(name = "wind-clump")]
#[command(about = "Turn weather observations into Structure Synth clump scenes", long_about = None)]
struct Args {
    /// Wind speed in the selected units
    #[arg(long, default_value_t = 5.0)]
    speed: f32,

    /// Bearing the wind blows from, in degrees (0=North, 90=East)
    #[arg(long, allow_hyphen_values = true)]
    direction: Option<f32>,

    /// Unit system of --speed (standard, metric, imperial)
    #[arg(long, default_value = "metric")]
    units: UnitSystem,

    /// Global recursion limit written to the script
    #[arg(long, default_value_t = 60)]
    maxdepth: u32,

    /// Fixed seed (random when omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// Output file, or '-' for stdout
    #[arg(short, long, default_value = "generated/clump.es")]
    output: PathBuf,

    /// Clump arrangement (ring, tower)
    #[arg(long, default_value = "ring")]
    layout: Layout,

    /// Relative humidity in %
    #[arg(long)]
    humidity: Option<f32>,

    /// Precipitation rate in mm/h
    #[arg(long)]
    precipitation: Option<f32>,

    /// Barometric pressure in hPa
    #[arg(long)]
    pressure: Option<f32>,

    /// Lightning strikes per hour
    #[arg(long)]
    lightning: Option<f32>,

    /// Normalized climate anomaly in [-1, 1]
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    climate_anomaly: f32,

    /// Hue swing in degrees at an anomaly of ±1
    #[arg(long, default_value_t = 25.0)]
    climate_anomaly_hue: f32,

    /// Label of the climate layer, written into the script header
    #[arg(long)]
    climate_tag: Option<String>,

    /// Render one canned scenario (calm, breeze, fresh, gale)
    #[arg(
        long,
        conflicts_with_all = ["all_demos", "speed", "direction", "units", "layout", "seed"]
    )]
    demo: Option<String>,

    /// Render every canned scenario into this directory
    #[arg(long)]
    all_demos: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Generate(#[from] WindClumpError),

    #[error("unknown demo '{0}': expected calm, breeze, fresh or gale")]
    UnknownDemo(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Args {
    fn atmosphere(&self) -> Option<NoaaAtmosphere> {
        let atmosphere = NoaaAtmosphere {
            humidity: self.humidity.map(Percent::new),
            precipitation_rate: self.precipitation.map(MillimetersPerHour::new),
            barometric_pressure: self.pressure.map(Hectopascals::new),
            lightning_rate: self.lightning.map(StrikesPerHour::new),
        };
        (atmosphere != NoaaAtmosphere::default()).then_some(atmosphere)
    }

    fn request(&self) -> Result<SceneRequest, CliError> {
        let mut request = match &self.demo {
            Some(name) => DemoScenario::find(name)
                .ok_or_else(|| CliError::UnknownDemo(name.clone()))?
                .request(),
            None => {
                let mut request = SceneRequest::new(WindObservation::new(
                    self.speed,
                    self.direction.map(Degrees::new),
                    self.units,
                ));
                request.options.layout = self.layout;
                request.options.seed = self.seed;
                request
            }
        };
        request.atmosphere = self.atmosphere();
        request.climate = Some(ClimateAnomaly::new(
            self.climate_anomaly,
            self.climate_tag.clone(),
        ));
        request.climate_swing_degrees = self.climate_anomaly_hue;
        request.options.max_depth = self.maxdepth;
        Ok(request)
    }
}

fn write_script(path: &Path, scene: &GeneratedScene) -> Result<(), CliError> {
    let to_error = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        return io::stdout()
            .lock()
            .write_all(scene.text.as_bytes())
            .map_err(to_error);
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, &scene.text).map_err(to_error)?;

    info!(
        path = %path.display(),
        seed = scene.seed,
        clumps = scene.flow.clump_count(),
        spikes = scene.flow.spikes_per_clump(),
        hue_shift = scene.hue_shift,
        "wrote scene"
    );
    Ok(())
}

fn render_all_demos(dir: &Path, args: &Args) -> Result<(), CliError> {
    DEMO_SCENARIOS
        .par_iter()
        .map(|scenario| {
            let mut request = scenario.request();
            request.options.max_depth = args.maxdepth;
            let scene = generate_script(&request)?;
            write_script(&dir.join(format!("{}.es", scenario.file_stem())), &scene)
        })
        .collect()
}

fn run(args: &Args) -> Result<(), CliError> {
    if let Some(dir) = &args.all_demos {
        return render_all_demos(dir, args);
    }

    let scene = generate_script(&args.request()?)?;
    write_script(&args.output, &scene)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
