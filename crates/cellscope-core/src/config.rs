//! Configuration types for the simulation.

use crate::{Error, Result, Variant};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Grid dimensions, constant for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Survival ("perpetuate") and birth ("spawn") windows on the Moore sum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothLifeThresholds {
    pub min_perp: f32,
    /// Just under 3.0: a Moore sum of exactly three does not sustain a live cell
    pub max_perp: f32,
    pub min_spawn: f32,
    pub max_spawn: f32,
}

impl Default for SmoothLifeThresholds {
    fn default() -> Self {
        Self {
            min_perp: 1.5,
            max_perp: 2.9999,
            min_spawn: 2.05,
            max_spawn: 6.1,
        }
    }
}

/// Heat channel parameters for the heat-trail Game of Life
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatConfig {
    /// Multiplicative heat decay applied each step a cell survives
    pub decay: f32,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self { decay: 0.99 }
    }
}

/// How the Lenia neighbourhood sum is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvolutionMode {
    /// Full K x K footprint per cell
    #[default]
    Direct,
    /// Two 1-D passes using the factored Gaussian profile
    Separable,
}

/// Lenia kernel and growth parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeniaConfig {
    /// Side of the square Gaussian kernel; sigma is `kernel_size / 4`
    pub kernel_size: usize,
    /// Integration step `dt`
    pub time_step: f32,
    /// Centre of the bell-shaped growth mapping
    pub growth_center: f32,
    /// Width of the bell-shaped growth mapping
    pub growth_width: f32,
    pub convolution: ConvolutionMode,
}

impl Default for LeniaConfig {
    fn default() -> Self {
        Self {
            kernel_size: 128,
            time_step: 0.1,
            growth_center: 0.5,
            growth_width: 0.15,
            convolution: ConvolutionMode::Direct,
        }
    }
}

/// Disc/annulus SmoothLife parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuousLifeConfig {
    /// Radius of the inner "self" disc
    pub inner_radius: f32,
    /// Outer radius of the neighbourhood annulus
    pub outer_radius: f32,
    /// Birth interval `(b1, b2)`
    pub birth: (f32, f32),
    /// Death interval `(d1, d2)`
    pub death: (f32, f32),
    /// Sigmoid steepness on the annulus filling
    pub alpha_n: f32,
    /// Sigmoid steepness on the disc filling
    pub alpha_m: f32,
    /// Number of random squares seeded at start
    pub speckles: usize,
}

impl Default for ContinuousLifeConfig {
    fn default() -> Self {
        Self {
            inner_radius: 7.0,
            outer_radius: 21.0,
            birth: (0.278, 0.365),
            death: (0.267, 0.445),
            alpha_n: 0.028,
            alpha_m: 0.147,
            speckles: 200,
        }
    }
}

/// Mandelbrot viewport parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandelbrotConfig {
    pub zoom: f32,
    pub offset: (f32, f32),
    pub max_iter: u32,
}

impl Default for MandelbrotConfig {
    fn default() -> Self {
        Self {
            zoom: 2.0,
            offset: (0.0, 0.0),
            max_iter: 100,
        }
    }
}

/// Everything needed to construct a grid simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub variant: Variant,
    /// Seed byte; doubles as the rule table for the Wolfram variant
    pub seed: u8,
    pub smooth_life: SmoothLifeThresholds,
    pub heat: HeatConfig,
    pub lenia: LeniaConfig,
    pub continuous_life: ContinuousLifeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            variant: Variant::Life,
            seed: 0,
            smooth_life: SmoothLifeThresholds::default(),
            heat: HeatConfig::default(),
            lenia: LeniaConfig::default(),
            continuous_life: ContinuousLifeConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new(height: usize, width: usize, variant: Variant, seed: u8) -> Self {
        Self {
            grid: GridConfig { width, height },
            variant,
            seed,
            ..Default::default()
        }
    }

    /// Reject degenerate parameters before any buffer is allocated
    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(Error::InvalidDimensions {
                height: self.grid.height,
                width: self.grid.width,
            });
        }

        let t = &self.smooth_life;
        if t.min_perp > t.max_perp {
            return Err(Error::InvalidRule(format!(
                "survival range is inverted: [{}, {}]",
                t.min_perp, t.max_perp
            )));
        }
        if t.min_spawn > t.max_spawn {
            return Err(Error::InvalidRule(format!(
                "birth range is inverted: [{}, {}]",
                t.min_spawn, t.max_spawn
            )));
        }

        if !(self.heat.decay >= 0.0 && self.heat.decay <= 1.0) {
            return Err(Error::InvalidRule(format!(
                "heat decay must lie in [0, 1], got {}",
                self.heat.decay
            )));
        }

        let l = &self.lenia;
        if l.kernel_size == 0 {
            return Err(Error::InvalidRule("Lenia kernel size must be positive".to_string()));
        }
        if !(l.time_step > 0.0) {
            return Err(Error::InvalidRule(format!(
                "Lenia time step must be positive, got {}",
                l.time_step
            )));
        }
        if !(l.growth_width > 0.0) {
            return Err(Error::InvalidRule(format!(
                "Lenia growth width must be positive, got {}",
                l.growth_width
            )));
        }

        let c = &self.continuous_life;
        if !(c.inner_radius > 0.0 && c.inner_radius < c.outer_radius) {
            return Err(Error::InvalidRule(format!(
                "continuous life radii must satisfy 0 < inner < outer, got {} and {}",
                c.inner_radius, c.outer_radius
            )));
        }
        if !(c.alpha_n > 0.0 && c.alpha_m > 0.0) {
            return Err(Error::InvalidRule(
                "continuous life sigmoid steepness must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// What the runner puts on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Demo {
    /// A grid simulation using `SimulationConfig::variant`
    Simulation,
    /// The static Mandelbrot field
    Mandelbrot,
}

/// Driving loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub demo: Demo,
    pub simulation: SimulationConfig,
    pub mandelbrot: MandelbrotConfig,
    /// Stop after this many frames; run until interrupted when unset
    pub frames: Option<u64>,
    /// Target frame rate
    pub fps: u32,
    /// Emit frame statistics every N frames
    pub log_every: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            demo: Demo::Simulation,
            simulation: SimulationConfig::default(),
            mandelbrot: MandelbrotConfig::default(),
            frames: None,
            fps: 60,
            log_every: 60,
        }
    }
}

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV_VAR: &str = "CELLSCOPE_CONFIG";

impl RunnerConfig {
    /// Parse a configuration from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: RunnerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the first command-line argument, then `CELLSCOPE_CONFIG`, then defaults
    pub fn load() -> Result<Self> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok());

        match path {
            Some(path) => {
                info!("Loading configuration from {}", path);
                Self::from_file(path)
            }
            None => {
                info!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(Error::Validation("fps must be positive".to_string()));
        }
        if self.log_every == 0 {
            return Err(Error::Validation("log_every must be positive".to_string()));
        }
        if self.mandelbrot.max_iter == 0 {
            return Err(Error::Validation(
                "Mandelbrot iteration budget must be positive".to_string(),
            ));
        }
        self.simulation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let grid = GridConfig::default();
        assert_eq!(grid.width, 800);
        assert_eq!(grid.height, 600);

        let thresholds = SmoothLifeThresholds::default();
        assert_eq!(thresholds.max_perp, 2.9999);
        assert_eq!(thresholds.min_spawn, 2.05);

        let lenia = LeniaConfig::default();
        assert_eq!(lenia.kernel_size, 128);
        assert_eq!(lenia.time_step, 0.1);
        assert_eq!(lenia.convolution, ConvolutionMode::Direct);

        assert_eq!(HeatConfig::default().decay, 0.99);
        assert_eq!(ContinuousLifeConfig::default().outer_radius, 21.0);
        assert_eq!(RunnerConfig::default().fps, 60);
    }

    #[test]
    fn test_default_simulation_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(RunnerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = SimulationConfig::new(0, 10, Variant::Life, 1);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDimensions { height: 0, width: 10 })
        ));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = SimulationConfig::default();
        config.smooth_life.min_spawn = 7.0;
        assert!(matches!(config.validate(), Err(Error::InvalidRule(_))));
    }

    #[test]
    fn test_overlapping_thresholds_allowed() {
        let mut config = SimulationConfig::default();
        config.smooth_life.min_spawn = 1.0;
        config.smooth_life.max_spawn = 8.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_radii_rejected() {
        let mut config = SimulationConfig::default();
        config.continuous_life.inner_radius = 30.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "simulation": { "variant": "lenia", "seed": 7 }, "frames": 10 }"#;
        let config: RunnerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.simulation.variant, Variant::Lenia);
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.grid, GridConfig::default());
        assert_eq!(config.frames, Some(10));
        assert_eq!(config.demo, Demo::Simulation);
    }

    #[test]
    fn test_partial_nested_json_uses_defaults() {
        let json = r#"{ "simulation": { "grid": { "width": 64 }, "lenia": { "kernel_size": 9 } } }"#;
        let config: RunnerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.simulation.grid.width, 64);
        assert_eq!(config.simulation.grid.height, 600);
        assert_eq!(config.simulation.lenia.kernel_size, 9);
        assert_eq!(config.simulation.lenia.time_step, 0.1);

        let mandelbrot: MandelbrotConfig = serde_json::from_str(r#"{ "zoom": 1.0 }"#).unwrap();
        assert_eq!(mandelbrot.max_iter, 100);
    }

    #[test]
    fn test_from_file_missing() {
        let result = RunnerConfig::from_file("/nonexistent/cellscope.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
