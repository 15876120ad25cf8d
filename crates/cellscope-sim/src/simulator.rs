//! Grid simulator: owns the generations of one variant and steps them frame by frame.

use crate::color::{colorize, BinaryColors, HeatColors, IntensityColors, SmoothLifeColors};
use crate::continuous::ContinuousLifeEngine;
use crate::grid::Grid;
use crate::lenia::LeniaEngine;
use crate::moore::{ConwayRule, HeatTrailRule, MooreEngine, SmoothLifeRule};
use crate::patterns::{
    fill_binary_random, fill_uniform_random, place_glider, scatter_speckles, seeded_rng,
};
use crate::render::{window_title, Frame};
use crate::rule::{CellDensity, HeatCell};
use crate::wolfram::SpaceTimeDiagram;
use cellscope_core::{GridStats, Result, SimulationConfig, Variant};
use tracing::{info, instrument, trace};

/// Read-only view of the current generation, row-major
#[derive(Debug, Clone, Copy)]
pub enum CellView<'a> {
    Binary(&'a [bool]),
    Heat(&'a [HeatCell]),
    Density(&'a [f32]),
}

impl CellView<'_> {
    pub fn len(&self) -> usize {
        match self {
            CellView::Binary(cells) => cells.len(),
            CellView::Heat(cells) => cells.len(),
            CellView::Density(cells) => cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalar density of every cell
    pub fn densities(&self) -> Vec<f32> {
        match self {
            CellView::Binary(cells) => cells.iter().map(CellDensity::density).collect(),
            CellView::Heat(cells) => cells.iter().map(CellDensity::density).collect(),
            CellView::Density(cells) => cells.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
enum Engine {
    Wolfram(SpaceTimeDiagram),
    Life(MooreEngine<ConwayRule>),
    HeatLife(MooreEngine<HeatTrailRule>),
    SmoothLife(MooreEngine<SmoothLifeRule>),
    Lenia(LeniaEngine),
    ContinuousLife(ContinuousLifeEngine),
}

#[derive(Debug, Clone)]
pub struct GridSimulator {
    config: SimulationConfig,
    engine: Engine,
    generation: u64,
}

impl GridSimulator {
    /// Build a simulator with default rule parameters
    pub fn create(height: usize, width: usize, variant: Variant, seed: u8) -> Result<Self> {
        Self::from_config(SimulationConfig::new(height, width, variant, seed))
    }

    /// Validate the configuration, allocate both generations and run the variant's initializer.
    ///
    /// Seed 0 places the regression glider on every two-dimensional variant; any other seed
    /// drives a random fill. For Wolfram the seed is the rule number.
    #[instrument(skip(config), fields(variant = ?config.variant, height = config.grid.height, width = config.grid.width, seed = config.seed))]
    pub fn from_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let (height, width) = (config.grid.height, config.grid.width);
        let seed = config.seed;
        let mut rng = seeded_rng(seed);

        let engine = match config.variant {
            Variant::Wolfram => Engine::Wolfram(SpaceTimeDiagram::new(height, width, seed)?),
            Variant::Life => {
                let mut grid = Grid::new(height, width, false)?;
                if seed == 0 {
                    place_glider(&mut grid, true);
                } else {
                    fill_binary_random(&mut grid, &mut rng);
                }
                Engine::Life(MooreEngine::new(ConwayRule, grid)?)
            }
            Variant::HeatLife => {
                let mut alive = Grid::new(height, width, false)?;
                if seed == 0 {
                    place_glider(&mut alive, true);
                } else {
                    fill_binary_random(&mut alive, &mut rng);
                }
                let mut grid = Grid::new(height, width, HeatCell::DEAD)?;
                for (cell, &live) in grid.cells_mut().iter_mut().zip(alive.cells()) {
                    if live {
                        *cell = HeatCell::NEWBORN;
                    }
                }
                let rule = HeatTrailRule {
                    decay: config.heat.decay,
                };
                Engine::HeatLife(MooreEngine::new(rule, grid)?)
            }
            Variant::SmoothLife => {
                let grid = density_grid(height, width, seed, &mut rng, |grid, rng| {
                    fill_uniform_random(grid, rng)
                })?;
                let rule = SmoothLifeRule {
                    thresholds: config.smooth_life,
                };
                Engine::SmoothLife(MooreEngine::new(rule, grid)?)
            }
            Variant::Lenia => {
                let grid = density_grid(height, width, seed, &mut rng, |grid, rng| {
                    fill_uniform_random(grid, rng)
                })?;
                Engine::Lenia(LeniaEngine::new(&config.lenia, grid)?)
            }
            Variant::ContinuousLife => {
                let speckles = config.continuous_life.speckles;
                let size = config.continuous_life.inner_radius as usize;
                let grid = density_grid(height, width, seed, &mut rng, |grid, rng| {
                    scatter_speckles(grid, speckles, size, rng)
                })?;
                Engine::ContinuousLife(ContinuousLifeEngine::new(&config.continuous_life, grid)?)
            }
        };

        info!("Created {} simulator", config.variant);

        Ok(Self {
            config,
            engine,
            generation: 0,
        })
    }

    /// Advance every cell by one generation and swap buffers
    pub fn step(&mut self) {
        match &mut self.engine {
            Engine::Wolfram(diagram) => diagram.step(),
            Engine::Life(engine) => engine.step(),
            Engine::HeatLife(engine) => engine.step(),
            Engine::SmoothLife(engine) => engine.step(),
            Engine::Lenia(engine) => engine.step(),
            Engine::ContinuousLife(engine) => engine.step(),
        }
        self.generation += 1;
        trace!(generation = self.generation, "Step complete");
    }

    pub fn steps(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn height(&self) -> usize {
        self.config.grid.height
    }

    pub fn width(&self) -> usize {
        self.config.grid.width
    }

    pub fn title(&self) -> String {
        window_title(self.config.variant, self.config.seed)
    }

    pub fn cells(&self) -> CellView<'_> {
        match &self.engine {
            Engine::Wolfram(diagram) => CellView::Binary(diagram.grid().cells()),
            Engine::Life(engine) => CellView::Binary(engine.grid().cells()),
            Engine::HeatLife(engine) => CellView::Heat(engine.grid().cells()),
            Engine::SmoothLife(engine) => CellView::Density(engine.grid().cells()),
            Engine::Lenia(engine) => CellView::Density(engine.grid().cells()),
            Engine::ContinuousLife(engine) => CellView::Density(engine.grid().cells()),
        }
    }

    pub fn stats(&self) -> GridStats {
        GridStats::from_densities(self.generation, self.cells().densities())
    }

    /// Colour the current generation into `frame` with the variant's colour map
    pub fn render_into(&self, frame: &mut Frame) {
        debug_assert_eq!((frame.height(), frame.width()), (self.height(), self.width()));
        match &self.engine {
            Engine::Wolfram(diagram) => {
                colorize(diagram.grid().cells(), &BinaryColors::default(), frame)
            }
            Engine::Life(engine) => colorize(engine.grid().cells(), &BinaryColors::default(), frame),
            Engine::HeatLife(engine) => colorize(engine.grid().cells(), &HeatColors, frame),
            Engine::SmoothLife(engine) => {
                colorize(engine.grid().cells(), &SmoothLifeColors::default(), frame)
            }
            Engine::Lenia(engine) => colorize(engine.grid().cells(), &IntensityColors, frame),
            Engine::ContinuousLife(engine) => {
                colorize(engine.grid().cells(), &IntensityColors, frame)
            }
        }
    }

    pub fn frame(&self) -> Result<Frame> {
        let mut frame = Frame::new(self.height(), self.width())?;
        self.render_into(&mut frame);
        Ok(frame)
    }
}

/// Zeroed density grid holding the glider for seed 0, otherwise filled by `fill`
fn density_grid<F>(
    height: usize,
    width: usize,
    seed: u8,
    rng: &mut rand_chacha::ChaCha8Rng,
    fill: F,
) -> Result<Grid<f32>>
where
    F: FnOnce(&mut Grid<f32>, &mut rand_chacha::ChaCha8Rng),
{
    let mut grid = Grid::new(height, width, 0.0f32)?;
    if seed == 0 {
        place_glider(&mut grid, 1.0);
    } else {
        fill(&mut grid, rng);
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BACKGROUND;
    use crate::patterns::GLIDER;
    use cellscope_core::{Error, Rgb};

    fn small_config(variant: Variant, seed: u8) -> SimulationConfig {
        let mut config = SimulationConfig::new(12, 12, variant, seed);
        config.lenia.kernel_size = 5;
        config.continuous_life.inner_radius = 2.0;
        config.continuous_life.outer_radius = 5.0;
        config.continuous_life.speckles = 4;
        config
    }

    #[test]
    fn test_simulation_creation() {
        for variant in Variant::all() {
            for seed in [0u8, 42] {
                let sim = GridSimulator::from_config(small_config(variant, seed)).unwrap();
                assert_eq!(sim.generation(), 0);
                assert_eq!(sim.cells().len(), 144);
                assert_eq!(sim.variant(), variant);
            }
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        let result = GridSimulator::create(0, 10, Variant::Life, 1);
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_allocation_failure() {
        let result = GridSimulator::create(1 << 31, 1 << 31, Variant::Lenia, 1);
        assert!(matches!(result, Err(Error::Allocation { .. })));
    }

    #[test]
    fn test_oversized_lenia_kernel_is_an_error() {
        let mut config = SimulationConfig::new(8, 8, Variant::Lenia, 1);
        config.lenia.kernel_size = 1 << 22;
        assert!(config.validate().is_ok());

        let result = GridSimulator::from_config(config);
        assert!(matches!(result, Err(Error::Allocation { .. })));
    }

    #[test]
    fn test_step_advances_generation() {
        for variant in Variant::all() {
            let mut sim = GridSimulator::from_config(small_config(variant, 3)).unwrap();
            sim.steps(3);
            assert_eq!(sim.generation(), 3);
            assert_eq!(sim.stats().generation, 3);
        }
    }

    #[test]
    fn test_seed_zero_places_glider() {
        let sim = GridSimulator::create(8, 8, Variant::Life, 0).unwrap();
        let CellView::Binary(cells) = sim.cells() else {
            panic!("Life exposes binary cells");
        };
        let live: Vec<_> = (0..64).filter(|&i| cells[i]).collect();
        let expected: Vec<_> = GLIDER
            .iter()
            .map(|&(row, col)| row as usize * 8 + col as usize)
            .collect();
        assert_eq!(live, expected);
    }

    #[test]
    fn test_glider_regression_through_simulator() {
        let mut sim = GridSimulator::create(10, 10, Variant::Life, 0).unwrap();
        sim.steps(4);
        let stats = sim.stats();
        assert_eq!(stats.live_cells, 5);

        let CellView::Binary(cells) = sim.cells() else {
            panic!("Life exposes binary cells");
        };
        for &(row, col) in GLIDER.iter() {
            assert!(cells[(row as usize + 1) * 10 + col as usize + 1]);
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        for variant in Variant::all() {
            let mut a = GridSimulator::from_config(small_config(variant, 17)).unwrap();
            let mut b = GridSimulator::from_config(small_config(variant, 17)).unwrap();
            a.steps(2);
            b.steps(2);
            assert_eq!(a.cells().densities(), b.cells().densities(), "{:?}", variant);
            assert_eq!(a.frame().unwrap(), b.frame().unwrap());
        }
    }

    #[test]
    fn test_heat_life_starts_hot() {
        let sim = GridSimulator::create(6, 6, Variant::HeatLife, 0).unwrap();
        let CellView::Heat(cells) = sim.cells() else {
            panic!("HeatLife exposes heat cells");
        };
        assert_eq!(cells.iter().filter(|c| **c == HeatCell::NEWBORN).count(), 5);
        assert_eq!(cells.iter().filter(|c| **c == HeatCell::DEAD).count(), 31);
    }

    #[test]
    fn test_wolfram_uses_seed_as_rule() {
        let sim = GridSimulator::create(8, 17, Variant::Wolfram, 90).unwrap();
        assert_eq!(sim.title(), "Wolfram rule 90 (01011010)");
        let CellView::Binary(cells) = sim.cells() else {
            panic!("Wolfram exposes binary cells");
        };
        // Generation 7 of rule 90 alternates across the centre
        let last = &cells[7 * 17..];
        assert_eq!(last.iter().filter(|&&c| c).count(), 8);
    }

    #[test]
    fn test_frame_shape_and_range() {
        for variant in Variant::all() {
            let mut sim = GridSimulator::from_config(small_config(variant, 5)).unwrap();
            sim.step();
            let frame = sim.frame().unwrap();
            assert_eq!(frame.rgb().len(), 12 * 12 * 3);
            assert!(frame.rgb().iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_binary_frame_inverts_to_cells() {
        let mut sim = GridSimulator::create(9, 11, Variant::Life, 99).unwrap();
        sim.steps(2);
        let frame = sim.frame().unwrap();
        let map = BinaryColors::default();

        let CellView::Binary(cells) = sim.cells() else {
            panic!("Life exposes binary cells");
        };
        for row in 0..9 {
            for col in 0..11 {
                assert_eq!(map.invert(frame.pixel(row, col)), Some(cells[row * 11 + col]));
            }
        }
    }

    #[test]
    fn test_smoothlife_frame_background() {
        let sim = GridSimulator::create(5, 5, Variant::SmoothLife, 0).unwrap();
        let frame = sim.frame().unwrap();
        assert_eq!(frame.pixel(4, 4), Rgb::grey(BACKGROUND));
        assert_eq!(frame.pixel(0, 0).r, 1.0);
    }
}
