//! Per-variant mappings from cell values to colours.

use crate::render::Frame;
use crate::rule::HeatCell;
use cellscope_core::Rgb;

/// Background used by the threshold demos, `#181818`
pub const BACKGROUND: f32 = 0x18 as f32 / 255.0;

/// Pure mapping from one cell value to a colour
pub trait ColorMap<C> {
    fn color(&self, cell: &C) -> Rgb;
}

/// Two fixed colours for on/off cells; invertible as long as the colours differ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryColors {
    pub alive: Rgb,
    pub dead: Rgb,
}

impl Default for BinaryColors {
    fn default() -> Self {
        Self {
            alive: Rgb::WHITE,
            dead: Rgb::grey(BACKGROUND),
        }
    }
}

impl BinaryColors {
    /// Recover the cell state from a colour produced by this map
    pub fn invert(&self, color: Rgb) -> Option<bool> {
        if color == self.alive {
            Some(true)
        } else if color == self.dead {
            Some(false)
        } else {
            None
        }
    }
}

impl ColorMap<bool> for BinaryColors {
    fn color(&self, alive: &bool) -> Rgb {
        if *alive {
            self.alive
        } else {
            self.dead
        }
    }
}

/// Newborn cells are green and shift toward blue as their heat decays; dead cells are black
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatColors;

impl ColorMap<HeatCell> for HeatColors {
    fn color(&self, cell: &HeatCell) -> Rgb {
        Rgb::new(0.0, cell.heat, cell.value * (1.0 - cell.heat)).clamped()
    }
}

/// Density drives the red channel on top of a dark grey base
#[derive(Debug, Clone, Copy)]
pub struct SmoothLifeColors {
    pub base: f32,
}

impl Default for SmoothLifeColors {
    fn default() -> Self {
        Self { base: BACKGROUND }
    }
}

impl ColorMap<f32> for SmoothLifeColors {
    fn color(&self, density: &f32) -> Rgb {
        Rgb::new(self.base + density, self.base, self.base).clamped()
    }
}

/// Density rendered directly as grey intensity
#[derive(Debug, Clone, Copy, Default)]
pub struct IntensityColors;

impl ColorMap<f32> for IntensityColors {
    fn color(&self, density: &f32) -> Rgb {
        Rgb::grey(*density)
    }
}

/// Write one RGB triple per cell, row-major, into `frame`
pub fn colorize<C, M: ColorMap<C>>(cells: &[C], map: &M, frame: &mut Frame) {
    debug_assert_eq!(cells.len() * 3, frame.rgb().len());
    for (cell, out) in cells.iter().zip(frame.rgb_mut().chunks_exact_mut(3)) {
        out.copy_from_slice(&map.color(cell).to_array());
    }
}
