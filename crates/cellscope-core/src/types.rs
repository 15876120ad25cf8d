//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position on a toroidal grid. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: isize,
    pub y: isize,
}

impl Position {
    pub fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    /// Apply toroidal wrapping for given grid dimensions
    pub fn wrap(&self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.rem_euclid(width as isize),
            y: self.y.rem_euclid(height as isize),
        }
    }

    /// Row-major index of the wrapped position
    pub fn to_index(&self, width: usize, height: usize) -> usize {
        let wrapped = self.wrap(width, height);
        wrapped.y as usize * width + wrapped.x as usize
    }
}

/// One of the eight Moore-neighborhood directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// `(dx, dy)` offset, with north pointing to the previous row
    pub fn to_delta(&self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ]
    }
}

/// Update rule family driving a simulator, fixed for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// 1-D elementary automaton rendered as a scrolling space-time diagram
    Wolfram,
    /// Binary Game of Life (B3/S23)
    Life,
    /// Game of Life with a decaying heat channel
    HeatLife,
    /// Moore-sum rule over continuous densities with fixed thresholds
    SmoothLife,
    /// Gaussian-kernel convolution with a bell-shaped growth mapping
    Lenia,
    /// Disc/annulus SmoothLife with sigmoid transitions
    ContinuousLife,
}

impl Variant {
    pub fn all() -> [Variant; 6] {
        [
            Variant::Wolfram,
            Variant::Life,
            Variant::HeatLife,
            Variant::SmoothLife,
            Variant::Lenia,
            Variant::ContinuousLife,
        ]
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Wolfram => "Wolfram",
            Variant::Life => "Game of Life",
            Variant::HeatLife => "Heat Life",
            Variant::SmoothLife => "SmoothLife",
            Variant::Lenia => "Lenia",
            Variant::ContinuousLife => "Continuous SmoothLife",
        };
        write!(f, "{}", name)
    }
}

/// Normalized RGB colour, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn grey(intensity: f32) -> Self {
        Self::new(intensity, intensity, intensity).clamped()
    }

    /// Clamp every channel into [0, 1]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Rec. 601 luma
    pub fn luminance(&self) -> f32 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}
