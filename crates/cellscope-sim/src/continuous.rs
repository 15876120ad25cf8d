//! Continuous SmoothLife: disc and annulus fillings fed through smooth sigmoid thresholds.

use crate::grid::{DoubleBuffer, Grid};
use crate::rule::Rule;
use cellscope_core::{ContinuousLifeConfig, Result};

/// Mean field value over the inner disc (`inner`, a.k.a. m) and the surrounding annulus (`outer`, n)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filling {
    pub inner: f32,
    pub outer: f32,
}

/// Logistic step centred on `a` with steepness `alpha`
pub fn sigmoid(x: f32, a: f32, alpha: f32) -> f32 {
    1.0 / (1.0 + (-4.0 / alpha * (x - a)).exp())
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

#[derive(Debug, Clone, Copy)]
pub struct ContinuousLifeRule {
    pub birth: (f32, f32),
    pub death: (f32, f32),
    pub alpha_n: f32,
    pub alpha_m: f32,
}

impl ContinuousLifeRule {
    /// Smooth indicator of `x` lying in `[a, b]`
    fn interval(&self, x: f32, a: f32, b: f32) -> f32 {
        sigmoid(x, a, self.alpha_n) * (1.0 - sigmoid(x, b, self.alpha_n))
    }

    /// Transition function `S(n, m)`
    pub fn s(&self, n: f32, m: f32) -> f32 {
        let aliveness = sigmoid(m, 0.5, self.alpha_m);
        self.interval(
            n,
            lerp(self.birth.0, self.death.0, aliveness),
            lerp(self.birth.1, self.death.1, aliveness),
        )
    }
}

impl From<&ContinuousLifeConfig> for ContinuousLifeRule {
    fn from(config: &ContinuousLifeConfig) -> Self {
        Self {
            birth: config.birth,
            death: config.death,
            alpha_n: config.alpha_n,
            alpha_m: config.alpha_m,
        }
    }
}

impl Rule for ContinuousLifeRule {
    type Cell = f32;
    type Stat = Filling;

    fn transition(&self, _current: f32, filling: Filling) -> f32 {
        self.s(filling.outer, filling.inner)
    }
}

/// Integer offsets making up the disc `r <= inner` and the annulus `inner < r <= outer`
#[derive(Debug, Clone)]
pub struct Neighbourhood {
    disc: Vec<(isize, isize)>,
    annulus: Vec<(isize, isize)>,
}

impl Neighbourhood {
    pub fn new(inner_radius: f32, outer_radius: f32) -> Self {
        let reach = outer_radius.ceil() as isize;
        let mut disc = Vec::new();
        let mut annulus = Vec::new();

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let r = ((dx * dx + dy * dy) as f32).sqrt();
                if r <= inner_radius {
                    disc.push((dx, dy));
                } else if r <= outer_radius {
                    annulus.push((dx, dy));
                }
            }
        }

        Self { disc, annulus }
    }

    pub fn disc(&self) -> &[(isize, isize)] {
        &self.disc
    }

    pub fn annulus(&self) -> &[(isize, isize)] {
        &self.annulus
    }

    /// Disc and annulus means around `(row, col)`, wrapping at every edge
    pub fn filling(&self, grid: &Grid<f32>, row: usize, col: usize) -> Filling {
        let height = grid.height() as isize;
        let width = grid.width() as isize;
        let cells = grid.cells();
        let (row, col) = (row as isize, col as isize);

        let mean = |offsets: &[(isize, isize)]| -> f32 {
            if offsets.is_empty() {
                return 0.0;
            }
            let total: f32 = offsets
                .iter()
                .map(|&(dx, dy)| {
                    let y = (row + dy).rem_euclid(height);
                    let x = (col + dx).rem_euclid(width);
                    cells[(y * width + x) as usize]
                })
                .sum();
            total / offsets.len() as f32
        };

        Filling {
            inner: mean(&self.disc),
            outer: mean(&self.annulus),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContinuousLifeEngine {
    rule: ContinuousLifeRule,
    neighbourhood: Neighbourhood,
    buffers: DoubleBuffer<f32>,
}

impl ContinuousLifeEngine {
    pub fn new(config: &ContinuousLifeConfig, initial: Grid<f32>) -> Result<Self> {
        Ok(Self {
            rule: ContinuousLifeRule::from(config),
            neighbourhood: Neighbourhood::new(config.inner_radius, config.outer_radius),
            buffers: DoubleBuffer::new(initial)?,
        })
    }

    pub fn step(&mut self) {
        let (current, next) = self.buffers.split();
        let width = current.width();

        for row in 0..current.height() {
            for col in 0..width {
                let index = row * width + col;
                let filling = self.neighbourhood.filling(current, row, col);
                next.cells_mut()[index] = self.rule.transition(current.cells()[index], filling);
            }
        }

        self.buffers.swap();
    }

    pub fn grid(&self) -> &Grid<f32> {
        self.buffers.current()
    }
}
