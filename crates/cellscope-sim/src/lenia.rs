//! Lenia: Gaussian-kernel convolution followed by a bell-shaped growth mapping.
//!
//! The direct convolution costs O(H * W * K^2) per step and dominates the run time of this
//! variant. Because the kernel is an isotropic Gaussian it factors into a 1-D profile, so
//! [`ConvolutionMode::Separable`] gives the same field (up to rounding) in O(H * W * K).

use crate::grid::{try_buffer, DoubleBuffer, Grid};
use crate::rule::Rule;
use cellscope_core::{ConvolutionMode, LeniaConfig, Result};
use tracing::warn;

/// Normalized square Gaussian kernel with `sigma = size / 4`
#[derive(Debug, Clone)]
pub struct GaussianKernel {
    size: usize,
    /// Row-major `size x size` weights summing to 1
    weights: Vec<f32>,
    /// 1-D profile summing to 1; `weights[i][j] == profile[i] * profile[j]`
    profile: Vec<f32>,
}

impl GaussianKernel {
    /// Build the kernel; a footprint too large to allocate is an [`Error::Allocation`]
    ///
    /// [`Error::Allocation`]: cellscope_core::Error::Allocation
    pub fn new(size: usize) -> Result<Self> {
        let sigma = size as f64 / 4.0;
        let two_sigma_sq = 2.0 * sigma * sigma;
        let half = (size / 2) as f64;

        let mut raw = try_buffer(size, size, 1, 0.0f64)?;
        let mut weights = try_buffer(size, size, 1, 0.0f32)?;
        let mut raw_profile = try_buffer(1, size, 1, 0.0f64)?;
        let mut profile = try_buffer(1, size, 1, 0.0f32)?;

        for (i, p) in raw_profile.iter_mut().enumerate() {
            let d = i as f64 - half;
            *p = (-(d * d) / two_sigma_sq).exp();
        }
        let profile_sum: f64 = raw_profile.iter().sum();
        for (dst, &p) in profile.iter_mut().zip(&raw_profile) {
            *dst = (p / profile_sum) as f32;
        }

        for (index, w) in raw.iter_mut().enumerate() {
            let dy = (index / size) as f64 - half;
            let dx = (index % size) as f64 - half;
            *w = (-(dx * dx + dy * dy) / two_sigma_sq).exp();
        }
        let sum: f64 = raw.iter().sum();
        for (dst, &w) in weights.iter_mut().zip(&raw) {
            *dst = (w / sum) as f32;
        }

        Ok(Self {
            size,
            weights,
            profile,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn profile(&self) -> &[f32] {
        &self.profile
    }

    pub fn weight(&self, ky: usize, kx: usize) -> f32 {
        self.weights[ky * self.size + kx]
    }
}

/// Wrapped source row and column for every (output index, kernel tap) pair.
///
/// Depends only on the grid shape and kernel size, so an engine builds it once.
#[derive(Debug, Clone)]
pub struct WrapTaps {
    size: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl WrapTaps {
    pub fn new(kernel_size: usize, height: usize, width: usize) -> Result<Self> {
        Ok(Self {
            size: kernel_size,
            rows: Self::axis(kernel_size, height)?,
            cols: Self::axis(kernel_size, width)?,
        })
    }

    fn axis(size: usize, extent: usize) -> Result<Vec<usize>> {
        let half = (size / 2) as isize;
        let extent_i = extent as isize;
        let mut taps = try_buffer(extent, size, 1, 0usize)?;
        for (index, tap) in taps.iter_mut().enumerate() {
            let (out, k) = ((index / size) as isize, (index % size) as isize);
            *tap = (out + k - half).rem_euclid(extent_i) as usize;
        }
        Ok(taps)
    }

    fn rows(&self, y: usize) -> &[usize] {
        &self.rows[y * self.size..(y + 1) * self.size]
    }

    fn cols(&self, x: usize) -> &[usize] {
        &self.cols[x * self.size..(x + 1) * self.size]
    }
}

/// Full-footprint convolution with toroidal wrap
pub fn convolve_direct(
    input: &Grid<f32>,
    kernel: &GaussianKernel,
    taps: &WrapTaps,
    output: &mut Grid<f32>,
) {
    debug_assert!(input.same_shape(output));
    debug_assert_eq!(kernel.size(), taps.size);
    let width = input.width();
    let k = kernel.size();
    let src = input.cells();

    for y in 0..input.height() {
        let rows = taps.rows(y);
        for x in 0..width {
            let cols = taps.cols(x);
            let mut sum = 0.0f32;
            for (ky, &ny) in rows.iter().enumerate() {
                let base = ny * width;
                let weights = &kernel.weights[ky * k..(ky + 1) * k];
                for (&nx, &w) in cols.iter().zip(weights) {
                    sum += src[base + nx] * w;
                }
            }
            output.cells_mut()[y * width + x] = sum;
        }
    }
}

/// Horizontal then vertical pass with the kernel's 1-D profile; `scratch` holds the first pass
pub fn convolve_separable(
    input: &Grid<f32>,
    kernel: &GaussianKernel,
    taps: &WrapTaps,
    scratch: &mut Grid<f32>,
    output: &mut Grid<f32>,
) {
    debug_assert!(input.same_shape(scratch) && input.same_shape(output));
    debug_assert_eq!(kernel.size(), taps.size);
    let (height, width) = (input.height(), input.width());
    let profile = kernel.profile();

    let src = input.cells();
    for y in 0..height {
        let base = y * width;
        for x in 0..width {
            let sum: f32 = taps
                .cols(x)
                .iter()
                .zip(profile)
                .map(|(&nx, &w)| src[base + nx] * w)
                .sum();
            scratch.cells_mut()[base + x] = sum;
        }
    }

    let tmp = scratch.cells();
    for y in 0..height {
        let rows = taps.rows(y);
        for x in 0..width {
            let sum: f32 = rows.iter().zip(profile).map(|(&ny, &w)| tmp[ny * width + x] * w).sum();
            output.cells_mut()[y * width + x] = sum;
        }
    }
}

/// `next = cur + dt * (growth(u) - cur)` with `growth(u) = exp(-((u - center) / width)^2)`
#[derive(Debug, Clone, Copy)]
pub struct LeniaRule {
    pub time_step: f32,
    pub growth_center: f32,
    pub growth_width: f32,
}

impl LeniaRule {
    pub fn growth(&self, u: f32) -> f32 {
        let z = (u - self.growth_center) / self.growth_width;
        (-(z * z)).exp()
    }
}

impl From<&LeniaConfig> for LeniaRule {
    fn from(config: &LeniaConfig) -> Self {
        Self {
            time_step: config.time_step,
            growth_center: config.growth_center,
            growth_width: config.growth_width,
        }
    }
}

impl Rule for LeniaRule {
    type Cell = f32;
    type Stat = f32;

    fn transition(&self, current: f32, convolved: f32) -> f32 {
        current + self.time_step * (self.growth(convolved) - current)
    }
}

#[derive(Debug, Clone)]
pub struct LeniaEngine {
    rule: LeniaRule,
    kernel: GaussianKernel,
    taps: WrapTaps,
    buffers: DoubleBuffer<f32>,
    convolved: Grid<f32>,
    /// First-pass buffer, present only in separable mode
    scratch: Option<Grid<f32>>,
}

impl LeniaEngine {
    pub fn new(config: &LeniaConfig, initial: Grid<f32>) -> Result<Self> {
        let (height, width) = (initial.height(), initial.width());
        if config.kernel_size > height.min(width) {
            warn!(
                kernel_size = config.kernel_size,
                height,
                width,
                "Lenia kernel is larger than the grid; its footprint wraps onto itself"
            );
        }

        let kernel = GaussianKernel::new(config.kernel_size)?;
        let taps = WrapTaps::new(config.kernel_size, height, width)?;
        let convolved = Grid::new(height, width, 0.0)?;
        let scratch = match config.convolution {
            ConvolutionMode::Direct => None,
            ConvolutionMode::Separable => Some(Grid::new(height, width, 0.0)?),
        };

        Ok(Self {
            rule: LeniaRule::from(config),
            kernel,
            taps,
            buffers: DoubleBuffer::new(initial)?,
            convolved,
            scratch,
        })
    }

    pub fn step(&mut self) {
        let (current, next) = self.buffers.split();

        match &mut self.scratch {
            None => convolve_direct(current, &self.kernel, &self.taps, &mut self.convolved),
            Some(scratch) => convolve_separable(
                current,
                &self.kernel,
                &self.taps,
                scratch,
                &mut self.convolved,
            ),
        }

        for ((dst, &cur), &u) in next
            .cells_mut()
            .iter_mut()
            .zip(current.cells())
            .zip(self.convolved.cells())
        {
            *dst = self.rule.transition(cur, u);
        }

        self.buffers.swap();
    }

    pub fn grid(&self) -> &Grid<f32> {
        self.buffers.current()
    }
}
