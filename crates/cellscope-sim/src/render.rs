//! Boundary with the rendering shell: colour frames, point layout and window titles.

use crate::grid::try_buffer;
use cellscope_core::{Result, Rgb, Variant};

/// Flat row-major buffer of `height * width` RGB triples, each channel in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    rgb: Vec<f32>,
}

impl Frame {
    /// Black frame; the buffer is reserved fallibly like a grid
    pub fn new(height: usize, width: usize) -> Result<Self> {
        Ok(Self {
            width,
            height,
            rgb: try_buffer(height, width, 3, 0.0)?,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rgb(&self) -> &[f32] {
        &self.rgb
    }

    pub fn rgb_mut(&mut self) -> &mut [f32] {
        &mut self.rgb
    }

    pub fn pixel(&self, row: usize, col: usize) -> Rgb {
        let i = (row * self.width + col) * 3;
        Rgb::new(self.rgb[i], self.rgb[i + 1], self.rgb[i + 2])
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, color: Rgb) {
        let i = (row * self.width + col) * 3;
        self.rgb[i..i + 3].copy_from_slice(&color.to_array());
    }

    pub fn mean_luminance(&self) -> f32 {
        let pixels = self.width * self.height;
        if pixels == 0 {
            return 0.0;
        }
        let total: f32 = self
            .rgb
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]).luminance())
            .sum();
        total / pixels as f32
    }
}

/// Consumer of finished frames, e.g. a GPU uploader or a headless logger.
///
/// `configure` is called once at startup with the window caption and the fixed point layout;
/// `present` then receives one frame per step.
pub trait Renderer {
    fn configure(&mut self, title: &str, points: &[[f32; 2]]) -> Result<()>;

    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Normalized device coordinates of every cell's point, row-major, row 0 at the top
pub fn point_layout(height: usize, width: usize) -> Result<Vec<[f32; 2]>> {
    let mut points = try_buffer(height, width, 1, [0.0f32; 2])?;
    for (index, point) in points.iter_mut().enumerate() {
        let (row, col) = (index / width, index % width);
        let y = row as f32 / height as f32 * 2.0 - 1.0;
        let x = col as f32 / width as f32 * 2.0 - 1.0;
        *point = [x, -y];
    }
    Ok(points)
}

/// Window caption; the Wolfram caption spells out the rule byte in binary
pub fn window_title(variant: Variant, seed: u8) -> String {
    match variant {
        Variant::Wolfram => format!("Wolfram rule {} ({:08b})", seed, seed),
        other => other.to_string(),
    }
}
