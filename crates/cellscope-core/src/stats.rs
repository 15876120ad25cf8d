//! Per-generation statistics for logging.

use serde::{Deserialize, Serialize};

/// Summary of one generation of a grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridStats {
    /// Number of completed steps
    pub generation: u64,
    /// Cells whose density is non-zero
    pub live_cells: usize,
    /// Mean density over the whole grid
    pub mean_density: f64,
}

impl GridStats {
    /// Compute statistics from per-cell densities
    pub fn from_densities(generation: u64, densities: impl IntoIterator<Item = f32>) -> Self {
        let mut count = 0usize;
        let mut live_cells = 0usize;
        let mut total = 0.0f64;

        for density in densities {
            count += 1;
            if density != 0.0 {
                live_cells += 1;
            }
            total += density as f64;
        }

        let mean_density = if count > 0 { total / count as f64 } else { 0.0 };

        Self {
            generation,
            live_cells,
            mean_density,
        }
    }
}
