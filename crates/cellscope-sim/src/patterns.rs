//! Initial grid contents: the canonical glider, seeded random fills and speckles.

use crate::grid::Grid;
use cellscope_core::Position;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// `(row, col)` of the five live cells of the regression glider, anchored at the origin.
///
/// ```text
/// #..
/// .##
/// ##.
/// ```
///
/// Under Conway's rule it reappears every 4 generations shifted by one row and one column.
pub const GLIDER: [(isize, isize); 5] = [(0, 0), (1, 1), (1, 2), (2, 0), (2, 1)];

/// Deterministic generator for a seed byte
pub fn seeded_rng(seed: u8) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed as u64)
}

/// Set the glider cells to `alive`, leaving all other cells untouched
pub fn place_glider<T: Clone>(grid: &mut Grid<T>, alive: T) {
    for &(row, col) in GLIDER.iter() {
        grid.set(Position::new(col, row), alive.clone());
    }
}

/// Independent 50/50 coin flip per cell
pub fn fill_binary_random(grid: &mut Grid<bool>, rng: &mut ChaCha8Rng) {
    for cell in grid.cells_mut() {
        *cell = rng.gen_bool(0.5);
    }
}

/// Uniform density in [0, 1) per cell
pub fn fill_uniform_random(grid: &mut Grid<f32>, rng: &mut ChaCha8Rng) {
    for cell in grid.cells_mut() {
        *cell = rng.gen::<f32>();
    }
}

/// Drop `count` squares of side `size` at random spots, each cell a random intensity.
/// Squares crossing an edge wrap around.
pub fn scatter_speckles(grid: &mut Grid<f32>, count: usize, size: usize, rng: &mut ChaCha8Rng) {
    let size = size.max(1) as isize;

    for _ in 0..count {
        let top = rng.gen_range(0..grid.height()) as isize;
        let left = rng.gen_range(0..grid.width()) as isize;

        for dy in 0..size {
            for dx in 0..size {
                grid.set(Position::new(left + dx, top + dy), rng.gen::<f32>());
            }
        }
    }
}
