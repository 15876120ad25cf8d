//! Moore-neighbourhood rule engine: Game of Life, heat-trail Life and discretized SmoothLife.
//!
//! All three rules share one toroidal 8-neighbour summation; only the transition differs.

use crate::grid::{DoubleBuffer, Grid};
use crate::rule::{CellDensity, HeatCell, Rule};
use cellscope_core::SmoothLifeThresholds;

/// Sum of the densities of the 8 cells around `(row, col)`, wrapping at every edge
pub fn moore_sum<T: CellDensity>(grid: &Grid<T>, row: usize, col: usize) -> f32 {
    let height = grid.height();
    let width = grid.width();
    let cells = grid.cells();

    let up = (row + height - 1) % height * width;
    let here = row * width;
    let down = (row + 1) % height * width;
    let left = (col + width - 1) % width;
    let right = (col + 1) % width;

    cells[up + left].density()
        + cells[up + col].density()
        + cells[up + right].density()
        + cells[here + left].density()
        + cells[here + right].density()
        + cells[down + left].density()
        + cells[down + col].density()
        + cells[down + right].density()
}

/// Write every cell of `next` from `current` using the Moore sum as the rule statistic
pub fn step_moore<R>(rule: &R, current: &Grid<R::Cell>, next: &mut Grid<R::Cell>)
where
    R: Rule<Stat = f32>,
    R::Cell: CellDensity,
{
    debug_assert!(current.same_shape(next));
    let width = current.width();

    for row in 0..current.height() {
        for col in 0..width {
            let index = row * width + col;
            let sum = moore_sum(current, row, col);
            next.cells_mut()[index] = rule.transition(current.cells()[index], sum);
        }
    }
}

/// Binary Conway rule: survive on 2 or 3, birth on 3
#[derive(Debug, Clone, Copy, Default)]
pub struct ConwayRule;

impl Rule for ConwayRule {
    type Cell = bool;
    type Stat = f32;

    fn transition(&self, alive: bool, sum: f32) -> bool {
        let neighbours = sum.round() as u8;
        matches!((alive, neighbours), (true, 2) | (true, 3) | (false, 3))
    }
}

/// Conway rule on the value channel with a multiplicative heat trail
#[derive(Debug, Clone, Copy)]
pub struct HeatTrailRule {
    pub decay: f32,
}

impl Rule for HeatTrailRule {
    type Cell = HeatCell;
    type Stat = f32;

    fn transition(&self, cell: HeatCell, sum: f32) -> HeatCell {
        let neighbours = sum.round() as u8;
        match (cell.is_alive(), neighbours) {
            (true, 2) | (true, 3) => HeatCell {
                value: 1.0,
                heat: cell.heat * self.decay,
            },
            (false, 3) => HeatCell::NEWBORN,
            _ => HeatCell::DEAD,
        }
    }
}

/// Threshold rule over continuous densities.
///
/// A live cell keeps its value while the sum sits in the survival window; a dead cell becomes
/// 1 inside the birth window; everything else becomes 0. Both windows are inclusive.
#[derive(Debug, Clone, Copy)]
pub struct SmoothLifeRule {
    pub thresholds: SmoothLifeThresholds,
}

impl Rule for SmoothLifeRule {
    type Cell = f32;
    type Stat = f32;

    fn transition(&self, current: f32, sum: f32) -> f32 {
        let t = &self.thresholds;
        let alive = current != 0.0;

        if alive && sum >= t.min_perp && sum <= t.max_perp {
            current
        } else if !alive && sum >= t.min_spawn && sum <= t.max_spawn {
            1.0
        } else {
            0.0
        }
    }
}

/// A Moore rule together with the two generations it alternates between
#[derive(Debug, Clone)]
pub struct MooreEngine<R: Rule> {
    rule: R,
    buffers: DoubleBuffer<R::Cell>,
}

impl<R> MooreEngine<R>
where
    R: Rule<Stat = f32>,
    R::Cell: CellDensity,
{
    pub fn new(rule: R, initial: Grid<R::Cell>) -> cellscope_core::Result<Self> {
        Ok(Self {
            rule,
            buffers: DoubleBuffer::new(initial)?,
        })
    }

    pub fn step(&mut self) {
        let (current, next) = self.buffers.split();
        step_moore(&self.rule, current, next);
        self.buffers.swap();
    }

    pub fn grid(&self) -> &Grid<R::Cell> {
        self.buffers.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{place_glider, GLIDER};
    use cellscope_core::Position;

    fn life_grid(size: usize, live: &[(isize, isize)]) -> Grid<bool> {
        let mut grid = Grid::new(size, size, false).unwrap();
        for &(row, col) in live {
            grid.set(Position::new(col, row), true);
        }
        grid
    }

    fn live_cells(grid: &Grid<bool>) -> Vec<(isize, isize)> {
        let mut cells: Vec<_> = grid
            .iter()
            .filter(|(_, alive)| **alive)
            .map(|(pos, _)| (pos.y, pos.x))
            .collect();
        cells.sort();
        cells
    }

    #[test]
    fn test_single_cell_influences_all_wrapped_neighbours() {
        let grid = life_grid(3, &[(0, 0)]);

        for row in 0..3 {
            for col in 0..3 {
                let expected = if (row, col) == (0, 0) { 0.0 } else { 1.0 };
                assert_eq!(moore_sum(&grid, row, col), expected, "cell ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_corner_sees_opposite_edges() {
        let grid = life_grid(5, &[(4, 4), (4, 0), (0, 4)]);
        assert_eq!(moore_sum(&grid, 0, 0), 3.0);
        assert_eq!(moore_sum(&grid, 2, 2), 0.0);
    }

    #[test]
    fn test_rectangular_wrap() {
        let mut grid = Grid::new(4, 7, false).unwrap();
        grid.set(Position::new(6, 3), true);
        assert_eq!(moore_sum(&grid, 0, 0), 1.0);
        assert_eq!(moore_sum(&grid, 3, 6), 0.0);
        assert_eq!(moore_sum(&grid, 2, 5), 1.0);
    }

    #[test]
    fn test_conway_transitions() {
        let rule = ConwayRule;
        assert!(rule.transition(true, 2.0));
        assert!(rule.transition(true, 3.0));
        assert!(!rule.transition(true, 1.0));
        assert!(!rule.transition(true, 4.0));
        assert!(rule.transition(false, 3.0));
        assert!(!rule.transition(false, 2.0));
    }

    #[test]
    fn test_game_of_life_blinker() {
        let grid = life_grid(5, &[(2, 1), (2, 2), (2, 3)]);
        let mut engine = MooreEngine::new(ConwayRule, grid).unwrap();

        engine.step();
        assert_eq!(live_cells(engine.grid()), vec![(1, 2), (2, 2), (3, 2)]);

        engine.step();
        assert_eq!(live_cells(engine.grid()), vec![(2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_block_is_still_life() {
        let grid = life_grid(6, &[(2, 2), (2, 3), (3, 2), (3, 3)]);
        let initial = grid.clone();
        let mut engine = MooreEngine::new(ConwayRule, grid).unwrap();

        for _ in 0..20 {
            engine.step();
            assert_eq!(engine.grid(), &initial);
        }
    }

    #[test]
    fn test_glider_translates_diagonally() {
        for size in [5usize, 8, 13] {
            let mut grid = Grid::new(size, size, false).unwrap();
            place_glider(&mut grid, true);
            let mut engine = MooreEngine::new(ConwayRule, grid).unwrap();

            for _ in 0..4 {
                engine.step();
            }

            let mut expected: Vec<_> = GLIDER
                .iter()
                .map(|&(row, col)| ((row + 1) % size as isize, (col + 1) % size as isize))
                .collect();
            expected.sort();
            assert_eq!(live_cells(engine.grid()), expected, "size {}", size);
        }
    }

    #[test]
    fn test_glider_wraps_around_torus() {
        let size = 6usize;
        let mut grid = Grid::new(size, size, false).unwrap();
        place_glider(&mut grid, true);
        let initial = grid.clone();
        let mut engine = MooreEngine::new(ConwayRule, grid).unwrap();

        // 4 steps per diagonal cell, `size` cells to come back around
        for _ in 0..4 * size {
            engine.step();
        }
        assert_eq!(engine.grid(), &initial);
    }

    #[test]
    fn test_heat_decays_while_alive() {
        let rule = HeatTrailRule { decay: 0.99 };
        let mut grid = Grid::new(6, 6, HeatCell::DEAD).unwrap();
        for (row, col) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            grid.set(Position::new(col, row), HeatCell::NEWBORN);
        }
        let mut engine = MooreEngine::new(rule, grid).unwrap();

        for k in 1..=50 {
            engine.step();
            let cell = engine.grid().get(Position::new(2, 2));
            assert_eq!(cell.value, 1.0);
            assert!((cell.heat - 0.99f32.powi(k)).abs() < 1e-5, "step {}", k);
        }
    }

    #[test]
    fn test_heat_resets_on_death_and_birth() {
        let rule = HeatTrailRule { decay: 0.99 };
        let mut grid = Grid::new(5, 5, HeatCell::DEAD).unwrap();
        for col in 1..=3 {
            grid.set(Position::new(col, 2), HeatCell::NEWBORN);
        }
        let mut engine = MooreEngine::new(rule, grid).unwrap();

        engine.step();
        let grid = engine.grid();
        // Blinker ends die, the centre survives, the vertical ends are born
        assert_eq!(*grid.get(Position::new(1, 2)), HeatCell::DEAD);
        assert_eq!(*grid.get(Position::new(3, 2)), HeatCell::DEAD);
        assert_eq!(*grid.get(Position::new(2, 1)), HeatCell::NEWBORN);
        assert_eq!(*grid.get(Position::new(2, 3)), HeatCell::NEWBORN);
        let centre = grid.get(Position::new(2, 2));
        assert!((centre.heat - 0.99).abs() < 1e-6);

        engine.step();
        // Reborn on the next flip: heat is exactly 1 again
        assert_eq!(*engine.grid().get(Position::new(1, 2)), HeatCell::NEWBORN);
    }

    #[test]
    fn test_smoothlife_thresholds() {
        let rule = SmoothLifeRule {
            thresholds: SmoothLifeThresholds::default(),
        };

        // Survival keeps the current density
        assert_eq!(rule.transition(0.4, 2.0), 0.4);
        assert_eq!(rule.transition(0.4, 1.5), 0.4);
        // Exactly three is outside the survival window
        assert_eq!(rule.transition(1.0, 3.0), 0.0);
        // Birth sets full density
        assert_eq!(rule.transition(0.0, 2.05), 1.0);
        assert_eq!(rule.transition(0.0, 6.1), 1.0);
        assert_eq!(rule.transition(0.0, 6.2), 0.0);
        assert_eq!(rule.transition(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_smoothlife_glider_first_step() {
        let rule = SmoothLifeRule {
            thresholds: SmoothLifeThresholds::default(),
        };
        let mut grid = Grid::new(8, 8, 0.0f32).unwrap();
        place_glider(&mut grid, 1.0);
        let mut engine = MooreEngine::new(rule, grid).unwrap();

        engine.step();

        let mut live: Vec<_> = engine
            .grid()
            .iter()
            .filter(|(_, v)| **v != 0.0)
            .map(|(pos, _)| (pos.y, pos.x))
            .collect();
        live.sort();
        assert_eq!(live, vec![(0, 1), (1, 0), (1, 2), (2, 0), (2, 2)]);
    }
}
