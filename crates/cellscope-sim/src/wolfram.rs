//! Elementary (1-D) Wolfram automata rendered as a scrolling space-time diagram.

use crate::grid::Grid;
use crate::rule::Rule;
use cellscope_core::Result;

/// Elementary rule number; bit `p` is the output for neighbourhood pattern `p`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WolframRule {
    pub rule: u8,
}

impl Rule for WolframRule {
    type Cell = bool;
    type Stat = u8;

    fn transition(&self, _current: bool, pattern: u8) -> bool {
        (self.rule >> pattern) & 1 == 1
    }
}

/// Encode `(left, centre, right)` MSB-to-LSB as a value in 0..8
pub fn neighbourhood_pattern(left: bool, centre: bool, right: bool) -> u8 {
    (left as u8) << 2 | (centre as u8) << 1 | right as u8
}

/// Derive one generation from the previous one, wrapping at both ends of the line
pub fn next_row(rule: &WolframRule, previous: &[bool], out: &mut [bool]) {
    let width = previous.len();
    debug_assert_eq!(width, out.len());

    for col in 0..width {
        let left = previous[(col + width - 1) % width];
        let right = previous[(col + 1) % width];
        let centre = previous[col];
        out[col] = rule.transition(centre, neighbourhood_pattern(left, centre, right));
    }
}

/// Space-time diagram: row `r` is generation `r` of the line, oldest at the top.
///
/// Each step drops the top row and appends the next generation at the bottom.
#[derive(Debug, Clone)]
pub struct SpaceTimeDiagram {
    rule: WolframRule,
    grid: Grid<bool>,
    scratch: Vec<bool>,
}

impl SpaceTimeDiagram {
    /// Start from a single live centre cell and pre-fill every row below it
    pub fn new(height: usize, width: usize, rule: u8) -> Result<Self> {
        let rule = WolframRule { rule };
        let mut grid = Grid::new(height, width, false)?;
        grid.row_mut(0)[width / 2] = true;

        let cells = grid.cells_mut();
        for row in 1..height {
            let (above, below) = cells.split_at_mut(row * width);
            next_row(&rule, &above[(row - 1) * width..], &mut below[..width]);
        }

        Ok(Self {
            rule,
            grid,
            scratch: vec![false; width],
        })
    }

    pub fn step(&mut self) {
        let width = self.grid.width();
        let last = self.grid.height() - 1;

        next_row(&self.rule, self.grid.row(last), &mut self.scratch);
        self.grid.cells_mut().copy_within(width.., 0);
        self.grid.row_mut(last).copy_from_slice(&self.scratch);
    }

    pub fn grid(&self) -> &Grid<bool> {
        &self.grid
    }

    pub fn rule(&self) -> WolframRule {
        self.rule
    }
}
