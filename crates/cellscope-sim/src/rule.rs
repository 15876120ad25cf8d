//! Transition rules shared by every simulator variant.

use serde::{Deserialize, Serialize};

/// A pure per-cell transition.
///
/// `Stat` is whatever aggregate the engine gathers around a cell before asking for its next
/// value: a Moore sum, a 3-bit Wolfram pattern, a convolution result, or a disc/annulus filling.
pub trait Rule {
    type Cell: Copy;
    type Stat: Copy;

    fn transition(&self, current: Self::Cell, stat: Self::Stat) -> Self::Cell;
}

/// Scalar contribution of a cell to neighbourhood aggregates
pub trait CellDensity: Copy {
    fn density(&self) -> f32;
}

impl CellDensity for bool {
    fn density(&self) -> f32 {
        if *self {
            1.0
        } else {
            0.0
        }
    }
}

impl CellDensity for f32 {
    fn density(&self) -> f32 {
        *self
    }
}

/// Game of Life cell carrying a decaying heat channel alongside its alive/dead value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeatCell {
    /// 1.0 when alive, 0.0 when dead
    pub value: f32,
    /// 1.0 at birth, multiplied by the decay factor every step the cell survives, 0.0 once dead
    pub heat: f32,
}

impl HeatCell {
    pub const DEAD: HeatCell = HeatCell {
        value: 0.0,
        heat: 0.0,
    };

    pub const NEWBORN: HeatCell = HeatCell {
        value: 1.0,
        heat: 1.0,
    };

    pub fn is_alive(&self) -> bool {
        self.value != 0.0
    }
}

impl CellDensity for HeatCell {
    fn density(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_densities() {
        assert_eq!(true.density(), 1.0);
        assert_eq!(false.density(), 0.0);
        assert_eq!(0.25f32.density(), 0.25);
        assert_eq!(HeatCell::NEWBORN.density(), 1.0);
        assert!(!HeatCell::DEAD.is_alive());
    }

    #[test]
    fn test_heat_only_value_counts() {
        let cell = HeatCell {
            value: 1.0,
            heat: 0.3,
        };
        assert_eq!(cell.density(), 1.0);
    }
}
