//! Grid simulation engine.
//!
//! Toroidal cellular automata (elementary Wolfram rules, Conway's Life and its heat-trail,
//! threshold, Lenia and continuous SmoothLife variants), their colour maps, and the
//! Mandelbrot field shown by the same rendering shell.

pub mod grid;
pub mod rule;
pub mod patterns;
pub mod moore;
pub mod wolfram;
pub mod lenia;
pub mod continuous;
pub mod color;
pub mod render;
pub mod mandelbrot;
pub mod simulator;

pub use grid::{DoubleBuffer, Grid};
pub use rule::{CellDensity, HeatCell, Rule};
pub use render::{Frame, Renderer};
pub use mandelbrot::Viewport;
pub use simulator::{CellView, GridSimulator};
