//! Headless renderer: reports frames through the log instead of a window.

use cellscope_core::{Error, Result};
use cellscope_sim::{Frame, Renderer};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct LogRenderer {
    /// Window caption, set once by `configure`
    title: Option<String>,
    points: usize,
    presented: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Renderer for LogRenderer {
    fn configure(&mut self, title: &str, points: &[[f32; 2]]) -> Result<()> {
        if self.title.is_some() {
            return Err(Error::Validation("renderer is already configured".to_string()));
        }

        info!(title, points = points.len(), "Renderer configured");
        self.title = Some(title.to_string());
        self.points = points.len();
        Ok(())
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let Some(title) = &self.title else {
            return Err(Error::Validation(
                "frame presented before the renderer was configured".to_string(),
            ));
        };
        if frame.width() * frame.height() != self.points {
            return Err(Error::Validation(format!(
                "frame has {} pixels but the layout has {} points",
                frame.width() * frame.height(),
                self.points
            )));
        }

        self.presented += 1;
        debug!(
            title = %title,
            frame = self.presented,
            width = frame.width(),
            height = frame.height(),
            luminance = frame.mean_luminance(),
            "Frame presented"
        );
        Ok(())
    }
}
