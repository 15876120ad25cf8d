//! Headless driver: steps a grid simulation at a fixed frame rate, or renders the Mandelbrot field.

mod logging;
mod renderer;

use anyhow::Result;
use cellscope_core::{Demo, RunnerConfig};
use cellscope_sim::render::point_layout;
use cellscope_sim::{Frame, GridSimulator, Renderer, Viewport};
use renderer::LogRenderer;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let config = match RunnerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("Starting cellscope runner");

    match config.demo {
        Demo::Simulation => run_simulation(&config).await?,
        Demo::Mandelbrot => run_mandelbrot(&config)?,
    }

    info!("Shutting down runner");
    Ok(())
}

async fn run_simulation(config: &RunnerConfig) -> Result<()> {
    let mut simulator = startup(
        "simulation",
        GridSimulator::from_config(config.simulation.clone()),
    )?;
    let (height, width) = (simulator.height(), simulator.width());
    let mut frame = startup("frame buffer", Frame::new(height, width))?;
    let points = startup("point layout", point_layout(height, width))?;

    let mut renderer = LogRenderer::new();
    renderer.configure(&simulator.title(), &points)?;

    let mut ticker = interval(Duration::from_secs_f64(1.0 / config.fps as f64));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    info!("Running {}", simulator.title());

    loop {
        if config.frames.is_some_and(|limit| simulator.generation() >= limit) {
            info!("Frame limit reached");
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        simulator.step();
        simulator.render_into(&mut frame);
        renderer.present(&frame)?;

        if simulator.generation() % config.log_every == 0 {
            let stats = simulator.stats();
            info!(
                generation = stats.generation,
                live_cells = stats.live_cells,
                mean_density = stats.mean_density,
                "Simulation progress"
            );
        }
    }

    info!(
        generations = simulator.generation(),
        frames = renderer.presented(),
        "Simulation stopped"
    );
    Ok(())
}

fn run_mandelbrot(config: &RunnerConfig) -> Result<()> {
    let viewport = Viewport::from(&config.mandelbrot);
    let grid = &config.simulation.grid;
    let mut frame = startup("frame buffer", Frame::new(grid.height, grid.width))?;
    let points = startup("point layout", point_layout(grid.height, grid.width))?;

    info!(
        zoom = viewport.zoom,
        max_iter = viewport.max_iter,
        "Rendering Mandelbrot field"
    );
    viewport.render(&mut frame);

    let mut renderer = LogRenderer::new();
    renderer.configure("Mandelbrot", &points)?;
    renderer.present(&frame)?;
    info!("Mean luminance {:.4}", frame.mean_luminance());
    Ok(())
}

/// Log a failed startup step before handing it to `main`
fn startup<T>(what: &str, result: cellscope_core::Result<T>) -> Result<T> {
    result.map_err(|e| {
        error!("Could not create the {}: {}", what, e);
        e.into()
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
