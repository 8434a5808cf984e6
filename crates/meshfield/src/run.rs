//! Wires CLI input into the palette synthesizer, renderer, and exporters.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use palette::hex_to_rgb01;
use renderer::{run_preview, RendererConfig, DEFAULT_SURFACE_SIZE};

use crate::cli::{ExportFormat, RunArgs};
use crate::controller::Controller;
use crate::export::{css_stylesheet, MeshConfig};

pub fn initialise_tracing() {
    let default_filter = "warn,meshfield=info,renderer=info,scheduler=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Opens the preview window and renders until it is closed.
pub fn run(args: RunArgs) -> Result<()> {
    let controller = controller_from_args(&args);
    let colors = controller.palette();
    tracing::info!(
        points = controller.point_count(),
        animate = controller.animate(),
        palette = ?colors,
        "starting meshfield preview"
    );
    run_preview(renderer_config(&args, &controller, &colors))
}

/// Prints the requested export to stdout and exits.
pub fn export(args: &RunArgs, format: &ExportFormat) -> Result<()> {
    let controller = controller_from_args(args);
    let colors = controller.palette();
    match format {
        ExportFormat::Css => {
            println!("{}", css_stylesheet(&colors));
        }
        ExportFormat::Config => {
            let (width, height) = args.size.unwrap_or(DEFAULT_SURFACE_SIZE);
            let config = MeshConfig {
                colors,
                point_count: controller.point_count(),
                animate: controller.animate(),
                width,
                height,
            };
            println!("{}", config.to_json()?);
        }
    }
    Ok(())
}

fn controller_from_args(args: &RunArgs) -> Controller {
    Controller::new(args.points, args.colors.clone(), args.animate, args.seed)
}

fn renderer_config(args: &RunArgs, controller: &Controller, colors: &[String]) -> RendererConfig {
    let (width, height) = args.size.unwrap_or(DEFAULT_SURFACE_SIZE);
    RendererConfig {
        surface_size: (width, height),
        colors: colors.iter().map(|c| hex_to_rgb01(c)).collect(),
        point_count: controller.point_count(),
        animate: controller.animate(),
        target_fps: args.fps,
        antialiasing: args.antialias,
    }
}
