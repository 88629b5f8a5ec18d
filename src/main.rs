//! slide-compose - Read regions of whole-slide images.
//!
//! This binary wires the driver registry to the command line.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slide_compose::{
    config::{Cli, Command, InfoConfig, ReadConfig},
    format::ImageDriver,
    slide::{BlockRequest, DriverRegistry, SlideSummary},
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Drivers => run_drivers(),
        Command::Info(config) => run_info(config),
        Command::Read(config) => run_read(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "slide_compose=debug"
    } else {
        "slide_compose=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Drivers Command
// =============================================================================

fn run_drivers() -> ExitCode {
    let registry = DriverRegistry::with_default_drivers();
    for id in registry.driver_ids() {
        if let Some(driver) = registry.driver(&id) {
            println!("{:<10} {}", id, driver.file_pattern());
        }
    }
    ExitCode::SUCCESS
}

// =============================================================================
// Info Command
// =============================================================================

fn run_info(config: InfoConfig) -> ExitCode {
    let registry = DriverRegistry::with_default_drivers();
    let slide = match registry.open_slide(&config.path, config.driver_id()) {
        Ok(slide) => slide,
        Err(e) => {
            error!("Failed to open {}: {}", config.path, e);
            return ExitCode::FAILURE;
        }
    };
    let summary = SlideSummary::from_slide(slide.as_ref());

    if config.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize metadata: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("{}", summary.path);
    for (index, scene) in summary.scenes.iter().enumerate() {
        println!();
        println!("Scene {}: {}", index, scene.name);
        println!("  Rect:          {}", scene.rect);
        println!(
            "  Channels:      {} ({})",
            scene.channels,
            scene
                .data_types
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("  Z-slices:      {}", scene.z_slices);
        println!("  Time frames:   {}", scene.t_frames);
        println!(
            "  Resolution:    {} x {}",
            scene.resolution.x, scene.resolution.y
        );
        println!("  Magnification: {}", scene.magnification);
        println!("  Compression:   {}", scene.compression);
        if !scene.aux_images.is_empty() {
            println!("  Aux images:    {}", scene.aux_images.join(", "));
        }
        println!("  Levels:");
        for level in &scene.levels {
            println!("    {}", level);
        }
    }
    ExitCode::SUCCESS
}

// =============================================================================
// Read Command
// =============================================================================

fn run_read(config: ReadConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut registry = DriverRegistry::with_default_drivers();
    registry.register(Box::new(ImageDriver::with_options(
        config.tile_size,
        config.cache_tiles,
    )));

    let mut slide = match registry.open_slide(&config.path, config.driver_id()) {
        Ok(slide) => slide,
        Err(e) => {
            error!("Failed to open {}: {}", config.path, e);
            return ExitCode::FAILURE;
        }
    };
    let num_scenes = slide.num_scenes();
    let Some(scene) = slide.scene_mut(config.scene) else {
        error!(
            "Scene {} does not exist, {} has {} scene(s)",
            config.scene, config.path, num_scenes
        );
        return ExitCode::FAILURE;
    };

    let request = BlockRequest::new(config.rect)
        .size(config.output_size())
        .channels(&config.channels.0);
    let block = match scene.read(&request) {
        Ok(block) => block,
        Err(e) => {
            error!("Failed to read {}: {}", config.rect, e);
            return ExitCode::FAILURE;
        }
    };
    let Some(raster) = block.into_planes().into_iter().next() else {
        error!("Read returned no planes");
        return ExitCode::FAILURE;
    };

    let image = match raster.to_dynamic_image() {
        Ok(image) => image,
        Err(e) => {
            error!("Cannot encode block: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = image.save(&config.output) {
        error!("Failed to write {}: {}", config.output, e);
        return ExitCode::FAILURE;
    }

    info!(
        "Wrote {} ({}, {} channel(s)) to {}",
        raster.size(),
        raster.data_type().name(),
        raster.channels(),
        config.output
    );
    ExitCode::SUCCESS
}
