//! Configuration management for slide-compose.
//!
//! This module provides the command-line interface:
//! - Subcommands and arguments via clap
//! - Environment variables with `SLIDE_` prefix
//! - Parsers for rectangles, sizes and channel lists
//!
//! # Example
//!
//! ```
//! use clap::Parser;
//! use slide_compose::config::{Cli, Command};
//!
//! let cli = Cli::parse_from([
//!     "slide-compose", "read", "scan.png", "--rect", "0,0,512,512", "-o", "out.png",
//! ]);
//! match cli.command {
//!     Command::Read(config) => assert!(config.validate().is_ok()),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `SLIDE_DRIVER` - Driver id to open files with (default: auto-detect)
//! - `SLIDE_TILE_SIZE` - Tile size of the image driver (default: 256)
//! - `SLIDE_CACHE_TILES` - Decoded tile cache size in bytes (default: 64MB)

use clap::{Args, Parser, Subcommand};

use crate::geometry::{Rect, Size};

pub use crate::tile::DEFAULT_TILE_CACHE_CAPACITY;

// =============================================================================
// Default Values
// =============================================================================

/// Default tile edge length for drivers that choose their own tiling.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Largest accepted tile edge length.
pub const MAX_TILE_SIZE: u32 = 16_384;

// =============================================================================
// CLI Arguments
// =============================================================================

/// slide-compose - Read regions of whole-slide images.
///
/// Opens a slide with the matching driver and composes arbitrary blocks,
/// at any output size, from its tiles.
#[derive(Parser, Debug, Clone)]
#[command(name = "slide-compose")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List registered drivers and the files they handle.
    Drivers,

    /// Print scene and pyramid metadata of a slide.
    Info(InfoConfig),

    /// Read a block of a scene and save it as an image.
    Read(ReadConfig),
}

/// Arguments of the `info` command.
#[derive(Args, Debug, Clone)]
pub struct InfoConfig {
    /// Slide file to inspect.
    pub path: String,

    /// Driver id; auto-detected from the file name if omitted.
    #[arg(long, env = "SLIDE_DRIVER")]
    pub driver: Option<String>,

    /// Print metadata as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl InfoConfig {
    /// Driver id to pass to the registry; empty means auto-detect.
    pub fn driver_id(&self) -> &str {
        self.driver.as_deref().unwrap_or("")
    }
}

/// Arguments of the `read` command.
#[derive(Args, Debug, Clone)]
pub struct ReadConfig {
    /// Slide file to read from.
    pub path: String,

    /// Block to read in scene pixels, as `x,y,width,height`.
    #[arg(long, value_parser = parse_rect)]
    pub rect: Rect,

    /// Output size as `width,height`; defaults to the block size.
    #[arg(long, value_parser = parse_size)]
    pub size: Option<Size>,

    /// Channels to read, as `0,2,1`; defaults to all.
    #[arg(long, value_parser = parse_channels, default_value = "")]
    pub channels: ChannelList,

    /// Scene index within the slide.
    #[arg(long, default_value_t = 0)]
    pub scene: usize,

    /// Driver id; auto-detected from the file name if omitted.
    #[arg(long, env = "SLIDE_DRIVER")]
    pub driver: Option<String>,

    /// Tile size used by the image driver.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "SLIDE_TILE_SIZE")]
    pub tile_size: u32,

    /// Decoded tile cache capacity in bytes.
    #[arg(long, default_value_t = DEFAULT_TILE_CACHE_CAPACITY, env = "SLIDE_CACHE_TILES")]
    pub cache_tiles: usize,

    /// Output image file; the format follows its extension.
    #[arg(short, long)]
    pub output: String,
}

/// Channel indices parsed from the command line.
///
/// A newtype so clap does not treat the value as a repeated argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelList(pub Vec<usize>);

impl ReadConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.rect.is_empty() {
            return Err(format!("--rect {} must have a positive width and height", self.rect));
        }
        if let Some(size) = self.size {
            if size.is_empty() {
                return Err(format!("--size {} must have a positive width and height", size));
            }
        }
        if self.tile_size == 0 || self.tile_size > MAX_TILE_SIZE {
            return Err(format!("tile_size must be between 1 and {}", MAX_TILE_SIZE));
        }
        if self.output.is_empty() {
            return Err("output path is required".to_string());
        }
        Ok(())
    }

    /// Size of the output image.
    pub fn output_size(&self) -> Size {
        self.size.unwrap_or_else(|| self.rect.size())
    }

    pub fn driver_id(&self) -> &str {
        self.driver.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Value Parsers
// =============================================================================

fn parse_numbers<T: std::str::FromStr>(value: &str, count: usize, what: &str) -> Result<Vec<T>, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != count {
        return Err(format!(
            "expected {} comma-separated values for {}, got '{}'",
            count, what, value
        ));
    }
    parts
        .iter()
        .map(|p| {
            p.parse::<T>()
                .map_err(|_| format!("invalid number '{}' in {}", p, what))
        })
        .collect()
}

/// Parse `x,y,width,height`.
pub fn parse_rect(value: &str) -> Result<Rect, String> {
    let v: Vec<i32> = parse_numbers(value, 4, "rectangle")?;
    Ok(Rect::new(v[0], v[1], v[2], v[3]))
}

/// Parse `width,height`.
pub fn parse_size(value: &str) -> Result<Size, String> {
    let v: Vec<i32> = parse_numbers(value, 2, "size")?;
    Ok(Size::new(v[0], v[1]))
}

/// Parse a comma-separated channel list; an empty string means all channels.
pub fn parse_channels(value: &str) -> Result<ChannelList, String> {
    if value.trim().is_empty() {
        return Ok(ChannelList::default());
    }
    value
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid channel index '{}'", p.trim()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ChannelList)
}

// =============================================================================
// Tests
// =============================================================================
