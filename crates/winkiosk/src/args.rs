//! Command-line interface for the winkiosk binary.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::assets::Anchor;

/// Borderless kiosk host: embeds a foreign top-level window.
#[derive(Debug, Parser)]
#[command(name = "winkiosk", about = "Embed a foreign window in a borderless kiosk host", version)]
#[command(group(ArgGroup::new("target").required(true).args(["title", "launch"])))]
pub struct Cli {
    /// Substring of the target window's title
    #[arg(long)]
    pub title: Option<String>,

    /// Command to launch; its main window becomes the target
    #[arg(long)]
    pub launch: Option<String>,

    /// Declared width: -1 = current extent, 0 = auto-fit, positive = exact
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub width: i32,

    /// Declared height, same sentinels as width
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub height: i32,

    /// Absolute x position (requires --y)
    #[arg(long, requires = "y", allow_hyphen_values = true)]
    pub x: Option<i32>,

    /// Absolute y position (requires --x)
    #[arg(long, requires = "x", allow_hyphen_values = true)]
    pub y: Option<i32>,

    /// Background image drawn over the host client area
    #[arg(long, value_name = "PATH")]
    pub background: Option<PathBuf>,

    /// Overlay image composited above the background
    #[arg(long, value_name = "PATH")]
    pub overlay: Option<PathBuf>,

    /// Overlay placement
    #[arg(long, value_enum, default_value_t = Anchor::Center)]
    pub overlay_anchor: Anchor,

    /// Logging controls
    #[command(flatten)]
    pub log: logging::LogArgs,
}
