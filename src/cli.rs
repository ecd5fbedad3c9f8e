use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::TransparencyMode;

#[derive(Parser)]
#[command(
    name = "icoforge",
    version,
    about = "Convert PNG, JPEG, BMP, GIF, TIFF and WebP images into multi-size ICO files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (defaults apply when it does not exist)
    #[arg(long, global = true, default_value = "icoforge.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a commented icoforge.toml template
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Convert an image file or URL into a .ico with 16-256px frames
    Convert {
        /// Image path or http(s) URL
        input: String,

        /// Output path (default: <input stem>.ico)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How to handle transparency (overrides the config file)
        #[arg(long, value_enum)]
        transparency: Option<TransparencyArg>,

        /// Chroma-key tolerance used with --transparency auto
        #[arg(long)]
        tolerance: Option<f64>,

        /// Recolor transparent pixels from their neighbors before resizing
        #[arg(long)]
        bleed: bool,

        /// Give up if the conversion takes longer than this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,
    },

    /// Validate an image without converting it
    Check {
        /// Image path or http(s) URL
        input: String,
    },
}

/// Preservation and background removal are exclusive choices here.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum TransparencyArg {
    /// Keep the alpha channel where the format has one
    Preserve,
    /// Make the background color detected in the corners transparent
    Auto,
    /// Write opaque frames
    None,
}

impl From<TransparencyArg> for TransparencyMode {
    fn from(arg: TransparencyArg) -> Self {
        match arg {
            TransparencyArg::Preserve => TransparencyMode::Preserve,
            TransparencyArg::Auto => TransparencyMode::Auto,
            TransparencyArg::None => TransparencyMode::None,
        }
    }
}
