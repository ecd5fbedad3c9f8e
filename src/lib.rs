//! Turns a single PNG, JPEG, BMP, GIF, TIFF or WebP image into a Windows
//! `.ico` holding 16, 32, 48, 64, 128 and 256 pixel frames.
//!
//! [`convert::convert`] is the whole pipeline as one synchronous call. It
//! holds no global state and does no I/O, so front ends can run it on any
//! thread. [`validate::validate`] is the pre-flight check that should run
//! before it on untrusted input; [`api::handle`] bundles the two for upload
//! endpoints.

pub mod alpha_bleed;
pub mod api;
pub mod background;
pub mod cli;
pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod icon;
pub mod models;
pub mod normalize;
pub mod transparency;
pub mod validate;

pub use convert::convert;
pub use error::{ConversionError, ConversionResult};
pub use models::{Color, ConversionOptions, IconArtifact, SourceImage, TransparencyMode, ICON_SIZES};
