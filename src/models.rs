use std::fmt;

use image::{ColorType, DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};

/// Square edge lengths written into every icon, smallest first.
pub const ICON_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// Chroma-key tolerance used when none is configured.
pub const DEFAULT_TOLERANCE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: Option<u8>,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: None }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    /// Euclidean distance between the RGB parts of two colors. Alpha is ignored.
    pub fn distance(&self, other: &Color) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            Some(a) => write!(f, "({}, {}, {}, {})", self.r, self.g, self.b, a),
            None => write!(f, "({}, {}, {})", self.r, self.g, self.b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Grayscale,
    Rgb,
    Rgba,
}

impl ChannelLayout {
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::L8 | ColorType::L16 => ChannelLayout::Grayscale,
            c if c.has_alpha() => ChannelLayout::Rgba,
            _ => ChannelLayout::Rgb,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, ChannelLayout::Rgba)
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelLayout::Grayscale => write!(f, "grayscale"),
            ChannelLayout::Rgb => write!(f, "RGB"),
            ChannelLayout::Rgba => write!(f, "RGBA"),
        }
    }
}

/// A decoded input image, owned by a single conversion.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub format: ImageFormat,
    pub image: DynamicImage,
}

impl SourceImage {
    /// Fully decodes `bytes`, sniffing the container format from its content.
    ///
    /// Every pixel layout the decoders can produce is folded into 8-bit
    /// grayscale, RGB or RGBA.
    pub fn decode(bytes: &[u8]) -> image::ImageResult<Self> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;

        Ok(Self {
            format,
            image: fold_layout(image),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn layout(&self) -> ChannelLayout {
        ChannelLayout::of(&self.image)
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

fn fold_layout(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 | ColorType::Rgba8 => image,
        ColorType::L16 => DynamicImage::ImageLuma8(image.to_luma8()),
        c if c.has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionOptions {
    /// Keep (or add) an alpha channel in the output frames.
    pub preserve_transparency: bool,

    /// Detect the background color from the corners and key it out.
    /// Takes precedence over `preserve_transparency`.
    pub auto_transparent_bg: bool,

    pub tolerance: f64,

    /// Recolor fully transparent pixels from their opaque neighbors before resizing.
    pub alpha_bleed: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            preserve_transparency: true,
            auto_transparent_bg: false,
            tolerance: DEFAULT_TOLERANCE,
            alpha_bleed: false,
        }
    }
}

impl ConversionOptions {
    pub fn from_mode(mode: TransparencyMode) -> Self {
        Self {
            preserve_transparency: mode == TransparencyMode::Preserve,
            auto_transparent_bg: mode == TransparencyMode::Auto,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransparencyMode {
    #[default]
    Preserve,
    Auto,
    None,
}

impl fmt::Display for TransparencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransparencyMode::Preserve => write!(f, "preserve"),
            TransparencyMode::Auto => write!(f, "auto"),
            TransparencyMode::None => write!(f, "none"),
        }
    }
}

/// The encoded icon plus what the pipeline decided along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconArtifact {
    pub bytes: Vec<u8>,
    pub transparency_mode: TransparencyMode,

    /// Preservation was requested but the source format has no alpha support.
    pub transparency_downgraded: bool,
}

impl IconArtifact {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
