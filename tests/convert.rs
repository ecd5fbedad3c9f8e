mod common;

use common::{
    decode_ico, encode, ico_entry_sizes, ico_frames, logo, png_bytes, solid_gray, solid_rgba,
    FORMATS, ICO_MAGIC, PNG_SIGNATURE,
};
use icoforge::{convert, ConversionError, ConversionOptions, TransparencyMode};
use image::{ColorType, GenericImageView, ImageFormat};

fn options(preserve_transparency: bool, auto_transparent_bg: bool) -> ConversionOptions {
    ConversionOptions {
        preserve_transparency,
        auto_transparent_bg,
        ..ConversionOptions::default()
    }
}

#[test]
fn default_options() {
    let options = ConversionOptions::default();
    assert!(options.preserve_transparency);
    assert!(!options.auto_transparent_bg);
    assert_eq!(options.tolerance, 10.0);
    assert!(!options.alpha_bleed);
}

#[test]
fn every_format_converts_to_a_readable_icon() {
    let img = logo(32);
    for (format, filename) in FORMATS {
        let bytes = encode(&img, *format);
        let artifact = convert(&bytes, filename, &ConversionOptions::default())
            .unwrap_or_else(|e| panic!("{:?} failed: {}", format, e));

        assert_eq!(artifact.bytes[..4], ICO_MAGIC, "{:?}", format);
        assert_eq!(artifact.size_bytes(), artifact.bytes.len());
        assert_eq!(ico_entry_sizes(&artifact.bytes).len(), 6, "{:?}", format);

        let decoded = image::load_from_memory_with_format(&artifact.bytes, ImageFormat::Ico)
            .unwrap_or_else(|e| panic!("{:?} icon does not decode: {}", format, e));
        assert_eq!(decoded.dimensions(), (256, 256), "{:?}", format);
        assert_eq!(decoded.color(), ColorType::Rgba8, "{:?}", format);
    }
}

#[test]
fn downgraded_formats_decode_opaque() {
    for (format, filename) in FORMATS {
        if matches!(format, ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP) {
            continue;
        }
        let bytes = encode(&logo(32), *format);
        let artifact = convert(&bytes, filename, &ConversionOptions::default()).unwrap();
        assert_eq!(artifact.transparency_mode, TransparencyMode::None);

        let decoded = decode_ico(&artifact.bytes).to_rgba8();
        assert!(decoded.pixels().all(|p| p[3] == 255), "{:?}", format);
    }
}

#[test]
fn png_preserve_keeps_alpha() {
    let bytes = png_bytes(&solid_rgba(16, 16, [0, 0, 0, 0]));
    let artifact = convert(&bytes, "clear.png", &options(true, false)).unwrap();

    assert_eq!(artifact.transparency_mode, TransparencyMode::Preserve);
    assert!(!artifact.transparency_downgraded);
    let frame = decode_ico(&artifact.bytes);
    assert_eq!(frame.color(), ColorType::Rgba8);
    assert_eq!(frame.get_pixel(10, 10)[3], 0);
}

#[test]
fn png_without_alpha_is_promoted_when_preserving() {
    let artifact = convert(&png_bytes(&logo(16)), "logo.png", &options(true, false)).unwrap();
    assert_eq!(artifact.transparency_mode, TransparencyMode::Preserve);
    assert!(ico_frames(&artifact.bytes)
        .iter()
        .all(|f| f.color() == ColorType::Rgba8));
}

#[test]
fn none_mode_drops_alpha() {
    let bytes = png_bytes(&solid_rgba(16, 16, [9, 9, 9, 0]));
    let artifact = convert(&bytes, "clear.png", &options(false, false)).unwrap();

    assert_eq!(artifact.transparency_mode, TransparencyMode::None);
    for frame in ico_frames(&artifact.bytes) {
        assert_eq!(frame.color(), ColorType::Rgba8);
        assert!(frame.to_rgba8().pixels().all(|p| p.0 == [9, 9, 9, 255]));
    }
}

#[test]
fn grayscale_without_transparency_stays_gray_and_opaque() {
    let bytes = png_bytes(&solid_gray(16, 16, 100));
    let artifact = convert(&bytes, "gray.png", &options(false, false)).unwrap();
    for frame in ico_frames(&artifact.bytes) {
        assert!(frame.to_rgba8().pixels().all(|p| p.0 == [100, 100, 100, 255]));
    }
}

#[test]
fn auto_takes_precedence_over_preserve() {
    let bytes = png_bytes(&logo(32));
    let artifact = convert(&bytes, "logo.png", &options(true, true)).unwrap();
    assert_eq!(artifact.transparency_mode, TransparencyMode::Auto);
}

#[test]
fn auto_keys_out_the_background() {
    let bytes = png_bytes(&logo(32));
    let artifact = convert(&bytes, "logo.png", &options(false, true)).unwrap();

    assert_eq!(artifact.transparency_mode, TransparencyMode::Auto);
    let frame = decode_ico(&artifact.bytes).to_rgba8();
    assert_eq!(frame.get_pixel(0, 0)[3], 0);
    assert_eq!(frame.get_pixel(255, 255)[3], 0);
    assert_eq!(frame.get_pixel(128, 128).0, [0, 0, 255, 255]);
}

#[test]
fn auto_works_on_formats_without_alpha() {
    let bytes = encode(&logo(32), ImageFormat::Bmp);
    let artifact = convert(&bytes, "logo.bmp", &options(true, true)).unwrap();

    assert_eq!(artifact.transparency_mode, TransparencyMode::Auto);
    assert!(artifact.transparency_downgraded);
    assert_eq!(decode_ico(&artifact.bytes).get_pixel(0, 0)[3], 0);
}

#[test]
fn jpeg_with_preserve_is_downgraded() {
    let bytes = encode(&logo(32), ImageFormat::Jpeg);
    let artifact = convert(&bytes, "photo.jpg", &options(true, false)).unwrap();

    assert_eq!(artifact.transparency_mode, TransparencyMode::None);
    assert!(artifact.transparency_downgraded);
}

#[test]
fn jpeg_without_preserve_is_not_reported_as_downgraded() {
    let bytes = encode(&logo(32), ImageFormat::Jpeg);
    let artifact = convert(&bytes, "photo.jpeg", &options(false, false)).unwrap();

    assert_eq!(artifact.transparency_mode, TransparencyMode::None);
    assert!(!artifact.transparency_downgraded);
}

#[test]
fn format_is_sniffed_when_filename_has_no_extension() {
    let bytes = encode(&logo(16), ImageFormat::Tiff);
    let artifact = convert(&bytes, "upload", &options(true, false)).unwrap();
    assert_eq!(artifact.transparency_mode, TransparencyMode::None);
    assert!(artifact.transparency_downgraded);
}

#[test]
fn output_is_deterministic() {
    let bytes = png_bytes(&logo(48));
    let first = convert(&bytes, "logo.png", &options(false, true)).unwrap();
    let second = convert(&bytes, "logo.png", &options(false, true)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn alpha_bleed_changes_hidden_colors_only() {
    let bytes = png_bytes(&logo(32));
    let plain = convert(&bytes, "logo.png", &options(false, true)).unwrap();
    let bled = convert(
        &bytes,
        "logo.png",
        &ConversionOptions {
            alpha_bleed: true,
            ..options(false, true)
        },
    )
    .unwrap();

    assert_eq!(bled.transparency_mode, TransparencyMode::Auto);
    assert_ne!(plain.bytes, bled.bytes);

    let plain = decode_ico(&plain.bytes).to_rgba8();
    let bled = decode_ico(&bled.bytes).to_rgba8();
    assert_eq!(bled.get_pixel(0, 0)[3], 0);
    assert_eq!(bled.get_pixel(0, 0).0[..3], [0, 0, 255]);
    assert_eq!(plain.get_pixel(0, 0).0[..3], [255, 0, 0]);
}

#[test]
fn garbage_is_conversion_failed() {
    let err = convert(b"definitely not an image", "x.png", &ConversionOptions::default())
        .unwrap_err();
    assert!(matches!(err, ConversionError::ConversionFailed(_)), "{:?}", err);
}

#[test]
fn bare_signature_is_conversion_failed_inside_the_pipeline() {
    let err = convert(&PNG_SIGNATURE, "x.png", &ConversionOptions::default()).unwrap_err();
    assert!(matches!(err, ConversionError::ConversionFailed(_)), "{:?}", err);
    assert!(err.to_string().contains("x.png"));
}

#[test]
fn concurrent_conversions_are_independent() {
    let bytes = png_bytes(&logo(24));
    let expected = convert(&bytes, "logo.png", &ConversionOptions::default()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let bytes = bytes.clone();
            std::thread::spawn(move || {
                convert(&bytes, "logo.png", &ConversionOptions::default()).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
