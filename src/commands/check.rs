use anyhow::Result;
use colored::Colorize;

use crate::background::detect_background_color;
use crate::cli::Cli;
use crate::config::Config;
use crate::convert::source_format;
use crate::normalize::supports_transparency;
use crate::validate::{check_content, check_format, check_size};

pub async fn run(cli: &Cli, input: &str) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    let loaded = super::load_input(input, &config).await?;

    check_size(loaded.bytes.len() as u64, &config.limits)?;
    check_format(&loaded.filename, loaded.content_type.as_deref())?;
    let source = check_content(&loaded.bytes)?;

    println!("{} {} is a valid image", "✓".green(), loaded.filename);

    let format = source_format(&loaded.filename).unwrap_or(source.format);
    if format != source.format {
        println!(
            "{} Extension says {:?} but the content is {:?}",
            "!".yellow(),
            format,
            source.format
        );
    }

    println!("{:<14} {:?}", "Format", source.format);
    println!("{:<14} {}x{}", "Dimensions", source.width(), source.height());
    println!("{:<14} {}", "Channels", source.layout());
    println!("{:<14} {} bytes", "Size", loaded.bytes.len());
    println!(
        "{:<14} {}",
        "Transparency",
        if supports_transparency(format) {
            "supported"
        } else {
            "not supported (output will be opaque unless --transparency auto)"
        }
    );
    println!(
        "{:<14} {}",
        "Background",
        detect_background_color(&source.image)
    );

    Ok(())
}
