use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use tempfile::NamedTempFile;

use crate::api::remote::is_url;
use crate::api::{self, ConvertRequest};
use crate::commands::AlreadyReported;
use crate::cli::{Cli, TransparencyArg};
use crate::config::Config;
use crate::models::{ConversionOptions, TransparencyMode};

pub struct ConvertArgs {
    pub input: String,
    pub output: Option<PathBuf>,
    pub transparency: Option<TransparencyArg>,
    pub tolerance: Option<f64>,
    pub bleed: bool,
    pub timeout: Option<u64>,
    pub json: bool,
    pub force: bool,
}

pub async fn run(cli: &Cli, args: ConvertArgs) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    let options = resolve_options(&config, &args)?;

    let loaded = super::load_input(&args.input, &config).await?;
    let request = ConvertRequest {
        filename: Some(loaded.filename),
        content_type: loaded.content_type,
        bytes: loaded.bytes,
        options,
    };

    let pending = api::handle_async(request, config.limits);
    let result = match args.timeout {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), pending)
            .await
            .map_err(|_| anyhow!("Conversion timed out after {}s", secs))?,
        None => pending.await,
    };

    let response = match result {
        Ok(response) => response,
        Err(error) => {
            let message = format!(
                "{} ({})",
                error.detail,
                error.error_code.as_deref().unwrap_or("UNKNOWN")
            );
            if args.json {
                println!("{}", serde_json::to_string_pretty(&error)?);
                return Err(AlreadyReported(message).into());
            }
            bail!(message);
        }
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input).join(&response.metadata.filename));
    write_output(&output, &response.body, args.force)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response.metadata)?);
        return Ok(());
    }

    if response.metadata.transparency_downgraded {
        println!(
            "{} The input format has no alpha channel; the icon is opaque.",
            "!".yellow()
        );
    }
    println!(
        "{} Wrote {} ({} bytes, transparency: {})",
        "✓".green(),
        output.display(),
        response.content_length,
        response.metadata.transparency_mode
    );

    Ok(())
}

/// Config file values, overridden by whatever was passed on the command line.
pub fn resolve_options(config: &Config, args: &ConvertArgs) -> Result<ConversionOptions> {
    let mut options = config.conversion_options();

    if let Some(transparency) = args.transparency {
        let mode = TransparencyMode::from(transparency);
        options = ConversionOptions {
            tolerance: options.tolerance,
            alpha_bleed: options.alpha_bleed,
            ..ConversionOptions::from_mode(mode)
        };
    }
    if let Some(tolerance) = args.tolerance {
        if !tolerance.is_finite() || tolerance < 0.0 {
            bail!("--tolerance must be a non-negative number, got {}", tolerance);
        }
        options.tolerance = tolerance;
    }
    if args.bleed {
        options.alpha_bleed = true;
    }

    Ok(options)
}

fn default_output_dir(input: &str) -> PathBuf {
    if is_url(input) {
        return PathBuf::from(".");
    }
    Path::new(input)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Stages the icon in a temp file next to `path` and moves it into place.
///
/// The temp file is removed on every path that does not end in a persist.
pub fn write_output(path: &Path, bytes: &[u8], force: bool) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut staged = NamedTempFile::with_prefix_in(".icoforge-", dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    staged
        .write_all(bytes)
        .and_then(|()| staged.as_file().sync_all())
        .with_context(|| format!("Failed to write {}", staged.path().display()))?;

    let persisted = if force {
        staged.persist(path)
    } else {
        staged.persist_noclobber(path)
    };
    persisted.map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            anyhow!("{} already exists. Pass --force to overwrite it.", path.display())
        } else {
            anyhow!("Failed to write {}: {}", path.display(), e.error)
        }
    })?;

    Ok(())
}
