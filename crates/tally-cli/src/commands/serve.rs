//! Server command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Turn command-line settings into a server configuration
pub fn build_config(
    upload_dir: PathBuf,
    max_upload_mb: usize,
    extensions: &str,
) -> Result<tally_server::ServerConfig> {
    if max_upload_mb == 0 {
        anyhow::bail!("--max-upload-mb must be at least 1");
    }

    let allowed_extensions = tally_server::parse_extensions(extensions);
    if allowed_extensions.is_empty() {
        anyhow::bail!("At least one upload extension is required");
    }
    for ext in &allowed_extensions {
        if ext.parse::<tally_core::SheetFormat>().is_err() {
            anyhow::bail!("Unsupported upload extension: {} (valid: xlsx, csv)", ext);
        }
    }

    let max_upload_size = max_upload_mb
        .checked_mul(1024 * 1024)
        .with_context(|| format!("--max-upload-mb {} is too large", max_upload_mb))?;

    Ok(tally_server::ServerConfig {
        upload_dir,
        max_upload_size,
        allowed_extensions,
    })
}

pub async fn cmd_serve(
    host: &str,
    port: u16,
    upload_dir: PathBuf,
    max_upload_mb: usize,
    extensions: &str,
) -> Result<()> {
    let config = build_config(upload_dir, max_upload_mb, extensions)?;

    println!("🚀 Starting Tally web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Upload dir: {}", config.upload_dir.display());
    println!("   Max upload: {} MB", max_upload_mb);
    println!("   Extensions: {}", config.allowed_extensions.join(", "));
    println!();
    println!("   Press Ctrl+C to stop");

    tally_server::serve_with_config(host, port, config).await?;

    Ok(())
}
