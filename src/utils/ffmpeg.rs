//! Locating and probing the ffmpeg binary

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::errors::ConfigError;

/// Resolves the ffmpeg binary: the configured path if given, otherwise `PATH`.
pub fn locate_ffmpeg(configured: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match configured {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) => Err(ConfigError::MissingBinary(path.display().to_string())),
        None => which::which("ffmpeg")
            .map_err(|e| ConfigError::MissingBinary(format!("ffmpeg not on PATH: {}", e))),
    }
}

/// Получение версии FFmpeg (первая строка `ffmpeg -version`)
pub async fn ffmpeg_version(binary: &Path) -> std::io::Result<String> {
    let output = Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "ffmpeg -version exited with {}",
            output.status
        )));
    }

    let version_str = String::from_utf8_lossy(&output.stdout);
    Ok(version_str.lines().next().unwrap_or("").to_string())
}
