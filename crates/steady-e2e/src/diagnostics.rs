// Diagnostics - Failure artifacts: screenshots and console dumps
//
// File names are `<sanitized test name>_<unix millis>.<ext>`, with every
// character outside [A-Za-z0-9] replaced by '_'. Directories are created on
// demand.

use crate::console::ConsoleCapture;
use crate::driver::SharedDriver;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Replaces every non-alphanumeric ASCII character with '_'.
pub fn sanitize_test_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn artifact_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    dir.join(format!("{}_{}.{}", sanitize_test_name(name), millis, extension))
}

/// Writes a full-page screenshot into `dir` and returns its path.
pub async fn capture_screenshot(driver: &SharedDriver, dir: &Path, test_name: &str) -> Result<PathBuf> {
    let bytes = driver.screenshot(true).await?;
    tokio::fs::create_dir_all(dir).await?;

    let path = artifact_path(dir, test_name, "png");
    tokio::fs::write(&path, bytes).await?;
    tracing::info!(path = %path.display(), "screenshot saved");
    Ok(path)
}

/// Dumps captured console messages into `dir` as pretty JSON.
pub async fn write_console_log(capture: &ConsoleCapture, dir: &Path, test_name: &str) -> Result<PathBuf> {
    let json = serde_json::to_vec_pretty(&capture.entries())?;
    tokio::fs::create_dir_all(dir).await?;

    let path = artifact_path(dir, test_name, "console.json");
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_test_name() {
        assert_eq!(
            sanitize_test_name("header: Sport link navigates (chromium)"),
            "header__Sport_link_navigates__chromium_"
        );
        assert_eq!(sanitize_test_name("Competiții"), "Competi_ii");
    }

    #[test]
    fn test_artifact_path_shape() {
        let path = artifact_path(Path::new("shots"), "live page", "png");
        let file = path.file_name().unwrap().to_str().unwrap();
        assert!(file.starts_with("live_page_"));
        assert!(file.ends_with(".png"));
        assert_eq!(path.parent(), Some(Path::new("shots")));
    }
}
