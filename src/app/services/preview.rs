use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Nothing to preview. Please compile HTML first!")]
    NothingToPreview,

    #[error("Failed to write preview file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to open browser: {0}")]
    Launch(String),
}

/// Displays HTML in some browser-capable viewer.
pub trait PreviewOpener {
    fn open(&self, html: &str) -> Result<(), PreviewError>;
}

/// Writes the HTML to a temp file and hands it to the system browser.
#[derive(Debug, Clone)]
pub struct BrowserPreview {
    dir: PathBuf,
}

impl Default for BrowserPreview {
    fn default() -> Self {
        Self::new(preview_dir())
    }
}

impl BrowserPreview {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn preview_path(&self) -> PathBuf {
        self.dir.join("preview.html")
    }

    /// Write `html` to the preview file, creating the directory if needed.
    pub fn write_preview_file(&self, html: &str) -> Result<PathBuf, PreviewError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.preview_path();
        fs::write(&path, html)?;
        Ok(path)
    }
}

impl PreviewOpener for BrowserPreview {
    fn open(&self, html: &str) -> Result<(), PreviewError> {
        let path = self.write_preview_file(html)?;
        tracing::info!(path = %path.display(), "opening preview in browser");
        launch(&path)
    }
}

fn launch(path: &Path) -> Result<(), PreviewError> {
    open::that(path).map_err(|e| PreviewError::Launch(e.to_string()))
}

/// Directory holding preview files for this application.
pub fn preview_dir() -> PathBuf {
    std::env::temp_dir().join("htmlforge")
}

/// Remove the preview directory and everything in it.
pub fn cleanup_preview_dir() {
    let _ = fs::remove_dir_all(preview_dir());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_preview_file_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let preview = BrowserPreview::new(tmp.path().join("nested"));
        let path = preview.write_preview_file("<p>hello</p>").unwrap();
        assert_eq!(path, tmp.path().join("nested").join("preview.html"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>hello</p>");
    }

    #[test]
    fn test_write_preview_file_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let preview = BrowserPreview::new(tmp.path().to_path_buf());
        preview.write_preview_file("first").unwrap();
        let path = preview.write_preview_file("second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();
        // A regular file where the directory should be
        let preview = BrowserPreview::new(blocker.join("sub"));
        let err = preview.open("<p>x</p>").unwrap_err();
        assert!(matches!(err, PreviewError::Io(_)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PreviewError::NothingToPreview.to_string(),
            "Nothing to preview. Please compile HTML first!"
        );
        assert_eq!(
            PreviewError::Launch("no browser".to_string()).to_string(),
            "Failed to open browser: no browser"
        );
    }

    #[test]
    fn test_preview_dir_is_under_temp() {
        assert!(preview_dir().starts_with(std::env::temp_dir()));
        assert!(BrowserPreview::default().preview_path().ends_with("htmlforge/preview.html"));
    }
}
