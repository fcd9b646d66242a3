//! Headless Chromium capture backend
//!
//! The rendered document is handed to a real browser engine for layout and
//! rasterization. One browser and one tab serve a whole run, including batch
//! runs; captures are strictly sequential. The screenshot is clipped to the
//! document's natural content height and scaled by its device-scale factor.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use thiserror::Error;

use crate::render::RenderedDocument;

/// Environment variable overriding the browser executable location
pub const EXECUTABLE_ENV: &str = "CHATSHOT_CHROMIUM";

/// Locations checked for a usable browser executable
const EXECUTABLE_CANDIDATES: &[&str] = &[
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
];

/// Initial viewport height; the screenshot is clipped to content height
const VIEWPORT_HEIGHT: u32 = 800;

/// Errors from the capture backend
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No usable browser executable could be located
    #[error("No Chromium executable found; set CHATSHOT_CHROMIUM to a browser binary")]
    BackendUnavailable,

    /// The browser failed to start or open a tab
    #[error("Failed to launch capture browser: {message}")]
    Launch { message: String },

    /// Navigation, measurement, or the screenshot itself failed
    #[error("Capture failed: {message}")]
    Failed { message: String },

    /// The image file could not be written
    #[error("Cannot write image: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptureError {
    fn launch(message: impl Into<String>) -> Self {
        CaptureError::Launch {
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        CaptureError::Failed {
            message: message.into(),
        }
    }
}

/// Locate the browser executable: the env override first, then known paths.
pub fn locate_executable() -> Result<PathBuf, CaptureError> {
    if let Ok(path) = env::var(EXECUTABLE_ENV) {
        return Ok(PathBuf::from(path));
    }
    EXECUTABLE_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
        .ok_or(CaptureError::BackendUnavailable)
}

/// Output image encodings, chosen from the output path extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// JPEG for `.jpg`/`.jpeg`, PNG for everything else.
    pub fn from_path(path: &Path) -> ImageFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
                ImageFormat::Jpeg
            }
            _ => ImageFormat::Png,
        }
    }
}

/// A live headless-browser session
pub struct Capture {
    browser: Browser,
    tab: Arc<Tab>,
}

impl Capture {
    /// Launch the browser sized for `width`-pixel documents.
    pub fn launch(width: u32) -> Result<Capture, CaptureError> {
        Capture::launch_with_timeout(width, Duration::from_secs(30))
    }

    /// Launch with an explicit per-operation timeout.
    pub fn launch_with_timeout(width: u32, timeout: Duration) -> Result<Capture, CaptureError> {
        let executable = locate_executable()?;
        debug!("Launching capture browser: {}", executable.display());

        let options = LaunchOptions::default_builder()
            .path(Some(executable))
            .headless(true)
            .sandbox(false)
            .window_size(Some((width, VIEWPORT_HEIGHT)))
            .build()
            .map_err(|e| CaptureError::launch(format!("launch options: {e}")))?;

        let browser = Browser::new(options).map_err(|e| CaptureError::launch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| CaptureError::launch(e.to_string()))?;
        tab.set_default_timeout(timeout);

        Ok(Capture { browser, tab })
    }

    /// Lay out `document` in the browser and write the screenshot to `path`.
    pub fn capture(&self, document: &RenderedDocument, path: &Path) -> Result<(), CaptureError> {
        let url = format!(
            "data:text/html;charset=utf-8;base64,{}",
            STANDARD.encode(document.html())
        );
        self.tab
            .navigate_to(&url)
            .map_err(|e| CaptureError::failed(format!("navigation: {e}")))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| CaptureError::failed(format!("navigation: {e}")))?;

        let height = self.content_height()?;
        debug!(
            "Capturing {}x{} at scale {}",
            document.width(),
            height,
            document.scale()
        );

        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: document.width() as f64,
            height,
            scale: document.scale(),
        };
        let format = match ImageFormat::from_path(path) {
            ImageFormat::Png => Page::CaptureScreenshotFormatOption::Png,
            ImageFormat::Jpeg => Page::CaptureScreenshotFormatOption::Jpeg,
        };

        let bytes = self
            .tab
            .capture_screenshot(format, None, Some(clip), true)
            .map_err(|e| CaptureError::failed(format!("screenshot: {e}")))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Measure the document's natural height in CSS pixels.
    fn content_height(&self) -> Result<f64, CaptureError> {
        let evaluated = self
            .tab
            .evaluate(
                "Math.ceil(document.body.getBoundingClientRect().height)",
                false,
            )
            .map_err(|e| CaptureError::failed(format!("measuring content height: {e}")))?;
        evaluated
            .value
            .and_then(|value| value.as_f64())
            .ok_or_else(|| CaptureError::failed("content height evaluation returned no value"))
    }

    /// Shut the browser down; also happens implicitly on drop.
    pub fn close(self) {
        drop(self.tab);
        drop(self.browser);
    }
}
