//! Vision module
//!
//! Recognizes the interact prompt on screen by matching a reference image
//! against a capture of the game window.

pub mod capture;
pub mod matching;

pub use capture::ScreenCapture;
pub use matching::{find_template, TemplateMatch};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use crate::config::ActionBitmapSpec;
use crate::game::WindowContext;
use crate::platform::{PlatformError, Region, ScreenSource};

/// Result of one scan for the interact prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Prompt found at window-relative coordinates
    Found { x: u32, y: u32 },
    NotFound,
}

impl ScanOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ScanOutcome::Found { .. })
    }
}

/// Anything that can look for the interact prompt
pub trait ActionScanner: Send {
    fn scan(&mut self) -> Result<ScanOutcome, VisionError>;
}

/// Scans the game window for the action reference image
pub struct ActionRecognizer {
    capture: ScreenCapture,
    template: RgbaImage,
    tolerance: f32,
    region: Region,
}

impl ActionRecognizer {
    /// Load the reference image and aim at the game window
    pub fn load(
        spec: &ActionBitmapSpec,
        source: Arc<dyn ScreenSource>,
        ctx: &WindowContext,
    ) -> Result<Self, VisionError> {
        let template = load_template(&spec.image_path)?;
        Ok(Self::new(template, spec.match_tolerance, source, ctx.region()))
    }

    pub fn new(
        template: RgbaImage,
        tolerance: f32,
        source: Arc<dyn ScreenSource>,
        region: Region,
    ) -> Self {
        Self {
            capture: ScreenCapture::new(source),
            template,
            tolerance,
            region,
        }
    }
}

impl ActionScanner for ActionRecognizer {
    fn scan(&mut self) -> Result<ScanOutcome, VisionError> {
        log::info!("action scan start");

        let frame = self.capture.grab(self.region)?;
        log::debug!("captured frame {}", self.capture.frame_count());

        let outcome = match find_template(&frame, &self.template, self.tolerance) {
            Some(found) => {
                log::info!(
                    "action scan success: x, y: {}, {} (score {:.3})",
                    found.x,
                    found.y,
                    found.score
                );
                ScanOutcome::Found {
                    x: found.x,
                    y: found.y,
                }
            }
            None => {
                log::info!("action scan fail: not found");
                ScanOutcome::NotFound
            }
        };

        Ok(outcome)
    }
}

/// Load a reference image from disk
pub fn load_template(path: &Path) -> Result<RgbaImage, VisionError> {
    let template = image::open(path)
        .map_err(|source| VisionError::TemplateLoad {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    if template.width() == 0 || template.height() == 0 {
        return Err(VisionError::EmptyTemplate(path.to_path_buf()));
    }

    Ok(template)
}

/// Vision system errors
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Failed to load reference image {path}: {source}")]
    TemplateLoad {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Reference image {0} is empty")]
    EmptyTemplate(PathBuf),
    #[error("Captured frame for {0:?} is empty")]
    EmptyFrame(Region),
    #[error(transparent)]
    Capture(#[from] PlatformError),
}
