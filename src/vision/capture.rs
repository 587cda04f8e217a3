//! Screen capture handling
//!
//! Grabs the game window region from a [`ScreenSource`] and counts the
//! frames taken.

use std::sync::Arc;

use image::RgbaImage;

use super::VisionError;
use crate::platform::{Region, ScreenSource};

/// Screen capture handler
pub struct ScreenCapture {
    source: Arc<dyn ScreenSource>,
    /// Frame counter
    frame_count: u64,
}

impl ScreenCapture {
    pub fn new(source: Arc<dyn ScreenSource>) -> Self {
        Self {
            source,
            frame_count: 0,
        }
    }

    /// Capture `region`. An empty capture is an error.
    pub fn grab(&mut self, region: Region) -> Result<RgbaImage, VisionError> {
        let frame = self.source.capture(region)?;
        if frame.width() == 0 || frame.height() == 0 {
            return Err(VisionError::EmptyFrame(region));
        }

        self.frame_count += 1;
        Ok(frame)
    }

    /// Get the frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::StaticScreen;
    use image::{ImageBuffer, Rgba};

    fn screen() -> Arc<StaticScreen> {
        Arc::new(StaticScreen::new(ImageBuffer::from_fn(100, 80, |x, _| {
            Rgba([x as u8, 0, 0, 255])
        })))
    }

    #[test]
    fn test_grab_crops_region() {
        let screen = screen();
        let mut capture = ScreenCapture::new(screen.clone());

        let region = Region {
            x: 10,
            y: 5,
            width: 20,
            height: 10,
        };
        let frame = capture.grab(region).unwrap();

        assert_eq!(frame.dimensions(), (20, 10));
        assert_eq!(frame.get_pixel(0, 0)[0], 10);
        assert_eq!(capture.frame_count(), 1);
        assert_eq!(screen.captures.lock().unwrap().as_slice(), &[region]);
    }

    #[test]
    fn test_empty_frame_rejected() {
        let mut capture = ScreenCapture::new(screen());

        let outside = Region {
            x: 200,
            y: 200,
            width: 20,
            height: 10,
        };
        assert!(matches!(
            capture.grab(outside),
            Err(VisionError::EmptyFrame(_))
        ));
        assert_eq!(capture.frame_count(), 0);
    }
}
