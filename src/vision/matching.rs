//! Tolerant sub-image search
//!
//! Locates a reference image inside a captured frame using normalized
//! squared-difference template matching on grayscale copies of both.

use image::RgbaImage;
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};

/// Best placement of a template inside a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateMatch {
    /// Top-left corner of the match, in frame coordinates
    pub x: u32,
    pub y: u32,
    /// Dissimilarity of the match; 0 is a perfect match
    pub score: f32,
}

/// Find `template` in `frame`, accepting matches whose dissimilarity is at
/// most `tolerance`.
///
/// Dissimilarity is the square root of the normalized sum of squared
/// differences, which tracks the relative per-pixel deviation: a tolerance
/// of 0.4 lets pixels drift by roughly 40% of their value.
pub fn find_template(
    frame: &RgbaImage,
    template: &RgbaImage,
    tolerance: f32,
) -> Option<TemplateMatch> {
    if template.width() == 0
        || template.height() == 0
        || template.width() > frame.width()
        || template.height() > frame.height()
    {
        return None;
    }

    let haystack = image::imageops::grayscale(frame);
    let needle = image::imageops::grayscale(template);

    let scores = match_template(
        &haystack,
        &needle,
        MatchTemplateMethod::SumOfSquaredErrorsNormalized,
    );
    let extremes = find_extremes(&scores);

    let score = extremes.min_value.max(0.0).sqrt();
    if score.is_finite() && score <= tolerance {
        let (x, y) = extremes.min_value_location;
        Some(TemplateMatch { x, y, score })
    } else {
        None
    }
}
