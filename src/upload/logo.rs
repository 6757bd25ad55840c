//! Local logo analysis: dimension probing and size advice. Advisory only,
//! never blocks an upload.

use image::GenericImageView;

use crate::error::ValidationError;

/// Recommended share of the QR edge a logo should occupy.
const LOGO_EDGE_RATIO: f64 = 0.25;
/// Tolerance before the longest edge is flagged as oversized.
const LOGO_EDGE_TOLERANCE: f64 = 1.6;
/// File-size threshold above which the logo is flagged regardless of
/// dimensions.
const LOGO_SOFT_MAX_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoReport {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    /// Suggested maximum for the longest edge, derived from the QR size.
    pub recommended_edge: u32,
    pub oversized: bool,
}

/// Longest logo edge recommended for a QR of `qr_size_px`.
#[must_use]
pub fn recommended_logo_edge(qr_size_px: u32) -> u32 {
    (f64::from(qr_size_px) * LOGO_EDGE_RATIO).round() as u32
}

/// Probe the image dimensions and rate the logo against the current QR
/// size: flagged when the longest edge exceeds 1.6x the recommendation or
/// the file weighs more than 1 MB.
pub fn analyze_logo(bytes: &[u8], qr_size_px: u32) -> Result<LogoReport, ValidationError> {
    let img = image::load_from_memory(bytes)
        .map_err(|error| ValidationError::UnreadableImage(error.to_string()))?;
    let (width, height) = img.dimensions();
    let recommended_edge = recommended_logo_edge(qr_size_px);
    let tolerated = (f64::from(recommended_edge) * LOGO_EDGE_TOLERANCE).round() as u32;
    let longest = width.max(height);
    let size_bytes = bytes.len() as u64;
    Ok(LogoReport {
        width,
        height,
        size_bytes,
        recommended_edge,
        oversized: longest > tolerated || size_bytes > LOGO_SOFT_MAX_BYTES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG: 1x1 transparent pixel.
    fn tiny_png() -> Vec<u8> {
        let mut out = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut out);
        image::ImageEncoder::write_image(
            encoder,
            &[0_u8, 0, 0, 0],
            1,
            1,
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        out
    }

    #[test]
    fn recommended_edge_is_a_quarter_of_the_qr() {
        assert_eq!(recommended_logo_edge(1024), 256);
        assert_eq!(recommended_logo_edge(512), 128);
    }

    #[test]
    fn tiny_logo_is_not_flagged() {
        let report = analyze_logo(&tiny_png(), 1024).unwrap();
        assert_eq!((report.width, report.height), (1, 1));
        assert_eq!(report.recommended_edge, 256);
        assert!(!report.oversized);
    }

    #[test]
    fn tiny_qr_flags_a_relatively_large_logo() {
        // 1x1 logo against a 2px QR: recommended edge rounds to 1 and the
        // tolerance to 2, so this stays fine; shrink the QR to zero to
        // force the flag path via the edge rule.
        let report = analyze_logo(&tiny_png(), 0).unwrap();
        assert_eq!(report.recommended_edge, 0);
        assert!(report.oversized);
    }

    #[test]
    fn garbage_bytes_are_an_unreadable_image() {
        let result = analyze_logo(b"definitely not an image", 1024);
        assert!(matches!(result, Err(ValidationError::UnreadableImage(_))));
    }
}
