//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the largest size that fits inside `bounds` with the aspect
/// ratio of `source`.
///
/// The constraining side always equals its bound exactly; the other side is
/// rounded and never exceeds its bound or drops below 1px. Upscaling is
/// allowed: a small source grows until it touches the box.
///
/// # Arguments
/// * `source` - Source image dimensions (width, height)
/// * `bounds` - Bounding box (width, height)
///
/// # Returns
/// * `(width, height)` - Output dimensions
///
/// # Examples
/// ```
/// # use imgresize::imaging::calculate_fit_dimensions;
/// // 800x600 into a 400x400 box is width-bound → 400x300
/// assert_eq!(calculate_fit_dimensions((800, 600), (400, 400)), (400, 300));
///
/// // Portrait 600x800 into 400x400 is height-bound → 300x400
/// assert_eq!(calculate_fit_dimensions((600, 800), (400, 400)), (300, 400));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 {
        return bounds;
    }

    // Compare max_w/src_w against max_h/src_h without floating point
    let width_bound = (max_w as u64) * (src_h as u64) <= (max_h as u64) * (src_w as u64);

    if width_bound {
        let h = (max_w as f64 * src_h as f64 / src_w as f64).round() as u32;
        (max_w, h.clamp(1, max_h.max(1)))
    } else {
        let w = (max_h as f64 * src_w as f64 / src_h as f64).round() as u32;
        (w.clamp(1, max_w.max(1)), max_h)
    }
}

/// Resolve a requested dimension against the source: zero means "keep the
/// source dimension".
pub fn resolve_dimension(requested: u32, source: u32) -> u32 {
    if requested == 0 { source } else { requested }
}
