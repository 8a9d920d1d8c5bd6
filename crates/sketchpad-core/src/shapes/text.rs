//! Text box metrics.
//!
//! Glyph layout belongs to the renderer. The core only needs a box to hit-test
//! and attach handles to, so it estimates one from the character count.

use kurbo::Size;

/// Default font size for new text.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.55;

/// Line height as a fraction of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Narrowest box a text shape gets, so empty text stays clickable.
const MIN_TEXT_WIDTH: f64 = 20.0;

/// Approximate box size for `content` at `font_size`.
pub fn measure(content: &str, font_size: f64) -> Size {
    let widest_line = content
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let mut line_count = content.lines().count().max(1);
    // `lines()` drops a trailing empty line
    if content.ends_with('\n') {
        line_count += 1;
    }

    Size::new(
        (widest_line as f64 * font_size * CHAR_WIDTH_FACTOR).max(MIN_TEXT_WIDTH),
        line_count as f64 * font_size * LINE_HEIGHT_FACTOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_single_line() {
        let size = measure("Hello", 20.0);
        assert!((size.width - 55.0).abs() < 1e-9);
        assert!((size.height - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_measure_multi_line_uses_widest() {
        let size = measure("ab\nabcd\n", 10.0);
        assert!((size.width - 22.0).abs() < 1e-9);
        assert!((size.height - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_measure_empty_has_minimum_width() {
        let size = measure("", 20.0);
        assert!((size.width - MIN_TEXT_WIDTH).abs() < f64::EPSILON);
        assert!(size.height > 0.0);
    }
}
