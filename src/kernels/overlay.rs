use crate::frame::{Frame, Point};

/// Composite a shifted, semi-transparent overlay onto `input`
///
/// The overlay is stretched to the input size and aligned with its origin,
/// then moved by `offset`. Parts that slide off the input are cut away and
/// uncovered input shows through unchanged.
pub fn glitch(input: &Frame, overlay: &Frame, opacity: f32, offset: Point) -> Frame {
    let (x, y) = input.origin();
    overlay
        .resized(input.width(), input.height())
        .moved_to(x, y)
        .translated(offset.x, offset.y)
        .with_opacity(opacity)
        .source_over(input)
        .cropped(input.extent())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glitch_keeps_input_extent() {
        let input = Frame::new_filled(120, 80, [0.2, 0.2, 0.2, 1.0]).moved_to(5, 5);
        let overlay = Frame::new_filled(30, 30, [1.0, 0.0, 0.0, 1.0]);
        let out = glitch(&input, &overlay, 0.7, Point::new(-50.0, 50.0));
        assert_eq!(out.extent(), input.extent());
    }

    #[test]
    fn test_glitch_blend_and_uncovered_area() {
        let input = Frame::new_filled(100, 100, [0.0, 0.0, 0.0, 1.0]);
        let overlay = Frame::new_filled(10, 10, [1.0, 1.0, 1.0, 1.0]);
        let out = glitch(&input, &overlay, 0.5, Point::new(20.0, 0.0));

        // Uncovered strip on the left
        assert_eq!(out.pixel(5, 50), [0.0, 0.0, 0.0, 1.0]);
        // Covered area is half white
        let p = out.pixel(60, 50);
        assert!((p[0] - 0.5).abs() < 1e-5);
        assert!((p[3] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_opacity_is_identity() {
        let input = Frame::new_filled(16, 16, [0.3, 0.4, 0.5, 1.0]);
        let overlay = Frame::new_filled(16, 16, [1.0, 1.0, 1.0, 1.0]);
        let out = glitch(&input, &overlay, 0.0, Point::new(3.0, 3.0));
        assert_eq!(out.as_image().as_raw(), input.as_image().as_raw());
    }
}
