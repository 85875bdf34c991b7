use crate::frame::{Extent, Frame};

/// Finds the region of interest (typically a face) in a frame
///
/// Circle splash and twirl center themselves on the detected region.
/// Returning `None` is not an error: those filters then center on the frame.
pub trait RegionDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Option<Extent>;
}

/// Detector that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegionDetector;

impl RegionDetector for NoRegionDetector {
    fn detect(&self, _frame: &Frame) -> Option<Extent> {
        None
    }
}

/// Detector that reports the same region for every frame
///
/// Useful when the region comes from elsewhere, e.g. a tracker running on
/// another thread or a fixed crop in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedRegionDetector {
    region: Extent,
}

impl FixedRegionDetector {
    pub fn new(region: Extent) -> Self {
        Self { region }
    }
}

impl RegionDetector for FixedRegionDetector {
    fn detect(&self, frame: &Frame) -> Option<Extent> {
        let visible = frame.extent().intersect(&self.region);
        (!visible.is_empty()).then_some(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_detector_clips_to_frame() {
        let frame = Frame::new_filled(100, 100, [0.0, 0.0, 0.0, 1.0]);
        let detector = FixedRegionDetector::new(Extent::new(80, 80, 50, 50));
        assert_eq!(detector.detect(&frame), Some(Extent::new(80, 80, 20, 20)));

        let elsewhere = FixedRegionDetector::new(Extent::new(500, 500, 10, 10));
        assert_eq!(elsewhere.detect(&frame), None);
    }

    #[test]
    fn test_no_detector() {
        let frame = Frame::new_filled(10, 10, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(NoRegionDetector.detect(&frame), None);
    }
}
