//! # Camera Filters
//!
//! Real-time filter pipeline for camera frames: a catalog of named filters,
//! the pixel kernels behind them, and the compositing that layers overlays
//! on top.
//!
//! Frames go in one at a time, the selected filter is applied at the user's
//! intensity, and exactly one displayable frame comes out. A filter that
//! cannot run (unknown name, missing asset) hands the input back unchanged.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use camera_filters::{config::Config, composition::FilterPipeline, frame::Frame};
//!
//! # fn main() -> camera_filters::Result<()> {
//! let mut pipeline = FilterPipeline::from_config(&Config::default())?;
//! pipeline.select("color_posterize", 6.0);
//!
//! let camera_frame = Frame::new_filled(640, 480, [0.2, 0.4, 0.6, 1.0]);
//! let shown = pipeline.process(&camera_frame);
//! assert_eq!(shown.extent(), camera_frame.extent());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`filters`] - Filter descriptors, kinds and the read-only registry
//! - [`kernels`] - Pixel kernels and the kernel library built at start-up
//! - [`engine`] - Applies one filter to one frame
//! - [`composition`] - Compositor and the pipeline driver
//! - [`assets`] - Overlay image, kernel bundle and color LUT loading
//! - [`config`] - Configuration management
//!
//! ## Region Detection
//!
//! Circle splash and twirl follow a detected region (typically a face).
//! Plug a detector in by implementing [`RegionDetector`](engine::RegionDetector):
//!
//! ```rust,no_run
//! use camera_filters::engine::RegionDetector;
//! use camera_filters::frame::{Extent, Frame};
//!
//! struct UpperThird;
//!
//! impl RegionDetector for UpperThird {
//!     fn detect(&self, frame: &Frame) -> Option<Extent> {
//!         let e = frame.extent();
//!         Some(Extent::new(e.x, e.y, e.width, e.height / 3))
//!     }
//! }
//! ```

pub mod assets;
pub mod composition;
pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod frame;
pub mod kernels;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{Compositor, FilterPipeline, FitPolicy},
    config::Config,
    engine::{FilterEngine, RegionDetector},
    error::{FilterError, Result},
    filters::{FilterDescriptor, FilterKind, FilterRegistry},
    frame::Frame,
    kernels::KernelLibrary,
};
