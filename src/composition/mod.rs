//! # Composition
//!
//! Frame compositing and the pipeline driver that runs camera frames through
//! the selected filter and an optional overlay layer.

pub mod compositor;
pub mod pipeline;

// Re-exports for convenience
pub use compositor::{CompositeRequest, Compositor, FitPolicy};
pub use pipeline::{FilterPipeline, FilterSelection, LoopingOverlay, OverlayLayer, OverlaySource, PipelineStats};
