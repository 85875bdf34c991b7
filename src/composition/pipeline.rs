use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    assets::AssetStore,
    composition::compositor::{Compositor, FitPolicy},
    config::{Config, OverlayConfig},
    engine::FilterEngine,
    error::{FilterError, Result},
    filters::FilterRegistry,
    frame::Frame,
    kernels::KernelLibrary,
};

/// The filter the user currently has selected
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub name: String,
    pub intensity: f32,
}

impl FilterSelection {
    pub fn new<S: Into<String>>(name: S, intensity: f32) -> Self {
        Self {
            name: name.into(),
            intensity,
        }
    }
}

/// Supplies one overlay frame per camera frame
///
/// Video decoding lives outside this crate; anything that can hand out
/// frames in order (a decoder, a frame cache, a still image) fits here.
pub trait OverlaySource: Send {
    /// Next overlay frame, or `None` when the source has nothing to show
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Cycles through a fixed list of frames, restarting at the end
#[derive(Debug, Clone)]
pub struct LoopingOverlay {
    frames: Vec<Frame>,
    position: usize,
}

impl LoopingOverlay {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames, position: 0 }
    }

    /// A single still image shown on every frame
    pub fn still(frame: Frame) -> Self {
        Self::new(vec![frame])
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl OverlaySource for LoopingOverlay {
    fn next_frame(&mut self) -> Option<Frame> {
        let frame = self.frames.get(self.position)?.clone();
        self.position = (self.position + 1) % self.frames.len();
        Some(frame)
    }
}

/// An overlay source composited on top of every filtered frame
pub struct OverlayLayer {
    source: Box<dyn OverlaySource>,
    pub opacity: f32,
    pub fit: FitPolicy,
}

impl OverlayLayer {
    /// Layer at opacity 0.7, stretched to the camera frame
    pub fn new<S: OverlaySource + 'static>(source: S) -> Self {
        Self::from_config(source, &OverlayConfig::default())
    }

    pub fn from_config<S: OverlaySource + 'static>(source: S, config: &OverlayConfig) -> Self {
        Self {
            source: Box::new(source),
            opacity: config.opacity,
            fit: config.fit,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_fit(mut self, fit: FitPolicy) -> Self {
        self.fit = fit;
        self
    }
}

/// Counters kept by the pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames_processed: u64,
    pub passed_through: u64,
    pub overlays_composited: u64,
}

/// Drives camera frames through the selected filter and the overlay layer
///
/// Owns the registry handle, the engine and the current selection. Each
/// call to [`process`](Self::process) yields exactly one displayable frame:
/// filter failures fall back to the unmodified input.
pub struct FilterPipeline {
    registry: Arc<FilterRegistry>,
    engine: FilterEngine,
    selection: Option<FilterSelection>,
    overlay: Option<OverlayLayer>,
    pool: rayon::ThreadPool,
    stats: PipelineStats,
}

impl FilterPipeline {
    pub fn new(registry: Arc<FilterRegistry>, engine: FilterEngine) -> Result<Self> {
        let threads = engine.config().worker_threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| FilterError::generic(format!("Failed to build worker pool: {}", e)))?;

        Ok(Self {
            registry,
            engine,
            selection: None,
            overlay: None,
            pool,
            stats: PipelineStats::default(),
        })
    }

    /// Build the whole stack from configuration
    ///
    /// Loads assets and prepares every kernel before returning, so no file
    /// access happens once frames start flowing.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(FilterRegistry::new());
        let assets = AssetStore::load(&config.assets);
        let kernels = KernelLibrary::initialize(&registry, &assets);
        let engine = FilterEngine::new(kernels, config.engine.clone());

        info!(
            "🎞️  Pipeline ready: {} filters, {} worker threads",
            registry.len(),
            config.engine.worker_threads
        );
        Self::new(registry, engine)
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    pub fn selection(&self) -> Option<&FilterSelection> {
        self.selection.as_ref()
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Select a filter; unknown names are kept and pass frames through
    pub fn select<S: Into<String>>(&mut self, name: S, intensity: f32) {
        let selection = FilterSelection::new(name, intensity);
        if !self.registry.contains(&selection.name) {
            warn!("Selected unknown filter '{}'; frames will pass through", selection.name);
        } else {
            debug!("Selected '{}' at {:.3}", selection.name, selection.intensity);
        }
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn set_overlay(&mut self, overlay: Option<OverlayLayer>) {
        self.overlay = overlay;
    }

    /// Filter one frame, then composite the next overlay frame if any
    pub fn process(&mut self, frame: &Frame) -> Frame {
        let overlay = self.next_overlay();
        let (output, passed) = filter_frame(&self.registry, &self.engine, self.selection.as_ref(), frame);
        let output = composite_overlay(output, overlay.as_ref());
        self.record(passed, overlay.is_some());
        output
    }

    /// Process independent frames in parallel
    ///
    /// Overlay frames are drawn in input order before any filtering starts,
    /// so the result matches calling [`process`](Self::process) per frame.
    pub fn process_batch(&mut self, frames: &[Frame]) -> Vec<Frame> {
        let overlays: Vec<Option<(Frame, f32, FitPolicy)>> = frames.iter().map(|_| self.next_overlay()).collect();

        let registry = &self.registry;
        let engine = &self.engine;
        let selection = self.selection.as_ref();

        let results: Vec<(Frame, bool)> = self.pool.install(|| {
            frames
                .par_iter()
                .zip(overlays.par_iter())
                .map(|(frame, overlay)| {
                    let (output, passed) = filter_frame(registry, engine, selection, frame);
                    (composite_overlay(output, overlay.as_ref()), passed)
                })
                .collect()
        });

        for (passed, overlay) in results.iter().map(|(_, passed)| *passed).zip(&overlays) {
            self.record(passed, overlay.is_some());
        }
        debug!("Processed batch of {} frames", frames.len());
        results.into_iter().map(|(frame, _)| frame).collect()
    }

    fn next_overlay(&mut self) -> Option<(Frame, f32, FitPolicy)> {
        let layer = self.overlay.as_mut()?;
        let frame = layer.source.next_frame()?;
        Some((frame, layer.opacity, layer.fit))
    }

    fn record(&mut self, passed_through: bool, overlaid: bool) {
        self.stats.frames_processed += 1;
        if passed_through {
            self.stats.passed_through += 1;
        }
        if overlaid {
            self.stats.overlays_composited += 1;
        }
    }
}

/// Apply the selection; the flag reports whether the frame passed through
fn filter_frame(
    registry: &FilterRegistry,
    engine: &FilterEngine,
    selection: Option<&FilterSelection>,
    frame: &Frame,
) -> (Frame, bool) {
    let Some(selection) = selection else {
        return (frame.clone(), false);
    };
    match engine.apply_by_name(registry, frame, &selection.name, selection.intensity) {
        Ok(output) => (output, false),
        Err(e) => {
            warn!("Passing frame through unfiltered: {}", e);
            (frame.clone(), true)
        }
    }
}

fn composite_overlay(frame: Frame, overlay: Option<&(Frame, f32, FitPolicy)>) -> Frame {
    match overlay {
        Some((layer, opacity, fit)) => Compositor::new(*fit).composite(&frame, layer, *opacity),
        None => frame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn pipeline(threads: usize) -> FilterPipeline {
        let registry = Arc::new(FilterRegistry::new());
        let kernels = KernelLibrary::initialize(&registry, &AssetStore::empty());
        let config = EngineConfig {
            random_seed: Some(5),
            worker_threads: threads,
            ..EngineConfig::default()
        };
        FilterPipeline::new(registry, FilterEngine::new(kernels, config)).unwrap()
    }

    fn gray(value: f32) -> Frame {
        Frame::new_filled(24, 16, [value, value, value, 1.0])
    }

    #[test]
    fn test_no_selection_passes_frames_unchanged() {
        let mut pipeline = pipeline(1);
        let frame = gray(0.4);
        let output = pipeline.process(&frame);

        assert_eq!(output.as_image().as_raw(), frame.as_image().as_raw());
        assert_eq!(pipeline.stats().frames_processed, 1);
        assert_eq!(pipeline.stats().passed_through, 0);
    }

    #[test]
    fn test_unknown_selection_passes_through() {
        let mut pipeline = pipeline(1);
        pipeline.select("does_not_exist", 0.5);
        let frame = gray(0.4);

        let output = pipeline.process(&frame);
        assert_eq!(output.as_image().as_raw(), frame.as_image().as_raw());
        assert_eq!(pipeline.stats().passed_through, 1);
    }

    #[test]
    fn test_selected_filter_is_applied() {
        let mut pipeline = pipeline(1);
        pipeline.select("color_invert", 0.0);
        let output = pipeline.process(&gray(0.25));
        assert_eq!(output.pixel(3, 3), [0.75, 0.75, 0.75, 1.0]);

        pipeline.clear_selection();
        assert_eq!(pipeline.process(&gray(0.25)).pixel(3, 3), [0.25, 0.25, 0.25, 1.0]);
    }

    #[test]
    fn test_looping_overlay_restarts() {
        let mut overlay = LoopingOverlay::new(vec![gray(0.0), gray(1.0)]);
        let values: Vec<f32> = (0..5)
            .filter_map(|_| overlay.next_frame())
            .map(|f| f.pixel(0, 0)[0])
            .collect();
        assert_eq!(values, vec![0.0, 1.0, 0.0, 1.0, 0.0]);

        assert!(LoopingOverlay::new(Vec::new()).next_frame().is_none());
    }

    #[test]
    fn test_overlay_is_composited_after_filter() {
        let mut pipeline = pipeline(1);
        let layer = OverlayLayer::new(LoopingOverlay::still(gray(1.0))).with_opacity(0.5);
        pipeline.set_overlay(Some(layer));

        let p = pipeline.process(&gray(0.0)).pixel(0, 0);
        assert!((p[0] - 0.5).abs() < 1e-6);
        assert_eq!(pipeline.stats().overlays_composited, 1);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let frames: Vec<Frame> = (0..6).map(|i| gray(i as f32 / 6.0)).collect();

        let mut sequential = pipeline(1);
        sequential.select("color_posterize", 4.0);
        sequential.set_overlay(Some(OverlayLayer::new(LoopingOverlay::new(vec![gray(0.0), gray(1.0)]))));
        let expected: Vec<Frame> = frames.iter().map(|f| sequential.process(f)).collect();

        let mut batched = pipeline(3);
        batched.select("color_posterize", 4.0);
        batched.set_overlay(Some(OverlayLayer::new(LoopingOverlay::new(vec![gray(0.0), gray(1.0)]))));
        let actual = batched.process_batch(&frames);

        assert_eq!(actual.len(), expected.len());
        for (a, b) in actual.iter().zip(&expected) {
            assert_eq!(a.as_image().as_raw(), b.as_image().as_raw());
        }
        assert_eq!(batched.stats(), sequential.stats());
    }

    #[test]
    fn test_from_default_config() {
        let mut config = Config::default();
        config.assets.overlay_image = None;
        config.assets.kernel_bundle = None;

        let pipeline = FilterPipeline::from_config(&config).unwrap();
        assert_eq!(pipeline.registry().len(), 47);
        assert!(!pipeline.engine().kernels().is_available("glitch"));
    }
}
