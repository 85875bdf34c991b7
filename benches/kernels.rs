use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use camera_filters::{
    assets::{AssetStore, KernelBundle},
    composition::{Compositor, FitPolicy},
    config::EngineConfig,
    engine::FilterEngine,
    filters::FilterRegistry,
    frame::Frame,
    kernels::KernelLibrary,
};

fn camera_frame(width: u32, height: u32) -> Frame {
    Frame::render(camera_filters::frame::Extent::from_size(width, height), |x, y| {
        [
            x as f32 / width as f32,
            y as f32 / height as f32,
            ((x ^ y) & 0xff) as f32 / 255.0,
            1.0,
        ]
    })
}

fn bench_filters(c: &mut Criterion) {
    let registry = FilterRegistry::new();
    let assets = AssetStore::empty()
        .with_overlay(camera_frame(256, 256))
        .with_bundle(KernelBundle::builtin());
    let kernels = KernelLibrary::initialize(&registry, &assets);
    let engine = FilterEngine::new(
        kernels,
        EngineConfig {
            random_seed: Some(1),
            ..EngineConfig::default()
        },
    );
    let frame = camera_frame(640, 480);

    let mut group = c.benchmark_group("apply_640x480");
    for name in [
        "cross_polynomial",
        "false_color_custom",
        "tv_static",
        "glitch",
        "twirl_distortion",
        "crosshatch",
        "polar_pixellate",
    ] {
        let descriptor = match registry.lookup(name) {
            Ok(descriptor) => descriptor,
            Err(_) => continue,
        };
        let intensity = descriptor.primary_parameter().map_or(0.0, |spec| spec.default);
        group.bench_with_input(BenchmarkId::from_parameter(name), descriptor, |b, descriptor| {
            b.iter(|| engine.apply(black_box(&frame), descriptor, intensity))
        });
    }
    group.finish();
}

fn bench_composite(c: &mut Criterion) {
    let background = camera_frame(1280, 720);
    let foreground = camera_frame(640, 360);

    let mut group = c.benchmark_group("composite_1280x720");
    for fit in [FitPolicy::Stretch, FitPolicy::Fill, FitPolicy::Fit] {
        let compositor = Compositor::new(fit);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{:?}", fit)), &fit, |b, _| {
            b.iter(|| compositor.composite(black_box(&background), black_box(&foreground), 0.7))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filters, bench_composite);
criterion_main!(benches);
