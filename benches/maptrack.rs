use criterion::{criterion_group, criterion_main, Criterion};
use maptrack::lowlevel::{match_template, IntegralImage, NeedleStats};
use maptrack::{InferParams, MapTracker, MemoryResources, OwnedImage, Rect, Rgba, TrackerConfig};
use std::hint::black_box;

fn make_map(width: usize, height: usize) -> OwnedImage {
    let data: Vec<Rgba> = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                [
                    (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8,
                    (((x * 5) + (y * 11)) & 0xFF) as u8,
                    (((x ^ y) * 3) & 0xFF) as u8,
                    255,
                ]
            })
        })
        .collect();
    OwnedImage::new(data, width, height).unwrap()
}

fn bench_scan(c: &mut Criterion) {
    let map = make_map(400, 400);
    let integral = IntegralImage::new(map.view());
    let needle_img = OwnedImage::from_view(map.view().roi(150, 120, 33, 33).unwrap());
    let needle = NeedleStats::from_view(needle_img.view()).unwrap();

    c.bench_function("ncc_scan_400_needle_33", |b| {
        b.iter(|| black_box(match_template(map.view(), &integral, &needle, None, false)));
    });

    let region = Rect::new(100, 100, 250, 250);
    c.bench_function("ncc_scan_400_needle_33_region", |b| {
        b.iter(|| black_box(match_template(map.view(), &integral, &needle, Some(&region), false)));
    });

    c.bench_function("integral_build_400", |b| {
        b.iter(|| black_box(IntegralImage::new(map.view())));
    });
}

fn bench_infer(c: &mut Criterion) {
    let map = make_map(600, 600);
    let cfg = TrackerConfig::default();
    let mut screen = OwnedImage::filled(256, 224, [40, 40, 40, 255]).unwrap();
    let side = 2 * cfg.minimap.radius + 1;
    let patch = map.view().roi(260, 200, side, side).unwrap();
    screen.blit(patch, cfg.minimap.center_x - cfg.minimap.radius, cfg.minimap.center_y - cfg.minimap.radius);
    let pointer_side = 2 * cfg.pointer.radius + 1;
    let pointer = OwnedImage::from_view(
        screen
            .view()
            .roi(
                cfg.pointer.center_x - cfg.pointer.radius,
                cfg.pointer.center_y - cfg.pointer.radius,
                pointer_side,
                pointer_side,
            )
            .unwrap(),
    );

    let resources = MemoryResources::new()
        .with_map("bench", map, None)
        .with_pointer(pointer);
    let tracker = MapTracker::new(cfg, resources).unwrap();
    tracker.warm_up().unwrap();

    let params = InferParams::default();
    c.bench_function("infer_600_default_precision", |b| {
        b.iter(|| black_box(tracker.infer(screen.view(), &params).unwrap()));
    });
}

criterion_group!(benches, bench_scan, bench_infer);
criterion_main!(benches);
