use maptrack::{
    is_hit, InferParams, MapSource, MapTrackError, MapTrackResult, MapTracker, MemoryResources,
    OwnedImage, Rect, ResourceProvider, Rgba, TrackerConfig, NO_MAP,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Random colour lattice with `cell`-pixel spacing, bilinearly interpolated.
fn smooth_texture(width: usize, height: usize, cell: usize, seed: u64) -> OwnedImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let gw = width / cell + 2;
    let gh = height / cell + 2;
    let lattice: Vec<[f32; 3]> = (0..gw * gh)
        .map(|_| {
            [
                rng.random_range(0.0f32..255.0),
                rng.random_range(0.0f32..255.0),
                rng.random_range(0.0f32..255.0),
            ]
        })
        .collect();

    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let gy = y as f32 / cell as f32;
        let (y0, fy) = (gy.floor() as usize, gy.fract());
        for x in 0..width {
            let gx = x as f32 / cell as f32;
            let (x0, fx) = (gx.floor() as usize, gx.fract());
            let at = |xx: usize, yy: usize| lattice[yy * gw + xx];
            let (a, b, c, d) = (at(x0, y0), at(x0 + 1, y0), at(x0, y0 + 1), at(x0 + 1, y0 + 1));
            let mut px: Rgba = [0, 0, 0, 255];
            for ch in 0..3 {
                let top = a[ch] * (1.0 - fx) + b[ch] * fx;
                let bottom = c[ch] * (1.0 - fx) + d[ch] * fx;
                px[ch] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
            }
            data.push(px);
        }
    }
    OwnedImage::new(data, width, height).unwrap()
}

struct Scene {
    screen: OwnedImage,
    resources: MemoryResources,
}

/// A 1000x1000 target map whose patch centered at (500, 300) is shown on the
/// mini-map, plus a smaller decoy map.
fn scene(config: &TrackerConfig) -> Scene {
    let target = smooth_texture(1000, 1000, 8, 1);
    let decoy = smooth_texture(150, 150, 8, 2);

    let r = config.minimap.radius;
    let side = 2 * r + 1;
    let patch = target.view().roi(500 - r, 300 - r, side, side).unwrap();
    let mut screen = OwnedImage::filled(300, 250, [20, 24, 28, 255]).unwrap();
    screen.blit(patch, config.minimap.center_x - r, config.minimap.center_y - r);

    let pr = config.pointer.radius;
    let pointer_side = 2 * pr + 1;
    let pointer = OwnedImage::from_view(
        screen
            .view()
            .roi(
                config.pointer.center_x - pr,
                config.pointer.center_y - pr,
                pointer_side,
                pointer_side,
            )
            .unwrap(),
    );

    let resources = MemoryResources::new()
        .with_map("decoy", decoy, None)
        .with_map("target", target, Some(Rect::new(470, 270, 530, 330)))
        .with_pointer(pointer);
    Scene { screen, resources }
}

#[test]
fn locates_patch_exactly_at_full_precision() {
    let config = TrackerConfig::default();
    let Scene { screen, resources } = scene(&config);
    let tracker = MapTracker::new(config, resources).unwrap();

    let params = InferParams::new(1.0, 0.5).unwrap();
    let inference = tracker.infer(screen.view(), &params).unwrap();
    let result = &inference.result;
    assert_eq!(result.map_name, "target");
    assert_eq!((result.x, result.y), (500, 300));
    assert!(result.loc_conf > 0.99, "loc_conf {}", result.loc_conf);
    assert_eq!(result.rot, 0);
    assert!(result.rot_conf > 0.99, "rot_conf {}", result.rot_conf);
    assert!(result.loc_time_ms >= 0 && result.rot_time_ms >= 0);
    assert!(inference.hit);
    assert_eq!(tracker.map_names().unwrap(), vec!["decoy", "target"]);
}

#[test]
fn reduced_precision_is_approximate() {
    let config = TrackerConfig::default();
    let Scene { screen, resources } = scene(&config);
    let tracker = MapTracker::new(config, resources).unwrap();

    let params = InferParams::new(0.5, 0.5).unwrap();
    let result = tracker.infer(screen.view(), &params).unwrap().result;
    assert_eq!(result.map_name, "target");
    assert!((result.x - 500).abs() <= 3, "x {}", result.x);
    assert!((result.y - 300).abs() <= 3, "y {}", result.y);
    assert!(result.loc_conf > 0.9, "loc_conf {}", result.loc_conf);
    assert_eq!(result.rot, 0);

    // Same precision again reuses the scaled maps.
    tracker.infer(screen.view(), &params).unwrap();
    assert_eq!(tracker.scaled_cache().rebuild_count(), 1);
    assert_eq!(tracker.scaled_cache().cached_scale(), Some(0.5));
}

#[test]
fn shared_tracker_gives_identical_results() {
    let config = TrackerConfig::default();
    let Scene { screen, resources } = scene(&config);
    let tracker = Arc::new(MapTracker::new(config, resources).unwrap());
    let params = InferParams::new(0.5, 0.5).unwrap();

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..3)
            .map(|_| s.spawn(|| tracker.infer(screen.view(), &params).unwrap().result))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let first = &results[0];
    for r in &results[1..] {
        assert_eq!(r.map_name, first.map_name);
        assert_eq!((r.x, r.y, r.rot), (first.x, first.y, first.rot));
        assert_eq!((r.loc_conf, r.rot_conf), (first.loc_conf, first.rot_conf));
    }
    assert_eq!(tracker.scaled_cache().rebuild_count(), 1);
}

#[test]
fn uniform_screen_is_a_miss_not_an_error() {
    let config = TrackerConfig::default();
    let Scene { resources, .. } = scene(&config);
    let tracker = MapTracker::new(config, resources).unwrap();

    let screen = OwnedImage::filled(300, 250, [77, 77, 77, 255]).unwrap();
    let inference = tracker.infer(screen.view(), &InferParams::default()).unwrap();
    assert_eq!(inference.result.map_name, NO_MAP);
    assert_eq!((inference.result.x, inference.result.y), (0, 0));
    assert_eq!(inference.result.loc_conf, 0.0);
    assert!(inference.result.rot < 360);
    assert!(!inference.hit);
}

#[test]
fn threshold_gates_hits() {
    assert!(is_hit(0.6, 0.6, 0.5));
    assert!(!is_hit(0.6, 0.6, 0.7));
    assert!(!is_hit(0.5, 0.5, 0.5));
}

#[test]
fn out_of_range_params_are_rejected() {
    let config = TrackerConfig::default();
    let Scene { screen, resources } = scene(&config);
    let tracker = MapTracker::new(config, resources).unwrap();
    let params = InferParams {
        precision: 1.5,
        threshold: 0.5,
    };
    assert!(matches!(
        tracker.infer(screen.view(), &params),
        Err(MapTrackError::InvalidConfig { .. })
    ));
}

struct FailingResources {
    calls: Arc<AtomicUsize>,
}

impl ResourceProvider for FailingResources {
    fn load_maps(&self) -> MapTrackResult<Vec<MapSource>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MapTrackError::ResourceNotFound {
            name: "image/MapTracker/map".to_string(),
        })
    }

    fn load_pointer(&self) -> MapTrackResult<OwnedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        OwnedImage::filled(3, 3, [0, 0, 0, 255])
    }
}

#[test]
fn initialization_failure_is_sticky() {
    let calls = Arc::new(AtomicUsize::new(0));
    let tracker = MapTracker::new(
        TrackerConfig::default(),
        FailingResources {
            calls: Arc::clone(&calls),
        },
    )
    .unwrap();
    let screen = OwnedImage::filled(300, 250, [1, 2, 3, 255]).unwrap();

    let first = tracker.infer(screen.view(), &InferParams::default()).unwrap_err();
    let second = tracker.infer(screen.view(), &InferParams::default()).unwrap_err();
    assert!(matches!(
        &first,
        MapTrackError::Initialization(inner)
            if matches!(**inner, MapTrackError::ResourceNotFound { .. })
    ));
    assert_eq!(first, second);
    assert_eq!(tracker.warm_up(), Err(first));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn duplicate_map_names_fail_initialization() {
    let img = smooth_texture(40, 40, 8, 3);
    let resources = MemoryResources::new()
        .with_map("same", img.clone(), None)
        .with_map("same", img.clone(), None)
        .with_pointer(img);
    let tracker = MapTracker::new(TrackerConfig::default(), resources).unwrap();
    assert!(matches!(
        tracker.warm_up(),
        Err(MapTrackError::Initialization(inner))
            if matches!(*inner, MapTrackError::InvalidConfig { .. })
    ));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut config = TrackerConfig::default();
    config.angle_steps.coarse_step_deg = 0;
    assert!(MapTracker::new(config, MemoryResources::new()).is_err());
}
