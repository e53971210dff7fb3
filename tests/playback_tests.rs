use dunex::config::PlaybackConfig;
use dunex::geometry::total_distance_km;
use dunex::models::{LngLat, Route, Stage, StageKind};
use dunex::playback::{
    flyover_step, CameraCommand, PlaybackController, PlaybackDriver, PlaybackStatus,
};
use dunex::services::{default_manifest, load_catalog};
use std::time::{Duration, Instant};

mod common;

/// Roughly 100 km heading due east along the 31st parallel
fn hundred_km_stage() -> Stage {
    // 0.1 deg of longitude at 31N is ~9.53 km
    let coords: Vec<LngLat> = (0..=10)
        .map(|i| LngLat::new(-6.0 + i as f64 * 0.1049, 31.0).unwrap())
        .collect();
    Stage {
        id: 7,
        name: "Etapa 100".to_string(),
        kind: StageKind::Stage,
        description: None,
        route: Route::new(coords).unwrap(),
    }
}

#[test]
fn test_flyover_progress_matches_closed_form_over_many_frames() {
    let stage = hundred_km_stage();
    let total_km = total_distance_km(stage.route.coords());
    assert!((total_km.as_km() - 100.0).abs() < 1.0);

    let mut ctrl = PlaybackController::new(vec![stage], PlaybackConfig::default());
    ctrl.renderer_ready();
    ctrl.set_speed(50.0);

    let t0 = Instant::now();
    ctrl.select_stage(7, t0);
    ctrl.tick(t0 + Duration::from_secs(1));
    let ticket = ctrl.toggle_flyover(t0).unwrap();
    assert!(ctrl.preload_resolved(ticket, t0));

    let frame = Duration::from_millis(16);
    let frames = 250;
    let mut now = t0;
    for _ in 0..frames {
        now += frame;
        assert!(ctrl.tick(now));
    }

    let expected = flyover_step(50.0, frame * frames, 1_000.0, total_km);
    let progress = ctrl.flyover_progress().unwrap();
    assert!(
        (progress - expected).abs() < 1e-9,
        "progress {} expected {}",
        progress,
        expected
    );

    // ~0.1389 of the route per real second at 50 km/h x1000 on ~100 km
    let per_second = expected / (frame * frames).as_secs_f64();
    assert!((per_second - 0.1389).abs() < 0.002, "{}", per_second);
}

#[test]
fn test_reveal_of_hundred_points_at_half_duration() {
    let coords: Vec<LngLat> = (0..100)
        .map(|i| LngLat::new(-5.0, 30.0 + i as f64 * 0.001).unwrap())
        .collect();
    let stage = Stage {
        id: 1,
        name: "Etapa".to_string(),
        kind: StageKind::Stage,
        description: None,
        route: Route::new(coords).unwrap(),
    };

    let mut ctrl = PlaybackController::new(vec![stage], PlaybackConfig::default());
    let t0 = Instant::now();
    ctrl.select_stage(1, t0);
    ctrl.tick(t0 + Duration::from_millis(500));

    assert_eq!(ctrl.drawn_coords().len(), 50);
    assert!(ctrl.drawn_km().as_km() < ctrl.stage_km().as_km());
}

#[tokio::test(start_paused = true)]
async fn test_driver_plays_shipped_stage_end_to_end() {
    let stages = load_catalog(&common::shipped_stages_dir(), &default_manifest())
        .await
        .unwrap();
    let expected_points = stages[3].route.len();
    let first = stages[3].route.first();

    let (mut driver, mut rx) = PlaybackDriver::new(stages, PlaybackConfig::default());
    driver.renderer_ready().await;
    driver.set_speed(300.0).await;

    assert!(driver.select_stage(4).await);
    tokio::time::sleep(Duration::from_millis(1_100)).await;
    assert_eq!(
        driver.snapshot().await.status,
        PlaybackStatus::RevealComplete
    );

    driver.toggle_flyover().await;
    driver.render_settled();

    // Stage 4 is ~107 km: about 1.3 s at 300 km/h x1000
    tokio::time::sleep(Duration::from_secs(3)).await;
    let snapshot = driver.snapshot().await;
    assert_eq!(snapshot.status, PlaybackStatus::RevealComplete);
    assert_eq!(snapshot.drawn_points, expected_points);

    let mut commands = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        commands.push(cmd);
    }

    assert!(matches!(commands.first(), Some(CameraCommand::FitBounds { .. })));
    assert!(commands.contains(&CameraCommand::JumpTo {
        center: first,
        zoom: 12.0,
        pitch: 60.0,
    }));
    assert!(matches!(
        commands.last(),
        Some(CameraCommand::EaseTo {
            zoom,
            pitch,
            duration_ms: 3000,
            ..
        }) if *zoom == 6.0 && *pitch == 20.0
    ));
}

#[tokio::test(start_paused = true)]
async fn test_driver_select_all_after_stage() {
    let stages = load_catalog(&common::shipped_stages_dir(), &default_manifest())
        .await
        .unwrap();
    let (mut driver, mut rx) = PlaybackDriver::new(stages, PlaybackConfig::default());

    driver.select_stage(2).await;
    driver.select_all().await;
    assert!(rx.try_recv().is_err(), "no fit before the renderer is ready");

    driver.renderer_ready().await;
    match rx.recv().await {
        Some(CameraCommand::FitBounds { bounds, .. }) => {
            // Barcelona to Marrakech
            assert!(bounds.max_lng > 2.0);
            assert!(bounds.min_lng < -7.9);
        }
        other => panic!("expected FitBounds, got {:?}", other),
    }

    tokio::time::sleep(Duration::from_secs(2)).await;
    let snapshot = driver.snapshot().await;
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert_eq!(snapshot.drawn_points, 0);
}
