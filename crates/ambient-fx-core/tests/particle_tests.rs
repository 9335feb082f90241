mod common;

use ambient_fx_core::particle::{FlakeSet, EDGE_MARGIN, RESPAWN_JITTER};
use common::rng;
use glam::Vec2;

const W: f32 = 800.0;
const H: f32 = 600.0;

#[test]
fn test_flake_set_new_initializes_correctly() {
    let flakes = FlakeSet::new(4);

    assert_eq!(flakes.count, 4);
    assert_eq!(flakes.position.len(), 4);
    assert_eq!(flakes.velocity.len(), 4);
    assert_eq!(flakes.radius.len(), 4);
    assert_eq!(flakes.wobble.len(), 4);
    assert_eq!(flakes.wobble_speed.len(), 4);
    assert!(flakes.position.iter().all(|p| *p == Vec2::ZERO));
}

#[test]
fn test_scatter_respects_ranges() {
    let flakes = FlakeSet::scatter(500, W, H, &mut rng(7));

    assert_eq!(flakes.count, 500);
    for i in 0..flakes.count {
        let r = flakes.radius[i];
        let p = flakes.position[i];
        let v = flakes.velocity[i];
        assert!((1.0..=3.6).contains(&r), "radius[{i}] = {r}");
        assert!(p.x >= 0.0 && p.x <= W, "x[{i}] = {}", p.x);
        assert!(p.y >= 0.0 && p.y <= H, "y[{i}] = {}", p.y);
        assert!(v.y > 0.0, "flake {i} must fall, vy = {}", v.y);
        // (0.3 * (0.6 + 3.6 / 4)) bounds the drift
        assert!(v.x.abs() <= 0.45 + 1e-4, "vx[{i}] = {}", v.x);
        assert!(
            (0.008..=0.028).contains(&flakes.wobble_speed[i]),
            "wobble_speed[{i}] = {}",
            flakes.wobble_speed[i]
        );
        assert!(flakes.wobble[i] >= 0.0 && flakes.wobble[i] <= std::f32::consts::TAU);
    }
}

#[test]
fn test_step_applies_velocity_and_sway() {
    let mut flakes = FlakeSet::new(1);
    flakes.position[0] = Vec2::new(100.0, 100.0);
    flakes.velocity[0] = Vec2::new(0.2, 1.5);
    flakes.wobble[0] = 0.0;
    flakes.wobble_speed[0] = 0.01;

    flakes.step(W, H, &mut rng(1));

    let expected_x = 100.0 + 0.2 + 0.01f32.sin() * 0.25;
    assert!((flakes.position[0].x - expected_x).abs() < 1e-4);
    assert!((flakes.position[0].y - 101.5).abs() < 1e-4);
    assert!((flakes.wobble[0] - 0.01).abs() < 1e-6);
}

#[test]
fn test_bottom_wrap_respawns_above_top() {
    let mut flakes = FlakeSet::new(1);
    let mut rng = rng(3);
    for _ in 0..200 {
        flakes.radius[0] = 2.0;
        flakes.position[0] = Vec2::new(400.0, H + 2.5);
        flakes.wrap(0, W, H, &mut rng);

        let p = flakes.position[0];
        assert!(
            p.y >= -2.0 - RESPAWN_JITTER && p.y <= -2.0,
            "respawn y out of range: {}",
            p.y
        );
        assert!(p.x >= 0.0 && p.x <= W, "respawn x out of range: {}", p.x);
    }
}

#[test]
fn test_flake_resting_on_bottom_edge_is_kept() {
    let mut flakes = FlakeSet::new(1);
    flakes.radius[0] = 2.0;
    flakes.position[0] = Vec2::new(400.0, H + 2.0);
    flakes.wrap(0, W, H, &mut rng(3));
    assert_eq!(flakes.position[0], Vec2::new(400.0, H + 2.0));
}

#[test]
fn test_wrapped_flake_does_not_rewrap_next_frame() {
    let mut flakes = FlakeSet::scatter(50, W, H, &mut rng(11));
    let mut rng = rng(12);
    for i in 0..flakes.count {
        flakes.position[i].y = H + flakes.radius[i] + 0.5;
    }
    flakes.step(W, H, &mut rng);
    let after_wrap: Vec<f32> = flakes.position.iter().map(|p| p.y).collect();
    assert!(after_wrap.iter().all(|y| *y < 0.0));

    flakes.step(W, H, &mut rng);
    for i in 0..flakes.count {
        let y = flakes.position[i].y;
        assert!(
            (y - (after_wrap[i] + flakes.velocity[i].y)).abs() < 1e-4,
            "flake {i} wrapped again: {} -> {}",
            after_wrap[i],
            y
        );
    }
}

#[test]
fn test_horizontal_wrap_both_edges() {
    let mut flakes = FlakeSet::new(2);
    flakes.position[0] = Vec2::new(-EDGE_MARGIN - 0.1, 50.0);
    flakes.position[1] = Vec2::new(W + EDGE_MARGIN + 0.1, 50.0);

    let mut rng = rng(5);
    flakes.wrap(0, W, H, &mut rng);
    flakes.wrap(1, W, H, &mut rng);

    assert_eq!(flakes.position[0].x, W + EDGE_MARGIN);
    assert_eq!(flakes.position[1].x, -EDGE_MARGIN);
    assert_eq!(flakes.position[0].y, 50.0);
}

#[test]
fn test_horizontal_margin_is_inclusive() {
    let mut flakes = FlakeSet::new(2);
    flakes.position[0] = Vec2::new(-EDGE_MARGIN, 50.0);
    flakes.position[1] = Vec2::new(W + EDGE_MARGIN, 50.0);
    let mut rng = rng(5);
    flakes.wrap(0, W, H, &mut rng);
    flakes.wrap(1, W, H, &mut rng);
    assert_eq!(flakes.position[0].x, -EDGE_MARGIN);
    assert_eq!(flakes.position[1].x, W + EDGE_MARGIN);
}

#[test]
fn test_long_run_stays_bounded() {
    let mut flakes = FlakeSet::scatter(140, W, H, &mut rng(21));
    let mut rng = rng(22);
    for _ in 0..5_000 {
        flakes.step(W, H, &mut rng);
    }

    assert_eq!(flakes.count, 140);
    assert_eq!(flakes.position.len(), 140);
    for i in 0..flakes.count {
        let p = flakes.position[i];
        assert!(!p.x.is_nan() && !p.y.is_nan(), "NaN position at flake {i}");
        assert!(p.x >= -EDGE_MARGIN - 1.0 && p.x <= W + EDGE_MARGIN + 1.0, "x[{i}] = {}", p.x);
        assert!(p.y >= -30.0 && p.y <= H + 10.0, "y[{i}] = {}", p.y);
    }
}
