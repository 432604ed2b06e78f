//! Spring subsystem scenarios against the live solver: convergence to rest
//! length, decaying oscillation, and pointer-style pin dragging.

use nalgebra::{point, vector};
use server::{run_tick, PinAnchor, SandboxWorld, ShapeOptions, Spring, ToolRouter};

fn heavy_box() -> ShapeOptions {
    // 1x1 box at density 10 → mass 10, which keeps the per-tick impulse
    // integration of the spring well inside its stable region.
    ShapeOptions {
        density: 10.0,
        ..ShapeOptions::default()
    }
}

#[test]
fn spring_converges_to_target_length_with_decaying_oscillation() {
    let mut world = SandboxWorld::new();
    world.init(vector![0.0, 0.0]);
    let mut tools = ToolRouter::new();

    let a = world
        .create_rectangle(-2.5, 0.0, 1.0, 1.0, heavy_box())
        .unwrap();
    let b = world
        .create_rectangle(2.5, 0.0, 1.0, 1.0, heavy_box())
        .unwrap();

    let anchor_a = world.body_anchor(&a, point![0.0, 0.0]).unwrap();
    let anchor_b = world.body_anchor(&b, point![0.0, 0.0]).unwrap();
    world
        .create_spring(Spring {
            stiffness: 50.0,
            damping: 5.0,
            target_length: 2.0,
            anchor_a: Box::new(anchor_a),
            anchor_b: Box::new(anchor_b),
        })
        .unwrap();

    // Sample the anchor distance every tick; fold into per-window peak
    // deviations from the rest length.
    const WINDOW: usize = 120;
    const WINDOWS: usize = 10;
    let mut peaks = [0.0f32; WINDOWS];
    let mut final_distance = f32::NAN;

    for window in 0..WINDOWS {
        for _ in 0..WINDOW {
            let update = run_tick(&mut world, &mut tools, &[]).unwrap();
            let xa = update.delta.shape_transforms[&a].x;
            let xb = update.delta.shape_transforms[&b].x;
            final_distance = (xb - xa).abs();
            peaks[window] = peaks[window].max((final_distance - 2.0).abs());
        }
    }

    assert!(
        (final_distance - 2.0).abs() < 0.1,
        "anchor distance should converge to the target length, got {final_distance}"
    );

    // Damping is effective: oscillation amplitude never grows window over
    // window (tolerance absorbs solver-level noise near the fixed point).
    for pair in peaks.windows(2) {
        assert!(
            pair[1] <= pair[0] + 1.0e-3,
            "oscillation amplitude grew: {peaks:?}"
        );
    }
}

#[test]
fn pin_anchored_spring_drags_a_body_to_the_pointer() {
    let mut world = SandboxWorld::new();
    world.init(vector![0.0, 0.0]);
    let mut tools = ToolRouter::new();

    let ball = world
        .create_circle(0.0, 0.0, 0.5, ShapeOptions::default())
        .unwrap();
    let anchor = world.body_anchor(&ball, point![0.0, 0.0]).unwrap();
    world
        .create_spring(Spring {
            stiffness: 5.0,
            damping: 1.0,
            target_length: 0.0,
            anchor_a: Box::new(anchor),
            anchor_b: Box::new(PinAnchor {
                position: point![10.0, 0.0],
            }),
        })
        .unwrap();

    let mut x = 0.0;
    for _ in 0..600 {
        let update = run_tick(&mut world, &mut tools, &[]).unwrap();
        x = update.delta.shape_transforms[&ball].x;
    }

    assert!(
        (x - 10.0).abs() < 0.1,
        "ball should be pulled onto the pin, got x = {x}"
    );
}

#[test]
fn spring_with_removed_body_is_skipped_without_failing_the_tick() {
    let mut world = SandboxWorld::new();
    world.init(vector![0.0, 0.0]);
    let mut tools = ToolRouter::new();

    let a = world
        .create_circle(0.0, 0.0, 0.5, ShapeOptions::default())
        .unwrap();
    let anchor = world.body_anchor(&a, point![0.0, 0.0]).unwrap();
    let spring_id = world
        .create_spring(Spring {
            stiffness: 50.0,
            damping: 5.0,
            target_length: 1.0,
            anchor_a: Box::new(anchor),
            anchor_b: Box::new(PinAnchor {
                position: point![3.0, 0.0],
            }),
        })
        .unwrap();

    // Destroy the anchored body out from under the spring. The spring stays
    // registered but resolves no endpoint: ticks keep running and the update
    // simply carries no segment for it.
    assert!(world.remove_shape(&a).unwrap());
    let update = run_tick(&mut world, &mut tools, &[]).unwrap();
    assert!(update.springs.is_empty());
    assert!(world.spring(&spring_id).is_some());
}
