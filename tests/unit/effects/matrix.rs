use super::*;
use crate::{
    foundation::core::Rect, geometry::zone::ExclusionZone, surface::source::PreparedImage,
};

fn ctx(elapsed_ms: f64, dt_ms: f64, progress: f64) -> FrameCtx {
    FrameCtx {
        elapsed_ms,
        progress,
        dt_ms,
        restarted: false,
    }
}

fn busy_params() -> MatrixParams {
    MatrixParams {
        cell_px: 4,
        spawn_rate_per_s: 1000.0,
        max_cells_per_column: 6,
        column_delay_ms: 40.0,
        seed: 7,
        ..MatrixParams::default()
    }
}

fn run(fx: &mut MatrixDissolve, img: &PreparedImage, s: &mut Surface, frames: u32, progress: f64) {
    for i in 0..frames {
        let t = f64::from(i) * 33.0;
        let dt = if i == 0 { 0.0 } else { 33.0 };
        fx.render(&ctx(t, dt, progress), &img.view(), s, &ZoneSet::default());
    }
}

#[test]
fn density_rises_then_falls() {
    let d = |p| matrix_density(p, 0.2, 1.0);
    assert!((d(0.0) - 0.2).abs() < 1e-12);
    assert!((d(0.25) - 0.6).abs() < 1e-12);
    assert!((d(0.5) - 1.0).abs() < 1e-12);
    assert!((d(0.75) - 0.6).abs() < 1e-12);
    assert!((d(1.0) - 0.2).abs() < 1e-12);
    for i in 0..=100 {
        let v = d(f64::from(i) / 100.0);
        assert!((0.2..=1.0).contains(&v));
    }
}

#[test]
fn same_seed_same_frames() {
    let img = PreparedImage::solid(32, 32, [255, 255, 255, 255]);
    let mut a = MatrixDissolve::new(busy_params());
    let mut b = MatrixDissolve::new(busy_params());
    a.resize(32, 32);
    b.resize(32, 32);
    let mut sa = Surface::new(32, 32);
    let mut sb = Surface::new(32, 32);
    run(&mut a, &img, &mut sa, 20, 0.5);
    run(&mut b, &img, &mut sb, 20, 0.5);
    assert_eq!(sa, sb);
    assert!(sa.revealed_fraction() > 0.0);
}

#[test]
fn columns_activate_left_to_right() {
    let mut fx = MatrixDissolve::new(busy_params());
    fx.resize(40, 40);
    let img = PreparedImage::solid(40, 40, [255, 255, 255, 255]);
    let mut s = Surface::new(40, 40);
    fx.render(&ctx(0.0, 0.0, 0.5), &img.view(), &mut s, &ZoneSet::default());
    fx.render(&ctx(100.0, 100.0, 0.5), &img.view(), &mut s, &ZoneSet::default());
    let counts = fx.live_counts();
    assert_eq!(counts.len(), 10);
    // Columns 0..=2 are active at 100 ms and fill up to the cap; the rest have not started.
    assert!(counts[..3].iter().all(|&c| c == 6));
    assert!(counts[3..].iter().all(|&c| c == 0));
}

#[test]
fn live_cells_never_exceed_density_cap() {
    let mut fx = MatrixDissolve::new(busy_params());
    fx.resize(16, 16);
    let img = PreparedImage::solid(16, 16, [255, 255, 255, 255]);
    let mut s = Surface::new(16, 16);
    run(&mut fx, &img, &mut s, 60, 0.5);
    assert!(fx.live_counts().iter().all(|&c| c <= 6));

    // Sparse end of the cycle: cap = ceil(0.2 * 6) = 2; surplus cells park as they exit.
    for i in 60..200 {
        let t = f64::from(i) * 33.0;
        fx.render(&ctx(t, 33.0, 0.0), &img.view(), &mut s, &ZoneSet::default());
    }
    assert!(fx.live_counts().iter().all(|&c| c <= 2));
}

#[test]
fn restart_drops_particles() {
    let mut fx = MatrixDissolve::new(busy_params());
    fx.resize(16, 16);
    let img = PreparedImage::solid(16, 16, [255, 255, 255, 255]);
    let mut s = Surface::new(16, 16);
    run(&mut fx, &img, &mut s, 10, 0.5);
    assert!(fx.live_counts().iter().any(|&c| c > 0));

    let restart = FrameCtx {
        restarted: true,
        ..ctx(0.0, 0.0, 0.0)
    };
    fx.render(&restart, &img.view(), &mut s, &ZoneSet::default());
    assert!(fx.live_counts().iter().all(|&c| c == 0));
    assert_eq!(s.revealed_fraction(), 0.0);
}

#[test]
fn exclusion_modes() {
    let img = PreparedImage::solid(16, 16, [255, 255, 255, 255]);
    let whole = ZoneSet::new(vec![ExclusionZone::Rect {
        rect: Rect::new(0.0, 0.0, 16.0, 16.0),
    }]);

    let mut black = MatrixDissolve::new(busy_params());
    black.resize(16, 16);
    let mut s = Surface::new(16, 16);
    for i in 0..20 {
        let dt = if i == 0 { 0.0 } else { 33.0 };
        black.render(&ctx(f64::from(i) * 33.0, dt, 0.5), &img.view(), &mut s, &whole);
    }
    assert_eq!(s.revealed_fraction(), 0.0);

    let mut full = MatrixDissolve::new(MatrixParams {
        exclusion: ExclusionMode::RevealFull,
        ..busy_params()
    });
    full.resize(16, 16);
    full.render(&ctx(0.0, 0.0, 0.0), &img.view(), &mut s, &whole);
    assert_eq!(s.revealed_fraction(), 1.0);

    let mut frag = MatrixDissolve::new(MatrixParams {
        exclusion: ExclusionMode::RevealFragmented,
        ..busy_params()
    });
    frag.resize(16, 16);
    frag.render(&ctx(0.0, 0.0, 0.0), &img.view(), &mut s, &whole);
    assert_eq!(s.revealed_fraction(), 1.0);
}

#[test]
fn clip_polygon_can_be_injected() {
    let img = PreparedImage::solid(8, 8, [255, 255, 255, 255]);
    let mut fx = MatrixDissolve::new(MatrixParams {
        spawn_rate_per_s: 0.0,
        ..MatrixParams::default()
    });
    fx.resize(8, 8);
    assert!(fx.set_clip_polygon(vec![
        Point::new(0.0, 0.0),
        Point::new(8.0, 0.0),
        Point::new(8.0, 4.0),
        Point::new(0.0, 4.0),
    ]));
    let mut s = Surface::new(8, 8);
    fx.render(&ctx(0.0, 0.0, 0.5), &img.view(), &mut s, &ZoneSet::default());
    assert_eq!(s.revealed_fraction(), 0.5);
}

fn live_after_one_second(
    tick_ms: f64,
    params: &MatrixParams,
    width: u32,
    height: u32,
) -> Vec<usize> {
    let mut fx = MatrixDissolve::new(params.clone());
    fx.resize(width, height);
    let img = PreparedImage::solid(width, height, [255, 255, 255, 255]);
    let mut s = Surface::new(width, height);
    let steps = (1000.0 / tick_ms).round() as u32;
    for i in 0..=steps {
        let dt = if i == 0 { 0.0 } else { tick_ms };
        let c = ctx(f64::from(i) * tick_ms, dt, 0.5);
        fx.render(&c, &img.view(), &mut s, &ZoneSet::default());
    }
    fx.live_counts()
}

#[test]
fn spawning_does_not_depend_on_tick_rate() {
    // Tall enough that nothing reaches the bottom within a second.
    let saturating = MatrixParams {
        cell_px: 4,
        spawn_rate_per_s: 40.0,
        max_cells_per_column: 12,
        column_delay_ms: 0.0,
        ..MatrixParams::default()
    };
    for tick_ms in [10.0, 100.0, 250.0] {
        let counts = live_after_one_second(tick_ms, &saturating, 4, 400);
        assert_eq!(counts, vec![12], "tick_ms={tick_ms}");
    }

    // Below the cap the mean population tracks the configured rate at any cadence.
    let unsaturated = MatrixParams {
        cell_px: 4,
        spawn_rate_per_s: 20.0,
        max_cells_per_column: 64,
        column_delay_ms: 0.0,
        seed: 11,
        ..MatrixParams::default()
    };
    let mean = |tick_ms: f64| {
        let counts = live_after_one_second(tick_ms, &unsaturated, 256, 1000);
        counts.iter().sum::<usize>() as f64 / counts.len() as f64
    };
    let fine = mean(10.0);
    let coarse = mean(250.0);
    assert!((17.0..23.0).contains(&fine), "fine={fine}");
    assert!((17.0..23.0).contains(&coarse), "coarse={coarse}");
    assert!((fine - coarse).abs() < 3.0, "fine={fine} coarse={coarse}");
}

#[test]
fn particles_wrap_to_the_top_and_storage_stays_bounded() {
    let params = MatrixParams {
        cell_px: 4,
        spawn_rate_per_s: 50.0,
        max_cells_per_column: 5,
        trail_cells: 3,
        column_delay_ms: 0.0,
        seed: 3,
        ..MatrixParams::default()
    };
    let (lo, hi) = (params.fall_speed_min_px_per_s, params.fall_speed_max_px_per_s);
    let mut fx = MatrixDissolve::new(params);
    fx.resize(4, 16);
    let img = PreparedImage::solid(4, 16, [255, 255, 255, 255]);
    let mut s = Surface::new(4, 16);

    let mut wraps = 0;
    for i in 0..300 {
        let before: Vec<Particle> = fx.columns[0].particles.to_vec();
        let dt = if i == 0 { 0.0 } else { 33.0 };
        let c = ctx(f64::from(i) * 33.0, dt, 0.5);
        fx.render(&c, &img.view(), &mut s, &ZoneSet::default());

        let after = &fx.columns[0].particles;
        assert!(after.len() <= 5, "tick {i}: {} slots", after.len());
        for (old, new) in before.iter().zip(after.iter()) {
            if old.live && new.live && new.y < old.y {
                wraps += 1;
                assert_eq!(new.y, -4.0, "tick {i}");
                assert!((lo..hi).contains(&new.speed));
            }
        }
    }
    // The bottom sits at 16 + 4 * 4 = 32 px; at 90..260 px/s every particle crosses it often.
    assert!(wraps >= 10, "only {wraps} wraps");
}
