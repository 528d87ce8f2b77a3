use rand::Rng;

use crate::config::{ConfettiConfig, sample_between};
use crate::scheduler::{FrameHandle, FrameScheduler};

pub const CONFETTI_COLORS: [&str; 6] = [
    "#FF5733", "#33FF57", "#3357FF", "#F333FF", "#FFC300", "#33FFF6",
];

/// One confetti square. Positions are in surface pixels, angles in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub vx: f64,
    pub vy: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub color: &'static str,
}

impl Particle {
    /// Fresh particle somewhere in the band just above the visible area.
    pub fn spawn<R: Rng + ?Sized>(
        config: &ConfettiConfig,
        width: f64,
        height: f64,
        rng: &mut R,
    ) -> Self {
        Particle {
            x: rng.gen_range(0.0..width),
            y: rng.gen_range(-height..0.0),
            size: sample_between(rng, config.min_size, config.max_size),
            vx: sample_between(rng, -config.max_drift, config.max_drift),
            vy: sample_between(rng, config.min_fall_speed, config.max_fall_speed),
            rotation: rng.gen_range(0.0..360.0),
            rotation_speed: sample_between(rng, -config.max_spin, config.max_spin),
            color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
        }
    }

    fn advance(&mut self) {
        self.y += self.vy;
        self.x += self.vx;
        self.rotation += self.rotation_speed;
    }
}

/// Drawing target for the particle system.
pub trait ParticleSurface {
    fn clear(&mut self);
    /// Filled square of side `size` centered on `(x, y)`, turned by `degrees`.
    fn fill_rotated_square(&mut self, x: f64, y: f64, size: f64, degrees: f64, color: &str);
}

/// Start/stop surface for any celebration animation.
pub trait CelebrationEffect {
    /// Begin (or restart) the effect on a surface of the given size.
    fn start(&mut self, width: f64, height: f64);
    /// Halt and clear. Safe to call when not running.
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

/// Continuous rain of recycled confetti particles.
pub struct ConfettiRain<S, R, P> {
    config: ConfettiConfig,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    active: bool,
    started_at: f64,
    pending: Option<FrameHandle>,
    scheduler: S,
    rng: R,
    surface: P,
}

impl<S: FrameScheduler, R: Rng, P: ParticleSurface> ConfettiRain<S, R, P> {
    pub fn new(config: ConfettiConfig, scheduler: S, rng: R, surface: P) -> Self {
        ConfettiRain {
            config,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            active: false,
            started_at: 0.0,
            pending: None,
            scheduler,
            rng,
            surface,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn surface_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Start with an explicit particle count instead of the configured one.
    pub fn start_with_count(&mut self, width: f64, height: f64, count: usize) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        // Zero-sized canvases would leave empty spawn ranges.
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        let (w, h) = (self.width, self.height);
        let config = &self.config;
        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|_| Particle::spawn(config, w, h, rng))
            .collect();
        self.started_at = self.scheduler.now();
        match self.scheduler.request_frame() {
            Ok(handle) => {
                self.active = true;
                self.pending = Some(handle);
                log::debug!("confetti: {count} particles on {w}x{h}");
            }
            Err(e) => {
                log::warn!("confetti: {e}");
                self.active = false;
                self.particles.clear();
            }
        }
    }

    /// Move every particle one frame, respawning the ones that fell off the bottom.
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.advance();
            if p.y > h {
                *p = Particle::spawn(&self.config, w, h, &mut self.rng);
            }
        }
    }

    fn render(&mut self) {
        self.surface.clear();
        for p in &self.particles {
            self.surface
                .fill_rotated_square(p.x, p.y, p.size, p.rotation, p.color);
        }
    }

    /// Update and draw one frame. Returns `false` when the frame was not
    /// rendered because the rain is stopped or the frame is stale, or when
    /// no further frame could be requested and the rain stopped itself.
    pub fn on_frame(&mut self, now: f64) -> bool {
        if self.pending.take().is_none() || !self.active {
            return false;
        }
        if let Some(limit) = self.config.auto_stop_ms
            && now - self.started_at >= limit
        {
            self.stop();
            return false;
        }
        self.step();
        self.render();
        match self.scheduler.request_frame() {
            Ok(handle) => {
                self.pending = Some(handle);
                true
            }
            Err(e) => {
                log::warn!("confetti: {e}");
                self.stop();
                false
            }
        }
    }
}

impl<S: FrameScheduler, R: Rng, P: ParticleSurface> CelebrationEffect for ConfettiRain<S, R, P> {
    fn start(&mut self, width: f64, height: f64) {
        let count = self.config.count;
        self.start_with_count(width, height, count);
    }

    fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        if self.active {
            log::debug!("confetti: stopped");
        }
        self.active = false;
        self.particles.clear();
        self.surface.clear();
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Default)]
    struct Recorder {
        clears: usize,
        squares: usize,
    }

    impl ParticleSurface for Recorder {
        fn clear(&mut self) {
            self.clears += 1;
            self.squares = 0;
        }

        fn fill_rotated_square(&mut self, _x: f64, _y: f64, _size: f64, _deg: f64, _c: &str) {
            self.squares += 1;
        }
    }

    type Rain = ConfettiRain<ManualScheduler, ChaCha8Rng, Recorder>;

    fn rain(config: ConfettiConfig) -> Rain {
        ConfettiRain::new(
            config,
            ManualScheduler::new(),
            ChaCha8Rng::seed_from_u64(3),
            Recorder::default(),
        )
    }

    fn frame(r: &mut Rain) -> bool {
        match r.scheduler_mut().fire() {
            Some(_) => {
                let now = r.scheduler_mut().advance(16.0);
                r.on_frame(now)
            }
            None => false,
        }
    }

    #[test]
    fn start_spawns_above_the_surface() {
        let mut r = rain(ConfettiConfig::default());
        r.start(800.0, 600.0);
        assert!(r.is_active());
        assert_eq!(r.particles().len(), 150);
        for p in r.particles() {
            assert!((0.0..800.0).contains(&p.x));
            assert!((-600.0..0.0).contains(&p.y));
            assert!((4.0..12.0).contains(&p.size));
            assert!((2.0..5.0).contains(&p.vy));
            assert!((-1.0..1.0).contains(&p.vx));
            assert!((0.0..360.0).contains(&p.rotation));
            assert!((-5.0..5.0).contains(&p.rotation_speed));
            assert!(CONFETTI_COLORS.contains(&p.color));
        }
    }

    #[test]
    fn frames_render_every_particle() {
        let mut r = rain(ConfettiConfig::default());
        r.start(320.0, 240.0);
        assert!(frame(&mut r));
        assert_eq!(r.surface().squares, 150);
        assert!(frame(&mut r));
        assert_eq!(r.surface().clears, 2);
        assert_eq!(r.particles().len(), 150);
    }

    #[test]
    fn fallen_particles_respawn_above() {
        let mut r = rain(ConfettiConfig::default());
        r.start(100.0, 50.0);
        for _ in 0..200 {
            r.step();
            for p in r.particles() {
                assert!(p.y <= 50.0, "particle left the surface at y={}", p.y);
            }
        }
        r.step();
        let fresh = r.particles().iter().filter(|p| p.y < 0.0).count();
        assert!(fresh > 0);
    }

    #[test]
    fn particle_below_bottom_is_recycled_on_next_update() {
        let mut r = rain(ConfettiConfig::default());
        r.start(100.0, 50.0);
        r.particles[0].y = 49.0;
        r.particles[0].vy = 4.0;
        r.step();
        assert!(r.particles()[0].y < 0.0);
    }

    #[test]
    fn stop_is_idempotent_and_kills_the_loop() {
        let mut r = rain(ConfettiConfig::default());
        r.stop();
        assert!(!r.is_active());

        r.start(100.0, 100.0);
        assert!(frame(&mut r));
        r.stop();
        r.stop();
        assert!(!r.is_active());
        assert!(!r.scheduler().has_pending());
        assert_eq!(r.surface().squares, 0);
        // A frame delivered after stop draws nothing.
        assert!(!r.on_frame(1_000.0));
    }

    #[test]
    fn restart_uses_new_dimensions_and_one_loop() {
        let mut r = rain(ConfettiConfig::default());
        r.start(100.0, 100.0);
        r.start(400.0, 300.0);
        assert_eq!(r.surface_size(), (400.0, 300.0));
        assert_eq!(r.scheduler().pending().len(), 1);
        assert!(r.particles().iter().all(|p| p.y >= -300.0 && p.y < 0.0));
    }

    #[test]
    fn custom_count_is_kept_for_the_run() {
        let mut r = rain(ConfettiConfig::default());
        r.start_with_count(200.0, 200.0, 12);
        for _ in 0..50 {
            frame(&mut r);
        }
        assert_eq!(r.particles().len(), 12);
    }

    #[test]
    fn auto_stop_ends_the_rain() {
        let mut r = rain(ConfettiConfig {
            auto_stop_ms: Some(100.0),
            ..ConfettiConfig::default()
        });
        r.start(100.0, 100.0);
        let mut frames = 0;
        while frame(&mut r) {
            frames += 1;
        }
        assert_eq!(frames, 6);
        assert!(!r.is_active());
        assert!(!r.scheduler().has_pending());
    }

    #[test]
    fn start_without_a_frame_stays_inactive() {
        let mut r = rain(ConfettiConfig::default());
        r.scheduler_mut().set_failing(true);
        r.start(100.0, 100.0);
        assert!(!r.is_active());
        assert!(r.particles().is_empty());
        assert!(!r.scheduler().has_pending());
    }

    #[test]
    fn lost_frame_stops_the_rain() {
        let mut r = rain(ConfettiConfig::default());
        r.start(100.0, 100.0);
        assert!(frame(&mut r));
        r.scheduler_mut().set_failing(true);
        assert!(!frame(&mut r));
        assert!(!r.is_active());
        assert!(r.particles().is_empty());
        assert_eq!(r.surface().squares, 0);
    }
}
