//! Overlay animation model.
//!
//! Everything here is a pure function of the time since a navigation request.
//! The renderer samples it once per frame; nothing in this module keeps time.

use std::f32::consts::TAU;
use std::time::Duration;

use rand::Rng;

use crate::catalog::ThemeColor;

use super::page::Point;

/// A CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    /// Eased progress for linear progress `x` in `0..=1`.
    pub fn ease(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }
        // x(t) is monotonic for x1, x2 in 0..=1; bisect for t.
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        let mut t = x;
        for _ in 0..32 {
            let got = Self::sample(self.x1, self.x2, t);
            if (got - x).abs() < 1e-5 {
                break;
            }
            if got < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        Self::sample(self.y1, self.y2, t)
    }
}

pub const RIPPLE_EASE: CubicBezier = CubicBezier::new(0.43, 0.13, 0.23, 0.96);
pub const BLOB_EASE: CubicBezier = CubicBezier::new(0.87, 0.0, 0.13, 1.0);
pub const EASE_OUT: CubicBezier = CubicBezier::new(0.0, 0.0, 0.58, 1.0);
pub const EASE_IN_OUT: CubicBezier = CubicBezier::new(0.42, 0.0, 0.58, 1.0);

pub const RIPPLE_RINGS: usize = 4;
const RING_STAGGER_MS: u64 = 80;
const RING_GROW_MS: u64 = 1200;

const BLOB_MS: f32 = 900.0;
const BLOB_PEAK_AT: f32 = 0.6;
const BLOB_PEAK_DIAMETER: f32 = 3000.0;

const GLOW_MS: f32 = 800.0;
const GLOW_PEAK: f32 = 0.3;

const OVERLAY_FADE_MS: f32 = 800.0;

const CONTENT_FADE_MS: f32 = 500.0;
const CONTENT_SETTLE_MS: f32 = 600.0;
const CONTENT_START_SCALE: f32 = 0.95;
const CONTENT_START_BLUR: f32 = 10.0;
const CONTENT_EXIT_SCALE: f32 = 1.05;

/// Time from a request until every overlay layer has finished.
pub const OVERLAY_LIFETIME: Duration =
    Duration::from_millis(RING_STAGGER_MS * (RIPPLE_RINGS as u64 - 1) + RING_GROW_MS);

fn ms(d: Duration) -> f32 {
    d.as_secs_f32() * 1000.0
}

fn progress(t_ms: f32, delay_ms: f32, duration_ms: f32) -> f32 {
    ((t_ms - delay_ms) / duration_ms).clamp(0.0, 1.0)
}

/// One spark of the burst. Randomized once per request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    /// Radians from the positive x axis.
    pub angle: f32,
    /// Travel in pixels at the end of the flight.
    pub distance: f32,
    /// Diameter in pixels.
    pub size: f32,
    pub duration: Duration,
    pub delay: Duration,
}

/// The particle layout of one navigation request.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Burst {
    pub particles: Vec<Particle>,
}

impl Burst {
    /// `count` particles evenly spaced around the circle with random
    /// distance, size and timing.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        let particles = (0..count)
            .map(|i| Particle {
                angle: TAU * i as f32 / count as f32,
                distance: 150.0 + rng.r#gen::<f32>() * 200.0,
                size: 4.0 + rng.r#gen::<f32>() * 8.0,
                duration: Duration::from_secs_f32(0.8 + rng.r#gen::<f32>() * 0.4),
                delay: Duration::from_secs_f32(rng.r#gen::<f32>() * 0.2),
            })
            .collect();
        Self { particles }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RingFrame {
    pub diameter: f32,
    /// 0..=1, before the overlay-wide fade.
    pub alpha: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParticleFrame {
    pub position: Point,
    pub size: f32,
    pub opacity: f32,
}

/// The blob grows round, then spreads to cover the whole screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BlobFrame {
    Growing { diameter: f32 },
    Filling { coverage: f32 },
}

/// Everything the renderer needs to draw the overlay at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayFrame {
    pub origin: Point,
    pub accent: ThemeColor,
    /// Multiplies every layer.
    pub opacity: f32,
    pub rings: Vec<RingFrame>,
    pub blob: BlobFrame,
    pub particles: Vec<ParticleFrame>,
    /// Edge glow strength, 0..=1.
    pub glow: f32,
}

/// Sample the overlay `elapsed` after the request.
///
/// `cleared` is the time from the request until the origin point was cleared,
/// once that has happened; the remaining opacity fades out from there.
pub fn overlay_frame(
    elapsed: Duration,
    cleared: Option<Duration>,
    origin: Point,
    accent: &ThemeColor,
    burst: &Burst,
) -> OverlayFrame {
    let t = ms(elapsed);

    let rings = (0..RIPPLE_RINGS)
        .map(|i| {
            let p = progress(t, (RING_STAGGER_MS * i as u64) as f32, RING_GROW_MS as f32);
            let full = 2400.0 + 400.0 * i as f32;
            RingFrame {
                diameter: full * RIPPLE_EASE.ease(p),
                alpha: (80.0 - 15.0 * i as f32) / 255.0,
            }
        })
        .collect();

    let p = progress(t, 0.0, BLOB_MS);
    let blob = if p <= BLOB_PEAK_AT {
        BlobFrame::Growing {
            diameter: BLOB_PEAK_DIAMETER * BLOB_EASE.ease(p / BLOB_PEAK_AT),
        }
    } else {
        BlobFrame::Filling {
            coverage: BLOB_EASE.ease((p - BLOB_PEAK_AT) / (1.0 - BLOB_PEAK_AT)),
        }
    };

    let particles = burst
        .particles
        .iter()
        .map(|pt| {
            let p = progress(t, ms(pt.delay), ms(pt.duration));
            let travel = pt.distance * EASE_OUT.ease(p);
            let scale = if p < 0.5 { 3.0 * p } else { 3.0 * (1.0 - p) };
            ParticleFrame {
                position: Point::new(
                    origin.x + pt.angle.cos() * travel,
                    origin.y + pt.angle.sin() * travel,
                ),
                size: pt.size * scale,
                opacity: 1.0 - EASE_OUT.ease(p),
            }
        })
        .collect();

    let p = progress(t, 0.0, GLOW_MS);
    let glow = GLOW_PEAK * (1.0 - (2.0 * p - 1.0).abs());

    OverlayFrame {
        origin,
        accent: accent.clone(),
        opacity: overlay_opacity(t, cleared.map(ms)),
        rings,
        blob,
        particles,
        glow,
    }
}

fn overlay_opacity(t: f32, cleared: Option<f32>) -> f32 {
    let fade = |at: f32| 1.0 - progress(at, 0.0, OVERLAY_FADE_MS);
    match cleared {
        None => fade(t),
        Some(c) if t <= c => fade(t),
        Some(c) => fade(c) * (1.0 - progress(t, c, OVERLAY_FADE_MS)),
    }
}

/// How a page's content is drawn while it settles in or leaves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContentFade {
    pub opacity: f32,
    pub scale: f32,
    /// Blur radius in pixels.
    pub blur: f32,
}

impl ContentFade {
    pub const SETTLED: ContentFade = ContentFade {
        opacity: 1.0,
        scale: 1.0,
        blur: 0.0,
    };

    /// Sample the crossfade `elapsed` after the page swap.
    pub fn at(elapsed: Duration) -> Self {
        let t = ms(elapsed);
        if t >= CONTENT_SETTLE_MS {
            return Self::SETTLED;
        }
        let settle = RIPPLE_EASE.ease(progress(t, 0.0, CONTENT_SETTLE_MS));
        Self {
            opacity: EASE_IN_OUT.ease(progress(t, 0.0, CONTENT_FADE_MS)),
            scale: CONTENT_START_SCALE + (1.0 - CONTENT_START_SCALE) * settle,
            blur: CONTENT_START_BLUR * (1.0 - settle),
        }
    }

    /// Sample the outgoing page `elapsed` after it started leaving. It grows
    /// and blurs at full opacity.
    pub fn exiting(elapsed: Duration) -> Self {
        let leave = RIPPLE_EASE.ease(progress(ms(elapsed), 0.0, CONTENT_SETTLE_MS));
        Self {
            opacity: 1.0,
            scale: 1.0 + (CONTENT_EXIT_SCALE - 1.0) * leave,
            blur: CONTENT_START_BLUR * leave,
        }
    }

    pub fn is_settled(&self) -> bool {
        *self == Self::SETTLED
    }
}
