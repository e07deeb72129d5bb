use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::catalog::ThemeColor;
use crate::timeline::Timeline;

use super::effects::{Burst, ContentFade, OVERLAY_LIFETIME, OverlayFrame, overlay_frame};
use super::page::{Page, Phase, Point, TransitionState, Viewport};

/// Delays and look of the staged page swap.
#[derive(Debug, Clone)]
pub struct TransitionTimings {
    /// Request to page swap.
    pub swap_delay: Duration,
    /// Page swap to origin clear.
    pub clear_delay: Duration,
    /// Accent used by `navigate_back`.
    pub back_color: ThemeColor,
    pub particles: usize,
    /// Seed for the particle layout; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            swap_delay: Duration::from_millis(50),
            clear_delay: Duration::from_millis(50),
            back_color: ThemeColor::new("#6366f1"),
            particles: 20,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Swap(Page),
    Clear,
    Settle,
}

/// A scheduled stage, tagged with the request that scheduled it.
#[derive(Debug, Clone, Copy)]
struct Staged {
    token: u64,
    stage: Stage,
}

/// What the overlay is anchored to for the request in flight.
struct Flight {
    started: Duration,
    anchor: Point,
    burst: Burst,
    cleared: Option<Duration>,
}

/// Owns [`TransitionState`] and performs the staged page swap.
///
/// Every request bumps a token. Stages left over from an older request still
/// fire but do nothing, so the latest request wins outright.
pub struct TransitionSequencer {
    state: TransitionState,
    phase: Phase,
    token: u64,
    timeline: Timeline<Staged>,
    timings: TransitionTimings,
    flight: Option<Flight>,
    /// Page-swap time of the last swap, kept after the flight ends.
    last_swap: Option<Duration>,
    rng: StdRng,
    subscribers: Vec<Sender<TransitionState>>,
}

impl TransitionSequencer {
    pub fn new(timings: TransitionTimings) -> Self {
        let rng = match timings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: TransitionState {
                page: Page::Home,
                origin: None,
                accent: timings.back_color.clone(),
            },
            phase: Phase::Idle,
            token: 0,
            timeline: Timeline::new(),
            timings,
            flight: None,
            last_swap: None,
            rng,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn page(&self) -> Page {
        self.state.page
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Receive a snapshot after every change.
    pub fn subscribe(&mut self) -> Receiver<TransitionState> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Start a transition to `page`, rippling out from `origin` in `color`.
    ///
    /// Origin and color apply now; the page swaps after `swap_delay` and the
    /// origin clears `clear_delay` after that.
    pub fn navigate_to(&mut self, page: Page, origin: Point, color: ThemeColor) {
        self.token += 1;
        let token = self.token;
        debug!(%page, token, x = origin.x, y = origin.y, "navigate");

        let now = self.timeline.now();
        self.flight = Some(Flight {
            started: now,
            anchor: origin,
            burst: Burst::random(&mut self.rng, self.timings.particles),
            cleared: None,
        });

        self.state.origin = Some(origin);
        self.state.accent = color;
        self.phase = Phase::Priming;
        self.publish();

        let swap = self.timings.swap_delay;
        let clear = swap + self.timings.clear_delay;
        let settle = clear.max(OVERLAY_LIFETIME);
        self.timeline.schedule(swap, Staged { token, stage: Stage::Swap(page) });
        self.timeline.schedule(clear, Staged { token, stage: Stage::Clear });
        self.timeline.schedule(settle, Staged { token, stage: Stage::Settle });
    }

    /// Go home from the middle of `viewport` in the fixed back color.
    pub fn navigate_back(&mut self, viewport: Viewport) {
        let color = self.timings.back_color.clone();
        self.navigate_to(Page::Home, viewport.center(), color);
    }

    /// Move the sequencer's timeline forward by `by`.
    pub fn advance(&mut self, by: Duration) {
        for staged in self.timeline.advance(by) {
            if staged.token != self.token {
                trace!(token = staged.token, current = self.token, "stale transition stage");
                continue;
            }
            self.run(staged.stage);
        }
    }

    fn run(&mut self, stage: Stage) {
        let Some(flight) = self.flight.as_mut() else {
            return;
        };
        match stage {
            Stage::Swap(page) => {
                let at = flight.started + self.timings.swap_delay;
                self.last_swap = Some(at);
                self.state.page = page;
                self.phase = Phase::Swapping;
                self.publish();
            }
            Stage::Clear => {
                flight.cleared =
                    Some(self.timings.swap_delay + self.timings.clear_delay);
                self.state.origin = None;
                self.phase = Phase::Settling;
                self.publish();
            }
            Stage::Settle => {
                self.flight = None;
                self.phase = Phase::Idle;
            }
        }
    }

    /// The overlay to draw now, if a transition is in flight.
    pub fn overlay(&self) -> Option<OverlayFrame> {
        let flight = self.flight.as_ref()?;
        let elapsed = self.timeline.now().saturating_sub(flight.started);
        Some(overlay_frame(
            elapsed,
            flight.cleared,
            flight.anchor,
            &self.state.accent,
            &flight.burst,
        ))
    }

    /// How to draw the current page's content: leaving while a request waits
    /// for its swap, settling in after it.
    pub fn content_fade(&self) -> ContentFade {
        if let (Phase::Priming, Some(flight)) = (self.phase, self.flight.as_ref()) {
            return ContentFade::exiting(self.timeline.now().saturating_sub(flight.started));
        }
        match self.last_swap {
            Some(at) => ContentFade::at(self.timeline.now().saturating_sub(at)),
            None => ContentFade::SETTLED,
        }
    }

    fn publish(&mut self) {
        let snapshot = &self.state;
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}
