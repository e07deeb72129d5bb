//! Application model: the orchestrator between the playback session and the
//! page transition sequencer.
//!
//! Navigation always minimizes the player before the sequencer is asked to
//! move, so the player never covers the incoming page.

use std::time::Duration;

use crate::audio::AudioDevice;
use crate::catalog::ThemeColor;
use crate::session::PlaybackSession;
use crate::transition::{Page, Point, TransitionSequencer, Viewport};

use super::hotspots::{Hotspot, SceneRect, default_hotspots, hit_test};

/// The main application model.
pub struct App<D: AudioDevice> {
    pub session: PlaybackSession<D>,
    pub transition: TransitionSequencer,
    hotspots: Vec<Hotspot>,
    /// Index into `hotspots` for keyboard navigation.
    pub focus: usize,
    viewport: Viewport,
    /// Where the landing scene is drawn; hotspots are placed relative to it.
    scene: SceneRect,
    /// Cursor of the playlist picker while it is open.
    pub picker: Option<usize>,
}

impl<D: AudioDevice> App<D> {
    pub fn new(
        session: PlaybackSession<D>,
        transition: TransitionSequencer,
        viewport: Viewport,
    ) -> Self {
        Self {
            session,
            transition,
            hotspots: default_hotspots(),
            focus: 0,
            viewport,
            scene: SceneRect::covering(viewport),
            picker: None,
        }
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    pub fn focused(&self) -> Option<&Hotspot> {
        self.hotspots.get(self.focus)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn scene(&self) -> SceneRect {
        self.scene
    }

    /// Place the landing scene. Call whenever the layout around it changes.
    pub fn set_scene(&mut self, scene: SceneRect) {
        self.scene = scene;
    }

    pub fn page(&self) -> Page {
        self.transition.page()
    }

    /// Move hotspot focus forward, wrapping.
    pub fn focus_next(&mut self) {
        if !self.hotspots.is_empty() {
            self.focus = (self.focus + 1) % self.hotspots.len();
        }
    }

    /// Move hotspot focus back, wrapping.
    pub fn focus_prev(&mut self) {
        if !self.hotspots.is_empty() {
            self.focus = self
                .focus
                .checked_sub(1)
                .unwrap_or(self.hotspots.len() - 1);
        }
    }

    /// Minimize the player, then start the transition to `page`.
    pub fn navigate_to(&mut self, page: Page, origin: Point, color: ThemeColor) {
        self.session.minimize();
        self.transition.navigate_to(page, origin, color);
    }

    /// Minimize the player, then transition home from the viewport center.
    pub fn navigate_back(&mut self) {
        self.session.minimize();
        self.transition.navigate_back(self.viewport);
    }

    /// Navigate through hotspot `index`, rippling from its center.
    ///
    /// Hotspots only exist on the landing scene; elsewhere this is a no-op.
    pub fn activate_hotspot(&mut self, index: usize) -> bool {
        if self.page() != Page::Home {
            return false;
        }
        let Some(h) = self.hotspots.get(index) else {
            return false;
        };
        let (page, origin, color) = (h.page, h.center(self.scene), h.color.clone());
        self.navigate_to(page, origin, color);
        true
    }

    pub fn activate_focused(&mut self) -> bool {
        self.activate_hotspot(self.focus)
    }

    /// Handle a click at `point` (viewport pixels). On the landing scene a
    /// hotspot hit navigates, rippling from the click itself.
    pub fn click(&mut self, point: Point) -> bool {
        if self.page() != Page::Home {
            return false;
        }
        let Some(i) = hit_test(&self.hotspots, self.scene, point) else {
            return false;
        };
        self.focus = i;
        let (page, color) = (self.hotspots[i].page, self.hotspots[i].color.clone());
        self.navigate_to(page, point, color);
        true
    }

    /// Advance both controllers' timelines by `by`.
    pub fn advance(&mut self, by: Duration) {
        self.session.advance(by);
        self.transition.advance(by);
    }

    /// Open the playlist picker on the current track, or close it.
    pub fn toggle_picker(&mut self) {
        self.picker = match self.picker {
            Some(_) => None,
            None => Some(self.session.state().current.unwrap_or(0)),
        };
    }

    /// Move the picker cursor by `delta`, wrapping.
    pub fn picker_move(&mut self, delta: isize) {
        let len = self.session.tracks().len();
        if let Some(cursor) = self.picker.as_mut() {
            if len > 0 {
                *cursor = (*cursor as isize + delta).rem_euclid(len as isize) as usize;
            }
        }
    }

    /// Select the track under the picker cursor and close the picker.
    pub fn picker_confirm(&mut self) {
        let Some(cursor) = self.picker.take() else {
            return;
        };
        let id = self.session.tracks().get(cursor).map(|t| t.id.clone());
        if let Some(id) = id {
            self.session.select_track(&id);
        }
    }
}
