use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ThemeColor;

/// Every page the site can show.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    About,
    Interests,
    Gallery,
    Music,
    Projects,
    EasterEgg,
}

impl Page {
    /// Identifier as used in URLs and config.
    pub fn id(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::About => "about",
            Page::Interests => "interests",
            Page::Gallery => "gallery",
            Page::Music => "music",
            Page::Projects => "projects",
            Page::EasterEgg => "easter-egg",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About Me",
            Page::Interests => "Interests",
            Page::Gallery => "Gallery",
            Page::Music => "Music",
            Page::Projects => "Projects",
            Page::EasterEgg => "You found it!",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Screen coordinates in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of the visible screen in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Length of the diagonal: the radius that covers the screen from any
    /// point on it.
    pub fn diagonal(&self) -> f32 {
        self.width.hypot(self.height)
    }
}

/// What page-transition rendering reads.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionState {
    pub page: Page,
    /// Set for the short window after a request; drives the overlay.
    pub origin: Option<Point>,
    pub accent: ThemeColor,
}

/// Where the sequencer is in its staged sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Origin recorded; old page still showing.
    Priming,
    /// Page swapped; ripple still anchored.
    Swapping,
    /// Origin cleared; overlay fading out.
    Settling,
}
