use crate::catalog::ThemeColor;
use crate::transition::{Page, Point, Viewport};

/// Size of the illustrated scene the hotspot outlines were drawn on.
const SCENE_WIDTH: f32 = 1440.0;
const SCENE_HEIGHT: f32 = 1024.0;

/// A region of the normalized scene (0..1 on both axes).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    /// Build from scene pixel coordinates.
    fn scene(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left: left / SCENE_WIDTH,
            top: top / SCENE_HEIGHT,
            width: width / SCENE_WIDTH,
            height: height / SCENE_HEIGHT,
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether normalized point `(x, y)` lies inside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left
            && x < self.left + self.width
            && y >= self.top
            && y < self.top + self.height
    }
}

/// Where the landing scene is drawn, in viewport pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SceneRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SceneRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A scene filling the whole viewport.
    pub fn covering(viewport: Viewport) -> Self {
        Self::new(0.0, 0.0, viewport.width, viewport.height)
    }

    /// `point` in normalized scene coordinates, or `None` for an empty scene.
    fn normalize(&self, point: Point) -> Option<(f32, f32)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some((
            (point.x - self.x) / self.width,
            (point.y - self.y) / self.height,
        ))
    }
}

/// A clickable outline on the landing scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Hotspot {
    pub page: Page,
    pub label: &'static str,
    pub color: ThemeColor,
    pub region: Region,
}

impl Hotspot {
    /// Center of the hotspot in viewport pixels, with the scene drawn at `scene`.
    pub fn center(&self, scene: SceneRect) -> Point {
        let r = &self.region;
        Point::new(
            scene.x + (r.left + r.width / 2.0) * scene.width,
            scene.y + (r.top + r.height / 2.0) * scene.height,
        )
    }
}

/// The six outlines of the landing scene, in focus order.
pub fn default_hotspots() -> Vec<Hotspot> {
    let spot = |page, label, color: &str, region| Hotspot {
        page,
        label,
        color: ThemeColor::new(color),
        region,
    };
    vec![
        spot(
            Page::About,
            "Name",
            "#f472b6",
            Region::scene(196.0, 84.0, 208.05, 274.0),
        ),
        spot(
            Page::Projects,
            "Projects",
            "#7b68ee",
            Region::scene(799.66, 74.84, 392.228, 331.11),
        ),
        spot(
            Page::Music,
            "Gramophone",
            "#ec4899",
            Region::scene(1020.24, 202.5, 442.895, 542.228),
        ),
        spot(
            Page::Gallery,
            "Flower",
            "#f59e0b",
            Region::scene(877.0, 541.0, 213.665, 260.111),
        ),
        spot(
            Page::EasterEgg,
            "Cat",
            "#fbbf24",
            Region::scene(554.12, 477.89, 71.607, 74.974),
        ),
        spot(
            Page::Interests,
            "Matcha",
            "#84cc16",
            Region::scene(140.35, 671.0, 281.436, 202.318),
        ),
    ]
}

/// The hotspot under `point`. Overlapping outlines resolve to the smallest.
pub fn hit_test(hotspots: &[Hotspot], scene: SceneRect, point: Point) -> Option<usize> {
    let (x, y) = scene.normalize(point)?;
    hotspots
        .iter()
        .enumerate()
        .filter(|(_, h)| h.region.contains(x, y))
        .min_by(|(_, a), (_, b)| a.region.area().total_cmp(&b.region.area()))
        .map(|(i, _)| i)
}
