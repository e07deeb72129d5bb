use ratatui::{Terminal, backend::TestBackend};

use super::*;
use crate::app::default_hotspots;
use crate::audio::fake::FakeDevice;
use crate::catalog::default_tracks;
use crate::session::{PlaybackSession, SessionOptions};
use crate::transition::{RingFrame, TransitionSequencer, TransitionTimings, Viewport};

fn overlay(opacity: f32) -> OverlayFrame {
    OverlayFrame {
        origin: Point::new(0.0, 0.0),
        accent: ThemeColor::new("#7b68ee"),
        opacity,
        rings: vec![RingFrame {
            diameter: 200.0,
            alpha: 0.25,
        }],
        blob: BlobFrame::Growing { diameter: 0.0 },
        particles: Vec::new(),
        glow: 0.0,
    }
}

fn app_at(viewport: Viewport) -> App<FakeDevice> {
    let (device, _probe) = FakeDevice::new();
    let session = PlaybackSession::new(default_tracks(), device, SessionOptions::default());
    let transition = TransitionSequencer::new(TransitionTimings {
        seed: Some(3),
        ..TransitionTimings::default()
    });
    App::new(session, transition, viewport)
}

fn symbol_at(buf: &Buffer, x: u16, y: u16) -> &str {
    buf.cell((x, y)).map(|c| c.symbol()).unwrap_or("")
}

fn buffer_text(buf: &Buffer) -> String {
    buf.content().iter().map(|c| c.symbol()).collect()
}

#[test]
fn controls_text_includes_scrub_seconds() {
    let text = controls_text(7);
    assert!(text.contains("[H/L] scrub -/+7s"));
    assert!(text.starts_with("[j/k] focus"));
    assert!(text.ends_with("[q] quit"));
}

#[test]
fn regions_map_inside_the_scene() {
    let area = Rect::new(1, 4, 80, 20);
    for h in default_hotspots() {
        let r = region_rect(&h.region, area);
        assert!(!r.is_empty(), "{} vanished", h.label);
        assert_eq!(r.intersection(area), r, "{} leaks out", h.label);
    }
}

#[test]
fn blend_moves_toward_the_tint() {
    assert_eq!(blend((0, 0, 0), (200, 100, 50), 0.0), (0, 0, 0));
    assert_eq!(blend((0, 0, 0), (200, 100, 50), 1.0), (200, 100, 50));
    assert_eq!(blend((0, 0, 0), (200, 100, 50), 0.5), (100, 50, 25));
    assert_eq!(blend((10, 10, 10), (20, 20, 20), 3.0), (20, 20, 20));
}

#[test]
fn overlay_tints_only_inside_the_rings() {
    let o = overlay(1.0);
    assert!((overlay_tint(&o, Point::new(50.0, 0.0), 1000.0) - 0.25).abs() < 1e-6);
    assert_eq!(overlay_tint(&o, Point::new(150.0, 0.0), 1000.0), 0.0);

    let faded = overlay(0.5);
    assert!((overlay_tint(&faded, Point::new(50.0, 0.0), 1000.0) - 0.125).abs() < 1e-6);
}

#[test]
fn cell_centers_use_the_cell_size() {
    let ui = UiSettings::default();
    assert_eq!(cell_center(0, 0, &ui), Point::new(5.0, 10.0));
    assert_eq!(cell_center(3, 2, &ui), Point::new(35.0, 50.0));
}

#[test]
fn draw_renders_scene_player_and_overlay() {
    let mut app = app_at(Viewport::new(800.0, 600.0));
    let ui = UiSettings::default();

    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
    terminal.draw(|f| draw(f, &app, &ui)).unwrap();
    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("gramophone"));
    assert!(text.contains("Matcha"));
    assert!(text.contains("A Couple Minutes"));

    app.activate_focused();
    app.toggle_picker();
    terminal.draw(|f| draw(f, &app, &ui)).unwrap();
    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("playlist"));
}

#[test]
fn scene_sits_between_header_and_player() {
    let area = Rect::new(0, 0, 120, 40);
    assert_eq!(scene_area(area, false), Rect::new(1, 4, 118, 24));
    assert_eq!(scene_area(area, true), Rect::new(1, 4, 118, 28));

    let ui = UiSettings::default();
    let r = scene_rect(area, false, &ui);
    assert_eq!((r.x, r.y, r.width, r.height), (10.0, 80.0, 1180.0, 480.0));
}

#[test]
fn clicking_a_drawn_outline_opens_its_page() {
    let ui = UiSettings::default();
    for minimized in [false, true] {
        let mut app = app_at(Viewport::new(1200.0, 800.0));
        if minimized {
            app.session.minimize();
        }
        let area = Rect::new(0, 0, 120, 40);
        app.set_scene(scene_rect(area, minimized, &ui));

        let mut terminal = Terminal::new(TestBackend::new(area.width, area.height)).unwrap();
        terminal.draw(|f| draw(f, &app, &ui)).unwrap();

        let cat = app.hotspots().iter().find(|h| h.page == Page::EasterEgg).unwrap();
        let drawn = region_rect(&cat.region, scene_area(area, minimized));
        let buf = terminal.backend().buffer();
        assert_eq!(symbol_at(buf, drawn.x, drawn.y), "┌");
        let title: String = (1..4).map(|dx| symbol_at(buf, drawn.x + dx, drawn.y)).collect();
        assert_eq!(title, "Cat");

        let at = cell_center(drawn.x + drawn.width / 2, drawn.y + drawn.height / 2, &ui);
        assert!(app.click(at), "click inside the drawn cat missed");
        assert_eq!(app.transition.state().origin, Some(at));
        app.advance(std::time::Duration::from_millis(50));
        assert_eq!(app.page(), Page::EasterEgg);
    }
}

#[test]
fn cells_around_a_drawn_outline_miss_it() {
    let ui = UiSettings::default();
    let area = Rect::new(0, 0, 120, 40);
    let scene = scene_rect(area, false, &ui);
    let hotspots = default_hotspots();
    let cat = hotspots.iter().position(|h| h.page == Page::EasterEgg).unwrap();
    let drawn = region_rect(&hotspots[cat].region, scene_area(area, false));

    let below = cell_center(drawn.x + drawn.width / 2, drawn.bottom(), &ui);
    let right = cell_center(drawn.right(), drawn.y, &ui);
    assert_ne!(crate::app::hit_test(&hotspots, scene, below), Some(cat));
    assert_ne!(crate::app::hit_test(&hotspots, scene, right), Some(cat));
}

#[test]
fn every_drawn_outline_hits_its_own_hotspot() {
    let ui = UiSettings::default();
    let area = Rect::new(0, 0, 120, 40);
    let hotspots = default_hotspots();
    for minimized in [false, true] {
        let scene = scene_rect(area, minimized, &ui);
        let inner = scene_area(area, minimized);
        for (i, h) in hotspots.iter().enumerate() {
            let drawn = region_rect(&h.region, inner);
            let at = cell_center(drawn.x + drawn.width / 2, drawn.y + drawn.height / 2, &ui);
            assert_eq!(
                crate::app::hit_test(&hotspots, scene, at),
                Some(i),
                "{} (minimized: {minimized})",
                h.label
            );
        }
    }
}
