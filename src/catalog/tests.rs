use super::*;
use crate::config::{TimeField, TrackDisplayField};

#[test]
fn fixture_ids_are_unique_and_every_track_has_colors() {
    let tracks = default_tracks();
    assert_eq!(tracks.len(), 5);

    let mut ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), tracks.len());

    for t in &tracks {
        assert!(t.primary_color.is_some(), "{} lacks a primary color", t.id);
        assert!(t.secondary_color.is_some(), "{} lacks a secondary color", t.id);
        assert!(t.duration > 0);
    }
}

#[test]
fn theme_falls_back_per_missing_color() {
    let mut t = default_tracks().remove(0);
    assert_eq!(t.theme().dominant.as_str(), "#404040");

    t.primary_color = None;
    let theme = t.theme();
    assert_eq!(theme.dominant.as_str(), FALLBACK_DOMINANT);
    assert_eq!(theme.accent.as_str(), "#BFBFBF");

    t.secondary_color = None;
    assert_eq!(t.theme(), Theme::default());
}

#[test]
fn theme_color_parses_long_and_short_hex() {
    assert_eq!(ThemeColor::new("#7b68ee").rgb(), Some((0x7b, 0x68, 0xee)));
    assert_eq!(ThemeColor::new("#BFBFBF").rgb(), Some((0xbf, 0xbf, 0xbf)));
    assert_eq!(ThemeColor::new("#fff").rgb(), Some((255, 255, 255)));
    assert_eq!(ThemeColor::new("rebeccapurple").rgb(), None);
    assert_eq!(ThemeColor::new("#12345").rgb(), None);
    assert_eq!(ThemeColor::new("#gg0000").rgb(), None);
}

#[test]
fn display_from_fields_skips_blank_parts() {
    let mut t = default_tracks().remove(1);
    assert_eq!(
        display_from_fields(&t, &[TrackDisplayField::Artist, TrackDisplayField::Title], " - "),
        "beabadoobee - the way things go"
    );

    t.artist = "   ".into();
    assert_eq!(
        display_from_fields(&t, &[TrackDisplayField::Artist, TrackDisplayField::Title], " - "),
        "the way things go"
    );
    assert_eq!(display_from_fields(&t, &[], " - "), "the way things go");
}

#[test]
fn format_mmss_floors_and_pads() {
    assert_eq!(format_mmss(0.0), "0:00");
    assert_eq!(format_mmss(61.9), "1:01");
    assert_eq!(format_mmss(241.0), "4:01");
    assert_eq!(format_mmss(-3.0), "0:00");
    assert_eq!(format_mmss(f64::NAN), "0:00");
}

#[test]
fn time_text_honors_field_order() {
    let fields = [TimeField::Elapsed, TimeField::Total, TimeField::Remaining];
    assert_eq!(
        time_text(30.0, 212.0, &fields, " / ").as_deref(),
        Some("0:30 / 3:32 / -3:02")
    );
    assert_eq!(time_text(30.0, 212.0, &[], " / "), None);
    // Remaining never goes negative when the cursor runs past the total.
    assert_eq!(
        time_text(300.0, 212.0, &[TimeField::Remaining], "").as_deref(),
        Some("-0:00")
    );
}
