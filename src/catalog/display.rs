use crate::config::{TimeField, TrackDisplayField};

use super::model::Track;

/// Build a display string for `track` from the configured `fields` and separator.
///
/// Empty fields are skipped; the title is used when nothing was produced.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let value = match f {
            TrackDisplayField::Title => track.title.as_str(),
            TrackDisplayField::Artist => track.artist.as_str(),
            TrackDisplayField::Album => track.album.as_str(),
            TrackDisplayField::Source => track.source.as_str(),
        };
        let value = value.trim();
        if !value.is_empty() {
            parts.push(value.to_string());
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}

/// Format whole seconds as `M:SS`. Negative and non-finite input shows `0:00`.
pub fn format_mmss(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Build the time text (elapsed/total/remaining) for the player bar.
pub fn time_text(elapsed: f64, total: f64, fields: &[TimeField], sep: &str) -> Option<String> {
    if fields.is_empty() {
        return None;
    }

    let parts: Vec<String> = fields
        .iter()
        .map(|f| match f {
            TimeField::Elapsed => format_mmss(elapsed),
            TimeField::Total => format_mmss(total),
            TimeField::Remaining => format!("-{}", format_mmss((total - elapsed).max(0.0))),
        })
        .collect();

    Some(parts.join(sep))
}
