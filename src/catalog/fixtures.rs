use super::model::{ThemeColor, Track};

fn track(
    id: &str,
    title: &str,
    artist: &str,
    album: &str,
    duration: u32,
    cover: &str,
    source: &str,
    colors: (&str, &str),
) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        duration,
        cover: cover.to_string(),
        source: source.to_string(),
        primary_color: Some(ThemeColor::new(colors.0)),
        secondary_color: Some(ThemeColor::new(colors.1)),
    }
}

/// The built-in song list, in playlist order.
///
/// `source` and `cover` are file names relative to the configured music and
/// cover directories.
pub fn default_tracks() -> Vec<Track> {
    vec![
        track(
            "1",
            "A Couple Minutes",
            "Olivia Dean",
            "The Art of Loving",
            212,
            "Olivia Dean Album Cover.png",
            "Olivia Dean - A Couple Minutes (Lyric Video).mp3",
            ("#404040", "#BFBFBF"),
        ),
        track(
            "2",
            "the way things go",
            "beabadoobee",
            "Beatopia",
            203,
            "Beabadoobee Album Cover.jpeg",
            "beabadoobee - the way things go.mp3",
            ("#BEBDBF", "#A58169"),
        ),
        track(
            "3",
            "Soft Spot",
            "keshi",
            "GABRIEL",
            204,
            "Keshi Album Cover.jpeg",
            "keshi - Soft Spot (Official Music Video).mp3",
            ("#262621", "#BFBAA8"),
        ),
        track(
            "4",
            "Falling Behind",
            "Laufey",
            "Everything I Know About Love",
            174,
            "Laufey Album Cover.jpeg",
            "Laufey - Falling Behind (Official Audio).mp3",
            ("#939848", "#324F17"),
        ),
        track(
            "5",
            "Blessed",
            "Daniel Caesar",
            "Freudian",
            241,
            "Daniel Caesar Album Cover.avif",
            "Blessed.mp3",
            ("#b7ccd4", "#78a2b7"),
        ),
    ]
}
