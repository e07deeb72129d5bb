use std::time::Duration;

use proptest::prelude::*;

use super::*;
use crate::audio::DeviceEventKind;
use crate::audio::fake::{Call, FakeDevice, FakeProbe};
use crate::catalog::{FALLBACK_ACCENT, FALLBACK_DOMINANT, Track, default_tracks};

fn session() -> (PlaybackSession<FakeDevice>, FakeProbe) {
    session_with(SessionOptions {
        seed: Some(7),
        ..SessionOptions::default()
    })
}

fn session_with(options: SessionOptions) -> (PlaybackSession<FakeDevice>, FakeProbe) {
    let (device, probe) = FakeDevice::new();
    let session = PlaybackSession::new(default_tracks(), device, options);
    probe.clear_calls();
    (session, probe)
}

fn current_id<D: crate::audio::AudioDevice>(s: &PlaybackSession<D>) -> String {
    s.state()
        .current_track()
        .map(|t| t.id.clone())
        .unwrap_or_default()
}

#[test]
fn construction_syncs_the_device_once() {
    let (device, probe) = FakeDevice::new();
    let s = PlaybackSession::new(default_tracks(), device, SessionOptions::default());

    let first = &default_tracks()[0];
    assert_eq!(
        probe.calls(),
        vec![
            Call::SetSource(first.source.clone()),
            Call::Load,
            Call::Pause,
            Call::SetVolume(0.5),
            Call::SetLooping(false),
        ]
    );
    assert_eq!(s.state().current, Some(0));
    assert!(!s.state().is_playing);
    assert_eq!(s.state().dominant_color, first.theme().dominant);
}

#[test]
fn empty_track_list_has_no_current_track() {
    let (device, _probe) = FakeDevice::new();
    let mut s = PlaybackSession::new(Vec::new(), device, SessionOptions::default());
    assert!(s.state().current.is_none());
    assert_eq!(s.state().dominant_color.as_str(), FALLBACK_DOMINANT);

    s.next_track();
    s.previous_track();
    assert!(s.state().current.is_none());
}

#[test]
fn next_and_previous_wrap_at_both_ends() {
    let (mut s, _probe) = session();
    let n = s.tracks().len();

    for expected in (1..n).chain([0]) {
        s.next_track();
        assert_eq!(s.state().current, Some(expected));
    }

    s.previous_track();
    assert_eq!(s.state().current, Some(n - 1));
    s.previous_track();
    assert_eq!(s.state().current, Some(n - 2));
}

#[test]
fn track_change_resets_time_and_loads_new_source() {
    let (mut s, probe) = session();
    s.seek_to(42.0);
    probe.emit(DeviceEventKind::MetadataLoaded(180.0));
    s.pump_device();
    probe.clear_calls();

    s.next_track();

    let next = &s.tracks()[1];
    assert_eq!(s.state().current_time, 0.0);
    assert_eq!(s.state().duration, 0.0);
    assert_eq!(s.state().dominant_color, next.theme().dominant);
    assert_eq!(s.state().accent_color, next.theme().accent);
    assert_eq!(
        probe.calls(),
        vec![Call::SetSource(next.source.clone()), Call::Load]
    );
}

#[test]
fn track_change_while_playing_plays_once() {
    let (mut s, probe) = session();
    s.play();
    probe.clear_calls();

    s.next_track();

    let plays = probe.calls().iter().filter(|c| **c == Call::Play).count();
    assert_eq!(plays, 1);
    assert!(s.state().is_playing);
}

#[test]
fn previous_ignores_shuffle() {
    let (mut s, _probe) = session_with(SessionOptions {
        shuffling: true,
        seed: Some(3),
        ..SessionOptions::default()
    });
    let n = s.tracks().len();
    s.previous_track();
    assert_eq!(s.state().current, Some(n - 1));
    s.previous_track();
    assert_eq!(s.state().current, Some(n - 2));
}

#[test]
fn shuffle_picks_stay_in_range_and_may_repeat() {
    let (mut s, _probe) = session_with(SessionOptions {
        shuffling: true,
        seed: Some(11),
        ..SessionOptions::default()
    });
    let n = s.tracks().len();
    let mut repeated = false;
    for _ in 0..200 {
        let before = s.state().current;
        s.next_track();
        let after = s.state().current;
        assert!(after.is_some_and(|i| i < n));
        repeated |= before == after;
    }
    assert!(repeated, "a uniform pick over five tracks repeats within 200 draws");
}

#[test]
fn shuffle_repeat_rewinds_device_without_reloading() {
    let (mut s, probe) = session_with(SessionOptions {
        shuffling: true,
        seed: Some(5),
        ..SessionOptions::default()
    });
    s.play();
    loop {
        let before = s.state().current;
        probe.clear_calls();
        s.next_track();
        if s.state().current == before {
            break;
        }
    }
    let calls = probe.calls();
    assert!(!calls.iter().any(|c| matches!(c, Call::SetSource(_))));
    assert_eq!(calls, vec![Call::Seek(0.0), Call::Play]);
}

#[test]
fn select_track_always_pauses_and_rewinds() {
    let (mut s, probe) = session();
    s.play();
    s.seek_to(30.0);

    let id = s.tracks()[3].id.clone();
    s.select_track(&id);
    assert_eq!(s.state().current, Some(3));
    assert!(!s.state().is_playing);
    assert_eq!(s.state().current_time, 0.0);

    // Reselecting the current track is not short-circuited.
    s.seek_to(12.0);
    probe.clear_calls();
    s.select_track(&id);
    assert_eq!(s.state().current_time, 0.0);
    assert_eq!(probe.calls(), vec![Call::Seek(0.0)]);
}

#[test]
fn select_unknown_track_is_a_silent_noop() {
    let (mut s, probe) = session();
    let rx = s.subscribe();
    let before = s.state().clone();

    s.select_track("no-such-track");

    assert_eq!(*s.state(), before);
    assert!(probe.calls().is_empty());
    assert!(rx.try_recv().is_err());
}

#[test]
fn play_minimizes_and_pause_leaves_minimized_alone() {
    let (mut s, probe) = session();
    assert!(!s.state().is_minimized);

    s.play();
    assert!(s.state().is_playing);
    assert!(s.state().is_minimized);
    assert_eq!(probe.calls(), vec![Call::Play]);

    s.expand_player();
    assert!(!s.state().is_minimized);
    s.pause();
    assert!(!s.state().is_minimized);
}

#[test]
fn toggle_play_only_minimizes_when_starting() {
    let (mut s, _probe) = session();
    s.toggle_play();
    assert!(s.state().is_playing && s.state().is_minimized);

    s.expand_player();
    s.toggle_play();
    assert!(s.state().is_playing && s.state().is_minimized);
    s.expand_player();
    assert!(!s.state().is_playing);
    s.toggle_play();
    s.toggle_play();
    assert!(!s.state().is_playing);
    assert!(s.state().is_minimized);
}

#[test]
fn expand_player_reverts_only_the_transition_flag() {
    let (mut s, _probe) = session();
    s.play();

    s.expand_player();
    assert!(!s.state().is_minimized);
    assert!(!s.state().is_playing);
    assert!(s.state().is_transitioning);
    let expanded = s.state().clone();

    s.advance(Duration::from_millis(999));
    assert!(s.state().is_transitioning);

    s.advance(Duration::from_millis(1));
    let reverted = s.state().clone();
    assert!(!reverted.is_transitioning);
    assert_eq!(
        PlaybackState {
            is_transitioning: true,
            ..reverted
        },
        expanded
    );
}

#[test]
fn earlier_expand_revert_is_not_cancelled() {
    let (mut s, _probe) = session();
    s.expand_player();
    s.advance(Duration::from_millis(600));
    s.expand_player();
    s.advance(Duration::from_millis(400));
    // The first revert fires even though a second expand followed it.
    assert!(!s.state().is_transitioning);
}

#[test]
fn expand_revert_window_is_configurable() {
    let (mut s, _probe) = session_with(SessionOptions {
        expand_revert: Duration::from_millis(250),
        ..SessionOptions::default()
    });
    s.expand_player();
    s.advance(Duration::from_millis(250));
    assert!(!s.state().is_transitioning);
}

#[test]
fn ended_with_looping_restarts_same_track() {
    let (mut s, probe) = session();
    s.toggle_loop();
    s.play();
    probe.emit(DeviceEventKind::TimeUpdated(200.4));
    s.pump_device();
    assert_eq!(s.state().current_time, 200.0);
    probe.clear_calls();

    probe.emit(DeviceEventKind::Ended);
    s.pump_device();

    assert_eq!(s.state().current, Some(0));
    assert_eq!(s.state().current_time, 0.0);
    assert!(s.state().is_playing);
    assert_eq!(probe.calls(), vec![Call::Seek(0.0), Call::Play]);
}

#[test]
fn ended_without_looping_matches_next_track() {
    let (mut ended, probe) = session();
    ended.play();
    probe.emit(DeviceEventKind::Ended);
    ended.pump_device();

    let (mut stepped, _) = session();
    stepped.play();
    stepped.next_track();

    assert_eq!(ended.state(), stepped.state());
}

#[test]
fn events_for_a_replaced_source_are_dropped() {
    let (mut s, probe) = session();
    let old = probe.source_seq();
    s.next_track();

    probe.emit_for(old, DeviceEventKind::Ended);
    probe.emit_for(old, DeviceEventKind::TimeUpdated(99.0));
    s.pump_device();

    assert_eq!(s.state().current, Some(1));
    assert_eq!(s.state().current_time, 0.0);
    assert_eq!(s.diagnostics().stale_events, 2);
}

#[test]
fn device_reports_are_floored_and_sanitized() {
    let (mut s, probe) = session();
    probe.emit(DeviceEventKind::MetadataLoaded(215.9));
    probe.emit(DeviceEventKind::TimeUpdated(12.7));
    s.pump_device();
    assert_eq!(s.state().duration, 215.0);
    assert_eq!(s.state().current_time, 12.0);

    probe.emit(DeviceEventKind::MetadataLoaded(f64::INFINITY));
    probe.emit(DeviceEventKind::TimeUpdated(f64::NAN));
    s.pump_device();
    assert_eq!(s.state().duration, 0.0);
    assert_eq!(s.state().current_time, 0.0);
}

#[test]
fn duration_falls_back_to_fixture_until_metadata_loads() {
    let (mut s, probe) = session();
    let fixture = f64::from(s.tracks()[0].duration);
    assert_eq!(s.state().effective_duration(), fixture);

    probe.emit(DeviceEventKind::MetadataLoaded(100.0));
    s.pump_device();
    assert_eq!(s.state().effective_duration(), 100.0);

    s.seek_to(25.0);
    assert!((s.state().progress() - 0.25).abs() < 1e-9);
}

#[test]
fn the_cursor_lives_in_the_state_not_the_device() {
    let (mut s, probe) = session();
    s.seek_to(30.0);
    assert_eq!(s.state().current_time, 30.0);
    assert_eq!(probe.calls(), vec![Call::Seek(30.0)]);

    // Until the device reports, the seek target stands.
    s.pump_device();
    assert_eq!(s.state().current_time, 30.0);
    probe.emit(DeviceEventKind::TimeUpdated(31.2));
    s.pump_device();
    assert_eq!(s.state().current_time, 31.0);
}

#[test]
fn play_failures_are_swallowed_and_counted() {
    let (mut s, probe) = session();
    probe.fail_plays(2);

    s.play();
    s.next_track();
    assert!(s.state().is_playing);

    s.pump_device();
    assert!(s.state().is_playing);
    assert_eq!(s.diagnostics().device_failures, 2);
}

#[test]
fn volume_and_loop_are_synchronous_and_idempotent() {
    let (mut s, probe) = session();
    s.set_volume(0.5);
    s.set_volume(0.5);
    assert_eq!(s.state().volume, 0.5);
    // Unchanged volume is not pushed again.
    assert!(probe.calls().is_empty());

    s.set_volume(0.8);
    assert_eq!(s.state().volume, 0.8);
    assert_eq!(probe.volume(), 0.8);

    s.toggle_loop();
    assert!(s.state().is_looping);
    assert!(probe.looping());
    s.toggle_loop();
    assert!(!s.state().is_looping);
    assert!(!probe.looping());
}

#[test]
fn set_volume_does_not_clamp() {
    let (mut s, probe) = session();
    s.set_volume(1.7);
    assert_eq!(s.state().volume, 1.7);
    assert_eq!(probe.volume(), 1.7);
}

#[test]
fn flags_flip_without_side_effects() {
    let (mut s, probe) = session();
    let before = s.state().clone();

    s.toggle_shuffle();
    s.toggle_dark_mode();
    assert!(s.state().is_shuffling);
    assert!(s.state().dark_mode);
    assert_eq!(
        PlaybackState {
            is_shuffling: false,
            dark_mode: false,
            ..s.state().clone()
        },
        before
    );
    assert!(probe.calls().is_empty());
}

#[test]
fn seek_is_optimistic() {
    let (mut s, probe) = session();
    s.seek_to(64.0);
    assert_eq!(s.state().current_time, 64.0);
    assert_eq!(probe.calls(), vec![Call::Seek(64.0)]);
}

#[test]
fn minimize_changes_only_the_minimized_flag() {
    let (mut s, probe) = session();
    let before = s.state().clone();
    s.minimize();
    assert!(s.state().is_minimized);
    assert_eq!(
        PlaybackState {
            is_minimized: false,
            ..s.state().clone()
        },
        before
    );
    assert!(probe.calls().is_empty());
}

#[test]
fn extract_colors_needs_both_colors() {
    let mut tracks = default_tracks();
    tracks[0].secondary_color = None;
    let (device, _probe) = FakeDevice::new();
    let mut s = PlaybackSession::new(tracks, device, SessionOptions::default());

    // Colors fall back one at a time.
    assert_eq!(s.state().dominant_color.as_str(), "#404040");
    assert_eq!(s.state().accent_color.as_str(), FALLBACK_ACCENT);

    let rx = s.subscribe();
    s.extract_colors();
    assert!(rx.try_recv().is_err());

    s.next_track();
    let theme = s.tracks()[1].theme();
    assert_eq!(s.state().dominant_color, theme.dominant);
    s.extract_colors();
    assert_eq!(s.state().accent_color, theme.accent);
}

#[test]
fn subscribers_see_each_change_and_are_pruned() {
    let (mut s, _probe) = session();
    let rx = s.subscribe();
    let dropped = s.subscribe();
    drop(dropped);

    s.play();
    s.toggle_shuffle();

    let first = rx.try_recv().unwrap();
    assert!(first.is_playing);
    assert!(!first.is_shuffling);
    let second = rx.try_recv().unwrap();
    assert!(second.is_shuffling);
    assert!(rx.try_recv().is_err());

    // Re-pausing an already paused session publishes nothing.
    s.pause();
    s.pause();
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn dropping_the_session_releases_the_device() {
    let (s, probe) = session();
    assert!(!probe.released());
    drop(s);
    assert!(probe.released());
    assert_eq!(probe.calls().last(), Some(&Call::Release));
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Next,
    Previous,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![Just(Step::Next), Just(Step::Previous)]
}

proptest! {
    #[test]
    fn sequential_steps_track_modular_position(steps in prop::collection::vec(step(), 0..64)) {
        let (mut s, _probe) = session();
        let n = s.tracks().len() as i64;
        let mut expected: i64 = 0;

        for st in steps {
            match st {
                Step::Next => { s.next_track(); expected += 1; }
                Step::Previous => { s.previous_track(); expected -= 1; }
            }
            prop_assert_eq!(s.state().current, Some(expected.rem_euclid(n) as usize));
            prop_assert_eq!(s.state().current_time, 0.0);
        }
    }

    #[test]
    fn select_round_trips_any_fixture(index in 0usize..5, playing in any::<bool>(), at in 0.0f64..300.0) {
        let tracks: Vec<Track> = default_tracks();
        let (mut s, _probe) = session();
        if playing {
            s.play();
        }
        s.seek_to(at);

        let id = tracks[index].id.clone();
        s.select_track(&id);

        prop_assert_eq!(current_id(&s), id);
        prop_assert!(!s.state().is_playing);
        prop_assert_eq!(s.state().current_time, 0.0);
    }
}
