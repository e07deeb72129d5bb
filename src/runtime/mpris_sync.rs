use crate::mpris::{MprisHandle, Status};
use crate::session::PlaybackState;

pub fn status(state: &PlaybackState) -> Status {
    match (state.current_track(), state.is_playing) {
        (None, _) => Status::Stopped,
        (Some(_), true) => Status::Playing,
        (Some(_), false) => Status::Paused,
    }
}

pub fn update_mpris(mpris: &MprisHandle, state: &PlaybackState) {
    mpris.set_track_metadata(state.current_track(), state.effective_duration());
    mpris.set_status(status(state));
}
