//! A recording audio device for tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::DeviceError;

use super::device::AudioDevice;
use super::types::{Completion, DeviceEvent, DeviceEventKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSource(String),
    Load,
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    SetLooping(bool),
    Release,
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    queued: Vec<DeviceEvent>,
    source_seq: u64,
    fail_plays: usize,
    volume: f32,
    looping: bool,
    released: bool,
}

/// Device half, handed to the session.
pub struct FakeDevice {
    inner: Rc<RefCell<Inner>>,
}

/// Test half: inspect calls and inject events.
#[derive(Clone)]
pub struct FakeProbe {
    inner: Rc<RefCell<Inner>>,
}

impl FakeDevice {
    pub fn new() -> (Self, FakeProbe) {
        let inner = Rc::new(RefCell::new(Inner::default()));
        (
            Self {
                inner: inner.clone(),
            },
            FakeProbe { inner },
        )
    }
}

impl FakeProbe {
    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    pub fn source_seq(&self) -> u64 {
        self.inner.borrow().source_seq
    }

    /// Queue an event for the current source.
    pub fn emit(&self, kind: DeviceEventKind) {
        let seq = self.source_seq();
        self.emit_for(seq, kind);
    }

    pub fn emit_for(&self, source_seq: u64, kind: DeviceEventKind) {
        self.inner
            .borrow_mut()
            .queued
            .push(DeviceEvent { source_seq, kind });
    }

    /// Make the next `n` play requests fail.
    pub fn fail_plays(&self, n: usize) {
        self.inner.borrow_mut().fail_plays = n;
    }

    pub fn released(&self) -> bool {
        self.inner.borrow().released
    }

    pub fn volume(&self) -> f32 {
        self.inner.borrow().volume
    }

    pub fn looping(&self) -> bool {
        self.inner.borrow().looping
    }
}

impl AudioDevice for FakeDevice {
    fn set_source(&mut self, source: &str) -> u64 {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call::SetSource(source.to_string()));
        inner.source_seq += 1;
        inner.source_seq
    }

    fn load(&mut self) {
        self.inner.borrow_mut().calls.push(Call::Load);
    }

    fn play(&mut self) -> Completion {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call::Play);
        if inner.fail_plays > 0 {
            inner.fail_plays -= 1;
            return Completion::settled(Err(DeviceError::NoSource));
        }
        Completion::settled(Ok(()))
    }

    fn pause(&mut self) {
        self.inner.borrow_mut().calls.push(Call::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.inner.borrow_mut().calls.push(Call::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call::SetVolume(volume));
        inner.volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call::SetLooping(looping));
        inner.looping = looping;
    }

    fn poll_events(&mut self) -> Vec<DeviceEvent> {
        std::mem::take(&mut self.inner.borrow_mut().queued)
    }

    fn release(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call::Release);
        inner.released = true;
    }
}
