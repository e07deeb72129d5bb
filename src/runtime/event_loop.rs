use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{debug, info};

use crate::app::App;
use crate::audio::AudioDevice;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::startup;
use crate::transition::{Page, Phase};
use crate::ui;

/// Volume change per `+`/`-` press.
const VOLUME_STEP: f32 = 0.05;

/// Input poll interval while nothing animates.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Main terminal event loop: handles input, advances the controllers' clocks,
/// pumps the audio device and keeps MPRIS in sync. Returns `Ok(())` when
/// shutdown is requested.
pub fn run<D: AudioDevice>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<D>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame = Duration::from_millis(settings.ui.frame_ms.max(1));
    let sessions = app.session.subscribe();
    let pages = app.transition.subscribe();
    let mut last_track = app.session.state().current;
    let mut last_tick = Instant::now();

    loop {
        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        app.session.pump_device();
        let now = Instant::now();
        app.advance(now.saturating_duration_since(last_tick));
        last_tick = now;

        // Media keys and auto-advance change playback without a key press.
        if let Some(state) = sessions.try_iter().last() {
            if state.current != last_track {
                last_track = state.current;
                app.session.extract_colors();
            }
            update_mpris(mpris, &state);
        }
        for t in pages.try_iter() {
            debug!(page = %t.page, origin = ?t.origin, "transition state");
        }

        // The player height moves the scene, so place it before every frame.
        let size = terminal.size()?;
        place(app, size.width, size.height, &settings.ui);
        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        let wait = if app.transition.phase() == Phase::Idle {
            frame.max(IDLE_POLL)
        } else {
            frame
        };
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, app) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, &settings.ui, app),
                Event::Resize(cols, rows) => place(app, cols, rows, &settings.ui),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Match the app's viewport and scene placement to a `cols` x `rows` screen.
fn place<D: AudioDevice>(app: &mut App<D>, cols: u16, rows: u16, ui: &config::UiSettings) {
    app.set_viewport(startup::viewport(cols, rows, ui));
    let minimized = app.session.state().is_minimized;
    app.set_scene(ui::scene_rect(Rect::new(0, 0, cols, rows), minimized, ui));
}

/// Apply a command from the MPRIS service. Returns `true` on quit.
fn handle_control_cmd<D: AudioDevice>(cmd: ControlCmd, app: &mut App<D>) -> bool {
    debug!(?cmd, "mpris command");
    match cmd {
        ControlCmd::Quit => {
            info!("quit requested over mpris");
            return true;
        }
        ControlCmd::Play => app.session.play(),
        // There is no stopped state; stopping leaves the track paused.
        ControlCmd::Pause | ControlCmd::Stop => app.session.pause(),
        ControlCmd::PlayPause => app.session.toggle_play(),
        ControlCmd::Next => app.session.next_track(),
        ControlCmd::Prev => app.session.previous_track(),
    }
    false
}

fn handle_mouse_event<D: AudioDevice>(mouse: MouseEvent, ui: &config::UiSettings, app: &mut App<D>) {
    if mouse.kind == MouseEventKind::Down(MouseButton::Left) && app.picker.is_none() {
        app.click(ui::cell_center(mouse.column, mouse.row, ui));
    }
}

/// Apply a key press. Returns `true` on quit.
fn handle_key_event<D: AudioDevice>(key: KeyEvent, settings: &config::Settings, app: &mut App<D>) -> bool {
    if app.picker.is_some() {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.picker_move(1),
            KeyCode::Char('k') | KeyCode::Up => app.picker_move(-1),
            KeyCode::Enter => app.picker_confirm(),
            KeyCode::Esc | KeyCode::Char('o') => app.toggle_picker(),
            KeyCode::Char('q') => return true,
            _ => {}
        }
        return false;
    }

    let scrub = settings.ui.scrub_seconds as f64;
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Right | KeyCode::Tab => app.focus_next(),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::Left | KeyCode::BackTab => app.focus_prev(),
        KeyCode::Enter => {
            app.activate_focused();
        }
        KeyCode::Esc | KeyCode::Char('b') => {
            if app.page() != Page::Home {
                app.navigate_back();
            }
        }
        KeyCode::Char(' ') => app.session.toggle_play(),
        KeyCode::Char('n') => app.session.next_track(),
        KeyCode::Char('p') => app.session.previous_track(),
        KeyCode::Char('r') => app.session.toggle_loop(),
        KeyCode::Char('s') => app.session.toggle_shuffle(),
        KeyCode::Char('d') => app.session.toggle_dark_mode(),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = app.session.state().volume;
            app.session.set_volume((v + VOLUME_STEP).min(1.0));
        }
        KeyCode::Char('-') => {
            let v = app.session.state().volume;
            app.session.set_volume((v - VOLUME_STEP).max(0.0));
        }
        KeyCode::Char('L') => {
            let state = app.session.state();
            let mut to = state.current_time + scrub;
            let total = state.effective_duration();
            if total > 0.0 {
                to = to.min(total);
            }
            app.session.seek_to(to);
        }
        KeyCode::Char('H') => {
            let to = (app.session.state().current_time - scrub).max(0.0);
            app.session.seek_to(to);
        }
        KeyCode::Char('e') => app.session.expand_player(),
        KeyCode::Char('m') => app.session.minimize(),
        KeyCode::Char('o') => app.toggle_picker(),
        _ => {}
    }
    false
}
