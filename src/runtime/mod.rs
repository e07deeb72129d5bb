use std::sync::mpsc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::RodioDevice;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::session::PlaybackSession;
use crate::transition::TransitionSequencer;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub use settings::load_settings;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, problem) = settings::load_settings();
    if let Some(path) = logging::init(&settings.log) {
        info!(?path, "gramophone starting");
    }
    if let Some(e) = problem {
        warn!("using default settings: {e}");
    }

    let device = RodioDevice::open(&settings.audio);
    let session = PlaybackSession::new(
        startup::tracks(&settings),
        device,
        startup::session_options(&settings),
    );
    let transition = TransitionSequencer::new(startup::transition_timings(&settings));

    let (cols, rows) = terminal::size()?;
    let mut app = App::new(
        session,
        transition,
        startup::viewport(cols, rows, &settings.ui),
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris_sync::update_mpris(&mpris, app.session.state());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mpris, &control_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let d = app.session.diagnostics();
    info!(
        device_failures = d.device_failures,
        stale_events = d.stale_events,
        "session diagnostics"
    );
    // Dropping the session releases the device, which fades out and joins
    // the audio thread.
    drop(app);
    info!("gramophone stopped");

    run_result
}
