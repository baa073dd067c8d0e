use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::generate;
use crate::mpris::ControlCmd;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;
mod workers;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    settings::init_logging(&settings.logging);
    log::info!("starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let (audio_player, audio_rx) = AudioPlayer::new(settings.audio.clone());
    let mut app = App::new(audio_player, settings.ui.mood_presets.clone());
    app.follow_playback = settings.ui.follow_playback;

    let (work_tx, work_rx) = mpsc::channel::<workers::WorkEvent>();
    let generator = Arc::from(generate::from_settings(&settings.generator));
    let workers = workers::Workers::new(work_tx, generator, settings.library.clone());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    mpris_sync::update_mpris(&mpris, &app);

    let initial = startup::paths_from_args(std::env::args().skip(1));
    if startup::queue_initial_upload(initial, &workers) {
        app.status = Some("Reading files...".to_string());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &workers,
        &mpris,
        event_loop::Inbox {
            audio: &audio_rx,
            work: &work_rx,
            control: &control_rx,
        },
        &mut state,
    );

    app.player()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("bye");
    run_result
}
