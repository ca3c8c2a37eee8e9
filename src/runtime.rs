use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::analyzer::{self, SpectrumAnalyzer};
use crate::player::{AudioBackend, TrackPlayer};
use crate::playlist::Playlist;

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    // CLI argument overrides the configured playlist path.
    let playlist_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.playlist.path.clone());

    let playlist = Playlist::load(&playlist_path, &settings.playlist.asset_dir)?;

    let tap = analyzer::new_tap();
    let (backend, events_rx) = AudioBackend::start(tap.clone());

    let mut player = TrackPlayer::new(playlist.tracks, backend.command_sender(), events_rx)?;
    player.initialize();

    let mut spectrum_analyzer = SpectrumAnalyzer::new(tap, &settings.visualizer);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut player, &mut spectrum_analyzer);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    backend.shutdown();

    run_result
}
