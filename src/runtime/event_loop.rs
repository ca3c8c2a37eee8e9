//! The frame loop: one iteration per render tick.
//!
//! Each tick drains pending backend events into the player, analyzes the
//! output tap and redraws, then handles at most one key event. Transport
//! actions map directly onto the player's operations.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::analyzer::SpectrumAnalyzer;
use crate::config::Settings;
use crate::player::TrackPlayer;
use crate::ui;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub fn run<B: Backend<Error: 'static>>(
    terminal: &mut Terminal<B>,
    settings: &Settings,
    player: &mut TrackPlayer,
    analyzer: &mut SpectrumAnalyzer,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        player.poll_events();

        let spectrum = analyzer.analyze();
        terminal.draw(|f| ui::draw(f, player, &spectrum, &settings.ui))?;

        if event::poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('h') | KeyCode::Left => player.prev_track(),
                    KeyCode::Char('l') | KeyCode::Right => player.next_track(),
                    KeyCode::Char(' ') | KeyCode::Char('p') => {
                        if player.is_track_playing() {
                            player.pause_track();
                        } else {
                            player.play_track();
                        }
                    }
                    KeyCode::Char('s') => player.stop_track(),
                    KeyCode::Char('r') => {
                        let enabled = !player.loop_enabled();
                        player.set_loop_track(enabled);
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}
