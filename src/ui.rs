//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the ring visualizer, the loading bar and the status
//! and controls lines using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    widgets::{
        Block, Borders, Gauge, Paragraph,
        canvas::{Canvas, Circle, Points},
    },
};

use crate::analyzer::SpectrumFrame;
use crate::config::UiSettings;
use crate::player::{TrackPlayer, TrackState};
use crate::visualizer;

// Virtual canvas coordinates; the ring radius is a tenth of the width,
// centered in the viewport.
const CANVAS_WIDTH: f64 = 360.0;
const CANVAS_HEIGHT: f64 = 240.0;

pub fn draw(frame: &mut Frame, player: &TrackPlayer, spectrum: &SpectrumFrame, ui: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // loading bar
            Constraint::Min(10),   // visualizer
            Constraint::Length(1), // status
            Constraint::Length(1), // controls
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], ui);
    draw_loading_bar(frame, chunks[1], player);
    draw_visualizer(frame, chunks[2], player, spectrum);
    draw_status(frame, chunks[3], player);
    if ui.show_controls {
        draw_controls(frame, chunks[4]);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, ui: &UiSettings) {
    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
    frame.render_widget(header, area);
}

/// The loading bar is the only progress feedback for an in-flight load; a
/// bar that never completes is how a failed fetch shows up.
fn draw_loading_bar(frame: &mut Frame, area: Rect, player: &TrackPlayer) {
    if !player.is_track_loading() {
        return;
    }

    let progress = f64::from(player.loading().progress).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .ratio(progress)
        .label(format!("loading {:>3.0}%", progress * 100.0))
        .gauge_style(Style::default().fg(Color::White).bg(Color::DarkGray));
    frame.render_widget(gauge, area);
}

fn draw_visualizer(frame: &mut Frame, area: Rect, player: &TrackPlayer, spectrum: &SpectrumFrame) {
    let title = format!(" {} ", player.current_track().display);
    let block = Block::default().borders(Borders::ALL).title(title);

    let radius = CANVAS_WIDTH / 10.0;
    let center = (CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, CANVAS_WIDTH])
        .y_bounds([0.0, CANVAS_HEIGHT])
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: center.0,
                y: center.1,
                radius,
                color: Color::DarkGray,
            });

            for point in visualizer::ring_points(spectrum, center, radius) {
                let (r, g, b) = point.color;
                ctx.draw(&Points {
                    coords: &[(point.x, point.y)],
                    color: Color::Rgb(r, g, b),
                });
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_status(frame: &mut Frame, area: Rect, player: &TrackPlayer) {
    let state = match player.state() {
        TrackState::Idle => "idle".to_string(),
        TrackState::Loading => "loading".to_string(),
        TrackState::Ready { playing: true } => "playing".to_string(),
        TrackState::Ready { playing: false } => "paused".to_string(),
        TrackState::Failed => match player.load_error() {
            Some(reason) => format!("load failed: {reason}"),
            None => "load failed".to_string(),
        },
    };

    let looped = if player.loop_enabled() { "  loop" } else { "" };
    let autoplay = if player.autoplay_intent() {
        "  autoplay"
    } else {
        ""
    };
    let status = format!(
        " {}/{}  [{state}]{looped}{autoplay}  art: {}",
        player.current_index() + 1,
        player.track_count(),
        player.background_image().display(),
    );

    let line = Paragraph::new(status).style(Style::default().fg(Color::Gray));
    frame.render_widget(line, area);
}

fn draw_controls(frame: &mut Frame, area: Rect) {
    let help = " [h/←] prev | [space/p] play/pause | [l/→] next | [s] stop | [r] loop | [q] quit";
    let line = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(line, area);
}
