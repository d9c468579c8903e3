use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::shared::{DisplayState, MAX_PATTERNS, SAMPLE_COUNT, STEP_COUNT};

use super::grid::draw_pattern_grid;

const HELP: &str = "space play/stop  arrows/hjkl move  enter/t toggle  1-8 pattern  \
                    a append  [ ] select  u/d move  r remove  zxcv pads  esc quit";

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                        // transport
            Constraint::Length(SAMPLE_COUNT as u16 + 2), // pattern editor
            Constraint::Length(3),                        // pattern selector
            Constraint::Min(4),                           // playlist
            Constraint::Length(1),                        // key help
        ])
        .split(area);

    draw_transport(frame, sections[0], state);
    draw_pattern_grid(frame, sections[1], state);
    draw_pattern_selector(frame, sections[2], state);
    draw_playlist(frame, sections[3], state);
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        sections[4],
    );
}

fn draw_transport(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let (label, color) = if state.playing {
        ("PLAY", Color::Green)
    } else {
        ("STOP", Color::Red)
    };
    let mut spans = vec![
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  Step: {} / {}", state.current_step + 1, STEP_COUNT)),
        Span::raw(format!("  Playlist: {}", playlist_position(state))),
    ];
    if let Some((pos, total)) = state.voice_position {
        spans.push(Span::raw(format!("  Voice: {pos}/{total}")));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::bordered().title(" Transport ")),
        area,
    );
}

fn playlist_position(state: &DisplayState) -> String {
    if state.playlist.is_empty() {
        return "-".to_string();
    }
    format!("{} / {}", state.current_playlist_index + 1, state.playlist.len())
}

fn draw_pattern_selector(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let spans: Vec<Span> = (0..MAX_PATTERNS)
        .map(|p| {
            let style = if p == state.edit_pattern as usize {
                Style::default().fg(Color::Black).bg(Color::LightMagenta)
            } else {
                Style::default()
            };
            Span::styled(format!(" {} ", p + 1), style)
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::bordered().title(" Patterns ")),
        area,
    );
}

fn draw_playlist(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let lines: Vec<Line> = if state.playlist.is_empty() {
        vec![Line::from(Span::styled(
            "(empty, press a to append the edit pattern)",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state
            .playlist
            .iter()
            .enumerate()
            .map(|(i, &pattern)| {
                let marker = if state.playing && i == state.current_playlist_index { ">" } else { " " };
                let mut style = Style::default();
                if i == state.playlist_selection {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(format!("{marker} {:>2}. pattern {}", i + 1, pattern + 1), style))
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(Block::bordered().title(" Playlist ")), area);
}
