use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::shared::{DisplayState, STEP_COUNT};

const NAME_WIDTH: usize = 8;

// One row per slot, one cell per step. The playing step is lit green while
// running and the edit cursor is drawn reversed.
pub fn draw_pattern_grid(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let lines: Vec<Line> = state
        .grid
        .iter()
        .enumerate()
        .map(|(slot, row)| {
            let mut spans = vec![Span::raw(format!(
                "{:<width$}",
                truncate(&state.slot_names[slot], NAME_WIDTH),
                width = NAME_WIDTH + 1
            ))];
            for (step, &on) in row.iter().enumerate() {
                let mut style = if on {
                    Style::default().fg(Color::LightMagenta)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                if state.playing && step == state.current_step {
                    style = style.bg(Color::Green);
                }
                if state.cursor == (slot, step) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                let glyph = if on { "X" } else { "_" };
                spans.push(Span::styled(glyph, style));
                if step % 4 == 3 && step + 1 < STEP_COUNT {
                    spans.push(Span::raw(" ")); // beat groups
                }
            }
            Line::from(spans)
        })
        .collect();

    let title = format!(" Pattern {} ", state.edit_pattern + 1);
    frame.render_widget(Paragraph::new(lines).block(Block::bordered().title(title)), area);
}

fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}
