// Owns everything the frame loop mutates: the sequencer data, the clock and
// the editor's cursor. Input events and clock ticks come in, audio commands
// go out, and the TUI gets a DisplayState snapshot to draw.

use crate::audio_api::{AudioCommand, TriggerParams};
use crate::pipeline::clock::StepSequencerClock;
use crate::pipeline::sequence::{PatternId, SequencerState};
use crate::shared::{DisplayState, InputEvent, SAMPLE_COUNT, STEP_COUNT};

pub struct Middle {
    pub state: SequencerState,
    clock: StepSequencerClock,
    slot_names: [String; SAMPLE_COUNT],
    cursor: (usize, usize), // (slot, step) in the edit pattern
    playlist_selection: usize,
}

impl Middle {
    pub fn new(state: SequencerState, clock: StepSequencerClock, slot_names: [String; SAMPLE_COUNT]) -> Self {
        Self {
            state,
            clock,
            slot_names,
            cursor: (0, 0),
            playlist_selection: 0,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent, now: f64) -> Vec<AudioCommand> {
        let (slot, step) = self.cursor;
        match event {
            InputEvent::CursorLeft => self.cursor.1 = (step + STEP_COUNT - 1) % STEP_COUNT,
            InputEvent::CursorRight => self.cursor.1 = (step + 1) % STEP_COUNT,
            InputEvent::CursorUp => self.cursor.0 = (slot + SAMPLE_COUNT - 1) % SAMPLE_COUNT,
            InputEvent::CursorDown => self.cursor.0 = (slot + 1) % SAMPLE_COUNT,
            InputEvent::ToggleCell => self.state.edit_grid_mut().toggle(slot, step),
            InputEvent::ClearPattern => self.state.edit_grid_mut().clear(),
            InputEvent::SelectPattern(n) => {
                if let Some(id) = PatternId::new(n as usize) {
                    self.state.edit_pattern = id;
                    self.clock.reset_position();
                }
            }

            InputEvent::AppendToPlaylist => {
                self.state.playlist.append(self.state.edit_pattern);
                self.playlist_selection = self.state.playlist.len() - 1;
            }
            InputEvent::PlaylistSelectPrev => {
                self.playlist_selection = self.playlist_selection.saturating_sub(1);
            }
            InputEvent::PlaylistSelectNext => {
                if self.playlist_selection + 1 < self.state.playlist.len() {
                    self.playlist_selection += 1;
                }
            }
            InputEvent::PlaylistMoveUp => {
                if self.playlist_selection > 0 && self.playlist_selection < self.state.playlist.len() {
                    self.state.playlist.move_up(self.playlist_selection);
                    self.playlist_selection -= 1;
                }
            }
            InputEvent::PlaylistMoveDown => {
                if self.playlist_selection + 1 < self.state.playlist.len() {
                    self.state.playlist.move_down(self.playlist_selection);
                    self.playlist_selection += 1;
                }
            }
            InputEvent::PlaylistRemove => {
                self.state.playlist.remove(self.playlist_selection);
                let len = self.state.playlist.len();
                self.playlist_selection = self.playlist_selection.min(len.saturating_sub(1));
            }

            InputEvent::TogglePlay => {
                self.clock.toggle(now);
                log::info!("transport {}", if self.clock.is_running() { "play" } else { "stop" });
            }
            InputEvent::TriggerPad(n) => {
                if (n as usize) < SAMPLE_COUNT {
                    return vec![trigger(n as usize)];
                }
            }
            InputEvent::Quit => {} // main handles this
        }
        Vec::new()
    }

    pub fn tick(&mut self, now: f64) -> Vec<AudioCommand> {
        let fired = self.clock.tick(now, &self.state);
        if !fired.is_empty() {
            if let Some((step, entry)) = self.clock.last_played() {
                log::debug!("step {} of playlist entry {}: {:?}", step, entry, fired);
            }
        }
        fired.into_iter().map(trigger).collect()
    }

    pub fn display_state(&self, voice_position: Option<(usize, usize)>) -> DisplayState {
        DisplayState {
            slot_names: self.slot_names.clone(),
            grid: *self.state.edit_grid().cells(),
            cursor: self.cursor,
            edit_pattern: self.state.edit_pattern.index() as u8,
            playing: self.clock.is_running(),
            current_step: self.clock.current_step(),
            playlist: self.state.playlist.iter().map(|id| id.index() as u8).collect(),
            playlist_selection: self.playlist_selection,
            current_playlist_index: self.clock.current_playlist_index(),
            voice_position,
        }
    }
}

fn trigger(slot: usize) -> AudioCommand {
    AudioCommand::Trigger(TriggerParams { slot })
}
