// Keys, as resolved by tui/input.rs:
//
// Pattern editor:
//   arrows / h j k l   //  CursorLeft / CursorDown / CursorUp / CursorRight
//   Enter or t         //  ToggleCell (at the cursor, on the edit pattern)
//   1 .. 8             //  SelectPattern(0 .. 7)
//   Backspace          //  ClearPattern
//
// Playlist editor:
//   a                  //  AppendToPlaylist (the edit pattern)
//   [ / ]              //  PlaylistSelectPrev / PlaylistSelectNext
//   u / d              //  PlaylistMoveUp / PlaylistMoveDown (the selected entry)
//   r                  //  PlaylistRemove (the selected entry)
//
// Transport and pads:
//   Space              //  TogglePlay
//   z x c v            //  TriggerPad(0 .. 3), audition a slot right now
//
// Quit:
//   Esc / q            //  Quit
//
// Same split as always: the middle layer owns the sequencer, the TUI just
// draws whatever DisplayState it gets handed each frame.

pub const STEP_COUNT: usize = 16;
pub const SAMPLE_COUNT: usize = 4;
pub const MAX_PATTERNS: usize = 8;

pub const DEFAULT_STEP_DURATION_SECS: f64 = 0.15; // 150ms per step

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    // pattern editor
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    ToggleCell,
    SelectPattern(u8), // 0-7
    ClearPattern,

    // playlist editor
    AppendToPlaylist,
    PlaylistSelectPrev,
    PlaylistSelectNext,
    PlaylistMoveUp,
    PlaylistMoveDown,
    PlaylistRemove,

    // transport
    TogglePlay,
    TriggerPad(u8), // 0-3

    Quit,
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub slot_names: [String; SAMPLE_COUNT],
    pub grid: [[bool; STEP_COUNT]; SAMPLE_COUNT], // the edit pattern
    pub cursor: (usize, usize), // (slot, step)
    pub edit_pattern: u8,
    pub playing: bool,
    pub current_step: usize,
    pub playlist: Vec<u8>,
    pub playlist_selection: usize,
    pub current_playlist_index: usize,
    pub voice_position: Option<(usize, usize)>, // (frame, total) of the sounding sample
}
