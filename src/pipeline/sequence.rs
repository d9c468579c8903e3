// The editable side of the sequencer: a fixed pool of pattern grids and the
// playlist that chains them. The clock only ever reads this; the editor
// writes it directly between frames.

use crate::shared::{MAX_PATTERNS, SAMPLE_COUNT, STEP_COUNT};

// Index into the pattern pool. Only constructible in range, so a playlist
// entry always names a real pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PatternId(u8);

impl PatternId {
    pub fn new(index: usize) -> Option<Self> {
        (index < MAX_PATTERNS).then_some(Self(index as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// On/off triggers for every slot across every step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternGrid {
    cells: [[bool; STEP_COUNT]; SAMPLE_COUNT],
}

impl PatternGrid {
    pub fn is_set(&self, slot: usize, step: usize) -> bool {
        self.cells
            .get(slot)
            .and_then(|row| row.get(step))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, slot: usize, step: usize, on: bool) {
        if let Some(cell) = self.cells.get_mut(slot).and_then(|row| row.get_mut(step)) {
            *cell = on;
        }
    }

    pub fn toggle(&mut self, slot: usize, step: usize) {
        let on = self.is_set(slot, step);
        self.set(slot, step, !on);
    }

    pub fn clear(&mut self) {
        self.cells = [[false; STEP_COUNT]; SAMPLE_COUNT];
    }

    pub fn cells(&self) -> &[[bool; STEP_COUNT]; SAMPLE_COUNT] {
        &self.cells
    }
}

#[derive(Clone, Debug, Default)]
pub struct PatternBank {
    patterns: [PatternGrid; MAX_PATTERNS],
}

impl PatternBank {
    pub fn get(&self, id: PatternId) -> &PatternGrid {
        &self.patterns[id.index()]
    }

    pub fn get_mut(&mut self, id: PatternId) -> &mut PatternGrid {
        &mut self.patterns[id.index()]
    }
}

/// Play order of patterns. Repeats are fine; out-of-range edits are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Playlist {
    entries: Vec<PatternId>,
}

impl Playlist {
    pub fn from_ids(ids: impl IntoIterator<Item = PatternId>) -> Self {
        Self {
            entries: ids.into_iter().collect(),
        }
    }

    pub fn append(&mut self, id: PatternId) {
        self.entries.push(id);
    }

    pub fn move_up(&mut self, index: usize) {
        if index > 0 && index < self.entries.len() {
            self.entries.swap(index, index - 1);
        }
    }

    pub fn move_down(&mut self, index: usize) {
        if index + 1 < self.entries.len() {
            self.entries.swap(index, index + 1);
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<PatternId> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<PatternId> {
        self.entries.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PatternId> + '_ {
        self.entries.iter().copied()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SequencerState {
    pub patterns: PatternBank,
    pub playlist: Playlist,
    pub edit_pattern: PatternId, // what the editor is showing
}

impl SequencerState {
    pub fn with_playlist(playlist: Playlist) -> Self {
        Self {
            playlist,
            ..Self::default()
        }
    }

    pub fn edit_grid(&self) -> &PatternGrid {
        self.patterns.get(self.edit_pattern)
    }

    pub fn edit_grid_mut(&mut self) -> &mut PatternGrid {
        self.patterns.get_mut(self.edit_pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: usize) -> PatternId {
        PatternId::new(i).unwrap()
    }

    #[test]
    fn pattern_id_bounded() {
        assert!(PatternId::new(0).is_some());
        assert!(PatternId::new(MAX_PATTERNS - 1).is_some());
        assert!(PatternId::new(MAX_PATTERNS).is_none());
    }

    #[test]
    fn grid_toggle_and_clear() {
        let mut g = PatternGrid::default();
        g.toggle(2, 5);
        assert!(g.is_set(2, 5));
        g.toggle(2, 5);
        assert!(!g.is_set(2, 5));
        g.set(0, 0, true);
        g.set(3, 15, true);
        g.clear();
        assert_eq!(g, PatternGrid::default());
    }

    #[test]
    fn grid_ignores_out_of_range() {
        let mut g = PatternGrid::default();
        g.set(SAMPLE_COUNT, 0, true);
        g.set(0, STEP_COUNT, true);
        g.toggle(99, 99);
        assert_eq!(g, PatternGrid::default());
        assert!(!g.is_set(SAMPLE_COUNT, STEP_COUNT));
    }

    #[test]
    fn bank_patterns_are_independent() {
        let mut bank = PatternBank::default();
        bank.get_mut(id(1)).set(0, 3, true);
        assert!(bank.get(id(1)).is_set(0, 3));
        assert!(!bank.get(id(0)).is_set(0, 3));
    }

    #[test]
    fn playlist_allows_repeats() {
        let mut p = Playlist::default();
        p.append(id(0));
        p.append(id(0));
        p.append(id(3));
        assert_eq!(p.iter().collect::<Vec<_>>(), vec![id(0), id(0), id(3)]);
    }

    #[test]
    fn playlist_reorder() {
        let mut p = Playlist::from_ids([id(0), id(1), id(2)]);
        p.move_up(2);
        assert_eq!(p.iter().collect::<Vec<_>>(), vec![id(0), id(2), id(1)]);
        p.move_down(0);
        assert_eq!(p.iter().collect::<Vec<_>>(), vec![id(2), id(0), id(1)]);
        // ends don't wrap
        p.move_up(0);
        p.move_down(2);
        p.move_down(10);
        assert_eq!(p.iter().collect::<Vec<_>>(), vec![id(2), id(0), id(1)]);
    }

    #[test]
    fn playlist_remove() {
        let mut p = Playlist::from_ids([id(4), id(5)]);
        assert_eq!(p.remove(5), None);
        assert_eq!(p.remove(0), Some(id(4)));
        assert_eq!(p.len(), 1);
        assert_eq!(p.get(0), Some(id(5)));
        assert_eq!(p.remove(0), Some(id(5)));
        assert!(p.is_empty());
    }

    #[test]
    fn edit_grid_follows_edit_pattern() {
        let mut s = SequencerState::default();
        s.edit_pattern = id(6);
        s.edit_grid_mut().set(1, 1, true);
        assert!(s.patterns.get(id(6)).is_set(1, 1));
        assert!(s.edit_grid().is_set(1, 1));
    }
}
