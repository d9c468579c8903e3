//! Wall-clock step advancer.
//!
//! The frame loop calls [`StepSequencerClock::tick`] every frame with the
//! current time in seconds. At most one step fires per call: after a stall
//! the clock resumes from where it was instead of bursting through the
//! missed steps.

use crate::shared::{SAMPLE_COUNT, STEP_COUNT};

use super::sequence::SequencerState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    Stopped,
    Running,
}

#[derive(Clone, Debug)]
pub struct StepSequencerClock {
    step_duration: f64,
    transport: Transport,
    current_step: usize,
    current_playlist_index: usize,
    last_played: Option<(usize, usize)>, // (step, playlist index)
    last_step_time: f64,
}

impl StepSequencerClock {
    pub fn new(step_duration_secs: f64) -> Self {
        Self {
            step_duration: step_duration_secs,
            transport: Transport::Stopped,
            current_step: 0,
            current_playlist_index: 0,
            last_played: None,
            last_step_time: 0.0,
        }
    }

    pub fn play(&mut self, now: f64) {
        self.transport = Transport::Running;
        self.reset_position();
        self.last_step_time = now;
    }

    pub fn stop(&mut self) {
        self.transport = Transport::Stopped;
        self.reset_position(); // next play starts from the top
    }

    pub fn toggle(&mut self, now: f64) {
        match self.transport {
            Transport::Stopped => self.play(now),
            Transport::Running => self.stop(),
        }
    }

    pub fn reset_position(&mut self) {
        self.current_step = 0;
        self.current_playlist_index = 0;
        self.last_played = None;
    }

    pub fn is_running(&self) -> bool {
        self.transport == Transport::Running
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn current_playlist_index(&self) -> usize {
        self.current_playlist_index
    }

    /// (step, playlist index) of the most recent step that played. The
    /// current position has already moved past it.
    pub fn last_played(&self) -> Option<(usize, usize)> {
        self.last_played
    }

    /// Advance by one step if a step's worth of time has passed since the
    /// last one, returning the slots whose cell is set at the step that just
    /// played. Grid and playlist edits are picked up on the next call.
    pub fn tick(&mut self, now: f64, seq: &SequencerState) -> Vec<usize> {
        if self.transport != Transport::Running || seq.playlist.is_empty() {
            return Vec::new();
        }
        if now - self.last_step_time < self.step_duration {
            return Vec::new();
        }

        // the playlist may have shrunk under us since the last step
        if self.current_playlist_index >= seq.playlist.len() {
            self.current_playlist_index = 0;
        }
        let Some(pattern_id) = seq.playlist.get(self.current_playlist_index) else {
            return Vec::new();
        };
        let grid = seq.patterns.get(pattern_id);

        let fired: Vec<usize> = (0..SAMPLE_COUNT)
            .filter(|&slot| grid.is_set(slot, self.current_step))
            .collect();
        self.last_played = Some((self.current_step, self.current_playlist_index));

        self.current_step = (self.current_step + 1) % STEP_COUNT;
        if self.current_step == 0 {
            self.current_playlist_index = (self.current_playlist_index + 1) % seq.playlist.len();
        }
        // drift resets here rather than accumulating
        self.last_step_time = now;

        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::sequence::{PatternId, Playlist};

    // exact in binary, so k * STEP lands exactly on the boundaries
    const STEP: f64 = 0.125;

    fn id(i: usize) -> PatternId {
        PatternId::new(i).unwrap()
    }

    fn state(playlist: &[usize]) -> SequencerState {
        SequencerState::with_playlist(Playlist::from_ids(playlist.iter().map(|&i| id(i))))
    }

    fn run_steps(clock: &mut StepSequencerClock, seq: &SequencerState, start: f64, n: usize) {
        for k in 1..=n {
            clock.tick(start + k as f64 * STEP, seq);
        }
    }

    #[test]
    fn starts_stopped() {
        let clock = StepSequencerClock::new(STEP);
        assert!(!clock.is_running());
        assert_eq!(clock.current_step(), 0);
        assert_eq!(clock.current_playlist_index(), 0);
    }

    #[test]
    fn stopped_tick_does_nothing() {
        let mut seq = state(&[0]);
        seq.patterns.get_mut(id(0)).set(0, 0, true);
        let mut clock = StepSequencerClock::new(STEP);
        assert!(clock.tick(10.0, &seq).is_empty());
        assert_eq!(clock.current_step(), 0);
    }

    #[test]
    fn tick_before_step_duration_is_noop() {
        let seq = state(&[0]);
        let mut clock = StepSequencerClock::new(STEP);
        clock.play(1.0);
        clock.tick(1.0 + STEP / 2.0, &seq);
        assert_eq!(clock.current_step(), 0);
    }

    #[test]
    fn tick_fires_pre_advance_step() {
        let mut seq = state(&[0]);
        let grid = seq.patterns.get_mut(id(0));
        grid.set(0, 0, true);
        grid.set(2, 0, true);
        grid.set(1, 1, true);

        let mut clock = StepSequencerClock::new(STEP);
        clock.play(2.0);
        let fired = clock.tick(2.0 + STEP, &seq);
        assert_eq!(fired, vec![0, 2]);
        assert_eq!(clock.current_step(), 1);

        let fired = clock.tick(2.0 + 2.0 * STEP, &seq);
        assert_eq!(fired, vec![1]);
        assert_eq!(clock.current_step(), 2);
    }

    #[test]
    fn large_gap_fires_one_step_only() {
        let mut seq = state(&[0]);
        for step in 0..STEP_COUNT {
            seq.patterns.get_mut(id(0)).set(3, step, true);
        }
        let mut clock = StepSequencerClock::new(STEP);
        clock.play(0.0);
        let fired = clock.tick(100.0, &seq);
        assert_eq!(fired, vec![3]);
        assert_eq!(clock.current_step(), 1);
        // timestamp snapped to now, so the next step is a full duration away
        assert!(clock.tick(100.0 + STEP / 2.0, &seq).is_empty());
        assert_eq!(clock.current_step(), 1);
    }

    #[test]
    fn playlist_loops() {
        let seq = state(&[0, 1]);
        let mut clock = StepSequencerClock::new(STEP);
        clock.play(0.0);

        run_steps(&mut clock, &seq, 0.0, STEP_COUNT - 1);
        assert_eq!(clock.current_playlist_index(), 0);
        run_steps(&mut clock, &seq, (STEP_COUNT - 1) as f64 * STEP, 1);
        assert_eq!(clock.current_step(), 0);
        assert_eq!(clock.current_playlist_index(), 1);

        run_steps(&mut clock, &seq, STEP_COUNT as f64 * STEP, STEP_COUNT);
        assert_eq!(clock.current_playlist_index(), 0);
    }

    #[test]
    fn plays_the_pattern_the_playlist_points_at() {
        let mut seq = state(&[2, 5]);
        seq.patterns.get_mut(id(2)).set(0, 0, true);
        seq.patterns.get_mut(id(5)).set(1, 0, true);

        let mut clock = StepSequencerClock::new(STEP);
        clock.play(0.0);
        assert_eq!(clock.tick(STEP, &seq), vec![0]);
        run_steps(&mut clock, &seq, STEP, STEP_COUNT - 1);
        assert_eq!(clock.current_playlist_index(), 1);
        let now = (STEP_COUNT + 1) as f64 * STEP;
        assert_eq!(clock.tick(now, &seq), vec![1]);
    }

    #[test]
    fn empty_playlist_idles() {
        let seq = state(&[]);
        let mut clock = StepSequencerClock::new(STEP);
        clock.play(0.0);
        assert!(clock.tick(STEP, &seq).is_empty());
        assert_eq!(clock.current_step(), 0);
        assert!(clock.is_running());
    }

    #[test]
    fn edits_apply_on_next_tick() {
        let mut seq = state(&[0]);
        let mut clock = StepSequencerClock::new(STEP);
        clock.play(0.0);
        assert!(clock.tick(STEP, &seq).is_empty());
        seq.patterns.get_mut(id(0)).set(2, 1, true);
        assert_eq!(clock.tick(2.0 * STEP, &seq), vec![2]);
    }

    #[test]
    fn shrunk_playlist_wraps_index() {
        let mut seq = state(&[0, 1, 2]);
        let mut clock = StepSequencerClock::new(STEP);
        clock.play(0.0);
        run_steps(&mut clock, &seq, 0.0, 2 * STEP_COUNT);
        assert_eq!(clock.current_playlist_index(), 2);

        seq.playlist.remove(2);
        seq.playlist.remove(1);
        seq.patterns.get_mut(id(0)).set(1, 0, true);
        let now = (2 * STEP_COUNT + 1) as f64 * STEP;
        assert_eq!(clock.tick(now, &seq), vec![1]);
        assert_eq!(clock.current_playlist_index(), 0);
    }

    #[test]
    fn last_played_names_the_entry_before_the_wrap() {
        let seq = state(&[4, 6]);
        let mut clock = StepSequencerClock::new(STEP);
        clock.play(0.0);
        assert_eq!(clock.last_played(), None);

        run_steps(&mut clock, &seq, 0.0, STEP_COUNT);
        // position already points at the next entry
        assert_eq!(clock.current_playlist_index(), 1);
        assert_eq!(clock.last_played(), Some((STEP_COUNT - 1, 0)));

        clock.tick((STEP_COUNT + 1) as f64 * STEP, &seq);
        assert_eq!(clock.last_played(), Some((0, 1)));
    }

    #[test]
    fn last_played_after_shrink_is_the_rewound_entry() {
        let mut seq = state(&[0, 1]);
        let mut clock = StepSequencerClock::new(STEP);
        clock.play(0.0);
        run_steps(&mut clock, &seq, 0.0, STEP_COUNT);
        seq.playlist.remove(1);
        clock.tick((STEP_COUNT + 1) as f64 * STEP, &seq);
        assert_eq!(clock.last_played(), Some((0, 0)));
    }

    #[test]
    fn stop_resets_position() {
        let seq = state(&[0, 1]);
        let mut clock = StepSequencerClock::new(STEP);
        clock.play(0.0);
        run_steps(&mut clock, &seq, 0.0, STEP_COUNT + 3);
        assert_eq!(clock.current_step(), 3);
        assert_eq!(clock.current_playlist_index(), 1);

        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.last_played(), None);
        assert_eq!(clock.current_step(), 0);
        assert_eq!(clock.current_playlist_index(), 0);
    }

    #[test]
    fn toggle_flips_transport() {
        let mut clock = StepSequencerClock::new(STEP);
        clock.toggle(5.0);
        assert!(clock.is_running());
        clock.toggle(6.0);
        assert!(!clock.is_running());
    }
}
