/// A decoded sample: channel-interleaved floats, read-only once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16, // provenance only, nothing reads it after decode
}

impl Waveform {
    /// Placeholder for a slot whose file could not be loaded.
    pub fn silent() -> Self {
        Self {
            samples: Vec::new(),
            sample_rate: 44100,
            channels: 1,
            bits_per_sample: 0,
        }
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The interleaved samples of one frame. A zero channel count reads as mono.
    pub fn frame(&self, index: usize) -> &[f32] {
        let ch = self.channels.max(1) as usize;
        &self.samples[index * ch..(index + 1) * ch]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_has_no_frames() {
        let w = Waveform::silent();
        assert_eq!(w.frames(), 0);
        assert!(w.is_empty());
        assert_eq!(w.channels, 1);
    }

    #[test]
    fn frames_counts_interleaved_samples() {
        let w = Waveform {
            samples: vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
            sample_rate: 48000,
            channels: 2,
            bits_per_sample: 16,
        };
        assert_eq!(w.frames(), 3);
        assert_eq!(w.frame(1), &[0.3, 0.4]);
    }

    #[test]
    fn zero_channels_reads_as_mono() {
        let w = Waveform {
            samples: vec![0.1, 0.2],
            sample_rate: 8000,
            channels: 0,
            bits_per_sample: 16,
        };
        assert_eq!(w.frames(), 2);
        assert_eq!(w.frame(1), &[0.2]);
    }
}
