// The frame loop never touches the device directly; it hands these to the
// AudioHandle, which owns the sample bank and the single live stream.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerParams {
    pub slot: usize, // sequencer row, 0..SAMPLE_COUNT
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCommand {
    // Start the slot's sample from frame 0, cutting off whatever was playing
    Trigger(TriggerParams),
}
