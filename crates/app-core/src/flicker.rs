//! Periodic on/off machine that blacks out the hero light for a bounded
//! number of frames whenever the whole second hits the occurrence period.

use crate::constants::{FLICKER_OFF_FRAMES, FLICKER_PERIOD_SEC};

/// Per-frame outputs of [`FlickerState::advance`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FlickerFrame {
    /// The hero light is out and the stalker is alpha-discarded this frame.
    pub light_off: bool,
    /// Raised on the frame the off counter reaches its duration; consumers
    /// apply the one-frame teleport jitter to the stalker's render transform.
    pub scramble: bool,
}

#[derive(Clone, Debug)]
pub struct FlickerState {
    off_frames: u32,
    pub occurrence_period_sec: u32,
    pub off_duration_frames: u32,
}

impl FlickerState {
    pub fn new(occurrence_period_sec: u32, off_duration_frames: u32) -> Self {
        Self {
            off_frames: 0,
            occurrence_period_sec,
            off_duration_frames,
        }
    }

    /// Step the machine for a frame at `time_sec` seconds since startup.
    ///
    /// The off condition holds while `floor(time) mod period == 0`. While it
    /// holds the light stays out for at most `off_duration_frames` in a row;
    /// on any frame where it does not hold the counter resets to zero.
    pub fn advance(&mut self, time_sec: f64) -> FlickerFrame {
        let period = self.occurrence_period_sec.max(1) as i64;
        let in_window = (time_sec.floor() as i64).rem_euclid(period) == 0;
        let light_off = in_window && self.off_frames < self.off_duration_frames;
        if light_off {
            self.off_frames += 1;
        } else {
            self.off_frames = 0;
        }
        FlickerFrame {
            light_off,
            scramble: light_off && self.off_frames == self.off_duration_frames,
        }
    }

    /// Frames spent in the current off burst. Always in `[0, duration]`.
    pub fn off_frames(&self) -> u32 {
        self.off_frames
    }
}

impl Default for FlickerState {
    fn default() -> Self {
        Self::new(FLICKER_PERIOD_SEC, FLICKER_OFF_FRAMES)
    }
}
