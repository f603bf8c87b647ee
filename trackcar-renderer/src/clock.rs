use std::fmt;

/// Frame time source, so native and web builds can supply their own timer.
pub trait Clock {
    type Instant: fmt::Debug + Copy;

    fn now(&self) -> Self::Instant;
    fn seconds_elapsed(&self, start: Self::Instant, end: Self::Instant) -> f32;

    /// Seconds since `last_frame`, which is moved forward to now.
    fn tick(&self, last_frame: &mut Self::Instant) -> f32 {
        let this_frame = self.now();
        let delta_time = self.seconds_elapsed(*last_frame, this_frame);
        *last_frame = this_frame;
        delta_time
    }
}
