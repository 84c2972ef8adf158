//! Frame strip sequencing and timing.
//!
//! A [`Strip`] is a named, orderable, repeatable run of image frames with
//! per-frame display durations. [`StripTimer`] is the underlying state
//! machine: it owns the traversal order, the repeat budget and the timing
//! gates, and knows nothing about images. [`SpriteAnimator`](super::sprite)
//! owns a map of strips and drives them.

use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::renderer::pixmap::Pixmap;

/// Traversal order for a strip's frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrder {
    /// `0, 1, …, n-1`
    #[default]
    Forward,
    /// `n-1, …, 1, 0`
    Backward,
    /// Forward, then back through the interior: `0…n-1, n-2…1`
    PingPong,
    /// Backward, then forward through the interior: `n-1…0, 1…n-2`
    ReversePong,
}

impl TryFrom<u8> for FrameOrder {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(FrameOrder::Forward),
            1 => Ok(FrameOrder::Backward),
            2 => Ok(FrameOrder::PingPong),
            3 => Ok(FrameOrder::ReversePong),
            other => Err(Error::InvalidArgument(format!(
                "frame order {} out of range",
                other
            ))),
        }
    }
}

impl FromStr for FrameOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "forward" => Ok(FrameOrder::Forward),
            "backward" => Ok(FrameOrder::Backward),
            "ping_pong" => Ok(FrameOrder::PingPong),
            "reverse_pong" => Ok(FrameOrder::ReversePong),
            other => Err(Error::InvalidArgument(format!(
                "unknown frame order `{}`",
                other
            ))),
        }
    }
}

/// Generate the index ordering for `num_frames` frames.
///
/// Every element is a valid frame index; the length is `num_frames` for
/// Forward/Backward and `2 * num_frames - 2` for the pong variants when
/// `num_frames > 1`.
pub fn sequence(num_frames: usize, order: FrameOrder) -> Vec<usize> {
    match order {
        FrameOrder::Forward => (0..num_frames).collect(),
        FrameOrder::Backward => (0..num_frames).rev().collect(),
        FrameOrder::PingPong => {
            let mut seq: Vec<usize> = (0..num_frames).collect();
            seq.extend((1..num_frames.saturating_sub(1)).rev());
            seq
        }
        FrameOrder::ReversePong => {
            let mut seq: Vec<usize> = (0..num_frames).rev().collect();
            seq.extend(1..num_frames.saturating_sub(1));
            seq
        }
    }
}

/// Per-frame display durations.
///
/// Durations index by raw frame index, not sequence position. A duration of
/// zero disables the timing gate for that frame: every advance steps it.
#[derive(Debug, Clone, PartialEq)]
pub enum Timing {
    /// One duration broadcast to every frame.
    Uniform(f32),
    /// One duration per raw frame index. Shorter lists are zero-padded,
    /// longer lists truncated.
    PerFrame(Vec<f32>),
}

impl Timing {
    /// No timing gates at all.
    pub fn none() -> Self {
        Timing::Uniform(0.0)
    }

    fn resolve(&self, num_frames: usize) -> Result<Vec<f32>> {
        let table = match self {
            Timing::Uniform(d) => vec![*d; num_frames],
            Timing::PerFrame(list) => {
                let mut list = list.clone();
                list.truncate(num_frames);
                list.resize(num_frames, 0.0);
                list
            }
        };
        if table.iter().any(|d| *d < 0.0) {
            return Err(Error::InvalidArgument(
                "frame durations must be non-negative".into(),
            ));
        }
        Ok(table)
    }
}

impl From<f32> for Timing {
    fn from(d: f32) -> Self {
        Timing::Uniform(d)
    }
}

impl From<Vec<f32>> for Timing {
    fn from(list: Vec<f32>) -> Self {
        Timing::PerFrame(list)
    }
}

/// Infinite repeat sentinel for [`StripTimer::new`].
pub const REPEAT_FOREVER: i32 = -1;

/// Frame timing state machine: Playing until the repeat budget is spent,
/// then Done (terminal until [`reset`](Self::reset)).
#[derive(Debug, Clone)]
pub struct StripTimer {
    num_frames: usize,
    sequence: Vec<usize>,
    /// Position within `sequence`, always in range.
    pos: usize,
    /// Per raw-frame durations.
    timing: Vec<f32>,
    /// -1 = infinite, 0 = play once, k = play k+1 times.
    repeat: i32,
    repeat_counter: i32,
    /// Time reference of the last gated advance.
    last_advance: f32,
    done: bool,
}

impl StripTimer {
    /// Create a timer for `num_frames >= 1` frames.
    ///
    /// `repeat` counts extra passes through the sequence: 0 plays once,
    /// [`REPEAT_FOREVER`] never finishes.
    pub fn new(
        num_frames: usize,
        order: FrameOrder,
        repeat: i32,
        timing: Timing,
    ) -> Result<Self> {
        if num_frames == 0 {
            return Err(Error::InvalidArgument("num_frames must be >= 1".into()));
        }
        if repeat < REPEAT_FOREVER {
            return Err(Error::InvalidArgument("repeat must be >= -1".into()));
        }
        Ok(Self {
            num_frames,
            sequence: sequence(num_frames, order),
            pos: 0,
            timing: timing.resolve(num_frames)?,
            repeat,
            repeat_counter: 0,
            last_advance: 0.0,
            done: false,
        })
    }

    /// Advance the timer at time `t` and return the raw frame index to
    /// display.
    ///
    /// `t` is the caller's clock, in whatever unit the frame durations use;
    /// only differences against the last gated advance matter. If the
    /// current frame's duration has not yet elapsed the frame is returned
    /// unchanged. When the sequence runs out the timer either wraps (repeat
    /// budget remaining) or enters Done, clamped on the last frame.
    pub fn advance(&mut self, t: f32) -> usize {
        let raw = self.sequence[self.pos];
        if self.done {
            return raw;
        }

        let gate = self.timing[raw];
        if gate > 0.0 {
            if t - self.last_advance < gate {
                return raw;
            }
            self.last_advance = t;
        }

        self.pos += 1;
        if self.pos >= self.sequence.len() {
            if self.repeat == 0 || (self.repeat != REPEAT_FOREVER && self.repeat_counter >= self.repeat)
            {
                self.done = true;
                self.pos = self.sequence.len() - 1;
            } else {
                self.repeat_counter += 1;
                self.pos = 0;
            }
        }

        raw
    }

    /// Raw frame index currently displayed.
    pub fn current_frame(&self) -> usize {
        self.sequence[self.pos]
    }

    /// Whether the repeat budget is exhausted.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The repeat budget: [`REPEAT_FOREVER`], or the number of extra passes.
    pub fn repeat(&self) -> i32 {
        self.repeat
    }

    /// Number of frames this timer sequences.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// The generated index ordering.
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Return to frame 0 with a cleared repeat counter, done flag and timing
    /// reference.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.repeat_counter = 0;
        self.done = false;
        self.last_advance = 0.0;
    }

    /// Regenerate the sequence in a new order. Restarts from position 0 so
    /// the position stays valid across differing sequence lengths.
    pub fn set_order(&mut self, order: FrameOrder) {
        self.sequence = sequence(self.num_frames, order);
        self.pos = 0;
    }

    /// Replace the whole timing table and reset the timing reference.
    pub fn set_timing(&mut self, timing: Timing) -> Result<()> {
        self.timing = timing.resolve(self.num_frames)?;
        self.last_advance = 0.0;
        Ok(())
    }

    /// Patch a single raw frame's duration and reset the timing reference.
    pub fn set_frame_timing(&mut self, frame: usize, duration: f32) -> Result<()> {
        if frame >= self.num_frames {
            return Err(Error::InvalidArgument(format!(
                "frame {} out of range for {} frames",
                frame, self.num_frames
            )));
        }
        if duration < 0.0 {
            return Err(Error::InvalidArgument(
                "frame durations must be non-negative".into(),
            ));
        }
        self.timing[frame] = duration;
        self.last_advance = 0.0;
        Ok(())
    }
}

/// A [`StripTimer`] plus the image frames it sequences.
#[derive(Debug, Clone)]
pub struct Strip {
    timer: StripTimer,
    frames: Vec<Rc<Pixmap>>,
}

impl Strip {
    /// Create a strip from at least one frame. All frames must share the
    /// same pixel dimensions.
    pub fn new(
        frames: Vec<Rc<Pixmap>>,
        order: FrameOrder,
        repeat: i32,
        timing: Timing,
    ) -> Result<Self> {
        let first = frames
            .first()
            .ok_or_else(|| Error::InvalidArgument("strip needs at least one frame".into()))?;
        let size = first.size();
        if frames.iter().any(|f| f.size() != size) {
            return Err(Error::InvalidArgument(
                "strip frames must share the same dimensions".into(),
            ));
        }
        Ok(Self {
            timer: StripTimer::new(frames.len(), order, repeat, timing)?,
            frames,
        })
    }

    /// Advance at time `t` and return the frame image to display.
    pub fn advance(&mut self, t: f32) -> &Rc<Pixmap> {
        let raw = self.timer.advance(t);
        &self.frames[raw]
    }

    /// Image for the currently displayed frame, without advancing.
    pub fn current_image(&self) -> &Rc<Pixmap> {
        &self.frames[self.timer.current_frame()]
    }

    /// Common pixel dimensions of every frame.
    pub fn frame_size(&self) -> (u32, u32) {
        self.frames[0].size()
    }

    pub fn is_done(&self) -> bool {
        self.timer.is_done()
    }

    pub fn reset(&mut self) {
        self.timer.reset();
    }

    /// The underlying timing state machine.
    pub fn timer(&self) -> &StripTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut StripTimer {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_values() {
        assert_eq!(sequence(4, FrameOrder::Forward), vec![0, 1, 2, 3]);
        assert_eq!(sequence(4, FrameOrder::Backward), vec![3, 2, 1, 0]);
        assert_eq!(sequence(4, FrameOrder::PingPong), vec![0, 1, 2, 3, 2, 1]);
        assert_eq!(sequence(4, FrameOrder::ReversePong), vec![3, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn sequence_lengths_and_coverage() {
        for n in 1..8 {
            for order in [
                FrameOrder::Forward,
                FrameOrder::Backward,
                FrameOrder::PingPong,
                FrameOrder::ReversePong,
            ] {
                let seq = sequence(n, order);
                let expected_len = match order {
                    FrameOrder::Forward | FrameOrder::Backward => n,
                    _ => {
                        if n > 1 {
                            2 * n - 2
                        } else {
                            1
                        }
                    }
                };
                assert_eq!(seq.len(), expected_len, "n={} order={:?}", n, order);
                let mut values: Vec<usize> = seq.clone();
                values.sort_unstable();
                values.dedup();
                assert_eq!(values, (0..n).collect::<Vec<_>>(), "n={} order={:?}", n, order);
            }
        }
    }

    #[test]
    fn degenerate_pong_sequences() {
        assert_eq!(sequence(1, FrameOrder::PingPong), vec![0]);
        assert_eq!(sequence(2, FrameOrder::PingPong), vec![0, 1]);
        assert_eq!(sequence(2, FrameOrder::ReversePong), vec![1, 0]);
    }

    #[test]
    fn zero_frames_rejected() {
        assert!(StripTimer::new(0, FrameOrder::Forward, 0, Timing::none()).is_err());
    }

    #[test]
    fn bad_repeat_rejected() {
        assert!(StripTimer::new(3, FrameOrder::Forward, -2, Timing::none()).is_err());
    }

    #[test]
    fn order_from_raw_value() {
        assert_eq!(FrameOrder::try_from(2).unwrap(), FrameOrder::PingPong);
        assert!(FrameOrder::try_from(4).is_err());
    }

    fn drain(timer: &mut StripTimer) -> Vec<usize> {
        let mut frames = Vec::new();
        while !timer.is_done() {
            frames.push(timer.advance(0.0));
        }
        frames
    }

    #[test]
    fn repeat_budget_plays_sequence_repeat_plus_one_times() {
        for order in [FrameOrder::Forward, FrameOrder::Backward, FrameOrder::PingPong] {
            let mut timer = StripTimer::new(4, order, 1, Timing::none()).unwrap();
            let frames = drain(&mut timer);
            let mut expected = sequence(4, order);
            expected.extend(sequence(4, order));
            assert_eq!(frames, expected, "order={:?}", order);
        }
    }

    #[test]
    fn done_exactly_on_final_advance() {
        let repeat = 2;
        let mut timer = StripTimer::new(3, FrameOrder::Forward, repeat, Timing::none()).unwrap();
        let total = timer.sequence().len() * (repeat as usize + 1);
        for i in 0..total {
            assert!(!timer.is_done(), "done too early at call {}", i);
            timer.advance(0.0);
        }
        assert!(timer.is_done());
    }

    #[test]
    fn done_clamps_to_last_frame_and_is_terminal() {
        let mut timer = StripTimer::new(3, FrameOrder::Forward, 0, Timing::none()).unwrap();
        drain(&mut timer);
        assert_eq!(timer.current_frame(), 2);
        // Further advances return the clamped frame without mutating.
        assert_eq!(timer.advance(100.0), 2);
        assert!(timer.is_done());
    }

    #[test]
    fn infinite_repeat_wraps_forever() {
        let mut timer =
            StripTimer::new(3, FrameOrder::Forward, REPEAT_FOREVER, Timing::none()).unwrap();
        for _ in 0..10 {
            for expected in [0, 1, 2] {
                assert_eq!(timer.advance(0.0), expected);
            }
        }
        assert!(!timer.is_done());
    }

    #[test]
    fn timing_gate_holds_frame_until_elapsed() {
        let mut timer =
            StripTimer::new(3, FrameOrder::Forward, REPEAT_FOREVER, Timing::Uniform(2.0)).unwrap();
        // t=0 is within the gate of the initial reference: frame holds.
        assert_eq!(timer.advance(0.0), 0);
        assert_eq!(timer.current_frame(), 0);
        assert_eq!(timer.advance(1.9), 0);
        assert_eq!(timer.current_frame(), 0);
        assert_eq!(timer.advance(2.0), 0);
        assert_eq!(timer.current_frame(), 1);
        assert_eq!(timer.advance(3.0), 1);
        assert_eq!(timer.current_frame(), 1);
        assert_eq!(timer.advance(4.5), 1);
        assert_eq!(timer.current_frame(), 2);
    }

    #[test]
    fn per_frame_timing_padded_and_truncated() {
        let timer = StripTimer::new(
            3,
            FrameOrder::Forward,
            0,
            Timing::PerFrame(vec![1.0]),
        )
        .unwrap();
        assert_eq!(timer.timing, vec![1.0, 0.0, 0.0]);

        let timer = StripTimer::new(
            2,
            FrameOrder::Forward,
            0,
            Timing::PerFrame(vec![1.0, 2.0, 3.0]),
        )
        .unwrap();
        assert_eq!(timer.timing, vec![1.0, 2.0]);
    }

    #[test]
    fn negative_timing_rejected() {
        assert!(StripTimer::new(2, FrameOrder::Forward, 0, Timing::Uniform(-1.0)).is_err());
        let mut timer = StripTimer::new(2, FrameOrder::Forward, 0, Timing::none()).unwrap();
        assert!(timer.set_frame_timing(0, -0.5).is_err());
        assert!(timer.set_frame_timing(5, 0.5).is_err());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut timer = StripTimer::new(4, FrameOrder::Forward, 0, Timing::none()).unwrap();
        drain(&mut timer);
        assert!(timer.is_done());
        timer.reset();
        assert!(!timer.is_done());
        assert_eq!(timer.current_frame(), 0);
    }

    #[test]
    fn set_order_regenerates_sequence() {
        let mut timer = StripTimer::new(4, FrameOrder::Forward, 0, Timing::none()).unwrap();
        timer.set_order(FrameOrder::ReversePong);
        assert_eq!(timer.sequence(), &[3, 2, 1, 0, 1, 2]);
        assert_eq!(timer.current_frame(), 3);
    }

    mod strip {
        use super::*;
        use crate::renderer::pixmap::{Pixmap, Rgba8};

        fn frames(n: usize) -> Vec<Rc<Pixmap>> {
            (0..n)
                .map(|i| Rc::new(Pixmap::solid(2, 2, Rgba8::opaque(i as u8, 0, 0))))
                .collect()
        }

        #[test]
        fn advance_returns_frame_images_in_order() {
            let mut strip =
                Strip::new(frames(3), FrameOrder::Forward, 0, Timing::none()).unwrap();
            let seen: Vec<u8> = (0..3)
                .map(|_| strip.advance(0.0).pixel(0, 0).unwrap().r)
                .collect();
            assert_eq!(seen, vec![0, 1, 2]);
            assert!(strip.is_done());
        }

        #[test]
        fn empty_strip_rejected() {
            assert!(Strip::new(Vec::new(), FrameOrder::Forward, 0, Timing::none()).is_err());
        }

        #[test]
        fn mismatched_frame_sizes_rejected() {
            let mixed = vec![
                Rc::new(Pixmap::new(2, 2)),
                Rc::new(Pixmap::new(3, 2)),
            ];
            assert!(Strip::new(mixed, FrameOrder::Forward, 0, Timing::none()).is_err());
        }
    }
}
