//! Playback state machine and frame cursor.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Observable playback phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Never started, stopped, or finished
    Idle,
    /// A render loop is iterating
    Running,
    /// Was running and got suspended without being stopped
    Paused,
}

/// Outcome of a start request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StartDecision {
    /// A render loop is already alive; nothing to do
    AlreadyRunning,
    /// The surface is not ready; intent recorded for later
    Deferred,
    /// The caller now owns the running slot and must spawn a loop
    Spawn,
}

/// What the render loop should draw next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Draw the frame at this index
    Draw(usize),
    /// The loop is over; the cursor has been settled and the running slot
    /// released
    Finished,
}

/// Result of advancing the cursor after a frame was drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Advance {
    /// The cursor wrapped back to zero
    pub repeated: bool,
    /// How long to wait before the next frame
    pub delay: Duration,
}

#[derive(Clone, Debug)]
struct Flags {
    /// User intent to be playing
    requested: bool,
    paused: bool,
    /// Start automatically once the surface is ready
    auto_start: bool,
    /// Owned by the render loop; claimed on spawn
    running: bool,
    surface_ready: bool,
    /// Restart requested while a loop owned the cursor
    rewind: bool,
    index: usize,
    looping: bool,
    duration_ms: u64,
}

/// Thread-safe playback state shared by the UI side and the render loop.
///
/// Every transition happens under one lock, and no lock is ever held while a
/// frame is drawn or while the loop sleeps. The UI side only records intent;
/// the cursor belongs to the render loop while it runs.
#[derive(Debug)]
pub struct PlaybackState {
    flags: Mutex<Flags>,
}

impl PlaybackState {
    /// Create a new state with the given frame duration and loop setting.
    pub fn new(duration_ms: u64, looping: bool) -> Self {
        Self {
            flags: Mutex::new(Flags {
                requested: false,
                paused: false,
                auto_start: false,
                running: false,
                surface_ready: false,
                rewind: false,
                index: 0,
                looping,
                duration_ms: duration_ms.max(1),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the per-frame duration and loop mode.
    pub fn configure(&self, duration_ms: u64, looping: bool) {
        let mut flags = self.lock();
        flags.duration_ms = duration_ms.max(1);
        flags.looping = looping;
    }

    /// Get the per-frame duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.lock().duration_ms
    }

    pub fn is_looping(&self) -> bool {
        self.lock().looping
    }

    pub fn set_auto_start(&self, auto_start: bool) {
        self.lock().auto_start = auto_start;
    }

    pub fn auto_start(&self) -> bool {
        self.lock().auto_start
    }

    /// Get the current frame index.
    pub fn index(&self) -> usize {
        self.lock().index
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    pub fn is_surface_ready(&self) -> bool {
        self.lock().surface_ready
    }

    /// Get the current playback phase.
    pub fn phase(&self) -> PlaybackPhase {
        let flags = self.lock();
        if flags.running {
            PlaybackPhase::Running
        } else if flags.paused {
            PlaybackPhase::Paused
        } else {
            PlaybackPhase::Idle
        }
    }

    /// Record the intent to play and decide whether a loop must be spawned.
    pub(crate) fn request_start(&self) -> StartDecision {
        let mut flags = self.lock();
        flags.requested = true;
        if flags.running {
            // A loop that has not yet seen the pause keeps going
            flags.paused = false;
            return StartDecision::AlreadyRunning;
        }
        if !flags.surface_ready {
            return StartDecision::Deferred;
        }
        flags.running = true;
        flags.paused = false;
        StartDecision::Spawn
    }

    /// Give back a running slot claimed by `request_start` when no loop
    /// could be spawned.
    pub(crate) fn abandon_start(&self) {
        let mut flags = self.lock();
        flags.running = false;
        flags.requested = false;
    }

    /// Clear every playback intent.
    ///
    /// Returns true if a render loop was alive and needs waking.
    pub(crate) fn stop(&self) -> bool {
        let mut flags = self.lock();
        flags.requested = false;
        flags.paused = false;
        flags.auto_start = false;
        flags.running
    }

    /// Suspend playback, remembering that it was running.
    ///
    /// Returns true if a render loop was alive and needs waking.
    pub(crate) fn pause(&self) -> bool {
        let mut flags = self.lock();
        flags.paused = flags.paused || flags.running;
        flags.requested = false;
        flags.auto_start = false;
        flags.running
    }

    /// Move the cursor back to the first frame.
    ///
    /// While a loop owns the cursor the rewind is handed to it instead.
    pub(crate) fn rewind(&self) {
        let mut flags = self.lock();
        if flags.running {
            flags.rewind = true;
        } else {
            flags.index = 0;
        }
    }

    /// Jump to a fractional position. Ignored while a loop is running and
    /// when there are no frames.
    ///
    /// Returns the new index, or None if the cursor was left alone.
    pub(crate) fn seek(&self, progress: f32, frame_count: usize) -> Option<usize> {
        let mut flags = self.lock();
        if flags.running || frame_count == 0 {
            return None;
        }
        flags.index = progress_index(frame_count, progress);
        Some(flags.index)
    }

    /// Mark the surface ready.
    ///
    /// Returns true if playback should (re)start now.
    pub(crate) fn surface_ready(&self) -> bool {
        let mut flags = self.lock();
        flags.surface_ready = true;
        flags.requested || flags.paused || flags.auto_start
    }

    /// Mark the surface gone; behaves like `pause`.
    ///
    /// Returns true if a render loop was alive and needs waking.
    pub(crate) fn surface_destroyed(&self) -> bool {
        let mut flags = self.lock();
        flags.paused = flags.paused || flags.running;
        flags.requested = false;
        flags.auto_start = false;
        flags.surface_ready = false;
        flags.running
    }

    /// Render loop: whether an interrupted frame wait should carry on.
    pub(crate) fn keeps_playing(&self) -> bool {
        let flags = self.lock();
        flags.requested && flags.surface_ready
    }

    /// Render loop: decide what to draw next, or finish.
    ///
    /// Finishing settles the cursor and releases the running slot in the same
    /// critical section, so a concurrent `request_start` either sees the loop
    /// still alive (and the loop then sees its intent) or sees it gone.
    pub(crate) fn next_step(&self, frame_count: usize) -> Step {
        let mut flags = self.lock();
        if flags.rewind {
            flags.rewind = false;
            flags.index = 0;
        }
        if flags.requested && flags.surface_ready && flags.index < frame_count {
            return Step::Draw(flags.index);
        }
        flags.index = settle_index(flags.index, frame_count);
        flags.running = false;
        Step::Finished
    }

    /// Render loop: move past the frame just drawn.
    pub(crate) fn advance(&self, frame_count: usize) -> Advance {
        let mut flags = self.lock();
        flags.index += 1;
        let repeated = flags.looping && flags.index == frame_count;
        if repeated {
            flags.index = 0;
        }
        Advance {
            repeated,
            delay: Duration::from_millis(flags.duration_ms),
        }
    }
}

/// Map a fractional progress to a frame index.
///
/// `progress` is clamped to `[0, 1]`; NaN counts as zero. An empty sequence
/// always maps to index 0.
pub fn progress_index(frame_count: usize, progress: f32) -> usize {
    if frame_count == 0 {
        return 0;
    }
    let offset = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let last = (frame_count - 1) as f32;
    ((last * offset).round() as usize).min(frame_count - 1)
}

/// Normalize the cursor when a render loop exits.
///
/// A finished sequence starts over; an interrupted one steps back one frame
/// so that resuming redraws the last frame shown instead of skipping it.
pub fn settle_index(index: usize, frame_count: usize) -> usize {
    let index = if index >= frame_count { 0 } else { index };
    index.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ready_state() -> PlaybackState {
        let state = PlaybackState::new(100, false);
        assert!(!state.surface_ready());
        state
    }

    #[test]
    fn test_start_deferred_until_surface_ready() {
        let state = PlaybackState::new(100, false);
        assert_eq!(state.request_start(), StartDecision::Deferred);
        assert_eq!(state.phase(), PlaybackPhase::Idle);

        // The recorded intent makes the surface transition start playback
        assert!(state.surface_ready());
        assert_eq!(state.request_start(), StartDecision::Spawn);
        assert_eq!(state.phase(), PlaybackPhase::Running);
        assert_eq!(state.request_start(), StartDecision::AlreadyRunning);
    }

    #[test]
    fn test_loop_walks_and_finishes() {
        let state = ready_state();
        assert_eq!(state.request_start(), StartDecision::Spawn);

        for expected in 0..3 {
            assert_eq!(state.next_step(3), Step::Draw(expected));
            assert!(!state.advance(3).repeated);
        }
        assert_eq!(state.next_step(3), Step::Finished);
        assert!(!state.is_running());
        // A completed sequence starts over
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn test_looping_wraps_and_repeats() {
        let state = PlaybackState::new(10, true);
        state.surface_ready();
        state.request_start();

        let mut seen = Vec::new();
        let mut repeats = 0;
        for _ in 0..7 {
            match state.next_step(3) {
                Step::Draw(index) => seen.push(index),
                Step::Finished => panic!("looping playback finished"),
            }
            if state.advance(3).repeated {
                repeats += 1;
            }
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(repeats, 2);
    }

    #[test]
    fn test_pause_steps_back_one_frame() {
        let state = ready_state();
        state.request_start();
        for _ in 0..3 {
            state.next_step(10);
            state.advance(10);
        }
        // Cursor now points at frame 3; frame 2 was the last one drawn
        assert!(state.pause());
        assert_eq!(state.next_step(10), Step::Finished);
        assert_eq!(state.index(), 2);
        assert_eq!(state.phase(), PlaybackPhase::Paused);

        // Resuming clears the paused flag
        assert_eq!(state.request_start(), StartDecision::Spawn);
        assert_eq!(state.next_step(10), Step::Draw(2));
    }

    #[test]
    fn test_pause_twice_stays_paused() {
        let state = ready_state();
        state.request_start();
        assert!(state.pause());
        assert_eq!(state.next_step(5), Step::Finished);
        assert!(!state.pause());
        assert_eq!(state.phase(), PlaybackPhase::Paused);
        // Pausing while idle does not invent a paused session
        assert!(!state.stop());
        assert!(!state.pause());
        assert_eq!(state.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let state = ready_state();
        assert!(!state.stop());
        assert!(!state.stop());
        assert_eq!(state.phase(), PlaybackPhase::Idle);
        assert!(!state.surface_ready());
    }

    #[test]
    fn test_rewind_while_running_is_deferred_to_loop() {
        let state = ready_state();
        state.request_start();
        state.next_step(5);
        state.advance(5);
        state.next_step(5);
        state.advance(5);

        state.rewind();
        assert_eq!(state.index(), 2);
        assert_eq!(state.next_step(5), Step::Draw(0));
    }

    #[test]
    fn test_seek_rejected_while_running() {
        let state = ready_state();
        assert_eq!(state.seek(0.5, 5), Some(2));
        state.request_start();
        assert_eq!(state.seek(1.0, 5), None);
        assert_eq!(state.index(), 2);
    }

    #[test]
    fn test_seek_without_frames_keeps_cursor() {
        let state = ready_state();
        assert_eq!(state.seek(1.0, 5), Some(4));
        assert_eq!(state.seek(0.0, 0), None);
        assert_eq!(state.index(), 4);
    }

    #[test]
    fn test_surface_destroyed_pauses() {
        let state = ready_state();
        state.request_start();
        assert!(state.surface_destroyed());
        assert!(!state.is_surface_ready());
        assert_eq!(state.next_step(5), Step::Finished);
        assert_eq!(state.phase(), PlaybackPhase::Paused);
        // Paused playback resumes on the next surface
        assert!(state.surface_ready());
    }

    #[test]
    fn test_surface_destroyed_clears_auto_start() {
        let state = PlaybackState::new(100, false);
        state.set_auto_start(true);
        state.surface_destroyed();
        assert!(!state.auto_start());
        assert!(!state.surface_ready());
    }

    #[test]
    fn test_keeps_playing() {
        let state = ready_state();
        assert!(!state.keeps_playing());
        state.request_start();
        assert!(state.keeps_playing());
        state.pause();
        assert!(!state.keeps_playing());
        state.request_start();
        assert!(state.keeps_playing());
        state.surface_destroyed();
        assert!(!state.keeps_playing());
    }

    #[test]
    fn test_duration_is_positive() {
        let state = PlaybackState::new(0, false);
        assert_eq!(state.duration_ms(), 1);
        state.configure(0, true);
        assert_eq!(state.duration_ms(), 1);
        assert!(state.is_looping());
    }

    #[test]
    fn test_progress_index() {
        assert_eq!(progress_index(5, 0.5), 2);
        assert_eq!(progress_index(5, 1.0), 4);
        assert_eq!(progress_index(5, 1.7), 4);
        assert_eq!(progress_index(5, -0.3), 0);
        assert_eq!(progress_index(5, f32::NAN), 0);
        assert_eq!(progress_index(0, 0.5), 0);
        assert_eq!(progress_index(100, 0.5), 50);
    }

    #[test]
    fn test_settle_index() {
        assert_eq!(settle_index(5, 5), 0);
        assert_eq!(settle_index(3, 5), 2);
        assert_eq!(settle_index(0, 5), 0);
        assert_eq!(settle_index(0, 0), 0);
    }

    proptest! {
        #[test]
        fn progress_index_in_range(count in 1usize..500, p in -2.0f32..3.0) {
            let index = progress_index(count, p);
            prop_assert!(index < count);
            let expected = ((count - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
            prop_assert_eq!(index, expected);
        }

        #[test]
        fn progress_index_monotonic(count in 1usize..500, a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(progress_index(count, lo) <= progress_index(count, hi));
        }
    }
}
