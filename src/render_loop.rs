//! The background render loop.
//!
//! One loop is spawned per start request and exits on its own once playback
//! is no longer requested or the sequence is over:
//! 1. Post `Started`
//! 2. While playing: draw the frame under the cursor, advance, wait one frame
//!    duration (cut short by [`Worker::wake`])
//! 3. Settle the cursor, release the running slot, post `Ended`

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, warn};

use crate::animation::Step;
use crate::PlaybackState;
use crate::listener::UiPoster;
use crate::player::Shared;
use crate::AnimationEvent;

const THREAD_NAME: &str = "seqframe-render";

/// Handle to a spawned render loop.
pub(crate) struct Worker {
    handle: JoinHandle<()>,
    wake: Sender<()>,
}

impl Worker {
    /// Spawn a loop. The caller must already own the running slot.
    pub(crate) fn spawn(shared: Arc<Shared>, poster: UiPoster) -> io::Result<Self> {
        let (wake, wake_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(&shared, &poster, &wake_rx))?;
        Ok(Self { handle, wake })
    }

    /// Cut the current inter-frame wait short so the loop re-checks its
    /// continuation condition.
    pub(crate) fn wake(&self) {
        // A full slot already guarantees a prompt re-check
        let _ = self.wake.try_send(());
    }

    /// Wait for the loop thread to exit.
    pub(crate) fn join(self) {
        let Worker { handle, wake } = self;
        drop(wake);
        if handle.join().is_err() {
            error!("Render loop thread panicked");
        }
    }
}

/// Keeps the state consistent if a renderer panics mid-loop.
struct UnwindGuard<'a> {
    shared: &'a Shared,
    poster: &'a UiPoster,
}

impl Drop for UnwindGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.shared.state.abandon_start();
            self.poster.post(AnimationEvent::Ended);
        }
    }
}

fn run(shared: &Shared, poster: &UiPoster, wake: &Receiver<()>) {
    let _guard = UnwindGuard { shared, poster };
    debug!("Render loop started at frame {}", shared.state.index());
    poster.post(AnimationEvent::Started);

    loop {
        let count = shared.frame_count();
        let index = match shared.state.next_step(count) {
            Step::Draw(index) => index,
            Step::Finished => break,
        };

        let drawn = shared
            .frame_at(index)
            .and_then(|frame| shared.renderer.render(&frame));
        if let Err(e) = drawn {
            warn!("Skipping frame {}: {}", index, e);
        }

        let advance = shared.state.advance(count);
        if advance.repeated {
            poster.post(AnimationEvent::Repeated);
        }

        wait_frame(&shared.state, wake, advance.delay);
    }

    debug!("Render loop finished, cursor at {}", shared.state.index());
    poster.post(AnimationEvent::Ended);
}

/// Sleep for one frame duration, returning early only when a wake-up finds
/// that playback should no longer continue. A wake-up whose cause was already
/// cancelled (pause then start) keeps waiting out the same frame.
fn wait_frame(state: &PlaybackState, wake: &Receiver<()>, delay: Duration) {
    let deadline = Instant::now() + delay;
    loop {
        match wake.recv_deadline(deadline) {
            Ok(()) if state.keeps_playing() => continue,
            Ok(()) | Err(RecvTimeoutError::Timeout) => return,
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(deadline.saturating_duration_since(Instant::now()));
                return;
            }
        }
    }
}
