//! Animation lifecycle callbacks and their delivery to the UI context.
//!
//! The render loop never calls a listener directly. It posts
//! [`AnimationEvent`]s onto a channel, and the thread that owns the
//! [`FramePlayer`](crate::FramePlayer) drains that channel and invokes the
//! listener.

use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Lifecycle events emitted by a render loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A render loop began (sent before its first frame)
    Started,
    /// A looping sequence wrapped back to its first frame
    Repeated,
    /// A render loop exited
    Ended,
}

/// Callbacks for animation lifecycle events.
///
/// Always invoked on the thread that calls
/// [`FramePlayer::dispatch_events`](crate::FramePlayer::dispatch_events).
pub trait AnimationListener {
    fn on_animation_start(&mut self) {}
    fn on_animation_end(&mut self) {}
    fn on_animation_repeat(&mut self) {}
}

impl AnimationEvent {
    /// Invoke the matching listener callback.
    pub fn deliver(self, listener: &mut dyn AnimationListener) {
        match self {
            AnimationEvent::Started => listener.on_animation_start(),
            AnimationEvent::Repeated => listener.on_animation_repeat(),
            AnimationEvent::Ended => listener.on_animation_end(),
        }
    }
}

/// Callback used to wake the UI event loop after an event was posted.
pub type UiWaker = Arc<dyn Fn() + Send + Sync>;

/// Sending half of the UI event queue, handed to render loops.
///
/// Clones share the waker slot, so replacing the waker also affects loops
/// that are already running.
#[derive(Clone)]
pub(crate) struct UiPoster {
    tx: Sender<AnimationEvent>,
    waker: Arc<Mutex<Option<UiWaker>>>,
}

impl UiPoster {
    /// Create a connected poster/receiver pair.
    pub(crate) fn channel() -> (Self, Receiver<AnimationEvent>) {
        let (tx, rx) = unbounded();
        let poster = Self {
            tx,
            waker: Arc::new(Mutex::new(None)),
        };
        (poster, rx)
    }

    pub(crate) fn set_waker(&self, waker: Option<UiWaker>) {
        *self.waker.lock().unwrap_or_else(PoisonError::into_inner) = waker;
    }

    /// Queue an event for the UI context.
    pub(crate) fn post(&self, event: AnimationEvent) {
        // Only fails once the player (and its receiver) is gone
        if self.tx.send(event).is_err() {
            return;
        }
        let waker = self
            .waker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(waker) = waker {
            waker();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counts {
        start: usize,
        end: usize,
        repeat: usize,
    }

    impl AnimationListener for Counts {
        fn on_animation_start(&mut self) {
            self.start += 1;
        }
        fn on_animation_end(&mut self) {
            self.end += 1;
        }
        fn on_animation_repeat(&mut self) {
            self.repeat += 1;
        }
    }

    #[test]
    fn test_deliver() {
        let mut counts = Counts::default();
        for event in [
            AnimationEvent::Started,
            AnimationEvent::Repeated,
            AnimationEvent::Repeated,
            AnimationEvent::Ended,
        ] {
            event.deliver(&mut counts);
        }
        assert_eq!((counts.start, counts.repeat, counts.end), (1, 2, 1));
    }

    #[test]
    fn test_post_preserves_order_and_wakes() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let (poster, rx) = UiPoster::channel();
        let counter = Arc::clone(&wakes);
        poster.set_waker(Some(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })));

        let worker = poster.clone();
        std::thread::spawn(move || {
            worker.post(AnimationEvent::Started);
            worker.post(AnimationEvent::Ended);
        })
        .join()
        .unwrap();

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received, vec![AnimationEvent::Started, AnimationEvent::Ended]);
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_post_after_receiver_dropped() {
        let (poster, rx) = UiPoster::channel();
        drop(rx);
        poster.post(AnimationEvent::Ended);
    }
}
