//! The frame-sequence player.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use std::time::Duration;

use crossbeam_channel::Receiver;
use log::{debug, error, warn};

use crate::animation::StartDecision;
use crate::listener::UiPoster;
use crate::render_loop::Worker;
use crate::{
    AnimationEvent, AnimationListener, ArrayRes, AssetBundle, FrameError, FrameId, FrameRenderer,
    FrameSource, PlaybackPhase, PlaybackState, PlayerConfig, SourceKind, UiWaker,
};

/// State shared between the player and its render loop.
pub(crate) struct Shared {
    pub(crate) state: PlaybackState,
    source: RwLock<FrameSource>,
    pub(crate) renderer: Arc<dyn FrameRenderer>,
}

impl Shared {
    fn source(&self) -> RwLockReadGuard<'_, FrameSource> {
        self.source.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a new source, handing back the previous one.
    fn replace_source(&self, source: FrameSource) -> FrameSource {
        let mut current = self.source.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, source)
    }

    pub(crate) fn frame_count(&self) -> usize {
        self.source().frame_count()
    }

    pub(crate) fn frame_at(&self, index: usize) -> Result<FrameId, FrameError> {
        self.source().frame_at(index)
    }

    /// Draw one frame outside the render loop.
    fn draw(&self, index: usize) {
        if self.frame_count() == 0 {
            return;
        }
        let drawn = self
            .frame_at(index)
            .and_then(|frame| self.renderer.render(&frame));
        if let Err(e) = drawn {
            warn!("Failed to draw frame {}: {}", index, e);
        }
    }
}

/// Plays a sequence of frames onto a surface at a fixed interval.
///
/// The player is owned by the UI thread: every control call and every
/// listener callback happens there. Frames are drawn by a background render
/// loop that is spawned on start and exits by itself on stop, pause or the
/// end of the sequence.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use seqframe_core_view::{
///     AnimationEvent, ArrayRes, Bitmap, DirBundle, FrameError, FrameId, FramePlayer,
///     PixelSurface, PlayerConfig, ResourceId, SurfaceRenderer,
/// };
///
/// let bundle = DirBundle::new(".")
///     .with_array(ArrayRes(1), vec![ResourceId(10), ResourceId(11)]);
/// let decoder = |_: &FrameId| Ok::<_, FrameError>(Bitmap::filled(1, 1, [255, 0, 0, 255]));
///
/// let config = PlayerConfig { duration_ms: 5, ..Default::default() };
/// let renderer = SurfaceRenderer::new(decoder, PixelSurface::new(), config.render_config());
/// let mut player = FramePlayer::new(&config, Arc::new(bundle), Arc::new(renderer));
///
/// player.set_frame_source_from_index(ArrayRes(1));
/// player.on_surface_ready(64, 64);
/// player.start();
///
/// // Pump lifecycle events from the UI loop
/// while let Some(event) = player.dispatch_events_timeout(Duration::from_secs(5)) {
///     if event == AnimationEvent::Ended {
///         break;
///     }
/// }
/// assert!(!player.is_running());
/// ```
pub struct FramePlayer {
    shared: Arc<Shared>,
    bundle: Arc<dyn AssetBundle>,
    poster: UiPoster,
    events: Receiver<AnimationEvent>,
    listener: Option<Box<dyn AnimationListener>>,
    worker: Option<Worker>,
    detached: bool,
}

impl FramePlayer {
    /// Create a player with no frame source.
    pub fn new(
        config: &PlayerConfig,
        bundle: Arc<dyn AssetBundle>,
        renderer: Arc<dyn FrameRenderer>,
    ) -> Self {
        let state = PlaybackState::new(config.duration_ms, config.looping);
        state.set_auto_start(config.auto_start);
        let (poster, events) = UiPoster::channel();
        Self {
            shared: Arc::new(Shared {
                state,
                source: RwLock::new(FrameSource::Empty),
                renderer,
            }),
            bundle,
            poster,
            events,
            listener: None,
            worker: None,
            detached: false,
        }
    }

    /// Set the per-frame duration (clamped to at least 1 ms) and loop mode.
    ///
    /// Takes effect from the next frame of a running loop.
    pub fn configure(&mut self, duration_ms: u64, looping: bool) {
        self.shared.state.configure(duration_ms, looping);
    }

    /// Start automatically the next time the surface becomes ready.
    pub fn set_auto_start(&mut self, auto_start: bool) {
        self.shared.state.set_auto_start(auto_start);
    }

    /// Play the frames of an integer-array resource.
    ///
    /// Ignored if `array` is [`ArrayRes::NONE`] or unknown to the bundle.
    /// The cursor is kept as is.
    pub fn set_frame_source_from_index(&mut self, array: ArrayRes) {
        match FrameSource::from_resource_array(self.bundle.as_ref(), array) {
            Ok(source) => self.adopt_source(source),
            Err(e) => warn!("Ignoring frame array: {}", e),
        }
    }

    /// Play the files of an asset folder, in name order.
    ///
    /// Ignored if `folder` is empty or cannot be listed. The cursor is kept
    /// as is.
    pub fn set_frame_source_from_folder(&mut self, folder: &str) {
        match FrameSource::from_asset_folder(self.bundle.as_ref(), folder) {
            Ok(source) => self.adopt_source(source),
            Err(e) => warn!("Ignoring asset folder: {}", e),
        }
    }

    fn adopt_source(&mut self, source: FrameSource) {
        let previous = self.shared.replace_source(source);
        debug!(
            "Frame source replaced ({:?} -> {:?})",
            previous.kind(),
            self.shared.source().kind()
        );
        drop(previous);

        let state = &self.shared.state;
        if state.is_surface_ready() && !state.is_running() {
            self.shared.draw(state.index());
        }
    }

    /// Start or resume playback.
    ///
    /// A no-op while a loop is running. Before the surface is ready the
    /// request is remembered and honored by [`on_surface_ready`](Self::on_surface_ready).
    pub fn start(&mut self) {
        if self.detached {
            debug!("start: player was torn down");
            return;
        }
        match self.shared.state.request_start() {
            StartDecision::AlreadyRunning => debug!("start: render loop already running"),
            StartDecision::Deferred => debug!("start: surface not ready, deferring"),
            StartDecision::Spawn => self.spawn_worker(),
        }
    }

    fn spawn_worker(&mut self) {
        // The previous loop has already released the running slot
        if let Some(previous) = self.worker.take() {
            previous.join();
        }
        match Worker::spawn(Arc::clone(&self.shared), self.poster.clone()) {
            Ok(worker) => self.worker = Some(worker),
            Err(e) => {
                error!("Failed to spawn render loop: {}", e);
                self.shared.state.abandon_start();
            }
        }
    }

    fn wake_worker(&self) {
        if let Some(worker) = &self.worker {
            worker.wake();
        }
    }

    /// Stop playback. The frame on screen stays; the loop exits at its next
    /// check. Idempotent.
    pub fn stop(&mut self) {
        if self.shared.state.stop() {
            debug!("stop: signalling render loop");
            self.wake_worker();
        }
    }

    /// Suspend playback so that a later start resumes at the last frame shown.
    pub fn pause(&mut self) {
        if self.shared.state.pause() {
            debug!("pause: signalling render loop");
            self.wake_worker();
        }
    }

    /// Rewind to the first frame and start.
    pub fn restart(&mut self) {
        self.shared.state.rewind();
        self.start();
    }

    /// Show the frame at a fractional position in `[0, 1]` without playing.
    ///
    /// Ignored while a loop is running. Out-of-range values are clamped.
    pub fn set_progress(&mut self, progress: f32) {
        let count = self.shared.frame_count();
        let Some(index) = self.shared.state.seek(progress, count) else {
            debug!("set_progress ignored (running or no frames)");
            return;
        };
        if self.shared.state.is_surface_ready() {
            self.shared.draw(index);
        }
    }

    /// Register (or clear) the lifecycle listener.
    pub fn set_animation_listener(&mut self, listener: Option<Box<dyn AnimationListener>>) {
        self.listener = listener;
    }

    /// Register (or clear) a callback invoked from the render loop's thread
    /// after each event is queued, so the host can schedule
    /// [`dispatch_events`](Self::dispatch_events) on its UI loop.
    pub fn set_ui_waker(&mut self, waker: Option<UiWaker>) {
        self.poster.set_waker(waker);
    }

    /// The drawing surface was created or resized.
    ///
    /// Draws the frame under the cursor, then resumes playback if it was
    /// requested, paused, or set to start automatically.
    pub fn on_surface_ready(&mut self, width: u32, height: u32) {
        debug!("Surface ready ({}x{})", width, height);
        self.shared.renderer.surface_changed(width, height);
        let resume = self.shared.state.surface_ready();
        self.shared.draw(self.shared.state.index());
        if resume {
            self.start();
        }
    }

    /// The drawing surface was torn down. Behaves like [`pause`](Self::pause).
    pub fn on_surface_destroyed(&mut self) {
        debug!("Surface destroyed");
        if self.shared.state.surface_destroyed() {
            self.wake_worker();
        }
        self.shared.renderer.surface_destroyed();
    }

    /// Stop playback, wait for the render loop to exit and release the frame
    /// source. Later start requests are ignored.
    pub fn teardown(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.shared.state.stop();
        if let Some(worker) = self.worker.take() {
            worker.wake();
            worker.join();
        }
        drop(self.shared.replace_source(FrameSource::Empty));
        debug!("Player torn down");
    }

    /// Deliver every queued lifecycle event to the listener.
    ///
    /// Returns the number of events delivered.
    pub fn dispatch_events(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.events.try_recv() {
            self.deliver(event);
            delivered += 1;
        }
        delivered
    }

    /// Wait up to `timeout` for the next lifecycle event and deliver it.
    pub fn dispatch_events_timeout(&mut self, timeout: Duration) -> Option<AnimationEvent> {
        let event = self.events.recv_timeout(timeout).ok()?;
        self.deliver(event);
        Some(event)
    }

    fn deliver(&mut self, event: AnimationEvent) {
        if let Some(listener) = self.listener.as_mut() {
            event.deliver(&mut **listener);
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.shared.state.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.shared.state.is_paused()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.shared.state.phase()
    }

    /// Get the current frame index.
    pub fn index(&self) -> usize {
        self.shared.state.index()
    }

    /// Get the number of frames in the active source.
    pub fn frame_count(&self) -> usize {
        self.shared.frame_count()
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        self.shared.source().kind()
    }

    pub fn duration_ms(&self) -> u64 {
        self.shared.state.duration_ms()
    }

    pub fn is_looping(&self) -> bool {
        self.shared.state.is_looping()
    }

    pub fn is_surface_ready(&self) -> bool {
        self.shared.state.is_surface_ready()
    }
}

impl Drop for FramePlayer {
    fn drop(&mut self) {
        self.teardown();
    }
}
