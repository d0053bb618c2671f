//! Rendering frames onto a surface.

use std::sync::{Mutex, PoisonError};

use log::trace;

use crate::{FrameDecoder, FrameError, FrameId, Rgba, ScaleMode, Surface, SurfaceGuard};

/// Draws frames for the player.
///
/// Called from the render loop's background thread and, for single-frame
/// redraws, from the UI thread; implementations serialize access to their
/// surface themselves.
pub trait FrameRenderer: Send + Sync {
    /// Decode and draw one frame. A failure only affects this frame.
    fn render(&self, frame: &FrameId) -> Result<(), FrameError>;

    /// The drawing surface was created or resized.
    fn surface_changed(&self, _width: u32, _height: u32) {}

    /// The drawing surface was torn down; later renders should fail rather
    /// than draw.
    fn surface_destroyed(&self) {}
}

/// Configuration for rendering a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderConfig {
    /// Color the surface is cleared to before each frame
    pub background: Rgba,
    /// Frame placement on the surface
    pub scale: ScaleMode,
}

impl RenderConfig {
    pub fn new(background: Rgba, scale: ScaleMode) -> Self {
        Self { background, scale }
    }
}

/// Renderer that decodes each frame and draws it onto a [`Surface`].
///
/// ## Example
///
/// ```rust
/// use seqframe_core_view::{
///     Bitmap, FrameError, FrameId, FrameRenderer, PixelSurface, RenderConfig, SurfaceRenderer,
/// };
///
/// let decoder = |_: &FrameId| Ok::<_, FrameError>(Bitmap::filled(1, 1, [255, 0, 0, 255]));
/// let renderer = SurfaceRenderer::new(decoder, PixelSurface::new(), RenderConfig::default());
///
/// renderer.surface_changed(4, 4);
/// renderer.render(&FrameId::Asset("anim/0.png".into())).unwrap();
///
/// // The 1x1 red frame is stretched over the whole surface
/// assert_eq!(renderer.with_surface(|s| s.pixel_at(3, 3)), Some([255, 0, 0, 255]));
/// ```
pub struct SurfaceRenderer<S: Surface> {
    decoder: Box<dyn FrameDecoder>,
    surface: Mutex<S>,
    config: RenderConfig,
}

impl<S: Surface> SurfaceRenderer<S> {
    pub fn new(decoder: impl FrameDecoder + 'static, surface: S, config: RenderConfig) -> Self {
        Self {
            decoder: Box::new(decoder),
            surface: Mutex::new(surface),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> RenderConfig {
        self.config
    }

    /// Run `f` with shared access to the surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let surface = self.surface.lock().unwrap_or_else(PoisonError::into_inner);
        f(&surface)
    }
}

impl<S: Surface> FrameRenderer for SurfaceRenderer<S> {
    fn render(&self, frame: &FrameId) -> Result<(), FrameError> {
        // Decode outside the surface lock; the bitmap lives only for this call
        let bitmap = self.decoder.decode(frame)?;
        if !bitmap.is_well_formed() {
            return Err(FrameError::Decode {
                frame: frame.to_string(),
                message: format!(
                    "{} bytes of pixels for a {}x{} bitmap",
                    bitmap.pixels.len(),
                    bitmap.width,
                    bitmap.height
                ),
            });
        }

        let mut surface = SurfaceGuard::acquire(&self.surface)?;
        let (width, height) = surface.size();
        let dest = self
            .config
            .scale
            .dest_rect(bitmap.width, bitmap.height, width, height);
        surface.clear(self.config.background);
        surface.blit(&bitmap, dest);
        trace!("Drew {} into {:?}", frame, dest);
        Ok(())
    }

    fn surface_changed(&self, width: u32, height: u32) {
        self.surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .resize(width, height);
    }

    fn surface_destroyed(&self) {
        self.surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .detach();
    }
}
