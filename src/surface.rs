//! Drawing surfaces and scoped access to them.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::color::blend_over;
use crate::{Bitmap, FrameError, Rect, Rgba};

/// A destination frames are drawn onto.
///
/// A draw is bracketed by [`lock`](Surface::lock) and
/// [`unlock_and_post`](Surface::unlock_and_post); use [`SurfaceGuard`] rather
/// than calling them by hand.
pub trait Surface: Send {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Begin drawing a frame. Fails once the surface has been torn down.
    fn lock(&mut self) -> Result<(), FrameError>;

    /// Fill the whole surface with `color`, replacing what was there.
    fn clear(&mut self, color: Rgba);

    /// Draw `bitmap` scaled into `dest`.
    fn blit(&mut self, bitmap: &Bitmap, dest: Rect);

    /// Finish the frame and present it.
    fn unlock_and_post(&mut self);

    /// The host resized (or first created) the surface.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// The host tore the surface down.
    fn detach(&mut self) {}
}

/// Exclusive, locked access to a surface for the duration of one frame.
///
/// Holds the surface mutex and the surface's own draw lock; both are released
/// when the guard drops, including on early returns.
pub struct SurfaceGuard<'a, S: Surface> {
    surface: MutexGuard<'a, S>,
}

impl<'a, S: Surface> SurfaceGuard<'a, S> {
    /// Acquire the surface for drawing.
    pub fn acquire(surface: &'a Mutex<S>) -> Result<Self, FrameError> {
        let mut surface = surface.lock().unwrap_or_else(PoisonError::into_inner);
        surface.lock()?;
        Ok(Self { surface })
    }
}

impl<S: Surface> Deref for SurfaceGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.surface
    }
}

impl<S: Surface> DerefMut for SurfaceGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: Surface> Drop for SurfaceGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.unlock_and_post();
    }
}

/// In-memory RGBA framebuffer.
///
/// Useful for headless playback and for inspecting what was drawn.
#[derive(Clone, Debug, Default)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    attached: bool,
    locked: bool,
    presented: u64,
}

impl PixelSurface {
    /// Create a detached surface; it becomes drawable after `resize`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an attached surface of the given size.
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut surface = Self::new();
        surface.resize(width, height);
        surface
    }

    /// Get the RGBA value at the given position.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Number of frames presented so far.
    #[inline]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Snapshot of the framebuffer as a bitmap.
    pub fn snapshot(&self) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn lock(&mut self) -> Result<(), FrameError> {
        if !self.attached || self.locked {
            return Err(FrameError::SurfaceUnavailable);
        }
        self.locked = true;
        Ok(())
    }

    fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    fn blit(&mut self, bitmap: &Bitmap, dest: Rect) {
        if bitmap.is_empty() || dest.is_empty() {
            return;
        }
        // Clip the destination to the surface
        let x0 = dest.x.max(0) as i64;
        let y0 = dest.y.max(0) as i64;
        let x1 = (dest.x as i64 + dest.width as i64).min(self.width as i64);
        let y1 = (dest.y as i64 + dest.height as i64).min(self.height as i64);

        for y in y0..y1 {
            // Nearest source row for this destination row
            let sy = ((y - dest.y as i64) * bitmap.height as i64 / dest.height as i64) as u32;
            for x in x0..x1 {
                let sx = ((x - dest.x as i64) * bitmap.width as i64 / dest.width as i64) as u32;
                let Some(src) = bitmap.pixel_at(sx, sy) else {
                    continue;
                };
                let idx = (y as usize * self.width as usize + x as usize) * 4;
                let dst = [
                    self.pixels[idx],
                    self.pixels[idx + 1],
                    self.pixels[idx + 2],
                    self.pixels[idx + 3],
                ];
                self.pixels[idx..idx + 4].copy_from_slice(&blend_over(src, dst));
            }
        }
    }

    fn unlock_and_post(&mut self) {
        if self.locked {
            self.locked = false;
            self.presented += 1;
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
    }
}
