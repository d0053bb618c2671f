//! Placement of frames on a drawing surface.

/// How a frame is placed on a surface of a different size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScaleMode {
    /// Fill the whole surface, ignoring aspect ratio
    #[default]
    Stretch,
    /// Largest size that fits while keeping aspect ratio, centered
    Fit,
    /// Unscaled, centered (may be clipped)
    Center,
}

/// An axis-aligned pixel rectangle. `x`/`y` may be negative when a frame
/// overhangs the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin.
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl ScaleMode {
    /// Calculate where a `frame_width` x `frame_height` frame lands on a
    /// `surface_width` x `surface_height` surface.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use seqframe_core_view::{Rect, ScaleMode};
    ///
    /// // A 100x50 frame on a 200x200 surface
    /// assert_eq!(ScaleMode::Stretch.dest_rect(100, 50, 200, 200), Rect::new(0, 0, 200, 200));
    /// assert_eq!(ScaleMode::Fit.dest_rect(100, 50, 200, 200), Rect::new(0, 50, 200, 100));
    /// assert_eq!(ScaleMode::Center.dest_rect(100, 50, 200, 200), Rect::new(50, 75, 100, 50));
    /// ```
    pub fn dest_rect(
        self,
        frame_width: u32,
        frame_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Rect {
        if frame_width == 0 || frame_height == 0 {
            return Rect::default();
        }
        match self {
            ScaleMode::Stretch => Rect::sized(surface_width, surface_height),
            ScaleMode::Fit => {
                let scale_w = surface_width as f64 / frame_width as f64;
                let scale_h = surface_height as f64 / frame_height as f64;

                // Use the smaller of the two to ensure both dimensions fit
                let scale = scale_w.min(scale_h);
                let width = (frame_width as f64 * scale).round() as u32;
                let height = (frame_height as f64 * scale).round() as u32;
                centered(width, height, surface_width, surface_height)
            }
            ScaleMode::Center => centered(frame_width, frame_height, surface_width, surface_height),
        }
    }
}

fn centered(width: u32, height: u32, surface_width: u32, surface_height: u32) -> Rect {
    let x = (surface_width as i64 - width as i64) / 2;
    let y = (surface_height as i64 - height as i64) / 2;
    Rect::new(x as i32, y as i32, width, height)
}
