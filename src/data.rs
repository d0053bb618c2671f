//! Core data structures for frame sequences.

use std::fmt;

/// Handle to an integer-array resource listing the frames of an animation.
///
/// `ArrayRes::NONE` (zero) means "no resource", matching how hosts report a
/// missing attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayRes(pub u32);

impl ArrayRes {
    pub const NONE: ArrayRes = ArrayRes(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl fmt::Display for ArrayRes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// Handle to a single drawable resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceId(pub u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// Opaque identifier of one frame, as handed to a renderer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameId {
    /// A drawable resource from a resource array
    Resource(ResourceId),
    /// An asset path of the form `"<folder>/<name>"`
    Asset(String),
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameId::Resource(id) => write!(f, "resource {id}"),
            FrameId::Asset(path) => write!(f, "asset {path}"),
        }
    }
}

/// A decoded frame: straight (non-premultiplied) RGBA pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, `width * height * 4` bytes.
    /// Layout: [r0, g0, b0, a0, r1, g1, b1, a1, ...]
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from raw RGBA pixels.
    ///
    /// Returns None if `pixels` does not hold exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a bitmap filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get the RGBA value at the given position.
    ///
    /// Returns None if position is out of bounds.
    #[inline]
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Whether `pixels` holds exactly `width * height` RGBA pixels.
    ///
    /// Always true for bitmaps built with [`Bitmap::new`] or [`Bitmap::filled`].
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
