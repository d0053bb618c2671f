//! Turning frame ids into pixels.

use crate::{Bitmap, FrameError, FrameId};

/// Decodes a frame into a freshly allocated bitmap.
///
/// Called from the render loop's thread; the returned bitmap is dropped as
/// soon as it has been drawn.
pub trait FrameDecoder: Send + Sync {
    fn decode(&self, frame: &FrameId) -> Result<Bitmap, FrameError>;
}

impl<F> FrameDecoder for F
where
    F: Fn(&FrameId) -> Result<Bitmap, FrameError> + Send + Sync,
{
    fn decode(&self, frame: &FrameId) -> Result<Bitmap, FrameError> {
        self(frame)
    }
}

#[cfg(feature = "image")]
pub use self::image_decoder::ImageDecoder;

#[cfg(feature = "image")]
mod image_decoder {
    use std::sync::Arc;

    use super::FrameDecoder;
    use crate::{AssetBundle, Bitmap, FrameError, FrameId};

    /// Decodes encoded images read from an [`AssetBundle`] with the `image`
    /// crate.
    #[derive(Clone)]
    pub struct ImageDecoder {
        bundle: Arc<dyn AssetBundle>,
    }

    impl ImageDecoder {
        pub fn new(bundle: Arc<dyn AssetBundle>) -> Self {
            Self { bundle }
        }
    }

    impl FrameDecoder for ImageDecoder {
        fn decode(&self, frame: &FrameId) -> Result<Bitmap, FrameError> {
            let bytes = self
                .bundle
                .read_frame(frame)
                .map_err(|source| FrameError::Unavailable {
                    frame: frame.to_string(),
                    source,
                })?;
            let image = image::load_from_memory(&bytes)
                .map_err(|e| FrameError::Decode {
                    frame: frame.to_string(),
                    message: e.to_string(),
                })?
                .into_rgba8();
            let (width, height) = image.dimensions();
            Ok(Bitmap {
                width,
                height,
                pixels: image.into_raw(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResourceId;

    #[test]
    fn test_closure_decoder() {
        let decoder = |frame: &FrameId| match frame {
            FrameId::Resource(ResourceId(1)) => Ok(Bitmap::filled(1, 1, [1, 2, 3, 4])),
            _ => Err(FrameError::Decode {
                frame: frame.to_string(),
                message: "unsupported".into(),
            }),
        };

        let bitmap = decoder.decode(&FrameId::Resource(ResourceId(1))).unwrap();
        assert_eq!(bitmap.pixel_at(0, 0), Some([1, 2, 3, 4]));
        assert!(decoder.decode(&FrameId::Asset("x".into())).is_err());
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_image_decoder() {
        use crate::DirBundle;
        use std::sync::Arc;
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("anim")).unwrap();
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .save(dir.path().join("anim/0001.png"))
            .unwrap();
        std::fs::write(dir.path().join("anim/broken.png"), b"not a png").unwrap();

        let decoder = ImageDecoder::new(Arc::new(DirBundle::new(dir.path())));

        let bitmap = decoder.decode(&FrameId::Asset("anim/0001.png".into())).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (3, 2));
        assert_eq!(bitmap.pixel_at(2, 1), Some([10, 20, 30, 255]));

        assert!(matches!(
            decoder.decode(&FrameId::Asset("anim/broken.png".into())),
            Err(FrameError::Decode { .. })
        ));
        assert!(matches!(
            decoder.decode(&FrameId::Asset("anim/missing.png".into())),
            Err(FrameError::Unavailable { .. })
        ));
    }
}
