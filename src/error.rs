//! Error types for frame sources and frame rendering.

use std::io;

use crate::ArrayRes;

/// Reasons a frame source could not be adopted.
///
/// These are never fatal: the player logs them and keeps whatever source it
/// had before.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no frame array resource given")]
    NoResource,
    #[error("frame array resource {0} not found")]
    UnknownArray(ArrayRes),
    #[error("asset folder path is empty")]
    EmptyFolder,
    #[error("failed to list asset folder '{folder}': {source}")]
    ListFailed {
        folder: String,
        #[source]
        source: io::Error,
    },
}

/// Failure to produce or draw a single frame.
///
/// The render loop treats every variant as "skip this frame".
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame index {index} out of range (frame count {count})")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("frame {frame} unavailable: {source}")]
    Unavailable {
        frame: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode frame {frame}: {message}")]
    Decode { frame: String, message: String },
    #[error("drawing surface is not available")]
    SurfaceUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_frame() {
        let err = FrameError::Decode {
            frame: "anim/0001.png".into(),
            message: "bad header".into(),
        };
        assert_eq!(err.to_string(), "failed to decode frame anim/0001.png: bad header");

        let err = FrameError::IndexOutOfRange { index: 7, count: 3 };
        assert_eq!(err.to_string(), "frame index 7 out of range (frame count 3)");
    }

    #[test]
    fn list_failure_keeps_io_source() {
        use std::error::Error;

        let err = SourceError::ListFailed {
            folder: "missing".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such folder"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to list asset folder 'missing'"));
    }
}
