//! # seqframe-core-view
//!
//! Core frame-sequence playback engine for surface-backed animation views.
//!
//! This crate provides platform-agnostic data structures and logic for:
//! - Resolving frame lists from resource arrays or asset folders
//! - Controlling playback (start, stop, pause, restart, seek, loop)
//! - Drawing frames from a background render loop at a fixed interval
//! - Delivering start/repeat/end callbacks on the UI thread
//!
//! ## Features
//!
//! - `image` (default) - PNG frame decoding through [`ImageDecoder`]
//! - `serde` - Enable serialization/deserialization for data structures
//! - `toml` - Load a [`PlayerConfig`] from TOML
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use seqframe_core_view::{
//!     AssetBundle, DirBundle, FramePlayer, ImageDecoder, PixelSurface, PlayerConfig, SurfaceRenderer,
//! };
//!
//! let bundle: Arc<dyn AssetBundle> = Arc::new(DirBundle::new("assets"));
//! let config = PlayerConfig::from_toml_str(&std::fs::read_to_string("player.toml")?)?;
//!
//! let renderer = SurfaceRenderer::new(
//!     ImageDecoder::new(bundle.clone()),
//!     PixelSurface::new(),
//!     config.render_config(),
//! );
//! let mut player = FramePlayer::new(&config, bundle, Arc::new(renderer));
//!
//! player.set_frame_source_from_folder("anim/intro");
//! player.on_surface_ready(800, 600);
//! player.start();
//!
//! // In the UI loop
//! player.dispatch_events();
//! ```

mod animation;
mod bundle;
pub mod color;
mod config;
mod data;
mod decode;
mod error;
mod listener;
mod player;
pub mod render;
mod render_loop;
mod sizing;
mod source;
mod surface;

pub use animation::{progress_index, settle_index, PlaybackPhase, PlaybackState};
pub use bundle::{AssetBundle, DirBundle};
pub use color::{parse_color, Rgba};
pub use config::{PlayerConfig, DEFAULT_DURATION_MS};
pub use data::{ArrayRes, Bitmap, FrameId, ResourceId};
pub use decode::FrameDecoder;
pub use error::{FrameError, SourceError};
pub use listener::{AnimationEvent, AnimationListener, UiWaker};
pub use player::FramePlayer;
pub use render::{FrameRenderer, RenderConfig, SurfaceRenderer};
pub use sizing::{Rect, ScaleMode};
pub use source::{FrameSource, SourceKind};
pub use surface::{PixelSurface, Surface, SurfaceGuard};

#[cfg(feature = "image")]
pub use decode::ImageDecoder;
