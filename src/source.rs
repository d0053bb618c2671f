//! Frame sources: the ordered, indexable list of frames behind a playback
//! session.

use log::debug;

use crate::{ArrayRes, AssetBundle, FrameError, FrameId, ResourceId, SourceError};

/// Which kind of storage a source reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    ResourceArray,
    AssetFolder,
}

/// The active frame list.
///
/// At most one variant is populated; adopting a new source replaces (and
/// drops) the previous one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FrameSource {
    /// No frames configured
    #[default]
    Empty,
    /// Frames listed by an integer-array resource
    ResourceArray { array: ArrayRes, ids: Vec<ResourceId> },
    /// Frames enumerated from an asset folder, in name order
    AssetFolder { folder: String, names: Vec<String> },
}

impl FrameSource {
    /// Resolve a resource array through the bundle.
    pub fn from_resource_array(
        bundle: &dyn AssetBundle,
        array: ArrayRes,
    ) -> Result<Self, SourceError> {
        if array.is_none() {
            return Err(SourceError::NoResource);
        }
        let ids = bundle
            .resource_array(array)
            .ok_or(SourceError::UnknownArray(array))?;
        debug!("Resource array {} resolved to {} frames", array, ids.len());
        Ok(FrameSource::ResourceArray { array, ids })
    }

    /// List an asset folder through the bundle.
    pub fn from_asset_folder(bundle: &dyn AssetBundle, folder: &str) -> Result<Self, SourceError> {
        let folder = folder.trim_end_matches('/');
        if folder.is_empty() {
            return Err(SourceError::EmptyFolder);
        }
        let names = bundle
            .list_folder(folder)
            .map_err(|source| SourceError::ListFailed {
                folder: folder.to_string(),
                source,
            })?;
        debug!("Asset folder '{}' listed {} frames", folder, names.len());
        Ok(FrameSource::AssetFolder {
            folder: folder.to_string(),
            names,
        })
    }

    #[inline]
    pub fn kind(&self) -> Option<SourceKind> {
        match self {
            FrameSource::Empty => None,
            FrameSource::ResourceArray { .. } => Some(SourceKind::ResourceArray),
            FrameSource::AssetFolder { .. } => Some(SourceKind::AssetFolder),
        }
    }

    /// Get the number of frames.
    pub fn frame_count(&self) -> usize {
        match self {
            FrameSource::Empty => 0,
            FrameSource::ResourceArray { ids, .. } => ids.len(),
            FrameSource::AssetFolder { names, .. } => names.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Get the identifier of the frame at `index`.
    pub fn frame_at(&self, index: usize) -> Result<FrameId, FrameError> {
        let out_of_range = || FrameError::IndexOutOfRange {
            index,
            count: self.frame_count(),
        };
        match self {
            FrameSource::Empty => Err(out_of_range()),
            FrameSource::ResourceArray { ids, .. } => ids
                .get(index)
                .map(|id| FrameId::Resource(*id))
                .ok_or_else(out_of_range),
            FrameSource::AssetFolder { folder, names } => names
                .get(index)
                .map(|name| FrameId::Asset(format!("{folder}/{name}")))
                .ok_or_else(out_of_range),
        }
    }
}
