//! Host-provided frame storage.
//!
//! Frames come from two kinds of packaged storage:
//! 1. Resource arrays - an integer-array resource listing drawable ids
//! 2. Asset folders - a directory whose entries are the frames, in name order

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::{ArrayRes, FrameId, ResourceId};

/// Trait for frame storage providers.
///
/// Implement this trait to expose frames from your specific packaging
/// mechanism (application resources, an archive, the filesystem, etc.)
///
/// Implementations are shared with the background render loop, hence the
/// `Send + Sync` bound.
pub trait AssetBundle: Send + Sync {
    /// Resolve an integer-array resource to its list of drawable ids.
    fn resource_array(&self, array: ArrayRes) -> Option<Vec<ResourceId>>;

    /// List the entry names of an asset folder, sorted by name.
    fn list_folder(&self, folder: &str) -> io::Result<Vec<String>>;

    /// Read the encoded bytes of a drawable resource.
    fn read_resource(&self, id: ResourceId) -> io::Result<Vec<u8>>;

    /// Read the encoded bytes of an asset given its `"<folder>/<name>"` path.
    fn read_asset(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Read the encoded bytes behind a frame id.
    fn read_frame(&self, frame: &FrameId) -> io::Result<Vec<u8>> {
        match frame {
            FrameId::Resource(id) => self.read_resource(*id),
            FrameId::Asset(path) => self.read_asset(path),
        }
    }
}

/// Filesystem-backed bundle.
///
/// Assets live under `root`; resources are registered in memory and map to
/// files under the same root.
#[derive(Clone, Debug, Default)]
pub struct DirBundle {
    root: PathBuf,
    arrays: HashMap<ArrayRes, Vec<ResourceId>>,
    resources: HashMap<ResourceId, PathBuf>,
}

impl DirBundle {
    /// Create a bundle rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            arrays: HashMap::new(),
            resources: HashMap::new(),
        }
    }

    /// Register an integer-array resource.
    pub fn with_array(mut self, array: ArrayRes, ids: Vec<ResourceId>) -> Self {
        self.arrays.insert(array, ids);
        self
    }

    /// Register a drawable resource backed by a file relative to the root.
    pub fn with_resource(mut self, id: ResourceId, path: impl Into<PathBuf>) -> Self {
        self.resources.insert(id, path.into());
        self
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative.trim_start_matches('/'))
    }
}

impl AssetBundle for DirBundle {
    fn resource_array(&self, array: ArrayRes) -> Option<Vec<ResourceId>> {
        self.arrays.get(&array).cloned()
    }

    fn list_folder(&self, folder: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(self.resolve(folder))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_resource(&self, id: ResourceId) -> io::Result<Vec<u8>> {
        let path = self.resources.get(&id).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("resource {id} not registered"))
        })?;
        std::fs::read(self.root.join(path))
    }

    fn read_asset(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.resolve(path))
    }
}
