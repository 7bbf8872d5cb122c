//! Resource providers supplying reference maps and the pointer template.
//!
//! The tracker only needs decoded pixels by logical name. Hosts with their own
//! asset pipeline implement [`ResourceProvider`]; [`MemoryResources`] covers
//! embedding and tests, and `DirResources` (feature `image-io`) reads the
//! standard on-disk layout.

use crate::geom::Rect;
use crate::image::OwnedImage;
use crate::util::{MapTrackError, MapTrackResult};

/// One reference map as supplied by a provider.
#[derive(Clone, Debug)]
pub struct MapSource {
    pub name: String,
    pub image: OwnedImage,
    /// Native-pixel bounds for match centers, if the map has any.
    pub valid_region: Option<Rect>,
}

/// Supplies the images the tracker matches against.
///
/// Both methods are called at most once per tracker; errors become the
/// tracker's sticky initialization failure.
pub trait ResourceProvider: Send + Sync {
    /// Loads every reference map. Names must be unique.
    fn load_maps(&self) -> MapTrackResult<Vec<MapSource>>;

    /// Loads the upright pointer template.
    fn load_pointer(&self) -> MapTrackResult<OwnedImage>;
}

/// Provider backed by images already in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryResources {
    maps: Vec<MapSource>,
    pointer: Option<OwnedImage>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reference map.
    pub fn with_map(
        mut self,
        name: impl Into<String>,
        image: OwnedImage,
        valid_region: Option<Rect>,
    ) -> Self {
        self.maps.push(MapSource {
            name: name.into(),
            image,
            valid_region,
        });
        self
    }

    /// Sets the pointer template.
    pub fn with_pointer(mut self, pointer: OwnedImage) -> Self {
        self.pointer = Some(pointer);
        self
    }
}

impl ResourceProvider for MemoryResources {
    fn load_maps(&self) -> MapTrackResult<Vec<MapSource>> {
        if self.maps.is_empty() {
            return Err(MapTrackError::ResourceNotFound {
                name: "reference maps".to_string(),
            });
        }
        Ok(self.maps.clone())
    }

    fn load_pointer(&self) -> MapTrackResult<OwnedImage> {
        self.pointer
            .clone()
            .ok_or_else(|| MapTrackError::ResourceNotFound {
                name: "pointer template".to_string(),
            })
    }
}

#[cfg(feature = "image-io")]
pub use dir::DirResources;

#[cfg(feature = "image-io")]
mod dir {
    use super::{MapSource, ResourceProvider};
    use crate::config::default_valid_regions;
    use crate::geom::Rect;
    use crate::image::io::load_rgba_image;
    use crate::image::OwnedImage;
    use crate::trace::{trace_event, trace_warn};
    use crate::util::{MapTrackError, MapTrackResult};
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Map directory relative to a resource root.
    pub const MAP_DIR: &str = "image/MapTracker/map";
    /// Pointer template relative to a resource root.
    pub const POINTER_PATH: &str = "image/MapTracker/pointer.png";

    /// Provider reading PNGs from a resource directory tree.
    ///
    /// Relative paths are tried against each root in order: the roots given
    /// to [`DirResources::new`], then `<cwd>/resource`, then `resource`.
    #[derive(Clone, Debug)]
    pub struct DirResources {
        roots: Vec<PathBuf>,
        map_dir: PathBuf,
        pointer_path: PathBuf,
        valid_regions: BTreeMap<String, Rect>,
    }

    impl DirResources {
        /// Creates a provider with the standard layout and default regions.
        pub fn new<I, P>(roots: I) -> Self
        where
            I: IntoIterator<Item = P>,
            P: Into<PathBuf>,
        {
            let mut roots: Vec<PathBuf> = roots.into_iter().map(Into::into).collect();
            if let Ok(cwd) = std::env::current_dir() {
                roots.push(cwd.join("resource"));
            }
            roots.push(PathBuf::from("resource"));
            Self {
                roots,
                map_dir: PathBuf::from(MAP_DIR),
                pointer_path: PathBuf::from(POINTER_PATH),
                valid_regions: default_valid_regions(),
            }
        }

        /// Replaces the per-map valid regions.
        pub fn with_valid_regions(mut self, regions: BTreeMap<String, Rect>) -> Self {
            self.valid_regions = regions;
            self
        }

        /// Overrides the relative map directory and pointer path.
        pub fn with_layout(mut self, map_dir: impl Into<PathBuf>, pointer: impl Into<PathBuf>) -> Self {
            self.map_dir = map_dir.into();
            self.pointer_path = pointer.into();
            self
        }

        /// Resolves `relative` against the first root where it exists.
        pub fn find(&self, relative: &Path) -> Option<PathBuf> {
            self.roots
                .iter()
                .map(|root| root.join(relative))
                .find(|path| path.exists())
        }
    }

    /// Map name for a file: `_merged.png` or `.png` stripped.
    fn map_name(file_name: &str) -> Option<&str> {
        file_name
            .strip_suffix("_merged.png")
            .or_else(|| file_name.strip_suffix(".png"))
    }

    impl ResourceProvider for DirResources {
        fn load_maps(&self) -> MapTrackResult<Vec<MapSource>> {
            let dir = self
                .find(&self.map_dir)
                .ok_or_else(|| MapTrackError::ResourceNotFound {
                    name: self.map_dir.display().to_string(),
                })?;
            let entries = fs::read_dir(&dir).map_err(|err| MapTrackError::ImageIo {
                reason: format!("{}: {err}", dir.display()),
            })?;

            let mut files: Vec<(String, PathBuf)> = entries
                .filter_map(Result::ok)
                .filter(|entry| entry.path().is_file())
                .filter_map(|entry| {
                    let file_name = entry.file_name().to_str()?.to_string();
                    Some((file_name, entry.path()))
                })
                .collect();
            files.sort();

            let mut maps = Vec::new();
            for (file_name, path) in files {
                let Some(name) = map_name(&file_name) else {
                    continue;
                };
                let image = match load_rgba_image(&path) {
                    Ok(image) => image,
                    Err(err) => {
                        trace_warn!(
                            "map_skipped",
                            path = path.display().to_string().as_str(),
                            reason = err.to_string().as_str()
                        );
                        continue;
                    }
                };
                maps.push(MapSource {
                    name: name.to_string(),
                    valid_region: self.valid_regions.get(name).copied(),
                    image,
                });
            }

            if maps.is_empty() {
                return Err(MapTrackError::ResourceNotFound {
                    name: format!("png maps in {}", dir.display()),
                });
            }
            trace_event!("maps_loaded", count = maps.len());
            Ok(maps)
        }

        fn load_pointer(&self) -> MapTrackResult<OwnedImage> {
            let path = self
                .find(&self.pointer_path)
                .ok_or_else(|| MapTrackError::ResourceNotFound {
                    name: self.pointer_path.display().to_string(),
                })?;
            load_rgba_image(path)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{MemoryResources, ResourceProvider};
    use crate::image::OwnedImage;
    use crate::util::MapTrackError;

    #[test]
    fn memory_provider_reports_missing_parts() {
        let empty = MemoryResources::new();
        assert!(matches!(
            empty.load_maps(),
            Err(MapTrackError::ResourceNotFound { .. })
        ));
        assert!(matches!(
            empty.load_pointer(),
            Err(MapTrackError::ResourceNotFound { .. })
        ));

        let img = OwnedImage::filled(2, 2, [1, 2, 3, 255]).unwrap();
        let full = MemoryResources::new()
            .with_map("a", img.clone(), None)
            .with_pointer(img.clone());
        assert_eq!(full.load_maps().unwrap()[0].name, "a");
        assert_eq!(full.load_pointer().unwrap(), img);
    }
}
