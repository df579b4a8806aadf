//! On-disk thumbnail cache keyed by a hash of the original image path.
//!
//! Entries are never invalidated: an image edited in place keeps showing the
//! thumbnail generated for the first version stored at that path.

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use sha1::{Digest, Sha1};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{GuhwallError, Result};

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 300;
pub const THUMBNAIL_EXTENSION: &str = "jpg";
/// Originals of this size or larger are never decoded.
pub const MAX_SOURCE_BYTES: u64 = 100 * 1024 * 1024;

/// Outcome of a single cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A thumbnail already existed and was reused as-is.
    Hit(PathBuf),
    /// The thumbnail was generated during this lookup.
    Generated(PathBuf),
    /// No thumbnail could be produced; carries the original path.
    Fallback(PathBuf),
}

impl Resolution {
    pub fn path(&self) -> &Path {
        match self {
            Resolution::Hit(path) | Resolution::Generated(path) | Resolution::Fallback(path) => {
                path
            }
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            Resolution::Hit(path) | Resolution::Generated(path) | Resolution::Fallback(path) => {
                path
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    dir: PathBuf,
    width: u32,
}

impl ThumbnailCache {
    pub fn new(dir: impl Into<PathBuf>, width: u32) -> Self {
        Self {
            dir: dir.into(),
            width: width.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Creates the cache directory if needed. Returns whether it exists afterwards.
    pub fn ensure_dir(&self) -> bool {
        match fs::create_dir_all(&self.dir) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Failed to create thumbnail cache directory {:?}: {}",
                    self.dir, e
                );
                false
            }
        }
    }

    /// File name of the cache entry for `original`: SHA-1 of the raw path
    /// bytes, in hex, plus the thumbnail extension.
    pub fn cache_key(original: &Path) -> String {
        let mut hasher = Sha1::new();
        hasher.update(original.as_os_str().as_encoded_bytes());
        format!("{:x}.{}", hasher.finalize(), THUMBNAIL_EXTENSION)
    }

    pub fn thumbnail_path(&self, original: &Path) -> PathBuf {
        self.dir.join(Self::cache_key(original))
    }

    /// Returns the path to show for `original`: its cached thumbnail, or the
    /// original itself when no thumbnail can be made.
    pub fn resolve(&self, original: &Path) -> PathBuf {
        self.lookup(original).into_path()
    }

    pub fn lookup(&self, original: &Path) -> Resolution {
        let thumbnail_path = self.thumbnail_path(original);
        let name = original.file_name().unwrap_or_default();

        if thumbnail_path.exists() {
            debug!("Thumbnail cache hit for {:?}", name);
            return Resolution::Hit(thumbnail_path);
        }

        match self.generate(original, &thumbnail_path) {
            Ok(()) => {
                debug!("Generated thumbnail for {:?}", name);
                Resolution::Generated(thumbnail_path)
            }
            Err(e) => {
                warn!("{}", e);
                Resolution::Fallback(original.to_path_buf())
            }
        }
    }

    fn generate(&self, original: &Path, thumbnail_path: &Path) -> Result<()> {
        check_source_size(original)?;
        let img = decode(original)?;
        let thumbnail = DynamicImage::ImageRgb8(scale_to_width(&img, self.width).to_rgb8());

        let mut encoded = Cursor::new(Vec::new());
        thumbnail
            .write_to(&mut encoded, ImageFormat::Jpeg)
            .map_err(|source| GuhwallError::ThumbnailEncode {
                path: thumbnail_path.to_path_buf(),
                source,
            })?;

        // Every writer gets its own temp file; the rename is atomic, so
        // readers only ever see a complete JPEG and the last writer wins.
        let persist_error = |source| GuhwallError::ThumbnailPersist {
            path: thumbnail_path.to_path_buf(),
            source,
        };
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(persist_error)?;
        temp.write_all(encoded.get_ref()).map_err(persist_error)?;
        temp.persist(thumbnail_path).map_err(|e| persist_error(e.error))?;
        Ok(())
    }
}

fn check_source_size(original: &Path) -> Result<()> {
    let size = fs::metadata(original)
        .map_err(|source| GuhwallError::ImageOpen {
            path: original.to_path_buf(),
            source,
        })?
        .len();

    if size >= MAX_SOURCE_BYTES {
        return Err(GuhwallError::SourceTooLarge {
            path: original.to_path_buf(),
            size,
        });
    }
    Ok(())
}

/// Opens and decodes an image, guessing the format from its contents.
pub fn decode(path: &Path) -> Result<DynamicImage> {
    let reader = image::io::Reader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| GuhwallError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?;

    reader.decode().map_err(|source| GuhwallError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Resizes to exactly `width` pixels wide, keeping the aspect ratio.
pub fn scale_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
    let height = (u64::from(img.height()) * u64::from(width) + u64::from(img.width()) / 2)
        / u64::from(img.width().max(1));
    let height = height.clamp(1, u64::from(u32::MAX)) as u32;
    img.resize_exact(width, height, FilterType::Lanczos3)
}
