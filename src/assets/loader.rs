use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::decode::decode_image;
use crate::foundation::core::RasterImage;
use crate::foundation::error::{FlipError, FlipResult};
use crate::layout::thumbnails::ThumbnailSlot;

/// Resolves an image reference (as stored in a [`ThumbnailSlot`]) to pixels.
pub trait ImageLoader {
    fn load(&mut self, image_ref: &str) -> FlipResult<RasterImage>;
}

/// Loads references as paths relative to a root directory, caching decodes.
#[derive(Debug)]
pub struct FsImageLoader {
    root: PathBuf,
    cache: HashMap<String, RasterImage>,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&mut self, image_ref: &str) -> FlipResult<RasterImage> {
        if let Some(img) = self.cache.get(image_ref) {
            return Ok(img.clone());
        }
        let path = self.root.join(image_ref);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image '{}'", path.display()))
            .map_err(|err| FlipError::input_unavailable(format!("{err:#}")))?;
        let img = decode_image(&bytes)?;
        self.cache.insert(image_ref.to_string(), img.clone());
        Ok(img)
    }
}

/// In-memory loader for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryImageLoader {
    images: HashMap<String, RasterImage>,
    loads: usize,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image_ref: impl Into<String>, image: RasterImage) {
        self.images.insert(image_ref.into(), image);
    }

    /// Number of `load` calls served so far.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&mut self, image_ref: &str) -> FlipResult<RasterImage> {
        self.loads += 1;
        self.images
            .get(image_ref)
            .cloned()
            .ok_or_else(|| FlipError::decode(format!("no image registered for '{image_ref}'")))
    }
}

/// Counted completion barrier over a fixed set of pending decodes.
///
/// Completions may arrive in any order; results are kept by slot index. The
/// gate only opens once every slot has been completed or skipped.
#[derive(Debug)]
pub struct DecodeGate {
    results: Vec<Option<Option<RasterImage>>>,
    pending: usize,
}

impl DecodeGate {
    pub fn new(slots: usize) -> Self {
        Self {
            results: vec![None; slots],
            pending: slots,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_open(&self) -> bool {
        self.pending == 0
    }

    /// Record a finished decode. A failed decode leaves the slot empty.
    pub fn complete(&mut self, index: usize, result: FlipResult<RasterImage>) -> FlipResult<()> {
        let image = match result {
            Ok(img) => Some(img),
            Err(err) => {
                tracing::warn!(slot = index, error = %err, "thumbnail unavailable; slot left empty");
                None
            }
        };
        self.settle(index, image)
    }

    /// Mark a slot that has nothing to decode.
    pub fn skip(&mut self, index: usize) -> FlipResult<()> {
        self.settle(index, None)
    }

    fn settle(&mut self, index: usize, image: Option<RasterImage>) -> FlipResult<()> {
        let entry = self.results.get_mut(index).ok_or_else(|| {
            FlipError::validation(format!("decode gate has no slot {index}"))
        })?;
        if entry.is_some() {
            return Err(FlipError::validation(format!(
                "decode gate slot {index} completed twice"
            )));
        }
        *entry = Some(image);
        self.pending -= 1;
        Ok(())
    }

    /// Consume the gate once open, yielding one entry per slot.
    pub fn finish(self) -> FlipResult<Vec<Option<RasterImage>>> {
        if !self.is_open() {
            return Err(FlipError::validation(format!(
                "decode gate still waiting on {} slot(s)",
                self.pending
            )));
        }
        Ok(self.results.into_iter().map(Option::flatten).collect())
    }
}

/// Load every referenced thumbnail and wait for all of them.
pub fn resolve_thumbnails(
    slots: &[ThumbnailSlot],
    loader: &mut dyn ImageLoader,
) -> FlipResult<Vec<Option<RasterImage>>> {
    let mut gate = DecodeGate::new(slots.len());
    for (index, slot) in slots.iter().enumerate() {
        match slot.image_ref.as_deref() {
            Some(image_ref) => gate.complete(index, loader.load(image_ref))?,
            None => gate.skip(index)?,
        }
    }
    gate.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
