use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::extraction::domain::face_extractor::FaceExtractor;
use crate::io::domain::image_reader::ImageReader;
use crate::io::fs_scan;
use crate::registry::registry::{ReferencePerson, ReferenceRegistry};

#[derive(Error, Debug)]
pub enum RegistryBuildError {
    #[error("reference directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("failed to read reference directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Builds the reference registry from a directory of per-person subfolders.
///
/// Each subdirectory of the reference root is one person; files inside it
/// are that person's reference images. Reference images are decoded at full
/// resolution (no resize cap), and only the first detected face per image
/// contributes an embedding — a reference image with multiple faces silently
/// uses one of them.
///
/// Unreadable or faceless files are skipped with a diagnostic; a person with
/// no usable reference images at all is excluded from the registry, so they
/// can never be selected as a match target.
pub struct RegistryBuilder {
    reader: Box<dyn ImageReader>,
    extractor: Box<dyn FaceExtractor>,
}

impl RegistryBuilder {
    pub fn new(reader: Box<dyn ImageReader>, extractor: Box<dyn FaceExtractor>) -> Self {
        Self { reader, extractor }
    }

    /// Scan `reference_dir` and build an immutable registry.
    ///
    /// A missing reference root is fatal; an empty one yields an empty
    /// registry (every probe will then classify as unknown).
    pub fn build(&mut self, reference_dir: &Path) -> Result<ReferenceRegistry, RegistryBuildError> {
        if !reference_dir.is_dir() {
            return Err(RegistryBuildError::MissingRoot(reference_dir.to_path_buf()));
        }

        let person_dirs =
            fs_scan::visible_dirs(reference_dir).map_err(|e| RegistryBuildError::ReadDir {
                path: reference_dir.to_path_buf(),
                source: e,
            })?;

        let mut persons = Vec::new();
        for dir in &person_dirs {
            let name = match dir.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            let embeddings = self.collect_embeddings(dir);
            if embeddings.is_empty() {
                log::warn!("{name}: no usable reference images, excluded from registry");
            } else {
                log::info!("{name}: {} reference embedding(s) registered", embeddings.len());
                persons.push(ReferencePerson::new(name, embeddings));
            }
        }

        Ok(ReferenceRegistry::from_persons(persons))
    }

    fn collect_embeddings(&mut self, person_dir: &Path) -> Vec<crate::shared::embedding::Embedding> {
        let files = match fs_scan::visible_files(person_dir) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("[skip] cannot list {}: {e}", person_dir.display());
                return Vec::new();
            }
        };

        let mut embeddings = Vec::new();
        for file in &files {
            // Full resolution: registry quality over decode speed.
            let frame = match self.reader.read(file, None) {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("[skip] cannot read {}: {e}", file.display());
                    continue;
                }
            };

            match self.extractor.detect_and_encode(&frame) {
                Ok(faces) => match faces.into_iter().next() {
                    Some(face) => embeddings.push(face.embedding),
                    None => log::info!("[skip] no face detected in {}", file.display()),
                },
                Err(e) => log::warn!("[skip] extraction failed for {}: {e}", file.display()),
            }
        }
        embeddings
    }
}
