//! Atomic output persistence.

use super::naming::output_file_name;
use crate::manifest::ImageDescriptor;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Suffix of the in-progress file written before the final rename.
const PART_SUFFIX: &str = "part";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move {from} into place: {source}")]
    Rename {
        from: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to write an empty image to {0}")]
    Empty(PathBuf),
}

/// Decides whether an image still needs work and writes finished images.
///
/// A file at a final path is always complete: bytes go to `<final>.part`
/// first and are renamed into place only after the write succeeded. Stale
/// `.part` files from an interrupted run are simply overwritten.
#[derive(Debug, Clone)]
pub struct PersistenceGate {
    directory: PathBuf,
    archive_id: String,
    extension: String,
}

impl PersistenceGate {
    pub fn new(
        directory: impl Into<PathBuf>,
        archive_id: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            archive_id: archive_id.into(),
            extension: extension.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn archive_id(&self) -> &str {
        &self.archive_id
    }

    /// Final path of `descriptor`'s output.
    pub fn output_path(&self, descriptor: &ImageDescriptor) -> PathBuf {
        self.directory.join(output_file_name(
            &self.archive_id,
            descriptor.sequence_index,
            &descriptor.label,
            &self.extension,
        ))
    }

    /// True if a non-empty final file already exists for `descriptor`.
    pub async fn is_complete(&self, descriptor: &ImageDescriptor) -> bool {
        match tokio::fs::metadata(self.output_path(descriptor)).await {
            Ok(meta) => meta.is_file() && meta.len() > 0,
            Err(_) => false,
        }
    }

    /// Writes `bytes` as the output of `descriptor` and returns its path.
    pub async fn commit(
        &self,
        descriptor: &ImageDescriptor,
        bytes: &[u8],
    ) -> Result<PathBuf, PersistError> {
        let path = self.output_path(descriptor);
        if bytes.is_empty() {
            return Err(PersistError::Empty(path));
        }

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: self.directory.clone(),
                source,
            })?;

        let part_path = part_path(&path);
        debug!(path = %part_path.display(), bytes = bytes.len(), "Writing partial output");

        tokio::fs::write(&part_path, bytes)
            .await
            .map_err(|source| PersistError::Write {
                path: part_path.clone(),
                source,
            })?;

        if let Err(source) = tokio::fs::rename(&part_path, &path).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(PersistError::Rename {
                from: part_path,
                source,
            });
        }

        info!(path = %path.display(), bytes = bytes.len(), "Image saved");
        Ok(path)
    }
}

/// `<final>.part`, keeping the original extension visible.
fn part_path(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_owned();
    name.push(".");
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn descriptor(index: usize, label: &str) -> ImageDescriptor {
        ImageDescriptor {
            service_base_url: "http://iiif.test/p".into(),
            label: label.into(),
            sequence_index: index,
        }
    }

    #[test]
    fn test_output_path() {
        let gate = PersistenceGate::new("/out", "b123", "jpg");
        assert_eq!(
            gate.output_path(&descriptor(2, "Folio 3")),
            PathBuf::from("/out/b123_0003_Folio_3.jpg")
        );
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("/out/a_0001_p.jpg")),
            PathBuf::from("/out/a_0001_p.jpg.part")
        );
    }

    #[tokio::test]
    async fn test_commit_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("nested").join("out");
        let gate = PersistenceGate::new(&out, "b123", "jpg");
        let desc = descriptor(0, "cover");

        assert!(!gate.is_complete(&desc).await);

        let path = gate.commit(&desc, b"jpeg bytes").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg bytes");
        assert!(!part_path(&path).exists());
        assert!(gate.is_complete(&desc).await);
    }

    #[tokio::test]
    async fn test_stale_part_file_is_replaced() {
        let temp = TempDir::new().unwrap();
        let gate = PersistenceGate::new(temp.path(), "b123", "jpg");
        let desc = descriptor(0, "cover");
        let final_path = gate.output_path(&desc);
        std::fs::write(part_path(&final_path), b"trunc").unwrap();

        // A leftover .part never counts as complete
        assert!(!gate.is_complete(&desc).await);

        gate.commit(&desc, b"full image").await.unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"full image");
        assert!(!part_path(&final_path).exists());
    }

    #[tokio::test]
    async fn test_empty_final_file_is_not_complete() {
        let temp = TempDir::new().unwrap();
        let gate = PersistenceGate::new(temp.path(), "b123", "jpg");
        let desc = descriptor(0, "cover");
        std::fs::write(gate.output_path(&desc), b"").unwrap();

        assert!(!gate.is_complete(&desc).await);
    }

    #[tokio::test]
    async fn test_empty_bytes_rejected() {
        let temp = TempDir::new().unwrap();
        let gate = PersistenceGate::new(temp.path(), "b123", "jpg");
        let desc = descriptor(0, "cover");

        assert!(matches!(
            gate.commit(&desc, &[]).await,
            Err(PersistError::Empty(_))
        ));
        assert!(!gate.output_path(&desc).exists());
    }
}
