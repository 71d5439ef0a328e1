//! Directory File Saver - writes downloaded files into a local directory.
//!
//! Writes go through a `.part` temp file that is renamed into place, so a
//! crash never leaves a truncated file under the final name. An existing
//! file is never overwritten; the new one gets a ` (n)` suffix instead.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::{FileSaver, SavedFile, StorageError};

/// Maximum download size accepted (100 MB).
const MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// Upper bound on ` (n)` suffixes tried before giving up.
const MAX_SUFFIX_ATTEMPTS: u32 = 1000;

/// Saves downloads under a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectoryFileSaver {
    dir: PathBuf,
}

impl DirectoryFileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create download directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }

    /// Claims a file name that does not exist yet by creating it exclusively.
    async fn claim_target(&self, filename: &str) -> Result<(String, PathBuf), StorageError> {
        for attempt in 0..MAX_SUFFIX_ATTEMPTS {
            let candidate = if attempt == 0 {
                filename.to_string()
            } else {
                with_suffix(filename, attempt)
            };
            let path = self.dir.join(&candidate);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => return Ok((candidate, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::io(format!(
                        "Failed to create {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }

        Err(StorageError::io(format!(
            "Too many files named {:?} in {}",
            filename,
            self.dir.display()
        )))
    }
}

#[async_trait]
impl FileSaver for DirectoryFileSaver {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<SavedFile, StorageError> {
        let size = bytes.len() as u64;
        if size > MAX_FILE_SIZE_BYTES {
            return Err(StorageError::file_too_large(size, MAX_FILE_SIZE_BYTES));
        }

        let safe_name = sanitize_filename(filename)?;
        self.ensure_dir().await?;

        let (final_name, final_path) = self.claim_target(&safe_name).await?;
        let temp_path = self.dir.join(format!(".{}.part", final_name));

        if let Err(e) = write_temp(&temp_path, bytes).await {
            discard(&temp_path, &final_path).await;
            return Err(e);
        }
        commit(&temp_path, &final_path).await?;

        Ok(SavedFile {
            filename: final_name,
            path: final_path,
        })
    }
}

async fn write_temp(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let mut file = fs::File::create(path).await.map_err(|e| {
        StorageError::io(format!("Failed to create temp file {}: {}", path.display(), e))
    })?;

    file.write_all(bytes).await.map_err(|e| {
        StorageError::io(format!("Failed to write temp file {}: {}", path.display(), e))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::io(format!("Failed to sync temp file {}: {}", path.display(), e))
    })
}

/// Moves the finished temp file over the claimed name.
async fn commit(temp_path: &Path, final_path: &Path) -> Result<(), StorageError> {
    if let Err(e) = fs::rename(temp_path, final_path).await {
        discard(temp_path, final_path).await;
        return Err(StorageError::io(format!(
            "Failed to rename {} to {}: {}",
            temp_path.display(),
            final_path.display(),
            e
        )));
    }
    Ok(())
}

/// Removes the temp file and the claimed placeholder after a failed save.
async fn discard(temp_path: &Path, final_path: &Path) {
    for path in [temp_path, final_path] {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "failed to clean up partial download");
            }
        }
    }
}

/// Reduces a server-supplied name to a single safe path component.
fn sanitize_filename(filename: &str) -> Result<String, StorageError> {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return Err(StorageError::invalid_filename(filename));
    }
    Ok(cleaned.to_string())
}

/// `report.pdf` -> `report (1).pdf`; `README` -> `README (1)`.
fn with_suffix(filename: &str, n: u32) -> String {
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({}){}", &filename[..dot], n, &filename[dot..]),
        _ => format!("{} ({})", filename, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_saver() -> (DirectoryFileSaver, TempDir) {
        let temp = TempDir::new().unwrap();
        let saver = DirectoryFileSaver::new(temp.path().join("downloads"));
        (saver, temp)
    }

    #[tokio::test]
    async fn save_writes_bytes_under_name() {
        let (saver, _temp) = create_saver();

        let saved = saver.save("report.pdf", b"%PDF-1.7").await.unwrap();

        assert_eq!(saved.filename, "report.pdf");
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"%PDF-1.7");
        assert!(saved.path.starts_with(saver.dir()));
    }

    #[tokio::test]
    async fn existing_file_is_not_overwritten() {
        let (saver, _temp) = create_saver();

        let first = saver.save("report.pdf", b"one").await.unwrap();
        let second = saver.save("report.pdf", b"two").await.unwrap();

        assert_eq!(second.filename, "report (1).pdf");
        assert_eq!(std::fs::read(&first.path).unwrap(), b"one");
        assert_eq!(std::fs::read(&second.path).unwrap(), b"two");
    }

    #[tokio::test]
    async fn no_temp_files_are_left_behind() {
        let (saver, _temp) = create_saver();
        saver.save("a.zip", b"PK").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(saver.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.zip".to_string()]);
    }

    #[tokio::test]
    async fn path_components_are_stripped() {
        let (saver, _temp) = create_saver();

        let saved = saver.save("../../etc/passwd", b"x").await.unwrap();

        assert_eq!(saved.filename, "passwd");
        assert_eq!(saved.path.parent().unwrap(), saver.dir());
    }

    #[tokio::test]
    async fn unusable_name_is_rejected() {
        let (saver, _temp) = create_saver();

        let result = saver.save("..", b"x").await;
        assert!(matches!(result, Err(StorageError::InvalidFilename { .. })));

        let result = saver.save("dir/", b"x").await;
        assert!(matches!(result, Err(StorageError::InvalidFilename { .. })));
    }

    #[tokio::test]
    async fn failed_rename_removes_placeholder() {
        let temp = TempDir::new().unwrap();
        let placeholder = temp.path().join("report.pdf");
        std::fs::write(&placeholder, b"").unwrap();

        // The temp file is missing, so the rename fails.
        let result = commit(&temp.path().join(".report.pdf.part"), &placeholder).await;

        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert!(!placeholder.exists());
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        let part = temp.path().join(".out.bin.part");
        std::fs::write(&part, b"data").unwrap();
        let target = temp.path().join("out.bin");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), b"x").unwrap();

        let result = commit(&part, &target).await;

        assert!(result.is_err());
        assert!(!part.exists());
    }

    #[tokio::test]
    async fn name_is_reusable_after_failed_save() {
        let (saver, _temp) = create_saver();
        saver.ensure_dir().await.unwrap();
        let (name, path) = saver.claim_target("report.pdf").await.unwrap();
        let part = saver.dir().join(format!(".{}.part", name));

        commit(&part, &path).await.unwrap_err();
        let saved = saver.save("report.pdf", b"%PDF").await.unwrap();

        assert_eq!(saved.filename, "report.pdf");
    }

    #[test]
    fn suffix_goes_before_extension() {
        assert_eq!(with_suffix("report.pdf", 2), "report (2).pdf");
        assert_eq!(with_suffix("download", 1), "download (1)");
        assert_eq!(with_suffix(".env", 1), ".env (1)");
    }

    #[test]
    fn control_characters_are_removed() {
        assert_eq!(sanitize_filename("a\u{0}b\n.txt").unwrap(), "ab.txt");
    }
}
