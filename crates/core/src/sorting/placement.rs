use std::fs;
use std::io;
use std::path::Path;

use crate::sorting::outcome::PlacementResult;

/// Copy `source` into `dest_dir/file_name`, creating the directory if
/// absent.
///
/// The destination is opened with exclusive-create semantics, so the
/// existence check and the write are one atomic step: concurrent workers
/// cannot copy the same file twice, and a file placed by an earlier run is
/// reported as [`PlacementResult::SkippedDuplicate`] instead of being
/// rewritten. Errors never panic; they are returned as
/// [`PlacementResult::CopyError`] so the batch can continue.
pub fn place(source: &Path, dest_dir: &Path, file_name: &str) -> PlacementResult {
    if let Err(e) = fs::create_dir_all(dest_dir) {
        return PlacementResult::CopyError {
            cause: format!("creating {}: {e}", dest_dir.display()),
        };
    }

    let dest = dest_dir.join(file_name);
    let mut out = match fs::OpenOptions::new().write(true).create_new(true).open(&dest) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return PlacementResult::SkippedDuplicate;
        }
        Err(e) => {
            return PlacementResult::CopyError {
                cause: format!("creating {}: {e}", dest.display()),
            };
        }
    };

    let mut src = match fs::File::open(source) {
        Ok(file) => file,
        Err(e) => {
            // Don't leave an empty destination behind a failed copy
            drop(out);
            let _ = fs::remove_file(&dest);
            return PlacementResult::CopyError {
                cause: format!("opening {}: {e}", source.display()),
            };
        }
    };

    match io::copy(&mut src, &mut out) {
        Ok(_) => PlacementResult::Copied,
        Err(e) => {
            drop(out);
            let _ = fs::remove_file(&dest);
            PlacementResult::CopyError {
                cause: format!("copying to {}: {e}", dest.display()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_file_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("photo.jpg");
        fs::write(&source, b"pixels").unwrap();
        let dest_dir = tmp.path().join("out").join("alice");

        let result = place(&source, &dest_dir, "photo.jpg");
        assert_eq!(result, PlacementResult::Copied);
        assert_eq!(fs::read(dest_dir.join("photo.jpg")).unwrap(), b"pixels");
    }

    #[test]
    fn test_existing_destination_is_skipped_not_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("photo.jpg");
        fs::write(&source, b"new").unwrap();
        let dest_dir = tmp.path().join("out");
        fs::create_dir_all(&dest_dir).unwrap();
        fs::write(dest_dir.join("photo.jpg"), b"old").unwrap();

        let result = place(&source, &dest_dir, "photo.jpg");
        assert_eq!(result, PlacementResult::SkippedDuplicate);
        assert_eq!(fs::read(dest_dir.join("photo.jpg")).unwrap(), b"old");
    }

    #[test]
    fn test_place_twice_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("photo.jpg");
        fs::write(&source, b"pixels").unwrap();
        let dest_dir = tmp.path().join("out");

        assert_eq!(place(&source, &dest_dir, "photo.jpg"), PlacementResult::Copied);
        assert_eq!(
            place(&source, &dest_dir, "photo.jpg"),
            PlacementResult::SkippedDuplicate
        );
    }

    #[test]
    fn test_missing_source_is_copy_error_without_residue() {
        let tmp = tempfile::tempdir().unwrap();
        let dest_dir = tmp.path().join("out");

        let result = place(&tmp.path().join("gone.jpg"), &dest_dir, "gone.jpg");
        assert!(matches!(result, PlacementResult::CopyError { .. }));
        assert!(!dest_dir.join("gone.jpg").exists());
    }
}
