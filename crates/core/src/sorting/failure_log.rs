use std::io;
use std::path::Path;

use crate::sorting::outcome::FailureRecord;

/// Write the failure log: one failed file name per line, overwriting any
/// previous run's log. Nothing is written when there are no failures.
pub fn write(path: &Path, failures: &[FailureRecord]) -> io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    let mut contents = String::new();
    for record in failures {
        contents.push_str(&record.file_name);
        contents.push('\n');
    }
    std::fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::outcome::FailureStage;
    use std::fs;

    fn record(name: &str, stage: FailureStage) -> FailureRecord {
        FailureRecord {
            file_name: name.into(),
            stage,
        }
    }

    #[test]
    fn test_writes_one_name_per_line() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("copy_failed.log");

        write(
            &path,
            &[
                record("a.jpg", FailureStage::Extraction),
                record("b.jpg", FailureStage::Copy),
            ],
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a.jpg\nb.jpg\n");
    }

    #[test]
    fn test_no_failures_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("copy_failed.log");
        write(&path, &[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_overwrites_previous_log() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("copy_failed.log");
        fs::write(&path, "stale.jpg\nstale2.jpg\n").unwrap();

        write(&path, &[record("fresh.jpg", FailureStage::Copy)]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh.jpg\n");
    }
}
