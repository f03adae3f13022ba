use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::PersistError;

/// Write `value` as pretty JSON to `path`, replacing any previous file only
/// once the new one is fully on disk.
pub fn save_snapshot<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_path_for(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

/// Read a snapshot. `Ok(None)` when the file does not exist.
pub fn load_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(value))
}

/// Save, logging instead of returning a failure. Nothing retries a failed write.
pub fn save_logged<T: Serialize>(path: &Path, value: &T, what: &str) -> bool {
    match save_snapshot(path, value) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "saved {what}");
            true
        }
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "failed to save {what}");
            false
        }
    }
}

/// Load a snapshot or fall back to a fresh default.
///
/// A missing file starts fresh and writes the initial snapshot straight away.
/// An unreadable or unparsable file is logged and also starts fresh; the bad
/// file is left in place until the next save overwrites it.
pub fn load_or_init<T>(path: &Path, what: &str) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    tracing::info!(path = %path.display(), "loading {what}");
    match load_snapshot(path) {
        Ok(Some(value)) => value,
        Ok(None) => {
            let value = T::default();
            save_logged(path, &value, what);
            value
        }
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "failed to load {what}, starting empty");
            T::default()
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("snapshot.json");
    let tmp_name = format!("{file_name}.tmp");
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClaimSnapshot;

    #[test]
    fn missing_file_starts_fresh_and_writes_initial_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");

        let loaded: ClaimSnapshot = load_or_init(&path, "claims");
        assert_eq!(loaded, ClaimSnapshot::default());
        assert!(path.exists());
        let reread: Option<ClaimSnapshot> = load_snapshot(&path).unwrap();
        assert_eq!(reread, Some(ClaimSnapshot::default()));
    }

    #[test]
    fn corrupt_file_starts_fresh_and_can_be_saved_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");
        fs::write(&path, "{\"owners\": {\"1\": ").unwrap();

        let loaded: ClaimSnapshot = load_or_init(&path, "claims");
        assert_eq!(loaded, ClaimSnapshot::default());

        let mut snapshot = ClaimSnapshot::default();
        snapshot.owners.insert(1, 2);
        save_snapshot(&path, &snapshot).unwrap();
        let reread: Option<ClaimSnapshot> = load_snapshot(&path).unwrap();
        assert_eq!(reread, Some(snapshot));
    }

    #[test]
    fn save_creates_parent_directories_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sieges.json");
        save_snapshot(&path, &ClaimSnapshot::default()).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("nested").join("sieges.json.tmp").exists());
    }

    #[test]
    fn save_into_unwritable_location_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        // Parent is a regular file, so the directory cannot be created.
        let path = blocker.join("claims.json");
        assert!(save_snapshot(&path, &ClaimSnapshot::default()).is_err());
        assert!(!save_logged(&path, &ClaimSnapshot::default(), "claims"));
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let result: Result<Option<ClaimSnapshot>, _> = load_snapshot(&path);
        assert!(matches!(result, Err(PersistError::Json(_))));
    }
}
