use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DIR_NAME: &str = ".frogday";
pub const DATA_FILE: &str = "data.json";
pub const LOG_FILE: &str = "frogday.log";
const BACKUP_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "data.backup.";

/// Resolve the data directory: an explicit override wins, then a local
/// .frogday found by walking up from the cwd, then ~/.frogday
pub fn get_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DIR_NAME))
}

/// Find a local .frogday directory by walking up the directory tree
pub fn find_local_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Create `<parent>/.frogday`, refusing if it is already there
pub fn init_local_dir(parent: &Path) -> Result<PathBuf> {
    let dir = parent.join(DIR_NAME);
    if dir.exists() {
        anyhow::bail!("Data directory already exists: {}", dir.display());
    }

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    Ok(dir)
}

pub fn data_file(dir: &Path) -> PathBuf {
    dir.join(DATA_FILE)
}

pub fn backups_dir(dir: &Path) -> PathBuf {
    dir.join(BACKUP_DIR)
}

/// `backups/data.backup.YYYY-MM-DD.json`
pub fn backup_file(dir: &Path, date: NaiveDate) -> PathBuf {
    backups_dir(dir).join(format!("{}{}.json", BACKUP_PREFIX, date.format("%Y-%m-%d")))
}

/// Backup files, newest first. The dated names sort chronologically.
pub fn list_backups(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let backups = backups_dir(dir);
    if !backups.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(&backups)? {
        let path = entry?.path();
        let is_backup = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|name| name.starts_with(BACKUP_PREFIX) && name.ends_with(".json"))
            .unwrap_or(false);
        if is_backup {
            files.push(path);
        }
    }

    files.sort();
    files.reverse();
    Ok(files)
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory"))?;

    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read file content, None if the file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_explicit_dir_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = get_data_dir(Some(temp_dir.path())).unwrap();
        assert_eq!(dir, temp_dir.path());
    }

    #[test]
    fn test_find_local_dir_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let local = init_local_dir(temp_dir.path()).unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_local_dir(&nested), Some(local));
    }

    #[test]
    fn test_init_refuses_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        init_local_dir(temp_dir.path()).unwrap();
        assert!(init_local_dir(temp_dir.path()).is_err());
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        atomic_write(&test_file, "{}").unwrap();
        atomic_write(&test_file, "{\"a\":1}").unwrap();

        assert_eq!(read_file(&test_file).unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert_eq!(read_file(temp_dir.path().join("nope.json")).unwrap(), None);
    }

    #[test]
    fn test_backup_names_and_listing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        assert!(list_backups(dir).unwrap().is_empty());

        fs::create_dir_all(backups_dir(dir)).unwrap();
        for date in ["2024-03-01", "2024-03-03", "2024-03-02"] {
            fs::write(backup_file(dir, day(date)), "{}").unwrap();
        }
        fs::write(backups_dir(dir).join("notes.txt"), "x").unwrap();

        let names: Vec<String> = list_backups(dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "data.backup.2024-03-03.json",
                "data.backup.2024-03-02.json",
                "data.backup.2024-03-01.json"
            ]
        );
    }
}
