use chrono::Utc;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::errors::CoreError,
    core::utils::{self, ensure_dir},
    ledger::{Ledger, CURRENT_SCHEMA_VERSION},
};

use super::{Result, StorageBackend};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// JSON-file persistence rooted at the app data directory (or a custom base).
/// Saves are atomic (tmp file + rename), keep timestamped backups with a
/// bounded retention, and detect concurrent writers through the ledger's
/// revision counter.
#[derive(Clone)]
pub struct JsonStorage {
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let base = root.unwrap_or_else(utils::app_data_dir);
        ensure_dir(&base)?;
        let ledgers_dir = utils::ledgers_dir_in(&base);
        let backups_dir = utils::backups_dir_in(&base);
        ensure_dir(&ledgers_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            ledgers_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn write_backup_file(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<()> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let path = dir.join(format!("{}.{}", file_stem, BACKUP_EXTENSION));
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&path, &json)?;
        self.prune_backups(name)?;
        Ok(())
    }

    /// Copies the current on-disk file aside before it is overwritten.
    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            BACKUP_EXTENSION
        );
        fs::copy(path, dir.join(&backup_name))?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, entry);
            let _ = fs::remove_file(path);
        }
        Ok(())
    }

    /// Rejects the save when the ledger on disk moved past the revision this
    /// ledger was loaded at — another process saved in between.
    fn ensure_no_concurrent_writer(&self, ledger: &Ledger, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let on_disk = load_ledger_from_path(path)?;
        if on_disk.id == ledger.id && on_disk.revision != ledger.revision {
            return Err(CoreError::Conflict(format!(
                "ledger `{}` was saved by another writer (disk revision {}, ours {})",
                ledger.name, on_disk.revision, ledger.revision
            )));
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &mut Ledger, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        self.ensure_no_concurrent_writer(ledger, &path)?;
        self.backup_existing_file(name, &path)?;
        ledger.revision += 1;
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&path, &json)?;
        tracing::debug!(name, revision = ledger.revision, "saved ledger");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(CoreError::not_found("ledger", name));
        }
        load_ledger_from_path(&path)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|value| value.to_str()) {
                names.push(file_name.to_string());
            }
        }
        names.sort_by(|a, b| b.cmp(a));
        Ok(names)
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<()> {
        self.write_backup_file(ledger, name, note)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger> {
        let source = self.backup_path(name, backup_name);
        if !source.exists() {
            return Err(CoreError::not_found("backup", backup_name));
        }
        let ledger = load_ledger_from_path(&source)?;
        let json = serde_json::to_string_pretty(&ledger)?;
        write_atomic(&self.ledger_path(name), &json)?;
        Ok(ledger)
    }
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&data)?;
    if ledger.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Storage(format!(
            "ledger schema v{} is newer than supported v{}",
            ledger.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(ledger)
}

pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(ledger)?;
    write_atomic(path, &json)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".");
    tmp.push(TMP_SUFFIX);
    PathBuf::from(tmp)
}

fn canonical_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for character in name.trim().chars() {
        if character.is_ascii_alphanumeric() {
            slug.push(character.to_ascii_lowercase());
        } else {
            slug.push('_');
        }
    }
    if slug.is_empty() {
        slug.push_str("ledger");
    }
    slug
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let note = note?.trim();
    if note.is_empty() {
        return None;
    }
    let mut label = String::with_capacity(note.len());
    for character in note.chars() {
        if character.is_ascii_alphanumeric() {
            label.push(character.to_ascii_lowercase());
        } else if character.is_whitespace() || character == '-' || character == '_' {
            label.push('-');
        }
    }
    let label = label.trim_matches('-').to_string();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugs_everything_else() {
        assert_eq!(canonical_name("My Ledger 2024"), "my_ledger_2024");
        assert_eq!(canonical_name("  "), "ledger");
    }

    #[test]
    fn backup_note_becomes_dashed_label() {
        assert_eq!(
            sanitize_backup_note(Some("Quarter Close")).as_deref(),
            Some("quarter-close")
        );
        assert_eq!(sanitize_backup_note(Some("  ")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }
}
