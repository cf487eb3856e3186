//! Search history of looked-up locations.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::model::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A location that has not been stored yet; the store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Persistence for the location history.
///
/// Ids start at 1, increase with every insert and are never reused, so
/// `list_all` in id order is insertion order.
pub trait LocationStore {
    fn insert(&mut self, location: NewLocation) -> Result<Location>;
    fn get(&self, id: u32) -> Result<Option<Location>>;
    fn list_all(&self) -> Result<Vec<Location>>;
    fn delete_all(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct HistoryRecords {
    last_id: u32,
    locations: Vec<Location>,
}

impl HistoryRecords {
    fn push(&mut self, location: NewLocation) -> Location {
        self.last_id += 1;
        let stored = Location {
            id: self.last_id,
            name: location.name,
            latitude: location.latitude,
            longitude: location.longitude,
        };
        self.locations.push(stored.clone());
        stored
    }

    fn get(&self, id: u32) -> Option<Location> {
        self.locations.iter().find(|l| l.id == id).cloned()
    }

    fn sorted(&self) -> Vec<Location> {
        let mut all = self.locations.clone();
        all.sort_by_key(|l| l.id);
        all
    }

    fn clear(&mut self) {
        self.locations.clear();
    }
}

/// History kept in process memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HistoryRecords,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationStore for MemoryStore {
    fn insert(&mut self, location: NewLocation) -> Result<Location> {
        Ok(self.records.push(location))
    }

    fn get(&self, id: u32) -> Result<Option<Location>> {
        Ok(self.records.get(id))
    }

    fn list_all(&self) -> Result<Vec<Location>> {
        Ok(self.records.sorted())
    }

    fn delete_all(&mut self) -> Result<()> {
        self.records.clear();
        Ok(())
    }
}

/// History persisted as a JSON file. The file is created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read(&self) -> Result<HistoryRecords> {
        if !self.path.exists() {
            return Ok(HistoryRecords::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history file: {}", self.path.display()))
    }

    /// Replace the file atomically: write a sibling temp file, then rename it over the old one.
    fn write(&self, records: &HistoryRecords) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create history directory: {}", parent.display())
        })?;

        let mut tmp = NamedTempFile::new_in(parent).with_context(|| {
            format!("Failed to create temporary history file in {}", parent.display())
        })?;

        serde_json::to_writer_pretty(&mut tmp, records)
            .context("Failed to serialize location history")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to flush temporary history file")?;

        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        Ok(())
    }
}

impl LocationStore for JsonFileStore {
    fn insert(&mut self, location: NewLocation) -> Result<Location> {
        let mut records = self.read()?;
        let stored = records.push(location);
        self.write(&records)?;

        debug!(id = stored.id, name = %stored.name, "saved location to history");
        Ok(stored)
    }

    fn get(&self, id: u32) -> Result<Option<Location>> {
        Ok(self.read()?.get(id))
    }

    fn list_all(&self) -> Result<Vec<Location>> {
        Ok(self.read()?.sorted())
    }

    fn delete_all(&mut self) -> Result<()> {
        let mut records = self.read()?;
        records.clear();
        self.write(&records)?;

        debug!(path = %self.path.display(), "cleared location history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_location(name: &str, latitude: f64, longitude: f64) -> NewLocation {
        NewLocation {
            name: name.to_string(),
            latitude,
            longitude,
        }
    }

    fn exercise_store(store: &mut dyn LocationStore) {
        assert!(store.list_all().expect("list").is_empty());

        let first = store.insert(new_location("Mumbai", 19.1, 72.87)).expect("insert");
        let second = store.insert(new_location("Delhi", 28.6, 77.2)).expect("insert");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let names: Vec<_> = store
            .list_all()
            .expect("list")
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Mumbai", "Delhi"]);

        assert_eq!(store.get(2).expect("get"), Some(second));
        assert_eq!(store.get(7).expect("get"), None);

        store.delete_all().expect("delete");
        assert!(store.list_all().expect("list").is_empty());

        let third = store.insert(new_location("Pune", 18.5, 73.8)).expect("insert");
        assert_eq!(third.id, 3, "ids are not reused after clearing");
    }

    #[test]
    fn memory_store_behaves_like_a_history() {
        exercise_store(&mut MemoryStore::new());
    }

    #[test]
    fn file_store_behaves_like_a_history() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonFileStore::new(dir.path().join("nested").join("history.json"));

        exercise_store(&mut store);
    }

    #[test]
    fn file_store_persists_between_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");

        let mut store = JsonFileStore::new(path.clone());
        store.insert(new_location("Mumbai", 19.1, 72.87)).expect("insert");

        let reopened = JsonFileStore::new(path);
        let all = reopened.list_all().expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].coordinates(), Coordinates::new(19.1, 72.87));
    }

    #[test]
    fn writes_leave_no_temporary_files_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");
        let mut store = JsonFileStore::new(path.clone());

        store.insert(new_location("Mumbai", 19.1, 72.87)).expect("insert");
        store.insert(new_location("Delhi", 28.6, 77.2)).expect("insert");
        store.delete_all().expect("delete");

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("read dir")
            .map(|e| e.expect("entry").path())
            .collect();
        assert_eq!(entries, vec![path]);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("absent.json"));

        assert!(store.list_all().expect("list").is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").expect("write");

        let err = JsonFileStore::new(path).list_all().unwrap_err();
        assert!(err.to_string().contains("Failed to parse history file"));
    }
}
