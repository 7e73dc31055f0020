use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, ZipCleanError};

/// Where guides come from and where cleaned guides go back to
pub trait GuideStore {
    /// Paths of every guide the store knows about
    fn list_guides(&self) -> Result<Vec<PathBuf>>;
    fn load(&self, path: &Path) -> Result<Value>;
    fn save(&self, path: &Path, guide: &Value) -> Result<()>;
}

/// Guides laid out as `<root>/<guide dir>/<guide_name>` on disk
pub struct FsGuideStore {
    root: PathBuf,
    guide_name: String,
}

impl FsGuideStore {
    pub fn new(root: impl Into<PathBuf>, guide_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            guide_name: guide_name.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn guide_name(&self) -> &str {
        &self.guide_name
    }

    /// First entry of `dir` whose file name contains the guide name
    fn guide_file(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().contains(&self.guide_name))
                    .unwrap_or(false)
            })
            .collect();
        entries.sort();
        Ok(entries.into_iter().next())
    }
}

impl GuideStore for FsGuideStore {
    fn list_guides(&self) -> Result<Vec<PathBuf>> {
        let mut directories: Vec<PathBuf> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        directories.sort();

        let mut guides = Vec::new();
        for dir in directories {
            match self.guide_file(&dir) {
                Ok(Some(guide)) => guides.push(guide),
                Ok(None) => debug!("No {} in {}", self.guide_name, dir.display()),
                Err(e) => warn!("Skipping unreadable directory {}: {}", dir.display(), e),
            }
        }
        Ok(guides)
    }

    fn load(&self, path: &Path) -> Result<Value> {
        let file = File::open(path)?;
        let guide: Value = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ZipCleanError::UnparseableDocument {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        if is_empty_document(&guide) {
            return Err(ZipCleanError::UnparseableDocument {
                path: path.to_path_buf(),
                reason: "document is empty".to_string(),
            });
        }
        Ok(guide)
    }

    fn save(&self, path: &Path, guide: &Value) -> Result<()> {
        let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            serde_json::to_writer(&mut writer, guide)?;
            writer.flush()?;
        }

        temp_file.persist(path).map_err(|e| ZipCleanError::Io(e.error))?;
        Ok(())
    }
}

/// Guides held in memory, keyed by path
#[derive(Default)]
pub struct InMemoryGuideStore {
    guides: Mutex<BTreeMap<PathBuf, Value>>,
}

impl InMemoryGuideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, guide: Value) -> Result<()> {
        let mut guides = self
            .guides
            .lock()
            .map_err(|e| ZipCleanError::Storage(format!("guide store lock poisoned: {}", e)))?;
        guides.insert(path.into(), guide);
        Ok(())
    }

    pub fn get(&self, path: &Path) -> Option<Value> {
        self.guides.lock().ok()?.get(path).cloned()
    }
}

impl GuideStore for InMemoryGuideStore {
    fn list_guides(&self) -> Result<Vec<PathBuf>> {
        let guides = self
            .guides
            .lock()
            .map_err(|e| ZipCleanError::Storage(format!("guide store lock poisoned: {}", e)))?;
        Ok(guides.keys().cloned().collect())
    }

    fn load(&self, path: &Path) -> Result<Value> {
        let guide = self.get(path).ok_or_else(|| ZipCleanError::UnparseableDocument {
            path: path.to_path_buf(),
            reason: "no such guide".to_string(),
        })?;

        if is_empty_document(&guide) {
            return Err(ZipCleanError::UnparseableDocument {
                path: path.to_path_buf(),
                reason: "document is empty".to_string(),
            });
        }
        Ok(guide)
    }

    fn save(&self, path: &Path, guide: &Value) -> Result<()> {
        self.insert(path, guide.clone())
    }
}

/// `null`, `{}` and `[]` carry no guide content
fn is_empty_document(guide: &Value) -> bool {
    match guide {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_list_guides_one_per_subdirectory() {
        let root = tempdir().unwrap();
        write(&root.path().join("paris/result.json"), "{}");
        write(&root.path().join("paris/result.json.bak"), "{}");
        write(&root.path().join("boston/result.json"), "{}");
        write(&root.path().join("empty/notes.txt"), "");
        write(&root.path().join("result.json"), "{}");

        let store = FsGuideStore::new(root.path(), "result.json");
        let guides = store.list_guides().unwrap();

        assert_eq!(
            guides,
            vec![
                root.path().join("boston/result.json"),
                root.path().join("paris/result.json"),
            ]
        );
    }

    #[test]
    fn test_fs_store_settings() {
        let store = FsGuideStore::new("/srv/guides", "guide.json");
        assert_eq!(store.root(), Path::new("/srv/guides"));
        assert_eq!(store.guide_name(), "guide.json");
    }

    #[test]
    fn test_list_guides_custom_name() {
        let root = tempdir().unwrap();
        write(&root.path().join("nyc/guide.json"), "{}");
        write(&root.path().join("nyc/result.json"), "{}");

        let store = FsGuideStore::new(root.path(), "guide.json");
        assert_eq!(store.list_guides().unwrap(), vec![root.path().join("nyc/guide.json")]);
    }

    #[test]
    fn test_list_guides_missing_root_is_error() {
        let store = FsGuideStore::new("/no/such/root/for/guides", "result.json");
        assert!(matches!(store.list_guides(), Err(ZipCleanError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_guides_skips_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempdir().unwrap();
        write(&root.path().join("austin/result.json"), "{}");
        write(&root.path().join("locked/result.json"), "{}");
        let locked = root.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let store = FsGuideStore::new(root.path(), "result.json");
        let guides = store.list_guides();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Running as root can still read the locked directory
        let guides = guides.unwrap();
        assert!(guides.contains(&root.path().join("austin/result.json")));
        assert!(guides.len() <= 2);
    }

    #[test]
    fn test_load_rejects_invalid_and_empty() {
        let root = tempdir().unwrap();
        let broken = root.path().join("a/result.json");
        let empty = root.path().join("b/result.json");
        write(&broken, "{\"Cities\": [");
        write(&empty, "{}");

        let store = FsGuideStore::new(root.path(), "result.json");
        assert!(matches!(
            store.load(&broken),
            Err(ZipCleanError::UnparseableDocument { .. })
        ));
        assert!(matches!(
            store.load(&empty),
            Err(ZipCleanError::UnparseableDocument { .. })
        ));
    }

    #[test]
    fn test_save_then_load_keeps_key_order() {
        let root = tempdir().unwrap();
        let path = root.path().join("sf/result.json");
        write(&path, "{}");

        let guide = json!({"zeta": 1, "alpha": {"Cities": []}, "mid": [1, 2]});
        let store = FsGuideStore::new(root.path(), "result.json");
        store.save(&path, &guide).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, r#"{"zeta":1,"alpha":{"Cities":[]},"mid":[1,2]}"#);
        assert_eq!(store.load(&path).unwrap(), guide);
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryGuideStore::new();
        store.insert("b/result.json", json!({"Cities": []})).unwrap();
        store.insert("a/result.json", json!(null)).unwrap();

        assert_eq!(
            store.list_guides().unwrap(),
            vec![PathBuf::from("a/result.json"), PathBuf::from("b/result.json")]
        );
        assert!(store.load(Path::new("a/result.json")).is_err());
        assert!(store.load(Path::new("missing.json")).is_err());

        store.save(Path::new("b/result.json"), &json!({"Cities": [1]})).unwrap();
        assert_eq!(store.get(Path::new("b/result.json")), Some(json!({"Cities": [1]})));
    }

    #[test]
    fn test_insert_into_poisoned_store_is_error() {
        let store = InMemoryGuideStore::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.guides.lock().unwrap();
            panic!("writer died while holding the lock");
        }));

        let err = store.insert("a/result.json", json!({"Cities": []})).unwrap_err();
        assert!(matches!(err, ZipCleanError::Storage(_)));
        assert!(matches!(store.list_guides(), Err(ZipCleanError::Storage(_))));
    }
}
