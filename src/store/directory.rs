//! Object store backed by a local directory tree
//!
//! Each bucket is a directory under the root and each key is a relative file
//! path inside it, with `/` as the separator.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::{ObjectEntry, ObjectStore};
use crate::defaults::KEY_SEPARATOR;
use crate::error::{Error, Result};

/// Local directories served as buckets
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a file path, refusing keys that escape the bucket
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || bucket.is_empty() || bucket.contains(KEY_SEPARATOR) {
            return Err(Error::transport("resolve", key, "key escapes the bucket"));
        }
        Ok(self.root.join(bucket).join(relative))
    }
}

impl ObjectStore for DirectoryStore {
    fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectEntry>> {
        // "a/b/ph" lists directory "a/b" for names starting with "ph"
        let (dir_part, stem) = match prefix.rfind(KEY_SEPARATOR) {
            Some(pos) => (&prefix[..=pos], &prefix[pos + 1..]),
            None => ("", prefix),
        };
        let dir = self.object_path(bucket, dir_part)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| Error::transport("list", prefix, e))?;
            if !entry.file_type().is_file() {
                // Sub-directories are rolled up like a delimited listing
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name.starts_with(stem) {
                entries.push(ObjectEntry::object(format!("{}{}", dir_part, name)));
            }
        }
        Ok(entries)
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound {
                key: key.to_string(),
            },
            _ => Error::transport("get", key, e),
        })
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<bool> {
        Ok(self.object_path(bucket, key)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bucket_with(files: &[&str]) -> (TempDir, DirectoryStore) {
        let temp = TempDir::new().unwrap();
        for file in files {
            let path = temp.path().join("photos").join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file.as_bytes()).unwrap();
        }
        let store = DirectoryStore::new(temp.path());
        (temp, store)
    }

    #[test]
    fn test_list_objects_direct_children_sorted() {
        let (_temp, store) =
            bucket_with(&["vacation/b.jpg", "vacation/a.jpg", "vacation/day1/c.jpg"]);
        let keys: Vec<String> = store
            .list_objects("photos", "vacation/")
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(keys, vec!["vacation/a.jpg", "vacation/b.jpg"]);
    }

    #[test]
    fn test_list_objects_with_partial_name_prefix() {
        let (_temp, store) = bucket_with(&["vacation/beach.jpg", "vacation/city.jpg"]);
        let entries = store.list_objects("photos", "vacation/be").unwrap();
        assert_eq!(entries, vec![ObjectEntry::object("vacation/beach.jpg")]);
    }

    #[test]
    fn test_list_objects_missing_prefix_is_empty() {
        let (_temp, store) = bucket_with(&["vacation/a.jpg"]);
        assert!(store.list_objects("photos", "wedding/").unwrap().is_empty());
    }

    #[test]
    fn test_get_object_and_not_found() {
        let (_temp, store) = bucket_with(&["vacation/a.jpg"]);
        assert_eq!(
            store.get_object("photos", "vacation/a.jpg").unwrap(),
            b"vacation/a.jpg"
        );
        assert!(store
            .get_object("photos", "vacation/ordering.yaml")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_head_object() {
        let (_temp, store) = bucket_with(&["vacation/a.jpg"]);
        assert!(store.head_object("photos", "vacation/a.jpg").unwrap());
        assert!(!store.head_object("photos", "vacation/b.jpg").unwrap());
        assert!(!store.head_object("photos", "vacation").unwrap());
    }

    #[test]
    fn test_keys_cannot_escape_bucket() {
        let (_temp, store) = bucket_with(&["vacation/a.jpg"]);
        assert!(store.get_object("photos", "../secret").is_err());
        assert!(store.head_object("photos", "/etc/passwd").is_err());
    }
}
