use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::naming::{self, DEFAULT_LANGUAGE};

/// Normalize a directory path so that trailing separators, repeated
/// separators and interior `.` components do not change its identity.
pub fn normalize_dir(path: &Path) -> PathBuf {
    path.components().collect()
}

// ---------------------------------------------------------------------------
// GroupKey
// ---------------------------------------------------------------------------

/// Identity of a translation group: the directory plus the shared base name.
///
/// The language tag is deliberately not part of the key; it is the dimension
/// a group collects over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    directory: PathBuf,
    base_name: String,
}

impl GroupKey {
    pub fn new(directory: &Path, base_name: &str) -> Self {
        Self {
            directory: normalize_dir(directory),
            base_name: base_name.to_string(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directory.join(&self.base_name).display())
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// FileIdentity
// ---------------------------------------------------------------------------

/// Structured identity of one localization file, derived from its name.
///
/// Recomputed (never mutated) when the underlying file name changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIdentity {
    pub path: PathBuf,
    pub name: String,
    pub language: String,
    pub base_name: String,
    pub directory: PathBuf,
}

impl FileIdentity {
    /// Build the identity for `path`. Returns `None` when the path has no file
    /// name component.
    ///
    /// A name that is not valid UTF-8 is parsed in its lossy form; `path`
    /// keeps the exact bytes.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().into_owned();
        let directory = normalize_dir(path.parent().unwrap_or_else(|| Path::new("")));
        let (language, base_name) = naming::parse_file_name(&name);

        Some(Self {
            path: path.to_path_buf(),
            name,
            language,
            base_name,
            directory,
        })
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(&self.directory, &self.base_name)
    }

    pub fn is_default(&self) -> bool {
        self.language == DEFAULT_LANGUAGE
    }
}

// ---------------------------------------------------------------------------
// TranslationGroup
// ---------------------------------------------------------------------------

/// All language variants of one translation unit.
///
/// Every entry shares the group's directory and base name, and each language
/// tag appears at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationGroup {
    key: GroupKey,
    display_name: String,
    files: BTreeMap<String, FileIdentity>,
}

impl TranslationGroup {
    /// Create an empty group. `root` is the workspace root the display name is
    /// made relative to.
    pub fn new(key: GroupKey, root: &Path) -> Self {
        let display_name = display_name(root, key.directory(), key.base_name());
        Self {
            key,
            display_name,
            files: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Base name, prefixed with the directory relative to the workspace root
    /// when the group does not live in the root itself.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn directory(&self) -> &Path {
        self.key.directory()
    }

    pub fn base_name(&self) -> &str {
        self.key.base_name()
    }

    /// Insert a file, replacing any previous entry with the same language tag.
    /// Returns the replaced entry.
    pub fn insert(&mut self, file: FileIdentity) -> Option<FileIdentity> {
        debug_assert_eq!(file.group_key(), self.key, "file belongs to another group");
        self.files.insert(file.language.clone(), file)
    }

    /// Remove the entry stored for `path`, if any.
    pub fn remove_path(&mut self, path: &Path) -> Option<FileIdentity> {
        let language = self
            .files
            .iter()
            .find(|(_, f)| f.path == path)
            .map(|(lang, _)| lang.clone())?;
        self.files.remove(&language)
    }

    pub fn get(&self, language: &str) -> Option<&FileIdentity> {
        self.files.get(language)
    }

    /// The language-less source file (`"default"` entry), if present.
    pub fn source_file(&self) -> Option<&FileIdentity> {
        self.files.get(DEFAULT_LANGUAGE)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileIdentity> {
        self.files.values()
    }

    /// Language tags of this group, `"default"` first, then lexicographic.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.files.keys().map(String::as_str).collect();
        languages.sort_by(|a, b| naming::compare_languages(a, b));
        languages
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Serialize for TranslationGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TranslationGroup", 6)?;
        s.serialize_field("id", &self.key)?;
        s.serialize_field("baseName", &self.display_name)?;
        s.serialize_field("directory", self.directory())?;
        s.serialize_field("files", &self.files)?;
        s.serialize_field("sourceFile", &self.source_file())?;
        s.serialize_field("languages", &self.languages())?;
        s.end()
    }
}

/// Display name of the group `(directory, base_name)` seen from `root`.
fn display_name(root: &Path, directory: &Path, base_name: &str) -> String {
    match directory.strip_prefix(normalize_dir(root)) {
        Ok(rel) if !rel.as_os_str().is_empty() => {
            rel.join(base_name).to_string_lossy().into_owned()
        }
        _ => base_name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// WorkspaceScan
// ---------------------------------------------------------------------------

/// Result of one full scan. Owned entirely by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceScan {
    #[serde(rename = "rootPath")]
    pub root: PathBuf,
    /// Sorted by display name, ties broken by group key.
    pub groups: Vec<TranslationGroup>,
    /// Number of localization files matched.
    pub total_files: usize,
}

impl WorkspaceScan {
    pub fn find(&self, key: &GroupKey) -> Option<&TranslationGroup> {
        self.groups.iter().find(|g| g.key() == key)
    }
}

/// Deterministic group order shared by scans and index snapshots.
pub fn sort_groups(groups: &mut [TranslationGroup]) {
    groups.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.key.cmp(&b.key))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> FileIdentity {
        FileIdentity::from_path(Path::new(path)).unwrap()
    }

    fn group_in_ws(base_name: &str) -> TranslationGroup {
        let ws = Path::new("/ws");
        TranslationGroup::new(GroupKey::new(ws, base_name), ws)
    }

    #[test]
    fn test_group_key_ignores_trailing_separator() {
        let a = GroupKey::new(Path::new("/ws/res/"), "messages");
        let b = GroupKey::new(Path::new("/ws/res"), "messages");
        let c = GroupKey::new(Path::new("/ws//./res"), "messages");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_group_key_distinguishes_directory_and_base_name() {
        let a = GroupKey::new(Path::new("/ws/a"), "x");
        assert_ne!(a, GroupKey::new(Path::new("/ws/b"), "x"));
        assert_ne!(a, GroupKey::new(Path::new("/ws/a"), "y"));
    }

    #[test]
    fn test_file_identity_from_path() {
        let id = file("/ws/res/de.messages.xlf");
        assert_eq!(id.name, "de.messages.xlf");
        assert_eq!(id.language, "de");
        assert_eq!(id.base_name, "messages");
        assert_eq!(id.directory, PathBuf::from("/ws/res"));
        let key = GroupKey::new(Path::new("/ws/res"), "messages");
        assert_eq!(id.group_key(), key);
        assert!(!id.is_default());
    }

    #[test]
    fn test_display_name_relative_to_root() {
        let root = Path::new("/ws");
        let nested_key = GroupKey::new(Path::new("/ws/a/b"), "labels");
        let nested = TranslationGroup::new(nested_key, root);
        assert_eq!(
            nested.display_name(),
            Path::new("a").join("b").join("labels").to_string_lossy()
        );

        let top = TranslationGroup::new(GroupKey::new(Path::new("/ws/"), "labels"), root);
        assert_eq!(top.display_name(), "labels");
    }

    #[test]
    fn test_insert_replaces_same_language_and_tracks_source() {
        let mut group = group_in_ws("messages");

        assert!(group.source_file().is_none());
        group.insert(file("/ws/messages.xlf"));
        group.insert(file("/ws/de.messages.xlf"));
        assert_eq!(group.len(), 2);
        assert_eq!(group.source_file().unwrap().name, "messages.xlf");

        // `.xliff` source replaces the `.xlf` one: same tag, same group.
        let replaced = group.insert(file("/ws/messages.xliff"));
        assert_eq!(replaced.unwrap().name, "messages.xlf");
        assert_eq!(group.len(), 2);
        assert_eq!(group.source_file().unwrap().name, "messages.xliff");
    }

    #[test]
    fn test_remove_path_only_matches_stored_path() {
        let mut group = group_in_ws("messages");
        group.insert(file("/ws/messages.xliff"));

        assert!(group.remove_path(Path::new("/ws/messages.xlf")).is_none());
        assert!(group.remove_path(Path::new("/ws/messages.xliff")).is_some());
        assert!(group.is_empty());
        assert!(group.source_file().is_none());
    }

    #[test]
    fn test_languages_default_first() {
        let mut group = group_in_ws("m");
        for path in ["/ws/fr.m.xlf", "/ws/m.xlf", "/ws/de.m.xlf"] {
            group.insert(file(path));
        }
        assert_eq!(group.languages(), vec!["default", "de", "fr"]);
    }

    #[test]
    fn test_group_serializes_source_file_and_languages() {
        let mut group = group_in_ws("m");
        group.insert(file("/ws/en.m.xlf"));

        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["baseName"], "m");
        assert!(json["sourceFile"].is_null());
        assert_eq!(json["files"]["en"]["baseName"], "m");
        assert_eq!(json["languages"][0], "en");
    }
}
