/*
 *  inventory.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Folder and audio file enumeration for the two-level library
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::constants::{DEFAULT_AUDIO_EXTENSION, DEFAULT_HIDDEN_PREFIX, DEFAULT_LIBRARY_ROOT};

/// One raw directory entry as reported by the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: true }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_dir: false }
    }
}

/// Read-only directory enumeration.
pub trait DirectorySource {
    /// List the entries directly inside `path`, in enumeration order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// `DirectorySource` backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirectorySource;

impl DirectorySource for FsDirectorySource {
    /// Symlinks are followed. Entries that cannot be stat'ed are skipped.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry in {}: {}", path.display(), e);
                    continue;
                }
            };
            let is_dir = match fs::metadata(entry.path()) {
                Ok(meta) => meta.is_dir(),
                Err(e) => {
                    debug!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            // non UTF-8 names cannot be drawn, skip them
            if let Some(name) = entry.file_name().to_str() {
                entries.push(DirEntry { name: name.to_string(), is_dir });
            }
        }
        Ok(entries)
    }
}

/// Library layout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySettings {
    pub root: PathBuf,
    pub hidden_prefix: String,
    /// Extension without the leading dot.
    pub extension: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_LIBRARY_ROOT),
            hidden_prefix: DEFAULT_HIDDEN_PREFIX.to_string(),
            extension: DEFAULT_AUDIO_EXTENSION.to_string(),
        }
    }
}

/// Enumerates folders at the library root and audio files inside a folder.
///
/// Any enumeration failure degrades to an empty list; an empty list is a
/// valid state the renderer knows how to draw.
pub struct Inventory<F: DirectorySource> {
    source: F,
    settings: LibrarySettings,
    suffix: String,
}

impl<F: DirectorySource> Inventory<F> {
    pub fn new(source: F, settings: LibrarySettings) -> Self {
        let suffix = format!(".{}", settings.extension.to_ascii_lowercase());
        Self { source, settings, suffix }
    }

    pub fn settings(&self) -> &LibrarySettings {
        &self.settings
    }

    /// Top-level, non-hidden directory names.
    pub fn list_folders(&self) -> Vec<String> {
        let root = &self.settings.root;
        match self.source.read_dir(root) {
            Ok(entries) => entries
                .into_iter()
                .filter(|e| e.is_dir)
                .map(|e| base_name(&e.name).to_string())
                .filter(|name| !name.is_empty() && !self.is_hidden(name))
                .collect(),
            Err(e) => {
                debug!("Cannot list library root {}: {}", root.display(), e);
                Vec::new()
            }
        }
    }

    /// Audio file names directly inside `folder`.
    pub fn list_files(&self, folder: &str) -> Vec<String> {
        let path = self.folder_path(folder);
        match self.source.read_dir(&path) {
            Ok(entries) => entries
                .into_iter()
                .filter(|e| !e.is_dir)
                .map(|e| base_name(&e.name).to_string())
                .filter(|name| self.has_audio_extension(name))
                .collect(),
            Err(e) => {
                debug!("Cannot list folder {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Name shown on screen: the file name without the audio extension.
    pub fn display_name<'a>(&self, file_name: &'a str) -> &'a str {
        strip_extension(file_name, &self.suffix)
    }

    pub fn folder_path(&self, folder: &str) -> PathBuf {
        self.settings.root.join(folder)
    }

    pub fn file_path(&self, folder: &str, file_name: &str) -> PathBuf {
        self.settings.root.join(folder).join(file_name)
    }

    fn is_hidden(&self, name: &str) -> bool {
        !self.settings.hidden_prefix.is_empty() && name.starts_with(&self.settings.hidden_prefix)
    }

    fn has_audio_extension(&self, name: &str) -> bool {
        name.len() > self.suffix.len() && ends_with_ignore_case(name, &self.suffix)
    }
}

/// Last path component of `path`.
fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    let n = name.len();
    let s = suffix.len();
    n >= s && name.is_char_boundary(n - s) && name[n - s..].eq_ignore_ascii_case(suffix)
}

fn strip_extension<'a>(file_name: &'a str, suffix: &str) -> &'a str {
    if ends_with_ignore_case(file_name, suffix) {
        &file_name[..file_name.len() - suffix.len()]
    } else {
        file_name
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeTree;
    use super::*;

    fn settings() -> LibrarySettings {
        LibrarySettings {
            root: PathBuf::from("/data"),
            hidden_prefix: ".".to_string(),
            extension: "opus".to_string(),
        }
    }

    #[test]
    fn test_folders_skip_files_and_hidden() {
        let tree = FakeTree::default().with(
            "/data",
            vec![
                DirEntry::dir("memes"),
                DirEntry::file("readme.txt"),
                DirEntry::dir(".Trash"),
                DirEntry::dir("/data/alerts"),
            ],
        );
        let inv = Inventory::new(tree, settings());
        assert_eq!(inv.list_folders(), vec!["memes", "alerts"]);
    }

    #[test]
    fn test_folders_keep_enumeration_order() {
        let tree = FakeTree::default().with(
            "/data",
            vec![DirEntry::dir("zeta"), DirEntry::dir("alpha"), DirEntry::dir("mid")],
        );
        let inv = Inventory::new(tree, settings());
        assert_eq!(inv.list_folders(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let inv = Inventory::new(FakeTree::default(), settings());
        assert!(inv.list_folders().is_empty());
        assert!(inv.list_files("anything").is_empty());
    }

    #[test]
    fn test_files_match_extension_case_insensitive() {
        let tree = FakeTree::default().with(
            "/data/memes",
            vec![
                DirEntry::file("airhorn.opus"),
                DirEntry::file("BRUH.OPUS"),
                DirEntry::file("Mixed.Opus"),
                DirEntry::file("cover.jpg"),
                DirEntry::file("opus"),
                DirEntry::dir("nested.opus"),
            ],
        );
        let inv = Inventory::new(tree, settings());
        assert_eq!(inv.list_files("memes"), vec!["airhorn.opus", "BRUH.OPUS", "Mixed.Opus"]);
    }

    #[test]
    fn test_display_name_strips_extension() {
        let inv = Inventory::new(FakeTree::default(), settings());
        assert_eq!(inv.display_name("airhorn.opus"), "airhorn");
        assert_eq!(inv.display_name("BRUH.OPUS"), "BRUH");
        assert_eq!(inv.display_name("notes.txt"), "notes.txt");
        assert_eq!(inv.display_name("plain"), "plain");
    }

    #[test]
    fn test_paths_are_rooted() {
        let inv = Inventory::new(FakeTree::default(), settings());
        assert_eq!(inv.folder_path("memes"), PathBuf::from("/data/memes"));
        assert_eq!(inv.file_path("memes", "a.opus"), PathBuf::from("/data/memes/a.opus"));
    }

    #[test]
    fn test_fs_source_reads_real_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("alerts")).unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join("alerts").join("ding.OGG"), b"").unwrap();
        std::fs::write(dir.path().join("alerts").join("notes.md"), b"").unwrap();

        let inv = Inventory::new(
            FsDirectorySource,
            LibrarySettings {
                root: dir.path().to_path_buf(),
                hidden_prefix: ".".to_string(),
                extension: "ogg".to_string(),
            },
        );
        assert_eq!(inv.list_folders(), vec!["alerts"]);
        assert_eq!(inv.list_files("alerts"), vec!["ding.OGG"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_fs_source_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("plain")).unwrap();
        std::fs::write(elsewhere.path().join("horn.ogg"), b"").unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), dir.path().join("linked")).unwrap();

        let inv = Inventory::new(
            FsDirectorySource,
            LibrarySettings { root: dir.path().to_path_buf(), ..LibrarySettings::default() },
        );
        let mut folders = inv.list_folders();
        folders.sort();
        assert_eq!(folders, vec!["linked", "plain"]);
        assert_eq!(inv.list_files("linked"), vec!["horn.ogg"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_fs_source_skips_dangling_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("alerts")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("broken")).unwrap();

        let inv = Inventory::new(
            FsDirectorySource,
            LibrarySettings { root: dir.path().to_path_buf(), ..LibrarySettings::default() },
        );
        assert_eq!(inv.list_folders(), vec!["alerts"]);
    }
}
