/*
 *  selection.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Folder/file view, cursors and the visible scroll window
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

use log::info;

/// Which browsing level is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Folders,
    Files,
}

/// Result of a navigation request, used by the caller to decide whether the
/// marquee, the selection colour and the screen need to be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Unchanged,
    Moved,
    Entered,
    Exited,
}

impl SelectionChange {
    pub fn changed(self) -> bool {
        self != SelectionChange::Unchanged
    }
}

/// Cursor state for both lists plus the scroll window of the active one.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    view: View,
    folders: Vec<String>,
    files: Vec<String>,
    folder_cursor: usize,
    file_cursor: usize,
    active_folder: Option<String>,
    scroll_offset: usize,
    visible_items: usize,
}

impl SelectionModel {
    pub fn new(folders: Vec<String>, visible_items: usize) -> Self {
        Self {
            view: View::Folders,
            folders,
            files: Vec::new(),
            folder_cursor: 0,
            file_cursor: 0,
            active_folder: None,
            scroll_offset: 0,
            visible_items: visible_items.max(1),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Entries of the active view.
    pub fn entries(&self) -> &[String] {
        match self.view {
            View::Folders => &self.folders,
            View::Files => &self.files,
        }
    }

    /// Cursor of the active view.
    pub fn cursor(&self) -> usize {
        match self.view {
            View::Folders => self.folder_cursor,
            View::Files => self.file_cursor,
        }
    }

    /// Folder most recently entered, kept after returning to the folder view.
    pub fn active_folder(&self) -> Option<&str> {
        self.active_folder.as_deref()
    }

    /// Selected entry of the active view, if the list is not empty.
    pub fn selected(&self) -> Option<&str> {
        self.entries().get(self.cursor()).map(String::as_str)
    }

    /// Enter the selected folder. `load_files` is asked for the folder's entries.
    pub fn enter<L>(&mut self, load_files: L) -> SelectionChange
    where
        L: FnOnce(&str) -> Vec<String>,
    {
        if self.view != View::Folders || self.folders.is_empty() {
            return SelectionChange::Unchanged;
        }
        let folder = self.folders[self.folder_cursor].clone();
        self.files = load_files(&folder);
        info!("Entered folder '{}' ({} files)", folder, self.files.len());
        self.active_folder = Some(folder);
        self.file_cursor = 0;
        self.scroll_offset = 0;
        self.view = View::Files;
        SelectionChange::Entered
    }

    /// Return to the folder list. The folder cursor is left where it was.
    pub fn exit(&mut self) -> SelectionChange {
        if self.view != View::Files {
            return SelectionChange::Unchanged;
        }
        info!("Back to folder list");
        self.view = View::Folders;
        self.scroll_offset = 0;
        SelectionChange::Exited
    }

    pub fn move_next(&mut self) -> SelectionChange {
        let n = self.entries().len();
        if n == 0 {
            return SelectionChange::Unchanged;
        }
        let next = (self.cursor() + 1) % n;
        self.set_cursor(next);
        SelectionChange::Moved
    }

    /// Step back one entry. In the file view, stepping back from the first
    /// entry leaves the folder instead of wrapping.
    pub fn move_previous(&mut self) -> SelectionChange {
        if self.view == View::Files && self.file_cursor == 0 {
            return self.exit();
        }
        let n = self.entries().len();
        if n == 0 {
            return SelectionChange::Unchanged;
        }
        let prev = (self.cursor() + n - 1) % n;
        self.set_cursor(prev);
        SelectionChange::Moved
    }

    /// First visible row. Recomputed on every call so the cursor is always
    /// inside `[offset, offset + visible_items)`.
    pub fn scroll_offset(&mut self) -> usize {
        let cursor = self.cursor();
        if cursor < self.scroll_offset {
            self.scroll_offset = cursor;
        } else if cursor >= self.scroll_offset + self.visible_items {
            self.scroll_offset = cursor + 1 - self.visible_items;
        }
        self.scroll_offset
    }

    fn set_cursor(&mut self, index: usize) {
        match self.view {
            View::Folders => self.folder_cursor = index,
            View::Files => self.file_cursor = index,
        }
    }
}
