//! Gallery entries: classification and ordering

use app_fs::RawEntry;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Extensions shown as images (compared lowercase)
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

const FILE_URI_PREFIX: &str = "file://";

/// What a listing entry is, for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    Image,
    Unknown,
}

impl EntryKind {
    /// Position of the kind in a sorted listing
    fn rank(self) -> u8 {
        match self {
            EntryKind::Folder => 0,
            EntryKind::Image => 1,
            EntryKind::Unknown => 2,
        }
    }
}

/// One classified item of a directory listing.
///
/// Image entries always carry a `display_source`; other kinds never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub path: String,
    display_source: Option<String>,
}

impl Entry {
    pub fn folder(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Folder,
            path: path.into(),
            display_source: None,
        }
    }

    pub fn image(name: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: name.into(),
            kind: EntryKind::Image,
            display_source: Some(display_source_for(&path)),
            path,
        }
    }

    pub fn unknown(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Unknown,
            path: path.into(),
            display_source: None,
        }
    }

    /// Classify a raw listing item found in `dir`
    pub fn classify(dir: &Path, raw: &RawEntry) -> Self {
        let path = dir.join(&raw.name).to_string_lossy().to_string();

        if raw.is_directory {
            Self::folder(&raw.name, path)
        } else if is_image_name(&raw.name) {
            Self::image(&raw.name, path)
        } else {
            Self::unknown(&raw.name, path)
        }
    }

    /// URI the UI resolves to show the image
    pub fn display_source(&self) -> Option<&str> {
        self.display_source.as_deref()
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    pub fn is_image(&self) -> bool {
        self.kind == EntryKind::Image
    }
}

/// Check the extension of a file name against [`IMAGE_EXTENSIONS`]
pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn display_source_for(path: &str) -> String {
    format!("{}{}", FILE_URI_PREFIX, path)
}

/// Map a display source back to a local path
pub fn resolve_display_source(source: &str) -> Option<PathBuf> {
    source
        .strip_prefix(FILE_URI_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(PathBuf::from)
}

/// Listing order: folders, then images, then everything else.
/// Names compare case-insensitively; names equal up to case put lowercase first.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    a.kind
        .rank()
        .cmp(&b.kind.rank())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| b.name.cmp(&a.name))
        .then_with(|| a.path.cmp(&b.path))
}

pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare_entries);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions_case_insensitive() {
        assert!(is_image_name("a.JPG"));
        assert!(is_image_name("b.Jpeg"));
        assert!(is_image_name("c.webp"));
        assert!(!is_image_name("d.tiff"));
        assert!(!is_image_name("png"));
        assert!(!is_image_name("notes.txt"));
    }

    #[test]
    fn test_classify() {
        let dir = Path::new("/x");

        let folder = Entry::classify(dir, &RawEntry::dir("Sub.png"));
        assert_eq!(folder.kind, EntryKind::Folder);
        assert_eq!(folder.display_source(), None);

        let image = Entry::classify(dir, &RawEntry::file("b.PNG"));
        assert_eq!(image.kind, EntryKind::Image);
        assert_eq!(image.path, Path::new("/x").join("b.PNG").to_string_lossy());
        assert!(image.display_source().unwrap().starts_with("file://"));

        let other = Entry::classify(dir, &RawEntry::file("notes.txt"));
        assert_eq!(other.kind, EntryKind::Unknown);
    }

    #[test]
    fn test_display_source_round_trip() {
        let image = Entry::image("a.jpg", "/x/a.jpg");
        let resolved = resolve_display_source(image.display_source().unwrap());
        assert_eq!(resolved, Some(PathBuf::from("/x/a.jpg")));

        assert_eq!(resolve_display_source("https://example.com/a.jpg"), None);
        assert_eq!(resolve_display_source("file://"), None);
    }

    #[test]
    fn test_sort_folders_images_unknown() {
        let mut entries = vec![
            Entry::unknown("notes.txt", "/x/notes.txt"),
            Entry::image("b.png", "/x/b.png"),
            Entry::folder("A", "/x/A"),
        ];
        sort_entries(&mut entries);

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "b.png", "notes.txt"]);
    }

    #[test]
    fn test_sort_names_within_kind() {
        let mut entries = vec![
            Entry::image("B.png", "/x/B.png"),
            Entry::image("b.png", "/x/b.png"),
            Entry::image("a.png", "/x/a.png"),
            Entry::folder("zeta", "/x/zeta"),
            Entry::folder("Alpha", "/x/Alpha"),
        ];
        sort_entries(&mut entries);

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "zeta", "a.png", "b.png", "B.png"]);
    }

    #[test]
    fn test_sort_is_deterministic() {
        let forward = vec![
            Entry::image("x.png", "/a/x.png"),
            Entry::unknown("x.png", "/b/x.png"),
            Entry::folder("m", "/a/m"),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let mut a = forward;
        sort_entries(&mut a);
        sort_entries(&mut reversed);
        assert_eq!(a, reversed);
    }
}
