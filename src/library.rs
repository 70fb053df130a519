//! Local collection scanning and the album-keyed tag index.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lofty::file::TaggedFileExt;
use lofty::prelude::{Accessor, AudioFile};
use lofty::probe::Probe;
use lofty::tag::ItemKey;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Audio file extensions accepted when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp3", "flac", "wav"];

/// A local audio file with usable tags. Files without a title never make it
/// into one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    /// kbps, 0 when the container does not report one
    pub bitrate: u32,
    pub duration_secs: f64,
}

/// All local files sharing one album key, original tag case preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumGroup {
    pub title: String,
    pub artist: String,
    pub tracks: Vec<LocalFile>,
}

/// Album groups keyed by lowercased album key.
#[derive(Debug, Default, PartialEq)]
pub struct AlbumIndex {
    groups: HashMap<String, AlbumGroup>,
}

impl AlbumIndex {
    /// Probe keys are lowercased to match the stored keys.
    pub fn get(&self, key: &str) -> Option<&AlbumGroup> {
        self.groups.get(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Computes the `"artist - album"` grouping key for a set of file tags.
///
/// The album artist wins over the track artist unless it is absent or empty.
/// Both parts are trimmed, empty parts are skipped, and a file with neither
/// part ends up under the literal key `Unknown`.
pub fn album_key(album_artist: Option<&str>, artist: Option<&str>, album: Option<&str>) -> String {
    let artist = match album_artist {
        Some(s) if !s.is_empty() => s,
        _ => artist.unwrap_or(""),
    }
    .trim();
    let album = album.unwrap_or("").trim();

    if artist.is_empty() && album.is_empty() {
        return "Unknown".to_owned();
    }
    [artist, album]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Walks `root` recursively and returns every file whose extension matches
/// the accepted set (case-sensitive), in file-name-sorted traversal order.
pub fn audio_files(root: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if extensions.contains(&ext) {
            files.push(path.to_path_buf());
        }
    }
    files
}

/// Reads the tags of one audio file. `None` when the tags cannot be read or
/// carry no title.
pub fn read_file(path: &Path) -> Option<LocalFile> {
    let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(f) => f,
        Err(err) => {
            warn!("failed to read tags from {}: {err}", path.display());
            return None;
        }
    };

    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag())?;
    let Some(title) = tag.title().map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()) else {
        debug!("skipping {}: no title tag", path.display());
        return None;
    };

    let properties = tagged_file.properties();
    Some(LocalFile {
        path: path.to_path_buf(),
        title,
        artist: tag.artist().map(|s| s.to_string()),
        album_artist: tag.get_string(&ItemKey::AlbumArtist).map(str::to_owned),
        album: tag.album().map(|s| s.to_string()),
        bitrate: properties.audio_bitrate().unwrap_or(0),
        duration_secs: properties.duration().as_secs_f64(),
    })
}

/// Groups files into album groups keyed by lowercased album key.
pub fn build_index(files: impl IntoIterator<Item = LocalFile>) -> AlbumIndex {
    let mut groups: HashMap<String, AlbumGroup> = HashMap::new();

    for file in files {
        let key = album_key(
            file.album_artist.as_deref(),
            file.artist.as_deref(),
            file.album.as_deref(),
        );
        let group = groups.entry(key.to_lowercase()).or_insert_with(|| {
            let artist = match file.album_artist.as_deref() {
                Some(s) if !s.is_empty() => s,
                _ => file.artist.as_deref().unwrap_or(""),
            };
            AlbumGroup {
                title: file.album.as_deref().unwrap_or("").trim().to_owned(),
                artist: artist.trim().to_owned(),
                tracks: Vec::new(),
            }
        });
        group.tracks.push(file);
    }

    AlbumIndex { groups }
}

/// Scans a directory tree into an album index. A file whose tags cannot be
/// read is skipped without aborting the walk.
pub fn scan(root: &Path, extensions: &[&str]) -> AlbumIndex {
    if !root.is_dir() {
        warn!("source directory does not exist: {}", root.display());
        return AlbumIndex::default();
    }
    build_index(audio_files(root, extensions).iter().filter_map(|path| read_file(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(
        title: &str,
        artist: Option<&str>,
        album_artist: Option<&str>,
        album: Option<&str>,
        path: &str,
    ) -> LocalFile {
        LocalFile {
            path: PathBuf::from(path),
            title: title.to_owned(),
            artist: artist.map(str::to_owned),
            album_artist: album_artist.map(str::to_owned),
            album: album.map(str::to_owned),
            bitrate: 320,
            duration_secs: 200.0,
        }
    }

    #[test]
    fn test_album_key_artist_and_album() {
        assert_eq!(album_key(None, Some("Baz"), Some("Bar")), "Baz - Bar");
    }

    #[test]
    fn test_album_key_album_artist_preferred() {
        assert_eq!(album_key(Some("Various"), Some("Baz"), Some("Bar")), "Various - Bar");
    }

    #[test]
    fn test_album_key_empty_album_artist_falls_back() {
        assert_eq!(album_key(Some(""), Some("Baz"), Some("Bar")), "Baz - Bar");
    }

    #[test]
    fn test_album_key_trims_parts() {
        assert_eq!(album_key(None, Some("  Baz "), Some(" Bar  ")), "Baz - Bar");
    }

    #[test]
    fn test_album_key_missing_artist() {
        assert_eq!(album_key(None, None, Some("Bar")), "Bar");
    }

    #[test]
    fn test_album_key_missing_album() {
        assert_eq!(album_key(None, Some("Baz"), None), "Baz");
    }

    #[test]
    fn test_album_key_unknown() {
        assert_eq!(album_key(None, None, None), "Unknown");
        assert_eq!(album_key(Some("  "), Some(" "), Some("")), "Unknown");
    }

    #[test]
    fn test_build_index_groups_by_key() {
        let index = build_index([
            file("Foo", Some("Baz"), None, Some("Bar"), "/x/foo.mp3"),
            file("Quux", Some("Baz"), None, Some("Bar"), "/x/quux.mp3"),
            file("Other", Some("Zed"), None, Some("Alt"), "/y/other.mp3"),
        ]);
        assert_eq!(index.len(), 2);
        let group = index.get("Baz - Bar").unwrap();
        assert_eq!(group.artist, "Baz");
        assert_eq!(group.title, "Bar");
        assert_eq!(group.tracks.len(), 2);
    }

    #[test]
    fn test_build_index_case_insensitive_lookup() {
        let index = build_index([file("Foo", Some("Baz"), None, Some("Bar"), "/x/foo.mp3")]);
        assert!(index.get("baz - bar").is_some());
        assert!(index.get("BAZ - BAR").is_some());
        assert!(index.get("Baz - Other").is_none());
    }

    #[test]
    fn test_build_index_preserves_original_case() {
        let index = build_index([file("Foo", Some("BaZ"), None, Some("BaR"), "/x/foo.mp3")]);
        let group = index.get("baz - bar").unwrap();
        assert_eq!(group.artist, "BaZ");
        assert_eq!(group.title, "BaR");
    }

    #[test]
    fn test_build_index_every_file_in_exactly_one_group() {
        let files = vec![
            file("A", Some("X"), None, Some("P"), "/1.mp3"),
            file("B", None, None, None, "/2.mp3"),
            file("C", Some("Y"), Some("Z"), Some("Q"), "/3.mp3"),
        ];
        let index = build_index(files.clone());
        assert_eq!(index.len(), 3);
        let total: usize = ["X - P", "Unknown", "Z - Q"]
            .iter()
            .map(|key| index.get(key).unwrap().tracks.len())
            .sum();
        assert_eq!(total, files.len());
    }

    #[test]
    fn test_build_index_group_order_follows_input() {
        let index = build_index([
            file("First", Some("Baz"), None, Some("Bar"), "/x/1.mp3"),
            file("Second", Some("Baz"), None, Some("Bar"), "/x/2.mp3"),
        ]);
        let titles: Vec<&str> = index
            .get("Baz - Bar")
            .unwrap()
            .tracks
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, ["First", "Second"]);
    }

    #[test]
    fn test_audio_files_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("c.MP3"), b"x").unwrap();
        std::fs::write(dir.path().join("noext"), b"x").unwrap();
        std::fs::write(dir.path().join("sub").join("d.flac"), b"x").unwrap();

        let files = audio_files(dir.path(), DEFAULT_EXTENSIONS);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, ["a.mp3", "d.flac"]);
    }

    #[test]
    fn test_scan_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("junk.mp3"), b"not really audio").unwrap();
        let index = scan(dir.path(), DEFAULT_EXTENSIONS);
        assert!(index.is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let index = scan(Path::new("/does/not/exist"), DEFAULT_EXTENSIONS);
        assert!(index.is_empty());
    }
}
