//! Extended M3U rendering and persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Error;

/// Renders an extended M3U playlist as newline-joined UTF-8 text.
///
/// Fails when `paths` is empty. A missing cover or track file is warned
/// about but still emitted. When `base_dir` names an existing directory,
/// the cover and every track path are rewritten relative to it.
pub fn render(
    paths: &[PathBuf],
    cover: Option<&str>,
    title: Option<&str>,
    base_dir: Option<&Path>,
) -> Result<String, Error> {
    if paths.is_empty() {
        return Err(Error::EmptyTracklist);
    }

    let mut lines = vec!["#EXTM3U".to_owned(), "#EXTENC:UTF-8".to_owned()];

    let base_dir = base_dir.filter(|dir| {
        let valid = dir.is_dir();
        if !valid {
            warn!("playlist path is not a valid or existing directory: {}", dir.display());
        }
        valid
    });

    if let Some(cover) = cover.filter(|c| !c.is_empty()) {
        let cover_path = Path::new(cover);
        if !cover_path.is_file() {
            warn!("playlist cover is not a valid or existing file: {cover}");
        }
        let cover = match base_dir {
            Some(base) => relative_to(cover_path, base).display().to_string(),
            None => cover.to_owned(),
        };
        lines.push(format!("#EXTIMG:{cover}"));
    }

    if let Some(title) = title.filter(|t| !t.is_empty()) {
        lines.push(format!("#PLAYLIST:{title}"));
    }

    for path in paths {
        if !path.is_file() {
            warn!("not a valid or existing file: {}", path.display());
        }
        let line = match base_dir {
            Some(base) => relative_to(path, base).display().to_string(),
            None => path.display().to_string(),
        };
        lines.push(line);
    }

    Ok(lines.join("\n"))
}

/// Renders and writes the playlist to `target`. With `relative_paths` the
/// base directory is the target file's own parent.
pub fn save(
    target: &Path,
    paths: &[PathBuf],
    cover: Option<&str>,
    title: Option<&str>,
    relative_paths: bool,
) -> anyhow::Result<()> {
    let base_dir = if relative_paths { target.parent() } else { None };
    let rendered = render(paths, cover, title, base_dir)?;
    fs::write(target, rendered.as_bytes())?;
    Ok(())
}

/// Computes `path` relative to `base`, inserting `..` for the components
/// where the two diverge.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_components: Vec<_> = path.components().collect();
    let base_components: Vec<_> = base.components().collect();

    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base_components.len() {
        result.push("..");
    }
    for component in &path_components[common..] {
        result.push(component);
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(raw: &[&str]) -> Vec<PathBuf> {
        raw.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_render_empty_tracklist_fails() {
        assert!(matches!(render(&[], None, None, None), Err(Error::EmptyTracklist)));
    }

    #[test]
    fn test_render_header_and_paths() {
        let rendered = render(&paths(&["/a/one.mp3", "/a/two.mp3"]), None, None, None).unwrap();
        assert_eq!(rendered, "#EXTM3U\n#EXTENC:UTF-8\n/a/one.mp3\n/a/two.mp3");
    }

    #[test]
    fn test_render_title_and_cover_directives() {
        let rendered = render(
            &paths(&["/a/one.mp3"]),
            Some("/a/cover.jpg"),
            Some("My List"),
            None,
        )
        .unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            ["#EXTM3U", "#EXTENC:UTF-8", "#EXTIMG:/a/cover.jpg", "#PLAYLIST:My List", "/a/one.mp3"],
        );
    }

    #[test]
    fn test_render_empty_title_and_cover_omitted() {
        let rendered = render(&paths(&["/a/one.mp3"]), Some(""), Some(""), None).unwrap();
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn test_render_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        std::fs::create_dir(base.join("music")).unwrap();
        std::fs::write(base.join("music").join("a.mp3"), b"x").unwrap();

        let rendered = render(&[base.join("music").join("a.mp3")], None, None, Some(base)).unwrap();
        let last = rendered.lines().last().unwrap();
        assert_eq!(last, "music/a.mp3");
    }

    #[test]
    fn test_render_invalid_base_dir_keeps_paths() {
        let rendered = render(
            &paths(&["/a/one.mp3"]),
            None,
            None,
            Some(Path::new("/does/not/exist")),
        )
        .unwrap();
        assert_eq!(rendered.lines().last().unwrap(), "/a/one.mp3");
    }

    #[test]
    fn test_save_relative_derives_base_from_target() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let track = dir.path().join("sub").join("a.mp3");
        std::fs::write(&track, b"x").unwrap();
        let target = dir.path().join("list.m3u8");

        save(&target, &[track], None, Some("T"), true).unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert!(written.lines().any(|l| l == "sub/a.mp3"));
    }

    #[test]
    fn test_save_absolute_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("a.mp3");
        std::fs::write(&track, b"x").unwrap();
        let target = dir.path().join("list.m3u8");

        save(&target, std::slice::from_ref(&track), None, None, false).unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert!(written.lines().any(|l| l == track.display().to_string()));
    }

    #[test]
    fn test_roundtrip_paths() {
        let input = paths(&["/a/one.mp3", "/b/two.flac", "/c/three.wav"]);
        let rendered = render(&input, Some("/x/cover.jpg"), Some("T"), None).unwrap();

        let parsed: Vec<PathBuf> = rendered
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(PathBuf::from)
            .collect();
        assert_eq!(parsed, input);
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/a/b/c.mp3"), Path::new("/a/x")),
            PathBuf::from("../b/c.mp3"),
        );
        assert_eq!(
            relative_to(Path::new("/a/b/c.mp3"), Path::new("/a")),
            PathBuf::from("b/c.mp3"),
        );
        assert_eq!(relative_to(Path::new("/a"), Path::new("/a")), PathBuf::from("."));
    }
}
