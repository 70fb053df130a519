use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::Error;

/// Target path for a downloaded image: final URL segment (query stripped),
/// `.jpg` appended when the segment has no extension.
fn image_path(url: &str, output_dir: &Path) -> PathBuf {
    let name = url.rsplit('/').next().unwrap_or(url);
    let name = name.split('?').next().unwrap_or(name);
    let name = if name.is_empty() { "cover" } else { name };

    let mut path = output_dir.join(name);
    if path.extension().is_none() {
        path.set_extension("jpg");
    }
    path
}

/// Downloads a playlist cover image into `output_dir` and returns the
/// written path.
pub async fn download_image(
    client: &reqwest::Client,
    url: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let path = image_path(url, output_dir);

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(Error::Download(response.status()).into());
    }

    let bytes = response.bytes().await?;
    fs::write(&path, &bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_path_keeps_extension() {
        assert_eq!(
            image_path("https://host/img/cover.png", Path::new("/out")),
            PathBuf::from("/out/cover.png"),
        );
    }

    #[test]
    fn test_image_path_defaults_to_jpg() {
        assert_eq!(
            image_path("https://i.scdn.co/image/ab67706c0000da84", Path::new("/out")),
            PathBuf::from("/out/ab67706c0000da84.jpg"),
        );
    }

    #[test]
    fn test_image_path_strips_query() {
        assert_eq!(
            image_path("https://host/cover.jpeg?size=640", Path::new("/out")),
            PathBuf::from("/out/cover.jpeg"),
        );
    }
}
