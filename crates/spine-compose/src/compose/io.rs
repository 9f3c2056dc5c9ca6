//! Artwork and document file I/O

use crate::artwork::Artwork;
use crate::constants::ARTWORK_LOAD_TIMEOUT_SECS;
use crate::types::*;
use std::path::Path;
use std::time::Duration;

/// Read and decode an artwork image.
///
/// Every failure, including running past the load timeout, is reported as
/// `ArtworkUnavailable`.
pub async fn load_artwork(path: impl AsRef<Path>) -> Result<Artwork> {
    load_artwork_within(path, Duration::from_secs(ARTWORK_LOAD_TIMEOUT_SECS)).await
}

pub async fn load_artwork_within(path: impl AsRef<Path>, limit: Duration) -> Result<Artwork> {
    let path = path.as_ref().to_owned();
    let load = async {
        let bytes = tokio::fs::read(&path).await?;
        let artwork = tokio::task::spawn_blocking(move || Artwork::from_bytes(&bytes)).await??;
        Ok::<_, ComposeError>(artwork)
    };

    match tokio::time::timeout(limit, load).await {
        Ok(Ok(artwork)) => {
            let (width, height) = artwork.dimensions();
            log::debug!("Decoded {} ({}x{} px)", path.display(), width, height);
            Ok(artwork)
        }
        Ok(Err(ComposeError::ArtworkUnavailable(reason))) => Err(ComposeError::ArtworkUnavailable(
            format!("{}: {}", path.display(), reason),
        )),
        Ok(Err(err)) => Err(ComposeError::ArtworkUnavailable(format!(
            "{}: {}",
            path.display(),
            err
        ))),
        Err(_) => Err(ComposeError::ArtworkUnavailable(format!(
            "{}: not decoded within {:?}",
            path.display(),
            limit
        ))),
    }
}

/// Like [`load_artwork`], but a missing or broken image only costs the
/// artwork layer.
pub async fn load_artwork_or_none(path: impl AsRef<Path>) -> Option<Artwork> {
    match load_artwork(path).await {
        Ok(artwork) => Some(artwork),
        Err(err) => {
            log::warn!("{}; composing without artwork", err);
            None
        }
    }
}

/// Write a composed document
pub async fn save_document(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path.as_ref(), bytes).await?;
    log::info!("Wrote {} bytes to {}", bytes.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let result = load_artwork("/definitely/not/here.png").await;
        assert!(matches!(result, Err(ComposeError::ArtworkUnavailable(_))));
        assert!(load_artwork_or_none("/definitely/not/here.png").await.is_none());
    }

    #[tokio::test]
    async fn test_loads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.png");
        RgbaImage::from_pixel(5, 3, Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let artwork = load_artwork(&path).await.unwrap();
        assert_eq!(artwork.dimensions(), (5, 3));
    }

    #[tokio::test]
    async fn test_garbage_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.png");
        tokio::fs::write(&path, b"not an image").await.unwrap();

        let result = load_artwork(&path).await;
        assert!(matches!(result, Err(ComposeError::ArtworkUnavailable(_))));
    }
}
