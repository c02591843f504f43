use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::error::BadgeError;
use crate::export::png::png_writer;
use crate::export::{write_badge, BadgeStats};
use crate::queue::{is_same_file, Queued};
use crate::transform::{badge_img, circularize, normalize_rgba};


/// Turn one source badge into a circular transparent PNG at `target`.
pub async fn circularize_action(importable: PathBuf, target: PathBuf) -> Result<String, BadgeError> {
    // Decoding, masking and encoding are CPU bound
    let (badge, buf) = tokio::task::spawn_blocking(move || {
        let (badge, img) = badge_img(importable, target)?;
        let round = circularize(&normalize_rgba(img));

        debug!("Encoding {} px circular badge from {:?} source {:?}", badge.size(), badge.format, badge.target_path);

        let buf = png_writer(&round)
            .map_err(|e| BadgeError::Encode { path: badge.target_path.to_owned(), source: e })?;

        Ok::<_, BadgeError>((badge, buf))
    })
    .await??;

    write_badge(&badge.target_path, &buf).await?;

    Ok(format!(
        "{} -> {}",
        display_name(&badge.source_path),
        display_name(&badge.target_path),
    ))
}

/// Process the queue one badge at a time. Per badge failures never stop the batch.
pub async fn process_queue(queue: Vec<Queued>) -> BadgeStats {
    let mut stats = BadgeStats::new(queue.len());

    for (importable, target) in queue {
        if !importable.is_file() {
            warn!("Badge file not found: {}", display_name(&importable));
            stats.skip(importable.to_string_lossy().into());

            continue;
        }

        let response = match is_same_file(&importable, &target) {
            true => Err(BadgeError::SameAsSource { path: importable }),
            false => circularize_action(importable, target).await,
        };

        match response {
            Ok(ref s) => info!("Processed: {}", s),
            Err(ref e) => error!("Failed to process badge {}", e),
        }

        stats.push(response);
    }

    stats
}

fn display_name(path: &std::path::Path) -> String {
    match path.file_name() {
        Some(f) => f.to_string_lossy().into(),
        None => path.to_string_lossy().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_png(path: &Path, w: u32, h: u32) {
        RgbImage::from_pixel(w, h, Rgb([30, 60, 90]))
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    #[tokio::test]
    async fn landscape_badge_becomes_circular_png() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("Palacio_Ossa.png");
        let target = tmp.path().join("out.png");
        write_png(&source, 400, 300);

        let msg = circularize_action(source.clone(), target.clone()).await.unwrap();
        assert_eq!(msg, "Palacio_Ossa.png -> out.png");

        let out = image::open(&target).unwrap();
        assert_eq!(out.color(), image::ColorType::Rgba8);

        let out = out.to_rgba8();
        assert_eq!(out.dimensions(), (300, 300));
        assert_eq!(*out.get_pixel(150, 150), Rgba([30, 60, 90, 255]));
        assert_eq!(out.get_pixel(0, 0)[3], 0);

        // Source is left untouched
        let source = image::open(&source).unwrap();
        assert_eq!((source.width(), source.height()), (400, 300));
    }

    #[tokio::test]
    async fn missing_source_fails_without_output() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("out.png");

        let err = circularize_action(tmp.path().join("nope.png"), target.clone()).await.unwrap_err();

        assert!(matches!(err, BadgeError::Read { .. }));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn garbage_source_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("broken.png");
        let target = tmp.path().join("out.png");
        std::fs::write(&source, b"\x89PNG\r\n\x1a\nnot really").unwrap();

        let err = circularize_action(source, target.clone()).await.unwrap_err();

        assert!(matches!(err, BadgeError::Decode { .. }));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn non_png_source_is_unsupported() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.png");
        let target = tmp.path().join("out.png");
        RgbaImage::from_pixel(8, 8, Rgba([1, 1, 1, 255]))
            .save_with_format(&source, ImageFormat::Bmp)
            .unwrap();

        let err = circularize_action(source, target).await.unwrap_err();

        assert!(matches!(err, BadgeError::Unsupported { format: Some(ImageFormat::Bmp), .. }));
    }

    #[tokio::test]
    async fn unwritable_target_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("badge.png");
        write_png(&source, 10, 10);

        let err = circularize_action(source, tmp.path().join("missing").join("badge.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, BadgeError::Write { .. }));
    }

    #[tokio::test]
    async fn batch_skips_missing_and_continues() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("_procesadas");
        std::fs::create_dir(&out).unwrap();

        let mut queue = vec![];

        for i in 0..15 {
            let name = format!("badge_{:02}.png", i);
            let source = tmp.path().join(&name);

            // Every fifth badge is missing
            if i % 5 != 0 {
                write_png(&source, 20 + i, 16);
            }

            queue.push((source, out.join(&name)));
        }

        let stats = process_queue(queue).await;

        assert_eq!(stats.tally(), "12/15");
        assert_eq!(stats.skipped.len(), 3);
        assert!(stats.failed.is_empty());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 12);
    }

    #[tokio::test]
    async fn batch_never_overwrites_source() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("Palacio_Ossa.png");
        write_png(&source, 40, 30);

        let stats = process_queue(vec![
            (source.clone(), source.clone()),
            (source.clone(), tmp.path().join(".").join("Palacio_Ossa.png")),
        ]).await;

        assert_eq!(stats.tally(), "0/2");
        assert_eq!(stats.failed.len(), 2);

        let source = image::open(&source).unwrap();
        assert_eq!((source.width(), source.height()), (40, 30));
        assert_eq!(source.color(), image::ColorType::Rgb8);
    }

    #[tokio::test]
    async fn batch_counts_failures() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.png");
        let bad = tmp.path().join("bad.png");
        write_png(&good, 12, 12);
        std::fs::write(&bad, b"nope").unwrap();

        let stats = process_queue(vec![
            (bad, tmp.path().join("bad_out.png")),
            (good, tmp.path().join("good_out.png")),
        ]).await;

        assert_eq!(stats.tally(), "1/2");
        assert_eq!(stats.failed.len(), 1);
        assert!(stats.failed[0].starts_with(&tmp.path().join("bad.png").display().to_string()));
    }
}
