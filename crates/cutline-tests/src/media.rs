//! Integration tests for media loading and thumbnails.

use std::sync::Arc;
use std::time::Duration;

use cutline_core::{MediaRef, ThumbnailConfig};
use cutline_media::{
    AssetStore, MediaError, MediaSource, SourceSeeker, SyntheticLoader, ThumbnailExtractor,
};
use cutline_timeline::layout::thumbnail_slots;
use cutline_timeline::{Timeline, TrackKind};
use tokio::runtime::Handle;

fn store() -> AssetStore {
    AssetStore::new(Arc::new(SyntheticLoader::new()), Handle::current())
}

#[tokio::test]
async fn import_uses_loaded_media_duration() {
    let store = store();
    let src = MediaRef::new("bars://clip?duration=8");
    let source = store.load_now(&src).await.unwrap();

    let mut t = Timeline::new();
    let (track, clip) = t
        .import_media(src.clone(), source.duration(), TrackKind::Video)
        .unwrap();

    assert_eq!(t.duration(), 8.0);
    let clip = t.track(track).unwrap().clip(clip).unwrap();
    assert_eq!((clip.start, clip.end), (0.0, 8.0));
    assert_eq!(clip.src, src);
    assert_eq!(t.active_track_id(), Some(track));
}

#[tokio::test]
async fn thumbnails_match_strip_slots() {
    let store = store();
    let src = MediaRef::new("bars://clip?duration=10&size=64x36");
    let source = store.load_now(&src).await.unwrap();

    let config = ThumbnailConfig {
        count: 8,
        width: 32,
        height: 18,
    };
    let extractor = ThumbnailExtractor::new(config);
    let mut media = SourceSeeker::new(source);
    let ticket = extractor.begin();
    let thumbs = extractor.extract(&ticket, &mut media, 10.0).await.unwrap();

    let mut t = Timeline::new();
    t.set_base_width(800.0);
    t.set_duration(10.0);
    let slots = thumbnail_slots(&t.coordinate_params(), config.count);

    assert_eq!(thumbs.len(), slots.len());
    assert!(thumbs.iter().all(Option::is_some));
    assert_eq!(slots[4].time, 5.0);
}

#[tokio::test]
async fn restarting_extraction_discards_the_old_run() {
    let store = store();
    let source = store
        .load_now(&MediaRef::new("bars://long?duration=30"))
        .await
        .unwrap();
    let extractor = Arc::new(ThumbnailExtractor::new(ThumbnailConfig {
        count: 30,
        width: 8,
        height: 8,
    }));

    let first = extractor.begin();
    let task = {
        let extractor = Arc::clone(&extractor);
        let mut media = SourceSeeker::new(Arc::clone(&source))
            .with_seek_delay(Duration::from_millis(2));
        tokio::spawn(async move { extractor.extract(&first, &mut media, 0.0).await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = extractor.begin();
    let mut media = SourceSeeker::new(source);
    let fresh = extractor.extract(&second, &mut media, 0.0).await.unwrap();

    let stale = task.await.unwrap();
    assert!(matches!(stale, Err(MediaError::Superseded)));
    assert_eq!(fresh.len(), 30);
}

#[tokio::test]
async fn unknown_scheme_fails_without_blocking() {
    let store = store();
    let src = MediaRef::new("s3://bucket/video.mp4");
    assert!(store.get_or_request(&src).is_none());
    for _ in 0..100 {
        if let Some(cutline_media::AssetState::Failed(err)) = store.status(&src) {
            assert_eq!(err, MediaError::Unsupported(src));
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("load never failed");
}
