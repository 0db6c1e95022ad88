//! Session runtime integration tests.
//!
//! These tests run the actor on a paused tokio clock so the countdown is
//! driven deterministically.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;

use kimchi_sort::{
    AssetCatalog, AssetLoadError, AssetRef, CatalogEntry, ChallengeDescriptor, ChallengeLoader,
    GameConfig, GameError, GameOverReason, Label, LoadedAsset, LoadedChallenge, LocalLeaderboard,
    ScoreEntry, ScoreStore, SessionEngine, SessionHandle, SessionRuntime, SubmissionStatus, View,
};

const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00";

// =============================================================================
// Test Loaders
// =============================================================================

/// Resolves every descriptor to the same tiny GIF after `delay`.
struct GifLoader {
    delay: Duration,
}

#[async_trait]
impl ChallengeLoader for GifLoader {
    async fn resolve(&self, descriptor: ChallengeDescriptor) -> Result<LoadedChallenge, AssetLoadError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let asset = LoadedAsset::decode("test.gif", Bytes::from_static(GIF))?;
        Ok(LoadedChallenge::new(descriptor, asset))
    }
}

/// Fails every load.
struct BrokenLoader;

#[async_trait]
impl ChallengeLoader for BrokenLoader {
    async fn resolve(&self, descriptor: ChallengeDescriptor) -> Result<LoadedChallenge, AssetLoadError> {
        Err(AssetLoadError::Http {
            asset: descriptor.asset.to_string(),
            message: "503 Service Unavailable".to_string(),
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn catalog() -> Arc<AssetCatalog> {
    Arc::new(
        AssetCatalog::new()
            .with_entry(CatalogEntry::new("깍두기", Label::Kimchi, "", AssetRef::Path(PathBuf::from("k.gif"))))
            .with_entry(CatalogEntry::new("sushi", Label::NotKimchi, "", AssetRef::Path(PathBuf::from("n.gif")))),
    )
}

fn spawn_with(loader: Arc<dyn ChallengeLoader>, config: GameConfig) -> (SessionHandle, Arc<ScoreStore>) {
    let store = Arc::new(ScoreStore::in_memory());
    let engine = SessionEngine::new(config, catalog());
    let handle = SessionRuntime::spawn(
        engine,
        loader,
        Arc::new(LocalLeaderboard::new(Arc::clone(&store))),
    );
    (handle, store)
}

fn spawn() -> (SessionHandle, Arc<ScoreStore>) {
    spawn_with(
        Arc::new(GifLoader { delay: Duration::ZERO }),
        GameConfig::new().with_window_size(4).with_seed(8),
    )
}

async fn start_playing(handle: &SessionHandle) {
    handle.start_game().await.unwrap();
    handle.wait_for(|s| s.view == View::Playing).await.unwrap();
}

// =============================================================================
// Play
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_runtime_plays_and_scores() {
    let (handle, _) = spawn();
    start_playing(&handle).await;

    let head = handle.snapshot().current_challenge.unwrap();
    handle.drop_on_zone(head.is_positive()).await.unwrap();

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.score, 1);
    assert_eq!(snapshot.remaining_seconds, 5);
    assert_ne!(snapshot.current_challenge.map(|c| c.id()), Some(head.id()));

    let head = handle.snapshot().current_challenge.unwrap();
    handle.drop_on_zone(!head.is_positive()).await.unwrap();

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.view, View::GameOver);
    assert_eq!(snapshot.game_over_reason, Some(GameOverReason::Misclassified));
    assert_eq!(snapshot.failing_challenge.map(|c| c.id()), Some(head.id()));
    assert_eq!(snapshot.score, 1);
}

#[tokio::test(start_paused = true)]
async fn test_runtime_times_out() {
    let (handle, _) = spawn();
    start_playing(&handle).await;
    let started = Instant::now();

    let mut rx = handle.subscribe();
    assert_eq!(rx.borrow_and_update().remaining_seconds, 5);
    let mut seen = Vec::new();
    loop {
        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        seen.push(snapshot.remaining_seconds);
        if snapshot.view == View::GameOver {
            assert_eq!(snapshot.game_over_reason, Some(GameOverReason::TimedOut));
            break;
        }
    }

    assert_eq!(seen, vec![4, 3, 2, 1, 0]);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(5), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(6), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_drop_restarts_countdown() {
    let (handle, _) = spawn();
    start_playing(&handle).await;

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    assert_eq!(handle.snapshot().remaining_seconds, 2);

    let head = handle.snapshot().current_challenge.unwrap();
    handle.drop_on_zone(head.is_positive()).await.unwrap();
    assert_eq!(handle.snapshot().remaining_seconds, 5);

    // The old countdown would have expired here.
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.view, View::Playing);
    assert_eq!(snapshot.remaining_seconds, 3);
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_late_loads_after_menu_are_discarded() {
    let (handle, _) = spawn_with(
        Arc::new(GifLoader { delay: Duration::from_secs(2) }),
        GameConfig::new().with_window_size(4).with_seed(8),
    );

    handle.start_game().await.unwrap();
    assert_eq!(handle.snapshot().in_flight, 4);
    handle.return_to_menu().await.unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.view, View::Menu);
    assert_eq!(snapshot.queue_len(), 0);
    assert_eq!(snapshot.in_flight, 0);
}

#[tokio::test(start_paused = true)]
async fn test_broken_assets_end_game() {
    let (handle, _) = spawn_with(
        Arc::new(BrokenLoader),
        GameConfig::new().with_max_consecutive_load_failures(3).with_seed(8),
    );

    handle.start_game().await.unwrap();
    let snapshot = handle.wait_for(|s| s.view == View::GameOver).await.unwrap();
    assert_eq!(snapshot.game_over_reason, Some(GameOverReason::AssetsUnavailable));
    assert_eq!(snapshot.score, 0);
}

// =============================================================================
// Leaderboard
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_submit_after_game_over() {
    let (handle, store) = spawn();
    start_playing(&handle).await;

    let head = handle.snapshot().current_challenge.unwrap();
    handle.drop_on_zone(head.is_positive()).await.unwrap();
    let head = handle.snapshot().current_challenge.unwrap();
    handle.drop_on_zone(!head.is_positive()).await.unwrap();

    handle.submit_score(" kim ").await.unwrap();
    let snapshot = handle.wait_for(|s| s.view == View::Leaderboard).await.unwrap();

    assert_eq!(snapshot.submission, SubmissionStatus::Submitted);
    assert_eq!(snapshot.leaderboard, vec![ScoreEntry::new("kim", 1)]);
    assert_eq!(store.best("kim").await, Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_blank_nickname_rejected_locally() {
    let (handle, store) = spawn();
    start_playing(&handle).await;
    handle.wait_for(|s| s.view == View::GameOver).await.unwrap();

    let err = handle.submit_score("   ").await.unwrap_err();
    assert!(matches!(err, GameError::InvalidInput(_)));
    assert_eq!(handle.snapshot().submission, SubmissionStatus::Idle);
    assert!(store.entries().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_show_leaderboard_from_menu() {
    let (handle, store) = spawn();
    store.submit("a", 3).await.unwrap();
    store.submit("b", 8).await.unwrap();

    handle.show_leaderboard().await.unwrap();
    let snapshot = handle.wait_for(|s| !s.leaderboard.is_empty()).await.unwrap();

    assert_eq!(snapshot.view, View::Leaderboard);
    assert_eq!(
        snapshot.leaderboard,
        vec![ScoreEntry::new("b", 8), ScoreEntry::new("a", 3)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_actions_rejected_in_wrong_view() {
    let (handle, _) = spawn();
    start_playing(&handle).await;

    assert!(matches!(
        handle.start_game().await,
        Err(GameError::InvalidTransition { .. })
    ));
    assert!(matches!(
        handle.show_leaderboard().await,
        Err(GameError::InvalidTransition { .. })
    ));
    assert_eq!(handle.snapshot().view, View::Playing);
}

// =============================================================================
// Shutdown
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_closes_session() {
    let (handle, _) = spawn();
    start_playing(&handle).await;

    handle.shutdown().await;
    assert!(matches!(handle.start_game().await, Err(GameError::SessionClosed)));
    assert!(matches!(handle.return_to_menu().await, Err(GameError::SessionClosed)));
}
