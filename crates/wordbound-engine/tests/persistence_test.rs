//! Save/resume through the snapshot repository seam, including bitmap
//! sanitization on load.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;
use wordbound_catalog::blurbs::BlurbCatalog;
use wordbound_catalog::rules::RuleCatalog;
use wordbound_core::error::DomainError;
use wordbound_core::ids::BookId;
use wordbound_engine::GameSession;
use wordbound_story::triggers::standard_trigger_table;
use wordbound_test_support::{
    EmptySnapshotRepository, FixedClock, RecordingSnapshotRepository,
};

fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
}

fn empty_catalogs() -> (Arc<RuleCatalog>, Arc<BlurbCatalog>) {
    (
        Arc::new(RuleCatalog::default()),
        Arc::new(BlurbCatalog::default()),
    )
}

#[tokio::test]
async fn test_save_then_resume_round_trips_progress() {
    let clock = fixed_clock();
    let repo = RecordingSnapshotRepository::new();
    let (rules, blurbs) = empty_catalogs();
    let book = BookId::from("riddles");

    let mut session = GameSession::new_game(
        Uuid::new_v4(),
        &clock,
        Arc::clone(&rules),
        Arc::clone(&blurbs),
        standard_trigger_table(&[]),
    );
    session.record_part_completed(&book, 0, &clock);
    session.record_part_completed(&book, 1, &clock);
    session.save(&repo, &clock).await.unwrap();

    let mut part_counts = BTreeMap::new();
    part_counts.insert(book.clone(), 4);

    let resumed = GameSession::resume(
        session.id(),
        &repo,
        &part_counts,
        rules,
        blurbs,
        standard_trigger_table(&[]),
    )
    .await
    .unwrap();

    assert_eq!(resumed.progress(), session.progress());
}

#[tokio::test]
async fn test_resume_sanitizes_bitmaps_for_shrunk_books() {
    let clock = fixed_clock();
    let repo = RecordingSnapshotRepository::new();
    let (rules, blurbs) = empty_catalogs();
    let book = BookId::from("riddles");

    let mut session = GameSession::new_game(
        Uuid::new_v4(),
        &clock,
        Arc::clone(&rules),
        Arc::clone(&blurbs),
        standard_trigger_table(&[]),
    );
    // Parts 0..4 completed while the book still had five parts.
    for index in 0..5 {
        session.record_part_completed(&book, index, &clock);
    }
    session.save(&repo, &clock).await.unwrap();

    // The book was edited down to three parts before the next launch.
    let mut part_counts = BTreeMap::new();
    part_counts.insert(book.clone(), 3);

    let resumed = GameSession::resume(
        session.id(),
        &repo,
        &part_counts,
        rules,
        blurbs,
        standard_trigger_table(&[]),
    )
    .await
    .unwrap();

    assert_eq!(resumed.progress().bitmap_for(&book), 0b0111);
}

#[tokio::test]
async fn test_resume_missing_session_returns_not_found() {
    let (rules, blurbs) = empty_catalogs();
    let session_id = Uuid::new_v4();

    let result = GameSession::resume(
        session_id,
        &EmptySnapshotRepository,
        &BTreeMap::new(),
        rules,
        blurbs,
        standard_trigger_table(&[]),
    )
    .await;

    match result {
        Err(DomainError::SessionNotFound(id)) => assert_eq!(id, session_id),
        other => panic!("expected SessionNotFound, got {other:?}"),
    }
}
