//! End-to-end audit against a real SQLite database and media directory.

use mediacheck_core::{
    AuditError, ModelConfig, PlaceholderOutcome, RecordId, create_placeholders, run_audit,
    validate_models,
};
use mediacheck_db::MediaDb;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Database with one table of books (two file fields) and one of profiles
/// keyed by a text slug.
async fn setup_db() -> MediaDb {
    let db = MediaDb::open_in_memory().await.unwrap();

    sqlx::query(
        r#"
        CREATE TABLE library_book (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            cover TEXT,
            attachment TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(db.pool())
    .await
    .unwrap();

    sqlx::query(
        r#"
        INSERT INTO library_book (id, title, cover, attachment) VALUES
            (1, 'Present', 'covers/present.png', 'files/present.pdf'),
            (2, 'Gone', 'covers/gone.png', ''),
            (3, 'No cover', NULL, 'files/gone.pdf')
        "#,
    )
    .execute(db.pool())
    .await
    .unwrap();

    sqlx::query("CREATE TABLE accounts_profile (slug TEXT PRIMARY KEY, avatar TEXT)")
        .execute(db.pool())
        .await
        .unwrap();

    sqlx::query("INSERT INTO accounts_profile (slug, avatar) VALUES ('ada', 'avatars/a.png')")
        .execute(db.pool())
        .await
        .unwrap();

    db
}

async fn setup_media() -> TempDir {
    let media = tempfile::tempdir().unwrap();
    for file in ["covers/present.png", "files/present.pdf"] {
        let path = media.path().join(file);
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, b"data").await.unwrap();
    }
    media
}

fn models() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new("library.Book", "library_book", ["cover", "attachment"]),
        ModelConfig::new("accounts.Profile", "accounts_profile", ["avatar"]).with_primary_key("slug"),
    ]
}

#[tokio::test]
async fn test_reports_only_missing_files() {
    let db = setup_db().await;
    let media = setup_media().await;

    let report = run_audit(&db, media.path(), &models()).await.unwrap();

    // 3 books x 2 fields + 1 profile
    assert_eq!(report.scanned, 7);
    assert_eq!(report.present, 2);
    assert_eq!(report.skipped_empty, 2);
    assert_eq!(report.skipped_unreadable, 0);

    let listed: Vec<_> = report
        .missing
        .iter()
        .map(|m| (m.model.as_str(), m.id.clone(), m.field.as_str(), m.stored.as_str()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("library.Book", RecordId::Int(2), "cover", "covers/gone.png"),
            ("library.Book", RecordId::Int(3), "attachment", "files/gone.pdf"),
            ("accounts.Profile", RecordId::Text("ada".into()), "avatar", "avatars/a.png"),
        ]
    );

    let avatar = &report.missing[2];
    assert_eq!(avatar.path, media.path().join("avatars/a.png"));
}

#[tokio::test]
async fn test_placeholders_converge() {
    let db = setup_db().await;
    let media = setup_media().await;

    let first = run_audit(&db, media.path(), &models()).await.unwrap();
    assert_eq!(first.missing_count(), 3);

    let placeholders = create_placeholders(&first.missing).await;
    assert_eq!(placeholders.created(), 3);
    assert!(!placeholders.has_failures());

    for entry in &first.missing {
        let meta = tokio::fs::metadata(&entry.path).await.unwrap();
        assert_eq!(meta.len(), 0, "{} should be empty", entry.path.display());
    }

    let second = run_audit(&db, media.path(), &models()).await.unwrap();
    assert!(second.is_clean());
    assert_eq!(second.present, first.present + 3);
    assert_eq!(second.scanned, first.scanned);

    // Present files are untouched.
    let kept = tokio::fs::read(media.path().join("covers/present.png"))
        .await
        .unwrap();
    assert_eq!(kept, b"data");
}

#[tokio::test]
async fn test_dot_dot_paths_are_not_normalized() {
    let db = MediaDb::open_in_memory().await.unwrap();
    sqlx::query("CREATE TABLE accounts_profile (id INTEGER PRIMARY KEY, avatar TEXT)")
        .execute(db.pool())
        .await
        .unwrap();
    sqlx::query(
        r#"
        INSERT INTO accounts_profile (id, avatar) VALUES
            (1, '../shared/gone.png'),
            (2, 'nodir/../avatars/a.png')
        "#,
    )
    .execute(db.pool())
    .await
    .unwrap();

    let scratch = tempfile::tempdir().unwrap();
    let media = scratch.path().join("media");
    tokio::fs::create_dir_all(media.join("avatars"))
        .await
        .unwrap();
    tokio::fs::write(media.join("avatars/a.png"), b"data")
        .await
        .unwrap();
    let models = vec![ModelConfig::new(
        "accounts.Profile",
        "accounts_profile",
        ["avatar"],
    )];

    let report = run_audit(&db, &media, &models).await.unwrap();

    // `nodir` does not exist, so the OS cannot walk through it.
    assert_eq!(report.scanned, 2);
    assert_eq!(report.present, 0);
    assert_eq!(report.skipped_unreadable, 0);
    let missing: Vec<_> = report
        .missing
        .iter()
        .map(|m| (m.stored.as_str(), m.path.clone()))
        .collect();
    assert_eq!(
        missing,
        vec![
            ("../shared/gone.png", media.join("../shared/gone.png")),
            ("nodir/../avatars/a.png", media.join("nodir/../avatars/a.png")),
        ]
    );

    let placeholders = create_placeholders(&report.missing).await;
    assert_eq!(
        placeholders.results[0].outcome,
        PlaceholderOutcome::Failed("outside media root".to_string())
    );
    assert!(!scratch.path().join("shared").exists());
    // Creating `nodir` makes the stored path resolve to the real file.
    assert_eq!(
        placeholders.results[1].outcome,
        PlaceholderOutcome::AlreadyPresent
    );
    assert_eq!(
        tokio::fs::read(media.join("avatars/a.png")).await.unwrap(),
        b"data"
    );
}

#[tokio::test]
async fn test_unknown_column_is_rejected() {
    let db = setup_db().await;
    let media = setup_media().await;
    let models = vec![ModelConfig::new("library.Book", "library_book", ["thumbnail"])];

    let err = run_audit(&db, media.path(), &models).await.unwrap_err();
    match err {
        AuditError::UnknownColumn {
            column, available, ..
        } => {
            assert_eq!(column, "thumbnail");
            assert!(available.contains(&"cover".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_table_is_rejected() {
    let db = setup_db().await;
    let models = vec![ModelConfig::new("shop.Product", "shop_product", ["image"])];

    let err = validate_models(&db, &models).await.unwrap_err();
    assert!(matches!(err, AuditError::UnknownTable { .. }));
}

#[tokio::test]
async fn test_unknown_primary_key_is_rejected() {
    let db = setup_db().await;
    let models =
        vec![ModelConfig::new("accounts.Profile", "accounts_profile", ["avatar"])];

    // The profile table has no `id` column.
    let err = validate_models(&db, &models).await.unwrap_err();
    assert!(matches!(
        err,
        AuditError::UnknownColumn { ref column, .. } if column == "id"
    ));
}
