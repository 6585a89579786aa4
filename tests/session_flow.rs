mod support;

use bytebucket::api::UploadFile;
use bytebucket::cache::ListingCache;
use bytebucket::error::ApiError;
use bytebucket::navigation::NavigationItem;
use bytebucket::session::{ExplorerSession, SessionOptions};
use bytebucket::types::FolderId;
use std::sync::Arc;
use support::{FakeStorage, ROOT_ID};

fn session_with(api: &Arc<FakeStorage>, cache: &Arc<ListingCache>) -> ExplorerSession {
    ExplorerSession::new(api.clone(), cache.clone(), SessionOptions::default())
}

fn subfolder_names(session: &ExplorerSession) -> Vec<String> {
    session
        .tracker()
        .subfolders()
        .iter()
        .map(|f| f.name.clone())
        .collect()
}

#[tokio::test]
async fn browse_photos_then_jump_back() {
    let api = Arc::new(FakeStorage::new());
    let photos = api.add_folder("Photos", None);
    let year = api.add_folder("2024", Some(photos));
    api.add_file("beach.jpg", Some(year), b"jpeg");
    let mut session = session_with(&api, &Arc::new(ListingCache::default()));

    session.refresh().await.unwrap();
    assert_eq!(subfolder_names(&session), vec!["Photos"]);
    assert_eq!(session.tracker().root_backing_id(), Some(FolderId(ROOT_ID)));

    session.descend(photos, "Photos");
    session.refresh().await.unwrap();
    session.descend(year, "2024");
    session.refresh().await.unwrap();
    assert_eq!(session.tracker().files().len(), 1);
    assert_eq!(session.tracker().files()[0].name, "beach.jpg");

    assert!(session.jump_to_index(1));
    assert_eq!(
        session.tracker().breadcrumbs(),
        &[
            NavigationItem::root(),
            NavigationItem::folder(photos, "Photos")
        ]
    );
    assert_eq!(session.tracker().current_folder_id(), Some(photos));
    // Listing for the new key is not loaded until the next refresh
    assert!(!session.tracker().is_loaded());
    session.refresh().await.unwrap();
    assert_eq!(subfolder_names(&session), vec!["2024"]);
}

#[tokio::test]
async fn cached_listing_is_reused_until_invalidated() {
    let api = Arc::new(FakeStorage::new());
    let photos = api.add_folder("Photos", None);
    let mut session = session_with(&api, &Arc::new(ListingCache::default()));

    session.refresh().await.unwrap();
    session.descend(photos, "Photos");
    session.refresh().await.unwrap();
    session.ascend();
    session.refresh().await.unwrap();
    assert_eq!(api.listing_calls(None), 1);
    assert_eq!(api.listing_calls(Some(photos)), 1);

    session.reload().await.unwrap();
    assert_eq!(api.listing_calls(None), 2);
}

#[tokio::test]
async fn create_folder_invalidates_parent_listing() {
    let api = Arc::new(FakeStorage::new());
    let photos = api.add_folder("Photos", None);
    let mut session = session_with(&api, &Arc::new(ListingCache::default()));

    session.descend(photos, "Photos");
    session.refresh().await.unwrap();
    assert!(subfolder_names(&session).is_empty());

    let created = session.create_folder("  2024  ").await.unwrap();
    assert_eq!(created.name, "2024");
    assert_eq!(api.created_requests()[0].parent_id, Some(photos));

    session.refresh().await.unwrap();
    assert_eq!(api.listing_calls(Some(photos)), 2);
    assert_eq!(subfolder_names(&session), vec!["2024"]);
}

#[tokio::test]
async fn rejected_folder_names_make_no_request() {
    let api = Arc::new(FakeStorage::new());
    let mut session = session_with(&api, &Arc::new(ListingCache::default()));

    let err = session.create_folder("   ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    let err = session.create_folder(&"x".repeat(256)).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(api.created_requests().is_empty());
}

#[tokio::test]
async fn upload_invalidates_target_listing() {
    let api = Arc::new(FakeStorage::new());
    let docs = api.add_folder("Docs", None);
    let mut session = session_with(&api, &Arc::new(ListingCache::default()));

    session.descend(docs, "Docs");
    session.refresh().await.unwrap();
    assert!(session.tracker().files().is_empty());

    let uploaded = session
        .upload_files(vec![UploadFile::new("notes.txt", b"hello".to_vec())])
        .await
        .unwrap();
    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0].folder_id, Some(docs));

    session.refresh().await.unwrap();
    assert_eq!(session.tracker().files().len(), 1);
    assert_eq!(session.tracker().files()[0].content_type, "text/plain");
}

#[tokio::test]
async fn upload_paths_reads_local_files() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("photo.png");
    std::fs::write(&path, b"png").unwrap();

    let api = Arc::new(FakeStorage::new());
    let mut session = session_with(&api, &Arc::new(ListingCache::default()));
    let uploaded = session.upload_paths(&[path]).await.unwrap();
    assert_eq!(uploaded[0].name, "photo.png");
    assert_eq!(uploaded[0].content_type, "image/png");

    let missing = temp.path().join("absent.bin");
    let err = session.upload_paths(&[missing]).await.unwrap_err();
    assert!(matches!(err, ApiError::IoError(_)));
}

#[tokio::test]
async fn download_uses_listing_name() {
    let temp = tempfile::tempdir().unwrap();
    let api = Arc::new(FakeStorage::new());
    let file = api.add_file("report.pdf", None, b"%PDF");
    let mut session = session_with(&api, &Arc::new(ListingCache::default()));

    session.refresh().await.unwrap();
    let path = session.download(file, Some(temp.path())).await.unwrap();
    assert_eq!(path, temp.path().join("report.pdf"));
    assert_eq!(std::fs::read(path).unwrap(), b"%PDF");

    let explicit = temp.path().join("copy.pdf");
    let path = session.download(file, Some(&explicit)).await.unwrap();
    assert_eq!(path, explicit);
}

#[tokio::test]
async fn failed_fetch_is_recorded_then_cleared() {
    let api = Arc::new(FakeStorage::new());
    api.add_folder("Photos", None);
    let mut session = session_with(&api, &Arc::new(ListingCache::default()));

    api.fail_listings(1);
    let err = session.refresh().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(session.last_error().is_some());
    assert!(!session.tracker().is_loaded());

    session.refresh().await.unwrap();
    assert!(session.last_error().is_none());
    assert_eq!(subfolder_names(&session), vec!["Photos"]);
}

#[tokio::test]
async fn independent_sessions_do_not_share_state() {
    let api = Arc::new(FakeStorage::new());
    let photos = api.add_folder("Photos", None);

    let mut first = session_with(&api, &Arc::new(ListingCache::default()));
    let mut second = session_with(&api, &Arc::new(ListingCache::default()));

    first.descend(photos, "Photos");
    first.refresh().await.unwrap();
    second.refresh().await.unwrap();

    assert_eq!(first.tracker().current_folder_id(), Some(photos));
    assert_eq!(second.tracker().current_folder_id(), None);
    assert_eq!(second.tracker().path().len(), 1);

    // Separate caches: the second session fetches Photos itself
    second.descend(photos, "Photos");
    second.refresh().await.unwrap();
    assert_eq!(api.listing_calls(Some(photos)), 2);
}

#[tokio::test]
async fn sessions_sharing_a_cache_share_listings() {
    let api = Arc::new(FakeStorage::new());
    let cache = Arc::new(ListingCache::default());

    let mut first = session_with(&api, &cache);
    let mut second = session_with(&api, &cache);
    first.refresh().await.unwrap();
    second.refresh().await.unwrap();
    assert_eq!(api.listing_calls(None), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn pinned_root_id_starts_session_elsewhere() {
    let api = Arc::new(FakeStorage::new());
    let photos = api.add_folder("Photos", None);
    let mut session = ExplorerSession::new(
        api.clone(),
        Arc::new(ListingCache::default()),
        SessionOptions {
            initial_folder: Some(photos),
            root_folder_id: Some(FolderId(ROOT_ID)),
        },
    );
    session.refresh().await.unwrap();
    assert_eq!(session.tracker().current_folder().map(|f| f.name.as_str()), Some("Photos"));
    assert_eq!(session.tracker().path().len(), 1);

    session.reset();
    session.refresh().await.unwrap();
    assert_eq!(subfolder_names(&session), vec!["Photos"]);
}

#[tokio::test]
async fn browser_menu_follows_view() {
    use bytebucket::tooling::shell::{menu_actions, MenuAction};

    let api = Arc::new(FakeStorage::new());
    let photos = api.add_folder("Photos", None);
    api.add_file("notes.txt", None, b"hi");
    let mut session = session_with(&api, &Arc::new(ListingCache::default()));
    session.refresh().await.unwrap();

    let actions: Vec<MenuAction> = menu_actions(&session).into_iter().map(|(_, a)| a).collect();
    assert_eq!(actions[0], MenuAction::Open(photos, "Photos".to_string()));
    assert!(!actions.contains(&MenuAction::Up));
    assert!(actions.contains(&MenuAction::Download));
    assert_eq!(actions.last(), Some(&MenuAction::Quit));

    session.descend(photos, "Photos");
    session.refresh().await.unwrap();
    let actions: Vec<MenuAction> = menu_actions(&session).into_iter().map(|(_, a)| a).collect();
    assert!(actions.contains(&MenuAction::Up));
    assert!(actions.contains(&MenuAction::Jump));
    assert!(!actions.contains(&MenuAction::Download));
}

#[tokio::test]
async fn session_started_in_folder_can_return_to_root() {
    use bytebucket::tooling::format::format_tracker_view;
    use bytebucket::tooling::shell::{menu_actions, MenuAction};

    let api = Arc::new(FakeStorage::new());
    let photos = api.add_folder("Photos", None);
    api.add_file("beach.jpg", Some(photos), b"jpeg");
    let mut session = ExplorerSession::new(
        api.clone(),
        Arc::new(ListingCache::default()),
        SessionOptions {
            initial_folder: Some(photos),
            root_folder_id: None,
        },
    );
    session.refresh().await.unwrap();

    assert!(session.tracker().is_detached());
    assert!(format_tracker_view(session.tracker()).contains("Root › Photos"));
    let actions: Vec<MenuAction> = menu_actions(&session).into_iter().map(|(_, a)| a).collect();
    assert!(actions.contains(&MenuAction::Root));
    assert!(!actions.contains(&MenuAction::Up));

    session.reset();
    session.refresh().await.unwrap();
    assert!(!session.tracker().is_detached());
    assert_eq!(subfolder_names(&session), vec!["Photos"]);
    let actions: Vec<MenuAction> = menu_actions(&session).into_iter().map(|(_, a)| a).collect();
    assert!(!actions.contains(&MenuAction::Root));
}
