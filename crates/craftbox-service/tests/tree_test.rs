//! Integration tests for structural tree operations.

mod helpers;

use craftbox_core::error::ErrorKind;
use craftbox_core::traits::ContentStore;
use craftbox_entity::quota::StoragePlan;
use craftbox_service::{ListOptions, PathMaintainer, SortField, SortOrder};

#[tokio::test]
async fn test_rename_cascades_to_descendants() {
    let app = helpers::TestApp::new();

    let builds = app.folder(None, "Builds").await;
    let v1 = app.folder(Some(builds.id), "v1").await;
    let notes = app.file(Some(v1.id), "notes.txt", 1200).await;

    assert_eq!(builds.path, "Builds");
    assert_eq!(v1.path, "Builds/v1");
    assert_eq!(notes.path, "Builds/v1/notes.txt");
    assert_eq!(app.service.usage(&app.ctx).await.unwrap(), 1200);

    let renamed = app
        .service
        .rename(&app.ctx, builds.id, "Releases")
        .await
        .unwrap();
    assert_eq!(renamed.path, "Releases");

    assert_eq!(app.node(v1.id).await.path, "Releases/v1");
    assert_eq!(app.node(notes.id).await.path, "Releases/v1/notes.txt");

    // The payload ref is decoupled from the logical path.
    assert_eq!(app.node(notes.id).await.content_ref, notes.content_ref);
    assert_eq!(app.service.usage(&app.ctx).await.unwrap(), 1200);

    let outcome = app.service.delete(&app.ctx, builds.id).await.unwrap();
    assert!(outcome.is_complete());
    assert_eq!(outcome.deleted.len(), 3);
    // The subtree root goes last.
    assert_eq!(*outcome.deleted.last().unwrap(), builds.id);

    assert!(app.all_nodes().await.is_empty());
    assert_eq!(app.service.usage(&app.ctx).await.unwrap(), 0);
}

#[tokio::test]
async fn test_move_into_own_subtree_rejected_without_mutation() {
    let app = helpers::TestApp::new();

    let builds = app.folder(None, "Builds").await;
    let v1 = app.folder(Some(builds.id), "v1").await;

    let err = app
        .service
        .move_node(&app.ctx, builds.id, Some(v1.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidMove);

    // Nothing was mutated.
    let paths: Vec<String> = app.all_nodes().await.into_iter().map(|n| n.path).collect();
    assert_eq!(paths, vec!["Builds".to_string(), "Builds/v1".to_string()]);

    let err = app
        .service
        .move_node(&app.ctx, builds.id, Some(builds.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidMove);
}

#[tokio::test]
async fn test_move_folder_repaths_subtree() {
    let app = helpers::TestApp::new();

    let builds = app.folder(None, "Builds").await;
    let v1 = app.folder(Some(builds.id), "v1").await;
    let notes = app.file(Some(v1.id), "notes.txt", 100).await;
    let archive = app.folder(None, "Archive").await;

    let moved = app
        .service
        .move_node(&app.ctx, builds.id, Some(archive.id))
        .await
        .unwrap();
    assert_eq!(moved.path, "Archive/Builds");
    assert_eq!(moved.parent_id, Some(archive.id));

    assert_eq!(app.node(v1.id).await.path, "Archive/Builds/v1");
    assert_eq!(app.node(notes.id).await.path, "Archive/Builds/v1/notes.txt");

    // And back out to the root.
    let moved = app.service.move_node(&app.ctx, builds.id, None).await.unwrap();
    assert_eq!(moved.path, "Builds");
    assert_eq!(moved.parent_id, None);
    assert_eq!(app.node(notes.id).await.path, "Builds/v1/notes.txt");
}

#[tokio::test]
async fn test_moving_to_current_parent_is_rejected() {
    let app = helpers::TestApp::new();

    let builds = app.folder(None, "Builds").await;
    let notes = app.file(Some(builds.id), "notes.txt", 10).await;

    let err = app
        .service
        .move_node(&app.ctx, notes.id, Some(builds.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidMove);

    let rooted = app.file(None, "top.txt", 10).await;
    let err = app
        .service
        .move_node(&app.ctx, rooted.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidMove);
}

#[tokio::test]
async fn test_duplicate_sibling_names_conflict() {
    let app = helpers::TestApp::new();

    let builds = app.folder(None, "Builds").await;
    app.folder(Some(builds.id), "v1").await;

    let err = app
        .service
        .create_folder(&app.ctx, Some(builds.id), "v1")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Renaming onto an existing sibling is also a conflict.
    let v2 = app.folder(Some(builds.id), "v2").await;
    let err = app.service.rename(&app.ctx, v2.id, "v1").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Moving a same-named node into the folder is a conflict too.
    let stray = app.folder(None, "v1").await;
    let err = app
        .service
        .move_node(&app.ctx, stray.id, Some(builds.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_rename_validation() {
    let app = helpers::TestApp::new();
    let builds = app.folder(None, "Builds").await;

    for bad in ["", "   ", "a/b", "Builds"] {
        let err = app.service.rename(&app.ctx, builds.id, bad).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "name: {bad:?}");
    }
}

#[tokio::test]
async fn test_delete_file_removes_payload() {
    let app = helpers::TestApp::new();

    let notes = app.file(None, "notes.txt", 64).await;
    let content_ref = notes.content_ref.clone().unwrap();
    assert!(app.content.exists(&content_ref).await.unwrap());

    let outcome = app.service.delete(&app.ctx, notes.id).await.unwrap();
    assert!(outcome.is_complete());
    assert!(!app.content.exists(&content_ref).await.unwrap());
    assert!(app.all_nodes().await.is_empty());
}

#[tokio::test]
async fn test_cascade_delete_completeness() {
    let app = helpers::TestApp::new();

    let root = app.folder(None, "project").await;
    let src = app.folder(Some(root.id), "src").await;
    let deep = app.folder(Some(src.id), "deep").await;
    app.file(Some(deep.id), "a.rs", 10).await;
    app.file(Some(src.id), "b.rs", 20).await;
    app.file(Some(root.id), "README.md", 30).await;
    let survivor = app.file(None, "keep.txt", 40).await;

    let outcome = app.service.delete(&app.ctx, root.id).await.unwrap();
    assert!(outcome.is_complete());
    assert_eq!(outcome.deleted.len(), 6);
    assert_eq!(outcome.parent_id, None);

    // No record with the subtree's path prefix survives.
    let nodes = app.all_nodes().await;
    assert!(nodes.iter().all(|n| !n.path.starts_with("project")));
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, survivor.id);
    assert_eq!(app.service.usage(&app.ctx).await.unwrap(), 40);
}

#[tokio::test]
async fn test_delete_outcome_names_former_parent() {
    let app = helpers::TestApp::new();

    let builds = app.folder(None, "Builds").await;
    let v1 = app.folder(Some(builds.id), "v1").await;

    let outcome = app.service.delete(&app.ctx, v1.id).await.unwrap();
    assert_eq!(outcome.parent_id, Some(builds.id));
}

#[tokio::test]
async fn test_breadcrumbs_root_to_leaf() {
    let app = helpers::TestApp::new();

    let a = app.folder(None, "a").await;
    let b = app.folder(Some(a.id), "b").await;
    let c = app.folder(Some(b.id), "c").await;
    let f = app.file(Some(c.id), "notes.txt", 1).await;

    let chain = app.service.breadcrumbs(&app.ctx, f.id).await.unwrap();
    let names: Vec<_> = chain.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "notes.txt"]);

    let chain = app.service.breadcrumbs(&app.ctx, a.id).await.unwrap();
    assert_eq!(chain.len(), 1);
}

#[tokio::test]
async fn test_breadcrumbs_tolerate_broken_chain() {
    let app = helpers::TestApp::new();

    let a = app.folder(None, "a").await;
    let b = app.folder(Some(a.id), "b").await;
    let c = app.folder(Some(b.id), "c").await;

    // Orphan c by removing b's record out from under it.
    app.repo.delete(app.ctx.owner_id, b.id).await.unwrap();

    let chain = app.service.breadcrumbs(&app.ctx, c.id).await.unwrap();
    let names: Vec<_> = chain.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["c"]);
}

#[tokio::test]
async fn test_repath_is_idempotent() {
    let app = helpers::TestApp::new();

    let builds = app.folder(None, "Builds").await;
    let v1 = app.folder(Some(builds.id), "v1").await;
    let notes = app.file(Some(v1.id), "notes.txt", 5).await;

    app.service
        .rename(&app.ctx, builds.id, "Releases")
        .await
        .unwrap();
    let after_first: Vec<String> = app.all_nodes().await.into_iter().map(|n| n.path).collect();

    // Re-running the completed propagation touches nothing.
    let maintainer = PathMaintainer::new(std::sync::Arc::clone(&app.repo));
    let updated = maintainer
        .repath(app.ctx.owner_id, builds.id, "Builds", "Releases")
        .await
        .unwrap();
    assert_eq!(updated, 0);

    let after_second: Vec<String> = app.all_nodes().await.into_iter().map(|n| n.path).collect();
    assert_eq!(after_first, after_second);
    assert_eq!(app.node(notes.id).await.path, "Releases/v1/notes.txt");
}

#[tokio::test]
async fn test_listing_is_folders_first() {
    let app = helpers::TestApp::new();

    app.file(None, "zebra.txt", 1).await;
    app.folder(None, "alpha").await;
    app.file(None, "apple.txt", 1).await;
    app.folder(None, "beta").await;

    let listing = app
        .service
        .list(
            &app.ctx,
            None,
            ListOptions {
                sort: SortField::Name,
                order: SortOrder::Asc,
            },
        )
        .await
        .unwrap();

    let names: Vec<_> = listing.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "apple.txt", "zebra.txt"]);
}

#[tokio::test]
async fn test_list_missing_parent_is_not_found() {
    let app = helpers::TestApp::new();
    let ghost = craftbox_core::types::NodeId::new();

    let err = app
        .service
        .list(&app.ctx, Some(ghost), ListOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let app = helpers::TestApp::new();

    let builds = app.folder(None, "Builds").await;
    app.file(Some(builds.id), "Notes.TXT", 1).await;
    app.file(None, "other.md", 1).await;

    let hits = app.service.search(&app.ctx, "notes").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Notes.TXT");
}

#[tokio::test]
async fn test_quota_status_against_plan() {
    let app = helpers::TestApp::new();

    app.file(None, "big.bin", 600 * 1024 * 1024).await;

    let status = app
        .service
        .quota_status(&app.ctx, StoragePlan::Free)
        .await
        .unwrap();
    assert_eq!(status.used_bytes, 600 * 1024 * 1024);
    assert!(!status.is_exceeded());
    assert!(status.percent_used > 50.0);

    assert_eq!(
        app.service.cached_usage(&app.ctx).await.unwrap(),
        600 * 1024 * 1024
    );
}

#[tokio::test]
async fn test_register_file_requires_stored_payload() {
    let app = helpers::TestApp::new();

    let err = app
        .service
        .register_file(
            &app.ctx,
            craftbox_service::RegisterFileRequest {
                parent_id: None,
                name: "ghost.txt".to_string(),
                size_bytes: 10,
                mime_type: None,
                content_ref: "nothing/here".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
