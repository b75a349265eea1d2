mod common;

use common::TestWorkspace;
use gencli_core::backup::CleanupPolicy;
use gencli_core::commands::dispatch;
use gencli_core::ui::{CaptureRenderer, MessageStyle};
use std::fs;

#[tokio::test]
async fn restore_by_file_name_takes_a_pre_restore_snapshot() {
    let ws = TestWorkspace::new();
    ws.write("src/app.js", "v2");
    let mut ctx = ws.context();
    let backup = ctx
        .backups
        .create_backup(ws.path().join("src/app.js"), "v1")
        .expect("backup");
    assert!(backup.starts_with(ws.path().join("backup").join("src")));

    let mut out = CaptureRenderer::new();
    dispatch(&mut ctx, "backup restore src/app.js", &mut out)
        .await
        .expect("dispatch");

    assert!(out.has_style(MessageStyle::Success), "{}", out.text());
    assert_eq!(ws.read("src/app.js"), "v1");
    let records = ctx.backups.list_backups().expect("list");
    assert_eq!(records.len(), 2);
    let snapshot = records.iter().find(|record| record.pre_restore).expect("snapshot");
    assert_eq!(fs::read_to_string(&snapshot.path).expect("read"), "v2");
    assert!(ws.model.requests().is_empty());
}

#[tokio::test]
async fn repeated_restore_by_file_name_keeps_the_backup_content() {
    let ws = TestWorkspace::new();
    ws.write("src/app.js", "v2");
    let mut ctx = ws.context();
    ctx.backups
        .create_backup(ws.path().join("src/app.js"), "v1")
        .expect("backup");

    for _ in 0..2 {
        let mut out = CaptureRenderer::new();
        dispatch(&mut ctx, "backup restore app.js", &mut out)
            .await
            .expect("dispatch");
        assert!(out.has_style(MessageStyle::Success), "{}", out.text());
        assert_eq!(ws.read("src/app.js"), "v1");
    }

    let records = ctx.backups.list_backups().expect("list");
    assert_eq!(records.iter().filter(|record| record.pre_restore).count(), 2);
    assert_eq!(records.iter().filter(|record| !record.pre_restore).count(), 1);
}

#[tokio::test]
async fn restore_of_unknown_file_reports_not_found() {
    let ws = TestWorkspace::new();
    ws.write("app.js", "v1");
    let mut ctx = ws.context();
    let mut out = CaptureRenderer::new();

    dispatch(&mut ctx, "backup restore app.js", &mut out)
        .await
        .expect("dispatch");

    assert!(out.has_style(MessageStyle::Error));
    assert!(out.text().contains("backup list"));
    assert_eq!(ws.read("app.js"), "v1");
}

#[tokio::test]
async fn cleanup_keeps_the_newest_per_request() {
    let ws = TestWorkspace::new();
    ws.write("app.js", "current");
    let mut ctx = ws.context();
    for version in ["one", "two", "three"] {
        ctx.backups
            .create_backup(ws.path().join("app.js"), version)
            .expect("backup");
    }

    let mut out = CaptureRenderer::new();
    dispatch(&mut ctx, "backup cleanup --keep 1", &mut out)
        .await
        .expect("dispatch");

    assert!(out.text().contains("Deleted 2 backup file(s)."), "{}", out.text());
    let remaining = ctx.backups.list_backups().expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(fs::read_to_string(&remaining[0].path).expect("read"), "three");
    assert_eq!(ws.read("app.js"), "current");
}

#[tokio::test]
async fn cleanup_all_removes_backup_tree() {
    let ws = TestWorkspace::new();
    ws.write("lib/util.js", "x");
    let ctx = ws.context();
    ctx.backups
        .create_backup(ws.path().join("lib/util.js"), "x")
        .expect("backup");

    let deleted = ctx.backups.cleanup_backups(CleanupPolicy::All).expect("cleanup");

    assert_eq!(deleted, 1);
    assert!(ws.backup_files().is_empty());
    assert!(!ws.path().join("backup").join("lib").exists());
    assert_eq!(ws.read("lib/util.js"), "x");
}

#[tokio::test]
async fn backup_list_shows_relative_names() {
    let ws = TestWorkspace::new();
    ws.write("src/app.js", "v1");
    let mut ctx = ws.context();
    ctx.backups
        .create_backup(ws.path().join("src/app.js"), "v1")
        .expect("backup");

    let mut out = CaptureRenderer::new();
    dispatch(&mut ctx, "backup list", &mut out).await.expect("dispatch");

    let text = out.text();
    assert!(text.contains("1 backup(s)"));
    assert!(text.contains("src/app.js"));
}
