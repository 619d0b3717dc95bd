//! Integration tests for file placement.
//!
//! These tests verify where files land and what happens to the source:
//! - Date buckets for originals
//! - Copy versus move
//! - Disabled categories
//! - Category priority for shared extensions
//! - Overwriting an existing destination
//! - Output roots inside the scanned directory
//! - Names that are not valid UTF-8

use assert_fs::prelude::*;
use assert_fs::TempDir;
use chrono::{Local, TimeZone};
use media_organizer::config::OrganizerSettings;
use media_organizer::core::organize::{OperationMode, ScanRequest};
use media_organizer::core::pipeline::{ScanCoordinator, ScanReport};
use media_organizer::core::scanner::MediaCategory;
use predicates::prelude::*;
use std::fs::File;
use std::path::Path;
use std::time::SystemTime;

fn set_modified(path: &Path, year: i32, month: u32, day: u32) {
    let when: SystemTime = Local
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .unwrap()
        .into();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}

fn organize(request: ScanRequest) -> ScanReport {
    ScanCoordinator::new(OrganizerSettings::default().with_workers(2))
        .scan_and_organize_files(request)
        .unwrap()
}

#[test]
fn original_lands_in_year_and_month_bucket() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    let photo = inbox.child("beach.jpg");
    photo.write_str("sand").unwrap();
    set_modified(photo.path(), 2024, 3, 15);

    organize(ScanRequest::new(inbox.path(), OperationMode::Copy));

    temp.child("photo_video/organized/2024/2024-03 March/beach.jpg")
        .assert("sand");
}

#[test]
fn buckets_follow_each_files_own_date() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    let winter = inbox.child("nested/winter.flac");
    winter.write_str("cold").unwrap();
    set_modified(winter.path(), 2019, 12, 31);
    let summer = inbox.child("summer.flac");
    summer.write_str("warm").unwrap();
    set_modified(summer.path(), 2021, 7, 4);

    organize(ScanRequest::new(inbox.path(), OperationMode::Copy));

    temp.child("audio/organized/2019/2019-12 December/winter.flac")
        .assert(predicate::path::is_file());
    temp.child("audio/organized/2021/2021-07 July/summer.flac")
        .assert(predicate::path::is_file());
}

#[test]
fn copy_leaves_source_in_place() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    let disk = inbox.child("backup.iso");
    disk.write_str("image").unwrap();
    set_modified(disk.path(), 2023, 1, 2);

    organize(ScanRequest::new(inbox.path(), OperationMode::Copy));

    disk.assert(predicate::path::is_file());
    temp.child("container/organized/2023/2023-01 January/backup.iso")
        .assert("image");
}

#[test]
fn move_removes_source() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    let first = inbox.child("bundle.zip");
    first.write_str("zipped").unwrap();
    set_modified(first.path(), 2022, 11, 5);
    let second = inbox.child("bundle-copy.zip");
    second.write_str("zipped").unwrap();

    let report = organize(ScanRequest::new(inbox.path(), OperationMode::Move));

    assert_eq!(report.files.organized.len(), 1);
    assert_eq!(report.files.duplicates.len(), 1);
    first.assert(predicate::path::missing());
    second.assert(predicate::path::missing());
    temp.child("archive/duplicates")
        .assert(predicate::path::is_dir());
}

#[test]
fn disabled_category_is_skipped_entirely() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    inbox.child("song.mp3").write_str("tune").unwrap();
    inbox.child("photo.jpg").write_str("pixels").unwrap();

    let report = organize(
        ScanRequest::new(inbox.path(), OperationMode::Move)
            .with_category(MediaCategory::Audio, false),
    );

    assert_eq!(report.files.organized, vec!["photo.jpg"]);
    assert!(report.files.duplicates.is_empty());
    inbox.child("song.mp3").assert("tune");
    temp.child("audio").assert(predicate::path::missing());
}

#[test]
fn shared_extension_goes_to_highest_priority_enabled_category() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    inbox.child("clip.ogg").write_str("ambiguous").unwrap();

    let mut settings = OrganizerSettings::default().with_workers(1);
    settings.photo_video_extensions.push(".ogg".into());
    settings.audio_extensions.push(".ogg".into());
    let settings = settings.normalized().unwrap();

    let coordinator = ScanCoordinator::new(settings);
    coordinator
        .scan_and_organize_files(ScanRequest::new(inbox.path(), OperationMode::Copy))
        .unwrap();
    temp.child("photo_video/organized")
        .assert(predicate::path::is_dir());
    temp.child("audio").assert(predicate::path::missing());

    // With photo/video off, audio is the next match
    coordinator
        .scan_and_organize_files(
            ScanRequest::new(inbox.path(), OperationMode::Copy)
                .with_category(MediaCategory::PhotoVideo, false),
        )
        .unwrap();
    temp.child("audio/organized").assert(predicate::path::is_dir());
}

#[test]
fn extension_match_ignores_case() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    inbox.child("SHOUTY.JPG").write_str("loud").unwrap();

    let report = organize(ScanRequest::new(inbox.path(), OperationMode::Copy));

    assert_eq!(report.files.organized, vec!["SHOUTY.JPG"]);
}

#[test]
fn existing_destination_is_overwritten() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    let photo = inbox.child("portrait.png");
    photo.write_str("new").unwrap();
    set_modified(photo.path(), 2020, 2, 29);

    let existing = temp.child("photo_video/organized/2020/2020-02 February/portrait.png");
    existing.write_str("old").unwrap();

    organize(ScanRequest::new(inbox.path(), OperationMode::Copy));

    existing.assert("new");
}

#[test]
fn rerun_over_organized_tree_is_stable() {
    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    let photo = inbox.child("a.jpg");
    photo.write_str("same").unwrap();
    set_modified(photo.path(), 2024, 3, 15);

    let coordinator = ScanCoordinator::new(OrganizerSettings::default().with_workers(1));
    for _ in 0..2 {
        let report = coordinator
            .scan_and_organize_files(ScanRequest::new(inbox.path(), OperationMode::Copy))
            .unwrap();
        assert_eq!(report.files.organized, vec!["a.jpg"]);
        assert!(report.files.duplicates.is_empty());
    }

    temp.child("photo_video/duplicates")
        .assert(predicate::path::missing());
}

#[test]
fn scan_directory_named_after_a_category_leaves_its_outputs_alone() {
    let temp = TempDir::new().unwrap();
    let scanned = temp.child("photo_video");
    let photo = scanned.child("a.jpg");
    photo.write_binary(b"precious bytes").unwrap();
    set_modified(photo.path(), 2024, 3, 15);
    let earlier = scanned.child("duplicates/b.jpg");
    earlier.write_binary(b"precious bytes").unwrap();

    let coordinator = ScanCoordinator::new(OrganizerSettings::default().with_workers(1));
    for _ in 0..2 {
        let report = coordinator
            .scan_and_organize_files(ScanRequest::new(scanned.path(), OperationMode::Copy))
            .unwrap();

        assert_eq!(report.total_files, 1);
        assert_eq!(report.files.organized, vec!["a.jpg"]);
        assert!(report.files.duplicates.is_empty());
        assert_eq!(report.failed, 0);
    }

    earlier.assert("precious bytes");
    scanned
        .child("organized/2024/2024-03 March/a.jpg")
        .assert("precious bytes");
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_name_is_organized() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new().unwrap();
    let inbox = temp.child("inbox");
    inbox.create_dir_all().unwrap();
    let photo = inbox.path().join(OsStr::from_bytes(b"caf\xe9.jpg"));
    std::fs::write(&photo, b"latin-1 name").unwrap();
    set_modified(&photo, 2023, 6, 1);

    let report = organize(ScanRequest::new(inbox.path(), OperationMode::Copy));

    assert_eq!(report.processed, 1);
    assert_eq!(report.files.organized, vec!["caf\u{FFFD}.jpg"]);
    let placed = temp
        .child("photo_video/organized/2023/2023-06 June")
        .path()
        .join(OsStr::from_bytes(b"caf\xe9.jpg"));
    assert_eq!(std::fs::read(placed).unwrap(), b"latin-1 name");
}
