/*!
 * Gated I/O Tests
 * Operations delegated to the filesystem collaborator after validation
 */

use std::io::{Read, Write};

use path_sandbox::{FileType, FsError, OpenFlags, OpenMode, SandboxError};
use pretty_assertions::assert_eq;

use crate::common::temp_sandbox;

#[test]
fn test_open_create_then_read() {
    let (_temp, sandbox, root) = temp_sandbox();
    let note = sandbox.join("note.txt").unwrap();

    let mut file = note.open(OpenFlags::create(), OpenMode::default()).unwrap();
    file.write_all(b"hello sandbox").unwrap();
    file.sync().unwrap();
    drop(file);

    assert_eq!(std::fs::read(root.join("note.txt")).unwrap(), b"hello sandbox");

    let mut contents = String::new();
    note.open(OpenFlags::read_only(), OpenMode::default())
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "hello sandbox");

    let md = note.metadata().unwrap();
    assert!(md.is_file());
    assert_eq!(md.size, 13);
}

#[test]
fn test_open_missing_surfaces_fs_error() {
    let (_temp, sandbox, _root) = temp_sandbox();
    let missing = sandbox.join("missing.txt").unwrap();

    let err = missing
        .open(OpenFlags::read_only(), OpenMode::default())
        .err()
        .unwrap();
    assert!(matches!(err, SandboxError::Fs(FsError::NotFound(_))));

    let err = missing.metadata().unwrap_err();
    assert!(matches!(err, SandboxError::Fs(FsError::NotFound(_))));
}

#[test]
fn test_append_mode() {
    let (_temp, sandbox, root) = temp_sandbox();
    let log = sandbox.join("app.log").unwrap();

    for line in ["one\n", "two\n"] {
        let mut file = log.open(OpenFlags::append(), OpenMode::default()).unwrap();
        file.write_all(line.as_bytes()).unwrap();
    }
    assert_eq!(
        std::fs::read_to_string(root.join("app.log")).unwrap(),
        "one\ntwo\n"
    );
}

#[test]
fn test_list_dir_entries() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir(root.join("photos")).unwrap();
    std::fs::write(root.join("photos/a.jpg"), b"a").unwrap();
    std::fs::create_dir(root.join("photos/raw")).unwrap();

    let photos = sandbox.join("photos").unwrap();
    let entries = photos.list_dir().unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "raw"]);
    assert_eq!(entries[1].file_type, FileType::Directory);

    for entry in &entries {
        assert!(photos.join(&entry.name).unwrap().exists().unwrap());
    }
}

#[test]
fn test_exists_and_kind_checks() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir(root.join("dir")).unwrap();
    std::fs::write(root.join("dir/file"), b"").unwrap();

    let dir = sandbox.join("dir").unwrap();
    let file = dir.join("file").unwrap();
    let ghost = dir.join("ghost").unwrap();

    assert!(dir.exists().unwrap() && dir.is_dir().unwrap() && !dir.is_file().unwrap());
    assert!(file.exists().unwrap() && file.is_file().unwrap());
    assert!(!ghost.exists().unwrap());
    assert!(sandbox.exists().unwrap());
}

#[test]
fn test_exists_false_when_directory_replaced_by_file() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir(root.join("d")).unwrap();
    std::fs::write(root.join("d/child"), b"c").unwrap();
    let child = sandbox.join("d/child").unwrap();
    assert!(child.exists().unwrap());

    std::fs::remove_dir_all(root.join("d")).unwrap();
    std::fs::write(root.join("d"), b"now a file").unwrap();

    assert!(!child.exists().unwrap());
    assert!(!child.is_file().unwrap());
    assert!(matches!(
        child.metadata().unwrap_err(),
        SandboxError::Resolution {
            cause: FsError::NotADirectory(_),
            ..
        }
    ));
}

#[test]
fn test_exists_false_when_parent_removed() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir(root.join("tmp")).unwrap();
    let scratch = sandbox.join("tmp/scratch.bin").unwrap();

    std::fs::remove_dir(root.join("tmp")).unwrap();

    assert!(!scratch.exists().unwrap());
    assert!(scratch
        .open(OpenFlags::create(), OpenMode::default())
        .err()
        .unwrap()
        .is_resolution());
}

#[test]
fn test_concurrent_readers_share_values() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::write(root.join("shared.txt"), b"shared").unwrap();
    let shared = sandbox.join("shared.txt").unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let path = shared.clone();
            let expected = root.join("shared.txt");
            scope.spawn(move || {
                assert_eq!(path.metadata().unwrap().size, 6);
                assert_eq!(path.realpath().unwrap(), expected);
            });
        }
    });
}
