/*!
 * Join Tests
 * Composition of sandboxed paths from untrusted segments
 */

use std::path::PathBuf;

use path_sandbox::SandboxError;
use pretty_assertions::assert_eq;

use crate::common::temp_sandbox;

#[test]
fn test_chained_join_matches_single_join() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir_all(root.join("a/b")).unwrap();

    let chained = sandbox.join("a").unwrap().join("b").unwrap();
    let single = sandbox.join("a/b").unwrap();

    assert_eq!(chained.realpath().unwrap(), single.realpath().unwrap());
    assert_eq!(chained, single);
}

#[test]
fn test_join_parent_escape_rejected() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir_all(root.join("x/y")).unwrap();

    let err = sandbox.join("../etc/passwd").unwrap_err();
    assert!(matches!(err, SandboxError::Violation { .. }));

    let deeper = sandbox.join("x/y").unwrap();
    assert!(deeper.join("../../..").unwrap_err().is_violation());
    assert!(deeper.join("../..").is_ok());
}

#[test]
fn test_absolute_segment_is_relative() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir(root.join("etc")).unwrap();

    let boxed = sandbox.join("/etc/passwd").unwrap();
    assert_eq!(boxed.realpath().unwrap(), root.join("etc/passwd"));
    assert!(!boxed.exists().unwrap());
}

#[test]
fn test_dot_segments_inside_sandbox() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir(root.join("a")).unwrap();
    std::fs::create_dir(root.join("b")).unwrap();

    let boxed = sandbox.join("./a/../b/.").unwrap();
    assert_eq!(boxed.realpath().unwrap(), root.join("b"));
    assert!(boxed.is_dir().unwrap());
}

#[test]
fn test_relative_path_and_root() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir_all(root.join("media/photos")).unwrap();

    let boxed = sandbox.join("media/photos/cat.jpg").unwrap();
    assert_eq!(
        boxed.relative_path().unwrap(),
        PathBuf::from("media/photos/cat.jpg")
    );
    assert_eq!(boxed.sandbox_root(), root.as_path());
    assert_eq!(sandbox.relative_path().unwrap(), PathBuf::new());
}

#[test]
fn test_parent_walks_up_to_root() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir_all(root.join("a/b")).unwrap();
    std::fs::write(root.join("a/b/f.txt"), b"f").unwrap();

    let file = sandbox.join("a/b/f.txt").unwrap();
    let b = file.parent().unwrap().unwrap();
    assert_eq!(b.realpath().unwrap(), root.join("a/b"));

    let a = b.parent().unwrap().unwrap();
    let top = a.parent().unwrap().unwrap();
    assert!(top.is_sandbox_root().unwrap());
    assert!(top.parent().unwrap().is_none());
}

#[test]
fn test_boxed_relative_to_sandbox() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir(root.join("inbox")).unwrap();

    let boxed = sandbox.boxed("inbox/mail.eml").unwrap();
    assert_eq!(boxed.to_string(), PathBuf::from("inbox/mail.eml").display().to_string());
    assert_eq!(boxed.realpath().unwrap(), root.join("inbox/mail.eml"));
    assert!(sandbox.boxed("../outside").unwrap_err().is_violation());
}

#[test]
fn test_failed_join_leaves_original_usable() {
    let (_temp, sandbox, root) = temp_sandbox();
    std::fs::create_dir(root.join("docs")).unwrap();
    let docs = sandbox.join("docs").unwrap();

    assert!(docs.join("../../escape").is_err());
    assert_eq!(docs.join("ok.txt").unwrap().realpath().unwrap(), root.join("docs/ok.txt"));
}
