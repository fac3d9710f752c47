use assert_fs::prelude::*;
use mirror_fs::{RelativePath, list_directories, scan};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn scan_records_nested_files_with_lengths() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("a.txt").write_str("AAAAA").unwrap();
    temp.child("dir/b.txt").write_str("BB").unwrap();
    temp.child("dir/deeper/c.bin").write_binary(&[0u8; 10]).unwrap();

    let snapshot = scan(temp.path()).unwrap();

    let entries: Vec<(String, u64)> = snapshot
        .iter()
        .map(|(path, meta)| (path.to_string(), meta.len))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("a.txt".to_string(), 5),
            ("dir/b.txt".to_string(), 2),
            ("dir/deeper/c.bin".to_string(), 10),
        ]
    );
}

#[test]
fn scan_records_absolute_locations() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("dir/b.txt").write_str("BB").unwrap();

    let snapshot = scan(temp.path()).unwrap();
    let meta = snapshot.get(&RelativePath::new("dir/b.txt")).unwrap();

    assert!(meta.path.is_absolute());
    assert_eq!(std::fs::read_to_string(&meta.path).unwrap(), "BB");
    assert!(meta.path.starts_with(snapshot.root()));
}

#[test]
fn scan_ignores_empty_directories() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("empty/nested").create_dir_all().unwrap();

    let snapshot = scan(temp.path()).unwrap();

    assert!(snapshot.is_empty());
}

#[cfg(unix)]
#[test]
fn scan_skips_symlinks() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("real.txt").write_str("real").unwrap();
    std::os::unix::fs::symlink(temp.child("real.txt").path(), temp.child("link.txt").path())
        .unwrap();

    let snapshot = scan(temp.path()).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.contains(&RelativePath::new("real.txt")));
}

#[rstest]
#[case::flat(&["a"], &["a"])]
#[case::nested(&["a/b/c"], &["a", "a/b", "a/b/c"])]
#[case::siblings(&["x/1", "x/2", "y"], &["x", "x/1", "x/2", "y"])]
fn list_directories_finds_every_level(#[case] create: &[&str], #[case] expected: &[&str]) {
    let temp = assert_fs::TempDir::new().unwrap();
    for dir in create {
        temp.child(dir).create_dir_all().unwrap();
    }

    let mut dirs = list_directories(temp.path()).unwrap();
    dirs.sort();

    let expected: Vec<RelativePath> = expected.iter().map(|p| RelativePath::new(p)).collect();
    assert_eq!(dirs, expected);
}
