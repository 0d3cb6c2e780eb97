use office_file_version_updater::collate::{collate, is_lock_artifact};
use office_file_version_updater::model::Family;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Layout:
///   root/
///     report.doc
///     ~$report.doc        ← open-document lock artifact, always ignored
///     notes.docx
///     macros.docm
///     budget.xls
///     budget.xlsx         ← current-format Excel, never collected
///     nested/
///       deck.ppt
///       show.pps
///       deck.pptx         ← current-format PowerPoint, never collected
///     readme.txt
fn create_test_tree(root: &Path) {
    let nested = root.join("nested");
    fs::create_dir_all(&nested).unwrap();
    for name in [
        "report.doc",
        "~$report.doc",
        "notes.docx",
        "macros.docm",
        "budget.xls",
        "budget.xlsx",
        "readme.txt",
    ] {
        fs::write(root.join(name), b"x").unwrap();
    }
    for name in ["deck.ppt", "show.pps", "deck.pptx"] {
        fs::write(nested.join(name), b"x").unwrap();
    }
}

#[test]
fn partitions_recursively_by_family() {
    let tmp = tempdir().unwrap();
    create_test_tree(tmp.path());

    let sets = collate(tmp.path(), &Family::ALL);

    let word: Vec<_> = sets
        .word
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(word, vec!["macros.docm", "notes.docx", "report.doc"]);

    assert_eq!(sets.excel.len(), 1);
    assert!(sets.excel[0].ends_with("budget.xls"));

    let ppt: Vec<_> = sets
        .powerpoint
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(ppt, vec!["deck.ppt", "show.pps"]);
}

#[test]
fn lock_artifacts_are_excluded_regardless_of_extension() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("~$report.doc"), b"x").unwrap();
    fs::write(tmp.path().join("~$budget.xls"), b"x").unwrap();
    fs::write(tmp.path().join("report.doc"), b"x").unwrap();

    let sets = collate(tmp.path(), &Family::ALL);
    assert_eq!(sets.word.len(), 1);
    assert!(sets.word[0].ends_with("report.doc"));
    assert!(sets.excel.is_empty());
    assert!(is_lock_artifact(&tmp.path().join("~$budget.xls")));
}

#[test]
fn only_enabled_families_are_collected() {
    let tmp = tempdir().unwrap();
    create_test_tree(tmp.path());

    let sets = collate(tmp.path(), &[Family::Excel]);
    assert!(sets.word.is_empty());
    assert!(sets.powerpoint.is_empty());
    assert_eq!(sets.excel.len(), 1);
}

#[test]
fn empty_folder_is_a_normal_outcome() {
    let tmp = tempdir().unwrap();
    let sets = collate(tmp.path(), &Family::ALL);
    assert_eq!(sets.total(), 0);
}

#[test]
fn extension_match_ignores_case() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("REPORT.DOC"), b"x").unwrap();
    fs::write(tmp.path().join("Budget.XLS"), b"x").unwrap();

    let sets = collate(tmp.path(), &Family::ALL);
    assert_eq!(sets.word.len(), 1);
    assert_eq!(sets.excel.len(), 1);
}
