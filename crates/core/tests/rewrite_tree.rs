use mta_rust_fiximports_core::{notice_line, FileStatus, RewriteConfig, Rewriter};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Run over `root` and return the printed notice lines, sorted
fn run(root: &Path) -> Vec<String> {
    let rewriter = Rewriter::new(RewriteConfig::new(root.to_path_buf())).unwrap();
    let mut lines = Vec::new();
    rewriter.run(|file| lines.extend(notice_line(file)));
    lines.sort();
    lines
}

fn sample_tree() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("lib");

    write(
        &root.join("features/tasks/presentation/habit_screen.dart"),
        "import 'package:flutter/material.dart';\n\
         import '../../../models/habit_model.dart';\n\
         import \"../../../widgets/progress_ring.dart\";\n\
         \n\
         class HabitScreen {}\n",
    );
    write(
        &root.join("main.dart"),
        "import 'package:flutter/material.dart';\n\nvoid main() {}\n",
    );
    write(&root.join("README.md"), "see 'models/habit_model.dart'\n");

    (dir, root)
}

#[test]
fn test_tree_rewritten_once() {
    let (_dir, root) = sample_tree();
    let screen = root.join("features/tasks/presentation/habit_screen.dart");
    let main_before = fs::read(root.join("main.dart")).unwrap();

    let lines = run(&root);
    assert_eq!(lines, vec![format!("Updated: {}", screen.display())]);

    assert_eq!(
        fs::read_to_string(&screen).unwrap(),
        "import 'package:flutter/material.dart';\n\
         import 'package:recalim/features/tasks/domain/entities/habit_model.dart';\n\
         import 'package:recalim/core/widgets/progress_ring.dart';\n\
         \n\
         class HabitScreen {}\n"
    );
    assert_eq!(fs::read(root.join("main.dart")).unwrap(), main_before);
    assert_eq!(
        fs::read_to_string(root.join("README.md")).unwrap(),
        "see 'models/habit_model.dart'\n"
    );
}

#[test]
fn test_second_run_reports_nothing() {
    let (_dir, root) = sample_tree();
    assert_eq!(run(&root).len(), 1);
    assert!(run(&root).is_empty());
}

#[test]
fn test_paths_reported_as_traversed() {
    let (dir, _root) = sample_tree();
    let config = RewriteConfig::new(dir.path().join("lib"));
    let report = Rewriter::new(config).unwrap().run(|_| {});

    for file in &report.files {
        assert!(file.path.starts_with(dir.path().join("lib")));
    }
    assert_eq!(report.stats.files_scanned, 2);
}

#[test]
fn test_failure_does_not_stop_run() {
    let (_dir, root) = sample_tree();
    write(&root.join("aaa/broken.dart"), "");
    fs::write(root.join("aaa/broken.dart"), [0xc3, 0x28, 0xff]).unwrap();
    write(
        &root.join("zzz/later.dart"),
        "import '../models/user_model.dart';\n",
    );

    let rewriter = Rewriter::new(RewriteConfig::new(root.clone())).unwrap();
    let mut lines = Vec::new();
    let report = rewriter.run(|file| lines.extend(notice_line(file)));

    assert_eq!(report.stats.files_failed, 1);
    assert_eq!(report.stats.files_updated, 2);
    let expected = format!("Error processing {}: ", root.join("aaa/broken.dart").display());
    assert!(lines.iter().any(|l| l.starts_with(&expected)));
    assert_eq!(
        fs::read_to_string(root.join("zzz/later.dart")).unwrap(),
        "import 'package:recalim/core/models/user_model.dart';\n"
    );
}

#[cfg(unix)]
#[test]
fn test_unwritable_file_reported() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, root) = sample_tree();
    let locked = root.join("locked.dart");
    write(&locked, "import '../models/workout_model.dart';\n");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).unwrap();

    // Privileged users bypass file permissions; nothing to simulate then
    if fs::OpenOptions::new().write(true).open(&locked).is_ok() {
        eprintln!(
            "skipping test_unwritable_file_reported: {} is writable despite mode 0444",
            locked.display()
        );
        return;
    }

    let report = Rewriter::new(RewriteConfig::new(root.clone()))
        .unwrap()
        .run(|_| {});

    let failed: Vec<_> = report.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].path, locked);
    assert_eq!(failed[0].status, FileStatus::Failed);
    assert_eq!(report.stats.files_updated, 1);
}

#[test]
fn test_missing_root_is_empty_run() {
    let dir = TempDir::new().unwrap();
    let report = Rewriter::new(RewriteConfig::new(dir.path().join("lib")))
        .unwrap()
        .run(|_| {});
    assert!(report.files.is_empty());
    assert!(!report.has_failures());
}

#[test]
fn test_dry_run_touches_nothing() {
    let (_dir, root) = sample_tree();
    let screen = root.join("features/tasks/presentation/habit_screen.dart");
    let before = fs::read(&screen).unwrap();

    let config = RewriteConfig::new(root.clone()).with_dry_run(true);
    let mut lines = Vec::new();
    let report = Rewriter::new(config)
        .unwrap()
        .run(|file| lines.extend(notice_line(file)));

    assert_eq!(lines, vec![format!("Would update: {}", screen.display())]);
    assert_eq!(report.stats.total_replacements, 2);
    assert_eq!(fs::read(&screen).unwrap(), before);
}

#[test]
fn test_partly_migrated_file_counts_only_changes() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("lib");
    write(
        &root.join("profile.dart"),
        "import 'package:recalim/core/models/user_model.dart';\n\
         import 'package:recalim/core/widgets/progress_ring.dart';\n\
         import '../models/habit_model.dart';\n",
    );
    write(
        &root.join("done.dart"),
        "import 'package:recalim/core/routes/app_routes.dart';\n",
    );

    let report = Rewriter::new(RewriteConfig::new(root.clone()))
        .unwrap()
        .run(|_| {});

    assert_eq!(report.stats.files_updated, 1);
    assert_eq!(report.stats.files_unchanged, 1);
    assert_eq!(report.stats.total_replacements, 1);
    let updated: Vec<_> = report.changed().collect();
    assert_eq!(updated[0].rules.len(), 1);
    assert_eq!(updated[0].rules[0].fragment, "models/habit_model.dart");
}
