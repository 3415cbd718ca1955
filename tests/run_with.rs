// tests/run_with.rs

use std::error::Error;
use std::sync::Arc;

use treerun::config::{RawSettings, Settings};
use treerun::console::BufferConsole;
use treerun::errors::TreerunError;
use treerun::fs::RealFileSystem;
use treerun_test_utils::init_tracing;
use treerun_test_utils::tree::TaskTree;

type TestResult = Result<(), Box<dyn Error>>;

fn settings_with_runner(tree: &TaskTree) -> Settings {
    let mut raw = RawSettings::default();
    raw.runner.global = tree.path("no-global-runner");
    raw.apply_overrides(Some(tree.path("bin/gulp")), None);
    Settings::try_from(raw).expect("valid settings")
}

#[tokio::test]
async fn dry_run_prints_banner_with_inferred_default_task() -> TestResult {
    init_tracing();

    let tree = TaskTree::new()
        .file("bin/gulp", "")
        .task_dir("ws/a")
        .task_dir("ws/b");
    let console = BufferConsole::new();
    let positional = vec![tree.path("ws").display().to_string()];

    treerun::run_with(
        &positional,
        &settings_with_runner(&tree),
        &RealFileSystem,
        tree.root(),
        Arc::new(console.clone()),
        true,
    )
    .await?;

    let expected = format!(
        "Running cmd:   {} default\nIn directories: \n           {}\n           {}\n\n----------\n\n",
        tree.path("bin/gulp").display(),
        tree.path("ws/a").display(),
        tree.path("ws/b").display(),
    );
    assert_eq!(console.contents(), expected);
    Ok(())
}

#[tokio::test]
async fn explicit_task_name_is_used() -> TestResult {
    init_tracing();

    let tree = TaskTree::new().file("bin/gulp", "").task_dir("ws/a");
    let console = BufferConsole::new();
    let positional = vec![tree.path("ws").display().to_string(), "lint".to_string()];

    treerun::run_with(
        &positional,
        &settings_with_runner(&tree),
        &RealFileSystem,
        tree.root(),
        Arc::new(console.clone()),
        true,
    )
    .await?;

    assert!(console.contents().starts_with(&format!(
        "Running cmd:   {} lint\n",
        tree.path("bin/gulp").display()
    )));
    Ok(())
}

#[tokio::test]
async fn missing_runner_fails_before_anything_is_printed() -> TestResult {
    init_tracing();

    let tree = TaskTree::new().task_dir("ws/a");
    let mut raw = RawSettings::default();
    raw.runner.global = tree.path("nowhere/gulp");
    let settings = Settings::try_from(raw)?;
    let console = BufferConsole::new();

    let err = treerun::run_with(
        &[tree.path("ws").display().to_string()],
        &settings,
        &RealFileSystem,
        tree.root(),
        Arc::new(console.clone()),
        true,
    )
    .await
    .unwrap_err();

    let err = err.downcast::<TreerunError>()?;
    assert!(matches!(err, TreerunError::RunnerNotFound { .. }));
    assert!(console.contents().is_empty());
    Ok(())
}

#[tokio::test]
async fn relative_root_is_resolved_against_given_working_directory() -> TestResult {
    init_tracing();

    let tree = TaskTree::new().file("bin/gulp", "").task_dir("ws/a");
    let console = BufferConsole::new();

    // "ws" only exists relative to the tree, not the test process.
    treerun::run_with(
        &["ws".to_string()],
        &settings_with_runner(&tree),
        &RealFileSystem,
        tree.root(),
        Arc::new(console.clone()),
        true,
    )
    .await?;

    let expected = format!(
        "Running cmd:   {} default\nIn directories: \n           {}\n\n----------\n\n",
        tree.path("bin/gulp").display(),
        tree.path("ws/a").display(),
    );
    assert_eq!(console.contents(), expected);
    Ok(())
}
