// tests/supervisor_scripted.rs

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use treerun::console::BufferConsole;
use treerun::discover::TaskDirectorySet;
use treerun::engine::Supervisor;
use treerun::errors::TreerunError;
use treerun::locate::RunnerLocation;
use treerun_test_utils::scripted_backend::{Script, ScriptedBackend};
use treerun_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn three_dirs() -> TaskDirectorySet {
    ["d1", "d2", "d3"].into_iter().map(PathBuf::from).collect()
}

fn runner() -> RunnerLocation {
    RunnerLocation::new("/usr/local/bin/gulp")
}

#[tokio::test]
async fn all_success_resolves_after_every_directory_reports() -> TestResult {
    init_tracing();

    let backend = ScriptedBackend::new()
        .with_script("d1", Script::succeed_after(30))
        .with_script("d2", Script::succeed_after(10))
        .with_script("d3", Script::succeed_after(20));
    let log = backend.log();
    let console = BufferConsole::new();

    with_timeout(
        Supervisor::new(backend, Arc::new(console.clone())).run(&three_dirs(), "build", &runner()),
    )
    .await?;

    let log = log.lock().unwrap();
    assert_eq!(log.started.len(), 3);
    assert_eq!(log.exited.len(), 3);
    assert!(log.cancelled.is_empty());
    assert!(log.started.iter().all(|spec| spec.task == "build"));
    assert!(!console.contents().contains("Encountered an error"));
    Ok(())
}

#[tokio::test]
async fn first_failure_kills_running_siblings() -> TestResult {
    init_tracing();

    let backend = ScriptedBackend::new()
        .with_script("d1", Script::Hang)
        .with_script("d2", Script::fail_after(1, 10))
        .with_script("d3", Script::Hang);
    let log = backend.log();
    let console = BufferConsole::new();

    let err = with_timeout(
        Supervisor::new(backend, Arc::new(console.clone())).run(&three_dirs(), "build", &runner()),
    )
    .await
    .unwrap_err();

    match err {
        TreerunError::TaskFailed { directory, code } => {
            assert_eq!(directory, PathBuf::from("d2"));
            assert_eq!(code, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let log = log.lock().unwrap();
    let mut cancelled = log.cancelled.clone();
    cancelled.sort();
    assert_eq!(cancelled, vec![PathBuf::from("d1"), PathBuf::from("d3")]);

    let out = console.contents();
    assert!(out.contains("Encountered an error in: d2\n"));
    assert!(out.contains("Please resolve errors and try again."));
    Ok(())
}

#[tokio::test]
async fn near_simultaneous_failures_report_once() -> TestResult {
    init_tracing();

    let backend = ScriptedBackend::new()
        .with_script("d1", Script::Hang)
        .with_script("d2", Script::fail_after(1, 10))
        .with_script("d3", Script::fail_after(2, 10));
    let console = BufferConsole::new();

    let err = with_timeout(
        Supervisor::new(backend, Arc::new(console.clone())).run(&three_dirs(), "build", &runner()),
    )
    .await
    .unwrap_err();

    assert!(err.is_task_failure());
    assert_eq!(console.contents().matches("Encountered an error in:").count(), 1);
    Ok(())
}

#[tokio::test]
async fn late_success_does_not_override_failure() -> TestResult {
    init_tracing();

    let backend = ScriptedBackend::new()
        .with_script("d1", Script::fail_after(4, 0))
        .with_script("d2", Script::succeed_after(0))
        .with_script("d3", Script::succeed_after(0));
    let console = BufferConsole::new();

    let result = with_timeout(
        Supervisor::new(backend, Arc::new(console)).run(&three_dirs(), "build", &runner()),
    )
    .await;

    assert!(matches!(
        result,
        Err(TreerunError::TaskFailed { code: 4, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn empty_directory_set_resolves_without_spawning() -> TestResult {
    init_tracing();

    let backend = ScriptedBackend::new();
    let log = backend.log();
    let console = BufferConsole::new();

    with_timeout(
        Supervisor::new(backend, Arc::new(console.clone())).run(
            &TaskDirectorySet::default(),
            "build",
            &runner(),
        ),
    )
    .await?;

    assert!(log.lock().unwrap().started.is_empty());
    assert!(console.contents().is_empty());
    Ok(())
}
