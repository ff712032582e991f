// tests/process_supervisor.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lovewatch::errors::LovewatchError;
use lovewatch::exec::{LaunchSpec, ProcessBackend, ProcessState, ProcessSupervisor};

fn long_running() -> LaunchSpec {
    LaunchSpec::new("sleep").arg("30")
}

async fn wait_for_state(supervisor: &ProcessSupervisor, wanted: ProcessState) {
    while supervisor.state().await != wanted {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn start_then_stop() {
    init_tracing();
    let supervisor = ProcessSupervisor::new();

    with_timeout(async {
        supervisor.start(&long_running()).await.unwrap();
        assert_eq!(supervisor.state().await, ProcessState::Running);
        assert!(supervisor.pid().await.is_some());
        assert_eq!(supervisor.live_children(), 1);

        supervisor.stop().await.unwrap();
        assert_eq!(supervisor.state().await, ProcessState::Stopped);
        assert_eq!(supervisor.pid().await, None);
        assert_eq!(supervisor.live_children(), 0);
    })
    .await;
}

#[tokio::test]
async fn stop_when_nothing_runs_is_a_noop() {
    let supervisor = ProcessSupervisor::new();

    with_timeout(async {
        supervisor.stop().await.unwrap();
        supervisor.stop().await.unwrap();
    })
    .await;

    assert_eq!(supervisor.state().await, ProcessState::Stopped);
    assert_eq!(supervisor.launches().await, 0);
}

#[tokio::test]
async fn start_while_running_is_rejected() {
    let supervisor = ProcessSupervisor::new();

    with_timeout(async {
        supervisor.start(&long_running()).await.unwrap();
        let pid = supervisor.pid().await;

        let err = supervisor.start(&long_running()).await.unwrap_err();
        assert!(
            matches!(err, LovewatchError::AlreadyRunning(p) if p == pid),
            "got {err:?}"
        );
        assert_eq!(supervisor.launches().await, 1);
        assert_eq!(supervisor.live_children(), 1);

        supervisor.stop().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn restart_replaces_the_child() {
    let supervisor = ProcessSupervisor::new();

    with_timeout(async {
        supervisor.start(&long_running()).await.unwrap();
        let first = supervisor.pid().await;

        supervisor.restart(&long_running()).await.unwrap();
        let second = supervisor.pid().await;

        assert!(second.is_some());
        assert_ne!(first, second);
        assert_eq!(supervisor.launches().await, 2);
        assert_eq!(supervisor.live_children(), 1);

        supervisor.stop().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn restart_from_stopped_just_starts() {
    let supervisor = ProcessSupervisor::new();

    with_timeout(async {
        supervisor.restart(&long_running()).await.unwrap();
        assert_eq!(supervisor.state().await, ProcessState::Running);
        assert_eq!(supervisor.launches().await, 1);
        supervisor.stop().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn concurrent_restarts_never_overlap_children() {
    init_tracing();
    let supervisor = Arc::new(ProcessSupervisor::new());
    let max_seen = Arc::new(AtomicUsize::new(0));
    let done = Arc::new(AtomicBool::new(false));

    let sampler = {
        let supervisor = Arc::clone(&supervisor);
        let max_seen = Arc::clone(&max_seen);
        let done = Arc::clone(&done);
        tokio::spawn(async move {
            while !done.load(Ordering::SeqCst) {
                max_seen.fetch_max(supervisor.live_children(), Ordering::SeqCst);
                tokio::task::yield_now().await;
            }
        })
    };

    with_timeout(async {
        supervisor.start(&long_running()).await.unwrap();

        let a = {
            let s = Arc::clone(&supervisor);
            tokio::spawn(async move { s.restart(&long_running()).await })
        };
        let b = {
            let s = Arc::clone(&supervisor);
            tokio::spawn(async move { s.restart(&long_running()).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(supervisor.launches().await, 3);
        assert_eq!(supervisor.live_children(), 1);
        assert_eq!(supervisor.state().await, ProcessState::Running);

        supervisor.stop().await.unwrap();
    })
    .await;

    done.store(true, Ordering::SeqCst);
    sampler.await.unwrap();

    assert!(max_seen.load(Ordering::SeqCst) <= 1);
    assert_eq!(supervisor.live_children(), 0);
}

#[tokio::test]
async fn child_exiting_on_its_own_returns_to_stopped() {
    let supervisor = ProcessSupervisor::new();

    with_timeout(async {
        supervisor.start(&LaunchSpec::new("true")).await.unwrap();
        wait_for_state(&supervisor, ProcessState::Stopped).await;

        assert_eq!(supervisor.pid().await, None);
        assert_eq!(supervisor.live_children(), 0);

        // Nothing left to stop, and a fresh start is allowed.
        supervisor.stop().await.unwrap();
        supervisor.start(&long_running()).await.unwrap();
        assert_eq!(supervisor.launches().await, 2);
        supervisor.stop().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn crashing_child_returns_to_stopped() {
    let supervisor = ProcessSupervisor::new();

    with_timeout(async {
        let crash = LaunchSpec::new("sh").arg("-c").arg("exit 3");
        supervisor.start(&crash).await.unwrap();
        wait_for_state(&supervisor, ProcessState::Stopped).await;
        assert_eq!(supervisor.live_children(), 0);
    })
    .await;
}

#[tokio::test]
async fn launch_failure_leaves_supervisor_stopped() {
    init_tracing();
    let supervisor = ProcessSupervisor::new();
    let missing = LaunchSpec::new("lovewatch-test-no-such-runtime").arg("game.love");

    with_timeout(async {
        let err = supervisor.start(&missing).await.unwrap_err();
        match err {
            LovewatchError::ProcessLaunch { program, .. } => {
                assert_eq!(program, "lovewatch-test-no-such-runtime");
            }
            other => panic!("expected ProcessLaunch, got {other:?}"),
        }
        assert_eq!(supervisor.state().await, ProcessState::Stopped);
        assert_eq!(supervisor.live_children(), 0);

        // The failed launch does not poison later attempts.
        supervisor.restart(&long_running()).await.unwrap();
        assert_eq!(supervisor.state().await, ProcessState::Running);
        supervisor.stop().await.unwrap();
    })
    .await;
}

#[tokio::test]
async fn failed_restart_still_stops_the_old_child() {
    let supervisor = ProcessSupervisor::new();
    let missing = LaunchSpec::new("lovewatch-test-no-such-runtime");

    with_timeout(async {
        supervisor.start(&long_running()).await.unwrap();

        let err = supervisor.restart(&missing).await.unwrap_err();
        assert!(matches!(err, LovewatchError::ProcessLaunch { .. }), "got {err:?}");

        assert_eq!(supervisor.state().await, ProcessState::Stopped);
        assert_eq!(supervisor.live_children(), 0);
    })
    .await;
}

#[tokio::test]
async fn works_through_the_backend_trait() {
    let supervisor: Arc<ProcessSupervisor> = Arc::new(ProcessSupervisor::new());
    let backend: &dyn ProcessBackend = &supervisor;

    with_timeout(async {
        backend.restart(&long_running()).await.unwrap();
        assert_eq!(supervisor.state().await, ProcessState::Running);
        backend.stop().await.unwrap();
        assert_eq!(supervisor.state().await, ProcessState::Stopped);
    })
    .await;
}
