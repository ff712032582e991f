use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use lovewatch::errors::LovewatchError;
use lovewatch::exec::{BackendFuture, LaunchSpec, ProcessBackend};

/// Calls observed by [`FakeProcess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessCall {
    Restart(LaunchSpec),
    Stop,
}

/// A fake process backend that:
/// - records every restart/stop call
/// - optionally fails every restart, like a missing runtime executable
/// - optionally takes a while to restart, like a runtime slow to shut down.
#[derive(Debug, Clone, Default)]
pub struct FakeProcess {
    calls: Arc<Mutex<Vec<ProcessCall>>>,
    fail_restarts: bool,
    restart_delay: Duration,
}

impl FakeProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_restarts: true,
            ..Self::default()
        }
    }

    pub fn slow(restart_delay: Duration) -> Self {
        Self {
            restart_delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ProcessCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn restarts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ProcessCall::Restart(_)))
            .count()
    }
}

impl ProcessBackend for FakeProcess {
    fn restart<'a>(&'a self, launch: &'a LaunchSpec) -> BackendFuture<'a> {
        let calls = Arc::clone(&self.calls);
        let fail = self.fail_restarts;
        let delay = self.restart_delay;
        let launch = launch.clone();

        Box::pin(async move {
            calls.lock().unwrap().push(ProcessCall::Restart(launch));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if fail {
                return Err(LovewatchError::Other(anyhow!("fake runtime refused to start")));
            }
            Ok(())
        })
    }

    fn stop(&self) -> BackendFuture<'_> {
        let calls = Arc::clone(&self.calls);
        Box::pin(async move {
            calls.lock().unwrap().push(ProcessCall::Stop);
            Ok(())
        })
    }
}
