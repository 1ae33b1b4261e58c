//! Supervised, restartable pipeline stages.
//!
//! Every stage runs in its own task under a single root cancellation token. A
//! stage that returns, fails or panics is restarted after a backoff; a panic can
//! instead be propagated to stop the whole process.

use std::{
    any::Any,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::metrics::STAGE_RESTARTS;

mod backoff;
pub use backoff::*;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Stage {stage} panicked: {message}")]
    StagePanicked { stage: String, message: String },
}

/// A long-running pipeline stage.
#[async_trait]
pub trait Runnable: Send + Sync {
    /// Runs until the stream it consumes ends, an error occurs or `ctx` is cancelled.
    async fn run(&self, ctx: StageContext) -> eyre::Result<()>;
}

/// Handed to each run of a stage.
#[derive(Clone, Debug)]
pub struct StageContext {
    name: String,
    cancel: CancellationToken,
    healthy: Arc<AtomicBool>,
}

impl StageContext {
    pub fn new(name: &str, cancel: CancellationToken) -> Self {
        Self {
            name: name.to_string(),
            cancel,
            healthy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Marks this run as healthy, which resets the restart backoff.
    pub fn signal_healthy(&self) {
        if !self.healthy.swap(true, Ordering::SeqCst) {
            debug!(stage = %self.name, "stage healthy");
        }
    }

    fn was_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug)]
pub struct SupervisorOptions {
    /// Cancel everything when a stage panics instead of restarting it.
    pub propagate_panics: bool,
    pub backoff: RestartBackoff,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            propagate_panics: true,
            backoff: RestartBackoff::default(),
        }
    }
}

pub struct Supervisor {
    cancel: CancellationToken,
    options: SupervisorOptions,
    stages: JoinSet<Result<(), SupervisorError>>,
}

impl Supervisor {
    pub fn new(cancel: CancellationToken, options: SupervisorOptions) -> Self {
        Self {
            cancel,
            options,
            stages: JoinSet::new(),
        }
    }

    pub fn spawn(&mut self, name: &str, stage: Arc<dyn Runnable>) {
        info!(stage = %name, "starting stage");
        self.stages.spawn(supervise(
            name.to_string(),
            stage,
            self.cancel.clone(),
            self.options.clone(),
        ));
    }

    /// Resolves once every stage has stopped.
    ///
    /// Returns the first propagated panic, if any.
    pub async fn wait(mut self) -> Result<(), SupervisorError> {
        let mut outcome = Ok(());
        while let Some(joined) = self.stages.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if outcome.is_ok() {
                        outcome = Err(e);
                    }
                }
                Err(e) => error!(error = %e, "supervision task failed"),
            }
        }
        outcome
    }
}

async fn supervise(
    name: String,
    stage: Arc<dyn Runnable>,
    cancel: CancellationToken,
    options: SupervisorOptions,
) -> Result<(), SupervisorError> {
    let mut attempt = 0usize;

    while !cancel.is_cancelled() {
        let ctx = StageContext::new(&name, cancel.clone());
        let run_ctx = ctx.clone();
        let runner = stage.clone();
        let outcome = tokio::spawn(async move { runner.run(run_ctx).await }).await;

        if ctx.was_healthy() {
            attempt = 0;
        }

        match outcome {
            Ok(Ok(())) if cancel.is_cancelled() => break,
            Ok(Ok(())) => warn!(stage = %name, "stage returned, restarting"),
            Ok(Err(e)) => error!(stage = %name, error = %e, "stage failed, restarting"),
            Err(join_error) if join_error.is_panic() => {
                let message = panic_message(join_error.into_panic());
                error!(stage = %name, panic = %message, "stage panicked");
                if options.propagate_panics {
                    cancel.cancel();
                    return Err(SupervisorError::StagePanicked {
                        stage: name,
                        message,
                    });
                }
            }
            Err(join_error) => error!(stage = %name, error = %join_error, "stage task aborted"),
        }

        if cancel.is_cancelled() {
            break;
        }

        STAGE_RESTARTS.with_label_values(&[name.as_str()]).inc();
        let delay = options.backoff.backoff_duration(attempt);
        attempt = attempt.saturating_add(1);
        debug!(stage = %name, delay_ms = delay.as_millis() as u64, "restarting stage");

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = cancel.cancelled() => break,
        }
    }

    info!(stage = %name, "stage stopped");
    Ok(())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::atomic::AtomicUsize, time::Duration};

    fn fast_options(propagate_panics: bool) -> SupervisorOptions {
        SupervisorOptions {
            propagate_panics,
            backoff: RestartBackoff {
                initial_backoff: Duration::from_millis(5),
                multiplier: 1.0,
                max_backoff: Duration::from_millis(5),
            },
        }
    }

    async fn wait_for_runs(runs: &AtomicUsize, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while runs.load(Ordering::SeqCst) < expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("stage did not run often enough");
    }

    /// Returns `Ok` straight away, as a stream that ended would.
    #[derive(Default)]
    struct ReturningStage {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl Runnable for ReturningStage {
        async fn run(&self, _ctx: StageContext) -> eyre::Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FailingStage {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl Runnable for FailingStage {
        async fn run(&self, _ctx: StageContext) -> eyre::Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Err(eyre::eyre!("boom"))
        }
    }

    #[derive(Default)]
    struct PanickingStage {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl Runnable for PanickingStage {
        async fn run(&self, _ctx: StageContext) -> eyre::Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            panic!("stage exploded");
        }
    }

    /// Runs until cancelled.
    #[derive(Default)]
    struct IdleStage {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl Runnable for IdleStage {
        async fn run(&self, ctx: StageContext) -> eyre::Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            ctx.signal_healthy();
            ctx.cancelled().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_returning_stage_is_restarted() {
        let cancel = CancellationToken::new();
        let stage = Arc::new(ReturningStage::default());
        let mut supervisor = Supervisor::new(cancel.clone(), fast_options(true));
        supervisor.spawn("returning", stage.clone());

        wait_for_runs(&stage.runs, 3).await;
        cancel.cancel();

        assert!(supervisor.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_stage_is_restarted() {
        let cancel = CancellationToken::new();
        let stage = Arc::new(FailingStage::default());
        let mut supervisor = Supervisor::new(cancel.clone(), fast_options(true));
        supervisor.spawn("failing", stage.clone());

        wait_for_runs(&stage.runs, 3).await;
        cancel.cancel();

        assert!(supervisor.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_panic_is_propagated() {
        let cancel = CancellationToken::new();
        let idle = Arc::new(IdleStage::default());
        let mut supervisor = Supervisor::new(cancel.clone(), fast_options(true));
        supervisor.spawn("idle", idle.clone());
        supervisor.spawn("panicking", Arc::new(PanickingStage::default()));

        let result = tokio::time::timeout(Duration::from_secs(5), supervisor.wait())
            .await
            .unwrap();

        match result {
            Err(SupervisorError::StagePanicked { stage, message }) => {
                assert_eq!(stage, "panicking");
                assert_eq!(message, "stage exploded");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(cancel.is_cancelled());
        assert!(idle.runs.load(Ordering::SeqCst) <= 1);
    }

    #[tokio::test]
    async fn test_panic_is_isolated_when_not_propagated() {
        let cancel = CancellationToken::new();
        let idle = Arc::new(IdleStage::default());
        let panicking = Arc::new(PanickingStage::default());
        let mut supervisor = Supervisor::new(cancel.clone(), fast_options(false));
        supervisor.spawn("idle", idle.clone());
        supervisor.spawn("panicking", panicking.clone());

        wait_for_runs(&panicking.runs, 3).await;
        assert!(!cancel.is_cancelled());
        assert_eq!(idle.runs.load(Ordering::SeqCst), 1);

        cancel.cancel();
        assert!(supervisor.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_cancellation_stops_stages_without_restart() {
        let cancel = CancellationToken::new();
        let idle = Arc::new(IdleStage::default());
        let mut supervisor = Supervisor::new(cancel.clone(), fast_options(true));
        supervisor.spawn("idle", idle.clone());

        wait_for_runs(&idle.runs, 1).await;
        cancel.cancel();

        assert!(supervisor.wait().await.is_ok());
        assert_eq!(idle.runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new("owned".to_string())), "owned");
        assert_eq!(panic_message(Box::new(7u8)), "non-string panic payload");
    }
}
