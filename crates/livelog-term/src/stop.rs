use std::io::BufRead;
use std::thread;

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancels a token when the user ends the session: Enter (or end of input)
/// on stdin, or Ctrl-C.
pub struct StopListener {
    /// Cancellation token for the session
    cancel: CancellationToken,
    /// Ctrl-C task handle
    signal_task: tokio::task::JoinHandle<()>,
}

impl StopListener {
    /// Start listening. Must be called from within a Tokio runtime.
    pub fn spawn() -> Self {
        let cancel = CancellationToken::new();

        // Blocking stdin reads stay off the runtime so shutdown never waits on them
        {
            let cancel = cancel.clone();
            let spawned = thread::Builder::new()
                .name("livelog-stdin".to_string())
                .spawn(move || {
                    let mut line = String::new();
                    let _ = std::io::stdin().lock().read_line(&mut line);
                    debug!("input received, stopping");
                    cancel.cancel();
                });
            if let Err(e) = spawned {
                debug!(error = %e, "stdin listener unavailable, Ctrl-C only");
            }
        }

        let signal_task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    result = tokio::signal::ctrl_c() => {
                        if let Err(e) = result {
                            debug!(error = %e, "Ctrl-C handler unavailable");
                            return;
                        }
                        debug!("interrupt received, stopping");
                        cancel.cancel();
                    }
                }
            })
        };

        Self {
            cancel,
            signal_task,
        }
    }

    /// Token cancelled when the user asks to stop
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Stop listening for Ctrl-C
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.signal_task.abort();
    }
}

impl Drop for StopListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}
