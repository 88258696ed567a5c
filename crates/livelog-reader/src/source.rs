use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Interval used by the polling fallback
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Why the reader should look at the file again
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The OS reported activity on the file
    Notified,
    /// A polling interval elapsed
    Tick,
}

/// Which mechanism a source uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Native,
    Polling,
}

/// Source of "file changed" events.
///
/// The registration lives as long as the source; dropping it deregisters.
pub trait ChangeSource: Send {
    /// Wait for the next event; `None` once the source is closed
    fn next_change(&mut self) -> BoxFuture<'_, Option<ChangeEvent>>;

    fn kind(&self) -> SourceKind;
}

/// Native file watch on the target's parent directory, so a file recreated
/// at the same path (rotation) keeps producing events
pub struct NotifySource {
    /// Kept alive for the registration
    _watcher: RecommendedWatcher,
    receiver: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl NotifySource {
    pub fn new(path: &Path) -> notify::Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let target = path.file_name().map(OsString::from);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_relevant(&event, target.as_deref()) => {
                let _ = sender.send(ChangeEvent::Notified);
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "watch error"),
        })?;

        let watch_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver,
        })
    }
}

impl ChangeSource for NotifySource {
    fn next_change(&mut self) -> BoxFuture<'_, Option<ChangeEvent>> {
        async move {
            let event = self.receiver.recv().await?;
            // One pass reads everything, so a burst collapses to one event
            while self.receiver.try_recv().is_ok() {}
            Some(event)
        }
        .boxed()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Native
    }
}

/// Content changes on the target file; reads and opens are ignored so the
/// reader's own access does not wake it up
fn is_relevant(event: &Event, target: Option<&OsStr>) -> bool {
    let kind_matches = matches!(
        event.kind,
        EventKind::Any | EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    let path_matches = match target {
        Some(name) => event.paths.iter().any(|p| p.file_name() == Some(name)),
        None => true,
    };
    kind_matches && path_matches
}

/// Fixed-interval ticks, used when a native watch cannot be registered
pub struct PollSource {
    interval: Interval,
}

impl PollSource {
    /// Must be called from within a Tokio runtime
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl ChangeSource for PollSource {
    fn next_change(&mut self) -> BoxFuture<'_, Option<ChangeEvent>> {
        async move {
            self.interval.tick().await;
            Some(ChangeEvent::Tick)
        }
        .boxed()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Polling
    }
}

/// Watch `path` natively, or fall back to polling every `poll_interval`
/// when the OS refuses the registration (e.g. the inotify limit is reached)
pub fn open_source(path: &Path, poll_interval: Duration) -> Box<dyn ChangeSource> {
    match NotifySource::new(path) {
        Ok(source) => {
            debug!(path = %path.display(), "native file watch registered");
            Box::new(source)
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "file watch unavailable, polling every {:?}",
                poll_interval
            );
            Box::new(PollSource::new(poll_interval))
        }
    }
}
