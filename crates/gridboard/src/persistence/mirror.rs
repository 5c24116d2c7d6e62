//! Best-effort remote replication of saved snapshots.
//!
//! A [`RemoteMirror`] receives the same JSON body that was written locally.
//! It never blocks the caller and never fails the save: the outcome of each
//! attempt is published later as a [`MirrorOutcome`] on a broadcast channel.
//! Every attempt carries the save's sequence number, so listeners can skip
//! outcomes of saves that a newer save has superseded.

use layout_mirror::MirrorClient;
use std::time::Duration;
use tokio::sync::broadcast;

const OUTCOME_CHANNEL_CAPACITY: usize = 16;

/// Result of one replication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// The remote endpoint accepted the snapshot.
    Mirrored {
        /// Save sequence number.
        sequence: u64,
        /// Endpoint that accepted it.
        endpoint: String,
    },
    /// The attempt failed; the local copy stands.
    SoftFailure {
        /// Save sequence number.
        sequence: u64,
        /// Endpoint that was tried.
        endpoint: String,
        /// Why it failed.
        reason: String,
    },
    /// No mirror is configured.
    Skipped {
        /// Save sequence number.
        sequence: u64,
    },
}

impl MirrorOutcome {
    /// Sequence number of the save this outcome belongs to.
    pub fn sequence(&self) -> u64 {
        match self {
            Self::Mirrored { sequence, .. }
            | Self::SoftFailure { sequence, .. }
            | Self::Skipped { sequence } => *sequence,
        }
    }

    /// True if the snapshot reached the remote endpoint.
    pub fn is_mirrored(&self) -> bool {
        matches!(self, Self::Mirrored { .. })
    }
}

/// Fire-and-forget replication target.
pub trait RemoteMirror: Send + Sync {
    /// Starts replicating `body` for save `sequence` and returns at once.
    fn replicate(&self, sequence: u64, body: String);

    /// Subscribes to attempt outcomes.
    fn subscribe(&self) -> broadcast::Receiver<MirrorOutcome>;
}

fn publish(tx: &broadcast::Sender<MirrorOutcome>, outcome: MirrorOutcome) {
    if tx.send(outcome).is_err() {
        tracing::trace!("No subscribers for mirror outcome");
    }
}

/// Mirror that replicates nowhere and reports [`MirrorOutcome::Skipped`].
#[derive(Debug)]
pub struct DisabledMirror {
    outcome_tx: broadcast::Sender<MirrorOutcome>,
}

impl DisabledMirror {
    /// New disabled mirror.
    pub fn new() -> Self {
        let (outcome_tx, _rx) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);
        Self { outcome_tx }
    }
}

impl Default for DisabledMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteMirror for DisabledMirror {
    fn replicate(&self, sequence: u64, _body: String) {
        publish(&self.outcome_tx, MirrorOutcome::Skipped { sequence });
    }

    fn subscribe(&self) -> broadcast::Receiver<MirrorOutcome> {
        self.outcome_tx.subscribe()
    }
}

/// Mirror that POSTs the snapshot to an HTTP endpoint.
///
/// Each attempt runs as a task on the current tokio runtime. Without a
/// runtime the attempt is reported as a soft failure straight away.
#[derive(Debug)]
pub struct HttpMirror {
    client: MirrorClient,
    outcome_tx: broadcast::Sender<MirrorOutcome>,
}

impl HttpMirror {
    /// Mirror posting to `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`layout_mirror::MirrorError::Client`] if the HTTP client
    /// cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, layout_mirror::MirrorError> {
        let client = MirrorClient::new(endpoint, timeout)?;
        let (outcome_tx, _rx) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);
        Ok(Self { client, outcome_tx })
    }

    /// Endpoint URL.
    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

impl RemoteMirror for HttpMirror {
    fn replicate(&self, sequence: u64, body: String) {
        let endpoint = self.client.endpoint().to_string();
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(%endpoint, "No async runtime, layout not mirrored");
                publish(
                    &self.outcome_tx,
                    MirrorOutcome::SoftFailure {
                        sequence,
                        endpoint,
                        reason: "no async runtime".to_string(),
                    },
                );
                return;
            }
        };

        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        handle.spawn(async move {
            let outcome = match client.push(body).await {
                Ok(()) => {
                    tracing::debug!(%endpoint, sequence, "layout mirrored");
                    MirrorOutcome::Mirrored { sequence, endpoint }
                }
                Err(e) => {
                    tracing::warn!(%endpoint, sequence, error = %e, "layout mirror failed");
                    MirrorOutcome::SoftFailure {
                        sequence,
                        endpoint,
                        reason: e.to_string(),
                    }
                }
            };
            publish(&tx, outcome);
        });
    }

    fn subscribe(&self) -> broadcast::Receiver<MirrorOutcome> {
        self.outcome_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_disabled_mirror_reports_skipped() {
        let mirror = DisabledMirror::new();
        let mut rx = mirror.subscribe();
        mirror.replicate(3, "{}".to_string());
        let outcome = rx.try_recv().expect("outcome should be queued");
        assert_eq!(outcome, MirrorOutcome::Skipped { sequence: 3 });
        assert_eq!(outcome.sequence(), 3);
        assert!(!outcome.is_mirrored());
    }

    #[test]
    fn test_http_mirror_without_runtime_is_soft_failure() {
        let mirror = HttpMirror::new("http://127.0.0.1:9/api/save-layout", Duration::from_secs(1))
            .expect("client should build");
        let mut rx = mirror.subscribe();
        mirror.replicate(1, "{}".to_string());
        match rx.try_recv().expect("outcome should be queued") {
            MirrorOutcome::SoftFailure {
                sequence, endpoint, ..
            } => {
                assert_eq!(sequence, 1);
                assert_eq!(endpoint, "http://127.0.0.1:9/api/save-layout");
            }
            other => panic!("expected soft failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_mirror_success_published() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
        let addr = listener.local_addr().expect("no local addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept failed");
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await
                .expect("write failed");
        });

        let mirror = HttpMirror::new(&format!("http://{addr}/api/save-layout"), Duration::from_secs(5))
            .expect("client should build");
        let mut rx = mirror.subscribe();
        mirror.replicate(7, "{}".to_string());

        let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("outcome within timeout")
            .expect("channel open");
        assert!(outcome.is_mirrored(), "got {outcome:?}");
        assert_eq!(outcome.sequence(), 7);
    }

    #[tokio::test]
    async fn test_http_mirror_refused_is_soft_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
        let addr = listener.local_addr().expect("no local addr");
        drop(listener);

        let mirror = HttpMirror::new(&format!("http://{addr}/"), Duration::from_secs(2))
            .expect("client should build");
        assert_eq!(mirror.endpoint(), format!("http://{addr}/"));
        let mut rx = mirror.subscribe();
        mirror.replicate(2, "{}".to_string());

        let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("outcome within timeout")
            .expect("channel open");
        assert!(matches!(outcome, MirrorOutcome::SoftFailure { sequence: 2, .. }));
    }
}
