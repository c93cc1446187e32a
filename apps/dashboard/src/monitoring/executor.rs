use anyhow::Result;
use futures::future::join_all;
use std::time::Duration;
use tracing::debug;

use super::checker::{Checker, ContentChecker, TcpChecker};
use super::types::{EndpointSpec, ProbeKind, ProbeResult, Stamp};

/// Turns one endpoint into a reachability verdict. Never fails outward.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, endpoint: &EndpointSpec) -> bool;
}

/// Probe executor - dispatches each endpoint to the checker for its kind
pub struct ProbeExecutor {
    tcp_checker: TcpChecker,
    content_checker: ContentChecker,
}

impl ProbeExecutor {
    /// Create an executor whose checks all share the same hard deadline
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            tcp_checker: TcpChecker::new(timeout),
            content_checker: ContentChecker::new(timeout)?,
        })
    }

    #[cfg(test)]
    fn with_checkers(tcp_checker: TcpChecker, content_checker: ContentChecker) -> Self {
        Self { tcp_checker, content_checker }
    }
}

#[async_trait::async_trait]
impl Prober for ProbeExecutor {
    async fn probe(&self, endpoint: &EndpointSpec) -> bool {
        let checker: &dyn Checker = match endpoint.probe {
            ProbeKind::Tcp { .. } => &self.tcp_checker,
            ProbeKind::Content { .. } => &self.content_checker,
        };

        match checker.check(endpoint).await {
            Ok(()) => true,
            Err(e) => {
                debug!(endpoint = %endpoint.name, address = %endpoint.address(), "probe failed: {e}");
                false
            }
        }
    }
}

/// Probe all endpoints concurrently.
///
/// Results keep the order of `endpoints` and share a single `observed_at`
/// taken once every probe has finished.
pub async fn probe_all<P>(prober: &P, endpoints: &[EndpointSpec]) -> Vec<ProbeResult>
where
    P: Prober + ?Sized,
{
    let verdicts = join_all(endpoints.iter().map(|endpoint| prober.probe(endpoint))).await;
    let observed_at = Stamp::now();

    endpoints
        .iter()
        .zip(verdicts)
        .map(|(endpoint, reachable)| ProbeResult {
            endpoint_name: endpoint.name.clone(),
            reachable,
            observed_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::checker::tests::{content_checker, serve};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn probe_all_keeps_endpoint_order_and_one_timestamp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open_port = listener.local_addr().unwrap().port();
        let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let closed_port = closed.local_addr().unwrap().port();
        drop(closed);

        let endpoints = vec![
            EndpointSpec::tcp("down", "127.0.0.1", closed_port),
            EndpointSpec::tcp("up", "127.0.0.1", open_port),
        ];
        let executor = ProbeExecutor::new(Duration::from_secs(1)).unwrap();

        let results = probe_all(&executor, &endpoints).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].endpoint_name, "down");
        assert!(!results[0].reachable);
        assert_eq!(results[1].endpoint_name, "up");
        assert!(results[1].reachable);
        assert_eq!(results[0].observed_at, results[1].observed_at);
    }

    #[tokio::test]
    async fn probe_all_dispatches_tcp_and_content_endpoints() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open_port = listener.local_addr().unwrap().port();
        let up_page = serve("200 OK", "<h1>Realm is up</h1>").await;
        let down_page = serve("200 OK", "<h1>Realm is offline</h1>").await;

        let endpoints = vec![
            EndpointSpec::content("realm down", down_page, "Realm is offline"),
            EndpointSpec::tcp("auth", "127.0.0.1", open_port),
            EndpointSpec::content("realm up", up_page, "Realm is offline"),
        ];
        let executor = ProbeExecutor::with_checkers(TcpChecker::new(Duration::from_secs(1)), content_checker(1000));

        let results = probe_all(&executor, &endpoints).await;

        let verdicts: Vec<(&str, bool)> = results.iter().map(|r| (r.endpoint_name.as_str(), r.reachable)).collect();
        assert_eq!(verdicts, [("realm down", false), ("auth", true), ("realm up", true)]);
        assert!(results.iter().all(|r| r.observed_at == results[0].observed_at));
    }

    #[tokio::test]
    async fn unresolvable_host_is_unreachable() {
        let executor = ProbeExecutor::new(Duration::from_secs(1)).unwrap();
        let endpoint = EndpointSpec::tcp("nowhere", "host.invalid", 80);

        assert!(!executor.probe(&endpoint).await);
    }
}
