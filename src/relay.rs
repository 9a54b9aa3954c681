//! Broadcasting signed notes to relays.
//!
//! Relays are tried one after another. Each gets its own outcome and a failure
//! does not stop the relays after it.

use std::{fmt, time::Duration};

use futures_util::future::BoxFuture;
use nostr_sdk::{Client, Event};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("cannot connect to {url}: {source}")]
    Connect {
        url: String,
        source: nostr_sdk::client::Error,
    },

    #[error("relay {url} rejected event: {reason}")]
    Rejected { url: String, reason: String },

    #[error("{0}")]
    Other(String),
}

pub trait RelayPublisher: Send + Sync {
    fn publish<'a>(&'a self, url: &'a str, event: &'a Event) -> BoxFuture<'a, Result<(), PublishError>>;
}

/// Publishes through a throwaway nostr-sdk client per relay.
pub struct NostrRelays {
    connect_timeout: Duration,
}

impl NostrRelays {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl RelayPublisher for NostrRelays {
    fn publish<'a>(&'a self, url: &'a str, event: &'a Event) -> BoxFuture<'a, Result<(), PublishError>> {
        Box::pin(async move {
            let connect_err = |source| PublishError::Connect { url: url.to_owned(), source };

            let client = Client::default();
            client.add_relay(url).await.map_err(connect_err)?;
            client
                .try_connect_relay(url, self.connect_timeout)
                .await
                .map_err(connect_err)?;

            let sent = client.send_event_to([url], event).await;
            client.disconnect().await;

            let output = sent.map_err(connect_err)?;
            if output.success.is_empty() {
                let reason = output
                    .failed
                    .into_values()
                    .next()
                    .unwrap_or_else(|| "no acknowledgement".to_owned());
                return Err(PublishError::Rejected { url: url.to_owned(), reason });
            }
            Ok(())
        })
    }
}

#[derive(Debug)]
pub struct RelayOutcome {
    pub url: String,
    pub result: Result<(), PublishError>,
}

impl RelayOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for RelayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.result {
            Ok(()) => write!(f, "published to {}", self.url),
            Err(err) => write!(f, "failed {}: {err}", self.url),
        }
    }
}

/// Relay addresses from a newline separated list, blank lines dropped.
pub fn split_relay_list(relaylist: &str) -> Vec<String> {
    relaylist
        .split('\n')
        .map(|url| url.trim_matches(|c| matches!(c, '\r' | '\n' | '\t' | ' ')))
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
        .collect()
}

pub async fn publish_to_all(
    publisher: &dyn RelayPublisher,
    relays: &[String],
    event: &Event,
) -> Vec<RelayOutcome> {
    let mut outcomes = Vec::with_capacity(relays.len());
    for url in relays {
        let result = publisher.publish(url, event).await;
        match &result {
            Ok(()) => tracing::info!(relay = %url, event_id = %event.id, "published event"),
            Err(err) => tracing::warn!(relay = %url, error = %err, "relay publish failed"),
        }
        outcomes.push(RelayOutcome { url: url.clone(), result });
    }
    outcomes
}
