//! Streaming log tail of a replica
//!
//! Each [`LogStream`] owns one connection. Nothing is sent until the stream
//! is first polled; every decoded chunk appends to an accumulator and the
//! whole accumulator so far is yielded. Dropping the stream aborts the
//! connection. There is no reconnect: open a new stream to start over.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use tracing::{debug, info};

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::observe::decode::TextDecoder;
use crate::task::{subscribe, TaskHandle};

enum State {
    Connecting {
        client: Arc<HttpClient>,
        deployment_id: String,
        replica_id: String,
    },
    Reading {
        body: BoxStream<'static, Result<Bytes, DashError>>,
        decoder: TextDecoder,
        record: String,
    },
    Done,
}

pub struct LogStream {
    inner: BoxStream<'static, Result<String, DashError>>,
}

impl LogStream {
    /// Prepare a log tail; the request is sent on first poll
    pub fn open(client: Arc<HttpClient>, deployment_id: &str, replica_id: &str) -> Self {
        let state = State::Connecting {
            client,
            deployment_id: deployment_id.to_string(),
            replica_id: replica_id.to_string(),
        };
        Self {
            inner: stream::unfold(state, step).boxed(),
        }
    }

    /// Deliver every accumulated state to `on_state` in the background
    pub fn subscribe<F>(self, on_state: F) -> TaskHandle<Result<(), DashError>>
    where
        F: FnMut(String) + Send + 'static,
    {
        subscribe(self, on_state)
    }
}

impl Stream for LogStream {
    type Item = Result<String, DashError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

async fn step(state: State) -> Option<(Result<String, DashError>, State)> {
    let (mut body, mut decoder, mut record) = match state {
        State::Connecting {
            client,
            deployment_id,
            replica_id,
        } => match client
            .open_deployment_replica_log(&deployment_id, &replica_id)
            .await
        {
            Ok(response) => {
                info!("Log stream opened for replica {}/{}", deployment_id, replica_id);
                (response.body.into_stream(), TextDecoder::new(), String::new())
            }
            Err(e) => return Some((Err(e), State::Done)),
        },
        State::Reading {
            body,
            decoder,
            record,
        } => (body, decoder, record),
        State::Done => return None,
    };

    loop {
        match body.next().await {
            Some(Ok(chunk)) => {
                let text = decoder.decode(&chunk);
                if text.is_empty() {
                    continue;
                }
                record.push_str(&text);
                let snapshot = record.clone();
                return Some((
                    Ok(snapshot),
                    State::Reading {
                        body,
                        decoder,
                        record,
                    },
                ));
            }
            Some(Err(e)) => return Some((Err(e), State::Done)),
            None => {
                debug!("Log stream ended after {} bytes", record.len());
                let tail = decoder.finish();
                if tail.is_empty() {
                    return None;
                }
                record.push_str(&tail);
                return Some((Ok(record), State::Done));
            }
        }
    }
}
