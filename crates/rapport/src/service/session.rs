//! Connection-scoped session.
//!
//! A [`Session`] owns the request ID sequence and the correlation cache for
//! one transport, plus the encoding and outbound sender used on it. Outbound
//! calls register before sending so a fast response can never beat its own
//! registration; inbound bytes are either resolved against the cache or
//! dispatched to a [`Router`] and answered.

use crate::cache::{CorrelationCache, RequestTimeout, ResponseHandle};
use crate::config::RapportConfig;
use crate::domain::{Envelope, Request, RequestIdGenerator};
use crate::error::SessionError;
use crate::ports::inbound::Router;
use crate::ports::outbound::{Encoding, MessageSender};
use crate::wire::{self, Frame};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// What [`Session::receive`] did with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// A response; `matched` is false when nothing was waiting for it
    Response { id: String, matched: bool },
    /// A request, answered through the sender
    Request { id: String, is_error: bool },
}

pub struct Session<E, S> {
    ids: RequestIdGenerator,
    cache: CorrelationCache,
    encoding: E,
    sender: S,
}

impl<E: Encoding, S: MessageSender> Session<E, S> {
    pub fn new(config: &RapportConfig, encoding: E, sender: S) -> Self {
        Self {
            ids: RequestIdGenerator::with_ceiling(config.ids.ceiling),
            cache: CorrelationCache::from_config(&config.cache),
            encoding,
            sender,
        }
    }

    pub fn ids(&self) -> &RequestIdGenerator {
        &self.ids
    }

    pub fn cache(&self) -> &CorrelationCache {
        &self.cache
    }

    pub fn get(&self, url: &str) -> Request {
        Request::get(&self.ids, url)
    }

    pub fn post(&self, url: &str, body: impl Into<serde_json::Value>) -> Request {
        Request::post(&self.ids, url, body)
    }

    pub fn put(&self, url: &str, body: impl Into<serde_json::Value>) -> Request {
        Request::put(&self.ids, url, body)
    }

    pub fn patch(&self, url: &str, body: impl Into<serde_json::Value>) -> Request {
        Request::patch(&self.ids, url, body)
    }

    pub fn delete(&self, url: &str) -> Request {
        Request::delete(&self.ids, url)
    }

    /// Register `request`, then send it.
    ///
    /// Returns the handle to await, or `None` for fire-and-forget. If the
    /// transport rejects the message the pending entry is cancelled before the
    /// error is returned.
    pub async fn send(
        &self,
        request: &Request,
        timeout: impl Into<RequestTimeout>,
    ) -> Result<Option<ResponseHandle>, SessionError> {
        let bytes = wire::from_request(&self.encoding, request)?;
        let handle = self.cache.register(&request.id, timeout)?;

        if let Err(e) = self.sender.send(bytes).await {
            if handle.is_some() {
                self.cache.cancel(&request.id);
            }
            warn!(request_id = %request.id, error = %e, "Send failed");
            return Err(e.into());
        }

        debug!(
            request_id = %request.id,
            method = request.method(),
            url = request.url(),
            awaiting = handle.is_some(),
            "Sent request"
        );

        Ok(handle)
    }

    /// Send `request` and wait for its envelope.
    ///
    /// A timeout is not an error here: it arrives as a `504` envelope.
    pub async fn call(
        &self,
        request: &Request,
        timeout: impl Into<RequestTimeout>,
    ) -> Result<Envelope, SessionError> {
        let timeout = timeout.into();
        if timeout == RequestTimeout::NoResponse {
            return Err(SessionError::NoResponseExpected {
                id: request.id.clone(),
            });
        }

        match self.send(request, timeout).await? {
            Some(handle) => Ok(handle.await?),
            None => Err(SessionError::NoResponseExpected {
                id: request.id.clone(),
            }),
        }
    }

    /// Process one inbound message.
    ///
    /// Responses resolve the matching pending request. Requests go to
    /// `router`; its response is stamped with the request ID and sent back.
    pub async fn receive<R>(&self, bytes: &[u8], router: &R) -> Result<Received, SessionError>
    where
        R: Router + ?Sized,
    {
        match wire::to_frame(&self.encoding, bytes)? {
            Frame::Response(response) => {
                let id = response.id.clone();
                let matched = self.cache.resolve(response);
                Ok(Received::Response { id, matched })
            }
            Frame::Request(request) => {
                let mut response = router.handle(&request).await;
                response.id = request.id.clone();
                let is_error = response.is_error();

                let bytes = wire::from_response(&self.encoding, &response)?;
                self.sender.send(bytes).await?;

                debug!(
                    request_id = %request.id,
                    method = request.method(),
                    url = request.url(),
                    is_error,
                    "Answered request"
                );

                Ok(Received::Request {
                    id: request.id,
                    is_error,
                })
            }
        }
    }

    /// Run the inbound loop until `receiver` closes.
    ///
    /// Messages are processed one at a time, so a router must not await a
    /// call over this same session. Once the channel closes every request
    /// still pending is closed as well.
    pub async fn listen<R>(&self, receiver: &mut mpsc::Receiver<Vec<u8>>, router: &R)
    where
        R: Router + ?Sized,
    {
        while let Some(bytes) = receiver.recv().await {
            if let Err(e) = self.receive(&bytes, router).await {
                error!(error = %e, "Failed to process inbound message");
            }
        }

        let closed = self.cache.shutdown();
        warn!(closed, "Inbound channel closed, stopping listener");
    }
}

impl<E, S> std::fmt::Debug for Session<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("ids", &self.ids)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
