//! Response delivery thread.
//!
//! Requests complete on arbitrary runtime workers. Their replies are funneled
//! through an unbounded channel into one dedicated OS thread, so the host
//! observes every reply on the same thread regardless of which task produced
//! it.

use core_async::sync::mpsc;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

use crate::channel::{MethodResponse, Reply};
use crate::error::{Result, ServiceError};

pub const RESPONSE_THREAD_NAME: &str = "metadata-response";

struct Delivery {
    reply: Reply,
    response: MethodResponse,
}

/// Owns the response thread. The thread exits once the dispatcher and every
/// [`ResponseSender`] have been dropped.
pub struct ResponseDispatcher {
    sender: ResponseSender,
    thread: Option<JoinHandle<()>>,
}

impl ResponseDispatcher {
    /// Spawns the response thread.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InitializationFailed`] when the OS refuses to
    /// create the thread.
    pub fn start() -> Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();

        let thread = thread::Builder::new()
            .name(RESPONSE_THREAD_NAME.to_string())
            .spawn(move || {
                debug!("Response thread started");
                while let Some(Delivery { reply, response }) = rx.blocking_recv() {
                    if panic::catch_unwind(AssertUnwindSafe(|| reply(response))).is_err() {
                        error!("Reply callback panicked");
                    }
                }
                debug!("Response thread stopped");
            })
            .map_err(|e| ServiceError::InitializationFailed(e.to_string()))?;

        Ok(Self {
            sender: ResponseSender { tx },
            thread: Some(thread),
        })
    }

    pub fn sender(&self) -> ResponseSender {
        self.sender.clone()
    }

    /// Drops this dispatcher's sender and waits for queued replies to be
    /// delivered. Other live [`ResponseSender`]s keep the thread running, so
    /// drop them first.
    pub fn shutdown(mut self) {
        let thread = self.thread.take();
        drop(self);
        if let Some(thread) = thread {
            if thread.join().is_err() {
                error!("Response thread terminated abnormally");
            }
        }
    }
}

/// Cloneable handle for posting replies to the response thread.
#[derive(Clone)]
pub struct ResponseSender {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl ResponseSender {
    /// Queues `response` for delivery to `reply`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::DispatcherClosed`] when the response thread is
    /// gone.
    pub fn deliver(&self, reply: Reply, response: MethodResponse) -> Result<()> {
        self.tx
            .send(Delivery { reply, response })
            .map_err(|_| ServiceError::DispatcherClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    #[test]
    fn test_replies_run_on_response_thread() {
        let dispatcher = ResponseDispatcher::start().unwrap();
        let sender = dispatcher.sender();
        let (tx, rx) = std_mpsc::channel();

        for i in 0..3 {
            let tx = tx.clone();
            let sender = sender.clone();
            thread::spawn(move || {
                sender
                    .deliver(
                        Box::new(move |response| {
                            let name = thread::current().name().map(str::to_string);
                            tx.send((i, name, response)).unwrap();
                        }),
                        MethodResponse::NotImplemented,
                    )
                    .unwrap();
            });
        }

        for _ in 0..3 {
            let (_, name, response) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(name.as_deref(), Some(RESPONSE_THREAD_NAME));
            assert_eq!(response, MethodResponse::NotImplemented);
        }

        drop(sender);
        dispatcher.shutdown();
    }

    #[test]
    fn test_panicking_reply_does_not_stop_thread() {
        let dispatcher = ResponseDispatcher::start().unwrap();
        let sender = dispatcher.sender();
        let (tx, rx) = std_mpsc::channel();

        sender
            .deliver(
                Box::new(|_| panic!("host callback failed")),
                MethodResponse::NotImplemented,
            )
            .unwrap();
        sender
            .deliver(
                Box::new(move |response| tx.send(response).unwrap()),
                MethodResponse::error("code", "message"),
            )
            .unwrap();

        let response = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(response, MethodResponse::error("code", "message"));

        drop(sender);
        dispatcher.shutdown();
    }

    #[test]
    fn test_shutdown_drains_queue() {
        let dispatcher = ResponseDispatcher::start().unwrap();
        let (tx, rx) = std_mpsc::channel();

        for _ in 0..10 {
            let tx = tx.clone();
            dispatcher
                .sender()
                .deliver(
                    Box::new(move |_| tx.send(()).unwrap()),
                    MethodResponse::NotImplemented,
                )
                .unwrap();
        }
        drop(tx);

        dispatcher.shutdown();
        assert_eq!(rx.iter().count(), 10);
    }
}
