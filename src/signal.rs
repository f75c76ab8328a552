// src/signal.rs

//! Cancel an execution context when the process receives a signal.

use std::fmt;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// OS signals a [`SignalMonitor`] can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Interrupt,
    Terminate,
    Hangup,
    Quit,
}

impl Signal {
    pub fn name(self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Hangup => "SIGHUP",
            Signal::Quit => "SIGQUIT",
        }
    }

    #[cfg(unix)]
    fn kind(self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;
        match self {
            Signal::Interrupt => SignalKind::interrupt(),
            Signal::Terminate => SignalKind::terminate(),
            Signal::Hangup => SignalKind::hangup(),
            Signal::Quit => SignalKind::quit(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Handler = Box<dyn FnOnce(CancellationToken, Signal) + Send + 'static>;

/// One-shot bridge from OS signals to a cancellable context.
///
/// [`arm`](Self::arm) derives a child token from a parent and spawns a
/// listener. The first observed signal calls the handler with the child
/// token (the handler decides whether to cancel it) and the signal. If the
/// child token is cancelled first the listener exits quietly. The handler
/// runs at most once; the monitor does not re-arm.
///
/// Must be armed from within a Tokio runtime.
pub struct SignalMonitor {
    handler: Mutex<Option<Handler>>,
    signals: Vec<Signal>,
}

impl SignalMonitor {
    pub fn new<F>(handler: F, signals: impl IntoIterator<Item = Signal>) -> Self
    where
        F: FnOnce(CancellationToken, Signal) + Send + 'static,
    {
        Self {
            handler: Mutex::new(Some(Box::new(handler))),
            signals: signals.into_iter().collect(),
        }
    }

    pub fn arm(&self, parent: &CancellationToken) -> CancellationToken {
        let token = parent.child_token();
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let Some(handler) = handler else {
            warn!("signal monitor already armed; returning an unmonitored context");
            return token;
        };

        let (tx, mut rx) = mpsc::channel::<Signal>(1);
        let forwarders: Vec<_> = self
            .signals
            .iter()
            .map(|&signal| tokio::spawn(forward(signal, tx.clone())))
            .collect();
        drop(tx);

        let listener_token = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                received = rx.recv() => {
                    if let Some(signal) = received {
                        debug!(%signal, "signal received");
                        handler(listener_token.clone(), signal);
                    }
                }
                _ = listener_token.cancelled() => {
                    debug!("monitored context done before any signal");
                }
            }
            for forwarder in forwarders {
                forwarder.abort();
            }
        });

        token
    }
}

#[cfg(unix)]
async fn forward(signal: Signal, tx: mpsc::Sender<Signal>) {
    match tokio::signal::unix::signal(signal.kind()) {
        Ok(mut stream) => {
            if stream.recv().await.is_some() {
                let _ = tx.try_send(signal);
            }
        }
        Err(e) => warn!(%signal, error = %e, "failed to install signal listener"),
    }
}

#[cfg(not(unix))]
async fn forward(signal: Signal, tx: mpsc::Sender<Signal>) {
    if signal != Signal::Interrupt {
        debug!(%signal, "signal not observable on this platform");
        std::future::pending::<()>().await;
    }
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(%signal, error = %e, "failed to listen for Ctrl+C");
        return;
    }
    let _ = tx.try_send(signal);
}
