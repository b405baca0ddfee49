//! TCP Server
//!
//! Accepts connections and dispatches to worker threads.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver};

use crate::config::Config;
use crate::error::Result;
use crate::handler::Dispatcher;

use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for tablewire
///
/// One acceptor loop feeds accepted sockets into a bounded channel drained by
/// `config.worker_threads` workers. The channel holds at most
/// `config.max_connections` waiting sockets; beyond that the acceptor blocks.
pub struct Server {
    config: Config,
    dispatcher: Arc<Dispatcher>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, dispatcher: Arc<Dispatcher>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        // Non-blocking accept so the loop can observe shutdown
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            dispatcher,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Flag that stops `run` when set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Start the server (blocking until shutdown)
    ///
    /// Connections already handed to workers are finished before returning.
    pub fn run(&self) -> Result<()> {
        let (sender, receiver) = channel::bounded::<TcpStream>(self.config.max_connections);

        let mut workers = Vec::with_capacity(self.config.worker_threads);
        for id in 0..self.config.worker_threads {
            let receiver = receiver.clone();
            let dispatcher = Arc::clone(&self.dispatcher);
            let timeouts = (self.config.read_timeout_ms, self.config.write_timeout_ms);

            let handle = thread::Builder::new()
                .name(format!("tablewire-worker-{}", id))
                .spawn(move || worker_loop(id, receiver, dispatcher, timeouts))?;
            workers.push(handle);
        }
        drop(receiver);

        tracing::info!(
            "Listening on {} with {} worker(s)",
            self.local_addr()?,
            self.config.worker_threads
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    tracing::trace!("Accepted connection from {}", addr);
                    if sender.send(stream).is_err() {
                        tracing::error!("All workers exited; stopping acceptor");
                        break;
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Shutting down, waiting for workers");
        drop(sender);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        Ok(())
    }
}

fn worker_loop(
    id: usize,
    receiver: Receiver<TcpStream>,
    dispatcher: Arc<Dispatcher>,
    (read_ms, write_ms): (u64, u64),
) {
    for stream in receiver.iter() {
        let mut connection = match Connection::new(stream, Arc::clone(&dispatcher)) {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!("Worker {} could not set up connection: {}", id, e);
                continue;
            }
        };

        if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
            tracing::warn!(
                "Worker {} could not set timeouts for {}: {}",
                id,
                connection.peer_addr(),
                e
            );
            continue;
        }

        // Failures are already logged by the connection
        let _ = connection.handle();
    }

    tracing::debug!("Worker {} exiting", id);
}
