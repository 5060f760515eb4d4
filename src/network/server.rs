//! TCP Server
//!
//! Accepts connections and hands each one to its own thread.

use std::io::{BufWriter, ErrorKind};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{DaylogError, Result};
use crate::protocol::{write_response, Response};

use super::Connection;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TCP server for DayLog
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: Option<TcpListener>,

    /// Connections currently being served
    active: Arc<AtomicUsize>,

    /// Set to stop the accept loop
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Create a new server with the given config and engine
    pub fn new(config: Config, engine: Arc<Engine>) -> Self {
        Self {
            config,
            engine,
            listener: None,
            active: Arc::new(AtomicUsize::new(0)),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bind the listener (called by `run` if not done already)
    ///
    /// Returns the bound address, which is useful with port 0.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return Ok(listener.local_addr()?);
        }

        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            DaylogError::Network(format!("failed to bind {}: {}", self.config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Start the server (blocking until `shutdown` is called)
    pub fn run(&mut self) -> Result<()> {
        let addr = self.bind()?;
        let sweeper = self.engine.start_sweeper()?;

        tracing::info!("Listening on {}", addr);

        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => return Err(DaylogError::Network("listener not bound".to_string())),
        };

        while !self.shutdown.load(Ordering::Relaxed) {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = self.dispatch(stream) {
                        tracing::warn!("Failed to start handler for {}: {}", peer, e);
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        sweeper.stop();
        tracing::info!("Server shut down");
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Shared flag that stops the accept loop when set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Hand an accepted stream to its own thread
    fn dispatch(&self, stream: TcpStream) -> Result<()> {
        // Accepted sockets inherit non-blocking mode on some platforms
        stream.set_nonblocking(false)?;

        if self.active.fetch_add(1, Ordering::SeqCst) >= self.config.max_connections {
            self.active.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!(
                "Rejecting connection: {} connections already active",
                self.config.max_connections
            );
            let mut writer = BufWriter::new(stream);
            write_response(&mut writer, &Response::error("too many connections"))?;
            return Ok(());
        }

        let engine = Arc::clone(&self.engine);
        let active = Arc::clone(&self.active);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        let spawned = thread::Builder::new()
            .name("daylog-conn".to_string())
            .spawn(move || {
                let result = Connection::new(stream, engine).and_then(|mut conn| {
                    conn.set_timeouts(read_ms, write_ms)?;
                    conn.handle()
                });
                if let Err(e) = result {
                    tracing::debug!("Connection ended with error: {}", e);
                }
                active.fetch_sub(1, Ordering::SeqCst);
            });

        if let Err(e) = spawned {
            self.active.fetch_sub(1, Ordering::SeqCst);
            return Err(e.into());
        }

        Ok(())
    }
}
