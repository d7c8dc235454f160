//! The resource layer: `{listen_socket, connected_socket, server_address,
//! enabled}`, bound over TCP. One listener, at most one connected client.

use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::ServerAddress;
use crate::emulator::Emulator;
use crate::error::MonitorError;
use crate::session::{self, SessionOutcome};

/// Owns the monitor's network resources and the single active connection.
pub struct Server {
    address: ServerAddress,
    listener: Option<TcpListener>,
    connected: Option<TcpStream>,
    enabled: bool,
}

impl Server {
    pub fn new(address: ServerAddress) -> Self {
        Self {
            address,
            listener: None,
            connected: None,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn address(&self) -> &ServerAddress {
        &self.address
    }

    /// The listener's actual bound address, including an OS-assigned port
    /// when the configured port was `0`. `None` before [`Server::enable`].
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Binds the listen socket. Idempotent: calling it while already
    /// enabled is a no-op.
    pub fn enable(&mut self) -> Result<(), MonitorError> {
        if self.enabled {
            return Ok(());
        }
        let socket_addr = self.address.to_socket_addr();
        let listener = TcpListener::bind(&socket_addr).map_err(|source| MonitorError::Bind {
            address: socket_addr.clone(),
            source,
        })?;
        listener
            .set_nonblocking(true)
            .map_err(|source| MonitorError::Bind {
                address: socket_addr,
                source,
            })?;
        tracing::info!(address = %self.address.to_socket_addr(), "binary monitor enabled");
        self.listener = Some(listener);
        self.enabled = true;
        Ok(())
    }

    /// Closes the listener and any connected client.
    pub fn disable(&mut self) {
        if self.connected.take().is_some() {
            tracing::debug!("closing connected client on disable");
        }
        self.listener = None;
        self.enabled = false;
        tracing::info!("binary monitor disabled");
    }

    /// Non-blocking: accepts a pending connection if there is no client
    /// connected yet. Called by the host at well-defined safe points.
    pub fn poll(&mut self) -> std::io::Result<()> {
        if self.connected.is_some() || !self.enabled {
            return Ok(());
        }
        let Some(listener) = &self.listener else {
            return Ok(());
        };
        match listener.accept() {
            Ok((stream, addr)) => {
                tracing::info!(peer = %addr, "binary monitor client connected");
                stream.set_nonblocking(false)?;
                self.connected = Some(stream);
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {}
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// True if a client is connected (the host should trap and call
    /// [`Server::trap`]).
    pub fn has_client(&self) -> bool {
        self.connected.is_some()
    }

    /// Runs the monitor-resident loop over the connected client. Returns
    /// `false` if the session ended (socket closed or `QUIT`) and the host
    /// should stop calling this.
    pub fn trap(&mut self, emulator: &mut dyn Emulator) -> std::io::Result<bool> {
        let Some(stream) = self.connected.as_mut() else {
            return Ok(false);
        };

        match session::run_monitor_resident(stream, emulator)? {
            SessionOutcome::ResumedToEmulator => Ok(true),
            SessionOutcome::Quit => {
                self.connected = None;
                Ok(false)
            }
            SessionOutcome::Closed => {
                self.connected = None;
                Ok(true)
            }
        }
    }

    /// Reports a CPU jam on the connected client: emits `JAM` with the
    /// emulator's current PC instead of `STOPPED`, then runs the same
    /// monitor-resident loop `trap` would. A jam halts free-running
    /// execution outside this crate, so the host (whatever drives the
    /// emulator's instruction loop) calls this in place of `trap` when it
    /// detects one. Returns `Ok(false)` if no client is connected to report
    /// the jam to.
    pub fn report_jam(&mut self, emulator: &mut dyn Emulator) -> std::io::Result<bool> {
        let Some(stream) = self.connected.as_mut() else {
            return Ok(false);
        };

        match session::run_jammed(stream, emulator)? {
            SessionOutcome::ResumedToEmulator => Ok(true),
            SessionOutcome::Quit => {
                self.connected = None;
                Ok(false)
            }
            SessionOutcome::Closed => {
                self.connected = None;
                Ok(true)
            }
        }
    }

    /// Standalone run loop for the demo binary: binds, then repeatedly
    /// accepts a client and immediately traps into it, until `Ctrl-C` or
    /// `QUIT`.
    pub fn run(mut self, emulator: &mut dyn Emulator) -> Result<()> {
        self.enable().context("failed to enable binary monitor")?;

        let shutdown = Arc::new(AtomicBool::new(false));
        let handler_flag = shutdown.clone();
        ctrlc::set_handler(move || {
            tracing::info!("received shutdown signal");
            handler_flag.store(true, Ordering::SeqCst);
        })
        .context("failed to install signal handler")?;

        while !shutdown.load(Ordering::SeqCst) {
            self.poll()?;
            if self.has_client() {
                if !self.trap(emulator)? {
                    break;
                }
            } else {
                std::thread::sleep(Duration::from_millis(50));
            }
        }

        self.disable();
        Ok(())
    }
}
