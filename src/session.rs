//! The monitor-resident command loop: once a trap moves a connection out of
//! `Connected`, this drives `next_command()` until `EXIT` hands control back
//! to the emulator or `QUIT` tears the session down.

use std::io::{Read, Write};

use crate::emulator::Emulator;
use crate::handlers::{self, Outcome};
use crate::protocol::{MemSpace, ResponseType};
use crate::wire::{read_frame, ResponseWriter};

/// What happened to a monitor-resident session once it stopped looping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// `EXIT`: hand control back to the emulator; the connection stays open
    /// for the next trap.
    ResumedToEmulator,
    /// `QUIT`: the emulator is shutting down.
    Quit,
    /// The socket closed or errored mid-session.
    Closed,
}

/// Runs the monitor-resident loop over `stream`, emitting a `STOPPED` event
/// with the emulator's current PC, then dispatching frames until the
/// session leaves this mode.
pub fn run_monitor_resident<S: Read + Write>(
    stream: &mut S,
    emulator: &mut dyn Emulator,
) -> std::io::Result<SessionOutcome> {
    let pc = emulator.pc(MemSpace::Computer);
    {
        let mut out = ResponseWriter::new(&mut *stream);
        out.event(ResponseType::Stopped, &pc.to_le_bytes())?;
    }
    tracing::debug!(pc, "session entered monitor-resident mode");
    monitor_loop(stream, emulator)
}

/// Runs the monitor-resident loop after the emulator reports a CPU jam:
/// emits `JAM` with the current PC instead of `STOPPED`, then waits for
/// monitor input exactly like [`run_monitor_resident`]. The emulator has
/// no trait hook for this — a jam halts free-running execution outside
/// this crate entirely, so the host reports it by calling
/// [`crate::Server::report_jam`] directly.
pub fn run_jammed<S: Read + Write>(
    stream: &mut S,
    emulator: &mut dyn Emulator,
) -> std::io::Result<SessionOutcome> {
    let pc = emulator.pc(MemSpace::Computer);
    {
        let mut out = ResponseWriter::new(&mut *stream);
        out.event(ResponseType::Jam, &pc.to_le_bytes())?;
    }
    tracing::debug!(pc, "session entered monitor-resident mode after CPU jam");
    monitor_loop(stream, emulator)
}

fn monitor_loop<S: Read + Write>(
    stream: &mut S,
    emulator: &mut dyn Emulator,
) -> std::io::Result<SessionOutcome> {
    loop {
        let frame = match read_frame(stream) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(error = %e, "session socket closed during monitor-resident loop");
                return Ok(SessionOutcome::Closed);
            }
        };

        let mut out = ResponseWriter::new(&mut *stream);
        tracing::debug!(
            request_id = frame.request_id,
            command_type = frame.command_type,
            "dispatching command"
        );
        let outcome = handlers::dispatch(&frame, emulator, &mut out)?;

        match outcome {
            Outcome::Continue => continue,
            Outcome::ReturnToEmulator => {
                tracing::debug!("session leaving monitor-resident mode (EXIT)");
                return Ok(SessionOutcome::ResumedToEmulator);
            }
            Outcome::Quit => {
                tracing::debug!("session ending (QUIT)");
                return Ok(SessionOutcome::Quit);
            }
        }
    }
}
