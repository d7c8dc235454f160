//! Command handlers: one function per command type, dispatched from a
//! single `match` over the command byte.
//!
//! Every handler re-checks `body.len()` against its own minimum before
//! touching the emulator; failing that check emits `CMD_INVALID_LENGTH`
//! and nothing else. All other validation failures emit
//! `INVALID_PARAMETER`. Handlers never panic on a short body — the
//! length check always runs before any field is read out of it.

mod checkpoints;
mod control;
mod memory;
mod registers;

use std::io::{self, Write};

use crate::emulator::Emulator;
use crate::protocol::{CommandType, ErrorCode, ResponseType};
use crate::wire::{RawFrame, ResponseWriter};

/// What the session loop should do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Stay in the current session state and read the next frame.
    Continue,
    /// `EXIT`: leave monitor-resident mode and hand control back to the
    /// emulator (the session emits `RESUMED` itself after this returns).
    ReturnToEmulator,
    /// `QUIT`: the emulator is shutting down; tear down the session.
    Quit,
}

/// Dispatches one fully-assembled frame to its handler.
pub fn dispatch<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    match CommandType::from_byte(frame.command_type) {
        CommandType::Ping => control::ping(frame, out),
        CommandType::MemGet => memory::mem_get(frame, emulator, out),
        CommandType::MemSet => memory::mem_set(frame, emulator, out),
        CommandType::CheckpointGet => checkpoints::checkpoint_get(frame, emulator, out),
        CommandType::CheckpointSet => checkpoints::checkpoint_set(frame, emulator, out),
        CommandType::CheckpointDelete => checkpoints::checkpoint_delete(frame, emulator, out),
        CommandType::CheckpointList => checkpoints::checkpoint_list(frame, emulator, out),
        CommandType::CheckpointToggle => checkpoints::checkpoint_toggle(frame, emulator, out),
        CommandType::ConditionSet => checkpoints::condition_set(frame, emulator, out),
        CommandType::RegistersGet => registers::registers_get(frame, emulator, out),
        CommandType::RegistersSet => registers::registers_set(frame, emulator, out),
        CommandType::RegistersAvailable => registers::registers_available(frame, emulator, out),
        CommandType::BanksAvailable => memory::banks_available(frame, emulator, out),
        CommandType::AdvanceInstructions => control::advance_instructions(frame, emulator, out),
        CommandType::KeyboardFeed => control::keyboard_feed(frame, emulator, out),
        CommandType::ExecuteUntilReturn => control::execute_until_return(frame, emulator, out),
        CommandType::Exit => control::exit(frame, out),
        CommandType::Quit => control::quit(frame, emulator, out),
        CommandType::Reset => control::reset(frame, emulator, out),
        CommandType::Autostart => control::autostart(frame, emulator, out),
        CommandType::Unknown(_) => {
            out.respond(frame.request_id, ResponseType::None, ErrorCode::InvalidParameter, &[])?;
            Ok(Outcome::Continue)
        }
    }
}

/// Emits the `CMD_INVALID_LENGTH` failure response: response type `0`
/// regardless of the command, as the protocol has always done.
fn invalid_length<W: Write>(out: &mut ResponseWriter<W>, request_id: u32) -> io::Result<Outcome> {
    out.respond(request_id, ResponseType::None, ErrorCode::CmdInvalidLength, &[])?;
    Ok(Outcome::Continue)
}

/// Emits an `INVALID_PARAMETER` failure response tagged with the
/// command's own response type.
fn invalid_parameter<W: Write>(
    out: &mut ResponseWriter<W>,
    request_id: u32,
    response_type: ResponseType,
) -> io::Result<Outcome> {
    out.respond(request_id, response_type, ErrorCode::InvalidParameter, &[])?;
    Ok(Outcome::Continue)
}
