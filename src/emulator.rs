//! The `Emulator` adapter: the interface command handlers call into.
//!
//! The emulated CPU, its memory spaces, and the checkpoint store's internal
//! representation live entirely behind this trait. This crate only ever
//! calls through it; nothing here knows how a 6502 executes an opcode.

use crate::protocol::{MemOp, MemSpace};

/// One entry in a register list. Synthetic entries (flag aggregates,
/// memory-shadow pseudo-registers) are filtered out by every handler that
/// serializes registers onto the wire — `is_synthetic` exists so the
/// filter has something to check, not so it reaches the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDescriptor {
    pub id: u8,
    pub size_bits: u8,
    pub name: String,
    pub value: u16,
    pub is_synthetic: bool,
}

/// A breakpoint/watchpoint. Identity is `number`, assigned monotonically
/// by the emulator on `checkpoint_add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub number: u32,
    pub start_addr: u16,
    pub end_addr: u16,
    pub stop_on_hit: bool,
    pub enabled: bool,
    pub op: MemOp,
    pub temporary: bool,
    pub hit_count: u32,
    pub ignore_count: u32,
    pub has_condition: bool,
}

/// Failure from an emulator-side operation that can't be expressed as a
/// wire-level validation failure by the caller alone (autostart, and the
/// textual condition parser). Handlers turn any `Err` here into
/// `INVALID_PARAMETER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorError(pub String);

pub type EmulatorResult<T> = Result<T, EmulatorError>;

/// The collaborator a running emulator implements to be debuggable over
/// the wire. Every method here corresponds to one or more command
/// handlers in [`crate::handlers`].
pub trait Emulator {
    // -- Registers ---------------------------------------------------
    fn registers(&self, space: MemSpace) -> Vec<RegisterDescriptor>;
    fn register_get(&self, space: MemSpace, id: u8) -> Option<u16>;
    fn register_set(&mut self, space: MemSpace, id: u8, value: u16);
    fn register_valid(&self, space: MemSpace, id: u8) -> bool;
    /// Current program counter, for `STOPPED`/`RESUMED`/`JAM` event bodies.
    fn pc(&self, space: MemSpace) -> u16;

    // -- Memory --------------------------------------------------------
    fn mem_get_block(&self, space: MemSpace, bank: u16, start: u16, len: u16, out: &mut [u8]);
    fn mem_set_byte(&mut self, space: MemSpace, bank: u16, addr: u16, value: u8);
    fn bank_list(&self, space: MemSpace) -> Vec<(u16, String)>;
    fn bank_valid(&self, space: MemSpace, bank: u16) -> bool;
    fn sidefx(&self) -> bool;
    fn set_sidefx(&mut self, value: bool);

    // -- Checkpoints -----------------------------------------------------
    fn checkpoint_add(
        &mut self,
        start: u16,
        end: u16,
        stop_on_hit: bool,
        op: MemOp,
        temporary: bool,
    ) -> u32;
    fn checkpoint_find(&self, number: u32) -> Option<Checkpoint>;
    fn checkpoint_delete(&mut self, number: u32) -> bool;
    fn checkpoint_toggle(&mut self, number: u32, enable: bool) -> bool;
    fn checkpoint_list(&self) -> Vec<Checkpoint>;

    // -- Control -----------------------------------------------------------
    fn reset(&mut self, kind: u8);
    fn instructions_step(&mut self, count: u16);
    fn instructions_next(&mut self, count: u16);
    fn instruction_return(&mut self);
    fn keyboard_feed(&mut self, text: &str);
    fn autostart(&mut self, filename: &str, index: u16, run: bool) -> EmulatorResult<()>;
    fn quit(&mut self);

    // -- Text monitor (for CONDITION_SET) ---------------------------------
    fn parse_and_execute(&mut self, line: &str) -> EmulatorResult<()>;
}
