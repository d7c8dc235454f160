//! A minimal in-memory `Emulator` implementation used by the standalone
//! binary. This is not a CPU — it has no opcodes and does not execute
//! anything — it exists so the server has a real collaborator to drive when
//! run outside a host emulator, for manual protocol testing.

use std::collections::HashMap;

use crate::emulator::{Checkpoint, Emulator, EmulatorError, EmulatorResult, RegisterDescriptor};
use crate::protocol::{MemOp, MemSpace};

/// Register ids for the synthetic 6502-shaped register file this stand-in
/// exposes: enough to exercise REGISTERS_GET/SET against a real client.
pub mod register_id {
    pub const A: u8 = 0;
    pub const X: u8 = 1;
    pub const Y: u8 = 2;
    pub const SP: u8 = 3;
    pub const PC: u8 = 4;
    pub const FLAGS: u8 = 5;
}

pub struct DemoEmulator {
    memory: HashMap<u16, u8>,
    a: u16,
    x: u16,
    y: u16,
    sp: u16,
    pc: u16,
    flags: u16,
    sidefx: bool,
    checkpoints: Vec<Checkpoint>,
    next_checkpoint: u32,
}

impl DemoEmulator {
    pub fn new() -> Self {
        Self {
            memory: HashMap::new(),
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFF,
            pc: 0,
            flags: 0,
            sidefx: true,
            checkpoints: Vec::new(),
            next_checkpoint: 1,
        }
    }

    fn register_slot(&mut self, id: u8) -> Option<&mut u16> {
        match id {
            register_id::A => Some(&mut self.a),
            register_id::X => Some(&mut self.x),
            register_id::Y => Some(&mut self.y),
            register_id::SP => Some(&mut self.sp),
            register_id::PC => Some(&mut self.pc),
            register_id::FLAGS => Some(&mut self.flags),
            _ => None,
        }
    }
}

impl Default for DemoEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator for DemoEmulator {
    fn registers(&self, _space: MemSpace) -> Vec<RegisterDescriptor> {
        vec![
            RegisterDescriptor { id: register_id::A, size_bits: 8, name: "A".into(), value: self.a, is_synthetic: false },
            RegisterDescriptor { id: register_id::X, size_bits: 8, name: "X".into(), value: self.x, is_synthetic: false },
            RegisterDescriptor { id: register_id::Y, size_bits: 8, name: "Y".into(), value: self.y, is_synthetic: false },
            RegisterDescriptor { id: register_id::SP, size_bits: 8, name: "SP".into(), value: self.sp, is_synthetic: false },
            RegisterDescriptor { id: register_id::PC, size_bits: 16, name: "PC".into(), value: self.pc, is_synthetic: false },
            RegisterDescriptor { id: register_id::FLAGS, size_bits: 8, name: "FL".into(), value: self.flags, is_synthetic: true },
        ]
    }

    fn register_get(&self, _space: MemSpace, id: u8) -> Option<u16> {
        match id {
            register_id::A => Some(self.a),
            register_id::X => Some(self.x),
            register_id::Y => Some(self.y),
            register_id::SP => Some(self.sp),
            register_id::PC => Some(self.pc),
            register_id::FLAGS => Some(self.flags),
            _ => None,
        }
    }

    fn register_set(&mut self, _space: MemSpace, id: u8, value: u16) {
        if let Some(slot) = self.register_slot(id) {
            *slot = value;
        }
    }

    fn register_valid(&self, _space: MemSpace, id: u8) -> bool {
        id <= register_id::FLAGS
    }

    fn pc(&self, _space: MemSpace) -> u16 {
        self.pc
    }

    fn mem_get_block(&self, _space: MemSpace, _bank: u16, start: u16, len: u16, out: &mut [u8]) {
        for i in 0..len as usize {
            out[i] = self.memory.get(&start.wrapping_add(i as u16)).copied().unwrap_or(0);
        }
    }

    fn mem_set_byte(&mut self, _space: MemSpace, _bank: u16, addr: u16, value: u8) {
        self.memory.insert(addr, value);
    }

    fn bank_list(&self, _space: MemSpace) -> Vec<(u16, String)> {
        vec![(0, "ram".into())]
    }

    fn bank_valid(&self, _space: MemSpace, bank: u16) -> bool {
        bank == 0
    }

    fn sidefx(&self) -> bool {
        self.sidefx
    }

    fn set_sidefx(&mut self, value: bool) {
        self.sidefx = value;
    }

    fn checkpoint_add(&mut self, start: u16, end: u16, stop_on_hit: bool, op: MemOp, temporary: bool) -> u32 {
        let number = self.next_checkpoint;
        self.next_checkpoint += 1;
        self.checkpoints.push(Checkpoint {
            number,
            start_addr: start,
            end_addr: end,
            stop_on_hit,
            enabled: true,
            op,
            temporary,
            hit_count: 0,
            ignore_count: 0,
            has_condition: false,
        });
        number
    }

    fn checkpoint_find(&self, number: u32) -> Option<Checkpoint> {
        self.checkpoints.iter().find(|c| c.number == number).copied()
    }

    fn checkpoint_delete(&mut self, number: u32) -> bool {
        let before = self.checkpoints.len();
        self.checkpoints.retain(|c| c.number != number);
        self.checkpoints.len() != before
    }

    fn checkpoint_toggle(&mut self, number: u32, enable: bool) -> bool {
        if let Some(c) = self.checkpoints.iter_mut().find(|c| c.number == number) {
            c.enabled = enable;
            true
        } else {
            false
        }
    }

    fn checkpoint_list(&self) -> Vec<Checkpoint> {
        self.checkpoints.clone()
    }

    fn reset(&mut self, kind: u8) {
        tracing::info!(kind, "demo emulator reset");
        self.pc = 0;
    }

    fn instructions_step(&mut self, count: u16) {
        self.pc = self.pc.wrapping_add(count);
    }

    fn instructions_next(&mut self, count: u16) {
        self.pc = self.pc.wrapping_add(count);
    }

    fn instruction_return(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }

    fn keyboard_feed(&mut self, text: &str) {
        tracing::debug!(text, "demo emulator keyboard feed");
    }

    fn autostart(&mut self, filename: &str, _index: u16, _run: bool) -> EmulatorResult<()> {
        if filename.is_empty() {
            return Err(EmulatorError("autostart requires a filename".into()));
        }
        tracing::info!(filename, "demo emulator autostart");
        Ok(())
    }

    fn quit(&mut self) {
        tracing::info!("demo emulator quit");
    }

    fn parse_and_execute(&mut self, line: &str) -> EmulatorResult<()> {
        tracing::debug!(line, "demo emulator ignoring condition expression");
        Ok(())
    }
}
