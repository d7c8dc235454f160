//! In-memory `Emulator` stand-in shared by handler unit tests.

#![cfg(test)]

use std::collections::HashMap;

use crate::emulator::{Checkpoint, Emulator, EmulatorResult, RegisterDescriptor};
use crate::protocol::{MemOp, MemSpace};

pub struct MockEmulator {
    memory: HashMap<u16, u8>,
    registers: Vec<RegisterDescriptor>,
    checkpoints: Vec<Checkpoint>,
    next_checkpoint: u32,
    sidefx: bool,
    pc: u16,
    last_reset: Option<u8>,
    last_autostart: Option<(String, u16, bool)>,
    last_condition: Option<String>,
    quit_called: bool,
    steps_run: u32,
    keyboard: String,
}

impl MockEmulator {
    pub fn new() -> Self {
        Self {
            memory: HashMap::new(),
            registers: vec![
                RegisterDescriptor {
                    id: 0,
                    size_bits: 8,
                    name: "A".into(),
                    value: 0,
                    is_synthetic: false,
                },
                RegisterDescriptor {
                    id: 1,
                    size_bits: 16,
                    name: "PC".into(),
                    value: 0,
                    is_synthetic: false,
                },
                RegisterDescriptor {
                    id: 2,
                    size_bits: 8,
                    name: "FLAGS".into(),
                    value: 0,
                    is_synthetic: true,
                },
            ],
            checkpoints: Vec::new(),
            next_checkpoint: 1,
            sidefx: true,
            pc: 0,
            last_reset: None,
            last_autostart: None,
            last_condition: None,
            quit_called: false,
            steps_run: 0,
            keyboard: String::new(),
        }
    }

    pub fn poke(&mut self, addr: u16, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.memory.insert(addr.wrapping_add(i as u16), b);
        }
    }

    pub fn peek(&self, addr: u16) -> Option<u8> {
        self.memory.get(&addr).copied()
    }

    pub fn quit_was_called(&self) -> bool {
        self.quit_called
    }

    pub fn steps_run(&self) -> u32 {
        self.steps_run
    }

    pub fn keyboard_buffer(&self) -> &str {
        &self.keyboard
    }

    pub fn last_reset_kind(&self) -> Option<u8> {
        self.last_reset
    }

    pub fn last_autostart(&self) -> Option<&(String, u16, bool)> {
        self.last_autostart.as_ref()
    }

    pub fn last_condition(&self) -> Option<&str> {
        self.last_condition.as_deref()
    }
}

impl Emulator for MockEmulator {
    fn registers(&self, _space: MemSpace) -> Vec<RegisterDescriptor> {
        self.registers.clone()
    }

    fn register_get(&self, _space: MemSpace, id: u8) -> Option<u16> {
        self.registers.iter().find(|r| r.id == id).map(|r| r.value)
    }

    fn register_set(&mut self, _space: MemSpace, id: u8, value: u16) {
        if let Some(r) = self.registers.iter_mut().find(|r| r.id == id) {
            r.value = value;
        }
    }

    fn register_valid(&self, _space: MemSpace, id: u8) -> bool {
        self.registers.iter().any(|r| r.id == id)
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
        vec![(0, "default".into())]
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

    fn checkpoint_add(
        &mut self,
        start: u16,
        end: u16,
        stop_on_hit: bool,
        op: MemOp,
        temporary: bool,
    ) -> u32 {
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
        self.last_reset = Some(kind);
    }

    fn instructions_step(&mut self, count: u16) {
        self.steps_run += count as u32;
    }

    fn instructions_next(&mut self, count: u16) {
        self.steps_run += count as u32;
    }

    fn instruction_return(&mut self) {
        self.steps_run += 1;
    }

    fn keyboard_feed(&mut self, text: &str) {
        self.keyboard.push_str(text);
    }

    fn autostart(&mut self, filename: &str, index: u16, run: bool) -> EmulatorResult<()> {
        if filename.is_empty() {
            return Err(crate::emulator::EmulatorError("empty filename".into()));
        }
        self.last_autostart = Some((filename.to_string(), index, run));
        Ok(())
    }

    fn quit(&mut self) {
        self.quit_called = true;
    }

    fn parse_and_execute(&mut self, line: &str) -> EmulatorResult<()> {
        if line.contains("bad") {
            return Err(crate::emulator::EmulatorError("parse error".into()));
        }
        self.last_condition = Some(line.to_string());
        Ok(())
    }
}
