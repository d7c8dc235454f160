//! REGISTERS_GET, REGISTERS_SET, REGISTERS_AVAILABLE.

use std::io::{self, Write};

use super::{invalid_length, invalid_parameter, Outcome};
use crate::emulator::Emulator;
use crate::protocol::{ErrorCode, MemSpace, ResponseType};
use crate::wire::codec::{read_u16_le, write_lp_string, write_u16_le};
use crate::wire::{RawFrame, ResponseWriter};

/// The memspace a register belongs to; the protocol carries no explicit
/// memspace in register commands, so the main CPU is assumed, mirroring
/// the original's single-space register monitor.
const REGISTER_SPACE: MemSpace = MemSpace::Computer;

fn encode_register_info(emulator: &dyn Emulator) -> Vec<u8> {
    let regs: Vec<_> = emulator
        .registers(REGISTER_SPACE)
        .into_iter()
        .filter(|r| !r.is_synthetic)
        .collect();

    let mut body = Vec::new();
    write_u16_le(&mut body, regs.len() as u16);
    for reg in &regs {
        body.push(3); // item_size: id(1) + value(2)
        body.push(reg.id);
        write_u16_le(&mut body, reg.value);
    }
    body
}

pub fn registers_get<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let body = encode_register_info(emulator);
    out.respond(frame.request_id, ResponseType::RegisterInfo, ErrorCode::Ok, &body)?;
    Ok(Outcome::Continue)
}

pub fn registers_set<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < 2 {
        return invalid_length(out, request_id);
    }

    let count = read_u16_le(&frame.body) as usize;
    let mut offset = 2;
    let mut updates = Vec::with_capacity(count);

    for _ in 0..count {
        if frame.body.len() < offset + 1 {
            return invalid_length(out, request_id);
        }
        let item_size = frame.body[offset] as usize;
        if item_size < 3 {
            return invalid_parameter(out, request_id, ResponseType::RegisterInfo);
        }
        if frame.body.len() < offset + 1 + item_size {
            return invalid_length(out, request_id);
        }
        let id = frame.body[offset + 1];
        let value = read_u16_le(&frame.body[offset + 2..offset + 4]);
        if !emulator.register_valid(REGISTER_SPACE, id) {
            return invalid_parameter(out, request_id, ResponseType::RegisterInfo);
        }
        updates.push((id, value));
        offset += 1 + item_size;
    }

    for (id, value) in updates {
        emulator.register_set(REGISTER_SPACE, id, value);
    }

    let body = encode_register_info(emulator);
    out.respond(request_id, ResponseType::RegisterInfo, ErrorCode::Ok, &body)?;
    Ok(Outcome::Continue)
}

pub fn registers_available<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let regs: Vec<_> = emulator
        .registers(REGISTER_SPACE)
        .into_iter()
        .filter(|r| !r.is_synthetic)
        .collect();

    let mut body = Vec::new();
    write_u16_le(&mut body, regs.len() as u16);
    for reg in &regs {
        let item_size = reg.name.len() as u8 + 3;
        body.push(item_size);
        body.push(reg.id);
        body.push(reg.size_bits);
        write_lp_string(&mut body, reg.name.as_bytes());
    }

    out.respond(frame.request_id, ResponseType::RegistersAvailable, ErrorCode::Ok, &body)?;
    Ok(Outcome::Continue)
}
