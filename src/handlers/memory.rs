//! MEM_GET, MEM_SET, BANKS_AVAILABLE.

use std::io::{self, Write};

use super::{invalid_length, invalid_parameter, Outcome};
use crate::emulator::Emulator;
use crate::protocol::{ErrorCode, MemSpace, ResponseType};
use crate::wire::codec::{read_u16_le, write_lp_string, write_u16_le};
use crate::wire::{RawFrame, ResponseWriter};

/// `{sidefx:u8, start:u16, end:u16, memspace:u8, bank:u16}`, 8 bytes.
const MEM_HEADER_LEN: usize = 8;

struct MemHeader {
    sidefx: bool,
    start: u16,
    end: u16,
    memspace: u8,
    bank: u16,
}

fn parse_header(body: &[u8]) -> MemHeader {
    MemHeader {
        sidefx: body[0] != 0,
        start: read_u16_le(&body[1..3]),
        end: read_u16_le(&body[3..5]),
        memspace: body[5],
        bank: read_u16_le(&body[6..8]),
    }
}

/// Resolves and validates `{memspace, bank}`, responding with
/// `INVALID_PARAMETER` and returning `None` on failure.
fn resolve_space<W: Write>(
    emulator: &dyn Emulator,
    header: &MemHeader,
    request_id: u32,
    response_type: ResponseType,
    out: &mut ResponseWriter<W>,
) -> io::Result<Option<MemSpace>> {
    let Some(space) = MemSpace::from_byte(header.memspace) else {
        invalid_parameter(out, request_id, response_type)?;
        return Ok(None);
    };
    if !emulator.bank_valid(space, header.bank) {
        invalid_parameter(out, request_id, response_type)?;
        return Ok(None);
    }
    Ok(Some(space))
}

pub fn mem_get<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < MEM_HEADER_LEN {
        return invalid_length(out, request_id);
    }

    let header = parse_header(&frame.body);
    if header.start > header.end {
        tracing::debug!(start = header.start, end = header.end, "mem_get: inverted range");
        return invalid_parameter(out, request_id, ResponseType::MemGet);
    }

    let Some(space) = resolve_space(emulator, &header, request_id, ResponseType::MemGet, out)?
    else {
        return Ok(Outcome::Continue);
    };

    // `length` on the wire is a u16 and wraps to 0 for the full 64K range
    // (start=0, end=0xFFFF); the byte count actually read does not.
    let byte_count = header.end as usize - header.start as usize + 1;
    let wire_len = byte_count as u16;

    let old_sidefx = emulator.sidefx();
    emulator.set_sidefx(header.sidefx);
    let mut data = vec![0u8; byte_count];
    emulator.mem_get_block(space, header.bank, header.start, byte_count as u16, &mut data);
    emulator.set_sidefx(old_sidefx);

    let mut body = Vec::with_capacity(2 + byte_count);
    write_u16_le(&mut body, wire_len);
    body.extend_from_slice(&data);

    out.respond(request_id, ResponseType::MemGet, ErrorCode::Ok, &body)?;
    Ok(Outcome::Continue)
}

pub fn mem_set<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < MEM_HEADER_LEN {
        return invalid_length(out, request_id);
    }

    let header = parse_header(&frame.body);
    if header.start > header.end {
        tracing::debug!(start = header.start, end = header.end, "mem_set: inverted range");
        return invalid_parameter(out, request_id, ResponseType::MemSet);
    }

    let byte_count = header.end as usize - header.start as usize + 1;
    if frame.body.len() < MEM_HEADER_LEN + byte_count {
        return invalid_length(out, request_id);
    }

    let Some(space) = resolve_space(emulator, &header, request_id, ResponseType::MemSet, out)?
    else {
        return Ok(Outcome::Continue);
    };

    let old_sidefx = emulator.sidefx();
    emulator.set_sidefx(header.sidefx);
    for (i, &byte) in frame.body[MEM_HEADER_LEN..MEM_HEADER_LEN + byte_count]
        .iter()
        .enumerate()
    {
        let addr = header.start.wrapping_add(i as u16);
        emulator.mem_set_byte(space, header.bank, addr, byte);
    }
    emulator.set_sidefx(old_sidefx);

    out.respond(request_id, ResponseType::MemSet, ErrorCode::Ok, &[])?;
    Ok(Outcome::Continue)
}

pub fn banks_available<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let banks = emulator.bank_list(MemSpace::Computer);

    let mut body = Vec::new();
    write_u16_le(&mut body, banks.len() as u16);
    for (bank_no, name) in &banks {
        let item_size = name.len() as u8 + 3;
        body.push(item_size);
        write_u16_le(&mut body, *bank_no);
        write_lp_string(&mut body, name.as_bytes());
    }

    out.respond(frame.request_id, ResponseType::BanksAvailable, ErrorCode::Ok, &body)?;
    Ok(Outcome::Continue)
}
