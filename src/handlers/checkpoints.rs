//! CHECKPOINT_GET, CHECKPOINT_SET, CHECKPOINT_DELETE, CHECKPOINT_LIST,
//! CHECKPOINT_TOGGLE, CONDITION_SET.

use std::io::{self, Write};

use super::{invalid_length, invalid_parameter, Outcome};
use crate::emulator::{Checkpoint, Emulator};
use crate::protocol::{ErrorCode, MemOp, ResponseType};
use crate::wire::codec::{read_u32_le, write_u32_le};
use crate::wire::{RawFrame, ResponseWriter};

fn encode_checkpoint(body: &mut Vec<u8>, cp: &Checkpoint, hit: bool) {
    write_u32_le(body, cp.number);
    body.push(hit as u8);
    crate::wire::codec::write_u16_le(body, cp.start_addr);
    crate::wire::codec::write_u16_le(body, cp.end_addr);
    body.push(cp.stop_on_hit as u8);
    body.push(cp.enabled as u8);
    body.push(cp.op.0);
    body.push(cp.temporary as u8);
    write_u32_le(body, cp.hit_count);
    write_u32_le(body, cp.ignore_count);
    body.push(cp.has_condition as u8);
}

pub fn checkpoint_get<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < 4 {
        return invalid_length(out, request_id);
    }
    let number = read_u32_le(&frame.body);

    let Some(cp) = emulator.checkpoint_find(number) else {
        return invalid_parameter(out, request_id, ResponseType::CheckpointInfo);
    };

    let mut body = Vec::new();
    encode_checkpoint(&mut body, &cp, false);
    out.respond(request_id, ResponseType::CheckpointInfo, ErrorCode::Ok, &body)?;
    Ok(Outcome::Continue)
}

pub fn checkpoint_set<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < 8 {
        return invalid_length(out, request_id);
    }

    let body = &frame.body;
    let start = crate::wire::codec::read_u16_le(&body[0..2]);
    let end = crate::wire::codec::read_u16_le(&body[2..4]);
    let stop = body[4] != 0;
    let enabled = body[5] != 0;
    let op = MemOp(body[6]);
    let temporary = body[7] != 0;

    let number = emulator.checkpoint_add(start, end, stop, op, temporary);
    if !enabled {
        emulator.checkpoint_toggle(number, false);
    }

    let cp = emulator
        .checkpoint_find(number)
        .expect("checkpoint_add must register a findable checkpoint");

    let mut response_body = Vec::new();
    encode_checkpoint(&mut response_body, &cp, false);
    out.respond(request_id, ResponseType::CheckpointInfo, ErrorCode::Ok, &response_body)?;
    Ok(Outcome::Continue)
}

pub fn checkpoint_delete<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < 4 {
        return invalid_length(out, request_id);
    }
    let number = read_u32_le(&frame.body);

    if !emulator.checkpoint_delete(number) {
        return invalid_parameter(out, request_id, ResponseType::CheckpointDelete);
    }

    out.respond(request_id, ResponseType::CheckpointDelete, ErrorCode::Ok, &[])?;
    Ok(Outcome::Continue)
}

pub fn checkpoint_list<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    let checkpoints = emulator.checkpoint_list();

    for cp in &checkpoints {
        let mut body = Vec::new();
        encode_checkpoint(&mut body, cp, false);
        out.respond(request_id, ResponseType::CheckpointInfo, ErrorCode::Ok, &body)?;
    }

    let mut terminator = Vec::new();
    write_u32_le(&mut terminator, checkpoints.len() as u32);
    out.respond(request_id, ResponseType::CheckpointList, ErrorCode::Ok, &terminator)?;
    Ok(Outcome::Continue)
}

pub fn checkpoint_toggle<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < 5 {
        return invalid_length(out, request_id);
    }
    let number = read_u32_le(&frame.body);
    let enable = frame.body[4] != 0;

    if !emulator.checkpoint_toggle(number, enable) {
        return invalid_parameter(out, request_id, ResponseType::CheckpointToggle);
    }

    out.respond(request_id, ResponseType::CheckpointToggle, ErrorCode::Ok, &[])?;
    Ok(Outcome::Continue)
}

pub fn condition_set<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < 5 {
        return invalid_length(out, request_id);
    }
    let number = read_u32_le(&frame.body);
    let len = frame.body[4] as usize;
    if frame.body.len() < 5 + len {
        return invalid_length(out, request_id);
    }
    let expr = match std::str::from_utf8(&frame.body[5..5 + len]) {
        Ok(s) => s,
        Err(_) => return invalid_parameter(out, request_id, ResponseType::ConditionSet),
    };

    let command = format!("cond {number} if ( {expr} )");
    if emulator.parse_and_execute(&command).is_err() {
        return invalid_parameter(out, request_id, ResponseType::ConditionSet);
    }

    out.respond(request_id, ResponseType::ConditionSet, ErrorCode::Ok, &[])?;
    Ok(Outcome::Continue)
}
