//! PING, ADVANCE_INSTRUCTIONS, KEYBOARD_FEED, EXECUTE_UNTIL_RETURN, EXIT,
//! QUIT, RESET, AUTOSTART.

use std::io::{self, Write};

use super::{invalid_length, invalid_parameter, Outcome};
use crate::emulator::Emulator;
use crate::protocol::{ErrorCode, ResponseType};
use crate::wire::codec::read_u16_le;
use crate::wire::{RawFrame, ResponseWriter};

pub fn ping<W: Write>(frame: &RawFrame, out: &mut ResponseWriter<W>) -> io::Result<Outcome> {
    out.respond(frame.request_id, ResponseType::Ping, ErrorCode::Ok, &[])?;
    Ok(Outcome::Continue)
}

pub fn advance_instructions<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < 3 {
        return invalid_length(out, request_id);
    }
    let step_over_subs = frame.body[0] != 0;
    let count = read_u16_le(&frame.body[1..3]);

    out.respond(request_id, ResponseType::AdvanceInstructions, ErrorCode::Ok, &[])?;

    out.event(ResponseType::Resumed, &[])?;
    if step_over_subs {
        emulator.instructions_next(count);
    } else {
        emulator.instructions_step(count);
    }
    let pc = emulator.pc(crate::protocol::MemSpace::Computer);
    out.event(ResponseType::Stopped, &pc.to_le_bytes())?;

    Ok(Outcome::Continue)
}

pub fn keyboard_feed<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.is_empty() {
        return invalid_length(out, request_id);
    }
    let len = frame.body[0] as usize;
    if frame.body.len() < 1 + len {
        return invalid_length(out, request_id);
    }
    let Ok(text) = std::str::from_utf8(&frame.body[1..1 + len]) else {
        return invalid_parameter(out, request_id, ResponseType::KeyboardFeed);
    };

    emulator.keyboard_feed(text);
    out.respond(request_id, ResponseType::KeyboardFeed, ErrorCode::Ok, &[])?;
    Ok(Outcome::Continue)
}

pub fn execute_until_return<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    out.respond(request_id, ResponseType::ExecuteUntilReturn, ErrorCode::Ok, &[])?;

    out.event(ResponseType::Resumed, &[])?;
    emulator.instruction_return();
    let pc = emulator.pc(crate::protocol::MemSpace::Computer);
    out.event(ResponseType::Stopped, &pc.to_le_bytes())?;

    Ok(Outcome::Continue)
}

pub fn exit<W: Write>(frame: &RawFrame, out: &mut ResponseWriter<W>) -> io::Result<Outcome> {
    out.respond(frame.request_id, ResponseType::Exit, ErrorCode::Ok, &[])?;
    out.event(ResponseType::Resumed, &[])?;
    Ok(Outcome::ReturnToEmulator)
}

pub fn quit<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    out.respond(frame.request_id, ResponseType::Quit, ErrorCode::Ok, &[])?;
    emulator.quit();
    Ok(Outcome::Quit)
}

pub fn reset<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.is_empty() {
        return invalid_length(out, request_id);
    }
    emulator.reset(frame.body[0]);
    out.respond(request_id, ResponseType::Reset, ErrorCode::Ok, &[])?;
    Ok(Outcome::Continue)
}

pub fn autostart<W: Write>(
    frame: &RawFrame,
    emulator: &mut dyn Emulator,
    out: &mut ResponseWriter<W>,
) -> io::Result<Outcome> {
    let request_id = frame.request_id;
    if frame.body.len() < 4 {
        return invalid_length(out, request_id);
    }
    let run = frame.body[0] != 0;
    let file_index = read_u16_le(&frame.body[1..3]);
    let len = frame.body[3] as usize;
    if frame.body.len() < 4 + len {
        return invalid_length(out, request_id);
    }
    let Ok(filename) = std::str::from_utf8(&frame.body[4..4 + len]) else {
        return invalid_parameter(out, request_id, ResponseType::Autostart);
    };

    if emulator.autostart(filename, file_index, run).is_err() {
        return invalid_parameter(out, request_id, ResponseType::Autostart);
    }

    out.respond(request_id, ResponseType::Autostart, ErrorCode::Ok, &[])?;
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockEmulator;

    #[test]
    fn ping_replies_with_empty_body() {
        let frame = RawFrame {
            request_id: 1,
            command_type: 0x81,
            body: vec![],
        };
        let mut buf = Vec::new();
        let mut out = ResponseWriter::new(&mut buf);
        ping(&frame, &mut out).unwrap();
        assert_eq!(buf.len(), 12);
        assert_eq!(buf[6], ResponseType::Ping as u8);
    }

    #[test]
    fn advance_instructions_runs_steps_and_brackets_with_events() {
        let mut emu = MockEmulator::new();
        let mut body = vec![0u8];
        crate::wire::codec::write_u16_le(&mut body, 5);
        let frame = RawFrame {
            request_id: 1,
            command_type: 0x71,
            body,
        };
        let mut buf = Vec::new();
        let mut out = ResponseWriter::new(&mut buf);
        advance_instructions(&frame, &mut emu, &mut out).unwrap();
        assert_eq!(emu.steps_run(), 5);

        // response, RESUMED event, STOPPED event: 3 framed messages
        let mut count = 0;
        let mut offset = 0;
        while offset < buf.len() {
            let body_len = u32::from_le_bytes(buf[offset + 2..offset + 6].try_into().unwrap());
            offset += 12 + body_len as usize;
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn keyboard_feed_rejects_short_length() {
        let mut emu = MockEmulator::new();
        let frame = RawFrame {
            request_id: 1,
            command_type: 0x72,
            body: vec![],
        };
        let mut buf = Vec::new();
        let mut out = ResponseWriter::new(&mut buf);
        keyboard_feed(&frame, &mut emu, &mut out).unwrap();
        assert_eq!(buf[7], ErrorCode::CmdInvalidLength as u8);
    }

    #[test]
    fn keyboard_feed_pushes_text() {
        let mut emu = MockEmulator::new();
        let mut body = vec![5u8];
        body.extend_from_slice(b"hello");
        let frame = RawFrame {
            request_id: 1,
            command_type: 0x72,
            body,
        };
        let mut buf = Vec::new();
        let mut out = ResponseWriter::new(&mut buf);
        keyboard_feed(&frame, &mut emu, &mut out).unwrap();
        assert_eq!(emu.keyboard_buffer(), "hello");
    }

    #[test]
    fn exit_returns_control_to_emulator() {
        let frame = RawFrame {
            request_id: 1,
            command_type: 0xaa,
            body: vec![],
        };
        let mut buf = Vec::new();
        let mut out = ResponseWriter::new(&mut buf);
        let outcome = exit(&frame, &mut out).unwrap();
        assert_eq!(outcome, Outcome::ReturnToEmulator);
    }

    #[test]
    fn quit_calls_emulator_quit_and_ends_session() {
        let mut emu = MockEmulator::new();
        let frame = RawFrame {
            request_id: 1,
            command_type: 0xbb,
            body: vec![],
        };
        let mut buf = Vec::new();
        let mut out = ResponseWriter::new(&mut buf);
        let outcome = quit(&frame, &mut emu, &mut out).unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert!(emu.quit_was_called());
    }

    #[test]
    fn autostart_failure_is_invalid_parameter() {
        let mut emu = MockEmulator::new();
        let frame = RawFrame {
            request_id: 1,
            command_type: 0xdd,
            body: vec![1, 0, 0, 0], // run=1, index=0, len=0 -> empty filename
        };
        let mut buf = Vec::new();
        let mut out = ResponseWriter::new(&mut buf);
        autostart(&frame, &mut emu, &mut out).unwrap();
        assert_eq!(buf[7], ErrorCode::InvalidParameter as u8);
    }

    #[test]
    fn autostart_success_records_request() {
        let mut emu = MockEmulator::new();
        let mut body = vec![1u8, 0, 0, 4];
        body.extend_from_slice(b"demo");
        let frame = RawFrame {
            request_id: 1,
            command_type: 0xdd,
            body,
        };
        let mut buf = Vec::new();
        let mut out = ResponseWriter::new(&mut buf);
        autostart(&frame, &mut emu, &mut out).unwrap();
        assert_eq!(buf[7], ErrorCode::Ok as u8);
        assert_eq!(emu.last_autostart(), Some(&("demo".to_string(), 0, true)));
    }
}
