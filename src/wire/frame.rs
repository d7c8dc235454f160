//! Frame reader: resynchronizes on `STX`, validates the API version, and
//! assembles a complete request frame into a contiguous buffer.

use std::io::{self, ErrorKind, Read};

use crate::protocol::{API_VERSION, MAX_BODY_LEN, REMAINING_HEADER_SIZE, STX};
use crate::wire::codec::read_u32_le;

/// A fully assembled request, header already stripped of the frame
/// envelope (`STX`, `api_version`, `body_length`).
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub request_id: u32,
    pub command_type: u8,
    pub body: Vec<u8>,
}

/// Reads one frame from `reader`, resynchronizing past any bytes that
/// don't start with `STX` and past any frame whose `api_version` isn't
/// the one this server speaks.
///
/// Returns `Err(UnexpectedEof)` if the stream closes (cleanly or
/// otherwise) before a full frame is assembled; the caller treats any
/// `Err` here as "tear down the session".
pub fn read_frame<R: Read>(reader: &mut R) -> io::Result<RawFrame> {
    loop {
        let stx = read_one_byte(reader)?;
        if stx != STX {
            continue;
        }

        let mut prefix = [0u8; 5]; // api_version(1) + body_length(4)
        reader.read_exact(&mut prefix).map_err(short_read)?;

        let api_version = prefix[0];
        if api_version != API_VERSION {
            continue;
        }

        let body_length = read_u32_le(&prefix[1..5]);
        if body_length > MAX_BODY_LEN {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("body_length {body_length} exceeds {MAX_BODY_LEN}"),
            ));
        }

        let tail_len = REMAINING_HEADER_SIZE + body_length as usize;
        let mut tail = vec![0u8; tail_len];
        read_fully(reader, &mut tail)?;

        let request_id = read_u32_le(&tail[0..4]);
        let command_type = tail[4];
        let body = tail[REMAINING_HEADER_SIZE..].to_vec();

        return Ok(RawFrame {
            request_id,
            command_type,
            body,
        });
    }
}

fn read_one_byte<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut byte = [0u8; 1];
    let n = reader.read(&mut byte)?;
    if n == 0 {
        return Err(io::Error::new(ErrorKind::UnexpectedEof, "connection closed"));
    }
    Ok(byte[0])
}

/// Loops on short reads until `buf` is full or the connection is gone.
/// `Read::read_exact` does this too, but we want to tolerate a sequence
/// of non-empty short reads the way a blocking socket naturally produces
/// them, rather than relying on a single implementation's retry policy.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "short read"));
        }
        filled += n;
    }
    Ok(())
}

fn short_read(e: io::Error) -> io::Error {
    if e.kind() == ErrorKind::UnexpectedEof {
        e
    } else {
        io::Error::new(ErrorKind::UnexpectedEof, e)
    }
}
