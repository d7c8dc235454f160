//! Response encoder: frames a response or unsolicited event and writes it
//! to the connected socket.

use std::io::{self, Write};

use crate::protocol::{ErrorCode, ResponseType, API_VERSION, EVENT_ID, STX};
use crate::wire::codec::write_u32_le;

/// Wraps a writer and frames responses/events onto it.
///
/// All writes go through [`ResponseWriter::transmit`], which treats a
/// short write as fatal to the session — the same policy the frame reader
/// applies to short reads.
pub struct ResponseWriter<W> {
    inner: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Writes a response correlated with `request_id`.
    pub fn respond(
        &mut self,
        request_id: u32,
        response_type: ResponseType,
        error_code: ErrorCode,
        body: &[u8],
    ) -> io::Result<()> {
        self.write_framed(request_id, response_type, error_code, body)
    }

    /// Writes an unsolicited event (`request_id = EVENT_ID`, `error_code = OK`).
    pub fn event(&mut self, response_type: ResponseType, body: &[u8]) -> io::Result<()> {
        self.write_framed(EVENT_ID, response_type, ErrorCode::Ok, body)
    }

    fn write_framed(
        &mut self,
        request_id: u32,
        response_type: ResponseType,
        error_code: ErrorCode,
        body: &[u8],
    ) -> io::Result<()> {
        let mut header = Vec::with_capacity(12);
        header.push(STX);
        header.push(API_VERSION);
        write_u32_le(&mut header, body.len() as u32);
        header.push(response_type as u8);
        header.push(error_code as u8);
        write_u32_le(&mut header, request_id);

        self.transmit(&header)?;
        if !body.is_empty() {
            self.transmit(body)?;
        }
        Ok(())
    }

    fn transmit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_header_is_twelve_bytes_plus_body() {
        let mut buf = Vec::new();
        {
            let mut w = ResponseWriter::new(&mut buf);
            w.respond(9, ResponseType::Ping, ErrorCode::Ok, &[]).unwrap();
        }
        assert_eq!(buf.len(), 12);
        assert_eq!(buf[0], STX);
        assert_eq!(buf[1], API_VERSION);
        assert_eq!(&buf[2..6], &0u32.to_le_bytes());
        assert_eq!(buf[6], ResponseType::Ping as u8);
        assert_eq!(buf[7], ErrorCode::Ok as u8);
        assert_eq!(&buf[8..12], &9u32.to_le_bytes());
    }

    #[test]
    fn event_uses_reserved_request_id() {
        let mut buf = Vec::new();
        {
            let mut w = ResponseWriter::new(&mut buf);
            w.event(ResponseType::Stopped, &[0x00, 0x04]).unwrap();
        }
        assert_eq!(&buf[8..12], &EVENT_ID.to_le_bytes());
        assert_eq!(&buf[12..14], &[0x00, 0x04]);
    }

    #[test]
    fn error_response_has_natural_response_type_zero() {
        let mut buf = Vec::new();
        {
            let mut w = ResponseWriter::new(&mut buf);
            w.respond(5, ResponseType::None, ErrorCode::CmdInvalidLength, &[])
                .unwrap();
        }
        assert_eq!(buf[6], 0x00);
        assert_eq!(buf[7], ErrorCode::CmdInvalidLength as u8);
    }
}
