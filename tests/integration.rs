//! End-to-end tests driving a real `Server` over a real `TcpStream`,
//! covering the protocol's seed scenarios.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use retromon::config::ServerAddress;
use retromon::reference::DemoEmulator;
use retromon::server::Server;

/// Binds a `Server` to an OS-assigned port, drives its poll/trap loop on a
/// background thread against a fresh `DemoEmulator`, and returns the port.
fn spawn_server() -> u16 {
    let address = ServerAddress::parse("ip4://127.0.0.1:0").expect("address parses");
    let mut server = Server::new(address);
    server.enable().expect("server binds");
    let port = server.local_addr().expect("listener is bound").port();

    thread::spawn(move || {
        let mut emulator = DemoEmulator::new();
        loop {
            server.poll().expect("poll does not error");
            if server.has_client() {
                match server.trap(&mut emulator) {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(_) => break,
                }
            } else {
                thread::sleep(Duration::from_millis(5));
            }
        }
    });

    // Give the listener a moment to be ready for the first connect.
    thread::sleep(Duration::from_millis(20));
    port
}

fn connect(port: u16) -> TcpStream {
    TcpStream::connect(("127.0.0.1", port)).expect("client connects")
}

/// Reads one framed response and returns `(response_type, error_code,
/// request_id, body)`.
fn read_response(stream: &mut TcpStream) -> (u8, u8, u32, Vec<u8>) {
    let mut header = [0u8; 12];
    stream.read_exact(&mut header).expect("reads response header");
    assert_eq!(header[0], 0x02, "STX");
    let body_len = u32::from_le_bytes(header[2..6].try_into().unwrap());
    let response_type = header[6];
    let error_code = header[7];
    let request_id = u32::from_le_bytes(header[8..12].try_into().unwrap());
    let mut body = vec![0u8; body_len as usize];
    stream.read_exact(&mut body).expect("reads response body");
    (response_type, error_code, request_id, body)
}

fn send_frame(stream: &mut TcpStream, request_id: u32, command_type: u8, body: &[u8]) {
    let mut frame = Vec::new();
    frame.push(0x02);
    frame.push(0x01);
    frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
    frame.extend_from_slice(&request_id.to_le_bytes());
    frame.push(command_type);
    frame.extend_from_slice(body);
    stream.write_all(&frame).expect("writes frame");
}

/// S6: the first message on a new connection is the `STOPPED` event, no
/// client command precedes it.
fn expect_stopped_event(stream: &mut TcpStream) {
    let (response_type, error_code, request_id, _body) = read_response(stream);
    assert_eq!(response_type, 0x62, "STOPPED");
    assert_eq!(error_code, 0x00);
    assert_eq!(request_id, 0xFFFF_FFFF);
}

#[test]
fn s1_ping() {
    let port = spawn_server();
    let mut stream = connect(port);
    expect_stopped_event(&mut stream);

    send_frame(&mut stream, 1, 0x81, &[]);
    let (response_type, error_code, request_id, body) = read_response(&mut stream);
    assert_eq!(response_type, 0x81);
    assert_eq!(error_code, 0x00);
    assert_eq!(request_id, 1);
    assert!(body.is_empty());
}

#[test]
fn s2_mem_get_single_byte() {
    let port = spawn_server();
    let mut stream = connect(port);
    expect_stopped_event(&mut stream);

    // MEM_SET one byte at 0x0400 so MEM_GET has something deterministic to read.
    let mut set_body = vec![0u8, 0x00, 0x04, 0x00, 0x04, 0x00, 0x00, 0x00];
    set_body.push(0xAB);
    send_frame(&mut stream, 1, 0x02, &set_body);
    let (_, error_code, _, _) = read_response(&mut stream);
    assert_eq!(error_code, 0x00);

    let get_body = vec![0u8, 0x00, 0x04, 0x00, 0x04, 0x00, 0x00, 0x00];
    send_frame(&mut stream, 2, 0x01, &get_body);
    let (response_type, error_code, request_id, body) = read_response(&mut stream);
    assert_eq!(response_type, 0x01);
    assert_eq!(error_code, 0x00);
    assert_eq!(request_id, 2);
    assert_eq!(&body, &[0x01, 0x00, 0xAB]);
}

#[test]
fn s3_mem_set_inversion_is_invalid_parameter() {
    let port = spawn_server();
    let mut stream = connect(port);
    expect_stopped_event(&mut stream);

    let mut body = vec![0u8, 0x05, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00];
    body.push(0xAA);
    send_frame(&mut stream, 3, 0x02, &body);
    let (_, error_code, request_id, body) = read_response(&mut stream);
    assert_eq!(error_code, 0x81);
    assert_eq!(request_id, 3);
    assert!(body.is_empty());
}

#[test]
fn s4_unknown_command() {
    let port = spawn_server();
    let mut stream = connect(port);
    expect_stopped_event(&mut stream);

    send_frame(&mut stream, 4, 0xFF, &[]);
    let (_, error_code, request_id, _) = read_response(&mut stream);
    assert_eq!(error_code, 0x81);
    assert_eq!(request_id, 4);
}

#[test]
fn s5_checkpoint_set_then_list() {
    let port = spawn_server();
    let mut stream = connect(port);
    expect_stopped_event(&mut stream);

    let set_body = vec![0x00, 0xC0, 0x10, 0xC0, 1u8, 1u8, 4u8, 0u8]; // exec op = 4
    send_frame(&mut stream, 5, 0x12, &set_body);
    let (response_type, error_code, _, body) = read_response(&mut stream);
    assert_eq!(response_type, 0x11);
    assert_eq!(error_code, 0x00);
    let number = u32::from_le_bytes(body[0..4].try_into().unwrap());
    assert_eq!(number, 1);
    assert_eq!(body[4], 0); // hit = false

    send_frame(&mut stream, 6, 0x14, &[]);
    let (response_type, _, _, info_body) = read_response(&mut stream);
    assert_eq!(response_type, 0x11);
    let listed_number = u32::from_le_bytes(info_body[0..4].try_into().unwrap());
    assert_eq!(listed_number, 1);

    let (response_type, _, _, terminator_body) = read_response(&mut stream);
    assert_eq!(response_type, 0x14);
    assert_eq!(u32::from_le_bytes(terminator_body.try_into().unwrap()), 1);
}

#[test]
fn s6_stopped_event_carries_reserved_request_id() {
    let port = spawn_server();
    let mut stream = connect(port);
    let (response_type, error_code, request_id, body) = read_response(&mut stream);
    assert_eq!(response_type, 0x62);
    assert_eq!(error_code, 0x00);
    assert_eq!(request_id, 0xFFFF_FFFF);
    assert_eq!(body.len(), 2);
}

#[test]
fn exit_hands_control_back_and_emits_resumed() {
    let port = spawn_server();
    let mut stream = connect(port);
    expect_stopped_event(&mut stream);

    send_frame(&mut stream, 7, 0xaa, &[]);
    let (response_type, error_code, request_id, _) = read_response(&mut stream);
    assert_eq!(response_type, 0xaa);
    assert_eq!(error_code, 0x00);
    assert_eq!(request_id, 7);

    let (response_type, _, request_id, _) = read_response(&mut stream);
    assert_eq!(response_type, 0x63); // RESUMED
    assert_eq!(request_id, 0xFFFF_FFFF);
}
