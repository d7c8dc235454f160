//! Dispatch throughput: how many `PING`/`MEM_GET` round trips the handler
//! layer can push through per second, independent of socket I/O.

use criterion::{criterion_group, criterion_main, Criterion};

use retromon::handlers::dispatch;
use retromon::reference::DemoEmulator;
use retromon::wire::{RawFrame, ResponseWriter};

fn bench_ping_dispatch(c: &mut Criterion) {
    let mut emulator = DemoEmulator::new();
    let frame = RawFrame {
        request_id: 1,
        command_type: 0x81,
        body: vec![],
    };

    c.bench_function("dispatch_ping", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            let mut out = ResponseWriter::new(&mut buf);
            dispatch(&frame, &mut emulator, &mut out).unwrap();
        })
    });
}

fn bench_mem_get_dispatch(c: &mut Criterion) {
    let mut emulator = DemoEmulator::new();
    let mut body = vec![0u8];
    body.extend_from_slice(&0x0400u16.to_le_bytes());
    body.extend_from_slice(&0x04FFu16.to_le_bytes());
    body.push(0);
    body.extend_from_slice(&0u16.to_le_bytes());
    let frame = RawFrame {
        request_id: 1,
        command_type: 0x01,
        body,
    };

    c.bench_function("dispatch_mem_get_256_bytes", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            let mut out = ResponseWriter::new(&mut buf);
            dispatch(&frame, &mut emulator, &mut out).unwrap();
        })
    });
}

criterion_group!(benches, bench_ping_dispatch, bench_mem_get_dispatch);
criterion_main!(benches);
