// Copyright (c) 2020 Ivaylo Petrov
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//
// author: Ivaylo Petrov <ivajloip@gmail.com>

use criterion::{criterion_group, criterion_main, Criterion};

use lorawan_parser::keys::*;
use lorawan_parser::parser::*;

use std::alloc::System;
use std::sync::atomic::{AtomicU64, Ordering};

#[global_allocator]
static GLOBAL: trallocator::Trallocator = trallocator::Trallocator::new(System);

const DATA_PAYLOAD: [u8; 18] = [
    0x40, 0x04, 0x03, 0x02, 0x01, 0x80, 0x01, 0x00, 0x01, 0xa6, 0x94, 0x64, 0x26, 0x15, 0xd6, 0xc3,
    0xb5, 0x82,
];

const JOIN_REQUEST: [u8; 23] = [
    0x00, 0x04, 0x03, 0x02, 0x01, 0x04, 0x03, 0x02, 0x01, 0x05, 0x04, 0x03, 0x02, 0x05, 0x04, 0x03,
    0x02, 0x2d, 0x10, 0x6a, 0x99, 0x0e, 0x12,
];

fn report(cnt: &AtomicU64) {
    let n = cnt.load(Ordering::SeqCst).max(1);
    let sum = GLOBAL.get_sum();
    println!("Approximate memory usage per iteration: {} from {}", sum / n, n);
}

fn bench_complete_data_payload_fhdr(c: &mut Criterion) {
    let cnt = AtomicU64::new(0);
    c.bench_function("data_payload_headers_parsing", |b| {
        b.iter(|| {
            cnt.fetch_add(1u64, Ordering::SeqCst);
            let phy = parse(&DATA_PAYLOAD[..]).unwrap();

            if let PhyPayload::UnconfirmedDataUp(data_payload) = phy {
                assert_eq!(data_payload.mhdr().mtype(), MType::UnconfirmedDataUp);
                let fhdr = data_payload.fhdr();
                assert_eq!(fhdr.dev_addr().to_u32(), 0x01020304);
                assert_eq!(fhdr.fcnt(), 1u16);
                assert!(fhdr.fopts().is_empty());

                let fctrl = fhdr.fctrl();
                assert_eq!(fctrl.f_opts_len(), 0);
                assert!(!fctrl.ack(), "no ack");
                assert!(fctrl.adr(), "ADR");
                assert_eq!(data_payload.f_port(), Some(1));
            } else {
                panic!("failed to parse DataPayload");
            }
        })
    });
    report(&cnt);
}

fn bench_complete_data_payload_mic_validation(c: &mut Criterion) {
    let mic_key = AES128([2; 16]);
    let cnt = AtomicU64::new(0);
    c.bench_function("data_payload_mic_validation", |b| {
        b.iter(|| {
            cnt.fetch_add(1u64, Ordering::SeqCst);
            let phy = parse(&DATA_PAYLOAD[..]).unwrap();
            assert!(phy.validate_mic(&mic_key));
        })
    });
    report(&cnt);
}

fn bench_join_request_mic_validation(c: &mut Criterion) {
    let key = AES128([1; 16]);
    let cnt = AtomicU64::new(0);
    c.bench_function("join_request_mic_validation", |b| {
        b.iter(|| {
            cnt.fetch_add(1u64, Ordering::SeqCst);
            let phy = parse(&JOIN_REQUEST[..]).unwrap();
            assert!(phy.validate_mic(&key));
        })
    });
    report(&cnt);
}

// Parsing borrowed bytes must not touch the heap.
fn check_parsing_does_not_allocate() {
    GLOBAL.reset();
    let before = GLOBAL.get_sum();
    for data in [&DATA_PAYLOAD[..], &JOIN_REQUEST[..]] {
        let phy = parse(data).unwrap();
        assert!(phy.validate_mic(&AES128([1; 16])) || phy.is_data_message());
    }
    assert_eq!(GLOBAL.get_sum(), before, "parsing allocated");
}

fn benches_with_allocation_check(c: &mut Criterion) {
    check_parsing_does_not_allocate();
    bench_complete_data_payload_fhdr(c);
    bench_complete_data_payload_mic_validation(c);
    bench_join_request_mic_validation(c);
}

criterion_group!(benches, benches_with_allocation_check);
criterion_main!(benches);
