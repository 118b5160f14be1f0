//! Criterion benchmark over the hot wire paths: posdir packing and state
//! frame encoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mazerat_core::{Direction, RatId};
use mazerat_networking::protocol::{
    encode_state, posdir, PacketHeader, PacketKind, StatePacket, MISSILE_NONE,
};

fn bench_posdir_pack(c: &mut Criterion) {
    c.bench_function("posdir_pack", |b| {
        b.iter(|| posdir::pack(black_box(123), black_box(456), black_box(Direction::East)));
    });
}

fn bench_posdir_unpack(c: &mut Criterion) {
    let word = posdir::pack(123, 456, Direction::East);
    c.bench_function("posdir_unpack", |b| {
        b.iter(|| posdir::unpack(black_box(word)));
    });
}

fn bench_encode_state(c: &mut Criterion) {
    let pkt = StatePacket {
        header: PacketHeader::new(PacketKind::State, RatId::from_raw(42), 7),
        rat_posdir: posdir::pack(3, 4, Direction::North),
        missile_posdir: MISSILE_NONE,
        score: 0,
        timestamp: 123_456,
    };
    c.bench_function("encode_state", |b| {
        b.iter(|| encode_state(black_box(&pkt)));
    });
}

criterion_group!(
    benches,
    bench_posdir_pack,
    bench_posdir_unpack,
    bench_encode_state
);
criterion_main!(benches);
