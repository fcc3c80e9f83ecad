use criterion::{criterion_group, criterion_main, Criterion};
use woodpusher::perft::perft;
use woodpusher::position::Position;

fn movegen_benches(c: &mut Criterion) {
    c.bench_function("legal moves, initial position", |b| {
        let position = Position::initial();
        b.iter(|| position.legal_moves())
    });

    c.bench_function("legal moves, middlegame", |b| {
        let position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        b.iter(|| position.legal_moves())
    });

    c.bench_function("perft 3, initial position", |b| {
        let mut position = Position::initial();
        b.iter(|| perft(&mut position, 3))
    });
}

criterion_group!(benches, movegen_benches);
criterion_main!(benches);
