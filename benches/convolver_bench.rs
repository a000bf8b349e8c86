// SPDX-License-Identifier: LGPL-3.0-or-later

//! Criterion benchmarks for impulse-response convolution.

use amp_dsp::ir::{ImpulseResponse, IrData};
use amp_dsp::processor::Processor;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const BUF_SIZE: usize = 256;

/// Generate a deterministic white noise buffer using a simple LCG.
fn white_noise(len: usize) -> Vec<f32> {
    let mut state: u64 = 0xFEED_FACE_0123_4567;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) as i32) as f32 / (i32::MAX as f32)
        })
        .collect()
}

/// An exponentially decaying pseudo-cabinet response.
fn synthetic_ir(len: usize) -> IrData {
    let noise = white_noise(len);
    IrData {
        raw_audio: noise
            .iter()
            .enumerate()
            .map(|(i, &n)| n * (-(i as f32) / (len as f32 / 4.0)).exp())
            .collect(),
        sample_rate: 48000.0,
    }
}

fn bench_convolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("impulse_response");
    let input = white_noise(BUF_SIZE);
    let mono: [&[f32]; 1] = [&input];

    for taps in [512usize, 2048, 8192] {
        group.bench_function(format!("{taps}_taps"), |b| {
            let mut ir = ImpulseResponse::from_data(&synthetic_ir(taps), 48000.0);
            b.iter(|| {
                let out = ir.process(black_box(&mono), BUF_SIZE).unwrap();
                black_box(out[0][0]);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convolver);
criterion_main!(benches);
