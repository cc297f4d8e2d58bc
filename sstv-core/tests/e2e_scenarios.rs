//! End-to-end decode scenarios (spec §8 "End-to-end scenarios").

use sstv_core::modes::ms_to_samples;
use sstv_core::{Decoder, DecoderOptions, Mode, NoopObserver};

const PUSH_BLOCK: usize = 2048;

/// Appends `duration_ms` of a pure tone at `freq_hz`, threading phase
/// continuously across calls so segment boundaries don't glitch the
/// baseband filter.
fn push_tone(out: &mut Vec<f32>, phase: &mut f64, freq_hz: f64, duration_ms: f64, fs: f64) {
    let n = ms_to_samples(duration_ms, fs);
    let step = std::f64::consts::TAU * freq_hz / fs;
    for _ in 0..n {
        out.push(phase.sin() as f32);
        *phase += step;
    }
}

fn run(decoder: &mut Decoder<NoopObserver>, samples: &[f32]) {
    for block in samples.chunks(PUSH_BLOCK) {
        decoder.push_samples(block);
    }
}

/// Idle-tone lead-in so the sync detector's SMA/Schmitt state is warm
/// (settled above the pulse threshold) before the first real sync dwell,
/// matching the settle pattern `sync.rs`'s own tests rely on.
fn push_settle(out: &mut Vec<f32>, phase: &mut f64, fs: f64) {
    push_tone(out, phase, 1900.0, 20.0, fs);
}

#[test]
fn scenario_1_silent_input_robot36() {
    let fs = 44_100.0;
    let mut decoder = Decoder::new(fs, Mode::Robot36, DecoderOptions::default(), NoopObserver).unwrap();
    decoder.start();
    run(&mut decoder, &vec![0.0f32; fs as usize]);

    let snap = decoder.snapshot();
    assert_eq!(snap.current_line, 0);
    assert!(decoder.pixel_buffer().chunks(4).all(|p| p == [0, 0, 0, 255]));
    assert!(snap.signal_strength_pct < 1.0);
}

#[test]
fn scenario_2_single_even_robot36_line_is_buffered() {
    let fs = 44_100.0;
    let spec = Mode::Robot36.spec();
    let mut decoder = Decoder::new(fs, Mode::Robot36, DecoderOptions::default(), NoopObserver).unwrap();
    decoder.start();

    let mut samples = Vec::new();
    let mut phase = 0.0;
    push_settle(&mut samples, &mut phase, fs);
    push_tone(&mut samples, &mut phase, 1200.0, spec.sync_ms, fs);
    push_tone(&mut samples, &mut phase, 1500.0, spec.porch_ms, fs);
    push_tone(&mut samples, &mut phase, 1500.0, spec.channel_scan_ms[0], fs);
    push_tone(&mut samples, &mut phase, 1500.0, spec.separators_ms[0], fs); // even separator (normalized ~ -1)
    push_tone(&mut samples, &mut phase, 1500.0, spec.separators_ms[1], fs);
    push_tone(&mut samples, &mut phase, 1500.0, spec.channel_scan_ms[1], fs);
    push_tone(&mut samples, &mut phase, 1200.0, spec.sync_ms, fs);
    push_tone(&mut samples, &mut phase, 1500.0, 10.0, fs); // settle past the closing sync

    run(&mut decoder, &samples);

    let snap = decoder.snapshot();
    assert_eq!(snap.current_line, 0);
}

#[test]
fn scenario_3_two_robot36_lines_white_fill_two_rows() {
    let fs = 44_100.0;
    let spec = Mode::Robot36.spec();
    let mut decoder = Decoder::new(fs, Mode::Robot36, DecoderOptions::default(), NoopObserver).unwrap();
    decoder.start();

    let mut samples = Vec::new();
    let mut phase = 0.0;
    push_settle(&mut samples, &mut phase, fs);
    let mut push_line = |samples: &mut Vec<f32>, sep_hz: f64| {
        push_tone(samples, &mut phase, 1200.0, spec.sync_ms, fs);
        push_tone(samples, &mut phase, 1500.0, spec.porch_ms, fs);
        push_tone(samples, &mut phase, 2300.0, spec.channel_scan_ms[0], fs);
        push_tone(samples, &mut phase, sep_hz, spec.separators_ms[0], fs);
        push_tone(samples, &mut phase, 1500.0, spec.separators_ms[1], fs);
        push_tone(samples, &mut phase, 1500.0, spec.channel_scan_ms[1], fs);
    };
    push_line(&mut samples, 1500.0); // even separator (normalized ~ -1)
    push_line(&mut samples, 2300.0); // odd separator (normalized ~ +1)
    push_tone(&mut samples, &mut phase, 1200.0, spec.sync_ms, fs); // closing sync
    push_tone(&mut samples, &mut phase, 1500.0, 10.0, fs);

    run(&mut decoder, &samples);

    let snap = decoder.snapshot();
    assert_eq!(snap.current_line, 2);
    let pixels = decoder.pixel_buffer();
    let row_bytes = spec.width_px * 4;
    for px in pixels[..row_bytes * 2].chunks(4) {
        assert!(px[0] > 200 && px[1] > 200 && px[2] > 200, "expected near-white, got {:?}", px);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn scenario_4_pd120_one_line_black_then_white() {
    let fs = 48_000.0;
    let spec = Mode::Pd120.spec();
    let mut decoder = Decoder::new(fs, Mode::Pd120, DecoderOptions::default(), NoopObserver).unwrap();
    decoder.start();

    let mut samples = Vec::new();
    let mut phase = 0.0;
    push_settle(&mut samples, &mut phase, fs);
    push_tone(&mut samples, &mut phase, 1200.0, spec.sync_ms, fs);
    push_tone(&mut samples, &mut phase, 1500.0, spec.porch_ms, fs);
    push_tone(&mut samples, &mut phase, 1500.0, spec.channel_scan_ms[0], fs); // Y_even = black
    push_tone(&mut samples, &mut phase, 1900.0, spec.channel_scan_ms[1], fs); // V_avg = centre
    push_tone(&mut samples, &mut phase, 1900.0, spec.channel_scan_ms[2], fs); // U_avg = centre
    push_tone(&mut samples, &mut phase, 2300.0, spec.channel_scan_ms[3], fs); // Y_odd = white
    push_tone(&mut samples, &mut phase, 1200.0, spec.sync_ms, fs);
    push_tone(&mut samples, &mut phase, 1500.0, 10.0, fs);

    run(&mut decoder, &samples);

    let snap = decoder.snapshot();
    assert_eq!(snap.current_line, 2);
    let pixels = decoder.pixel_buffer();
    let row_bytes = spec.width_px * 4;
    let row0 = &pixels[..row_bytes];
    let row1 = &pixels[row_bytes..row_bytes * 2];
    assert!(row0.chunks(4).all(|p| p[0] < 20 && p[1] < 20 && p[2] < 20), "row0 should be near-black");
    assert!(row1.chunks(4).all(|p| p[0] > 230 && p[1] > 230 && p[2] > 230), "row1 should be near-white");
}

#[test]
fn scenario_5_two_syncs_within_debounce_window_collapse() {
    let fs = 48_000.0;
    let mut decoder = Decoder::new(fs, Mode::Robot36, DecoderOptions::default(), NoopObserver).unwrap();
    decoder.start();

    let mut samples = Vec::new();
    let mut phase = 0.0;
    push_settle(&mut samples, &mut phase, fs);
    push_tone(&mut samples, &mut phase, 1200.0, 9.0, fs);
    push_tone(&mut samples, &mut phase, 1500.0, 50.0, fs);
    push_tone(&mut samples, &mut phase, 1200.0, 9.0, fs);
    push_tone(&mut samples, &mut phase, 1500.0, 10.0, fs);

    run(&mut decoder, &samples);

    let snap = decoder.snapshot();
    assert_eq!(snap.current_line, 0);
}

#[test]
fn scenario_6_scottie_first_line_handoff() {
    let fs = 48_000.0;
    let spec = Mode::ScottieS1.spec();
    let mut decoder = Decoder::new(fs, Mode::ScottieS1, DecoderOptions::default(), NoopObserver).unwrap();
    decoder.start();

    let mut samples = Vec::new();
    let mut phase = 0.0;
    push_settle(&mut samples, &mut phase, fs);
    // One full sync-to-sync window: porch, red (forward-anchored), sep,
    // green, sep, blue (both anchored backward from the closing sync).
    push_tone(&mut samples, &mut phase, 1200.0, spec.sync_ms, fs);
    push_tone(&mut samples, &mut phase, 2300.0, spec.porch_ms, fs);
    push_tone(&mut samples, &mut phase, 2300.0, spec.channel_scan_ms[0], fs);
    push_tone(&mut samples, &mut phase, 1500.0, spec.separators_ms[0], fs);
    push_tone(&mut samples, &mut phase, 2300.0, spec.channel_scan_ms[1], fs);
    push_tone(&mut samples, &mut phase, 1500.0, spec.separators_ms[1], fs);
    push_tone(&mut samples, &mut phase, 2300.0, spec.channel_scan_ms[2], fs);
    push_tone(&mut samples, &mut phase, 1200.0, spec.sync_ms, fs);
    push_tone(&mut samples, &mut phase, 2300.0, 10.0, fs);

    run(&mut decoder, &samples);

    let snap = decoder.snapshot();
    assert_eq!(snap.current_line, 1);
}
