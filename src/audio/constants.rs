/// Audio analysis constants and helper functions
/// Shared by the ring buffer, band aggregation and metering paths

/// Upper bound of the high band and of the configurable band edges (Hz)
pub const NYQUIST_FREQUENCY: f32 = 22050.0;

/// Full-scale sample amplitude in source units
pub const FULL_SCALE: f32 = 32768.0;

/// dB range mapped onto [0, 1] for VU levels and band scores
pub const VU_METER_RANGE: f32 = 80.0;

/// Largest FFT analysis frame in mono samples
pub const MAX_FRAME_LEN: usize = 2048;

/// Ring buffer capacity in interleaved samples. An even multiple of the
/// largest interleaved frame footprint (2 * MAX_FRAME_LEN), so a frame read
/// ending at the write cursor never wraps ambiguously.
pub const RING_CAPACITY: usize = 10 * MAX_FRAME_LEN;

/// Stereo frames scanned for the correlation coefficient
pub const CORRELATION_WINDOW: usize = 1024;

// === HELPER FUNCTIONS ===

/// FFT frame length for the active sample rate.
/// Below 88.2kHz a half-size frame keeps the bin resolution comparable.
pub fn frame_len_for_rate(sample_rate: u32) -> usize {
    if sample_rate < 88_200 {
        MAX_FRAME_LEN / 2
    } else {
        MAX_FRAME_LEN
    }
}

/// Convert a normalized amplitude (1.0 = full scale) to decibels.
/// Zero amplitude yields negative infinity, which the VU mapping clamps.
pub fn db_from_amplitude(amplitude: f32) -> f32 {
    20.0 * amplitude.log10()
}

/// Map a dB value into the VU range: -80dB -> 0.0, 0dB -> 1.0
pub fn db_to_vu_level(db: f32) -> f32 {
    (db.clamp(-VU_METER_RANGE, 0.0) + VU_METER_RANGE) / VU_METER_RANGE
}

/// Convert a stored VU level back to dB (tooltip/readout display)
pub fn vu_level_to_db(level: f32) -> f32 {
    level * VU_METER_RANGE - VU_METER_RANGE
}

/// Timeline length in seconds given tempo and tick resolution
pub fn timeline_seconds(len_ticks: usize, bpm: f64, ticks_per_beat: u32) -> f64 {
    let ticks_per_second = bpm / 60.0 * ticks_per_beat as f64;
    len_ticks as f64 / ticks_per_second
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn half_scale_maps_near_six_db_down() {
        let level = db_to_vu_level(db_from_amplitude(0.5));
        assert_abs_diff_eq!(level, (VU_METER_RANGE - 6.0206) / VU_METER_RANGE, epsilon = 1e-4);
    }

    #[test]
    fn silence_clamps_to_zero() {
        assert_eq!(db_to_vu_level(db_from_amplitude(0.0)), 0.0);
    }

    #[test]
    fn vu_level_roundtrip() {
        for db in [-80.0, -36.5, -6.0, 0.0] {
            assert_abs_diff_eq!(vu_level_to_db(db_to_vu_level(db)), db, epsilon = 1e-4);
        }
    }

    #[test]
    fn frame_len_halves_below_88k2() {
        assert_eq!(frame_len_for_rate(44_100), 1024);
        assert_eq!(frame_len_for_rate(48_000), 1024);
        assert_eq!(frame_len_for_rate(88_200), 2048);
        assert_eq!(frame_len_for_rate(192_000), 2048);
    }

    #[test]
    fn timeline_duration_from_tempo() {
        // 16 ticks at 4 ticks per beat = 4 beats; 120 BPM plays 2 beats per second
        assert_abs_diff_eq!(timeline_seconds(16, 120.0, 4), 2.0, epsilon = 1e-9);
    }
}
