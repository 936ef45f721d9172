use realfft::{num_complex::Complex32, FftError, RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Computes a single-sided power spectral density in dB from a windowed
/// real-valued analysis frame.
///
/// The FFT plan and all buffers are allocated once for a fixed frame length,
/// so per-tick processing never allocates.
///
/// Scaling follows the single-sided convention: the DC bin is divided by N,
/// every other bin by N/2 to fold the negative-frequency energy back in.
/// dB conversion is 20*log10(amplitude) with no floor: a zero-magnitude bin
/// comes out as negative infinity by design, and band aggregation substitutes
/// those before anything reaches a result table.
pub struct SpectralTransform {
    fft: Arc<dyn RealToComplex<f32>>,
    frame_len: usize,
    /// Copy of the input frame; realfft scrambles its input in place
    time_buffer: Vec<f32>,
    /// Complex FFT output, N/2 + 1 bins
    freq_buffer: Vec<Complex32>,
    /// dB power spectrum, N/2 bins (the Nyquist bin is dropped)
    power: Vec<f32>,
}

impl SpectralTransform {
    pub fn new(frame_len: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_len);

        Self {
            fft,
            frame_len,
            time_buffer: vec![0.0; frame_len],
            freq_buffer: vec![Complex32::new(0.0, 0.0); frame_len / 2 + 1],
            power: vec![0.0; frame_len / 2],
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Power spectrum of `frame` in dB; `frame` must be exactly `frame_len`
    /// samples and the result is `frame_len / 2` bins.
    pub fn power_spectrum(&mut self, frame: &[f32]) -> Result<&[f32], FftError> {
        debug_assert_eq!(frame.len(), self.frame_len);
        self.time_buffer.copy_from_slice(frame);
        self.fft.process(&mut self.time_buffer, &mut self.freq_buffer)?;

        for (bin, out) in self.power.iter_mut().enumerate() {
            let magnitude = self.freq_buffer[bin].norm();
            // DC has no negative-frequency twin, so no factor of 2
            let scaling = if bin == 0 { 1.0 } else { 2.0 } / self.frame_len as f32;
            let amplitude = magnitude * scaling;
            *out = 20.0 * amplitude.log10();
        }

        Ok(&self.power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::TAU;

    const FRAME_LEN: usize = 1024;

    fn bin_centered_sine(bin: usize, amplitude: f32) -> Vec<f32> {
        (0..FRAME_LEN)
            .map(|i| amplitude * (TAU * bin as f32 * i as f32 / FRAME_LEN as f32).sin())
            .collect()
    }

    #[test]
    fn spectrum_has_half_frame_length() {
        let mut transform = SpectralTransform::new(FRAME_LEN);
        let frame = vec![0.0; FRAME_LEN];
        assert_eq!(transform.power_spectrum(&frame).unwrap().len(), FRAME_LEN / 2);
    }

    #[test]
    fn sine_peaks_at_its_bin_with_its_amplitude_in_db() {
        let mut transform = SpectralTransform::new(FRAME_LEN);
        let frame = bin_centered_sine(8, 1000.0);
        let power = transform.power_spectrum(&frame).unwrap();

        // Single-sided scaling recovers the sine amplitude: 20*log10(1000) = 60 dB
        assert!((power[8] - 60.0).abs() < 0.1, "peak bin = {} dB", power[8]);
        // A bin-centered sine leaks (numerically) nothing into distant bins
        assert!(power[100] < 0.0, "distant bin = {} dB", power[100]);
        assert!(power[8] - power[100] > 50.0);
    }

    #[test]
    fn silence_yields_negative_infinity_bins() {
        let mut transform = SpectralTransform::new(FRAME_LEN);
        let frame = vec![0.0; FRAME_LEN];
        let power = transform.power_spectrum(&frame).unwrap();
        assert!(power.iter().all(|db| db.is_infinite() && *db < 0.0));
    }

    #[test]
    fn dc_offset_lands_in_the_dc_bin_unscaled() {
        let mut transform = SpectralTransform::new(FRAME_LEN);
        let frame = vec![2.0; FRAME_LEN];
        let power = transform.power_spectrum(&frame).unwrap();
        // Constant 2.0 -> |X[0]| = 2*N, amplitude = 2.0 -> ~6.02 dB
        assert!((power[0] - 6.0206).abs() < 0.01, "dc bin = {} dB", power[0]);
    }
}
