/// Window functions for FFT spectral analysis
///
/// Windowing tapers the edges of an analysis frame before the FFT so that
/// the frame's boundary discontinuity does not smear energy across bins.
/// The nine selectable kinds mirror the host's window parameter, index 0
/// being "no window at all".
use core::f32::consts::PI;
use libm::cosf;

/// Window kinds selectable for FFT analysis, in host parameter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowKind {
    /// No windowing; the frame is transformed as-is
    #[default]
    None,
    Hanning,
    Hamming,
    Blackman,
    BlackmanExact,
    BlackmanHarris,
    FlatTop,
    Bartlett,
    Cosine,
}

impl WindowKind {
    /// Every kind, in parameter order. Indexable by `kind as usize`.
    pub const ALL: [WindowKind; 9] = [
        WindowKind::None,
        WindowKind::Hanning,
        WindowKind::Hamming,
        WindowKind::Blackman,
        WindowKind::BlackmanExact,
        WindowKind::BlackmanHarris,
        WindowKind::FlatTop,
        WindowKind::Bartlett,
        WindowKind::Cosine,
    ];

    /// Generate coefficients for this window kind.
    ///
    /// All kinds use the symmetric convention w[i] = f(i / (N-1)), so the
    /// first and last coefficients of the tapered kinds reach (near) zero.
    /// Deterministic, pure function of kind and length.
    pub fn generate(self, len: usize) -> Vec<f32> {
        if len < 2 {
            return vec![1.0; len];
        }
        match self {
            Self::None => vec![1.0; len],
            Self::Hanning => cosine_sum(len, &[0.5, 0.5]),
            Self::Hamming => cosine_sum(len, &[0.54, 0.46]),
            Self::Blackman => cosine_sum(len, &[0.42, 0.5, 0.08]),
            Self::BlackmanExact => cosine_sum(len, &[0.426_590_71, 0.496_560_62, 0.076_848_67]),
            Self::BlackmanHarris => cosine_sum(len, &[0.35875, 0.48829, 0.14128, 0.01168]),
            Self::FlatTop => cosine_sum(
                len,
                &[0.215_578_95, 0.416_631_58, 0.277_263_158, 0.083_578_947, 0.006_947_368],
            ),
            Self::Bartlett => bartlett(len),
            Self::Cosine => cosine(len),
        }
    }
}

/// Generalized cosine-sum window: w[i] = a0 - a1*cos(2πx) + a2*cos(4πx) - ...
/// with x = i/(N-1). Covers the Hanning through FlatTop families.
fn cosine_sum(len: usize, coefficients: &[f32]) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let x = i as f32 / (len - 1) as f32;
            coefficients
                .iter()
                .enumerate()
                .map(|(order, &a)| {
                    let sign = if order % 2 == 0 { 1.0 } else { -1.0 };
                    sign * a * cosf(2.0 * PI * order as f32 * x)
                })
                .sum::<f32>()
        })
        .collect()
}

/// Triangular window: w[i] = 1 - |2x - 1|, zero at both ends, unity mid-frame
fn bartlett(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let x = i as f32 / (len - 1) as f32;
            1.0 - (2.0 * x - 1.0).abs()
        })
        .collect()
}

/// Half-cycle sine window: w[i] = sin(πx)
fn cosine(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let x = i as f32 / (len - 1) as f32;
            // sin(πx) written as a cosine to keep the libm call uniform
            cosf(PI * (x - 0.5))
        })
        .collect()
}

/// Multiply a frame elementwise by precomputed window coefficients.
pub fn apply_in_place(coefficients: &[f32], frame: &mut [f32]) {
    for (sample, &coefficient) in frame.iter_mut().zip(coefficients.iter()) {
        *sample *= coefficient;
    }
}

/// All nine coefficient sets precomputed for one frame length.
///
/// Window generation involves per-sample trig, so the bank is built once at
/// attach time and a window-kind change between ticks costs nothing on the
/// tap path.
pub struct WindowBank {
    coefficients: [Vec<f32>; 9],
}

impl WindowBank {
    pub fn new(frame_len: usize) -> Self {
        Self {
            coefficients: WindowKind::ALL.map(|kind| kind.generate(frame_len)),
        }
    }

    /// Window `frame` in place; `WindowKind::None` leaves it untouched.
    pub fn apply(&self, kind: WindowKind, frame: &mut [f32]) {
        if kind == WindowKind::None {
            return;
        }
        apply_in_place(&self.coefficients[kind as usize], frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn hanning_matches_reference_implementation() {
        let ours = WindowKind::Hanning.generate(64);
        for (a, b) in ours.iter().zip(apodize::hanning_iter(64)) {
            assert_abs_diff_eq!(*a, b as f32, epsilon = 1e-5);
        }
    }

    #[test]
    fn tapered_windows_vanish_at_the_edges() {
        for kind in [
            WindowKind::Hanning,
            WindowKind::Blackman,
            WindowKind::BlackmanHarris,
            WindowKind::Bartlett,
            WindowKind::Cosine,
        ] {
            let w = kind.generate(128);
            assert!(w[0].abs() < 1e-4, "{kind:?} start = {}", w[0]);
            assert!(w[127].abs() < 1e-4, "{kind:?} end = {}", w[127]);
        }
    }

    #[test]
    fn windows_are_symmetric() {
        for kind in WindowKind::ALL {
            let w = kind.generate(101);
            for i in 0..w.len() / 2 {
                assert_abs_diff_eq!(w[i], w[w.len() - 1 - i], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn flat_top_peaks_at_unity() {
        // The coefficient sum is 1 by construction; the mid-frame sample hits it
        let w = WindowKind::FlatTop.generate(101);
        assert_abs_diff_eq!(w[50], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn none_is_the_identity() {
        let bank = WindowBank::new(16);
        let mut frame: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let original = frame.clone();
        bank.apply(WindowKind::None, &mut frame);
        assert_eq!(frame, original);
    }

    #[test]
    fn bank_matches_direct_generation() {
        let bank = WindowBank::new(32);
        let mut frame = vec![1.0f32; 32];
        bank.apply(WindowKind::Hamming, &mut frame);
        let expected = WindowKind::Hamming.generate(32);
        for (got, want) in frame.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(got, want, epsilon = 1e-6);
        }
    }

    #[test]
    fn degenerate_lengths_do_not_panic() {
        for kind in WindowKind::ALL {
            assert_eq!(kind.generate(0).len(), 0);
            assert_eq!(kind.generate(1), vec![1.0]);
        }
    }
}
