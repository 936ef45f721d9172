use crate::audio::config::ChannelSelector;

/// Fixed-capacity circular store of interleaved stereo samples.
///
/// A single writer (the tap callback) appends blocks at the fill cursor;
/// readers extract windows that end a given distance behind that cursor.
/// Every index is taken modulo the capacity, so no access can go out of
/// bounds regardless of offsets or wraparound.
pub struct RingBuffer {
    samples: Vec<f32>,
    fill_pos: usize,
}

impl RingBuffer {
    /// `capacity` is counted in interleaved samples and must be even so that
    /// left/right lanes stay aligned across the wrap point.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 2 && capacity % 2 == 0);
        Self {
            samples: vec![0.0; capacity],
            fill_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Largest window (in mono samples / stereo frames) a reader may request
    /// without overtaking data the writer is about to replace within one
    /// callback's latency. Callers clamp their window lengths to this.
    pub fn max_window(&self) -> usize {
        self.samples.len() / 2
    }

    /// Append an interleaved block at the cursor, wrapping modulo capacity.
    pub fn write(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.samples[self.fill_pos] = sample;
            self.fill_pos = (self.fill_pos + 1) % self.samples.len();
        }
    }

    /// Extract `out.len()` mono samples ending `offset` interleaved samples
    /// behind the write cursor, applying the channel selector: Left reads
    /// even lanes, Right odd lanes, Mix the running average of both.
    pub fn read_frame(&self, offset: usize, channel: ChannelSelector, out: &mut [f32]) {
        debug_assert!(out.len() <= self.max_window());
        let len = self.samples.len();
        let span = (out.len() * 2 + offset) % len;
        let mut pos = (self.fill_pos + len - span) % len;

        for slot in out.iter_mut() {
            *slot = match channel {
                ChannelSelector::Left => self.samples[pos],
                ChannelSelector::Right => self.samples[(pos + 1) % len],
                ChannelSelector::Mix => (self.samples[pos] + self.samples[(pos + 1) % len]) / 2.0,
            };
            pos = (pos + 2) % len;
        }
    }

    /// Extract matching left/right windows ending `offset` interleaved
    /// samples behind the cursor. Both slices must have the same length.
    pub fn read_stereo(&self, offset: usize, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        debug_assert!(left.len() <= self.max_window());
        let len = self.samples.len();
        let span = (left.len() * 2 + offset) % len;
        let mut pos = (self.fill_pos + len - span) % len;

        for i in 0..left.len() {
            left[i] = self.samples[pos];
            right[i] = self.samples[(pos + 1) % len];
            pos = (pos + 2) % len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Interleaved ramp: frame i carries (2i, 2i + 1)
    fn ramp(frames: usize) -> Vec<f32> {
        (0..frames * 2).map(|i| i as f32).collect()
    }

    #[test]
    fn read_is_index_correct_after_wraparound() {
        let mut ring = RingBuffer::new(16);
        // Write more than the capacity, then read back the freshest half
        let written = ramp(20);
        ring.write(&written);

        let mut left = [0.0; 4];
        let mut right = [0.0; 4];
        ring.read_stereo(0, &mut left, &mut right);

        // The last 4 frames written were 16..=19
        assert_eq!(left, [32.0, 34.0, 36.0, 38.0]);
        assert_eq!(right, [33.0, 35.0, 37.0, 39.0]);
    }

    #[test]
    fn channel_selectors_pick_the_right_lane() {
        let mut ring = RingBuffer::new(16);
        ring.write(&[1.0, -1.0, 3.0, -3.0]);

        let mut out = [0.0; 2];
        ring.read_frame(0, ChannelSelector::Left, &mut out);
        assert_eq!(out, [1.0, 3.0]);

        ring.read_frame(0, ChannelSelector::Right, &mut out);
        assert_eq!(out, [-1.0, -3.0]);

        ring.read_frame(0, ChannelSelector::Mix, &mut out);
        assert_eq!(out, [0.0, 0.0]);
    }

    #[test]
    fn offset_shifts_the_window_backwards() {
        let mut ring = RingBuffer::new(16);
        ring.write(&ramp(8));

        let mut out = [0.0; 2];
        // Offset of one frame (2 interleaved samples) skips the newest frame
        ring.read_frame(2, ChannelSelector::Left, &mut out);
        assert_eq!(out, [10.0, 12.0]);
    }

    #[test]
    fn unwritten_cells_read_as_silence() {
        let ring = RingBuffer::new(16);
        let mut out = [1.0; 4];
        ring.read_frame(0, ChannelSelector::Mix, &mut out);
        assert_eq!(out, [0.0; 4]);
    }
}
