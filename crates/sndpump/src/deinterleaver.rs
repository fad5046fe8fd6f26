//! Channel splitter: one interleaved buffer in, per-channel buffers out.

/// Converts an interleaved multi-channel block into separate per-channel
/// buffers.
///
/// The deinterleaver owns both sides of the conversion: the interleaved
/// input buffer (filled by a reader through [`input_mut`](Self::input_mut))
/// and the per-channel output buffers (consumed by a processor through
/// [`channels`](Self::channels)). All buffers are allocated once at
/// construction and reused for every block.
///
/// A processing unit may expect more input channels than the source
/// delivers. The channel set is therefore sized to
/// `max(source_channels, min_channels)`; [`split`](Self::split) only ever
/// writes the first `source_channels` of them, the rest are scratch space
/// for the processor.
#[derive(Debug)]
pub struct Deinterleaver {
    capacity: usize,
    source_channels: usize,
    interleaved: Vec<f32>,
    channels: Vec<Vec<f32>>,
}

impl Deinterleaver {
    /// Create a deinterleaver for blocks of up to `capacity` frames with
    /// `source_channels` interleaved input channels, providing at least
    /// `min_channels` output buffers.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `source_channels` is zero.
    pub fn new(capacity: usize, source_channels: usize, min_channels: usize) -> Self {
        assert!(capacity > 0, "block capacity must be non-zero");
        assert!(source_channels > 0, "source channel count must be non-zero");
        let num_channels = source_channels.max(min_channels);
        Self {
            capacity,
            source_channels,
            interleaved: vec![0.0; capacity * source_channels],
            channels: vec![vec![0.0; capacity]; num_channels],
        }
    }

    /// The block capacity in frames.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of allocated per-channel buffers
    /// (`max(source_channels, min_channels)`).
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Writable handle to the interleaved input buffer
    /// (`capacity × source_channels` samples), for the reader to fill.
    #[inline]
    pub fn input_mut(&mut self) -> &mut [f32] {
        &mut self.interleaved
    }

    /// The per-channel output buffers, each `capacity` frames long.
    #[inline]
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Split the first `num_frames` frames of the interleaved buffer into
    /// the per-channel buffers.
    ///
    /// Channels beyond the source channel count and frames at or beyond
    /// `num_frames` are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `num_frames` exceeds the block capacity.
    pub fn split(&mut self, num_frames: usize) {
        assert!(
            num_frames <= self.capacity,
            "num_frames {num_frames} exceeds block capacity {}",
            self.capacity
        );
        for frame in 0..num_frames {
            for ch in 0..self.source_channels {
                self.channels[ch][frame] = self.interleaved[ch + frame * self.source_channels];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_interleaved_stereo() {
        let mut dei = Deinterleaver::new(3, 2, 2);
        dei.input_mut()
            .copy_from_slice(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
        dei.split(3);
        assert_eq!(dei.channels()[0], vec![1.0, 2.0, 3.0]);
        assert_eq!(dei.channels()[1], vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn allocates_extra_channels_for_wider_processor() {
        // Mono source feeding a four-input processor.
        let mut dei = Deinterleaver::new(4, 1, 4);
        assert_eq!(dei.num_channels(), 4);

        dei.input_mut().copy_from_slice(&[0.1, 0.2, 0.3, 0.4]);
        dei.split(4);
        assert_eq!(dei.channels()[0], vec![0.1, 0.2, 0.3, 0.4]);

        // Channels 1..4 stay untouched across repeated splits.
        for _ in 0..3 {
            dei.split(4);
            for ch in 1..4 {
                assert_eq!(
                    dei.channels()[ch],
                    vec![0.0; 4],
                    "channel {ch} must not be written by split"
                );
            }
        }
    }

    #[test]
    fn narrower_min_channel_count_keeps_source_width() {
        let dei = Deinterleaver::new(8, 4, 2);
        assert_eq!(dei.num_channels(), 4);
    }

    #[test]
    fn partial_split_leaves_trailing_frames() {
        let mut dei = Deinterleaver::new(4, 1, 1);
        dei.input_mut().copy_from_slice(&[9.0; 4]);
        dei.split(4);
        assert_eq!(dei.channels()[0], vec![9.0; 4]);

        dei.input_mut().copy_from_slice(&[5.0; 4]);
        dei.split(2);
        assert_eq!(
            dei.channels()[0],
            vec![5.0, 5.0, 9.0, 9.0],
            "frames beyond num_frames must keep their previous contents"
        );
    }

    #[test]
    fn zero_frames_is_a_no_op() {
        let mut dei = Deinterleaver::new(2, 2, 2);
        dei.input_mut().copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        dei.split(0);
        assert_eq!(dei.channels()[0], vec![0.0, 0.0]);
        assert_eq!(dei.channels()[1], vec![0.0, 0.0]);
    }

    #[test]
    #[should_panic(expected = "exceeds block capacity")]
    fn split_beyond_capacity_panics() {
        let mut dei = Deinterleaver::new(2, 1, 1);
        dei.split(3);
    }
}
