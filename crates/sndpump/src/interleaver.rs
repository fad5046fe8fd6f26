//! Channel merger: per-channel buffers in, one interleaved buffer out.

/// Converts separate per-channel buffers into an interleaved multi-channel
/// block. The inverse of [`Deinterleaver`](crate::Deinterleaver).
///
/// The interleaver owns both sides of the conversion: the per-channel input
/// buffers (filled by a processor through
/// [`channels_mut`](Self::channels_mut)) and the interleaved output buffer
/// (consumed by a writer through [`output`](Self::output)). All buffers are
/// allocated once at construction and reused for every block.
///
/// A processing unit may produce more channels than the interleave target
/// consumes. The channel set is sized to
/// `max(min_channels, output_channels)`; [`interleave`](Self::interleave)
/// only ever reads the first `output_channels` of them.
#[derive(Debug)]
pub struct Interleaver {
    capacity: usize,
    output_channels: usize,
    channels: Vec<Vec<f32>>,
    interleaved: Vec<f32>,
}

impl Interleaver {
    /// Create an interleaver for blocks of up to `capacity` frames,
    /// providing at least `min_channels` input buffers and producing
    /// `output_channels` interleaved output channels.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `output_channels` is zero.
    pub fn new(capacity: usize, min_channels: usize, output_channels: usize) -> Self {
        assert!(capacity > 0, "block capacity must be non-zero");
        assert!(output_channels > 0, "output channel count must be non-zero");
        let num_channels = min_channels.max(output_channels);
        Self {
            capacity,
            output_channels,
            channels: vec![vec![0.0; capacity]; num_channels],
            interleaved: vec![0.0; capacity * output_channels],
        }
    }

    /// The block capacity in frames.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of allocated per-channel buffers
    /// (`max(min_channels, output_channels)`).
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// The number of channels in the interleaved output.
    #[inline]
    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    /// Writable handles to the per-channel input buffers, each `capacity`
    /// frames long, for the processor to fill.
    #[inline]
    pub fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    /// Readable handle to the interleaved output buffer
    /// (`capacity × output_channels` samples).
    #[inline]
    pub fn output(&self) -> &[f32] {
        &self.interleaved
    }

    /// Interleave the first `num_frames` frames of the per-channel buffers
    /// into the output buffer.
    ///
    /// Channels beyond the output channel count are never read; samples at
    /// or beyond frame `num_frames` of the output are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `num_frames` exceeds the block capacity.
    pub fn interleave(&mut self, num_frames: usize) {
        assert!(
            num_frames <= self.capacity,
            "num_frames {num_frames} exceeds block capacity {}",
            self.capacity
        );
        for frame in 0..num_frames {
            for ch in 0..self.output_channels {
                self.interleaved[ch + frame * self.output_channels] = self.channels[ch][frame];
            }
        }
    }
}
