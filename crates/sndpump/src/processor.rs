//! The processing-unit seam between the splitter and the merger.

/// A per-block signal transform with fixed channel counts.
///
/// The transcoding loop treats the processor as a black box: it sizes its
/// buffers from [`num_inputs`](Self::num_inputs) and
/// [`num_outputs`](Self::num_outputs), calls [`init`](Self::init) once with
/// the stream's sample rate, and then invokes
/// [`process`](Self::process) for every block.
///
/// Implementations must tolerate any `num_frames` from zero up to the block
/// capacity — the final block of a stream is usually partial — and must not
/// allocate per call. `inputs` may contain more channel buffers than
/// `num_inputs` (extra scratch channels from the splitter); only the first
/// `num_inputs` carry source data. Symmetrically, only the first
/// `num_outputs` buffers of `outputs` are interleaved into the result.
pub trait BlockProcessor {
    /// Number of input channels consumed, fixed after construction.
    fn num_inputs(&self) -> usize;

    /// Number of output channels produced, fixed after construction.
    fn num_outputs(&self) -> usize;

    /// One-time, sample-rate-dependent setup. Called before the first
    /// block.
    fn init(&mut self, sample_rate_hz: u32);

    /// Transform `num_frames` frames from `inputs` into `outputs`.
    fn process(&mut self, num_frames: usize, inputs: &[Vec<f32>], outputs: &mut [Vec<f32>]);
}
