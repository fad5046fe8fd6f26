//! The streaming block loop.

use tracing::{debug, trace};

use crate::deinterleaver::Deinterleaver;
use crate::interleaver::Interleaver;
use crate::io::{AudioSink, AudioSource};
use crate::processor::BlockProcessor;
use crate::quantize::quantize_to_i32;

/// Number of frames transferred per loop iteration.
pub const BLOCK_FRAMES: usize = 512;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error produced by [`pump`].
#[derive(Debug)]
pub enum PumpError {
    /// The source failed mid-stream.
    Source(BoxError),
    /// The sink failed mid-stream or during finalization.
    Sink(BoxError),
}

impl std::fmt::Display for PumpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "source error: {err}"),
            Self::Sink(err) => write!(f, "sink error: {err}"),
        }
    }
}

impl std::error::Error for PumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(err) | Self::Sink(err) => Some(err.as_ref()),
        }
    }
}

/// Summary of a completed [`pump`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Number of blocks transferred, including the final partial block.
    pub blocks: u64,
    /// Number of frames transferred.
    pub frames: u64,
}

/// Stream every block from `source` through `processor` into `sink`.
///
/// Per iteration: read up to [`BLOCK_FRAMES`] frames, split into channel
/// buffers, run the processor, interleave its output, quantize to 32-bit
/// integers, write. A short read ends the stream after its block has been
/// processed and written; the sink is then finalized.
///
/// All buffers are allocated up front, sized from the source's channel
/// count and the processor's channel counts, and reused across iterations.
/// The output adopts the processor's output channel count.
///
/// I/O failures are fatal and never conflated with the end-of-stream
/// signal: only an `Ok` short read terminates the loop cleanly.
pub fn pump<S, P, K>(source: &mut S, processor: &mut P, sink: &mut K) -> Result<PumpStats, PumpError>
where
    S: AudioSource,
    P: BlockProcessor + ?Sized,
    K: AudioSink,
{
    let spec = source.spec();
    processor.init(spec.sample_rate_hz());

    let num_outputs = processor.num_outputs();
    let mut deinterleaver = Deinterleaver::new(
        BLOCK_FRAMES,
        spec.num_channels() as usize,
        processor.num_inputs(),
    );
    let mut interleaver = Interleaver::new(BLOCK_FRAMES, num_outputs, num_outputs);
    let mut quantized = vec![0_i32; BLOCK_FRAMES * num_outputs];

    debug!(
        sample_rate_hz = spec.sample_rate_hz(),
        source_channels = spec.num_channels(),
        processor_inputs = processor.num_inputs(),
        processor_outputs = num_outputs,
        "starting block loop"
    );

    let mut stats = PumpStats::default();
    loop {
        let num_frames = source
            .read_block(deinterleaver.input_mut())
            .map_err(|err| PumpError::Source(Box::new(err)))?;
        deinterleaver.split(num_frames);
        processor.process(
            num_frames,
            deinterleaver.channels(),
            interleaver.channels_mut(),
        );
        interleaver.interleave(num_frames);

        let num_samples = num_frames * num_outputs;
        quantize_to_i32(
            &interleaver.output()[..num_samples],
            &mut quantized[..num_samples],
        );
        sink.write_block(&quantized[..num_samples], num_frames)
            .map_err(|err| PumpError::Sink(Box::new(err)))?;

        stats.blocks += 1;
        stats.frames += num_frames as u64;
        trace!(block = stats.blocks, frames = num_frames, "block done");

        if num_frames < BLOCK_FRAMES {
            break;
        }
    }

    sink.finish()
        .map_err(|err| PumpError::Sink(Box::new(err)))?;
    debug!(blocks = stats.blocks, frames = stats.frames, "stream done");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::effects::{Downmix, Passthrough};
    use crate::stream_spec::StreamSpec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct FailInjected;

    impl std::fmt::Display for FailInjected {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "injected failure")
        }
    }

    impl std::error::Error for FailInjected {}

    /// In-memory source delivering a fixed interleaved sample sequence.
    struct MemSource {
        spec: StreamSpec,
        samples: Vec<f32>,
        position: usize,
        reads: usize,
        fail_on_read: Option<usize>,
    }

    impl MemSource {
        fn new(sample_rate_hz: u32, num_channels: u16, samples: Vec<f32>) -> Self {
            Self {
                spec: StreamSpec::new(sample_rate_hz, num_channels).unwrap(),
                samples,
                position: 0,
                reads: 0,
                fail_on_read: None,
            }
        }
    }

    impl AudioSource for MemSource {
        type Error = FailInjected;

        fn spec(&self) -> StreamSpec {
            self.spec
        }

        fn read_block(&mut self, interleaved: &mut [f32]) -> Result<usize, FailInjected> {
            self.reads += 1;
            if self.fail_on_read == Some(self.reads) {
                return Err(FailInjected);
            }
            let channels = self.spec.num_channels() as usize;
            let available = self.samples.len() - self.position;
            let count = available.min((interleaved.len() / channels) * channels);
            interleaved[..count].copy_from_slice(&self.samples[self.position..self.position + count]);
            self.position += count;
            Ok(count / channels)
        }
    }

    /// In-memory sink collecting everything written to it.
    #[derive(Default)]
    struct MemSink {
        samples: Vec<i32>,
        writes: usize,
        finished: bool,
        fail_on_write: Option<usize>,
    }

    impl AudioSink for MemSink {
        type Error = FailInjected;

        fn write_block(
            &mut self,
            interleaved: &[i32],
            _num_frames: usize,
        ) -> Result<(), FailInjected> {
            assert!(!self.finished, "write after finish");
            self.writes += 1;
            if self.fail_on_write == Some(self.writes) {
                return Err(FailInjected);
            }
            self.samples.extend_from_slice(interleaved);
            Ok(())
        }

        fn finish(&mut self) -> Result<(), FailInjected> {
            assert!(!self.finished, "double finish");
            self.finished = true;
            Ok(())
        }
    }

    /// Processor asserting the frame counts it is handed.
    struct FrameCountRecorder {
        counts: Vec<usize>,
    }

    impl BlockProcessor for FrameCountRecorder {
        fn num_inputs(&self) -> usize {
            1
        }

        fn num_outputs(&self) -> usize {
            1
        }

        fn init(&mut self, _sample_rate_hz: u32) {}

        fn process(&mut self, num_frames: usize, inputs: &[Vec<f32>], outputs: &mut [Vec<f32>]) {
            self.counts.push(num_frames);
            outputs[0][..num_frames].copy_from_slice(&inputs[0][..num_frames]);
        }
    }

    #[test]
    fn terminates_after_short_read() {
        // Exactly 2 full blocks: reads 1 and 2 return BLOCK_FRAMES, read 3
        // returns 0 and ends the loop.
        let mut source = MemSource::new(48_000, 1, vec![0.0; BLOCK_FRAMES * 2]);
        let mut sink = MemSink::default();
        let mut processor = Passthrough::new(1);

        let stats = pump(&mut source, &mut processor, &mut sink).unwrap();
        assert_eq!(source.reads, 3);
        assert_eq!(stats.blocks, 3);
        assert_eq!(stats.frames, BLOCK_FRAMES as u64 * 2);
        assert!(sink.finished);
    }

    #[test]
    fn partial_final_block_is_processed() {
        let frames = BLOCK_FRAMES + 10;
        let mut source = MemSource::new(48_000, 2, vec![0.25; frames * 2]);
        let mut sink = MemSink::default();
        let mut processor = Passthrough::new(2);

        let stats = pump(&mut source, &mut processor, &mut sink).unwrap();
        assert_eq!(source.reads, 2);
        assert_eq!(stats.blocks, 2);
        assert_eq!(stats.frames, frames as u64);
        assert_eq!(sink.samples.len(), frames * 2);
    }

    #[test]
    fn identity_output_matches_quantizer_law() {
        let samples: Vec<f32> = (0..2_000).map(|i| (i as f32 / 1_000.0) - 1.0).collect();
        let mut source = MemSource::new(44_100, 2, samples.clone());
        let mut sink = MemSink::default();
        let mut processor = Passthrough::new(2);

        let stats = pump(&mut source, &mut processor, &mut sink).unwrap();
        assert_eq!(stats.frames, 1_000);

        let mut expected = vec![0_i32; samples.len()];
        quantize_to_i32(&samples, &mut expected);
        assert_eq!(sink.samples, expected);
    }

    #[test]
    fn output_adopts_processor_channel_count() {
        // Stereo in, mono out.
        let frames = 100;
        let mut interleaved = Vec::with_capacity(frames * 2);
        for _ in 0..frames {
            interleaved.push(0.5);
            interleaved.push(-0.5);
        }
        let mut source = MemSource::new(16_000, 2, interleaved);
        let mut sink = MemSink::default();
        let mut processor = Downmix::new(2);

        let stats = pump(&mut source, &mut processor, &mut sink).unwrap();
        assert_eq!(stats.frames, frames as u64);
        assert_eq!(sink.samples.len(), frames);
        assert!(sink.samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn processor_sees_partial_frame_counts() {
        let frames = BLOCK_FRAMES + 7;
        let mut source = MemSource::new(48_000, 1, vec![0.0; frames]);
        let mut sink = MemSink::default();
        let mut processor = FrameCountRecorder { counts: Vec::new() };

        pump(&mut source, &mut processor, &mut sink).unwrap();
        assert_eq!(processor.counts, vec![BLOCK_FRAMES, 7]);
    }

    #[test]
    fn read_failure_is_fatal_and_distinct_from_eof() {
        let mut source = MemSource::new(48_000, 1, vec![0.0; BLOCK_FRAMES * 3]);
        source.fail_on_read = Some(2);
        let mut sink = MemSink::default();
        let mut processor = Passthrough::new(1);

        let err = pump(&mut source, &mut processor, &mut sink).unwrap_err();
        assert!(matches!(err, PumpError::Source(_)));
        assert!(!sink.finished, "sink must not be finalized after a failure");
    }

    #[test]
    fn write_failure_is_fatal() {
        let mut source = MemSource::new(48_000, 1, vec![0.0; BLOCK_FRAMES]);
        let mut sink = MemSink {
            fail_on_write: Some(1),
            ..MemSink::default()
        };
        let mut processor = Passthrough::new(1);

        let err = pump(&mut source, &mut processor, &mut sink).unwrap_err();
        assert!(matches!(err, PumpError::Sink(_)));
    }

    #[test]
    fn empty_source_still_finalizes_the_sink() {
        let mut source = MemSource::new(48_000, 1, Vec::new());
        let mut sink = MemSink::default();
        let mut processor = Passthrough::new(1);

        let stats = pump(&mut source, &mut processor, &mut sink).unwrap();
        assert_eq!(stats, PumpStats { blocks: 1, frames: 0 });
        assert!(sink.finished);
        assert!(sink.samples.is_empty());
    }

    #[test]
    fn works_through_a_trait_object() {
        let mut source = MemSource::new(48_000, 1, vec![0.1; 10]);
        let mut sink = MemSink::default();
        let mut processor: Box<dyn BlockProcessor> = Box::new(Passthrough::new(1));

        let stats = pump(&mut source, processor.as_mut(), &mut sink).unwrap();
        assert_eq!(stats.frames, 10);
    }
}
