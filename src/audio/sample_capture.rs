// src/audio/sample_capture.rs
//! A wrapper source that taps decoded audio into a circular buffer for the waveform.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ringbuf::{traits::*, HeapRb};
use rodio::source::SeekError;
use rodio::Source;

/// Passes samples through unchanged while pushing a mono downmix of every
/// interleaved frame into a shared ring buffer (oldest samples are overwritten).
pub struct SampleCapture<S> {
    source: S,
    buffer: Arc<Mutex<HeapRb<f32>>>,
    /// Sum of the channels seen so far in the current frame
    frame_sum: f32,
    /// Number of channels seen so far in the current frame
    frame_len: u16,
}

impl<S> SampleCapture<S> {
    /// Create a new sample capture wrapper around an existing source.
    pub fn new(source: S, buffer: Arc<Mutex<HeapRb<f32>>>) -> Self {
        Self {
            source,
            buffer,
            frame_sum: 0.0,
            frame_len: 0,
        }
    }
}

impl<S> Iterator for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.source.next()?;

        self.frame_sum += sample;
        self.frame_len += 1;
        if self.frame_len >= self.source.channels().max(1) {
            let mono = self.frame_sum / f32::from(self.frame_len);
            self.frame_sum = 0.0;
            self.frame_len = 0;
            if let Ok(mut buf) = self.buffer.lock() {
                buf.push_overwrite(mono);
            }
        }

        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<S> Source for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        // A seek lands on a frame boundary.
        self.frame_sum = 0.0;
        self.frame_len = 0;
        self.source.try_seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::buffer::SamplesBuffer;

    fn shared(capacity: usize) -> Arc<Mutex<HeapRb<f32>>> {
        Arc::new(Mutex::new(HeapRb::<f32>::new(capacity)))
    }

    #[test]
    fn test_passes_samples_through() {
        let buffer = shared(16);
        let source = SamplesBuffer::new(1, 44100, vec![0.1f32, -0.2, 0.3]);
        let out: Vec<f32> = SampleCapture::new(source, buffer).collect();
        assert_eq!(out, vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn test_downmixes_stereo_frames() {
        let buffer = shared(16);
        let source = SamplesBuffer::new(2, 44100, vec![0.5f32, -0.5, 1.0, 0.0]);
        let passed: Vec<f32> = SampleCapture::new(source, buffer.clone()).collect();
        assert_eq!(passed.len(), 4);

        let buf = buffer.lock().unwrap();
        let captured: Vec<f32> = buf.iter().copied().collect();
        assert_eq!(captured, vec![0.0, 0.5]);
    }

    #[test]
    fn test_overwrites_oldest_when_full() {
        let buffer = shared(2);
        let source = SamplesBuffer::new(1, 44100, vec![0.1f32, 0.2, 0.3]);
        SampleCapture::new(source, buffer.clone()).for_each(drop);

        let buf = buffer.lock().unwrap();
        let captured: Vec<f32> = buf.iter().copied().collect();
        assert_eq!(captured, vec![0.2, 0.3]);
    }
}
