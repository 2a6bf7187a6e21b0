// src/audio/analyser.rs
//! Time-domain sampler over the capture ring buffer.

use std::sync::{Arc, Mutex};

use ringbuf::{traits::*, HeapRb};

/// Byte value of a silent sample.
pub const SILENCE: u8 = 128;

/// One frame of unsigned 8-bit amplitudes centered at [`SILENCE`].
pub type SampleBuffer = Vec<u8>;

/// Reads the most recent audio as fixed-size byte buffers.
///
/// Every call looks at the newest `fft_size` captured samples and returns the
/// first half of that window, so a buffer always holds `fft_size / 2` values.
#[derive(Clone)]
pub struct Analyser {
    buffer: Arc<Mutex<HeapRb<f32>>>,
    fft_size: usize,
}

impl Analyser {
    pub fn new(buffer: Arc<Mutex<HeapRb<f32>>>, fft_size: usize) -> Self {
        Self { buffer, fft_size }
    }

    /// Number of samples in every buffer returned by [`Analyser::sample`].
    pub fn len(&self) -> usize {
        self.fft_size / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Copy the current window without consuming it. Missing history is
    /// filled with silence at the front of the window.
    pub fn sample(&self) -> SampleBuffer {
        let mut window = vec![SILENCE; self.fft_size];

        if let Ok(buf) = self.buffer.lock() {
            let occupied = buf.occupied_len();
            let available = occupied.min(self.fft_size);
            let skip = occupied - available;
            let offset = self.fft_size - available;

            for (slot, &sample) in window[offset..].iter_mut().zip(buf.iter().skip(skip)) {
                *slot = to_byte(sample);
            }
        }

        window.truncate(self.len());
        window
    }
}

/// Map a sample in [-1, 1] onto [0, 255] with 128 as silence.
fn to_byte(sample: f32) -> u8 {
    (128.0 * (1.0 + sample)).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyser_with(samples: &[f32], capacity: usize, fft_size: usize) -> Analyser {
        let mut rb = HeapRb::<f32>::new(capacity);
        for &s in samples {
            rb.push_overwrite(s);
        }
        Analyser::new(Arc::new(Mutex::new(rb)), fft_size)
    }

    #[test]
    fn test_byte_conversion() {
        assert_eq!(to_byte(0.0), 128);
        assert_eq!(to_byte(-1.0), 0);
        assert_eq!(to_byte(1.0), 255);
        assert_eq!(to_byte(0.5), 192);
        assert_eq!(to_byte(-0.5), 64);
        assert_eq!(to_byte(3.0), 255);
    }

    #[test]
    fn test_empty_capture_is_silent() {
        let analyser = analyser_with(&[], 64, 32);
        let buffer = analyser.sample();
        assert_eq!(buffer.len(), 16);
        assert!(buffer.iter().all(|&b| b == SILENCE));
    }

    #[test]
    fn test_takes_first_half_of_newest_window() {
        // 40 samples captured, window of 8: the newest 8 are indices 32..40.
        let samples: Vec<f32> = (0..40).map(|i| if i >= 32 { 0.5 } else { -0.5 }).collect();
        let analyser = analyser_with(&samples, 64, 8);
        assert_eq!(analyser.sample(), vec![192; 4]);
    }

    #[test]
    fn test_short_history_is_padded_at_front() {
        let analyser = analyser_with(&[1.0, 1.0], 64, 8);
        // Window: [128 x 6, 255, 255]; the first half is all padding.
        assert_eq!(analyser.sample(), vec![SILENCE; 4]);

        let analyser = analyser_with(&[1.0; 6], 64, 8);
        assert_eq!(analyser.sample(), vec![SILENCE, SILENCE, 255, 255]);
    }

    #[test]
    fn test_sampling_does_not_consume() {
        let analyser = analyser_with(&[0.5; 16], 64, 8);
        let first = analyser.sample();
        let second = analyser.sample();
        assert_eq!(first, second);
    }
}
