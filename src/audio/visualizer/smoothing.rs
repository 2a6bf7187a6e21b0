// src/audio/visualizer/smoothing.rs
//! Flat moving-average smoothing of a sample buffer.

/// Replace every sample with the mean of its neighbours within `radius`.
///
/// Windows are clipped at both ends of the buffer, so the first and last
/// outputs average fewer samples instead of reading padding. The result has
/// the same length as the input; `radius == 0` returns the input as floats.
pub fn smooth(buffer: &[u8], radius: usize) -> Vec<f64> {
    let n = buffer.len();

    // prefix[k] = sum of buffer[..k]
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0u64);
    let mut running = 0u64;
    for &b in buffer {
        running += u64::from(b);
        prefix.push(running);
    }

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = i.saturating_add(radius).min(n - 1);
            let sum = prefix[hi + 1] - prefix[lo];
            sum as f64 / (hi - lo + 1) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(buffer: &[u8], radius: usize) -> Vec<f64> {
        let n = buffer.len() as isize;
        let r = radius as isize;
        (0..n)
            .map(|i| {
                let mut sum = 0.0;
                let mut count = 0.0;
                for j in -r..=r {
                    if i + j >= 0 && i + j < n {
                        sum += buffer[(i + j) as usize] as f64;
                        count += 1.0;
                    }
                }
                sum / count
            })
            .collect()
    }

    fn ramp(n: usize) -> Vec<u8> {
        (0..n).map(|i| ((i * 37 + 11) % 256) as u8).collect()
    }

    #[test]
    fn test_preserves_length() {
        for n in [1, 2, 7, 64, 1024] {
            for radius in [0, 1, 20, 5000] {
                assert_eq!(smooth(&ramp(n), radius).len(), n);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(smooth(&[], 20).is_empty());
    }

    #[test]
    fn test_radius_zero_is_identity() {
        let input = ramp(100);
        let out = smooth(&input, 0);
        for (o, &i) in out.iter().zip(&input) {
            assert_eq!(*o, i as f64);
        }
    }

    #[test]
    fn test_uniform_input_stays_uniform() {
        for radius in [0, 3, 20, 1000] {
            let out = smooth(&[77u8; 50], radius);
            assert!(out.iter().all(|&v| v == 77.0));
        }
    }

    #[test]
    fn test_edge_windows_are_clipped() {
        let input = ramp(64);
        let out = smooth(&input, 20);

        let first: f64 = input[..=20].iter().map(|&b| b as f64).sum::<f64>() / 21.0;
        assert!((out[0] - first).abs() < 1e-9);

        let last: f64 = input[43..].iter().map(|&b| b as f64).sum::<f64>() / 21.0;
        assert!((out[63] - last).abs() < 1e-9);
    }

    #[test]
    fn test_matches_direct_window_sum() {
        let input = ramp(300);
        for radius in [1, 20, 149, 150, 400] {
            let fast = smooth(&input, radius);
            let slow = naive(&input, radius);
            for (a, b) in fast.iter().zip(&slow) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_large_radius_converges_to_mean() {
        let input = ramp(32);
        let mean = input.iter().map(|&b| b as f64).sum::<f64>() / 32.0;
        let out = smooth(&input, 32);
        assert!(out.iter().all(|&v| (v - mean).abs() < 1e-9));
    }

    #[test]
    fn test_values_are_not_rounded() {
        let out = smooth(&[0, 1], 1);
        assert_eq!(out, vec![0.5, 0.5]);
    }
}
