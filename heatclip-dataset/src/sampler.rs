/// Computes which frame indices to extract for a fixed-length,
/// fixed-stride window over a clip of `v_len` frames.
///
/// Long clips (`v_len > n_frames * interval`) get a centered window so
/// sampling is not biased toward the clip start. Shorter clips always
/// start at 0; indices past the end yield no frame and are resolved by
/// zero padding in the assembler, never adjusted here.
pub fn sample_indices(v_len: usize, n_frames: usize, interval: usize) -> Vec<usize> {
    let window = n_frames * interval;
    let start = if v_len > window {
        (v_len - window) / 2
    } else {
        0
    };

    (0..n_frames).map(|step| start + step * interval).collect()
}
