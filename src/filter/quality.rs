use std::sync::LazyLock;

/// Error probability for every Phred score in `0..100`.
static ERROR_PROBABILITIES: LazyLock<[f64; 100]> = LazyLock::new(|| {
    let mut table = [0.0; 100];
    for (q, p) in table.iter_mut().enumerate() {
        *p = 10f64.powf(-0.1 * q as f64);
    }
    table
});

/// Returns the Phred score whose error probability equals the mean error
/// probability of `scores`. An empty slice scores `0.0`.
///
/// # Panics
///
/// Panics if a score is 100 or above; FASTQ decoding never produces one.
pub fn mean_qscore(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }

    let sum_prob: f64 = scores
        .iter()
        .map(|&q| ERROR_PROBABILITIES[q as usize])
        .sum();
    let mean_prob = sum_prob / scores.len() as f64;
    -10.0 * mean_prob.log10()
}
