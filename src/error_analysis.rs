// error_analysis.rs - Statistical errors for correlated Monte Carlo series

/// Contiguous blocks used by the jackknife.
pub const JACKKNIFE_BLOCKS: usize = 20;

/// Error analysis of one equilibrium time series
pub struct ErrorAnalysis {
    n: usize,
    mean: f64,
    variance: f64,
    /// Integrated autocorrelation time
    tau_int: f64,
    /// Effective sample size
    n_eff: f64,
    /// Statistical error (from autocorrelation)
    stat_error: f64,
    /// Blocked jackknife error estimate
    jack_error: f64,
}

impl ErrorAnalysis {
    /// Create error analysis from time series data
    pub fn new(data: &[f64]) -> Self {
        let n = data.len();
        if n == 0 {
            return Self {
                n,
                mean: 0.0,
                variance: 0.0,
                tau_int: 0.5,
                n_eff: 0.0,
                stat_error: 0.0,
                jack_error: 0.0,
            };
        }

        let mean = data.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        let tau_int = Self::integrated_autocorr_time(data, mean);
        let n_eff = n as f64 / (2.0 * tau_int);
        let stat_error = if n_eff > 0.0 { (variance / n_eff).sqrt() } else { 0.0 };
        let jack_error = Self::blocked_jackknife_error(data, JACKKNIFE_BLOCKS);

        Self { n, mean, variance, tau_int, n_eff, stat_error, jack_error }
    }

    /// Integrated autocorrelation time using automatic windowing (Sokal 1989)
    fn integrated_autocorr_time(data: &[f64], mean: f64) -> f64 {
        let n = data.len();
        if n < 10 {
            return 0.5;
        }

        let c0 = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        if c0 == 0.0 {
            return 0.5;
        }

        let mut tau_sum = 0.5;
        for t in 1..n / 4 {
            let ct = data
                .iter()
                .zip(&data[t..])
                .map(|(&a, &b)| (a - mean) * (b - mean))
                .sum::<f64>()
                / (n - t) as f64;

            tau_sum += ct / c0;

            if t as f64 >= 6.0 * tau_sum {
                break;
            }
        }

        tau_sum.max(0.5)
    }

    /// Jackknife error of the mean with `n_blocks` leave-one-block-out samples.
    fn blocked_jackknife_error(data: &[f64], n_blocks: usize) -> f64 {
        let n_blocks = n_blocks.min(data.len());
        if n_blocks < 2 {
            return 0.0;
        }

        let block_len = data.len() / n_blocks;
        let used = &data[..block_len * n_blocks];
        let total: f64 = used.iter().sum();

        let estimates: Vec<f64> = used
            .chunks_exact(block_len)
            .map(|block| (total - block.iter().sum::<f64>()) / (used.len() - block_len) as f64)
            .collect();

        let k = n_blocks as f64;
        let jack_mean = estimates.iter().sum::<f64>() / k;
        let jack_var = estimates.iter().map(|&x| (x - jack_mean).powi(2)).sum::<f64>() * (k - 1.0) / k;

        jack_var.sqrt()
    }

    pub fn errors(&self) -> ErrorEstimates {
        ErrorEstimates {
            tau_int: self.tau_int,
            n_eff: self.n_eff,
            stat_error: self.stat_error,
            jack_error: self.jack_error,
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n − 1 denominator)
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// At least 50 effective samples.
    pub fn is_reliable(&self) -> bool {
        self.n_eff >= 50.0
    }
}

/// Container for different error estimates
#[derive(Debug, Clone, Copy)]
pub struct ErrorEstimates {
    pub tau_int: f64,
    pub n_eff: f64,
    pub stat_error: f64,
    pub jack_error: f64,
}
