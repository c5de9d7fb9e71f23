use std::cmp::Ordering;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Row indices of the `n` largest present values, largest first.
/// Ties keep the earlier row first; missing values never rank.
pub fn nlargest(values: &[Option<f64>], n: usize) -> Vec<usize> {
    ranked(values, n, |a, b| b.total_cmp(a))
}

/// Row indices of the `n` smallest present values, smallest first.
pub fn nsmallest(values: &[Option<f64>], n: usize) -> Vec<usize> {
    ranked(values, n, |a, b| a.total_cmp(b))
}

fn ranked(values: &[Option<f64>], n: usize, order: impl Fn(&f64, &f64) -> Ordering) -> Vec<usize> {
    let mut present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    // Stable sort keeps row order among equal values.
    present.sort_by(|(_, a), (_, b)| order(a, b));
    present.into_iter().take(n).map(|(i, _)| i).collect()
}

// ---------------------------------------------------------------------------
// Moments
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Percentile `p` in `[0, 100]` with linear interpolation between ranks.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation over the rows where both values are present.
///
/// `NaN` when fewer than two such rows exist or either side is constant.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();
    if xs.len() < 2 {
        return f64::NAN;
    }
    let (Some(mx), Some(my)) = (mean(&xs), mean(&ys)) else {
        return f64::NAN;
    };
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx == 0.0 || vy == 0.0 {
        return f64::NAN;
    }
    (cov / (vx * vy).sqrt()).clamp(-1.0, 1.0)
}

/// Square, symmetric correlation matrix between numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major, `values[i][j]` is the correlation of `labels[i]` with `labels[j]`.
    pub values: Vec<Vec<f64>>,
}

/// Pairwise-complete Pearson correlation of every numeric column.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let numeric = dataset.numeric_columns();
    let labels: Vec<String> = numeric.iter().map(|c| c.name.clone()).collect();
    let series: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| c.numbers()).collect();

    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix { labels, values }
}

// ---------------------------------------------------------------------------
// Missing-value handling
// ---------------------------------------------------------------------------

/// Keep only the rows where every series has a value. Returns the surviving
/// values column by column.
pub fn complete_rows(series: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
    let rows = series.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = vec![Vec::new(); series.len()];
    for row in 0..rows {
        if series.iter().all(|s| s[row].is_some()) {
            for (col, s) in out.iter_mut().zip(series) {
                col.extend(s[row]);
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) * 0.5
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Upper bound on the number of histogram bins.
pub const MAX_BINS: usize = 1_000;

/// Number of equal-width bins chosen automatically: the narrower of the
/// Sturges and Freedman–Diaconis widths, Sturges alone when the IQR is zero
/// or the narrower width would need more than [`MAX_BINS`] bins.
pub fn auto_bin_count(values: &[f64]) -> usize {
    let Some((first, last)) = outer_edges(values) else {
        return 1;
    };
    let n = values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let sturges = (max - min) / (n.log2() + 1.0);
    let iqr = match (percentile(values, 75.0), percentile(values, 25.0)) {
        (Some(q3), Some(q1)) => q3 - q1,
        _ => 0.0,
    };
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    let count_for = |w: f64| {
        if w > 0.0 {
            (((last - first) / w).ceil() as usize).max(1)
        } else {
            1
        }
    };
    // Outliers inflate the Freedman–Diaconis count; Sturges grows with log2(n).
    let count = match count_for(width) {
        c if c > MAX_BINS => count_for(sturges),
        c => c,
    };
    count.min(MAX_BINS)
}

fn outer_edges(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        Some((min - 0.5, max + 0.5))
    } else {
        Some((min, max))
    }
}

/// Equal-width histogram with [`auto_bin_count`] bins. The last bin is
/// closed on the right so the maximum is counted.
pub fn histogram(values: &[f64]) -> Vec<Bin> {
    let Some((first, last)) = outer_edges(values) else {
        return Vec::new();
    };
    let n_bins = auto_bin_count(values);
    let width = (last - first) / n_bins as f64;

    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            start: first + i as f64 * width,
            end: if i + 1 == n_bins {
                last
            } else {
                first + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - first) / width).floor() as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

/// Number of evaluation points of a density curve.
pub const KDE_GRID_SIZE: usize = 200;

/// Gaussian KDE with Scott's bandwidth (`n^-1/5` times the sample std).
///
/// The curve spans the data range extended by `cut` kernel bandwidths on
/// each side. `None` when fewer than two values or zero variance.
pub fn gaussian_kde(values: &[f64], cut: f64, grid_size: usize) -> Option<Vec<[f64; 2]>> {
    let sd = std_dev(values)?;
    if sd <= 0.0 || grid_size < 2 {
        return None;
    }
    let n = values.len() as f64;
    let bandwidth = sd * n.powf(-0.2);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min) - cut * bandwidth;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + cut * bandwidth;
    let step = (max - min) / (grid_size - 1) as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    Some(
        (0..grid_size)
            .map(|i| {
                let x = min + i as f64 * step;
                let density: f64 = values
                    .iter()
                    .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                    .sum::<f64>()
                    * norm;
                [x, density]
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Cell, Column};

    fn cell(m: &CorrelationMatrix, row: &str, col: &str) -> Option<f64> {
        let i = m.labels.iter().position(|l| l == row)?;
        let j = m.labels.iter().position(|l| l == col)?;
        Some(m.values[i][j])
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn nlargest_and_nsmallest_skip_missing() {
        let v = [Some(3.0), None, Some(9.0), Some(1.0), Some(5.0)];
        assert_eq!(nlargest(&v, 2), vec![2, 4]);
        assert_eq!(nsmallest(&v, 2), vec![3, 0]);
        assert_eq!(nlargest(&v, 10), vec![2, 4, 0, 3]);
    }

    #[test]
    fn ranking_ties_keep_row_order() {
        let v = [Some(1.0), Some(2.0), Some(2.0), Some(1.0)];
        assert_eq!(nlargest(&v, 3), vec![1, 2, 0]);
        assert_eq!(nsmallest(&v, 3), vec![0, 3, 1]);
    }

    #[test]
    fn moments() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(mean(&v).unwrap(), 5.0));
        assert!(close(std_dev(&v).unwrap(), (32.0f64 / 7.0).sqrt()));
        assert_eq!(std_dev(&[1.0]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn percentile_interpolates() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert!(close(percentile(&v, 25.0).unwrap(), 1.75));
        assert!(close(percentile(&v, 50.0).unwrap(), 2.5));
        assert!(close(percentile(&v, 100.0).unwrap(), 4.0));
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let a = [Some(1.0), Some(2.0), Some(3.0), None];
        let b = [Some(2.0), Some(4.0), Some(6.0), Some(100.0)];
        assert!(close(pearson(&a, &b), 1.0));

        let c = [Some(3.0), Some(2.0), Some(1.0), Some(0.0)];
        assert!(close(pearson(&a, &c), -1.0));

        let constant = [Some(1.0), Some(1.0), Some(1.0), Some(1.0)];
        assert!(pearson(&a, &constant).is_nan());
        assert!(pearson(&[Some(1.0)], &[Some(2.0)]).is_nan());
    }

    #[test]
    fn correlation_matrix_is_symmetric_over_numeric_columns() {
        let ds = Dataset::from_columns(vec![
            Column::new("country", vec![Cell::Text("A".into()), Cell::Text("B".into()), Cell::Text("C".into())]),
            Column::new("x", vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Number(4.0)]),
            Column::new("y", vec![Cell::Number(3.0), Cell::Number(1.0), Cell::Number(2.0)]),
        ]);
        let m = correlation_matrix(&ds);
        assert_eq!(m.labels, vec!["x", "y"]);
        assert!(close(cell(&m, "x", "x").unwrap(), 1.0));
        assert!(close(cell(&m, "y", "y").unwrap(), 1.0));
        assert_eq!(cell(&m, "x", "y"), cell(&m, "y", "x"));
        assert_eq!(cell(&m, "country", "x"), None);
    }

    #[test]
    fn complete_rows_drops_any_missing() {
        let out = complete_rows(&[
            vec![Some(1.0), None, Some(3.0), Some(4.0)],
            vec![Some(10.0), Some(20.0), None, Some(40.0)],
        ]);
        assert_eq!(out, vec![vec![1.0, 4.0], vec![10.0, 40.0]]);
    }

    #[test]
    fn histogram_counts_every_value() {
        let v: Vec<f64> = (0..137).map(|i| 2.0 + (i as f64 * 0.037) % 5.8).collect();
        let bins = histogram(&v);
        assert!(bins.len() > 1);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), v.len());
        assert!(close(bins[0].start, v.iter().copied().fold(f64::INFINITY, f64::min)));
        for pair in bins.windows(2) {
            assert!(close(pair[0].end, pair[1].start));
        }
    }

    #[test]
    fn histogram_of_constant_values_has_one_unit_bin() {
        let bins = histogram(&[5.0, 5.0, 5.0]);
        assert_eq!(bins, vec![Bin { start: 4.5, end: 5.5, count: 3 }]);
        assert!(histogram(&[]).is_empty());
    }

    #[test]
    fn auto_bins_follow_sturges_when_iqr_is_zero() {
        // IQR is zero, range 1, n = 8 -> Sturges width 1/4 -> 4 bins.
        let v = [0.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 1.0];
        assert_eq!(auto_bin_count(&v), 4);
    }

    #[test]
    fn outlier_does_not_explode_bin_count() {
        let mut v: Vec<f64> = (0..100).map(|i| 4.03 + i as f64 * 0.03).collect();
        for outlier in [9.99e9, 1e15] {
            v.push(outlier);
            let n_bins = auto_bin_count(&v);
            assert!(n_bins <= MAX_BINS, "{n_bins} bins for outlier {outlier}");
            let bins = histogram(&v);
            assert_eq!(bins.len(), n_bins);
            assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), v.len());
            v.pop();
        }
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let v = [1.0, 2.0, 2.5, 3.0, 4.0, 4.2, 5.5];
        let curve = gaussian_kde(&v, 3.0, KDE_GRID_SIZE).unwrap();
        assert_eq!(curve.len(), KDE_GRID_SIZE);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        assert!((area - 1.0).abs() < 0.01, "area {area}");
        assert!(gaussian_kde(&[1.0, 1.0], 3.0, KDE_GRID_SIZE).is_none());
        assert!(gaussian_kde(&[1.0], 3.0, KDE_GRID_SIZE).is_none());
    }
}
