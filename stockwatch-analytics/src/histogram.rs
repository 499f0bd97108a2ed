use stockwatch_pipeline::{fields, InventoryRecord};

use crate::datasets::HistogramBin;
use crate::limits::HISTOGRAM_TARGET_BINS;

/// Distribution of non-negative stock ages in fixed-width bins.
///
/// The bin width is `ceil((max - min) / 10)`. When every age is equal a
/// single bin holds them all. Empty bins are not emitted, so counts always
/// sum to the number of valid ages. Multi-bin labels use floored edges.
pub fn stock_age_histogram(records: &[InventoryRecord]) -> Vec<HistogramBin> {
    let ages: Vec<f64> = records
        .iter()
        .filter_map(|r| r.number(fields::STOCK_AGE_DAYS))
        .filter(|age| *age >= 0.0 && age.is_finite())
        .collect();
    if ages.is_empty() {
        return Vec::new();
    }

    let min = ages.iter().copied().fold(f64::INFINITY, f64::min);
    let max = ages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_size = ((max - min) / HISTOGRAM_TARGET_BINS).ceil();

    if bin_size == 0.0 {
        // the shared age is shown as is, fractions included
        return vec![HistogramBin {
            name: format!("{}-{}", min, min),
            start: min,
            end: min,
            count: ages.len(),
        }];
    }

    let bin_count = ((max + 1.0 - min) / bin_size).ceil() as usize;
    let mut counts = vec![0usize; bin_count];
    for age in &ages {
        let index = ((age - min) / bin_size).floor() as usize;
        counts[index.min(bin_count - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .filter(|(_, count)| *count > 0)
        .map(|(index, count)| {
            let start = min + index as f64 * bin_size;
            let last = index == bin_count - 1;
            // the last bin stretches to cover max
            let end = if last && start + bin_size > max {
                start + bin_size
            } else {
                start + bin_size - 1.0
            };
            HistogramBin {
                name: label(start.floor(), end.floor()),
                start: start.floor(),
                end: end.floor(),
                count,
            }
        })
        .collect()
}

fn label(start: f64, end: f64) -> String {
    format!("{}-{}", start as i64, end as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aged(ages: &[f64]) -> Vec<InventoryRecord> {
        ages.iter()
            .enumerate()
            .map(|(i, age)| {
                let mut r = InventoryRecord::new(format!("K{}", i), Default::default());
                r.insert(fields::STOCK_AGE_DAYS, *age);
                r
            })
            .collect()
    }

    fn names(bins: &[HistogramBin]) -> Vec<&str> {
        bins.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn bins_are_labelled_and_empty_ones_dropped() {
        let bins = stock_age_histogram(&aged(&[0.0, 5.0, 10.0, 25.0, 100.0]));
        assert_eq!(names(&bins), vec!["0-9", "10-19", "20-29", "100-110"]);
        let counts: Vec<_> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 1]);
    }

    #[test]
    fn equal_ages_share_one_bin() {
        let bins = stock_age_histogram(&aged(&[7.0, 7.0, 7.0]));
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].name, "7-7");
        assert_eq!(bins[0].count, 3);

        let bins = stock_age_histogram(&aged(&[7.5, 7.5]));
        assert_eq!(bins[0].name, "7.5-7.5");
        assert_eq!(bins[0].start, 7.5);
    }

    #[test]
    fn counts_sum_to_valid_ages() {
        let ages = [3.0, -1.0, 17.5, 42.0, 42.0, 8.25, 365.0, 0.0, 120.0];
        let bins = stock_age_histogram(&aged(&ages));
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, ages.iter().filter(|a| **a >= 0.0).count());
        assert!(bins.iter().all(|b| b.count > 0));
        assert!(bins.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[test]
    fn no_valid_ages_gives_no_bins() {
        assert!(stock_age_histogram(&aged(&[-3.0])).is_empty());
        assert!(stock_age_histogram(&[]).is_empty());
    }
}
