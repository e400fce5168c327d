// Grouped reductions over typed records.
//
// An `Aggregate` is an ordered list of (key, value) pairs plus an explicit
// key -> position index. Groups appear in first-seen order until a caller
// sorts them; every sort is stable so ties keep first-seen order.
use crate::util::average;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Sum of present values; a group with none sums to 0.
    Sum,
    /// Mean of present values; a group with none is NaN.
    Mean,
    /// Number of present values.
    Count,
}

#[derive(Debug, Clone)]
pub struct Aggregate<K> {
    entries: Vec<(K, f64)>,
    index: HashMap<K, usize>,
}

impl<K> Aggregate<K>
where
    K: Eq + Hash + Clone,
{
    /// Group `rows` by `key` and reduce `value` per group. Rows whose key is
    /// `None` are left out entirely; `None` values are skipped by the
    /// reduction but still open their group.
    pub fn group_by<R, FK, FV>(rows: &[R], key: FK, value: FV, reduction: Reduction) -> Self
    where
        FK: Fn(&R) -> Option<K>,
        FV: Fn(&R) -> Option<f64>,
    {
        let mut order: Vec<K> = Vec::new();
        let mut groups: HashMap<K, Vec<f64>> = HashMap::new();
        for row in rows {
            let Some(k) = key(row) else { continue };
            let bucket = groups.entry(k.clone()).or_insert_with(|| {
                order.push(k);
                Vec::new()
            });
            if let Some(v) = value(row) {
                bucket.push(v);
            }
        }
        let entries = order
            .into_iter()
            .map(|k| {
                let values = groups.remove(&k).unwrap_or_default();
                let reduced: f64 = match reduction {
                    Reduction::Sum => values.iter().sum(),
                    Reduction::Mean => average(&values),
                    Reduction::Count => values.len() as f64,
                };
                (k, reduced)
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Count rows per key (a value count over one column).
    pub fn count_by<R, FK>(rows: &[R], key: FK) -> Self
    where
        FK: Fn(&R) -> Option<K>,
    {
        Self::group_by(rows, key, |_| Some(1.0), Reduction::Count)
    }

    pub fn from_entries(entries: Vec<(K, f64)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Descending by value. Stable, so equal values keep their order.
    /// NaN groups (a mean over no values) sort last.
    pub fn sort_desc(mut self) -> Self {
        self.entries.sort_by(|a, b| {
            a.1.is_nan()
                .cmp(&b.1.is_nan())
                .then_with(|| b.1.total_cmp(&a.1))
        });
        self.reindex()
    }

    /// Ascending by key, for chronological series.
    pub fn sort_by_key(mut self) -> Self
    where
        K: Ord,
    {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self.reindex()
    }

    pub fn head(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self.reindex()
    }

    fn reindex(self) -> Self {
        Self::from_entries(self.entries)
    }

    /// The largest value and its key; the first one wins a tie.
    pub fn top(&self) -> Option<(&K, f64)> {
        let mut best: Option<(&K, f64)> = None;
        for (k, v) in &self.entries {
            if v.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, b)| *v > b) {
                best = Some((k, *v));
            }
        }
        best
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn mean(&self) -> f64 {
        average(&self.values())
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, f64)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Display> Aggregate<K> {
    /// `(label, value)` pairs for charts and console previews.
    pub fn labeled(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }
}

/// Expand each row into one row per item of a multi-valued field. The
/// `split` closure yields the items; every other field is cloned as is.
/// Rows whose field yields nothing are dropped.
pub fn explode<R, T, F>(rows: &[R], split: F) -> Vec<(R, T)>
where
    R: Clone,
    F: Fn(&R) -> Vec<T>,
{
    rows.iter()
        .flat_map(|row| {
            split(row)
                .into_iter()
                .map(move |item| (row.clone(), item))
        })
        .collect()
}

/// Comma-separated list items, trimmed, empties removed.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line {
        order: &'static str,
        region: &'static str,
        sales: Option<f64>,
    }

    fn lines() -> Vec<Line> {
        vec![
            Line {
                order: "O1",
                region: "East",
                sales: Some(10.0),
            },
            Line {
                order: "O1",
                region: "East",
                sales: Some(5.0),
            },
            Line {
                order: "O2",
                region: "West",
                sales: Some(20.0),
            },
        ]
    }

    #[test]
    fn order_and_region_revenue_scenario() {
        let rows = lines();
        let per_order = Aggregate::group_by(
            &rows,
            |r| Some(r.order.to_string()),
            |r| r.sales,
            Reduction::Sum,
        );
        assert_eq!(per_order.get(&"O1".to_string()), Some(15.0));
        assert_eq!(per_order.get(&"O2".to_string()), Some(20.0));
        assert_eq!(per_order.mean(), 17.5);

        // line-level mean would be 35 / 3; order level is different
        let line_sales: Vec<f64> = rows.iter().filter_map(|r| r.sales).collect();
        let line_mean = average(&line_sales);
        assert!((per_order.mean() - line_mean).abs() > 1.0);

        let per_region = Aggregate::group_by(
            &rows,
            |r| Some(r.region.to_string()),
            |r| r.sales,
            Reduction::Sum,
        )
        .sort_desc();
        assert_eq!(
            per_region.labeled(),
            vec![("West".to_string(), 20.0), ("East".to_string(), 15.0)]
        );
    }

    #[test]
    fn grouping_partitions_the_total() {
        let mut rows = lines();
        rows.push(Line {
            order: "O3",
            region: "North",
            sales: None,
        });
        rows.push(Line {
            order: "O4",
            region: "East",
            sales: Some(2.5),
        });
        let per_region = Aggregate::group_by(
            &rows,
            |r| Some(r.region),
            |r| r.sales,
            Reduction::Sum,
        );
        let ungrouped: f64 = rows.iter().filter_map(|r| r.sales).sum();
        assert_eq!(per_region.total(), ungrouped);
        // a group with only missing values still exists and sums to zero
        assert_eq!(per_region.get(&"North"), Some(0.0));
    }

    #[test]
    fn missing_keys_are_excluded() {
        let years = [Some(2019), None, Some(2019), Some(2020)];
        let counts = Aggregate::count_by(&years, |y| *y).sort_by_key();
        assert_eq!(
            counts.labeled(),
            vec![("2019".to_string(), 2.0), ("2020".to_string(), 1.0)]
        );
        assert_eq!(counts.total(), 3.0);
    }

    #[test]
    fn mean_and_count_reductions() {
        let rows = [("a", Some(1.0)), ("a", None), ("a", Some(3.0)), ("b", None)];
        let mean = Aggregate::group_by(&rows, |r| Some(r.0), |r| r.1, Reduction::Mean);
        assert_eq!(mean.get(&"a"), Some(2.0));
        assert!(mean.get(&"b").is_some_and(f64::is_nan));

        let count = Aggregate::group_by(&rows, |r| Some(r.0), |r| r.1, Reduction::Count);
        assert_eq!(count.get(&"a"), Some(2.0));
        assert_eq!(count.get(&"b"), Some(0.0));
    }

    #[test]
    fn top_n_is_descending_with_first_seen_ties() {
        let keys = ["c", "a", "b", "a", "b", "d", "e", "c"];
        let counts = Aggregate::count_by(&keys, |k| Some(*k)).sort_desc();
        // c, a, b all have two; they keep first-seen order
        let top = counts.clone().head(3);
        assert_eq!(
            top.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec!["c", "a", "b"]
        );
        assert_eq!(counts.top(), Some((&"c", 2.0)));

        let values = counts.values();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));

        // asking for more than exists returns what exists
        assert_eq!(counts.clone().head(10).len(), 5);
        assert_eq!(counts.head(10).get(&"e"), Some(1.0));
    }

    #[test]
    fn ranking_means_puts_empty_groups_last() {
        let mut rows: Vec<(u32, Option<f64>)> = Vec::new();
        for key in 0..50u32 {
            // every 17th group has no values, so its mean is NaN
            let value = if key % 17 == 5 { None } else { Some(f64::from(key % 7)) };
            rows.push((key, value));
            rows.push((key, value.map(|v| v + 1.0)));
        }
        let ranked = Aggregate::group_by(&rows, |r| Some(r.0), |r| r.1, Reduction::Mean)
            .sort_desc();
        assert_eq!(ranked.len(), 50);

        let values = ranked.values();
        let (finite, empty) = values.split_at(47);
        assert!(finite.iter().all(|v| !v.is_nan()));
        assert!(finite.windows(2).all(|w| w[0] >= w[1]));
        assert!(empty.iter().all(|v| v.is_nan()));

        // equal means keep first-seen order
        let sevens: Vec<u32> = ranked
            .iter()
            .filter(|(_, v)| *v == 6.5)
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(sevens, vec![6, 13, 20, 27, 34, 41, 48]);
        assert_eq!(ranked.top(), Some((&6, 6.5)));
    }

    #[test]
    fn top_of_unsorted_keeps_the_first_maximum() {
        let agg = Aggregate::from_entries(vec![(2018, 3.0), (2019, 5.0), (2020, 5.0)]);
        assert_eq!(agg.top(), Some((&2019, 5.0)));
        let empty: Aggregate<i32> = Aggregate::from_entries(Vec::new());
        assert_eq!(empty.top(), None);
        assert!(empty.mean().is_nan());
    }

    #[test]
    fn explode_duplicates_the_row_per_genre() {
        #[derive(Clone, Debug, PartialEq)]
        struct Title {
            id: u32,
            listed_in: String,
        }
        let rows = vec![
            Title {
                id: 1,
                listed_in: "Drama, Comedy".into(),
            },
            Title {
                id: 2,
                listed_in: "Drama".into(),
            },
        ];
        let exploded = explode(&rows, |t| split_list(&t.listed_in));
        assert_eq!(exploded.len(), 3);
        assert_eq!(exploded[0].0, rows[0]);
        assert_eq!(exploded[0].1, "Drama");
        assert_eq!(exploded[1].0.id, 1);
        assert_eq!(exploded[1].1, "Comedy");

        let genres = Aggregate::count_by(&exploded, |(_, g)| Some(g.clone())).sort_desc();
        assert_eq!(genres.get(&"Drama".to_string()), Some(2.0));
        assert_eq!(genres.get(&"Comedy".to_string()), Some(1.0));
        // source rows are untouched
        assert_eq!(rows[0].listed_in, "Drama, Comedy");
    }

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(split_list(" A ,B,, C"), vec!["A", "B", "C"]);
        assert!(split_list("").is_empty());
    }
}
