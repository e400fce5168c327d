use crate::aggregate::{explode, split_list, Aggregate, Reduction};
use crate::types::{CatalogSummary, SalesRecord, SalesSummary, TitleRecord, TopEntry};
use crate::util::{display_float, parse_with_unit, round_to};
use chrono::NaiveDate;
use std::hash::Hash;

pub const TOP_N: usize = 10;
pub const MOVIE: &str = "Movie";
pub const TV_SHOW: &str = "TV Show";
const NO_DATA: &str = "no data";

fn top_entry<K: Eq + Hash + Clone>(agg: &Aggregate<K>) -> Option<TopEntry<K>> {
    agg.top().map(|(key, value)| TopEntry {
        key: key.clone(),
        value,
    })
}

/// Whole-number rendering for counts.
fn count_text(v: f64) -> String {
    if v.is_finite() {
        format!("{}", v.round() as i64)
    } else {
        display_float(v)
    }
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SalesAggregates {
    pub total_revenue: f64,
    pub order_totals: Aggregate<String>,
    pub avg_order_value: f64,
    pub region_revenue: Aggregate<String>,
    pub top_products: Aggregate<String>,
    pub monthly_trend: Aggregate<(i32, u32)>,
}

impl SalesAggregates {
    pub fn compute(records: &[SalesRecord]) -> Self {
        let total_revenue: f64 = records.iter().filter_map(|r| r.revenue).sum();

        // order level, not line level
        let order_totals = Aggregate::group_by(
            records,
            |r| r.order_id.clone(),
            |r| r.revenue,
            Reduction::Sum,
        );
        let avg_order_value = order_totals.mean();

        let region_revenue =
            Aggregate::group_by(records, |r| r.region.clone(), |r| r.revenue, Reduction::Sum)
                .sort_desc();

        let top_products = Aggregate::group_by(
            records,
            |r| r.product_name.clone(),
            |r| r.revenue,
            Reduction::Sum,
        )
        .sort_desc()
        .head(TOP_N);

        let monthly_trend = Aggregate::group_by(
            records,
            |r| r.order_year.zip(r.order_month),
            |r| r.revenue,
            Reduction::Sum,
        )
        .sort_by_key();

        Self {
            total_revenue,
            order_totals,
            avg_order_value,
            region_revenue,
            top_products,
            monthly_trend,
        }
    }

    /// The (year, month) series placed on the first day of each month.
    pub fn monthly_points(&self) -> Vec<(NaiveDate, f64)> {
        self.monthly_trend
            .iter()
            .filter_map(|((year, month), v)| {
                NaiveDate::from_ymd_opt(*year, *month, 1).map(|d| (d, *v))
            })
            .collect()
    }

    pub fn summary(&self) -> SalesSummary {
        SalesSummary {
            total_revenue: self.total_revenue,
            avg_order_value: round_to(self.avg_order_value, 2),
            top_region: top_entry(&self.region_revenue),
            top_product: top_entry(&self.top_products),
        }
    }
}

pub fn render_sales_summary(summary: &SalesSummary, output_dir: &str) -> String {
    let entry = |e: &Option<TopEntry<String>>| match e {
        Some(t) => format!("{} ({})", t.key, display_float(t.value)),
        None => NO_DATA.to_string(),
    };
    let region_insight = match &summary.top_region {
        Some(t) => format!("- Region {} generates the highest revenue.", t.key),
        None => "- No region revenue was recorded.".to_string(),
    };

    format!(
        "
SUPERSTORE SALES EDA – SUMMARY
==============================

1) Total Revenue: {total}

2) Average Order Value: {aov}

3) Top Region: {region}

4) Most Profitable Product: {product}

5) Sales Seasonality:
   See monthly trend chart for patterns.

KEY INSIGHTS:
{region_insight}
- Top products contribute disproportionately to total revenue.
- Month-over-month trend shows seasonal patterns.

EXPORTS:
- All charts are saved in {output_dir}/ folder.
",
        total = display_float(summary.total_revenue),
        aov = display_float(summary.avg_order_value),
        region = entry(&summary.top_region),
        product = entry(&summary.top_product),
    )
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Numeric duration for a title: minutes for movies, seasons for TV shows,
/// missing for anything else or an unparseable value.
pub fn normalized_duration(record: &TitleRecord) -> Option<f64> {
    match record.content_type.as_deref() {
        Some(MOVIE) => parse_with_unit(record.duration.as_deref(), &["min"]),
        Some(TV_SHOW) => parse_with_unit(record.duration.as_deref(), &["Seasons", "Season"]),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct CatalogAggregates {
    pub total_titles: usize,
    pub type_counts: Aggregate<String>,
    pub yearly_content: Aggregate<i32>,
    pub top_release_years: Aggregate<i32>,
    pub top_genres: Aggregate<String>,
    pub movie_durations: Vec<f64>,
    pub tv_seasons: Vec<f64>,
}

impl CatalogAggregates {
    pub fn compute(records: &[TitleRecord]) -> Self {
        let type_counts = Aggregate::count_by(records, |r| r.content_type.clone()).sort_desc();

        let yearly_content = Aggregate::group_by(
            records,
            |r| r.year_added,
            |r| r.show_id.as_ref().map(|_| 1.0),
            Reduction::Count,
        )
        .sort_by_key();

        let top_release_years = Aggregate::count_by(records, |r| r.release_year)
            .sort_desc()
            .head(TOP_N);

        // genre counting works on its own exploded copy
        let genres = explode(records, |r| split_list(&r.listed_in));
        let top_genres = Aggregate::count_by(&genres, |(_, g)| Some(g.clone()))
            .sort_desc()
            .head(TOP_N);

        let durations_for = |kind: &str| -> Vec<f64> {
            records
                .iter()
                .filter(|r| r.content_type.as_deref() == Some(kind))
                .filter_map(normalized_duration)
                .collect()
        };

        Self {
            total_titles: records.len(),
            type_counts,
            yearly_content,
            top_release_years,
            top_genres,
            movie_durations: durations_for(MOVIE),
            tv_seasons: durations_for(TV_SHOW),
        }
    }

    pub fn summary(&self) -> CatalogSummary {
        let count_of = |kind: &str| {
            self.type_counts
                .get(&kind.to_string())
                .map(|v| v as usize)
                .unwrap_or(0)
        };
        CatalogSummary {
            total_titles: self.total_titles,
            movies: count_of(MOVIE),
            tv_shows: count_of(TV_SHOW),
            peak_year_added: top_entry(&self.yearly_content),
            top_genre: top_entry(&self.top_genres),
            top_release_year: top_entry(&self.top_release_years),
        }
    }
}

pub fn render_catalog_summary(summary: &CatalogSummary) -> String {
    let peak = match &summary.peak_year_added {
        Some(t) => format!("{} with {} titles added.", t.key, count_text(t.value)),
        None => NO_DATA.to_string(),
    };
    let genre = match &summary.top_genre {
        Some(t) => format!("{} ({} titles)", t.key, count_text(t.value)),
        None => NO_DATA.to_string(),
    };
    let release = match &summary.top_release_year {
        Some(t) => format!("{} ({} titles)", t.key, count_text(t.value)),
        None => NO_DATA.to_string(),
    };

    format!(
        "
NETFLIX DATASET EDA SUMMARY
===========================

1. Total Titles: {total}

2. Movies: {movies}
   TV Shows: {tv_shows}

3. Peak Content Addition Year:
   {peak}

4. Most Common Genre:
   {genre}

5. Most Frequent Release Year:
   {release}

INSIGHTS:
- Netflix content increased significantly after 2015.
- Movies dominate the platform compared to TV shows.
- Drama and International genres are highly common.
- Most movies range between 80–120 minutes.
- Most TV shows have 1–3 seasons.
",
        total = summary.total_titles,
        movies = summary.movies,
        tv_shows = summary.tv_shows,
    )
}
