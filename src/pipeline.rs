// The two report runs. Each one goes load -> profile -> clean/derive ->
// aggregate -> plot -> write summary, top to bottom, and stops at the first
// hard error. Whatever was written before the error stays on disk.
use crate::aggregate::Aggregate;
use crate::charts;
use crate::config::{ChartSpec, ReportConfig};
use crate::error::Result;
use crate::loader::{self, RecordTable, SALES_DATE_COLUMNS};
use crate::output;
use crate::reports::{
    render_catalog_summary, render_sales_summary, CatalogAggregates, SalesAggregates,
};
use crate::types::{CatalogSummary, SalesSummary};
use crate::util::{display_float, format_int, round_to};
use log::{debug, info, warn};

const REGION_CHART: ChartSpec =
    ChartSpec::new("revenue_by_region.png", "Revenue by Region", "Revenue", "Region");
const PRODUCT_CHART: ChartSpec = ChartSpec::new(
    "top_10_products.png",
    "Top 10 Products by Revenue",
    "Revenue",
    "Product",
)
.sized(1000, 600);
const MONTHLY_CHART: ChartSpec =
    ChartSpec::new("monthly_trend.png", "Monthly Revenue Trend", "Date", "Revenue")
        .sized(1000, 500);
const ORDER_VALUE_CHART: ChartSpec = ChartSpec::new(
    "order_value_distribution.png",
    "Distribution of Order Totals",
    "Order Revenue",
    "Count",
);
const ORDER_VALUE_BINS: usize = 30;

const TYPE_CHART: ChartSpec = ChartSpec::new(
    "type_distribution.png",
    "Count of Movies vs TV Shows",
    "Type",
    "Count",
);
const GROWTH_CHART: ChartSpec = ChartSpec::new(
    "content_growth.png",
    "Content Added Over Time",
    "Year",
    "Number of Titles",
);
const RELEASE_YEAR_CHART: ChartSpec = ChartSpec::new(
    "top_10_release_years.png",
    "Top 10 Release Years",
    "Count",
    "Year",
);
const GENRE_CHART: ChartSpec = ChartSpec::new(
    "top_10_genres.png",
    "Top 10 Genres on Netflix",
    "Count",
    "Genre",
)
.sized(1000, 600);
const RUNTIME_CHART: ChartSpec = ChartSpec::new(
    "movie_runtime_distribution.png",
    "Movie Duration Distribution (Minutes)",
    "Minutes",
    "Count",
);
const RUNTIME_BINS: usize = 20;
const SEASON_CHART: ChartSpec = ChartSpec::new(
    "tvshow_season_distribution.png",
    "TV Show Season Distribution",
    "Number of Seasons",
    "Count",
);
const SEASON_BINS: usize = 10;

/// Shape, column types and missing counts, printed before any cleaning.
fn print_diagnostics(table: &RecordTable, date_columns: &[&str]) {
    let (rows, cols) = table.shape();
    println!("Shape of dataset: ({}, {})", format_int(rows), cols);
    let profile = loader::profile_rows(&table.profile(date_columns));
    output::preview_table("Data Types and Missing Values", &profile, profile.len());
}

fn print_aggregate<K>(title: &str, agg: &Aggregate<K>, decimals: usize)
where
    K: Eq + std::hash::Hash + Clone + std::fmt::Display,
{
    let rows = output::aggregate_rows(agg, decimals);
    output::preview_table(title, &rows, rows.len());
}

pub fn run_sales_report(config: &ReportConfig) -> Result<SalesSummary> {
    info!("sales report: loading {}", config.input.display());
    output::ensure_dir(&config.output_dir)?;

    let table = loader::load_table(&config.input)?;
    print_diagnostics(&table, &SALES_DATE_COLUMNS);
    let records = loader::clean_sales(&table)?;

    let aggs = SalesAggregates::compute(&records);
    info!(
        "sales report: {} orders across {} regions",
        format_int(aggs.order_totals.len()),
        aggs.region_revenue.len()
    );
    debug!(
        "region revenue sums to {} of {} total",
        display_float(aggs.region_revenue.total()),
        display_float(aggs.total_revenue)
    );
    if aggs.region_revenue.is_empty() {
        warn!("sales report: no region has revenue; the summary will say so");
    }
    println!("\nTotal Revenue: {}", display_float(aggs.total_revenue));
    println!(
        "Average Order Value: {}",
        display_float(round_to(aggs.avg_order_value, 2))
    );
    print_aggregate("Top Regions by Revenue", &aggs.region_revenue, 2);
    print_aggregate("Top 10 Products by Revenue", &aggs.top_products, 2);

    let style = &config.style;
    charts::horizontal_bar(
        &config.output_path(REGION_CHART.file),
        &REGION_CHART,
        style,
        &aggs.region_revenue.labeled(),
    )?;
    charts::horizontal_bar(
        &config.output_path(PRODUCT_CHART.file),
        &PRODUCT_CHART,
        style,
        &aggs.top_products.labeled(),
    )?;
    charts::date_line(
        &config.output_path(MONTHLY_CHART.file),
        &MONTHLY_CHART,
        style,
        &aggs.monthly_points(),
    )?;
    charts::histogram(
        &config.output_path(ORDER_VALUE_CHART.file),
        &ORDER_VALUE_CHART,
        style,
        &aggs.order_totals.values(),
        ORDER_VALUE_BINS,
        true,
    )?;
    info!("sales report: 4 charts written to {}", config.output_dir.display());

    let summary = aggs.summary();
    let text = render_sales_summary(&summary, &config.output_dir.display().to_string());
    output::write_text(&config.output_path(&config.summary_file), &text)?;
    output::write_json(&config.output_path(&config.json_file), &summary)?;

    println!("\nReport exported to {}/ folder!", config.output_dir.display());
    Ok(summary)
}

pub fn run_catalog_report(config: &ReportConfig) -> Result<CatalogSummary> {
    info!("catalog report: loading {}", config.input.display());
    output::ensure_dir(&config.output_dir)?;

    let table = loader::load_table(&config.input)?;
    print_diagnostics(&table, &[]);
    let records = loader::clean_titles(&table)?;

    let aggs = CatalogAggregates::compute(&records);
    info!(
        "catalog report: {} titles, {} distinct genres in the top list",
        format_int(aggs.total_titles),
        aggs.top_genres.len()
    );
    if aggs.yearly_content.is_empty() {
        warn!("catalog report: no title has a usable date_added");
    }
    let style = &config.style;

    print_aggregate("Type Counts", &aggs.type_counts, 0);
    charts::vertical_bar(
        &config.output_path(TYPE_CHART.file),
        &TYPE_CHART,
        style,
        &aggs.type_counts.labeled(),
    )?;

    let growth: Vec<(i32, f64)> = aggs.yearly_content.iter().copied().collect();
    charts::year_line(
        &config.output_path(GROWTH_CHART.file),
        &GROWTH_CHART,
        style,
        &growth,
    )?;

    print_aggregate("Top 10 Release Years", &aggs.top_release_years, 0);
    charts::horizontal_bar(
        &config.output_path(RELEASE_YEAR_CHART.file),
        &RELEASE_YEAR_CHART,
        style,
        &aggs.top_release_years.labeled(),
    )?;

    print_aggregate("Top 10 Genres", &aggs.top_genres, 0);
    charts::horizontal_bar(
        &config.output_path(GENRE_CHART.file),
        &GENRE_CHART,
        style,
        &aggs.top_genres.labeled(),
    )?;

    charts::histogram(
        &config.output_path(RUNTIME_CHART.file),
        &RUNTIME_CHART,
        style,
        &aggs.movie_durations,
        RUNTIME_BINS,
        false,
    )?;
    charts::histogram(
        &config.output_path(SEASON_CHART.file),
        &SEASON_CHART,
        style,
        &aggs.tv_seasons,
        SEASON_BINS,
        false,
    )?;
    info!("catalog report: 6 charts written to {}", config.output_dir.display());

    let summary = aggs.summary();
    output::write_text(
        &config.output_path(&config.summary_file),
        &render_catalog_summary(&summary),
    )?;
    output::write_json(&config.output_path(&config.json_file), &summary)?;

    println!(
        "\nReport exported successfully inside '{}' folder!",
        config.output_dir.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;
    use std::fs;
    use std::path::Path;

    const SALES_CSV: &str = "\
Row ID,Order ID,Order Date,Ship Date,Customer ID,Region,Product Name,Sales
1,CA-1,11/8/2016,11/11/2016,C1,South,Bretford Bookcase,261.96
2,CA-1,11/8/2016,11/11/2016,C1,South,Hon Chair,731.94
3,CA-2,6/12/2016,6/16/2016,C2,West,Self-Adhesive Labels,14.62
4,CA-3,10/11/2015,10/18/2015,C3,South,Table,957.5775
5,CA-4,not a date,,C4,East,Phone,n/a
";

    const CATALOG_CSV: &str = "\
show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in
s1,Movie,A,Kirsten,,United States,\"September 25, 2021\",2020,PG-13,90 min,Documentaries
s2,TV Show,B,,Ama,South Africa,\"September 24, 2021\",2021,TV-MA,2 Seasons,\"International TV Shows, TV Dramas\"
s3,TV Show,C,Julien,Sami,,\" September 24, 2021\",2021,TV-MA,1 Season,\"Crime TV Shows, International TV Shows\"
s4,Movie,D,,,,someday,2021,,N/A,\"Dramas, International Movies\"
";

    fn setup(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).expect("write input");
        path
    }

    #[test]
    fn sales_report_writes_charts_and_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = setup(dir.path(), "sales_data.csv", SALES_CSV);
        let out = dir.path().join("outputs");
        let config = ReportConfig::sales().with_paths(&input, &out);

        let summary = run_sales_report(&config).expect("sales report");
        assert_eq!(summary.top_region.as_ref().map(|t| t.key.as_str()), Some("South"));

        for chart in [&REGION_CHART, &PRODUCT_CHART, &MONTHLY_CHART, &ORDER_VALUE_CHART] {
            assert!(out.join(chart.file).is_file(), "{} missing", chart.file);
        }
        let text = fs::read_to_string(out.join(&config.summary_file)).expect("summary");
        assert!(text.contains("SUPERSTORE SALES EDA – SUMMARY"));
        // orders CA-1 (993.9), CA-2 (14.62), CA-3 (957.5775); CA-4 has no revenue
        assert!(text.contains("3) Top Region: South ("));
        assert!(text.contains("4) Most Profitable Product: Table (957.5775)"));
        assert!(out.join(&config.json_file).is_file());
    }

    #[test]
    fn summary_is_byte_identical_across_runs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = setup(dir.path(), "dataset.csv", CATALOG_CSV);
        let out = dir.path().join("outputs");
        let config = ReportConfig::catalog().with_paths(&input, &out);

        run_catalog_report(&config).expect("first run");
        let first = fs::read(out.join(&config.summary_file)).expect("first summary");
        run_catalog_report(&config).expect("second run");
        let second = fs::read(out.join(&config.summary_file)).expect("second summary");
        assert_eq!(first, second);
    }

    #[test]
    fn catalog_report_summarizes_the_titles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = setup(dir.path(), "dataset.csv", CATALOG_CSV);
        let out = dir.path().join("outputs");
        let config = ReportConfig::catalog().with_paths(&input, &out);

        let summary = run_catalog_report(&config).expect("catalog report");
        assert_eq!(summary.total_titles, 4);
        assert_eq!(summary.movies, 2);
        assert_eq!(summary.tv_shows, 2);
        let peak = summary.peak_year_added.expect("peak year");
        assert_eq!((peak.key, peak.value), (2021, 3.0));
        let genre = summary.top_genre.expect("genre");
        assert_eq!((genre.key.as_str(), genre.value), ("International TV Shows", 2.0));
        let release = summary.top_release_year.expect("release year");
        assert_eq!((release.key, release.value), (2021, 3.0));

        for chart in [
            &TYPE_CHART,
            &GROWTH_CHART,
            &RELEASE_YEAR_CHART,
            &GENRE_CHART,
            &RUNTIME_CHART,
            &SEASON_CHART,
        ] {
            assert!(out.join(chart.file).is_file(), "{} missing", chart.file);
        }
    }

    #[test]
    fn missing_input_fails_without_a_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("outputs");
        let config = ReportConfig::sales().with_paths(dir.path().join("absent.csv"), &out);
        let err = run_sales_report(&config).unwrap_err();
        assert!(matches!(err, EdaError::Io(_)), "{err}");
        assert!(!out.join(&config.summary_file).exists());
    }

    #[test]
    fn missing_column_aborts_the_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = setup(dir.path(), "dataset.csv", "show_id,type\ns1,Movie\n");
        let config = ReportConfig::catalog().with_paths(&input, dir.path().join("outputs"));
        let err = run_catalog_report(&config).unwrap_err();
        assert!(matches!(err, EdaError::MissingColumn { .. }), "{err}");
    }
}
