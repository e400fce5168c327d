use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One line of `sales_data.csv` exactly as exported.
#[derive(Debug, Deserialize)]
pub struct RawSalesRow {
    #[serde(rename = "Order ID")]
    pub order_id: Option<String>,
    #[serde(rename = "Order Date")]
    pub order_date: Option<String>,
    #[serde(rename = "Ship Date")]
    pub ship_date: Option<String>,
    #[serde(rename = "Sales")]
    pub sales: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Product Name")]
    pub product_name: Option<String>,
}

/// One line of the streaming catalog `dataset.csv`.
#[derive(Debug, Deserialize)]
pub struct RawTitleRow {
    pub show_id: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<String>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub order_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub sales: Option<f64>,
    pub region: Option<String>,
    pub product_name: Option<String>,
    // derived
    pub revenue: Option<f64>,
    pub order_year: Option<i32>,
    pub order_month: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct TitleRecord {
    pub show_id: Option<String>,
    pub content_type: Option<String>,
    pub director: String,
    pub cast: String,
    pub country: String,
    pub date_added: Option<NaiveDate>,
    pub release_year: Option<i32>,
    pub rating: String,
    pub duration: Option<String>,
    pub listed_in: String,
    // derived
    pub year_added: Option<i32>,
}

/// Console row for the per-column diagnostics printed right after load.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ColumnProfileRow {
    #[tabled(rename = "Column")]
    pub column: String,
    #[tabled(rename = "Type")]
    pub dtype: String,
    #[tabled(rename = "Missing")]
    pub missing: usize,
}

/// Console row used to preview any aggregate result.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AggregateRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Key/value pair for a "top" entry in a JSON summary. `None` when the
/// underlying category had no data.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TopEntry<K> {
    pub key: K,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub top_region: Option<TopEntry<String>>,
    pub top_product: Option<TopEntry<String>>,
}

#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub total_titles: usize,
    pub movies: usize,
    pub tv_shows: usize,
    pub peak_year_added: Option<TopEntry<i32>>,
    pub top_genre: Option<TopEntry<String>>,
    pub top_release_year: Option<TopEntry<i32>>,
}
