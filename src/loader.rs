use crate::error::{EdaError, Result};
use crate::types::{ColumnProfileRow, RawSalesRow, RawTitleRow, SalesRecord, TitleRecord};
use crate::util::{or_sentinel, parse_date_safe, parse_f64_safe, parse_i32_safe};
use chrono::Datelike;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const SENTINEL: &str = "Unknown";

pub const SALES_COLUMNS: [&str; 6] = [
    "Order ID",
    "Order Date",
    "Ship Date",
    "Sales",
    "Region",
    "Product Name",
];
pub const SALES_DATE_COLUMNS: [&str; 2] = ["Order Date", "Ship Date"];

pub const CATALOG_COLUMNS: [&str; 10] = [
    "show_id",
    "type",
    "director",
    "cast",
    "country",
    "date_added",
    "release_year",
    "rating",
    "duration",
    "listed_in",
];

/// The CSV exactly as read: header names plus raw rows, in file order.
#[derive(Debug, Clone)]
pub struct RecordTable {
    pub path: PathBuf,
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Date,
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "int64",
            ColumnType::Float => "float64",
            ColumnType::Date => "datetime64",
            ColumnType::Text => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: ColumnType,
    pub missing: usize,
}

pub fn load_table(path: &Path) -> Result<RecordTable> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result?);
    }
    debug!(
        "read {} rows x {} columns from {}",
        rows.len(),
        headers.len(),
        path.display()
    );
    Ok(RecordTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

impl RecordTable {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.headers.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        for column in columns {
            if self.column_index(column).is_none() {
                return Err(EdaError::MissingColumn {
                    column: column.to_string(),
                    path: self.path.display().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Raw field for a row, `None` when the field is absent or blank.
    fn field<'a>(&self, row: &'a StringRecord, idx: usize) -> Option<&'a str> {
        row.get(idx).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Per-column inferred type and missing count. `date_columns` are the
    /// columns parsed as dates at load time; a date column whose values all
    /// parse reports as a date, otherwise as text.
    pub fn profile(&self, date_columns: &[&str]) -> Vec<ColumnProfile> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<&str> = self
                    .rows
                    .iter()
                    .filter_map(|row| self.field(row, idx))
                    .collect();
                let missing = self.rows.len() - values.len();
                let dtype = if values.is_empty() {
                    ColumnType::Float
                } else if date_columns.contains(&name.trim())
                    && values.iter().all(|v| parse_date_safe(Some(v)).is_some())
                {
                    ColumnType::Date
                } else if values.iter().all(|v| v.parse::<i64>().is_ok()) {
                    ColumnType::Int
                } else if values.iter().all(|v| v.parse::<f64>().is_ok()) {
                    ColumnType::Float
                } else {
                    ColumnType::Text
                };
                ColumnProfile {
                    name: name.trim().to_string(),
                    dtype,
                    missing,
                }
            })
            .collect()
    }

    /// Deserialize every row into the typed raw struct, keyed by header.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let headers: StringRecord = self.headers.iter().map(str::trim).collect();
        self.rows
            .iter()
            .map(|row| row.deserialize(Some(&headers)).map_err(EdaError::from))
            .collect()
    }
}

pub fn profile_rows(profile: &[ColumnProfile]) -> Vec<ColumnProfileRow> {
    profile
        .iter()
        .map(|p| ColumnProfileRow {
            column: p.name.clone(),
            dtype: p.dtype.as_str().to_string(),
            missing: p.missing,
        })
        .collect()
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Type the sales table and derive `revenue`, `order_year`, `order_month`.
pub fn clean_sales(table: &RecordTable) -> Result<Vec<SalesRecord>> {
    table.require_columns(&SALES_COLUMNS)?;
    let raw: Vec<RawSalesRow> = table.deserialize()?;
    let mut bad_dates = 0usize;
    let mut bad_sales = 0usize;

    let records: Vec<SalesRecord> = raw
        .into_iter()
        .map(|row| {
            let order_date = parse_date_safe(row.order_date.as_deref());
            if order_date.is_none() && row.order_date.is_some() {
                bad_dates += 1;
            }
            let sales = parse_f64_safe(row.sales.as_deref());
            if sales.is_none() && row.sales.is_some() {
                bad_sales += 1;
            }
            SalesRecord {
                order_id: non_blank(row.order_id),
                order_date,
                ship_date: parse_date_safe(row.ship_date.as_deref()),
                sales,
                region: non_blank(row.region),
                product_name: non_blank(row.product_name),
                revenue: sales,
                order_year: order_date.map(|d| d.year()),
                order_month: order_date.map(|d| d.month()),
            }
        })
        .collect();

    if bad_dates > 0 {
        warn!("{} order dates could not be parsed and were left missing", bad_dates);
    }
    let missing_ship = records.iter().filter(|r| r.ship_date.is_none()).count();
    if missing_ship > 0 {
        debug!("{} rows have no usable ship date", missing_ship);
    }
    let dates = records.iter().filter_map(|r| r.order_date);
    if let (Some(first), Some(last)) = (dates.clone().min(), dates.max()) {
        debug!("orders span {} to {}", first, last);
    }
    if bad_sales > 0 {
        warn!("{} sales amounts could not be parsed and were left missing", bad_sales);
    }
    Ok(records)
}

/// Type the catalog table: sentinel-fill the categorical columns, parse
/// `date_added` and derive `year_added`.
pub fn clean_titles(table: &RecordTable) -> Result<Vec<TitleRecord>> {
    table.require_columns(&CATALOG_COLUMNS)?;
    let raw: Vec<RawTitleRow> = table.deserialize()?;
    let mut bad_dates = 0usize;

    let records: Vec<TitleRecord> = raw
        .into_iter()
        .map(|row| {
            let date_added = parse_date_safe(row.date_added.as_deref());
            if date_added.is_none() && row.date_added.is_some() {
                bad_dates += 1;
            }
            TitleRecord {
                show_id: non_blank(row.show_id),
                content_type: non_blank(row.content_type),
                director: or_sentinel(row.director, SENTINEL),
                cast: or_sentinel(row.cast, SENTINEL),
                country: or_sentinel(row.country, SENTINEL),
                date_added,
                release_year: parse_i32_safe(row.release_year.as_deref()),
                rating: or_sentinel(row.rating, SENTINEL),
                duration: non_blank(row.duration),
                listed_in: or_sentinel(row.listed_in, SENTINEL),
                year_added: date_added.map(|d| d.year()),
            }
        })
        .collect();

    if bad_dates > 0 {
        warn!("{} date_added values could not be parsed and were left missing", bad_dates);
    }
    let filled = |field: fn(&TitleRecord) -> &str| {
        records.iter().filter(|r| field(r) == SENTINEL).count()
    };
    debug!(
        "'{}' substituted: director={} cast={} country={} rating={} listed_in={}",
        SENTINEL,
        filled(|r| &r.director),
        filled(|r| &r.cast),
        filled(|r| &r.country),
        filled(|r| &r.rating),
        filled(|r| &r.listed_in),
    );
    if let Some(latest) = records.iter().filter_map(|r| r.date_added).max() {
        debug!("latest title added on {}", latest);
    }
    Ok(records)
}
