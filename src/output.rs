use crate::aggregate::Aggregate;
use crate::error::Result;
use crate::types::AggregateRow;
use crate::util::format_number;
use log::info;
use serde::Serialize;
use std::fmt::Display;
use std::hash::Hash;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Create the output directory (and parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Write a text document, replacing whatever was there.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)?;
    info!("wrote {}", path.display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Console rows for an aggregate, values rendered with `decimals` places.
pub fn aggregate_rows<K>(agg: &Aggregate<K>, decimals: usize) -> Vec<AggregateRow>
where
    K: Eq + Hash + Clone + Display,
{
    agg.iter()
        .map(|(k, v)| AggregateRow {
            key: k.to_string(),
            value: format_number(*v, decimals),
        })
        .collect()
}

pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("\n{}:", title);
    preview_table_rows(rows, max_rows);
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("outputs").join("nested");
        ensure_dir(&out).expect("first");
        ensure_dir(&out).expect("second");
        assert!(out.is_dir());
    }

    #[test]
    fn write_text_overwrites_previous_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("summary.txt");
        write_text(&path, "a much longer first version\n").expect("first");
        write_text(&path, "short\n").expect("second");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "short\n");
    }

    #[test]
    fn aggregate_rows_keep_order_and_format() {
        let agg = Aggregate::from_entries(vec![("West", 1234.5), ("East", 15.0)]);
        let rows = aggregate_rows(&agg, 2);
        assert_eq!(rows[0].key, "West");
        assert_eq!(rows[0].value, "1,234.50");
        assert_eq!(rows[1].value, "15.00");
    }
}
