// Run configuration. There is no CLI or config file: `main` uses the
// defaults below and tests point them at temporary directories.
use plotters::style::RGBColor;
use std::path::PathBuf;

/// Where a report reads from and writes to.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub summary_file: String,
    pub json_file: String,
    pub style: ChartStyle,
}

impl ReportConfig {
    pub fn sales() -> Self {
        Self {
            input: PathBuf::from("sales_data.csv"),
            output_dir: PathBuf::from("outputs"),
            summary_file: "superstore_sales_summary.txt".to_string(),
            json_file: "superstore_sales_summary.json".to_string(),
            style: ChartStyle::default(),
        }
    }

    pub fn catalog() -> Self {
        Self {
            input: PathBuf::from("dataset.csv"),
            output_dir: PathBuf::from("outputs"),
            summary_file: "netflix_eda_summary.txt".to_string(),
            json_file: "netflix_eda_summary.json".to_string(),
            style: ChartStyle::default(),
        }
    }

    #[cfg(test)]
    pub fn with_paths(
        mut self,
        input: impl AsRef<std::path::Path>,
        output_dir: impl AsRef<std::path::Path>,
    ) -> Self {
        self.input = input.as_ref().to_path_buf();
        self.output_dir = output_dir.as_ref().to_path_buf();
        self
    }

    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }
}

/// Visual settings handed to every chart. Each report owns its copy, so
/// two reports in one process never share plot state.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub size: (u32, u32),
    pub font: &'static str,
    pub caption_size: u32,
    pub label_size: u32,
    pub margin: u32,
    pub background: RGBColor,
    pub grid: RGBColor,
    pub bar: RGBColor,
    pub line: RGBColor,
    pub density: RGBColor,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            size: (800, 500),
            font: "sans-serif",
            caption_size: 24,
            label_size: 14,
            margin: 16,
            background: RGBColor(255, 255, 255),
            grid: RGBColor(234, 234, 242),
            bar: RGBColor(76, 114, 176),
            line: RGBColor(76, 114, 176),
            density: RGBColor(221, 132, 82),
        }
    }
}

/// Fixed title/labels/size for one chart file.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub file: &'static str,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub size: Option<(u32, u32)>,
}

impl ChartSpec {
    pub const fn new(
        file: &'static str,
        title: &'static str,
        x_label: &'static str,
        y_label: &'static str,
    ) -> Self {
        Self {
            file,
            title,
            x_label,
            y_label,
            size: None,
        }
    }

    pub const fn sized(self, width: u32, height: u32) -> Self {
        Self {
            size: Some((width, height)),
            ..self
        }
    }
}
