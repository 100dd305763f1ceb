// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::crawl::CategoryReport;
use crate::domain::models::product::{ProductRecord, NOT_AVAILABLE};

const RECORD_HEADER: [&str; 4] = ["url", "product_name", "price", "currency"];
const CATEGORY_HEADER: [&str; 2] = ["category_url", "product_url"];

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV错误
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// JSON错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// 补全输出文件扩展名
pub fn output_path(name: &str, format: ExportFormat) -> PathBuf {
    let path = PathBuf::from(name);
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()));
    if has_extension {
        path
    } else {
        PathBuf::from(format!("{}.{}", name, format.extension()))
    }
}

/// 写出商品详情记录
pub fn write_records<W: Write>(
    writer: W,
    records: &[ProductRecord],
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            csv_writer.write_record(RECORD_HEADER)?;
            for record in records {
                csv_writer.write_record([
                    record.url.as_deref().unwrap_or(NOT_AVAILABLE),
                    record.product_name.as_str(),
                    record.price.as_str(),
                    record.currency.as_str(),
                ])?;
            }
            csv_writer.flush()?;
        }
        ExportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// 写出类目商品URL，每行标注所属类目
pub fn write_category_csv<W: Write>(writer: W, reports: &[CategoryReport]) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CATEGORY_HEADER)?;

    let mut rows = 0;
    for report in reports {
        for product in &report.products {
            csv_writer.write_record([report.category_url.as_str(), product.url.as_str()])?;
            rows += 1;
        }
    }
    csv_writer.flush()?;
    Ok(rows)
}

/// 保存商品详情记录到文件
pub fn save_records(
    path: &Path,
    records: &[ProductRecord],
    format: ExportFormat,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_records(BufWriter::new(file), records, format)
}

/// 保存类目商品URL到CSV文件
pub fn save_category_csv(path: &Path, reports: &[CategoryReport]) -> Result<usize, ExportError> {
    let file = File::create(path)?;
    write_category_csv(BufWriter::new(file), reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::crawl::TerminationReason;
    use crate::domain::models::product::ProductRef;

    fn records() -> Vec<ProductRecord> {
        vec![
            ProductRecord::extracted(
                "https://www.amazon.com/dp/B000000001",
                Some("Kettle, 1.7L".to_string()),
                Some("$24.99".to_string()),
                Some("$".to_string()),
            ),
            ProductRecord::failed("https://www.amazon.com/dp/B000000002", "CAPTCHA detected"),
        ]
    }

    #[test]
    fn test_output_path_appends_extension() {
        assert_eq!(
            output_path("products", ExportFormat::Csv),
            PathBuf::from("products.csv")
        );
        assert_eq!(
            output_path("products.json", ExportFormat::Json),
            PathBuf::from("products.json")
        );
    }

    #[test]
    fn test_csv_records_have_fixed_columns() {
        let mut buffer = Vec::new();
        write_records(&mut buffer, &records(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "url,product_name,price,currency");
        assert_eq!(
            lines[1],
            "https://www.amazon.com/dp/B000000001,\"Kettle, 1.7L\",$24.99,$"
        );
        assert_eq!(lines[2], "https://www.amazon.com/dp/B000000002,N/A,N/A,N/A");
    }

    #[test]
    fn test_json_records_keep_error_field() {
        let mut buffer = Vec::new();
        write_records(&mut buffer, &records(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value[0]["product_name"], "Kettle, 1.7L");
        assert!(value[0].get("error").is_none());
        assert_eq!(value[1]["error"], "CAPTCHA detected");
    }

    #[test]
    fn test_category_csv_rows() {
        let reports = vec![CategoryReport {
            category_url: "https://www.amazon.com/s?k=kettle".to_string(),
            products: vec![
                ProductRef::new("https://www.amazon.com/dp/B000000001", None),
                ProductRef::new("https://www.amazon.com/dp/B000000002", None),
            ],
            pages_visited: 1,
            termination: TerminationReason::Exhausted,
        }];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.csv");
        let rows = save_category_csv(&path, &reports).unwrap();

        assert_eq!(rows, 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("category_url,product_url"));
        assert!(text.contains("https://www.amazon.com/s?k=kettle,https://www.amazon.com/dp/B000000002"));
    }
}
