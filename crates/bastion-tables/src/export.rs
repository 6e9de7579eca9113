//! Local CSV export of the rows a table currently shows

use crate::error::{TableError, TableResult};
use bastion_types::{ColumnSpec, TableRecord};
use bytes::Bytes;
use csv::Writer;

/// Writes table rows as CSV using column labels as headers
///
/// Cells go through each column's renderer, so the file matches what the table shows.
pub struct CsvExporter<'a, T> {
	columns: &'a [ColumnSpec<T>],
}

impl<'a, T: TableRecord> CsvExporter<'a, T> {
	/// Exporter over `columns`
	pub fn new(columns: &'a [ColumnSpec<T>]) -> Self {
		Self { columns }
	}

	/// Header row
	pub fn headers(&self) -> Vec<&str> {
		self.columns.iter().map(|column| column.label.as_str()).collect()
	}

	/// Serialize `records` to CSV bytes
	pub fn export(&self, records: &[T]) -> TableResult<Bytes> {
		let mut writer = Writer::from_writer(Vec::new());
		writer
			.write_record(self.headers())
			.map_err(|e| TableError::Export(format!("Failed to write CSV header: {}", e)))?;
		for record in records {
			let row: Vec<String> = self
				.columns
				.iter()
				.map(|column| column.display(record))
				.collect();
			writer
				.write_record(&row)
				.map_err(|e| TableError::Export(format!("Failed to write CSV row: {}", e)))?;
		}
		writer
			.flush()
			.map_err(|e| TableError::Export(format!("Failed to flush CSV writer: {}", e)))?;
		let data = writer
			.into_inner()
			.map_err(|e| TableError::Export(format!("Failed to get CSV output: {}", e)))?;
		Ok(Bytes::from(data))
	}
}
