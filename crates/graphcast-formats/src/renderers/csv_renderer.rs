use std::io::Write;

use graphcast_types::{Primitive, PrimitiveMap};

use crate::error::{RenderError, RenderResult};
use crate::renderers::{RenderOptions, Renderer};

/// CSV renderer
///
/// Accepts a sequence of mappings (one row each) or a single mapping (one
/// row). Columns come from the keys of the first row; later rows are written
/// in that column order, with an empty cell for a missing key. A later row
/// carrying a key outside the header is rejected. Nested values are written
/// as compact JSON.
#[derive(Debug, Clone)]
pub struct CSVRenderer {
	/// CSV delimiter (default: ',')
	pub delimiter: u8,
	/// Include headers in output
	pub headers: bool,
}

impl Default for CSVRenderer {
	fn default() -> Self {
		Self {
			delimiter: b',',
			headers: true,
		}
	}
}

impl CSVRenderer {
	/// Creates a new CSV renderer
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_formats::renderers::csv_renderer::CSVRenderer;
	///
	/// let renderer = CSVRenderer::new();
	/// assert_eq!(renderer.delimiter, b',');
	/// assert!(renderer.headers);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the delimiter character
	///
	/// # Examples
	///
	/// ```
	/// use graphcast_formats::renderers::csv_renderer::CSVRenderer;
	///
	/// let renderer = CSVRenderer::new().delimiter(b';');
	/// assert_eq!(renderer.delimiter, b';');
	/// ```
	pub fn delimiter(mut self, delimiter: u8) -> Self {
		self.delimiter = delimiter;
		self
	}

	/// Sets whether to include headers
	pub fn headers(mut self, headers: bool) -> Self {
		self.headers = headers;
		self
	}
}

fn cell(value: Primitive) -> RenderResult<String> {
	match value {
		Primitive::Scalar(scalar) => Ok(scalar.to_string()),
		nested => Ok(nested.into_json()?.to_string()),
	}
}

/// Writes one row in the column order fixed by the first row.
fn write_row<W: Write>(
	wtr: &mut csv::Writer<W>,
	columns: &mut Option<Vec<String>>,
	mut row: PrimitiveMap,
	write_headers: bool,
) -> RenderResult<()> {
	if columns.is_none() {
		let header: Vec<String> = row.keys().map(str::to_string).collect();
		if write_headers {
			wtr.write_record(&header)?;
		}
		*columns = Some(header);
	}

	let columns: &[String] = columns.as_deref().unwrap_or_default();
	let mut values = Vec::with_capacity(columns.len());
	for column in columns {
		match row.take(column) {
			Some(value) => values.push(cell(value)?),
			None => values.push(String::new()),
		}
	}

	if let Some(extra) = row.keys().next() {
		return Err(RenderError::Unsupported {
			format: "csv",
			reason: format!("column '{}' missing from the header row", extra),
		});
	}

	wtr.write_record(&values)?;
	Ok(())
}

impl Renderer for CSVRenderer {
	fn format(&self) -> &str {
		"csv"
	}

	fn media_type(&self) -> &str {
		"text/csv; charset=utf-8"
	}

	fn render(
		&self,
		data: Primitive,
		out: &mut dyn Write,
		_options: &RenderOptions,
	) -> RenderResult<()> {
		let mut wtr = csv::WriterBuilder::new()
			.delimiter(self.delimiter)
			.has_headers(false)
			.from_writer(out);

		let mut columns = None;

		match data {
			Primitive::Sequence(rows) => {
				for row in rows {
					match row? {
						Primitive::Mapping(map) => {
							write_row(&mut wtr, &mut columns, map, self.headers)?
						}
						_ => {
							return Err(RenderError::Unsupported {
								format: "csv",
								reason: "sequence elements that are not mappings".to_string(),
							});
						}
					}
				}
			}
			Primitive::Mapping(map) => write_row(&mut wtr, &mut columns, map, self.headers)?,
			Primitive::Scalar(_) => {
				return Err(RenderError::Unsupported {
					format: "csv",
					reason: "a bare scalar".to_string(),
				});
			}
		}

		wtr.flush()?;
		Ok(())
	}
}
