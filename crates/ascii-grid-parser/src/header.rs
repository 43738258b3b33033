//! The six-line ASCII-grid header.

use crate::error::{AsciiGridError, AsciiGridResult};
use raster_grid::{CellSize, GridParams};

/// Header keywords, in the order they must appear.
pub const HEADER_KEYWORDS: [&str; 6] = [
    "NCOLS",
    "NROWS",
    "XLLCORNER",
    "YLLCORNER",
    "CELLSIZE",
    "NODATA_VALUE",
];

/// Number of header lines before the data block.
pub const HEADER_LINES: usize = HEADER_KEYWORDS.len();

/// Parsed ASCII-grid header.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiGridHeader {
    pub n_cols: usize,
    pub n_rows: usize,
    pub xll_corner: f64,
    pub yll_corner: f64,
    pub cell_size: f64,
    pub nodata_value: f64,
}

impl AsciiGridHeader {
    /// Parse the header from the first six lines.
    ///
    /// Keywords are matched case-insensitively and must appear in the
    /// canonical order.
    pub fn parse(lines: &[&str]) -> AsciiGridResult<Self> {
        let mut values = [""; HEADER_LINES];
        for (line_number, &expected) in HEADER_KEYWORDS.iter().enumerate() {
            let line = lines.get(line_number).copied().unwrap_or("");
            let mut tokens = line.split_whitespace();
            let keyword_matches = tokens
                .next()
                .map_or(false, |keyword| keyword.eq_ignore_ascii_case(expected));
            let value = tokens.next();

            match (keyword_matches, value) {
                (true, Some(value)) => values[line_number] = value,
                _ => {
                    return Err(AsciiGridError::InvalidHeader {
                        expected,
                        line: line.to_string(),
                        line_number,
                    })
                }
            }
        }

        let n_cols: usize = parse_number(values[0], 0)?;
        let n_rows: usize = parse_number(values[1], 1)?;
        if n_cols.checked_mul(n_rows).is_none() {
            return Err(AsciiGridError::InvalidHeader {
                expected: "NROWS",
                line: lines[1].to_string(),
                line_number: 1,
            });
        }

        Ok(Self {
            n_cols,
            n_rows,
            xll_corner: parse_number(values[2], 2)?,
            yll_corner: parse_number(values[3], 3)?,
            cell_size: parse_number(values[4], 4)?,
            nodata_value: parse_number(values[5], 5)?,
        })
    }

    /// Total number of values the data block must hold.
    pub fn num_cells(&self) -> usize {
        self.n_cols.saturating_mul(self.n_rows)
    }

    /// Grid metadata (square cells, geographic unless a projection is set).
    pub fn to_params(&self) -> GridParams {
        GridParams::new(
            CellSize::square(self.cell_size),
            self.n_cols,
            self.n_rows,
            self.xll_corner,
            self.yll_corner,
        )
    }
}

pub(crate) fn parse_number<T: std::str::FromStr>(token: &str, line_number: usize) -> AsciiGridResult<T> {
    token.parse().map_err(|_| AsciiGridError::InvalidNumber {
        token: token.to_string(),
        line_number,
    })
}
