//! Scanner for a single cell token: `[<row>][<col>]:<value>`.
//!
//! The format is flat and order dependent. The scanner walks the token once:
//!
//! ```text
//! SeekRow --'['--> Row --']'--> SeekCol --'['--> Col --']'--> SeekColon --':'--> value
//! ```
//!
//! Characters between the stages are skipped, so `junk[1]x[2]y:3` scans the
//! same as `[1][2]:3`. Whatever stage the input ends in names the error.

use crate::error::{Result, TokenError};
use crate::format::FrameFormat;

/// Borrowed pieces of a token before numeric conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub row: &'a str,
    pub col: &'a str,
    /// Everything after the first `:` that follows the column.
    pub value: &'a str,
}

/// Decoded value segment of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellValue {
    pub mask: u32,
    /// Present only for [`FrameFormat::Extended`].
    pub distance: Option<u32>,
}

/// One fully decoded token, not yet bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub row: usize,
    pub col: usize,
    pub value: CellValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    SeekRow,
    Row,
    SeekCol,
    Col,
    SeekColon,
}

/// Split a token into its row, column and value text.
pub fn scan_token(token: &str) -> Result<RawToken<'_>> {
    let mut stage = Stage::SeekRow;
    let mut start = 0;
    let mut row = "";
    let mut col = "";

    for (idx, ch) in token.char_indices() {
        match (stage, ch) {
            (Stage::SeekRow, '[') => {
                start = idx + 1;
                stage = Stage::Row;
            }
            (Stage::Row, ']') => {
                row = &token[start..idx];
                stage = Stage::SeekCol;
            }
            (Stage::SeekCol, '[') => {
                start = idx + 1;
                stage = Stage::Col;
            }
            (Stage::Col, ']') => {
                col = &token[start..idx];
                stage = Stage::SeekColon;
            }
            (Stage::SeekColon, ':') => {
                return Ok(RawToken {
                    row,
                    col,
                    value: &token[idx + 1..],
                });
            }
            _ => {}
        }
    }

    Err(match stage {
        Stage::SeekRow => TokenError::MissingBracket("row"),
        Stage::Row => TokenError::UnclosedBracket("row"),
        Stage::SeekCol => TokenError::MissingBracket("column"),
        Stage::Col => TokenError::UnclosedBracket("column"),
        Stage::SeekColon => TokenError::MissingColon,
    })
}

/// Decode the value segment according to the frame format.
///
/// The segment must split on `:` into exactly as many integers as the
/// format expects; anything else is a format mismatch.
pub fn decode_value(segment: &str, format: FrameFormat) -> Result<CellValue> {
    let parts: Vec<&str> = segment.split(':').collect();
    if parts.len() != format.value_count() {
        return Err(TokenError::ValueArity {
            expected: format.value_count(),
            found: parts.len(),
        });
    }

    let mask = parse_number("mask", parts[0])?;
    let distance = match format {
        FrameFormat::Basic => None,
        FrameFormat::Extended => Some(parse_number("distance", parts[1])?),
    };

    Ok(CellValue { mask, distance })
}

/// Scan and decode one token. Bounds are checked by the caller.
pub fn parse_token(token: &str, format: FrameFormat) -> Result<CellUpdate> {
    let raw = scan_token(token)?;
    let row = parse_number("row", raw.row)? as usize;
    let col = parse_number("column", raw.col)? as usize;
    let value = decode_value(raw.value, format)?;
    Ok(CellUpdate { row, col, value })
}

fn parse_number(field: &'static str, text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let invalid = || TokenError::InvalidNumber {
        field,
        text: text.to_string(),
    };

    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    trimmed.parse().map_err(|_| invalid())
}
