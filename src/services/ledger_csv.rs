use crate::error::AppError;
use crate::models::{Direction, LedgerRow, Section};
use tracing::{debug, trace, warn};

#[derive(Debug)]
pub struct LedgerParseResult {
    pub rows: Vec<LedgerRow>,
    pub errors: Vec<String>,
}

/// Parses one year's ledger CSV.
///
/// Required columns: `direction`, `section`, `function`, `nature`, `amount`.
/// `label` is optional. Invalid rows are reported in `errors` and skipped.
pub fn parse_ledger_csv(content: &[u8]) -> Result<LedgerParseResult, AppError> {
    trace!(content_size = content.len(), "Starting ledger CSV parsing");

    let content_str =
        std::str::from_utf8(content).map_err(|e| AppError::CsvParse(e.to_string()))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content_str.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::CsvParse(e.to_string()))?
        .clone();

    if headers.is_empty() {
        return Err(AppError::CsvParse("Empty ledger file".into()));
    }

    let direction_col = require_column(&headers, "direction")?;
    let section_col = require_column(&headers, "section")?;
    let function_col = require_column(&headers, "function")?;
    let nature_col = require_column(&headers, "nature")?;
    let amount_col = require_column(&headers, "amount")?;
    let label_col = find_column(&headers, "label");

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row_number = row_idx + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("Row {}: {}", row_number, e));
                continue;
            }
        };

        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let Some(direction) = Direction::parse(field(direction_col)) else {
            errors.push(format!(
                "Row {}: Invalid direction '{}'",
                row_number,
                field(direction_col)
            ));
            continue;
        };

        let Some(section) = Section::parse(field(section_col)) else {
            errors.push(format!(
                "Row {}: Invalid section '{}'",
                row_number,
                field(section_col)
            ));
            continue;
        };

        let Some(function_code) = clean_function_code(field(function_col)) else {
            errors.push(format!(
                "Row {}: Invalid function code '{}'",
                row_number,
                field(function_col)
            ));
            continue;
        };

        let nature_code = field(nature_col).to_string();
        if nature_code.is_empty() {
            errors.push(format!("Row {}: Missing nature code", row_number));
            continue;
        }

        let Some(amount_cents) = parse_amount_cents(field(amount_col)) else {
            errors.push(format!(
                "Row {}: Invalid amount '{}'",
                row_number,
                field(amount_col)
            ));
            continue;
        };

        let label = label_col.map(field).unwrap_or("").to_string();

        rows.push(LedgerRow {
            direction,
            section,
            function_code,
            nature_code,
            amount_cents,
            label,
        });
    }

    if !errors.is_empty() {
        warn!(
            error_count = errors.len(),
            "Ledger CSV parsing completed with errors"
        );
    }
    debug!(
        row_count = rows.len(),
        error_count = errors.len(),
        "Ledger CSV parsing completed"
    );

    Ok(LedgerParseResult { rows, errors })
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn require_column(headers: &csv::StringRecord, name: &str) -> Result<usize, AppError> {
    find_column(headers, name)
        .ok_or_else(|| AppError::CsvParse(format!("No {} column found in CSV", name)))
}

/// Strips the optional `R` rubrique marker and keeps digits only: `R52` → `52`.
fn clean_function_code(code: &str) -> Option<String> {
    let digits = code
        .strip_prefix('R')
        .or_else(|| code.strip_prefix('r'))
        .unwrap_or(code);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(digits.to_string())
}

/// Largest accepted amount magnitude, in cents (10^13 currency units).
const MAX_AMOUNT_CENTS: f64 = 1e15;

/// Parses an amount in currency units into cents, accepting `.` or `,` as
/// decimal separator and ignoring thousands separators.
///
/// Non-finite values and amounts beyond [`MAX_AMOUNT_CENTS`] are rejected.
fn parse_amount_cents(amount: &str) -> Option<i64> {
    let cleaned = clean_amount(amount);
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    let cents = (value * 100.0).round();
    if !cents.is_finite() || cents.abs() > MAX_AMOUNT_CENTS {
        return None;
    }
    Some(cents as i64)
}

fn clean_amount(amount: &str) -> String {
    // If both . and , appear, the last one is the decimal separator.
    // A lone separator repeated several times groups thousands: 1.234.567
    let last_dot = amount.rfind('.');
    let last_comma = amount.rfind(',');

    let decimal_char = match (last_dot, last_comma) {
        (Some(d), Some(c)) => {
            if d > c {
                Some('.')
            } else {
                Some(',')
            }
        }
        (Some(_), None) if amount.matches('.').count() == 1 => Some('.'),
        (None, Some(_)) if amount.matches(',').count() == 1 => Some(','),
        _ => None,
    };

    let mut result = String::new();
    let mut has_decimal = false;

    for c in amount.chars() {
        if c.is_ascii_digit() {
            result.push(c);
        } else if Some(c) == decimal_char && !has_decimal {
            result.push('.');
            has_decimal = true;
        } else if c == '-' && result.is_empty() {
            result.push(c);
        }
    }

    result
}
