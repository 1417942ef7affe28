//! Spreadsheet column labels ↔ 1-based column indices (bijective base-26)

use crate::error::{HarvestError, HarvestResult};

/// Trim and upper-case a label, rejecting anything that is not A-Z
pub fn normalize_column(label: &str) -> HarvestResult<String> {
    let normalized = label.trim().to_ascii_uppercase();

    if normalized.is_empty() {
        return Err(invalid(label, "label is empty"));
    }
    if let Some(bad) = normalized.chars().find(|c| !c.is_ascii_uppercase()) {
        return Err(invalid(label, &format!("'{}' is not a letter A-Z", bad)));
    }

    Ok(normalized)
}

/// Convert a column label to its 1-based index
///
/// Examples:
/// - A → 1
/// - Z → 26
/// - AA → 27
/// - AB → 28
pub fn column_to_index(label: &str) -> HarvestResult<usize> {
    let normalized = normalize_column(label)?;

    normalized.bytes().try_fold(0usize, |acc, b| {
        acc.checked_mul(26)
            .and_then(|v| v.checked_add((b - b'A' + 1) as usize))
            .ok_or_else(|| invalid(label, "label is too long"))
    })
}

/// Convert a 1-based column index back to its label
///
/// Examples:
/// - 1 → A
/// - 26 → Z
/// - 27 → AA
/// - 702 → ZZ
pub fn index_to_column(index: usize) -> HarvestResult<String> {
    if index == 0 {
        return Err(invalid("0", "column indices start at 1"));
    }

    let mut letters = Vec::new();
    let mut n = index;
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();

    Ok(letters.into_iter().map(char::from).collect())
}

fn invalid(label: &str, reason: &str) -> HarvestError {
    HarvestError::InvalidColumnLabel {
        label: label.to_string(),
        reason: reason.to_string(),
    }
}
