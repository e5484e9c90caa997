use crate::error::ValidationError;

pub const MAX_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u64,
}

/// Trims `raw` and lower-cases it. Only ASCII letters, digits and `-` are accepted.
pub fn validate_entry_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ValidationError::InvalidNameFormat(trimmed.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Clamps `limit` into `[1, MAX_LIMIT]` and `offset` to non-negative. Never fails.
pub fn validate_pagination(limit: i64, offset: i64) -> Pagination {
    Pagination {
        limit: limit.clamp(1, MAX_LIMIT as i64) as u32,
        offset: offset.max(0) as u64,
    }
}
