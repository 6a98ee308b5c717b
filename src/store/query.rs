use std::cmp::Ordering;

use super::models::Note;

/// Page/limit window over an owner's notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Builds a window from raw query-string values. Missing, unparsable or
    /// non-positive values fall back to page 1 and `default_limit`; the limit
    /// is capped at `max_limit`.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, default_limit: u32, max_limit: u32) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let requested = parse_positive(limit).unwrap_or(default_limit);

        let limit = if requested > max_limit {
            tracing::warn!("Limit {} exceeds max {}, capping to max", requested, max_limit);
            max_limit
        } else {
            requested
        };

        Self { page, limit: limit.max(1) }
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        let limit = i64::from(self.limit);
        (total + limit - 1) / limit
    }

    /// Slices an already ordered set the same way OFFSET/LIMIT would.
    pub fn window<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        items.iter().skip(start).take(self.limit as usize).cloned().collect()
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).filter(|n| *n >= 1)
}

/// Case-insensitive literal substring matched against title, content and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    /// Returns `None` for empty or whitespace-only input, which means "no filter".
    /// Otherwise the input is kept as typed, surrounding spaces included.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self {
                needle: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, note: &Note) -> bool {
        let needle = self.needle.to_lowercase();
        note.title.to_lowercase().contains(&needle)
            || note.content.to_lowercase().contains(&needle)
            || note.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    /// `%needle%` with LIKE metacharacters escaped by backslash.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.needle.len() + 2);
        pattern.push('%');
        for c in self.needle.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

#[derive(Debug, Clone)]
pub struct NoteQuery {
    pub page: PageRequest,
    pub search: Option<SearchTerm>,
}

#[derive(Debug, Clone)]
pub struct NotePage {
    pub notes: Vec<Note>,
    pub total: i64,
}

/// Listing order: pinned first, newest first, then id descending.
pub fn listing_order(a: &Note, b: &Note) -> Ordering {
    b.is_pinned
        .cmp(&a.is_pinned)
        .then_with(|| b.created_on.cmp(&a.created_on))
        .then_with(|| b.id.cmp(&a.id))
}
