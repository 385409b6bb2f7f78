use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Marker that separates the summary from the rest of a post body.
pub const SUMMARY_MARKER: &str = "<!--more-->";

pub fn format_human_date(instant: OffsetDateTime) -> String {
    instant
        .date()
        .format(HUMAN_DATE_FORMAT)
        .unwrap_or_else(|_| instant.date().to_string())
}

/// Markdown source for a post summary.
///
/// Everything before [`SUMMARY_MARKER`] when present, otherwise the first
/// non-empty paragraph.
pub fn summary_source(raw: &str) -> &str {
    if let Some((head, _)) = raw.split_once(SUMMARY_MARKER) {
        return head.trim();
    }

    raw.split("\n\n")
        .map(str::trim)
        .find(|paragraph| !paragraph.is_empty())
        .unwrap_or("")
}
