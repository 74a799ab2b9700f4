//! JQL construction for review issue searches.

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;

/// Builds the search for review issues of a page, newest first.
///
/// The title is used as a text search (`~`), so the result may include issues
/// of other pages with similar titles. Callers must still compare summaries
/// exactly. Quotes and backslashes are escaped so the title cannot end the
/// string literal early.
///
/// # Examples
///
/// ```
/// use page_approvals_core::query::build_search_jql;
///
/// assert_eq!(
///     build_search_jql("DOC", "Launch Plan"),
///     r#"project = "DOC" AND summary ~ "Launch Plan" ORDER BY createdDate DESC"#
/// );
/// ```
pub fn build_search_jql(project_key: &str, title: &str) -> String {
    format!(
        "project = \"{}\" AND summary ~ \"{}\" ORDER BY createdDate DESC",
        escape_jql_string(project_key),
        escape_jql_string(title)
    )
}

fn escape_jql_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
