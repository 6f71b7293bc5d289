//! JavaScript evaluation scripts
//!
//! Scripts that take a selector embed it as a JSON string literal so quotes
//! and backslashes in selectors cannot break out of the expression.

/// Snapshot of where the page is and how far it got loading
pub const PAGE_DIAGNOSTICS_SCRIPT: &str = r#"
    (() => ({
        url: window.location.href,
        readyState: document.readyState,
        title: document.title || null
    }))()
"#;

fn selector_literal(selector: &str) -> String {
    serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string())
}

/// Count elements matching a selector
#[must_use]
pub fn count_script(selector: &str) -> String {
    format!(
        "(() => document.querySelectorAll({}).length)()",
        selector_literal(selector)
    )
}

/// Text of the first element matching a selector, or `null`
///
/// Script elements report `textContent`; rendered elements prefer
/// `innerText` so hidden children do not leak into the result.
#[must_use]
pub fn read_text_script(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector({});
            if (!el) return null;
            if (el.tagName === 'SCRIPT') return el.textContent;
            return el.innerText || el.textContent;
        }})()"#,
        selector_literal(selector)
    )
}

/// Whether an element matching a selector exists
#[must_use]
pub fn exists_script(selector: &str) -> String {
    format!(
        "(() => document.querySelector({}) !== null)()",
        selector_literal(selector)
    )
}
