//! # Go Template Compatibility
//!
//! Policy documents are commonly written with Go/Helm template paths
//! (`{{ .object.status.replicas }}`). Handlebars addresses the same values
//! without the leading dot, so paths are rewritten before rendering.
//!
//! Only text between `{{` and `}}` is touched, and quoted string literals
//! inside an expression are left as written.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static MUSTACHE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{(.*?)\}\}")
        .expect("Failed to compile mustache pattern - this should never happen")
});

// Double- or single-quoted literal, with backslash escapes
static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#)
        .expect("Failed to compile string literal pattern - this should never happen")
});

// `.field` at the start of an expression, after whitespace, `(` or `~`
static DOT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[\s(~])\.([A-Za-z_])")
        .expect("Failed to compile dot path pattern - this should never happen")
});

// `$.field` refers to the root context in Go templates
static ROOT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\.([A-Za-z_])")
        .expect("Failed to compile root path pattern - this should never happen")
});

// A lone `.` is the current context
static BARE_DOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[\s(~])\.(\s|\)|~|$)")
        .expect("Failed to compile bare dot pattern - this should never happen")
});

/// Rewrite Go-style dot paths into handlebars paths
///
/// `{{ .object.metadata.name }}` becomes `{{ object.metadata.name }}`,
/// `{{ $.object }}` becomes `{{ @root.object }}` and `{{ . }}` becomes
/// `{{ this }}`. Templates already written for handlebars are returned as is.
#[must_use]
pub fn rewrite_go_paths(template: &str) -> Cow<'_, str> {
    if !template.contains("{{") {
        return Cow::Borrowed(template);
    }

    MUSTACHE.replace_all(template, |captures: &Captures<'_>| {
        let expression = &captures[1];
        let mut rewritten = String::with_capacity(expression.len());
        let mut last = 0;
        for literal in STRING_LITERAL.find_iter(expression) {
            rewritten.push_str(&rewrite_code(&expression[last..literal.start()]));
            rewritten.push_str(literal.as_str());
            last = literal.end();
        }
        rewritten.push_str(&rewrite_code(&expression[last..]));
        format!("{{{{{rewritten}}}}}")
    })
}

fn rewrite_code(code: &str) -> String {
    let code = ROOT_PATH.replace_all(code, "@root.$1");
    let code = DOT_PATH.replace_all(&code, "${1}${2}");
    BARE_DOT.replace_all(&code, "${1}this${2}").into_owned()
}
