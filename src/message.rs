//! Diagnostic message builder.
//!
//! Templates mark each inspected value with `?`; `\?` is a literal question
//! mark. Brackets belong to the template (`<?> expected to be nil.`), so
//! parameters are spliced exactly as rendered. [`Literal`] splices text
//! without inspecting it, for diffs, operator words and backtraces.

use crate::value::Inspect;

/// Text spliced into a template verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal(pub String);

impl Literal {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl Inspect for Literal {
    fn inspect(&self) -> String {
        self.0.clone()
    }
}

/// Substitutes `params` for the `?` placeholders of `template`, left to
/// right. Surplus placeholders stay as `?`.
pub fn fill(template: &str, params: &[&dyn Inspect]) -> String {
    let mut params = params.iter();
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'?') => {
                chars.next();
                out.push('?');
            }
            '?' => match params.next() {
                Some(param) => out.push_str(&param.inspect()),
                None => out.push('?'),
            },
            c => out.push(c),
        }
    }
    out
}

/// Ends `text` with a period unless it already does.
pub fn add_period(text: &str) -> String {
    if text.ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

/// Joins the user's message (with a trailing period) and the generated
/// text with a newline. Either part may be absent.
pub fn compose(head: Option<&str>, body: &str) -> String {
    let head = head.filter(|h| !h.is_empty()).map(add_period);
    match (head, body.is_empty()) {
        (Some(head), true) => head,
        (Some(head), false) => format!("{head}\n{body}"),
        (None, _) => body.to_string(),
    }
}

/// `compose(head, fill(template, params))`.
pub fn build(head: Option<&str>, template: &str, params: &[&dyn Inspect]) -> String {
    compose(head, &fill(template, params))
}
