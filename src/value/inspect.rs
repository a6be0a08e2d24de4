//! The representer: stable, inspectable text for every value.
//!
//! All failure messages embed values through [`Inspect`], so its output is
//! part of the public contract and must stay byte-for-byte deterministic.

use std::fmt::Write as _;

use super::Value;

/// Produces the textual form of a value used in diagnostics.
pub trait Inspect {
    fn inspect(&self) -> String;
}

impl<T: Inspect + ?Sized> Inspect for &T {
    fn inspect(&self) -> String {
        (**self).inspect()
    }
}

impl Inspect for str {
    fn inspect(&self) -> String {
        inspect_str(self)
    }
}

impl Inspect for String {
    fn inspect(&self) -> String {
        inspect_str(self)
    }
}

impl Inspect for Value {
    fn inspect(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(f) => inspect_float(*f),
            Value::String(s) => inspect_str(s),
            Value::Symbol(s) => inspect_symbol(s.name()),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Inspect::inspect).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Map(map) => {
                let parts: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}=>{}", inspect_str(k), v.inspect()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Regex(p) => format!("/{}/", escape_slashes(p.source())),
            Value::Object(obj) => {
                // A failing or non-string `inspect` falls back to the default form.
                match obj.method("inspect").map(|m| m.call(self, &[])) {
                    Some(Ok(Value::String(s))) => s.to_string(),
                    Some(Ok(other)) if !matches!(other, Value::Object(_)) => other.inspect(),
                    _ => obj.default_inspect(),
                }
            }
            Value::Exception(e) => {
                if e.message().is_empty() {
                    e.kind().name().to_string()
                } else {
                    format!("#<{}: {}>", e.kind().name(), e.message())
                }
            }
        }
    }
}

/// Double-quoted string with escapes for quotes, backslashes, control
/// characters and `#` before an interpolation sigil.
pub fn inspect_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '\x0b' => out.push_str("\\v"),
            '\x08' => out.push_str("\\b"),
            '\x07' => out.push_str("\\a"),
            '\x1b' => out.push_str("\\e"),
            '#' if matches!(chars.peek(), Some('{' | '$' | '@')) => out.push_str("\\#"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Floats always carry a fractional part; very large and very small
/// magnitudes switch to exponent notation (`1.0e+20`).
pub fn inspect_float(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{f:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let mantissa = if mantissa.contains('.') {
            mantissa.to_string()
        } else {
            format!("{mantissa}.0")
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }
    format!("{f:?}")
}

const OPERATOR_SYMBOLS: &[&str] = &[
    "==", "===", "!=", "=~", "!~", "<", "<=", ">", ">=", "<=>", "+", "-", "*", "/", "%", "**",
    "!", "~", "&", "|", "^", "<<", ">>", "[]", "[]=", "+@", "-@",
];

/// `:name` for identifier-like and operator names, `:"..."` otherwise.
pub fn inspect_symbol(name: &str) -> String {
    if is_plain_symbol(name) {
        format!(":{name}")
    } else {
        format!(":{}", inspect_str(name))
    }
}

fn is_plain_symbol(name: &str) -> bool {
    if OPERATOR_SYMBOLS.contains(&name) {
        return true;
    }
    let body = name
        .strip_suffix(['?', '!', '='])
        .unwrap_or(name);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn escape_slashes(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut escaped = false;
    for c in source.chars() {
        if c == '/' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Pattern;

    #[test]
    fn test_string_escapes() {
        assert_eq!(inspect_str("string1"), "\"string1\"");
        assert_eq!(inspect_str("a\nb"), "\"a\\nb\"");
        assert_eq!(inspect_str("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(inspect_str("#{x}"), "\"\\#{x}\"");
        assert_eq!(inspect_str("#1"), "\"#1\"");
        assert_eq!(inspect_str("\u{1}"), "\"\\x01\"");
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(inspect_float(0.5), "0.5");
        assert_eq!(inspect_float(-0.1), "-0.1");
        assert_eq!(inspect_float(0.0), "0.0");
        assert_eq!(inspect_float(10.0), "10.0");
        assert_eq!(inspect_float(1e20), "1.0e+20");
        assert_eq!(inspect_float(1.5e-5), "1.5e-05");
        assert_eq!(inspect_float(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_symbol_forms() {
        assert_eq!(inspect_symbol("thing"), ":thing");
        assert_eq!(inspect_symbol("empty?"), ":empty?");
        assert_eq!(inspect_symbol("=="), ":==");
        assert_eq!(inspect_symbol("two words"), ":\"two words\"");
    }

    #[test]
    fn test_collections() {
        let list = Value::list(vec![Value::from(false), Value::from("bogus")]);
        assert_eq!(list.inspect(), "[false, \"bogus\"]");
        let map = Value::map([("b", 2), ("a", 1)]);
        assert_eq!(map.inspect(), "{\"a\"=>1, \"b\"=>2}");
        assert_eq!(Value::list(Vec::<Value>::new()).inspect(), "[]");
    }

    #[test]
    fn test_regex_source_is_slash_delimited() {
        let p = Pattern::new("strin.").unwrap();
        assert_eq!(Value::from(p).inspect(), "/strin./");
        let p = Pattern::new("a/b").unwrap();
        assert_eq!(Value::from(p).inspect(), "/a\\/b/");
        let p = Pattern::escaped("strin.").unwrap();
        assert_eq!(Value::from(p).inspect(), "/strin\\./");
    }
}
