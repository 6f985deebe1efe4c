use crate::grafana::alert::ParamValue;
use std::collections::BTreeMap;
use std::fmt::{self, Write};

const INDENT: usize = 2;

/// A value in the generated document. Everything on the right-hand side of an
/// attribute goes through here, so quoting and layout live in one place.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Bool(bool),
    Number(serde_json::Number),
    List(Vec<Literal>),
    Object(Vec<(String, Literal)>),
}

/// How object entries are written.
///
/// `Hcl` is used for native map attributes (`"key" = "value"`, one per line),
/// `Json` inside `jsonencode(...)` (`"key": value`, comma separated).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Hcl,
    Json,
}

impl Style {
    fn assign(self) -> &'static str {
        match self {
            Style::Hcl => " = ",
            Style::Json => ": ",
        }
    }

    fn entry_terminator(self) -> &'static str {
        match self {
            Style::Hcl => "",
            Style::Json => ",",
        }
    }
}

impl Literal {
    pub fn string(value: impl Into<String>) -> Self {
        Literal::String(value.into())
    }

    pub fn integer(value: i64) -> Self {
        Literal::Number(value.into())
    }

    /// A list of strings
    pub fn strings<'a>(values: impl IntoIterator<Item = &'a String>) -> Self {
        Literal::List(values.into_iter().map(Literal::string).collect())
    }

    /// An object of string values, in key order
    pub fn map(entries: &BTreeMap<String, String>) -> Self {
        Literal::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), Literal::string(value)))
                .collect(),
        )
    }

    fn is_scalar(&self) -> bool {
        !matches!(self, Literal::List(_) | Literal::Object(_))
    }

    /// Write the literal as it appears after `indent` columns of leading whitespace.
    /// Nested lines are indented relative to it.
    pub fn write_to<W: Write>(&self, out: &mut W, style: Style, indent: usize) -> fmt::Result {
        match self {
            Literal::String(value) => out.write_str(&quote(value)),
            Literal::Bool(value) => write!(out, "{}", value),
            Literal::Number(value) => write!(out, "{}", value),
            Literal::List(items) if items.is_empty() => out.write_str("[]"),
            Literal::List(items) if items.iter().all(Literal::is_scalar) => {
                out.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    item.write_to(out, style, indent)?;
                }
                out.write_char(']')
            }
            Literal::List(items) => {
                out.write_str("[\n")?;
                for (i, item) in items.iter().enumerate() {
                    write!(out, "{:width$}", "", width = indent + INDENT)?;
                    item.write_to(out, style, indent + INDENT)?;
                    if i + 1 < items.len() {
                        out.write_char(',')?;
                    }
                    out.write_char('\n')?;
                }
                write!(out, "{:width$}]", "", width = indent)
            }
            Literal::Object(entries) if entries.is_empty() => out.write_str("{}"),
            Literal::Object(entries) => {
                out.write_str("{\n")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    write!(
                        out,
                        "{:width$}{}{}",
                        "",
                        quote(key),
                        style.assign(),
                        width = indent + INDENT
                    )?;
                    value.write_to(out, style, indent + INDENT)?;
                    if i + 1 < entries.len() {
                        out.write_str(style.entry_terminator())?;
                    }
                    out.write_char('\n')?;
                }
                write!(out, "{:width$}}}", "", width = indent)
            }
        }
    }
}

impl From<&ParamValue> for Literal {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Bool(value) => Literal::Bool(*value),
            ParamValue::Number(value) => Literal::Number(value.clone()),
            ParamValue::String(value) => Literal::string(value),
        }
    }
}

/// Collects the entries of an object, skipping optional strings that are empty
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    entries: Vec<(String, Literal)>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: Literal) -> Self {
        self.entries.push((key.to_string(), value));
        self
    }

    pub fn optional(self, key: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.field(key, Literal::string(value))
        }
    }

    pub fn build(self) -> Literal {
        Literal::Object(self.entries)
    }
}

/// Quote a string, escaping anything that would end the literal early or be
/// read as a template sequence.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }

    out.push('"');
    out
}

/// Derive a resource name from a display name: lower-cased, spaces become underscores.
///
/// The result is used both as a block label and bare in references, so any other
/// character that is not valid in an identifier also becomes an underscore, and a
/// leading digit gets an underscore prefix.
pub fn resource_name(display_name: &str) -> String {
    let mut name: String = display_name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            c if c.is_alphanumeric() || c == '_' || c == '-' => c,
            _ => '_',
        })
        .collect();

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    name
}
