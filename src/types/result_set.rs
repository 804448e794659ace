//! Rows returned by an executed statement.
//!
//! The shape of a row is whatever the statement projects, so values are kept
//! dynamically typed, mirroring SQLite's storage classes.

use rusqlite::types::ValueRef;
use serde::Serialize;
use std::fmt;

/// Single column value (SQLite storage class).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit float
    Real(f64),
    /// UTF-8 text (invalid sequences replaced)
    Text(String),
    /// Raw bytes
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl Value {
    /// Plain rendering used for CSV cells (no quoting, NULL as empty).
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Real(f) => format!("{:?}", f),
            Value::Text(s) => s.clone(),
            Value::Blob(b) => b.iter().map(|byte| format!("{:02x}", byte)).collect(),
        }
    }
}

/// Single quotes unless only double quotes avoid escaping.
fn quote_for(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double {
        '"'
    } else {
        '\''
    }
}

/// Float literal with a signed, two-digit-minimum exponent: `1e+16`, `1.5e-07`.
fn fmt_real(f: &mut fmt::Formatter<'_>, r: f64) -> fmt::Result {
    if r.is_nan() {
        return write!(f, "nan");
    }
    // `{:?}` already switches to exponent form below 1e-4 and from 1e16 up.
    let debug = format!("{:?}", r);
    match debug.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => write!(f, "{}", debug),
    }
}

/// Tuple-literal rendering: strings quoted, NULL as `None`, floats keep their `.0`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => fmt_real(f, *r),
            Value::Text(s) => {
                let quote = quote_for(s.contains('\''), s.contains('"'));
                write!(f, "{}", quote)?;
                for c in s.chars() {
                    match c {
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\r' => write!(f, "\\r")?,
                        '\t' => write!(f, "\\t")?,
                        c if c == quote => write!(f, "\\{}", c)?,
                        c if c.is_control() || (c.is_whitespace() && c != ' ') => {
                            match c as u32 {
                                code @ 0..=0xff => write!(f, "\\x{:02x}", code)?,
                                code @ 0x100..=0xffff => write!(f, "\\u{:04x}", code)?,
                                code => write!(f, "\\U{:08x}", code)?,
                            }
                        }
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "{}", quote)
            }
            Value::Blob(bytes) => {
                let quote = quote_for(bytes.contains(&b'\''), bytes.contains(&b'"'));
                write!(f, "b{}", quote)?;
                for &byte in bytes {
                    match byte {
                        b'\\' => write!(f, "\\\\")?,
                        b'\n' => write!(f, "\\n")?,
                        b'\r' => write!(f, "\\r")?,
                        b'\t' => write!(f, "\\t")?,
                        b if b == quote as u8 => write!(f, "\\{}", quote)?,
                        0x20..=0x7e => write!(f, "{}", byte as char)?,
                        _ => write!(f, "\\x{:02x}", byte)?,
                    }
                }
                write!(f, "{}", quote)
            }
        }
    }
}

/// One result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row(pub Vec<Value>);

impl Row {
    /// Column values in projection order.
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Value at `index`, if the row has that many columns.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }
}

/// Renders as a tuple: `('Krish', 'Data Science', 'A', 90)`, `(5,)`, `()`.
impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        if self.0.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// All rows produced by one statement, plus the column names SQLite reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    /// Column names in projection order (empty for statements without output)
    pub columns: Vec<String>,

    /// Rows in the order the engine returned them
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}
