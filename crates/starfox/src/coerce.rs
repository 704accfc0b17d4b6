//! Attribute value coercion: raw attribute text → typed [`Value`].

use log::trace;

use crate::error::{Error, Result};
use crate::resource::Package;
use crate::value::Value;

/// Scheme marking a `url` attribute as a package-relative resource.
pub const PACKAGE_SCHEME: &str = "pkx:///";

// ── ValueType ─────────────────────────────────────────────────────────────

/// Declared type of a control or container attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Boolean,
    Int,
    Float,
    Url,
    Resource,
    ResourceUrl,
    /// Any other tag: the raw text is passed through.
    Text,
}

impl ValueType {
    /// Parse a type tag as written in a control definition.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "boolean" => ValueType::Boolean,
            "int" => ValueType::Int,
            "float" => ValueType::Float,
            "url" => ValueType::Url,
            "resource" => ValueType::Resource,
            "resource-url" => ValueType::ResourceUrl,
            _ => ValueType::Text,
        }
    }
}

impl From<&str> for ValueType {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

// ── Coercion ──────────────────────────────────────────────────────────────

/// Convert `raw` to a [`Value`] of type `ty`.
///
/// Only the resource types can fail; numbers fall back to NaN instead.
pub fn coerce(raw: &str, ty: &ValueType, package: Option<&dyn Package>) -> Result<Value> {
    trace!("coerce {raw:?} as {ty:?}");
    match ty {
        ValueType::Boolean => Ok(Value::Bool(parse_bool(raw))),
        ValueType::Int => Ok(Value::Number(parse_int(raw))),
        ValueType::Float => Ok(Value::Number(parse_float(raw))),
        ValueType::Url => match raw.strip_prefix(PACKAGE_SCHEME) {
            // A package URL resolves exactly like `resource-url`.
            Some(path) if !path.is_empty() => resolve_resource(path, true, package),
            _ => Ok(Value::Str(raw.to_string())),
        },
        ValueType::Resource => resolve_resource(raw, false, package),
        ValueType::ResourceUrl => resolve_resource(raw, true, package),
        ValueType::Text => Ok(Value::Str(raw.to_string())),
    }
}

fn resolve_resource(path: &str, as_url: bool, package: Option<&dyn Package>) -> Result<Value> {
    let package = package
        .ok_or_else(|| Error::Resource("Can't get resource. The app has no package.".into()))?;
    let module = package.require(path).ok_or_else(|| {
        Error::Resource(format!(
            "Resource '{path}' does not exist in package '{}'.",
            package.full_name()
        ))
    })?;

    if !as_url {
        return Ok(Value::Resource(module));
    }
    module
        .object_url()
        .map(Value::Str)
        .ok_or_else(|| Error::Resource(format!("Invalid resource '{path}': it cannot produce an object URL.")))
}

/// `true` for `"true"`, `"True"` and anything numerically equal to 1.
pub fn parse_bool(raw: &str) -> bool {
    raw == "true" || raw == "True" || raw.trim().parse::<f64>().is_ok_and(|n| n == 1.0)
}

/// Leading integer prefix of `raw`: optional sign, then decimal digits or a
/// `0x` hex literal. Trailing garbage is ignored; no digits gives NaN.
pub fn parse_int(raw: &str) -> f64 {
    let s = raw.trim_start();
    let (sign, s) = split_sign(s);

    let (radix, digits) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, s),
    };
    let len = digits.find(|c: char| !c.is_digit(radix)).unwrap_or(digits.len());
    if len == 0 {
        return f64::NAN;
    }

    let magnitude = digits[..len]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
    sign * magnitude
}

/// Longest decimal literal at the start of `raw` (`Infinity` included).
/// No literal gives NaN.
pub fn parse_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let (sign, s) = split_sign(s);
    if s.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let int_end = digits_from(0);
    let mut end = int_end;
    let mut has_digits = int_end > 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return f64::NAN;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().map(|n| sign * n).unwrap_or(f64::NAN)
}

fn split_sign(s: &str) -> (f64, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (-1.0, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (1.0, rest)
    } else {
        (1.0, s)
    }
}
