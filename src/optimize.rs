//! Post-processing of finished SVG documents
//!
//! The converter never calls an optimizer itself; callers pass the assembled
//! document through one before writing it out.

use thiserror::Error;

use crate::projection::NumberFormat;

/// Errors from an optimization pass
#[derive(Debug, Error, PartialEq)]
pub enum OptimizeError {
    #[error("unterminated {what} starting at byte {offset}")]
    Unterminated { what: &'static str, offset: usize },
}

/// A size-reducing transform over a complete SVG document
pub trait MarkupOptimizer {
    fn optimize(&self, svg: &str) -> Result<String, OptimizeError>;
}

/// Fractional digits kept when nothing else is configured
pub const DEFAULT_MAX_DECIMALS: u32 = 3;

/// Attributes whose numbers are rounded
///
/// Radii are left alone: a small radius would round to zero and hide the point.
const NUMERIC_ATTRIBUTES: [&str; 3] = ["d", "cx", "cy"];

/// Strips the XML declaration, comments and inter-tag whitespace, and rounds
/// geometry attribute numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactOptimizer {
    /// Fractional digits kept in `d`, `cx` and `cy`; `None` keeps all
    pub max_decimals: Option<u32>,
}

impl Default for CompactOptimizer {
    fn default() -> Self {
        Self {
            max_decimals: Some(DEFAULT_MAX_DECIMALS),
        }
    }
}

impl CompactOptimizer {
    pub fn new(max_decimals: Option<u32>) -> Self {
        Self { max_decimals }
    }

    /// Optimizer that keeps every digit a renderer with `precision` emits
    ///
    /// Unrounded output is cut to [`DEFAULT_MAX_DECIMALS`].
    pub fn for_precision(precision: Option<u32>) -> Self {
        Self::new(Some(precision.unwrap_or(DEFAULT_MAX_DECIMALS)))
    }
}

impl MarkupOptimizer for CompactOptimizer {
    fn optimize(&self, svg: &str) -> Result<String, OptimizeError> {
        let svg = strip_declaration(svg.trim())?;
        let svg = strip_comments(svg)?;
        let svg = collapse_whitespace(&svg);
        match self.max_decimals {
            Some(digits) => round_attributes(&svg, digits),
            None => Ok(svg),
        }
    }
}

fn strip_declaration(svg: &str) -> Result<&str, OptimizeError> {
    if !svg.starts_with("<?xml") {
        return Ok(svg);
    }
    let end = svg.find("?>").ok_or(OptimizeError::Unterminated {
        what: "XML declaration",
        offset: 0,
    })?;
    Ok(svg[end + 2..].trim_start())
}

fn strip_comments(svg: &str) -> Result<String, OptimizeError> {
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    let mut offset = 0;
    while let Some(start) = rest.find("<!--") {
        let len = rest[start..]
            .find("-->")
            .ok_or(OptimizeError::Unterminated {
                what: "comment",
                offset: offset + start,
            })?;
        out.push_str(&rest[..start]);
        let consumed = start + len + 3;
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Drop whitespace runs that sit between a `>` and a `<`
fn collapse_whitespace(svg: &str) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut pending = String::new();
    for c in svg.chars() {
        if c.is_whitespace() && (out.ends_with('>') || !pending.is_empty()) {
            pending.push(c);
            continue;
        }
        if c != '<' {
            out.push_str(&pending);
        }
        pending.clear();
        out.push(c);
    }
    out
}

fn round_attributes(svg: &str, digits: u32) -> Result<String, OptimizeError> {
    let format = NumberFormat::new(Some(digits));
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    let mut offset = 0;

    while let Some(eq) = rest.find("=\"") {
        let name_start = rest[..eq]
            .rfind(|c: char| c.is_whitespace() || c == '<')
            .map_or(0, |i| i + 1);
        let name = &rest[name_start..eq];
        let value_start = eq + 2;
        let value_len = rest[value_start..]
            .find('"')
            .ok_or(OptimizeError::Unterminated {
                what: "attribute value",
                offset: offset + value_start,
            })?;
        let value = &rest[value_start..value_start + value_len];

        out.push_str(&rest[..value_start]);
        if NUMERIC_ATTRIBUTES.contains(&name) {
            out.push_str(&round_numbers(value, &format));
        } else {
            out.push_str(value);
        }
        out.push('"');

        let consumed = value_start + value_len + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Reformat every number in an attribute value, leaving commands and
/// separators untouched
fn round_numbers(value: &str, format: &NumberFormat) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < bytes.len() {
        let end = number_end(bytes, i);
        if end > i {
            let token = &value[i..end];
            match token.parse::<f64>() {
                Ok(n) => out.push_str(&format.format(n)),
                Err(_) => out.push_str(token),
            }
            i = end;
        } else {
            let c = value[i..].chars().next().unwrap_or_default();
            out.push(c);
            i += c.len_utf8().max(1);
        }
    }
    out
}

/// End of the number starting at `start`, or `start` if there is none
fn number_end(bytes: &[u8], start: usize) -> usize {
    let digits = |mut j: usize| {
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        j
    };

    let mut j = start;
    if j < bytes.len() && bytes[j] == b'-' {
        j += 1;
    }
    let int_end = digits(j);
    let mut end = int_end;
    if end < bytes.len() && bytes[end] == b'.' {
        end = digits(end + 1);
    }
    let mantissa_digits = (int_end - j) + end.saturating_sub(int_end + 1);
    if mantissa_digits == 0 {
        return start;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut k = end + 1;
        if k < bytes.len() && (bytes[k] == b'-' || bytes[k] == b'+') {
            k += 1;
        }
        let exp_end = digits(k);
        if exp_end > k {
            end = exp_end;
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compacts_document() {
        let svg = "<?xml version=\"1.0\"?>\n<svg viewBox=\"0 0 10 10\">\n  <!-- layer -->\n  <path d=\"M0.123456,1 L2,3.98765\" name=\"a b\"/>\n</svg>\n";
        let out = CompactOptimizer::default().optimize(svg).unwrap();
        assert_eq!(
            out,
            r#"<svg viewBox="0 0 10 10"><path d="M0.123,1 L2,3.988" name="a b"/></svg>"#
        );
    }

    #[test]
    fn test_keeps_text_whitespace() {
        let out = CompactOptimizer::new(None)
            .optimize("<g> <text>a  b</text> </g>")
            .unwrap();
        assert_eq!(out, "<g><text>a  b</text></g>");
    }

    #[test]
    fn test_round_numbers_keeps_commands() {
        let format = NumberFormat::new(Some(1));
        assert_eq!(
            round_numbers("M10.56,-0.04 m-1,0 a1,1 0 1,1 2,0 Z", &format),
            "M10.6,0 m-1,0 a1,1 0 1,1 2,0 Z"
        );
        assert_eq!(round_numbers("1e-7", &format), "0");
    }

    #[test]
    fn test_only_geometry_attributes_are_rounded() {
        let out = CompactOptimizer::new(Some(0))
            .optimize(r#"<circle cx="1.6" cy="2.2" r="0.7" data-v="1.55"/>"#)
            .unwrap();
        assert_eq!(out, r#"<circle cx="2" cy="2" r="0.7" data-v="1.55"/>"#);
    }

    #[test]
    fn test_small_radius_survives() {
        let out = CompactOptimizer::default()
            .optimize(r#"<circle cx="50" cy="50" r="0.0004"/>"#)
            .unwrap();
        assert_eq!(out, r#"<circle cx="50" cy="50" r="0.0004"/>"#);
    }

    #[test]
    fn test_for_precision_keeps_rendered_digits() {
        let svg = r#"<path d="M0,0 L12.345678,90"/>"#;
        let out = CompactOptimizer::for_precision(Some(6)).optimize(svg).unwrap();
        assert_eq!(out, svg);

        let out = CompactOptimizer::for_precision(None).optimize(svg).unwrap();
        assert_eq!(out, r#"<path d="M0,0 L12.346,90"/>"#);
    }

    #[test]
    fn test_unterminated_comment() {
        let err = CompactOptimizer::default()
            .optimize("<svg><!-- oops</svg>")
            .unwrap_err();
        assert_eq!(
            err,
            OptimizeError::Unterminated {
                what: "comment",
                offset: 5
            }
        );
    }
}
