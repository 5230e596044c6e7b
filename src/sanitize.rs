use crate::error::CompileError;
use regex::Regex;

/// Drops filesystem-metadata lines from research text.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    patterns: Vec<Regex>,
}

impl Sanitizer {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, CompileError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|source| CompileError::Pattern {
                    pattern: p.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Remove every line matching one of the patterns, terminator included.
    /// All other lines come through byte-for-byte and in order.
    pub fn clean(&self, text: &str) -> String {
        if self.patterns.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        for part in text.split_inclusive('\n') {
            let line = part.strip_suffix('\n').unwrap_or(part);
            if self.patterns.iter().any(|re| re.is_match(line)) {
                continue;
            }
            out.push_str(part);
        }
        out
    }
}

/// Escape text for the inside of a JavaScript template literal.
///
/// Backtick, `$` and backslash each get a leading backslash, in one pass, so
/// the literal evaluates back to exactly `text`.
pub fn escape_template_literal(text: &str) -> String {
    let extra = text.chars().filter(|c| matches!(c, '`' | '$' | '\\')).count();
    let mut out = String::with_capacity(text.len() + extra);
    for ch in text.chars() {
        if matches!(ch, '`' | '$' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ZONE_IDENTIFIER_PATTERN;

    fn zone() -> Sanitizer {
        Sanitizer::new(&[ZONE_IDENTIFIER_PATTERN]).unwrap()
    }

    #[test]
    fn drops_only_marker_lines() {
        let text = "intro\nreport.md:Zone.Identifier\n[ZoneTransfer]\nZoneId=3\noutro\n";
        assert_eq!(zone().clean(text), "intro\n[ZoneTransfer]\nZoneId=3\noutro\n");
    }

    #[test]
    fn drops_unterminated_last_line() {
        assert_eq!(zone().clean("a\nb.md:Zone.Identifier"), "a\n");
    }

    #[test]
    fn plain_zone_identifier_text_survives() {
        // No colon in front: not a stream marker.
        let text = "The Zone.Identifier stream is written by browsers.\n";
        assert_eq!(zone().clean(text), text);
    }

    #[test]
    fn bad_pattern_is_an_error() {
        let err = Sanitizer::new(&["(unclosed"]).unwrap_err();
        assert!(matches!(err, CompileError::Pattern { .. }));
    }

    #[test]
    fn escapes_delimiter_and_interpolation() {
        assert_eq!(
            escape_template_literal("cost: `${price}`"),
            "cost: \\`\\${price}\\`"
        );
    }

    #[test]
    fn backslash_is_not_double_escaped() {
        // An existing `\`` becomes `\\\``: escaped backslash, escaped backtick.
        assert_eq!(escape_template_literal("a\\`b"), "a\\\\\\`b");
        assert_eq!(escape_template_literal("plain"), "plain");
    }
}
