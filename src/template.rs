//! The template engine (spec §4.2, component C2): compiles a hostname
//! template containing exactly one `%DIGITS%` token into a matcher and
//! formatter for host-digit strings.
//!
//! A template's prefix/suffix literal is matched and emitted at the level of
//! the dotted name string, not per-label: `test-%DIGITS%.local` packs the
//! literal `test-` into the same label as the digit run, so labels can't be
//! compared one-for-one against the literal's own label split.

use thiserror::Error;

const TOKEN: &str = "%DIGITS%";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template must be non-empty")]
    Empty,
    #[error("template must contain exactly one %DIGITS% token, found {0}")]
    TokenCount(usize),
}

/// A template compiled against its owning network's host digit count: the
/// literal text before and after `%DIGITS%`, lowercased, and the exact
/// digit width the token must occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    prefix_literal: String,
    suffix_literal: String,
    digit_count: usize,
}

impl CompiledTemplate {
    /// Compile `template` (e.g. `"test-%DIGITS%.local"`) for a network whose
    /// host width yields `digit_count` hex digits.
    pub fn compile(template: &str, digit_count: usize) -> Result<CompiledTemplate, TemplateError> {
        if template.is_empty() {
            return Err(TemplateError::Empty);
        }
        let occurrences = template.matches(TOKEN).count();
        if occurrences != 1 {
            return Err(TemplateError::TokenCount(occurrences));
        }

        let token_pos = template.find(TOKEN).expect("checked occurrences == 1");
        let (before, after) = (&template[..token_pos], &template[token_pos + TOKEN.len()..]);

        Ok(CompiledTemplate {
            prefix_literal: before.to_ascii_lowercase(),
            suffix_literal: after.to_ascii_lowercase(),
            digit_count,
        })
    }

    /// Concatenate the prefix literal, the digit run, and the suffix literal
    /// into a fully-qualified label sequence. `digits` is assumed to already
    /// be validated (exactly `digit_count` lowercase hex characters).
    pub fn synthesize(&self, digits: &str) -> Vec<String> {
        let full = format!("{}{}{}", self.prefix_literal, digits, self.suffix_literal);
        split_labels(&full)
    }

    /// Strip a matching suffix and prefix from `qname` and verify the
    /// residue is exactly `digit_count` hex characters (case-insensitively);
    /// returns the lowercased digit string on success.
    pub fn match_name(&self, qname: &[String]) -> Option<String> {
        let full = qname.join(".").to_ascii_lowercase();
        let residue = full
            .strip_prefix(self.prefix_literal.as_str())?
            .strip_suffix(self.suffix_literal.as_str())?;

        if residue.len() != self.digit_count {
            return None;
        }
        if !residue.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(residue.to_string())
    }
}

/// Split a dotted name string into DNS labels, dropping empty labels
/// produced by a leading/trailing dot (an empty fragment yields no labels at
/// all, as required for an empty prefix or suffix literal).
fn split_labels(name: &str) -> Vec<String> {
    name.split('.').filter(|label| !label.is_empty()).map(str::to_string).collect()
}
