//! Documentation link resolution.
//!
//! A bare reference is looked up by category in a fixed priority: builtins,
//! classes, events, constants, concepts, global objects. A reference
//! containing `::` is split at the first occurrence; the container resolves
//! on its own and the member becomes a URL fragment. Unresolved references
//! log an advisory and resolve to the documentation base URL.
//!
//! The same resolver rewrites inline `[text](target)` links in description
//! text into `{@link url | text}` tags.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::GenContext;
use crate::diagnostics::{Advisory, Diagnostics};
use crate::error::{GenerateError, Result};
use crate::text::DocParts;

static INLINE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\(((?:[^()]|\(\))*)\)").expect("static regex must compile")
});

const MEMBER_SEPARATOR: &str = "::";

/// Raw documentation of one schema entity or member.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocSource<'s> {
    pub description: &'s str,
    pub notes: &'s [String],
    pub examples: &'s [String],
    /// Reference for a `@see` link; top-level entities only.
    pub see: Option<&'s str>,
}

impl<'s> DocSource<'s> {
    pub fn text(description: &'s str) -> Self {
        Self {
            description,
            ..Self::default()
        }
    }
}

/// Resolves schema references to documentation URLs.
pub struct DocLinkResolver<'c, 'a> {
    ctx: &'c GenContext<'a>,
}

impl<'c, 'a> DocLinkResolver<'c, 'a> {
    pub fn new(ctx: &'c GenContext<'a>) -> Self {
        Self { ctx }
    }

    fn base(&self) -> &str {
        &self.ctx.config.doc_base_url
    }

    /// Looks up a reference without recording anything.
    pub fn lookup(&self, reference: &str) -> Option<String> {
        if let Some(url) = self.lookup_entity(reference) {
            return Some(url);
        }
        let (container, member) = reference.split_once(MEMBER_SEPARATOR)?;
        self.lookup_entity(container)
            .map(|url| with_fragment(url, member))
    }

    fn lookup_entity(&self, name: &str) -> Option<String> {
        let ctx = self.ctx;
        let base = self.base();
        let suffix = &ctx.config.shared_page_suffix;

        if ctx.is_builtin(name) {
            Some(format!("{base}builtin-types.html#{name}"))
        } else if ctx.is_class(name) {
            if !suffix.is_empty() && name.ends_with(suffix.as_str()) {
                Some(format!("{base}{}.html#{name}", ctx.config.shared_page))
            } else {
                Some(format!("{base}{name}.html"))
            }
        } else if ctx.is_event(name) {
            Some(format!("{base}events.html#{name}"))
        } else if ctx.is_define(name) {
            Some(format!("{base}defines.html#{name}"))
        } else if ctx.is_concept(name) {
            Some(format!("{base}concepts.html#{name}"))
        } else if ctx.is_global(name) {
            Some(format!("{base}global-objects.html#{name}"))
        } else {
            None
        }
    }

    /// Resolves a reference, falling back to the base URL with an advisory.
    pub fn resolve(&self, diag: &mut Diagnostics, context: &str, reference: &str) -> String {
        match self.lookup(reference) {
            Some(url) => url,
            None => self.unresolved(diag, context, reference),
        }
    }

    fn unresolved(&self, diag: &mut Diagnostics, context: &str, reference: &str) -> String {
        diag.record(Advisory::UnresolvedLink {
            context: context.to_string(),
            reference: reference.to_string(),
        });
        self.base().to_string()
    }

    /// Rewrites every inline link in `text`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnknownOperatorSuffix`] for an operator other
    /// than `#`, `()` or `[]`.
    pub fn rewrite(&self, diag: &mut Diagnostics, context: &str, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in INLINE_LINK_RE.captures_iter(text) {
            let (Some(whole), Some(label), Some(target)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            let url = self.inline_target(diag, context, target.as_str().trim())?;
            let label = label.as_str();
            if label.is_empty() {
                out.push_str(&format!("{{@link {url}}}"));
            } else {
                out.push_str(&format!("{{@link {url} | {label}}}"));
            }
            last = whole.end();
        }
        out.push_str(&text[last..]);
        Ok(out)
    }

    /// Builds a doc comment with links rewritten in the description and notes.
    pub fn doc(
        &self,
        diag: &mut Diagnostics,
        context: &str,
        source: DocSource<'_>,
    ) -> Result<Option<String>> {
        let description = self.rewrite(diag, context, source.description)?;
        let notes = source
            .notes
            .iter()
            .map(|note| self.rewrite(diag, context, note))
            .collect::<Result<Vec<_>>>()?;
        let see = source.see.map(|reference| self.resolve(diag, context, reference));
        let parts = DocParts {
            description,
            notes,
            examples: source.examples.to_vec(),
            see,
        };
        Ok(parts.render())
    }

    fn inline_target(&self, diag: &mut Diagnostics, context: &str, target: &str) -> Result<String> {
        if target.starts_with("http://") || target.starts_with("https://") {
            return Ok(target.to_string());
        }
        let Some((container, member)) = target.split_once(MEMBER_SEPARATOR) else {
            return Ok(self.resolve(diag, context, target));
        };
        let Some(operator) = member.strip_prefix("operator ") else {
            return Ok(self.resolve(diag, context, target));
        };

        let fragment = match operator.trim() {
            "#" => Some("operator%20%23"),
            "()" => Some("operator%20()"),
            "[]" => None,
            _ => {
                return Err(GenerateError::UnknownOperatorSuffix {
                    context: context.to_string(),
                    reference: target.to_string(),
                });
            }
        };

        let Some(url) = self.lookup_entity(container) else {
            return Ok(self.unresolved(diag, context, target));
        };
        Ok(match fragment {
            Some(fragment) => with_fragment(url, fragment),
            None => url,
        })
    }
}

fn with_fragment(url: String, member: &str) -> String {
    if url.contains('#') {
        format!("{url}.{member}")
    } else {
        format!("{url}#{member}")
    }
}
