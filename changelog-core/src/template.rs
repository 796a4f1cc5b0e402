use std::error::Error as _;

use tera::{Context, Tera};

use crate::error::{ChangelogError, Result};

/// Named templates compiled once and rendered many times
pub struct TemplateSet {
    tera: Tera,
}

impl TemplateSet {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        Self { tera }
    }

    /// Compile `source` under `name`
    pub fn add(&mut self, name: &str, source: &str) -> Result<()> {
        self.tera
            .add_raw_template(name, source)
            .map_err(|e| render_error(name, &e))
    }

    /// Render the template `name`; placeholders missing from `context` fail
    pub fn render(&self, name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(name, context)
            .map_err(|e| render_error(name, &e))
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Tera keeps the useful part of a failure in the source chain
fn render_error(name: &str, err: &tera::Error) -> ChangelogError {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }

    ChangelogError::Render {
        template: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_placeholders() {
        let mut set = TemplateSet::new();
        set.add("url", "https://example.com/commit/{{ CommitID }}").unwrap();

        let mut context = Context::new();
        context.insert("CommitID", "abc");
        assert_eq!(set.render("url", &context).unwrap(), "https://example.com/commit/abc");
    }

    #[test]
    fn test_no_html_escaping() {
        let mut set = TemplateSet::new();
        set.add("row", "{{ Message }}").unwrap();

        let mut context = Context::new();
        context.insert("Message", "Use <T> & friends");
        assert_eq!(set.render("row", &context).unwrap(), "Use <T> & friends");
    }

    #[test]
    fn test_undefined_placeholder_is_render_error() {
        let mut set = TemplateSet::new();
        set.add("diff_url", "https://example.com/{{ Nope }}").unwrap();

        let err = set.render("diff_url", &Context::new()).unwrap_err();
        match err {
            ChangelogError::Render { template, reason } => {
                assert_eq!(template, "diff_url");
                assert!(reason.contains("Nope"), "reason was: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_syntax_error_is_render_error() {
        let mut set = TemplateSet::new();
        let err = set.add("broken", "{{ CommitID").unwrap_err();
        assert!(matches!(err, ChangelogError::Render { .. }));
    }
}
