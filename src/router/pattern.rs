//! Path template compilation and matching.
//!
//! A template is a `/`-separated path where a segment of the form `:name`
//! captures exactly one non-empty segment and a final segment `*name` captures
//! the rest of the path. Everything else is matched literally and
//! case-sensitively against the whole URL path.

use std::sync::Arc;

use regex::Regex;
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Maximum number of path parameters stored inline before spilling to the heap.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Path parameters extracted by a successful match, in template order.
///
/// Names are shared with the compiled pattern; values are copied out of the
/// request path.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A compiled, immutable path template.
#[derive(Debug, Clone)]
pub struct Pattern {
    template: String,
    regex: Regex,
    names: Vec<Arc<str>>,
}

impl Pattern {
    /// Compile a path template.
    ///
    /// Fails on templates that do not start with `/`, placeholders with empty,
    /// invalid or duplicate names, and `*name` wildcards that are not the last
    /// segment.
    pub fn compile(template: &str) -> Result<Self> {
        let Some(rest) = template.strip_prefix('/') else {
            return Err(Error::invalid_pattern(template, "template must start with '/'"));
        };

        let segments: Vec<&str> = rest.split('/').collect();
        let last = segments.len() - 1;

        let mut pattern = String::with_capacity(template.len() + 8);
        pattern.push('^');
        let mut names: Vec<Arc<str>> = Vec::with_capacity(template.matches([':', '*']).count());

        for (i, segment) in segments.iter().enumerate() {
            pattern.push('/');
            if let Some(name) = segment.strip_prefix(':') {
                check_name(template, name, &names)?;
                pattern.push_str("([^/]+)");
                names.push(Arc::from(name));
            } else if let Some(name) = segment.strip_prefix('*') {
                if i != last {
                    return Err(Error::invalid_pattern(
                        template,
                        format!("wildcard '*{name}' must be the last segment"),
                    ));
                }
                check_name(template, name, &names)?;
                pattern.push_str("(.*)");
                names.push(Arc::from(name));
            } else {
                pattern.push_str(&regex::escape(segment));
            }
        }
        pattern.push('$');

        let regex =
            Regex::new(&pattern).map_err(|e| Error::invalid_pattern(template, e.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            regex,
            names,
        })
    }

    /// The template this pattern was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter names declared by the template, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path` and extract the declared parameters as raw strings.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<ParamVec> {
        let captures = self.regex.captures(path)?;
        let mut params = ParamVec::new();
        for (i, name) in self.names.iter().enumerate() {
            let value = captures.get(i + 1).map_or("", |m| m.as_str());
            params.push((Arc::clone(name), value.to_string()));
        }
        Some(params)
    }
}

fn check_name(template: &str, name: &str, seen: &[Arc<str>]) -> Result<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(Error::invalid_pattern(template, "placeholder has an empty name"));
    };
    let valid = (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(Error::invalid_pattern(
            template,
            format!("invalid parameter name '{name}'"),
        ));
    }
    if seen.iter().any(|n| n.as_ref() == name) {
        return Err(Error::invalid_pattern(
            template,
            format!("duplicate parameter name '{name}'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pattern: &Pattern, path: &str) -> Option<Vec<(String, String)>> {
        pattern.matches(path).map(|p| {
            p.into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect()
        })
    }

    #[test]
    fn test_root_path() {
        let p = Pattern::compile("/").unwrap();
        assert!(p.is_match("/"));
        assert!(!p.is_match("/x"));
        assert!(!p.is_match(""));
        assert_eq!(p.param_names().count(), 0);
    }

    #[test]
    fn test_single_param_is_a_raw_string() {
        let p = Pattern::compile("/users/:id").unwrap();
        assert_eq!(
            params(&p, "/users/42"),
            Some(vec![("id".to_string(), "42".to_string())])
        );
        assert!(p.matches("/users").is_none());
        assert!(p.matches("/users/").is_none());
        assert!(p.matches("/users/42/posts").is_none());
    }

    #[test]
    fn test_nested_params_keep_template_order() {
        let p = Pattern::compile("/users/:user_id/posts/:post_id").unwrap();
        assert_eq!(
            params(&p, "/users/7/posts/abc"),
            Some(vec![
                ("user_id".to_string(), "7".to_string()),
                ("post_id".to_string(), "abc".to_string()),
            ])
        );
        assert_eq!(p.param_names().collect::<Vec<_>>(), vec!["user_id", "post_id"]);
    }

    #[test]
    fn test_match_is_anchored() {
        let p = Pattern::compile("/about").unwrap();
        assert!(p.is_match("/about"));
        assert!(!p.is_match("/about/"));
        assert!(!p.is_match("/about/team"));
        assert!(!p.is_match("/x/about"));
    }

    #[test]
    fn test_literals_are_case_sensitive() {
        let p = Pattern::compile("/About").unwrap();
        assert!(p.is_match("/About"));
        assert!(!p.is_match("/about"));
    }

    #[test]
    fn test_literal_regex_metacharacters_are_escaped() {
        let p = Pattern::compile("/files/v1.0/(all)").unwrap();
        assert!(p.is_match("/files/v1.0/(all)"));
        assert!(!p.is_match("/files/v1x0/(all)"));
    }

    #[test]
    fn test_wildcard_captures_remainder() {
        let p = Pattern::compile("/static/*path").unwrap();
        assert_eq!(
            params(&p, "/static/css/site.css"),
            Some(vec![("path".to_string(), "css/site.css".to_string())])
        );
        assert_eq!(
            params(&p, "/static/"),
            Some(vec![("path".to_string(), String::new())])
        );
        assert!(p.matches("/static").is_none());
    }

    #[test]
    fn test_malformed_templates_fail_at_compile_time() {
        for template in [
            "users/:id",
            "/users/:",
            "/users/:1abc",
            "/users/:id-x",
            "/a/:id/b/:id",
            "/files/*rest/more",
            "/files/*",
        ] {
            let err = Pattern::compile(template).unwrap_err();
            assert!(
                matches!(err, Error::InvalidPattern { .. }),
                "expected InvalidPattern for {template}, got {err:?}"
            );
        }
    }
}
