//! Upstream path templates.
//!
//! A template is a path with `{name}` placeholders, e.g.
//! `/match/{match_id}/scorecard`. Rendering percent-encodes each value so a
//! parameter can never introduce extra path segments.

use std::collections::HashMap;
use std::fmt;

use crate::error::{PitchsideError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed path template, used for upstream paths and inbound routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a template string.
    ///
    /// ```
    /// use pitchside_core::PathTemplate;
    ///
    /// let template = PathTemplate::parse("/match/{match_id}/info").unwrap();
    /// assert_eq!(template.params().collect::<Vec<_>>(), vec!["match_id"]);
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        if !raw.starts_with('/') {
            return Err(PitchsideError::invalid_config(format!(
                "path '{}' must start with '/'",
                raw
            )));
        }

        let mut segments = Vec::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }

            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                PitchsideError::invalid_config(format!("unclosed '{{' in path '{}'", raw))
            })?;

            let name = after[..close].trim();
            if name.is_empty() || name.contains('{') {
                return Err(PitchsideError::invalid_config(format!(
                    "invalid placeholder in path '{}'",
                    raw
                )));
            }

            segments.push(Segment::Param(name.to_string()));
            rest = &after[close + 1..];
        }

        if rest.contains('}') {
            return Err(PitchsideError::invalid_config(format!(
                "unmatched '}}' in path '{}'",
                raw
            )));
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Placeholder names, in order of appearance.
    pub fn params(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Renders the template, failing on the first missing parameter.
    pub fn render(&self, params: &HashMap<String, String>) -> Result<String> {
        let mut path = String::with_capacity(self.raw.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .map(|v| v.trim())
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| PitchsideError::missing_parameter(name.as_str()))?;
                    path.push_str(&urlencoding::encode(value));
                },
            }
        }

        Ok(path)
    }

    /// The template with placeholder names erased: `/match/{}/info`.
    ///
    /// Two templates with the same shape match the same paths.
    pub fn shape(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Param(_) => "{}",
            })
            .collect()
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
