//! Session script grammar
//!
//! One step per line, `#` starts a comment. Steps that take an argument
//! use a `name:value` form; the rest are bare words.

use crate::error::EngineError;
use std::fmt;
use std::str::FromStr;

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Submit the search form with this query.
    Search {
        /// Query text.
        query: String,
    },
    /// Click the rendered pagination link for this page number.
    Page {
        /// Target page number.
        number: u32,
    },
    /// Click the top-results summarize control.
    Summarize,
    /// Click the n-th rendered single-paper summary link, 1-based.
    Detail {
        /// 1-based position among the rendered summary links.
        ordinal: usize,
    },
    /// Traverse one history entry back.
    Back,
    /// Traverse one history entry forward.
    Forward,
    /// Press Escape.
    Escape,
    /// Click the panel close affordance.
    ClosePanel,
    /// Click the modal close affordance.
    CloseModal,
    /// Submit the subscription form with this address.
    Subscribe {
        /// Email address.
        email: String,
    },
    /// Click the test-send control with this address.
    TestSend {
        /// Email address.
        email: String,
    },
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search { query } => write!(f, "search:{query}"),
            Self::Page { number } => write!(f, "page:{number}"),
            Self::Summarize => write!(f, "summarize"),
            Self::Detail { ordinal } => write!(f, "detail:{ordinal}"),
            Self::Back => write!(f, "back"),
            Self::Forward => write!(f, "forward"),
            Self::Escape => write!(f, "escape"),
            Self::ClosePanel => write!(f, "close-panel"),
            Self::CloseModal => write!(f, "close-modal"),
            Self::Subscribe { email } => write!(f, "subscribe:{email}"),
            Self::TestSend { email } => write!(f, "test-send:{email}"),
        }
    }
}

impl FromStr for ScriptStep {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            return match name.trim() {
                "search" => Ok(Self::Search {
                    query: value.to_string(),
                }),
                "page" => value
                    .parse()
                    .map(|number| Self::Page { number })
                    .map_err(|_| EngineError::script(format!("bad page number in {line:?}"))),
                "detail" => value
                    .parse()
                    .map(|ordinal| Self::Detail { ordinal })
                    .map_err(|_| EngineError::script(format!("bad detail ordinal in {line:?}"))),
                "subscribe" => Ok(Self::Subscribe {
                    email: value.to_string(),
                }),
                "test-send" => Ok(Self::TestSend {
                    email: value.to_string(),
                }),
                _ => Err(EngineError::script(line.to_string())),
            };
        }
        match line {
            "summarize" => Ok(Self::Summarize),
            "back" => Ok(Self::Back),
            "forward" => Ok(Self::Forward),
            "escape" => Ok(Self::Escape),
            "close-panel" => Ok(Self::ClosePanel),
            "close-modal" => Ok(Self::CloseModal),
            _ => Err(EngineError::script(line.to_string())),
        }
    }
}

/// A parsed sequence of scripted interactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionScript {
    steps: Vec<ScriptStep>,
}

impl SessionScript {
    /// Parses a script, skipping blank lines and `#` comments.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Script`] naming the first malformed line.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let mut steps = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            steps.push(line.parse()?);
        }
        Ok(Self { steps })
    }

    /// The parsed steps in order.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_comments_arguments_and_bare_words() {
        let script = SessionScript::parse(
            "# warm up\n\
             search:quantum error correction\n\
             page:2\n\
             summarize\n\
             detail:1\n\
             escape\n\
             subscribe:reader@example.com\n",
        )
        .expect("script should parse");

        assert_eq!(
            script.steps(),
            &[
                ScriptStep::Search {
                    query: "quantum error correction".to_string()
                },
                ScriptStep::Page { number: 2 },
                ScriptStep::Summarize,
                ScriptStep::Detail { ordinal: 1 },
                ScriptStep::Escape,
                ScriptStep::Subscribe {
                    email: "reader@example.com".to_string()
                },
            ]
        );
    }

    #[test]
    fn unknown_steps_are_reported_with_their_line() {
        let error = SessionScript::parse("search:ml\nwarp:9\n").unwrap_err();
        assert!(error.to_string().contains("warp:9"));
    }

    #[test]
    fn steps_render_back_to_their_source_form() {
        for line in [
            "search:transformer circuits",
            "page:3",
            "summarize",
            "detail:2",
            "back",
            "forward",
            "escape",
            "close-panel",
            "close-modal",
            "subscribe:a@b.io",
            "test-send:a@b.io",
        ] {
            let step: ScriptStep = line.parse().expect("step should parse");
            assert_eq!(step.to_string(), line);
        }
    }
}
