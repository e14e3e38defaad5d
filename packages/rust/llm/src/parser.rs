//! Parser for the three-section content reply.
//!
//! The model is asked to answer in exactly this shape:
//!
//! ```text
//! 1. SEO Title: <title>
//! 2. SEO Description: <description>
//! 3. Insights:
//!    - <bullet>
//!    - <bullet>
//! ```
//!
//! Known limitation: title and description keep only the text between the
//! first and second colon of their line, so `1. SEO Title: Widgets: A Guide`
//! yields `Widgets`.

use tracing::{error, info};

use seomapper_shared::{NO_INSIGHTS, NOT_AVAILABLE, SeoCopy};

pub const TITLE_PREFIX: &str = "1. SEO Title:";
pub const DESCRIPTION_PREFIX: &str = "2. SEO Description:";
pub const INSIGHTS_MARKER: &str = "3. Insights:";

/// A reply that cannot be read at all, as opposed to one with absent fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReply {
    #[error("model reply is empty")]
    Empty,
}

/// Parse a reply into title, description and insights.
///
/// Absent sections are not errors: a missing title or description line gives
/// "N/A", a missing insights marker (or one with no `-` bullets after it)
/// gives "No insights available.". Only an empty or whitespace-only reply is
/// malformed; [`parse_gpt_reply`] turns that into the failure triple
/// (N/A, N/A, "Error parsing GPT-4 response") instead of the per-section
/// fallbacks an off-format reply gets.
pub fn parse_reply(reply: &str) -> Result<SeoCopy, MalformedReply> {
    if reply.trim().is_empty() {
        return Err(MalformedReply::Empty);
    }

    let lines: Vec<&str> = reply.lines().collect();

    let title = prefixed_field(&lines, TITLE_PREFIX);
    let description = prefixed_field(&lines, DESCRIPTION_PREFIX);
    let insights = insights(&lines);

    Ok(SeoCopy {
        title,
        description,
        insights,
    })
}

/// [`parse_reply`] with logging; a malformed reply becomes [`SeoCopy::failed`].
pub fn parse_gpt_reply(reply: &str, url: &str) -> SeoCopy {
    match parse_reply(reply) {
        Ok(copy) => {
            info!(
                url,
                new_title = %copy.title,
                new_description = %copy.description,
                insights = %copy.insights,
                "parsed content reply"
            );
            copy
        }
        Err(e) => {
            error!(url, error = %e, "error parsing content reply");
            SeoCopy::failed()
        }
    }
}

/// Second colon-separated segment of the first line starting with `prefix`.
fn prefixed_field(lines: &[&str], prefix: &str) -> String {
    lines
        .iter()
        .find(|line| line.starts_with(prefix))
        .and_then(|line| line.split(':').nth(1))
        .map(|segment| segment.trim().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.into())
}

fn insights(lines: &[&str]) -> String {
    let Some(start) = lines.iter().position(|line| line.starts_with(INSIGHTS_MARKER)) else {
        return NO_INSIGHTS.into();
    };

    let bullets: Vec<&str> = lines[start + 1..]
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.starts_with('-'))
        .collect();

    if bullets.is_empty() {
        NO_INSIGHTS.into()
    } else {
        bullets.join(" ")
    }
}
