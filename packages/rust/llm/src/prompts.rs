//! Prompt templates for the two language-model steps.

use seomapper_shared::{KeywordList, PageMetadata};

/// System message sent ahead of every user prompt.
pub const SYSTEM_PROMPT: &str = "You are a highly skilled SEO expert.";

const PERSONA: &str = "You are a 10-year SEO expert with a proven track record of growing businesses on search organically.";

/// Prompt asking the model to choose one keyword for `url`.
pub fn keyword_mapping_prompt(url: &str, keywords: &KeywordList, metadata: &PageMetadata) -> String {
    format!(
        "{PERSONA}\n\
         Based on the following information, select the most relevant keyword for the URL:\n\
         \n\
         URL: {url}\n\
         Current Meta Title: {title}\n\
         Current Meta Description: {description}\n\
         Provided Keywords: {keywords}\n\
         \n\
         Return the single most relevant keyword from the list based on the URL's content.",
        title = metadata.title,
        description = metadata.description,
        keywords = keywords.to_prompt_text(),
    )
}

/// Prompt asking for new copy in the fixed three-section reply format that
/// [`crate::parser::parse_reply`] understands.
pub fn content_prompt(
    url: &str,
    keyword: &str,
    metadata: &PageMetadata,
    suggestions: &[String],
) -> String {
    format!(
        "{PERSONA}\n\
         Based on the following information, provide the output in this exact format:\n\
         \n\
         1. SEO Title: [Your new SEO title]\n\
         2. SEO Description: [Your new SEO description]\n\
         3. Insights:\n   \
         - [Bullet point 1 summarizing user behavior or intent]\n   \
         - [Bullet point 2 summarizing user behavior or intent]\n   \
         - [Additional bullet points, if any]\n\
         \n\
         URL: {url}\n\
         Current Meta Title: {title}\n\
         Current Meta Description: {description}\n\
         Selected Keyword: {keyword}\n\
         Autocomplete Suggestions (User Search Behavior):\n\
         {suggestions}\n\
         \n\
         The output must strictly follow the format above. Do not change the structure or naming \
         of the sections. Ensure the insights are meaningful and concise, highlighting how users \
         search for services related to the keyword. Observe patterns in the search behaviour to \
         inform optimisation and new meta titles and descriptions and even how the body content \
         must be positioned due to these patterns and observations.",
        title = metadata.title,
        description = metadata.description,
        suggestions = suggestions.join("\n"),
    )
}
