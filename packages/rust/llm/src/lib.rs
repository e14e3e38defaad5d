//! Language-model steps of the SEO pipeline.
//!
//! - [`ChatClient`]: minimal chat-completions client
//! - [`map_keyword`]: picks the best candidate keyword for a page
//! - [`generate_seo_content`]: drafts a new title, description and insights
//! - [`parse_reply`]: pure parser for the three-section reply format

pub mod client;
pub mod generator;
pub mod mapper;
pub mod parser;
pub mod prompts;

pub use client::{ChatClient, ChatMessage, ChatRequest, ChatResponse};
pub use generator::{generate_seo_content, try_generate_seo_content};
pub use mapper::{map_keyword, try_map_keyword};
pub use parser::{MalformedReply, parse_gpt_reply, parse_reply};
