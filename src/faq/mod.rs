//! Registration FAQ helper

pub mod models;
pub mod openai;
pub mod service;

pub use models::{AnswerSource, ChatMessage, Conversation, FaqReply};
pub use openai::{OpenAiClient, TextGenerator};
pub use service::{FaqService, fallback_answer};
