use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use uuid::Uuid;

use super::models::{AnswerSource, ChatMessage, Conversation, FaqReply};
use super::openai::TextGenerator;
use crate::domain::DomainError;

pub const MAX_HISTORY: usize = 20;
pub const CONVERSATION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

const FALLBACK_ANSWERS: &[(&[&str], &str)] = &[
    (
        &["eligibility", "eligible", "who can"],
        "Eligibility: Participants must belong to the AI/ML department and form a 2-member team.",
    ),
    (
        &["team size", "team", "members"],
        "Team size is fixed to 2 members.",
    ),
    (
        &["register", "registration", "steps"],
        "Registration steps: Fill team info, leader details, member 2 details, then submit the form.",
    ),
    (
        &["contact", "help", "support"],
        "For additional support, contact the event coordinators listed on the home page.",
    ),
];

const GENERIC_HINT: &str =
    "I can help with eligibility, team size, registration steps, or contact details.";

/// First table entry with a keyword contained in the utterance
pub fn fallback_answer(utterance: &str) -> &'static str {
    let normalized = utterance.to_lowercase();
    FALLBACK_ANSWERS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(_, answer)| *answer)
        .unwrap_or(GENERIC_HINT)
}

pub struct FaqService {
    generator: Option<Arc<dyn TextGenerator>>,
    conversations: DashMap<Uuid, Conversation>,
}

impl FaqService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            conversations: DashMap::new(),
        }
    }

    /// Answer the last user message of `history`. The generator is tried once
    /// when configured; an error or a blank reply falls back to the table.
    pub async fn respond(&self, history: &[ChatMessage]) -> (String, AnswerSource) {
        let utterance = history
            .iter()
            .rev()
            .find(|m| m.role == super::models::ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");

        if let Some(generator) = &self.generator {
            match generator.generate(history).await {
                Ok(text) if !text.trim().is_empty() => {
                    return (text.trim().to_string(), AnswerSource::Model);
                }
                Ok(_) => tracing::debug!("Empty reply from text generation, using FAQ table"),
                Err(e) => tracing::warn!("Text generation failed, using FAQ table: {}", e),
            }
        }

        (fallback_answer(utterance).to_string(), AnswerSource::Fallback)
    }

    /// Append the utterance to a conversation (a new one when the id is
    /// missing or expired) and answer it.
    pub async fn ask(
        &self,
        conversation_id: Option<Uuid>,
        message: &str,
    ) -> Result<FaqReply, DomainError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::Validation(
                "message: must not be empty".to_string(),
            ));
        }

        let (id, history) = {
            let mut conversation = conversation_id
                .and_then(|id| self.conversations.remove(&id).map(|(_, c)| c))
                .unwrap_or_default();
            conversation.push(ChatMessage::user(message));
            let history = conversation.recent(MAX_HISTORY).to_vec();
            let id = conversation.id;
            self.conversations.insert(id, conversation);
            (id, history)
        };

        let (answer, source) = self.respond(&history).await;

        if let Some(mut conversation) = self.conversations.get_mut(&id) {
            conversation.push(ChatMessage::assistant(answer.clone()));
        }

        Ok(FaqReply {
            conversation_id: id,
            answer,
            source,
        })
    }

    pub fn conversation(&self, id: Uuid) -> Option<Conversation> {
        self.conversations.get(&id).map(|c| c.clone())
    }

    /// Forget a conversation; false when it did not exist
    pub fn end(&self, id: Uuid) -> bool {
        self.conversations.remove(&id).is_some()
    }

    /// Drop conversations idle for longer than `max_idle`
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let before = self.conversations.len();
        self.conversations
            .retain(|_, c| c.last_active.elapsed() <= max_idle);
        let pruned = before.saturating_sub(self.conversations.len());
        if pruned > 0 {
            tracing::debug!("Pruned {} idle FAQ conversations", pruned);
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Canned(Result<String, ()>);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _history: &[ChatMessage]) -> Result<String, DomainError> {
            self.0
                .clone()
                .map_err(|_| DomainError::External("boom".to_string()))
        }
    }

    #[test]
    fn table_is_first_match_wins() {
        assert_eq!(
            fallback_answer("What is the team size?"),
            "Team size is fixed to 2 members."
        );
        // "eligible" precedes "team" in the table
        assert!(fallback_answer("Is my team eligible?").starts_with("Eligibility"));
        assert_eq!(fallback_answer("HOW DO I REGISTER"), FALLBACK_ANSWERS[2].1);
        assert_eq!(fallback_answer("what's for lunch"), GENERIC_HINT);
    }

    #[tokio::test]
    async fn generator_reply_is_trimmed() {
        let generator: Arc<dyn TextGenerator> = Arc::new(Canned(Ok("  Two people.\n".into())));
        let faq = FaqService::new(Some(generator));
        let reply = faq.ask(None, "team size?").await.unwrap();
        assert_eq!(reply.answer, "Two people.");
        assert_eq!(reply.source, AnswerSource::Model);
    }

    #[tokio::test]
    async fn blank_or_failed_generation_falls_back() {
        for generator in [Canned(Ok("   ".into())), Canned(Err(()))] {
            let generator: Arc<dyn TextGenerator> = Arc::new(generator);
            let faq = FaqService::new(Some(generator));
            let reply = faq.ask(None, "What is the team size?").await.unwrap();
            assert_eq!(reply.answer, "Team size is fixed to 2 members.");
            assert_eq!(reply.source, AnswerSource::Fallback);
        }
    }

    #[tokio::test]
    async fn conversation_keeps_history() {
        let faq = FaqService::new(None);
        let first = faq.ask(None, "who can join?").await.unwrap();
        let second = faq
            .ask(Some(first.conversation_id), "and how to register?")
            .await
            .unwrap();
        assert_eq!(first.conversation_id, second.conversation_id);

        let conversation = faq.conversation(first.conversation_id).unwrap();
        // greeting + two exchanges
        assert_eq!(conversation.messages.len(), 5);
        assert!(faq.end(first.conversation_id));
        assert!(!faq.end(first.conversation_id));
    }

    #[tokio::test]
    async fn prune_drops_idle_conversations() {
        let faq = FaqService::new(None);
        faq.ask(None, "help").await.unwrap();
        assert_eq!(faq.prune_idle(Duration::from_secs(60)), 0);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(faq.prune_idle(Duration::ZERO), 1);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let faq = FaqService::new(None);
        assert!(matches!(
            faq.ask(None, "   ").await,
            Err(DomainError::Validation(_))
        ));
    }
}
