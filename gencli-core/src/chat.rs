//! Plain conversation with the model, used when input is not a command.

use crate::config::Settings;
use crate::error::Result;
use crate::llm::{ChatTurn, LanguageModel, ModelRequest};
use crate::prompts::{PromptKind, get_prompt};
use std::collections::VecDeque;

/// User and model turns kept as context, counted individually.
pub const DEFAULT_HISTORY_TURNS: usize = 20;

#[derive(Debug, Clone)]
pub struct ChatSession {
    history: VecDeque<ChatTurn>,
    max_turns: usize,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_TURNS)
    }
}

impl ChatSession {
    pub fn new(max_turns: usize) -> Self {
        Self {
            history: VecDeque::new(),
            max_turns,
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &ChatTurn> {
        self.history.iter()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Send `message` with the session history and record the exchange.
    ///
    /// A failed call leaves the history untouched.
    pub async fn send(
        &mut self,
        model: &dyn LanguageModel,
        settings: &Settings,
        message: &str,
    ) -> Result<String> {
        let request = ModelRequest::new(
            &settings.model,
            get_prompt(PromptKind::Chat, settings.language),
            message,
        )
        .with_temperature(settings.temperature)
        .with_history(self.history.iter().cloned().collect());

        let response = model.generate(request).await?;
        self.push(ChatTurn::user(message));
        self.push(ChatTurn::model(&response.text));
        Ok(response.text)
    }

    fn push(&mut self, turn: ChatTurn) {
        self.history.push_back(turn);
        while self.history.len() > self.max_turns {
            self.history.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded() {
        let mut session = ChatSession::new(3);
        for i in 0..5 {
            session.push(ChatTurn::user(format!("m{i}")));
        }
        let kept: Vec<&str> = session.history().map(|turn| turn.text.as_str()).collect();
        assert_eq!(kept, vec!["m2", "m3", "m4"]);
    }
}
