use serde::{Deserialize, Serialize};

/// One answered question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
}

impl ConversationTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn to_messages(&self) -> [Message; 2] {
        [
            Message::new(MessageRole::User, &self.question),
            Message::new(MessageRole::Assistant, &self.answer),
        ]
    }
}

/// Chronological log of the turns of one session.
///
/// Grows without bound until [`ConversationMemory::clear`] is called.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    turns: Vec<ConversationTurn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn as_context(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Flattens the turns into alternating user/assistant messages.
    pub fn messages(&self) -> Vec<Message> {
        self.turns.iter().flat_map(|t| t.to_messages()).collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_keeps_insertion_order() {
        let mut memory = ConversationMemory::new();
        memory.append(ConversationTurn::new("first?", "one"));
        memory.append(ConversationTurn::new("second?", "two"));
        memory.append(ConversationTurn::new("third?", "three"));

        let questions: Vec<&str> = memory
            .as_context()
            .iter()
            .map(|t| t.question.as_str())
            .collect();
        assert_eq!(questions, vec!["first?", "second?", "third?"]);
        assert_eq!(memory.as_context()[1].answer, "two");
    }

    #[test]
    fn test_memory_clear() {
        let mut memory = ConversationMemory::new();
        memory.append(ConversationTurn::new("q", "a"));
        assert_eq!(memory.len(), 1);

        memory.clear();
        assert!(memory.is_empty());
        assert!(memory.as_context().is_empty());
    }

    #[test]
    fn test_messages_alternate_roles() {
        let mut memory = ConversationMemory::new();
        memory.append(ConversationTurn::new("q1", "a1"));
        memory.append(ConversationTurn::new("q2", "a2"));

        let messages = memory.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], Message::new(MessageRole::User, "q1"));
        assert_eq!(messages[1], Message::new(MessageRole::Assistant, "a1"));
        assert_eq!(messages[3].content, "a2");
    }
}
