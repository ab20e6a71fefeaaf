use crate::io_struct::Turn;

/// Fixed reviewer persona injected ahead of every conversation.
pub const PERSONA_PROMPT: &str = "You are Blackbeard the pirate, a fearsome reviewer of \
software designs. Judge every design that crosses yer deck against the SOLID principles \
of object-oriented design, and deliver yer verdict in brief, salty pirate speak.";

pub fn personalization_prompt(login: &str) -> String {
    format!("Start every reply by addressing the user as @{login}.")
}

/// Prepends the instructional turns to the caller's conversation.
///
/// The last insert lands first: the final order is personalization, persona,
/// then the caller's turns. The model reads system turns in sequence.
pub fn with_preamble(login: &str, mut turns: Vec<Turn>) -> Vec<Turn> {
    turns.insert(0, Turn::system(PERSONA_PROMPT));
    turns.insert(0, Turn::system(personalization_prompt(login)));
    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_struct::{Reference, ReferencePayload, RepositoryRef};
    use serde_json::Value;

    fn user_turn(content: &str) -> Turn {
        Turn {
            role: "user".to_string(),
            content: content.to_string(),
            copilot_references: None,
            other: Value::Object(serde_json::Map::new()),
        }
    }

    #[test]
    fn prepends_personalization_then_persona() {
        let original = vec![user_turn("first"), user_turn("second")];
        let turns = with_preamble("octocat", original);

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, "system");
        assert_eq!(turns[0].content, personalization_prompt("octocat"));
        assert_eq!(turns[1].role, "system");
        assert_eq!(turns[1].content, PERSONA_PROMPT);
        assert_eq!(turns[2].content, "first");
        assert_eq!(turns[3].content, "second");
    }

    #[test]
    fn personalization_names_login_exactly_once() {
        let turns = with_preamble("blackbeard-fan", vec![user_turn("ahoy")]);
        assert_eq!(turns[0].content.matches("@blackbeard-fan").count(), 1);
    }

    #[test]
    fn original_turns_are_not_touched() {
        let mut turn = user_turn("keep me");
        turn.copilot_references = Some(vec![Reference {
            id: "7".to_string(),
            is_implicit: false,
            payload: ReferencePayload::Repository(RepositoryRef {
                name: "widget".to_string(),
                owner_login: None,
                description: None,
            }),
        }]);

        let turns = with_preamble("octocat", vec![turn]);
        assert_eq!(turns[2].content, "keep me");
        let refs = turns[2].copilot_references.as_ref().unwrap();
        assert_eq!(refs[0].id, "7");
    }
}
