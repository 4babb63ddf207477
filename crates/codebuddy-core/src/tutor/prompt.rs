//! Instructional prompt template for the CodeBuddy tutor persona.
//!
//! The user's text is embedded verbatim. The template always requests the
//! same four markdown sections; only the image-signalling instructions differ
//! between [`PromptMode::Marker`] and [`PromptMode::Structured`].

use codebuddy_types::tutor::PromptMode;

use super::marker::MARKER_OPEN;

/// The four section headings every answer is asked to contain.
pub const ANSWER_SECTIONS: [&str; 4] = [
    "### 🧠 Concept Summary",
    "### 🔍 Real World Example",
    "### 📊 Visualization (Code or Diagram)",
    "### 🎯 Quick Quiz",
];

/// Build the full instructional prompt for one user question.
pub fn build_tutor_prompt(user_text: &str, mode: PromptMode) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are CodeBuddy, an expert AI coding tutor for a user who needs to understand: \"{user_text}\".\n\n"
    ));

    match mode {
        PromptMode::Marker => {
            prompt.push_str(&format!(
                "First, decide if an image would help. If so, create a detailed search query using the tag {MARKER_OPEN} ...].\n"
            ));
            prompt.push_str(&format!(
                "Example: {MARKER_OPEN} simple photosynthesis diagram for kids illustration]\n\n"
            ));
            prompt.push_str(
                "Then, continue with the normal 4-section explanation. If a text-diagram is better, use Mermaid.\n\n",
            );
        }
        PromptMode::Structured => {
            prompt.push_str(
                "First, decide if an image would help. If so, put a detailed stock-photo search query in \"image_query\" \
                 (for example: \"simple photosynthesis diagram for kids illustration\"); otherwise set it to null.\n\n",
            );
            prompt.push_str(
                "Then, write the normal 4-section explanation as markdown in \"answer\". If a text-diagram is better, use Mermaid.\n\n",
            );
        }
    }

    for section in ANSWER_SECTIONS {
        prompt.push_str(section);
        prompt.push('\n');
    }

    if mode == PromptMode::Structured {
        prompt.push_str(
            "\nRespond with a single JSON object with exactly two keys: \"answer\" (string) and \"image_query\" (string or null).\n",
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeds_user_text_verbatim() {
        let prompt = build_tutor_prompt("What are SQL Joins?", PromptMode::Marker);
        assert!(prompt.contains("needs to understand: \"What are SQL Joins?\""));
    }

    #[test]
    fn test_requests_all_four_sections() {
        for mode in [PromptMode::Marker, PromptMode::Structured] {
            let prompt = build_tutor_prompt("recursion", mode);
            for section in ANSWER_SECTIONS {
                assert!(prompt.contains(section), "missing {section} in {mode:?}");
            }
        }
    }

    #[test]
    fn test_marker_mode_describes_marker() {
        let prompt = build_tutor_prompt("recursion", PromptMode::Marker);
        assert!(prompt.contains("[SEARCH_IMAGE: ...]"));
        assert!(prompt.contains("Mermaid"));
        assert!(!prompt.contains("image_query"));
    }

    #[test]
    fn test_structured_mode_asks_for_json() {
        let prompt = build_tutor_prompt("recursion", PromptMode::Structured);
        assert!(prompt.contains("\"image_query\""));
        assert!(prompt.contains("JSON object"));
        assert!(!prompt.contains("[SEARCH_IMAGE:"));
    }
}
