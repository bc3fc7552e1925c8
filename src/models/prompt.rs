use std::fmt;

use super::coach::CoachRequest;

const COACH_PREAMBLE: &str = "You are a supportive coach who draws on Carol Dweck's growth mindset research and on Socratic questioning. Help the user reach their own insight through thoughtful questions rather than handing out advice.";

const REPLY_RULES: &str = "\
Write a warm, concise reply of exactly four short paragraphs.
- Separate paragraphs with one blank line.
- Plain text only: no markdown, no lists, no bold text, no headings or section labels.

Paragraph order:
1) Acknowledge: validate how they feel with empathy in one or two sentences.
2) Explore: ask reflective questions that open a different angle. Use the word \"explore\" or a close synonym such as \"look at\", \"consider\" or \"examine\".
3) Action: offer exactly one small, concrete next step, phrased with words like \"try\", \"experiment with\" or \"practice\".
4) Reframe: close with a growth-mindset reframe, for example \"another way to look at this is...\" or \"what might change if...\".

Guidelines:
- Sound conversational and human.
- Question assumptions gently and let them find their own answers.
- Keep the whole reply under 200 words.";

const CLOSING: &str = "Return only the four paragraphs.";

/// The single instruction string sent upstream for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt(String);

impl RenderedPrompt {
    /// Renders the coaching template. Fields are embedded as-is; they are
    /// already sanitized by [`CoachRequest::from_value`].
    pub fn render(req: &CoachRequest) -> Self {
        let name_rule = if req.has_name() {
            format!(
                "Address the user by name ({}) once, naturally, in the opening sentence.",
                req.name
            )
        } else {
            "No name was provided. Do not invent a name or address the user by any name.".to_string()
        };
        let context = if req.has_context() {
            format!("\nPrevious conversation context: {}\n", req.conversation_context)
        } else {
            String::new()
        };
        let shown_name = if req.has_name() { req.name.as_str() } else { "(not provided)" };

        Self(format!(
            "{COACH_PREAMBLE}\n\nUser's name: {shown_name}\nUser's current challenge: \"{input}\"\n\n{name_rule}\n\n{REPLY_RULES}\n{context}\n{CLOSING}",
            input = req.user_input,
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
