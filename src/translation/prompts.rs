/*!
 * Prompt templates for slide text translation.
 */

/// Instruction template with `{src_language}`, `{target_language}` and `{major}` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default instruction sent ahead of every text run.
    pub const SLIDE_TRANSLATOR: &'static str = "Translate the following text from {src_language} into {target_language}. Only translate the text, do not return any other characters. Major of text is {major}";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default slide translator template.
    pub fn slide_translator() -> Self {
        Self::new(Self::SLIDE_TRANSLATOR)
    }

    /// Render the instruction for one pipeline run.
    ///
    /// Placeholders are substituted in a single left-to-right pass, so values
    /// that themselves contain `{...}` are inserted verbatim. Unknown braces
    /// are kept as they are.
    pub fn render(&self, src_language: &str, target_language: &str, major: &str) -> String {
        let values = [
            ("{src_language}", src_language),
            ("{target_language}", target_language),
            ("{major}", major),
        ];

        let mut rendered = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            rendered.push_str(&rest[..start]);
            let tail = &rest[start..];
            match values.iter().find(|(placeholder, _)| tail.starts_with(placeholder)) {
                Some((placeholder, value)) => {
                    rendered.push_str(value);
                    rest = &tail[placeholder.len()..];
                }
                None => {
                    rendered.push('{');
                    rest = &tail[1..];
                }
            }
        }
        rendered.push_str(rest);
        rendered
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::slide_translator()
    }
}

/// Full prompt for one run: the instruction, then the text on its own line.
pub fn compose_prompt(instruction: &str, text: &str) -> String {
    format!("{}\n{}\n", instruction, text)
}
