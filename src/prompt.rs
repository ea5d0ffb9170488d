// src/prompt.rs
//! Prompt text sent alongside the whiteboard image.
//!
//! Section order and trailing newlines are what the model has been tuned
//! against, so [`build_prompt`] concatenates fields verbatim and never
//! reformats them.

use log::debug;

pub const SYSTEM_PROMPT: &str = "You are an expert web developer who specializes in building working website prototypes from low-fidelity wireframes. Your job is to accept low-fidelity designs and turn them into high-fidelity interactive and responsive working prototypes. When sent new designs, you should reply with a high-fidelity working prototype as a single HTML file. Use tailwind (via `cdn.tailwindcss.com`) for styling. Put any JavaScript in a script tag and any additional CSS in a style tag. If you need fonts, use Google Fonts. If you need placeholder images, use solid colored rectangles. The designs may include flow charts, diagrams, labels, arrows, sticky notes, screenshots of other applications, or even previous designs. Treat all of these as references for your prototype. Use your best judgement to determine what is an annotation and what should be included in the final result. Treat anything in red as an annotation rather than part of the design. Do not include any annotations in the final result. If the wireframes are missing something, use what you know about applications, user experience and website design to fill in the blanks. Your prototype should look and feel much more complete and advanced than the wireframes provided. Flesh it out, make it real!";

pub const USER_PROMPT: &str = "Here are the latest wireframes. Please reply with a high-fidelity working prototype as a single HTML file.";

pub const USER_PROMPT_WITH_PREVIOUS_DESIGN: &str = "Here are the latest wireframes. There are also some previous outputs here. We have run their code through an 'HTML to screenshot' library to generate a screenshot of the page. The generated screenshot may have some inaccuracies so please use your knowledge of HTML and web development to figure out what any annotations are for. It is probably an annotation if it is red and not a design element of the previous outputs. Please reply with a high-fidelity working prototype as a single HTML file.";

pub const DEFAULT_THEME: &str = "light";

/// Which user instruction opens the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionVariant {
    Fresh,
    WithPreviousDesigns,
}

impl InstructionVariant {
    pub fn for_previews(previews: &[PreviousPreview]) -> Self {
        if previews.is_empty() {
            Self::Fresh
        } else {
            Self::WithPreviousDesigns
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Fresh => USER_PROMPT,
            Self::WithPreviousDesigns => USER_PROMPT_WITH_PREVIOUS_DESIGN,
        }
    }
}

/// Grid drawn on top of the whiteboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOverlay {
    pub color: String,
    /// Cell edge in pixels.
    pub size: u32,
    pub labels: bool,
}

/// HTML produced by an earlier generation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousPreview {
    pub html: String,
}

impl PreviousPreview {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[derive(Debug, Clone)]
pub struct PromptContext {
    /// Text detected on the whiteboard.
    pub text: Option<String>,
    pub grid: Option<GridOverlay>,
    pub theme: String,
    pub previous_previews: Vec<PreviousPreview>,
}

impl Default for PromptContext {
    fn default() -> Self {
        Self {
            text: None,
            grid: None,
            theme: DEFAULT_THEME.to_string(),
            previous_previews: Vec::new(),
        }
    }
}

impl PromptContext {
    pub fn instruction(&self) -> InstructionVariant {
        InstructionVariant::for_previews(&self.previous_previews)
    }
}

pub fn build_prompt(context: &PromptContext) -> String {
    let mut prompt = String::new();
    prompt.push_str(SYSTEM_PROMPT);
    prompt.push('\n');
    prompt.push_str(context.instruction().text());
    prompt.push('\n');

    if let Some(text) = context.text.as_deref().filter(|t| !t.is_empty()) {
        prompt.push_str("Here's a list of text that we found in the design:\n");
        prompt.push_str(text);
        prompt.push('\n');
    }

    if let Some(grid) = &context.grid {
        prompt.push_str(&format!(
            "The designs have a {} grid overlaid on top. Each cell of the grid is {}x{}px.\n",
            grid.color, grid.size, grid.size
        ));
    }

    for preview in &context.previous_previews {
        prompt.push_str("Previous design result:\nImage source:\n\nHTML:\n");
        prompt.push_str(&preview.html);
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "Please make your result use the {} theme.\n",
        context.theme
    ));

    debug!("Prompt: {}", prompt);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_context() -> PromptContext {
        PromptContext {
            text: Some("Login\nPassword".to_string()),
            grid: Some(GridOverlay {
                color: "blue".to_string(),
                size: 20,
                labels: true,
            }),
            theme: "dark".to_string(),
            previous_previews: vec![
                PreviousPreview::new("<html>first</html>"),
                PreviousPreview::new("<html>second</html>"),
            ],
        }
    }

    #[test]
    fn defaults_to_light_theme() {
        let prompt = build_prompt(&PromptContext::default());
        assert!(prompt.ends_with("Please make your result use the light theme.\n"));
    }

    #[test]
    fn minimal_prompt_is_exact() {
        let prompt = build_prompt(&PromptContext::default());
        let expected = format!(
            "{}\n{}\nPlease make your result use the light theme.\n",
            SYSTEM_PROMPT, USER_PROMPT
        );
        assert_eq!(prompt, expected);
    }

    #[test]
    fn composition_is_stable() {
        let context = full_context();
        assert_eq!(build_prompt(&context), build_prompt(&context));
    }

    #[test]
    fn fresh_instruction_without_previews() {
        let context = PromptContext::default();
        assert_eq!(context.instruction(), InstructionVariant::Fresh);

        let prompt = build_prompt(&context);
        assert!(prompt.contains(USER_PROMPT));
        assert!(!prompt.contains(USER_PROMPT_WITH_PREVIOUS_DESIGN));
    }

    #[test]
    fn previous_design_instruction_with_previews() {
        let context = full_context();
        assert_eq!(context.instruction(), InstructionVariant::WithPreviousDesigns);

        let prompt = build_prompt(&context);
        assert!(prompt.contains(USER_PROMPT_WITH_PREVIOUS_DESIGN));
        assert!(!prompt.contains(&format!("\n{}\n", USER_PROMPT)));
    }

    #[test]
    fn one_section_per_preview_in_order() {
        let prompt = build_prompt(&full_context());
        assert_eq!(prompt.matches("Previous design result:").count(), 2);

        let first = prompt.find("HTML:\n<html>first</html>\n").unwrap();
        let second = prompt.find("HTML:\n<html>second</html>\n").unwrap();
        assert!(first < second);
    }

    #[test]
    fn sections_follow_fixed_order() {
        let prompt = build_prompt(&full_context());

        let system = prompt.find(SYSTEM_PROMPT).unwrap();
        let user = prompt.find(USER_PROMPT_WITH_PREVIOUS_DESIGN).unwrap();
        let text = prompt
            .find("Here's a list of text that we found in the design:\nLogin\nPassword\n")
            .unwrap();
        let grid = prompt
            .find("The designs have a blue grid overlaid on top. Each cell of the grid is 20x20px.\n")
            .unwrap();
        let preview = prompt.find("Previous design result:").unwrap();
        let theme = prompt.find("Please make your result use the dark theme.\n").unwrap();

        assert!(system < user);
        assert!(user < text);
        assert!(text < grid);
        assert!(grid < preview);
        assert!(preview < theme);
        assert!(prompt.ends_with("Please make your result use the dark theme.\n"));
    }

    #[test]
    fn empty_text_is_skipped() {
        let context = PromptContext {
            text: Some(String::new()),
            ..PromptContext::default()
        };
        assert!(!build_prompt(&context).contains("Here's a list of text"));
    }

    #[test]
    fn preview_html_is_verbatim() {
        let html = "  <div>\n\tindented  </div>\n\n";
        let context = PromptContext {
            previous_previews: vec![PreviousPreview::new(html)],
            ..PromptContext::default()
        };
        let prompt = build_prompt(&context);
        assert!(prompt.contains(&format!(
            "Previous design result:\nImage source:\n\nHTML:\n{}\n",
            html
        )));
    }
}
