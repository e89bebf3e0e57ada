//! Classifies a user message as fresh candidate information or as a
//! request about an already stored resume.
//!
//! The rule is intentionally coarse and must stay exactly as is: stored
//! resumes are only spliced into prompts that fail this check.

/// Messages longer than this many characters count as full information.
pub const FULL_INFO_MIN_CHARS: usize = 300;

/// Resume field markers, matched against the lowercased message.
pub const RESUME_KEYWORDS: [&str; 8] = [
    "experience:",
    "skills:",
    "education:",
    "projects:",
    "summary:",
    "work experience",
    "years of experience",
    "responsibilities",
];

/// Returns true if the text already looks like full candidate information.
pub fn looks_like_full_info(text: &str) -> bool {
    if text.chars().count() > FULL_INFO_MIN_CHARS {
        return true;
    }

    let lowered = text.to_lowercase();
    RESUME_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}
