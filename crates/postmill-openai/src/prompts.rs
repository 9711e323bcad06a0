// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instruction text for the three text-generation ports.

use postmill_core::types::SEO_CHECKLIST_SIZE;

/// Brand voice and positioning shared by every prompt.
pub const BRAND_CONTEXT: &str = "\
Brand: Jesse A. Eisenbalm
Product: premium limited-edition beeswax lip balm, hand-numbered, petrolatum-free.
Mission: keep humans human in an AI-driven world. Ritual: Stop. Breathe. Balm.
Philanthropy: 100% of proceeds go to charity.
Tone: calm, minimal, philosophical. Never corporate, never hyperbolic.
Audience: professionals and knowledge workers dealing with digital fatigue who value \
mindfulness, ingredient transparency, and intentional living.
Avoid: AI buzzwords, hollow wellness cliches, filler openers, exclamation marks.
Call to action: https://jesseaeisenbalm.com";

/// Topic pillars the topic port balances across.
pub const CONTENT_PILLARS: [&str; 5] = [
    "ingredient_science",
    "ritual_mindfulness",
    "digital_wellness_professional",
    "lip_skinification",
    "lifestyle_intentionality",
];

/// Pillar assigned when the provider omits one.
pub const DEFAULT_PILLAR: &str = "lifestyle_intentionality";

/// The audit checklist, one line per check.
pub const SEO_CHECKS: [&str; SEO_CHECKLIST_SIZE as usize] = [
    "Focus keyphrase in title",
    "Focus keyphrase in the slug derived from the title",
    "Focus keyphrase in the excerpt",
    "Focus keyphrase in the first <p>",
    "Focus keyphrase in at least one <h2>",
    "Keyphrase density between 0.5% and 3%",
    "Word count of at least 300 (target 900+)",
    "At least one <h2> subheading",
    "Title is 50-60 characters",
    "Excerpt is 150-160 characters",
    "At least one internal link to jesseaeisenbalm.com",
    "At least one external link to a credible source",
    "At least one external link to a high-authority health, beauty, or business domain",
    "FAQ section with at least three <h3> question and <p> answer pairs",
    "Every <img> has a descriptive alt attribute",
    "Answer-first opening paragraph an AI assistant could cite",
    "FAQ questions phrased the way people ask AI assistants",
];

pub fn content_system_prompt() -> String {
    format!(
        "You are a senior content writer producing SEO and generative-engine optimised blog posts.\n\n\
         {BRAND_CONTEXT}\n\n\
         Write 900-1200 words of HTML body using <p>, <h2>, <h3>, <ul>, and <a>. Open with a direct \
         2-4 sentence answer to the topic's implicit question. Include a \"Frequently Asked \
         Questions\" <h2> with 3-4 conversational <h3> questions before a closing call to action. \
         Use 2-4 lowercase tags.\n\n\
         Return ONLY a JSON object:\n\
         {{\"title\": string, \"excerpt\": string, \"content\": string, \"tags\": [string], \
         \"focus_keyphrase\": string}}"
    )
}

pub fn content_user_prompt(topic: &str, focus_keyphrase: &str) -> String {
    format!(
        "Topic: {topic}\nFocus keyphrase: {focus_keyphrase}\n\n\
         Write the full blog post now."
    )
}

pub fn revision_system_prompt() -> String {
    let checks = SEO_CHECKS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {c}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a senior SEO editor. Audit the draft against the checklist below, fix every \
         failing check directly in the returned post, and keep the brand voice.\n\n\
         {BRAND_CONTEXT}\n\n\
         CHECKLIST ({SEO_CHECKLIST_SIZE} checks, 1 point each):\n{checks}\n\n\
         Confidence score: base it on checks passed (all {SEO_CHECKLIST_SIZE} -> 95-100, \
         15-16 -> 85-94, 13-14 -> 72-84, 11-12 -> 58-71, fewer -> 40-57), adjusted by up to 3 \
         points for depth, clarity, and brand fit.\n\n\
         Return ONLY a JSON object:\n\
         {{\"title\": string, \"excerpt\": string, \"content\": string, \"tags\": [string], \
         \"confidence_score\": number, \"seo_checks_passed\": number, \"revision_notes\": string}}"
    )
}

pub fn revision_user_prompt(
    title: &str,
    excerpt: &str,
    content: &str,
    tags: &[String],
    focus_keyphrase: &str,
) -> String {
    format!(
        "Focus keyphrase: {focus_keyphrase}\n\nDRAFT:\nTitle: {title}\nExcerpt: {excerpt}\n\
         Tags: {}\n\nContent:\n{content}\n\n\
         Audit against all {SEO_CHECKLIST_SIZE} checks, apply the fixes, and return the improved \
         post with your confidence score and revision notes.",
        tags.join(", ")
    )
}

pub fn topic_system_prompt() -> String {
    let pillars = CONTENT_PILLARS.join(" | ");
    format!(
        "You are a search strategist generating blog topics that rank on search engines and get \
         cited by AI assistants.\n\n\
         {BRAND_CONTEXT}\n\n\
         Each topic targets a real conversational query, has clear informational or commercial \
         intent, and offers genuine value rather than a sales pitch.\n\n\
         Return ONLY a JSON object:\n\
         {{\"topics\": [{{\"topic\": string, \"focus_keyphrase\": string (2-4 words), \
         \"keywords\": [string], \"content_pillar\": one of {pillars}}}]}}"
    )
}

pub fn topic_user_prompt(count: usize, existing: &[String]) -> String {
    let mut prompt = format!(
        "Generate {count} unique blog topic ideas for the brand, spread across all content \
         pillars, mixing broad awareness topics with long-tail ones."
    );
    if !existing.is_empty() {
        prompt.push_str("\n\nTopics already in use. Do not duplicate or closely overlap:\n");
        for topic in existing {
            prompt.push_str("- ");
            prompt.push_str(topic);
            prompt.push('\n');
        }
    }
    prompt
}
