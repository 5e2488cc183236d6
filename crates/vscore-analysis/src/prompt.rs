//! Analysis prompt construction.

use vscore_models::VideoMetadata;

/// Characters of description included in the prompt.
pub const DESCRIPTION_EXCERPT_CHARS: usize = 500;

/// Tags included in the prompt.
pub const PROMPT_TAG_LIMIT: usize = 10;

/// Build the analysis prompt for `metadata`.
pub fn build_prompt(metadata: &VideoMetadata) -> String {
    let description = metadata.description_excerpt(DESCRIPTION_EXCERPT_CHARS);
    let tags = metadata.leading_tags(PROMPT_TAG_LIMIT).join(", ");
    let views = format_count(metadata.view_count);
    let likes = format_count(metadata.like_count);
    let title = &metadata.title;
    let channel = &metadata.channel_name;

    format!(
        r#"You are an expert YouTube content analyst. Analyze this video and provide a detailed score breakdown.

VIDEO INFORMATION:
- Title: {title}
- Description: {description}...
- Channel: {channel}
- Tags: {tags}
- Views: {views}
- Likes: {likes}

REQUIRED ANALYSIS:
1. Score each factor from 0 to 100:
   - thumbnail: visual appeal, clarity, emotion, text readability
   - title: clarity, curiosity, keywords, length
   - description: SEO, links, timestamps, call-to-action
   - tags: relevance, search volume, specificity
   - engagement: hook, retention, pacing, editing
   - seo: overall discoverability
2. Give specific improvement suggestions, each with a priority of high, medium or low.
3. Predict the viral potential from 0 to 100.

Return ONLY a single JSON object with exactly this structure:
{{
  "overall_score": 75,
  "scores": {{
    "thumbnail": 80,
    "title": 70,
    "description": 65,
    "tags": 60,
    "engagement": 85,
    "seo": 72
  }},
  "improvements": [
    {{
      "category": "title",
      "priority": "high",
      "suggestion": "Specific, actionable suggestion",
      "impact": "Expected effect of the change"
    }}
  ],
  "viral_potential": 65,
  "strengths": ["strength 1", "strength 2"],
  "weaknesses": ["weakness 1", "weakness 2"]
}}
"#
    )
}

/// Format an integer with thousands separators: `1234567` -> `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
