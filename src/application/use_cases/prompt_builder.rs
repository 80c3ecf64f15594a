use crate::domain::caption::{rating_tone, CaptionRequest, CaptionStyle};
use rand::seq::SliceRandom;
use rand::Rng;

const OPENERS: [&str; 5] = [
    "You are a top social media copywriter for Facebook and Instagram.",
    "You are the creative voice behind a popular lifestyle account.",
    "You write captions that make people stop scrolling.",
    "You are a friendly influencer who is great with words.",
    "You are a copywriter who turns everyday photos into engaging posts.",
];

const PERSPECTIVES: [&str; 4] = [
    "Write in the first person, as the person who took the photo.",
    "Write as if sharing the moment with close friends.",
    "Write as if inviting followers to experience this themselves.",
    "Write as a storyteller looking back on this moment.",
];

const MOODS: [&str; 5] = [
    "Keep the energy bright and upbeat.",
    "Let the words feel relaxed and unhurried.",
    "Aim for a cosy, intimate feeling.",
    "Bring a touch of curiosity and surprise.",
    "Make it feel fresh and spontaneous.",
];

const ENDINGS: [&str; 4] = [
    "End each caption with a question or a call to action that invites comments.",
    "Close each caption with a line people will want to share.",
    "Finish each caption with a short, memorable sign-off.",
    "Wrap up each caption in a way that invites likes and replies.",
];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, phrases: &'a [&'a str]) -> &'a str {
    phrases.choose(rng).copied().unwrap_or_default()
}

/// Builds the caption prompt. Each call draws one phrase from every
/// variation list, so repeated requests for the same photo read differently.
pub fn build_caption_prompt<R: Rng + ?Sized>(
    request: &CaptionRequest,
    output_language: &str,
    rng: &mut R,
) -> String {
    let styles = request.effective_styles();
    let mut prompt = String::new();

    prompt.push_str(pick(rng, &OPENERS));
    prompt.push_str("\n\n");
    prompt.push_str(&format!(
        "Task: look at the attached photo together with the user's own description \"{}\" and write {} social media captions.\n",
        request.description_or_default(),
        styles.len()
    ));

    if let Some(place) = request.place_name.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        prompt.push_str(&format!(
            "The photo was taken at \"{}\". Mention the place naturally.\n",
            place
        ));
    }

    if let Some(tone) = request.rating.and_then(rating_tone) {
        prompt.push_str(&format!(
            "The user rated the experience {} out of 5 stars. Tone: {}.\n",
            request.rating.unwrap_or_default(),
            tone
        ));
    }

    prompt.push_str("\nWrite one caption for each of these styles, in this order:\n");
    for (idx, style) in styles.iter().enumerate() {
        let profile = style.profile();
        prompt.push_str(&format!(
            "{}. {} {} ({}): {}\n",
            idx + 1,
            profile.emoji,
            profile.label,
            profile.key,
            profile.description
        ));
    }

    prompt.push_str("\nRequirements:\n");
    prompt.push_str("- Natural, conversational, matching current social media tone\n");
    prompt.push_str("- Use fitting emoji to make the captions eye-catching\n");
    prompt.push_str("- Each caption is 50 to 150 characters long\n");
    prompt.push_str(&format!("- {}\n", pick(rng, &PERSPECTIVES)));
    prompt.push_str(&format!("- {}\n", pick(rng, &MOODS)));
    prompt.push_str(&format!("- {}\n", pick(rng, &ENDINGS)));
    prompt.push_str(&format!("- Write every caption in {}\n", output_language));

    prompt.push_str(&format!(
        "\nReturn ONLY a JSON array, no explanation, in this format:\n{}",
        output_example(&styles)
    ));

    prompt
}

fn output_example(styles: &[CaptionStyle]) -> String {
    let items: Vec<String> = styles
        .iter()
        .enumerate()
        .map(|(idx, style)| {
            format!(
                "{{\"style\": \"{}\", \"text\": \"caption {}...\"}}",
                style.profile().key,
                idx + 1
            )
        })
        .collect();
    format!("[{}]", items.join(", "))
}

pub fn build_place_prompt(name: &str, output_language: &str) -> String {
    format!(
        r#"You are an experienced local travel guide.

Give the key facts about the place or attraction named "{name}".

Return ONLY a JSON object, no explanation, with exactly these fields:
{{
  "name": "official name of the place",
  "summary": "two or three sentences describing the place",
  "highlights": ["what makes it worth visiting", "..."],
  "tips": ["practical visitor tips", "..."],
  "best_time": "the best time of day or year to visit",
  "category": "e.g. restaurant, temple, night market, viewpoint"
}}

Write all text values in {output_language}. If you do not know the place, say so in "summary" and leave the lists empty."#
    )
}
