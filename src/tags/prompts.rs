//! Prompt-token extraction from generation-parameter text
//!
//! Generated images often embed a parameter block of the form
//! `prompt tokens, ... Negative prompt: ..., Steps: 25, ...`. Only the
//! positive prompt is useful as a tag suggestion.

const NEGATIVE_MARKER: &str = " Negative prompt: ";

/// Comma-separated tokens of the positive prompt
///
/// Emphasis brackets are stripped and empty tokens dropped.
///
/// # Examples
/// ```
/// # use galtag::tags::prompt_tokens;
/// let tokens = prompt_tokens("giraffe, music, (icon) Negative prompt: ugly");
/// assert_eq!(tokens, vec!["giraffe", "music", "icon"]);
/// ```
#[must_use]
pub fn prompt_tokens(parameters: &str) -> Vec<&str> {
    let positive = parameters
        .split(NEGATIVE_MARKER)
        .next()
        .unwrap_or_default();

    positive
        .split(',')
        .map(clean_token)
        .filter(|token| !token.is_empty())
        .collect()
}

fn clean_token(token: &str) -> &str {
    token
        .trim()
        .trim_start_matches(['(', '['])
        .trim_end_matches([')', ']'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_tokens_stop_at_negative_prompt() {
        let text = "giraffe, music, coloredic0n icon <lora:Colored_Icons:1> Negative prompt: \
                    EasyNegative, (((duplicate))), ((morbid)), [out of frame], blurry, \
                    Steps: 25, Sampler: Euler a, CFG scale: 7, Seed: 1804880831, Size: 512x512";

        assert_eq!(
            prompt_tokens(text),
            vec!["giraffe", "music", "coloredic0n icon <lora:Colored_Icons:1>"]
        );
    }

    #[test]
    fn test_emphasis_brackets_are_stripped() {
        let tokens = prompt_tokens("((masterpiece)), [[sketch]], (nested [mix])");
        assert_eq!(tokens, vec!["masterpiece", "sketch", "nested [mix"]);
    }

    #[test]
    fn test_empty_tokens_dropped() {
        assert_eq!(prompt_tokens("a,, ,b,"), vec!["a", "b"]);
        assert!(prompt_tokens("").is_empty());
        assert!(prompt_tokens(" Negative prompt: only negative").is_empty());
    }
}
