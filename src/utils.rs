use lazy_static::lazy_static;
use onig::{Captures, Regex};

pub fn is_uppercase(string: &str) -> bool {
    string.chars().any(|x| x.is_uppercase()) && !string.chars().any(|x| x.is_lowercase())
}

pub fn starts_uppercase(string: &str) -> bool {
    string.chars().next().map_or(false, |x| x.is_uppercase())
}

// remove duplicate whitespaces
pub fn normalize_whitespace(string: &str) -> String {
    lazy_static! {
        static ref REGEX: Regex = Regex::new(r"(\s)\s+").unwrap();
    }

    REGEX.replace_all(string, |caps: &Captures| caps.at(1).unwrap().to_string())
}

#[inline]
pub fn right_punctuation() -> &'static str {
    r##".,:;)]!%?…»“”’°"##
}

#[inline]
pub fn left_punctuation() -> &'static str {
    r##"([„‚«"##
}

#[inline]
pub fn center_punctuation() -> &'static str {
    r##"/~"##
}

/// Normalizes the spacing of space-joined token text: a single space between tokens,
/// no space before closing punctuation, after opening punctuation, or around slashes.
pub fn correct_spaces(text: &str) -> String {
    lazy_static! {
        static ref BEFORE_RIGHT: Regex =
            Regex::new(&format!(r"\s+([{}])", regex_class(right_punctuation()))).unwrap();
        static ref AFTER_LEFT: Regex =
            Regex::new(&format!(r"([{}])\s+", regex_class(left_punctuation()))).unwrap();
        static ref AROUND_CENTER: Regex =
            Regex::new(&format!(r"\s*([{}])\s*", regex_class(center_punctuation()))).unwrap();
    }

    let text = normalize_whitespace(text.trim()).replace(char::is_whitespace, " ");
    let text = BEFORE_RIGHT.replace_all(&text, |caps: &Captures| caps.at(1).unwrap().to_string());
    let text = AFTER_LEFT.replace_all(&text, |caps: &Captures| caps.at(1).unwrap().to_string());
    AROUND_CENTER.replace_all(&text, |caps: &Captures| caps.at(1).unwrap().to_string())
}

fn regex_class(chars: &str) -> String {
    chars
        .chars()
        .map(|c| match c {
            ']' | '[' | '\\' | '^' | '-' => format!("\\{}", c),
            c => c.to_string(),
        })
        .collect()
}
