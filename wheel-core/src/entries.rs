use rand::Rng;
use rand::seq::SliceRandom;

/// One entry per non-blank line, trimmed.
pub fn parse_entries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_entries(entries: &[String]) -> String {
    entries.join("\n")
}

pub fn shuffle_entries<R: Rng + ?Sized>(entries: &mut [String], rng: &mut R) {
    entries.shuffle(rng);
}

pub fn sort_entries(entries: &mut [String]) {
    entries.sort();
}

/// Hint shown under the wheel for the current entry count.
pub fn status_message(count: usize) -> &'static str {
    match count {
        0 => "Add some names to spin!",
        1 => "One person left!",
        _ => "",
    }
}

pub const ALL_SELECTED_MESSAGE: &str = "All names have been selected!";
