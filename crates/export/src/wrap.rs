//! Greedy word wrapping for monospaced text.

/// Wrap `text` into lines of at most `width` characters.
///
/// Explicit line breaks are kept (blank lines included), runs of whitespace
/// between words collapse to one space, and words longer than `width` are
/// split across lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            if current_len > 0 && current_len + 1 + word.len() <= width {
                current.push(' ');
                current.push_str(&word.iter().collect::<String>());
                current_len += 1 + word.len();
                continue;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            while word.len() > width {
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            current = word.iter().collect();
            current_len = word.len();
        }

        lines.push(current);
    }

    lines
}
