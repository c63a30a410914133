use super::{token::Token, usfm_tokenizer::tokenize};

/// Markers that begin a new logical line in normalized USFM. Character
/// styles, footnotes, and cross references stay inline.
const LINE_MARKERS: &[&str] = &[
    "id", "h", "toc", "mt", "ms", "mr", "c", "s", "r", "d", "sp", "p", "m", "po", "pr", "cls",
    "pmo", "pm", "pmc", "pi", "mi", "nb", "q", "qr", "qc", "qa", "qm", "b", "li", "pc", "ph", "v",
];

fn starts_line(token: &Token) -> bool {
    token
        .marker_name()
        .is_some_and(|name| LINE_MARKERS.contains(&name))
}

/// Splits a chapter into logical lines: one verse or paragraph-class marker
/// per line, the way the chapter store keeps them.
///
/// Physical newlines separate lines too, and a verse or paragraph marker
/// occurring mid-line starts a fresh one, so a chapter that lost its line
/// breaks still splits into verse-sized units. Line separators are
/// normalized; `join_lines` restores `\n`.
#[must_use]
pub fn split_lines(usfm: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for token in tokenize(usfm) {
        match &token {
            Token::Marker(text) => {
                if starts_line(&token) && !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                current.push_str(text);
            }
            Token::TextRun(text) => {
                for (i, piece) in text.split('\n').enumerate() {
                    if i > 0 {
                        result.push(std::mem::take(&mut current));
                    }
                    current.push_str(piece.strip_suffix('\r').unwrap_or(piece));
                }
            }
        }
    }

    if !current.is_empty() {
        result.push(current);
    }

    result
}

#[must_use]
pub fn join_lines(lines: &[String]) -> String { lines.join("\n") }

/// Parses the verse reference opening a logical line: `\v 3` gives
/// `(3, 3)`, a combined range `\v 1-2` gives `(1, 2)`. Subverse letters
/// are ignored; anything else gives `None`.
#[must_use]
pub fn verse_range(line: &str) -> Option<(u32, u32)> {
    let rest = line.strip_prefix("\\v")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();

    let first_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let first: u32 = rest[..first_end].parse().ok()?;

    if let Some(tail) = rest[first_end..]
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .strip_prefix('-')
    {
        let second_end = tail
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(tail.len());
        if let Ok(second) = tail[..second_end].parse::<u32>() {
            if second >= first {
                return Some((first, second));
            }
        }
    }

    Some((first, first))
}
