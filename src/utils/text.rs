//! Text slicing helpers shared by the segmentation strategies.

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split `text` into exactly `n` contiguous chunks by character count.
///
/// Every chunk but the last holds `len / n` characters; the last absorbs the
/// remainder. Works on Unicode scalar values so chunks never split a
/// multi-byte character. `n == 0` is treated as 1.
pub fn char_chunks(text: &str, n: usize) -> Vec<String> {
    let n = n.max(1);
    let chars: Vec<char> = text.chars().collect();
    let size = chars.len() / n;

    let mut chunks = Vec::with_capacity(n);
    for i in 0..n {
        let start = i * size;
        let end = if i + 1 == n { chars.len() } else { start + size };
        chunks.push(chars[start..end].iter().collect());
    }
    chunks
}

/// Split the words of `text` into at most `n` chunks of near-equal word count.
///
/// The first `words % n` chunks get one extra word. Empty chunks are never
/// produced, so short texts yield fewer than `n` chunks and empty text none.
pub fn word_chunks(text: &str, n: usize) -> Vec<String> {
    let n = n.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    let base = words.len() / n;
    let extra = words.len() % n;

    let mut chunks = Vec::new();
    let mut pos = 0;
    for i in 0..n {
        let take = base + usize::from(i < extra);
        if take == 0 {
            continue;
        }
        chunks.push(words[pos..pos + take].join(" "));
        pos += take;
    }
    chunks
}

/// Split a paragraph into sentences, keeping terminal punctuation.
///
/// Closing quotes directly after the terminator stay with their sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            while let Some(&q) = chars.peek() {
                if matches!(q, '"' | '\'' | '\u{201D}' | '\u{2019}' | ')' | '.' | '!' | '?') {
                    current.push(q);
                    chars.next();
                } else {
                    break;
                }
            }
            if chars.peek().map_or(true, |n| n.is_whitespace()) {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                current.clear();
            }
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    sentences
}

/// Split text into paragraphs on blank lines.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Count words that appear inside double quotes.
pub fn quoted_word_count(text: &str) -> usize {
    let mut inside = false;
    let mut quoted = String::new();
    for c in text.chars() {
        match c {
            '"' => inside = !inside,
            '\u{201C}' => inside = true,
            '\u{201D}' => inside = false,
            _ if inside => quoted.push(c),
            _ => {}
        }
        if !inside && !quoted.is_empty() && !quoted.ends_with(' ') {
            quoted.push(' ');
        }
    }
    word_count(&quoted)
}
