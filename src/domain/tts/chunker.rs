/// Split text into chunks of at most `max_chars` characters.
///
/// Whitespace is collapsed first. Whole sentences (ending in `.`, `!` or `?`)
/// are packed greedily; a sentence that does not fit on its own is packed
/// word by word, and a word longer than `max_chars` is cut into fixed slices.
/// Lengths are counted in `char`s.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in sentences(text) {
        if fits(&current, &sentence, max_chars) {
            append(&mut current, &sentence);
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if char_len(&sentence) <= max_chars {
            current = sentence;
        } else {
            pack_words(&sentence, max_chars, &mut chunks, &mut current);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Group whitespace-separated words into sentences
fn sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        append(&mut current, word);
        if word.ends_with(['.', '!', '?']) {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

fn pack_words(sentence: &str, max_chars: usize, chunks: &mut Vec<String>, current: &mut String) {
    for word in sentence.split(' ') {
        if fits(current, word, max_chars) {
            append(current, word);
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(current));
        }

        if char_len(word) <= max_chars {
            current.push_str(word);
        } else {
            let chars: Vec<char> = word.chars().collect();
            chunks.extend(chars.chunks(max_chars).map(|slice| slice.iter().collect::<String>()));
        }
    }
}

fn fits(current: &str, next: &str, max_chars: usize) -> bool {
    let separator = usize::from(!current.is_empty());
    char_len(current) + separator + char_len(next) <= max_chars
}

fn append(current: &mut String, next: &str) {
    if !current.is_empty() {
        current.push(' ');
    }
    current.push_str(next);
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
