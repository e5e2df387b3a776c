use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Words, numbers (optionally with an inner apostrophe) or single punctuation marks.
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]")
        .expect("word pattern is valid")
});

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Abbreviations whose trailing period never ends a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "co", "corp", "no", "fig", "approx", "dept", "est",
];

/// Split text into trimmed sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !matches!(c, '.' | '!' | '?') {
            i += 1;
            continue;
        }

        // Absorb runs like "?!" or "..." and closing quotes/brackets
        let mut j = i + 1;
        while j < chars.len()
            && matches!(chars[j].1, '.' | '!' | '?' | '"' | '\'' | ')' | '”' | '’')
        {
            j += 1;
        }

        let at_end = j >= chars.len();
        if at_end || chars[j].1.is_whitespace() {
            let abbreviated = c == '.' && j == i + 1 && ends_with_abbreviation(&text[start..pos]);
            if !abbreviated || at_end {
                let end = if at_end { text.len() } else { chars[j].0 };
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
        i = j;
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

fn ends_with_abbreviation(prefix: &str) -> bool {
    let last = match prefix.split_whitespace().last() {
        Some(word) => word.trim_start_matches(|c: char| !c.is_alphanumeric()),
        None => return false,
    };
    let lower = last.to_lowercase();
    // Single-letter initials such as "J. Smith"
    if lower.chars().count() == 1 && lower.chars().all(char::is_alphabetic) {
        return true;
    }
    ABBREVIATIONS.contains(&lower.as_str())
}

/// Tokenize text into words and punctuation, splitting English clitics
/// (`don't` becomes `do` + `n't`, `it's` becomes `it` + `'s`).
pub fn tokenize_words(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for m in WORD_RE.find_iter(text) {
        let token = m.as_str();
        match token.find(['\'', '’']) {
            Some(apos) if apos > 0 => {
                let apos_len = token[apos..].chars().next().map_or(1, char::len_utf8);
                let after = &token[apos + apos_len..];
                let before = &token[..apos];
                let split_at = if after.eq_ignore_ascii_case("t")
                    && before.len() > 1
                    && before.ends_with(['n', 'N'])
                {
                    apos - 1
                } else {
                    apos
                };
                tokens.push(&token[..split_at]);
                tokens.push(&token[split_at..]);
            }
            _ => tokens.push(token),
        }
    }
    tokens
}

/// True for non-empty tokens made only of letters.
pub fn is_alpha(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

/// Estimate syllables by counting vowel groups, discounting a silent final `e`.
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    let n = letters.len();
    if n > 2 && letters[n - 1] == 'e' && letters[n - 2] != 'l' && !is_vowel(letters[n - 2]) && count > 1 {
        count -= 1;
    }
    count.max(1)
}

/// English stopwords.
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't", "also", "could", "would", "may", "might", "must", "shall", "us",
];
