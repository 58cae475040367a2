use regex::Regex;
use tracing::debug;

/// Shown to the writer when a message is refused.
pub const REJECTION_MESSAGE: &str = "Bawal ang masasamang salita.";

/// Base words that never reach the sky, wherever they appear.
const DENYLIST: &[&str] = &[
    "gago",
    "tarantado",
    "putangina",
    "tangina",
    "pakyu",
    "fuck",
    "shit",
    "bitch",
    "asshole",
];

/// Short stems that also occur inside clean words ("magagandang",
/// "natanggap"), so they only match on their own.
const WHOLE_WORDS: &[&str] = &["gaga", "tanga", "bobo", "ulol"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Denylisted base word that matched.
    pub word: String,
    pub message: &'static str,
}

/// Decides whether a piece of text may be posted.
///
/// Heuristic only, not a security boundary. Implementations must be cheap
/// enough to run on every keystroke.
pub trait ContentPolicy: Send + Sync {
    fn check(&self, text: &str) -> Result<(), Rejection>;
}

/// Denylist matcher tolerant of stretched letters ("gaaago") and common
/// look-alike digits and symbols ("g4g0").
pub struct Denylist {
    patterns: Vec<(String, Regex)>,
}

impl Denylist {
    /// Words that are refused anywhere in the text.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { patterns: Vec::new() }.with_patterns(words, false)
    }

    /// Add words that are refused only when they stand alone.
    pub fn with_whole_words<I, S>(self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_patterns(words, true)
    }

    fn with_patterns<I, S>(mut self, words: I, whole_word: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for w in words {
            let word = w.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            let mut pattern = stretch_pattern(&word);
            if whole_word {
                pattern = format!("(?:^|[^\\p{{L}}\\p{{N}}]){}(?:$|[^\\p{{L}}\\p{{N}}])", pattern);
            }
            match Regex::new(&format!("(?i){}", pattern)) {
                Ok(re) => self.patterns.push((word, re)),
                Err(e) => debug!("Skipping denylist word '{}': {}", word, e),
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DENYLIST).with_whole_words(WHOLE_WORDS)
    }
}

impl ContentPolicy for Denylist {
    fn check(&self, text: &str) -> Result<(), Rejection> {
        let lowered = text.to_lowercase();
        match self.patterns.iter().find(|(_, re)| re.is_match(&lowered)) {
            Some((word, _)) => Err(Rejection {
                word: word.clone(),
                message: REJECTION_MESSAGE,
            }),
            None => Ok(()),
        }
    }
}

/// Every character becomes "one or more of itself", widened to its
/// look-alikes.
fn stretch_pattern(word: &str) -> String {
    let mut pattern = String::new();
    for c in word.chars() {
        let class = match c {
            'a' => "[a4@]".to_string(),
            'e' => "[e3]".to_string(),
            'i' => "[i1!]".to_string(),
            'o' => "[o0]".to_string(),
            's' => r"[s5$]".to_string(),
            't' => "[t7]".to_string(),
            other => regex::escape(&other.to_string()),
        };
        pattern.push_str(&class);
        pattern.push('+');
    }
    pattern
}
