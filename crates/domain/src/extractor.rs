use crate::activity::RawActivity;
use crate::weekday::Weekday;
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::ops::Range;

/// Words that must appear in a candidate description for it to count as a
/// timed activity. Diet plans extracted from PDFs come with page headers,
/// footers and contact lines that happen to contain digit pairs, this
/// vocabulary keeps those out.
const ACTIVITY_KEYWORDS: &[&str] = &[
    // hydration
    "water", "drink", "tea", "coffee", "juice", "milk", "buttermilk", "smoothie", "shake",
    // meals
    "eat", "meal", "breakfast", "lunch", "dinner", "snack", "brunch",
    // food items
    "almond", "almonds", "nuts", "walnut", "walnuts", "fruit", "fruits", "apple", "banana",
    "papaya", "salad", "soup", "oats", "oatmeal", "poha", "upma", "idli", "dosa", "roti",
    "chapati", "rice", "dal", "sprouts", "egg", "eggs", "chicken", "fish", "paneer", "curd",
    "yogurt", "cheese", "bread", "toast", "khichdi", "vegetable", "vegetables", "protein",
    // supplements and medication
    "vitamin", "vitamins", "supplement", "supplements", "omega", "calcium", "iron", "zinc",
    "tablet", "tablets", "capsule", "capsules", "medicine", "medicines", "medication",
    "syrup", "insulin", "dose",
    // exercise
    "walk", "walking", "jog", "jogging", "run", "running", "exercise", "exercises",
    "workout", "gym", "yoga", "stretch", "stretching", "meditation", "cycling", "swim",
    "swimming",
];

/// A word a description must not end on. If it does, the sentence
/// continues on the next line of the source text.
const DANGLING_CONJUNCTIONS: &[&str] = &["and", "or", "with", "then", "plus", "of"];

/// How many subsequent lines are scanned for continuation text when the
/// description on the time token's own line is empty or cut off.
const CONTINUATION_LOOKAHEAD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct TimeToken {
    start: usize,
    end: usize,
    hour: u8,
    minute: u8,
}

/// Scans raw diet text for calendar times and pairs each with nearby
/// descriptive text.
///
/// The matchers are ordered most specific first. A character span consumed
/// by one matcher is never re-matched by a lower-priority one, so
/// "4:30 P.M." cannot be double-counted as both a 12-hour and a 24-hour
/// match.
pub struct ActivityExtractor {
    patterns: Vec<Regex>,
    meridiem_words: Regex,
}

impl ActivityExtractor {
    pub fn new() -> Self {
        let patterns = vec![
            // "4:30 PM", "4 : 30 P.M.", "6 30 pm"
            r"(?P<h>\d{1,2})\s*[:. ]\s*(?P<m>[0-5][0-9])\s*(?P<mer>[AaPp])\.?\s*[Mm]\.?",
            // "7 PM", "12 a.m."
            r"(?P<h>\d{1,2})\s*(?P<mer>[AaPp])\.?\s*[Mm]\.?",
            // "18:30", "4.30"
            r"(?P<h>\d{1,2})\s*[:.]\s*(?P<m>[0-5][0-9])",
            // bare "8 00", weakest form
            r"\b(?P<h>\d{1,2})\s+(?P<m>[0-5][0-9])\b",
        ]
        .into_iter()
        .map(|p| Regex::new(p).expect("Valid time pattern"))
        .collect();

        Self {
            patterns,
            meridiem_words: Regex::new(r"(?i)\b[ap]\.?\s*m\.?").expect("Valid meridiem pattern"),
        }
    }

    /// Returns a lazy, finite, non-restartable sequence of activities
    /// found in the given text. Empty input yields an empty sequence.
    pub fn scan<'a>(&'a self, text: &'a str) -> ActivityScan<'a> {
        ActivityScan {
            extractor: self,
            lines: text.lines().collect(),
            next_line: 0,
            day_hint: None,
            ready: VecDeque::new(),
        }
    }

    /// Locates every time token on a line, honoring matcher priority and
    /// span consumption. Tokens are returned in order of appearance.
    fn find_time_tokens(&self, line: &str) -> Vec<TimeToken> {
        let mut consumed: Vec<Range<usize>> = Vec::new();
        let mut tokens = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.captures_iter(line) {
                let whole = match caps.get(0) {
                    Some(m) => m,
                    None => continue,
                };
                let range = whole.start()..whole.end();
                if consumed.iter().any(|c| ranges_overlap(c, &range)) {
                    continue;
                }
                // The span is consumed even when the clock value turns out
                // to be invalid, otherwise a weaker pattern could pick up
                // a fragment of it.
                consumed.push(range.clone());

                let hour_raw = match caps.name("h").and_then(|m| m.as_str().parse::<u8>().ok()) {
                    Some(h) => h,
                    None => continue,
                };
                let minute = caps
                    .name("m")
                    .and_then(|m| m.as_str().parse::<u8>().ok())
                    .unwrap_or(0);
                let meridiem = caps
                    .name("mer")
                    .and_then(|m| m.as_str().to_lowercase().chars().next());

                if let Some((hour, minute)) = resolve_clock(hour_raw, minute, meridiem) {
                    tokens.push(TimeToken {
                        start: range.start,
                        end: range.end,
                        hour,
                        minute,
                    });
                }
            }
        }

        tokens.sort_by_key(|t| t.start);
        tokens
    }

    fn has_time_token(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(line))
    }

    /// Strips bullets, residual time tokens and meridiem words from a
    /// candidate description and normalizes whitespace.
    fn clean_text(&self, raw: &str) -> String {
        let mut text = raw.to_string();
        for pattern in &self.patterns {
            text = pattern.replace_all(&text, " ").into_owned();
        }
        text = self.meridiem_words.replace_all(&text, " ").into_owned();
        let text = text.replace(
            |c: char| matches!(c, '•' | '●' | '◦' | '·' | '*' | '>'),
            " ",
        );
        let text = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        text.trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '-' | ':' | ',' | '.' | ';' | '–' | '—')
        })
        .to_string()
    }

    /// Appends cleaned text from up to `CONTINUATION_LOOKAHEAD` subsequent
    /// lines while the description is empty or cut off mid-sentence.
    /// Lines carrying their own time tokens are never consumed.
    fn with_continuation(&self, base: String, lines: &[&str], from: usize) -> String {
        let mut text = base;
        for line in lines.iter().skip(from).take(CONTINUATION_LOOKAHEAD) {
            if !text.is_empty() && !ends_dangling(&text) {
                break;
            }
            if self.has_time_token(line) {
                break;
            }
            let cleaned = self.clean_text(line);
            if cleaned.is_empty() {
                continue;
            }
            if text.is_empty() {
                text = cleaned;
            } else {
                text = format!("{} {}", text, cleaned);
            }
        }
        strip_trailing_conjunction(text)
    }
}

impl Default for ActivityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy scan over the lines of one diet text.
pub struct ActivityScan<'a> {
    extractor: &'a ActivityExtractor,
    lines: Vec<&'a str>,
    next_line: usize,
    day_hint: Option<Weekday>,
    ready: VecDeque<RawActivity>,
}

impl<'a> Iterator for ActivityScan<'a> {
    type Item = RawActivity;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(activity) = self.ready.pop_front() {
                return Some(activity);
            }
            if self.next_line >= self.lines.len() {
                return None;
            }

            let line = self.lines[self.next_line];
            self.next_line += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            // A paragraph-leading day name sets the hint for everything
            // that follows until the next header.
            if let Some(day) = leading_day_header(trimmed) {
                self.day_hint = Some(day);
                if !self.extractor.has_time_token(line) {
                    continue;
                }
            }

            // Identical time twice on one line: keep the first only. The
            // duplicate span is still stripped from the description later
            // by clean_text.
            let mut seen = HashSet::new();
            let tokens = self
                .extractor
                .find_time_tokens(line)
                .into_iter()
                .filter(|t| seen.insert((t.hour, t.minute)))
                .collect::<Vec<_>>();

            for (i, token) in tokens.iter().enumerate() {
                let tail_end = tokens.get(i + 1).map(|n| n.start).unwrap_or(line.len());
                let candidate = &line[token.end..tail_end];
                let mut text = self.extractor.clean_text(candidate);

                let is_last_token_on_line = tokens.get(i + 1).is_none();
                if is_last_token_on_line && (text.is_empty() || ends_dangling(&text)) {
                    text = self
                        .extractor
                        .with_continuation(text, &self.lines, self.next_line);
                } else {
                    text = strip_trailing_conjunction(text);
                }

                if text.is_empty() || !contains_activity_keyword(&text) {
                    continue;
                }

                self.ready.push_back(RawActivity {
                    hour: token.hour,
                    minute: token.minute,
                    text,
                    source_line: line.to_string(),
                    day_hint: self.day_hint,
                });
            }
        }
    }
}

/// Applies the meridiem rules and validates the clock value.
///
/// Explicit token: 12 AM maps to 0, 12 PM stays 12, other PM hours get
/// +12. No token: hours 1-11 are morning, 12 is noon, 13-23 pass through
/// as 24-hour values. Anything out of range is discarded, not an error.
fn resolve_clock(hour_raw: u8, minute: u8, meridiem: Option<char>) -> Option<(u8, u8)> {
    if minute > 59 {
        return None;
    }
    let hour = match meridiem {
        Some(m) => {
            if hour_raw == 0 || hour_raw > 12 {
                return None;
            }
            match (m, hour_raw) {
                ('a', 12) => 0,
                ('a', h) => h,
                ('p', 12) => 12,
                ('p', h) => h + 12,
                _ => return None,
            }
        }
        None => {
            if hour_raw > 23 {
                return None;
            }
            hour_raw
        }
    };
    Some((hour, minute))
}

fn ranges_overlap(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn leading_day_header(trimmed_line: &str) -> Option<Weekday> {
    let first = trimmed_line
        .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '#') || c.is_whitespace())
        .split_whitespace()
        .next()?;
    Weekday::from_day_name(first.trim_matches(|c: char| matches!(c, ':' | '-' | ',')))
}

fn ends_dangling(text: &str) -> bool {
    if text.ends_with(',') {
        return true;
    }
    match text.split_whitespace().last() {
        Some(last) => DANGLING_CONJUNCTIONS.contains(&last.to_lowercase().as_str()),
        None => false,
    }
}

fn strip_trailing_conjunction(text: String) -> String {
    let mut words = text.split_whitespace().collect::<Vec<_>>();
    while let Some(last) = words.last() {
        if DANGLING_CONJUNCTIONS.contains(&last.to_lowercase().as_str()) {
            words.pop();
        } else {
            break;
        }
    }
    words.join(" ").trim_end_matches(',').to_string()
}

fn contains_activity_keyword(text: &str) -> bool {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .any(|w| ACTIVITY_KEYWORDS.contains(&w))
}
