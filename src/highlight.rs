// Corpus Search Result Renderer
// Marks matched tokens inside display entries

use crate::pattern::literal_token_regex;
use crate::types::DisplayEntry;
use serde::Deserialize;

/// Strings placed around each highlighted token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HighlightMarkers {
    pub open: String,
    pub close: String,
}

impl HighlightMarkers {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Bold red terminal escape codes
    pub fn ansi() -> Self {
        Self::new("\x1b[1;31m", "\x1b[0m")
    }
}

impl Default for HighlightMarkers {
    /// Markdown bold
    fn default() -> Self {
        Self::new("**", "**")
    }
}

/// Renders entry text with matched tokens wrapped in markers
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    markers: HighlightMarkers,
}

impl Highlighter {
    pub fn new(markers: HighlightMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &HighlightMarkers {
        &self.markers
    }

    /// Wrap every whole-token occurrence of each matched token
    ///
    /// Occurrences are located as byte spans first and spliced in one pass,
    /// so markup never nests. Longer tokens claim their spans first: with
    /// `cat` and `cat food` both matched, `cat food` is wrapped whole and the
    /// `cat` inside it is left alone.
    ///
    /// # Examples
    /// ```
    /// # use corpus_search::highlight::Highlighter;
    /// let highlighter = Highlighter::default();
    /// let tokens = vec!["cats".to_string()];
    /// assert_eq!(
    ///     highlighter.render("  The cats sat on cats.\n", &tokens),
    ///     "The **cats** sat on **cats**."
    /// );
    /// ```
    pub fn render(&self, text: &str, tokens: &[String]) -> String {
        let text = text.trim();

        let mut unique: Vec<&str> = Vec::new();
        for token in tokens {
            if !token.is_empty() && !unique.contains(&token.as_str()) {
                unique.push(token.as_str());
            }
        }
        unique.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut spans: Vec<(usize, usize)> = Vec::new();
        for token in unique {
            let Ok(re) = literal_token_regex(token) else {
                continue;
            };
            for m in re.find_iter(text) {
                let (start, end) = (m.start(), m.end());
                if spans.iter().all(|&(s, e)| end <= s || start >= e) {
                    spans.push((start, end));
                }
            }
        }
        spans.sort_unstable();

        let mut rendered = String::with_capacity(
            text.len() + spans.len() * (self.markers.open.len() + self.markers.close.len()),
        );
        let mut cursor = 0;
        for (start, end) in spans {
            rendered.push_str(&text[cursor..start]);
            rendered.push_str(&self.markers.open);
            rendered.push_str(&text[start..end]);
            rendered.push_str(&self.markers.close);
            cursor = end;
        }
        rendered.push_str(&text[cursor..]);
        rendered
    }

    /// Render a display entry using its own matched tokens
    pub fn render_entry(&self, entry: &DisplayEntry) -> String {
        self.render(&entry.text, &entry.tokens)
    }
}
