// Corpus Search Pattern Compiler
// Translates user-facing wildcard queries into whole-token regex matchers

use crate::types::QueryRejection;
use regex::{Regex, RegexBuilder};

/// Characters that belong to the underlying regex language and are refused
/// outright rather than escaped
pub const FORBIDDEN_CHARS: &[char] = &['\\', '(', ')', '[', ']', '?', '$', '+'];

/// Placeholder for one or more in-token characters
pub const WILDCARD: char = '*';

/// Leading anchor: match at the start of an entry
pub const ANCHOR: char = '^';

/// Separator between alternative queries
pub const ALTERNATION: char = '|';

/// Default body of the wildcard character class: word characters, hyphen,
/// apostrophe and the typographic single quotes
pub const DEFAULT_WILDCARD_CLASS: &str = r"\w\-'‘’";

/// The set of characters a `*` may expand over
///
/// Stored as the body of a regex bracket expression, e.g. `\w\-'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardClass {
    body: String,
}

impl WildcardClass {
    /// Create a wildcard class from a bracket-expression body
    ///
    /// # Examples
    /// ```
    /// # use corpus_search::pattern::WildcardClass;
    /// let class = WildcardClass::new(r"\w\-").unwrap();
    /// assert_eq!(class.as_str(), r"\w\-");
    ///
    /// assert!(WildcardClass::new("").is_err());
    /// assert!(WildcardClass::new("a]b[").is_err());
    /// ```
    pub fn new(body: &str) -> Result<Self, QueryRejection> {
        if body.is_empty() {
            return Err(QueryRejection::InvalidWildcardClass {
                class: body.to_string(),
                reason: "class is empty".to_string(),
            });
        }

        Regex::new(&format!("^[{}]$", body)).map_err(|e| QueryRejection::InvalidWildcardClass {
            class: body.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            body: body.to_string(),
        })
    }

    /// Word characters only, no hyphens or quotes
    pub fn word_chars() -> Self {
        Self {
            body: r"\w".to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.body
    }

    fn expansion(&self) -> String {
        format!("[{}]+", self.body)
    }
}

impl Default for WildcardClass {
    fn default() -> Self {
        Self {
            body: DEFAULT_WILDCARD_CLASS.to_string(),
        }
    }
}

/// A validated query, split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Query began with `^`
    pub anchored: bool,

    /// Alternatives separated by `|`, trimmed, never empty
    pub alternatives: Vec<String>,
}

/// Validate a raw query and split it into alternatives
///
/// # Query Syntax
/// - Plain text matches whole tokens: `cat` does not match `cats`
/// - `*` stands for one or more in-token characters: `cat*` → `cats`, `catalog`
/// - `|` separates alternatives: `cat|dog`
/// - A leading `^` matches at the start of an entry: `^What`
///
/// # Examples
/// ```
/// # use corpus_search::pattern::parse_query;
/// let parsed = parse_query("^cat|dog").unwrap();
/// assert!(parsed.anchored);
/// assert_eq!(parsed.alternatives, vec!["cat", "dog"]);
///
/// assert!(parse_query("a(b").is_err());
/// assert!(parse_query("*").is_err());
/// ```
pub fn parse_query(raw: &str) -> Result<ParsedQuery, QueryRejection> {
    let query = raw.trim();

    if query.is_empty() {
        return Err(QueryRejection::Empty);
    }

    if let Some(ch) = query.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(QueryRejection::ForbiddenCharacter { char: ch });
    }

    if query == "*" {
        return Err(QueryRejection::BareWildcard { symbol: WILDCARD });
    }
    if query == "^" {
        return Err(QueryRejection::BareWildcard { symbol: ANCHOR });
    }

    let (anchored, body) = match query.strip_prefix(ANCHOR) {
        Some(rest) => (true, rest),
        None => (false, query),
    };

    let mut alternatives = Vec::new();
    for alternative in body.split(ALTERNATION) {
        let alternative = alternative.trim();
        if alternative.is_empty() {
            return Err(QueryRejection::EmptyAlternative);
        }
        // `^*` lists entry openings; an unanchored lone `*` matches every token
        if !anchored && alternative == "*" {
            return Err(QueryRejection::BareWildcard { symbol: WILDCARD });
        }
        alternatives.push(alternative.to_string());
    }

    Ok(ParsedQuery {
        anchored,
        alternatives,
    })
}

/// Convert a parsed query into a regex string
///
/// # Conversion Rules
/// - `*` becomes `[class]+`
/// - Every other character is escaped and matched literally
/// - Each alternative is bounded by `\b` where its edge is a word character
///   or wildcard, and by `\B` where its edge is punctuation (so `U.S.` still
///   matches before a space)
/// - An anchored query replaces the leading boundary with `^`
/// - Alternatives are tried longest first; ties keep their typed order
///
/// # Examples
/// ```
/// # use corpus_search::pattern::{parse_query, pattern_to_regex, WildcardClass};
/// let parsed = parse_query("cat").unwrap();
/// assert_eq!(pattern_to_regex(&parsed, &WildcardClass::default()), r"\bcat\b");
///
/// let parsed = parse_query("cat*").unwrap();
/// assert_eq!(pattern_to_regex(&parsed, &WildcardClass::word_chars()), r"\bcat[\w]+\b");
/// ```
pub fn pattern_to_regex(parsed: &ParsedQuery, wildcard: &WildcardClass) -> String {
    let expansion = wildcard.expansion();

    // Longest first, so "cat food" is tried before "cat" at the same position
    let mut alternatives: Vec<&str> = parsed.alternatives.iter().map(String::as_str).collect();
    alternatives.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let branches: Vec<String> = alternatives
        .into_iter()
        .map(|alternative| {
            let mut branch = String::new();
            if !parsed.anchored {
                branch.push_str(leading_boundary(alternative));
            }
            for ch in alternative.chars() {
                if ch == WILDCARD {
                    branch.push_str(&expansion);
                } else {
                    branch.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
                }
            }
            branch.push_str(trailing_boundary(alternative));
            branch
        })
        .collect();

    let body = if branches.len() == 1 {
        branches.concat()
    } else {
        format!("(?:{})", branches.join("|"))
    };

    if parsed.anchored {
        format!("^{}", body)
    } else {
        body
    }
}

/// Compile a raw query into a reusable matcher
///
/// Validation happens before any regex is built, so rejected queries never
/// touch the corpus.
///
/// # Examples
/// ```
/// # use corpus_search::pattern::{compile_query, WildcardClass};
/// let pattern = compile_query("cat", false, &WildcardClass::default()).unwrap();
/// assert!(pattern.is_match("The Cat sat."));
/// assert!(!pattern.is_match("The cats sat."));
/// ```
pub fn compile_query(
    raw: &str,
    case_sensitive: bool,
    wildcard: &WildcardClass,
) -> Result<CompiledPattern, QueryRejection> {
    let parsed = parse_query(raw)?;
    let source = pattern_to_regex(&parsed, wildcard);

    let regex = RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| QueryRejection::Uncompilable {
            reason: e.to_string(),
        })?;

    Ok(CompiledPattern {
        query: raw.trim().to_string(),
        regex,
        case_sensitive,
    })
}

/// Regex for every whole-token occurrence of an exact literal
pub(crate) fn literal_token_regex(literal: &str) -> Result<Regex, regex::Error> {
    let source = format!(
        "{}{}{}",
        leading_boundary(literal),
        regex::escape(literal),
        trailing_boundary(literal)
    );
    Regex::new(&source)
}

/// Immutable, side-effect-free matcher built from a user query
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    query: String,
    regex: Regex,
    case_sensitive: bool,
}

impl CompiledPattern {
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// All non-overlapping matches in `text`, left to right
    pub fn find_iter<'p, 't>(&'p self, text: &'t str) -> regex::Matches<'p, 't> {
        self.regex.find_iter(text)
    }

    /// Key under which a matched token is counted
    ///
    /// Case-insensitive patterns fold tokens to lowercase so `Cat` and `cat`
    /// share one count.
    pub fn normalize(&self, token: &str) -> String {
        if self.case_sensitive {
            token.to_string()
        } else {
            token.to_lowercase()
        }
    }

    /// The trimmed query this pattern was compiled from
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The generated regex source
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[inline]
fn edge_boundary(edge: Option<char>) -> &'static str {
    match edge {
        Some(ch) if ch == WILDCARD || is_word_char(ch) => r"\b",
        _ => r"\B",
    }
}

fn leading_boundary(text: &str) -> &'static str {
    edge_boundary(text.chars().next())
}

fn trailing_boundary(text: &str) -> &'static str {
    edge_boundary(text.chars().next_back())
}
