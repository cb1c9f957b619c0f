/// Normalizes a query name
///
/// # Normalization Steps
///
/// 1. Replace every `,` with a single space (only when `strip_commas` is set);
///    whitespace adjacent to the comma is folded into that space
/// 2. Trim surrounding whitespace
/// 3. Lowercase
///
/// Commas are replaced before trimming so that a trailing comma never leaves
/// trailing whitespace behind.
///
/// # Examples
///
/// ```
/// use term_harvest::text::normalize_query;
///
/// assert_eq!(normalize_query("  Software Engineer ", true), "software engineer");
/// assert_eq!(normalize_query("Chef, Cook", true), "chef cook");
/// assert_eq!(normalize_query("Chef, Cook", false), "chef, cook");
/// ```
pub fn normalize_query(text: &str, strip_commas: bool) -> String {
    normalize(text, strip_commas).to_lowercase()
}

/// Normalizes a result title
///
/// Same as [`normalize_query`] without the lowercasing step. Comma stripping
/// is not a plain character replacement: a run of commas together with the
/// whitespace around it collapses into one space, so `"a , b"` and `"a,,b"`
/// both become `"a b"`.
///
/// # Examples
///
/// ```
/// use term_harvest::text::normalize_title;
///
/// assert_eq!(normalize_title("Engineer, Backend", true), "Engineer Backend");
/// assert_eq!(normalize_title(" Engineer, Backend ", false), "Engineer, Backend");
/// ```
pub fn normalize_title(text: &str, strip_commas: bool) -> String {
    normalize(text, strip_commas)
}

fn normalize(text: &str, strip_commas: bool) -> String {
    if !strip_commas || !text.contains(',') {
        return text.trim().to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != ',' {
            out.push(ch);
            continue;
        }
        // "a , b" and "a,b" both become "a b"
        out.truncate(out.trim_end().len());
        out.push(' ');
        while chars.next_if(|c| *c == ',' || c.is_whitespace()).is_some() {}
    }

    out.trim().to_string()
}

/// Comma-handling setting shared by both extractors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    /// Replace commas with spaces before trimming
    pub strip_commas: bool,
}

impl Normalizer {
    pub fn new(strip_commas: bool) -> Self {
        Self { strip_commas }
    }

    pub fn query(&self, text: &str) -> String {
        normalize_query(text, self.strip_commas)
    }

    pub fn title(&self, text: &str) -> String {
        normalize_title(text, self.strip_commas)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(true)
    }
}
