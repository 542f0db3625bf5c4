//! Conventional field tag syntax: space separated `key:"value"` pairs, with
//! values quoted and backslash-escaped.
//!
//! The core stores tags verbatim and never looks inside them; only the codec
//! reads them through [`lookup`].

/// Value stored under `key` in `tag`, unquoted.
///
/// Parsing stops at the first malformed pair, so keys after it are not found.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let name_len = rest
            .bytes()
            .position(|b| b <= b' ' || b == b':' || b == b'"' || b == 0x7f)
            .unwrap_or(rest.len());
        let bytes = rest.as_bytes();
        if name_len == 0
            || name_len + 1 >= bytes.len()
            || bytes[name_len] != b':'
            || bytes[name_len + 1] != b'"'
        {
            return None;
        }
        let name = &rest[..name_len];
        rest = &rest[name_len + 1..];

        // rest starts at the opening quote
        let bytes = rest.as_bytes();
        let mut i = 1;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        let quoted = &rest[1..i];
        rest = &rest[i + 1..];

        if name == key {
            return Some(unquote(quoted));
        }
    }
}

fn unquote(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// A tag value split into its name and comma separated options, e.g.
/// `name,omitempty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagName<'a> {
    pub name: &'a str,
    options: Option<&'a str>,
}

impl<'a> TagName<'a> {
    pub fn parse(value: &'a str) -> Self {
        match value.split_once(',') {
            Some((name, options)) => Self {
                name,
                options: Some(options),
            },
            None => Self {
                name: value,
                options: None,
            },
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        !option.is_empty()
            && self
                .options
                .is_some_and(|options| options.split(',').any(|o| o == option))
    }

    /// `-` marks a field that must not be encoded or decoded.
    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.name == "-" && self.options.is_none()
    }
}
