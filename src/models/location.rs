use std::fmt;

/// A query parameter as the router sees it: `?flag`, `?next=/a`, or `?tag=a&tag=b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Null,
    Single(String),
    Multiple(Vec<String>),
}

/// A parsed full path: `/path?query#fragment`.
///
/// Query keys keep their first-seen order so `full_path` renders a stable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, QueryValue)>,
    pub fragment: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Location {
            path: normalize_path(path.into()),
            query: Vec::new(),
            fragment: None,
        }
    }

    /// Parses a full path such as `/login?next=%2Finvoices#top`.
    pub fn parse(full_path: &str) -> Self {
        let (rest, fragment) = match full_path.split_once('#') {
            Some((rest, fragment)) if !fragment.is_empty() => (rest, Some(fragment.to_string())),
            Some((rest, _)) => (rest, None),
            None => (full_path, None),
        };
        let (path, raw_query) = rest.split_once('?').unwrap_or((rest, ""));

        let mut grouped: Vec<(String, Vec<Option<String>>)> = Vec::new();
        for pair in raw_query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (decode(key), Some(decode(value))),
                None => (decode(pair), None),
            };
            match grouped.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value),
                None => grouped.push((key, vec![value])),
            }
        }

        let query = grouped
            .into_iter()
            .map(|(key, mut values)| {
                let value = if values.len() == 1 {
                    match values.pop().flatten() {
                        Some(v) => QueryValue::Single(v),
                        None => QueryValue::Null,
                    }
                } else {
                    QueryValue::Multiple(values.into_iter().flatten().collect())
                };
                (key, value)
            })
            .collect();

        Location {
            path: normalize_path(path.to_string()),
            query,
            fragment,
        }
    }

    /// Sets `key` to a single string, replacing any previous value.
    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = QueryValue::Single(value.into());
        match self.query.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.query.push((key.to_string(), value)),
        }
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&QueryValue> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The value of `key` only when it was given exactly once with a value.
    pub fn query_str(&self, key: &str) -> Option<&str> {
        match self.query_value(key) {
            Some(QueryValue::Single(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Target of a static route redirect. The query and fragment come along
    /// unless the redirect spells out its own.
    pub fn redirected_to(&self, target: &str) -> Location {
        let mut next = Location::parse(target);
        if next.query.is_empty() {
            next.query = self.query.clone();
        }
        if next.fragment.is_none() {
            next.fragment = self.fragment.clone();
        }
        next
    }

    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        let mut pairs = Vec::new();
        for (key, value) in &self.query {
            let key = encode(key, true);
            match value {
                QueryValue::Null => pairs.push(key),
                QueryValue::Single(v) => pairs.push(format!("{}={}", key, encode(v, false))),
                QueryValue::Multiple(vs) => {
                    for v in vs {
                        pairs.push(format!("{}={}", key, encode(v, false)));
                    }
                }
            }
        }
        if !pairs.is_empty() {
            out.push('?');
            out.push_str(&pairs.join("&"));
        }
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

impl From<&str> for Location {
    fn from(full_path: &str) -> Self {
        Location::parse(full_path)
    }
}

/// Whether two route paths name the same route. A trailing slash is ignored,
/// as the browser router does.
pub fn same_route(a: &str, b: &str) -> bool {
    trim_trailing_slash(a) == trim_trailing_slash(b)
}

fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Percent-encodes a query component, leaving path-like characters readable
/// so `next=/invoices` stays legible.
fn encode(raw: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut buf = [0u8; 4];
    for c in raw.chars() {
        match c {
            ' ' => out.push('+'),
            '=' if !is_key => out.push(c),
            c if c.is_ascii_alphanumeric() || "-._~!$'()*,;:@/?".contains(c) => out.push(c),
            c => out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf))),
        }
    }
    out
}
