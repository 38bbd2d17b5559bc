use serde::Serialize;

/// Value of a key: either a leaf string or a nested block of keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KvValue {
    Text(String),
    Section(Vec<KeyValues>),
}

/// One named node of a parsed key/value tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyValues {
    pub name: String,
    pub value: KvValue,
}

impl KeyValues {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: KvValue::Text(value.into()),
        }
    }

    pub fn section(name: impl Into<String>, children: Vec<KeyValues>) -> Self {
        Self {
            name: name.into(),
            value: KvValue::Section(children),
        }
    }

    /// Sub-keys in file order. Leaf nodes have none.
    pub fn children(&self) -> &[KeyValues] {
        match &self.value {
            KvValue::Section(children) => children,
            KvValue::Text(_) => &[],
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            KvValue::Text(text) => Some(text),
            KvValue::Section(_) => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self.value, KvValue::Section(_))
    }

    /// First direct child whose name matches, ignoring ASCII case.
    pub fn find_key(&self, name: &str) -> Option<&KeyValues> {
        self.children()
            .iter()
            .find(|child| child.name.eq_ignore_ascii_case(name))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.find_key(key).and_then(KeyValues::as_text)
    }

    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str(key).unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.get_str(key).map(coerce_float).unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_str(key).map(coerce_int).unwrap_or(default)
    }

    /// This node's own value read as an integer (zero for sections and non-numbers).
    pub fn int_value(&self) -> i64 {
        self.as_text().map(coerce_int).unwrap_or(0)
    }
}

/// Longest numeric prefix of `raw`, or zero.
pub(crate) fn coerce_float(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return value;
    }
    let numeric_len = trimmed
        .char_indices()
        .take_while(|(_, ch)| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E'))
        .count();
    (1..=numeric_len)
        .rev()
        .find_map(|len| trimmed[..len].parse::<f64>().ok())
        .unwrap_or(0.0)
}

pub(crate) fn coerce_int(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return value;
    }
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign_len..]
        .chars()
        .take_while(char::is_ascii_digit)
        .count();
    trimmed[..sign_len + digits].parse::<i64>().unwrap_or(0)
}
