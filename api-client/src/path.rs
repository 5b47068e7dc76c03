/// Values for `{name}` placeholders in a request path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: Vec<(String, String)>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Params holding a single placeholder value
    pub fn single<V: ToString>(name: &str, value: V) -> Self {
        Self::new().with(name, value)
    }

    /// Add a placeholder value; a later value for the same name wins
    pub fn with<V: ToString>(mut self, name: &str, value: V) -> Self {
        self.values.retain(|(existing, _)| existing != name);
        self.values.push((name.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace `{name}` placeholders with URL-encoded values.
    ///
    /// Placeholders without a value are left as written, and so is anything
    /// between braces that is not a plain identifier.
    pub fn substitute(&self, template: &str) -> String {
        let mut result = String::with_capacity(template.len() + 16);
        let mut chars = template.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '{' {
                result.push(ch);
                continue;
            }

            let mut name = String::new();
            let mut closed = false;
            while let Some(&next) = chars.peek() {
                if next == '}' {
                    chars.next();
                    closed = true;
                    break;
                }
                if next == '{' {
                    break;
                }
                name.push(next);
                chars.next();
            }

            match self.get(&name) {
                Some(value) if closed && is_valid_param_name(&name) => {
                    result.push_str(&urlencoding::encode(value));
                }
                _ => {
                    result.push('{');
                    result.push_str(&name);
                    if closed {
                        result.push('}');
                    }
                }
            }
        }

        result
    }
}

impl<V: ToString> FromIterator<(&'static str, V)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (&'static str, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |params, (name, value)| params.with(name, value))
    }
}

/// Check if a parameter name is a valid identifier (letters, numbers, underscore)
fn is_valid_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}
