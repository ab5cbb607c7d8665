use serde_json::Value;
use std::collections::BTreeMap;

// Field name to the first message that field failed with
pub type FieldMessages = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Email,
}

impl Rule {
    // None when the value satisfies the rule. Only `Required` rejects an
    // absent value; the other rules skip it.
    pub fn check(&self, value: Option<&Value>) -> Option<String> {
        if let Rule::Required = self {
            return if is_blank(value) {
                Some("Ce champ est requis".to_string())
            } else {
                None
            };
        }

        let value = value.filter(|v| !is_blank(Some(v)))?;
        match self {
            Rule::Required => None,
            Rule::MinLength(min) => {
                let len = text_len(value)?;
                (len < *min).then(|| format!("Doit contenir au moins {} caractères", min))
            }
            Rule::MaxLength(max) => {
                let len = text_len(value)?;
                (len > *max).then(|| format!("Doit contenir au plus {} caractères", max))
            }
            Rule::Min(min) => {
                let number = as_number(value)?;
                (number < *min).then(|| format!("Doit être supérieur ou égal à {}", min))
            }
            Rule::Max(max) => {
                let number = as_number(value)?;
                (number > *max).then(|| format!("Doit être inférieur ou égal à {}", max))
            }
            Rule::Email => {
                let text = value.as_str()?;
                (!looks_like_email(text)).then(|| "Adresse e-mail invalide".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: impl Into<Vec<Rule>>) -> Self {
        self.fields.push(FieldSchema {
            name,
            rules: rules.into(),
        });
        self
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    // Checks a serialized input object; each field reports its first failing rule
    pub fn validate(&self, input: &Value) -> FieldMessages {
        let mut errors = FieldMessages::new();
        for field in &self.fields {
            let value = input.get(field.name);
            if let Some(message) = field.rules.iter().find_map(|rule| rule.check(value)) {
                errors.insert(field.name.to_string(), message);
            }
        }
        errors
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn text_len(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.trim().chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

// Inputs typed into a text box arrive as strings
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn looks_like_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}
