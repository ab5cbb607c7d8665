use super::schema::FieldMessages;
use crate::error::FieldErrors;

// Static table of (server field, form field) pairs
pub type FieldMapping = &'static [(&'static str, &'static str)];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedErrors {
    // First message per mapped form field
    pub fields: FieldMessages,
    // Each distinct message for the dismissible panel, ordered by server field name
    pub panel: Vec<String>,
    // Messages whose field the form does not know about
    pub unmapped: Vec<String>,
}

// `amenities.0` and `images.3` report against the whole list
pub fn base_field(server_field: &str) -> String {
    server_field
        .split('.')
        .filter(|segment| !segment.chars().all(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(".")
}

pub fn local_field(mapping: FieldMapping, server_field: &str) -> Option<&'static str> {
    mapping
        .iter()
        .find(|(server, _)| *server == server_field)
        .map(|(_, local)| *local)
}

pub fn map_server_errors(errors: &FieldErrors, mapping: FieldMapping) -> MappedErrors {
    let mut mapped = MappedErrors::default();

    for (server_field, messages) in errors {
        for message in messages {
            if !mapped.panel.contains(message) {
                mapped.panel.push(message.clone());
            }
        }

        match local_field(mapping, &base_field(server_field)) {
            Some(local) => {
                if let Some(first) = messages.first() {
                    mapped
                        .fields
                        .entry(local.to_string())
                        .or_insert_with(|| first.clone());
                }
            }
            None => mapped.unmapped.extend(messages.iter().cloned()),
        }
    }
    mapped
}
