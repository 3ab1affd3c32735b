/// Longest accepted sender name, in characters.
pub const MAX_NAME_CHARS: usize = 50;
/// Longest accepted message body, in characters.
pub const MAX_MESSAGE_CHARS: usize = 400;

/// Raw form input as typed by the visitor.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageForm {
    /// Sender name.
    pub name: String,
    /// Message body.
    pub message: String,
}

impl MessageForm {
    /// Build a form from its two fields.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// A form that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidMessage {
    pub(crate) name: String,
    pub(crate) message: String,
}

impl ValidMessage {
    /// Sender name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Per-field problems, rendered inline next to the inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldErrors {
    /// Problem with the name field.
    pub name: Option<String>,
    /// Problem with the message field.
    pub message: Option<String>,
}

impl FieldErrors {
    /// No field has a problem.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.message.is_none()
    }
}

/// Check both fields independently.
pub fn validate_message(form: &MessageForm) -> Result<ValidMessage, FieldErrors> {
    let errors = FieldErrors {
        name: check_field(&form.name, "Name", MAX_NAME_CHARS),
        message: check_field(&form.message, "Message", MAX_MESSAGE_CHARS),
    };
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ValidMessage {
        name: form.name.clone(),
        message: form.message.clone(),
    })
}

/// Characters left before the message limit; negative once over.
pub fn remaining_message_chars(message: &str) -> i64 {
    let used = i64::try_from(message.chars().count()).unwrap_or(i64::MAX);
    (MAX_MESSAGE_CHARS as i64).saturating_sub(used)
}

fn check_field(value: &str, label: &str, max_chars: usize) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{label} cannot be empty"));
    }
    if value.chars().count() > max_chars {
        return Some(format!("{label} cannot be more than {max_chars} characters"));
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/guestbook/validate.rs"]
mod tests;
