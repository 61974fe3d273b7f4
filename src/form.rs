//! Contact form validation and submission.
//!
//! Validation is a pure function of the field values. Submission goes
//! through a [`MessageRelay`]; when the relay is missing or fails the form
//! still reports success in demo mode.

use std::collections::BTreeMap;
use std::future::Future;

use crate::config::ContactConfig;
use crate::notification::Notification;

/// Notification shown when validation fails.
pub const INVALID_FORM_MESSAGE: &str = "Please fill in all required fields correctly.";

/// A contact form input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    /// Element id of the input.
    pub fn id(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.id() == id)
    }
}

/// Raw values of the contact form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFields {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Trimmed value of a field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => self.name.trim(),
            Field::Email => self.email.trim(),
            Field::Subject => self.subject.trim(),
            Field::Message => self.message.trim(),
        }
    }
}

/// Outcome of validating the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<Field, &'static str>,
}

impl ValidationReport {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, *m))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loose `local@domain.tld` check.
///
/// No whitespace, exactly one `@`, and a dot inside the domain with text on
/// both sides. This is not RFC 5322.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Validate every field independently.
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::{validate, ContactFields, Field};
///
/// let report = validate(&ContactFields::new("A", "bad", "", "short"));
/// assert!(!report.is_valid());
/// assert_eq!(report.len(), 4);
/// assert_eq!(report.error(Field::Email), Some("Please enter a valid email address"));
///
/// let ok = validate(&ContactFields::new("Jo", "a@b.co", "Hi there", "This is a long enough message."));
/// assert!(ok.is_valid());
/// ```
pub fn validate(fields: &ContactFields) -> ValidationReport {
    let mut errors = BTreeMap::new();

    if fields.value(Field::Name).chars().count() < 2 {
        errors.insert(Field::Name, "Name must be at least 2 characters");
    }

    let email = fields.value(Field::Email);
    if email.is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(email) {
        errors.insert(Field::Email, "Please enter a valid email address");
    }

    if fields.value(Field::Subject).chars().count() < 3 {
        errors.insert(Field::Subject, "Subject must be at least 3 characters");
    }

    if fields.value(Field::Message).chars().count() < 10 {
        errors.insert(Field::Message, "Message must be at least 10 characters");
    }

    ValidationReport { errors }
}

/// Inline error annotations currently shown on the form.
#[derive(Clone, Debug, Default)]
pub struct FormErrors {
    shown: BTreeMap<Field, &'static str>,
}

impl FormErrors {
    /// Replace shown errors with the ones in `report`.
    pub fn show(&mut self, report: &ValidationReport) {
        self.shown = report.errors.clone();
    }

    /// Clear the annotation of one field. Returns `true` if one was shown.
    pub fn clear_field(&mut self, field: Field) -> bool {
        self.shown.remove(&field).is_some()
    }

    pub fn clear_all(&mut self) {
        self.shown.clear();
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.shown.get(&field).copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

/// Message handed to the relay.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutboundMessage {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
    pub to_email: String,
}

impl OutboundMessage {
    /// Build a message from trimmed field values.
    pub fn from_fields(fields: &ContactFields, recipient: &str) -> Self {
        Self {
            from_name: fields.value(Field::Name).to_string(),
            from_email: fields.value(Field::Email).to_string(),
            subject: fields.value(Field::Subject).to_string(),
            message: fields.value(Field::Message).to_string(),
            to_email: recipient.to_string(),
        }
    }
}

/// Error type for message relays.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// No relay library or credentials
    #[error("Message relay is not configured")]
    Unconfigured,
    /// The relay refused the message
    #[error("Message relay rejected the message: {reason}")]
    Rejected { reason: String },
    /// Network or script failure
    #[error("Message relay failed: {reason}")]
    Transport { reason: String },
}

/// Third-party transactional-email service.
///
/// No `Send` bounds, so both native and WASM relays fit.
pub trait MessageRelay {
    fn send(&self, message: &OutboundMessage) -> impl Future<Output = Result<(), RelayError>>;
}

/// Relay used when none is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DemoRelay;

impl MessageRelay for DemoRelay {
    async fn send(&self, _message: &OutboundMessage) -> Result<(), RelayError> {
        Err(RelayError::Unconfigured)
    }
}

/// State of the submit button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub icon_class: &'static str,
    pub disabled: bool,
}

impl SubmitButton {
    pub const IDLE: SubmitButton = SubmitButton {
        label: "Send Message",
        icon_class: "fas fa-paper-plane",
        disabled: false,
    };

    pub const SENDING: SubmitButton = SubmitButton {
        label: "Sending...",
        icon_class: "fas fa-spinner fa-spin",
        disabled: true,
    };
}

/// Result of a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Rejected {
        report: ValidationReport,
        notification: Notification,
    },
    /// The relay accepted the message
    Sent { notification: Notification },
    /// The relay was unavailable or failed; shown as a demo success
    Demo { notification: Notification },
}

impl SubmitOutcome {
    pub fn notification(&self) -> &Notification {
        match self {
            SubmitOutcome::Rejected { notification, .. }
            | SubmitOutcome::Sent { notification }
            | SubmitOutcome::Demo { notification } => notification,
        }
    }

    /// Check if the host should reset the form inputs.
    pub fn should_reset(&self) -> bool {
        !matches!(self, SubmitOutcome::Rejected { .. })
    }
}

/// The contact form controller.
#[derive(Clone, Debug)]
pub struct ContactForm {
    recipient: String,
    errors: FormErrors,
    button: SubmitButton,
}

impl ContactForm {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            errors: FormErrors::default(),
            button: SubmitButton::IDLE,
        }
    }

    /// Create the form addressed to the configured recipient.
    pub fn from_config(config: &ContactConfig) -> Self {
        Self::new(config.recipient.clone())
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    #[inline]
    pub fn button(&self) -> SubmitButton {
        self.button
    }

    /// The user typed into `field`.
    pub fn on_input(&mut self, field: Field) -> bool {
        self.errors.clear_field(field)
    }

    /// The user focused `field`.
    pub fn on_focus(&mut self, field: Field) -> bool {
        self.errors.clear_field(field)
    }

    /// Validate and, if valid, send through `relay`.
    pub async fn submit<R: MessageRelay>(
        &mut self,
        fields: &ContactFields,
        relay: &R,
    ) -> SubmitOutcome {
        let report = validate(fields);
        if !report.is_valid() {
            self.errors.show(&report);
            return SubmitOutcome::Rejected {
                report,
                notification: Notification::error(INVALID_FORM_MESSAGE),
            };
        }

        self.errors.clear_all();
        self.button = SubmitButton::SENDING;

        let message = OutboundMessage::from_fields(fields, &self.recipient);
        let result = relay.send(&message).await;
        self.button = SubmitButton::IDLE;

        match result {
            Ok(()) => SubmitOutcome::Sent {
                notification: Notification::success(format!(
                    "Thank you {}! Your message has been sent successfully. I'll get back to you soon!",
                    message.from_name
                )),
            },
            Err(err) => {
                log::warn!("contact form: {}; falling back to demo mode", err);
                SubmitOutcome::Demo {
                    notification: Notification::success(format!(
                        "Thank you {}! Your message has been received. This is a demo - in production, it would be sent to my email.",
                        message.from_name
                    )),
                }
            }
        }
    }
}
