use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn alert_class(&self) -> &'static str {
        match self {
            MessageKind::Success => "alert-success",
            MessageKind::Error => "alert-danger",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub id: String,
    pub kind: MessageKind,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl FlashMessage {
    pub fn new(kind: MessageKind, text: String) -> FlashMessage {
        FlashMessage {
            id: Uuid::new_v4().to_string(),
            kind: kind,
            text: text,
            created_at: Utc::now(),
        }
    }
}

// Cart totals are rendered with a dollar sign and exactly two decimal places,
// matching what the storefront templates display.
pub fn format_cart_total(total: f64) -> String {
    format!("${:.2}", total)
}
