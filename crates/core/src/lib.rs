pub mod catalog;
pub mod error;
pub mod faq;
pub mod intent;
pub mod models;
pub mod quiz;
pub mod rules;
pub mod wizard;

pub use catalog::{find_destination, format_price, require_destination, DESTINATIONS};
pub use error::CoreError;
pub use intent::{classify_topic, normalize_for_matching, normalize_text};
pub use models::*;
pub use rules::{match_rule, rule_based_reply, ResponseRule, DEFAULT_REPLY, RULES};
pub use wizard::{
    BookingSummary, BookingWizard, CommandOutcome, NavDirection, Transition, WizardCommand,
    WizardStep,
};
