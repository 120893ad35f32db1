use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::find_destination;
use crate::models::{BookingDetails, Destination, DetailsPatch, InfoPatch, PersonalInfo};

pub const MIN_TRAVELERS: u8 = 1;
pub const MAX_TRAVELERS: u8 = 6;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Destination,
    Details,
    PersonalInfo,
    Confirmation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        Self::Destination,
        Self::Details,
        Self::PersonalInfo,
        Self::Confirmation,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Destination => 0,
            Self::Details => 1,
            Self::PersonalInfo => 2,
            Self::Confirmation => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Destination => "Destination",
            Self::Details => "Détails",
            Self::PersonalInfo => "Informations",
            Self::Confirmation => "Confirmation",
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// The step guard: must hold before the wizard may advance past `self`.
    pub fn guard_holds(self, wizard: &BookingWizard) -> bool {
        match self {
            Self::Destination => wizard.destination().is_some(),
            Self::Details => is_valid_departure_date(&wizard.details.departure_date),
            Self::PersonalInfo => is_complete_personal_info(&wizard.info),
            Self::Confirmation => true,
        }
    }
}

/// Last navigation direction; renderers use it to pick a slide animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavDirection {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "step", rename_all = "snake_case")]
pub enum Transition {
    Advanced(WizardStep),
    Retreated(WizardStep),
    Confirmed,
    Blocked,
    Unchanged,
}

/// A user input event, as received from a renderer or the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WizardCommand {
    SelectDestination { destination_id: String },
    UpdateDetails(DetailsPatch),
    AdjustTravelers { delta: i64 },
    UpdateInfo(InfoPatch),
    Next,
    Prev,
    Confirm,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub applied: bool,
    pub transition: Option<Transition>,
}

impl CommandOutcome {
    fn edited(applied: bool) -> Self {
        Self {
            applied,
            transition: None,
        }
    }

    fn moved(transition: Transition) -> Self {
        Self {
            applied: matches!(
                transition,
                Transition::Advanced(_) | Transition::Retreated(_) | Transition::Confirmed
            ),
            transition: Some(transition),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_departure_date(raw: &str) -> bool {
    parse_departure_date(raw).is_some()
}

pub fn parse_departure_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

pub fn is_complete_personal_info(info: &PersonalInfo) -> bool {
    !info.first_name.trim().is_empty()
        && !info.last_name.trim().is_empty()
        && is_valid_email(&info.email)
        && !info.phone.trim().is_empty()
}

fn clamp_travelers(requested: i64) -> u8 {
    requested.clamp(i64::from(MIN_TRAVELERS), i64::from(MAX_TRAVELERS)) as u8
}

fn french_long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        FRENCH_MONTHS[date.month0() as usize],
        date.year()
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub destination_id: String,
    pub destination_label: String,
    pub departure_date: String,
    pub duration_days: u8,
    pub travelers: u8,
    pub lead_traveler: String,
    pub email: String,
    pub phone: String,
    pub unit_price: u32,
    pub total_price: u64,
}

/// In-progress reservation. Owned by exactly one control flow; every
/// operation either applies a well-defined change or is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWizard {
    step: WizardStep,
    direction: NavDirection,
    selected_destination: Option<String>,
    details: BookingDetails,
    info: PersonalInfo,
    confirmed: bool,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Destination,
            direction: NavDirection::Forward,
            selected_destination: None,
            details: BookingDetails::default(),
            info: PersonalInfo::default(),
            confirmed: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn direction(&self) -> NavDirection {
        self.direction
    }

    pub fn details(&self) -> &BookingDetails {
        &self.details
    }

    pub fn info(&self) -> &PersonalInfo {
        &self.info
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn selected_destination_id(&self) -> Option<&str> {
        self.selected_destination.as_deref()
    }

    pub fn destination(&self) -> Option<&'static Destination> {
        self.selected_destination.as_deref().and_then(find_destination)
    }

    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        step.guard_holds(self)
    }

    pub fn is_current_step_valid(&self) -> bool {
        self.is_step_valid(self.step)
    }

    fn editable_on(&self, step: WizardStep) -> bool {
        !self.confirmed && self.step == step
    }

    /// Only on the destination step and only for catalog ids. Never advances.
    pub fn select_destination(&mut self, id: &str) -> bool {
        if !self.editable_on(WizardStep::Destination) || find_destination(id).is_none() {
            return false;
        }
        self.selected_destination = Some(id.to_string());
        true
    }

    pub fn update_details(&mut self, patch: DetailsPatch) -> bool {
        if !self.editable_on(WizardStep::Details) {
            return false;
        }
        if let Some(date) = patch.departure_date {
            self.details.departure_date = date;
        }
        if let Some(duration) = patch.duration {
            self.details.duration = duration;
        }
        if let Some(travelers) = patch.travelers {
            self.details.travelers = clamp_travelers(travelers);
        }
        true
    }

    /// The +/- stepper. Moving past either bound leaves the count where it is.
    pub fn adjust_travelers(&mut self, delta: i64) -> bool {
        let current = i64::from(self.details.travelers);
        self.update_details(DetailsPatch {
            travelers: Some(current.saturating_add(delta)),
            ..DetailsPatch::default()
        })
    }

    pub fn update_info(&mut self, patch: InfoPatch) -> bool {
        if !self.editable_on(WizardStep::PersonalInfo) {
            return false;
        }
        if let Some(first_name) = patch.first_name {
            self.info.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.info.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.info.email = email;
        }
        if let Some(phone) = patch.phone {
            self.info.phone = phone;
        }
        true
    }

    pub fn go_next(&mut self) -> Transition {
        if self.confirmed {
            return Transition::Unchanged;
        }
        if !self.is_current_step_valid() {
            return Transition::Blocked;
        }
        match self.step.next() {
            Some(next) => {
                self.direction = NavDirection::Forward;
                self.step = next;
                Transition::Advanced(next)
            }
            None => self.confirm(),
        }
    }

    pub fn go_prev(&mut self) -> Transition {
        if self.confirmed {
            return Transition::Unchanged;
        }
        match self.step.previous() {
            Some(previous) => {
                self.direction = NavDirection::Backward;
                self.step = previous;
                Transition::Retreated(previous)
            }
            None => Transition::Unchanged,
        }
    }

    /// Terminal transition, only from the confirmation step. Idempotent.
    pub fn confirm(&mut self) -> Transition {
        if self.confirmed || self.step != WizardStep::Confirmation {
            return Transition::Unchanged;
        }
        self.confirmed = true;
        Transition::Confirmed
    }

    pub fn restart(&mut self) {
        *self = Self::new();
    }

    pub fn apply(&mut self, command: WizardCommand) -> CommandOutcome {
        match command {
            WizardCommand::SelectDestination { destination_id } => {
                CommandOutcome::edited(self.select_destination(&destination_id))
            }
            WizardCommand::UpdateDetails(patch) => {
                CommandOutcome::edited(self.update_details(patch))
            }
            WizardCommand::AdjustTravelers { delta } => {
                CommandOutcome::edited(self.adjust_travelers(delta))
            }
            WizardCommand::UpdateInfo(patch) => CommandOutcome::edited(self.update_info(patch)),
            WizardCommand::Next => CommandOutcome::moved(self.go_next()),
            WizardCommand::Prev => CommandOutcome::moved(self.go_prev()),
            WizardCommand::Confirm => CommandOutcome::moved(self.confirm()),
            WizardCommand::Restart => {
                self.restart();
                CommandOutcome::edited(true)
            }
        }
    }

    pub fn total_price(&self) -> u64 {
        self.destination()
            .map(|destination| u64::from(destination.price) * u64::from(self.details.travelers))
            .unwrap_or(0)
    }

    pub fn summary(&self) -> Option<BookingSummary> {
        let destination = self.destination()?;
        let departure_date = parse_departure_date(&self.details.departure_date)
            .map(french_long_date)
            .unwrap_or_default();

        Some(BookingSummary {
            destination_id: destination.id.to_string(),
            destination_label: format!("{} {}", destination.emoji, destination.label),
            departure_date,
            duration_days: self.details.duration.days(),
            travelers: self.details.travelers,
            lead_traveler: format!("{} {}", self.info.first_name.trim(), self.info.last_name.trim())
                .trim()
                .to_string(),
            email: self.info.email.clone(),
            phone: self.info.phone.clone(),
            unit_price: destination.price,
            total_price: self.total_price(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DESTINATIONS;
    use crate::models::TripDuration;

    fn details(date: &str, travelers: i64) -> DetailsPatch {
        DetailsPatch {
            departure_date: Some(date.to_string()),
            duration: Some(TripDuration::FiveDays),
            travelers: Some(travelers),
        }
    }

    fn complete_info() -> InfoPatch {
        InfoPatch {
            first_name: Some("Jean".to_string()),
            last_name: Some("Dupont".to_string()),
            email: Some("jean.dupont@email.com".to_string()),
            phone: Some("+33 6 12 34 56 78".to_string()),
        }
    }

    fn wizard_at(step: WizardStep) -> BookingWizard {
        let mut wizard = BookingWizard::new();
        if step.index() >= 1 {
            assert!(wizard.select_destination("paris-1889"));
            assert_eq!(wizard.go_next(), Transition::Advanced(WizardStep::Details));
        }
        if step.index() >= 2 {
            assert!(wizard.update_details(details("2026-12-24", 2)));
            assert_eq!(
                wizard.go_next(),
                Transition::Advanced(WizardStep::PersonalInfo)
            );
        }
        if step.index() >= 3 {
            assert!(wizard.update_info(complete_info()));
            assert_eq!(
                wizard.go_next(),
                Transition::Advanced(WizardStep::Confirmation)
            );
        }
        wizard
    }

    #[test]
    fn starts_on_destination_step() {
        let wizard = BookingWizard::new();
        assert_eq!(wizard.step(), WizardStep::Destination);
        assert!(!wizard.is_confirmed());
        assert_eq!(wizard.total_price(), 0);
        assert!(wizard.summary().is_none());
    }

    #[test]
    fn next_is_noop_while_guard_fails() {
        let mut fresh = BookingWizard::new();
        let before = fresh.clone();
        assert_eq!(fresh.go_next(), Transition::Blocked);
        assert_eq!(fresh, before);

        let mut details_step = wizard_at(WizardStep::Details);
        details_step.update_details(DetailsPatch {
            departure_date: Some("   ".to_string()),
            ..DetailsPatch::default()
        });
        let before = details_step.clone();
        assert_eq!(details_step.go_next(), Transition::Blocked);
        assert_eq!(details_step, before);

        let mut info_step = wizard_at(WizardStep::PersonalInfo);
        let mut info = complete_info();
        info.email = Some("jean@dupont".to_string());
        info_step.update_info(info);
        let before = info_step.clone();
        assert_eq!(info_step.go_next(), Transition::Blocked);
        assert_eq!(info_step, before);
    }

    #[test]
    fn unparseable_dates_fail_the_details_guard() {
        assert!(is_valid_departure_date("2026-03-01"));
        assert!(!is_valid_departure_date(""));
        assert!(!is_valid_departure_date("demain"));
        assert!(!is_valid_departure_date("2026-02-30"));
    }

    #[test]
    fn personal_info_requires_trimmed_names_and_phone() {
        let mut wizard = wizard_at(WizardStep::PersonalInfo);
        wizard.update_info(complete_info());
        assert!(wizard.is_current_step_valid());

        wizard.update_info(InfoPatch {
            last_name: Some("  ".to_string()),
            ..InfoPatch::default()
        });
        assert!(!wizard.is_current_step_valid());

        wizard.update_info(InfoPatch {
            last_name: Some("Dupont".to_string()),
            phone: Some("\t".to_string()),
            ..InfoPatch::default()
        });
        assert!(!wizard.is_current_step_valid());
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("ab.co"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a b@c.de"));
    }

    #[test]
    fn traveler_count_is_clamped() {
        let mut wizard = wizard_at(WizardStep::Details);
        wizard.update_details(details("2026-12-24", 0));
        assert_eq!(wizard.details().travelers, 1);
        wizard.update_details(details("2026-12-24", 7));
        assert_eq!(wizard.details().travelers, 6);
        wizard.update_details(details("2026-12-24", -40));
        assert_eq!(wizard.details().travelers, 1);

        assert!(wizard.adjust_travelers(-1));
        assert_eq!(wizard.details().travelers, 1);
        for _ in 0..10 {
            wizard.adjust_travelers(1);
        }
        assert_eq!(wizard.details().travelers, 6);
    }

    #[test]
    fn total_price_tracks_destination_and_travelers() {
        for destination in DESTINATIONS.iter() {
            let mut wizard = BookingWizard::new();
            wizard.select_destination(destination.id);
            wizard.go_next();
            for travelers in 1..=6 {
                wizard.update_details(details("2026-12-24", travelers));
                assert_eq!(
                    wizard.total_price(),
                    u64::from(destination.price) * travelers as u64
                );
            }
        }
    }

    #[test]
    fn two_travelers_to_paris_costs_25000() {
        let wizard = wizard_at(WizardStep::Confirmation);
        assert_eq!(wizard.destination().unwrap().price, 12_500);
        assert_eq!(wizard.total_price(), 25_000);
    }

    #[test]
    fn back_and_forth_preserves_data() {
        for step in [WizardStep::Details, WizardStep::PersonalInfo] {
            let mut wizard = wizard_at(step);
            match step {
                WizardStep::Details => {
                    wizard.update_details(details("2027-01-15", 3));
                }
                _ => {
                    wizard.update_info(complete_info());
                }
            }
            let snapshot = wizard.clone();
            assert!(matches!(wizard.go_next(), Transition::Advanced(_)));
            assert!(matches!(wizard.go_prev(), Transition::Retreated(_)));
            assert_eq!(wizard.step(), snapshot.step());
            assert_eq!(wizard.details(), snapshot.details());
            assert_eq!(wizard.info(), snapshot.info());
            assert_eq!(
                wizard.selected_destination_id(),
                snapshot.selected_destination_id()
            );
        }

        // on the last step, next confirms; check prev then next instead
        let mut wizard = wizard_at(WizardStep::Confirmation);
        let snapshot = wizard.clone();
        assert_eq!(
            wizard.go_prev(),
            Transition::Retreated(WizardStep::PersonalInfo)
        );
        assert_eq!(
            wizard.go_next(),
            Transition::Advanced(WizardStep::Confirmation)
        );
        assert_eq!(wizard.details(), snapshot.details());
        assert_eq!(wizard.info(), snapshot.info());
    }

    #[test]
    fn prev_is_floored_at_first_step() {
        let mut wizard = BookingWizard::new();
        assert_eq!(wizard.go_prev(), Transition::Unchanged);
        assert_eq!(wizard.step(), WizardStep::Destination);
    }

    #[test]
    fn edits_only_apply_on_their_own_step() {
        let mut wizard = BookingWizard::new();
        assert!(!wizard.update_details(details("2026-12-24", 3)));
        assert!(!wizard.update_info(complete_info()));
        assert!(!wizard.select_destination("atlantis"));

        let mut wizard = wizard_at(WizardStep::Details);
        assert!(!wizard.select_destination("cretace"));
        assert_eq!(wizard.selected_destination_id(), Some("paris-1889"));
    }

    #[test]
    fn confirm_is_terminal_and_idempotent() {
        let mut wizard = wizard_at(WizardStep::PersonalInfo);
        assert_eq!(wizard.confirm(), Transition::Unchanged);

        let mut wizard = wizard_at(WizardStep::Confirmation);
        assert_eq!(wizard.go_next(), Transition::Confirmed);
        let confirmed = wizard.clone();
        assert_eq!(wizard.confirm(), Transition::Unchanged);
        assert_eq!(wizard.go_next(), Transition::Unchanged);
        assert_eq!(wizard.go_prev(), Transition::Unchanged);
        assert_eq!(wizard, confirmed);
        assert!(wizard.is_confirmed());

        wizard.restart();
        assert_eq!(wizard, BookingWizard::new());
    }

    #[test]
    fn summary_lists_confirmation_rows() {
        let wizard = wizard_at(WizardStep::Confirmation);
        let summary = wizard.summary().unwrap();
        assert_eq!(summary.destination_label, "🗼 Paris 1889");
        assert_eq!(summary.departure_date, "24 décembre 2026");
        assert_eq!(summary.duration_days, 5);
        assert_eq!(summary.lead_traveler, "Jean Dupont");
        assert_eq!(summary.unit_price, 12_500);
        assert_eq!(summary.total_price, 25_000);
    }

    #[test]
    fn commands_drive_the_same_transitions() {
        let mut wizard = BookingWizard::new();
        let outcome = wizard.apply(WizardCommand::Next);
        assert!(!outcome.applied);
        assert_eq!(outcome.transition, Some(Transition::Blocked));

        assert!(
            wizard
                .apply(WizardCommand::SelectDestination {
                    destination_id: "florence-1504".to_string(),
                })
                .applied
        );
        assert_eq!(
            wizard.apply(WizardCommand::Next).transition,
            Some(Transition::Advanced(WizardStep::Details))
        );
        wizard.apply(WizardCommand::AdjustTravelers { delta: 2 });
        assert_eq!(wizard.details().travelers, 3);
        assert_eq!(wizard.total_price(), 42_600);

        assert!(wizard.apply(WizardCommand::Restart).applied);
        assert_eq!(wizard, BookingWizard::new());
    }

    #[test]
    fn commands_parse_from_tagged_json() {
        let command: WizardCommand = serde_json::from_str(
            r#"{"command":"update_details","departure_date":"2026-05-01","travelers":9}"#,
        )
        .unwrap();
        let mut wizard = wizard_at(WizardStep::Details);
        assert!(wizard.apply(command).applied);
        assert_eq!(wizard.details().travelers, 6);
        assert_eq!(wizard.details().departure_date, "2026-05-01");
    }

    #[test]
    fn direction_follows_last_move() {
        let mut wizard = wizard_at(WizardStep::Details);
        assert_eq!(wizard.direction(), NavDirection::Forward);
        wizard.go_prev();
        assert_eq!(wizard.direction(), NavDirection::Backward);
    }
}
