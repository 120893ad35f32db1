use serde::Serialize;

use crate::error::CoreError;
use crate::models::Destination;

pub const DESTINATIONS: [Destination; 3] = [
    Destination {
        id: "paris-1889",
        label: "Paris 1889",
        emoji: "🗼",
        description: "Assistez à l’inauguration de la Tour Eiffel lors de l’Exposition universelle.",
        price: 12_500,
    },
    Destination {
        id: "cretace",
        label: "Crétacé",
        emoji: "🦕",
        description: "Explorez la Terre il y a 66\u{a0}millions d’années parmi les dinosaures.",
        price: 18_900,
    },
    Destination {
        id: "florence-1504",
        label: "Florence 1504",
        emoji: "🎨",
        description: "Découvrez l’atelier de Michel-Ange et la Renaissance italienne.",
        price: 14_200,
    },
];

pub const GREETING: &str = "Bienvenue chez TimeTravel Agency ! ✨\n\nJe suis Chronos, votre assistant temporel. Comment puis-je vous aider aujourd'hui ?";

pub const SYSTEM_PROMPT: &str = "Tu es Chronos, l'assistant de TimeTravel Agency, une agence de voyages temporels de luxe. \
Destinations : Paris 1889 (12 500 €/voyageur), Crétacé (18 900 €/voyageur), Florence 1504 (14 200 €/voyageur). \
Durées de 3, 5 ou 7 jours, de 1 à 6 voyageurs, retour garanti. Réponds en français, avec chaleur et concision.";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 3] = [
    QuickAction {
        label: "Destinations",
        prompt: "Quelles sont vos destinations ?",
    },
    QuickAction {
        label: "Prix",
        prompt: "Quels sont vos tarifs ?",
    },
    QuickAction {
        label: "Sécurité",
        prompt: "Est-ce que le voyage est sûr ?",
    },
];

pub fn find_destination(id: &str) -> Option<&'static Destination> {
    DESTINATIONS.iter().find(|destination| destination.id == id)
}

pub fn require_destination(id: &str) -> Result<&'static Destination, CoreError> {
    find_destination(id).ok_or_else(|| CoreError::UnknownDestination(id.to_string()))
}

/// `12 500 €` with a narrow no-break space grouping, the way the site
/// prints prices.
pub fn format_price(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + 4);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(ch);
    }
    format!("{grouped}\u{a0}€")
}
