use crate::intent::{contains_any, normalize_for_matching};
use crate::models::Topic;

/// One entry of the prioritized keyword table. A rule fires when any of its
/// keywords, normalized, appears in the normalized utterance.
#[derive(Debug, Clone, Copy)]
pub struct ResponseRule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

impl ResponseRule {
    /// `normalized` must already have gone through [`normalize_for_matching`].
    pub fn matches(&self, normalized: &str) -> bool {
        contains_any(normalized, self.keywords)
    }
}

pub const DEFAULT_REPLY: &str =
    "Merci pour votre question ! 🕰️\n\nJe suis spécialisé dans les voyages temporels. Voici ce que je peux vous aider avec :\n\n• 🗼🦕🎨 Détails sur nos 3 destinations\n• 💰 Tarifs et réservations\n• 🛡️ Sécurité et garanties\n• 🧳 Préparation du voyage\n• ⏳ Durée et retour\n\nN'hésitez pas à me poser une question plus précise !";

// Order matters: the first matching rule wins.
pub const RULES: [ResponseRule; 13] = [
    ResponseRule {
        topic: Topic::Greeting,
        keywords: &["bonjour", "salut", "hello", "hey", "coucou", "bonsoir"],
        response: "Bonjour et bienvenue chez TimeTravel Agency ! ✨ Je suis Chronos, votre assistant temporel personnel. Comment puis-je vous aider aujourd'hui ?\n\nN'hésitez pas à me poser des questions sur nos destinations, nos tarifs ou la sécurité de nos voyages.",
    },
    ResponseRule {
        topic: Topic::Paris,
        keywords: &["paris", "1889", "belle époque", "eiffel", "montmartre"],
        response: "Paris 1889, un choix magnifique ! ✨\n\nVous assisterez à l'inauguration de la Tour Eiffel lors de l'Exposition Universelle.\n\n🗼 Au programme :\n• Promenades dans le Paris de Gustave Eiffel\n• Dégustation dans les cafés de Montmartre\n• Spectacles au Moulin Rouge\n• Costume d'époque sur mesure inclus\n\nLe voyage inclut un guide chrononaute francophone expert du XIXe siècle.",
    },
    ResponseRule {
        topic: Topic::Cretaceous,
        keywords: &["dinosaure", "crétacé", "dino", "titan", "t-rex", "jurassique", "extinction"],
        response: "L'Ère des Titans — notre destination la plus spectaculaire ! 🦕\n\nVous observerez les dinosaures dans leur habitat naturel, 65 millions d'années avant notre ère.\n\n🌿 Points forts :\n• Observation de T-Rex, Tricératops et Ptérodactyles\n• Camp de base sécurisé en forêt primitive\n• Bouclier temporel individuel permanent\n• Équipement d'exploration fourni\n\n⚠️ Expédition encadrée par 3 chrononautes experts minimum.",
    },
    ResponseRule {
        topic: Topic::Florence,
        keywords: &["florence", "renaissance", "1504", "vinci", "léonard", "michel-ange", "david", "médicis"],
        response: "Florence 1504, le berceau de la Renaissance ! 🎨\n\n✨ Expériences uniques :\n• Rencontre avec Léonard de Vinci dans son atelier\n• Assister à la création du David par Michel-Ange\n• Dîner au Palais des Médicis\n• Visite des plus grandes galeries de l'époque\n\nUn interprète temporel italien vous accompagne durant tout le séjour. Costume Renaissance sur mesure inclus.",
    },
    ResponseRule {
        topic: Topic::Pricing,
        keywords: &["prix", "tarif", "coût", "combien", "cher", "budget", "argent"],
        response: "Voici nos tarifs par destination :\n\n🗼 Paris 1889 — à partir de 12 500 €/voyageur\n🦕 Crétacé — à partir de 18 900 €/voyageur\n🎨 Florence 1504 — à partir de 14 200 €/voyageur\n\n✅ Chaque forfait inclut :\n• Transport temporel aller-retour\n• Équipement et costumes d'époque\n• Guide chrononaute dédié\n• Assurance retour garanti\n• Hébergement sur place\n\nDes options premium sont disponibles sur demande.",
    },
    ResponseRule {
        topic: Topic::Booking,
        keywords: &["réserver", "réservation", "booking", "inscription", "inscrire"],
        response: "Pour réserver, c'est simple ! 📋\n\n1️⃣ Explorez nos destinations sur le site\n2️⃣ Cliquez sur celle qui vous intéresse\n3️⃣ Un conseiller temporel vous contacte sous 24h\n4️⃣ Acompte de 30% à la réservation\n5️⃣ Solde 7 jours avant le départ\n\nVous pouvez aussi passer notre quiz de recommandation pour trouver la destination parfaite !",
    },
    ResponseRule {
        topic: Topic::Safety,
        keywords: &["sécurité", "danger", "risque", "sûr", "dangereux", "safe", "proteg"],
        response: "La sécurité est notre priorité absolue ! 🛡️\n\n• Bouclier temporel individuel haute fréquence\n• Chrononautes formés pendant 3 ans minimum\n• Taux de retour : 100% (2 847 voyages)\n• Zéro incident depuis la création\n• Technologie anti-paradoxe brevetée\n• Extraction d'urgence instantanée\n\nVous êtes en sécurité à chaque instant de votre voyage. C'est notre engagement.",
    },
    ResponseRule {
        topic: Topic::Packing,
        keywords: &["bagage", "valise", "emporter", "affaire", "préparer", "preparation"],
        response: "Excellente question ! 🧳\n\nVous n'avez presque rien à emporter :\n\n✅ Autorisé : médicaments personnels\n❌ Interdit : appareils électroniques modernes\n\nNous fournissons TOUT :\n• Costumes d'époque sur mesure\n• Équipement d'exploration\n• Kit de survie temporelle\n• Traducteur neuronal\n\nUne séance de préparation de 2h est incluse avant le départ.",
    },
    ResponseRule {
        topic: Topic::Duration,
        keywords: &["durée", "temps", "long", "jours", "combien de temps", "semaine"],
        response: "La durée standard est de 3 à 7 jours sur place. ⏳\n\nMais voici le meilleur :\nGrâce à notre technologie, vous revenez exactement au moment de votre départ.\n\n🤯 Concrètement : partez 7 jours au Crétacé et revenez comme si seulement quelques secondes s'étaient écoulées dans le présent !\n\nAucun impact sur votre vie quotidienne.",
    },
    ResponseRule {
        topic: Topic::ReturnGuarantee,
        keywords: &["retour", "revenir", "garantie", "garanti", "coincé", "bloqué"],
        response: "Le retour est garanti à 100% ! ✅\n\nNotre système de rappel temporel est infaillible :\n\n• Retour automatique en fin de séjour\n• Bouton d'extraction d'urgence individuel\n• Balise de localisation temporelle permanente\n• Double système de secours\n\n2 847 voyages réalisés. 2 847 retours réussis. Aucune exception.",
    },
    ResponseRule {
        topic: Topic::Advice,
        keywords: &["choisir", "conseiller", "hésit", "recommand", "quel", "laquelle", "aide"],
        response: "Je vous recommande notre quiz de recommandation ! 🎯\n\nIl est disponible juste au-dessus sur la page — en 4 questions, il détermine quelle époque correspond le mieux à votre personnalité.\n\nSinon, dites-moi :\n• 🗼 Culture et gastronomie → Paris 1889\n• 🦕 Aventure et nature → Crétacé\n• 🎨 Art et élégance → Florence 1504\n\nQu'est-ce qui vous attire le plus ?",
    },
    ResponseRule {
        topic: Topic::Thanks,
        keywords: &["merci", "super", "génial", "cool", "top", "parfait", "excellent"],
        response: "Avec grand plaisir ! 😊\n\nN'hésitez pas si d'autres questions vous viennent. Je suis disponible 24h/24 à travers toutes les époques.\n\nLe passé n'attend que vous ! ✨",
    },
    ResponseRule {
        topic: Topic::Identity,
        keywords: &["qui es", "chronos", "robot", "ia", "intelligence"],
        response: "Je suis Chronos, l'assistant IA de TimeTravel Agency ! 🕰️\n\nJe suis spécialisé dans le conseil en voyages temporels. Je connais chaque époque, chaque destination et chaque détail de nos services.\n\nMa mission : vous aider à trouver le voyage parfait et répondre à toutes vos questions. Que souhaitez-vous savoir ?",
    },
];

pub fn match_rule(utterance: &str) -> Option<&'static ResponseRule> {
    let normalized = normalize_for_matching(utterance);
    RULES.iter().find(|rule| rule.matches(&normalized))
}

/// The offline reply for an utterance. Pure: the same input always yields
/// the same text.
pub fn rule_based_reply(utterance: &str) -> &'static str {
    match_rule(utterance)
        .map(|rule| rule.response)
        .unwrap_or(DEFAULT_REPLY)
}
