use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: [FaqEntry; 8] = [
    FaqEntry {
        question: "Comment fonctionne le voyage temporel ?",
        answer: "Notre technologie brevetée de distorsion spatio-temporelle crée un corridor quantique stabilisé entre deux points dans le temps. Vous êtes enveloppé dans une bulle chrono-protectrice qui vous transporte instantanément à l'époque choisie. Le processus est totalement indolore — vous ressentirez tout au plus un léger picotement et une brève sensation de vertige, comparable à un ascenseur très rapide.",
    },
    FaqEntry {
        question: "Est-ce dangereux ?",
        answer: "La sécurité est notre priorité absolue. Chaque voyage est supervisé par nos chrononautes certifiés et notre IA de surveillance temporelle en temps réel. Nos capsules sont équipées d'un système de rapatriement d'urgence qui vous ramène instantanément au présent en cas d'anomalie. En plus de 2 800 expéditions, nous affichons un taux de retour réussi de 100 %.",
    },
    FaqEntry {
        question: "Que dois-je emporter ?",
        answer: "Absolument rien. Nous fournissons l'intégralité de l'équipement nécessaire : vêtements d'époque confectionnés sur mesure, traducteur neural universel, kit de survie temporelle et provisions adaptées. Vos effets personnels sont conservés en sécurité dans nos coffres quantiques pendant toute la durée de votre voyage. Nous vous demandons simplement de ne transporter aucun objet technologique moderne.",
    },
    FaqEntry {
        question: "Combien de temps dure un voyage ?",
        answer: "C'est la magie du voyage temporel : vous choisissez la durée de votre séjour dans le passé — de quelques heures à plusieurs semaines — tout en ne vous absentant que quelques secondes dans le présent. Votre patron ne remarquera même pas votre absence. Nos formules vont de l'excursion express (4 heures sur place) au séjour immersif (jusqu'à 21 jours).",
    },
    FaqEntry {
        question: "Puis-je modifier le passé ?",
        answer: "Strictement interdit. Notre bulle chrono-protectrice vous maintient en mode « observateur actif » : vous pouvez interagir avec votre environnement de manière superficielle, mais toute action susceptible d'altérer le continuum temporel est automatiquement neutralisée par notre système de stabilisation paradoxale. Les lois du Conseil Temporel International sont très claires à ce sujet.",
    },
    FaqEntry {
        question: "Y a-t-il une limite d'âge ?",
        answer: "Nos voyages sont accessibles dès 16 ans avec autorisation parentale et sans limite d'âge supérieure, sous réserve d'un certificat médical validé par notre équipe. Notre plus jeune voyageuse avait 16 ans (Renaissance italienne) et notre doyen 94 ans (Paris 1889). La bulle chrono-protectrice s'adapte à chaque métabolisme pour garantir un confort optimal.",
    },
    FaqEntry {
        question: "Comment se passe le retour ?",
        answer: "Le retour est aussi fluide que le départ. À l'heure convenue — ou sur simple activation de votre bracelet de rapatriement — le corridor quantique se rouvre et vous ramène exactement à votre point de départ, à la seconde près. Une légère désorientation temporelle est normale pendant les premières minutes. Notre équipe vous accueille avec une boisson chaude et un débriefing personnalisé.",
    },
    FaqEntry {
        question: "Puis-je voyager en groupe ?",
        answer: "Absolument. Nos capsules de voyage accueillent jusqu'à 8 personnes simultanément, idéal pour les familles, les couples ou les groupes d'amis. Nous proposons également des formules entreprise pour du team-building temporel — rien ne soude une équipe comme survivre ensemble au Crétacé. Des tarifs dégressifs s'appliquent à partir de 4 voyageurs.",
    },
];

/// Accordion state: at most one entry open at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaqAccordion {
    open: Option<usize>,
}

impl FaqAccordion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn open_entry(&self) -> Option<&'static FaqEntry> {
        self.open.and_then(|index| FAQ.get(index))
    }

    /// Opens `index`, or closes it if it is already the open one.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= FAQ.len() {
            return false;
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
        true
    }
}
