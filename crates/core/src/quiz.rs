use serde::Serialize;

use crate::catalog::DESTINATIONS;
use crate::error::CoreError;

/// Score vector indexed like [`DESTINATIONS`]: Paris, Crétacé, Florence.
pub type Scores = [u32; 3];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizOption {
    pub label: &'static str,
    pub emoji: &'static str,
    pub scores: Scores,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub options: [QuizOption; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub destination_id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
}

const fn option(label: &'static str, emoji: &'static str, scores: Scores) -> QuizOption {
    QuizOption {
        label,
        emoji,
        scores,
    }
}

pub const QUESTIONS: [QuizQuestion; 4] = [
    QuizQuestion {
        prompt: "Quel type d'expérience recherchez-vous ?",
        options: [
            option("Culturelle et artistique", "🎭", [2, 0, 1]),
            option("Aventure et nature", "🌿", [0, 2, 0]),
            option("Élégance et raffinement", "✨", [1, 0, 2]),
        ],
    },
    QuizQuestion {
        prompt: "Votre période préférée ?",
        options: [
            option("Histoire moderne (XIXe siècle)", "🏛️", [2, 0, 0]),
            option("Temps anciens et origines", "🌋", [0, 2, 0]),
            option("Renaissance et classicisme", "📜", [0, 0, 2]),
        ],
    },
    QuizQuestion {
        prompt: "Vous préférez :",
        options: [
            option("L'effervescence urbaine", "🌃", [2, 0, 1]),
            option("La nature sauvage", "🦎", [0, 2, 0]),
            option("L'art et l'architecture", "🏰", [1, 0, 2]),
        ],
    },
    QuizQuestion {
        prompt: "Votre activité idéale :",
        options: [
            option("Visiter des monuments", "🗼", [2, 0, 1]),
            option("Observer la faune", "🦕", [0, 2, 0]),
            option("Explorer des musées", "🎨", [1, 0, 2]),
        ],
    },
];

pub const RESULTS: [QuizResult; 3] = [
    QuizResult {
        destination_id: DESTINATIONS[0].id,
        title: "Paris 1889",
        subtitle: "La Belle Époque",
        description: "Vous êtes fait pour l'effervescence culturelle du Paris de 1889 ! L'Exposition Universelle, les cafés de Montmartre et l'inauguration de la Tour Eiffel vous attendent.",
    },
    QuizResult {
        destination_id: DESTINATIONS[1].id,
        title: "Crétacé",
        subtitle: "L'Ère des Titans",
        description: "L'aventure coule dans vos veines ! Direction le Crétacé pour observer les créatures les plus majestueuses ayant jamais foulé la Terre.",
    },
    QuizResult {
        destination_id: DESTINATIONS[2].id,
        title: "Florence 1504",
        subtitle: "La Renaissance",
        description: "Votre sensibilité artistique vous destine à la Florence de la Renaissance. Léonard de Vinci, Michel-Ange et les Médicis n'attendent que vous.",
    },
];

/// Highest score wins; on a tie the earliest destination wins.
pub fn best_match(scores: &Scores) -> &'static QuizResult {
    let mut best = 0;
    for (index, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = index;
        }
    }
    &RESULTS[best]
}

/// Scores a full answer sheet (one option index per question).
pub fn score_answers(answers: &[usize]) -> Result<&'static QuizResult, CoreError> {
    if answers.len() != QUESTIONS.len() {
        return Err(CoreError::InvalidQuizAnswer(format!(
            "expected {} answers, got {}",
            QUESTIONS.len(),
            answers.len()
        )));
    }

    let mut session = QuizSession::new();
    session.start();
    for (question, choice) in answers.iter().enumerate() {
        if !session.answer(*choice) {
            return Err(CoreError::InvalidQuizAnswer(format!(
                "question {} has no option {}",
                question + 1,
                choice
            )));
        }
    }

    session
        .result()
        .ok_or_else(|| CoreError::InvalidQuizAnswer("quiz did not finish".to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "question", rename_all = "snake_case")]
pub enum QuizStage {
    Intro,
    Question(usize),
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    stage: QuizStage,
    scores: Scores,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            stage: QuizStage::Intro,
            scores: [0; 3],
        }
    }

    pub fn stage(&self) -> QuizStage {
        self.stage
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn current_question(&self) -> Option<&'static QuizQuestion> {
        match self.stage {
            QuizStage::Question(index) => QUESTIONS.get(index),
            _ => None,
        }
    }

    pub fn start(&mut self) {
        if self.stage == QuizStage::Intro {
            self.stage = QuizStage::Question(0);
        }
    }

    /// Ignored outside a question or for an option the question lacks.
    pub fn answer(&mut self, choice: usize) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        let Some(option) = question.options.get(choice) else {
            return false;
        };

        for (total, gained) in self.scores.iter_mut().zip(option.scores) {
            *total += gained;
        }

        let QuizStage::Question(index) = self.stage else {
            return false;
        };
        self.stage = if index + 1 < QUESTIONS.len() {
            QuizStage::Question(index + 1)
        } else {
            QuizStage::Finished
        };
        true
    }

    pub fn progress_percent(&self) -> u8 {
        match self.stage {
            QuizStage::Intro => 0,
            QuizStage::Question(index) => ((index * 100) / QUESTIONS.len()) as u8,
            QuizStage::Finished => 100,
        }
    }

    pub fn result(&self) -> Option<&'static QuizResult> {
        (self.stage == QuizStage::Finished).then(|| best_match(&self.scores))
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
