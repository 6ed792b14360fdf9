use rand::Rng;
use tracing::debug;

use super::domain::{Difficulty, InterviewType, PersonaType, Question, QuestionId, QuestionKind};

/// Parameters for drawing the seed questions of a new session.
#[derive(Debug, Clone)]
pub struct SelectionRequest {
    pub interview_type: InterviewType,
    pub difficulty: Difficulty,
    pub role_target: String,
    pub persona_type: PersonaType,
    pub count: usize,
}

/// How many questions to draw from each pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionMix {
    pub technical: usize,
    pub behavioral: usize,
}

impl QuestionMix {
    pub fn for_request(interview_type: InterviewType, persona: PersonaType, count: usize) -> Self {
        match (interview_type, persona) {
            (InterviewType::Technical, _) => Self {
                technical: count,
                behavioral: 0,
            },
            (InterviewType::Behavioral, _) => Self {
                technical: 0,
                behavioral: count,
            },
            // ESL learners lean toward behavioral practice.
            (InterviewType::Mixed, PersonaType::Esl) => {
                // ceil(2n/3) without the multiplication.
                let behavioral = count - count / 3;
                Self {
                    technical: count - behavioral,
                    behavioral,
                }
            }
            (InterviewType::Mixed, _) => {
                let technical = count.div_ceil(2);
                Self {
                    technical,
                    behavioral: count - technical,
                }
            }
        }
    }
}

/// Read-only catalogue of practice questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    technical: Vec<Question>,
    behavioral: Vec<Question>,
}

impl QuestionBank {
    pub fn new(technical: Vec<Question>, behavioral: Vec<Question>) -> Self {
        Self {
            technical,
            behavioral,
        }
    }

    /// The built-in question catalogue.
    pub fn seeded() -> Self {
        Self::new(seed_technical(), seed_behavioral())
    }

    pub fn all(&self) -> impl Iterator<Item = &Question> {
        self.technical.iter().chain(self.behavioral.iter())
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.all().find(|question| &question.id == id)
    }

    /// Resolve ids in order, skipping any that are not in the bank.
    pub fn questions_for(&self, ids: &[QuestionId]) -> Vec<Question> {
        ids.iter()
            .filter_map(|id| self.question(id).cloned())
            .collect()
    }

    /// Draw seed questions: behavioral picks first, then technical picks.
    ///
    /// Pools smaller than the desired count are returned whole; an empty pool contributes
    /// nothing.
    pub fn select<R>(&self, request: &SelectionRequest, rng: &mut R) -> Vec<Question>
    where
        R: Rng + ?Sized,
    {
        let technical_pool: Vec<&Question> = self
            .technical
            .iter()
            .filter(|question| request.difficulty.admits(question.difficulty))
            .filter(|question| question.matches_role(&request.role_target))
            .collect();
        let behavioral_pool: Vec<&Question> = self
            .behavioral
            .iter()
            .filter(|question| request.difficulty.admits(question.difficulty))
            .collect();

        let mix = QuestionMix::for_request(
            request.interview_type,
            request.persona_type,
            request.count,
        );

        let chosen_technical = sample_without_replacement(technical_pool, mix.technical, rng);
        let chosen_behavioral = sample_without_replacement(behavioral_pool, mix.behavioral, rng);

        debug!(
            interview_type = request.interview_type.label(),
            difficulty = request.difficulty.label(),
            desired_technical = mix.technical,
            desired_behavioral = mix.behavioral,
            chosen_technical = chosen_technical.len(),
            chosen_behavioral = chosen_behavioral.len(),
            "selected seed questions"
        );

        chosen_behavioral
            .into_iter()
            .chain(chosen_technical)
            .cloned()
            .collect()
    }
}

fn sample_without_replacement<'a, R>(
    mut pool: Vec<&'a Question>,
    wanted: usize,
    rng: &mut R,
) -> Vec<&'a Question>
where
    R: Rng + ?Sized,
{
    let mut picked = Vec::with_capacity(wanted.min(pool.len()));
    while picked.len() < wanted && !pool.is_empty() {
        let index = rng.gen_range(0..pool.len());
        picked.push(pool.remove(index));
    }
    picked
}

fn question(
    id: &str,
    kind: QuestionKind,
    difficulty: Difficulty,
    title: &str,
    body: &str,
    role_target: &str,
) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        kind,
        difficulty,
        title: title.to_string(),
        body: body.to_string(),
        role_target: role_target.to_string(),
    }
}

fn seed_technical() -> Vec<Question> {
    vec![
        question(
            "t1",
            QuestionKind::Technical,
            Difficulty::Easy,
            "Two Sum (Array)",
            "Given an array of integers nums and an integer target, return indices of the two numbers such that they add up to target.\nYou may assume that each input would have exactly one solution, and you may not use the same element twice.",
            "SDE",
        ),
        question(
            "t2",
            QuestionKind::Technical,
            Difficulty::Medium,
            "Valid Parentheses",
            "Given a string s containing just the characters '(', ')', '{', '}', '[' and ']', determine if the input string is valid.\nAn input string is valid if open brackets are closed in the correct order.",
            "SDE",
        ),
        question(
            "t3",
            QuestionKind::Technical,
            Difficulty::Medium,
            "Design a Simple REST API",
            "Design a simple REST API for a todo list application. Describe endpoints, request/response shapes, and how you would structure the backend.",
            "Web Dev",
        ),
        question(
            "t4",
            QuestionKind::Technical,
            Difficulty::Easy,
            "Flexbox Centering",
            "In CSS, how would you center a div both vertically and horizontally inside its parent using Flexbox?",
            "Web Dev",
        ),
    ]
}

fn seed_behavioral() -> Vec<Question> {
    vec![
        question(
            "b1",
            QuestionKind::Behavioral,
            Difficulty::Easy,
            "Tell Me About Yourself",
            "Give a short introduction about yourself, your background, and what you are looking for.",
            "Any",
        ),
        question(
            "b2",
            QuestionKind::Behavioral,
            Difficulty::Medium,
            "Challenge You Faced",
            "Describe a challenging problem you faced in a project or course. What did you do, and what was the outcome?",
            "Any",
        ),
        question(
            "b3",
            QuestionKind::Behavioral,
            Difficulty::Easy,
            "Teamwork Example",
            "Tell me about a time you worked in a team. What was your role, and how did you contribute?",
            "Any",
        ),
    ]
}
