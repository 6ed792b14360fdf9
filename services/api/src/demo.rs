use crate::infra::offline_service;
use clap::Args;
use interview_coach::error::AppError;
use interview_coach::interview::{
    AnswerSubmission, BehavioralFeedback, CodeAttempt, DashboardSummary, Difficulty,
    InterviewType, Language, NewSession, PersonaType, PracticeSettings, Question, QuestionBank,
    QuestionKind, TechnicalFeedback, UserId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Interview type: technical, behavioral or mixed
    #[arg(long = "type", default_value = "mixed", value_parser = parse_choice::<InterviewType>)]
    pub(crate) interview_type: InterviewType,
    /// Session difficulty: easy, medium or hard
    #[arg(long, default_value = "medium", value_parser = parse_choice::<Difficulty>)]
    pub(crate) difficulty: Difficulty,
    /// Candidate persona: student, bootcamp or esl
    #[arg(long, default_value = "student", value_parser = parse_choice::<PersonaType>)]
    pub(crate) persona: PersonaType,
    /// Role the practice targets, e.g. "SDE" or "Web Dev"
    #[arg(long, default_value = "SDE")]
    pub(crate) role: String,
    /// Number of seed questions to draw
    #[arg(long, default_value_t = 4)]
    pub(crate) questions: usize,
    /// Seed for question sampling, for reproducible runs
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionsArgs {
    /// Print the bank as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_choice<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_ascii_lowercase()))
        .map_err(|err| format!("unrecognized value '{raw}' ({err})"))
}

const SAMPLE_TRANSCRIPT: &str = "During my capstone project our team kept missing deadlines. \
    For example, one sprint we delivered only half of the planned stories. I proposed short \
    daily check-ins and split the work into smaller tasks. As a result we finished the next \
    three sprints on time and our demo grade improved.";

const SAMPLE_CODE: &str = "// single pass with a lookup table\n\
    function solve(items) {\n  const seen = {};\n  for (let i = 0; i < items.length; i++) {\n    \
    seen[items[i]] = i;\n  }\n  return seen;\n}";

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        interview_type,
        difficulty,
        persona,
        role,
        questions,
        seed,
    } = args;

    let service = offline_service(PracticeSettings {
        default_user: UserId("demo-user".to_string()),
        question_count: questions,
    });
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let session = service.create_session_with_rng(
        NewSession {
            interview_type,
            difficulty,
            duration_min: 30,
            role_target: role,
            persona_type: persona,
            user_id: None,
        },
        &mut rng,
    )?;
    let details = service.get_session(&session.id)?;

    println!("Interview coach demo");
    println!(
        "Session {} | {} | {} | persona {}",
        session.id.0,
        session.interview_type.label(),
        session.difficulty.label(),
        session.persona_type.label()
    );

    for (index, question) in details.questions.iter().enumerate() {
        print_question(index + 1, question);
        match question.kind {
            QuestionKind::Behavioral => {
                let answer = service
                    .submit_answer(
                        &session.id,
                        AnswerSubmission {
                            question_id: question.id.clone(),
                            transcript: SAMPLE_TRANSCRIPT.to_string(),
                            persona_type: None,
                        },
                    )
                    .await?;
                if let Some(feedback) = &answer.feedback {
                    print_behavioral(feedback);
                }
            }
            QuestionKind::Technical => {
                let outcome = service
                    .submit_code(
                        &session.id,
                        CodeAttempt {
                            question_id: question.id.clone(),
                            code: SAMPLE_CODE.to_string(),
                            language: Language::Javascript,
                        },
                    )
                    .await?;
                println!(
                    "   tests: {}/{} passed",
                    outcome.submission.passed_tests, outcome.submission.total_tests
                );
                if let Some(feedback) = &outcome.submission.feedback {
                    print_technical(feedback);
                }
            }
        }
    }

    let completion = service.complete_session(&session.id)?;
    println!("\nSession complete");
    println!("- overall score: {}", display_score(completion.overall_score()));
    println!(
        "- behavioral average: {}",
        display_score(completion.behavioral_average)
    );
    println!(
        "- technical average: {}",
        display_score(completion.technical_average)
    );
    println!("- next practice: {}", completion.next_practice);

    print_dashboard(&service.dashboard(None)?);
    Ok(())
}

pub(crate) fn list_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let bank = QuestionBank::seeded();
    let questions: Vec<&Question> = bank.all().collect();

    if args.json {
        let rendered = serde_json::to_string_pretty(&questions).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{:<4} {:<11} {:<7} {:<9} Title", "Id", "Kind", "Level", "Role");
    for question in questions {
        let kind = match question.kind {
            QuestionKind::Technical => "technical",
            QuestionKind::Behavioral => "behavioral",
        };
        println!(
            "{:<4} {:<11} {:<7} {:<9} {}",
            question.id.0,
            kind,
            question.difficulty.label(),
            question.role_target,
            question.title
        );
    }
    Ok(())
}

fn print_question(position: usize, question: &Question) {
    println!("\n{position}. [{}] {}", question.id.0, question.title);
}

fn print_behavioral(feedback: &BehavioralFeedback) {
    println!(
        "   content {:.0} | structure {:.0} | communication {:.0}",
        feedback.content_score, feedback.structure_score, feedback.communication_score
    );
    for tip in &feedback.improve_next_time {
        println!("   - {tip}");
    }
    if let Some(language) = &feedback.language_feedback {
        for tip in language.pronunciation_tips.iter().chain(&language.grammar_tips) {
            println!("   * {tip}");
        }
    }
}

fn print_technical(feedback: &TechnicalFeedback) {
    println!(
        "   correctness {:.0} | efficiency {:.0} | quality {:.0}",
        feedback.correctness_score, feedback.efficiency_score, feedback.quality_score
    );
    for tip in &feedback.improve_next_time {
        println!("   - {tip}");
    }
}

fn print_dashboard(summary: &DashboardSummary) {
    println!("\nDashboard");
    println!(
        "- {} interviews | average {}",
        summary.total_interviews,
        display_score(summary.average_score)
    );
    for view in &summary.sessions {
        println!(
            "  - {} {} score {} ({:?})",
            view.date.format("%Y-%m-%d %H:%M"),
            view.interview_type.label(),
            display_score(view.score),
            view.trend
        );
    }
}

fn display_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |score| format!("{score:.1}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_choices_case_insensitively() {
        assert_eq!(
            parse_choice::<InterviewType>("Mixed"),
            Ok(InterviewType::Mixed)
        );
        assert_eq!(parse_choice::<PersonaType>(" ESL "), Ok(PersonaType::Esl));
        assert!(parse_choice::<Difficulty>("brutal").is_err());
    }

    #[test]
    fn formats_missing_scores() {
        assert_eq!(display_score(None), "n/a");
        assert_eq!(display_score(Some(72.26)), "72.3");
    }

    #[tokio::test]
    async fn demo_runs_end_to_end_with_a_fixed_seed() {
        let result = run_demo(DemoArgs {
            interview_type: InterviewType::Mixed,
            difficulty: Difficulty::Medium,
            persona: PersonaType::Esl,
            role: "SDE".to_string(),
            questions: 4,
            seed: Some(7),
        })
        .await;

        assert!(result.is_ok());
    }
}
