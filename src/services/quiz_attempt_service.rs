use std::collections::{BTreeSet, HashMap};

use crate::errors::{AppError, AppResult};
use crate::models::domain::{GradedBy, QuizAnswer, QuizCategory, QuizQuestion, QuizScore};

pub struct QuizAttemptService;

impl QuizAttemptService {
    /// Check a multiple-choice selection against a question
    pub fn check_selection(question: &QuizQuestion, selected: &[usize]) -> AppResult<QuizAnswer> {
        if let Some(index) = selected.iter().find(|i| **i >= question.options.len()) {
            return Err(AppError::ValidationError(format!(
                "Selected option {} does not exist; question has {} options",
                index,
                question.options.len()
            )));
        }

        let selected_set: BTreeSet<usize> = selected.iter().copied().collect();
        let is_correct = Self::grade_question(question, &selected_set);

        Ok(QuizAnswer {
            question_id: question.id.clone(),
            selected_option_indexes: Some(selected_set.into_iter().collect()),
            free_text_answer: None,
            is_correct,
            feedback: Self::selection_feedback(question, is_correct),
            graded_by: GradedBy::Selection,
        })
    }

    /// Correct if ALL correct options selected AND zero incorrect options
    fn grade_question(question: &QuizQuestion, selected: &BTreeSet<usize>) -> bool {
        let correct: BTreeSet<usize> = question.correct_option_indexes.iter().copied().collect();
        !correct.is_empty() && *selected == correct
    }

    fn selection_feedback(question: &QuizQuestion, is_correct: bool) -> String {
        let mut feedback = if is_correct {
            "Correct!".to_string()
        } else {
            let answers: Vec<&str> = question
                .correct_option_indexes
                .iter()
                .filter_map(|i| question.options.get(*i).map(String::as_str))
                .collect();
            let noun = if question.is_multi_select() {
                "answers are"
            } else {
                "answer is"
            };
            format!("Not quite. The correct {}: {}.", noun, answers.join("; "))
        };

        if let Some(explanation) = &question.explanation {
            feedback.push(' ');
            feedback.push_str(explanation);
        }
        feedback
    }

    /// Weighted score for a finished quiz. Unanswered questions earn nothing.
    pub fn score_quiz(questions: &[QuizQuestion], answers: &[QuizAnswer]) -> AppResult<QuizScore> {
        let answer_map: HashMap<&str, &QuizAnswer> = answers
            .iter()
            .map(|a| (a.question_id.as_str(), a))
            .collect();

        if let Some(stray) = answers
            .iter()
            .find(|a| !questions.iter().any(|q| q.id == a.question_id))
        {
            return Err(AppError::ValidationError(format!(
                "Answer refers to unknown question '{}'",
                stray.question_id
            )));
        }

        let mut earned_weight: u32 = 0;
        let mut total_weight: u32 = 0;
        let mut correct_count = 0;
        let mut all_red_flags_correct = true;

        for question in questions {
            let is_correct = answer_map
                .get(question.id.as_str())
                .is_some_and(|a| a.is_correct);

            total_weight += u32::from(question.weight);
            if is_correct {
                earned_weight += u32::from(question.weight);
                correct_count += 1;
            } else if question.category == QuizCategory::RedFlag {
                all_red_flags_correct = false;
            }
        }

        let ratio = if total_weight > 0 {
            f64::from(earned_weight) / f64::from(total_weight)
        } else if questions.is_empty() {
            0.0
        } else {
            // every weight is zero, fall back to a plain count
            correct_count as f64 / questions.len() as f64
        };

        Ok(QuizScore {
            percentage: (ratio * 1000.0).round() / 10.0,
            earned_weight,
            total_weight,
            correct_count,
            question_count: questions.len(),
            all_red_flags_correct,
        })
    }
}
