use crate::domain::model::{AnswerDetail, Exam, ExamResult, Question, QuestionType};
use std::collections::{BTreeSet, HashMap};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn is_answer_correct(question: &Question, answer: &[usize]) -> bool {
    match question.kind {
        QuestionType::Single => answer.len() == 1 && question.correct_answers.contains(&answer[0]),
        QuestionType::Multiple => {
            let given: BTreeSet<usize> = answer.iter().copied().collect();
            let expected: BTreeSet<usize> = question.correct_answers.iter().copied().collect();
            given == expected
        }
    }
}

pub fn percentage(score: usize, max_score: usize) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    score as f64 / max_score as f64 * 100.0
}

/// `user_answers` is keyed by the question's index in `exam.questions`.
pub fn calculate_results(exam: &Exam, user_answers: &HashMap<usize, Vec<usize>>) -> ExamResult {
    let mut score = 0;
    let mut answers = Vec::with_capacity(exam.questions.len());

    for (i, question) in exam.questions.iter().enumerate() {
        let user_answer = user_answers.get(&i).cloned().unwrap_or_default();
        let is_correct = is_answer_correct(question, &user_answer);
        if is_correct {
            score += 1;
        }

        answers.push(AnswerDetail {
            question_text: question.text.clone(),
            question_type: question.kind,
            user_answer,
            correct_answer: question.correct_answers.clone(),
            is_correct,
            explanation: question.explanation.clone(),
        });
    }

    let max_score = exam.questions.len();
    let percentage = percentage(score, max_score);
    let passed = percentage >= f64::from(exam.passing_score);

    ExamResult {
        exam_name: exam.name.clone(),
        score,
        max_score,
        percentage,
        passed,
        answers,
        timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        timed_out: false,
        elapsed_seconds: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::sample_exam;

    fn answers(entries: &[(usize, &[usize])]) -> HashMap<usize, Vec<usize>> {
        entries.iter().map(|(k, v)| (*k, v.to_vec())).collect()
    }

    #[test]
    fn test_all_correct() {
        let exam = sample_exam();
        let result = calculate_results(&exam, &answers(&[(0, &[1]), (1, &[2, 0]), (2, &[0])]));

        assert_eq!(result.score, 3);
        assert_eq!(result.max_score, 3);
        assert_eq!(result.percentage, 100.0);
        assert!(result.passed);
        assert!(result.answers.iter().all(|a| a.is_correct));
        assert_eq!(result.answers[0].explanation.as_deref(), Some("** raises to a power"));
    }

    #[test]
    fn test_multiple_requires_exact_set() {
        let exam = sample_exam();
        let q = &exam.questions[1];
        assert!(is_answer_correct(q, &[0, 2]));
        assert!(is_answer_correct(q, &[2, 0, 2]));
        assert!(!is_answer_correct(q, &[0]));
        assert!(!is_answer_correct(q, &[0, 1, 2]));
        assert!(!is_answer_correct(q, &[]));
    }

    #[test]
    fn test_single_requires_exactly_one_choice() {
        let exam = sample_exam();
        let q = &exam.questions[0];
        assert!(is_answer_correct(q, &[1]));
        assert!(!is_answer_correct(q, &[1, 0]));
        assert!(!is_answer_correct(q, &[]));
    }

    #[test]
    fn test_missing_answers_count_as_wrong() {
        let exam = sample_exam();
        let result = calculate_results(&exam, &answers(&[(0, &[1])]));

        assert_eq!(result.score, 1);
        assert!(result.answers[1].user_answer.is_empty());
        assert!(!result.answers[1].is_correct);
        assert!((result.percentage - 100.0 / 3.0).abs() < 1e-9);
        assert!(!result.passed);
    }

    #[test]
    fn test_passing_threshold_is_inclusive() {
        let mut exam = sample_exam();
        exam.passing_score = 66;
        let two_of_three = answers(&[(0, &[1]), (1, &[0, 2])]);
        assert!(calculate_results(&exam, &two_of_three).passed);

        exam.passing_score = 67;
        assert!(!calculate_results(&exam, &two_of_three).passed);
    }

    #[test]
    fn test_empty_exam_scores_zero() {
        let mut exam = sample_exam();
        exam.questions.clear();
        exam.passing_score = 0;
        let result = calculate_results(&exam, &HashMap::new());
        assert_eq!(result.percentage, 0.0);
        assert!(result.passed);
    }
}
