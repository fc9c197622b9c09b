// src/exam.rs
//! Exam draft model and the conversions between the backend's creation
//! payload, the editable draft, and the final submission body.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{Result, TiacherError};

pub const DEFAULT_TITLE: &str = "Examen generado";
pub const DEFAULT_SUBJECT: &str = "Asignatura";
pub const DEFAULT_DESCRIPTION: &str = "Examen generado automáticamente";

/// Answer letter used by the final submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    pub fn from_id(id: u32) -> Option<Letter> {
        match id {
            1 => Some(Letter::A),
            2 => Some(Letter::B),
            3 => Some(Letter::C),
            4 => Some(Letter::D),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Letter::A => 1,
            Letter::B => 2,
            Letter::C => 3,
            Letter::D => 4,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
        };
        write!(f, "{}", s)
    }
}

/// Parses an answer key as sent by the backend: `"1".."n"` or `"A".."D"`.
pub fn parse_answer_key(key: &str) -> Option<u32> {
    let key = key.trim();
    if let Ok(id) = key.parse::<u32>() {
        return Some(id);
    }
    match key.to_uppercase().as_str() {
        "A" => Some(1),
        "B" => Some(2),
        "C" => Some(3),
        "D" => Some(4),
        _ => None,
    }
}

fn correct_id(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => parse_answer_key(s),
        _ => None,
    }
}

/// One question as produced by `POST /exam/create` and kept in `examData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(rename = "pregunta")]
    pub text: String,
    #[serde(rename = "respuestas")]
    pub answers: Map<String, Value>,
    #[serde(rename = "correcta", default)]
    pub correct: Value,
}

/// Response body of `POST /exam/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedExam {
    pub id: Value,
    #[serde(rename = "preguntas", default)]
    pub questions: Vec<RawQuestion>,
}

impl CreatedExam {
    /// The exam id as text, whether the backend sent a number or a string.
    pub fn exam_id(&self) -> Result<String> {
        match &self.id {
            Value::String(s) if !s.is_empty() => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(TiacherError::UnexpectedResponse(format!(
                "exam id missing or invalid: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamMeta {
    pub title: String,
    pub subject: String,
    pub description: String,
}

impl Default for ExamMeta {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl ExamMeta {
    /// Reads stored metadata; missing, empty or unparsable fields get defaults.
    pub fn from_stored(raw: Option<&str>) -> Self {
        #[derive(Deserialize, Default)]
        struct Stored {
            #[serde(default)]
            title: String,
            #[serde(default)]
            subject: String,
            #[serde(default)]
            description: String,
        }

        let stored = match raw {
            Some(raw) => serde_json::from_str::<Stored>(raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable exam metadata: {}", e);
                Stored::default()
            }),
            None => Stored::default(),
        };

        let or_default = |value: String, default: &str| {
            if value.is_empty() { default.to_string() } else { value }
        };
        Self {
            title: or_default(stored.title, DEFAULT_TITLE),
            subject: or_default(stored.subject, DEFAULT_SUBJECT),
            description: or_default(stored.description, DEFAULT_DESCRIPTION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id: u32,
    pub text: String,
    pub correct: bool,
}

impl Answer {
    pub fn letter(&self) -> Option<Letter> {
        Letter::from_id(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 1-based position in the exam.
    pub number: u32,
    pub text: String,
    pub answers: Vec<Answer>,
}

impl Question {
    fn from_raw(number: u32, raw: &RawQuestion) -> Result<Self> {
        let correct = correct_id(&raw.correct);
        let mut answers = raw
            .answers
            .iter()
            .map(|(key, value)| -> Result<Answer> {
                let id = parse_answer_key(key).ok_or_else(|| {
                    TiacherError::UnexpectedResponse(format!(
                        "question {} has an answer with key '{}'",
                        number, key
                    ))
                })?;
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Ok(Answer {
                    id,
                    text,
                    correct: Some(id) == correct,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        answers.sort_by_key(|a| a.id);
        if let Some(pair) = answers.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(TiacherError::UnexpectedResponse(format!(
                "question {} has two answers with id {}",
                number, pair[0].id
            )));
        }

        Ok(Self {
            number,
            text: raw.text.clone(),
            answers,
        })
    }

    fn to_raw(&self) -> RawQuestion {
        let answers = self
            .answers
            .iter()
            .map(|a| (a.id.to_string(), Value::String(a.text.clone())))
            .collect();
        let correct = self
            .answers
            .iter()
            .find(|a| a.correct)
            .map(|a| Value::from(a.id))
            .unwrap_or(Value::Null);
        RawQuestion {
            text: self.text.clone(),
            answers,
            correct,
        }
    }

    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|a| a.correct)
    }

    /// Letter of the flagged answer, `A` when none is flagged or its id has no letter.
    pub fn correct_letter(&self) -> Letter {
        match self.correct_answer().and_then(Answer::letter) {
            Some(letter) => letter,
            None => {
                warn!(
                    "Question {} has no correct answer in A-D, submitting 'A'",
                    self.number
                );
                Letter::A
            }
        }
    }

    fn answer_mut(&mut self, id: u32) -> Result<&mut Answer> {
        let number = self.number;
        self.answers
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| TiacherError::NotFound(format!("Answer {} of question {}", id, number)))
    }
}

/// The editable exam held between creation and final submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamDraft {
    pub id: String,
    pub meta: ExamMeta,
    pub questions: Vec<Question>,
}

impl ExamDraft {
    pub fn from_raw(id: impl Into<String>, meta: ExamMeta, raw: &[RawQuestion]) -> Result<Self> {
        let questions = raw
            .iter()
            .enumerate()
            .map(|(idx, q)| Question::from_raw(idx as u32 + 1, q))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            id: id.into(),
            meta,
            questions,
        })
    }

    /// Back to the stored `examData` shape.
    pub fn to_raw(&self) -> Vec<RawQuestion> {
        self.questions.iter().map(Question::to_raw).collect()
    }

    fn question_mut(&mut self, number: u32) -> Result<&mut Question> {
        self.questions
            .iter_mut()
            .find(|q| q.number == number)
            .ok_or_else(|| TiacherError::NotFound(format!("Question {}", number)))
    }

    pub fn set_question_text(&mut self, number: u32, text: impl Into<String>) -> Result<()> {
        self.question_mut(number)?.text = text.into();
        Ok(())
    }

    pub fn set_answer_text(&mut self, number: u32, answer_id: u32, text: impl Into<String>) -> Result<()> {
        self.question_mut(number)?.answer_mut(answer_id)?.text = text.into();
        Ok(())
    }

    /// Flags `answer_id` as the only correct answer of question `number`.
    pub fn mark_correct(&mut self, number: u32, answer_id: u32) -> Result<()> {
        let question = self.question_mut(number)?;
        question.answer_mut(answer_id)?;
        question.answers = question
            .answers
            .iter()
            .map(|a| Answer {
                correct: a.id == answer_id,
                ..a.clone()
            })
            .collect();
        Ok(())
    }

    pub fn to_final(&self) -> FinalExam {
        let correct_answers = self
            .questions
            .iter()
            .map(|q| CorrectAnswer {
                number: q.number,
                letter: q.correct_letter(),
            })
            .collect();

        let questions = self
            .questions
            .iter()
            .map(|q| {
                let mut answers = BTreeMap::new();
                for answer in &q.answers {
                    match answer.letter() {
                        Some(letter) => {
                            answers.insert(letter, answer.text.clone());
                        }
                        None => warn!(
                            "Dropping answer {} of question {}: no letter for that id",
                            answer.id, q.number
                        ),
                    }
                }
                FinalQuestion {
                    number: q.number,
                    text: q.text.clone(),
                    answers,
                }
            })
            .collect();

        FinalExam {
            id: self.id.clone(),
            title: self.meta.title.clone(),
            subject: self.meta.subject.clone(),
            description: self.meta.description.clone(),
            correct_answers,
            questions,
        }
    }
}

/// Body of `POST /exam/final`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalExam {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "asignatura")]
    pub subject: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "respuestasCorrectas")]
    pub correct_answers: Vec<CorrectAnswer>,
    #[serde(rename = "preguntas")]
    pub questions: Vec<FinalQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectAnswer {
    #[serde(rename = "numeroPregunta")]
    pub number: u32,
    #[serde(rename = "respuestaCorrecta")]
    pub letter: Letter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalQuestion {
    #[serde(rename = "numeroPregunta")]
    pub number: u32,
    #[serde(rename = "pregunta")]
    pub text: String,
    #[serde(rename = "respuestas")]
    pub answers: BTreeMap<Letter, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_raw() -> Vec<RawQuestion> {
        serde_json::from_value(json!([
            {
                "pregunta": "Capital of France?",
                "respuestas": {"1": "Paris", "2": "Lyon", "3": "Nice", "4": "Lille"},
                "correcta": 1
            },
            {
                "pregunta": "2 + 2?",
                "respuestas": {"4": "5", "3": "4", "2": "3", "1": "22"},
                "correcta": "3"
            }
        ]))
        .unwrap()
    }

    fn sample_draft() -> ExamDraft {
        ExamDraft::from_raw("41", ExamMeta::default(), &sample_raw()).unwrap()
    }

    #[test]
    fn test_letter_mapping_is_total_on_one_to_four() {
        for id in 1..=4 {
            let letter = Letter::from_id(id).unwrap();
            assert_eq!(letter.id(), id);
        }
        assert_eq!(Letter::from_id(0), None);
        assert_eq!(Letter::from_id(5), None);
        assert_eq!(parse_answer_key("c"), Some(3));
        assert_eq!(parse_answer_key("x"), None);
    }

    #[test]
    fn test_draft_from_create_payload() {
        let draft = sample_draft();
        assert_eq!(draft.questions.len(), 2);

        let second = &draft.questions[1];
        assert_eq!(second.number, 2);
        assert_eq!(
            second.answers.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(second.correct_answer().unwrap().text, "4");
        assert_eq!(second.correct_letter(), Letter::C);
    }

    #[test]
    fn test_letter_keyed_payload_is_accepted() {
        let raw: Vec<RawQuestion> = serde_json::from_value(json!([{
            "pregunta": "Pick B",
            "respuestas": {"A": "no", "B": "yes", "C": "no", "D": "no"},
            "correcta": "B"
        }]))
        .unwrap();
        let draft = ExamDraft::from_raw("1", ExamMeta::default(), &raw).unwrap();
        assert_eq!(draft.questions[0].correct_letter(), Letter::B);
    }

    #[test]
    fn test_unknown_answer_key_is_rejected() {
        let raw: Vec<RawQuestion> = serde_json::from_value(json!([{
            "pregunta": "?",
            "respuestas": {"first": "x"},
            "correcta": 1
        }]))
        .unwrap();
        let err = ExamDraft::from_raw("1", ExamMeta::default(), &raw).unwrap_err();
        assert!(matches!(err, TiacherError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_keys_naming_the_same_answer_are_rejected() {
        for answers in [
            json!({"1": "one", "A": "alpha", "2": "two", "3": "three"}),
            json!({"1": "one", "01": "zero one", "2": "two"}),
        ] {
            let raw: Vec<RawQuestion> = serde_json::from_value(json!([{
                "pregunta": "?",
                "respuestas": answers,
                "correcta": 1
            }]))
            .unwrap();
            let err = ExamDraft::from_raw("1", ExamMeta::default(), &raw).unwrap_err();
            assert!(matches!(err, TiacherError::UnexpectedResponse(ref m) if m.contains("two answers with id 1")));
        }
    }

    #[test]
    fn test_mark_correct_leaves_exactly_one_flag() {
        let mut draft = sample_draft();
        for id in [2, 4, 1, 4] {
            draft.mark_correct(1, id).unwrap();
            let flagged: Vec<u32> = draft.questions[0]
                .answers
                .iter()
                .filter(|a| a.correct)
                .map(|a| a.id)
                .collect();
            assert_eq!(flagged, vec![id]);
        }
        assert!(matches!(draft.mark_correct(1, 9), Err(TiacherError::NotFound(_))));
        assert!(matches!(draft.mark_correct(7, 1), Err(TiacherError::NotFound(_))));
    }

    #[test]
    fn test_final_payload_preserves_untouched_text() {
        let mut draft = sample_draft();
        draft.set_answer_text(2, 1, "twenty-two").unwrap();
        draft.mark_correct(1, 2).unwrap();

        let body = serde_json::to_value(draft.to_final()).unwrap();
        assert_eq!(
            body,
            json!({
                "id": "41",
                "titulo": DEFAULT_TITLE,
                "asignatura": DEFAULT_SUBJECT,
                "descripcion": DEFAULT_DESCRIPTION,
                "respuestasCorrectas": [
                    {"numeroPregunta": 1, "respuestaCorrecta": "B"},
                    {"numeroPregunta": 2, "respuestaCorrecta": "C"}
                ],
                "preguntas": [
                    {
                        "numeroPregunta": 1,
                        "pregunta": "Capital of France?",
                        "respuestas": {"A": "Paris", "B": "Lyon", "C": "Nice", "D": "Lille"}
                    },
                    {
                        "numeroPregunta": 2,
                        "pregunta": "2 + 2?",
                        "respuestas": {"A": "twenty-two", "B": "3", "C": "4", "D": "5"}
                    }
                ]
            })
        );
    }

    #[test]
    fn test_out_of_range_ids_default_to_a_and_do_not_clobber() {
        let raw: Vec<RawQuestion> = serde_json::from_value(json!([{
            "pregunta": "Odd one",
            "respuestas": {"1": "one", "2": "two", "5": "five"},
            "correcta": 5
        }]))
        .unwrap();
        let draft = ExamDraft::from_raw("3", ExamMeta::default(), &raw).unwrap();
        let body = draft.to_final();

        assert_eq!(body.correct_answers[0].letter, Letter::A);
        assert_eq!(body.questions[0].answers.get(&Letter::A).unwrap(), "one");
        assert_eq!(body.questions[0].answers.len(), 2);
    }

    #[test]
    fn test_stored_shape_round_trips_edits() {
        let mut draft = sample_draft();
        draft.set_question_text(1, "Capital city of France?").unwrap();
        draft.mark_correct(2, 4).unwrap();

        let stored = serde_json::to_string(&draft.to_raw()).unwrap();
        let reloaded: Vec<RawQuestion> = serde_json::from_str(&stored).unwrap();
        let resumed = ExamDraft::from_raw("41", ExamMeta::default(), &reloaded).unwrap();
        assert_eq!(resumed, draft);
    }

    #[test]
    fn test_meta_defaults() {
        assert_eq!(ExamMeta::from_stored(None), ExamMeta::default());
        assert_eq!(ExamMeta::from_stored(Some("{not json")), ExamMeta::default());

        let meta = ExamMeta::from_stored(Some(r#"{"title": "Tema 3", "subject": ""}"#));
        assert_eq!(meta.title, "Tema 3");
        assert_eq!(meta.subject, DEFAULT_SUBJECT);
        assert_eq!(meta.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_created_exam_id_forms() {
        let numeric: CreatedExam = serde_json::from_value(json!({"id": 12, "preguntas": []})).unwrap();
        assert_eq!(numeric.exam_id().unwrap(), "12");
        let text: CreatedExam = serde_json::from_value(json!({"id": "ab-1"})).unwrap();
        assert_eq!(text.exam_id().unwrap(), "ab-1");
        let missing: CreatedExam = serde_json::from_value(json!({"id": null})).unwrap();
        assert!(missing.exam_id().is_err());
    }
}
