//! Questionnaire answers and their mapping into the backend survey payload.
//!
//! The form collects four rating sections (four questions each) plus two
//! general questions. The backend expects a flat `q1_1`..`q4_10` numbering
//! with every unused slot filled — the mapping here reproduces that shape.

use serde::{Deserialize, Serialize};

/// Raw questionnaire answers, as entered in the form.
///
/// Ratings are kept as strings ("1".."5"); open-text fields are free form.
/// Empty strings mean the question was skipped — score synthesis treats
/// anything non-numeric as 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionnaireAnswers {
    // Identity
    pub child_name: String,
    pub birth_date: String,
    pub gender: String,
    pub parent_name: String,

    // Section 1: emotional sphere
    pub emotional1: String,
    pub emotional2: String,
    pub emotional3: String,
    pub emotional4: String,

    // Section 2: social adaptation
    pub social1: String,
    pub social2: String,
    pub social3: String,
    pub social4: String,

    // Section 3: self-regulation and behavior
    pub behavior1: String,
    pub behavior2: String,
    pub behavior3: String,
    pub behavior4: String,

    // Section 4: relationships and self-confidence
    pub confidence1: String,
    pub confidence2: String,
    pub confidence3: String,
    pub confidence4: String,

    // Section 5: general assessment
    pub general1: String,
    pub general2: String,
}

impl QuestionnaireAnswers {
    /// Build the `submit-survey` request body for a job.
    ///
    /// The backend requires forty numbered answers; slots the form does not
    /// cover are padded with `"1"`, and `emotionalState` falls back to `"3"`.
    pub fn to_survey_payload(&self, job_id: &str) -> serde_json::Value {
        let emotional_state = if self.general1.is_empty() {
            "3"
        } else {
            self.general1.as_str()
        };

        let mut survey = serde_json::Map::new();
        survey.insert("childName".into(), self.child_name.as_str().into());
        survey.insert("childDOB".into(), self.birth_date.as_str().into());
        survey.insert("childGender".into(), self.gender.as_str().into());
        survey.insert("parentName".into(), self.parent_name.as_str().into());

        // The form's 18 answers fill q1_1..q1_10 and q2_1..q2_8 in order.
        let answered: [&str; 18] = [
            &self.emotional1,
            &self.emotional2,
            &self.emotional3,
            &self.emotional4,
            &self.social1,
            &self.social2,
            &self.social3,
            &self.social4,
            &self.behavior1,
            &self.behavior2,
            &self.behavior3,
            &self.behavior4,
            &self.confidence1,
            &self.confidence2,
            &self.confidence3,
            &self.confidence4,
            &self.general1,
            &self.general2,
        ];
        for (i, value) in answered.into_iter().enumerate() {
            let (section, slot) = (1 + i / 10, 1 + i % 10);
            survey.insert(format!("q{section}_{slot}"), value.into());
        }
        for section in 2..=4 {
            for slot in 1..=10 {
                survey
                    .entry(format!("q{section}_{slot}"))
                    .or_insert_with(|| "1".into());
            }
        }

        survey.insert("emotionalState".into(), emotional_state.into());

        serde_json::json!({
            "task_id": job_id,
            "survey": survey,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QuestionnaireAnswers {
        QuestionnaireAnswers {
            child_name: "Маша".into(),
            birth_date: "2017-03-14".into(),
            gender: "female".into(),
            parent_name: "Анна".into(),
            emotional1: "5".into(),
            emotional2: "4".into(),
            emotional3: "2".into(),
            emotional4: "3".into(),
            social1: "4".into(),
            social2: "4".into(),
            social3: "3".into(),
            social4: "5".into(),
            behavior1: "2".into(),
            behavior2: "3".into(),
            behavior3: "4".into(),
            behavior4: "3".into(),
            confidence1: "5".into(),
            confidence2: "5".into(),
            confidence3: "4".into(),
            confidence4: "4".into(),
            general1: "4".into(),
            general2: "нет".into(),
        }
    }

    #[test]
    fn payload_carries_task_id_and_identity() {
        let payload = sample().to_survey_payload("abc123");
        assert_eq!(payload["task_id"], "abc123");
        assert_eq!(payload["survey"]["childName"], "Маша");
        assert_eq!(payload["survey"]["childDOB"], "2017-03-14");
        assert_eq!(payload["survey"]["parentName"], "Анна");
    }

    #[test]
    fn payload_numbering_spans_sections() {
        let payload = sample().to_survey_payload("t");
        let survey = &payload["survey"];
        // Section boundaries: q1 covers emotional + social + first two
        // behavior questions, q2 continues from behavior3.
        assert_eq!(survey["q1_1"], "5");
        assert_eq!(survey["q1_5"], "4");
        assert_eq!(survey["q1_9"], "2");
        assert_eq!(survey["q2_1"], "4");
        assert_eq!(survey["q2_7"], "4");
        assert_eq!(survey["q2_8"], "нет");
    }

    #[test]
    fn payload_pads_unused_slots() {
        let payload = sample().to_survey_payload("t");
        let survey = &payload["survey"];
        assert_eq!(survey["q2_9"], "1");
        for n in 1..=10 {
            assert_eq!(survey[format!("q3_{n}")], "1");
            assert_eq!(survey[format!("q4_{n}")], "1");
        }
    }

    #[test]
    fn payload_carries_exactly_forty_numbered_slots() {
        let payload = sample().to_survey_payload("t");
        let survey = payload["survey"].as_object().unwrap();
        for section in 1..=4 {
            for slot in 1..=10 {
                let key = format!("q{section}_{slot}");
                assert!(survey[&key].is_string(), "missing {key}");
            }
        }
        // 40 answers + 4 identity fields + emotionalState.
        assert_eq!(survey.len(), 45);
    }

    #[test]
    fn emotional_state_defaults_when_general_skipped() {
        let mut answers = sample();
        answers.general1 = String::new();
        let payload = answers.to_survey_payload("t");
        assert_eq!(payload["survey"]["emotionalState"], "3");

        let payload = sample().to_survey_payload("t");
        assert_eq!(payload["survey"]["emotionalState"], "4");
    }

    #[test]
    fn answers_deserialize_with_missing_fields() {
        let answers: QuestionnaireAnswers =
            serde_json::from_str(r#"{"child_name": "Ваня", "emotional1": "5"}"#).unwrap();
        assert_eq!(answers.child_name, "Ваня");
        assert_eq!(answers.emotional1, "5");
        assert_eq!(answers.social1, "");
    }
}
