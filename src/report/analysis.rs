//! Analysis payload types and score synthesis.
//!
//! `synthesize` is the only data-dependent part of the report: it turns
//! questionnaire ratings into five category scores and their bar profiles.
//! Every narrative block comes from `content` as fixed template copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::questionnaire::QuestionnaireAnswers;
use crate::report::content;

/// Number of bars in a category profile.
pub const PROFILE_LEN: usize = 10;

/// Default identity shown when no questionnaire was filled in.
pub const DEFAULT_CHILD_NAME: &str = "Имя ребенка";
pub const DEFAULT_PARENT_NAME: &str = "Анонимно";

/// The five category totals derived from questionnaire answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    pub emotional_stability: u32,
    pub social_adaptation: u32,
    pub self_regulation: u32,
    pub communication: u32,
    pub self_esteem: u32,
}

impl Default for ScoreSet {
    /// Scores used when no answers are available.
    fn default() -> Self {
        Self {
            emotional_stability: 14,
            social_adaptation: 16,
            self_regulation: 12,
            communication: 18,
            self_esteem: 11,
        }
    }
}

/// Per-category fixed-length bar-fill representation of a `ScoreSet`.
///
/// Each entry is a 0/1 sequence of length [`PROFILE_LEN`] where the first
/// `min(score / 2, 10)` bars are filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualProfile {
    pub emotional_stability: Vec<u8>,
    pub social_adaptation: Vec<u8>,
    pub self_regulation: Vec<u8>,
    pub communication: Vec<u8>,
    pub self_esteem: Vec<u8>,
}

impl VisualProfile {
    /// Derive the profile from a score set.
    pub fn from_scores(scores: &ScoreSet) -> Self {
        Self {
            emotional_stability: profile_bars(scores.emotional_stability),
            social_adaptation: profile_bars(scores.social_adaptation),
            self_regulation: profile_bars(scores.self_regulation),
            communication: profile_bars(scores.communication),
            self_esteem: profile_bars(scores.self_esteem),
        }
    }
}

/// One bar sequence: filled count is monotonic in score and capped at 10.
pub fn profile_bars(score: u32) -> Vec<u8> {
    let filled = ((score / 2) as usize).min(PROFILE_LEN);
    (0..PROFILE_LEN).map(|i| u8::from(i < filled)).collect()
}

// ── Narrative blocks ────────────────────────────────────────────────

/// Short per-drawing interpretive summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefSummary {
    pub main_quality: String,
    pub tree_house_analysis: String,
    pub animal_analysis: String,
    pub self_portrait_analysis: String,
}

/// One observed element of the house-tree-person drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingElement {
    pub element: String,
    pub observation: String,
    pub psychological_meaning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseTreePerson {
    pub elements: Vec<DrawingElement>,
    pub general_conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalDrawing {
    pub animal_choice: String,
    pub details: String,
    pub pose: String,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfPortrait {
    pub figure_size: String,
    pub facial_expression: String,
    pub additional_details: String,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub house_tree_person: HouseTreePerson,
    pub animal_drawing: AnimalDrawing,
    pub self_portrait: SelfPortrait,
}

/// The full report payload shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub child_name: String,
    pub parent_name: String,
    pub age: u8,
    pub brief_summary: BriefSummary,
    pub detailed_analysis: DetailedAnalysis,
    pub scores: ScoreSet,
    pub visual_profile: VisualProfile,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

// ── Synthesis ───────────────────────────────────────────────────────

/// Build an `Analysis` from questionnaire answers, or from defaults when
/// none are available. Total: never fails, regardless of input.
pub fn synthesize(answers: Option<&QuestionnaireAnswers>) -> Analysis {
    let (child_name, parent_name, scores) = match answers {
        Some(a) => {
            let child_name = if a.child_name.is_empty() {
                DEFAULT_CHILD_NAME.to_string()
            } else {
                a.child_name.clone()
            };
            let parent_name = if a.parent_name.is_empty() {
                DEFAULT_PARENT_NAME.to_string()
            } else {
                a.parent_name.clone()
            };
            (child_name, parent_name, compute_scores(a))
        }
        None => (
            DEFAULT_CHILD_NAME.to_string(),
            DEFAULT_PARENT_NAME.to_string(),
            ScoreSet::default(),
        ),
    };

    let visual_profile = VisualProfile::from_scores(&scores);

    Analysis {
        child_name,
        parent_name,
        age: 8,
        brief_summary: content::brief_summary(),
        detailed_analysis: content::detailed_analysis(),
        scores,
        visual_profile,
        recommendations: content::recommendations(),
        generated_at: Utc::now(),
    }
}

/// Sum the designated rating fields per category.
///
/// Each rating parses as an integer; a missing or non-numeric answer counts
/// as 1. Self-esteem sums only the two general questions — a fixed rule of
/// the scoring model, not an oversight.
fn compute_scores(answers: &QuestionnaireAnswers) -> ScoreSet {
    ScoreSet {
        emotional_stability: sum_ratings(&[
            &answers.emotional1,
            &answers.emotional2,
            &answers.emotional3,
            &answers.emotional4,
        ]),
        social_adaptation: sum_ratings(&[
            &answers.social1,
            &answers.social2,
            &answers.social3,
            &answers.social4,
        ]),
        self_regulation: sum_ratings(&[
            &answers.behavior1,
            &answers.behavior2,
            &answers.behavior3,
            &answers.behavior4,
        ]),
        communication: sum_ratings(&[
            &answers.confidence1,
            &answers.confidence2,
            &answers.confidence3,
            &answers.confidence4,
        ]),
        self_esteem: sum_ratings(&[&answers.general1, &answers.general2]),
    }
}

fn sum_ratings(fields: &[&str]) -> u32 {
    fields
        .iter()
        .map(|f| f.trim().parse::<u32>().unwrap_or(1))
        .fold(0, u32::saturating_add)
}
