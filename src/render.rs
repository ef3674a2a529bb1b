//! Plain-text rendering of the report state.
//!
//! The display boundary: one exhaustive match over `ReportState`, so a
//! payload can never be shown while the status still says processing.

use crate::report::analysis::{Analysis, ScoreSet, VisualProfile};
use crate::report::state::ReportState;

/// Render the current report state for the terminal.
pub fn render(state: &ReportState) -> String {
    match state {
        ReportState::Processing { attempts } => {
            format!("Отчёт готовится, пожалуйста подождите… (проверка {attempts})")
        }
        ReportState::Error { message } => {
            format!("Ошибка при получении отчёта: {message}\nПовторите попытку.")
        }
        ReportState::Ready { analysis, pdf_url } => render_analysis(analysis, pdf_url.as_deref()),
    }
}

fn render_analysis(analysis: &Analysis, pdf_url: Option<&str>) -> String {
    let mut out = String::new();

    out.push_str("ПСИХОЛОГИЧЕСКИЙ ОТЧЁТ\n");
    out.push_str("=====================\n\n");
    out.push_str(&format!(
        "Ребёнок: {} ({} лет)\nРодитель: {}\n\n",
        analysis.child_name, analysis.age, analysis.parent_name
    ));

    out.push_str("Краткое резюме\n--------------\n");
    out.push_str(&format!("{}\n", analysis.brief_summary.main_quality));
    out.push_str(&format!("{}\n", analysis.brief_summary.tree_house_analysis));
    out.push_str(&format!("{}\n\n", analysis.brief_summary.animal_analysis));

    out.push_str("Результаты опросника\n--------------------\n");
    render_scores(&mut out, &analysis.scores, &analysis.visual_profile);
    out.push('\n');

    let htp = &analysis.detailed_analysis.house_tree_person;
    out.push_str("Рисунок «Дом, дерево, человек»\n");
    for element in &htp.elements {
        out.push_str(&format!(
            "  {}: {} — {}\n",
            element.element, element.observation, element.psychological_meaning
        ));
    }
    out.push_str(&format!("  Вывод: {}\n\n", htp.general_conclusion));

    let animal = &analysis.detailed_analysis.animal_drawing;
    out.push_str("Несуществующее животное\n");
    out.push_str(&format!("  Выбор: {}\n", animal.animal_choice));
    out.push_str(&format!("  Детали: {}\n", animal.details));
    out.push_str(&format!("  Поза: {}\n", animal.pose));
    out.push_str(&format!("  Вывод: {}\n\n", animal.conclusion));

    let portrait = &analysis.detailed_analysis.self_portrait;
    out.push_str("Автопортрет\n");
    out.push_str(&format!("  Размер фигуры: {}\n", portrait.figure_size));
    out.push_str(&format!("  Выражение лица: {}\n", portrait.facial_expression));
    out.push_str(&format!("  Детали: {}\n", portrait.additional_details));
    out.push_str(&format!("  Вывод: {}\n\n", portrait.conclusion));

    out.push_str("Рекомендации\n------------\n");
    for recommendation in &analysis.recommendations {
        out.push_str(&format!("  • {recommendation}\n"));
    }

    if let Some(url) = pdf_url {
        out.push_str(&format!("\nPDF: {url}\n"));
    }

    out
}

fn render_scores(out: &mut String, scores: &ScoreSet, profile: &VisualProfile) {
    let rows: [(&str, u32, &[u8]); 5] = [
        (
            "Эмоциональная стабильность",
            scores.emotional_stability,
            &profile.emotional_stability,
        ),
        (
            "Социальная адаптация",
            scores.social_adaptation,
            &profile.social_adaptation,
        ),
        ("Саморегуляция", scores.self_regulation, &profile.self_regulation),
        ("Коммуникативность", scores.communication, &profile.communication),
        ("Самооценка", scores.self_esteem, &profile.self_esteem),
    ];

    for (name, score, bars) in rows {
        let bar: String = bars
            .iter()
            .map(|&b| if b == 1 { '█' } else { '░' })
            .collect();
        out.push_str(&format!("  {name:<28} {score:>2}  {bar}\n"));
    }
}
