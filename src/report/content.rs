//! Static report copy.
//!
//! Narrative blocks and recommendations are fixed product content — the
//! report's only computed parts are the scores and their bar profiles.

use crate::report::analysis::{
    AnimalDrawing, BriefSummary, DetailedAnalysis, DrawingElement, HouseTreePerson, SelfPortrait,
};

pub fn brief_summary() -> BriefSummary {
    BriefSummary {
        main_quality: "Чувство защищенности и потребность в стабильности.".into(),
        tree_house_analysis:
            "Основные черты (рисунок 'Дом'): Воображение и наблюдательность.".into(),
        animal_analysis:
            "Самооценка (автопортрет): Склонность к самокритике, стремление к обособленно взрослым."
                .into(),
        self_portrait_analysis: String::new(),
    }
}

pub fn detailed_analysis() -> DetailedAnalysis {
    DetailedAnalysis {
        house_tree_person: HouseTreePerson {
            elements: vec![
                DrawingElement {
                    element: "Дом".into(),
                    observation: "Уютный, с окнами, дымком, забором".into(),
                    psychological_meaning: "Потребность в безопасности, семье важно".into(),
                },
                DrawingElement {
                    element: "Дерево".into(),
                    observation: "С корнями, пышная крона".into(),
                    psychological_meaning: "Устойчивость, рост, жизненная энергия".into(),
                },
                DrawingElement {
                    element: "Человек".into(),
                    observation: "Маленький, руки прижаты, без эмоций".into(),
                    psychological_meaning: "Скромность, неуверенность, сдержанность".into(),
                },
            ],
            general_conclusion: "Ребенок чувствует себя семья защищенно, но может быть сдержан \
                                 в выражении эмоций и чувствует неуверенность в социальной среде."
                .into(),
        },
        animal_drawing: AnimalDrawing {
            animal_choice:
                "Фантастическое или символическое существо (например, лис с крыльями)".into(),
            details: "Большие глаза, уши – важность наблюдения, остановка".into(),
            pose: "Мирное выражение, сидячая поза – доброжелательность".into(),
            conclusion: "У ребенка хорошо развито воображение, он склонен к рефлексии и \
                         наблюдательности. Может сдерживать активные эмоции, предпочитает анализ."
                .into(),
        },
        self_portrait: SelfPortrait {
            figure_size: "Маленький – возможно заниженная самооценка".into(),
            facial_expression: "Нейтральная или отсутствует – сдержанность".into(),
            additional_details: "Нет фона или вторичных образов – неуверенность в социуме".into(),
            conclusion: "Ребенок ориентирован на внешнюю оценку, нуждается в поддержке, \
                         особенно эмоциональной и словесной."
                .into(),
        },
    }
}

pub fn recommendations() -> Vec<String> {
    vec![
        "Чаще хвалите ребенка за конкретные достижения, а не только за результат".into(),
        "Помогайте развивать чувство: 'Ты расстроился, потому что...'".into(),
        "Поддерживайте инициативу, даже если ребенок ошибается".into(),
        "Создавайте спокойную и предсказуемую атмосферу дома".into(),
        "Поощряйте фантазию – сказки, рисунки, игры по ролям".into(),
    ]
}
