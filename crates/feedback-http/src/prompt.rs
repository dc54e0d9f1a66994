//! Prompt rendering for the chat-completion generator
//!
//! The prompt is written in the participant's language and asks for one
//! JSON object keyed by scenario, each value an array of messages.

use feedback_core::GenerationRequest;
use feedback_scenario::{EvaluationFocus, Language, MotivationStyle, TonePreference};
use std::fmt::Write;

/// System message for a language
#[must_use]
pub const fn system_prompt(language: Language) -> &'static str {
    match language {
        Language::Ja => {
            "あなたは認知課題の参加者に短いフィードバックを書くアシスタントです。\
             参加者を励まし、責めない表現を使ってください。出力は JSON オブジェクトのみとします。"
        }
        Language::En => {
            "You write short feedback messages for participants in a cognitive task. \
             Be encouraging and never blame the participant. Reply with a JSON object only."
        }
    }
}

const fn tone_hint(tone: TonePreference, language: Language) -> &'static str {
    match (tone, language) {
        (TonePreference::Casual, Language::Ja) => "友達のように気軽な口調",
        (TonePreference::Gentle, Language::Ja) => "やさしく穏やかな口調",
        (TonePreference::Formal, Language::Ja) => "丁寧でフォーマルな口調",
        (TonePreference::Casual, Language::En) => "a casual, friendly voice",
        (TonePreference::Gentle, Language::En) => "a gentle, warm voice",
        (TonePreference::Formal, Language::En) => "a polite, formal voice",
    }
}

const fn motivation_hint(style: MotivationStyle, language: Language) -> &'static str {
    match (style, language) {
        (MotivationStyle::Empathetic, Language::Ja) => "気持ちに寄り添う",
        (MotivationStyle::Cheerleader, Language::Ja) => "元気よく応援する",
        (MotivationStyle::Advisor, Language::Ja) => "具体的な助言をする",
        (MotivationStyle::Empathetic, Language::En) => "empathize with how they feel",
        (MotivationStyle::Cheerleader, Language::En) => "cheer them on energetically",
        (MotivationStyle::Advisor, Language::En) => "give concrete advice",
    }
}

const fn evaluation_hint(focus: EvaluationFocus, language: Language) -> &'static str {
    match (focus, language) {
        (EvaluationFocus::SelfProgress, Language::Ja) => "過去の自分との比較",
        (EvaluationFocus::SocialComparison, Language::Ja) => "他の参加者との比較",
        (EvaluationFocus::PositiveFocus, Language::Ja) => "良かった点のみ",
        (EvaluationFocus::SelfProgress, Language::En) => "comparison with their own earlier blocks",
        (EvaluationFocus::SocialComparison, Language::En) => "comparison with other participants",
        (EvaluationFocus::PositiveFocus, Language::En) => "only what went well",
    }
}

/// User message describing the participant and the scenario catalog
#[must_use]
pub fn render_prompt(request: &GenerationRequest) -> String {
    let profile = &request.profile;
    let language = profile.language;
    let praise = profile
        .preferred_praise
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    match language {
        Language::Ja => {
            let _ = writeln!(out, "参加者: {}", profile.nickname);
            let _ = writeln!(out, "口調: {}", tone_hint(profile.tone_preference, language));
            let _ = writeln!(out, "励まし方: {}", motivation_hint(profile.motivation_style, language));
            let _ = writeln!(out, "評価の観点: {}", evaluation_hint(profile.evaluation_focus, language));
            if !praise.is_empty() {
                let _ = writeln!(out, "好きなほめ言葉: {praise}");
            }
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "次の各シナリオについて、表現の異なるメッセージをちょうど {} 個ずつ書いてください。",
                request.variants_per_key
            );
        }
        Language::En => {
            let _ = writeln!(out, "Participant: {}", profile.nickname);
            let _ = writeln!(out, "Tone: {}", tone_hint(profile.tone_preference, language));
            let _ = writeln!(out, "Motivation: {}", motivation_hint(profile.motivation_style, language));
            let _ = writeln!(out, "Evaluate by: {}", evaluation_hint(profile.evaluation_focus, language));
            if !praise.is_empty() {
                let _ = writeln!(out, "Preferred praise: {praise}");
            }
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "For each scenario below write exactly {} differently worded messages.",
                request.variants_per_key
            );
        }
    }

    for descriptor in &request.scenario_catalog {
        let _ = writeln!(out, "- {}: {}", descriptor.key, descriptor.description);
    }

    let _ = writeln!(out);
    let _ = match language {
        Language::Ja => writeln!(
            out,
            "出力形式: {{\"<シナリオキー>\": [\"メッセージ\", ...], ...}} すべてのキーを含めてください。"
        ),
        Language::En => writeln!(
            out,
            "Output format: {{\"<scenario key>\": [\"message\", ...], ...}} including every key."
        ),
    };
    out
}
