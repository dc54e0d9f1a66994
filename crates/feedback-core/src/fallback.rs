//! Default pattern sets
//!
//! Statically authored, non-personalized messages served whenever generation
//! fails. The table is a single exhaustive match on `(ScenarioKey, Language)`
//! so a missing cell is a compile error.

use feedback_scenario::{FeedbackPatternSet, Language, ScenarioKey, VARIANTS_PER_KEY};
use once_cell::sync::Lazy;

static DEFAULT_JA: Lazy<FeedbackPatternSet> = Lazy::new(|| build(Language::Ja));
static DEFAULT_EN: Lazy<FeedbackPatternSet> = Lazy::new(|| build(Language::En));

/// Complete default set for a language
#[must_use]
pub fn default_pattern_set(language: Language) -> FeedbackPatternSet {
    match language {
        Language::Ja => DEFAULT_JA.clone(),
        Language::En => DEFAULT_EN.clone(),
    }
}

/// Message shown when a pattern set lacks the needed scenario
#[must_use]
pub const fn neutral_message(language: Language) -> &'static str {
    match language {
        Language::Ja => "このブロックお疲れさまでした。自分のペースで次に進みましょう。",
        Language::En => "Thanks for completing this block. Continue at your own pace.",
    }
}

fn build(language: Language) -> FeedbackPatternSet {
    ScenarioKey::ALL
        .iter()
        .fold(FeedbackPatternSet::new(), |set, &key| {
            set.with(key, fallback_variants(key, language))
        })
}

/// Authored messages for one table cell
#[must_use]
pub const fn fallback_variants(
    key: ScenarioKey,
    language: Language,
) -> [&'static str; VARIANTS_PER_KEY] {
    use Language::{En, Ja};
    use ScenarioKey::*;

    match (key, language) {
        (RtShortAccUp, Ja) => [
            "反応が速くなり、正確さも上がりました。素晴らしい成長です！",
            "スピードと正確さの両方が向上しています。この調子で続けましょう。",
            "前のブロックより速く、より正確になりました。よくできています。",
        ],
        (RtShortAccUp, En) => [
            "You got faster and more accurate. Great progress!",
            "Both speed and accuracy improved. Keep it up.",
            "Quicker and more precise than the last block. Well done.",
        ],
        (RtShortAccDown, Ja) => [
            "反応が速くなりました。次は少しだけ正確さも意識してみましょう。",
            "スピードが上がっています。落ち着いて答えると正答率も戻りそうです。",
            "速さは伸びています。一つひとつ丁寧に確認してみましょう。",
        ],
        (RtShortAccDown, En) => [
            "You responded faster. Try to keep an eye on accuracy too.",
            "Your speed went up. A little more care could bring accuracy back.",
            "Nice pace. Take a moment to check each answer.",
        ],
        (RtShortAccSame, Ja) => [
            "正確さを保ったまま、反応が速くなりました。",
            "スピードが上がり、正答率も安定しています。",
            "安定した正確さで、より素早く答えられています。",
        ],
        (RtShortAccSame, En) => [
            "You got faster while keeping your accuracy steady.",
            "Speed went up and accuracy held. Nice work.",
            "Quicker responses with the same reliable accuracy.",
        ],
        (RtSlowAccUp, Ja) => [
            "じっくり取り組んだ分、正確さが上がりました。",
            "丁寧に答えたことで正答率が伸びています。",
            "慎重な取り組みが正確さにつながっています。",
        ],
        (RtSlowAccUp, En) => [
            "Taking a little more time paid off in accuracy.",
            "Careful responses raised your accuracy.",
            "A steadier pace led to more correct answers.",
        ],
        (RtSlowAccDown, Ja) => [
            "少しペースが落ちているようです。深呼吸してから次に進みましょう。",
            "集中が途切れやすい時間帯かもしれません。無理せず続けましょう。",
            "一度肩の力を抜いて、次のブロックに臨みましょう。",
        ],
        (RtSlowAccDown, En) => [
            "Your pace dipped a bit. Take a breath before the next block.",
            "Focus can fade at this point. Keep going without pushing too hard.",
            "Relax your shoulders and approach the next block fresh.",
        ],
        (RtSlowAccSame, Ja) => [
            "正確さは保てています。自分のペースで大丈夫です。",
            "反応は少しゆっくりですが、正答率は安定しています。",
            "落ち着いて取り組めています。この調子で続けましょう。",
        ],
        (RtSlowAccSame, En) => [
            "Your accuracy held steady. Your own pace is fine.",
            "Responses were a bit slower, but accuracy stayed stable.",
            "You are working calmly. Carry on like this.",
        ],
        (RtSameAccUp, Ja) => [
            "同じスピードで、より正確に答えられるようになりました。",
            "正答率が上がっています。よい集中ができています。",
            "ペースを保ちながら正確さが伸びました。",
        ],
        (RtSameAccUp, En) => [
            "Same speed, more correct answers. Nice focus.",
            "Your accuracy went up. Good concentration.",
            "You kept your pace and improved your accuracy.",
        ],
        (RtSameAccDown, Ja) => [
            "少し正答率が下がりました。次は一つずつ確認してみましょう。",
            "ペースは安定しています。正確さを少し意識してみましょう。",
            "落ち着いて取り組めば、正答率はすぐに戻ります。",
        ],
        (RtSameAccDown, En) => [
            "Accuracy slipped a little. Try checking each answer.",
            "Your pace is steady. Pay a bit more attention to accuracy.",
            "Stay calm and your accuracy will come right back.",
        ],
        (RtSameAccSame, Ja) => [
            "安定したパフォーマンスです。この調子で続けましょう。",
            "スピードも正確さも安定しています。",
            "いいリズムで取り組めています。",
        ],
        (RtSameAccSame, En) => [
            "Steady performance. Keep going like this.",
            "Both speed and accuracy are stable.",
            "You are in a good rhythm.",
        ],
        (RtShortAccUpSynergy, Ja) => [
            "速さも正確さも大きく向上しました。見事な成長です！",
            "スピードと正確さが同時に大きく伸びています。素晴らしい！",
            "これまでで一番の伸びです。この感覚を大切にしましょう。",
        ],
        (RtShortAccUpSynergy, En) => [
            "Big gains in both speed and accuracy. Outstanding!",
            "Speed and accuracy jumped together. Excellent work!",
            "Your best improvement yet. Hold on to this feeling.",
        ],
        (RtSlowAccDownFatigue, Ja) => [
            "疲れが出てきたかもしれません。少し休憩してから再開しましょう。",
            "ここまでよく頑張りました。目を休めてから次に進みましょう。",
            "無理は禁物です。ひと息ついてリフレッシュしましょう。",
        ],
        (RtSlowAccDownFatigue, En) => [
            "You might be getting tired. Take a short break before continuing.",
            "You have worked hard. Rest your eyes before the next block.",
            "No need to push. Take a breather and refresh.",
        ],
    }
}
