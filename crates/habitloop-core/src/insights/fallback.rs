//! Canned content shown whenever generation fails.

use super::prompt::Tone;
use super::Insight;

pub fn fallback_insights() -> Vec<Insight> {
    vec![
        Insight {
            title: "Consistency beats intensity".into(),
            description: "Small daily wins compound. Focus on not breaking the chain.".into(),
            icon: "🔗".into(),
        },
        Insight {
            title: "Stack your habits".into(),
            description: "Attach a new habit to something you already do every day.".into(),
            icon: "🧱".into(),
        },
        Insight {
            title: "Plan for slip-ups".into(),
            description: "Missing once is an accident. Missing twice starts a new pattern.".into(),
            icon: "🛟".into(),
        },
    ]
}

pub fn fallback_verdict(tone: Tone) -> &'static str {
    match tone {
        Tone::Praise => "You're showing up for yourself, and that's what builds a streak. Keep going!",
        Tone::Roast => "Your habits called. They said they miss you and would like to be more than a to-do list.",
    }
}
