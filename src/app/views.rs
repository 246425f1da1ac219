//! Plain-text views. Every function here is a pure function of the flow
//! snapshot; none of them mutate state.

use crate::core::flow::{Browsing, Card, FlowState, SessionFlow};
use crate::domain::model::{ProfileDraft, ProfileField, Recommendation};
use std::fmt::Write;

const RULE: &str = "────────────────────────────────────────";

pub fn render(flow: &SessionFlow) -> String {
    match flow.state() {
        FlowState::Capturing { draft } => render_form(draft, flow.is_busy()),
        FlowState::Browsing(browsing) => render_browsing(browsing),
    }
}

pub fn render_form(draft: &ProfileDraft, busy: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Discover Your Next Adventure");
    let _ = writeln!(
        out,
        "Tell us about yourself and we'll suggest amazing experiences you never knew you'd love!"
    );
    let _ = writeln!(out, "{}", RULE);
    for field in ProfileField::ALL {
        let _ = writeln!(out, "{}", field_line(draft, field));
    }
    let _ = writeln!(out, "{}", RULE);
    let action = if busy {
        "Creating Profile..."
    } else {
        "Discover Experiences"
    };
    let _ = writeln!(out, "[ {} ]", action);
    out
}

/// Prompt text for a single field, showing its value or the placeholder.
pub fn field_line(draft: &ProfileDraft, field: ProfileField) -> String {
    let value = draft.get(field);
    if value.is_empty() {
        format!("{}: ({})", field.label(), field.placeholder())
    } else {
        format!("{}: {}", field.label(), value)
    }
}

pub fn render_browsing(browsing: &Browsing) -> String {
    let mut out = render_header(browsing);
    match browsing.card() {
        Card::Loading => {
            let _ = writeln!(out, "⏳ Finding your next adventure...");
        }
        Card::Showing(recommendation) => out.push_str(&render_card(recommendation)),
        Card::Exhausted { .. } => out.push_str(&render_summary(browsing)),
        Card::Unavailable => {
            let _ = writeln!(out, "⚠️ The next recommendation could not be loaded.");
            let _ = writeln!(out, "[r] Try again   [s] Start New Session   [q] Quit");
        }
    }

    if !browsing.is_exhausted() && !browsing.liked().is_empty() {
        out.push_str(&render_liked_list(browsing.liked()));
    }
    out
}

pub fn render_header(browsing: &Browsing) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Your Experience Recommendations");
    if browsing.shown() > 0 {
        let _ = writeln!(out, "Card #{}", browsing.shown());
    }
    let liked = browsing.liked().len();
    if liked > 0 {
        let _ = writeln!(out, "💖 {} experiences you're interested in", liked);
    }
    let _ = writeln!(out, "{}", RULE);
    out
}

pub fn render_card(recommendation: &Recommendation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  [{}]",
        recommendation.title, recommendation.category
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", recommendation.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Why This Experience?");
    let _ = writeln!(out, "{}", recommendation.reasoning);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "[n] ❌ Not for me   [y] ✅ I'm interested!   [q] Quit");
    out
}

pub fn render_summary(browsing: &Browsing) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🎉 You've explored all recommendations!");
    let _ = writeln!(
        out,
        "Great job! You've discovered {} new experiences to try.",
        browsing.liked().len()
    );
    out.push_str(&render_liked_list(browsing.liked()));
    let _ = writeln!(out, "[s] Start New Session   [q] Quit");
    out
}

pub fn render_liked_list(liked: &[Recommendation]) -> String {
    if liked.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    let _ = writeln!(out, "Your Interested Experiences");
    for recommendation in liked {
        let _ = writeln!(
            out,
            "  • {} ({})",
            recommendation.title, recommendation.category
        );
    }
    out
}
