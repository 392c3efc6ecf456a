//! Text panels for the terminal surface.

use crate::form::{Field, PropertyForm, Section};
use crate::models::{ConfidenceTier, PredictionResult};
use crate::session::{RequestOutcome, Session};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

/// The form grouped by section, with inline errors and the submit state
pub fn render_form(form: &PropertyForm, loading: bool) -> String {
    let mut out = String::new();
    for section in Section::ALL {
        let _ = writeln!(out, "{}", section.title().bold());
        for field in section.fields() {
            let value = form.raw().display_value(field);
            let shown = if field.is_toggle() {
                toggle_mark(&value)
            } else {
                value
            };
            let _ = writeln!(out, "  {:<20} {:<18} [{}]", field.label(), shown, field.name());
            if let Some(message) = form.errors().get(field) {
                let _ = writeln!(out, "    {}", format!("{} {}", field.label(), message).red());
            }
        }
    }

    let submit = if loading {
        "⏳ Calculating...".dimmed()
    } else {
        "Calculate price  (submit)".normal()
    };
    let _ = writeln!(out, "\n  {}", submit);
    out
}

fn toggle_mark(value: &str) -> String {
    if value == "1" {
        "[x] yes".to_string()
    } else {
        "[ ] no".to_string()
    }
}

/// Whatever the result area shows for the current outcome
pub fn render_outcome(session: &Session) -> String {
    match session.outcome() {
        RequestOutcome::Idle => String::new(),
        RequestOutcome::Loading => format!("{}\n", "⏳ Calculating estimate...".dimmed()),
        RequestOutcome::Success(result) => render_result(result),
        RequestOutcome::Failure(message) => render_error(message, session.can_retry()),
    }
}

pub fn render_result(result: &PredictionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "📈 Valuation result".bold());
    let _ = writeln!(out, "  Estimated price:  {}", result.formatted_price.yellow().bold());
    let _ = writeln!(
        out,
        "  Confidence:       {}",
        confidence_badge(&result.confidence, result.confidence_tier())
    );

    if let Some(features) = result.features.as_ref().filter(|f| !f.is_empty()) {
        let _ = writeln!(out, "\n  {}", "Features used in the estimate".bold());
        for (name, value) in features {
            let _ = writeln!(out, "    {:<32} {}", name.replace('_', " "), value);
        }
    }
    let _ = writeln!(
        out,
        "\n  {}",
        format!("Estimated at {}", result.received_at.format("%Y-%m-%d %H:%M:%S UTC")).dimmed()
    );
    let _ = writeln!(out, "  {}", "(dismiss to close)".dimmed());
    out
}

pub fn render_error(message: &str, can_retry: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "⚠ Could not calculate the price".red().bold());
    let _ = writeln!(out, "  {}", message);
    if can_retry {
        let _ = writeln!(out, "  {}", "↻ retry to send the same data again".cyan());
    }
    let _ = writeln!(out, "  {}", "(dismiss to close)".dimmed());
    out
}

pub fn confidence_badge(label: &str, tier: ConfidenceTier) -> ColoredString {
    let padded = format!(" {} ", label);
    match tier {
        ConfidenceTier::High => padded.black().on_green(),
        ConfidenceTier::Medium => padded.black().on_yellow(),
        ConfidenceTier::Unknown => padded.white().on_bright_black(),
    }
}

/// Field errors one per line, for the one-shot mode
pub fn render_field_errors<'a>(errors: impl Iterator<Item = (Field, &'a str)>) -> String {
    let mut out = String::new();
    for (field, message) in errors {
        let _ = writeln!(out, "  {} {}", field.label(), message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PredictError;
    use crate::models::FeatureValue;
    use crate::testing::attributes;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn form_shows_sections_and_inline_errors() {
        plain();
        let mut form = PropertyForm::new();
        form.set(Field::Bedrooms, "12").unwrap();
        form.toggle(Field::Basement);
        let _ = form.submit(false);

        let text = render_form(&form, false);
        assert!(text.contains("Core attributes"));
        assert!(text.contains("Parking and location"));
        assert!(text.contains("Additional features"));
        assert!(text.contains("Bedrooms must be between 1 and 6"));
        assert!(text.contains("[x] yes"));
        assert!(text.contains("Calculate price"));

        assert!(render_form(&form, true).contains("Calculating"));
    }

    #[test]
    fn result_panel_lists_features_with_spaces() {
        plain();
        let mut features = BTreeMap::new();
        features.insert("furnishingstatus_semi-mobiliado".to_string(), FeatureValue::Number(1.0));
        features.insert("area".to_string(), FeatureValue::Number(3000.0));
        let result = PredictionResult {
            formatted_price: "R$ 450.000,00".into(),
            confidence: "Alta confiança".into(),
            price: Some(450_000.0),
            features: Some(features),
            received_at: Utc::now(),
        };

        let text = render_result(&result);
        assert!(text.contains("R$ 450.000,00"));
        assert!(text.contains("Alta confiança"));
        assert!(text.contains("furnishingstatus semi-mobiliado"));
        assert!(text.contains("3000"));
    }

    #[test]
    fn empty_feature_map_is_not_listed() {
        plain();
        let result = PredictionResult {
            formatted_price: "R$ 1,00".into(),
            confidence: "Baixa".into(),
            price: None,
            features: Some(BTreeMap::new()),
            received_at: Utc::now(),
        };
        assert!(!render_result(&result).contains("Features used"));
    }

    #[test]
    fn outcome_panels_follow_the_session() {
        plain();
        let mut session = Session::new();
        assert_eq!(render_outcome(&session), "");

        let d = session.begin(attributes(3)).unwrap();
        assert!(render_outcome(&session).contains("Calculating"));

        session.complete(d.id, Err(PredictError::Status { status: 503, detail: None }));
        let text = render_outcome(&session);
        assert!(text.contains("status 503"));
        assert!(text.contains("retry"));
    }

    #[test]
    fn error_panel_hides_retry_without_cached_input() {
        plain();
        let text = render_error("boom", false);
        assert!(text.contains("boom"));
        assert!(!text.contains("retry"));
    }
}
