//! Plain-text rendering of workflow events.

use client_core::{ClientEvent, Notice, SearchResults, Severity};
use shared::domain::{SearchResultItem, SelectedTerm};

const NO_RESULTS: &str = "No results found.";

pub fn render_event(event: &ClientEvent) -> Option<String> {
    match event {
        ClientEvent::Loading(true) => Some("Searching...".to_string()),
        ClientEvent::ResultsUpdated(results) => Some(render_results(results)),
        ClientEvent::TermSelected(term) => Some(render_selection(term)),
        ClientEvent::BundleGenerated(bundle) => Some(
            serde_json::to_string_pretty(bundle)
                .unwrap_or_else(|err| format!("<bundle could not be rendered: {err}>")),
        ),
        ClientEvent::Notice(notice) => Some(render_notice(notice)),
        ClientEvent::Loading(false)
        | ClientEvent::ResultsCleared
        | ClientEvent::StateChanged { .. }
        | ClientEvent::Submitted(_)
        | ClientEvent::NoticeDismissed(_) => None,
    }
}

pub fn render_results(results: &SearchResults) -> String {
    let mut out = String::from("NAMASTE (AYUSH) results:\n");
    push_list(&mut out, &results.source, true);
    out.push_str("ICD-11 biomedical results:\n");
    push_list(&mut out, &results.target, false);
    out.trim_end().to_string()
}

fn push_list(out: &mut String, items: &[SearchResultItem], numbered: bool) {
    if items.is_empty() {
        out.push_str(&format!("  {NO_RESULTS}\n"));
        return;
    }
    for (i, item) in items.iter().enumerate() {
        if numbered {
            out.push_str(&format!("  [{}] {}  {}\n", i + 1, item.code, item.display));
        } else {
            out.push_str(&format!("   -  {}  {}\n", item.code, item.display));
        }
    }
}

pub fn render_selection(term: &SelectedTerm) -> String {
    let mut out = format!(
        "Selected: {}\n  NAMASTE Code: {}",
        term.display(),
        term.code()
    );
    if let Some(translation) = &term.translation {
        out.push_str(&format!(
            "\n  ICD-11 TM2 Code: {} ({})",
            translation.target_code, translation.target_display
        ));
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let label = match notice.severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Error => "error",
    };
    format!("[{label}] {}", notice.message)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
