use super::*;
use shared::domain::Translation;

#[test]
fn empty_lists_render_placeholder() {
    let rendered = render_results(&SearchResults::default());
    assert_eq!(
        rendered,
        "NAMASTE (AYUSH) results:\n  No results found.\nICD-11 biomedical results:\n  No results found."
    );
}

#[test]
fn only_source_results_are_numbered() {
    let rendered = render_results(&SearchResults {
        source: vec![SearchResultItem::new("NAM001", "Jwara")],
        target: vec![SearchResultItem::new("MG30", "Fever, unspecified")],
    });
    assert!(rendered.contains("[1] NAM001  Jwara"));
    assert!(rendered.contains("-  MG30  Fever, unspecified"));
    assert!(!rendered.contains("[1] MG30"));
}

#[test]
fn selection_panel_shows_both_codes() {
    let term = SelectedTerm::new(SearchResultItem::new("NAM001", "Jwara")).with_translation(
        Translation {
            source_code: None,
            target_code: "MG30".into(),
            target_display: "Fever, unspecified".into(),
            target_system: "http://id.who.int/icd11/tm2".into(),
        },
    );
    assert_eq!(
        render_selection(&term),
        "Selected: Jwara\n  NAMASTE Code: NAM001\n  ICD-11 TM2 Code: MG30 (Fever, unspecified)"
    );
}

#[test]
fn notices_carry_severity_label() {
    assert_eq!(
        render_notice(&Notice::error("Authorization failed. Check token.")),
        "[error] Authorization failed. Check token."
    );
    assert_eq!(
        render_event(&ClientEvent::Notice(Notice::success("FHIR record generated."))),
        Some("[ok] FHIR record generated.".to_string())
    );
    assert_eq!(render_event(&ClientEvent::ResultsCleared), None);
}
