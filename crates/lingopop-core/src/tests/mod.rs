mod notebook_tests;

use lingopop_config::ui::UiConfig;
use lingopop_types::{DictionaryEntry, Example, Intent, LookupData, View};

use crate::language::find_language;
use crate::notebook::Notebook;
use crate::session::Session;
use crate::types::{Effect, Outcome};

pub(crate) fn entry(term: &str, id: u64) -> DictionaryEntry {
    DictionaryEntry::from_lookup(
        term,
        LookupData {
            definition: Some(format!("meaning of {term}")),
            examples: vec![Example {
                original: format!("{term}!"),
                translation: format!("{term}!"),
            }],
            explanation: Some("fun".into()),
        },
        None,
        find_language("en").unwrap(),
        find_language("es").unwrap(),
        id,
    )
}

/// Notebook holding `terms`, first term most recent
pub(crate) fn notebook_of(terms: &[&str]) -> Notebook {
    Notebook::from_entries(
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| entry(t, 1_000 + i as u64))
            .collect(),
    )
}

/// Session already past the setup screen
pub(crate) fn home_session(notebook: Notebook) -> Session {
    let mut session = Session::new(&UiConfig::default(), notebook);
    session.apply(Intent::SelectSource("en".into()));
    session.apply(Intent::SelectTarget("es".into()));
    session.apply(Intent::ConfirmSetup);
    assert_eq!(session.view, View::Home);
    session
}

/// Run a search and answer it with `data`
pub(crate) fn search_and_answer(session: &mut Session, term: &str, data: LookupData) {
    let effects = session.apply(Intent::Search(term.into()));
    let Some(Effect::Lookup(request)) = effects.into_iter().find(|e| matches!(e, Effect::Lookup(_)))
    else {
        panic!("search did not issue a lookup");
    };
    session.resolve(Outcome::Lookup {
        epoch: request.epoch,
        term: request.term,
        result: Ok((data, None)),
        completed_at_ms: 1_700_000_000_000,
    });
}
