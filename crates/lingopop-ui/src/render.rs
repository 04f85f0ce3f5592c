use std::fmt::Write;

use lingopop_core::language;
use lingopop_core::session::{STORY_FAILED, Session};
use lingopop_types::{AlertKind, Delivery, DictionaryEntry, MediaRef, Role, View};

const RULE: &str = "────────────────────────────────────────";

/// Full screen for the session's current view
pub fn render(session: &Session) -> String {
    let mut out = String::new();

    if let Some(alert) = &session.alert {
        let tag = match alert.kind {
            AlertKind::Configuration => "⚙",
            AlertKind::RequestFailed => "✖",
            AlertKind::Validation => "!",
        };
        let _ = writeln!(out, "[{tag}] {}", alert.message);
    }

    if session.view.has_search_bar() {
        let _ = writeln!(
            out,
            "🔎 Type in {}... (plain text searches{})",
            session.target_lang.name,
            if session.view == View::Result {
                ", /s <term> here"
            } else {
                ""
            }
        );
    }
    let _ = writeln!(out, "{RULE}");

    let body = match session.view {
        View::Setup => render_setup(session),
        View::Home => render_home(session),
        View::Result => render_result(session),
        View::Notebook => render_notebook(session),
        View::Flashcards => render_flashcard(session),
        View::Story => render_story(session),
    };
    out.push_str(&body);

    if session.view.has_bottom_nav() {
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "/home  ·  /notebook  ·  /setup  ·  /help");
    }

    out
}

pub fn render_setup(session: &Session) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LingoPop");
    let _ = writeln!(out, "Your engaging AI language buddy.\n");
    let _ = writeln!(out, "I speak (mother tongue): {}", session.source_lang.label());
    let _ = writeln!(out, "I want to learn:         {}\n", session.target_lang.label());

    for lang in language::languages() {
        let _ = writeln!(out, "  {:<3} {}", lang.code, lang.label());
    }
    let _ = writeln!(out, "\n/source <code>  ·  /target <code>  ·  /go  Let's Go!");
    out
}

pub fn render_home(session: &Session) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "What do you want to learn today?");
    let _ = writeln!(
        out,
        "Look up any word or phrase in {} and I'll explain it in {}.",
        session.target_lang.name, session.source_lang.name
    );
    out
}

pub fn render_result(session: &Session) -> String {
    let mut out = String::new();

    if session.is_searching {
        let _ = writeln!(out, "Looking up \"{}\"...", session.search_term);
        return out;
    }
    let Some(entry) = &session.current_entry else {
        return out;
    };

    let _ = writeln!(out, "{}", describe_image(entry));
    let saved = if session.is_current_saved() {
        "📕 saved"
    } else {
        "📖 /save"
    };
    let _ = writeln!(out, "{}   {}   🔊 /say", entry.term, saved);
    let _ = writeln!(out, "{}\n", entry.definition);

    let _ = writeln!(out, "✨ The Vibe");
    let _ = writeln!(out, "{}\n", entry.explanation);

    if !entry.examples.is_empty() {
        let _ = writeln!(out, "Examples");
        for (i, ex) in entry.examples.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}   🔊 /say {}", i + 1, ex.original, i + 1);
            if !ex.translation.is_empty() {
                let _ = writeln!(out, "     {}", ex.translation);
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "💬 Ask about \"{}\"...", entry.term);
    for msg in &session.chat {
        match msg.role {
            Role::User => {
                let status = match msg.delivery {
                    Delivery::Pending => " …",
                    Delivery::Unanswered => " (no reply)",
                    Delivery::Answered => "",
                };
                let _ = writeln!(out, "  you: {}{}", msg.text, status);
            }
            Role::Model => {
                let _ = writeln!(out, "  pop: {}", msg.text);
            }
        }
    }
    if session.is_chatting() {
        let _ = writeln!(out, "  pop is typing...");
    }

    out
}

pub fn render_notebook(session: &Session) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "My Notebook ({} words)", session.notebook.len());
    let _ = writeln!(out, "⚡ /cards Flashcards  ·  📚 /story AI Story\n");

    if session.notebook.is_empty() {
        let _ = writeln!(out, "Your notebook is empty.");
        let _ = writeln!(out, "Go search for some cool words!");
        return out;
    }

    for (i, entry) in session.notebook.entries().iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {} — {}",
            i + 1,
            entry.term,
            first_line(&entry.definition)
        );
    }
    let _ = writeln!(out, "\n/open <n> to revisit a word");
    out
}

pub fn render_flashcard(session: &Session) -> String {
    let mut out = String::new();
    let Some(card) = session.current_card() else {
        return out;
    };

    let _ = writeln!(
        out,
        "Card {} / {}\n",
        session.flashcards.index + 1,
        session.notebook.len()
    );

    if session.flashcards.flipped {
        let _ = writeln!(out, "{}", card.definition);
        if let Some(ex) = card.examples.first() {
            let _ = writeln!(out, "\n\"{}\"", ex.original);
        }
    } else {
        if card.image_url.is_some() {
            let _ = writeln!(out, "{}", describe_image(card));
        }
        let _ = writeln!(out, "{}", card.term);
        let _ = writeln!(out, "\n(Enter or /flip to reveal)");
    }

    let _ = writeln!(out, "\n/prev  ·  /next  ·  /notebook to close");
    out
}

pub fn render_story(session: &Session) -> String {
    let mut out = String::new();

    if session.is_generating_story {
        let _ = writeln!(out, "Writing a story with your words...");
        return out;
    }

    let _ = writeln!(out, "AI Story Time\n");
    match &session.story {
        Some(story) => {
            let _ = writeln!(out, "{}   🔊 /say\n", story.story);
            let _ = writeln!(out, "{}", story.translation);
        }
        None => {
            let _ = writeln!(out, "{STORY_FAILED}");
        }
    }
    out
}

pub fn render_help() -> String {
    [
        "Setup:     /source <code>  /target <code>  /go",
        "Search:    type a word on home or notebook, or /search <term>",
        "Result:    /save  /say [n|text]  type to chat about the word",
        "Notebook:  /notebook  /open <n>  /cards  /story",
        "Cards:     Enter or /flip  /next  /prev",
        "General:   /home  /setup  /key <api key>  /dismiss  /quit",
    ]
    .join("\n")
}

fn describe_image(entry: &DictionaryEntry) -> String {
    match entry.image_url.as_deref().and_then(MediaRef::from_data_uri) {
        Some(image) => format!(
            "🖼  [illustration: {}, {} KB]",
            image.mime_type,
            image.data.len().div_ceil(1024)
        ),
        None => "🖼  [no illustration]".to_string(),
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
