use lingopop_core::session::Session;
use lingopop_types::{Intent, View};

/// Parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    ConfigUpdate { field: String, value: String },
    Help,
    Quit,
    Nothing,
    Unknown(String),
}

/// Map an input line to a command. `snapshot` is the last rendered state and
/// decides what plain text and bare `/say` mean.
pub fn parse_command(line: &str, snapshot: Option<&Session>) -> Command {
    let line = line.trim();
    let view = snapshot.map(|s| s.view).unwrap_or_default();

    let Some(rest) = line.strip_prefix('/') else {
        return plain_text(line, view);
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let intent = match name.to_ascii_lowercase().as_str() {
        "help" | "h" | "?" => return Command::Help,
        "quit" | "q" | "exit" => return Command::Quit,
        "key" => {
            return Command::ConfigUpdate {
                field: "api_key".to_string(),
                value: arg.to_string(),
            };
        }
        "source" | "from" => Intent::SelectSource(arg.to_string()),
        "target" | "to" => Intent::SelectTarget(arg.to_string()),
        "go" | "start" => Intent::ConfirmSetup,
        "setup" | "settings" => Intent::OpenSetup,
        "home" => Intent::GoHome,
        "search" | "s" => Intent::Search(arg.to_string()),
        "save" => Intent::SaveCurrent,
        "notebook" | "nb" => Intent::OpenNotebook,
        "open" => match resolve_entry_id(arg, snapshot) {
            Some(id) => Intent::OpenEntry(id),
            None => return Command::Unknown(format!("no notebook item '{arg}'")),
        },
        "cards" | "flashcards" => Intent::OpenFlashcards,
        "flip" => Intent::FlipCard,
        "next" | "n" => Intent::NextCard,
        "prev" | "p" => Intent::PrevCard,
        "story" => Intent::GenerateStory,
        "say" => match say_text(arg, snapshot) {
            Some(text) => Intent::PlayAudio(text),
            None => return Command::Unknown("nothing to say here".to_string()),
        },
        "dismiss" | "ok" => Intent::DismissAlert,
        other => return Command::Unknown(format!("unknown command '/{other}'")),
    };

    Command::Intent(intent)
}

fn plain_text(line: &str, view: View) -> Command {
    match view {
        View::Flashcards if line.is_empty() => Command::Intent(Intent::FlipCard),
        _ if line.is_empty() => Command::Nothing,
        View::Result => Command::Intent(Intent::SendChat(line.to_string())),
        View::Home | View::Notebook => Command::Intent(Intent::Search(line.to_string())),
        View::Setup | View::Flashcards | View::Story => {
            Command::Unknown("use a /command here, /help lists them".to_string())
        }
    }
}

/// Accepts a 1-based notebook position or a raw entry id
fn resolve_entry_id(arg: &str, snapshot: Option<&Session>) -> Option<String> {
    let session = snapshot?;
    if let Ok(position) = arg.parse::<usize>()
        && let Some(entry) = position.checked_sub(1).and_then(|i| session.notebook.get(i))
    {
        return Some(entry.id.clone());
    }
    session
        .notebook
        .find_by_id(arg)
        .map(|entry| entry.id.clone())
}

/// Text for `/say`: explicit text, an example number, or whatever is on screen
fn say_text(arg: &str, snapshot: Option<&Session>) -> Option<String> {
    let session = snapshot?;

    if let Ok(n) = arg.parse::<usize>()
        && session.view == View::Result
    {
        return session
            .current_entry
            .as_ref()
            .and_then(|e| e.examples.get(n.checked_sub(1)?))
            .map(|ex| ex.original.clone());
    }
    if !arg.is_empty() {
        return Some(arg.to_string());
    }

    match session.view {
        View::Result => session.current_entry.as_ref().map(|e| e.term.clone()),
        View::Flashcards => session.current_card().map(|e| e.term.clone()),
        View::Story => session.story.as_ref().map(|s| s.story.clone()),
        _ => None,
    }
}
