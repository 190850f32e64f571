use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::entity::{format_millis, short_id, Note};
use crate::error::{NoteboardError, Result};
use crate::state::{visible_notes, AppState, Direction, SortOrder};
use crate::storage::{Persistence, SqliteKv, NOTEBOARD_DIR};
use crate::transfer::{
    board_export_filename, export_filename, parse_board_import, parse_import, BoardExport,
    ExportDocument,
};
use crate::translate::{
    detect_pair, GoogleTranslate, Language, Translation, TranslationSession, Translator,
};

const PREVIEW_CHARS: usize = 60;

/// Find the project root by looking for .noteboard/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(NOTEBOARD_DIR).exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

fn open_project() -> Result<(Persistence<SqliteKv>, AppState)> {
    let root = find_project_root();
    let persistence = Persistence::open(&root)?;
    let state = persistence.load()?;
    Ok((persistence, state))
}

/// Ask a yes/no question on stderr. Without a terminal on stdin the question
/// cannot be answered, and the caller must pass `flag` instead.
fn confirm(question: &str, flag: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);

    if atty::is(atty::Stream::Stdin) {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    } else {
        Err(NoteboardError::Aborted(format!(
            "Use {} to confirm in non-interactive mode",
            flag
        )))
    }
}

/// Content from the joined arguments, or from stdin when `stdin` is set.
fn read_content(args: Vec<String>, stdin: bool) -> Result<String> {
    if stdin {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        Ok(content.trim_end_matches(['\n', '\r']).to_string())
    } else {
        Ok(args.join(" "))
    }
}

/// First line of `content`, shortened for listings.
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let multi_line = content.lines().nth(1).is_some();
    let mut shown: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if multi_line || first_line.chars().count() > PREVIEW_CHARS {
        shown.push('…');
    }
    shown
}

fn parse_sort(raw: &str) -> Result<SortOrder> {
    raw.parse().map_err(NoteboardError::InvalidSortOrder)
}

fn parse_language(raw: &str) -> Result<Language> {
    raw.parse().map_err(NoteboardError::InvalidLanguage)
}

fn sort_label(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Newest => "newest first",
        SortOrder::Oldest => "oldest first",
        SortOrder::Content => "by content",
    }
}

fn print_notes(notes: &[&Note]) {
    for n in notes {
        println!(
            "  ({}) {}  {}",
            short_id(&n.id),
            format_millis(n.timestamp),
            preview(&n.content)
        );
    }
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let _store = Persistence::init(&root)?;

    println!("Initialized noteboard project in {}", root.display());
    Ok(())
}

// ========== Notes ==========

pub fn handle_add(
    content: Vec<String>,
    board: Option<String>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;

    let board_id = match board {
        Some(ident) => state.find_board(&ident)?.id.clone(),
        None => state.active_board()?.id.clone(),
    };
    let content = read_content(content, stdin)?;

    let note = state.create_note(&content, &board_id)?.clone();
    persistence.save(&state)?;
    info!(note_id = %note.id, "note saved");

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        let board_name = &state.find_board(&board_id)?.name;
        println!("Created note ({}) on {}", short_id(&note.id), board_name);
    }

    Ok(())
}

pub fn handle_list(
    board: Option<String>,
    search: Option<String>,
    sort: Option<String>,
    json: bool,
) -> Result<()> {
    let (_persistence, state) = open_project()?;

    let board = match board {
        Some(ident) => state.find_board(&ident)?,
        None => state.active_board()?,
    };
    let order = match sort {
        Some(raw) => parse_sort(&raw)?,
        None => state.sort_order,
    };
    let search = search.unwrap_or_default();
    let notes = visible_notes(&state.notes, &board.id, &search, order);

    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
    } else if notes.is_empty() {
        if search.is_empty() {
            println!("No notes on {}.", board.name);
        } else {
            println!("No notes on {} matching '{}'.", board.name, search);
        }
    } else {
        println!("Notes on {} ({}):\n", board.name, sort_label(order));
        print_notes(&notes);
    }

    Ok(())
}

pub fn handle_search(query: String, board: Option<String>, json: bool) -> Result<()> {
    handle_list(board, Some(query), None, json)
}

pub fn handle_show(id: String, json: bool) -> Result<()> {
    let (_persistence, state) = open_project()?;
    let note = state.find_note(&id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(note)?);
    } else {
        let board_name = state
            .find_board(&note.board_id)
            .map(|b| b.name.as_str())
            .unwrap_or("-");
        println!("Note ({})", note.id);
        println!("Board: {}", board_name);
        println!("Created: {}", format_millis(note.timestamp));
        println!("\n{}", note.content);
    }

    Ok(())
}

pub fn handle_copy(id: String) -> Result<()> {
    let (_persistence, state) = open_project()?;
    let note = state.find_note(&id)?;
    print!("{}", note.content);
    Ok(())
}

pub fn handle_edit(id: String, content: Vec<String>, stdin: bool) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let note_id = state.find_note(&id)?.id.clone();
    let content = read_content(content, stdin)?;

    if !state.update_note_content(&note_id, &content) {
        return Err(NoteboardError::NoteNotFound(id));
    }
    persistence.save(&state)?;

    println!("Updated note ({})", short_id(&note_id));
    Ok(())
}

pub fn handle_move(id: String, board: String) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let note_id = state.find_note(&id)?.id.clone();
    let target = state.find_board(&board)?.clone();

    if !state.move_note(&note_id, &target.id)? {
        return Err(NoteboardError::NoteNotFound(id));
    }
    persistence.save(&state)?;

    println!("Moved note ({}) to {}", short_id(&note_id), target.name);
    Ok(())
}

pub fn handle_delete(id: String) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let note_id = state.find_note(&id)?.id.clone();

    let item = state
        .soft_delete_note(&note_id)
        .ok_or_else(|| NoteboardError::NoteNotFound(id))?;
    persistence.save(&state)?;

    println!(
        "Moved note ({}) from {} to trash",
        short_id(item.id()),
        item.original_board_name
    );
    Ok(())
}

pub fn handle_sort(order: Option<String>) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;

    let order = match order {
        Some(raw) => {
            let order = parse_sort(&raw)?;
            state.set_sort_order(order);
            order
        }
        None => state.cycle_sort_order(),
    };
    persistence.save(&state)?;

    println!("Sort order: {} ({})", order, sort_label(order));
    Ok(())
}

// ========== Boards ==========

pub fn handle_board_list(json: bool) -> Result<()> {
    let (_persistence, state) = open_project()?;
    let boards = state.sorted_boards();

    if json {
        println!("{}", serde_json::to_string_pretty(&boards)?);
    } else if boards.is_empty() {
        println!("No boards. Create one with 'noteboard board add <NAME>'.");
    } else {
        println!("Boards:\n");
        for b in boards {
            let marker = if state.active_board_id.as_deref() == Some(b.id.as_str()) {
                "*"
            } else {
                " "
            };
            println!(
                "  {} ({}) {} [{} notes]",
                marker,
                short_id(&b.id),
                b.name,
                state.notes_for_board(&b.id).len()
            );
        }
    }

    Ok(())
}

pub fn handle_board_add(name: String) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;

    let board = state.create_board(&name)?.clone();
    persistence.save(&state)?;

    println!("Created board ({}) - {}", short_id(&board.id), board.name);
    Ok(())
}

pub fn handle_board_rename(board: String, name: String) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let target = state.find_board(&board)?.clone();

    state.rename_board(&target.id, &name)?;
    persistence.save(&state)?;

    println!("Renamed board {} to {}", target.name, name.trim());
    Ok(())
}

pub fn handle_board_delete(board: String, force: bool) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let target = state.find_board(&board)?.clone();
    let note_count = state.notes_for_board(&target.id).len();

    // Confirm deletion unless --force is used
    if !force {
        let question = format!(
            "Delete board {} ({}) and move its {} notes to trash?",
            target.name,
            short_id(&target.id),
            note_count
        );
        if !confirm(&question, "--force")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deletion = state
        .delete_board(&target.id)
        .ok_or_else(|| NoteboardError::BoardNotFound(board))?;
    persistence.save(&state)?;

    println!(
        "Deleted board {} ({} notes moved to trash)",
        deletion.board.name, deletion.trashed
    );
    match state.active_board() {
        Ok(active) => println!("Active board: {}", active.name),
        Err(_) => println!("No boards left."),
    }
    Ok(())
}

pub fn handle_board_use(board: String) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let target = state.find_board(&board)?.clone();

    state.set_active_board(&target.id)?;
    persistence.save(&state)?;

    println!("Active board: {}", target.name);
    Ok(())
}

pub fn handle_board_reorder(board: String, direction: Direction) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let target = state.find_board(&board)?.clone();

    if state.reorder_board(&target.id, direction) {
        persistence.save(&state)?;
        let order: Vec<&str> = state
            .sorted_boards()
            .into_iter()
            .map(|b| b.name.as_str())
            .collect();
        println!("Board order: {}", order.join(", "));
    } else {
        let edge = match direction {
            Direction::Up => "first",
            Direction::Down => "last",
        };
        println!("Board {} is already {}.", target.name, edge);
    }
    Ok(())
}

pub fn handle_board_export(
    path: Option<PathBuf>,
    board: Option<String>,
    force: bool,
    stdout: bool,
) -> Result<()> {
    let (_persistence, state) = open_project()?;
    let target = match board {
        Some(ident) => state.find_board(&ident)?,
        None => state.active_board()?,
    };

    let export = BoardExport::from_state(&state, &target.id)?;
    let json = export.to_json_pretty()?;
    let path = path.unwrap_or_else(|| {
        PathBuf::from(board_export_filename(
            &target.name,
            chrono::Local::now().date_naive(),
        ))
    });

    let summary = format!("board {} with {} notes", target.name, export.notes.len());
    write_export(&json, &path, force, stdout, &summary)
}

pub fn handle_board_import(path: PathBuf) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let text = read_import_file(&path)?;
    let imported = parse_board_import(&text)?;
    let note_count = imported.notes.len();

    let board = state.merge_board(imported).clone();
    persistence.save(&state)?;

    println!(
        "Imported board ({}) - {} with {} notes",
        short_id(&board.id),
        board.name,
        note_count
    );
    Ok(())
}

// ========== Trash ==========

pub fn handle_trash_list(json: bool) -> Result<()> {
    let (_persistence, state) = open_project()?;
    let mut items: Vec<_> = state.trash.iter().collect();
    items.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("Trash is empty.");
    } else {
        println!("Trash:\n");
        for t in items {
            println!(
                "  ({}) [{}] deleted {}  {}",
                short_id(t.id()),
                t.original_board_name,
                format_millis(t.deleted_at),
                preview(&t.note.content)
            );
        }
    }

    Ok(())
}

pub fn handle_trash_restore(id: String, board: Option<String>) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let item_id = state.find_trash_item(&id)?.id().to_string();
    let destination = match board {
        Some(ident) => state.find_board(&ident)?.clone(),
        None => state.active_board()?.clone(),
    };

    let note = state.restore_from_trash(&item_id, &destination.id)?;
    persistence.save(&state)?;

    println!("Restored note ({}) to {}", short_id(&note.id), destination.name);
    Ok(())
}

// ========== Import / Export ==========

/// Read an import file. Content that is not UTF-8 is an invalid file, not an
/// IO failure.
fn read_import_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|_| NoteboardError::InvalidFile("file is not valid UTF-8 text".to_string()))
}

fn write_export(json: &str, path: &Path, force: bool, stdout: bool, summary: &str) -> Result<()> {
    if stdout {
        println!("{}", json);
        return Ok(());
    }

    if path.exists() && !force {
        let question = format!("{} already exists. Overwrite?", path.display());
        if !confirm(&question, "--force")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    fs::write(path, format!("{}\n", json))?;
    println!("Exported {} to {}", summary, path.display());
    Ok(())
}

pub fn handle_export(path: Option<PathBuf>, force: bool, stdout: bool) -> Result<()> {
    let (_persistence, state) = open_project()?;
    let json = ExportDocument::from_state(&state).to_json_pretty()?;
    let path =
        path.unwrap_or_else(|| PathBuf::from(export_filename(chrono::Local::now().date_naive())));

    let summary = format!(
        "{} boards, {} notes and {} trash items",
        state.boards.len(),
        state.notes.len(),
        state.trash.len()
    );
    write_export(&json, &path, force, stdout, &summary)
}

pub fn handle_import(path: PathBuf, yes: bool) -> Result<()> {
    let (mut persistence, mut state) = open_project()?;
    let text = read_import_file(&path)?;
    let imported = parse_import(&text)?;

    if !yes {
        let question = format!(
            "Replace all current data with {} boards, {} notes and {} trash items from {}?",
            imported.boards.len(),
            imported.notes.len(),
            imported.trash.len(),
            path.display()
        );
        if !confirm(&question, "--yes")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    state.replace_with(imported);
    persistence.save(&state)?;

    println!(
        "Imported {} boards, {} notes and {} trash items",
        state.boards.len(),
        state.notes.len(),
        state.trash.len()
    );
    Ok(())
}

// ========== Translation ==========

/// Resolve the language pair. Missing sides are filled in from `text`.
fn language_pair(
    from: Option<Language>,
    to: Option<Language>,
    text: &str,
) -> (Language, Language) {
    match (from, to) {
        (Some(from), Some(to)) => (from, to),
        (None, Some(to)) => (Language::Auto, to),
        (Some(Language::Arabic), None) => (Language::Arabic, Language::English),
        (Some(from), None) => (from, Language::Arabic),
        (None, None) => detect_pair(text),
    }
}

fn note_content(id: &str) -> Result<String> {
    let (_persistence, state) = open_project()?;
    let note = state.find_note(id)?;
    Ok(note.content.clone())
}

fn load_config() -> Result<Config> {
    Config::load(&find_project_root().join(NOTEBOARD_DIR))
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

pub fn handle_translate(
    text: Vec<String>,
    note: Option<String>,
    from: Option<String>,
    to: Option<String>,
    interactive: bool,
    json: bool,
) -> Result<()> {
    let from = from.as_deref().map(parse_language).transpose()?;
    let to = to.as_deref().map(parse_language).transpose()?;
    if to == Some(Language::Auto) {
        return Err(NoteboardError::InvalidLanguage(
            "auto (only valid as a source)".to_string(),
        ));
    }

    let config = load_config()?;
    let backend = GoogleTranslate::new(&config.translation)?;
    let runtime = build_runtime()?;

    if interactive {
        let session = TranslationSession::new(
            Translator::new(backend),
            Duration::from_millis(config.translation.debounce_ms),
        );
        return runtime.block_on(run_interactive(session, from, to));
    }

    let original = match note {
        Some(id) => note_content(&id)?,
        None => text.join(" "),
    };
    if original.trim().is_empty() {
        return Err(NoteboardError::EmptyContent);
    }

    let (source, target) = language_pair(from, to, &original);
    let translator = Translator::new(backend);
    let translated = runtime.block_on(translator.translate(&original, source, target));

    if json {
        let translation = Translation {
            source,
            target,
            original,
            text: translated,
        };
        println!("{}", serde_json::to_string_pretty(&translation)?);
    } else {
        println!("{}", translated);
    }
    Ok(())
}

/// Translate stdin line by line. Lines that arrive within the debounce window
/// of each other only produce a translation for the last one.
async fn run_interactive(
    session: TranslationSession<GoogleTranslate>,
    from: Option<Language>,
    to: Option<Language>,
) -> Result<()> {
    eprintln!(
        "Type text to translate; results appear after {} ms. Ctrl-D or Ctrl-C to stop.",
        session.debounce().as_millis()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let (source, target) = language_pair(from, to, &line);
                let session = session.clone();
                pending = Some(tokio::spawn(async move {
                    if let Some(translated) = session.submit(line, source, target).await {
                        println!("{}", translated);
                    }
                }));
            }
            _ = tokio::signal::ctrl_c() => {
                return Ok(());
            }
        }
    }

    // Let the last submission finish after stdin closes
    if let Some(handle) = pending {
        if let Err(e) = handle.await {
            warn!(error = %e, "translation task failed");
        }
    }
    Ok(())
}
