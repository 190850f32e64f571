use clap::Parser;
use noteboard::cli::{
    handle_add, handle_board_add, handle_board_delete, handle_board_export, handle_board_import,
    handle_board_list, handle_board_rename, handle_board_reorder, handle_board_use, handle_copy,
    handle_delete, handle_edit, handle_export, handle_import, handle_init, handle_list,
    handle_move, handle_search, handle_show, handle_sort, handle_translate, handle_trash_list,
    handle_trash_restore, BoardAction, Cli, Commands, TrashAction,
};
use noteboard::logging;
use noteboard::state::Direction;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add {
            content,
            board,
            stdin,
            json,
        } => handle_add(content, board, stdin, json),
        Commands::List {
            board,
            search,
            sort,
            json,
        } => handle_list(board, search, sort, json),
        Commands::Search { query, board, json } => handle_search(query, board, json),
        Commands::Show { id, json } => handle_show(id, json),
        Commands::Copy { id } => handle_copy(id),
        Commands::Edit { id, content, stdin } => handle_edit(id, content, stdin),
        Commands::Move { id, board } => handle_move(id, board),
        Commands::Delete { id } => handle_delete(id),
        Commands::Sort { order } => handle_sort(order),
        Commands::Board(board_cmd) => match board_cmd.action {
            BoardAction::List { json } => handle_board_list(json),
            BoardAction::Add { name } => handle_board_add(name),
            BoardAction::Rename { board, name } => handle_board_rename(board, name),
            BoardAction::Delete { board, force } => handle_board_delete(board, force),
            BoardAction::Use { board } => handle_board_use(board),
            BoardAction::Up { board } => handle_board_reorder(board, Direction::Up),
            BoardAction::Down { board } => handle_board_reorder(board, Direction::Down),
            BoardAction::Export {
                path,
                board,
                force,
                stdout,
            } => handle_board_export(path, board, force, stdout),
            BoardAction::Import { path } => handle_board_import(path),
        },
        Commands::Trash(trash_cmd) => match trash_cmd.action {
            TrashAction::List { json } => handle_trash_list(json),
            TrashAction::Restore { id, board } => handle_trash_restore(id, board),
        },
        Commands::Translate {
            text,
            note,
            from,
            to,
            interactive,
            json,
        } => handle_translate(text, note, from, to, interactive, json),
        Commands::Export {
            path,
            force,
            stdout,
        } => handle_export(path, force, stdout),
        Commands::Import { path, yes } => handle_import(path, yes),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
