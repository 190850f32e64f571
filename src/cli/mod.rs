mod commands;
mod handlers;

pub use commands::{BoardAction, BoardCommand, Cli, Commands, TrashAction, TrashCommand};
pub use handlers::{
    handle_add, handle_board_add, handle_board_delete, handle_board_export, handle_board_import,
    handle_board_list, handle_board_rename, handle_board_reorder, handle_board_use, handle_copy,
    handle_delete, handle_edit, handle_export, handle_import, handle_init, handle_list,
    handle_move, handle_search, handle_show, handle_sort, handle_translate, handle_trash_list,
    handle_trash_restore,
};
