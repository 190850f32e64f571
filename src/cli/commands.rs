use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "noteboard")]
#[command(version, about = "Boards of quick notes with trash, search and translation")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new noteboard project in the current directory
    Init,

    /// Add a note to the active board
    Add {
        /// Note content (joined with spaces)
        content: Vec<String>,

        /// Board to add to instead of the active one (id or name)
        #[arg(long, short = 'b')]
        board: Option<String>,

        /// Read content from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the notes of the active board
    List {
        /// Board to show instead of the active one (id or name)
        #[arg(long, short = 'b')]
        board: Option<String>,

        /// Only show notes containing this text (case-insensitive)
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Sort order for this listing (newest, oldest, content)
        #[arg(long)]
        sort: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the notes of the active board
    Search {
        /// Text to look for (case-insensitive)
        query: String,

        /// Board to search instead of the active one (id or name)
        #[arg(long, short = 'b')]
        board: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single note
    Show {
        /// Note ID (or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a note's raw content, for piping into a clipboard tool
    Copy {
        /// Note ID (or unique prefix)
        id: String,
    },

    /// Replace a note's content
    Edit {
        /// Note ID (or unique prefix)
        id: String,

        /// New content (joined with spaces)
        content: Vec<String>,

        /// Read the new content from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Move a note to another board
    Move {
        /// Note ID (or unique prefix)
        id: String,

        /// Target board (id or name)
        board: String,
    },

    /// Move a note to the trash
    Delete {
        /// Note ID (or unique prefix)
        id: String,
    },

    /// Cycle the sort order, or set it
    Sort {
        /// newest, oldest or content; omit to cycle
        order: Option<String>,
    },

    /// Manage boards
    Board(BoardCommand),

    /// Inspect and restore deleted notes
    Trash(TrashCommand),

    /// Translate text or a note
    Translate {
        /// Text to translate (joined with spaces)
        text: Vec<String>,

        /// Translate this note instead of TEXT
        #[arg(long, short = 'n', conflicts_with = "text")]
        note: Option<String>,

        /// Source language (Arabic, English, French, Spanish, German, auto)
        #[arg(long)]
        from: Option<String>,

        /// Target language
        #[arg(long)]
        to: Option<String>,

        /// Translate lines typed on stdin as they settle
        #[arg(long, short = 'i', conflicts_with_all = ["text", "note"])]
        interactive: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export boards, notes and trash to a JSON file
    Export {
        /// Destination file (default: manager-backup-<date>.json)
        path: Option<PathBuf>,

        /// Overwrite an existing file without asking
        #[arg(long, short = 'f')]
        force: bool,

        /// Print the JSON instead of writing a file
        #[arg(long, conflicts_with_all = ["path", "force"])]
        stdout: bool,
    },

    /// Replace everything with the contents of an exported JSON file
    Import {
        /// File to import
        path: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand, Debug)]
pub enum BoardAction {
    /// List boards in display order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a board and make it active
    Add {
        /// Board name
        name: String,
    },

    /// Rename a board
    Rename {
        /// Board (id or name)
        board: String,

        /// New name
        name: String,
    },

    /// Delete a board, moving its notes to the trash
    Delete {
        /// Board (id or name)
        board: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Make a board the active one
    Use {
        /// Board (id or name)
        board: String,
    },

    /// Move a board one place up
    Up {
        /// Board (id or name)
        board: String,
    },

    /// Move a board one place down
    Down {
        /// Board (id or name)
        board: String,
    },

    /// Export the active board and its notes
    Export {
        /// Destination file (default: <board>-manager-backup-<date>.json)
        path: Option<PathBuf>,

        /// Board to export instead of the active one (id or name)
        #[arg(long, short = 'b')]
        board: Option<String>,

        /// Overwrite an existing file without asking
        #[arg(long, short = 'f')]
        force: bool,

        /// Print the JSON instead of writing a file
        #[arg(long, conflicts_with_all = ["path", "force"])]
        stdout: bool,
    },

    /// Add a board from a board export, next to the existing boards
    Import {
        /// File to import
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct TrashCommand {
    #[command(subcommand)]
    pub action: TrashAction,
}

#[derive(Subcommand, Debug)]
pub enum TrashAction {
    /// List deleted notes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore a deleted note onto the active board
    Restore {
        /// Trash item ID (or unique prefix)
        id: String,

        /// Restore onto this board instead of the active one (id or name)
        #[arg(long, short = 'b')]
        board: Option<String>,
    },
}
