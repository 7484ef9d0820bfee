use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "memotag",
    bin_name = "memotag",
    version,
    disable_help_subcommand = true,
    after_help = "Memos are addressed as memos/<uuid> or by bare uuid.\nRunning memotag with no command lists tags."
)]
#[command(about = "Hierarchical tags for markdown memos", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to the OS data directory)
    #[arg(long, global = true, env = "MEMOTAG_DATA", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Act as this user id (defaults to `default_user` from config)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub user: Option<i32>,

    /// Verbose output, repeat for debug logs
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Print JSON instead of text
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Memo(MemoCommands),

    #[command(flatten)]
    Tag(TagCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum MemoCommands {
    /// Create a memo from arguments or piped stdin
    #[command(alias = "a", display_order = 1)]
    Add {
        /// Attach as a comment to this memo
        #[arg(long)]
        parent: Option<String>,

        /// Content words (joined with spaces); reads stdin when empty
        #[arg(trailing_var_arg = true)]
        content: Vec<String>,
    },

    /// Replace a memo's content
    #[command(alias = "e", display_order = 2)]
    Edit {
        memo: String,

        #[arg(trailing_var_arg = true)]
        content: Vec<String>,
    },

    /// Show one memo
    #[command(alias = "v", display_order = 3)]
    Show { memo: String },

    /// List top-level memos
    #[command(alias = "ls", display_order = 4)]
    Memos {
        /// Only memos carrying this tag or a tag below it
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Delete a memo and its comments
    #[command(alias = "rm", display_order = 5)]
    Remove { memo: String },
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// List tags as a tree
    #[command(display_order = 10)]
    Tags {
        /// Only paths starting with this prefix
        #[arg(short, long)]
        prefix: Option<String>,

        /// Include the ids of memos carrying each tag
        #[arg(long)]
        ids: bool,

        /// Skip hierarchy computation
        #[arg(long)]
        flat: bool,
    },

    /// Show one tag with its place in the hierarchy
    #[command(display_order = 11)]
    Tag {
        path: String,

        #[arg(long)]
        ids: bool,
    },

    /// Rename a tag in every memo carrying it
    #[command(alias = "mv", display_order = 12)]
    Rename {
        old: String,
        new: String,

        /// Accepted for compatibility; selection stays exact
        #[arg(long)]
        move_children: bool,
    },

    /// Remove a tag from memo content, or delete the memos carrying it
    #[command(display_order = 13)]
    Delete {
        path: String,

        /// remove-from-content | delete-related-memos
        #[arg(short, long, default_value = "remove-from-content")]
        strategy: String,
    },

    /// Delete every memo carrying a tag
    #[command(display_order = 14)]
    BatchDelete {
        path: String,

        /// Also match memos tagged below the path
        #[arg(long)]
        children: bool,

        /// Report what would be deleted without deleting
        #[arg(long)]
        dry_run: bool,
    },

    /// Rename or delete a tag inside one memo
    #[command(display_order = 15)]
    MemoTag {
        #[command(subcommand)]
        action: MemoTagAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum MemoTagAction {
    /// Rename a tag inside one memo
    Rename {
        memo: String,
        old: String,
        new: String,
    },

    /// Drop a tag from one memo
    Delete { memo: String, tag: String },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Recompute the tag cache of every memo
    #[command(display_order = 20)]
    Rebuild,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_batch_delete_flags() {
        let cli = Cli::parse_from(["memotag", "batch-delete", "proj", "--children", "--dry-run"]);
        match cli.command {
            Some(Commands::Tag(TagCommands::BatchDelete {
                path,
                children,
                dry_run,
            })) => {
                assert_eq!(path, "proj");
                assert!(children);
                assert!(dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["memotag", "tags", "--json", "-u", "3", "-vv"]);
        assert!(cli.json);
        assert_eq!(cli.user, Some(3));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_add_collects_words() {
        let cli = Cli::parse_from(["memotag", "add", "hello", "#world"]);
        match cli.command {
            Some(Commands::Memo(MemoCommands::Add { content, parent })) => {
                assert_eq!(content, vec!["hello", "#world"]);
                assert!(parent.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_memo_tag_subcommand() {
        let cli = Cli::parse_from(["memotag", "memo-tag", "delete", "memos/-", "work"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Tag(TagCommands::MemoTag {
                action: MemoTagAction::Delete { .. }
            }))
        ));
    }
}
