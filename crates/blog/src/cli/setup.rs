use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "blog",
    bin_name = "blog",
    version,
    disable_help_subcommand = true,
    after_help = "Enable shell completions:\n  eval \"$(blog completions bash)\"  # add to ~/.bashrc\n  eval \"$(blog completions zsh)\"   # add to ~/.zshrc"
)]
#[command(about = "Read, write and administer posts on the blog platform", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory for client state (session, preferences)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Config file to read instead of the default blog.toml
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// Builds the clap Command, for completion scripts.
pub fn build_command() -> clap::Command {
    Cli::command()
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List posts, newest first
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Only posts whose title or content contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one post
    #[command(alias = "v", display_order = 2)]
    View { id: i64 },

    /// Write a new post
    #[command(alias = "n", display_order = 3)]
    Create(PostArgs),

    /// Change one of your posts
    #[command(alias = "e", display_order = 4)]
    Edit {
        id: i64,

        #[command(flatten)]
        post: PostArgs,
    },

    /// Delete one of your posts
    #[command(alias = "rm", display_order = 5)]
    Delete { id: i64 },

    /// Sign in
    #[command(display_order = 10)]
    Login {
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    #[command(display_order = 11)]
    Register {
        username: String,

        #[arg(long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out
    #[command(display_order = 12)]
    Logout,

    /// Show or change your profile
    #[command(display_order = 13)]
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCommands>,
    },

    /// Administration (admins only)
    #[command(display_order = 20)]
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },

    /// Visit a path (e.g. /admin) and print where its guard leads
    #[command(display_order = 30)]
    Open { path: String },

    /// Toggle dark mode
    #[command(display_order = 31)]
    Theme {
        /// Print the current mode instead of toggling
        #[arg(long)]
        show: bool,
    },

    /// Show or set the interface language (tr, en)
    #[command(display_order = 32)]
    Lang { code: Option<String> },

    /// Print the effective configuration and paths
    #[command(display_order = 33)]
    Config,

    /// Generate shell completions
    #[command(display_order = 34)]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Post form fields. On edit, omitted fields keep their current value.
#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct PostArgs {
    #[arg(short, long)]
    pub title: Option<String>,

    /// HTML body; `-` reads it from stdin
    #[arg(short, long)]
    pub content: Option<String>,

    /// Tag id to toggle on the post (repeatable)
    #[arg(long = "tag", value_name = "ID")]
    pub tags: Vec<i64>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ProfileCommands {
    /// Update username, e-mail or password
    Update {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },

    /// Refresh your account details from the server
    Refresh,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum AdminCommands {
    /// Every post, paged
    Posts {
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Delete any post
    DeletePost { id: i64 },

    /// List tags
    Tags,

    /// Create a tag
    TagCreate { name: String },

    /// Rename a tag
    TagRename { id: i64, name: String },

    /// Delete a tag
    TagDelete { id: i64 },

    /// List users
    Users,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("blog").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_naked_invocation_has_no_command() {
        assert_eq!(parse(&[]).command, None);
    }

    #[test]
    fn test_list_defaults_to_first_page() {
        assert_eq!(
            parse(&["list"]).command,
            Some(Commands::List {
                page: 1,
                search: None
            })
        );
        assert_eq!(
            parse(&["ls", "-p", "3", "-s", "rust"]).command,
            Some(Commands::List {
                page: 3,
                search: Some("rust".into())
            })
        );
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(Cli::try_parse_from(["blog", "list", "--page", "0"]).is_err());
    }

    #[test]
    fn test_edit_takes_post_fields() {
        let cli = parse(&["edit", "7", "--title", "New title", "--tag", "1", "--tag", "2"]);
        assert_eq!(
            cli.command,
            Some(Commands::Edit {
                id: 7,
                post: PostArgs {
                    title: Some("New title".into()),
                    content: None,
                    tags: vec![1, 2],
                },
            })
        );
    }

    #[test]
    fn test_admin_subcommands() {
        assert_eq!(
            parse(&["admin", "tag-rename", "4", "rustlang"]).command,
            Some(Commands::Admin {
                action: AdminCommands::TagRename {
                    id: 4,
                    name: "rustlang".into()
                }
            })
        );
        assert!(Cli::try_parse_from(["blog", "admin"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["theme", "--data", "/tmp/blog", "-v"]);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/blog")));
        assert!(cli.verbose);
    }
}
