use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "twig",
    about = "Twig: a small content-addressed version control system",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Repository root (the directory holding `.twig`)
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    pub repo: PathBuf,

    /// Author name for this invocation, overriding config.toml
    #[arg(long, global = true)]
    pub author_name: Option<String>,

    /// Author email for this invocation, overriding config.toml
    #[arg(long, global = true)]
    pub author_email: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init(InitArgs),
    /// Write a file into the working tree and stage it
    Write(WriteArgs),
    /// Stage files (directories are walked)
    Add(AddArgs),
    /// Unstage a path
    Rm(RmArgs),
    /// Record the staged snapshot as a commit
    Commit(CommitArgs),
    /// Print the commit HEAD resolves to
    ReadHead,
    /// Print a stored object
    CatFile(CatFileArgs),
    /// Show first-parent history from HEAD
    Log(LogArgs),
    /// List staged entries
    LsFiles,
    /// Show staged changes relative to HEAD
    Status,
    /// Run write, add, commit and cat-file against an in-memory repository
    Demo,
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<PathBuf>,
    /// Initial branch name
    #[arg(short, long)]
    pub branch: Option<String>,
}

#[derive(Args)]
pub struct WriteArgs {
    pub path: String,
    pub content: String,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct RmArgs {
    pub path: String,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Pretty-print the object (default)
    #[arg(short = 'p', conflicts_with = "kind")]
    pub pretty: bool,
    /// Print only the object kind
    #[arg(short = 't', long = "type")]
    pub kind: bool,
    /// Object id, ref name or branch
    pub object: String,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub oneline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["twig", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init(_)));
        assert_eq!(cli.repo, PathBuf::from("."));
    }

    #[test]
    fn parse_init_with_path_and_branch() {
        let cli = Cli::try_parse_from(["twig", "init", "-b", "trunk", "/tmp/r"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.path, Some(PathBuf::from("/tmp/r")));
            assert_eq!(args.branch.as_deref(), Some("trunk"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_write() {
        let cli = Cli::try_parse_from(["twig", "write", "test.txt", "hello"]).unwrap();
        if let Command::Write(args) = cli.command {
            assert_eq!(args.path, "test.txt");
            assert_eq!(args.content, "hello");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_add_many() {
        let cli = Cli::try_parse_from(["twig", "add", "a.txt", "src"]).unwrap();
        if let Command::Add(args) = cli.command {
            assert_eq!(args.paths, vec!["a.txt", "src"]);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn add_requires_a_path() {
        assert!(Cli::try_parse_from(["twig", "add"]).is_err());
    }

    #[test]
    fn parse_commit() {
        let cli = Cli::try_parse_from(["twig", "commit", "-m", "hello"]).unwrap();
        if let Command::Commit(args) = cli.command {
            assert_eq!(args.message, "hello");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn commit_requires_message() {
        assert!(Cli::try_parse_from(["twig", "commit"]).is_err());
    }

    #[test]
    fn parse_cat_file() {
        let cli = Cli::try_parse_from(["twig", "cat-file", "-p", "HEAD"]).unwrap();
        if let Command::CatFile(args) = cli.command {
            assert!(args.pretty);
            assert!(!args.kind);
            assert_eq!(args.object, "HEAD");
        } else {
            panic!("wrong command");
        }
        assert!(Cli::try_parse_from(["twig", "cat-file", "-p", "-t", "HEAD"]).is_err());
    }

    #[test]
    fn parse_log_limit() {
        let cli = Cli::try_parse_from(["twig", "log", "-n", "5", "--oneline"]).unwrap();
        if let Command::Log(args) = cli.command {
            assert_eq!(args.limit, Some(5));
            assert!(args.oneline);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_unit_commands() {
        let parse = |name: &str| Cli::try_parse_from(["twig", name]).unwrap().command;
        assert!(matches!(parse("read-head"), Command::ReadHead));
        assert!(matches!(parse("ls-files"), Command::LsFiles));
        assert!(matches!(parse("status"), Command::Status));
        assert!(matches!(parse("demo"), Command::Demo));
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "twig",
            "--verbose",
            "-C",
            "/repo",
            "--author-name",
            "Ada",
            "--format",
            "json",
            "status",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.repo, PathBuf::from("/repo"));
        assert_eq!(cli.author_name.as_deref(), Some("Ada"));
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
