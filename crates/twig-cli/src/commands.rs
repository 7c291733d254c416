use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use twig_sdk::{LogEntry, ObjectStore, RepoConfig, Repository, Signature, Status};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match &cli.command {
        Command::Init(args) => cmd_init(&cli, args),
        Command::Write(args) => cmd_write(&mut open(&cli)?, args),
        Command::Add(args) => cmd_add(&mut open(&cli)?, &cli.repo, args),
        Command::Rm(args) => cmd_rm(&mut open(&cli)?, args),
        Command::Commit(args) => cmd_commit(&mut open(&cli)?, args, format),
        Command::ReadHead => cmd_read_head(&open(&cli)?, format),
        Command::CatFile(args) => cmd_cat_file(&open(&cli)?, args, format),
        Command::Log(args) => cmd_log(&open(&cli)?, args, format),
        Command::LsFiles => cmd_ls_files(&open(&cli)?, format),
        Command::Status => cmd_status(&open(&cli)?, format),
        Command::Demo => cmd_demo(format),
    }
}

fn open(cli: &Cli) -> anyhow::Result<Repository> {
    let mut repo = Repository::open(&cli.repo)
        .with_context(|| format!("cannot open repository at {}", cli.repo.display()))?;
    repo.set_identity(cli.author_name.clone(), cli.author_email.clone());
    Ok(repo)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_init(cli: &Cli, args: &InitArgs) -> anyhow::Result<()> {
    let path = args.path.clone().unwrap_or_else(|| cli.repo.clone());
    let mut config = RepoConfig::default();
    if let Some(name) = &cli.author_name {
        config.user.name = name.clone();
    }
    if let Some(email) = &cli.author_email {
        config.user.email = email.clone();
    }
    if let Some(branch) = &args.branch {
        config.core.default_branch = branch.clone();
    }
    let branch = config.core.default_branch.clone();
    Repository::init(&path, config)
        .with_context(|| format!("cannot initialize repository at {}", path.display()))?;
    println!(
        "{} Initialized empty Twig repository in {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    println!("  Branch: {}", branch.yellow());
    Ok(())
}

fn cmd_write(repo: &mut Repository, args: &WriteArgs) -> anyhow::Result<()> {
    repo.write(&args.path, args.content.as_bytes())?;
    println!("  {} {}", "staged:".green(), args.path);
    Ok(())
}

/// Expand directory arguments into the worktree files beneath them.
fn expand_paths(repo: &Repository, root: &Path, paths: &[String]) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    let mut listing: Option<Vec<String>> = None;
    for path in paths {
        let trimmed = path.trim_start_matches("./").trim_end_matches('/');
        if trimmed.is_empty() || trimmed == "." || root.join(trimmed).is_dir() {
            if listing.is_none() {
                listing = Some(repo.worktree().list()?);
            }
            let prefix = format!("{trimmed}/");
            out.extend(
                listing
                    .iter()
                    .flatten()
                    .filter(|p| trimmed.is_empty() || trimmed == "." || p.starts_with(&prefix))
                    .cloned(),
            );
        } else {
            out.push(path.clone());
        }
    }
    Ok(out)
}

fn cmd_add(repo: &mut Repository, root: &Path, args: &AddArgs) -> anyhow::Result<()> {
    for path in expand_paths(repo, root, &args.paths)? {
        if repo.add(&path)? {
            println!("  {} {}", "staged:".green(), path);
        } else {
            println!("  {} {}", "unchanged:".dimmed(), path);
        }
    }
    Ok(())
}

fn cmd_rm(repo: &mut Repository, args: &RmArgs) -> anyhow::Result<()> {
    let removed = repo.remove(&args.path)?;
    println!("  {} {}", "unstaged:".red(), removed.path);
    Ok(())
}

fn cmd_commit(
    repo: &mut Repository,
    args: &CommitArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let id = repo.commit(&args.message)?;
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "commit": id.to_hex() })),
        OutputFormat::Text => {
            let branch = repo.current_branch()?.unwrap_or_else(|| "HEAD".into());
            println!("[{} {}] {}", branch.yellow(), id.short_hex().bold(), args.message);
            Ok(())
        }
    }
}

fn cmd_read_head(repo: &Repository, format: OutputFormat) -> anyhow::Result<()> {
    let head = repo.read_head()?;
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "head": head.to_hex() })),
        OutputFormat::Text => {
            println!("{head}");
            Ok(())
        }
    }
}

fn cmd_cat_file(repo: &Repository, args: &CatFileArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id = repo
        .resolve(&args.object)
        .with_context(|| format!("cannot resolve {}", args.object))?;
    if args.kind {
        println!("{}", repo.store().kind_of(&id)?);
        return Ok(());
    }
    match format {
        OutputFormat::Json => print_json(&repo.cat_file_json(&id)?),
        OutputFormat::Text => {
            let text = repo.cat_file_p(&id)?;
            if text.ends_with('\n') {
                print!("{text}");
            } else {
                println!("{text}");
            }
            Ok(())
        }
    }
}

fn format_signature(sig: &Signature) -> String {
    match sig.datetime() {
        Some(when) => format!(
            "{} <{}>  {}",
            sig.name,
            sig.email,
            when.format("%Y-%m-%d %H:%M:%S %z")
        ),
        None => sig.to_string(),
    }
}

fn print_log_entry(entry: &LogEntry, oneline: bool) {
    if oneline {
        println!("{} {}", entry.id.short_hex().yellow(), entry.commit.summary());
        return;
    }
    println!("{} {}", "commit".yellow(), entry.id.to_string().yellow());
    if entry.commit.parents.len() > 1 {
        let parents: Vec<String> = entry.commit.parents.iter().map(|p| p.short_hex()).collect();
        println!("Merge:  {}", parents.join(" "));
    }
    println!("Author: {}", format_signature(&entry.commit.author));
    println!();
    for line in entry.commit.message.lines() {
        println!("    {line}");
    }
    println!();
}

fn cmd_log(repo: &Repository, args: &LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    let entries = repo.log(args.limit)?;
    match format {
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No commits yet.");
            }
            for entry in &entries {
                print_log_entry(entry, args.oneline);
            }
            Ok(())
        }
    }
}

fn cmd_ls_files(repo: &Repository, format: OutputFormat) -> anyhow::Result<()> {
    let entries: Vec<_> = repo.index().entries().cloned().collect();
    match format {
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Text => {
            for entry in &entries {
                println!("{} {}\t{}", entry.mode, entry.object_id, entry.path);
            }
            Ok(())
        }
    }
}

fn print_status(branch: Option<&str>, status: &Status) {
    match branch {
        Some(branch) => println!("On branch {}", branch.yellow().bold()),
        None => println!("{}", "HEAD detached".red()),
    }
    if status.is_clean() {
        println!("\nNothing staged relative to HEAD.");
        return;
    }
    println!("\nChanges to be committed:");
    for path in &status.added {
        println!("  {} {}", "new file:".green(), path);
    }
    for path in &status.modified {
        println!("  {} {}", "modified:".green(), path);
    }
    for path in &status.deleted {
        println!("  {} {}", "deleted: ".red(), path);
    }
}

fn cmd_status(repo: &Repository, format: OutputFormat) -> anyhow::Result<()> {
    let status = repo.status()?;
    match format {
        OutputFormat::Json => print_json(&status),
        OutputFormat::Text => {
            print_status(repo.current_branch()?.as_deref(), &status);
            Ok(())
        }
    }
}

/// The write, add, commit, read-head, cat-file flow on a throwaway
/// in-memory repository.
fn cmd_demo(format: OutputFormat) -> anyhow::Result<()> {
    let mut repo = Repository::in_memory(RepoConfig::default())?;
    repo.write("test.txt", b"hello")?;
    repo.add("test.txt")?;
    let commit = repo.commit("Initial commit")?;
    let head = repo.read_head()?;
    match format {
        OutputFormat::Json => print_json(&repo.cat_file_json(&head)?),
        OutputFormat::Text => {
            println!("{} {}", "commit".yellow(), commit);
            println!("{}", repo.cat_file_p(&head)?);
            Ok(())
        }
    }
}
