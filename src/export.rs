// src/export.rs

//! Writes a repository's history as `git log -p --reverse -U0` text, the
//! input format of the log parser.

use crate::error::{Error, Result};
use crate::progress::{percent_of, ProgressReporter, Step};
use chrono::{FixedOffset, Offset, TimeZone, Utc};
use git2::{Commit, DiffFindOptions, DiffFormat, DiffOptions, Oid, Repository, Sort};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Exports the history reachable from `branch` (HEAD when `None`) into
/// `output`, oldest commit first. Returns the number of commits written.
pub fn export_log(
    repo_path: &Path,
    branch: Option<&str>,
    output: &Path,
    progress: &dyn ProgressReporter,
) -> Result<usize> {
    let repo = Repository::open(repo_path)?;
    info!("Exporting history of {}", repo_path.display());

    let file = File::create(output).map_err(|source| Error::Io {
        path: output.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    let written = write_log(&repo, branch, &mut out, progress)?;
    out.flush().map_err(Error::Write)?;
    Ok(written)
}

pub fn write_log<W: Write>(
    repo: &Repository,
    branch: Option<&str>,
    out: &mut W,
    progress: &dyn ProgressReporter,
) -> Result<usize> {
    progress.set_step(Step::Exporting);

    // 1. Collect all commits oldest first
    let mut revwalk = repo.revwalk()?;
    match branch {
        Some(rev) => revwalk.push(repo.revparse_single(rev)?.peel_to_commit()?.id())?,
        None => revwalk.push_head()?,
    }
    revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;
    let oids = revwalk.collect::<std::result::Result<Vec<Oid>, git2::Error>>()?;

    // 2. Write each commit followed by its patch against the first parent
    for (i, oid) in oids.iter().enumerate() {
        let commit = repo.find_commit(*oid)?;
        write_header(&commit, out).map_err(Error::Write)?;
        if commit.parent_count() <= 1 {
            write_patch(repo, &commit, out)?;
        }
        progress.set_progress(percent_of(i + 1, oids.len()));
    }

    debug!("wrote {} commits", oids.len());
    Ok(oids.len())
}

fn write_header<W: Write>(commit: &Commit, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "commit {}", commit.id())?;
    if commit.parent_count() > 1 {
        let parents: Vec<String> = commit
            .parent_ids()
            .map(|id| id.to_string()[..7].to_string())
            .collect();
        writeln!(out, "Merge: {}", parents.join(" "))?;
    }

    let author = commit.author();
    writeln!(
        out,
        "Author: {} <{}>",
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or("")
    )?;

    let when = author.when();
    let offset = FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    let date = Utc
        .timestamp_opt(when.seconds(), 0)
        .single()
        .unwrap_or_default()
        .with_timezone(&offset);
    writeln!(out, "Date:   {}", date.format("%a %b %-d %H:%M:%S %Y %z"))?;
    writeln!(out)?;

    for line in String::from_utf8_lossy(commit.message_bytes()).lines() {
        writeln!(out, "    {}", line)?;
    }
    writeln!(out)
}

fn write_patch<W: Write>(repo: &Repository, commit: &Commit, out: &mut W) -> Result<()> {
    let parent_tree = match commit.parent_count() {
        0 => None,
        _ => Some(commit.parent(0)?.tree()?),
    };
    let tree = commit.tree()?;

    let mut diff_opts = DiffOptions::new();
    diff_opts.context_lines(0);

    let mut diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_opts))?;
    diff.find_similar(Some(DiffFindOptions::new().renames(true)))?;

    let mut write_err = None;
    let printed = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let result = match line.origin() {
            origin @ ('+' | '-' | ' ') => out
                .write_all(&[origin as u8])
                .and_then(|_| out.write_all(line.content())),
            _ => out.write_all(line.content()),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                write_err = Some(e);
                false
            }
        }
    });
    if let Some(e) = write_err {
        return Err(Error::Write(e));
    }
    printed?;
    writeln!(out).map_err(Error::Write)
}
