//! # CLI Layer
//!
//! The only place that touches stdout, stderr, stdin and process state.
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: clap definitions live in `setup.rs`
//! 2. **Context Setup**: data dir, config, store, caller id, logging
//! 3. **API Dispatch**: one `handle_*` per command, each a single API call
//! 4. **Output**: text via `render.rs`, or JSON with `--json`
//!
//! Business rules stay in the library; handlers only translate.

use super::render::{
    render_batch_delete, render_delete, render_memo, render_memo_list, render_memo_tag,
    render_rebuild, render_rename, render_tag, render_tag_list,
};
use super::setup::{Cli, Commands, MemoCommands, MemoTagAction, MiscCommands, TagCommands};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use log::debug;
use memotag::api::{DeleteStrategy, ListTagsRequest};
use memotag::config::default_data_dir;
use memotag::error::{MemotagError, Result};
use memotag::model::MEMO_NAME_PREFIX;
use memotag::store::fs::FileStore;
use memotag::{MemotagApi, MemotagConfig, RequestContext};
use serde::Serialize;
use std::io::{IsTerminal, Read};

struct AppContext {
    api: MemotagApi<FileStore>,
    request: RequestContext,
    json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose)?;
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Memo(cmd)) => match cmd {
            MemoCommands::Add { parent, content } => handle_add(&mut ctx, parent, content),
            MemoCommands::Edit { memo, content } => handle_edit(&mut ctx, &memo, content),
            MemoCommands::Show { memo } => handle_show(&ctx, &memo),
            MemoCommands::Memos { tag } => handle_memos(&ctx, tag.as_deref()),
            MemoCommands::Remove { memo } => handle_remove(&mut ctx, &memo),
        },
        Some(Commands::Tag(cmd)) => match cmd {
            TagCommands::Tags { prefix, ids, flat } => handle_tags(&ctx, prefix, ids, flat),
            TagCommands::Tag { path, ids } => handle_tag(&ctx, &path, ids),
            TagCommands::Rename {
                old,
                new,
                move_children,
            } => handle_rename(&mut ctx, &old, &new, move_children),
            TagCommands::Delete { path, strategy } => handle_delete(&mut ctx, &path, &strategy),
            TagCommands::BatchDelete {
                path,
                children,
                dry_run,
            } => handle_batch_delete(&mut ctx, &path, children, dry_run),
            TagCommands::MemoTag { action } => handle_memo_tag(&mut ctx, action),
        },
        Some(Commands::Misc(MiscCommands::Rebuild)) => handle_rebuild(&mut ctx),
        None => handle_tags(&ctx, None, false, false),
    }
}

fn init_logging(verbose: u8) -> Result<LoggerHandle> {
    let spec = match verbose {
        0 => std::env::var("MEMOTAG_LOG").unwrap_or_else(|_| "warn".to_string()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };
    Logger::try_with_str(&spec)
        .map_err(|e| MemotagError::Config(format!("invalid log level `{}`: {}", spec, e)))?
        .log_to_stderr()
        .start()
        .map_err(|e| MemotagError::Config(format!("failed to start logger: {}", e)))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };
    let config = MemotagConfig::load(&data_dir)?;
    let user_id = cli.user.unwrap_or(config.default_user);
    debug!(
        "event=cli_init module=cli status=ok data_dir={} user={}",
        data_dir.display(),
        user_id
    );

    Ok(AppContext {
        api: MemotagApi::new(FileStore::new(data_dir), config),
        request: RequestContext::new(user_id),
        json: cli.json,
    })
}

/// Accepts `memos/<uuid>` or a bare uuid.
fn memo_name(input: &str) -> String {
    if input.starts_with(MEMO_NAME_PREFIX) {
        input.to_string()
    } else {
        format!("{}{}", MEMO_NAME_PREFIX, input)
    }
}

/// Joined words, or piped stdin when no words were given.
fn read_content(words: Vec<String>) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        let mut buffer = String::new();
        stdin.lock().read_to_string(&mut buffer)?;
        if !buffer.trim().is_empty() {
            return Ok(buffer.trim_end_matches('\n').to_string());
        }
    }
    Err(MemotagError::InvalidArgument(
        "no content given: pass it as arguments or pipe it on stdin".to_string(),
    ))
}

fn emit<T: Serialize>(ctx: &AppContext, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

fn handle_add(ctx: &mut AppContext, parent: Option<String>, words: Vec<String>) -> Result<()> {
    let content = read_content(words)?;
    let parent = parent.map(|p| memo_name(&p));
    let memo = ctx
        .api
        .create_memo(&ctx.request, content, parent.as_deref())?;
    emit(ctx, &memo, render_memo)
}

fn handle_edit(ctx: &mut AppContext, memo: &str, words: Vec<String>) -> Result<()> {
    let content = read_content(words)?;
    let memo = ctx.api.update_memo(&ctx.request, &memo_name(memo), content)?;
    emit(ctx, &memo, render_memo)
}

fn handle_show(ctx: &AppContext, memo: &str) -> Result<()> {
    let memo = ctx.api.get_memo(&ctx.request, &memo_name(memo))?;
    emit(ctx, &memo, render_memo)
}

fn handle_memos(ctx: &AppContext, tag: Option<&str>) -> Result<()> {
    let memos = ctx.api.list_memos(&ctx.request, tag)?;
    emit(ctx, &memos, |m| render_memo_list(m))
}

fn handle_remove(ctx: &mut AppContext, memo: &str) -> Result<()> {
    let id = ctx.api.delete_memo(&ctx.request, &memo_name(memo))?;
    emit(ctx, &id, |id| format!("Deleted memos/{}\n", id))
}

fn handle_tags(ctx: &AppContext, prefix: Option<String>, ids: bool, flat: bool) -> Result<()> {
    let request = ListTagsRequest {
        path_prefix: prefix,
        include_memo_ids: ids,
        include_hierarchy: !flat,
    };
    let resp = ctx.api.list_tags(&ctx.request, &request)?;
    emit(ctx, &resp, |r| render_tag_list(r, flat))
}

fn handle_tag(ctx: &AppContext, path: &str, ids: bool) -> Result<()> {
    let node = ctx.api.get_tag(&ctx.request, path, ids)?;
    emit(ctx, &node, render_tag)
}

fn handle_rename(ctx: &mut AppContext, old: &str, new: &str, move_children: bool) -> Result<()> {
    let resp = ctx.api.rename_tag(&ctx.request, old, new, move_children)?;
    emit(ctx, &resp, render_rename)
}

fn handle_delete(ctx: &mut AppContext, path: &str, strategy: &str) -> Result<()> {
    let strategy: DeleteStrategy = strategy.parse()?;
    let resp = ctx.api.delete_tag(&ctx.request, path, strategy)?;
    emit(ctx, &resp, render_delete)
}

fn handle_batch_delete(
    ctx: &mut AppContext,
    path: &str,
    children: bool,
    dry_run: bool,
) -> Result<()> {
    let resp = ctx
        .api
        .batch_delete_by_tag(&ctx.request, path, children, dry_run)?;
    emit(ctx, &resp, render_batch_delete)
}

fn handle_memo_tag(ctx: &mut AppContext, action: MemoTagAction) -> Result<()> {
    let resp = match action {
        MemoTagAction::Rename { memo, old, new } => {
            ctx.api
                .rename_memo_tag(&ctx.request, &memo_name(&memo), &old, &new)?
        }
        MemoTagAction::Delete { memo, tag } => {
            ctx.api
                .delete_memo_tag(&ctx.request, &memo_name(&memo), &tag)?
        }
    };
    emit(ctx, &resp, render_memo_tag)
}

fn handle_rebuild(ctx: &mut AppContext) -> Result<()> {
    let report = ctx.api.rebuild_payloads(&ctx.request)?;
    emit(ctx, &report, render_rebuild)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_name_accepts_bare_uuid() {
        assert_eq!(memo_name("abc"), "memos/abc");
        assert_eq!(memo_name("memos/abc"), "memos/abc");
        assert_eq!(memo_name("-"), "memos/-");
    }

    #[test]
    fn test_read_content_joins_words() {
        let words = vec!["a".to_string(), "#b".to_string()];
        assert_eq!(read_content(words).unwrap(), "a #b");
    }
}
