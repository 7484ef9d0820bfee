//! Payload rebuild runner.
//!
//! Walks every memo in the store, comments and all owners included, and
//! recomputes its payload from the current content. Used after a parser
//! change or when loading a data file written without payloads.
//!
//! Failures on a single memo are logged and counted; the run carries on.
//! Cancellation stops the run between memos.

use super::ContentCodec;
use crate::context::RequestContext;
use crate::error::Result;
use crate::model::Memo;
use crate::store::{FindMemo, MemoStore, UpdateMemo};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

fn rebuild_one<S: MemoStore>(store: &mut S, codec: ContentCodec<'_>, memo: &Memo) -> Result<()> {
    let payload = codec.payload_for(&memo.content)?;
    store.update_memo(&UpdateMemo {
        id: memo.id,
        content: None,
        payload: Some(payload),
    })
}

pub fn rebuild_payloads<S: MemoStore>(
    store: &mut S,
    ctx: &RequestContext,
    codec: ContentCodec<'_>,
    batch_size: usize,
) -> Result<RebuildReport> {
    let batch_size = batch_size.max(1);
    let mut report = RebuildReport::default();
    let mut offset = 0;

    loop {
        let batch = store.list_memos(&FindMemo::default().page(offset, batch_size))?;
        if batch.is_empty() {
            break;
        }
        for memo in &batch {
            ctx.ensure_active()?;
            report.processed += 1;
            match rebuild_one(store, codec, memo) {
                Ok(()) => report.succeeded += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        "event=payload_rebuild module=commands status=error memo={} err={}",
                        memo.id, err
                    );
                }
            }
        }
        if batch.len() < batch_size {
            break;
        }
        offset += batch.len();
    }

    info!(
        "event=payload_rebuild module=commands status=ok processed={} succeeded={} failed={}",
        report.processed, report.succeeded, report.failed
    );
    Ok(report)
}
