//! Bounded traversal of nested `MultiSend` batches.

use tracing::warn;

use crate::{constants::MAX_BATCH_DEPTH, decode_batch, SubCall};

/// A call seen while walking a transaction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Visit<'a> {
    /// Batch nesting level, 0 for the transaction itself.
    pub(crate) depth: usize,
    /// The batched sub-call, `None` for the transaction itself.
    pub(crate) call: Option<&'a SubCall>,
    /// Calldata of the visited call.
    pub(crate) data: &'a [u8],
}

/// Visits `data` and every sub-call of (nested) batches in execution order.
///
/// Uses an explicit work stack instead of recursion. Returns `true` if a batch nested deeper than
/// [`MAX_BATCH_DEPTH`] was skipped, in which case callers must fail closed.
pub(crate) fn walk_batches(data: &[u8], mut visit: impl FnMut(Visit<'_>)) -> bool {
    let mut depth_exceeded = false;
    let mut stack = Vec::new();

    visit(Visit { depth: 0, call: None, data });
    push_sub_calls(data, 0, &mut stack, &mut depth_exceeded);

    while let Some((call, depth)) = stack.pop() {
        visit(Visit { depth, call: Some(&call), data: &call.data });
        push_sub_calls(&call.data, depth, &mut stack, &mut depth_exceeded);
    }

    depth_exceeded
}

fn push_sub_calls(
    data: &[u8],
    depth: usize,
    stack: &mut Vec<(SubCall, usize)>,
    depth_exceeded: &mut bool,
) {
    let Some(calls) = decode_batch(data) else { return };
    if depth >= MAX_BATCH_DEPTH {
        warn!(depth, max = MAX_BATCH_DEPTH, "Batch nesting too deep, not unwinding further");
        *depth_exceeded = true;
        return;
    }
    stack.extend(calls.into_iter().rev().map(|call| (call, depth + 1)));
}
