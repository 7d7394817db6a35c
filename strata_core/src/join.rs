// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-completion joins.
//!
//! A chart draw issues geometry for every mark "at once" (from the surface's
//! point of view) and must not report completion until each mark's
//! transition, or immediate placement, has finished. Instead of chaining
//! callbacks, the core uses an explicit counter barrier: every pending
//! signal takes a [`CompletionTicket`], and the caller holds a single
//! [`DrawHandle`] that settles once all tickets have completed.

extern crate alloc;

use alloc::rc::Rc;
use core::cell::Cell;

/// The counter barrier behind one draw call.
#[derive(Debug, Default)]
pub struct DrawJoin {
    outstanding: Rc<Cell<usize>>,
}

impl DrawJoin {
    /// Creates a join with no outstanding tickets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket, incrementing the outstanding count.
    pub fn ticket(&self) -> CompletionTicket {
        self.outstanding.set(self.outstanding.get() + 1);
        CompletionTicket {
            outstanding: Rc::clone(&self.outstanding),
        }
    }

    /// Returns the shared aggregate handle.
    pub fn handle(&self) -> DrawHandle {
        DrawHandle {
            outstanding: Rc::clone(&self.outstanding),
        }
    }
}

/// A single pending completion signal.
///
/// Consumed by value so a signal can fire at most once. A ticket that is
/// dropped without [`CompletionTicket::complete`] leaves its join unsettled;
/// surfaces must complete every ticket they accept.
#[derive(Debug)]
pub struct CompletionTicket {
    outstanding: Rc<Cell<usize>>,
}

impl CompletionTicket {
    /// Marks this signal as finished.
    pub fn complete(self) {
        self.outstanding.set(self.outstanding.get().saturating_sub(1));
    }
}

/// The aggregate completion signal returned from a draw call.
#[derive(Clone, Debug)]
pub struct DrawHandle {
    outstanding: Rc<Cell<usize>>,
}

impl DrawHandle {
    /// Whether every issued ticket has completed.
    pub fn is_settled(&self) -> bool {
        self.outstanding.get() == 0
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn settles_only_after_every_ticket_completes() {
        let join = DrawJoin::new();
        let handle = join.handle();
        let a = join.ticket();
        let b = join.ticket();
        assert!(!handle.is_settled());
        a.complete();
        assert!(!handle.is_settled());
        b.complete();
        assert!(handle.is_settled());
    }

    #[test]
    fn join_with_no_tickets_is_settled() {
        let join = DrawJoin::new();
        assert!(join.handle().is_settled());
    }
}
