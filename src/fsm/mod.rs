//! Function-pointer finite state machine engine for the status indicator.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable                                              │
//! │  ┌──────────┬───────────┬──────────┬───────────────────┐ │
//! │  │ StateId  │ on_enter  │ on_exit  │ on_update         │ │
//! │  ├──────────┼───────────┼──────────┼───────────────────┤ │
//! │  │ Idle     │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ Active   │ fn(ctx)   │ -        │ fn(ctx)->Option<> │ │
//! │  │ Flashing │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │ │
//! │  └──────────┴───────────┴──────────┴───────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  All functions receive `&mut FsmContext`, which
//! holds the clock reading, the motion/flash inputs and the LED output.
//!
//! Timing is in milliseconds of uptime rather than ticks: the control
//! loop does not run at a fixed rate.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Indicator states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum StateId {
    /// LED off, no recent motion.
    Idle = 0,
    /// LED on while motion is active.
    Active = 1,
    /// Fixed-length blink sequence after a confirmed target.
    Flashing = 2,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `StateId`.  Asserts in debug builds;
    /// falls back to `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Active,
            2 => Self::Flashing,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Active => "Active",
            Self::Flashing => "Flashing",
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

/// A completed transition, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Uptime at which the current state was entered.
    state_entry_ms: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            state_entry_ms: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("LED FSM starting in state: {}", self.table[self.current].name);
        self.state_entry_ms = ctx.now_ms;
        ctx.ms_in_state = 0;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM once.  `ctx.now_ms` must already hold the current uptime.
    ///
    /// A handler may return its own state to re-enter it; the exit and
    /// enter actions run again and `ms_in_state` restarts from zero.
    pub fn tick(&mut self, ctx: &mut FsmContext) -> Option<Transition> {
        ctx.ms_in_state = ctx.now_ms.saturating_sub(self.state_entry_ms);

        let next = (self.table[self.current].on_update)(ctx)?;
        Some(self.transition(next, ctx))
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) -> Transition {
        let from = self.current_state();
        let next_idx = next_id as usize;

        info!(
            "LED FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.state_entry_ms = ctx.now_ms;
        ctx.ms_in_state = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }

        Transition { from, to: next_id }
    }
}
