//! Concrete indicator state handlers and table builder.
//!
//! ```text
//!  IDLE ──[motion active]──▶ ACTIVE
//!    ▲ ◀──[motion ended]────── │
//!    │                         │
//!    └──[flash requested]──────┴──▶ FLASHING ──[duration elapsed]──▶ IDLE | ACTIVE
//!                                     ▲    │
//!                                     └────┘ [flash requested: restart]
//! ```

use super::context::{FsmContext, flash_output};
use super::{StateDescriptor, StateId};
use log::{debug, info};

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Active
        StateDescriptor {
            id: StateId::Active,
            name: "Active",
            on_enter: Some(active_enter),
            on_exit: None,
            on_update: active_update,
        },
        // Index 2 — Flashing
        StateDescriptor {
            id: StateId::Flashing,
            name: "Flashing",
            on_enter: Some(flashing_enter),
            on_exit: Some(flashing_exit),
            on_update: flashing_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.led_on = false;
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.flash_requested {
        return Some(StateId::Flashing);
    }
    if ctx.motion_active {
        return Some(StateId::Active);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter(ctx: &mut FsmContext) {
    ctx.led_on = true;
}

fn active_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.flash_requested {
        return Some(StateId::Flashing);
    }
    if !ctx.motion_active {
        return Some(StateId::Idle);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FLASHING
// ═══════════════════════════════════════════════════════════════════════════

fn flashing_enter(ctx: &mut FsmContext) {
    ctx.flash_requested = false;
    ctx.led_on = true;
    info!(
        "FLASHING: {} ms at {} ms per phase",
        ctx.flash_duration_ms, ctx.blink_interval_ms
    );
}

fn flashing_exit(ctx: &mut FsmContext) {
    debug!("FLASHING: left after {} ms", ctx.ms_in_state);
}

fn flashing_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.flash_requested {
        info!("FLASHING: re-triggered, sequence restarted");
        return Some(StateId::Flashing);
    }

    if ctx.flash_finished() {
        return Some(if ctx.motion_active {
            StateId::Active
        } else {
            StateId::Idle
        });
    }

    ctx.led_on = flash_output(ctx.ms_in_state, ctx.blink_interval_ms);
    None
}
