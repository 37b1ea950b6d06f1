//! Application service — the hexagonal core.
//!
//! [`ControllerService`] owns the session, the indicator FSM, the line
//! reader and the operator command queue.  It exposes a hardware-agnostic
//! API; all I/O flows through port traits injected at call sites, so the
//! whole controller is testable with mock adapters.
//!
//! ```text
//!  MotionLatch ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!    TimePort ──▶  │    ControllerService     │
//!    LinkPort ◀──▶ │ Session · LED FSM · Link │ ──▶ IndicatorPort
//!                  └──────────────────────────┘
//! ```

use heapless::String;
use log::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::Result;
use crate::events::MotionLatch;
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::link::{LineReader, Message, Outbound, encode_line};
use crate::pins;
use crate::session::{MotionOutcome, Session, TargetUpdate};

use super::commands::{CommandQueue, LocalCommand};
use super::events::{AppEvent, DropReason, StatusSnapshot, Verdict};
use super::ports::{EventSink, IndicatorPort, LinkPort, TimePort};

/// Bytes pulled from the link per read call.
const READ_CHUNK: usize = 32;

/// Guard on read calls per tick.  Covers twice the driver ring buffer plus
/// the hardware FIFO, so anything buffered when the tick starts is always
/// drained; only a link that keeps refilling faster than we read hits it.
const MAX_READS_PER_TICK: usize =
    2 * (pins::UART_RX_BUF as usize + pins::UART_HW_FIFO_LEN).div_ceil(READ_CHUNK);

// ───────────────────────────────────────────────────────────────
// ControllerService
// ───────────────────────────────────────────────────────────────

pub struct ControllerService {
    config: ControllerConfig,
    session: Session,
    fsm: Fsm,
    ctx: FsmContext,
    reader: LineReader,
    commands: CommandQueue,
    /// Uptime of the most recent consumed motion edge.
    last_motion_ms: Option<u64>,
    last_heartbeat_ms: u64,
    /// Uptime at the start of the most recent tick.
    now_ms: u64,
    /// Level last written to the indicator port.
    led_written: bool,
    motion_events: u32,
    /// Latch edge counter as of the last tick.
    pir_edges: u32,
}

impl ControllerService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig) -> Self {
        let ctx = FsmContext::new(&config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);
        let session = Session::new(config.default_target);

        Self {
            config,
            session,
            fsm,
            ctx,
            reader: LineReader::new(),
            commands: CommandQueue::new(),
            last_motion_ms: None,
            last_heartbeat_ms: 0,
            now_ms: 0,
            led_written: false,
            motion_events: 0,
            pir_edges: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the LED to its idle level and announce the boot to the companion.
    pub fn start(
        &mut self,
        clock: &impl TimePort,
        hw: &mut (impl LinkPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        self.now_ms = clock.uptime_ms();
        self.last_heartbeat_ms = self.now_ms;
        self.ctx.now_ms = self.now_ms;
        self.fsm.start(&mut self.ctx);
        self.led_written = self.ctx.led_on;
        hw.set_indicator(self.led_written);

        self.send(Outbound::Booting, hw, sink);
        sink.emit(&AppEvent::Started(self.session.target()));
        info!("ControllerService started, target {}", self.session.target());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`LinkPort`] and
    /// [`IndicatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        clock: &impl TimePort,
        hw: &mut (impl LinkPort + IndicatorPort),
        latch: &MotionLatch,
        sink: &mut impl EventSink,
    ) {
        let now = clock.uptime_ms();
        self.now_ms = now;

        // 1. Drain companion input
        self.drain_input(now, hw, sink);

        // 2. Consume the motion latch
        let motion = latch.take();
        self.pir_edges = latch.edge_count();
        if motion {
            self.last_motion_ms = Some(now);
            self.motion_events = self.motion_events.wrapping_add(1);
        }

        // 3. Idle -> AwaitingResponse
        if motion {
            self.offer_motion(now, hw, sink);
        }

        // 4. Response timeout and liveness
        if let Some(waited_ms) = self.session.check_timeout(now, self.config.response_timeout_ms) {
            sink.emit(&AppEvent::RequestTimedOut { waited_ms });
        }
        if self.session.check_liveness(now, self.config.liveness_stale_ms) {
            let silent_ms = now.saturating_sub(self.session.last_liveness_ms());
            warn!("Companion silent for {} ms", silent_ms);
            sink.emit(&AppEvent::LivenessStale { silent_ms });
        }

        // 5. Indicator
        self.update_indicator(now, hw, sink);

        // 6. Heartbeat
        if now.saturating_sub(self.last_heartbeat_ms) >= u64::from(self.config.heartbeat_interval_ms) {
            self.last_heartbeat_ms = now;
            self.send(Outbound::Heartbeat, hw, sink);
            sink.emit(&AppEvent::Heartbeat(self.status()));
        }

        // 7. At most one operator command
        if let Some(cmd) = self.commands.pop() {
            self.handle_command(cmd, hw, sink);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an operator command immediately.
    pub fn handle_command(
        &mut self,
        cmd: LocalCommand,
        hw: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            LocalCommand::SetTarget(raw) => {
                if let Err(e) = self.set_target(&raw, hw, sink) {
                    debug!("Queued SET_TARGET not applied: {}", e);
                }
            }
            LocalCommand::TestFlash => self.request_test_flash(sink),
        }
    }

    /// Change the target animal.
    ///
    /// The new value takes effect locally at once and is forwarded to a
    /// ready companion.  No acknowledgment is awaited.
    pub fn set_target(
        &mut self,
        candidate: &str,
        hw: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) -> Result<TargetUpdate> {
        let update = self.session.set_target(candidate);
        match update {
            Ok(TargetUpdate::Changed { from, to }) => {
                if self.session.companion_ready() {
                    self.send(Outbound::TargetAnimal(to), hw, sink);
                } else {
                    debug!("Target {} set locally; companion not ready", to);
                }
                sink.emit(&AppEvent::TargetChanged { from, to });
            }
            Ok(TargetUpdate::Unchanged(animal)) => {
                sink.emit(&AppEvent::TargetUnchanged(animal));
            }
            Err(e) => {
                warn!("SET_TARGET:{} rejected: {}", candidate.trim(), e);
                sink.emit(&AppEvent::TargetRejected);
            }
        }
        update
    }

    /// Start (or restart) one flash sequence without a companion verdict.
    pub fn request_test_flash(&mut self, sink: &mut impl EventSink) {
        self.ctx.flash_requested = true;
        sink.emit(&AppEvent::FlashTest);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            uptime_ms: self.now_ms,
            companion_ready: self.session.companion_ready(),
            target: self.session.target(),
            request_outstanding: self.session.request_outstanding(),
            indicator: self.fsm.current_state(),
            motion_active: self.motion_active(self.now_ms),
            motion_events: self.motion_events,
            pir_edges: self.pir_edges,
            lines_dropped: self.reader.dropped(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn indicator_state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Level last written to the LED.
    pub fn led_on(&self) -> bool {
        self.led_written
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Motion counts as active for `motion_active_ms` after the last edge.
    pub fn motion_active(&self, now_ms: u64) -> bool {
        self.last_motion_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < u64::from(self.config.motion_active_ms))
    }

    // ── Internal ──────────────────────────────────────────────

    /// Read until the link reports no more bytes, dispatching each line
    /// as it completes.
    fn drain_input(&mut self, now: u64, hw: &mut impl LinkPort, sink: &mut impl EventSink) {
        let mut buf = [0u8; READ_CHUNK];
        for _ in 0..MAX_READS_PER_TICK {
            let n = match hw.read(&mut buf) {
                Ok(0) => return,
                Ok(n) => n,
                Err(e) => {
                    warn!("Link read failed: {}", e);
                    sink.emit(&AppEvent::LinkFault(e));
                    return;
                }
            };
            for &byte in &buf[..n] {
                if let Some(line) = self.reader.feed(byte) {
                    self.dispatch(&line, now, hw, sink);
                }
            }
        }
        warn!("Link still busy after {} reads; rest left for next tick", MAX_READS_PER_TICK);
    }

    fn dispatch(&mut self, line: &str, now: u64, hw: &mut impl LinkPort, sink: &mut impl EventSink) {
        match Message::parse(line) {
            Message::PiReady => {
                self.session.on_companion_ready(now);
                self.send(Outbound::TargetAnimal(self.session.target()), hw, sink);
                sink.emit(&AppEvent::CompanionReady);
            }
            Message::PiShuttingDown => {
                let request_abandoned = self.session.on_companion_shutdown();
                sink.emit(&AppEvent::CompanionShutdown { request_abandoned });
            }
            Message::PiPong => self.session.on_liveness_reply(now),
            Message::AckTarget(animal) => {
                let matches = animal == Some(self.session.target());
                if !matches {
                    warn!(
                        "Companion acknowledged {:?}, current target is {}",
                        animal,
                        self.session.target()
                    );
                }
                sink.emit(&AppEvent::TargetAcknowledged { animal, matches });
            }
            Message::Confirmed(animal) => {
                let outstanding = self.session.resolve_request();
                let target = self.session.target();
                let verdict = if animal == Some(target) {
                    self.ctx.flash_requested = true;
                    Verdict::TargetConfirmed(target)
                } else {
                    Verdict::OtherConfirmed(animal)
                };
                sink.emit(&AppEvent::RequestResolved { verdict, outstanding });
            }
            Message::Rejected(reason) => {
                let outstanding = self.session.resolve_request();
                sink.emit(&AppEvent::RequestResolved {
                    verdict: Verdict::Rejected(reason),
                    outstanding,
                });
            }
            Message::SetTarget(arg) => match String::try_from(arg) {
                Ok(raw) => self.enqueue(LocalCommand::SetTarget(raw), sink),
                Err(()) => sink.emit(&AppEvent::CommandDropped),
            },
            Message::TestFlash => self.enqueue(LocalCommand::TestFlash, sink),
            Message::Unknown(text) => {
                debug!("Ignoring line: {}", text);
                sink.emit(&AppEvent::LineIgnored);
            }
        }
    }

    fn enqueue(&mut self, cmd: LocalCommand, sink: &mut impl EventSink) {
        if let Err(dropped) = self.commands.push(cmd) {
            warn!("Command queue full, dropping {:?}", dropped);
            sink.emit(&AppEvent::CommandDropped);
        }
    }

    fn offer_motion(&mut self, now: u64, hw: &mut impl LinkPort, sink: &mut impl EventSink) {
        match self.session.on_motion(now) {
            MotionOutcome::Requested => {
                self.send(Outbound::MotionDetected, hw, sink);
                sink.emit(&AppEvent::RequestIssued);
            }
            MotionOutcome::CompanionNotReady => {
                sink.emit(&AppEvent::MotionDropped(DropReason::CompanionNotReady));
            }
            MotionOutcome::RequestInFlight => {
                sink.emit(&AppEvent::MotionDropped(DropReason::RequestInFlight));
            }
        }
    }

    fn update_indicator(&mut self, now: u64, hw: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        self.ctx.now_ms = now;
        self.ctx.motion_active = self.motion_active(now);

        if let Some(t) = self.fsm.tick(&mut self.ctx) {
            sink.emit(&AppEvent::IndicatorChanged { from: t.from, to: t.to });
        }

        if self.ctx.led_on != self.led_written {
            self.led_written = self.ctx.led_on;
            hw.set_indicator(self.led_written);
        }
    }

    /// Format and write one line.  Failures are reported, never propagated.
    fn send(&mut self, msg: Outbound, hw: &mut impl LinkPort, sink: &mut impl EventSink) {
        let result = encode_line(&msg).and_then(|line| hw.write_line(&line));
        if let Err(e) = result {
            warn!("Failed to send {}: {}", msg, e);
            sink.emit(&AppEvent::LinkFault(e));
        }
    }
}
