//! Combat State Machine
//!
//! One `CombatActor` per fighter. The scene drives it with:
//!
//! 1. Collaborator signals between ticks (`anim_cancel_point`,
//!    `receive_hit`, `open_combo_window`, ...)
//! 2. One `tick` per fixed step with that step's `InputFrame`
//!
//! Every call that changes something queues `Command`s for the animation,
//! movement and VFX drivers. Requests that are illegal in the current state
//! are dropped without touching anything.
//!
//! Per tick:
//! ```text
//! advance clock ─▶ parry deadlines ─▶ stunned? ──yes──▶ count down, stop
//!                                        │no
//!                                        ▼
//!                       combo elapsed ─▶ buttons ─▶ movement policy
//! ```

use std::fmt;
use tracing::{debug, trace};

use crate::combat::commands::{AnimTrigger, Command, CommandData, MoveKind};
use crate::combat::damage::{self, DamageOutcome, HitEvent};
use crate::combat::input::{Button, InputFrame};
use crate::combat::judge::{ComboWindow, TimingQuality, Verdict};
use crate::combat::parry::{ParryPhase, ParryTransition, ParryWindow};
use crate::combat::state::{ActorId, AttackKind, Capabilities, CombatState};
use crate::config::ActorConfig;
use crate::core::fixed::{self, Fixed, Timestamp};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::vec2::FixedVec2;
use crate::core::vec3::FixedVec3;
use crate::error::{CombatError, Result};
use crate::rhythm::clock::ClockHandle;

// =============================================================================
// TICK CONTEXT
// =============================================================================

/// Scene data an actor reads during its tick.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'a> {
    /// Step length (seconds)
    pub dt: Fixed,
    /// Actor's current world position
    pub position: FixedVec3,
    /// Positions of the other actors in the scene
    pub others: &'a [FixedVec3],
}

impl<'a> TickContext<'a> {
    /// Context for an actor alone in the scene.
    pub fn solo(dt: Fixed, position: FixedVec3) -> Self {
        Self { dt, position, others: &[] }
    }
}

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Commands queued since the previous drain, in emission order
    pub commands: Vec<Command>,
    /// Hit stun consumed this tick
    pub stunned: bool,
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builder for `CombatActor`. A rhythm clock is mandatory.
pub struct CombatActorBuilder {
    id: ActorId,
    config: ActorConfig,
    clock: Option<ClockHandle>,
}

impl CombatActorBuilder {
    /// Use this config instead of the default.
    pub fn config(mut self, config: ActorConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared rhythm clock.
    pub fn clock(mut self, clock: ClockHandle) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<CombatActor> {
        let clock = self.clock.ok_or(CombatError::ClockUnavailable(self.id))?;
        self.config.validate()?;

        debug!("Built {} with {} hp", self.id, self.config.max_hp);

        Ok(CombatActor {
            id: self.id,
            state: CombatState::Idle,
            caps: Capabilities::default(),
            combo: ComboWindow::default(),
            parry: ParryWindow::new(self.config.parry_timings()),
            hit_stun: 0,
            hp: self.config.max_hp,
            now: 0,
            tick: 0,
            forward: FixedVec2::FORWARD,
            aim: FixedVec2::ZERO,
            last_timing: None,
            commands: Vec::new(),
            config: self.config,
            clock,
        })
    }
}

// =============================================================================
// ACTOR
// =============================================================================

/// A fighter's combat state.
pub struct CombatActor {
    id: ActorId,
    config: ActorConfig,
    clock: ClockHandle,

    /// Stored state; `Stunned` is derived from `hit_stun`
    state: CombatState,
    caps: Capabilities,
    combo: ComboWindow,
    parry: ParryWindow,

    /// Remaining stun (seconds)
    hit_stun: Fixed,
    hp: i32,

    /// Monotonic actor time
    now: Timestamp,
    tick: u32,

    /// Facing on the horizontal plane
    forward: FixedVec2,
    /// Commanded launch velocity
    aim: FixedVec2,
    last_timing: Option<TimingQuality>,

    commands: Vec<Command>,
}

impl fmt::Debug for CombatActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatActor")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("caps", &self.caps)
            .field("combo", &self.combo)
            .field("parry", &self.parry)
            .field("hit_stun", &self.hit_stun)
            .field("hp", &self.hp)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl CombatActor {
    /// Start building an actor.
    pub fn builder(id: ActorId) -> CombatActorBuilder {
        CombatActorBuilder {
            id,
            config: ActorConfig::default(),
            clock: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Actor identifier.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Current state; `Stunned` while hit stun is counting down.
    pub fn state(&self) -> CombatState {
        if self.is_stunned() {
            CombatState::Stunned
        } else {
            self.state
        }
    }

    /// Is hit stun running?
    #[inline]
    pub fn is_stunned(&self) -> bool {
        self.hit_stun > 0
    }

    /// Capability flags.
    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Combo window.
    pub fn combo_window(&self) -> ComboWindow {
        self.combo
    }

    /// Parry timer phase at the actor's current time.
    pub fn parry_phase(&self) -> ParryPhase {
        self.parry.phase(self.now)
    }

    /// Remaining hit stun.
    pub fn hit_stun(&self) -> Fixed {
        self.hit_stun
    }

    /// Hit points. May be zero or negative; death is the scene's call.
    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Actor time.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Ticks run.
    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    /// Facing direction.
    pub fn forward(&self) -> FixedVec2 {
        self.forward
    }

    /// Commanded launch velocity (zero outside a launch).
    pub fn aim(&self) -> FixedVec2 {
        self.aim
    }

    /// Quality of the last judged attack.
    pub fn last_timing(&self) -> Option<TimingQuality> {
        self.last_timing
    }

    /// Config in use.
    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    /// Drain queued commands.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    fn emit(&mut self, data: CommandData) {
        self.commands.push(Command::new(self.tick, self.id, data));
    }

    // -------------------------------------------------------------------------
    // Requests (input and collaborator signals)
    // -------------------------------------------------------------------------

    /// Attack. Legal from `Idle`, or from `Attacking` once the cancel point
    /// has cleared `blocked`.
    ///
    /// Returns the verdict, or `None` if rejected.
    pub fn request_attack(&mut self, kind: AttackKind) -> Option<Verdict> {
        let legal = match self.state {
            CombatState::Idle => true,
            CombatState::Attacking => !self.caps.blocked,
            _ => false,
        };
        if self.is_stunned() || !legal {
            trace!("{} attack rejected in {:?}", self.id, self.state());
            return None;
        }

        let verdict = self.combo.classify(self.clock.leeway(), self.clock.timing_key());
        self.combo.reset();

        self.state = CombatState::Attacking;
        self.caps.blocked = true;
        self.caps.can_move = false;
        self.last_timing = Some(verdict.quality());

        let trigger = if verdict.is_special_miss() {
            AnimTrigger::Missed
        } else {
            kind.trigger()
        };
        self.emit(CommandData::Animation { trigger });

        debug!("{} {:?} attack judged {:?}", self.id, kind, verdict);
        Some(verdict)
    }

    /// Animation reached its cancel point.
    pub fn anim_cancel_point(&mut self) -> bool {
        if self.state != CombatState::Attacking {
            return false;
        }
        self.caps.blocked = false;
        self.caps.can_move = false;
        true
    }

    /// Attack (or launch) animation finished.
    pub fn anim_attack_end(&mut self) -> bool {
        if !matches!(self.state, CombatState::Attacking | CombatState::Launching) {
            trace!("{} attack end ignored in {:?}", self.id, self.state);
            return false;
        }
        self.state = CombatState::Idle;
        self.combo.reset();
        self.aim = FixedVec2::ZERO;
        self.caps.clear_attack();
        debug!("{} back to idle", self.id);
        true
    }

    /// Animation allows movement from here on.
    pub fn anim_move_allowed(&mut self) {
        self.caps.can_move = true;
    }

    /// Parry. Needs the window ready and no hit stun. Interrupts an attack
    /// or a launch.
    pub fn request_parry(&mut self) -> bool {
        if self.is_stunned() || !self.parry.try_start(self.now) {
            trace!("{} parry rejected ({:?})", self.id, self.parry.phase(self.now));
            return false;
        }
        self.state = CombatState::Parrying;
        self.caps.clear_attack();
        self.aim = FixedVec2::ZERO;
        self.emit(CommandData::Shield { visible: true });
        debug!(
            "{} parry until {:.3}",
            self.id,
            fixed::timestamp_to_float(self.parry.active_until())
        );
        true
    }

    /// Dodge. Only plays the animation.
    pub fn request_dodge(&mut self) -> bool {
        if self.caps.dodging || self.is_stunned() {
            return false;
        }
        self.emit(CommandData::Animation { trigger: AnimTrigger::Dodge });
        true
    }

    /// Launch backwards along the facing at `units` per second.
    pub fn request_launch(&mut self, units: Fixed) {
        self.state = CombatState::Launching;
        self.caps.clear_attack();
        self.aim = self.forward.scale(-units);
        debug!("{} launched {}", self.id, self.aim);
    }

    /// Launch finished.
    pub fn end_launch(&mut self) -> bool {
        if self.state != CombatState::Launching {
            return false;
        }
        self.state = CombatState::Idle;
        self.aim = FixedVec2::ZERO;
        true
    }

    /// Open a combo window of `eighth_notes` half-beats and ask the clock
    /// to show it.
    pub fn open_combo_window(&mut self, eighth_notes: u32) {
        let half_beat = self.clock.beat_length() / 2;
        let notes = Fixed::try_from(eighth_notes).unwrap_or(Fixed::MAX);
        let max_window = half_beat.saturating_mul(notes);

        self.combo.open(max_window);
        if self.combo.is_open() {
            self.clock.request_arrow_spawn(max_window, 0);
        }
        debug!("{} combo window {:.3}s", self.id, fixed::to_float(max_window));
    }

    /// Leave an afterimage at the current facing.
    pub fn spawn_shadow_clone(&mut self, fade_speed: Fixed) {
        let forward = self.forward;
        self.emit(CommandData::SpawnShadowClone { fade_speed, forward });
    }

    /// Take a hit at world position `position`.
    pub fn receive_hit(&mut self, hit: &HitEvent, position: FixedVec3) -> DamageOutcome {
        let outcome = damage::resolve(hit, self.state, position);

        match outcome {
            DamageOutcome::NoEffect => {
                debug!("{} parried a {} damage hit", self.id, hit.damage);
            }
            DamageOutcome::Applied(applied) => {
                self.hp = self.hp.saturating_add(applied.hp_delta);
                self.hit_stun = applied.hit_stun;
                self.state = CombatState::Idle;
                self.aim = FixedVec2::ZERO;
                self.caps.clear_attack();
                self.combo.reset();

                self.emit(CommandData::PlayIdlePose);
                self.emit(CommandData::Move {
                    kind: MoveKind::Knockback,
                    displacement: applied.knockback,
                });
                debug!(
                    "{} hit for {}, hp {}, stun {:.3}",
                    self.id,
                    hit.damage,
                    self.hp,
                    fixed::to_float(self.hit_stun)
                );
            }
        }
        outcome
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Run one fixed step.
    pub fn tick(&mut self, input: &InputFrame, ctx: &TickContext<'_>) -> TickResult {
        let dt = ctx.dt.max(0);
        self.tick = self.tick.wrapping_add(1);
        self.now = self.now.saturating_add(i64::from(dt));

        if let Some(ParryTransition::ActiveEnded) = self.parry.update(self.now) {
            self.emit(CommandData::Shield { visible: false });
            if self.state == CombatState::Parrying {
                self.state = CombatState::Idle;
            }
            debug!("{} parry ended", self.id);
        }

        if self.is_stunned() {
            self.hit_stun = (self.hit_stun - dt).max(0);
            return TickResult {
                commands: self.take_commands(),
                stunned: true,
            };
        }

        self.combo.accumulate(dt);
        self.dispatch_buttons(input);
        self.apply_movement(input, ctx);

        #[cfg(feature = "debug-tracing")]
        trace!(
            "{} tick {} state {:?} combo {:?}",
            self.id,
            self.tick,
            self.state,
            self.combo
        );

        TickResult {
            commands: self.take_commands(),
            stunned: false,
        }
    }

    /// Presses are forwarded every tick; each request checks its own
    /// preconditions.
    fn dispatch_buttons(&mut self, input: &InputFrame) {
        if !input.any_pressed() {
            return;
        }
        if input.pressed(Button::Attack1) {
            self.request_attack(AttackKind::Light);
        }
        if input.pressed(Button::Attack2) {
            self.request_attack(AttackKind::Heavy);
        }
        if input.pressed(Button::Parry) {
            self.request_parry();
        }
        if input.pressed(Button::Dodge) {
            self.request_dodge();
        }
    }

    fn movement_permitted(&self) -> bool {
        self.caps.can_move || (self.state == CombatState::Attacking && !self.caps.blocked)
    }

    fn apply_movement(&mut self, input: &InputFrame, ctx: &TickContext<'_>) {
        if self.state.is_free() {
            self.walk(input, ctx.dt);
            self.rotate(input, ctx);
        } else if self.movement_permitted() {
            self.walk(input, ctx.dt);
        } else if self.state == CombatState::Launching {
            let displacement = self.aim.scale(ctx.dt);
            if !displacement.is_zero() {
                self.emit(CommandData::Move { kind: MoveKind::Launch, displacement });
            }
        }
    }

    fn walk(&mut self, input: &InputFrame, dt: Fixed) {
        let displacement = input.move_direction().scale(self.config.speed).scale(dt);
        if !displacement.is_zero() {
            self.emit(CommandData::Move { kind: MoveKind::Walk, displacement });
        }
    }

    fn rotate(&mut self, input: &InputFrame, ctx: &TickContext<'_>) {
        let target = if input.uses_directional_device() {
            let aim = input.aim_direction();
            let movement = input.move_direction();
            if aim.exceeds(self.config.controller_dead_zone) {
                Some(-aim)
            } else if !movement.is_zero() {
                Some(-movement)
            } else {
                None
            }
        } else {
            // Face away from the others; the last one listed wins
            let here = ctx.position.horizontal();
            ctx.others
                .iter()
                .map(|other| here - other.horizontal())
                .filter(|away| !away.is_zero())
                .last()
        };

        let Some(direction) = target else { return };
        let forward = direction.normalize();
        if !forward.is_zero() && forward != self.forward {
            self.forward = forward;
            self.emit(CommandData::Face { forward });
        }
    }

    // -------------------------------------------------------------------------
    // Hashing
    // -------------------------------------------------------------------------

    /// Deterministic hash of the combat state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            hasher.update_u32(self.id.0);
            hasher.update_u8(self.state as u8);
            hasher.update_bool(self.caps.blocked);
            hasher.update_bool(self.caps.can_move);
            hasher.update_bool(self.caps.dodging);
            hasher.update_fixed(self.combo.elapsed);
            hasher.update_fixed(self.combo.max_window);
            hasher.update_bool(self.parry.is_active());
            hasher.update_i64(self.parry.active_until());
            hasher.update_i64(self.parry.available_at());
            hasher.update_fixed(self.hit_stun);
            hasher.update_i32(self.hp);
            hasher.update_i64(self.now);
            hasher.update_vec2(self.forward);
            hasher.update_vec2(self.aim);
            hasher.update_u8(self.last_timing.map_or(u8::MAX, |q| q as u8));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::core::fixed::{to_fixed, FIXED_ONE, TICK_DURATION};
    use crate::rhythm::clock::{BeatQuality, Leeway, RhythmClock, TimingKey};
    use crate::rhythm::metronome::{Metronome, MetronomeConfig};

    /// Clock with a settable key that records arrow requests.
    struct StubClock {
        key: Cell<TimingKey>,
        arrows: RefCell<Vec<(Fixed, Fixed)>>,
    }

    impl StubClock {
        fn new(key: TimingKey) -> Rc<Self> {
            Rc::new(Self {
                key: Cell::new(key),
                arrows: RefCell::new(Vec::new()),
            })
        }
    }

    impl RhythmClock for StubClock {
        fn beat_length(&self) -> Fixed {
            // 120 BPM
            FIXED_ONE / 2
        }

        fn timing_key(&self) -> TimingKey {
            self.key.get()
        }

        fn leeway(&self) -> Leeway {
            Leeway::from_percent(20, 60)
        }

        fn request_arrow_spawn(&self, window: Fixed, offset: Fixed) {
            self.arrows.borrow_mut().push((window, offset));
        }
    }

    fn actor_with(clock: Rc<StubClock>) -> CombatActor {
        CombatActor::builder(ActorId(1)).clock(clock).build().unwrap()
    }

    fn actor() -> CombatActor {
        actor_with(StubClock::new(TimingKey::Beat(BeatQuality::Perfect)))
    }

    fn idle_ticks(actor: &mut CombatActor, n: usize) -> Vec<Command> {
        let ctx = TickContext::solo(TICK_DURATION, FixedVec3::ZERO);
        let mut out = Vec::new();
        for _ in 0..n {
            out.extend(actor.tick(&InputFrame::new(), &ctx).commands);
        }
        out
    }

    fn hit(damage: i32) -> HitEvent {
        HitEvent {
            damage,
            hit_stun: to_fixed(0.25),
            knockback: FIXED_ONE,
            source_position: FixedVec3::new(-FIXED_ONE, 0, 0),
        }
    }

    #[test]
    fn test_builder_requires_clock() {
        let err = CombatActor::builder(ActorId(7)).build().unwrap_err();
        assert!(matches!(err, CombatError::ClockUnavailable(ActorId(7))));
    }

    #[test]
    fn test_builder_validates_config() {
        let config = ActorConfig { max_hp: -1, ..Default::default() };
        let result = CombatActor::builder(ActorId(1))
            .config(config)
            .clock(StubClock::new(TimingKey::Miss))
            .build();
        assert!(matches!(result, Err(CombatError::InvalidConfig(_))));
    }

    #[test]
    fn test_fresh_actor() {
        let a = actor();
        assert_eq!(a.state(), CombatState::Idle);
        assert_eq!(a.hp(), 10);
        assert_eq!(a.forward(), FixedVec2::FORWARD);
        assert_eq!(a.parry_phase(), ParryPhase::Ready);
        assert_eq!(a.last_timing(), None);
    }

    #[test]
    fn test_second_attack_rejected_until_attack_end() {
        let mut a = actor();
        assert_eq!(
            a.request_attack(AttackKind::Light),
            Some(Verdict::Judged(TimingQuality::Perfect))
        );
        let hash = a.compute_hash();
        let queued = a.take_commands();
        assert_eq!(queued[0].trigger(), Some(AnimTrigger::Light));

        // Rejection changes nothing and emits nothing
        assert_eq!(a.request_attack(AttackKind::Heavy), None);
        assert_eq!(a.compute_hash(), hash);
        assert!(a.take_commands().is_empty());

        assert!(a.anim_attack_end());
        assert_eq!(a.state(), CombatState::Idle);
        assert!(a.request_attack(AttackKind::Heavy).is_some());
    }

    #[test]
    fn test_cancel_point_allows_chaining() {
        let mut a = actor();
        a.request_attack(AttackKind::Light);
        assert!(a.capabilities().blocked);

        assert!(a.anim_cancel_point());
        assert_eq!(a.state(), CombatState::Attacking);
        assert!(!a.capabilities().blocked);
        assert!(a.request_attack(AttackKind::Heavy).is_some());
    }

    #[test]
    fn test_cancel_point_outside_attack_ignored() {
        let mut a = actor();
        assert!(!a.anim_cancel_point());
        assert!(!a.anim_attack_end());
        assert!(!a.end_launch());
    }

    #[test]
    fn test_no_beat_is_special_miss() {
        let mut a = actor_with(StubClock::new(TimingKey::Miss));
        assert_eq!(a.request_attack(AttackKind::Light), Some(Verdict::SpecialMiss));
        assert_eq!(a.state(), CombatState::Attacking);
        assert_eq!(a.last_timing(), Some(TimingQuality::Miss));
        assert_eq!(a.take_commands()[0].trigger(), Some(AnimTrigger::Missed));
    }

    #[test]
    fn test_combo_window_perfect() {
        let clock = StubClock::new(TimingKey::Miss);
        let mut a = actor_with(clock.clone());

        // 4 eighth notes at 120 BPM = 1.0s
        a.open_combo_window(4);
        assert_eq!(a.combo_window().max_window, FIXED_ONE);
        assert_eq!(clock.arrows.borrow().as_slice(), &[(FIXED_ONE, 0)]);

        // 42 ticks ≈ 0.7s = 70% of the window
        idle_ticks(&mut a, 42);
        assert_eq!(
            a.request_attack(AttackKind::Light),
            Some(Verdict::Judged(TimingQuality::Perfect))
        );
        assert!(!a.combo_window().is_open());
    }

    #[test]
    fn test_combo_window_too_early() {
        let mut a = actor();
        a.open_combo_window(4);
        idle_ticks(&mut a, 9);
        assert_eq!(a.request_attack(AttackKind::Light), Some(Verdict::SpecialMiss));
    }

    #[test]
    fn test_zero_length_window_stays_closed() {
        let clock = StubClock::new(TimingKey::Beat(BeatQuality::Early));
        let mut a = actor_with(clock.clone());
        a.open_combo_window(0);
        assert!(!a.combo_window().is_open());
        assert!(clock.arrows.borrow().is_empty());
        assert_eq!(
            a.request_attack(AttackKind::Light),
            Some(Verdict::Judged(TimingQuality::Early))
        );
    }

    #[test]
    fn test_parry_blocks_then_expires() {
        let mut a = actor();
        assert!(a.request_parry());
        assert_eq!(a.state(), CombatState::Parrying);
        assert_eq!(
            a.take_commands()[0].data,
            CommandData::Shield { visible: true }
        );

        // 0.05s in: immune
        idle_ticks(&mut a, 3);
        assert_eq!(a.receive_hit(&hit(5), FixedVec3::ZERO), DamageOutcome::NoEffect);
        assert_eq!(a.hp(), 10);
        assert_eq!(a.state(), CombatState::Parrying);

        // 0.2s in: active phase over, shield hidden, vulnerable
        let commands = idle_ticks(&mut a, 9);
        assert!(commands.iter().any(|c| c.data == CommandData::Shield { visible: false }));
        assert_eq!(a.state(), CombatState::Idle);
        assert!(a.receive_hit(&hit(5), FixedVec3::ZERO).is_applied());
        assert_eq!(a.hp(), 5);
    }

    #[test]
    fn test_parry_cooldown() {
        let mut a = actor();
        assert!(a.request_parry());
        idle_ticks(&mut a, 30);
        assert_eq!(a.parry_phase(), ParryPhase::Cooldown);
        assert!(!a.request_parry());

        // 61 ticks * 1092 > 1.0s
        idle_ticks(&mut a, 31);
        assert_eq!(a.parry_phase(), ParryPhase::Ready);
        assert!(a.request_parry());
    }

    #[test]
    fn test_hit_cancels_attack_and_resets_combo() {
        let mut a = actor();
        a.open_combo_window(4);
        a.request_attack(AttackKind::Light);
        a.open_combo_window(4);
        a.take_commands();

        let outcome = a.receive_hit(&hit(3), FixedVec3::ZERO);
        let DamageOutcome::Applied(applied) = outcome else {
            panic!("hit should land");
        };
        assert_eq!(applied.knockback, FixedVec2::RIGHT);
        assert_eq!(a.hp(), 7);
        assert_eq!(a.state(), CombatState::Stunned);
        assert!(!a.combo_window().is_open());
        assert!(!a.capabilities().blocked);

        let commands = a.take_commands();
        assert_eq!(commands[0].data, CommandData::PlayIdlePose);
        assert_eq!(commands[1].displacement(), Some((MoveKind::Knockback, FixedVec2::RIGHT)));
    }

    #[test]
    fn test_hit_stun_suspends_everything() {
        let mut a = actor();
        a.receive_hit(&hit(1), FixedVec3::ZERO);
        a.take_commands();

        let ctx = TickContext::solo(TICK_DURATION, FixedVec3::ZERO);
        let busy = InputFrame::with_movement(127, 0).pressing(Button::Attack1);

        let result = a.tick(&busy, &ctx);
        assert!(result.stunned);
        assert!(result.commands.is_empty());
        assert_eq!(a.last_timing(), None);

        // Requests during stun are rejected too
        assert!(!a.request_parry());
        assert!(!a.request_dodge());
        assert_eq!(a.request_attack(AttackKind::Light), None);

        // 0.25s of stun runs out on the 16th tick
        idle_ticks(&mut a, 15);
        assert!(!a.is_stunned());
        let result = a.tick(&busy, &ctx);
        assert!(!result.stunned);
        assert_eq!(result.commands[0].trigger(), Some(AnimTrigger::Light));
    }

    #[test]
    fn test_stun_is_overwritten_not_stacked() {
        let mut a = actor();
        a.receive_hit(&hit(1), FixedVec3::ZERO);
        let short = HitEvent { hit_stun: to_fixed(0.1), ..hit(1) };
        a.receive_hit(&short, FixedVec3::ZERO);
        assert_eq!(a.hit_stun(), to_fixed(0.1));
        assert_eq!(a.hp(), 8);
    }

    #[test]
    fn test_lethal_hit_is_normal() {
        let mut a = actor();
        assert!(a.receive_hit(&hit(50), FixedVec3::ZERO).is_applied());
        assert_eq!(a.hp(), -40);
    }

    #[test]
    fn test_launch_drives_backwards() {
        let mut a = actor();
        a.request_launch(to_fixed(4.0));
        assert_eq!(a.state(), CombatState::Launching);
        assert_eq!(a.aim(), FixedVec2::new(0, to_fixed(-4.0)));

        let ctx = TickContext::solo(FIXED_ONE / 4, FixedVec3::ZERO);
        let result = a.tick(&InputFrame::with_movement(127, 0), &ctx);
        assert_eq!(
            result.commands,
            vec![Command::movement(1, ActorId(1), MoveKind::Launch, FixedVec2::new(0, -FIXED_ONE))]
        );

        assert!(a.end_launch());
        assert_eq!(a.state(), CombatState::Idle);
        assert_eq!(a.aim(), FixedVec2::ZERO);
    }

    #[test]
    fn test_attack_end_also_ends_launch() {
        let mut a = actor();
        a.request_launch(FIXED_ONE);
        assert!(a.anim_attack_end());
        assert_eq!(a.state(), CombatState::Idle);
        assert!(a.aim().is_zero());
    }

    #[test]
    fn test_walk_when_idle() {
        let mut a = actor();
        let config_speed = a.config().speed;
        let ctx = TickContext::solo(FIXED_ONE / 2, FixedVec3::ZERO);
        let result = a.tick(&InputFrame::with_movement(127, 0), &ctx);
        assert_eq!(
            result.commands[0].displacement(),
            Some((MoveKind::Walk, FixedVec2::new(config_speed / 2, 0)))
        );
    }

    #[test]
    fn test_blocked_attack_cannot_walk() {
        let mut a = actor();
        a.request_attack(AttackKind::Light);
        a.take_commands();

        let ctx = TickContext::solo(TICK_DURATION, FixedVec3::ZERO);
        let input = InputFrame::with_movement(127, 0);
        assert!(a.tick(&input, &ctx).commands.is_empty());

        // Cancel point permits walking but not rotation
        a.anim_cancel_point();
        let commands = a.tick(&input, &ctx).commands;
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0].displacement(), Some((MoveKind::Walk, _))));
        assert_eq!(a.forward(), FixedVec2::FORWARD);
    }

    #[test]
    fn test_move_allowed_signal_permits_walk() {
        let mut a = actor();
        a.request_attack(AttackKind::Light);
        a.anim_move_allowed();
        a.take_commands();
        let ctx = TickContext::solo(TICK_DURATION, FixedVec3::ZERO);
        let commands = a.tick(&InputFrame::with_movement(0, 127), &ctx).commands;
        assert!(matches!(commands[0].displacement(), Some((MoveKind::Walk, _))));
    }

    #[test]
    fn test_gamepad_faces_away_from_aim() {
        let mut a = actor();
        let ctx = TickContext::solo(TICK_DURATION, FixedVec3::ZERO);

        // Aim stick right: face left
        let input = InputFrame::new().aiming(127, 0).on_gamepad();
        let commands = a.tick(&input, &ctx).commands;
        assert_eq!(commands, vec![Command::new(1, ActorId(1), CommandData::Face { forward: -FixedVec2::RIGHT })]);

        // Same facing again: no command
        assert!(a.tick(&input, &ctx).commands.is_empty());

        // Aim inside the dead zone falls back to the move stick
        let input = InputFrame::with_movement(0, 127).aiming(5, 5).on_gamepad();
        a.tick(&input, &ctx);
        assert_eq!(a.forward(), -FixedVec2::FORWARD);
    }

    #[test]
    fn test_pointer_faces_away_from_others() {
        let mut a = actor();
        let others = [FixedVec3::new(0, 0, to_fixed(3.0)), FixedVec3::new(to_fixed(2.0), 0, 0)];
        let ctx = TickContext {
            dt: TICK_DURATION,
            position: FixedVec3::ZERO,
            others: &others,
        };
        a.tick(&InputFrame::new(), &ctx);
        assert_eq!(a.forward(), -FixedVec2::RIGHT);
    }

    #[test]
    fn test_launch_uses_current_facing() {
        let mut a = actor();
        let ctx = TickContext::solo(TICK_DURATION, FixedVec3::ZERO);
        a.tick(&InputFrame::new().aiming(-127, 0).on_gamepad(), &ctx);
        assert_eq!(a.forward(), FixedVec2::RIGHT);

        a.request_launch(to_fixed(2.0));
        assert_eq!(a.aim(), FixedVec2::new(to_fixed(-2.0), 0));
    }

    #[test]
    fn test_far_opponents_give_unit_facing() {
        for units in [200.0, 300.0] {
            let mut a = actor();
            let others = [FixedVec3::new(to_fixed(units), 0, 0)];
            let ctx = TickContext {
                dt: TICK_DURATION,
                position: FixedVec3::ZERO,
                others: &others,
            };
            a.tick(&InputFrame::new(), &ctx);
            assert_eq!(a.forward(), -FixedVec2::RIGHT);

            // Launch speed is exactly the requested units, not scaled by distance
            a.request_launch(to_fixed(2.0));
            assert_eq!(a.aim(), FixedVec2::new(to_fixed(2.0), 0));
        }
    }

    #[test]
    fn test_attack_rejected_while_launching() {
        let mut a = actor();
        a.request_launch(FIXED_ONE);
        a.take_commands();
        let hash = a.compute_hash();

        assert_eq!(a.request_attack(AttackKind::Light), None);
        assert_eq!(a.request_attack(AttackKind::Heavy), None);
        assert_eq!(a.state(), CombatState::Launching);
        assert_eq!(a.compute_hash(), hash);
        assert!(a.take_commands().is_empty());
    }

    #[test]
    fn test_dodge_while_launching_keeps_launch() {
        let mut a = actor();
        a.request_launch(to_fixed(3.0));
        let aim = a.aim();

        assert!(a.request_dodge());
        assert_eq!(a.take_commands()[0].trigger(), Some(AnimTrigger::Dodge));
        assert_eq!(a.state(), CombatState::Launching);
        assert_eq!(a.aim(), aim);
    }

    #[test]
    fn test_parry_interrupts_attack() {
        let mut a = actor();
        a.request_attack(AttackKind::Light);
        a.anim_move_allowed();
        assert!(a.capabilities().blocked);

        assert!(a.request_parry());
        assert_eq!(a.state(), CombatState::Parrying);
        assert!(!a.capabilities().blocked);
        assert!(!a.capabilities().can_move);

        // The attack is over: its end signal no longer applies
        assert!(!a.anim_attack_end());
        assert_eq!(a.state(), CombatState::Parrying);
    }

    #[test]
    fn test_parry_interrupts_launch() {
        let mut a = actor();
        a.request_launch(to_fixed(4.0));
        assert!(a.request_parry());
        assert_eq!(a.state(), CombatState::Parrying);
        assert!(a.aim().is_zero());
        assert!(!a.end_launch());
        a.take_commands();

        // No launch movement while parrying, back to idle after the active phase
        let commands = idle_ticks(&mut a, 7);
        assert!(commands.iter().all(|c| c.displacement().is_none()));
        assert!(commands.iter().any(|c| c.data == CommandData::Shield { visible: false }));
        assert_eq!(a.state(), CombatState::Idle);
        assert!(a.aim().is_zero());
    }

    #[test]
    fn test_parry_protects_in_long_sessions() {
        let mut a = actor();
        let ctx = TickContext::solo(i32::MAX / 2, FixedVec3::ZERO);
        for _ in 0..3 {
            a.tick(&InputFrame::new(), &ctx);
        }
        // Past the nine hours a Q16.16 i32 second count can hold
        assert!(a.now() > i64::from(i32::MAX));

        assert!(a.request_parry());
        idle_ticks(&mut a, 1);
        assert_eq!(a.receive_hit(&hit(5), FixedVec3::ZERO), DamageOutcome::NoEffect);
        assert_eq!(a.hp(), 10);

        // Shield drops on schedule and hits land again
        idle_ticks(&mut a, 6);
        assert_eq!(a.state(), CombatState::Idle);
        assert!(a.receive_hit(&hit(5), FixedVec3::ZERO).is_applied());
        assert_eq!(a.parry_phase(), ParryPhase::Cooldown);
    }

    #[test]
    fn test_dodge_and_shadow_clone() {
        let mut a = actor();
        assert!(a.request_dodge());
        assert!(a.request_dodge());
        a.spawn_shadow_clone(to_fixed(1.5));

        let commands = a.take_commands();
        assert_eq!(commands[0].trigger(), Some(AnimTrigger::Dodge));
        assert_eq!(
            commands[2].data,
            CommandData::SpawnShadowClone { fade_speed: to_fixed(1.5), forward: FixedVec2::FORWARD }
        );
        assert_eq!(a.state(), CombatState::Idle);
    }

    #[test]
    fn test_buttons_in_tick() {
        let mut a = actor();
        let ctx = TickContext::solo(TICK_DURATION, FixedVec3::ZERO);
        let result = a.tick(&InputFrame::new().pressing(Button::Parry), &ctx);
        assert_eq!(result.commands[0].data, CommandData::Shield { visible: true });
        assert_eq!(a.state(), CombatState::Parrying);

        // Attack while parrying is rejected
        a.tick(&InputFrame::new().pressing(Button::Attack2), &ctx);
        assert_eq!(a.last_timing(), None);
    }

    #[test]
    fn test_works_with_metronome() {
        let metronome = Rc::new(Metronome::new(&MetronomeConfig::default()).unwrap());
        let mut a = CombatActor::builder(ActorId(2))
            .clock(metronome.clone())
            .build()
            .unwrap();

        // 0.35s into a 0.5s beat = 70%
        for _ in 0..21 {
            metronome.advance(to_fixed(0.35) / 21);
        }
        assert_eq!(
            a.request_attack(AttackKind::Light),
            Some(Verdict::Judged(TimingQuality::Perfect))
        );

        a.anim_cancel_point();
        a.open_combo_window(2);
        assert_eq!(metronome.take_arrows()[0].window, FIXED_ONE / 2);
    }

    #[test]
    fn test_hash_tracks_state() {
        let mut a = actor();
        let mut b = actor();
        assert_eq!(a.compute_hash(), b.compute_hash());

        a.request_parry();
        assert_ne!(a.compute_hash(), b.compute_hash());

        b.request_parry();
        assert_eq!(a.compute_hash(), b.compute_hash());
    }
}
