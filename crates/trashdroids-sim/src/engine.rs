//! Simulation engine: the match state machine and tick orchestration.
//!
//! `SimulationEngine` owns the physics world, the active match session and
//! all phase state. It processes player commands, runs the match systems in
//! a fixed order, and produces `GameStateSnapshot`s. Completely headless and
//! deterministic for a given seed and command stream.

use std::collections::VecDeque;

use log::{error, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use trashdroids_core::commands::{ControlState, PlayerCommand};
use trashdroids_core::config::MatchConfig;
use trashdroids_core::constants::*;
use trashdroids_core::enums::*;
use trashdroids_core::events::{AudioEvent, GameEvent};
use trashdroids_core::state::{GameStateSnapshot, MatchSummary};
use trashdroids_core::types::SimTime;
use trashdroids_physics::{PhysicsWorld, SphereWorld};

use crate::session::MatchSession;
use crate::systems;
use crate::systems::snapshot::SnapshotInputs;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Starting parameters of single player matches.
    pub single_player: MatchConfig,
    /// Starting parameters of versus matches.
    pub versus: MatchConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            single_player: MatchConfig::default(),
            versus: MatchConfig::versus_preset(),
        }
    }
}

/// The simulation engine. Owns the physics world and all sim state.
pub struct SimulationEngine {
    physics: Box<dyn PhysicsWorld + Send>,
    rng: ChaCha8Rng,
    time: SimTime,
    phase: GamePhase,
    menu_item: MenuItem,
    single_player_config: MatchConfig,
    versus_config: MatchConfig,
    session: Option<MatchSession>,
    controls: [ControlState; 2],
    command_queue: VecDeque<PlayerCommand>,
    intro_elapsed_secs: f64,
    summary: Option<MatchSummary>,
    last_error: Option<String>,
    exit_requested: bool,
    events: Vec<GameEvent>,
    audio_events: Vec<AudioEvent>,
}

impl SimulationEngine {
    /// Create a new engine on the reference physics backend.
    pub fn new(config: SimConfig) -> Self {
        Self::with_physics(config, Box::new(SphereWorld::new()))
    }

    /// Create a new engine driving the given physics world.
    pub fn with_physics(config: SimConfig, physics: Box<dyn PhysicsWorld + Send>) -> Self {
        Self {
            physics,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            time: SimTime::default(),
            phase: GamePhase::default(),
            menu_item: MenuItem::default(),
            single_player_config: config.single_player,
            versus_config: config.versus,
            session: None,
            controls: [ControlState::default(); 2],
            command_queue: VecDeque::new(),
            intro_elapsed_secs: 0.0,
            summary: None,
            last_error: None,
            exit_requested: false,
            events: Vec::new(),
            audio_events: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        let dt = self.dt();
        match self.phase {
            GamePhase::Intro => {
                self.intro_elapsed_secs += dt;
                if self.intro_elapsed_secs >= self.single_player_config.timing.intro_secs {
                    self.set_phase(GamePhase::Menu);
                }
            }
            GamePhase::SinglePlayerMatch | GamePhase::MultiplayerMatch => self.run_match_tick(),
            GamePhase::Menu | GamePhase::Postgame(_) => {}
        }
        self.time.advance(dt);

        self.snapshot()
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn menu_item(&self) -> MenuItem {
        self.menu_item
    }

    /// The active match, also kept through postgame.
    pub fn session(&self) -> Option<&MatchSession> {
        self.session.as_ref()
    }

    pub fn physics(&self) -> &dyn PhysicsWorld {
        self.physics.as_ref()
    }

    pub fn summary(&self) -> Option<&MatchSummary> {
        self.summary.as_ref()
    }

    /// Why the last match setup was aborted.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Set by Back in the intro or menu, and by the ExitGame item.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Parameters of the mode under the menu cursor.
    pub fn menu_config(&self) -> &MatchConfig {
        match self.menu_item {
            MenuItem::Multiplayer => &self.versus_config,
            _ => &self.single_player_config,
        }
    }

    /// Mutable access to the active session (for tests).
    #[cfg(test)]
    pub fn session_mut(&mut self) -> Option<&mut MatchSession> {
        self.session.as_mut()
    }

    /// Mutable access to the physics world (for tests).
    #[cfg(test)]
    pub fn physics_mut(&mut self) -> &mut dyn PhysicsWorld {
        self.physics.as_mut()
    }

    /// Flush the active session's deferred operations (for tests).
    #[cfg(test)]
    pub fn flush_pending(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.registry.flush_pending(self.physics.as_mut());
        }
    }

    /// Feed contact events through the effect pipeline and flush, without
    /// stepping physics (for tests).
    #[cfg(test)]
    pub fn apply_contacts(
        &mut self,
        contacts: &[trashdroids_physics::ContactEvent],
    ) -> systems::collision_effects::PipelineReport {
        let Some(session) = self.session.as_mut() else {
            return Default::default();
        };
        let report = systems::collision_effects::run(
            session,
            self.physics.as_ref(),
            &mut self.rng,
            contacts,
            &mut self.events,
            &mut self.audio_events,
        );
        session.registry.flush_pending(self.physics.as_mut());
        report
    }

    fn dt(&self) -> f64 {
        match &self.session {
            Some(session) if self.phase.in_match() => session.config.timing.dt(),
            _ => self.single_player_config.timing.dt(),
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            info!("phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Confirm => match self.phase {
                GamePhase::Intro => self.set_phase(GamePhase::Menu),
                GamePhase::Menu => self.activate_menu_item(),
                GamePhase::Postgame(_) => self.return_to_menu(),
                GamePhase::SinglePlayerMatch | GamePhase::MultiplayerMatch => {}
            },
            PlayerCommand::Back => match self.phase {
                GamePhase::Intro | GamePhase::Menu => {
                    info!("exit requested");
                    self.exit_requested = true;
                }
                GamePhase::SinglePlayerMatch | GamePhase::MultiplayerMatch => {
                    info!("match abandoned");
                    self.return_to_menu();
                }
                GamePhase::Postgame(_) => self.return_to_menu(),
            },
            PlayerCommand::MenuUp => {
                if self.phase == GamePhase::Menu {
                    self.menu_item = self.menu_item.previous();
                }
            }
            PlayerCommand::MenuDown => {
                if self.phase == GamePhase::Menu {
                    self.menu_item = self.menu_item.next();
                }
            }
            PlayerCommand::AdjustUniverseRadius { steps } => {
                if let Some(config) = self.editable_config() {
                    config.universe.radius = (config.universe.radius
                        + f64::from(steps) * UNIVERSE_RADIUS_STEP)
                        .clamp(UNIVERSE_RADIUS_MIN, UNIVERSE_RADIUS_MAX);
                }
            }
            PlayerCommand::AdjustAsteroidCount { steps } => {
                if let Some(config) = self.editable_config() {
                    let count = i64::from(config.asteroids.count) + i64::from(steps);
                    config.asteroids.count =
                        count.clamp(i64::from(ASTEROIDS_NUM_MIN), i64::from(ASTEROIDS_NUM_MAX)) as u32;
                }
            }
            PlayerCommand::ToggleStreamMode => {
                if let Some(config) = self.editable_config() {
                    config.missile.stream_mode = !config.missile.stream_mode;
                }
            }
            PlayerCommand::ToggleSpreadMode => {
                if let Some(config) = self.editable_config() {
                    config.missile.spread_mode = !config.missile.spread_mode;
                    if config.missile.spread_mode {
                        config.missile.stream_mode = true;
                    }
                }
            }
            PlayerCommand::ToggleDestructible => {
                if let Some(config) = self.editable_config() {
                    config.asteroids.destructible = !config.asteroids.destructible;
                }
            }
            PlayerCommand::ToggleMoveable => {
                if let Some(config) = self.editable_config() {
                    config.asteroids.moveable = !config.asteroids.moveable;
                }
            }
            PlayerCommand::SetControls { slot, controls } => {
                self.controls[slot.index()] = controls;
            }
        }
    }

    /// Match parameters are only editable from the menu.
    fn editable_config(&mut self) -> Option<&mut MatchConfig> {
        if self.phase != GamePhase::Menu {
            return None;
        }
        Some(match self.menu_item {
            MenuItem::Multiplayer => &mut self.versus_config,
            _ => &mut self.single_player_config,
        })
    }

    fn activate_menu_item(&mut self) {
        match self.menu_item {
            MenuItem::SinglePlayer => self.start_match(MatchMode::SinglePlayer),
            MenuItem::Multiplayer => self.start_match(MatchMode::Versus),
            MenuItem::ReplayIntro => {
                self.intro_elapsed_secs = 0.0;
                self.set_phase(GamePhase::Intro);
            }
            MenuItem::ExitGame => {
                info!("exit requested");
                self.exit_requested = true;
            }
        }
    }

    /// Discard any session and go back to the menu.
    fn return_to_menu(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.teardown(self.physics.as_mut());
        }
        self.set_phase(GamePhase::Menu);
    }

    /// Full reset into a new match. On placement failure the match is
    /// aborted and the engine stays in the menu with `last_error` set.
    fn start_match(&mut self, mode: MatchMode) {
        if let Some(mut old) = self.session.take() {
            old.teardown(self.physics.as_mut());
        }
        let config = match mode {
            MatchMode::SinglePlayer => self.single_player_config.clone(),
            MatchMode::Versus => self.versus_config.clone(),
        };
        if let Err(err) = config.validate() {
            error!("match config rejected: {err}");
            self.last_error = Some(err.to_string());
            return;
        }

        let mut session = MatchSession::new(mode, config);
        if let Err(err) = world_setup::populate_match(&mut session, &mut self.rng) {
            warn!("match setup aborted: {err}");
            session.teardown(self.physics.as_mut());
            self.last_error = Some(err.to_string());
            self.set_phase(GamePhase::Menu);
            return;
        }
        session.registry.flush_pending(self.physics.as_mut());
        if let Err(err) = session.check_invariants(self.physics.as_ref()) {
            error!("{err}");
            debug_assert!(false, "{err}");
        }

        info!(
            "{mode:?} match started: {} entities, target score {}",
            session.registry.len(),
            session.target_score
        );
        self.session = Some(session);
        self.controls = [ControlState::default(); 2];
        self.summary = None;
        self.last_error = None;
        self.set_phase(match mode {
            MatchMode::SinglePlayer => GamePhase::SinglePlayerMatch,
            MatchMode::Versus => GamePhase::MultiplayerMatch,
        });
    }

    /// Run all match systems in order.
    fn run_match_tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let dt = session.config.timing.dt();

        // 1. Input sampling: timers, impulses, weapon fire
        systems::craft_control::run(
            session,
            self.physics.as_mut(),
            &self.controls,
            dt,
            &mut self.events,
            &mut self.audio_events,
        );
        // 2. Physics step
        let contacts = self.physics.step(dt);
        // 3. Collision effects (after the step, deferred through the registry)
        systems::collision_effects::run(
            session,
            self.physics.as_ref(),
            &mut self.rng,
            &contacts,
            &mut self.events,
            &mut self.audio_events,
        );
        // 4. Guidance and speed floor
        systems::homing::run(session, self.physics.as_mut());
        // 5. Pickup upkeep and spawn roll
        systems::pickup::retain_speed(session, self.physics.as_mut());
        systems::pickup::spawn_roll(session, &mut self.rng, &mut self.events);
        // 6. Flush deferred creates and destroys
        session.registry.flush_pending(self.physics.as_mut());
        // 7. Structural invariants
        if let Err(err) = session.check_invariants(self.physics.as_ref()) {
            error!("{err}");
            debug_assert!(false, "{err}");
        }
        session.elapsed_secs += dt;

        // 8. Termination
        if let Some(result) = session.outcome() {
            self.finish_match(result);
        }
    }

    fn finish_match(&mut self, result: MatchResult) {
        if let Some(session) = &self.session {
            let summary = session.summary(result);
            info!(
                "match ended: {result:?} after {} (score {}/{})",
                summary.clock, summary.score, summary.target_score
            );
            self.summary = Some(summary);
        }
        self.events.push(GameEvent::MatchEnded { result });
        self.set_phase(GamePhase::Postgame(result));
    }

    fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        let audio_events = std::mem::take(&mut self.audio_events);
        let menu_config = match self.menu_item {
            MenuItem::Multiplayer => &self.versus_config,
            _ => &self.single_player_config,
        };
        systems::snapshot::build_snapshot(
            SnapshotInputs {
                time: self.time,
                phase: self.phase,
                menu_item: self.menu_item,
                menu_config,
                summary: self.summary.clone(),
                last_error: self.last_error.clone(),
                exit_requested: self.exit_requested,
            },
            self.session.as_ref(),
            self.physics.as_ref(),
            events,
            audio_events,
        )
    }
}
