//! Tests for the simulation engine, match state machine and effect pipeline.

use glam::DVec3;

use trashdroids_core::commands::{ControlState, PlayerCommand};
use trashdroids_core::components::{Craft, Pickup, Projectile};
use trashdroids_core::config::MatchConfig;
use trashdroids_core::enums::*;
use trashdroids_core::events::{AudioEvent, GameEvent};
use trashdroids_core::types::EntityTag;
use trashdroids_physics::ContactEvent;

use crate::engine::{SimConfig, SimulationEngine};
use crate::guidance;
use crate::registry::KindFilter;
use crate::world_setup::{self, Launch};

/// Skip the intro and start a match of the given mode.
fn start(mode: MatchMode) -> SimulationEngine {
    start_with(mode, SimConfig::default())
}

fn start_with(mode: MatchMode, config: SimConfig) -> SimulationEngine {
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::Confirm);
    if mode == MatchMode::Versus {
        engine.queue_command(PlayerCommand::MenuDown);
    }
    engine.queue_command(PlayerCommand::Confirm);
    engine.tick();
    engine
}

fn craft_tag(engine: &SimulationEngine, slot: PlayerSlot) -> EntityTag {
    engine.session().unwrap().craft_tag(slot).unwrap()
}

fn first_asteroid(engine: &SimulationEngine) -> EntityTag {
    engine
        .session()
        .unwrap()
        .registry
        .iter(EntityKind::Asteroid)
        .next()
        .unwrap()
}

fn craft(engine: &SimulationEngine, slot: PlayerSlot) -> Craft {
    let tag = craft_tag(engine, slot);
    let craft = engine.session().unwrap().registry.get::<Craft>(tag).unwrap();
    Craft::clone(&craft)
}

/// Queue one missile from the craft in `slot` and make it live.
fn launch_missile(engine: &mut SimulationEngine, slot: PlayerSlot) -> EntityTag {
    launch_homing(engine, slot, None, 0.0)
}

fn launch_homing(
    engine: &mut SimulationEngine,
    slot: PlayerSlot,
    target: Option<EntityTag>,
    launch_strength: f64,
) -> EntityTag {
    let owner = craft_tag(engine, slot);
    let handle = engine.session().unwrap().registry.body(owner).unwrap();
    let body = engine.physics().body(handle).unwrap().clone();
    let session = engine.session_mut().unwrap();
    let launch = Launch {
        owner,
        body: &body,
        target,
        heat_seek_strength: launch_strength,
        from_left: true,
    };
    let tags = world_setup::spawn_missiles(&mut session.registry, &session.config, &launch);
    engine.flush_pending();
    tags[0]
}

fn contact(a: EntityTag, b: EntityTag) -> ContactEvent {
    ContactEvent { a, b }
}

fn position(engine: &SimulationEngine, tag: EntityTag) -> DVec3 {
    let handle = engine.session().unwrap().registry.body(tag).unwrap();
    engine.physics().body(handle).unwrap().position
}

fn set_heat_seek(engine: &mut SimulationEngine, slot: PlayerSlot, strength: f64) {
    let tag = craft_tag(engine, slot);
    engine
        .session_mut()
        .unwrap()
        .registry
        .get_mut::<Craft>(tag)
        .unwrap()
        .heat_seek_strength = strength;
}

/// Angular momentum the guidance law should have left on `missile` after
/// the last tick, steering toward `aim` at `strength`.
fn assert_steered(engine: &SimulationEngine, missile: EntityTag, aim: DVec3, strength: f64) {
    let handle = engine.session().unwrap().registry.body(missile).unwrap();
    let body = engine.physics().body(handle).unwrap();
    let expected = guidance::angular_momentum(body.orientation, body.position, aim, strength);
    assert!(expected.length() > 0.0);
    assert!(
        (body.angular_momentum() - expected).length() < 1e-9,
        "angular momentum {:?}, expected {:?}",
        body.angular_momentum(),
        expected
    );
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    let controls = ControlState {
        yaw: 0.3,
        thrust: 0.2,
        fire: true,
        ..Default::default()
    };
    for engine in [&mut engine_a, &mut engine_b] {
        engine.queue_commands([
            PlayerCommand::Confirm,
            PlayerCommand::Confirm,
            PlayerCommand::SetControls {
                slot: PlayerSlot::One,
                controls,
            },
        ]);
    }

    for _ in 0..300 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });
    engine_a.queue_commands([PlayerCommand::Confirm, PlayerCommand::Confirm]);
    engine_b.queue_commands([PlayerCommand::Confirm, PlayerCommand::Confirm]);

    // Asteroid placement is drawn from the seed, so the first match tick
    // already differs.
    let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
    let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should produce divergent output");
}

// ---- Phase transitions ----

#[test]
fn test_intro_advances_to_menu_on_its_own() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert_eq!(engine.phase(), GamePhase::Intro);

    for _ in 0..500 {
        engine.tick();
    }
    assert_eq!(engine.phase(), GamePhase::Intro);

    for _ in 0..101 {
        engine.tick();
    }
    assert_eq!(engine.phase(), GamePhase::Menu);
}

#[test]
fn test_intro_skipped_by_confirm() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::Confirm);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Menu);
    assert!(snap.hud.is_none());
    assert!(snap.entities.is_empty());
}

#[test]
fn test_replay_intro_resets_timer() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::Confirm);
    engine.tick();
    engine.queue_commands([
        PlayerCommand::MenuDown,
        PlayerCommand::MenuDown,
        PlayerCommand::Confirm,
    ]);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Intro);

    for _ in 0..300 {
        engine.tick();
    }
    assert_eq!(engine.phase(), GamePhase::Intro, "intro timer should restart");
}

#[test]
fn test_back_and_exit_item_request_exit() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::Back);
    assert!(engine.tick().exit_requested);

    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::Confirm);
    for _ in 0..3 {
        engine.queue_command(PlayerCommand::MenuDown);
    }
    engine.queue_command(PlayerCommand::Confirm);
    let snap = engine.tick();
    assert_eq!(snap.menu.selected, MenuItem::ExitGame);
    assert!(snap.exit_requested);
}

#[test]
fn test_single_player_match_start() {
    let engine = start(MatchMode::SinglePlayer);
    assert_eq!(engine.phase(), GamePhase::SinglePlayerMatch);

    let session = engine.session().unwrap();
    assert_eq!(session.registry.count(EntityKind::Asteroid), 20);
    assert_eq!(session.registry.count(EntityKind::Craft), 1);
    assert_eq!(session.target_score, 70);
    assert_eq!(engine.physics().body_count(), session.registry.count(KindFilter::All));
}

#[test]
fn test_versus_match_start() {
    let engine = start(MatchMode::Versus);
    assert_eq!(engine.phase(), GamePhase::MultiplayerMatch);

    let session = engine.session().unwrap();
    assert_eq!(session.registry.count(EntityKind::Asteroid), 150);
    assert_eq!(session.registry.count(EntityKind::Craft), 2);
    assert!(!session.config.asteroids.destructible);
    assert!(!session.config.asteroids.moveable);
}

// ---- Menu ----

#[test]
fn test_menu_navigation_clamps() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([PlayerCommand::Confirm, PlayerCommand::MenuUp]);
    engine.tick();
    assert_eq!(engine.menu_item(), MenuItem::SinglePlayer);

    for _ in 0..10 {
        engine.queue_command(PlayerCommand::MenuDown);
    }
    engine.tick();
    assert_eq!(engine.menu_item(), MenuItem::ExitGame);
}

#[test]
fn test_menu_parameter_clamps() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([
        PlayerCommand::Confirm,
        PlayerCommand::AdjustUniverseRadius { steps: -10 },
        PlayerCommand::AdjustAsteroidCount { steps: -100 },
    ]);
    let snap = engine.tick();
    assert_eq!(snap.menu.universe_radius, 40.0);
    assert_eq!(snap.menu.asteroid_count, 2);

    engine.queue_commands([
        PlayerCommand::AdjustUniverseRadius { steps: 1000 },
        PlayerCommand::AdjustAsteroidCount { steps: 3 },
    ]);
    let snap = engine.tick();
    assert_eq!(snap.menu.universe_radius, 500.0);
    assert_eq!(snap.menu.asteroid_count, 5);
}

#[test]
fn test_spread_mode_forces_stream_mode() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([PlayerCommand::Confirm, PlayerCommand::ToggleSpreadMode]);
    let snap = engine.tick();
    assert!(snap.menu.spread_mode);
    assert!(snap.menu.stream_mode);
}

#[test]
fn test_menu_edits_follow_highlighted_mode() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([
        PlayerCommand::Confirm,
        PlayerCommand::MenuDown,
        PlayerCommand::ToggleDestructible,
    ]);
    let snap = engine.tick();
    assert!(snap.menu.destructible, "versus config toggled on");
    assert_eq!(snap.menu.universe_radius, 75.0);

    engine.queue_command(PlayerCommand::MenuUp);
    let snap = engine.tick();
    assert!(snap.menu.destructible, "single player config untouched");
    assert_eq!(snap.menu.universe_radius, 40.0);
}

#[test]
fn test_edits_ignored_during_match() {
    let mut engine = start(MatchMode::SinglePlayer);
    engine.queue_command(PlayerCommand::AdjustAsteroidCount { steps: 10 });
    engine.tick();
    assert_eq!(engine.menu_config().asteroids.count, 20);
}

// ---- Setup failure ----

#[test]
fn test_unplaceable_match_aborts_to_menu() {
    let mut single_player = MatchConfig::default();
    single_player.universe.radius = 2.0;
    single_player.placement.max_attempts = 50;
    let mut engine = SimulationEngine::new(SimConfig {
        single_player,
        ..Default::default()
    });
    engine.queue_commands([PlayerCommand::Confirm, PlayerCommand::Confirm]);
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::Menu);
    assert!(snap.last_error.is_some());
    assert!(engine.session().is_none());
    assert_eq!(engine.physics().body_count(), 0);
}

// ---- Teardown ----

#[test]
fn test_back_abandons_match_without_dangling_bodies() {
    let mut engine = start(MatchMode::SinglePlayer);
    for _ in 0..30 {
        engine.tick();
    }
    assert!(engine.physics().body_count() > 0);

    engine.queue_command(PlayerCommand::Back);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Menu);
    assert!(engine.session().is_none());
    assert_eq!(engine.physics().body_count(), 0);
    assert!(!snap.exit_requested);
}

#[test]
fn test_restart_replaces_previous_world() {
    let mut engine = start(MatchMode::Versus);
    engine.queue_command(PlayerCommand::Back);
    engine.tick();
    engine.queue_command(PlayerCommand::MenuUp);
    engine.queue_command(PlayerCommand::Confirm);
    engine.tick();

    let session = engine.session().unwrap();
    assert_eq!(session.mode, MatchMode::SinglePlayer);
    assert_eq!(engine.physics().body_count(), 22);
}

// ---- Termination ----

#[test]
fn test_single_player_wins_on_reaching_target() {
    let mut engine = start(MatchMode::SinglePlayer);
    engine.session_mut().unwrap().score = 69;
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::SinglePlayerMatch);

    let projectile = launch_missile(&mut engine, PlayerSlot::One);
    let asteroid = first_asteroid(&engine);
    engine.apply_contacts(&[contact(projectile, asteroid)]);
    assert_eq!(engine.session().unwrap().score, 70);

    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Postgame(MatchResult::SinglePlayerWin));
    assert!(snap
        .events
        .contains(&GameEvent::MatchEnded { result: MatchResult::SinglePlayerWin }));
    let summary = snap.summary.unwrap();
    assert_eq!(summary.score, 70);
    assert_eq!(summary.target_score, 70);
}

#[test]
fn test_win_takes_precedence_over_fail() {
    let mut engine = start(MatchMode::SinglePlayer);
    let tag = craft_tag(&engine, PlayerSlot::One);
    let session = engine.session_mut().unwrap();
    session.score = session.target_score;
    session.registry.get_mut::<Craft>(tag).unwrap().lives_remaining = 0;

    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Postgame(MatchResult::SinglePlayerWin));
}

#[test]
fn test_single_player_fails_without_lives() {
    let mut engine = start(MatchMode::SinglePlayer);
    let tag = craft_tag(&engine, PlayerSlot::One);
    engine
        .session_mut()
        .unwrap()
        .registry
        .get_mut::<Craft>(tag)
        .unwrap()
        .lives_remaining = 0;

    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Postgame(MatchResult::SinglePlayerFail));
}

#[test]
fn test_versus_double_elimination_goes_to_player_two() {
    let mut engine = start(MatchMode::Versus);
    let one = craft_tag(&engine, PlayerSlot::One);
    let two = craft_tag(&engine, PlayerSlot::Two);
    let session = engine.session_mut().unwrap();
    session.registry.get_mut::<Craft>(one).unwrap().lives_remaining = 0;
    session.registry.get_mut::<Craft>(two).unwrap().lives_remaining = 0;

    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Postgame(MatchResult::PlayerTwoWins));
}

#[test]
fn test_postgame_keeps_world_until_confirm() {
    let mut engine = start(MatchMode::Versus);
    let two = craft_tag(&engine, PlayerSlot::Two);
    engine
        .session_mut()
        .unwrap()
        .registry
        .get_mut::<Craft>(two)
        .unwrap()
        .lives_remaining = 0;
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Postgame(MatchResult::PlayerOneWins));
    assert!(engine.physics().body_count() > 0);

    engine.queue_command(PlayerCommand::Confirm);
    engine.tick();
    assert_eq!(engine.phase(), GamePhase::Menu);
    assert_eq!(engine.physics().body_count(), 0);
    assert_eq!(engine.summary().unwrap().result, MatchResult::PlayerOneWins);
}

// ---- Collision effects ----

#[test]
fn test_asteroid_contact_damages_and_grants_invincibility() {
    let mut engine = start(MatchMode::SinglePlayer);
    let ship = craft_tag(&engine, PlayerSlot::One);
    let asteroid = first_asteroid(&engine);

    engine.apply_contacts(&[contact(ship, asteroid)]);
    let c = craft(&engine, PlayerSlot::One);
    assert_eq!(c.lives_remaining, 2);
    assert_eq!(c.invincibility_secs, 3.0);

    for _ in 0..6 {
        engine.tick();
    }
    let c = craft(&engine, PlayerSlot::One);
    assert!((c.invincibility_secs - 2.9).abs() < 1e-9);

    engine.apply_contacts(&[contact(asteroid, ship)]);
    assert_eq!(craft(&engine, PlayerSlot::One).lives_remaining, 2);
}

#[test]
fn test_second_enemy_missile_within_window_is_ignored() {
    let mut engine = start(MatchMode::Versus);
    engine.session_mut().unwrap().config.pickup.spawn_chance = 0.0;
    let one = craft_tag(&engine, PlayerSlot::One);

    let first = launch_missile(&mut engine, PlayerSlot::Two);
    engine.apply_contacts(&[contact(first, one)]);
    let c = craft(&engine, PlayerSlot::One);
    assert_eq!(c.lives_remaining, 2);
    assert_eq!(c.invincibility_secs, 3.0);

    for _ in 0..6 {
        engine.tick();
    }
    assert!((craft(&engine, PlayerSlot::One).invincibility_secs - 2.9).abs() < 1e-9);

    let second = launch_missile(&mut engine, PlayerSlot::Two);
    let report = engine.apply_contacts(&[contact(second, one)]);
    assert_eq!(report.applied, 1);
    assert_eq!(craft(&engine, PlayerSlot::One).lives_remaining, 2);
    assert!(!engine.session().unwrap().registry.is_live(second));
}

#[test]
fn test_invincibility_counts_down_to_zero() {
    let mut config = SimConfig::default();
    config.single_player.asteroids.moveable = false;
    let mut engine = start_with(MatchMode::SinglePlayer, config);
    let ship = craft_tag(&engine, PlayerSlot::One);
    let asteroid = first_asteroid(&engine);
    engine.apply_contacts(&[contact(ship, asteroid)]);

    for _ in 0..200 {
        engine.tick();
    }
    let c = craft(&engine, PlayerSlot::One);
    assert_eq!(c.invincibility_secs, 0.0);
    assert!(c.visible);
}

#[test]
fn test_versus_ignores_environment_damage() {
    let mut engine = start(MatchMode::Versus);
    let one = craft_tag(&engine, PlayerSlot::One);
    let two = craft_tag(&engine, PlayerSlot::Two);
    let asteroid = first_asteroid(&engine);
    let boundary = engine.session().unwrap().boundary.unwrap();

    engine.apply_contacts(&[contact(one, asteroid), contact(one, two), contact(two, boundary)]);
    assert_eq!(craft(&engine, PlayerSlot::One).lives_remaining, 3);
    assert_eq!(craft(&engine, PlayerSlot::Two).lives_remaining, 3);
}

#[test]
fn test_missile_hits_opponent_but_not_owner() {
    let mut engine = start(MatchMode::Versus);
    let one = craft_tag(&engine, PlayerSlot::One);
    let two = craft_tag(&engine, PlayerSlot::Two);

    let own = launch_missile(&mut engine, PlayerSlot::One);
    let report = engine.apply_contacts(&[contact(own, one)]);
    assert_eq!(report.applied, 1);
    assert_eq!(craft(&engine, PlayerSlot::One).lives_remaining, 3);
    assert!(!engine.session().unwrap().registry.is_live(own));

    let shot = launch_missile(&mut engine, PlayerSlot::One);
    engine.apply_contacts(&[contact(two, shot)]);
    assert_eq!(craft(&engine, PlayerSlot::Two).lives_remaining, 2);
}

#[test]
fn test_projectiles_pass_through_each_other() {
    let mut engine = start(MatchMode::Versus);
    let a = launch_missile(&mut engine, PlayerSlot::One);
    let b = launch_missile(&mut engine, PlayerSlot::Two);
    engine.apply_contacts(&[contact(a, b)]);

    let registry = &engine.session().unwrap().registry;
    assert!(registry.is_live(a));
    assert!(registry.is_live(b));
}

#[test]
fn test_projectile_shatters_large_asteroid() {
    let mut engine = start(MatchMode::SinglePlayer);
    let asteroid = first_asteroid(&engine);
    let projectile = launch_missile(&mut engine, PlayerSlot::One);
    let before = engine.session().unwrap().registry.count(EntityKind::Asteroid);

    engine.apply_contacts(&[contact(projectile, asteroid)]);

    let session = engine.session().unwrap();
    assert!(!session.registry.is_live(asteroid));
    assert!(!session.registry.is_live(projectile));
    assert_eq!(session.registry.count(EntityKind::Asteroid), before + 1);
    assert_eq!(session.score, 1);
    let mediums = session
        .registry
        .iter(EntityKind::Asteroid)
        .filter(|t| {
            session
                .registry
                .get::<trashdroids_core::components::Asteroid>(*t)
                .is_some_and(|a| a.size == AsteroidSize::Medium)
        })
        .count();
    assert_eq!(mediums, 2);
    assert_eq!(engine.physics().body_count(), session.registry.count(KindFilter::All));
}

#[test]
fn test_fragments_drift_apart_after_split() {
    let mut engine = start(MatchMode::SinglePlayer);
    let asteroid = first_asteroid(&engine);
    let projectile = launch_missile(&mut engine, PlayerSlot::One);
    let before: Vec<EntityTag> = engine
        .session()
        .unwrap()
        .registry
        .iter(EntityKind::Asteroid)
        .collect();

    engine.apply_contacts(&[contact(projectile, asteroid)]);
    let fragments: Vec<EntityTag> = engine
        .session()
        .unwrap()
        .registry
        .iter(EntityKind::Asteroid)
        .filter(|t| !before.contains(t))
        .collect();
    assert_eq!(fragments.len(), 2);
    assert_eq!(position(&engine, fragments[0]), position(&engine, fragments[1]));

    engine.tick();
    let gap = position(&engine, fragments[0]).distance(position(&engine, fragments[1]));
    assert!(gap > 2.0, "fragments still stacked: {gap}");
}

#[test]
fn test_indestructible_asteroids_only_detonate_missile() {
    let mut engine = start(MatchMode::Versus);
    let asteroid = first_asteroid(&engine);
    let projectile = launch_missile(&mut engine, PlayerSlot::One);
    engine.apply_contacts(&[contact(projectile, asteroid)]);

    let session = engine.session().unwrap();
    assert!(session.registry.is_live(asteroid));
    assert!(!session.registry.is_live(projectile));
    assert_eq!(session.score, 0);
}

#[test]
fn test_redelivered_events_are_no_ops() {
    let mut engine = start(MatchMode::SinglePlayer);
    let asteroid = first_asteroid(&engine);
    let projectile = launch_missile(&mut engine, PlayerSlot::One);
    let ship = craft_tag(&engine, PlayerSlot::One);

    let first = engine.apply_contacts(&[contact(projectile, asteroid)]);
    assert_eq!(first.applied, 1);
    let count = engine.session().unwrap().registry.count(KindFilter::All);

    let again = engine.apply_contacts(&[contact(projectile, asteroid), contact(ship, asteroid)]);
    assert_eq!(again.applied, 0);
    assert_eq!(again.stale, 2);

    let session = engine.session().unwrap();
    assert_eq!(session.score, 1);
    assert_eq!(session.registry.count(KindFilter::All), count);
    assert_eq!(craft(&engine, PlayerSlot::One).lives_remaining, 3);
}

#[test]
fn test_same_tick_duplicates_resolve_once() {
    let mut engine = start(MatchMode::SinglePlayer);
    let asteroid = first_asteroid(&engine);
    let a = launch_missile(&mut engine, PlayerSlot::One);
    let b = launch_missile(&mut engine, PlayerSlot::One);

    let report = engine.apply_contacts(&[contact(a, asteroid), contact(b, asteroid)]);
    assert_eq!(report.applied, 1);
    assert_eq!(report.stale, 1);
    assert_eq!(engine.session().unwrap().score, 1);
    assert!(engine.session().unwrap().registry.is_live(b));
}

// ---- Weapons ----

#[test]
fn test_fire_rate_limits_launches() {
    let mut engine = start(MatchMode::Versus);
    let one = craft_tag(&engine, PlayerSlot::One);
    let two = craft_tag(&engine, PlayerSlot::Two);
    engine.queue_command(PlayerCommand::SetControls {
        slot: PlayerSlot::One,
        controls: ControlState {
            fire: true,
            ..Default::default()
        },
    });

    let snap = engine.tick();
    let launched: Vec<EntityTag> = snap
        .events
        .iter()
        .filter_map(|e| match e {
            GameEvent::MissileLaunched { projectile, owner } => {
                assert_eq!(*owner, one);
                Some(*projectile)
            }
            _ => None,
        })
        .collect();
    assert_eq!(launched.len(), 1);
    assert!(snap.audio_events.contains(&AudioEvent::Launch));
    let target = engine
        .session()
        .unwrap()
        .registry
        .get::<Projectile>(launched[0])
        .map(|p| p.target);
    assert_eq!(target, Some(Some(two)));
    assert!(!craft(&engine, PlayerSlot::One).fire_from_left);

    let mut launches = 1;
    for _ in 1..30 {
        let snap = engine.tick();
        launches += snap
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::MissileLaunched { .. }))
            .count();
    }
    assert_eq!(launches, 1, "stream mode fires every 2/3 s");

    for _ in 30..60 {
        let snap = engine.tick();
        launches += snap
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::MissileLaunched { .. }))
            .count();
    }
    assert_eq!(launches, 2);
}

#[test]
fn test_missiles_keep_speed_floor() {
    let mut engine = start(MatchMode::Versus);
    let missile = launch_missile(&mut engine, PlayerSlot::One);
    for _ in 0..5 {
        engine.tick();
        let session = engine.session().unwrap();
        if !session.registry.is_live(missile) {
            return;
        }
        let handle = session.registry.body(missile).unwrap();
        let body = engine.physics().body(handle).unwrap();
        assert!(body.linear_velocity.length() >= 20.0 - 1e-9);
        assert!(body.linear_velocity.normalize().dot(body.up()) > 0.999);
    }
}

// ---- Homing ----

#[test]
fn test_targeted_missile_steers_with_owner_strength() {
    let mut engine = start(MatchMode::SinglePlayer);
    set_heat_seek(&mut engine, PlayerSlot::One, 0.5);
    let asteroid = first_asteroid(&engine);
    // Launch strength differs from the owner's current strength.
    let missile = launch_homing(&mut engine, PlayerSlot::One, Some(asteroid), 0.0);

    for _ in 0..3 {
        engine.tick();
        assert!(engine.session().unwrap().registry.is_live(missile));
        assert_steered(&engine, missile, position(&engine, asteroid), 0.5);
    }
}

#[test]
fn test_untargeted_missile_gets_only_speed_floor() {
    let mut engine = start(MatchMode::SinglePlayer);
    set_heat_seek(&mut engine, PlayerSlot::One, 0.5);
    let missile = launch_homing(&mut engine, PlayerSlot::One, None, 0.5);

    engine.tick();
    let handle = engine.session().unwrap().registry.body(missile).unwrap();
    let body = engine.physics().body(handle).unwrap();
    assert_eq!(body.angular_velocity, DVec3::ZERO);
    assert!(body.linear_velocity.length() >= 20.0 - 1e-9);
    assert!(body.linear_velocity.normalize().dot(body.up()) > 0.999);
}

#[test]
fn test_missile_with_dead_target_aims_at_origin() {
    let mut engine = start(MatchMode::SinglePlayer);
    set_heat_seek(&mut engine, PlayerSlot::One, 0.5);
    let asteroid = first_asteroid(&engine);
    let missile = launch_homing(&mut engine, PlayerSlot::One, Some(asteroid), 0.0);
    engine.session_mut().unwrap().registry.mark_for_destroy(asteroid);
    engine.flush_pending();

    engine.tick();
    assert!(engine.session().unwrap().registry.is_live(missile));
    assert_steered(&engine, missile, DVec3::ZERO, 0.5);
}

#[test]
fn test_missile_falls_back_to_launch_strength_without_owner() {
    let mut engine = start(MatchMode::SinglePlayer);
    set_heat_seek(&mut engine, PlayerSlot::One, 0.5);
    let asteroids: Vec<EntityTag> = engine
        .session()
        .unwrap()
        .registry
        .iter(EntityKind::Asteroid)
        .take(2)
        .collect();
    let (gone, target) = (asteroids[0], asteroids[1]);
    let missile = launch_homing(&mut engine, PlayerSlot::One, Some(target), 0.25);

    // Hand the missile to an owner that is no longer live.
    let session = engine.session_mut().unwrap();
    session.registry.get_mut::<Projectile>(missile).unwrap().owner = gone;
    session.registry.mark_for_destroy(gone);
    engine.flush_pending();

    engine.tick();
    assert!(engine.session().unwrap().registry.is_live(missile));
    assert_steered(&engine, missile, position(&engine, target), 0.25);
}

// ---- Pickups ----

#[test]
fn test_pickup_is_singleton() {
    let mut engine = start(MatchMode::Versus);
    engine.session_mut().unwrap().config.pickup.spawn_chance = 1.0;

    for i in 0..120 {
        engine.tick();
        let session = engine.session().unwrap();
        let pickups = session.registry.count(EntityKind::Pickup);
        assert!(pickups <= 1, "tick {i}: {pickups} pickups");
        assert_eq!(session.pickup.is_some(), pickups == 1);
    }
}

#[test]
fn test_no_pickups_in_single_player() {
    let mut engine = start(MatchMode::SinglePlayer);
    engine.session_mut().unwrap().config.pickup.spawn_chance = 1.0;
    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(engine.session().unwrap().registry.count(EntityKind::Pickup), 0);
}

#[test]
fn test_pickup_collection_applies_effect() {
    let mut engine = start(MatchMode::Versus);
    engine.session_mut().unwrap().config.pickup.spawn_chance = 1.0;
    let snap = engine.tick();
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::PickupSpawned { .. })));

    let pickup = engine.session().unwrap().pickup.unwrap();
    let kind = engine
        .session()
        .unwrap()
        .registry
        .get::<Pickup>(pickup)
        .unwrap()
        .kind;
    engine.session_mut().unwrap().config.pickup.spawn_chance = 0.0;

    let ship = craft_tag(&engine, PlayerSlot::Two);
    let before = craft(&engine, PlayerSlot::Two);
    engine.apply_contacts(&[contact(pickup, ship)]);

    let after = craft(&engine, PlayerSlot::Two);
    match kind {
        PickupKind::RadarReveal => assert!(after.has_radar),
        PickupKind::HeatSeekBoost => {
            assert!((after.heat_seek_strength - before.heat_seek_strength - 0.01).abs() < 1e-12)
        }
    }
    let session = engine.session().unwrap();
    assert!(session.pickup.is_none());
    assert_eq!(session.registry.count(EntityKind::Pickup), 0);
}

#[test]
fn test_pickup_keeps_cruise_speed() {
    let mut engine = start(MatchMode::Versus);
    engine.session_mut().unwrap().config.pickup.spawn_chance = 1.0;
    engine.tick();
    let pickup = engine.session().unwrap().pickup.unwrap();
    let speed = engine
        .session()
        .unwrap()
        .registry
        .get::<Pickup>(pickup)
        .unwrap()
        .cruise_speed;
    engine.session_mut().unwrap().config.pickup.spawn_chance = 0.0;

    for _ in 0..10 {
        engine.tick();
        let session = engine.session().unwrap();
        if !session.registry.is_live(pickup) {
            return;
        }
        let handle = session.registry.body(pickup).unwrap();
        let velocity = engine.physics().body(handle).unwrap().linear_velocity;
        assert!((velocity.length() - speed).abs() < 1e-9);
    }
}

// ---- Snapshot ----

#[test]
fn test_snapshot_hud_during_match() {
    let mut engine = start(MatchMode::SinglePlayer);
    let snap = engine.tick();

    let hud = snap.hud.unwrap();
    assert_eq!(hud.mode, MatchMode::SinglePlayer);
    assert_eq!(hud.target_score, 70);
    assert_eq!(hud.craft.len(), 1);
    assert_eq!(hud.craft[0].lives_remaining, 3);
    assert_eq!(snap.entities.len(), 22);
    assert!(snap.entities.iter().any(|e| e.kind == EntityKind::Craft
        && e.position == DVec3::ZERO
        && e.slot == Some(PlayerSlot::One)));
}

#[test]
fn test_snapshot_events_drain_each_tick() {
    let mut engine = start(MatchMode::SinglePlayer);
    let ship = craft_tag(&engine, PlayerSlot::One);
    let asteroid = first_asteroid(&engine);
    engine.apply_contacts(&[contact(ship, asteroid)]);

    let snap = engine.tick();
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::CraftDamaged { lives_remaining: 2, .. })));
    assert!(snap.audio_events.contains(&AudioEvent::Crash));

    let snap = engine.tick();
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::CraftDamaged { .. })));
}
