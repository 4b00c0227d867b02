//! Snapshot system: builds the read-only GameStateSnapshot.
//!
//! This system never modifies the session or the physics world.

use glam::{DQuat, DVec3};

use trashdroids_core::components::*;
use trashdroids_core::config::MatchConfig;
use trashdroids_core::enums::*;
use trashdroids_core::events::{AudioEvent, GameEvent};
use trashdroids_core::state::*;
use trashdroids_core::types::{format_match_time, SimTime};
use trashdroids_physics::PhysicsWorld;

use crate::registry::KindFilter;
use crate::session::MatchSession;

/// Engine-level state that is not part of a session.
pub struct SnapshotInputs<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub menu_item: MenuItem,
    /// Parameters of the mode under the menu cursor.
    pub menu_config: &'a MatchConfig,
    pub summary: Option<MatchSummary>,
    pub last_error: Option<String>,
    pub exit_requested: bool,
}

pub fn build_snapshot(
    inputs: SnapshotInputs<'_>,
    session: Option<&MatchSession>,
    physics: &dyn PhysicsWorld,
    events: Vec<GameEvent>,
    audio_events: Vec<AudioEvent>,
) -> GameStateSnapshot {
    let (entities, hud) = match session {
        Some(session) => (
            build_entities(session, physics),
            Some(build_hud(session)),
        ),
        None => (Vec::new(), None),
    };

    GameStateSnapshot {
        time: inputs.time,
        phase: inputs.phase,
        menu: build_menu(inputs.menu_item, inputs.menu_config),
        entities,
        hud,
        events,
        audio_events,
        summary: inputs.summary,
        last_error: inputs.last_error,
        exit_requested: inputs.exit_requested,
    }
}

fn build_menu(selected: MenuItem, config: &MatchConfig) -> MenuView {
    MenuView {
        selected,
        universe_radius: config.universe.radius,
        asteroid_count: config.asteroids.count,
        stream_mode: config.missile.stream_mode,
        spread_mode: config.missile.spread_mode,
        destructible: config.asteroids.destructible,
        moveable: config.asteroids.moveable,
    }
}

/// Entity views in tag order.
fn build_entities(session: &MatchSession, physics: &dyn PhysicsWorld) -> Vec<EntityView> {
    let registry = &session.registry;
    registry
        .iter(KindFilter::All)
        .filter_map(|tag| {
            let kind = registry.kind(tag)?;
            let (position, orientation) = registry
                .body(tag)
                .and_then(|h| physics.body(h))
                .map_or((DVec3::ZERO, DQuat::IDENTITY), |b| (b.position, b.orientation));

            let mut view = EntityView {
                tag,
                kind,
                position,
                orientation,
                visible: true,
                asteroid_size: None,
                pickup_kind: None,
                slot: None,
            };
            match kind {
                EntityKind::Craft => {
                    if let Some(craft) = registry.get::<Craft>(tag) {
                        view.visible = craft.visible;
                        view.slot = Some(craft.slot);
                    }
                }
                EntityKind::Projectile => {
                    view.slot = registry
                        .get::<Projectile>(tag)
                        .and_then(|p| session.slot_of(p.owner));
                }
                EntityKind::Asteroid => {
                    view.asteroid_size = registry.get::<Asteroid>(tag).map(|a| a.size);
                }
                EntityKind::Pickup => {
                    view.pickup_kind = registry.get::<Pickup>(tag).map(|p| p.kind);
                }
                EntityKind::StaticBoundary => {}
            }
            Some(view)
        })
        .collect()
}

fn build_hud(session: &MatchSession) -> HudView {
    let craft = session
        .crafts
        .iter()
        .filter_map(|&tag| {
            let c = session.registry.get::<Craft>(tag)?;
            Some(CraftHud {
                tag,
                slot: c.slot,
                lives_remaining: c.lives_remaining,
                invincibility_secs: c.invincibility_secs,
                radar_reveal: c.has_radar,
                heat_seek_strength: c.heat_seek_strength,
            })
        })
        .collect();

    let progress_pct = if session.target_score > 0 {
        (f64::from(session.score) * 100.0 / f64::from(session.target_score)).min(100.0)
    } else {
        0.0
    };

    HudView {
        mode: session.mode,
        score: session.score,
        target_score: session.target_score,
        progress_pct,
        elapsed_secs: session.elapsed_secs,
        clock: format_match_time(session.elapsed_secs),
        craft,
    }
}
