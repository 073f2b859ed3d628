//! Per-frame simulation tick and turn state machine
//!
//! One tick runs the whole pipeline for the active shooter: firing, movement,
//! pickups, enemies, enemy contact, camera, bullets, bullet hits. Then it
//! decides whether the turn is over.

use glam::Vec2;

use super::combat::{handle_bullet_enemy_collisions, handle_enemy_collisions};
use super::entities::{
    MoveInput, follow_camera, live_bullet_bound, shoot_bullet, update_ammos, update_bullets,
    update_collectibles, update_enemies, update_shooter_position,
};
use super::state::{GameEvent, GamePhase, GameState, Shooter, TurnEnd, Viewport};
use crate::level::{LevelDataError, LevelSource};
use crate::settings::Settings;
use crate::summary::RoundSummary;

/// Input sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Screen-space point to shoot at (mouse click)
    pub fire_at: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    fn movement(&self) -> MoveInput {
        MoveInput {
            left: self.left,
            right: self.right,
            jump: self.jump,
        }
    }
}

/// Shooter's right edge has reached the finish flag
pub fn check_finish(shooter: &Shooter, settings: &Settings) -> bool {
    shooter.pos.x + shooter.size.x >= settings.world_width
}

/// Advance the session by one frame
pub fn tick(state: &mut GameState, settings: &Settings, input: &TickInput, dt: f32) {
    state.events.clear();

    // Pause toggle only applies while a turn is running; between-turn and
    // summary pauses are left through `resume`/`advance_to_next_level`.
    let Some(player) = state.active_index() else {
        return;
    };
    if input.pause {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }
    if state.paused {
        return;
    }

    let dt = settings.effective_dt(dt);
    state.time_ticks += 1;

    run_pipeline(state, player, settings, input, dt);

    let shooter = &mut state.shooters[player];
    clamp_to_world(shooter, settings);
    shooter.animation.advance(dt);
    shooter.time += f64::from(dt);

    if player == 0 {
        state.player1_carry = shooter.stats();
    }

    let reason = if shooter.dead {
        Some(TurnEnd::Died)
    } else if check_finish(shooter, settings) {
        Some(TurnEnd::Finished)
    } else {
        None
    };
    if let Some(reason) = reason {
        end_turn(state, player, reason, settings);
    }
}

/// Entity updates and combat for the active shooter
fn run_pipeline(
    state: &mut GameState,
    player: usize,
    settings: &Settings,
    input: &TickInput,
    dt: f32,
) {
    let GameState {
        level,
        shooters,
        platforms,
        enemies,
        collectibles,
        ammo_pickups,
        bullets,
        camera_x,
        events,
        ..
    } = state;
    let shooter = &mut shooters[player];

    if let Some(target) = input.fire_at {
        shoot_bullet(shooter, target, *camera_x, bullets, settings, events);
    }

    update_shooter_position(shooter, &input.movement(), platforms, settings, dt);
    update_collectibles(shooter, collectibles, settings, events);
    update_ammos(shooter, ammo_pickups, settings, events);

    let view = Viewport {
        camera_x: *camera_x,
        width: settings.screen_width,
        height: settings.screen_height,
    };
    update_enemies(shooter, enemies, platforms, &view, dt);
    handle_enemy_collisions(player, shooter, enemies, camera_x, settings, events);
    follow_camera(camera_x, shooter, settings.screen_width);

    // Bullets are judged against the camera after it has followed the shooter
    let view = Viewport {
        camera_x: *camera_x,
        ..view
    };
    let bound = live_bullet_bound(level.start_ammo, ammo_pickups.len(), bullets, settings);
    update_bullets(bullets, bound, platforms, &view, settings, dt);
    handle_bullet_enemy_collisions(shooter, bullets, bound, enemies, settings, events);
}

/// Keep the shooter above the ground and right of the left boundary
fn clamp_to_world(shooter: &mut Shooter, settings: &Settings) {
    if shooter.pos.y >= settings.ground_level {
        shooter.pos.y = settings.ground_level;
        shooter.velocity_y = 0.0;
        shooter.on_ground = true;
    }
    if shooter.pos.x < settings.left_boundary {
        shooter.pos.x = settings.left_boundary;
    }
}

/// Hand over to player 2, or end the round after player 2
fn end_turn(state: &mut GameState, player: usize, reason: TurnEnd, settings: &Settings) {
    log::info!("Player {} turn over: {:?}", player + 1, reason);
    state.events.push(GameEvent::TurnEnded { player, reason });

    if player == 0 {
        // Player 2 gets a fresh copy of the level; player 1 keeps their numbers
        let died = reason == TurnEnd::Died;
        let carry = state.player1_carry;
        state.reload_level(settings);

        state.shooters[0].restore_stats(&carry);
        if died {
            state.shooters[0].dead = true;
        }
        state.phase = GamePhase::LevelTransition;
        state.paused = true;
    } else {
        state.phase = GamePhase::RoundSummary;
        state.paused = true;
        state.events.push(GameEvent::MatchEnded);
        if let Some(summary) = RoundSummary::from_state(state) {
            log::info!("Round over: {}", summary.outcome);
        }
    }
}

/// Start a match on level `index` of the source
pub fn start_level(
    levels: &impl LevelSource,
    index: usize,
    settings: &Settings,
) -> Result<GameState, LevelDataError> {
    let level = levels.load(index)?;
    GameState::new(index, level, settings)
}

/// Dismiss the summary by moving both players on to the next level
///
/// Fails with `UnknownLevel` past the last level; the caller then returns to
/// level selection.
pub fn advance_to_next_level(
    state: &mut GameState,
    levels: &impl LevelSource,
    settings: &Settings,
) -> Result<(), LevelDataError> {
    if state.phase != GamePhase::RoundSummary {
        log::warn!("Advancing level from {:?}", state.phase);
    }
    *state = start_level(levels, state.level_index + 1, settings)?;
    Ok(())
}

/// Where dismissing the round summary leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// Next level loaded, player 1 to play
    NextLevel,
    /// No more levels; the caller shows level selection
    LevelSelect,
}

/// Leave the summary screen
pub fn dismiss_summary(
    state: &mut GameState,
    levels: &impl LevelSource,
    settings: &Settings,
) -> Result<Dismissal, LevelDataError> {
    if state.level_index + 1 >= levels.level_count() {
        log::info!("Last level done, back to level select");
        return Ok(Dismissal::LevelSelect);
    }
    advance_to_next_level(state, levels, settings)?;
    Ok(Dismissal::NextLevel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelCatalog, LevelDefinition};
    use crate::sim::state::{Bullet, Enemy, EnemyBehavior, Platform};
    use crate::summary::MatchOutcome;

    const DT: f32 = 1.0 / 60.0;

    /// Flat level with nothing in the way
    fn empty_level() -> LevelDefinition {
        LevelDefinition {
            name: "flat".to_string(),
            platforms: Vec::new(),
            enemies: Vec::new(),
            collectibles: Vec::new(),
            ammo_pickups: Vec::new(),
            ..LevelDefinition::builtin_course()
        }
    }

    fn new_state(level: LevelDefinition) -> (GameState, Settings) {
        let settings = Settings::default();
        let state = GameState::new(0, level, &settings).unwrap();
        (state, settings)
    }

    fn run_right() -> TickInput {
        TickInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_check_finish_boundary() {
        let settings = Settings::default();
        let mut shooter = Shooter::spawn(Vec2::splat(100.0), 3, 3, settings.ground_level);
        shooter.pos.x = 2899.0;
        assert!(!check_finish(&shooter, &settings));
        shooter.pos.x = 2900.0;
        assert!(check_finish(&shooter, &settings));
    }

    #[test]
    fn test_time_and_carry_accumulate() {
        let (mut state, settings) = new_state(empty_level());
        for _ in 0..60 {
            tick(&mut state, &settings, &TickInput::default(), DT);
        }
        assert_eq!(state.time_ticks, 60);
        assert!((state.shooters[0].time - 1.0).abs() < 1e-4);
        assert_eq!(state.player1_carry, state.shooters[0].stats());
        assert_eq!(state.shooters[1].time, 0.0);
    }

    #[test]
    fn test_pause_toggle() {
        let (mut state, settings) = new_state(empty_level());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &settings, &pause, DT);
        assert!(state.paused);
        assert_eq!(state.time_ticks, 0);

        tick(&mut state, &settings, &run_right(), DT);
        assert_eq!(state.time_ticks, 0);

        // Unpausing runs the same tick
        tick(&mut state, &settings, &pause, DT);
        assert!(!state.paused);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_player1_finish_hands_over() {
        let (mut state, settings) = new_state(empty_level());
        state.shooters[0].pos.x = 2899.0;
        state.shooters[0].score = 50;

        tick(&mut state, &settings, &run_right(), DT);

        assert_eq!(state.phase, GamePhase::LevelTransition);
        assert!(state.paused);
        assert!(!state.is_player1_turn());
        assert!(state.events.contains(&GameEvent::TurnEnded {
            player: 0,
            reason: TurnEnd::Finished
        }));

        // Level reloaded for player 2, player 1's numbers kept
        assert_eq!(state.shooters[0].score, 50);
        assert!(state.shooters[0].time > 0.0);
        assert_eq!(state.shooters[0].pos.x, 0.0);
        assert_eq!(state.shooters[1].pos.x, 0.0);
        assert_eq!(state.camera_x, 0.0);

        // Nothing moves until the UI acknowledges
        tick(&mut state, &settings, &run_right(), DT);
        assert_eq!(state.shooters[1].pos.x, 0.0);

        state.resume();
        assert_eq!(state.phase, GamePhase::Player2Turn);
        tick(&mut state, &settings, &run_right(), DT);
        assert!(state.shooters[1].pos.x > 0.0);
        assert_eq!(state.shooters[0].score, 50);
    }

    #[test]
    fn test_player1_death_recorded() {
        let mut level = empty_level();
        level.enemies.push(Enemy {
            pos: Vec2::new(20.0, 560.0),
            size: Vec2::splat(30.0),
            active: true,
            speed: 0.0,
            behavior: EnemyBehavior::Chaser,
            animation: Default::default(),
        });
        let (mut state, settings) = new_state(level);
        state.shooters[0].health = 1;

        tick(&mut state, &settings, &TickInput::default(), DT);

        assert_eq!(state.phase, GamePhase::LevelTransition);
        assert!(state.shooters[0].dead);
        assert_eq!(state.shooters[0].health, 0);
        // Enemies are back for player 2
        assert!(state.enemies[0].active);
        assert!(!state.shooters[1].dead);
    }

    #[test]
    fn test_player2_finish_shows_summary() {
        let (mut state, settings) = new_state(empty_level());
        state.shooters[0].pos.x = 2899.0;
        tick(&mut state, &settings, &run_right(), DT);
        state.resume();

        // Player 2 starts further back and needs three ticks
        state.shooters[1].pos.x = 2891.0;
        let mut ticks = 0;
        while state.phase == GamePhase::Player2Turn && ticks < 10 {
            tick(&mut state, &settings, &run_right(), DT);
            ticks += 1;
        }
        assert_eq!(ticks, 3);

        assert_eq!(state.phase, GamePhase::RoundSummary);
        assert!(state.paused);
        assert!(state.events.contains(&GameEvent::MatchEnded));
        // No reload: player 2 is still at the flag
        assert!(state.shooters[1].pos.x >= 2900.0);

        // Summary can't be unpaused by the pause key or resume
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &settings, &pause, DT);
        state.resume();
        assert_eq!(state.phase, GamePhase::RoundSummary);
        assert!(state.paused);

        let summary = RoundSummary::from_state(&state).unwrap();
        // Same score and health; player 1 was faster
        assert_eq!(summary.outcome, MatchOutcome::Player1Wins);
    }

    #[test]
    fn test_enemy_contact_resets_camera() {
        let mut level = empty_level();
        level.enemies.push(Enemy {
            pos: Vec2::new(1250.0, 560.0),
            size: Vec2::splat(30.0),
            active: true,
            speed: 0.0,
            behavior: EnemyBehavior::Chaser,
            animation: Default::default(),
        });
        let (mut state, settings) = new_state(level);
        state.shooters[0].pos.x = 1200.0;
        state.camera_x = 800.0;

        tick(&mut state, &settings, &TickInput::default(), DT);
        assert_eq!(state.shooters[0].health, 2);
        assert_eq!(state.shooters[0].pos.x, 0.0);
        assert_eq!(state.camera_x, 0.0);
        assert_eq!(state.phase, GamePhase::Player1Turn);
    }

    #[test]
    fn test_camera_follows() {
        let (mut state, settings) = new_state(empty_level());
        state.shooters[0].pos.x = 1000.0;
        tick(&mut state, &settings, &TickInput::default(), DT);
        assert_eq!(state.camera_x, 600.0);
    }

    #[test]
    fn test_fire_and_kill() {
        let mut level = empty_level();
        level.enemies.push(Enemy {
            pos: Vec2::new(300.0, 580.0),
            size: Vec2::splat(40.0),
            active: true,
            speed: 0.0,
            behavior: EnemyBehavior::Chaser,
            animation: Default::default(),
        });
        let (mut state, settings) = new_state(level);

        // Shooter center is (50, 600); aim straight right
        let fire = TickInput {
            fire_at: Some(Vec2::new(400.0, 595.0)),
            ..Default::default()
        };
        tick(&mut state, &settings, &fire, DT);
        assert_eq!(state.shooters[0].ammo, 2);
        assert!(state.events.contains(&GameEvent::BulletFired { slot: 0 }));

        for _ in 0..60 {
            tick(&mut state, &settings, &TickInput::default(), DT);
            if !state.enemies[0].active {
                break;
            }
        }
        assert!(!state.enemies[0].active);
        assert_eq!(state.shooters[0].score, settings.chaser_kill_score);
        assert_eq!(state.bullets.active_count(), 0);
    }

    #[test]
    fn test_bullets_keep_flying_after_ammo_drops() {
        let (mut state, settings) = new_state(empty_level());
        let fire = TickInput {
            fire_at: Some(Vec2::new(700.0, 595.0)),
            ..Default::default()
        };
        tick(&mut state, &settings, &fire, DT);
        tick(&mut state, &settings, &fire, DT);
        assert_eq!(state.shooters[0].ammo, 1);
        assert_eq!(state.bullets.active_count(), 2);

        let before = *state.bullets.get(1).unwrap();
        tick(&mut state, &settings, &TickInput::default(), DT);
        let after = *state.bullets.get(1).unwrap();
        assert!(after.pos.x > before.pos.x);
        assert!(after.lifespan < before.lifespan);

        // Both leave the right edge of the screen within a few seconds
        for _ in 0..300 {
            tick(&mut state, &settings, &TickInput::default(), DT);
        }
        assert_eq!(state.bullets.active_count(), 0);
    }

    #[test]
    fn test_bullet_stopped_by_platform() {
        let mut level = empty_level();
        level.platforms.push(Platform::new(200.0, 400.0, 20.0, 100.0));
        let (mut state, settings) = new_state(level);
        state.bullets.slots_mut()[0] = Bullet {
            pos: Vec2::new(150.0, 440.0),
            dir: Vec2::X,
            speed: 500.0,
            lifespan: 1000.0,
            active: true,
        };
        tick(&mut state, &settings, &TickInput::default(), 0.1);
        assert!(!state.bullets.get(0).unwrap().active);
    }

    #[test]
    fn test_advance_to_next_level() {
        let catalog = LevelCatalog::builtin();
        let settings = Settings::default();
        let mut state = start_level(&catalog, 0, &settings).unwrap();
        state.phase = GamePhase::RoundSummary;
        state.paused = true;
        state.shooters[0].score = 99;

        advance_to_next_level(&mut state, &catalog, &settings).unwrap();
        assert_eq!(state.level_index, 1);
        assert_eq!(state.level.name, "Gauntlet");
        assert_eq!(state.phase, GamePhase::Player1Turn);
        assert!(!state.paused);
        assert_eq!(state.shooters[0].score, 0);

        state.phase = GamePhase::RoundSummary;
        let err = advance_to_next_level(&mut state, &catalog, &settings).unwrap_err();
        assert!(matches!(err, LevelDataError::UnknownLevel { index: 2, .. }));
        // Failed advance leaves the state alone
        assert_eq!(state.level_index, 1);
    }

    #[test]
    fn test_dismiss_summary() {
        let catalog = LevelCatalog::builtin();
        let settings = Settings::default();
        let mut state = start_level(&catalog, 0, &settings).unwrap();
        state.phase = GamePhase::RoundSummary;
        assert_eq!(
            dismiss_summary(&mut state, &catalog, &settings).unwrap(),
            Dismissal::NextLevel
        );
        assert_eq!(state.level_index, 1);

        state.phase = GamePhase::RoundSummary;
        assert_eq!(
            dismiss_summary(&mut state, &catalog, &settings).unwrap(),
            Dismissal::LevelSelect
        );
        assert_eq!(state.phase, GamePhase::RoundSummary);
    }

    #[test]
    fn test_dt_clamp() {
        let settings = Settings {
            max_dt: Some(0.05),
            ..Settings::default()
        };
        let mut state = GameState::new(0, empty_level(), &settings).unwrap();
        tick(&mut state, &settings, &run_right(), 10.0);
        assert!((state.shooters[0].pos.x - 10.0).abs() < 1e-4);
        assert!((state.shooters[0].time - 0.05).abs() < 1e-6);
    }
}
