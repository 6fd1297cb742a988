//! Movement integration test
//!
//! Headless App + Grid: MoveIntent → destination, коллизии, PlayerController,
//! level layout со стенами, конкуренция movers за один тайл.

use bevy::prelude::*;
use gridwalk_simulation::*;

fn create_grid_app(grid: Grid) -> App {
    let mut app = create_headless_app(3);
    app.insert_resource(grid);
    app.add_plugins(SimulationPlugin);
    app
}

fn spawn_mover(app: &mut App, mover: Mover, tile: IVec2, collidable: bool) -> Entity {
    let position = Position::from_grid(app.world().resource::<Grid>(), tile);
    let mut entity = app.world_mut().spawn((mover, position));
    entity.set_collision_obstacle(collidable);
    entity.id()
}

fn destination_grid(app: &App, entity: Entity) -> IVec2 {
    let grid = app.world().resource::<Grid>();
    app.world().get::<Mover>(entity).unwrap().destination_grid(grid)
}

fn position(app: &App, entity: Entity) -> Vec2 {
    app.world().get::<Position>(entity).unwrap().0
}

fn rejections(app: &App) -> Vec<MoveRejected> {
    app.world()
        .resource::<Events<MoveRejected>>()
        .iter_current_update_events()
        .copied()
        .collect()
}

const NORTH_EAST: MoveDirection = MoveDirection { west: false, east: true, north: true, south: false };

#[test]
fn test_diagonal_intent_reaches_north_east_tile() {
    let mut app = create_grid_app(Grid::new(32.0, 32.0).unwrap());
    let player = spawn_mover(&mut app, Mover::new(MovementMode::Speed).with_speed(4.0), IVec2::ZERO, true);

    app.world_mut().send_event(MoveIntent { entity: player, direction: NORTH_EAST });
    for _ in 0..60 {
        run_fixed_tick(&mut app);
    }

    let mover = app.world().get::<Mover>(player).unwrap();
    assert!(!mover.is_moving());
    assert_eq!(mover.facing_angle_degrees(), 315.0);
    assert_eq!(position(&app, player), Vec2::new(32.0, -32.0));
}

#[test]
fn test_diagonal_slides_along_wall() {
    let mut grid = Grid::new(32.0, 32.0).unwrap();
    grid.block(IVec2::new(1, -1));
    let mut app = create_grid_app(grid);
    let player = spawn_mover(&mut app, Mover::new(MovementMode::Teleport), IVec2::ZERO, true);

    app.world_mut().send_event(MoveIntent { entity: player, direction: NORTH_EAST });
    run_fixed_tick(&mut app);

    assert_eq!(destination_grid(&app, player), IVec2::new(1, 0));
    assert_eq!(position(&app, player), Vec2::new(32.0, 0.0));
}

#[test]
fn test_fully_blocked_diagonal_reports_rejection() {
    let mut grid = Grid::new(32.0, 32.0).unwrap();
    grid.block(IVec2::new(1, 0));
    grid.block(IVec2::new(0, -1));
    let mut app = create_grid_app(grid);
    let player = spawn_mover(&mut app, Mover::new(MovementMode::Teleport), IVec2::ZERO, true);

    app.world_mut().send_event(MoveIntent { entity: player, direction: NORTH_EAST });
    run_fixed_tick(&mut app);

    assert_eq!(destination_grid(&app, player), IVec2::ZERO);
    assert_eq!(app.world().get::<Mover>(player).unwrap().facing_angle_degrees(), 315.0);
    assert_eq!(
        rejections(&app),
        vec![MoveRejected { entity: player, reason: RejectedCommand::Blocked }]
    );
}

#[test]
fn test_first_committed_mover_claims_contested_tile() {
    let mut app = create_grid_app(Grid::new(32.0, 32.0).unwrap());
    let left = spawn_mover(&mut app, Mover::new(MovementMode::Speed), IVec2::new(0, 0), true);
    let right = spawn_mover(&mut app, Mover::new(MovementMode::Speed), IVec2::new(2, 0), true);

    // Оба хотят тайл (1, 0) в одном tick
    app.world_mut().send_event(MoveIntent {
        entity: left,
        direction: MoveDirection::new(false, true, false, false),
    });
    app.world_mut().send_event(MoveIntent {
        entity: right,
        direction: MoveDirection::new(true, false, false, false),
    });
    run_fixed_tick(&mut app);

    assert_eq!(destination_grid(&app, left), IVec2::new(1, 0));
    assert_eq!(destination_grid(&app, right), IVec2::new(2, 0));
    assert_eq!(
        rejections(&app),
        vec![MoveRejected { entity: right, reason: RejectedCommand::Blocked }]
    );
}

#[test]
fn test_non_collidable_movers_can_share_tile() {
    let mut app = create_grid_app(Grid::new(32.0, 32.0).unwrap());
    let ghost = spawn_mover(&mut app, Mover::new(MovementMode::Teleport), IVec2::new(0, 0), false);
    let other = spawn_mover(&mut app, Mover::new(MovementMode::Teleport), IVec2::new(2, 0), false);

    app.world_mut().send_event(MoveIntent {
        entity: ghost,
        direction: MoveDirection::new(false, true, false, false),
    });
    app.world_mut().send_event(MoveIntent {
        entity: other,
        direction: MoveDirection::new(true, false, false, false),
    });
    run_fixed_tick(&mut app);

    assert_eq!(destination_grid(&app, ghost), IVec2::new(1, 0));
    assert_eq!(destination_grid(&app, other), IVec2::new(1, 0));
}

#[test]
fn test_intent_while_moving_is_rejected() {
    let mut app = create_grid_app(Grid::new(32.0, 32.0).unwrap());
    let player = spawn_mover(&mut app, Mover::new(MovementMode::Lerp), IVec2::ZERO, true);

    app.world_mut().send_event(MoveIntent {
        entity: player,
        direction: MoveDirection::new(false, true, false, false),
    });
    run_fixed_tick(&mut app);
    app.world_mut().send_event(MoveIntent {
        entity: player,
        direction: MoveDirection::new(false, false, false, true),
    });
    run_fixed_tick(&mut app);

    assert_eq!(destination_grid(&app, player), IVec2::new(1, 0));
    assert_eq!(
        rejections(&app),
        vec![MoveRejected { entity: player, reason: RejectedCommand::AlreadyMoving }]
    );
}

#[test]
fn test_player_controller_walks_while_held() {
    let mut app = create_grid_app(Grid::new(32.0, 32.0).unwrap());
    let position = Position::from_grid(app.world().resource::<Grid>(), IVec2::ZERO);
    let player = app
        .world_mut()
        .spawn((
            PlayerController::default(),
            Mover::new(MovementMode::Teleport),
            CollisionObstacle,
            position,
        ))
        .id();

    app.world_mut().get_mut::<PlayerController>(player).unwrap().press(MoveAction::East);
    for _ in 0..3 {
        run_fixed_tick(&mut app);
    }
    assert_eq!(destination_grid(&app, player), IVec2::new(3, 0));

    app.world_mut().get_mut::<PlayerController>(player).unwrap().release(MoveAction::East);
    for _ in 0..3 {
        run_fixed_tick(&mut app);
    }
    assert_eq!(destination_grid(&app, player), IVec2::new(3, 0));
}

#[test]
fn test_level_walls_stop_player() {
    let layout = LevelLayout::from_toml_str(
        r#"
        tile_width = 16.0
        tile_height = 16.0

        [mover_defaults]
        mode = "Teleport"

        [[collision_layers]]
        origin = [-1, -1]
        rows = [
            '#####',
            '#...#',
            '#####',
        ]
        "#,
    )
    .unwrap();

    let mut app = create_headless_app(5);
    app.add_plugins(SimulationPlugin);
    load_level(app.world_mut(), &layout).unwrap();

    let settings = *app.world().resource::<MoverSettings>();
    let player = app
        .world_mut()
        .spawn((PlayerController::default(), Mover::from_settings(&settings), Position::new(0.0, 0.0)))
        .id();

    app.world_mut().get_mut::<PlayerController>(player).unwrap().press(MoveAction::East);
    for _ in 0..10 {
        run_fixed_tick(&mut app);
    }

    // Коридор (0..=2, 0), стена на x = 3
    assert_eq!(destination_grid(&app, player), IVec2::new(2, 0));
    assert_eq!(position(&app, player), Vec2::new(32.0, 0.0));
}

#[test]
fn test_speed_and_teleport_always_come_to_rest_on_destination() {
    for mode in [MovementMode::Speed, MovementMode::Teleport, MovementMode::Lerp, MovementMode::Mixed] {
        let mut app = create_grid_app(Grid::new(32.0, 32.0).unwrap());
        let mover = spawn_mover(&mut app, Mover::new(mode), IVec2::ZERO, true);

        app.world_mut().send_event(MoveIntent {
            entity: mover,
            direction: MoveDirection::new(true, false, false, true),
        });
        for _ in 0..120 {
            run_fixed_tick(&mut app);
        }

        let state = app.world().get::<Mover>(mover).unwrap();
        assert!(!state.is_moving(), "{:?} still moving", mode);
        assert_eq!(position(&app, mover), state.destination(), "{:?}", mode);
        assert_eq!(destination_grid(&app, mover), IVec2::new(-1, 1), "{:?}", mode);
    }
}
