mod common;

use bevy::prelude::*;
use isometric_brawler::enemies::{find_path, EnemyDefinition};
use isometric_brawler::world::terrain::TerrainGrid;
use isometric_brawler::world::Simulation;

fn assert_connected(terrain: &TerrainGrid, path: &[IVec2]) {
    for pair in path.windows(2) {
        let step = (pair[0] - pair[1]).abs();
        assert!(step.max_element() == 1, "{} -> {} is not one step", pair[1], pair[0]);
        assert!(terrain.is_traversable(pair[0]));
    }
}

#[test]
fn route_goes_around_a_rock_wall() {
    let mut terrain = TerrainGrid::flat(16, 16).unwrap();
    for y in 0..12 {
        terrain.place_obstacle(IVec2::new(6, y));
    }

    let path = find_path(&terrain, IVec2::new(2, 2), IVec2::new(10, 2)).expect("a route exists");
    assert_eq!(path.last(), Some(&IVec2::new(2, 2)));
    assert!((path[0] - IVec2::new(10, 2)).abs().max_element() <= 1);
    assert!(path.iter().all(|t| !terrain.has_obstacle(*t)));
    assert!(path.iter().any(|t| t.y >= 12), "the route must pass the end of the wall");
    assert_connected(&terrain, &path);
}

#[test]
fn generated_world_routes_avoid_rocks() {
    let simulation = Simulation::new_game(common::seeded_tunables(), EnemyDefinition::default()).unwrap();
    let terrain = simulation.terrain();
    let goal = (5..10)
        .flat_map(|x| (5..10).map(move |y| IVec2::new(x, y)))
        .find(|t| terrain.is_valid_move(*t, 0.0))
        .expect("the centre is not fully blocked");

    let routes: Vec<_> = simulation
        .tunables()
        .spawn_points
        .iter()
        .filter_map(|&(x, y)| find_path(terrain, IVec2::new(x, y), goal))
        .collect();
    assert!(!routes.is_empty());
    for path in &routes {
        assert!(path.iter().all(|t| !terrain.has_obstacle(*t)));
        assert_connected(terrain, path);
    }
}

#[test]
fn blocked_goal_has_no_route() {
    let mut terrain = TerrainGrid::flat(8, 8).unwrap();
    terrain.place_obstacle(IVec2::new(5, 5));
    assert_eq!(find_path(&terrain, IVec2::new(1, 1), IVec2::new(5, 5)), None);
}

#[test]
fn start_next_to_goal_is_a_single_tile_route() {
    let terrain = TerrainGrid::flat(8, 8).unwrap();
    let path = find_path(&terrain, IVec2::new(3, 3), IVec2::new(4, 4)).unwrap();
    assert_eq!(path, vec![IVec2::new(3, 3)]);
}
