use std::rc::Rc;

use rand::{SeedableRng, rngs::StdRng};

use mazelab::{
    config::PlaybackConfig,
    driver::{Driver, Race},
    generators::{Generation, Generator},
    maze::Grid,
    solvers::{Family, RobotLimits, Solve, Solver},
    stepping::{Status, Stepper},
};

const SIZES: [u16; 4] = [13, 21, 31, 43];

fn generate(generator: Generator, size: u16, seed: u64) -> Rc<Grid> {
    Generation::new(generator, size, Some(seed))
        .unwrap()
        .run_to_completion()
        .shared_grid()
}

fn punched(generator: Generator, size: u16, seed: u64, openings: usize) -> Rc<Grid> {
    let mut grid = Generation::new(generator, size, Some(seed))
        .unwrap()
        .run_to_completion()
        .into_grid();
    grid.punch_loops(openings, &mut StdRng::seed_from_u64(seed));
    Rc::new(grid)
}

fn solve(solver: Solver, grid: &Rc<Grid>, seed: u64) -> Solve {
    let (start, goal) = (grid.default_start(), grid.default_goal());
    Solve::new(solver, Rc::clone(grid), start, goal, Some(seed))
        .unwrap()
        .run_to_completion()
}

fn assert_walkable(grid: &Grid, path: &[mazelab::maze::Coord]) {
    for &cell in path {
        assert!(grid.is_open(cell), "{:?} is a wall", cell);
    }
    for pair in path.windows(2) {
        let ((ax, ay), (bx, by)) = (pair[0], pair[1]);
        assert_eq!(ax.abs_diff(bx) + ay.abs_diff(by), 1, "{:?} is not a step", pair);
    }
}

#[test]
fn test_every_generator_carves_a_perfect_maze() {
    for generator in Generator::ALL {
        for size in SIZES {
            let seed = u64::from(size) * 31;
            let grid = generate(generator, size, seed);
            assert!(grid.is_perfect(), "{} at {} is not perfect", generator, size);
            assert!(grid.room_cells().iter().all(|&room| grid.is_open(room)));
            assert_eq!(grid.open_connector_count(), grid.room_count() - 1);
        }
    }
}

#[test]
fn test_generation_is_reproducible_with_a_seed() {
    for generator in Generator::ALL {
        let a = generate(generator, 21, 99);
        let b = generate(generator, 21, 99);
        assert_eq!(a.to_rows(), b.to_rows(), "{}", generator);
    }
}

#[test]
fn test_generation_steps_leave_earlier_states_untouched() {
    for generator in Generator::ALL {
        let mut state = Generation::new(generator, 13, Some(5)).unwrap();
        while !state.is_finished() {
            let before = state.grid().to_rows();
            let next = state.step();
            assert_eq!(state.grid().to_rows(), before, "{}", generator);
            assert_eq!(next.step_count(), state.step_count() + 1);
            state = next;
        }
        assert_eq!(state.status(), Status::Complete);
        assert_eq!(state.progress(), 100);
    }
}

#[test]
fn test_search_path_lengths_on_perfect_mazes() {
    for generator in Generator::ALL {
        for size in SIZES {
            let grid = generate(generator, size, u64::from(size));
            let bfs = solve(Solver::Bfs, &grid, 0);
            let dfs = solve(Solver::Dfs, &grid, 0);
            let astar = solve(Solver::AStar, &grid, 0);
            for state in [&bfs, &dfs, &astar] {
                assert_eq!(state.status(), Status::Complete);
                assert_eq!(state.path().first(), Some(&grid.default_start()));
                assert_eq!(state.path().last(), Some(&grid.default_goal()));
                assert_walkable(&grid, state.path());
            }
            // Only one simple path exists
            assert_eq!(bfs.path().len(), astar.path().len());
            assert_eq!(bfs.path().len(), dfs.path().len());
        }
    }
}

#[test]
fn test_search_path_lengths_with_loops() {
    for size in SIZES {
        for seed in 0..3 {
            let grid = punched(Generator::Prim, size, seed, 10);
            let bfs = solve(Solver::Bfs, &grid, seed);
            let dfs = solve(Solver::Dfs, &grid, seed);
            let astar = solve(Solver::AStar, &grid, seed);
            assert_eq!(bfs.path().len(), astar.path().len());
            assert!(dfs.path().len() >= bfs.path().len());
            assert_walkable(&grid, dfs.path());
            // A* never needs to settle more cells than BFS
            assert!(astar.step_count() <= bfs.step_count());
        }
    }
}

#[test]
fn test_tremaux_solves_mazes_with_loops() {
    for size in [13, 21, 31] {
        for seed in 0..4 {
            let grid = punched(Generator::RecurBacktrack, size, seed, 6);
            let state = solve(Solver::Tremaux, &grid, seed);
            assert_eq!(state.status(), Status::Complete, "size {} seed {}", size, seed);
            assert_eq!(state.current(), Some(grid.default_goal()));
            assert_walkable(&grid, state.path());
        }
    }
}

#[test]
fn test_tremaux_solves_an_open_room() {
    let mut rows = vec!["#".repeat(11)];
    rows.extend((0..9).map(|_| format!("#{}#", ".".repeat(9))));
    rows.push("#".repeat(11));
    let grid = Rc::new(Grid::from_rows(&rows).unwrap());
    for seed in 0..5 {
        let state = solve(Solver::Tremaux, &grid, seed);
        assert_eq!(state.status(), Status::Complete);
    }
}

#[test]
fn test_pledge_follows_walls_through_a_perfect_maze() {
    let rows = [
        "#######", "#.....#", "#.###.#", "#.#.#.#", "#.#.#.#", "#.#...#", "#######",
    ];
    let grid = Rc::new(Grid::from_rows(&rows).unwrap());
    assert!(grid.is_perfect());
    let state = Solve::new(Solver::Pledge, Rc::clone(&grid), (1, 1), (3, 3), None)
        .unwrap()
        .run_to_completion();
    // Heading straight for the goal bounces up and down the left corridor
    // until the revisit limit hands control back to the wall
    assert_eq!(state.status(), Status::Complete);
    assert_eq!(state.current(), Some((3, 3)));
    assert_walkable(&grid, state.path());
}

/// A long corridor hanging off a single 2x2 open block.
fn island_grid() -> Rc<Grid> {
    let mut rows = vec![
        "###########",
        "######.####",
        "#####..####",
        "###....####",
    ];
    rows.extend(["###.#######"; 6]);
    rows.push("###########");
    Rc::new(Grid::from_rows(&rows).unwrap())
}

#[test]
fn test_pledge_escapes_a_small_loop() {
    let grid = island_grid();
    let state = Solve::new(Solver::Pledge, Rc::clone(&grid), (6, 1), (3, 9), None)
        .unwrap()
        .run_to_completion();
    assert_eq!(state.status(), Status::Complete);
    assert!(state.step_count() <= 40, "took {} steps", state.step_count());
    assert_walkable(&grid, state.path());
}

#[test]
fn test_pledge_orbits_forever_without_loop_escape() {
    let grid = island_grid();
    let limits = RobotLimits {
        pledge_loop_turns: 1_000_000,
        ..RobotLimits::default()
    };
    let state = Solve::with_limits(Solver::Pledge, Rc::clone(&grid), (6, 1), (3, 9), None, &limits)
        .unwrap()
        .run_to_completion();
    assert_eq!(state.status(), Status::Stuck);
    assert_eq!(state.step_count(), limits.pledge_budget_factor * grid.cell_count());
}

#[test]
fn test_pledge_solves_every_generated_perfect_maze() {
    for generator in Generator::ALL {
        for size in SIZES {
            for seed in 0..10 {
                let grid = generate(generator, size, seed);
                let state = solve(Solver::Pledge, &grid, seed);
                assert_eq!(
                    state.status(),
                    Status::Complete,
                    "{} size {} seed {} after {} steps",
                    generator,
                    size,
                    seed,
                    state.step_count()
                );
                assert_walkable(&grid, state.path());
            }
        }
    }
}

#[test]
fn test_pledge_always_terminates_on_mazes_with_loops() {
    for generator in Generator::ALL {
        let grid = punched(generator, 21, 3, 6);
        let state = solve(Solver::Pledge, &grid, 0);
        assert!(state.is_finished(), "{}", generator);
        assert!(state.step_count() <= RobotLimits::default().pledge_budget_factor * grid.cell_count());
    }
}

#[test]
fn test_random_walk_finds_an_adjacent_goal() {
    let rows = ["#####", "#...#", "#####", "#####", "#####"];
    let grid = Rc::new(Grid::from_rows(&rows).unwrap());
    for seed in 0..20 {
        let state = Solve::new(Solver::RandomWalk, Rc::clone(&grid), (2, 1), (3, 1), Some(seed))
            .unwrap()
            .run_to_completion();
        assert_eq!(state.status(), Status::Complete, "seed {}", seed);
        assert!(state.step_count() <= 40);
    }
}

#[test]
fn test_random_walk_gives_up_after_budget() {
    let rows = ["#####", "#.#.#", "#.###", "#####", "#####"];
    let grid = Rc::new(Grid::from_rows(&rows).unwrap());
    let state = Solve::new(Solver::RandomWalk, Rc::clone(&grid), (1, 1), (3, 1), Some(1))
        .unwrap()
        .run_to_completion();
    assert_eq!(state.status(), Status::Stuck);
    assert_eq!(state.step_count(), 3 * 25);
}

#[test]
fn test_terminal_states_are_fixed_points() {
    let grid = punched(Generator::Kruskal, 13, 8, 4);
    for solver in Solver::ALL {
        let done = solve(solver, &grid, 8);
        let again = done.step();
        assert_eq!(again.status(), done.status(), "{}", solver);
        assert_eq!(again.step_count(), done.step_count());
        assert_eq!(again.path(), done.path());
        assert_eq!(again.current(), done.current());
    }
    let generated = Generation::new(Generator::Wilson, 13, Some(8))
        .unwrap()
        .run_to_completion();
    let again = generated.step();
    assert_eq!(again.step_count(), generated.step_count());
    assert_eq!(again.grid().to_rows(), generated.grid().to_rows());
}

#[test]
fn test_stepping_back_restores_identical_states() {
    let playback = PlaybackConfig::default();
    let initial = Generation::new(Generator::Kruskal, 13, Some(2)).unwrap();
    let mut driver = Driver::new(initial, &playback);
    let mut rows = vec![driver.current().grid().to_rows()];
    for _ in 0..10 {
        driver.step_forward();
        rows.push(driver.current().grid().to_rows());
    }
    for expected in rows.iter().rev().skip(1) {
        assert!(driver.step_back());
        assert_eq!(&driver.current().grid().to_rows(), expected);
    }
    assert!(!driver.step_back());
}

#[test]
fn test_races_finish_with_stats_for_every_lane() {
    let playback = PlaybackConfig::default();
    let limits = RobotLimits::default();
    for family in [Family::ShortestPath, Family::Robot] {
        let grid = punched(Generator::Wilson, 21, 4, 6);
        let mut race = Race::new(family, grid, Some(4), &limits, &playback).unwrap();
        race.run_to_completion();
        assert!(race.is_finished());
        assert_eq!(race.lanes().len(), 3);
        for (lane, stats) in race.lanes().iter().zip(race.stats()) {
            let stats = stats.as_ref().unwrap();
            assert_eq!(stats.solver, lane.solver());
            assert_eq!(stats.status, lane.status());
            assert_eq!(stats.steps, lane.step_count());
        }
    }
}
