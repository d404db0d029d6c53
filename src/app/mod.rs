mod renderer;
mod tile;

use std::{
    io::{Stdout, Write},
    rc::Rc,
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    style::Color,
    terminal::{self, ClearType},
};

pub use renderer::Renderer;
pub use tile::{Tile, compose};

use crate::{
    config::LabConfig,
    driver::{Driver, Race},
    error::Result,
    generators::{Generation, get_rng},
    solvers::Family,
    stepping::Stepper,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    /// Pause or resume the animation
    TogglePause,
    /// Step forward when paused
    Forward,
    /// Step backward when paused
    Backward,
    /// Increase animation speed
    SpeedUp,
    /// Decrease animation speed
    SlowDown,
    /// Run the current phase to its end
    Complete,
    /// Throw the maze away and carve a new one
    Regenerate,
    /// Terminal resize
    Resize,
    /// Leave the app
    Exit,
}

/// What is on screen right now.
enum Phase {
    Generating(Driver<Generation>),
    Racing(Race),
}

pub struct App {
    config: LabConfig,
    /// Number of mazes carved so far, mixed into the seed on regenerate
    round: u64,
}

impl App {
    /// Longest wait for input between frames
    const MAX_POLL_TIMEOUT: Duration = Duration::from_millis(100);

    pub fn new(config: LabConfig) -> Self {
        App { config, round: 0 }
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn seed(&self) -> Option<u64> {
        self.config.maze.seed.map(|s| s.wrapping_add(self.round))
    }

    fn start_generation(&mut self) -> Result<Phase> {
        let maze = &self.config.maze;
        let initial = Generation::new(maze.generator, maze.size, self.seed())?;
        tracing::info!(
            "Generating {}x{} maze with {} (round {})",
            maze.size,
            maze.size,
            maze.generator,
            self.round
        );
        self.round += 1;
        Ok(Phase::Generating(Driver::new(initial, &self.config.playback)))
    }

    /// Turns a finished maze into a race, punching loops first for robots.
    fn start_race(&self, driver: &Driver<Generation>) -> Result<Phase> {
        let family = self.config.race.family;
        let mut grid = driver.current().shared_grid();
        if family == Family::Robot && self.config.maze.extra_openings > 0 {
            let mut rng = get_rng(self.seed());
            Rc::make_mut(&mut grid).punch_loops(self.config.maze.extra_openings, &mut rng);
        }
        let mut race = Race::new(
            family,
            grid,
            self.seed(),
            &self.config.robot,
            &self.config.playback,
        )?;
        // Keep the speed the user picked while watching the generation
        *race.pace_mut() = driver.pace().clone();
        race.pace_mut().resume();
        tracing::info!("Racing the {} family", family);
        Ok(Phase::Racing(race))
    }

    /// Main application loop
    pub fn run(&mut self, stdout: &mut Stdout) -> Result<()> {
        tracing::info!("Started main app loop");
        let mut renderer = Renderer::new();
        let mut phase = self.start_generation()?;
        renderer.clear()?;

        loop {
            let now = Instant::now();
            let next_phase = match &mut phase {
                Phase::Generating(driver) => {
                    driver.tick(now);
                    let paused = driver.pace().is_paused();
                    if driver.current().is_finished() && !paused {
                        Some(self.start_race(driver)?)
                    } else {
                        None
                    }
                }
                Phase::Racing(race) => {
                    race.tick(now);
                    None
                }
            };
            if let Some(next) = next_phase {
                phase = next;
                renderer.clear()?;
            }

            self.draw(&mut renderer, &phase)?;

            let timeout = match &phase {
                Phase::Generating(driver) => driver.pace().interval(),
                Phase::Racing(race) => race.pace().interval(),
            };
            let Some(action) = App::poll_action(timeout.min(App::MAX_POLL_TIMEOUT))? else {
                continue;
            };
            tracing::debug!("[app loop] {:?}", action);

            match action {
                UserAction::Exit => break,
                UserAction::Regenerate => {
                    phase = self.start_generation()?;
                    renderer.clear()?;
                }
                UserAction::Resize => renderer.clear()?,
                action => App::apply(&mut phase, action),
            }
        }

        queue!(stdout, cursor::MoveTo(0, 0))?;
        stdout.flush()?;
        tracing::info!("Exiting main app loop");
        Ok(())
    }

    /// Playback actions that only touch the current phase.
    fn apply(phase: &mut Phase, action: UserAction) {
        match phase {
            Phase::Generating(driver) => {
                let paused = driver.pace().is_paused();
                match action {
                    UserAction::TogglePause => driver.pace_mut().toggle_pause(),
                    UserAction::Forward if paused => {
                        driver.step_forward();
                    }
                    UserAction::Backward if paused => {
                        driver.step_back();
                    }
                    UserAction::SpeedUp => driver.pace_mut().speed_up(),
                    UserAction::SlowDown => driver.pace_mut().slow_down(),
                    UserAction::Complete => driver.run_to_completion(),
                    _ => {}
                }
            }
            Phase::Racing(race) => {
                let paused = race.pace().is_paused();
                match action {
                    UserAction::TogglePause => race.pace_mut().toggle_pause(),
                    UserAction::Forward if paused => {
                        race.step_all();
                    }
                    UserAction::Backward if paused => {
                        race.step_back();
                    }
                    UserAction::SpeedUp => race.pace_mut().speed_up(),
                    UserAction::SlowDown => race.pace_mut().slow_down(),
                    UserAction::Complete => race.run_to_completion(),
                    _ => {}
                }
            }
        }
    }

    /// Wait up to `timeout` for a key press or resize and map it to an action
    fn poll_action(timeout: Duration) -> std::io::Result<Option<UserAction>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        // We only care about key presses events and resizes
        let action = match event::read()? {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                match key_event.code {
                    KeyCode::Esc => Some(UserAction::Exit),
                    KeyCode::Enter => Some(UserAction::TogglePause),
                    KeyCode::Left => Some(UserAction::Backward),
                    KeyCode::Right => Some(UserAction::Forward),
                    KeyCode::Up => Some(UserAction::SpeedUp),
                    KeyCode::Down => Some(UserAction::SlowDown),
                    KeyCode::Char('c') => Some(UserAction::Complete),
                    KeyCode::Char('r') => Some(UserAction::Regenerate),
                    _ => None, // Ignore other keys
                }
            }
            event::Event::Resize(_, _) => Some(UserAction::Resize),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&self, renderer: &mut Renderer, phase: &Phase) -> std::io::Result<()> {
        let size = self.config.maze.size;
        let (term_width, _) = terminal::size()?;
        match phase {
            Phase::Generating(driver) => {
                if !renderer.check_size(size, 1)? {
                    return Ok(());
                }
                let state = driver.current();
                let status = format!(
                    "{} | {} | step {} | {}% | {}{}",
                    driver.current().generator(),
                    state.status(),
                    state.step_count(),
                    state.progress(),
                    App::speed_label(driver.pace().interval()),
                    App::pause_label(driver.pace().is_paused()),
                );
                renderer.draw_text((0, 0), term_width, &status, Color::Green)?;
                renderer.draw_text((0, 1), term_width, &state.describe(), Color::Cyan)?;
                renderer.draw_board(state, Renderer::board_origin(size, 0), None)?;
            }
            Phase::Racing(race) => {
                let lanes = race.lanes();
                if !renderer.check_size(size, lanes.len() as u16)? {
                    return Ok(());
                }
                let status = format!(
                    "{} race | {}{}",
                    self.config.race.family,
                    App::speed_label(race.pace().interval()),
                    App::pause_label(race.pace().is_paused()),
                );
                renderer.draw_text((0, 0), term_width, &status, Color::Green)?;

                let board_width = Renderer::board_width(size);
                for (i, (lane, stats)) in lanes.iter().zip(race.stats()).enumerate() {
                    let origin = Renderer::board_origin(size, i as u16);
                    let header = match stats {
                        Some(stats) => format!(
                            "{}: {} | {} steps | path {} | {:?}",
                            stats.solver, stats.status, stats.steps, stats.path_len, stats.elapsed
                        ),
                        None => format!("{}: {}", lane.solver(), lane.describe()),
                    };
                    let color = match stats {
                        Some(stats) if stats.status.is_success() => Color::Green,
                        Some(_) => Color::Red,
                        None => Color::Cyan,
                    };
                    renderer.draw_text((origin.0, 1), board_width, &header, color)?;
                    renderer.draw_board(lane, origin, Some((lane.start(), lane.goal())))?;
                }
            }
        }

        let controls =
            "Enter: pause/resume | ←/→: step when paused | ↑/↓: speed | c: complete | r: regenerate | Esc: exit";
        let (_, height) = Renderer::required_size(size, 1);
        renderer.draw_text((0, height - 1), term_width, controls, Color::DarkGrey)?;
        renderer.flush()
    }

    fn speed_label(interval: Duration) -> String {
        format!("{} ms/step", interval.as_millis())
    }

    fn pause_label(paused: bool) -> &'static str {
        if paused { " | paused" } else { "" }
    }
}
