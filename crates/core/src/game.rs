//! Game controller - spawn, hold, input, gravity, locking and game over
//!
//! This module ties together the playfield, the three piece slots (current,
//! next and hold), the bag and the auto-shift timers. The host calls
//! [`Game::update`] once per tick with the elapsed time and the sampled
//! intents, and renders from the returned events.

use tracing::{debug, info, trace};

use stackfall_types::{
    ConfigError, GameConfig, GameEvent, HoldPolicy, InputFrame, Point, Shape, SpawnBlocked,
};

use crate::bag::BagRandomizer;
use crate::geometry;
use crate::piece::Piece;
use crate::playfield::{Playfield, TileMap};
use crate::shift::AutoShift;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    playfield: Playfield,
    bag: BagRandomizer,
    current: Piece,
    next: Piece,
    hold: Piece,
    horizontal: AutoShift,
    soft_drop: AutoShift,
    phase: Phase,
    started: bool,
    /// Sum of all tick deltas since start.
    clock_ms: u64,
    lines_cleared: u32,
    /// Set once the current piece has been swapped into the hold slot.
    hold_used: bool,
    game_over: Option<SpawnBlocked>,
    /// Last frame reported through `TilesChanged`.
    frame: TileMap,
}

impl Game {
    /// Create a game with the bag strategy from `config`.
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        let bag = BagRandomizer::new(config.bag, seed);
        Self::with_randomizer(config, bag)
    }

    /// Create a game drawing shapes from a caller-provided randomizer.
    pub fn with_randomizer(config: GameConfig, bag: BagRandomizer) -> Result<Self, ConfigError> {
        config.validate()?;
        geometry::validate_tables()?;
        let playfield = Playfield::from_config(&config);
        check_spawn_fits(&config, &playfield)?;

        Ok(Self {
            playfield,
            bag,
            current: Piece::empty(),
            next: Piece::empty(),
            hold: Piece::empty(),
            horizontal: AutoShift::new(config.das_ms, config.arr_ms),
            soft_drop: AutoShift::new(config.soft_drop_das_ms, config.soft_drop_arr_ms),
            phase: Phase::Spawning,
            started: false,
            clock_ms: 0,
            lines_cleared: 0,
            hold_used: false,
            game_over: None,
            frame: TileMap::new(),
            config,
        })
    }

    /// Spawn the first piece. Calling it again has no effect.
    pub fn start(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.started {
            return events;
        }
        self.started = true;

        if let Err(blocked) = self.spawn(&mut events) {
            debug!(%blocked, "first spawn failed");
        }
        self.sync_frame(&mut events);
        events
    }

    /// Clear the board and the piece slots and start over.
    ///
    /// The bag keeps its stream, so a restarted game continues the sequence.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.playfield.clear_all();
        self.current = Piece::empty();
        self.next = Piece::empty();
        self.hold = Piece::empty();
        self.horizontal.rearm();
        self.soft_drop.rearm();
        self.phase = Phase::Spawning;
        self.started = false;
        self.clock_ms = 0;
        self.lines_cleared = 0;
        self.hold_used = false;
        self.game_over = None;
        debug!("restart");
        self.start()
    }

    /// Advance the simulation by one tick.
    ///
    /// Returns nothing once the game is over or before [`Game::start`].
    pub fn update(&mut self, elapsed_ms: u32, input: &InputFrame) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.started || self.phase == Phase::GameOver {
            return events;
        }

        if let Err(blocked) = self.step(elapsed_ms, input, &mut events) {
            debug!(%blocked, clock_ms = self.clock_ms, "tick ended the game");
        }
        self.sync_frame(&mut events);
        events
    }

    fn step(
        &mut self,
        elapsed_ms: u32,
        input: &InputFrame,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), SpawnBlocked> {
        self.clock_ms += elapsed_ms as u64;
        self.current.add_elapsed(elapsed_ms);

        if input.hold {
            self.hold_swap(events)?;
        }

        let current = &mut self.current;
        let field = &self.playfield;
        self.horizontal
            .update(input.horizontal.offset(), elapsed_ms, |step| current.try_move(step, field));
        self.soft_drop.update(
            input.soft_drop.then_some(Point::DOWN),
            elapsed_ms,
            |step| current.try_move(step, field),
        );

        if input.hard_drop {
            let rows = self.current.drop_to_floor(&self.playfield);
            trace!(rows, "hard drop");
            return self.lock(events);
        }

        if let Some(direction) = input.rotate.direction() {
            self.current.rotate(direction, &self.playfield);
        }

        if self.clock_ms >= self.current.step_deadline_ms() {
            self.current.try_move(Point::DOWN, &self.playfield);
            self.current
                .set_step_deadline_ms(self.clock_ms + self.config.step_delay_ms as u64);
            if self.current.lock_ms() >= self.config.lock_delay_ms {
                return self.lock(events);
            }
        }

        Ok(())
    }

    /// Fill the current slot from the preview (or the bag on first spawn),
    /// then refill the preview.
    fn spawn(&mut self, events: &mut Vec<GameEvent>) -> Result<(), SpawnBlocked> {
        self.phase = Phase::Spawning;

        let shape = match self.next.shape() {
            Some(shape) => shape,
            None => self.bag.draw(),
        };
        self.place_current(shape, events)?;

        let next_shape = self.bag.draw();
        self.next.initialize(
            self.config.preview_anchor,
            next_shape,
            self.clock_ms,
            self.config.step_delay_ms,
        );

        debug!(shape = shape.as_str(), next = next_shape.as_str(), "spawn");
        Ok(())
    }

    /// Initialize the current piece at the spawn anchor, ending the game if it does not fit.
    fn place_current(&mut self, shape: Shape, events: &mut Vec<GameEvent>) -> Result<(), SpawnBlocked> {
        self.current.initialize(
            self.config.spawn_anchor,
            shape,
            self.clock_ms,
            self.config.step_delay_ms,
        );
        self.current.set_lock_reset_limit(self.config.lock_reset_limit);

        if !self
            .playfield
            .is_valid_position(self.current.cells(), self.current.position())
        {
            let blocked = SpawnBlocked {
                shape,
                anchor: self.config.spawn_anchor,
            };
            self.phase = Phase::GameOver;
            self.game_over = Some(blocked);
            info!(%blocked, lines = self.lines_cleared, "game over");
            events.push(GameEvent::GameOver);
            return Err(blocked);
        }

        self.phase = Phase::Falling;
        events.push(GameEvent::PieceSpawned { shape });
        Ok(())
    }

    /// Commit the current piece, clear full rows and spawn the next piece.
    fn lock(&mut self, events: &mut Vec<GameEvent>) -> Result<(), SpawnBlocked> {
        self.phase = Phase::Locking;
        let Some(shape) = self.current.shape() else {
            return Ok(());
        };

        let cells = self.current.absolute_cells();
        self.playfield.commit(&self.current);
        events.push(GameEvent::PieceLocked { shape, cells });
        debug!(shape = shape.as_str(), ?cells, "lock");

        let cleared = self.playfield.clear_full_lines();
        if cleared.count > 0 {
            self.lines_cleared += cleared.count;
            trace!(count = cleared.count, rows = ?cleared.rows, "lines cleared");
            events.push(GameEvent::LinesCleared {
                count: cleared.count,
                rows: cleared.rows,
            });
        }

        self.horizontal.rearm();
        self.soft_drop.rearm();
        self.hold_used = false;

        self.spawn(events)
    }

    /// Swap the current piece with the hold slot.
    ///
    /// An empty slot takes the current shape and a new piece spawns from the
    /// preview. An occupied slot swaps shapes and the current piece restarts
    /// from the spawn anchor in its spawn orientation.
    fn hold_swap(&mut self, events: &mut Vec<GameEvent>) -> Result<(), SpawnBlocked> {
        if self.config.hold_policy == HoldPolicy::OncePerPiece && self.hold_used {
            return Ok(());
        }
        let Some(current_shape) = self.current.shape() else {
            return Ok(());
        };
        self.hold_used = true;

        let held = self.hold.shape();
        self.hold.initialize(
            self.config.hold_anchor,
            current_shape,
            self.clock_ms,
            self.config.step_delay_ms,
        );

        match held {
            None => {
                debug!(held = current_shape.as_str(), "hold into empty slot");
                self.spawn(events)
            }
            Some(held) => {
                debug!(held = current_shape.as_str(), current = held.as_str(), "hold swap");
                self.place_current(held, events)
            }
        }
    }

    /// Whether hold would currently do anything.
    pub fn can_hold(&self) -> bool {
        self.phase == Phase::Falling
            && !(self.config.hold_policy == HoldPolicy::OncePerPiece && self.hold_used)
    }

    /// Build the visible frame: committed grid, then preview and hold, then the live piece.
    pub fn visible_tiles(&self) -> TileMap {
        let live = (self.phase != Phase::GameOver).then_some(&self.current);
        self.playfield
            .composite([&self.next, &self.hold].into_iter().chain(live))
    }

    /// Emit `TilesChanged` for every coordinate whose visible tile changed since the last frame.
    fn sync_frame(&mut self, events: &mut Vec<GameEvent>) {
        let frame = self.visible_tiles();

        for (&at, &shape) in &frame {
            if self.frame.get(&at) != Some(&shape) {
                events.push(GameEvent::TilesChanged {
                    at,
                    tile: Some(shape),
                });
            }
        }
        for &at in self.frame.keys() {
            if !frame.contains_key(&at) {
                events.push(GameEvent::TilesChanged { at, tile: None });
            }
        }

        self.frame = frame;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Why the session ended, if it has.
    pub fn game_over_reason(&self) -> Option<SpawnBlocked> {
        self.game_over
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn hold(&self) -> &Piece {
        &self.hold
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    #[cfg(test)]
    pub(crate) fn playfield_mut(&mut self) -> &mut Playfield {
        &mut self.playfield
    }
}

/// Every shape must fit on the empty board at the spawn anchor in its spawn orientation.
fn check_spawn_fits(config: &GameConfig, field: &Playfield) -> Result<(), ConfigError> {
    let anchor = config.spawn_anchor;
    for shape in Shape::ALL {
        if !geometry::cell_offsets(shape)
            .iter()
            .all(|&cell| field.contains(anchor + cell))
        {
            return Err(ConfigError::SpawnOutOfBounds { anchor });
        }
    }
    Ok(())
}
