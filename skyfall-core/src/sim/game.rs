use crate::command::Command;
use crate::constants::{
    ASTEROID_CAP, BASE_START_X, FIELD_HEIGHT, FIELD_WIDTH, INITIAL_CLEAR_ROWS, PROJECTILE_LIMIT,
    PROJECTILE_SPAWN_ROW, RESPAWN_MIN_ROW, SPAWN_ATTEMPT_LIMIT,
};
use crate::effects::{AudioCue, AudioSink, CellColor, FieldRenderer, RandomSource, ScoreBoard};
use crate::grid::{Direction, GridPos};
use crate::list::EntityList;
use crate::sim::FieldSnapshot;

/// The game state engine. Owns the base position and both entity lists, and
/// drives the four collaborators; every public operation runs to completion
/// and leaves the lists gap-free.
pub struct Game<R, A, S, N> {
    base_x: u8,
    projectiles: EntityList<PROJECTILE_LIMIT>,
    asteroids: EntityList<ASTEROID_CAP>,
    paused: bool,
    renderer: R,
    audio: A,
    scoreboard: S,
    rng: N,
}

impl<R, A, S, N> Game<R, A, S, N>
where
    R: FieldRenderer,
    A: AudioSink,
    S: ScoreBoard,
    N: RandomSource,
{
    /// An engine with an empty field; call [`initialize`](Self::initialize)
    /// before stepping it.
    pub fn new(renderer: R, audio: A, scoreboard: S, rng: N) -> Self {
        Self {
            base_x: BASE_START_X,
            projectiles: EntityList::new(),
            asteroids: EntityList::new(),
            paused: false,
            renderer,
            audio,
            scoreboard,
            rng,
        }
    }

    /// Resets the field: base re-centred, no projectiles, a full complement
    /// of asteroids clear of the lowest rows, sorted bottom-up, and a full
    /// redraw. Also clears the pause flag.
    pub fn initialize(&mut self) {
        self.base_x = BASE_START_X;
        self.projectiles.clear();
        self.asteroids.clear();
        self.paused = false;
        self.with_batch(|game| {
            for _ in 0..ASTEROID_CAP {
                game.add_asteroid_in_rows(INITIAL_CLEAR_ROWS);
            }
            game.asteroids.sort_by_row();
            game.redraw_whole_field();
        });
    }

    /// Steps the base one cell left or right. Refused at the field edge:
    /// no state change, no redraw. Moving into an asteroid costs a life
    /// (per footprint cell hit) and destroys the asteroid.
    pub fn move_base(&mut self, direction: Direction) -> bool {
        let target = self.base_x as i16 + direction.step() as i16;
        if !(0..FIELD_WIDTH as i16).contains(&target) {
            return false;
        }
        self.with_batch(|game| {
            game.draw_base(CellColor::Empty);
            game.base_x = target as u8;
            game.check_all_base_hits();
            game.draw_base(CellColor::Base);
        });
        true
    }

    /// Launches a projectile from the cell directly above the base. Refused
    /// when the in-flight limit is reached or the spawn cell already holds a
    /// projectile. An asteroid sitting on the spawn cell is hit immediately;
    /// that still counts as a successful shot.
    pub fn fire_projectile(&mut self) -> bool {
        let spawn = GridPos::new(self.base_x, PROJECTILE_SPAWN_ROW);
        if self.projectiles.is_full() || self.projectiles.index_of(spawn).is_some() {
            return false;
        }
        self.with_batch(|game| {
            let index = game.projectiles.len();
            game.projectiles.push(spawn);
            let struck = game.asteroids.index_of(spawn);
            if !game.check_asteroid_hit(Some(index), struck) {
                game.draw_projectile(index, CellColor::Projectile);
            }
        });
        true
    }

    /// One upward step for every in-flight projectile, in index order.
    /// Projectiles leaving the field are removed; ones reaching an asteroid
    /// resolve a hit. Either way the tail shifts down, so the index is not
    /// advanced on removal. Ends by topping the asteroid field back up.
    pub fn advance_projectiles(&mut self) {
        self.with_batch(|game| {
            let mut index = 0;
            while index < game.projectiles.len() {
                let (x, y) = game.projectiles[index].xy();
                let new_y = y + 1;

                if new_y == FIELD_HEIGHT {
                    game.remove_projectile(index);
                    continue;
                }
                let struck = game.asteroids.index_of(GridPos::new(x, new_y));
                if game.check_asteroid_hit(Some(index), struck) {
                    continue;
                }

                game.draw_projectile(index, CellColor::Empty);
                game.projectiles.set(index, GridPos::new(x, new_y));
                game.draw_projectile(index, CellColor::Projectile);
                index += 1;
            }
            game.add_missing_asteroids();
        });
    }

    /// One downward (gravity) step for every asteroid, in index order. Each
    /// asteroid is erased up front; it is then removed (fell out), traded
    /// against a projectile (hit), or committed one row lower. Afterwards:
    /// base hits, replenishment, batch flush, and a base repaint.
    pub fn advance_asteroids(&mut self) {
        self.with_batch(|game| {
            let mut index = 0;
            while index < game.asteroids.len() {
                let (x, y) = game.asteroids[index].xy();
                game.draw_asteroid(index, CellColor::Empty);

                if y == 0 {
                    game.asteroids.remove(index);
                    continue;
                }
                let new_y = y - 1;
                let shooter = game.projectiles.index_of(GridPos::new(x, new_y));
                if game.check_asteroid_hit(shooter, Some(index)) {
                    continue;
                }

                game.asteroids.set(index, GridPos::new(x, new_y));
                game.draw_asteroid(index, CellColor::Asteroid);
                index += 1;
            }
            game.check_all_base_hits();
            game.add_missing_asteroids();
        });
        // The base sits outside the batched pass; repaint it last so falling
        // asteroids never leave a hole in the footprint.
        self.draw_base(CellColor::Base);
    }

    pub fn is_game_over(&self) -> bool {
        self.scoreboard.lives() == 0
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Applies one recorded driver stimulus. `Restart` re-runs
    /// [`initialize`](Self::initialize); the scoreboard owner decides what
    /// happens to score and lives across restarts.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => {
                self.move_base(Direction::Left);
            }
            Command::MoveRight => {
                self.move_base(Direction::Right);
            }
            Command::Fire => {
                self.fire_projectile();
            }
            Command::StepProjectiles => self.advance_projectiles(),
            Command::StepAsteroids => self.advance_asteroids(),
            Command::Restart => self.initialize(),
        }
    }

    #[inline]
    pub fn base_x(&self) -> u8 {
        self.base_x
    }

    #[inline]
    pub fn num_projectiles(&self) -> usize {
        self.projectiles.len()
    }

    #[inline]
    pub fn num_asteroids(&self) -> usize {
        self.asteroids.len()
    }

    /// Index of the asteroid at `(x, y)`, if any.
    pub fn asteroid_at(&self, x: u8, y: u8) -> Option<usize> {
        self.asteroids.index_of(GridPos::new(x, y))
    }

    /// Index of the projectile at `(x, y)`, if any.
    pub fn projectile_at(&self, x: u8, y: u8) -> Option<usize> {
        self.projectiles.index_of(GridPos::new(x, y))
    }

    pub fn scoreboard(&self) -> &S {
        &self.scoreboard
    }

    pub fn scoreboard_mut(&mut self) -> &mut S {
        &mut self.scoreboard
    }

    pub fn rng(&self) -> &N {
        &self.rng
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            base_x: self.base_x,
            paused: self.paused,
            lives: self.scoreboard.lives(),
            asteroids: self.asteroids.iter().map(GridPos::xy).collect(),
            projectiles: self.projectiles.iter().map(GridPos::xy).collect(),
        }
    }

    /// Brackets a redraw burst; the commit runs on every exit path of the
    /// body.
    fn with_batch<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        self.renderer.begin_batch();
        let out = body(self);
        self.renderer.commit_batch();
        out
    }

    /// Trades a projectile against an asteroid. Either side absent makes
    /// this a no-op; otherwise both are removed, the score goes up by one,
    /// and the hit cue plays.
    fn check_asteroid_hit(&mut self, projectile: Option<usize>, asteroid: Option<usize>) -> bool {
        let (Some(projectile), Some(asteroid)) = (projectile, asteroid) else {
            return false;
        };
        self.remove_projectile(projectile);
        self.remove_asteroid(asteroid);
        self.scoreboard.add_score(1);
        self.audio.play(AudioCue::Hit);
        true
    }

    fn check_base_hit(&mut self, x: i16, y: u8) {
        if !(0..FIELD_WIDTH as i16).contains(&x) {
            return;
        }
        if let Some(index) = self.asteroids.index_of(GridPos::new(x as u8, y)) {
            self.remove_asteroid(index);
            self.scoreboard.change_lives(-1);
            self.audio.play(AudioCue::Error);
        }
    }

    /// All four footprint cells are checked unconditionally; simultaneous
    /// hits are each penalized.
    fn check_all_base_hits(&mut self) {
        let base = self.base_x as i16;
        self.check_base_hit(base, 1);
        self.check_base_hit(base - 1, 0);
        self.check_base_hit(base, 0);
        self.check_base_hit(base + 1, 0);
    }

    fn remove_asteroid(&mut self, index: usize) {
        if let Some(pos) = self.asteroids.get(index) {
            self.renderer.set_cell(pos.x(), pos.y(), CellColor::Empty);
            self.asteroids.remove(index);
        }
    }

    fn remove_projectile(&mut self, index: usize) {
        if let Some(pos) = self.projectiles.get(index) {
            self.renderer.set_cell(pos.x(), pos.y(), CellColor::Empty);
            self.projectiles.remove(index);
        }
    }

    /// Appends one asteroid at a random free cell with `y >= min_y`. Gives
    /// up silently after a bounded number of attempts on a contested board;
    /// the field then runs below capacity until a later replenish pass.
    fn add_asteroid_in_rows(&mut self, min_y: u8) {
        if self.asteroids.is_full() {
            return;
        }
        for _ in 0..SPAWN_ATTEMPT_LIMIT {
            let x = self.rng.next_below(FIELD_WIDTH as u32) as u8;
            let y = min_y + self.rng.next_below((FIELD_HEIGHT - min_y) as u32) as u8;
            if self.asteroids.index_of(GridPos::new(x, y)).is_none() {
                let index = self.asteroids.len();
                self.asteroids.push(GridPos::new(x, y));
                self.draw_asteroid(index, CellColor::Asteroid);
                return;
            }
        }
    }

    /// Tops the asteroid list back up to capacity; respawns re-enter at the
    /// top row. Appends without re-sorting.
    fn add_missing_asteroids(&mut self) {
        for _ in self.asteroids.len()..ASTEROID_CAP {
            self.add_asteroid_in_rows(RESPAWN_MIN_ROW);
        }
    }

    fn redraw_whole_field(&mut self) {
        for y in 0..FIELD_HEIGHT {
            for x in 0..FIELD_WIDTH {
                self.renderer.set_cell(x, y, CellColor::Empty);
            }
        }
        self.draw_base(CellColor::Base);
        for index in 0..self.asteroids.len() {
            self.draw_asteroid(index, CellColor::Asteroid);
        }
        for index in 0..self.projectiles.len() {
            self.draw_projectile(index, CellColor::Projectile);
        }
    }

    fn draw_base(&mut self, color: CellColor) {
        let base = self.base_x as i16;
        for x in base - 1..=base + 1 {
            if (0..FIELD_WIDTH as i16).contains(&x) {
                self.renderer.set_cell(x as u8, 0, color);
            }
        }
        self.renderer.set_cell(self.base_x, 1, color);
    }

    fn draw_asteroid(&mut self, index: usize, color: CellColor) {
        if let Some(pos) = self.asteroids.get(index) {
            self.renderer.set_cell(pos.x(), pos.y(), color);
        }
    }

    fn draw_projectile(&mut self, index: usize, color: CellColor) {
        if let Some(pos) = self.projectiles.get(index) {
            self.renderer.set_cell(pos.x(), pos.y(), color);
        }
    }
}
