use crossterm::event::KeyCode;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;

use crate::grid::{Board, Cell, Direction};
use crate::input::direction_for;
use crate::snake::{Collision, MoveResult, Snake};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EndReason {
    Collision(Collision),
    /// The snake filled every cell, so no food could be placed.
    BoardFull,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    Over(EndReason),
}

/// One game session. Only `set_direction`/`on_direction_key` and `tick`
/// mutate it; once over, it stays over.
pub struct GameState {
    board: Board,
    snake: Snake,
    food: Cell,
    score: u32,
    status: Status,
    pending: Option<Direction>,
    rng: StdRng,
}

impl GameState {
    pub fn new(board: Board, rng: StdRng) -> Self {
        let size = board.cell_size();
        let snake = Snake::new(vec![Cell::new(0, 0), Cell::new(size, 0)], Direction::Right);

        let mut state = GameState {
            board,
            snake,
            food: Cell::new(0, 0),
            score: 0,
            status: Status::Running,
            pending: None,
            rng,
        };

        match state.spawn_food() {
            Some(food) => state.food = food,
            None => state.status = Status::Over(EndReason::BoardFull),
        }

        info!("New game on a {}x{} board, food at {:?}", board.cols(), board.rows(), state.food);
        state
    }

    /// Queues a turn for the next tick. Requests are checked against the
    /// direction of the last move, so no burst of keys can reverse the snake.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.is_over() {
            return false;
        }

        if requested.is_opposite(self.snake.get_direction()) {
            debug!("Ignoring reversal {:?} while heading {:?}", requested, self.snake.get_direction());
            return false;
        }

        self.pending = Some(requested);
        true
    }

    /// Keys that are not directions are ignored.
    pub fn on_direction_key(&mut self, key: KeyCode) -> bool {
        match direction_for(key) {
            Some(dir) => self.set_direction(dir),
            None => false,
        }
    }

    /// Advances the game one step. Returns None once the game is over.
    pub fn tick(&mut self) -> Option<MoveResult> {
        if self.is_over() {
            return None;
        }

        if let Some(dir) = self.pending.take() {
            self.snake.set_direction(dir);
        }

        let res = self.snake.move_step(&self.board, self.food);
        trace!("Tick heading {:?}: {:?}", self.snake.get_direction(), res);

        match &res {
            MoveResult::Crashed(collision) => {
                info!("Game over: {:?} collision, score {}", collision, self.score);
                self.status = Status::Over(EndReason::Collision(*collision));
            }
            MoveResult::Moved { old_tail: None, .. } => {
                self.score += 1;
                match self.spawn_food() {
                    Some(food) => {
                        self.food = food;
                        info!("Ate food, score {}, next food at {:?}", self.score, food);
                    }
                    None => {
                        info!("Board full, score {}", self.score);
                        self.status = Status::Over(EndReason::BoardFull);
                    }
                }
            }
            MoveResult::Moved { .. } => {}
        }

        Some(res)
    }

    pub fn body(&self) -> &[Cell] {
        self.snake.body()
    }

    pub fn head(&self) -> Cell {
        self.snake.head()
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status != Status::Running
    }

    /// Uniform over the cells the snake does not cover.
    fn spawn_food(&mut self) -> Option<Cell> {
        let snake = &self.snake;
        self.board
            .cells()
            .filter(|cell| !snake.contains(*cell))
            .choose(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction::*;
    use rand::SeedableRng;

    fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
        coords.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    fn seeded(seed: u64) -> GameState {
        GameState::new(Board::default(), StdRng::seed_from_u64(seed))
    }

    fn with_layout(body: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> GameState {
        let mut state = seeded(1);
        state.snake = Snake::new(cells(body), direction);
        state.food = Cell::new(food.0, food.1);
        state
    }

    fn on_grid(cell: Cell) -> bool {
        (0..=380).contains(&cell.x) && (0..=380).contains(&cell.y) && cell.x % 20 == 0 && cell.y % 20 == 0
    }

    #[test]
    fn starts_running() {
        let state = seeded(3);

        assert_eq!(state.body(), &cells(&[(0, 0), (20, 0)])[..]);
        assert_eq!(state.head(), Cell::new(20, 0));
        assert_eq!(state.direction(), Right);
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), Status::Running);
        assert!(on_grid(state.food()));
        assert!(!state.body().contains(&state.food()));
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut state = with_layout(&[(0, 0), (20, 0)], Right, (40, 0));

        let res = state.tick();

        assert!(matches!(res, Some(MoveResult::Moved { old_tail: None, .. })));
        assert_eq!(state.score(), 1);
        assert_eq!(state.body(), &cells(&[(0, 0), (20, 0), (40, 0)])[..]);
        assert_ne!(state.food(), Cell::new(40, 0));
        assert!(!state.body().contains(&state.food()));
        assert!(!state.is_over());
    }

    #[test]
    fn length_constant_without_food() {
        let mut state = with_layout(&[(0, 100), (20, 100), (40, 100)], Right, (0, 0));

        for _ in 0..10 {
            let before = state.body().len();
            state.tick();
            assert_eq!(state.body().len(), before);
        }

        assert_eq!(state.head(), Cell::new(240, 100));
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn wall_collision_ends_game() {
        let mut state = with_layout(&[(20, 0), (0, 0)], Left, (200, 200));

        assert_eq!(state.tick(), Some(MoveResult::Crashed(Collision::Wall)));
        assert_eq!(state.status(), Status::Over(EndReason::Collision(Collision::Wall)));
        assert_eq!(state.body(), &cells(&[(20, 0), (0, 0)])[..]);
    }

    #[test]
    fn moving_into_tail_cell_is_a_collision() {
        let mut state = with_layout(&[(0, 20), (0, 0), (20, 0), (20, 20)], Left, (200, 200));

        state.tick();

        assert_eq!(state.status(), Status::Over(EndReason::Collision(Collision::Body)));
        assert_eq!(state.body(), &cells(&[(0, 20), (0, 0), (20, 0), (20, 20)])[..]);
    }

    #[test]
    fn game_over_is_permanent() {
        let mut state = with_layout(&[(20, 0), (0, 0)], Left, (200, 200));
        state.tick();
        assert!(state.is_over());

        let (body, food, score) = (state.body().to_vec(), state.food(), state.score());
        assert!(!state.set_direction(Down));
        for _ in 0..5 {
            assert_eq!(state.tick(), None);
        }

        assert_eq!(state.body(), &body[..]);
        assert_eq!(state.food(), food);
        assert_eq!(state.score(), score);
    }

    #[test]
    fn reversal_request_is_ignored() {
        let mut state = with_layout(&[(100, 100), (120, 100)], Right, (0, 0));

        assert!(!state.set_direction(Left));
        state.tick();

        assert_eq!(state.direction(), Right);
        assert_eq!(state.head(), Cell::new(140, 100));
    }

    #[test]
    fn accepted_turn_applies_on_next_tick() {
        let mut state = with_layout(&[(100, 100), (120, 100)], Right, (0, 0));

        assert!(state.set_direction(Down));
        assert_eq!(state.direction(), Right);

        state.tick();

        assert_eq!(state.direction(), Down);
        assert_eq!(state.head(), Cell::new(120, 120));
    }

    #[test]
    fn key_burst_cannot_reverse() {
        let mut state = with_layout(&[(100, 100), (120, 100)], Right, (0, 0));

        assert!(state.on_direction_key(KeyCode::Up));
        assert!(!state.on_direction_key(KeyCode::Left));
        state.tick();

        assert_eq!(state.direction(), Up);
        assert_eq!(state.head(), Cell::new(120, 80));
        assert!(!state.is_over());
    }

    #[test]
    fn last_accepted_key_wins() {
        let mut state = with_layout(&[(100, 100), (120, 100)], Right, (0, 0));

        assert!(state.on_direction_key(KeyCode::Up));
        assert!(state.on_direction_key(KeyCode::Char('s')));
        assert!(!state.on_direction_key(KeyCode::Char('x')));
        state.tick();

        assert_eq!(state.head(), Cell::new(120, 120));
    }

    #[test]
    fn food_always_on_grid_and_off_body() {
        let mut state = seeded(42);

        for _ in 0..200 {
            let food = state.spawn_food().unwrap();
            assert!(on_grid(food));
            assert!(!state.body().contains(&food));
        }
    }

    #[test]
    fn same_seed_same_food() {
        assert_eq!(seeded(7).food(), seeded(7).food());
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut state = GameState::new(Board::new(3, 1), StdRng::seed_from_u64(5));
        assert_eq!(state.food(), Cell::new(40, 0));

        state.tick();

        assert_eq!(state.score(), 1);
        assert_eq!(state.body().len(), 3);
        assert_eq!(state.status(), Status::Over(EndReason::BoardFull));
        assert_eq!(state.tick(), None);
    }
}
