use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

/// Keeps the queue stream apart from the layout stream when both come from one seed.
const QUEUE_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Water has not started yet.
    Ready,
    Flowing,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Notifications for whoever renders the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    FlowStarted,
    PipePlaced {
        at: Coord2,
        piece: Piece,
        replaced: bool,
    },
    WaterAdvanced {
        from: Coord2,
        to: Coord2,
        path_length: i32,
    },
    FlowHalted {
        at: Coord2,
    },
    Finished(OutcomeReport),
}

/// One round: a board, the water running through it, and the player's queue.
#[derive(Clone, Debug)]
pub struct GameSession {
    grid: Grid,
    cursor: FlowCursor,
    queue: PieceQueue,
    clock: FlowClock,
    required_length: u32,
    outcome: Option<OutcomeReport>,
    events: VecDeque<SessionEvent>,
}

impl GameSession {
    /// Random layout and queue, both derived from `seed`.
    pub fn new(config: &GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let layout = RandomLayoutGenerator::new(seed).generate(config);
        Self::from_layout(config, layout, seed ^ QUEUE_SEED_SALT)
    }

    pub fn from_layout(config: &GameConfig, layout: BoardLayout, queue_seed: u64) -> Result<Self> {
        Self::with_queue(config, layout, &[], queue_seed)
    }

    /// Session whose queue starts with `pending` before random pieces follow.
    pub fn with_queue(
        config: &GameConfig,
        layout: BoardLayout,
        pending: &[Piece],
        queue_seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(
            config.size(),
            layout.start,
            &layout.blocked,
            config.flow.max_water_level,
        )?;
        let queue = PieceQueue::with_pending(config.catalog(), pending, queue_seed)?;

        log::debug!(
            "New session: {:?} grid, start {:?}, {} blocked, required length {}",
            config.size(),
            layout.start,
            layout.blocked.len(),
            layout.required_length
        );
        Ok(Self {
            cursor: FlowCursor::new(grid.start()),
            grid,
            queue,
            clock: FlowClock::new(&config.flow),
            required_length: layout.required_length,
            outcome: None,
            events: VecDeque::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> &FlowCursor {
        &self.cursor
    }

    pub fn queue(&self) -> &PieceQueue {
        &self.queue
    }

    pub fn clock(&self) -> &FlowClock {
        &self.clock
    }

    pub fn elapsed_ms(&self) -> Millis {
        self.clock.elapsed_ms()
    }

    pub fn required_length(&self) -> u32 {
        self.required_length
    }

    pub fn path_length(&self) -> i32 {
        self.cursor.path_length()
    }

    pub fn outcome(&self) -> Option<OutcomeReport> {
        self.outcome
    }

    pub fn state(&self) -> SessionState {
        match self.outcome {
            Some(report) if report.is_won() => SessionState::Won,
            Some(_) => SessionState::Lost,
            None if self.clock.flow_started() => SessionState::Flowing,
            None => SessionState::Ready,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Hands out everything that happened since the last call, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    /// Advances simulated time by `delta` and runs at most one flow segment.
    pub fn tick(&mut self, delta: Millis) -> TickOutcome {
        if self.is_finished() {
            return TickOutcome::Idle;
        }
        self.clock.advance(delta);

        let mut outcome = TickOutcome::Idle;
        if self.clock.poll_flow_start() {
            log::debug!("Flow started at {} ms", self.clock.elapsed_ms());
            self.cursor.start();
            self.events.push_back(SessionEvent::FlowStarted);
            outcome = TickOutcome::FlowStarted;
        }

        if !self.clock.poll_segment(self.cursor.is_flowing()) {
            return outcome;
        }

        let step = self.cursor.step(&mut self.grid);
        match step {
            StepOutcome::Advanced { from, to } => {
                self.events.push_back(SessionEvent::WaterAdvanced {
                    from,
                    to,
                    path_length: self.cursor.path_length(),
                });
            }
            StepOutcome::Halted { at } => {
                self.events.push_back(SessionEvent::FlowHalted { at });
                return self.finish();
            }
            StepOutcome::Filled | StepOutcome::NoChange => {}
        }
        TickOutcome::Stepped(step)
    }

    fn finish(&mut self) -> TickOutcome {
        if let Some(report) = self.outcome {
            return TickOutcome::Finished(report);
        }
        let report = OutcomeReport::resolve(self.cursor.path_length(), self.required_length);
        log::debug!(
            "Session over: {:?} with length {} of {}",
            report.outcome,
            report.path_length,
            report.required_length
        );
        self.outcome = Some(report);
        self.events.push_back(SessionEvent::Finished(report));
        TickOutcome::Finished(report)
    }

    /// Puts the head of the queue at `coords`, replacing a dry pipe if there is one.
    pub fn place_pipe(&mut self, coords: Coord2) -> PlaceOutcome {
        use PlaceRejection::*;

        if self.is_finished() {
            return PlaceOutcome::Rejected(Finished);
        }
        let replaced = match self.grid.cell_at(coords) {
            None => return PlaceOutcome::Rejected(OutOfBounds),
            Some(Cell::Blocked) => return PlaceOutcome::Rejected(Blocked),
            Some(Cell::Pipe(pipe)) if pipe.kind().is_start() => {
                return PlaceOutcome::Rejected(StartCell);
            }
            Some(Cell::Pipe(pipe)) if !pipe.stage(self.grid.max_water_level()).is_dry() => {
                return PlaceOutcome::Rejected(Wet);
            }
            Some(Cell::Pipe(_)) => true,
            Some(Cell::Empty) => false,
        };
        if self.cursor.is_flowing() && coords == self.cursor.current() {
            return PlaceOutcome::Rejected(FlowHead);
        }
        if !self.clock.can_place_pipe() {
            return PlaceOutcome::Rejected(Cooldown);
        }

        // the queue is only consumed once the board took the piece
        let Some(piece) = self.queue.peek() else {
            return PlaceOutcome::Rejected(QueueEmpty);
        };
        if let Err(err) = self.grid.set_cell(coords, Cell::Pipe(PipeState::new(piece))) {
            log::warn!("Could not place {:?} at {:?}: {}", piece, coords, err);
            return PlaceOutcome::Rejected(OutOfBounds);
        }
        self.queue.take_first();
        self.queue.add_one();
        self.clock.record_placement();

        log::debug!("Placed {:?} at {:?}", piece, coords);
        self.events.push_back(SessionEvent::PipePlaced {
            at: coords,
            piece,
            replaced,
        });
        if replaced {
            PlaceOutcome::Replaced
        } else {
            PlaceOutcome::Placed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn config() -> GameConfig {
        let mut config = GameConfig::default();
        config.grid = GridConfig { rows: 5, cols: 5 };
        config.flow.start_delay = 1000;
        config.flow.segment_delay = 100;
        config.flow.pipe_placement_delay = 50;
        config.flow.max_water_level = 2;
        config
    }

    fn layout(required_length: u32) -> BoardLayout {
        BoardLayout {
            start: (0, 2),
            blocked: vec![(4, 4)],
            required_length,
        }
    }

    fn session(pending: &[Piece], required_length: u32) -> GameSession {
        GameSession::with_queue(&config(), layout(required_length), pending, 1).unwrap()
    }

    fn run_to_end(session: &mut GameSession) -> OutcomeReport {
        for _ in 0..10_000 {
            if let TickOutcome::Finished(report) = session.tick(50) {
                return report;
            }
        }
        panic!("session never finished");
    }

    #[test]
    fn random_session_is_playable() {
        let mut session = GameSession::new(&GameConfig::default(), 77).unwrap();

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.queue().len(), QUEUE_CAPACITY);
        assert_eq!(session.path_length(), -1);

        let report = run_to_end(&mut session);
        assert_eq!(report.path_length, 0);
        assert_eq!(session.state(), SessionState::Lost);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = config();
        config.piece_set.clear();

        assert_eq!(
            GameSession::new(&config, 1).unwrap_err(),
            GameError::EmptyPieceSet
        );
    }

    #[test]
    fn placement_waits_for_cooldown() {
        let mut session = session(&[], 3);

        assert_eq!(
            session.place_pipe((2, 2)),
            PlaceOutcome::Rejected(PlaceRejection::Cooldown)
        );

        session.tick(51);
        let head = session.queue().peek().unwrap();
        assert_eq!(session.place_pipe((2, 2)), PlaceOutcome::Placed);
        assert_eq!(session.grid().pipe_at((2, 2)).unwrap().piece(), head);
        assert_eq!(session.queue().len(), QUEUE_CAPACITY);

        assert_eq!(
            session.place_pipe((2, 3)),
            PlaceOutcome::Rejected(PlaceRejection::Cooldown)
        );
    }

    #[test]
    fn placement_rejects_reserved_cells() {
        let mut session = session(&[], 3);
        let queued: Vec<Piece> = session.queue().iter().collect();

        use PlaceRejection::*;
        assert_eq!(session.place_pipe((2, 2)), PlaceOutcome::Rejected(Cooldown));
        session.tick(51);
        assert_eq!(session.place_pipe((0, 2)), PlaceOutcome::Rejected(StartCell));
        assert_eq!(session.place_pipe((4, 4)), PlaceOutcome::Rejected(Blocked));
        assert_eq!(session.place_pipe((5, 0)), PlaceOutcome::Rejected(OutOfBounds));
        assert!(session.drain_events().next().is_none());
        assert!(session.queue().iter().eq(queued.iter().copied()));
        assert_eq!(session.grid().cell_at((2, 2)), Some(Cell::Empty));
    }

    #[test]
    fn dry_pipe_can_be_replaced() {
        let pieces = [
            Piece::new(PieceKind::Straight, Rotation::R90),
            Piece::new(PieceKind::Straight, Rotation::R0),
        ];
        let mut session = session(&pieces, 3);

        session.tick(51);
        assert_eq!(session.place_pipe((1, 2)), PlaceOutcome::Placed);
        session.tick(51);
        assert_eq!(session.place_pipe((1, 2)), PlaceOutcome::Replaced);

        assert_eq!(session.grid().pipe_at((1, 2)).unwrap().piece(), pieces[1]);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events[1],
            SessionEvent::PipePlaced {
                at: (1, 2),
                piece: pieces[1],
                replaced: true
            }
        );
    }

    #[test]
    fn wet_pipe_and_flow_head_are_locked() {
        let pieces = [
            Piece::new(PieceKind::Straight, Rotation::R0),
            Piece::new(PieceKind::Straight, Rotation::R0),
        ];
        let mut session = session(&pieces, 10);
        session.tick(51);
        session.place_pipe((1, 2));
        session.tick(51);
        session.place_pipe((2, 2));

        // start fills in two segments, then hands off to (1, 2)
        session.tick(1000);
        assert_eq!(session.state(), SessionState::Flowing);
        session.tick(100);
        session.tick(100);
        assert_eq!(session.cursor().current(), (1, 2));

        assert_eq!(
            session.place_pipe((1, 2)),
            PlaceOutcome::Rejected(PlaceRejection::FlowHead)
        );
        session.tick(100);
        assert_eq!(
            session.place_pipe((1, 2)),
            PlaceOutcome::Rejected(PlaceRejection::Wet)
        );
    }

    #[test]
    fn flow_waits_for_start_delay() {
        let mut session = session(&[], 3);

        assert_eq!(session.tick(1000), TickOutcome::Idle);
        assert_eq!(session.clock().until_flow_start(), 0);
        assert_eq!(session.tick(1), TickOutcome::FlowStarted);
        assert_eq!(session.tick(99), TickOutcome::Idle);
        assert_eq!(session.tick(1), TickOutcome::Stepped(StepOutcome::Filled));
        assert_eq!(session.grid().pipe_at((0, 2)).unwrap().fill_level(), 1);
    }

    #[test]
    fn outcome_is_reported_once() {
        let mut session = session(&[], 0);

        let report = run_to_end(&mut session);
        assert!(report.is_won());
        assert_eq!(session.state(), SessionState::Won);

        assert_eq!(session.tick(10_000), TickOutcome::Idle);
        assert_eq!(
            session.place_pipe((2, 2)),
            PlaceOutcome::Rejected(PlaceRejection::Finished)
        );
        let finished = session
            .drain_events()
            .filter(|event| matches!(event, SessionEvent::Finished(_)))
            .count();
        assert_eq!(finished, 1);
    }

    #[test]
    fn events_follow_the_water() {
        let pieces = [Piece::new(PieceKind::Straight, Rotation::R0)];
        let mut session = session(&pieces, 1);
        session.tick(51);
        session.place_pipe((1, 2));

        let report = run_to_end(&mut session);
        assert_eq!(report.path_length, 1);
        assert!(report.is_won());

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![
                SessionEvent::PipePlaced {
                    at: (1, 2),
                    piece: pieces[0],
                    replaced: false
                },
                SessionEvent::FlowStarted,
                SessionEvent::WaterAdvanced {
                    from: (0, 2),
                    to: (1, 2),
                    path_length: 0
                },
                SessionEvent::FlowHalted { at: (1, 2) },
                SessionEvent::Finished(report),
            ]
        );
    }
}
