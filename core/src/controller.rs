use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Menu,
    Playing,
    /// Session finished, waiting to fall back to the menu.
    Over,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskKind {
    ReturnToMenu,
}

/// Work deferred on simulated time. Whoever holds it owns its cancellation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTask {
    kind: TaskKind,
    remaining: Millis,
}

impl ScheduledTask {
    pub const fn new(kind: TaskKind, delay: Millis) -> Self {
        Self {
            kind,
            remaining: delay,
        }
    }

    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    pub const fn remaining_ms(&self) -> Millis {
        self.remaining
    }

    /// Returns true once the delay ran out.
    pub fn advance(&mut self, delta: Millis) -> bool {
        self.remaining = self.remaining.saturating_sub(delta);
        self.remaining == 0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    SessionStarted,
    SessionFinished(OutcomeReport),
    ReturnedToMenu,
}

/// Moves between the menu and game sessions.
#[derive(Clone, Debug)]
pub struct GameController {
    config: GameConfig,
    screen: Screen,
    session: Option<GameSession>,
    pending: Option<ScheduledTask>,
    events: VecDeque<ControllerEvent>,
}

impl GameController {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            screen: Screen::Menu,
            session: None,
            pending: None,
            events: VecDeque::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    pub fn pending_task(&self) -> Option<&ScheduledTask> {
        self.pending.as_ref()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = ControllerEvent> + '_ {
        self.events.drain(..)
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            log::debug!("Cancelled {:?} with {} ms left", task.kind(), task.remaining_ms());
        }
    }

    /// Starts a fresh session, dropping the previous one.
    pub fn play(&mut self, seed: u64) -> Result<&mut GameSession> {
        self.cancel_pending();
        let session = GameSession::new(&self.config, seed)?;
        self.screen = Screen::Playing;
        self.events.push_back(ControllerEvent::SessionStarted);
        Ok(self.session.insert(session))
    }

    pub fn back_to_menu(&mut self) {
        self.cancel_pending();
        self.session = None;
        if self.screen != Screen::Menu {
            self.screen = Screen::Menu;
            self.events.push_back(ControllerEvent::ReturnedToMenu);
        }
    }

    pub fn place_pipe(&mut self, coords: Coord2) -> PlaceOutcome {
        match (self.screen, self.session.as_mut()) {
            (Screen::Playing, Some(session)) => session.place_pipe(coords),
            (Screen::Over, _) => PlaceOutcome::Rejected(PlaceRejection::Finished),
            _ => PlaceOutcome::Rejected(PlaceRejection::NoSession),
        }
    }

    pub fn tick(&mut self, delta: Millis) {
        if let (Screen::Playing, Some(session)) = (self.screen, self.session.as_mut()) {
            session.tick(delta);
            // the session may also have been finished through `session_mut`
            if let Some(report) = session.outcome() {
                let delay = self.config.rules.return_to_menu_delay;
                self.screen = Screen::Over;
                self.pending = Some(ScheduledTask::new(TaskKind::ReturnToMenu, delay));
                self.events.push_back(ControllerEvent::SessionFinished(report));
                log::debug!("Returning to menu in {} ms", delay);
            }
            return;
        }

        let due = self.pending.as_mut().is_some_and(|task| task.advance(delta));
        if !due {
            return;
        }
        if let Some(task) = self.pending.take() {
            match task.kind() {
                TaskKind::ReturnToMenu => self.back_to_menu(),
            }
        }
    }
}
