use actix::prelude::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use actix::MessageResult;
use uuid::Uuid;
use log::{debug, info, warn};

use crate::config::server::{SESSION_IDLE_CHECK_SECS, SESSION_IDLE_TIMEOUT_SECS};

use crate::game::board::Board;
use crate::game::dice::{Die, RandomDie};
use crate::game::engine::{GameEvent, Rejection, Step, TurnEngine};
use crate::game::types::{Deck, GameSettings};
use crate::presentation::view::BoardView;
use crate::server::game_session::session::GameSessionActor;
use crate::server::game_session::messages::{
    ClientAction, GetSnapshot, ProcessClientMessage, RegisterClient, ServerWsMessage, StartGame,
    UnregisterClient,
};
use crate::server::game_session::timers;

/// One running game: the turn engine plus every client watching it.
pub struct GameSession {
    pub game_id: Uuid,
    pub(super) engine: TurnEngine,
    die: Box<dyn Die>,
    clients: HashMap<Uuid, Addr<GameSessionActor>>,
    /// Notified when the session stops itself.
    manager: Option<Addr<GameSessionManager>>,
    idle_timeout: Duration,
    /// Set while no client is connected.
    idle_since: Option<Instant>,
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("[GameSession] Session {} started", self.game_id);
        let every = self.idle_timeout.min(Duration::from_secs(SESSION_IDLE_CHECK_SECS));
        ctx.run_interval(every, |act, ctx| act.stop_if_idle(ctx));
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[GameSession] Session {} stopped", self.game_id);
        if let Some(manager) = &self.manager {
            manager.do_send(RemoveGame { game_id: self.game_id });
        }
    }
}

impl GameSession {
    pub fn new(game_id: Uuid, board: Board) -> Self {
        Self::with_die(game_id, board, Box::new(RandomDie))
    }

    pub fn with_die(game_id: Uuid, board: Board, die: Box<dyn Die>) -> Self {
        Self {
            game_id,
            engine: TurnEngine::new(board),
            die,
            clients: HashMap::new(),
            manager: None,
            idle_timeout: Duration::from_secs(SESSION_IDLE_TIMEOUT_SECS),
            idle_since: Some(Instant::now()),
        }
    }

    /// Report to `manager` when the session stops, and stop after
    /// `idle_timeout` without any connected client.
    pub fn watched_by(mut self, manager: Addr<GameSessionManager>, idle_timeout: Duration) -> Self {
        self.manager = Some(manager);
        self.idle_timeout = idle_timeout;
        self
    }

    fn stop_if_idle(&mut self, ctx: &mut Context<Self>) {
        let Some(since) = self.idle_since else {
            return;
        };
        if since.elapsed() >= self.idle_timeout {
            info!(
                "[GameSession] Session {} had no clients for {:?}, stopping",
                self.game_id, self.idle_timeout
            );
            ctx.stop();
        }
    }

    pub fn send_state(&self, events: Vec<GameEvent>) {
        debug!(
            "[GameSession] Broadcast board: game_id={} phase={:?} clients={}",
            self.game_id,
            self.engine.phase(),
            self.clients.len()
        );
        let msg = ServerWsMessage::Board { view: BoardView::from_engine(&self.engine), events };
        for addr in self.clients.values() {
            addr.do_send(msg.clone());
        }
    }

    /// Schedule the follow-up timer of an accepted step and broadcast it.
    /// Rejections were already logged by the engine and change nothing.
    pub(super) fn apply(&mut self, outcome: Result<Step, Rejection>, ctx: &mut Context<Self>) {
        let Ok(step) = outcome else {
            return;
        };
        if let Some(scheduled) = step.next {
            timers::schedule(self, scheduled, ctx);
        }
        self.send_state(step.events);
    }

    fn handle_action(&mut self, action: ClientAction, ctx: &mut Context<Self>) {
        let outcome = match action {
            ClientAction::Roll => self.engine.roll_dice(self.die.as_mut()),
            ClientAction::SelectOption { question_index, slot } => {
                match self.engine.option_at(question_index, slot).cloned() {
                    Some(option) => self.engine.select_option(&option),
                    None => {
                        warn!(
                            "[GameSession] Pick (question {}, slot {}) is not on display",
                            question_index, slot
                        );
                        return;
                    }
                }
            }
            ClientAction::Reset => Ok(self.engine.reset()),
        };
        self.apply(outcome, ctx);
    }
}

impl Handler<StartGame> for GameSession {
    type Result = Result<(), Rejection>;

    fn handle(&mut self, msg: StartGame, ctx: &mut Context<Self>) -> Self::Result {
        let step = self.engine.start_game(msg.deck, msg.settings)?;
        self.apply(Ok(step), ctx);
        Ok(())
    }
}

impl Handler<ProcessClientMessage> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ProcessClientMessage, ctx: &mut Context<Self>) -> Self::Result {
        debug!("[GameSession] Client {} sent {:?}", msg.client_id, msg.msg);
        self.handle_action(msg.msg, ctx);
    }
}

impl Handler<GetSnapshot> for GameSession {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _msg: GetSnapshot, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.engine.snapshot())
    }
}

impl Handler<RegisterClient> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: RegisterClient, _: &mut Context<Self>) -> Self::Result {
        self.clients.insert(msg.client_id, msg.addr.clone());
        self.idle_since = None;
        msg.addr.do_send(ServerWsMessage::Board {
            view: BoardView::from_engine(&self.engine),
            events: Vec::new(),
        });
    }
}

impl Handler<UnregisterClient> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: UnregisterClient, _: &mut Context<Self>) -> Self::Result {
        self.clients.remove(&msg.client_id);
        if self.clients.is_empty() {
            self.idle_since = Some(Instant::now());
        }
    }
}

/// Owns every session and hands out their addresses.
pub struct GameSessionManager {
    sessions: HashMap<Uuid, Addr<GameSession>>,
    board: Board,
    idle_timeout: Duration,
}

impl GameSessionManager {
    pub fn new(board: Board) -> Self {
        Self::with_idle_timeout(board, Duration::from_secs(SESSION_IDLE_TIMEOUT_SECS))
    }

    pub fn with_idle_timeout(board: Board, idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            board,
            idle_timeout,
        }
    }

    /// Create a session and start its game right away.
    pub fn create_game(
        &mut self,
        deck: Deck,
        settings: GameSettings,
        manager: Addr<Self>,
    ) -> Result<Uuid, Rejection> {
        let game_id = Uuid::new_v4();
        let mut session =
            GameSession::new(game_id, self.board).watched_by(manager, self.idle_timeout);
        session.engine.start_game(deck, settings)?;

        self.sessions.insert(game_id, session.start());
        info!("[GameSessionManager] Created game {} ({} sessions)", game_id, self.sessions.len());
        Ok(game_id)
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

#[derive(Message)]
#[rtype(result = "Result<Uuid, Rejection>")]
pub struct CreateGame {
    pub deck: Deck,
    pub settings: GameSettings,
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = Result<Uuid, Rejection>;

    fn handle(&mut self, msg: CreateGame, ctx: &mut Context<Self>) -> Self::Result {
        self.create_game(msg.deck, msg.settings, ctx.address())
    }
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RemoveGame {
    pub game_id: Uuid,
}

impl Handler<RemoveGame> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: RemoveGame, _: &mut Context<Self>) -> Self::Result {
        if self.sessions.remove(&msg.game_id).is_some() {
            info!(
                "[GameSessionManager] Removed game {} ({} sessions)",
                msg.game_id,
                self.sessions.len()
            );
        }
    }
}

#[derive(Message)]
#[rtype(result = "Option<Addr<GameSession>>")]
pub struct GetGameSession {
    pub game_id: Uuid,
}

impl Handler<GetGameSession> for GameSessionManager {
    type Result = Option<Addr<GameSession>>;

    fn handle(&mut self, msg: GetGameSession, _: &mut Context<Self>) -> Self::Result {
        self.sessions.get(&msg.game_id).cloned()
    }
}
