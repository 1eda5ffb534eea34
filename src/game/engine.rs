//! Turn engine.
//!
//! Owns the phase, both players, the turn cursor and the deck for one game
//! session. Every accepted call returns a [`Step`]: the events it produced, in
//! order, and at most one [`Scheduled`] timer the driver must hand back to
//! [`TurnEngine::fire`] once its delay has elapsed. The engine never sleeps and
//! knows nothing about wall-clock durations.
//!
//! Calls that do not fit the current phase are rejected without touching any
//! state. The rejection is logged here and returned so callers can ignore it.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::board::Board;
use crate::game::dice::Die;
use crate::game::movement::{advance_wrapping, shift_clamped, MoveCause};
use crate::game::types::{
    CenterDisplay, Consequence, Deck, GamePhase, GameSettings, Player, PlayerId, Question,
    QuestionOption, TurnCursor,
};
use crate::config::game::DIE_FACES;

/// Delayed step of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timer {
    /// Dice animation is over: move the token and ask the question.
    DiceSettled,
    /// Consequence text has been read: move the token.
    ConsequenceReveal,
    /// Token has moved: pass the turn.
    TurnHandoff,
}

impl Timer {
    /// Phase the engine is in both when the timer is issued and when it fires.
    pub fn phase(self) -> GamePhase {
        match self {
            Timer::DiceSettled => GamePhase::DiceAnimating,
            Timer::ConsequenceReveal | Timer::TurnHandoff => GamePhase::ConsequenceAnimating,
        }
    }
}

/// Handle for a timer issued by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduled {
    pub timer: Timer,
    /// Session generation the timer belongs to; bumped by every reset.
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum GameEvent {
    GameStarted { deck_len: usize },
    GameReset,
    PhaseChanged { from: GamePhase, to: GamePhase },
    DiceRolled { player: PlayerId, value: u8 },
    PlayerMoved { player: PlayerId, from: usize, to: usize, cause: MoveCause },
    /// The cursor ran past the end of the deck and questions are replayed.
    DeckRecycled { question_index: usize, deck_len: usize },
    QuestionShown { player: PlayerId, question_index: usize, deck_slot: usize },
    OptionSelected { player: PlayerId, slot: usize },
    TurnPassed { from: PlayerId, to: PlayerId, question_index: usize },
}

/// Outcome of an accepted call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    pub events: Vec<GameEvent>,
    pub next: Option<Scheduled>,
}

/// Why a call was ignored. State is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{action} is not allowed during {phase:?}")]
    WrongPhase { action: &'static str, phase: GamePhase },
    #[error("the picked option is not offered by the current question")]
    OptionNotOffered,
    #[error("{timer:?} timer from epoch {epoch} does not match the game")]
    StaleTimer { timer: Timer, epoch: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Stage {
    Setup,
    Rolling,
    DiceAnimating { roll: u8 },
    Questioning { deck_slot: usize },
    ConsequenceAnimating { deck_slot: usize, chosen: usize, moved: bool },
}

impl Stage {
    fn phase(&self) -> GamePhase {
        match self {
            Stage::Setup => GamePhase::Setup,
            Stage::Rolling => GamePhase::Rolling,
            Stage::DiceAnimating { .. } => GamePhase::DiceAnimating,
            Stage::Questioning { .. } => GamePhase::Questioning,
            Stage::ConsequenceAnimating { .. } => GamePhase::ConsequenceAnimating,
        }
    }
}

/// Serializable view of the whole engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub players: Vec<Player>,
    pub cursor: TurnCursor,
    pub current_roll: Option<u8>,
    pub settings: Option<GameSettings>,
    pub deck_len: usize,
    pub center: CenterDisplay,
    pub epoch: u64,
}

#[derive(Debug, Clone)]
pub struct TurnEngine {
    board: Board,
    stage: Stage,
    players: [Player; 2],
    cursor: TurnCursor,
    deck: Option<Deck>,
    settings: Option<GameSettings>,
    /// Value on the shared dice display; cleared when the turn passes.
    current_roll: Option<u8>,
    /// Last picked consequence. Stays visible into the next player's
    /// `Rolling` phase and is cleared by their roll.
    shown_consequence: Option<Consequence>,
    epoch: u64,
}

impl TurnEngine {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            stage: Stage::Setup,
            players: PlayerId::ALL.map(Player::new),
            cursor: TurnCursor::default(),
            deck: None,
            settings: None,
            current_roll: None,
            shown_consequence: None,
            epoch: 0,
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn phase(&self) -> GamePhase {
        self.stage.phase()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn cursor(&self) -> TurnCursor {
        self.cursor
    }

    /// Player whose turn it is; `None` while in `Setup`.
    pub fn active_player(&self) -> Option<&Player> {
        match self.stage {
            Stage::Setup => None,
            _ => Some(self.player(self.cursor.active)),
        }
    }

    pub fn settings(&self) -> Option<&GameSettings> {
        self.settings.as_ref()
    }

    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    pub fn current_roll(&self) -> Option<u8> {
        self.current_roll
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Question on display; only set while `Questioning`.
    pub fn current_question(&self) -> Option<&Question> {
        match self.stage {
            Stage::Questioning { deck_slot } => self.deck.as_ref()?.get(deck_slot),
            _ => None,
        }
    }

    /// Option whose consequence is playing out; only set while `ConsequenceAnimating`.
    pub fn pending_option(&self) -> Option<&QuestionOption> {
        match self.stage {
            Stage::ConsequenceAnimating { deck_slot, chosen, .. } => {
                self.deck.as_ref()?.get(deck_slot)?.options.get(chosen)
            }
            _ => None,
        }
    }

    /// Resolve a pick sent by a client: the option in `slot` of the question
    /// asked at `question_index`, if that question is the one on display.
    pub fn option_at(&self, question_index: usize, slot: usize) -> Option<&QuestionOption> {
        if question_index != self.cursor.question_index {
            return None;
        }
        self.current_question()?.options.get(slot)
    }

    pub fn center_display(&self) -> CenterDisplay {
        let placeholder = |text: String| CenterDisplay::Placeholder { text };
        match &self.stage {
            Stage::Setup => placeholder("Set up a game to start playing!".to_string()),
            Stage::Rolling => match &self.shown_consequence {
                Some(consequence) => CenterDisplay::Consequence(consequence.clone()),
                None => placeholder("Prepare for your turn!".to_string()),
            },
            Stage::DiceAnimating { .. } => {
                placeholder(format!("{} is rolling...", self.player(self.cursor.active).name))
            }
            Stage::Questioning { .. } => match self.current_question() {
                Some(question) => CenterDisplay::QuestionPrompt {
                    question: question.clone(),
                    player_name: self.player(self.cursor.active).name.clone(),
                },
                None => placeholder("Prepare for your turn!".to_string()),
            },
            Stage::ConsequenceAnimating { .. } => match &self.shown_consequence {
                Some(consequence) => CenterDisplay::Consequence(consequence.clone()),
                None => placeholder("Prepare for your turn!".to_string()),
            },
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase(),
            players: self.players.to_vec(),
            cursor: self.cursor,
            current_roll: self.current_roll,
            settings: self.settings.clone(),
            deck_len: self.deck.as_ref().map_or(0, Deck::len),
            center: self.center_display(),
            epoch: self.epoch,
        }
    }

    /// Begin a game with a validated deck. Only legal in `Setup`.
    pub fn start_game(&mut self, deck: Deck, settings: GameSettings) -> Result<Step, Rejection> {
        if self.stage != Stage::Setup {
            return self.reject(Rejection::WrongPhase { action: "start_game", phase: self.phase() });
        }
        let mut events = vec![GameEvent::GameStarted { deck_len: deck.len() }];
        info!(
            "[TurnEngine] Game started: topic={:?} level={} questions={}",
            settings.topic,
            settings.level.code(),
            deck.len()
        );

        self.players = PlayerId::ALL.map(Player::new);
        self.cursor = TurnCursor::default();
        self.deck = Some(deck);
        self.settings = Some(settings);
        self.current_roll = None;
        self.shown_consequence = None;
        self.enter(Stage::Rolling, &mut events);

        Ok(Step { events, next: None })
    }

    /// Roll for the active player. Only legal in `Rolling`.
    pub fn roll_dice(&mut self, die: &mut dyn Die) -> Result<Step, Rejection> {
        if self.stage != Stage::Rolling {
            return self.reject(Rejection::WrongPhase { action: "roll_dice", phase: self.phase() });
        }
        let player = self.cursor.active;
        let value = die.roll().clamp(1, DIE_FACES);
        debug!("[TurnEngine] Player {} rolled {}", player, value);

        self.shown_consequence = None;
        self.current_roll = Some(value);
        self.players[player.index()].last_roll = Some(value);

        let mut events = vec![GameEvent::DiceRolled { player, value }];
        self.enter(Stage::DiceAnimating { roll: value }, &mut events);
        Ok(Step { events, next: Some(self.schedule(Timer::DiceSettled)) })
    }

    /// Answer the question on display. Only legal in `Questioning`, and only
    /// with one of that question's options.
    ///
    /// Options are matched by value, so an identical option from another
    /// question counts as offered. Wire picks go through
    /// [`option_at`](Self::option_at), which also pins the question index.
    pub fn select_option(&mut self, option: &QuestionOption) -> Result<Step, Rejection> {
        let Stage::Questioning { deck_slot } = self.stage else {
            let phase = self.phase();
            return self.reject(Rejection::WrongPhase { action: "select_option", phase });
        };
        let Some(question) = self.current_question() else {
            return self.reject(Rejection::OptionNotOffered);
        };
        let Some(chosen) = question.options.iter().position(|offered| offered == option) else {
            return self.reject(Rejection::OptionNotOffered);
        };

        let player = self.cursor.active;
        self.shown_consequence = Some(Consequence {
            player,
            player_name: self.player(player).name.clone(),
            chosen_label: option.label.clone(),
            text: option.consequence.clone(),
            move_delta: option.move_delta,
        });

        let mut events = vec![GameEvent::OptionSelected { player, slot: chosen }];
        self.enter(Stage::ConsequenceAnimating { deck_slot, chosen, moved: false }, &mut events);
        Ok(Step { events, next: Some(self.schedule(Timer::ConsequenceReveal)) })
    }

    /// Perform the step a timer stands for. Timers from an earlier session, or
    /// that no longer match the phase, are rejected.
    pub fn fire(&mut self, scheduled: Scheduled) -> Result<Step, Rejection> {
        let stale = Rejection::StaleTimer { timer: scheduled.timer, epoch: scheduled.epoch };
        if scheduled.epoch != self.epoch {
            return self.reject(stale);
        }
        debug!("[TurnEngine] Timer {:?} fired", scheduled.timer);

        match (scheduled.timer, self.stage.clone()) {
            (Timer::DiceSettled, Stage::DiceAnimating { roll }) => Ok(self.settle_dice(roll)),
            (
                Timer::ConsequenceReveal,
                Stage::ConsequenceAnimating { deck_slot, chosen, moved: false },
            ) => Ok(self.apply_consequence(deck_slot, chosen)),
            (Timer::TurnHandoff, Stage::ConsequenceAnimating { moved: true, .. }) => {
                Ok(self.pass_turn())
            }
            _ => self.reject(stale),
        }
    }

    /// Drop the game and return to `Setup`. Timers still in flight become stale.
    pub fn reset(&mut self) -> Step {
        self.epoch += 1;
        info!("[TurnEngine] Game reset (epoch {})", self.epoch);

        let mut events = vec![GameEvent::GameReset];
        self.players = PlayerId::ALL.map(Player::new);
        self.cursor = TurnCursor::default();
        self.deck = None;
        self.settings = None;
        self.current_roll = None;
        self.shown_consequence = None;
        self.enter(Stage::Setup, &mut events);
        Step { events, next: None }
    }

    fn settle_dice(&mut self, roll: u8) -> Step {
        let player = self.cursor.active;
        let total = self.board.total_squares();
        let from = self.players[player.index()].position;
        let to = advance_wrapping(from, usize::from(roll), total);
        self.players[player.index()].position = to;

        let mut events = vec![GameEvent::PlayerMoved { player, from, to, cause: MoveCause::Dice }];

        let question_index = self.cursor.question_index;
        // Dice only settle in a started game, which always holds a deck.
        let (deck_slot, deck_len) = self
            .deck
            .as_ref()
            .map_or((0, 0), |deck| (deck.cycled(question_index).0, deck.len()));
        if question_index >= deck_len {
            info!(
                "[TurnEngine] Deck recycled: question #{} replays slot {} of {}",
                question_index, deck_slot, deck_len
            );
            events.push(GameEvent::DeckRecycled { question_index, deck_len });
        }
        events.push(GameEvent::QuestionShown { player, question_index, deck_slot });

        self.enter(Stage::Questioning { deck_slot }, &mut events);
        Step { events, next: None }
    }

    fn apply_consequence(&mut self, deck_slot: usize, chosen: usize) -> Step {
        let player = self.cursor.active;
        let delta = self
            .deck
            .as_ref()
            .and_then(|deck| deck.get(deck_slot))
            .and_then(|question| question.options.get(chosen))
            .map_or(0, |option| option.move_delta);

        let from = self.players[player.index()].position;
        let to = shift_clamped(from, delta, self.board.total_squares());
        self.players[player.index()].position = to;
        self.stage = Stage::ConsequenceAnimating { deck_slot, chosen, moved: true };

        let moved = GameEvent::PlayerMoved { player, from, to, cause: MoveCause::Consequence };
        Step { events: vec![moved], next: Some(self.schedule(Timer::TurnHandoff)) }
    }

    fn pass_turn(&mut self) -> Step {
        let from = self.cursor.active;
        let to = from.other();
        self.cursor.question_index += 1;
        self.cursor.active = to;
        self.current_roll = None;

        let mut events = vec![GameEvent::TurnPassed {
            from,
            to,
            question_index: self.cursor.question_index,
        }];
        self.enter(Stage::Rolling, &mut events);
        Step { events, next: None }
    }

    fn enter(&mut self, stage: Stage, events: &mut Vec<GameEvent>) {
        let from = self.phase();
        let to = stage.phase();
        self.stage = stage;
        if from != to {
            events.push(GameEvent::PhaseChanged { from, to });
        }
    }

    fn schedule(&self, timer: Timer) -> Scheduled {
        Scheduled { timer, epoch: self.epoch }
    }

    fn reject(&self, rejection: Rejection) -> Result<Step, Rejection> {
        warn!("[TurnEngine] Ignored: {}", rejection);
        Err(rejection)
    }
}
