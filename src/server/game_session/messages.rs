use actix::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::GameSessionActor;
use crate::game::engine::{GameEvent, GameSnapshot, Rejection};
use crate::game::types::{Deck, GameSettings};
use crate::presentation::view::BoardView;

/// Intents a client can send over the game WebSocket.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "action", content = "data")]
pub enum ClientAction {
    Roll,
    SelectOption { question_index: usize, slot: usize },
    Reset,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ProcessClientMessage {
    pub msg: ClientAction,
    pub client_id: Uuid,
}

/// Pushed to every connected client after each accepted step.
#[derive(Message, Serialize, Clone, Debug)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerWsMessage {
    Board { view: BoardView, events: Vec<GameEvent> },
}

/// Start the session's game with a validated deck.
#[derive(Message)]
#[rtype(result = "Result<(), Rejection>")]
pub struct StartGame {
    pub deck: Deck,
    pub settings: GameSettings,
}

#[derive(Message)]
#[rtype(result = "GameSnapshot")]
pub struct GetSnapshot;

#[derive(Message)]
#[rtype(result = "()")]
pub struct RegisterClient {
    pub client_id: Uuid,
    pub addr: Addr<GameSessionActor>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct UnregisterClient {
    pub client_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_actions_use_action_tags() {
        let roll: ClientAction = serde_json::from_str(r#"{"action":"Roll"}"#).unwrap();
        assert_eq!(roll, ClientAction::Roll);

        let text = r#"{"action":"SelectOption","data":{"question_index":3,"slot":1}}"#;
        let pick: ClientAction = serde_json::from_str(text).unwrap();
        assert_eq!(pick, ClientAction::SelectOption { question_index: 3, slot: 1 });

        assert!(serde_json::from_str::<ClientAction>(r#"{"action":"Move","data":"Up"}"#).is_err());
    }
}
