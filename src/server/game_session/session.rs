use actix::{Actor, ActorContext, Addr, AsyncContext, Handler, StreamHandler};
use actix_web::{HttpRequest, HttpResponse, web, Error, error};
use actix_web_actors::ws;
use log::{debug, info};
use uuid::Uuid;

use crate::server::game_session::server::{GameSession, GetGameSession};
use crate::server::game_session::messages::{
    ClientAction, ProcessClientMessage, RegisterClient, ServerWsMessage, UnregisterClient,
};
use crate::server::state::AppState;
use crate::server::ws_error::ws_error_message;

/// One WebSocket connection to a game session.
pub struct GameSessionActor {
    pub game_id: Uuid,
    pub client_id: Uuid,
    pub session_addr: Addr<GameSession>,
}

impl Actor for GameSessionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("[GameSessionActor] Client {} joined game {}", self.client_id, self.game_id);
        self.session_addr.do_send(RegisterClient {
            client_id: self.client_id,
            addr: ctx.address(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[GameSessionActor] Client {} left game {}", self.client_id, self.game_id);
        self.session_addr.do_send(UnregisterClient { client_id: self.client_id });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSessionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                let msg: ClientAction = match serde_json::from_str(&text) {
                    Ok(m) => m,
                    Err(e) => {
                        debug!(
                            "[GameSessionActor] Undecodable message from {}: {}",
                            self.client_id, e
                        );
                        let context = serde_json::json!({ "game_id": self.game_id });
                        ctx.text(ws_error_message(
                            "INVALID_COMMAND",
                            "Invalid command",
                            Some(context),
                        ));
                        return;
                    }
                };
                self.session_addr.do_send(ProcessClientMessage {
                    msg,
                    client_id: self.client_id,
                });
            }
            Ok(ws::Message::Ping(bytes)) => ctx.pong(&bytes),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(_) => ctx.stop(),
            _ => (),
        }
    }
}

impl Handler<ServerWsMessage> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) -> Self::Result {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(_) => ctx.text(ws_error_message(
                "SERIALIZATION_FAILED",
                "Failed to serialize game state",
                None,
            )),
        }
    }
}

pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let game_id = path.into_inner();

    let session_addr = data.game_session_manager
        .send(GetGameSession { game_id })
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Game session not found"))?;

    ws::start(
        GameSessionActor {
            game_id,
            client_id: Uuid::new_v4(),
            session_addr,
        },
        &req,
        stream,
    )
}
