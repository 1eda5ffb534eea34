//! Runs engine timers on the session's actor context.
//! Timers are never cancelled: each one fires once and the engine decides
//! whether it still applies.

use actix::prelude::*;
use log::debug;

use crate::game::engine::Scheduled;
use crate::presentation::clock::delay_for;
use crate::server::game_session::server::GameSession;

/// Hand `scheduled` back to the engine once its presentation delay is over.
pub fn schedule(this: &GameSession, scheduled: Scheduled, ctx: &mut Context<GameSession>) {
    let delay = delay_for(scheduled.timer);
    debug!(
        "[GameSession] {} scheduled {:?} in {:?}",
        this.game_id, scheduled.timer, delay
    );
    ctx.run_later(delay, move |act, ctx| {
        fire(act, scheduled, ctx);
    });
}

/// Perform a due timer; a follow-up timer is scheduled by `apply`.
pub fn fire(this: &mut GameSession, scheduled: Scheduled, ctx: &mut Context<GameSession>) {
    let outcome = this.engine.fire(scheduled);
    this.apply(outcome, ctx);
}
