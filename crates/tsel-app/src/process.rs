//! Message processing
//!
//! Runs a message and its follow-ups through the TEA update function,
//! dispatching each resulting action as it is produced.

use tokio::sync::{mpsc, watch};

use crate::actions::handle_action;
use crate::handler;
use crate::message::Message;
use crate::services::{ServiceContext, TargetApi};
use crate::state::AppState;
use crate::subscriptions::Subscriptions;

/// Process a message through the TEA update function
pub fn process_message<A>(
    state: &mut AppState,
    message: Message,
    services: &ServiceContext<A>,
    msg_tx: &mpsc::Sender<Message>,
    subscriptions: &mut Subscriptions,
    shutdown_rx: &watch::Receiver<bool>,
) where
    A: TargetApi + Clone + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(
                action,
                services,
                msg_tx.clone(),
                subscriptions,
                shutdown_rx.clone(),
            );
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
