use std::sync::atomic::AtomicBool;

use crate::game::GameState;

/// A bot (or human-facing proxy) capable of acting on a [`GameState`].
///
/// Grounded on ELF's `AI_T<S, A>`: `Act` returns `false` there to signal the attempt
/// failed outright (not "no move chosen" — that's a legal pass, if the game allows it).
/// Here that distinction is `Option<Action>` on success/failure rather than a bool plus
/// an out-parameter, since Rust has no nullable-by-convention output argument.
///
/// `SetId` in the original also stores the id on the AI itself; this driver keeps bot
/// identity in [`crate::game::GameLoop`] instead; `on_set_id` is kept as the hook,
/// without the backing storage, since nothing downstream reads the id back off the AI.
pub trait Ai<S: GameState> {
    fn act(&mut self, state: &S, done: &AtomicBool) -> Option<S::Action>;

    fn game_end(&mut self) -> bool {
        true
    }

    fn on_set_id(&mut self, _id: usize) {}
}

/// An [`Ai`] that acts by round-tripping through some out-of-process channel.
///
/// Grounded on ELF's `AIWithCommT<S, A, AIComm>`: `extract` fills an outgoing payload
/// from the state, `send_data_wait_reply` is the blocking round trip (the original's
/// `_ai_comm->SendDataWaitReply()`), and `handle_response` turns the reply into an
/// action. `send_data_wait_reply` returning `None` models the original's early `return
/// false` when the round trip itself fails (channel closed, timeout, ...).
pub trait AiWithComm<S: GameState> {
    type Data;

    fn extract(&mut self, state: &S) -> Self::Data;
    fn send_data_wait_reply(&mut self, data: Self::Data) -> Option<Self::Data>;
    fn handle_response(&mut self, state: &S, data: &Self::Data) -> Option<S::Action>;

    fn game_end(&mut self) -> bool {
        true
    }

    fn on_set_id(&mut self, _id: usize) {}
}

/// Adapts any [`AiWithComm`] into an [`Ai`], the way `AIWithCommT` derives from `AI_T`
/// by overriding `Act` with the extract/send/handle_response sequence.
pub struct CommAi<T>(pub T);

impl<S, T> Ai<S> for CommAi<T>
where
    S: GameState,
    T: AiWithComm<S>,
{
    fn act(&mut self, state: &S, _done: &AtomicBool) -> Option<S::Action> {
        let data = self.0.extract(state);
        let reply = self.0.send_data_wait_reply(data)?;
        self.0.handle_response(state, &reply)
    }

    fn game_end(&mut self) -> bool {
        self.0.game_end()
    }

    fn on_set_id(&mut self, id: usize) {
        self.0.on_set_id(id);
    }
}
