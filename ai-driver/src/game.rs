use std::sync::atomic::{AtomicBool, Ordering};

use crate::ai::Ai;

/// A frame counter. Grounded on ELF's `using Tick = int`; widened to `u64` since nothing
/// here needs negative ticks and overflow after two billion frames would be a poor way to
/// end a game.
pub type Tick = u64;

/// The outcome of one [`GameLoop::step`]. Grounded on ELF's `GameResult` enum
/// (`GAME_NORMAL`/`GAME_END`/`GAME_ERROR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Normal,
    End,
    Error,
}

/// The game-specific state a [`GameLoop`] drives. Grounded on the `S` template parameter
/// of ELF's `GameBaseT`, whose contract (`PreAct`/`PostAct`/`IncTick`/`GetTick`/`forward`/
/// `Init`/`Finalize`/`Reset`) is inferred from `GameBaseT::Step`/`MainLoop`/`Reset`.
pub trait GameState {
    type Action;

    /// Runs just before bots act each tick. A no-op unless the game needs to do
    /// per-tick bookkeeping ahead of the actions (ELF's `PreAct`).
    fn pre_act(&mut self) {}

    /// Runs after every bot (and the spectator) has acted; reports whether the game
    /// should keep going.
    fn post_act(&mut self) -> GameResult;

    fn tick(&self) -> Tick;
    fn inc_tick(&mut self);

    /// Applies one bot's action to the state.
    fn forward(&mut self, action: Self::Action);

    fn init(&mut self) {}
    fn finalize(&mut self) {}
    fn reset(&mut self) {}
}

/// Drives a [`GameState`] through repeated ticks, dispatching to a fixed roster of
/// bots (each on its own frame-skip cadence) and one optional spectator that always
/// acts, regardless of frame skip.
///
/// Grounded on ELF's `GameBaseT<S, AI, Spectator>`. `AddBot`/`RemoveBot`/`AddSpectator`
/// became `add_bot`/`remove_bot`/`add_spectator`; `Step`/`MainLoop`/`Reset` kept their
/// names (adapted to snake_case).
pub struct GameLoop<S: GameState> {
    state: S,
    bots: Vec<BotEntry<S>>,
    spectator: Option<Box<dyn Ai<S>>>,
}

struct BotEntry<S: GameState> {
    ai: Box<dyn Ai<S>>,
    frame_skip: Tick,
}

impl<S: GameState> GameLoop<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            bots: Vec::new(),
            spectator: None,
        }
    }

    /// Registers a bot with the given frame skip (it acts on ticks where
    /// `tick % frame_skip == 0`). Assigns the bot its roster index as id, as ELF's
    /// `AddBot` does via `bot->SetId(_bots.size())`.
    pub fn add_bot(&mut self, mut ai: Box<dyn Ai<S>>, frame_skip: Tick) {
        ai.on_set_id(self.bots.len());
        self.bots.push(BotEntry { ai, frame_skip });
    }

    pub fn remove_bot(&mut self) {
        self.bots.pop();
    }

    /// Registers the spectator, if one is not already set. ELF's `AddSpectator` is
    /// likewise a no-op when a spectator already exists, rather than replacing it.
    pub fn add_spectator(&mut self, mut spectator: Box<dyn Ai<S>>) {
        if self.spectator.is_none() {
            spectator.on_set_id(self.bots.len());
            self.spectator = Some(spectator);
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// One tick: `pre_act`, every bot due this tick plus the spectator act, `post_act`,
    /// `inc_tick`. Grounded on `GameBaseT::Step`.
    pub fn step(&mut self, done: &AtomicBool) -> GameResult {
        self.state.pre_act();
        self.act(true, done);
        let result = self.state.post_act();
        self.state.inc_tick();
        result
    }

    /// Runs `step` until it stops returning [`GameResult::Normal`] or `done` is set,
    /// then gives every bot (and the spectator) one final unconditional act, notifies
    /// `game_end`, and finalizes the state. Grounded on `GameBaseT::MainLoop`.
    pub fn main_loop(&mut self, done: &AtomicBool) -> GameResult {
        let _span = tracing::info_span!("main_loop").entered();
        self.state.init();
        let mut result = GameResult::Normal;
        loop {
            result = self.step(done);
            if result != GameResult::Normal {
                break;
            }
            if done.load(Ordering::SeqCst) {
                break;
            }
        }
        tracing::debug!(ticks = self.state.tick(), ?result, "main loop ended");
        self.act(false, done);
        self.notify_game_end();
        self.state.finalize();
        result
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    fn act(&mut self, check_frame_skip: bool, done: &AtomicBool) {
        let Self { state, bots, spectator } = self;
        let t = state.tick();
        for bot in bots.iter_mut() {
            if !check_frame_skip || t % bot.frame_skip == 0 {
                if let Some(action) = bot.ai.act(state, done) {
                    state.forward(action);
                }
            }
        }
        if let Some(spectator) = spectator {
            if let Some(action) = spectator.act(state, done) {
                state.forward(action);
            }
        }
    }

    fn notify_game_end(&mut self) {
        for bot in &mut self.bots {
            bot.ai.game_end();
        }
        if let Some(spectator) = &mut self.spectator {
            spectator.game_end();
        }
    }
}
