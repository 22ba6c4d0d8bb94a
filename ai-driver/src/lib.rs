//! A generic driver for games played by one or more bots plus an optional spectator.
//!
//! [`GameLoop`] runs the tick loop and frame-skip scheduling (see `game`); [`Ai`] and
//! [`AiWithComm`] (see `ai`) are the bot contracts; [`MctsAi`] (see `mcts_ai`) wires a
//! `mcts-engine` search up as one. See each module for the ELF file it is grounded on.

mod ai;
mod game;
mod mcts_ai;

pub use ai::{Ai, AiWithComm, CommAi};
pub use game::{GameLoop, GameResult, GameState, Tick};
pub use mcts_ai::MctsAi;
