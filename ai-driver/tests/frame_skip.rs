//! End-to-end scenario: a tick loop with two bots on different frame-skip cadences plus
//! an always-acting spectator, checking scheduling order and frame-skip arithmetic.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;

use ai_driver::{Ai, GameLoop, GameResult, GameState, Tick};

#[derive(Clone)]
struct Counter {
    tick: Tick,
    max_ticks: Tick,
}

impl GameState for Counter {
    type Action = &'static str;

    fn post_act(&mut self) -> GameResult {
        if self.tick + 1 >= self.max_ticks {
            GameResult::End
        } else {
            GameResult::Normal
        }
    }

    fn tick(&self) -> Tick {
        self.tick
    }

    fn inc_tick(&mut self) {
        self.tick += 1;
    }

    fn forward(&mut self, _action: &'static str) {}
}

struct Logger {
    name: &'static str,
    log: Rc<RefCell<Vec<(Tick, &'static str)>>>,
}

impl Ai<Counter> for Logger {
    fn act(&mut self, state: &Counter, _done: &AtomicBool) -> Option<&'static str> {
        self.log.borrow_mut().push((state.tick(), self.name));
        Some(self.name)
    }
}

#[test]
fn bots_respect_frame_skip_and_spectator_always_acts() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut game = GameLoop::new(Counter { tick: 0, max_ticks: 6 });

    game.add_bot(
        Box::new(Logger { name: "every-tick", log: Rc::clone(&log) }),
        1,
    );
    game.add_bot(
        Box::new(Logger { name: "every-other-tick", log: Rc::clone(&log) }),
        2,
    );
    game.add_spectator(Box::new(Logger { name: "spectator", log: Rc::clone(&log) }));

    let done = AtomicBool::new(false);
    let result = game.main_loop(&done);
    assert_eq!(result, GameResult::End);

    let entries = log.borrow();
    let every_tick_count = entries.iter().filter(|(_, n)| *n == "every-tick").count();
    let every_other_count = entries.iter().filter(|(_, n)| *n == "every-other-tick").count();
    let spectator_count = entries.iter().filter(|(_, n)| *n == "spectator").count();

    // 6 ticks during the main loop plus one unconditional act after it ends.
    assert_eq!(every_tick_count, 7);
    // Fires on ticks 0, 2, 4 during the loop (3), plus the trailing unconditional act.
    assert_eq!(every_other_count, 4);
    // The spectator is exempt from frame-skip gating even during the tick loop.
    assert_eq!(spectator_count, 7);

    for (tick, name) in entries.iter().filter(|(_, n)| *n == "every-other-tick").take(3) {
        assert_eq!(tick % 2, 0);
        let _ = name;
    }
}

/// The literal S5 scenario (spec §8): two bots with frame-skips `1` and `3`, driven for
/// 12 ticks. Bot 0 acts 12 times, bot 1 acts on ticks 0, 3, 6, 9, and within any tick
/// both act, bot 0 (registered first) acts before bot 1.
#[test]
fn s5_two_bots_with_frame_skips_one_and_three_over_twelve_ticks() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut game = GameLoop::new(Counter { tick: 0, max_ticks: Tick::MAX });

    game.add_bot(Box::new(Logger { name: "bot-0", log: Rc::clone(&log) }), 1);
    game.add_bot(Box::new(Logger { name: "bot-1", log: Rc::clone(&log) }), 3);

    let done = AtomicBool::new(false);
    for _ in 0..12 {
        game.step(&done);
    }

    let entries = log.borrow();
    let bot0_ticks: Vec<Tick> = entries.iter().filter(|(_, n)| *n == "bot-0").map(|(t, _)| *t).collect();
    let bot1_ticks: Vec<Tick> = entries.iter().filter(|(_, n)| *n == "bot-1").map(|(t, _)| *t).collect();

    assert_eq!(bot0_ticks, (0..12).collect::<Vec<_>>());
    assert_eq!(bot1_ticks, vec![0, 3, 6, 9]);

    for tick in [0, 3, 6, 9] {
        let bot0_idx = entries.iter().position(|(t, n)| *t == tick && *n == "bot-0").unwrap();
        let bot1_idx = entries.iter().position(|(t, n)| *t == tick && *n == "bot-1").unwrap();
        assert!(bot0_idx < bot1_idx, "bot 0 must act before bot 1 within tick {tick}");
    }
}

#[test]
fn game_end_is_broadcast_to_every_bot_once() {
    struct EndCounter {
        ends: Rc<RefCell<u32>>,
    }

    impl Ai<Counter> for EndCounter {
        fn act(&mut self, _state: &Counter, _done: &AtomicBool) -> Option<&'static str> {
            None
        }

        fn game_end(&mut self) -> bool {
            *self.ends.borrow_mut() += 1;
            true
        }
    }

    let ends = Rc::new(RefCell::new(0));
    let mut game = GameLoop::new(Counter { tick: 0, max_ticks: 2 });
    game.add_bot(Box::new(EndCounter { ends: Rc::clone(&ends) }), 1);
    game.add_spectator(Box::new(EndCounter { ends: Rc::clone(&ends) }));

    let done = AtomicBool::new(false);
    game.main_loop(&done);

    assert_eq!(*ends.borrow(), 2);
}
