/// One replay entry. Grounded on ELF's `SharedRWBuffer::Record`: a timestamped,
/// game-and-sequence-addressed blob with a sampling priority and an observed reward.
///
/// `timestamp` of `0` means "assign one now" — [`crate::ReplayStore::insert`] fills it
/// in with the current time, the way the original does in `Insert` when
/// `insert_buffer_.back().timestamp == 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: u64,
    pub game_id: u64,
    pub machine: String,
    pub seq: i32,
    pub pri: f32,
    pub reward: f32,
    pub content: Vec<u8>,
}

impl Record {
    #[must_use]
    pub fn new(game_id: u64, machine: impl Into<String>, seq: i32, pri: f32, reward: f32, content: Vec<u8>) -> Self {
        Self {
            timestamp: 0,
            game_id,
            machine: machine.into(),
            seq,
            pri,
            reward,
            content,
        }
    }
}
