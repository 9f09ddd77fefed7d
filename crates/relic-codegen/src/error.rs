#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no argument register for slot {slot}: slots 0..{limit} are register-passed, later arguments go through the stack")]
    NoSuchArgumentSlot { slot: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
