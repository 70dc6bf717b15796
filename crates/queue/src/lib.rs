pub mod backend;
pub mod dead_letter;
pub mod error;
pub mod filesystem;
pub mod memory;

pub use backend::QueueBackend;
pub use dead_letter::{DeadLetterQueue, InvalidQueueDsnOrIo};
pub use error::{InvalidQueueDsn, QueueError};
pub use filesystem::FilesystemQueueBackend;
pub use memory::MemoryQueueBackend;
