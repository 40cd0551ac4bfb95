pub mod clients;
pub mod clock;
pub mod storage;
