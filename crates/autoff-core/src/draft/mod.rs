pub mod autodraft;
pub mod error;
pub mod pick;
pub mod pool;
pub mod roster;
