pub mod export;
pub mod rebuild;
pub mod seed;
pub mod serve;
