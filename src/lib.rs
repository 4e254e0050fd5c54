pub mod cli;
pub mod commands;
pub mod error;

pub mod core {
    pub mod bed;
    pub mod info;
    pub mod record;
    pub mod svtype;
}

pub mod io {
    pub mod fetcher;
    pub mod readers;
    pub mod writers;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
