pub(crate) mod board;
pub(crate) mod cascade;
pub(crate) mod game;
pub(crate) mod gravity;
pub(crate) mod hint;
pub(crate) mod matcher;
pub(crate) mod rng;
pub(crate) mod snapshot;
pub(crate) mod swap;
pub(crate) mod tile;
