//! Wire models of the Lepton workspace API.

pub mod models;
