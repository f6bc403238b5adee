mod availability;
mod common;
