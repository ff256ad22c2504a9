mod common;
mod cycle;
