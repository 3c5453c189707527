mod config;
mod feed;
mod polling;
