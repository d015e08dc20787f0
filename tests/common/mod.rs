#![allow(dead_code)]

pub mod fake_feed_server;
