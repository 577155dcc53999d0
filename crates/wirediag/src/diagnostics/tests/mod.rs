mod common;
mod rules;
mod service;
