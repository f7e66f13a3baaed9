#![allow(dead_code)]

use eloquery::token::Token;
use eloquery::{Config, Position, lexer};

/// Tokenize a PHP snippet.
pub fn tokens(source: &str) -> Vec<Token> {
    lexer::tokenize(source)
}

/// Position of the character immediately after the first occurrence of
/// `needle` — where an editor cursor sits right after typing it.
pub fn cursor_after(source: &str, needle: &str) -> Position {
    let offset = source.find(needle).expect("needle not found in source") + needle.len();
    position_at(source, offset)
}

/// Like [`cursor_after`], but for the last occurrence, for snippets
/// that repeat the needle.
pub fn cursor_after_last(source: &str, needle: &str) -> Position {
    let offset = source.rfind(needle).expect("needle not found in source") + needle.len();
    position_at(source, offset)
}

fn position_at(source: &str, offset: usize) -> Position {
    let before = &source[..offset];
    let line = before.matches('\n').count() as u32;
    let character = before.rsplit('\n').next().unwrap_or("").chars().count() as u32;
    Position::new(line, character)
}

/// A config whose trigger set is exactly `methods`.
pub fn config_with(methods: &[&str]) -> Config {
    Config {
        trigger_methods: methods.iter().map(|m| m.to_string()).collect(),
        ..Config::default()
    }
}
