//! The general family's `D`/`P`/`S`/`C`/`Q`/`T` parameter grammar, read from
//! the `--parameter` file. Grounded on `MateFGeneral.hpp`'s
//! `FGeneralParser::Parse`, which scans the concatenated file for section
//! letters (`A`-`Z`) and dispatches each section's body to `ParseD`/`ParseP`/
//! `ParseS`/`ParseC`/`ParseQ`/`ParseT`. Where the original hand-scans
//! characters, this crate lexes with `logos` and assembles sections from the
//! resulting token stream -- the ambient-tokenising idiom the rest of the
//! pack reaches for (see the sibling workspace's `logos`-based history
//! lexer), rather than re-deriving a hand-rolled character scanner.
//!
//! Grammar (unchanged in meaning from the original):
//! ```text
//! file    = section+
//! section = LETTER ":" body
//! D body  = group (";" group)*        group = NUMBER* | "all"
//! P/S body = (NUMBER NUMBER | "{" NUMBER "," NUMBER "}")*
//! C/Q body = NUMBER* | "all"          (scaled by vertex_count)
//! T body  = NUMBER* | "all"           (scaled by edge_count)
//! ```

use std::ops::Range;

use logos::Logos;

use frontier_core::families::general::{GeneralConfig, VertexPair};

use crate::error::{offset_to_line_col, ParseError, Result};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[regex(r"[A-Z]", |lex| lex.slice().chars().next().unwrap())]
    Section(char),
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("all")]
    All,
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u32>().ok())]
    Number(u32),
}

/// Parses a general-family `--parameter` file into a [`GeneralConfig`].
/// `vertex_count` and `edge_count` substitute for the grammar's `all`
/// keyword the same way `FGeneralParser::Parse`'s `default_n`/`default_m`
/// arguments do.
pub fn parse(input: &str, vertex_count: u32, edge_count: usize) -> Result<GeneralConfig> {
    let tokens = lex(input)?;

    let mut config = GeneralConfig::default();
    let mut next_degree_vertex = 1u32;
    let mut i = 0;
    while i < tokens.len() {
        let (Token::Section(letter), span) = tokens[i].clone() else {
            let (line, column) = offset_to_line_col(input, tokens[i].1.start);
            return Err(ParseError::new("expected a section header (one of D, P, S, C, Q, T)", line, column));
        };
        i += 1;
        match tokens.get(i) {
            Some((Token::Colon, _)) => i += 1,
            _ => {
                let (line, column) = offset_to_line_col(input, span.start);
                return Err(ParseError::new(format!("expected ':' after section {letter:?}"), line, column));
            }
        }
        let body_start = i;
        while i < tokens.len() && !matches!(tokens[i].0, Token::Section(_)) {
            i += 1;
        }
        let body = &tokens[body_start..i];
        match letter {
            'D' => parse_degree_section(body, vertex_count, &mut config, &mut next_degree_vertex),
            'P' => parse_pair_section(body, &mut config.same_component),
            'S' => parse_pair_section(body, &mut config.different_component),
            'C' => config.component_counts_allowed = Some(parse_count_section(body, vertex_count)),
            'Q' => config.cycle_counts_allowed = Some(parse_count_section(body, vertex_count)),
            'T' => config.edge_counts_allowed = Some(parse_count_section(body, edge_count as u32)),
            // Unknown section letters are ignored, matching the original
            // parser's switch statement falling through with no default arm.
            _ => {}
        }
    }
    Ok(config)
}

fn lex(input: &str) -> Result<Vec<(Token, Range<usize>)>> {
    let mut tokens = Vec::new();
    for (token, span) in Token::lexer(input).spanned() {
        let token = token.map_err(|()| {
            let (line, column) = offset_to_line_col(input, span.start);
            ParseError::new(format!("unrecognised token {:?}", &input[span.clone()]), line, column)
        })?;
        tokens.push((token, span));
    }
    Ok(tokens)
}

fn parse_degree_section(body: &[(Token, Range<usize>)], vertex_count: u32, config: &mut GeneralConfig, next_vertex: &mut u32) {
    let mut current: Vec<u8> = Vec::new();
    let mut touched = false;
    for (token, _) in body {
        match token {
            Token::Number(n) => {
                current.push(u8::try_from(*n).unwrap_or(u8::MAX));
                touched = true;
            }
            Token::All => {
                current = (0..=vertex_count).map(|d| u8::try_from(d).unwrap_or(u8::MAX)).collect();
                touched = true;
            }
            Token::Semicolon => {
                if touched {
                    config.degree_allowed.insert(*next_vertex, std::mem::take(&mut current));
                }
                *next_vertex += 1;
                touched = false;
            }
            Token::Comma | Token::LBrace | Token::RBrace | Token::Section(_) | Token::Colon => {}
        }
    }
    if touched {
        config.degree_allowed.insert(*next_vertex, current);
    }
    *next_vertex += 1;
}

fn parse_pair_section(body: &[(Token, Range<usize>)], out: &mut Vec<VertexPair>) {
    let mut pending: Option<u32> = None;
    for (token, _) in body {
        if let Token::Number(n) = token {
            match pending.take() {
                Some(a) => out.push(VertexPair { a, b: *n }),
                None => pending = Some(*n),
            }
        }
    }
}

fn parse_count_section(body: &[(Token, Range<usize>)], scale: u32) -> Vec<u32> {
    let mut out = Vec::new();
    for (token, _) in body {
        match token {
            Token::Number(n) => out.push(*n),
            Token::All => out.extend(0..=scale),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_section_assigns_groups_positionally() {
        let config = parse("D: 1 2; all; 0", 3, 0).unwrap();
        assert_eq!(config.degree_allowed.get(&1), Some(&vec![1, 2]));
        assert_eq!(config.degree_allowed.get(&2), Some(&vec![0, 1, 2, 3]));
        assert_eq!(config.degree_allowed.get(&3), Some(&vec![0]));
    }

    #[test]
    fn pair_sections_read_braced_and_bare_pairs() {
        let config = parse("P: {1,2} 3 4\nS: 5 6", 10, 0).unwrap();
        assert_eq!(config.same_component.len(), 2);
        assert_eq!((config.same_component[0].a, config.same_component[0].b), (1, 2));
        assert_eq!((config.same_component[1].a, config.same_component[1].b), (3, 4));
        assert_eq!(config.different_component.len(), 1);
        assert_eq!((config.different_component[0].a, config.different_component[0].b), (5, 6));
    }

    #[test]
    fn count_sections_support_all_and_explicit_lists() {
        let config = parse("C: all\nT: 2 3", 2, 5).unwrap();
        assert_eq!(config.component_counts_allowed, Some(vec![0, 1, 2]));
        assert_eq!(config.edge_counts_allowed, Some(vec![2, 3]));
    }

    #[test]
    fn unrecognised_character_is_a_parse_error() {
        assert!(parse("D: 1 # 2", 3, 0).is_err());
    }
}
