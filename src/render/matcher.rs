// src/render/matcher.rs
// =============================================================================
// Finds the opening token that a closing token belongs to.
//
// The stream is flat, so the pairing has to be recovered by counting, exactly
// like bracket matching: walk backwards from the token just before the close,
// +1 for every close of the same kind, -1 for every open of the same kind,
// and the open that brings the count to zero is the match.
//
// Simply taking the nearest preceding open goes wrong as soon as another
// element of the same kind sits between the pair:
//
//   idx:  0        1      2        3      4       5      6
//         open(a)  text   open(b)  text   close   text   close <- ?
//
// The nearest open before 6 is 2, but 2 is already balanced by 4; the real
// partner is 0.
//
// Streams that never balance give None. Callers must treat that as "render
// normally", never as an error.
// =============================================================================

use super::token::{Token, TokenKind};

// Opening link token paired with the link close at `close_index`.
pub fn match_open(tokens: &[Token], close_index: usize) -> Option<&Token> {
    match_open_kind(tokens, close_index, TokenKind::Link)
}

// Same as `match_open`, for any token kind.
//
// The token at `close_index` itself is never inspected. An index past the
// end of the stream yields None.
pub fn match_open_kind(tokens: &[Token], close_index: usize, kind: TokenKind) -> Option<&Token> {
    let before = tokens.get(..close_index)?;
    let mut level = 1usize;

    for token in before.iter().rev() {
        if token.is_close_of(kind) {
            level += 1;
        } else if token.is_open_of(kind) {
            level -= 1;
            if level == 0 {
                return Some(token);
            }
        }
    }

    None
}

// Index of the close token paired with the open at `open_index`, scanning
// forwards with the same counter.
pub fn match_close_kind(tokens: &[Token], open_index: usize, kind: TokenKind) -> Option<usize> {
    let after = tokens.get(open_index + 1..)?;
    let mut level = 1usize;

    for (offset, token) in after.iter().enumerate() {
        if token.is_open_of(kind) {
            level += 1;
        } else if token.is_close_of(kind) {
            level -= 1;
            if level == 0 {
                return Some(open_index + 1 + offset);
            }
        }
    }

    None
}

// True when `tokens[idx]` sits between an open of `kind` and its close. The
// close itself counts as inside; the outermost open does not.
pub fn enclosed_by(tokens: &[Token], idx: usize, kind: TokenKind) -> bool {
    let Some(before) = tokens.get(..idx) else {
        return false;
    };
    let mut level = 0usize;

    for token in before.iter().rev() {
        if token.is_close_of(kind) {
            level += 1;
        } else if token.is_open_of(kind) {
            if level == 0 {
                return true;
            }
            level -= 1;
        }
    }

    false
}
