use crate::error::Result;
use crate::lz77::tokens::Token;
use crate::CompressConfig;

/// A candidate match found in the search buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Start of the match within the search buffer
    pub pos: usize,
    /// Match length in bytes
    pub len: u8,
}

/// Scan `input` left to right and produce the token stream.
///
/// At each position the search buffer is the window of up to
/// `max_search_len` already-consumed bytes and the lookahead is up to
/// `max_match_len` upcoming bytes. A back-reference is emitted when the
/// longest match clears `min_match_len` and enough input has been
/// consumed for a reference to point backwards; otherwise a single
/// literal is emitted.
pub fn tokenize(input: &[u8], config: &CompressConfig) -> Result<Vec<Token>> {
    config.validate()?;

    let min_len = config.min_match_len as usize;
    let mut tokens = Vec::with_capacity(input.len());
    let mut split = 0usize;

    while split < input.len() {
        let window_start = split.saturating_sub(config.max_search_len as usize);
        let lookahead_end = input.len().min(split + config.max_match_len as usize);

        // References cannot pay off until the window holds enough history
        let found = if split > min_len {
            longest_match(
                &input[window_start..split],
                &input[split..lookahead_end],
                config.min_match_len,
            )
        } else {
            None
        };

        match found {
            Some(m) => {
                let distance = (split - (window_start + m.pos)) as u16;
                tokens.push(Token::back_ref(distance, m.len));
                split += m.len as usize;
            }
            None => {
                tokens.push(Token::literal(input[split]));
                split += 1;
            }
        }
    }

    Ok(tokens)
}

/// Find the longest match of `lookahead` within `search`.
///
/// Candidate positions are the occurrences of the first `min_match_len`
/// bytes of the lookahead. The longest candidate wins; ties go to the
/// earliest occurrence, which is the farthest back. Returns `None` when
/// no candidate reaches `min_match_len` (or length 1 when it is zero).
pub fn longest_match(search: &[u8], lookahead: &[u8], min_match_len: u8) -> Option<Match> {
    let min = min_match_len as usize;
    if lookahead.len() < min {
        return None;
    }

    let mut best: Option<Match> = None;
    for pos in occurrences(search, &lookahead[..min]) {
        let len = common_prefix_len(&search[pos..], lookahead);
        let best_len = best.map_or(0, |m| m.len);
        if len as usize >= min && len > best_len {
            best = Some(Match { pos, len });
        }
    }
    best
}

/// Starting indices in `text` where `pattern` occurs. An empty pattern
/// matches at every index of a non-empty text.
fn occurrences<'a>(text: &'a [u8], pattern: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
    let end = if text.is_empty() || text.len() < pattern.len() {
        0
    } else if pattern.is_empty() {
        text.len()
    } else {
        text.len() - pattern.len() + 1
    };
    (0..end).filter(move |&i| text[i..].starts_with(pattern))
}

/// Length of the common prefix of `a` and `b`, capped at 255
fn common_prefix_len(a: &[u8], b: &[u8]) -> u8 {
    a.iter().zip(b).take(255).take_while(|(x, y)| x == y).count() as u8
}
