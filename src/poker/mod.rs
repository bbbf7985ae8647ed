//! 7-card poker hand evaluation.
//!
//! Cards are packed into a single `u32` bitboard: bits 0-3 are a one-hot
//! suit, bits 4-16 a one-hot rank (`2` through `A`). Evaluating a hand never
//! needs the card identity back out, only rank/suit membership, so the
//! bitboard is cheap to fold into per-rank and per-suit counts.

/// Suit bit positions within a card's low nibble.
pub const CLUBS: u8 = 0;
pub const DIAMONDS: u8 = 1;
pub const HEARTS: u8 = 2;
pub const SPADES: u8 = 3;

const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// Encodes a card from a zero-based rank (`0` = deuce, `12` = ace) and suit.
pub fn encode_card(rank: u8, suit: u8) -> u32 {
    debug_assert!(rank < 13 && suit < 4);
    (1u32 << (4 + rank)) | (1u32 << suit)
}

/// Parses a two-character card like `"As"` or `"Td"`. Returns `None` on any
/// malformed input.
pub fn parse_card(s: &str) -> Option<u32> {
    let mut chars = s.chars();
    let rank_char = chars.next()?;
    let suit_char = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let rank = RANK_CHARS.iter().position(|&c| c == rank_char)? as u8;
    let suit = SUIT_CHARS.iter().position(|&c| c == suit_char)? as u8;
    Some(encode_card(rank, suit))
}

fn rank_of(card: u32) -> u8 {
    (card >> 4).trailing_zeros() as u8
}

fn suit_of(card: u32) -> u8 {
    (card & 0b1111).trailing_zeros() as u8
}

/// The strength ordering of a 5-card hand: category first (`0` = high card,
/// `8` = straight flush), then up to 5 tiebreaking ranks in the order they
/// matter. Deriving `Ord` on the fields in this order gives exactly the
/// comparison poker hands need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    category: u8,
    kickers: [u8; 5],
}

impl Score {
    pub fn category_name(&self) -> &'static str {
        match self.category {
            8 => "straight flush",
            7 => "four of a kind",
            6 => "full house",
            5 => "flush",
            4 => "straight",
            3 => "three of a kind",
            2 => "two pair",
            1 => "pair",
            _ => "high card",
        }
    }
}

/// Evaluates the best 5-card hand obtainable from `cards` (must hold at
/// least 5, typically 7: two hole cards plus a five-card board).
pub fn evaluate(cards: &[u32]) -> Score {
    assert!(cards.len() >= 5, "need at least 5 cards to form a hand");
    combinations5(cards.len())
        .into_iter()
        .map(|idx| evaluate_five([cards[idx[0]], cards[idx[1]], cards[idx[2]], cards[idx[3]], cards[idx[4]]]))
        .max()
        .expect("combinations5 never returns empty for len >= 5")
}

fn evaluate_five(cards: [u32; 5]) -> Score {
    let mut rank_counts = [0u8; 13];
    let mut suit_counts = [0u8; 4];
    let mut rank_mask: u32 = 0;

    for &card in &cards {
        let rank = rank_of(card) as usize;
        rank_counts[rank] += 1;
        suit_counts[suit_of(card) as usize] += 1;
        rank_mask |= 1 << rank;
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high = straight_high_rank(rank_mask);

    let mut groups: Vec<(u8, u8)> = rank_counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(rank, &count)| (rank as u8, count))
        .collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let mut kickers = [0u8; 5];

    if is_flush {
        if let Some(high) = straight_high {
            kickers[0] = high;
            return Score { category: 8, kickers };
        }
    }

    if groups[0].1 == 4 {
        kickers[0] = groups[0].0;
        kickers[1] = groups[1].0;
        return Score { category: 7, kickers };
    }

    if groups[0].1 == 3 && groups.get(1).map_or(false, |g| g.1 >= 2) {
        kickers[0] = groups[0].0;
        kickers[1] = groups[1].0;
        return Score { category: 6, kickers };
    }

    if is_flush {
        for (i, &(rank, _)) in groups.iter().take(5).enumerate() {
            kickers[i] = rank;
        }
        return Score { category: 5, kickers };
    }

    if let Some(high) = straight_high {
        kickers[0] = high;
        return Score { category: 4, kickers };
    }

    if groups[0].1 == 3 {
        kickers[0] = groups[0].0;
        kickers[1] = groups[1].0;
        kickers[2] = groups[2].0;
        return Score { category: 3, kickers };
    }

    if groups[0].1 == 2 && groups.get(1).map_or(false, |g| g.1 == 2) {
        kickers[0] = groups[0].0;
        kickers[1] = groups[1].0;
        kickers[2] = groups[2].0;
        return Score { category: 2, kickers };
    }

    if groups[0].1 == 2 {
        kickers[0] = groups[0].0;
        kickers[1] = groups[1].0;
        kickers[2] = groups[2].0;
        kickers[3] = groups[3].0;
        return Score { category: 1, kickers };
    }

    for (i, &(rank, _)) in groups.iter().take(5).enumerate() {
        kickers[i] = rank;
    }
    Score { category: 0, kickers }
}

/// The highest rank of a 5-consecutive run in `mask`, handling the
/// ace-low ("wheel") straight `A-2-3-4-5` as 5-high.
fn straight_high_rank(mask: u32) -> Option<u8> {
    const WHEEL: u32 = (1 << 12) | (1 << 0) | (1 << 1) | (1 << 2) | (1 << 3);
    if mask & WHEEL == WHEEL {
        return Some(3);
    }
    for high in (4..13).rev() {
        let needed: u32 = (0..5).map(|i| 1 << (high - i)).fold(0, |acc, bit| acc | bit);
        if mask & needed == needed {
            return Some(high as u8);
        }
    }
    None
}

/// All 5-element index combinations out of `0..n`.
fn combinations5(n: usize) -> Vec<[usize; 5]> {
    let mut result = Vec::new();
    let mut combo = [0usize; 5];
    fn recurse(start: usize, n: usize, depth: usize, combo: &mut [usize; 5], out: &mut Vec<[usize; 5]>) {
        if depth == 5 {
            out.push(*combo);
            return;
        }
        for i in start..n {
            combo[depth] = i;
            recurse(i + 1, n, depth + 1, combo, out);
        }
    }
    recurse(0, n, 0, &mut combo, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(cards: &[&str]) -> Score {
        let encoded: Vec<u32> = cards.iter().map(|c| parse_card(c).unwrap()).collect();
        evaluate(&encoded)
    }

    #[test]
    fn royal_flush_beats_everything() {
        let score = hand(&["As", "Ks", "Qs", "Js", "Ts", "2c", "3d"]);
        assert_eq!(score.category_name(), "straight flush");
    }

    #[test]
    fn wheel_straight_is_five_high() {
        let score = hand(&["Ac", "2d", "3h", "4s", "5c", "9d", "Kc"]);
        assert_eq!(score.category_name(), "straight");
        assert_eq!(score.kickers[0], 3); // rank index 3 == "5"
    }

    #[test]
    fn four_of_a_kind_beats_full_house() {
        let quads = hand(&["Ac", "Ad", "Ah", "As", "2c", "3d", "4h"]);
        let boat = hand(&["Kc", "Kd", "Kh", "2s", "2c", "3d", "4h"]);
        assert!(quads > boat);
    }

    #[test]
    fn full_house_picks_best_trips_and_pair_from_seven_cards() {
        // Two trips among seven cards: best full house uses the higher trips
        // as the triple and the other as the pair.
        let score = hand(&["Ac", "Ad", "Ah", "Kc", "Kd", "Kh", "2s"]);
        assert_eq!(score.category_name(), "full house");
    }

    #[test]
    fn flush_beats_straight() {
        let flush = hand(&["2c", "5c", "9c", "Jc", "Kc", "3d", "4h"]);
        let straight = hand(&["4d", "5h", "6s", "7c", "8d", "2c", "3c"]);
        assert!(flush > straight);
    }

    #[test]
    fn high_card_comparison_uses_the_final_kicker() {
        let a = hand(&["Ac", "Kd", "9h", "6s", "4c"]);
        let b = hand(&["Ac", "Kd", "9h", "6s", "3c"]);
        assert!(a > b);
    }
}
