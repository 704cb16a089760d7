//! Hand Evaluation Example
//!
//! Shows how the engine ranks hands at the end of a round: pure
//! evaluation, the card-code evaluator and the resolver's tie rules.

use coop_poker::{
    entities::{Card, Chip, ChipColor},
    evaluator::{HandEvaluator, StandardEvaluator, poker_codes},
    functional::{argmax, eval},
    game::{options::TiePolicy, resolver::resolve},
};

fn cards(codes: &str) -> Vec<Card> {
    codes
        .split_whitespace()
        .map(|code| code.parse().expect("valid card code"))
        .collect()
}

fn main() {
    println!("=== Cooperative Poker Hand Evaluation ===\n");

    // Example 1: Evaluate a single hand
    println!("Example 1: Evaluating a 7-card hand");
    let hand = cards("Ah Kh Qh Jh Th 9s 2c");
    let result = eval(&hand);
    println!("Hand: {}", poker_codes(&hand).join(" "));
    println!("Best 5-card hand: {result:?}");
    let value = StandardEvaluator
        .evaluate(&poker_codes(&hand))
        .expect("valid hand");
    println!("Evaluator says: {} ({})\n", value.hand_name, value.value);

    // Example 2: Compare hands against a shared board
    println!("Example 2: Comparing three players on one board");
    let board = cards("2c 7d 9h Js 4c");
    let hands = [cards("9s 9d"), cards("Kh Kd"), cards("3s 5d")];
    let evaluated: Vec<_> = hands
        .iter()
        .map(|hand| {
            let mut all = hand.clone();
            all.extend(&board);
            eval(&all)
        })
        .collect();
    for (seat, (hand, sub)) in hands.iter().zip(&evaluated).enumerate() {
        println!(
            "  player {seat}: {} -> {}",
            poker_codes(hand).join(" "),
            sub[0].rank
        );
    }
    println!("Strongest: {:?}\n", argmax(&evaluated));

    // Example 3: Score red chip claims
    println!("Example 3: Scoring red chip claims");
    let claims: Vec<Option<Chip>> = [2, 3, 1]
        .into_iter()
        .map(|value| Some(Chip::new(value, ChipColor::Red)))
        .collect();
    for policy in [TiePolicy::SameStrength, TiePolicy::SameCategory] {
        let resolution = resolve(&StandardEvaluator, &hands, &board, &claims, policy)
            .expect("standard evaluator accepts dealt cards");
        println!(
            "  {policy:?}: claimed {:?}, actual {:?} -> {}",
            resolution.claimed_order, resolution.true_order, resolution.status
        );
    }
}
