#![cfg(feature = "serde")]

use blockdeque::{BlockDeque, BLOCK_SIZE};
use serde_::Deserialize;
use serde_test::{assert_tokens, Token};

#[test]
fn test_serde_empty_deque() {
    let my_deque: BlockDeque<u32> = BlockDeque::default();
    assert_tokens(&my_deque, &[Token::Seq { len: Some(0) }, Token::SeqEnd])
}

#[test]
fn test_serde_non_empty() {
    let mut my_deque: BlockDeque<u32> = BlockDeque::default();
    my_deque.push_back(2);
    my_deque.push_back(3);
    my_deque.push_front(1);
    assert_tokens(
        &my_deque,
        &[
            Token::Seq { len: Some(3) },
            Token::U32(1),
            Token::U32(2),
            Token::U32(3),
            Token::SeqEnd,
        ],
    )
}

#[test]
fn test_serde_across_blocks() {
    let mut my_deque: BlockDeque<u32> = BlockDeque::new();
    for i in 21..=32 {
        my_deque.push_back(i);
    }
    // more than a block's worth at the front runs past the first directory slot
    for i in (1..=20).rev() {
        my_deque.push_front(i);
    }
    assert!(my_deque.block_count() > 2);
    let mut tokens = vec![Token::Seq { len: Some(32) }];
    tokens.extend((1..=32).map(Token::U32));
    tokens.push(Token::SeqEnd);
    assert_tokens(&my_deque, &tokens);
}

#[test]
fn test_vec_to_deque_serde() {
    let plain: Vec<u32> = (0..3 * BLOCK_SIZE as u32).collect();
    let json = serde_json::to_string(&plain).unwrap();
    let deque: BlockDeque<u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        plain, deque,
        "Deserialized BlockDeque is not identical to the original Vec"
    );
}

#[test]
fn test_deque_to_vec_serde() {
    let mut deque: BlockDeque<u32> = BlockDeque::new();
    deque.push_back(1);
    deque.push_back(2);
    deque.push_back(3);
    deque.push_back(4);
    let json = serde_json::to_string(&deque).unwrap();
    let plain: Vec<u32> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        deque, plain,
        "Deserialized Vec is not identical to the original BlockDeque"
    );
}

#[test]
fn test_deserialize_in_place() {
    // shorter input truncates
    let mut deque: BlockDeque<u32> = (0..40).collect();
    let mut de = serde_json::Deserializer::from_str("[7, 8, 9]");
    BlockDeque::deserialize_in_place(&mut de, &mut deque).unwrap();
    assert_eq!(deque, [7, 8, 9]);

    // longer input overwrites, then grows at the back
    let mut de = serde_json::Deserializer::from_str("[1, 2, 3, 4, 5]");
    BlockDeque::deserialize_in_place(&mut de, &mut deque).unwrap();
    assert_eq!(deque, [1, 2, 3, 4, 5]);
}

#[test]
fn test_deserialize_in_place_across_blocks() {
    let mut deque: BlockDeque<u32> = (0..3 * BLOCK_SIZE as u32).collect();
    deque.push_front(99);

    // same length: every element is overwritten, nothing is added
    let same: Vec<u32> = (100..100 + deque.len() as u32).collect();
    let json = serde_json::to_string(&same).unwrap();
    let mut de = serde_json::Deserializer::from_str(&json);
    BlockDeque::deserialize_in_place(&mut de, &mut deque).unwrap();
    assert_eq!(deque, same);

    // shorter, ending inside the second block
    let short: Vec<u32> = (0..BLOCK_SIZE as u32 + 2).collect();
    let json = serde_json::to_string(&short).unwrap();
    let mut de = serde_json::Deserializer::from_str(&json);
    BlockDeque::deserialize_in_place(&mut de, &mut deque).unwrap();
    assert_eq!(deque, short);

    // empty input empties the deque
    let mut de = serde_json::Deserializer::from_str("[]");
    BlockDeque::deserialize_in_place(&mut de, &mut deque).unwrap();
    assert!(deque.is_empty());
}
