#![cfg(feature = "rayon")]

#[macro_use]
extern crate lazy_static;

use blockdeque::{BlockDeque, BLOCK_SIZE};
use rayon_::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator,
    IntoParallelRefMutIterator, ParallelExtend, ParallelIterator,
};

macro_rules! assert_eq3 {
    ($e1:expr, $e2:expr, $e3:expr) => {{
        assert_eq!($e1, $e2);
        assert_eq!($e1, $e3);
        assert_eq!($e2, $e3);
    }};
}

lazy_static! {
    static ref DEQUE_EMPTY: BlockDeque<u32> = BlockDeque::new();
    static ref DEQUE: BlockDeque<u32> = {
        let mut deque = BlockDeque::new();
        deque.push_back(30);
        deque.push_back(50);
        deque.push_back(60);
        deque.push_back(40);
        deque.push_front(10);
        deque.push_front(20);
        deque
    };
    // spans several blocks and needs a re-centered directory
    static ref DEQUE_LARGE: BlockDeque<u32> = {
        let mut deque = BlockDeque::new();
        for i in 0..(3 * BLOCK_SIZE as u32) {
            deque.push_back(i);
        }
        for i in 1..=(BLOCK_SIZE as u32 + 5) {
            deque.push_front(1000 + i);
        }
        deque
    };
}

#[test]
fn deque_seq_par_equivalence_iter_empty() {
    let vec_seq = DEQUE_EMPTY.iter().collect::<Vec<_>>();
    let vec_par = DEQUE_EMPTY.par_iter().collect::<Vec<_>>();

    assert_eq3!(vec_seq, vec_par, &[] as &[&u32]);
}

#[test]
fn deque_seq_par_equivalence_iter() {
    let mut vec_seq = DEQUE.iter().collect::<Vec<_>>();
    let mut vec_par = DEQUE.par_iter().collect::<Vec<_>>();

    assert_eq!(vec_seq, vec_par);

    let expected_sorted = [&10, &20, &30, &40, &50, &60];

    vec_seq.sort_unstable();
    vec_par.sort_unstable();

    assert_eq3!(vec_seq, vec_par, expected_sorted);
}

#[test]
fn deque_seq_par_equivalence_iter_large() {
    let vec_seq = DEQUE_LARGE.iter().collect::<Vec<_>>();
    let vec_par = DEQUE_LARGE.par_iter().with_min_len(1).collect::<Vec<_>>();
    assert_eq!(vec_seq, vec_par);

    let sum_seq: u32 = DEQUE_LARGE.iter().sum();
    let sum_par: u32 = DEQUE_LARGE.par_iter().sum();
    assert_eq!(sum_seq, sum_par);

    let rev_seq = DEQUE_LARGE.iter().rev().collect::<Vec<_>>();
    let rev_par = DEQUE_LARGE.par_iter().rev().collect::<Vec<_>>();
    assert_eq!(rev_seq, rev_par);
}

#[test]
fn deque_seq_par_equivalence_iter_mut_empty() {
    let mut deque1 = DEQUE_EMPTY.clone();
    let mut deque2 = DEQUE_EMPTY.clone();

    let vec_seq = deque1.iter_mut().collect::<Vec<_>>();
    let vec_par = deque2.par_iter_mut().collect::<Vec<_>>();

    assert_eq3!(vec_seq, vec_par, &[] as &[&u32]);
}

#[test]
fn deque_seq_par_equivalence_iter_mut() {
    let mut deque1 = DEQUE.clone();
    let mut deque2 = DEQUE.clone();

    let mut vec_seq = deque1.iter_mut().collect::<Vec<_>>();
    let mut vec_par = deque2.par_iter_mut().collect::<Vec<_>>();

    assert_eq!(vec_seq, vec_par);

    let expected_sorted = [&mut 10, &mut 20, &mut 30, &mut 40, &mut 50, &mut 60];

    vec_seq.sort_unstable();
    vec_par.sort_unstable();

    assert_eq3!(vec_seq, vec_par, expected_sorted);
}

#[test]
fn deque_par_iter_mut_writes_through() {
    let mut deque = DEQUE_LARGE.clone();
    deque.par_iter_mut().for_each(|v| *v *= 2);
    assert!(deque.iter().zip(DEQUE_LARGE.iter()).all(|(a, b)| *a == 2 * b));
}

#[test]
fn deque_seq_par_equivalence_into_iter_empty() {
    let vec_seq = DEQUE_EMPTY.clone().into_iter().collect::<Vec<_>>();
    let vec_par = DEQUE_EMPTY.clone().into_par_iter().collect::<Vec<_>>();

    assert_eq3!(vec_seq, vec_par, []);
}

#[test]
fn deque_seq_par_equivalence_into_iter() {
    let mut vec_seq = DEQUE.clone().into_iter().collect::<Vec<_>>();
    let mut vec_par = DEQUE.clone().into_par_iter().collect::<Vec<_>>();

    assert_eq!(vec_seq, vec_par);

    let expected_sorted = [10, 20, 30, 40, 50, 60];

    vec_seq.sort_unstable();
    vec_par.sort_unstable();

    assert_eq3!(vec_seq, vec_par, expected_sorted);
}

lazy_static! {
    static ref DEQUE_VEC_EMPTY: Vec<u32> = vec![];
    static ref DEQUE_VEC: Vec<u32> = vec![20, 10, 30, 50, 60, 40,];
}

#[test]
fn deque_seq_par_equivalence_collect_empty() {
    let deque_expected = DEQUE_EMPTY.clone();
    let deque_seq = DEQUE_VEC_EMPTY.clone().into_iter().collect::<BlockDeque<_>>();
    let deque_par = DEQUE_VEC_EMPTY
        .clone()
        .into_par_iter()
        .collect::<BlockDeque<_>>();

    assert_eq!(deque_seq, deque_par);
    assert_eq!(deque_seq, deque_expected);
    assert_eq!(deque_par, deque_expected);
}

#[test]
fn deque_seq_par_equivalence_collect() {
    let deque_expected = DEQUE.clone();
    let deque_seq = DEQUE_VEC.clone().into_iter().collect::<BlockDeque<_>>();
    let deque_par = DEQUE_VEC.clone().into_par_iter().collect::<BlockDeque<_>>();

    assert_eq!(deque_seq, deque_par);
    assert_eq!(deque_seq, deque_expected);
    assert_eq!(deque_par, deque_expected);
}

lazy_static! {
    static ref DEQUE_EXISTING_EMPTY: BlockDeque<u32> = BlockDeque::new();
    static ref DEQUE_EXISTING: BlockDeque<u32> = {
        let mut deque = BlockDeque::new();
        deque.push_back(10);
        deque.push_front(20);
        deque
    };
    static ref DEQUE_EXTENSION_EMPTY: Vec<u32> = vec![];
    static ref DEQUE_EXTENSION: Vec<u32> = vec![30, 50, 60, 40];
}

#[test]
fn deque_seq_par_equivalence_existing_empty_extend_empty() {
    let expected = BlockDeque::new();
    let mut deque_seq = DEQUE_EXISTING_EMPTY.clone();
    let mut deque_par = DEQUE_EXISTING_EMPTY.clone();

    deque_seq.extend(DEQUE_EXTENSION_EMPTY.iter().cloned());
    deque_par.par_extend(DEQUE_EXTENSION_EMPTY.par_iter().cloned());

    assert_eq3!(deque_seq, deque_par, expected);
}

#[test]
fn deque_seq_par_equivalence_existing_empty_extend() {
    let expected = DEQUE_EXTENSION.iter().cloned().collect::<BlockDeque<_>>();
    let mut deque_seq = DEQUE_EXISTING_EMPTY.clone();
    let mut deque_par = DEQUE_EXISTING_EMPTY.clone();

    deque_seq.extend(DEQUE_EXTENSION.iter().cloned());
    deque_par.par_extend(DEQUE_EXTENSION.par_iter().cloned());

    assert_eq3!(deque_seq, deque_par, expected);
}

#[test]
fn deque_seq_par_equivalence_existing_extend_empty() {
    let expected = DEQUE_EXISTING.clone();
    let mut deque_seq = DEQUE_EXISTING.clone();
    let mut deque_par = DEQUE_EXISTING.clone();

    deque_seq.extend(DEQUE_EXTENSION_EMPTY.iter().cloned());
    deque_par.par_extend(DEQUE_EXTENSION_EMPTY.par_iter().cloned());

    assert_eq3!(deque_seq, deque_par, expected);
}

#[test]
fn deque_seq_par_equivalence_existing_extend() {
    let expected = DEQUE.clone();
    let mut deque_seq = DEQUE_EXISTING.clone();
    let mut deque_par = DEQUE_EXISTING.clone();

    deque_seq.extend(DEQUE_EXTENSION.iter().cloned());
    deque_par.par_extend(DEQUE_EXTENSION.par_iter().copied());

    assert_eq3!(deque_seq, deque_par, expected);
}
