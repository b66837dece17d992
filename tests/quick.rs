#![cfg(not(miri))]

#[macro_use]
extern crate quickcheck;

use blockdeque::{BlockDeque, Error, BLOCK_SIZE};

use quickcheck::Arbitrary;
use quickcheck::Gen;

use std::cmp::min;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Deref;

fn set<'a, T, I>(iter: I) -> HashSet<T>
where
    I: IntoIterator<Item = &'a T>,
    T: Copy + Hash + Eq + 'a,
{
    iter.into_iter().cloned().collect()
}

quickcheck! {
    fn iter(push: Vec<u32>) -> bool {
        let mut vs = BlockDeque::new();
        for &v in &push {
            vs.push_back(v);
        }
        push.iter().eq(vs.iter())
    }

    fn iter_front(push: Vec<u32>) -> bool {
        let mut vs = BlockDeque::new();
        for &v in &push {
            vs.push_front(v);
        }
        push.iter().rev().eq(vs.iter())
    }

    fn front_back(push: Vec<u32>) -> bool {
        let mut vs1 = BlockDeque::new();
        let mut vs2 = VecDeque::new();
        for &v in &push {
            vs1.push_back(v);
            vs2.push_back(v);
        }
        assert_eq!(vs1.front(), vs2.front());
        assert_eq!(vs1.front_mut(), vs2.front_mut());
        assert_eq!(vs1.back(), vs2.back());
        assert_eq!(vs1.back_mut(), vs2.back_mut());
        true
    }

    fn contains(push: Vec<u32>) -> bool {
        let mut vs = BlockDeque::new();
        for &v in &push {
            vs.push_back(v);
        }
        push.iter().all(|&v| vs.contains(&v))
    }

    fn push_remove(push: Vec<u8>, remove: Vec<u8>) -> bool {
        let mut vs = BlockDeque::new();
        for &v in &push {
            vs.push_back(v);
        }
        for &rm in &remove {
            while let Some(i) = vs.iter().position(|&v| v == rm) {
                vs.remove(i);
            }
        }
        let elements = &set(&push) - &set(&remove);
        elements.iter().all(|v| vs.contains(v)) && vs.iter().all(|v| elements.contains(v))
    }

    fn push_retain(push: Vec<u8>, retain: Vec<u8>) -> bool {
        let mut vs = BlockDeque::new();
        for &v in &push {
            vs.push_back(v);
        }
        vs.retain(|v| retain.contains(v));
        let push = set(&push);
        let retain = set(&retain);
        let elements: Vec<_> = push.intersection(&retain).collect();
        elements.iter().all(|v| vs.contains(v)) && vs.iter().all(|v| elements.contains(&v))
    }

    fn reserve(existing: u8, wish: u16) -> bool {
        let mut vs: BlockDeque<u8> = (0..existing).collect();
        vs.reserve(wish as usize);
        let blocks = vs.block_count();
        for _ in 0..wish {
            vs.push_back(0);
        }
        vs.block_count() == blocks
    }

    fn cursor_distance(push: Vec<u16>, front: u8) -> bool {
        let mut vs = BlockDeque::new();
        for &v in &push {
            vs.push_back(v);
        }
        for i in 0..front as u16 {
            vs.push_front(i);
        }
        let len = vs.len() as isize;
        assert_eq!(vs.end() - vs.begin(), len);
        assert_eq!(vs.rend() - vs.rbegin(), len);
        for i in 0..vs.len() {
            let at = vs.begin() + i as isize;
            assert_eq!(at.index(), i as isize);
            assert_eq!(at.get(), vs.get(i));
            assert_eq!(at - vs.begin(), i as isize);
            assert_eq!((vs.end() - (len - i as isize)), at);
            assert_eq!((vs.rbegin() + i as isize).get(), vs.get(vs.len() - 1 - i));
        }
        true
    }
}

use Op::*;
#[derive(Copy, Clone, Debug)]
enum Op<T> {
    PushBack(T),
    PushFront(T),
    Insert(u16, T),
    PopBack,
    PopFront,
    CheckEnds,
    Remove(u16),
    Swap(u16, u16),
    Truncate(u8),
    Reserve(u8),
    At(u16),
    Erase(u16),
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        match u32::arbitrary(g) % 14 {
            0 | 1 => PushBack(T::arbitrary(g)),
            2 | 3 => PushFront(T::arbitrary(g)),
            4 => PopBack,
            5 => PopFront,
            6 => Remove(u16::arbitrary(g)),
            7 => Insert(u16::arbitrary(g), T::arbitrary(g)),
            8 => Truncate(u8::arbitrary(g)),
            9 => Reserve(u8::arbitrary(g)),
            10 => CheckEnds,
            11 => Swap(u16::arbitrary(g), u16::arbitrary(g)),
            12 => At(u16::arbitrary(g)),
            13 => Erase(u16::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}

fn do_ops<T>(ops: &[Op<T>], a: &mut BlockDeque<T>, b: &mut VecDeque<T>)
where
    T: Eq + Clone + std::fmt::Debug,
{
    for op in ops {
        match *op {
            PushBack(ref v) => {
                a.push_back(v.clone());
                b.push_back(v.clone());
            }
            PushFront(ref v) => {
                a.push_front(v.clone());
                b.push_front(v.clone());
            }
            Insert(i, ref v) => {
                let ln = a.len();
                let i = if ln == 0 { 0 } else { i as usize % (ln + 1) };
                a.insert(i, v.clone());
                b.insert(i, v.clone());
            }
            PopBack => {
                assert_eq!(a.pop_back(), b.pop_back());
            }
            PopFront => {
                assert_eq!(a.pop_front(), b.pop_front());
            }
            Remove(i) => {
                let ln = a.len();
                if ln != 0 {
                    assert_eq!(a.remove(i as usize % ln), b.remove(i as usize % ln));
                }
            }
            Swap(i, j) => {
                let ln = a.len();
                if ln != 0 {
                    a.swap(i as usize % ln, j as usize % ln);
                    b.swap(i as usize % ln, j as usize % ln);
                }
            }
            Truncate(n) => {
                a.truncate(n as usize);
                b.truncate(n as usize);
            }
            Reserve(n) => {
                a.reserve(n as usize);
                b.reserve(n as usize);
            }
            CheckEnds => {
                assert_eq!(a.front(), b.front());
                assert_eq!(a.front_mut(), b.front_mut());
                assert_eq!(a.back(), b.back());
                assert_eq!(a.back_mut(), b.back_mut());
            }
            At(i) => {
                let i = i as usize;
                match b.get(i) {
                    Some(v) => assert_eq!(a.at(i), Ok(v)),
                    None => assert_eq!(
                        a.at(i),
                        Err(Error::OutOfRange {
                            index: i,
                            len: b.len()
                        })
                    ),
                }
            }
            Erase(i) => {
                let i = i as usize % (a.len() + 1);
                let at = a.position(i);
                assert_eq!(a.erase(at), Ok(b.remove(i)));
            }
        }
        // live blocks, plus one partially used block at each end
        assert!(
            a.allocated_blocks() <= a.len() / BLOCK_SIZE + 2,
            "{} blocks held for {} elements",
            a.allocated_blocks(),
            a.len()
        );
    }
}

fn assert_equivalent<T>(a: &BlockDeque<T>, b: &VecDeque<T>) -> bool
where
    T: Eq + Debug,
{
    assert_eq!(a.len(), b.len());
    assert_eq!(a.iter().next().is_some(), b.iter().next().is_some());
    for v in a.iter() {
        assert!(b.contains(v), "b does not contain {:?}", v);
    }
    for v in b.iter() {
        assert!(a.contains(v), "a does not contain {:?}", v);
    }
    for (av, bv) in a.iter().zip(b.iter()) {
        assert_eq!(av, bv, "a and b order differs");
    }
    for (av, bv) in a.iter().rev().zip(b.iter().rev()) {
        assert_eq!(av, bv, "a and b reverse iterator order differs");
    }
    for (i, bv) in b.iter().enumerate() {
        assert_eq!(&a[i], bv, "a and b differ at index {}", i);
    }
    true
}

quickcheck! {
    fn operations_i8(ops: Large<Vec<Op<i8>>>) -> bool {
        let mut vs = BlockDeque::new();
        let mut reference = VecDeque::new();
        do_ops(&ops, &mut vs, &mut reference);
        assert_equivalent(&vs, &reference)
    }

    fn operations_string(ops: Vec<Op<Alpha>>) -> bool {
        let mut vs = BlockDeque::new();
        let mut reference = VecDeque::new();
        do_ops(&ops, &mut vs, &mut reference);
        assert_equivalent(&vs, &reference)
    }

    fn operations_clone(ops: Large<Vec<Op<Alpha>>>) -> bool {
        let mut vs = BlockDeque::new();
        let mut reference = VecDeque::new();
        do_ops(&ops, &mut vs, &mut reference);
        let copy = vs.clone();
        drop(vs);
        assert_equivalent(&copy, &reference)
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
struct Alpha(String);

impl Deref for Alpha {
    type Target = String;
    fn deref(&self) -> &String {
        &self.0
    }
}

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

impl Arbitrary for Alpha {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = u32::arbitrary(g) % g.size() as u32;
        let len = min(len, 16);
        Alpha(
            (0..len)
                .map(|_| ALPHABET[u32::arbitrary(g) as usize % ALPHABET.len()] as char)
                .collect(),
        )
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((**self).shrink().map(Alpha))
    }
}

/// quickcheck Arbitrary adaptor -- make a larger vec
#[derive(Clone, Debug)]
struct Large<T>(T);

impl<T> Deref for Large<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Arbitrary for Large<Vec<T>>
where
    T: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        let len = u32::arbitrary(g) % (g.size() * 10) as u32;
        Large((0..len).map(|_| T::arbitrary(g)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((**self).shrink().map(Large))
    }
}
