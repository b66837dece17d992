use core::fmt;
use core::marker::PhantomData;

use serde_::de::{self, Deserialize, DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde_::ser::{Serialize, SerializeSeq, Serializer};

use crate::{BlockDeque, BLOCK_SIZE};

/// Upper bound on how much directory room a length hint may reserve up front. Hints come from
/// the input and are not trusted beyond this.
const MAX_PREALLOC: usize = 256 * BLOCK_SIZE;

/// Serialized as a plain sequence, front to back. Nothing of the block layout is kept.
impl<T> Serialize for BlockDeque<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

/// Reserves back room for the elements `seq` announces beyond the `present` ones.
fn reserve_for<'de, A, T>(
    deque: &mut BlockDeque<T>,
    seq: &A,
    present: usize,
) -> Result<(), A::Error>
where
    A: SeqAccess<'de>,
{
    let wanted = seq.size_hint().map_or(0, |n| n.min(MAX_PREALLOC));
    match wanted.checked_sub(present) {
        Some(additional) if additional > 0 => {
            deque.try_reserve(additional).map_err(de::Error::custom)
        }
        _ => Ok(()),
    }
}

/// Pushes whatever is left of `seq` onto the back of `deque`.
fn push_remaining<'de, A, T>(deque: &mut BlockDeque<T>, mut seq: A) -> Result<(), A::Error>
where
    A: SeqAccess<'de>,
    T: Deserialize<'de>,
{
    while let Some(value) = seq.next_element()? {
        deque.try_push_back(value).map_err(de::Error::custom)?;
    }
    Ok(())
}

/// Deserializes the next element over an existing one.
struct Overwrite<'a, T>(&'a mut T);

impl<'de, T> DeserializeSeed<'de> for Overwrite<'_, T>
where
    T: Deserialize<'de>,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize_in_place(deserializer, self.0)
    }
}

struct DequeVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for DequeVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = BlockDeque<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut deque = BlockDeque::new();
        reserve_for(&mut deque, &seq, 0)?;
        push_remaining(&mut deque, seq)?;
        Ok(deque)
    }
}

struct InPlaceVisitor<'a, T>(&'a mut BlockDeque<T>);

impl<'de, T> Visitor<'de> for InPlaceVisitor<'_, T>
where
    T: Deserialize<'de>,
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let deque = self.0;
        let present = deque.len();

        // Overwrite the existing elements block by block first.
        let mut overwritten = 0;
        for place in deque.iter_mut() {
            if seq.next_element_seed(Overwrite(place))?.is_none() {
                break;
            }
            overwritten += 1;
        }
        if overwritten < present {
            deque.truncate(overwritten);
            return Ok(());
        }

        reserve_for(deque, &seq, present)?;
        push_remaining(deque, seq)
    }
}

impl<'de, T> Deserialize<'de> for BlockDeque<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(DequeVisitor {
            marker: PhantomData,
        })
    }

    fn deserialize_in_place<D>(deserializer: D, place: &mut Self) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(InPlaceVisitor(place))
    }
}
