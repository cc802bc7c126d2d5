//! Directed and random message streams for the default 32-bit x 128-word
//! geometry.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{MemRequest, MemResponse};

/// Seed used by the stock random scenarios.
pub const DEFAULT_SEED: u64 = 0xa4e2_8cc2;

const WORDS: u8 = 128;

/// A request and the response it must produce.
pub type MsgPair = (MemRequest, MemResponse);

/// Splits pairs into the source and sink streams.
#[must_use]
pub fn split(pairs: &[MsgPair]) -> (Vec<MemRequest>, Vec<MemResponse>) {
    pairs.iter().copied().unzip()
}

fn write_pair(opaque: u8, addr: u32, data: u32) -> MsgPair {
    (
        MemRequest::write(opaque, addr, u128::from(data)),
        MemResponse::write(opaque),
    )
}

fn read_pair(opaque: u8, addr: u32, data: u32) -> MsgPair {
    (
        MemRequest::read(opaque, addr),
        MemResponse::read(opaque, u128::from(data)),
    )
}

/// One write then a read of the same word.
#[must_use]
pub fn basic_single_msgs() -> Vec<MsgPair> {
    vec![
        write_pair(0x0, 0x0000, 0xdead_beef),
        read_pair(0x1, 0x0000, 0xdead_beef),
    ]
}

/// Write/read pairs at the first, a middle and the last word.
#[must_use]
pub fn basic_multiple_msgs() -> Vec<MsgPair> {
    vec![
        write_pair(0x0, 0x0000, 0xcafe_0123),
        read_pair(0x1, 0x0000, 0xcafe_0123),
        write_pair(0x2, 0x0008, 0x0a0b_0c0d),
        read_pair(0x3, 0x0008, 0x0a0b_0c0d),
        write_pair(0x4, 0x01f8, 0x4213_4213),
        read_pair(0x5, 0x01f8, 0x4213_4213),
    ]
}

/// Fills every word with random data, then issues 128 random reads and
/// writes checked against a shadow copy.
#[must_use]
pub fn random_msgs(seed: u64) -> Vec<MsgPair> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut vmem: Vec<u32> = (0..WORDS).map(|_| rng.gen()).collect();
    let mut msgs = Vec::with_capacity(2 * usize::from(WORDS));

    for (opaque, &data) in (0..WORDS).zip(&vmem) {
        msgs.push(write_pair(opaque, 4 * u32::from(opaque), data));
    }

    for opaque in 0..WORDS {
        let idx = rng.gen_range(0..WORDS);
        let addr = 4 * u32::from(idx);
        let word = &mut vmem[usize::from(idx)];
        if rng.gen_bool(0.5) {
            msgs.push(read_pair(opaque, addr, *word));
        } else {
            let data = rng.gen();
            *word = data;
            msgs.push(write_pair(opaque, addr, data));
        }
    }

    msgs
}

/// Writes `value` everywhere, then 150 random accesses that all carry or
/// return `value`.
#[must_use]
pub fn all_n_msgs(value: u32, seed: u64) -> Vec<MsgPair> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut msgs: Vec<MsgPair> = (0..WORDS)
        .map(|opaque| write_pair(opaque, 4 * u32::from(opaque), value))
        .collect();

    for opaque in 0..150_u8 {
        let addr = 4 * rng.gen_range(0..u32::from(WORDS));
        msgs.push(if rng.gen_bool(0.5) {
            read_pair(opaque, addr, value)
        } else {
            write_pair(opaque, addr, value)
        });
    }

    msgs
}

#[cfg(test)]
mod tests {
    use super::{all_n_msgs, basic_multiple_msgs, random_msgs, split, DEFAULT_SEED};
    use crate::{MinionConfig, Reference};

    #[test]
    fn random_stream_agrees_with_the_reference_model() {
        let pairs = random_msgs(DEFAULT_SEED);
        assert_eq!(pairs.len(), 256);
        let (reqs, resps) = split(&pairs);
        let mut reference = Reference::new(&MinionConfig::default());
        assert_eq!(reference.run(&reqs), resps);
    }

    #[test]
    fn random_stream_is_seed_deterministic() {
        assert_eq!(random_msgs(7), random_msgs(7));
        assert_ne!(random_msgs(7), random_msgs(8));
    }

    #[test]
    fn all_n_reads_return_the_constant() {
        let pairs = all_n_msgs(0xffff_ffff, DEFAULT_SEED);
        assert_eq!(pairs.len(), 278);
        assert!(pairs
            .iter()
            .all(|(_, resp)| resp.data == 0 || resp.data == 0xffff_ffff));
        let (reqs, resps) = split(&pairs);
        assert_eq!(Reference::new(&MinionConfig::default()).run(&reqs), resps);
    }

    #[test]
    fn directed_stream_touches_the_last_word() {
        let (reqs, _) = split(&basic_multiple_msgs());
        assert!(reqs.iter().any(|req| req.addr == 0x01f8));
    }
}
