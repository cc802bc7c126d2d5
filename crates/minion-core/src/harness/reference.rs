//! Untimed golden model of the minion.

use crate::{validate_request, AddressMap, MemRequest, MemResponse, MinionConfig, Operation};

/// Applies requests one at a time with no pipeline, producing the response
/// stream and memory image the minion must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    config: MinionConfig,
    map: AddressMap,
    words: Vec<u128>,
}

impl Reference {
    /// Zeroed memory with the geometry in `config`.
    #[must_use]
    pub fn new(config: &MinionConfig) -> Self {
        Self {
            config: *config,
            map: AddressMap::new(&config.sram),
            words: vec![0; config.sram.num_entries as usize],
        }
    }

    /// Applies one request; `None` when admission would reject it.
    pub fn apply(&mut self, req: &MemRequest) -> Option<MemResponse> {
        validate_request(req, &self.config.sram, self.config.strict_addressing).ok()?;
        let word = self.words.get_mut(self.map.index_of(req.addr) as usize)?;
        let resp = match req.op {
            Operation::Read => MemResponse::read(req.opaque, *word),
            Operation::Write => {
                *word = req.data;
                MemResponse::write(req.opaque)
            }
        };
        Some(resp.with_len(req.len))
    }

    /// Applies `reqs` in order, collecting every response.
    pub fn run<'a>(&mut self, reqs: impl IntoIterator<Item = &'a MemRequest>) -> Vec<MemResponse> {
        reqs.into_iter().filter_map(|req| self.apply(req)).collect()
    }

    /// Memory image in index order.
    #[must_use]
    pub fn words(&self) -> &[u128] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::Reference;
    use crate::{MemRequest, MemResponse, MinionConfig};

    #[test]
    fn reads_observe_earlier_writes() {
        let mut reference = Reference::new(&MinionConfig::default());
        let resps = reference.run(&[
            MemRequest::write(0, 0x08, 0x0a0b_0c0d),
            MemRequest::read(1, 0x08),
            MemRequest::read(2, 0x0c),
        ]);
        assert_eq!(
            resps,
            vec![
                MemResponse::write(0),
                MemResponse::read(1, 0x0a0b_0c0d),
                MemResponse::read(2, 0),
            ]
        );
        assert_eq!(reference.words()[2], 0x0a0b_0c0d);
    }

    #[test]
    fn rejected_requests_produce_nothing() {
        let mut reference = Reference::new(&MinionConfig::default());
        assert_eq!(reference.apply(&MemRequest::read(0, 0).with_len(4)), None);
        assert_eq!(reference.apply(&MemRequest::write(0, 0, 1 << 40)), None);
        assert!(reference.words().iter().all(|&w| w == 0));
    }
}
