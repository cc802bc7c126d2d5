#![no_main]

use libfuzzer_sys::fuzz_target;
use minion_core::{
    validate_request, Minion, MinionConfig, MsgFormat, Reference, StepInputs,
    BYPASS_QUEUE_CAPACITY,
};

fuzz_target!(|data: &[u8]| {
    let Ok(format) = MsgFormat::new(32) else {
        return;
    };
    let config = MinionConfig::default();
    let Ok(mut minion) = Minion::new(config) else {
        return;
    };
    let mut reference = Reference::new(&config);
    let mut expected = Vec::new();
    let mut delivered = Vec::new();

    // Each 11-byte chunk: packed request bits, then a valid/ready control byte.
    for chunk in data.chunks_exact(11) {
        let mut bits = [0_u8; 16];
        bits[..10].copy_from_slice(&chunk[..10]);
        let packed = u128::from_le_bytes(bits) & ((1 << format.request_bits()) - 1);
        let control = chunk[10];

        let request = match format.decode_request(packed) {
            Ok(req) if control & 1 == 1 => {
                if let Ok(repacked) = format.encode_request(&req) {
                    assert_eq!(format.decode_request(repacked), Ok(req));
                }
                Some(req)
            }
            _ => None,
        };

        let out = minion
            .tick(&StepInputs::new(request, control & 2 == 2))
            .expect("admission rule prevents overflow");
        assert!(minion.occupancy() <= BYPASS_QUEUE_CAPACITY);

        if let (Some(req), true) = (request, out.admission.transferred()) {
            assert_eq!(
                out.admission.is_accepted(),
                validate_request(&req, &config.sram, config.strict_addressing).is_ok()
            );
            expected.extend(reference.apply(&req));
        }
        delivered.extend(out.delivered());
    }

    while !minion.is_idle() {
        let out = minion.tick(&StepInputs::new(None, true)).expect("drain");
        delivered.extend(out.delivered());
    }

    assert_eq!(delivered, expected);
    assert_eq!(minion.sram().words(), reference.words());
});
