// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::panic::{catch_unwind, AssertUnwindSafe};

use packlink_wire::{checksum, command, Reply};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn fuzz_reply_parse_never_panics() {
    let iterations = std::env::var("PACKLINK_FUZZ_ITERS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(2048);
    let mut rng = StdRng::seed_from_u64(0x18B0_17ED);

    for _ in 0..iterations {
        let mut frame = random_reply(&mut rng);
        mutate_frame(&mut rng, &mut frame);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _ = Reply::parse(&frame);
            let _ = Reply::verify_checksum(&frame);
        }));
        assert!(result.is_ok(), "reply parser panicked on mutated frame");
    }
}

#[test]
fn fuzz_command_checksum_holds() {
    let mut rng = StdRng::seed_from_u64(0xC0DE_CAFE);
    for _ in 0..512 {
        let arg_len = rng.gen_range(0..59);
        let mut args = vec![0u8; arg_len];
        rng.fill(&mut args[..]);
        let frame = command(rng.gen(), rng.gen(), rng.gen(), &args);
        let (body, tail) = frame.split_at(frame.len() - 2);
        assert_eq!(checksum(body).to_be_bytes(), [tail[0], tail[1]]);
    }
}

fn random_reply<R: Rng>(rng: &mut R) -> Vec<u8> {
    let payload_len = rng.gen_range(0..32usize);
    let mut frame = vec![0x81, 0x04, payload_len as u8];
    for _ in 0..payload_len {
        frame.push(rng.gen());
    }
    let sum = checksum(&frame);
    frame.extend_from_slice(&sum.to_be_bytes());
    frame
}

fn mutate_frame<R: Rng>(rng: &mut R, frame: &mut Vec<u8>) {
    match rng.gen_range(0..4) {
        0 => {
            // Corrupt the status discriminator.
            frame[0] = rng.gen();
        }
        1 => {
            // Lie about the payload length.
            frame[2] = rng.gen();
        }
        2 => {
            let keep = rng.gen_range(0..=frame.len());
            frame.truncate(keep);
        }
        _ => {
            let tail_len = rng.gen_range(1..16);
            for _ in 0..tail_len {
                frame.push(rng.gen());
            }
        }
    }
}
