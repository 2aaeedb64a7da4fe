use qkd_protocol::{
    Error, Result, Sponge, sha3_224, sha3_256, sha3_384, sha3_512, shake_128, shake_256,
};

use proptest::prelude::*;

// ----- Reference vectors (NIST FIPS 202 instantiations) -----

const FOX: &[u8] = b"The quick brown fox jumps over the lazy dog";
const FOX_DOT: &[u8] = b"The quick brown fox jumps over the lazy dog.";

#[test]
fn test_empty_input_fixed_digests() {
    assert_eq!(
        hex::encode(sha3_224(b"")),
        "6b4e03423667dbb73b6e15454f0eb1abd4597f9a1b078e3f5b5a6bc7"
    );
    assert_eq!(
        hex::encode(sha3_256(b"")),
        "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
    );
    assert_eq!(
        hex::encode(sha3_384(b"")),
        "0c63a75b845e4f7d01107d852e4c2485c51a50aaaa94fc61995e71bbee983a2ac3713831264adb47fb6bd1e058d5f004"
    );
    assert_eq!(
        hex::encode(sha3_512(b"")),
        "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a615b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26"
    );
}

#[test]
fn test_empty_input_xof() {
    assert_eq!(
        hex::encode(shake_128(b"", 32)),
        "7f9c2ba4e88f827d616045507605853ed73b8093f6efbc88eb1a6eacfa66ef26"
    );
    assert_eq!(
        hex::encode(shake_256(b"", 64)),
        "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f\
         d75dc4ddd8c0f200cb05019d67b592f6fc821c49479ab48640292eacb3b7c4be"
    );
}

#[test]
fn test_ascii_fixed_digests() {
    assert_eq!(
        hex::encode(sha3_224(FOX)),
        "d15dadceaa4d5d7bb3b48f446421d542e08ad8887305e28d58335795"
    );
    assert_eq!(
        hex::encode(sha3_256(FOX)),
        "69070dda01975c8c120c3aada1b282394e7f032fa9cf32f4cb2259a0897dfc04"
    );
    assert_eq!(
        hex::encode(sha3_384(FOX)),
        "7063465e08a93bce31cd89d2e3ca8f602498696e253592ed26f07bf7e703cf328581e1471a7ba7ab119b1a9ebdf8be41"
    );
    assert_eq!(
        hex::encode(sha3_512(FOX)),
        "01dedd5de4ef14642445ba5f5b97c15e47b9ad931326e4b0727cd94cefc44fff23f07bf543139939b49128caf436dc1bdee54fcb24023a08d9403f9b4bf0d450"
    );

    // one trailing byte changes everything
    assert_eq!(
        hex::encode(sha3_224(FOX_DOT)),
        "2d0708903833afabdd232a20201176e8b58c5be8a6fe74265ac54db0"
    );
    assert_eq!(
        hex::encode(sha3_256(FOX_DOT)),
        "a80f839cd4f83f6c3dafc87feae470045e4eb0d366397d5c6ce34ba1739f734d"
    );
    assert_eq!(
        hex::encode(sha3_512(FOX_DOT)),
        "18f4f4bd419603f95538837003d9d254c26c23765565162247483f65c50303597bc9ce4d289f21d1c2f1f458828e33dc442100331b35e7eb031b5d38ba6460f8"
    );
}

#[test]
fn test_ascii_xof() {
    assert_eq!(
        hex::encode(shake_128(FOX, 32)),
        "f4202e3c5852f9182a0430fd8144f0a74b95e7417ecae17db0f8cfeed0e3e66e"
    );
    assert_eq!(
        hex::encode(shake_256(FOX_DOT, 64)),
        "bd225bfc8b255f3036f0c8866010ed0053b5163a3cae111e723c0c8e704eca4e\
         5d0f1e2a2fa18c8a219de6b88d5917ff5dd75b5fb345e7409a3b333b508a65fb"
    );
}

#[test]
fn test_inputs_longer_than_one_rate_block() {
    // 200 bytes crosses every variant's rate boundary at least once
    let input = vec![b'a'; 200];
    assert_eq!(
        hex::encode(sha3_256(&input)),
        "cce34485baf2bf2aca99b94833892a4f52896d3d153f7b840cc4f9fe695f1387"
    );
    assert_eq!(
        hex::encode(sha3_512(&input)),
        "eae6c85c6904f11075de9f9d5e1064371d000510fa3d2d79d40cf9be34892fb01859d0a0234e138bcb0ad5c84f6c0dca226a414b0c9a2897cb695f5185fe36ec"
    );
    assert_eq!(
        hex::encode(shake_128(&input, 32)),
        "70ac9b97e891be583e08929ce4cce50d346b05f9597356d6af94d4643d2af3b6"
    );
}

// ----- Engine behavior -----

#[test]
fn test_custom_geometry_matches_named_variant() -> Result<()> {
    let custom = Sponge::new(1088, 512, 0x06)?.digest(FOX, 32);
    assert_eq!(custom, sha3_256(FOX));
    Ok(())
}

#[test]
fn test_invalid_geometry_is_a_config_error() {
    assert!(matches!(Sponge::new(1088, 511, 0x06), Err(Error::Config(_))));
    assert!(matches!(Sponge::new(1090, 510, 0x06), Err(Error::Config(_))));
}

#[test]
fn test_xof_lengths_are_prefixes() {
    let long = shake_256(FOX, 600);
    for len in [0, 1, 31, 136, 137, 599] {
        assert_eq!(shake_256(FOX, len), long[..len]);
    }
}

#[test]
fn test_domain_separation_between_variants() {
    // same geometry, different padding byte: outputs must differ
    let fixed = sha3_256(FOX).to_vec();
    let xof = shake_256(FOX, 32);
    assert_ne!(fixed, xof);
}

proptest! {
    #[test]
    fn prop_chunked_absorb_matches_one_shot(
        input in prop::collection::vec(any::<u8>(), 0..600),
        split in 0usize..600,
    ) {
        let split = split.min(input.len());
        let one_shot = Sponge::new(1088, 512, 0x06).unwrap().digest(&input, 32);

        let mut sponge = Sponge::new(1088, 512, 0x06).unwrap();
        sponge.absorb(&input[..split]);
        sponge.absorb(&input[split..]);
        prop_assert_eq!(sponge.squeeze(32), one_shot);
    }
}
