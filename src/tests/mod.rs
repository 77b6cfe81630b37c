
#[cfg(test)]
mod roundtrip {
    use crate::code::CodeMap;
    use crate::decoding::{decompress, decompress_raw};
    use crate::encoding::{compress, compress_raw_with_table, FrameCompressor};
    use crate::frequency::FrequencyTable;
    use crate::round_trip;
    use crate::table::{write_table, DecoderTree};
    use crate::tree::HuffmanTree;
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::{Rng, SeedableRng};

    #[test]
    fn abcdef_with_any_weights() {
        for weights in [
            [5u64, 9, 12, 13, 16, 45],
            [1, 1, 1, 1, 1, 1],
            [100, 1, 100, 1, 100, 1],
            [1, 2, 4, 8, 16, 32],
        ] {
            let table = FrequencyTable::from_pairs(b"abcdef".iter().copied().zip(weights)).unwrap();
            let raw = compress_raw_with_table(b"abcdef", &table).unwrap();
            let (out, _) = decompress_raw(&raw.data, raw.symbol_count, raw.content_size).unwrap();
            assert_eq!(out, b"abcdef");
        }
    }

    #[test]
    fn small_inputs() {
        round_trip(b"a");
        round_trip(b"ab");
        round_trip(b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        round_trip(b"abracadabra");
        round_trip(&[0, 255, 0, 255, 128]);
        round_trip(&(0..=255u8).collect::<Vec<_>>());
    }

    #[test]
    fn single_symbol_frame() {
        let data = vec![b'x'; 1000];
        let frame = FrameCompressor::new().with_checksum(false).compress(&data).unwrap();
        // header + one record, no payload
        assert_eq!(frame.len(), 16 + 9);
        assert_eq!(decompress(&frame).unwrap(), data);
    }

    #[test]
    fn random_inputs() {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(0xDEADBEEF);
        for _ in 0..200 {
            let len = rng.gen_range(1..4096);
            let alphabet = rng.gen_range(1..=256usize);
            let data: Vec<u8> = (0..len)
                .map(|_| {
                    // skew towards low symbols so code lengths vary
                    let a = rng.gen_range(0..alphabet);
                    let b = rng.gen_range(0..alphabet);
                    a.min(b) as u8
                })
                .collect();
            round_trip(&data);
        }
    }

    #[test]
    fn compresses_skewed_text() {
        let mut data = Vec::new();
        for _ in 0..100 {
            data.extend_from_slice(b"the rain in spain stays mainly in the plain. ");
        }
        let frame = compress(&data).unwrap();
        assert!(frame.len() < data.len() / 2 + 200);
        assert_eq!(decompress(&frame).unwrap(), data);
    }

    #[test]
    fn payload_size_matches_weighted_path_length() {
        let data = b"she sells sea shells by the sea shore";
        let table = FrequencyTable::from_bytes(data);
        let tree = HuffmanTree::build(&table).unwrap();
        let codes = CodeMap::assign(&tree).unwrap();
        assert_eq!(codes.encoded_bits(data), tree.weighted_path_length());

        let raw = compress_raw_with_table(data, &table).unwrap();
        let table_size = raw.symbol_count * crate::table::RECORD_SIZE;
        let payload_bits = tree.weighted_path_length().unwrap();
        assert_eq!(
            (raw.data.len() - table_size) as u64,
            payload_bits.div_ceil(8)
        );
    }

    #[test]
    fn rebuilt_tree_induces_same_codes() {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let symbols = rng.gen_range(1..=256usize);
            let table = FrequencyTable::from_pairs(
                (0..symbols).map(|symbol| (symbol as u8, rng.gen_range(0..10_000u64))),
            )
            .unwrap();
            let codes = CodeMap::assign(&HuffmanTree::build(&table).unwrap()).unwrap();

            let mut serialized = Vec::new();
            let count = write_table(&codes, &mut serialized);
            let (tree, _) = DecoderTree::read_table(&serialized, count).unwrap();
            assert_eq!(tree.codes(), codes);

            for (a, code_a) in codes.iter() {
                for (b, code_b) in codes.iter() {
                    assert!(a == b || !code_a.is_prefix_of(&code_b));
                }
            }
        }
    }

    #[test]
    fn identical_input_gives_identical_frames() {
        let data = b"deterministic output for identical input";
        assert_eq!(compress(data).unwrap(), compress(data).unwrap());
    }
}
