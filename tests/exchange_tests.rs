use trace_replay::exchange::{decode_address, encode_address, OutputExchange, Published};

#[test]
fn test_address_round_trip_boundaries() {
    for addr in [0u64, 1, 0x7fff_ffff, 0xffff_ffff, 0x1_0000_0000, u64::MAX] {
        let (hi, lo) = encode_address(addr);
        assert_eq!(decode_address(hi, lo), addr, "address {addr:#x}");
    }
}

#[test]
fn test_published_triple_matches_payload() {
    let mut ex = OutputExchange::new();
    let p = ex.publish(b"payload bytes");
    assert_eq!(p.len, 13);
    assert_eq!(ex.retained(), b"payload bytes");

    let addr = decode_address(p.base_hi, p.base_lo);
    assert_eq!(addr, ex.retained().as_ptr() as u64);
}

#[test]
fn test_previous_publication_survives_one_more_publish() {
    let mut ex = OutputExchange::new();

    let p1 = ex.publish(b"first frame");
    let addr1 = decode_address(p1.base_hi, p1.base_lo);

    let p2 = ex.publish(b"second frame");
    let addr2 = decode_address(p2.base_hi, p2.base_lo);
    assert_ne!(addr1, addr2);

    // The host is still allowed to read publication 1 through its exported
    // address until the next publish reuses that physical buffer.
    let bytes = unsafe { std::slice::from_raw_parts(addr1 as *const u8, p1.len as usize) };
    assert_eq!(bytes, b"first frame");
}

#[test]
fn test_empty_payload_publishes_zero_length() {
    let mut ex = OutputExchange::new();
    let p = ex.publish(b"");
    assert_eq!(p.len, 0);
    assert_eq!(ex.retained(), b"");
}

#[test]
fn test_clear_resets_published_state() {
    let mut ex = OutputExchange::new();
    ex.publish(b"data");
    ex.clear();
    assert_eq!(ex.published(), Published::default());
}
