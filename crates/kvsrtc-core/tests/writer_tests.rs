//! Bounded writer tests

use kvsrtc_core::{BoundedWriter, CapacityError, Reserve};

#[test]
fn test_incremental_writes() {
    let mut buf = [0u8; 64];
    let mut w = BoundedWriter::new(&mut buf);

    w.put_str("v=0\r\n").unwrap();
    w.put_fmt(format_args!("o=- {} {} IN IP4 {}\r\n", 1, 2, "127.0.0.1"))
        .unwrap();

    assert_eq!(w.as_str(), "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\n");
    assert_eq!(w.len(), 31);
    assert_eq!(w.remaining(), 64 - 31);
}

#[test]
fn test_reserve_modes_differ_by_one() {
    let text = "{\n\t\"ChannelName\": \"x\"\n}";

    for (reserve, capacity, fits) in [
        (Reserve::None, text.len(), true),
        (Reserve::None, text.len() - 1, false),
        (Reserve::Terminator, text.len(), false),
        (Reserve::Terminator, text.len() + 1, true),
    ] {
        let mut buf = vec![0u8; capacity];
        let mut w = BoundedWriter::with_reserve(&mut buf, reserve);
        assert_eq!(w.put_str(text).is_ok(), fits, "{:?} @ {}", reserve, capacity);
    }
}

#[test]
fn test_error_reports_sizes() {
    let mut buf = [0u8; 10];
    let mut w = BoundedWriter::with_terminator(&mut buf);
    w.put_str("12345").unwrap();

    assert_eq!(
        w.put_str("67890"),
        Err(CapacityError {
            needed: 11,
            capacity: 10
        })
    );
}

#[test]
fn test_failed_write_keeps_earlier_length() {
    let mut buf = [0u8; 8];
    let mut w = BoundedWriter::new(&mut buf);
    w.put_str("abc").unwrap();
    assert!(w.put_str("defghi").is_err());
    assert_eq!(w.len(), 3);
}

#[test]
fn test_empty_buffer() {
    let mut buf = [0u8; 0];
    let mut w = BoundedWriter::new(&mut buf);
    w.put_str("").unwrap();
    assert!(w.is_empty());
    assert!(w.put_str("x").is_err());

    let mut w = BoundedWriter::with_terminator(&mut buf);
    assert_eq!(
        w.put_str(""),
        Err(CapacityError {
            needed: 1,
            capacity: 0
        })
    );
}
