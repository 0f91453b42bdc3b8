//! Merging multi-actor requests into one tick input

use syncfifo_sim::error::Error;
use syncfifo_sim::{merge_requests, Request};

#[test]
fn test_merge_empty_is_idle() {
    let input = merge_requests(1, &[]).unwrap();
    assert!(!input.reset && !input.write && !input.read);
}

#[test]
fn test_merge_write_and_read() {
    let input = merge_requests(1, &[Request::Read, Request::Write(9)]).unwrap();
    assert!(input.write);
    assert!(input.read);
    assert_eq!(input.value, 9);
}

#[test]
fn test_merge_reset_wins() {
    let input = merge_requests(1, &[Request::Write(1), Request::Reset, Request::Read]).unwrap();
    assert!(input.reset);
}

#[test]
fn test_merge_duplicate_reads_and_equal_writes() {
    let input = merge_requests(
        4,
        &[Request::Read, Request::Read, Request::Write(5), Request::Write(5)],
    )
    .unwrap();
    assert!(input.read);
    assert!(input.write);
    assert_eq!(input.value, 5);
}

#[test]
fn test_merge_conflicting_writes() {
    let err = merge_requests(7, &[Request::Write(1), Request::Write(2)]).unwrap_err();
    match err {
        Error::Conflict { tick, first, second } => {
            assert_eq!(tick, 7);
            assert_eq!(first, 1);
            assert_eq!(second, 2);
        }
        other => panic!("Expected Conflict, got {:?}", other),
    }
}
