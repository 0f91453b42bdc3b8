//! Per-actor requests and their merge into a single tick input.
//!
//! The queue accepts exactly one `(reset, write, read, value)` tuple per tick.
//! When several actors drive the same tick their requests are folded here:
//! any reset wins, reads collapse into one, and writes must agree on a value.

use syncfifo_core::prelude::TickInput;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Reset,
    Write(u64),
    Read,
}

pub fn merge_requests(tick: u64, requests: &[Request]) -> Result<TickInput<u64>> {
    let mut input = TickInput::idle();
    let mut written: Option<u64> = None;

    for req in requests {
        match *req {
            Request::Reset => input.reset = true,
            Request::Read => input.read = true,
            Request::Write(v) => match written {
                Some(prev) if prev != v => {
                    return Err(Error::Conflict {
                        tick,
                        first: prev,
                        second: v,
                    })
                }
                _ => written = Some(v),
            },
        }
    }

    if let Some(v) = written {
        input.write = true;
        input.value = v;
    }
    Ok(input)
}
