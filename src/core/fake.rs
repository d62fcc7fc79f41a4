//! Recording command runner for unit tests.

use crate::core::context::{Prompt, Sleeper};
use crate::core::runner::{Captured, CommandRunner, Invocation};
use anyhow::Result;
use std::cell::RefCell;
use std::io;
use std::time::Duration;

type Handler = Box<dyn Fn(&Invocation) -> Captured>;

pub struct FakeRunner {
    handler: Handler,
    calls: RefCell<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn new(handler: impl Fn(&Invocation) -> Captured + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(|_| Self::ok(""))
    }

    pub fn ok(stdout: &str) -> Captured {
        Self::ok_bytes(stdout.as_bytes().to_vec())
    }

    pub fn ok_bytes(stdout: Vec<u8>) -> Captured {
        Captured {
            code: Some(0),
            stdout,
            stderr: Vec::new(),
        }
    }

    pub fn failed(code: i32) -> Captured {
        Captured {
            code: Some(code),
            stdout: Vec::new(),
            stderr: b"simulated failure".to_vec(),
        }
    }

    /// Rendered command lines, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn execute(&self, invocation: &Invocation) -> io::Result<Captured> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok((self.handler)(invocation))
    }
}

/// A DER `ECPrivateKey` laid out the way `openssl ecparam -outform DER` emits it.
pub fn k256_der(fill: u8) -> Vec<u8> {
    let mut der = vec![0x30, 0x74, 0x02, 0x01, 0x01, 0x04, 0x20];
    der.extend_from_slice(&[fill; 32]);
    der.extend_from_slice(&[0xa0, 0x07, 0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a]);
    der.extend_from_slice(&[0xa1, 0x44, 0x03, 0x42, 0x00, 0x04]);
    der.extend_from_slice(&[0x22; 64]);
    der
}

pub struct FixedPrompt(pub &'static str);

impl Prompt for FixedPrompt {
    fn ask(&self, _question: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: RefCell<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
