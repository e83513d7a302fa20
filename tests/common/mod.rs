#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use adsapi_http::{Credentials, Request, Result, Signer, TraceLogger};

pub fn credentials() -> Credentials {
    Credentials::new("consumer-key", "consumer-secret", "token", "token-secret")
}

/// Signer that stamps a deterministic authorization header and counts calls.
#[derive(Clone, Default)]
pub struct CountingSigner {
    pub calls: Arc<AtomicUsize>,
}

impl CountingSigner {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Signer for CountingSigner {
    fn sign(&self, mut request: Request, credentials: &Credentials, domain: &str) -> Result<Request> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        request.set_header(
            "Authorization",
            format!(
                "OAuth oauth_consumer_key=\"{}\", oauth_token=\"{}\", realm=\"{domain}\", n=\"{call}\"",
                credentials.consumer_key, credentials.access_token
            ),
        );
        Ok(request)
    }
}

/// Logger that keeps every line for later assertions.
#[derive(Clone, Default)]
pub struct RecordingLogger {
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lines mutex").clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with("WARN "))
            .collect()
    }
}

impl TraceLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.lines
            .lock()
            .expect("log lines mutex")
            .push(format!("INFO {message}"));
    }

    fn warn(&self, message: &str) {
        self.lines
            .lock()
            .expect("log lines mutex")
            .push(format!("WARN {message}"));
    }
}
