//! Per-request sample context.
//!
//! Every page renders the same three variables. The context is built
//! fresh for each request and owns its own [`ProgressSequence`], so
//! nothing is shared between requests.

use std::time::Duration;

use crate::config::DelaySettings;
use crate::progress::ProgressSequence;

pub const SAMPLE_LIST: [i32; 5] = [1, 2, 3, 4, 5];
pub const SAMPLE_STRING: &str = "I am a string stored in the context dict";

/// Context variable names, in insertion order.
pub const CONTEXT_KEYS: [&str; 3] = ["mylist", "mystring", "mylongresponse"];

/// Template variables for one request.
#[derive(Debug)]
pub struct SampleContext {
    pub mylist: Vec<i32>,
    pub mystring: String,
    /// Lazy: nothing sleeps until this is iterated.
    pub mylongresponse: ProgressSequence,
}

/// A [`SampleContext`] whose progress sequence has been fully drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainedContext {
    pub mylist: Vec<i32>,
    pub mystring: String,
    pub mylongresponse: Vec<String>,
}

impl SampleContext {
    /// Context for the primary pages (`process_time` delay units).
    pub fn new(delay: &DelaySettings) -> Self {
        Self::with_count(delay.process_time, delay.unit)
    }

    /// Context for the long content stream (`content_process_time` units).
    pub fn for_content(delay: &DelaySettings) -> Self {
        Self::with_count(delay.content_process_time, delay.unit)
    }

    pub fn with_count(count: u32, unit: Duration) -> Self {
        Self {
            mylist: SAMPLE_LIST.to_vec(),
            mystring: SAMPLE_STRING.to_string(),
            mylongresponse: ProgressSequence::new(count, unit),
        }
    }

    pub fn keys(&self) -> [&'static str; 3] {
        CONTEXT_KEYS
    }

    /// Run the simulated computation to completion.
    ///
    /// Blocks for the full delay: `count * unit`.
    pub fn drain(self) -> DrainedContext {
        DrainedContext {
            mylist: self.mylist,
            mystring: self.mystring,
            mylongresponse: self.mylongresponse.collect(),
        }
    }
}
