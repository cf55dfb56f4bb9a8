mod jsonl;

pub use jsonl::flush_event_log;
