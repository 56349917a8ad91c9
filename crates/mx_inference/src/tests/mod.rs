mod fixtures;

mod collection_merge;
mod facts_export;
mod observer_trace;
